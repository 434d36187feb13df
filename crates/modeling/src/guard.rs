use kernel::Kernel;

use crate::shape::{OccShape, SessionId, Shape};

/// Unwraps a shape to the native handle of kernel `K`.
///
/// # Panics
///
/// Panics if `shape` is not backed by an [`OccShape<K>`], or if it was created by a factory
/// with another session. Both are programming errors in the calling code.
pub fn ensure_occ_shape<K: Kernel, S: Shape + ?Sized>(session: SessionId, shape: &S) -> &K::Shape {
    let Some(occ) = shape.kernel_shape().downcast_ref::<OccShape<K>>() else {
        panic!("shape is not an OCC shape");
    };
    assert!(
        occ.session() == session,
        "shape belongs to a different kernel session"
    );
    occ.handle()
}

/// [`ensure_occ_shape`] for every shape, in order.
///
/// # Panics
///
/// See [`ensure_occ_shape`].
pub fn ensure_occ_shapes<'a, K: Kernel, S: Shape + ?Sized>(
    session: SessionId,
    shapes: &[&'a S],
) -> Vec<&'a K::Shape> {
    shapes
        .iter()
        .map(|shape| ensure_occ_shape::<K, S>(session, *shape))
        .collect()
}
