use kernel::{Kernel, KernelResult};

use crate::shape::{FromNative, OccShape, Session};
use crate::{ModelingError, Result};

/// Turns the outcome of a kernel call into a wrapped shape.
///
/// The kernel message of a failure is kept as [`ModelingError::Kernel`].
///
/// # Errors
///
/// Returns [`ModelingError::Kernel`] if the kernel failed, and
/// [`ModelingError::UnexpectedShapeType`] if it returned a shape of another kind than `T`.
pub fn convert_shape_result<K: Kernel, T: FromNative<K>>(
    session: &Session,
    result: KernelResult<K::Shape>,
) -> Result<T> {
    match result {
        Ok(handle) => T::from_native(OccShape::new(handle, session.clone())),
        Err(err) => {
            log::debug!("kernel call failed: {err}");
            Err(ModelingError::Kernel(err.message().to_string()))
        }
    }
}
