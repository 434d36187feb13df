//! Shape interfaces and the wrappers that own kernel handles.
//!
//! Every shape returned by [`crate::ShapeFactory`] is an [`OccShape`] (or one of its typed
//! newtypes) that exclusively owns a native handle. The wrappers are immutable: queries hand out
//! new wrappers and modeling operations create new shapes.

use glam::DVec3;
use kernel::geom::BoundingBox;
use kernel::mesh::MeshData;
use kernel::{Kernel, NativeShape, ShapeType};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::settings::MeshStyle;
use crate::ModelingError;

/// Identifies the factory, and therefore the kernel session, a shape was created in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(Uuid);

impl SessionId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// State shared by all shapes of one factory.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    style: Arc<MeshStyle>,
}

impl Session {
    #[must_use]
    pub(crate) fn new(style: MeshStyle) -> Self {
        Self {
            id: SessionId::new(),
            style: Arc::new(style),
        }
    }

    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn style(&self) -> &MeshStyle {
        &self.style
    }
}

/// A shape of any kind.
pub trait Shape: Send + Sync + fmt::Debug + 'static {
    fn shape_type(&self) -> ShapeType;

    /// Direct sub-shapes, in the order the kernel stores them.
    fn children(&self) -> Vec<Box<dyn Shape>>;

    /// All distinct sub-shapes of the given kind.
    fn sub_shapes(&self, kind: ShapeType) -> Vec<Box<dyn Shape>>;

    fn bounding_box(&self) -> Option<BoundingBox>;

    /// Tessellates the shape, styled by the settings of its factory.
    fn mesh(&self) -> MeshData;

    /// Session and topological identity, if the shape is backed by a kernel handle.
    #[doc(hidden)]
    fn identity(&self) -> Option<(SessionId, u64)>;

    /// The wrapper owning the native handle, used to unwrap shapes for kernel calls.
    #[doc(hidden)]
    fn kernel_shape(&self) -> &dyn Any;

    /// Returns `true` if both shapes refer to the same topological entity of the same session.
    fn is_same(&self, other: &dyn Shape) -> bool {
        match (self.identity(), other.identity()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

pub trait Vertex: Shape {
    fn point(&self) -> DVec3;
}

pub trait Edge: Shape {
    fn start(&self) -> DVec3;
    fn end(&self) -> DVec3;
    fn length(&self) -> f64;
    fn is_closed(&self) -> bool;
}

pub trait Wire: Shape {
    /// The edges in connection order.
    fn edges(&self) -> Vec<Box<dyn Edge>>;
    fn is_closed(&self) -> bool;
}

pub trait Face: Shape {
    /// The normal of a planar face.
    fn normal(&self) -> Option<DVec3>;
    fn area(&self) -> f64;
    fn outer_wire(&self) -> Option<Box<dyn Wire>>;
}

pub trait Shell: Shape {
    fn faces(&self) -> Vec<Box<dyn Face>>;
}

pub trait Solid: Shape {
    fn shells(&self) -> Vec<Box<dyn Shell>>;
}

pub trait CompSolid: Shape {
    fn solids(&self) -> Vec<Box<dyn Solid>>;
}

/// A collection of shapes, accessed through [`Shape::children`].
pub trait Compound: Shape {}

/// Exclusive owner of a native kernel handle.
///
/// The handle is released when the wrapper is dropped. Wrappers are only created by the
/// factory, so callers cannot attach a handle to a session by hand:
///
/// ```compile_fail
/// use glam::DVec3;
/// use kernel::mock::MockKernel;
/// use kernel::Kernel;
/// use modeling::shape::OccShape;
///
/// let handle = MockKernel::new().make_vertex(DVec3::ZERO).unwrap();
/// let _shape: OccShape<MockKernel> = OccShape::new(handle, todo!());
/// ```
///
/// ```compile_fail
/// use modeling::settings::MeshStyle;
/// use modeling::shape::Session;
///
/// let _session = Session::new(MeshStyle::default());
/// ```
pub struct OccShape<K: Kernel> {
    handle: K::Shape,
    session: Session,
}

impl<K: Kernel> OccShape<K> {
    #[must_use]
    pub(crate) const fn new(handle: K::Shape, session: Session) -> Self {
        Self { handle, session }
    }

    #[must_use]
    pub const fn handle(&self) -> &K::Shape {
        &self.handle
    }

    #[must_use]
    pub const fn session(&self) -> SessionId {
        self.session.id
    }

    fn derive(&self, handle: K::Shape) -> Self {
        Self::new(handle, self.session.clone())
    }

    fn typed_sub_shapes<T: FromNative<K>>(&self, kind: ShapeType) -> Vec<T> {
        self.handle
            .sub_shapes(kind)
            .into_iter()
            .filter_map(|h| T::from_native(self.derive(h)).ok())
            .collect()
    }
}

impl<K: Kernel> fmt::Debug for OccShape<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OccShape")
            .field("handle", &self.handle)
            .field("session", &self.session.id)
            .finish()
    }
}

impl<K: Kernel> Shape for OccShape<K> {
    fn shape_type(&self) -> ShapeType {
        self.handle.shape_type()
    }

    fn children(&self) -> Vec<Box<dyn Shape>> {
        self.handle
            .children()
            .into_iter()
            .map(|h| wrap_native(self.derive(h)))
            .collect()
    }

    fn sub_shapes(&self, kind: ShapeType) -> Vec<Box<dyn Shape>> {
        self.handle
            .sub_shapes(kind)
            .into_iter()
            .map(|h| wrap_native(self.derive(h)))
            .collect()
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        self.handle.bounding_box()
    }

    fn mesh(&self) -> MeshData {
        let mut mesh = self.handle.mesh();
        self.session.style.apply(&mut mesh);
        mesh
    }

    fn identity(&self) -> Option<(SessionId, u64)> {
        Some((self.session.id, self.handle.topology_id()))
    }

    fn kernel_shape(&self) -> &dyn Any {
        self
    }
}

/// Conversion of an untyped wrapper into a typed one, checking the native shape type.
pub trait FromNative<K: Kernel>: Sized {
    /// # Errors
    ///
    /// Returns [`ModelingError::UnexpectedShapeType`] if the handle is of a different kind.
    fn from_native(shape: OccShape<K>) -> Result<Self, ModelingError>;
}

impl<K: Kernel> FromNative<K> for OccShape<K> {
    fn from_native(shape: OccShape<K>) -> Result<Self, ModelingError> {
        Ok(shape)
    }
}

impl<K: Kernel> FromNative<K> for Box<dyn Shape> {
    fn from_native(shape: OccShape<K>) -> Result<Self, ModelingError> {
        Ok(wrap_native(shape))
    }
}

macro_rules! occ_kind {
    ($(#[$meta:meta])* $name:ident, $kind:ident) => {
        $(#[$meta])*
        pub struct $name<K: Kernel>(OccShape<K>);

        impl<K: Kernel> $name<K> {
            #[must_use]
            pub const fn as_occ(&self) -> &OccShape<K> {
                &self.0
            }

            #[must_use]
            pub fn into_occ(self) -> OccShape<K> {
                self.0
            }
        }

        impl<K: Kernel> FromNative<K> for $name<K> {
            fn from_native(shape: OccShape<K>) -> Result<Self, ModelingError> {
                match shape.shape_type() {
                    ShapeType::$kind => Ok(Self(shape)),
                    found => Err(ModelingError::UnexpectedShapeType {
                        expected: ShapeType::$kind,
                        found,
                    }),
                }
            }
        }

        impl<K: Kernel> TryFrom<OccShape<K>> for $name<K> {
            type Error = ModelingError;

            fn try_from(shape: OccShape<K>) -> Result<Self, Self::Error> {
                Self::from_native(shape)
            }
        }

        impl<K: Kernel> fmt::Debug for $name<K> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.0).finish()
            }
        }

        impl<K: Kernel> Shape for $name<K> {
            fn shape_type(&self) -> ShapeType {
                ShapeType::$kind
            }

            fn children(&self) -> Vec<Box<dyn Shape>> {
                self.0.children()
            }

            fn sub_shapes(&self, kind: ShapeType) -> Vec<Box<dyn Shape>> {
                self.0.sub_shapes(kind)
            }

            fn bounding_box(&self) -> Option<BoundingBox> {
                self.0.bounding_box()
            }

            fn mesh(&self) -> MeshData {
                self.0.mesh()
            }

            fn identity(&self) -> Option<(SessionId, u64)> {
                self.0.identity()
            }

            fn kernel_shape(&self) -> &dyn Any {
                &self.0
            }
        }
    };
}

occ_kind!(OccVertex, Vertex);
occ_kind!(OccEdge, Edge);
occ_kind!(OccWire, Wire);
occ_kind!(OccFace, Face);
occ_kind!(OccShell, Shell);
occ_kind!(OccSolid, Solid);
occ_kind!(
    /// A set of solids sharing faces.
    OccCompSolid,
    CompSolid
);
occ_kind!(OccCompound, Compound);

impl<K: Kernel> Vertex for OccVertex<K> {
    fn point(&self) -> DVec3 {
        self.0.handle.point().unwrap_or(DVec3::NAN)
    }
}

impl<K: Kernel> Edge for OccEdge<K> {
    fn start(&self) -> DVec3 {
        self.0.handle.end_points().map_or(DVec3::NAN, |(start, _)| start)
    }

    fn end(&self) -> DVec3 {
        self.0.handle.end_points().map_or(DVec3::NAN, |(_, end)| end)
    }

    fn length(&self) -> f64 {
        self.0.handle.length()
    }

    fn is_closed(&self) -> bool {
        self.0.handle.is_closed()
    }
}

impl<K: Kernel> Wire for OccWire<K> {
    fn edges(&self) -> Vec<Box<dyn Edge>> {
        self.0
            .typed_sub_shapes::<OccEdge<K>>(ShapeType::Edge)
            .into_iter()
            .map(|e| Box::new(e) as Box<dyn Edge>)
            .collect()
    }

    fn is_closed(&self) -> bool {
        self.0.handle.is_closed()
    }
}

impl<K: Kernel> Face for OccFace<K> {
    fn normal(&self) -> Option<DVec3> {
        self.0.handle.normal()
    }

    fn area(&self) -> f64 {
        self.0.handle.area()
    }

    fn outer_wire(&self) -> Option<Box<dyn Wire>> {
        self.0
            .typed_sub_shapes::<OccWire<K>>(ShapeType::Wire)
            .into_iter()
            .next()
            .map(|w| Box::new(w) as Box<dyn Wire>)
    }
}

impl<K: Kernel> Shell for OccShell<K> {
    fn faces(&self) -> Vec<Box<dyn Face>> {
        self.0
            .typed_sub_shapes::<OccFace<K>>(ShapeType::Face)
            .into_iter()
            .map(|f| Box::new(f) as Box<dyn Face>)
            .collect()
    }
}

impl<K: Kernel> Solid for OccSolid<K> {
    fn shells(&self) -> Vec<Box<dyn Shell>> {
        self.0
            .typed_sub_shapes::<OccShell<K>>(ShapeType::Shell)
            .into_iter()
            .map(|s| Box::new(s) as Box<dyn Shell>)
            .collect()
    }
}

impl<K: Kernel> CompSolid for OccCompSolid<K> {
    fn solids(&self) -> Vec<Box<dyn Solid>> {
        self.0
            .typed_sub_shapes::<OccSolid<K>>(ShapeType::Solid)
            .into_iter()
            .map(|s| Box::new(s) as Box<dyn Solid>)
            .collect()
    }
}

impl<K: Kernel> Compound for OccCompound<K> {}

/// Wraps a handle in the typed wrapper matching its shape type.
#[must_use]
pub fn wrap_native<K: Kernel>(shape: OccShape<K>) -> Box<dyn Shape> {
    match shape.shape_type() {
        ShapeType::Vertex => Box::new(OccVertex(shape)),
        ShapeType::Edge => Box::new(OccEdge(shape)),
        ShapeType::Wire => Box::new(OccWire(shape)),
        ShapeType::Face => Box::new(OccFace(shape)),
        ShapeType::Shell => Box::new(OccShell(shape)),
        ShapeType::Solid => Box::new(OccSolid(shape)),
        ShapeType::CompSolid => Box::new(OccCompSolid(shape)),
        ShapeType::Compound => Box::new(OccCompound(shape)),
    }
}
