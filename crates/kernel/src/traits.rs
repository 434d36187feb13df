use crate::geom::{BoundingBox, Plane, Ray};
use crate::mesh::MeshData;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The topological kind of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShapeType {
    Compound,
    CompSolid,
    Solid,
    Shell,
    Face,
    Wire,
    Edge,
    Vertex,
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Compound => "compound",
            Self::CompSolid => "compsolid",
            Self::Solid => "solid",
            Self::Shell => "shell",
            Self::Face => "face",
            Self::Wire => "wire",
            Self::Edge => "edge",
            Self::Vertex => "vertex",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BooleanOp {
    Common,
    Cut,
    Fuse,
}

impl fmt::Display for BooleanOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Common => "common",
            Self::Cut => "cut",
            Self::Fuse => "fuse",
        };
        f.write_str(name)
    }
}

/// A failure reported by the kernel while constructing a shape.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct KernelError {
    message: String,
}

impl KernelError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

pub type KernelResult<T> = Result<T, KernelError>;

/// A handle to a shape living inside a kernel.
///
/// A handle exclusively owns its kernel resource: it is never cloned, and the resource is
/// released when the handle is dropped. Queries return new handles.
pub trait NativeShape: fmt::Debug + Send + Sync + Sized + 'static {
    fn shape_type(&self) -> ShapeType;

    /// Identity of the underlying topological entity.
    ///
    /// Two handles with the same id refer to the same entity, e.g. a compound child and the
    /// shape it was built from.
    fn topology_id(&self) -> u64;

    /// Direct sub-shapes in their stored order.
    fn children(&self) -> Vec<Self>;

    /// All distinct descendants of the given kind, in first visit order.
    fn sub_shapes(&self, kind: ShapeType) -> Vec<Self>;

    fn bounding_box(&self) -> Option<BoundingBox>;

    fn mesh(&self) -> MeshData;

    /// Location of a vertex, `None` for other kinds.
    fn point(&self) -> Option<DVec3>;

    /// First and last point of an edge or wire.
    fn end_points(&self) -> Option<(DVec3, DVec3)>;

    /// Length of an edge or wire, 0 for other kinds.
    fn length(&self) -> f64;

    /// Surface area of faces, 0 for lower dimensional shapes.
    fn area(&self) -> f64;

    /// Normal of a planar face.
    fn normal(&self) -> Option<DVec3>;

    fn is_closed(&self) -> bool;
}

/// A session of a B-Rep kernel.
///
/// Angles are in radians. Every call is synchronous and either returns a new shape or a
/// [`KernelError`]; input shapes are never modified.
pub trait Kernel: 'static {
    type Shape: NativeShape;

    fn make_vertex(&self, point: DVec3) -> KernelResult<Self::Shape>;

    fn make_line(&self, start: DVec3, end: DVec3) -> KernelResult<Self::Shape>;

    /// An arc around `center` starting at `start`, turning by `angle` about `normal`.
    fn make_arc(
        &self,
        normal: DVec3,
        center: DVec3,
        start: DVec3,
        angle: f64,
    ) -> KernelResult<Self::Shape>;

    fn make_circle(&self, normal: DVec3, center: DVec3, radius: f64) -> KernelResult<Self::Shape>;

    /// A (rational) bezier curve. Without weights all poles are weighted equally.
    fn make_bezier(&self, points: &[DVec3], weights: Option<&[f64]>) -> KernelResult<Self::Shape>;

    /// A wire of line segments through `points`.
    fn make_polygon(&self, points: &[DVec3]) -> KernelResult<Self::Shape>;

    fn make_wire(&self, edges: &[&Self::Shape]) -> KernelResult<Self::Shape>;

    /// A planar face bounded by the first wire, with the others as holes.
    fn make_face(&self, wires: &[&Self::Shape]) -> KernelResult<Self::Shape>;

    fn make_rect(&self, plane: &Plane, dx: f64, dy: f64) -> KernelResult<Self::Shape>;

    fn make_box(&self, plane: &Plane, dx: f64, dy: f64, dz: f64) -> KernelResult<Self::Shape>;

    fn prism(&self, shape: &Self::Shape, vector: DVec3) -> KernelResult<Self::Shape>;

    fn sweep(&self, profile: &Self::Shape, path: &Self::Shape) -> KernelResult<Self::Shape>;

    fn revolve(&self, profile: &Self::Shape, axis: &Ray, angle: f64) -> KernelResult<Self::Shape>;

    fn boolean(
        &self,
        op: BooleanOp,
        first: &Self::Shape,
        second: &Self::Shape,
    ) -> KernelResult<Self::Shape>;

    fn combine(&self, shapes: &[&Self::Shape]) -> KernelResult<Self::Shape>;

    fn thick_solid_simple(&self, shape: &Self::Shape, thickness: f64) -> KernelResult<Self::Shape>;

    fn thick_solid_join(
        &self,
        shape: &Self::Shape,
        closing_faces: &[&Self::Shape],
        thickness: f64,
    ) -> KernelResult<Self::Shape>;
}
