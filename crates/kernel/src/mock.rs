//! A deterministic in-memory kernel.
//!
//! [`MockKernel`] builds real topology (polyline edges, planar and quad grid faces, shells and
//! solids) for every primitive, so shapes can be queried and tessellated. Booleans only do face
//! bookkeeping: no intersection curves are computed. Every call is recorded, and live handles
//! are counted, which makes the kernel boundary observable in tests.

mod tessellate;
mod topology;

use crate::geom::{is_equal, is_zero, BoundingBox, Plane, Precision, Ray};
use crate::mesh::MeshData;
use crate::{BooleanOp, Kernel, KernelError, KernelResult, NativeShape, ShapeType};
use glam::{DAffine3, DQuat, DVec3};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::f64::consts::TAU;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use topology::{Ids, Node, NodeKind};

/// Upper bound on the segments sampled for one curve or revolution.
pub const MAX_SEGMENTS: usize = 1 << 16;

/// Number of calls kept by [`MockKernel::calls`]. Older calls are dropped first.
pub const MAX_RECORDED_CALLS: usize = 4096;

/// A kernel entry point invocation, as recorded by [`MockKernel`].
#[derive(Debug, Clone, PartialEq)]
pub enum KernelCall {
    Vertex,
    Line,
    Arc { angle: f64 },
    Circle { radius: f64 },
    Bezier,
    Polygon,
    Wire,
    Face,
    Rect,
    Box,
    Prism,
    Sweep,
    Revolve { angle: f64 },
    Boolean(BooleanOp),
    Combine,
    ThickSolidSimple,
    ThickSolidJoin,
}

/// Deterministic test double for a B-Rep kernel.
///
/// The kernel uses interior mutability without locks and is therefore bound to one thread.
/// Shapes it returns are independent of it and may be sent elsewhere.
pub struct MockKernel {
    ids: Ids,
    segments_per_turn: u32,
    tolerance: f64,
    calls: RefCell<VecDeque<KernelCall>>,
    live: Arc<AtomicUsize>,
}

impl MockKernel {
    #[must_use]
    pub fn new() -> Self {
        Self::with_segments(32)
    }

    /// Creates a kernel sampling curves with `segments_per_turn` segments per full turn.
    #[must_use]
    pub fn with_segments(segments_per_turn: u32) -> Self {
        Self {
            ids: Ids::new(),
            segments_per_turn: segments_per_turn.max(3),
            tolerance: Precision::DISTANCE,
            calls: RefCell::new(VecDeque::new()),
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// The last [`MAX_RECORDED_CALLS`] calls, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<KernelCall> {
        self.calls.borrow().iter().cloned().collect()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Number of shape handles created by this kernel that have not been dropped yet.
    #[must_use]
    pub fn live_shapes(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    fn record(&self, call: KernelCall) {
        let mut calls = self.calls.borrow_mut();
        if calls.len() == MAX_RECORDED_CALLS {
            calls.pop_front();
        }
        calls.push_back(call);
    }

    fn handle(&self, node: Node) -> MockShape {
        MockShape::new(node, Arc::clone(&self.live))
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    fn segments(&self, angle: f64) -> KernelResult<usize> {
        let turns = angle.abs() / TAU;
        let segments = (turns * f64::from(self.segments_per_turn)).ceil();
        if !segments.is_finite() || segments > MAX_SEGMENTS as f64 {
            return Err(KernelError::new(format!(
                "the angle {angle} needs more than {MAX_SEGMENTS} segments"
            )));
        }
        Ok((segments as usize).max(1))
    }

    fn sample_arc(
        &self,
        normal: DVec3,
        center: DVec3,
        start: DVec3,
        angle: f64,
    ) -> KernelResult<Vec<DVec3>> {
        let normal = normal
            .try_normalize()
            .ok_or_else(|| KernelError::new("the arc normal is degenerate"))?;
        let radial = start - center;
        let radial = radial - normal * radial.dot(normal);
        if radial.length() < self.tolerance {
            return Err(KernelError::new("the arc radius is zero"));
        }
        let n = self.segments(angle)?;
        #[allow(clippy::cast_precision_loss)]
        let points = (0..=n)
            .map(|i| {
                let rotation = DQuat::from_axis_angle(normal, angle * i as f64 / n as f64);
                center + rotation * radial
            })
            .collect();
        Ok(points)
    }

    fn faces_of(shape: &MockShape, role: &str) -> KernelResult<Vec<Node>> {
        let faces: Vec<Node> = shape
            .node
            .sub_shapes(ShapeType::Face)
            .into_iter()
            .cloned()
            .collect();
        if faces.is_empty() {
            return Err(KernelError::new(format!(
                "the {role} operand of a boolean contains no faces"
            )));
        }
        Ok(faces)
    }

    fn solid(&self, faces: Vec<Node>) -> Node {
        let shell = Node::new(&self.ids, NodeKind::Shell(faces));
        Node::new(&self.ids, NodeKind::Solid(vec![shell]))
    }
}

impl Default for MockKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MockKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockKernel")
            .field("segments_per_turn", &self.segments_per_turn)
            .field("calls", &self.call_count())
            .field("live_shapes", &self.live_shapes())
            .finish_non_exhaustive()
    }
}

impl Kernel for MockKernel {
    type Shape = MockShape;

    fn make_vertex(&self, point: DVec3) -> KernelResult<MockShape> {
        self.record(KernelCall::Vertex);
        Ok(self.handle(Node::vertex(&self.ids, point)))
    }

    fn make_line(&self, start: DVec3, end: DVec3) -> KernelResult<MockShape> {
        self.record(KernelCall::Line);
        if is_equal(start, end, self.tolerance) {
            return Err(KernelError::new("BRepBuilderAPI_LineThroughIdenticPoints"));
        }
        Ok(self.handle(Node::edge(&self.ids, vec![start, end])))
    }

    fn make_arc(
        &self,
        normal: DVec3,
        center: DVec3,
        start: DVec3,
        angle: f64,
    ) -> KernelResult<MockShape> {
        self.record(KernelCall::Arc { angle });
        let points = self.sample_arc(normal, center, start, angle)?;
        Ok(self.handle(Node::edge(&self.ids, points)))
    }

    fn make_circle(&self, normal: DVec3, center: DVec3, radius: f64) -> KernelResult<MockShape> {
        self.record(KernelCall::Circle { radius });
        let plane = Plane::from_normal(center, normal)
            .ok_or_else(|| KernelError::new("the circle normal is degenerate"))?;
        let mut points = self.sample_arc(plane.normal, center, plane.point_at(radius, 0.0), TAU)?;
        // Close exactly, the sampled end point carries rounding noise.
        if let Some(first) = points.first().copied() {
            if let Some(last) = points.last_mut() {
                *last = first;
            }
        }
        Ok(self.handle(Node::edge(&self.ids, points)))
    }

    fn make_bezier(&self, points: &[DVec3], weights: Option<&[f64]>) -> KernelResult<MockShape> {
        self.record(KernelCall::Bezier);
        if points.len() < 2 {
            return Err(KernelError::new("a bezier curve needs at least two poles"));
        }
        let weights = weights.map_or_else(|| vec![1.0; points.len()], <[f64]>::to_vec);
        if weights.len() != points.len() {
            return Err(KernelError::new("the number of weights does not match the poles"));
        }
        let n = self.segments_per_turn as usize;
        #[allow(clippy::cast_precision_loss)]
        let samples = (0..=n)
            .map(|i| {
                // de Casteljau in homogeneous coordinates
                let t = i as f64 / n as f64;
                let mut h: Vec<(DVec3, f64)> = points
                    .iter()
                    .zip(&weights)
                    .map(|(p, w)| (*p * *w, *w))
                    .collect();
                for level in 1..h.len() {
                    for j in 0..h.len() - level {
                        h[j] = (h[j].0.lerp(h[j + 1].0, t), h[j].1 + (h[j + 1].1 - h[j].1) * t);
                    }
                }
                h[0].0 / h[0].1
            })
            .collect();
        Ok(self.handle(Node::edge(&self.ids, samples)))
    }

    fn make_polygon(&self, points: &[DVec3]) -> KernelResult<MockShape> {
        self.record(KernelCall::Polygon);
        if points.len() < 2 {
            return Err(KernelError::new("a polygon needs at least two points"));
        }
        let mut edges = Vec::with_capacity(points.len() - 1);
        for pair in points.windows(2) {
            if is_equal(pair[0], pair[1], self.tolerance) {
                return Err(KernelError::new("the polygon has coincident consecutive points"));
            }
            edges.push(Node::edge(&self.ids, vec![pair[0], pair[1]]));
        }
        let wire = topology::connect_edges(&self.ids, edges, self.tolerance)?;
        Ok(self.handle(wire))
    }

    fn make_wire(&self, edges: &[&MockShape]) -> KernelResult<MockShape> {
        self.record(KernelCall::Wire);
        if edges.is_empty() {
            return Err(KernelError::new("a wire needs at least one edge"));
        }
        let edges = edges.iter().map(|e| e.node.clone()).collect();
        let wire = topology::connect_edges(&self.ids, edges, self.tolerance)?;
        Ok(self.handle(wire))
    }

    fn make_face(&self, wires: &[&MockShape]) -> KernelResult<MockShape> {
        self.record(KernelCall::Face);
        let wires = wires.iter().map(|w| w.node.clone()).collect();
        let face = topology::planar_face(&self.ids, wires, self.tolerance)?;
        Ok(self.handle(face))
    }

    fn make_rect(&self, plane: &Plane, dx: f64, dy: f64) -> KernelResult<MockShape> {
        self.record(KernelCall::Rect);
        let corners = [
            plane.point_at(0.0, 0.0),
            plane.point_at(dx, 0.0),
            plane.point_at(dx, dy),
            plane.point_at(0.0, dy),
        ];
        let edges = (0..4)
            .map(|i| Node::edge(&self.ids, vec![corners[i], corners[(i + 1) % 4]]))
            .collect();
        let wire = topology::connect_edges(&self.ids, edges, self.tolerance)?;
        let face = topology::planar_face(&self.ids, vec![wire], self.tolerance)?;
        Ok(self.handle(face))
    }

    fn make_box(&self, plane: &Plane, dx: f64, dy: f64, dz: f64) -> KernelResult<MockShape> {
        self.record(KernelCall::Box);
        if dx.abs() < self.tolerance || dy.abs() < self.tolerance || dz.abs() < self.tolerance {
            return Err(KernelError::new("BRepPrimAPI_MakeBox: null dimension"));
        }
        let corners = [
            plane.point_at(0.0, 0.0),
            plane.point_at(dx, 0.0),
            plane.point_at(dx, dy),
            plane.point_at(0.0, dy),
        ];
        let edges = (0..4)
            .map(|i| Node::edge(&self.ids, vec![corners[i], corners[(i + 1) % 4]]))
            .collect();
        let wire = topology::connect_edges(&self.ids, edges, self.tolerance)?;
        let base = topology::planar_face(&self.ids, vec![wire], self.tolerance)?;
        let frames = [
            DAffine3::IDENTITY,
            DAffine3::from_translation(plane.normal * dz),
        ];
        let solid = topology::sweep(&self.ids, &base, &frames, false)?;
        Ok(self.handle(solid))
    }

    fn prism(&self, shape: &MockShape, vector: DVec3) -> KernelResult<MockShape> {
        self.record(KernelCall::Prism);
        if is_zero(vector, self.tolerance) {
            return Err(KernelError::new("BRepSweep_Prism: null vector"));
        }
        let frames = [DAffine3::IDENTITY, DAffine3::from_translation(vector)];
        let swept = topology::sweep(&self.ids, &shape.node, &frames, false)?;
        Ok(self.handle(swept))
    }

    fn sweep(&self, profile: &MockShape, path: &MockShape) -> KernelResult<MockShape> {
        self.record(KernelCall::Sweep);
        if !matches!(path.shape_type(), ShapeType::Wire | ShapeType::Edge) {
            return Err(KernelError::new(format!(
                "the sweep path must be a wire, got {}",
                path.shape_type()
            )));
        }
        let points = path.node.polyline();
        let Some(&origin) = points.first() else {
            return Err(KernelError::new("the sweep path is empty"));
        };
        if points.len() < 2 {
            return Err(KernelError::new("the sweep path is degenerate"));
        }
        let frames: Vec<DAffine3> = points
            .iter()
            .map(|p| DAffine3::from_translation(*p - origin))
            .collect();
        let swept = topology::sweep(&self.ids, &profile.node, &frames, false)?;
        Ok(self.handle(swept))
    }

    fn revolve(&self, profile: &MockShape, axis: &Ray, angle: f64) -> KernelResult<MockShape> {
        self.record(KernelCall::Revolve { angle });
        let direction = axis
            .direction
            .try_normalize()
            .ok_or_else(|| KernelError::new("the revolution axis is degenerate"))?;
        let closed = angle.abs() >= TAU - Precision::ANGLE;
        let n = self.segments(angle)?;
        #[allow(clippy::cast_precision_loss)]
        let frames: Vec<DAffine3> = (0..=n)
            .map(|i| {
                DAffine3::from_translation(axis.location)
                    * DAffine3::from_axis_angle(direction, angle * i as f64 / n as f64)
                    * DAffine3::from_translation(-axis.location)
            })
            .collect();
        let swept = topology::sweep(&self.ids, &profile.node, &frames, closed)?;
        Ok(self.handle(swept))
    }

    fn boolean(
        &self,
        op: BooleanOp,
        first: &MockShape,
        second: &MockShape,
    ) -> KernelResult<MockShape> {
        self.record(KernelCall::Boolean(op));
        let a = Self::faces_of(first, "first")?;
        let b = Self::faces_of(second, "second")?;
        let (Some(a_box), Some(b_box)) = (first.bounding_box(), second.bounding_box()) else {
            return Err(KernelError::new("boolean operands have no geometry"));
        };
        let overlap = a_box.overlaps(&b_box, self.tolerance);
        let faces = match op {
            BooleanOp::Fuse => a.iter().chain(&b).map(|f| f.renumbered(&self.ids)).collect(),
            BooleanOp::Cut if !overlap => a.iter().map(|f| f.renumbered(&self.ids)).collect(),
            BooleanOp::Cut => a
                .iter()
                .map(|f| f.renumbered(&self.ids))
                .chain(b.iter().map(|f| f.flipped_face(&self.ids)))
                .collect(),
            BooleanOp::Common if !overlap => {
                return Err(KernelError::new("the common part of the shapes is empty"));
            }
            BooleanOp::Common => {
                let inside = |face: &Node, other: &BoundingBox| {
                    face.bounding_box()
                        .is_some_and(|bb| bb.overlaps(other, self.tolerance))
                };
                a.iter()
                    .filter(|f| inside(*f, &b_box))
                    .chain(b.iter().filter(|f| inside(*f, &a_box)))
                    .map(|f| f.renumbered(&self.ids))
                    .collect()
            }
        };
        Ok(self.handle(self.solid(faces)))
    }

    fn combine(&self, shapes: &[&MockShape]) -> KernelResult<MockShape> {
        self.record(KernelCall::Combine);
        let children = shapes.iter().map(|s| s.node.clone()).collect();
        Ok(self.handle(Node::new(&self.ids, NodeKind::Compound(children))))
    }

    fn thick_solid_simple(&self, shape: &MockShape, thickness: f64) -> KernelResult<MockShape> {
        self.record(KernelCall::ThickSolidSimple);
        let thicken = |face: &Node| {
            let normal = face
                .normal()
                .ok_or_else(|| KernelError::new("only planar faces can be thickened"))?;
            let frames = [
                DAffine3::IDENTITY,
                DAffine3::from_translation(normal * thickness),
            ];
            topology::sweep(&self.ids, face, &frames, false)
        };
        let node = match shape.shape_type() {
            ShapeType::Face => thicken(&shape.node)?,
            ShapeType::Shell => {
                let solids = shape
                    .node
                    .children()
                    .iter()
                    .map(thicken)
                    .collect::<KernelResult<_>>()?;
                Node::new(&self.ids, NodeKind::CompSolid(solids))
            }
            other => {
                return Err(KernelError::new(format!(
                    "a thick solid needs a face or shell, got {other}"
                )));
            }
        };
        Ok(self.handle(node))
    }

    fn thick_solid_join(
        &self,
        shape: &MockShape,
        closing_faces: &[&MockShape],
        thickness: f64,
    ) -> KernelResult<MockShape> {
        self.record(KernelCall::ThickSolidJoin);
        if shape.shape_type() != ShapeType::Solid {
            return Err(KernelError::new(format!(
                "hollowing needs a solid, got {}",
                shape.shape_type()
            )));
        }
        let faces = shape.node.sub_shapes(ShapeType::Face);
        for closing in closing_faces {
            if !faces.iter().any(|f| f.id == closing.topology_id()) {
                return Err(KernelError::new("a closing face is not a face of the shape"));
            }
        }
        let kept: Vec<&Node> = faces
            .into_iter()
            .filter(|f| !closing_faces.iter().any(|c| c.topology_id() == f.id))
            .collect();
        if kept.is_empty() {
            return Err(KernelError::new("all faces of the shape were removed"));
        }
        let outer: Vec<Node> = kept.iter().map(|f| f.renumbered(&self.ids)).collect();
        let inner: Vec<Node> = kept
            .iter()
            .map(|f| {
                let offset = f.normal().map_or(DVec3::ZERO, |n| -n * thickness);
                f.transformed(&DAffine3::from_translation(offset), &self.ids)
                    .flipped_face(&self.ids)
            })
            .collect();
        let outer = Node::new(&self.ids, NodeKind::Shell(outer));
        let inner = Node::new(&self.ids, NodeKind::Shell(inner));
        let solid = if closing_faces.is_empty() {
            Node::new(&self.ids, NodeKind::Solid(vec![outer, inner]))
        } else {
            let mut faces = outer.children().to_vec();
            faces.extend_from_slice(inner.children());
            self.solid(faces)
        };
        Ok(self.handle(solid))
    }
}

/// A shape handle owned by a [`MockKernel`] session.
pub struct MockShape {
    node: Node,
    live: Arc<AtomicUsize>,
}

impl MockShape {
    fn new(node: Node, live: Arc<AtomicUsize>) -> Self {
        live.fetch_add(1, Ordering::SeqCst);
        Self { node, live }
    }

    fn derive(&self, node: Node) -> Self {
        Self::new(node, Arc::clone(&self.live))
    }
}

impl Drop for MockShape {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

impl fmt::Debug for MockShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockShape")
            .field("id", &self.node.id)
            .field("type", &self.node.shape_type())
            .finish()
    }
}

impl NativeShape for MockShape {
    fn shape_type(&self) -> ShapeType {
        self.node.shape_type()
    }

    fn topology_id(&self) -> u64 {
        self.node.id
    }

    fn children(&self) -> Vec<Self> {
        self.node
            .children()
            .iter()
            .map(|c| self.derive(c.clone()))
            .collect()
    }

    fn sub_shapes(&self, kind: ShapeType) -> Vec<Self> {
        self.node
            .sub_shapes(kind)
            .into_iter()
            .map(|c| self.derive(c.clone()))
            .collect()
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        self.node.bounding_box()
    }

    fn mesh(&self) -> MeshData {
        tessellate::mesh(&self.node)
    }

    fn point(&self) -> Option<DVec3> {
        match self.node.kind {
            NodeKind::Vertex(p) => Some(p),
            _ => None,
        }
    }

    fn end_points(&self) -> Option<(DVec3, DVec3)> {
        self.node.end_points()
    }

    fn length(&self) -> f64 {
        self.node.length()
    }

    fn area(&self) -> f64 {
        self.node.area()
    }

    fn normal(&self) -> Option<DVec3> {
        self.node.normal()
    }

    fn is_closed(&self) -> bool {
        self.node.is_closed(Precision::DISTANCE)
    }
}
