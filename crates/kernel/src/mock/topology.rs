use crate::geom::{is_equal, BoundingBox, Plane};
use crate::{KernelError, KernelResult, ShapeType};
use glam::{DAffine3, DVec3};
use std::cell::Cell;
use std::collections::HashSet;

/// Hands out topology ids, unique within one kernel.
#[derive(Debug)]
pub struct Ids(Cell<u64>);

impl Ids {
    pub const fn new() -> Self {
        Self(Cell::new(1))
    }

    pub fn next(&self) -> u64 {
        let id = self.0.get();
        self.0.set(id + 1);
        id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Surface {
    Plane { origin: DVec3, normal: DVec3 },
    /// Rows of equally long point lists, evaluated as a bilinear quad grid.
    Grid(Vec<Vec<DVec3>>),
}

impl Surface {
    fn transformed(&self, t: &DAffine3) -> Self {
        match self {
            Self::Plane { origin, normal } => Self::Plane {
                origin: t.transform_point3(*origin),
                normal: t.transform_vector3(*normal).normalize_or_zero(),
            },
            Self::Grid(rows) => Self::Grid(
                rows.iter()
                    .map(|row| row.iter().map(|p| t.transform_point3(*p)).collect::<Vec<_>>())
                    .collect(),
            ),
        }
    }

    fn flipped(&self) -> Self {
        match self {
            Self::Plane { origin, normal } => Self::Plane {
                origin: *origin,
                normal: -*normal,
            },
            Self::Grid(rows) => Self::Grid(rows.iter().rev().cloned().collect()),
        }
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Vertex(DVec3),
    /// Polyline approximation of the curve, closed if the first and last point coincide.
    Edge(Vec<DVec3>),
    Wire(Vec<Node>),
    /// The first wire bounds the face, further wires are holes.
    Face {
        surface: Surface,
        wires: Vec<Node>,
    },
    Shell(Vec<Node>),
    Solid(Vec<Node>),
    CompSolid(Vec<Node>),
    Compound(Vec<Node>),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: u64,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(ids: &Ids, kind: NodeKind) -> Self {
        Self {
            id: ids.next(),
            kind,
        }
    }

    pub fn vertex(ids: &Ids, point: DVec3) -> Self {
        Self::new(ids, NodeKind::Vertex(point))
    }

    pub fn edge(ids: &Ids, points: Vec<DVec3>) -> Self {
        Self::new(ids, NodeKind::Edge(points))
    }

    pub const fn shape_type(&self) -> ShapeType {
        match self.kind {
            NodeKind::Vertex(_) => ShapeType::Vertex,
            NodeKind::Edge(_) => ShapeType::Edge,
            NodeKind::Wire(_) => ShapeType::Wire,
            NodeKind::Face { .. } => ShapeType::Face,
            NodeKind::Shell(_) => ShapeType::Shell,
            NodeKind::Solid(_) => ShapeType::Solid,
            NodeKind::CompSolid(_) => ShapeType::CompSolid,
            NodeKind::Compound(_) => ShapeType::Compound,
        }
    }

    pub fn children(&self) -> &[Self] {
        match &self.kind {
            NodeKind::Vertex(_) | NodeKind::Edge(_) => &[],
            NodeKind::Face { wires, .. } => wires,
            NodeKind::Wire(c)
            | NodeKind::Shell(c)
            | NodeKind::Solid(c)
            | NodeKind::CompSolid(c)
            | NodeKind::Compound(c) => c,
        }
    }

    /// Distinct descendants (including `self`) of `kind` in pre-order.
    pub fn sub_shapes(&self, kind: ShapeType) -> Vec<&Self> {
        fn visit<'a>(
            node: &'a Node,
            kind: ShapeType,
            seen: &mut HashSet<u64>,
            out: &mut Vec<&'a Node>,
        ) {
            if node.shape_type() == kind {
                if seen.insert(node.id) {
                    out.push(node);
                }
                return;
            }
            for child in node.children() {
                visit(child, kind, seen, out);
            }
        }
        let mut out = Vec::new();
        visit(self, kind, &mut HashSet::new(), &mut out);
        out
    }

    /// The polyline of an edge, or the joined polylines of a wire.
    pub fn polyline(&self) -> Vec<DVec3> {
        match &self.kind {
            NodeKind::Edge(points) => points.clone(),
            NodeKind::Wire(edges) => {
                let mut out: Vec<DVec3> = Vec::new();
                for edge in edges {
                    let points = edge.polyline();
                    let skip = usize::from(out.last().is_some_and(|last| {
                        points.first().is_some_and(|first| first == last)
                    }));
                    out.extend(points.into_iter().skip(skip));
                }
                out
            }
            _ => Vec::new(),
        }
    }

    fn collect_points(&self, out: &mut Vec<DVec3>) {
        match &self.kind {
            NodeKind::Vertex(p) => out.push(*p),
            NodeKind::Edge(points) => out.extend_from_slice(points),
            NodeKind::Face {
                surface: Surface::Grid(rows),
                ..
            } => out.extend(rows.iter().flatten()),
            _ => {
                for child in self.children() {
                    child.collect_points(out);
                }
            }
        }
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut points = Vec::new();
        self.collect_points(&mut points);
        BoundingBox::from_points(points)
    }

    pub fn length(&self) -> f64 {
        match self.kind {
            NodeKind::Edge(_) | NodeKind::Wire(_) => self
                .polyline()
                .windows(2)
                .map(|w| w[0].distance(w[1]))
                .sum(),
            _ => 0.0,
        }
    }

    pub fn end_points(&self) -> Option<(DVec3, DVec3)> {
        match self.kind {
            NodeKind::Edge(_) | NodeKind::Wire(_) => {
                let points = self.polyline();
                Some((*points.first()?, *points.last()?))
            }
            _ => None,
        }
    }

    pub fn is_closed(&self, tolerance: f64) -> bool {
        match &self.kind {
            NodeKind::Vertex(_) => false,
            NodeKind::Edge(_) | NodeKind::Wire(_) => self
                .end_points()
                .is_some_and(|(a, b)| self.length() > tolerance && is_equal(a, b, tolerance)),
            NodeKind::Face { .. } => true,
            _ => self.children().iter().all(|c| c.is_closed(tolerance)),
        }
    }

    pub fn area(&self) -> f64 {
        match &self.kind {
            NodeKind::Face {
                surface: Surface::Plane { normal, .. },
                wires,
            } => {
                let mut wires = wires.iter();
                let outer = wires
                    .next()
                    .map_or(0.0, |w| newell_normal(&w.polyline()).dot(*normal).abs());
                let holes: f64 = wires
                    .map(|w| newell_normal(&w.polyline()).dot(*normal).abs())
                    .sum();
                (outer - holes) * 0.5
            }
            NodeKind::Face {
                surface: Surface::Grid(rows),
                ..
            } => rows
                .windows(2)
                .flat_map(|r| {
                    r[0].windows(2).zip(r[1].windows(2)).map(|(a, b)| {
                        let t1 = (a[1] - a[0]).cross(b[0] - a[0]).length();
                        let t2 = (b[1] - a[1]).cross(b[0] - a[1]).length();
                        (t1 + t2) * 0.5
                    })
                })
                .sum(),
            _ => self.children().iter().map(Self::area).sum(),
        }
    }

    pub fn normal(&self) -> Option<DVec3> {
        match &self.kind {
            NodeKind::Face {
                surface: Surface::Plane { normal, .. },
                ..
            } => Some(*normal),
            _ => None,
        }
    }

    /// A copy with the same geometry and fresh topology ids.
    pub fn renumbered(&self, ids: &Ids) -> Self {
        self.transformed(&DAffine3::IDENTITY, ids)
    }

    /// A transformed copy with fresh topology ids.
    pub fn transformed(&self, t: &DAffine3, ids: &Ids) -> Self {
        let map = |nodes: &[Self]| nodes.iter().map(|n| n.transformed(t, ids)).collect();
        let kind = match &self.kind {
            NodeKind::Vertex(p) => NodeKind::Vertex(t.transform_point3(*p)),
            NodeKind::Edge(points) => {
                NodeKind::Edge(points.iter().map(|p| t.transform_point3(*p)).collect())
            }
            NodeKind::Wire(c) => NodeKind::Wire(map(c)),
            NodeKind::Face { surface, wires } => NodeKind::Face {
                surface: surface.transformed(t),
                wires: map(wires),
            },
            NodeKind::Shell(c) => NodeKind::Shell(map(c)),
            NodeKind::Solid(c) => NodeKind::Solid(map(c)),
            NodeKind::CompSolid(c) => NodeKind::CompSolid(map(c)),
            NodeKind::Compound(c) => NodeKind::Compound(map(c)),
        };
        Self::new(ids, kind)
    }

    /// A reversed copy of a face with a fresh id. The boundary edges are shared.
    pub fn flipped_face(&self, ids: &Ids) -> Self {
        match &self.kind {
            NodeKind::Face { surface, wires } => Self::new(
                ids,
                NodeKind::Face {
                    surface: surface.flipped(),
                    wires: wires.clone(),
                },
            ),
            _ => self.renumbered(ids),
        }
    }
}

/// Joins edges head to tail into a wire, reversing edges where needed.
pub fn connect_edges(ids: &Ids, edges: Vec<Node>, tolerance: f64) -> KernelResult<Node> {
    let mut ordered: Vec<Node> = Vec::with_capacity(edges.len());
    for (index, edge) in edges.into_iter().enumerate() {
        let NodeKind::Edge(points) = &edge.kind else {
            return Err(KernelError::new(format!(
                "expected an edge, got {}",
                edge.shape_type()
            )));
        };
        let (Some(&start), Some(&end)) = (points.first(), points.last()) else {
            return Err(KernelError::new("edge has no geometry"));
        };
        if let Some(previous) = ordered.last_mut() {
            let (prev_start, prev_end) = previous.end_points().unwrap_or_default();
            // The first edge may only be flipped once its successor is known.
            if index == 1
                && !is_equal(prev_end, start, tolerance)
                && !is_equal(prev_end, end, tolerance)
                && (is_equal(prev_start, start, tolerance) || is_equal(prev_start, end, tolerance))
            {
                reverse_edge(previous);
            }
            let prev_end = previous.end_points().unwrap_or_default().1;
            if is_equal(prev_end, start, tolerance) {
                ordered.push(edge);
            } else if is_equal(prev_end, end, tolerance) {
                let mut edge = edge;
                reverse_edge(&mut edge);
                ordered.push(edge);
            } else {
                return Err(KernelError::new("the edges are not connected"));
            }
        } else {
            ordered.push(edge);
        }
    }
    Ok(Node::new(ids, NodeKind::Wire(ordered)))
}

fn reverse_edge(edge: &mut Node) {
    if let NodeKind::Edge(points) = &mut edge.kind {
        points.reverse();
    }
}

/// Builds a planar face from closed wires. The first wire is the outer boundary.
pub fn planar_face(ids: &Ids, wires: Vec<Node>, tolerance: f64) -> KernelResult<Node> {
    let Some(outer) = wires.first() else {
        return Err(KernelError::new("a face needs at least one wire"));
    };
    for wire in &wires {
        if wire.shape_type() != ShapeType::Wire {
            return Err(KernelError::new(format!(
                "expected a wire, got {}",
                wire.shape_type()
            )));
        }
        if !wire.is_closed(tolerance) {
            return Err(KernelError::new("the wire is not closed"));
        }
    }
    let points = outer.polyline();
    let normal = newell_normal(&points);
    let Some(normal) = normal.try_normalize() else {
        return Err(KernelError::new("the wire does not enclose an area"));
    };
    let origin = points[0];
    let plane = Plane::from_normal(origin, normal)
        .ok_or_else(|| KernelError::new("the wire does not enclose an area"))?;
    let scale = outer.bounding_box().map_or(1.0, |bb| bb.size().length().max(1.0));
    let planar = wires
        .iter()
        .flat_map(Node::polyline)
        .all(|p| plane.distance(p).abs() <= tolerance * scale);
    if !planar {
        return Err(KernelError::new("the wire is not planar"));
    }
    Ok(Node::new(
        ids,
        NodeKind::Face {
            surface: Surface::Plane { origin, normal },
            wires,
        },
    ))
}

/// Newell's method; the length of the result is twice the enclosed area.
pub fn newell_normal(points: &[DVec3]) -> DVec3 {
    let n = points.len();
    (0..n).fold(DVec3::ZERO, |acc, i| {
        let a = points[i];
        let b = points[(i + 1) % n];
        acc + DVec3::new(
            (a.y - b.y) * (a.z + b.z),
            (a.z - b.z) * (a.x + b.x),
            (a.x - b.x) * (a.y + b.y),
        )
    })
}

/// Sweeps `profile` through successive placements, one per frame.
///
/// The first frame is the placement of the profile itself. If `closed` is set the last frame
/// coincides with the first and no end caps are generated.
pub fn sweep(ids: &Ids, profile: &Node, frames: &[DAffine3], closed: bool) -> KernelResult<Node> {
    match &profile.kind {
        NodeKind::Vertex(p) => Ok(Node::edge(
            ids,
            frames.iter().map(|f| f.transform_point3(*p)).collect(),
        )),
        NodeKind::Edge(points) => {
            let rows: Vec<Vec<DVec3>> = frames
                .iter()
                .map(|f| points.iter().map(|p| f.transform_point3(*p)).collect())
                .collect();
            Ok(grid_face(ids, rows))
        }
        NodeKind::Wire(edges) => {
            let faces = edges
                .iter()
                .map(|e| sweep(ids, e, frames, closed))
                .collect::<KernelResult<_>>()?;
            Ok(Node::new(ids, NodeKind::Shell(faces)))
        }
        NodeKind::Face { .. } => {
            let first = frames.first().copied().unwrap_or(DAffine3::IDENTITY);
            let last = frames.last().copied().unwrap_or(DAffine3::IDENTITY);
            let bottom = profile.transformed(&first, ids);
            let top = profile.transformed(&last, ids);

            let mut faces = Vec::new();
            for (bottom_wire, top_wire) in bottom.children().iter().zip(top.children()) {
                faces.extend(side_faces(ids, bottom_wire, top_wire, frames));
            }
            if !closed {
                let direction = top.bounding_box().map(|b| b.center()).unwrap_or_default()
                    - bottom.bounding_box().map(|b| b.center()).unwrap_or_default();
                let (bottom, top) = if bottom.normal().is_some_and(|n| n.dot(direction) > 0.0) {
                    (bottom.flipped_face(ids), top)
                } else {
                    let top = top.flipped_face(ids);
                    (bottom, top)
                };
                faces.insert(0, top);
                faces.insert(0, bottom);
            }
            let shell = Node::new(ids, NodeKind::Shell(faces));
            Ok(Node::new(ids, NodeKind::Solid(vec![shell])))
        }
        NodeKind::Compound(children) => {
            let children = children
                .iter()
                .map(|c| sweep(ids, c, frames, closed))
                .collect::<KernelResult<_>>()?;
            Ok(Node::new(ids, NodeKind::Compound(children)))
        }
        _ => Err(KernelError::new(format!(
            "cannot sweep a {}",
            profile.shape_type()
        ))),
    }
}

/// Lateral faces between two placements of a closed wire.
///
/// Every profile vertex traces one rail edge, shared by the two faces meeting there, so the
/// resulting shell is watertight.
fn side_faces(ids: &Ids, bottom: &Node, top: &Node, frames: &[DAffine3]) -> Vec<Node> {
    let first_inverse = frames.first().map_or(DAffine3::IDENTITY, DAffine3::inverse);
    let bottom_edges = bottom.children();
    let top_edges = top.children();
    let rails: Vec<Node> = bottom_edges
        .iter()
        .map(|edge| {
            let start = first_inverse.transform_point3(edge.end_points().unwrap_or_default().0);
            Node::edge(ids, frames.iter().map(|f| f.transform_point3(start)).collect())
        })
        .collect();
    let n = rails.len();
    bottom_edges
        .iter()
        .zip(top_edges)
        .enumerate()
        .map(|(i, (bottom_edge, top_edge))| {
            let local: Vec<DVec3> = bottom_edge
                .polyline()
                .into_iter()
                .map(|p| first_inverse.transform_point3(p))
                .collect();
            let rows: Vec<Vec<DVec3>> = frames
                .iter()
                .map(|f| local.iter().map(|p| f.transform_point3(*p)).collect())
                .collect();
            let mut top_edge = top_edge.clone();
            let mut start_rail = rails[i].clone();
            reverse_edge(&mut top_edge);
            reverse_edge(&mut start_rail);
            let boundary = vec![
                bottom_edge.clone(),
                rails[(i + 1) % n].clone(),
                top_edge,
                start_rail,
            ];
            Node::new(
                ids,
                NodeKind::Face {
                    surface: Surface::Grid(rows),
                    wires: vec![Node::new(ids, NodeKind::Wire(boundary))],
                },
            )
        })
        .collect()
}

fn grid_face(ids: &Ids, rows: Vec<Vec<DVec3>>) -> Node {
    let first_row = rows.first().cloned().unwrap_or_default();
    let mut last_row = rows.last().cloned().unwrap_or_default();
    last_row.reverse();
    let last_column: Vec<DVec3> = rows.iter().filter_map(|r| r.last().copied()).collect();
    let mut first_column: Vec<DVec3> = rows.iter().filter_map(|r| r.first().copied()).collect();
    first_column.reverse();
    let boundary = [first_row, last_column, last_row, first_column]
        .into_iter()
        .map(|points| Node::edge(ids, points))
        .collect();
    let wire = Node::new(ids, NodeKind::Wire(boundary));
    Node::new(
        ids,
        NodeKind::Face {
            surface: Surface::Grid(rows),
            wires: vec![wire],
        },
    )
}
