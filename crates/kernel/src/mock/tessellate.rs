use super::topology::{newell_normal, Node, NodeKind, Surface};
use crate::geom::Plane;
use crate::mesh::{EdgeMeshData, FaceMeshData, MeshData};
use crate::ShapeType;
use glam::{DVec2, DVec3};

pub fn mesh(node: &Node) -> MeshData {
    let mut faces = FaceMeshData::default();
    for face in node.sub_shapes(ShapeType::Face) {
        if let NodeKind::Face { surface, wires } = &face.kind {
            match surface {
                Surface::Plane { origin, normal } => {
                    mesh_planar(&mut faces, *origin, *normal, wires.first());
                }
                Surface::Grid(rows) => mesh_grid(&mut faces, rows),
            }
        }
    }
    let mut edges = EdgeMeshData::default();
    for edge in node.sub_shapes(ShapeType::Edge) {
        edges.push_polyline(&edge.polyline());
    }
    MeshData { faces, edges }
}

// Holes are not cut out of planar faces.
fn mesh_planar(out: &mut FaceMeshData, origin: DVec3, normal: DVec3, outer: Option<&Node>) {
    let Some(plane) = Plane::from_normal(origin, normal) else {
        return;
    };
    let mut points = outer.map(Node::polyline).unwrap_or_default();
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    if points.len() < 3 {
        return;
    }
    if newell_normal(&points).dot(normal) < 0.0 {
        points.reverse();
    }
    let uv: Vec<DVec2> = points
        .iter()
        .map(|p| {
            let (u, v) = plane.project(*p);
            DVec2::new(u, v)
        })
        .collect();
    let indices = ear_clip(&uv);
    let vertices: Vec<_> = points
        .iter()
        .zip(&uv)
        .map(|(p, uv)| (*p, normal, [uv.x, uv.y]))
        .collect();
    out.push_face(&vertices, &indices);
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn mesh_grid(out: &mut FaceMeshData, rows: &[Vec<DVec3>]) {
    let n_rows = rows.len();
    let n_cols = rows.first().map_or(0, Vec::len);
    if n_rows < 2 || n_cols < 2 {
        return;
    }
    let mut vertices = Vec::with_capacity(n_rows * n_cols);
    for (i, row) in rows.iter().enumerate() {
        for (j, p) in row.iter().enumerate() {
            let du = row[(j + 1).min(n_cols - 1)] - row[j.saturating_sub(1)];
            let dv = rows[(i + 1).min(n_rows - 1)][j] - rows[i.saturating_sub(1)][j];
            let normal = du.cross(dv).normalize_or_zero();
            let uv = [j as f64 / (n_cols - 1) as f64, i as f64 / (n_rows - 1) as f64];
            vertices.push((*p, normal, uv));
        }
    }
    let mut indices = Vec::with_capacity((n_rows - 1) * (n_cols - 1) * 6);
    let index = |i: usize, j: usize| (i * n_cols + j) as u32;
    for i in 0..n_rows - 1 {
        for j in 0..n_cols - 1 {
            let (a, b, c, d) = (index(i, j), index(i, j + 1), index(i + 1, j + 1), index(i + 1, j));
            indices.extend([a, b, c, a, c, d]);
        }
    }
    out.push_face(&vertices, &indices);
}

/// Triangulates a simple counter-clockwise polygon.
#[allow(clippy::cast_possible_truncation)]
fn ear_clip(polygon: &[DVec2]) -> Vec<u32> {
    let mut remaining: Vec<usize> = (0..polygon.len()).collect();
    let mut indices = Vec::with_capacity((polygon.len().saturating_sub(2)) * 3);
    let cross = |o: DVec2, a: DVec2, b: DVec2| (a - o).perp_dot(b - o);

    while remaining.len() > 3 {
        let n = remaining.len();
        let ear = (0..n).find(|&i| {
            let (prev, cur, next) = (
                polygon[remaining[(i + n - 1) % n]],
                polygon[remaining[i]],
                polygon[remaining[(i + 1) % n]],
            );
            if cross(prev, cur, next) <= 0.0 {
                return false;
            }
            remaining.iter().all(|&k| {
                let p = polygon[k];
                if p == prev || p == cur || p == next {
                    return true;
                }
                !(cross(prev, cur, p) >= 0.0
                    && cross(cur, next, p) >= 0.0
                    && cross(next, prev, p) >= 0.0)
            })
        });
        // Degenerate input: fall back to a fan over what is left.
        let Some(i) = ear else { break };
        let n = remaining.len();
        indices.extend([
            remaining[(i + n - 1) % n] as u32,
            remaining[i] as u32,
            remaining[(i + 1) % n] as u32,
        ]);
        remaining.remove(i);
    }
    for k in 1..remaining.len().saturating_sub(1) {
        indices.extend([remaining[0] as u32, remaining[k] as u32, remaining[k + 1] as u32]);
    }
    indices
}
