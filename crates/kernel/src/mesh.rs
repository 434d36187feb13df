//! Tessellated shape data handed to rendering.
//!
//! This is the only artifact a renderer receives from the modeling core. Buffers are flat and
//! laid out the way GPU vertex buffers expect them.

use glam::DVec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineType {
    #[default]
    Solid,
    Dashed,
}

/// A contiguous range of a buffer belonging to one sub-shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshGroup {
    pub start: usize,
    pub count: usize,
}

/// Triangulated faces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceMeshData {
    /// Vertex positions as `x, y, z` triplets.
    pub positions: Vec<f32>,
    /// Vertex normals as `x, y, z` triplets.
    pub normals: Vec<f32>,
    /// Texture coordinates as `u, v` pairs.
    pub uvs: Vec<f32>,
    /// Triangle indices into the vertex buffers.
    pub indices: Vec<u32>,
    /// One group per face, as a range of `indices`.
    pub groups: Vec<MeshGroup>,
    pub color: Option<[f32; 3]>,
}

impl FaceMeshData {
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Appends one face. `indices` are relative to the passed vertices.
    ///
    /// # Panics
    ///
    /// Panics if the vertex count does not fit into `u32`.
    pub fn push_face(&mut self, vertices: &[(DVec3, DVec3, [f64; 2])], indices: &[u32]) {
        let offset = u32::try_from(self.vertex_count()).expect("mesh vertex count exceeds u32");
        let start = self.indices.len();
        #[allow(clippy::cast_possible_truncation)]
        for (position, normal, uv) in vertices {
            self.positions
                .extend([position.x as f32, position.y as f32, position.z as f32]);
            self.normals
                .extend([normal.x as f32, normal.y as f32, normal.z as f32]);
            self.uvs.extend([uv[0] as f32, uv[1] as f32]);
        }
        self.indices.extend(indices.iter().map(|i| i + offset));
        self.groups.push(MeshGroup {
            start,
            count: indices.len(),
        });
    }

    #[must_use]
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    #[must_use]
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Edges as a list of line segments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeMeshData {
    /// Segment endpoints as `x, y, z` triplets, two points per segment.
    pub positions: Vec<f32>,
    /// One group per edge, as a range of points.
    pub groups: Vec<MeshGroup>,
    pub line_type: LineType,
    pub line_width: f32,
    pub color: Option<[f32; 3]>,
}

impl EdgeMeshData {
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.positions.len() / 6
    }

    /// Appends one edge given as a polyline.
    pub fn push_polyline(&mut self, points: &[DVec3]) {
        let start = self.positions.len() / 3;
        #[allow(clippy::cast_possible_truncation)]
        for pair in points.windows(2) {
            for p in pair {
                self.positions.extend([p.x as f32, p.y as f32, p.z as f32]);
            }
        }
        self.groups.push(MeshGroup {
            start,
            count: self.positions.len() / 3 - start,
        });
    }

    #[must_use]
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub faces: FaceMeshData,
    pub edges: EdgeMeshData,
}
