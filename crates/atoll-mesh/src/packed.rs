//! Interleaved vertex buffers for GPU upload.
//!
//! [`TerrainVertex`] packs position, normal and color into one 40-byte
//! record so a [`SurfaceMesh`] can be uploaded as a single vertex buffer.

use crate::surface::SurfaceMesh;

/// One interleaved surface vertex.
///
/// Layout (40 bytes total):
///   - `[0..12]`  position `[f32; 3]`
///   - `[12..24]` normal `[f32; 3]`
///   - `[24..40]` color `[f32; 4]` (RGBA)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

static_assertions::assert_eq_size!(TerrainVertex, [u8; 40]);

/// A surface mesh interleaved for upload.
#[derive(Clone, Debug, Default)]
pub struct PackedSurfaceMesh {
    pub vertices: Vec<TerrainVertex>,
    /// Triangle list, 3 indices per triangle.
    pub indices: Vec<u32>,
}

impl PackedSurfaceMesh {
    /// Interleave the separate buffers of `mesh`.
    pub fn from_mesh(mesh: &SurfaceMesh) -> Self {
        let vertices = mesh
            .positions
            .iter()
            .zip(&mesh.normals)
            .zip(&mesh.colors)
            .map(|((&position, &normal), &color)| TerrainVertex {
                position,
                normal,
                color,
            })
            .collect();
        Self {
            vertices,
            indices: mesh.indices.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Size of the vertex buffer in bytes.
    pub fn vertex_buffer_bytes(&self) -> usize {
        self.vertices.len() * std::mem::size_of::<TerrainVertex>()
    }

    /// Vertex data as bytes (zero-copy).
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index data as bytes (zero-copy).
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
