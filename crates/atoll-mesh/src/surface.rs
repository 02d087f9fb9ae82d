//! Triangulated island surface with height-banded vertex colors.

use atoll_terrain::ElevationGrid;
use glam::Vec3;
use tracing::debug;

use crate::contour::extract_contours;
use crate::error::MeshError;
use crate::params::MeshParams;
use crate::skirt::add_skirt;

/// Flat vertex, color, normal and index buffers ready for upload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SurfaceMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    /// Per-vertex RGBA.
    pub colors: Vec<[f32; 4]>,
    /// Triangle list, three indices per triangle, counter-clockwise seen from above.
    pub indices: Vec<u32>,
}

impl SurfaceMesh {
    /// An empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Append a vertex and return its index. Its normal is filled in by
    /// [`recompute_normals`](Self::recompute_normals).
    pub fn push_vertex(&mut self, position: [f32; 3], color: [f32; 4]) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position);
        self.colors.push(color);
        self.normals.push([0.0, 1.0, 0.0]);
        index
    }

    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Geometric normal of triangle `t`, unnormalized.
    pub fn face_normal(&self, t: usize) -> Vec3 {
        let [a, b, c] = [
            self.indices[t * 3],
            self.indices[t * 3 + 1],
            self.indices[t * 3 + 2],
        ]
        .map(|i| Vec3::from(self.positions[i as usize]));
        (b - a).cross(c - a)
    }

    /// Smooth normals: each vertex gets the area-weighted average of the
    /// faces around it. Vertices with no usable faces point straight up.
    pub fn recompute_normals(&mut self) {
        let mut accumulated = vec![Vec3::ZERO; self.positions.len()];
        for t in 0..self.triangle_count() {
            let normal = self.face_normal(t);
            for &i in &self.indices[t * 3..t * 3 + 3] {
                accumulated[i as usize] += normal;
            }
        }
        self.normals = accumulated
            .into_iter()
            .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
            .collect();
    }
}

/// Builds a [`SurfaceMesh`] from an elevation grid.
pub struct SurfaceMeshBuilder<'a> {
    params: &'a MeshParams,
}

impl<'a> SurfaceMeshBuilder<'a> {
    pub fn new(params: &'a MeshParams) -> Self {
        Self { params }
    }

    /// Triangulate `grid`, centered at the origin, and extrude the
    /// underwater skirt when enabled.
    pub fn build(&self, grid: &ElevationGrid) -> Result<SurfaceMesh, MeshError> {
        let (size_x, size_z) = grid.extent();
        let mut mesh =
            self.build_surface(grid.width(), grid.height(), size_x, size_z, grid.values())?;

        if self.params.skirt.enabled {
            let contours = extract_contours(
                grid.width(),
                grid.height(),
                grid.values(),
                self.params.waterline,
            )?;
            let loops = add_skirt(&mut mesh, &contours, grid, self.params);
            debug!(contours = contours.len(), loops, "underwater skirt extruded");
            mesh.recompute_normals();
        }

        debug!(
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            "surface mesh built"
        );
        Ok(mesh)
    }

    /// Triangulate a raw `width × height` row-major height buffer spanning
    /// `size_x × size_z` world units.
    pub fn build_surface(
        &self,
        width: usize,
        height: usize,
        size_x: f64,
        size_z: f64,
        heights: &[f64],
    ) -> Result<SurfaceMesh, MeshError> {
        if width < 2 || height < 2 {
            return Err(MeshError::EmptyGrid { width, height });
        }
        let expected = width * height;
        if heights.len() != expected {
            return Err(MeshError::InconsistentGrid {
                expected,
                actual: heights.len(),
            });
        }

        let mut mesh = SurfaceMesh {
            positions: Vec::with_capacity(expected),
            normals: Vec::with_capacity(expected),
            colors: Vec::with_capacity(expected),
            indices: Vec::with_capacity((width - 1) * (height - 1) * 6),
        };

        for y in 0..height {
            for x in 0..width {
                let h = heights[y * width + x];
                let px = x as f64 / (width - 1) as f64 * size_x - size_x / 2.0;
                let pz = y as f64 / (height - 1) as f64 * size_z - size_z / 2.0;
                mesh.push_vertex([px as f32, h as f32, pz as f32], self.params.band_color(h));
            }
        }

        let at = |x: usize, y: usize| heights[y * width + x];
        for y in 0..height - 1 {
            for x in 0..width - 1 {
                let tl = (y * width + x) as u32;
                let tr = tl + 1;
                let bl = tl + width as u32;
                let br = bl + 1;

                // Split along the diagonal whose endpoints differ least; ties go to tl-br.
                let main = (at(x, y) - at(x + 1, y + 1)).abs();
                let anti = (at(x + 1, y) - at(x, y + 1)).abs();
                if main <= anti {
                    mesh.push_triangle(tl, bl, br);
                    mesh.push_triangle(tl, br, tr);
                } else {
                    mesh.push_triangle(tl, bl, tr);
                    mesh.push_triangle(tr, bl, br);
                }
            }
        }

        mesh.recompute_normals();
        Ok(mesh)
    }
}
