//! Underwater skirt extruded from closed shorelines.
//!
//! Each closed contour becomes `rings + 1` concentric rings. Ring `i` is
//! pushed radially away from the contour's centroid by
//! `t^exponent * outward_distance` and below the waterline by
//! `t^exponent * depth`, with `t = i / rings`.

use atoll_terrain::ElevationGrid;
use glam::DVec2;

use crate::contour::Contour;
use crate::params::MeshParams;
use crate::surface::SurfaceMesh;

/// Extrude a skirt from every closed contour in `contours`.
///
/// Contour points are grid coordinates of `grid`. Open contours and loops
/// with fewer than three points are skipped. Returns the number of loops
/// extruded. Normals of the new vertices are left for the caller to
/// recompute.
pub fn add_skirt(
    mesh: &mut SurfaceMesh,
    contours: &[Contour],
    grid: &ElevationGrid,
    params: &MeshParams,
) -> usize {
    let skirt = &params.skirt;
    if skirt.rings == 0 {
        return 0;
    }

    let mut extruded = 0;
    for contour in contours.iter().filter(|c| c.closed && c.points.len() >= 3) {
        let points: Vec<DVec2> = contour
            .points
            .iter()
            .map(|&[x, y]| DVec2::from(grid.grid_to_world(x, y)))
            .collect();
        let [cx, cy] = contour.centroid();
        let center = DVec2::from(grid.grid_to_world(cx, cy));
        let radial: Vec<DVec2> = points.iter().map(|&p| (p - center).normalize_or_zero()).collect();

        let mut rings: Vec<Vec<u32>> = Vec::with_capacity(skirt.rings as usize + 1);
        for ring in 0..=skirt.rings {
            let t = (ring as f64 / skirt.rings as f64).powf(skirt.exponent);
            let y = (params.waterline - t * skirt.depth) as f32;
            let indices = points
                .iter()
                .zip(&radial)
                .map(|(p, r)| {
                    let q = *p + *r * (t * skirt.outward_distance);
                    mesh.push_vertex([q.x as f32, y, q.y as f32], params.underwater_color)
                })
                .collect();
            rings.push(indices);
        }

        let n = points.len();
        for pair in rings.windows(2) {
            let (inner, outer) = (&pair[0], &pair[1]);
            for i in 0..n {
                let j = (i + 1) % n;
                push_upward(mesh, inner[i], outer[i], inner[j]);
                push_upward(mesh, inner[j], outer[i], outer[j]);
            }
        }
        extruded += 1;
    }
    extruded
}

/// Push a triangle, flipping its winding if needed so it faces up.
fn push_upward(mesh: &mut SurfaceMesh, a: u32, b: u32, c: u32) {
    mesh.push_triangle(a, b, c);
    let t = mesh.triangle_count() - 1;
    if mesh.face_normal(t).y < 0.0 {
        mesh.indices.swap(t * 3 + 1, t * 3 + 2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contour::extract_contours;

    fn island(size: usize, resolution: f64) -> ElevationGrid {
        let c = (size - 1) as f64 / 2.0;
        let mut values = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                let d = ((x as f64 - c).powi(2) + (y as f64 - c).powi(2)).sqrt();
                values.push(1.0 - d / c);
            }
        }
        ElevationGrid::from_values(size, size, resolution, values).unwrap()
    }

    fn skirted(grid: &ElevationGrid, params: &MeshParams) -> (SurfaceMesh, usize) {
        let contours =
            extract_contours(grid.width(), grid.height(), grid.values(), params.waterline).unwrap();
        let mut mesh = SurfaceMesh::new();
        let loops = add_skirt(&mut mesh, &contours, grid, params);
        (mesh, loops)
    }

    #[test]
    fn test_ring_layout() {
        let grid = island(31, 0.2);
        let params = MeshParams::default();
        let (mesh, loops) = skirted(&grid, &params);
        assert_eq!(loops, 1);

        let rings = params.skirt.rings as usize + 1;
        assert_eq!(mesh.vertex_count() % rings, 0);
        let per_ring = mesh.vertex_count() / rings;
        assert_eq!(mesh.triangle_count(), per_ring * 2 * (rings - 1));

        let top = mesh.positions[0][1];
        let bottom = mesh.positions[mesh.vertex_count() - 1][1];
        assert!((top as f64 - params.waterline).abs() < 1e-6);
        assert!((bottom as f64 - (params.waterline - params.skirt.depth)).abs() < 1e-5);
    }

    #[test]
    fn test_skirt_spreads_away_from_land() {
        let grid = island(31, 0.2);
        let params = MeshParams::default();
        let (mesh, _) = skirted(&grid, &params);

        let per_ring = mesh.vertex_count() / (params.skirt.rings as usize + 1);
        let radius = |p: [f32; 3]| (p[0] * p[0] + p[2] * p[2]).sqrt();
        for i in 0..per_ring {
            let inner = radius(mesh.positions[i]);
            let outer = radius(mesh.positions[mesh.vertex_count() - per_ring + i]);
            let growth = outer - inner;
            assert!(
                (growth - params.skirt.outward_distance as f32).abs() < 0.05,
                "outer ring grew by {growth}"
            );
        }
    }

    #[test]
    fn test_elliptical_skirt_offsets_are_radial() {
        // 41×21 grid with a 12×4 ellipse at resolution 0.2.
        let (width, height, resolution) = (41, 21, 0.2);
        let (cx, cy) = ((width - 1) as f64 / 2.0, (height - 1) as f64 / 2.0);
        let values = (0..width * height)
            .map(|i| {
                let x = ((i % width) as f64 - cx) * resolution;
                let y = ((i / width) as f64 - cy) * resolution;
                1.0 - ((x / 3.0).powi(2) + (y / 1.0).powi(2)).sqrt()
            })
            .collect();
        let grid = ElevationGrid::from_values(width, height, resolution, values).unwrap();
        let mut params = MeshParams::default();
        params.waterline = 0.0;

        let contours = extract_contours(width, height, grid.values(), 0.0).unwrap();
        let shoreline = contours.iter().find(|c| c.closed).unwrap();
        let [gx, gy] = shoreline.centroid();
        let center = DVec2::from(grid.grid_to_world(gx, gy));

        let (mesh, loops) = skirted(&grid, &params);
        assert_eq!(loops, 1);
        let per_ring = mesh.vertex_count() / (params.skirt.rings as usize + 1);
        let outer_start = mesh.vertex_count() - per_ring;
        for i in 0..per_ring {
            let [ix, _, iz] = mesh.positions[i];
            let [ox, _, oz] = mesh.positions[outer_start + i];
            let inner = DVec2::new(ix as f64, iz as f64);
            let offset = DVec2::new(ox as f64, oz as f64) - inner;
            let radial = (inner - center).normalize();

            assert!(
                (offset.length() - params.skirt.outward_distance).abs() < 1e-3,
                "offset {i} has length {}",
                offset.length()
            );
            let angle = offset.normalize().dot(radial).clamp(-1.0, 1.0).acos().to_degrees();
            assert!(angle < 0.1, "offset {i} is {angle} degrees off radial");
        }
    }

    #[test]
    fn test_skirt_faces_point_up() {
        let grid = island(31, 0.2);
        let (mesh, _) = skirted(&grid, &MeshParams::default());
        for t in 0..mesh.triangle_count() {
            assert!(mesh.face_normal(t).y >= 0.0, "skirt triangle {t} faces down");
        }
    }

    #[test]
    fn test_no_shoreline_no_skirt() {
        let grid = ElevationGrid::from_values(5, 5, 1.0, vec![-1.0; 25]).unwrap();
        let (mesh, loops) = skirted(&grid, &MeshParams::default());
        assert_eq!(loops, 0);
        assert_eq!(mesh.vertex_count(), 0);
    }

    #[test]
    fn test_zero_rings_is_noop() {
        let grid = island(21, 0.2);
        let mut params = MeshParams::default();
        params.skirt.rings = 0;
        let (mesh, loops) = skirted(&grid, &params);
        assert_eq!(loops, 0);
        assert_eq!(mesh.vertex_count(), 0);
    }
}
