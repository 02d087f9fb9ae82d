//! Marching-squares iso-contours over a row-major scalar grid.
//!
//! Each cell contributes zero, one or two segments whose endpoints lie on
//! cell edges. Segments are stitched into polylines through a hash of their
//! grid-snapped endpoints. Polylines that return to their start are closed
//! loops; polylines ending on the grid border stay open.

use hashbrown::HashMap;

use crate::error::MeshError;

/// Snapping resolution for endpoint keys, in fractions of a cell.
const SNAP: f64 = 1024.0;

/// One stitched iso-line in grid coordinates (`x` along columns, `y` along rows).
#[derive(Clone, Debug, PartialEq)]
pub struct Contour {
    pub points: Vec<[f64; 2]>,
    /// Whether the last point connects back to the first.
    pub closed: bool,
}

impl Contour {
    /// Mean of the points.
    pub fn centroid(&self) -> [f64; 2] {
        let n = self.points.len().max(1) as f64;
        let (sx, sy) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), [x, y]| (sx + x, sy + y));
        [sx / n, sy / n]
    }
}

type Key = (i64, i64);

fn key([x, y]: [f64; 2]) -> Key {
    ((x * SNAP).round() as i64, (y * SNAP).round() as i64)
}

/// Extract every iso-line of `values` at `level`.
///
/// Samples strictly above `level` count as inside. Returns an empty vector
/// when the level never crosses the grid.
pub fn extract_contours(
    width: usize,
    height: usize,
    values: &[f64],
    level: f64,
) -> Result<Vec<Contour>, MeshError> {
    if width < 2 || height < 2 {
        return Err(MeshError::EmptyGrid { width, height });
    }
    if values.len() != width * height {
        return Err(MeshError::InconsistentGrid {
            expected: width * height,
            actual: values.len(),
        });
    }

    let segments = march(width, height, values, level);
    Ok(stitch(&segments))
}

fn march(width: usize, height: usize, values: &[f64], level: f64) -> Vec<[[f64; 2]; 2]> {
    let at = |x: usize, y: usize| values[y * width + x] - level;

    // Crossing on the edge between two samples, always interpolated from
    // the lower-indexed sample so neighbouring cells agree bit for bit.
    let crossing = |(x0, y0): (usize, usize), (x1, y1): (usize, usize)| -> [f64; 2] {
        let (a, b) = (at(x0, y0), at(x1, y1));
        let t = if (b - a).abs() > f64::EPSILON {
            (a / (a - b)).clamp(0.0, 1.0)
        } else {
            0.5
        };
        [
            x0 as f64 + (x1 as f64 - x0 as f64) * t,
            y0 as f64 + (y1 as f64 - y0 as f64) * t,
        ]
    };

    let mut segments = Vec::new();
    for y in 0..height - 1 {
        for x in 0..width - 1 {
            let tl = at(x, y);
            let tr = at(x + 1, y);
            let br = at(x + 1, y + 1);
            let bl = at(x, y + 1);
            let case = (tl > 0.0) as u8 * 8
                + (tr > 0.0) as u8 * 4
                + (br > 0.0) as u8 * 2
                + (bl > 0.0) as u8;
            if case == 0 || case == 15 {
                continue;
            }

            let top = || crossing((x, y), (x + 1, y));
            let right = || crossing((x + 1, y), (x + 1, y + 1));
            let bottom = || crossing((x, y + 1), (x + 1, y + 1));
            let left = || crossing((x, y), (x, y + 1));

            match case {
                1 | 14 => segments.push([left(), bottom()]),
                2 | 13 => segments.push([bottom(), right()]),
                3 | 12 => segments.push([left(), right()]),
                4 | 11 => segments.push([top(), right()]),
                6 | 9 => segments.push([top(), bottom()]),
                7 | 8 => segments.push([left(), top()]),
                5 | 10 => {
                    // Saddle: the cell center decides which corners connect.
                    let center_inside = (tl + tr + br + bl) * 0.25 > 0.0;
                    let tl_inside = case == 10;
                    if center_inside == tl_inside {
                        // tl and br share a region: cut off tr and bl.
                        segments.push([top(), right()]);
                        segments.push([left(), bottom()]);
                    } else {
                        segments.push([left(), top()]);
                        segments.push([bottom(), right()]);
                    }
                }
                _ => unreachable!("cases 0 and 15 are skipped"),
            }
        }
    }
    segments
}

fn stitch(segments: &[[[f64; 2]; 2]]) -> Vec<Contour> {
    let mut by_endpoint: HashMap<Key, Vec<usize>> = HashMap::with_capacity(segments.len() * 2);
    for (i, segment) in segments.iter().enumerate() {
        for &point in segment {
            by_endpoint.entry(key(point)).or_default().push(i);
        }
    }

    let mut used = vec![false; segments.len()];
    let mut contours = Vec::new();

    // Follow unused segments from `point`, appending the far endpoint of each.
    let walk = |mut point: [f64; 2], used: &mut [bool], out: &mut Vec<[f64; 2]>| {
        loop {
            let next = by_endpoint
                .get(&key(point))
                .and_then(|ids| ids.iter().copied().find(|&id| !used[id]));
            let Some(id) = next else { break };
            used[id] = true;
            let [a, b] = segments[id];
            point = if key(a) == key(point) { b } else { a };
            out.push(point);
        }
    };

    for start in 0..segments.len() {
        if used[start] {
            continue;
        }
        used[start] = true;
        let [a, b] = segments[start];

        let mut forward = vec![a, b];
        walk(b, &mut used, &mut forward);

        let closed = forward.len() > 3 && key(forward[0]) == key(forward[forward.len() - 1]);
        let points = if closed {
            forward.pop();
            forward
        } else {
            // An open line may also extend backwards from its first point.
            let mut backward = Vec::new();
            walk(a, &mut used, &mut backward);
            backward.reverse();
            backward.extend(forward);
            backward
        };

        contours.push(Contour { points, closed });
    }

    contours
}
