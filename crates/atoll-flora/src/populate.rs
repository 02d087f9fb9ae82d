//! Batch population: scatter candidates over the island and plant each one.

use hashbrown::HashMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::archetype::EntityArchetype;
use crate::placer::Placer;

/// Generate well-spaced 2D points within a rectangle.
///
/// Uses Mitchell's best-candidate algorithm: each round draws
/// `max_attempts` candidates and keeps the one farthest from every accepted
/// point, provided it is at least `min_distance` away. Stops once a round
/// finds no acceptable candidate. Accepted points are bucketed in a hash
/// grid so each distance check only visits nearby cells.
pub fn poisson_disk_2d(
    seed: u64,
    region_min: (f64, f64),
    region_max: (f64, f64),
    min_distance: f64,
    max_attempts: u32,
) -> Vec<(f64, f64)> {
    let mut points: Vec<(f64, f64)> = Vec::new();
    if !(min_distance > 0.0) || region_max.0 <= region_min.0 || region_max.1 <= region_min.1 {
        return points;
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let area = (region_max.0 - region_min.0) * (region_max.1 - region_min.1);
    let max_points = (area / (min_distance * min_distance * 0.7)) as usize;

    let cell = min_distance;
    let cell_of = |(x, y): (f64, f64)| {
        (
            ((x - region_min.0) / cell).floor() as i64,
            ((y - region_min.1) / cell).floor() as i64,
        )
    };
    let mut buckets: HashMap<(i64, i64), Vec<usize>> = HashMap::new();

    // Distance to the nearest accepted point, capped at two cells.
    let nearest = |point: (f64, f64), points: &[(f64, f64)], buckets: &HashMap<(i64, i64), Vec<usize>>| {
        let (cx, cy) = cell_of(point);
        let mut best = 2.0 * cell;
        for dy in -2..=2 {
            for dx in -2..=2 {
                let Some(ids) = buckets.get(&(cx + dx, cy + dy)) else {
                    continue;
                };
                for &id in ids {
                    let (px, py) = points[id];
                    best = best.min(((point.0 - px).powi(2) + (point.1 - py).powi(2)).sqrt());
                }
            }
        }
        best
    };

    for _ in 0..max_points {
        let mut best_candidate = None;
        let mut best_distance = 0.0f64;

        for _ in 0..max_attempts {
            let candidate = (
                rng.random_range(region_min.0..region_max.0),
                rng.random_range(region_min.1..region_max.1),
            );
            let distance = nearest(candidate, &points, &buckets);
            if distance >= min_distance && distance > best_distance {
                best_candidate = Some(candidate);
                best_distance = distance;
            }
        }

        let Some(point) = best_candidate else {
            break;
        };
        buckets.entry(cell_of(point)).or_default().push(points.len());
        points.push(point);
    }

    points
}

/// Outcome of [`populate`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PopulationReport {
    /// Candidate positions generated.
    pub candidates: usize,
    /// Entities planted, per archetype.
    pub planted: HashMap<EntityArchetype, usize>,
    /// Candidates without usable ground: off the grid, too steep or underwater.
    pub dropped: usize,
}

impl PopulationReport {
    pub fn total_planted(&self) -> usize {
        self.planted.values().sum()
    }

    pub fn count(&self, archetype: EntityArchetype) -> usize {
        self.planted.get(&archetype).copied().unwrap_or(0)
    }
}

/// Scatter candidates over the placer's terrain and plant each one.
///
/// Candidates on barren ground get a rock; the rest go through the biome's
/// placement table. Deterministic for a given `seed` and terrain.
pub fn populate(placer: &mut Placer, seed: u64) -> PopulationReport {
    let (half_x, half_z) = placer.grid().half_extent();
    let params = placer.params().clone();
    let candidates = poisson_disk_2d(
        seed,
        (-half_x, -half_z),
        (half_x, half_z),
        params.spacing,
        params.candidate_attempts,
    );

    let mut rng = ChaCha8Rng::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15);
    let mut report = PopulationReport {
        candidates: candidates.len(),
        ..Default::default()
    };

    for (x, z) in candidates {
        let underwater = placer
            .grid()
            .height_at(x, z)
            .is_none_or(|h| h < params.min_altitude);
        if underwater {
            report.dropped += 1;
            continue;
        }

        let plan = match placer.fertility_at(x, z) {
            Some((_, fertility)) if fertility.is_barren() => {
                placer.plan_archetype(x, z, EntityArchetype::Rock)
            }
            Some(_) => placer.plan(x, z, &mut rng),
            None => None,
        };
        let Some(plan) = plan else {
            report.dropped += 1;
            continue;
        };
        if placer.apply(&plan, &mut rng).is_some() {
            *report.planted.entry(plan.archetype).or_default() += 1;
        }
    }

    info!(
        candidates = report.candidates,
        planted = report.total_planted(),
        rocks = report.count(EntityArchetype::Rock),
        dropped = report.dropped,
        "island populated"
    );
    report
}
