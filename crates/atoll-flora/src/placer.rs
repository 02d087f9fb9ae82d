//! Turns world positions into planted entities.
//!
//! Placement is split in two: [`Placer::plan`] probes the terrain and picks
//! an archetype, and [`Placer::apply`] builds and spawns it. Plans carry the
//! terrain [`Generation`] they were made against; applying a plan made for a
//! terrain that has since been replaced does nothing.

use atoll_terrain::{ElevationGrid, Generation};
use glam::DVec3;
use rand::Rng;
use tracing::{debug, trace};

use crate::archetype::EntityArchetype;
use crate::archetypes::{Planting, build};
use crate::biome::BiomeDef;
use crate::fertility::{FertilityContext, FertilitySampler};
use crate::params::FloraParams;
use crate::render_context::{Quality, RenderContext};
use crate::scene::{EntityHandle, Scene};
use crate::spawn::{SpawnHandle, SpawnScheduler};

/// A decided but not yet applied placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Terrain generation the plan was made against.
    pub generation: Generation,
    pub archetype: EntityArchetype,
    pub planting: Planting,
}

/// Owns the scene and everything needed to plant into it.
pub struct Placer {
    grid: ElevationGrid,
    generation: Generation,
    biome: BiomeDef,
    params: FloraParams,
    scene: Scene,
    render: RenderContext,
    spawns: SpawnScheduler,
}

impl Placer {
    pub fn new(grid: ElevationGrid, generation: Generation, biome: BiomeDef, params: FloraParams) -> Self {
        let render = RenderContext::new(Quality {
            poly_throttle: params.poly_throttle,
        });
        Self {
            grid,
            generation,
            biome,
            params,
            scene: Scene::new(),
            render,
            spawns: SpawnScheduler::new(),
        }
    }

    /// Swap in regenerated terrain. Every entity planted on the old terrain
    /// is removed and outstanding plans become stale.
    pub fn replace_terrain(&mut self, grid: ElevationGrid, generation: Generation) {
        debug!(
            old = self.generation.0,
            new = generation.0,
            removed = self.scene.len(),
            "terrain replaced"
        );
        self.spawns.cancel_all();
        self.scene.clear();
        self.grid = grid;
        self.generation = generation;
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn grid(&self) -> &ElevationGrid {
        &self.grid
    }

    pub fn biome(&self) -> &BiomeDef {
        &self.biome
    }

    pub fn params(&self) -> &FloraParams {
        &self.params
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn render_context(&self) -> &RenderContext {
        &self.render
    }

    pub fn sampler(&self) -> FertilitySampler<'_> {
        FertilitySampler::new(&self.grid, self.params.min_normal_y)
    }

    /// Fertility at `(x, z)` on level-enough ground, or `None`.
    pub fn fertility_at(&self, x: f64, z: f64) -> Option<(f64, FertilityContext)> {
        let sampler = self.sampler();
        let probe = sampler.probe(x, z)?;
        if !sampler.is_placeable(&probe) {
            trace!(x, z, normal_y = probe.normal.y, "ground too steep");
            return None;
        }
        Some((probe.altitude, FertilityContext::from_altitude(x, z, probe.altitude)))
    }

    /// Plan a placement at `(x, z)`, drawing one number from `rng` to pick
    /// the archetype. `None` when there is no usable ground.
    pub fn plan<R: Rng + ?Sized>(&self, x: f64, z: f64, rng: &mut R) -> Option<Placement> {
        let (altitude, fertility) = self.fertility_at(x, z)?;
        let archetype = self.biome.table.select(fertility.food, rng.random::<f64>())?;
        Some(self.planting(x, z, altitude, fertility, archetype))
    }

    /// Plan a specific archetype at `(x, z)`. `None` when there is no usable ground.
    pub fn plan_archetype(&self, x: f64, z: f64, archetype: EntityArchetype) -> Option<Placement> {
        let (altitude, fertility) = self.fertility_at(x, z)?;
        Some(self.planting(x, z, altitude, fertility, archetype))
    }

    fn planting(
        &self,
        x: f64,
        z: f64,
        altitude: f64,
        fertility: FertilityContext,
        archetype: EntityArchetype,
    ) -> Placement {
        let adjust = self.biome.override_for(archetype);
        let mut planting = Planting::new(
            DVec3::new(x, altitude, z),
            fertility,
            self.params.target_scale(fertility.food) * adjust.scale,
        );
        planting.tint = adjust.tint;
        Placement {
            generation: self.generation,
            archetype,
            planting,
        }
    }

    /// Build and spawn a planned entity, scheduling its spawn-in animation.
    ///
    /// Returns `None` if the plan was made for an older terrain.
    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        placement: &Placement,
        rng: &mut R,
    ) -> Option<(EntityHandle, SpawnHandle)> {
        if placement.generation != self.generation {
            debug!(
                stale = placement.generation.0,
                current = self.generation.0,
                "dropping stale placement"
            );
            return None;
        }
        let entity = build(placement.archetype, &mut self.render, &placement.planting);
        let handle = self.scene.spawn(entity);
        let spawn = self.spawns.schedule_staggered(
            handle,
            self.params.max_spawn_delay,
            self.params.spawn_duration,
            rng,
        );
        trace!(archetype = %placement.archetype, "entity planted");
        Some((handle, spawn))
    }

    /// Plan and apply in one step. Requests that find no ground are dropped.
    pub fn place<R: Rng + ?Sized>(&mut self, x: f64, z: f64, rng: &mut R) -> Option<EntityHandle> {
        let placement = self.plan(x, z, rng)?;
        self.apply(&placement, rng).map(|(handle, _)| handle)
    }

    /// Advance spawn animations by `dt` seconds.
    pub fn tick(&mut self, dt: f64) {
        self.spawns.tick(dt, &mut self.scene);
    }

    /// Whether every spawn animation has finished or been cancelled.
    pub fn spawns_idle(&self) -> bool {
        self.spawns.is_idle()
    }
}
