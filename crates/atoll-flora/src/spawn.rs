//! Spawn-in animations.
//!
//! Newly placed entities start at zero scale and grow to their target once
//! their (staggered) delay has passed. The scheduler is ticked cooperatively
//! by the caller; every scheduled animation returns a [`SpawnHandle`] that
//! can cancel it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use atoll_terrain::math::smoothstep;
use rand::Rng;

use crate::scene::{EntityHandle, Scene};

/// Cancels or observes one scheduled spawn animation.
#[derive(Clone, Debug)]
pub struct SpawnHandle {
    entity: EntityHandle,
    cancelled: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
}

impl SpawnHandle {
    pub fn entity(&self) -> EntityHandle {
        self.entity
    }

    /// Stop the animation. The entity keeps whatever scale it had reached.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Whether the entity reached its target scale.
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Relaxed)
    }
}

struct SpawnTask {
    handle: SpawnHandle,
    delay: f64,
    duration: f64,
    elapsed: f64,
}

/// Cooperative scheduler driving spawn animations.
#[derive(Default)]
pub struct SpawnScheduler {
    tasks: Vec<SpawnTask>,
}

impl SpawnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grow `entity` from zero to its target scale over `duration` seconds,
    /// starting after `delay` seconds.
    pub fn schedule(&mut self, entity: EntityHandle, delay: f64, duration: f64) -> SpawnHandle {
        let handle = SpawnHandle {
            entity,
            cancelled: Arc::new(AtomicBool::new(false)),
            finished: Arc::new(AtomicBool::new(false)),
        };
        self.tasks.push(SpawnTask {
            handle: handle.clone(),
            delay: delay.max(0.0),
            duration: duration.max(0.0),
            elapsed: 0.0,
        });
        handle
    }

    /// Schedule with a random delay in `[0, max_delay)`, so a batch finishes
    /// within `max_delay + duration`.
    pub fn schedule_staggered<R: Rng + ?Sized>(
        &mut self,
        entity: EntityHandle,
        max_delay: f64,
        duration: f64,
        rng: &mut R,
    ) -> SpawnHandle {
        let delay = if max_delay > 0.0 {
            rng.random_range(0.0..max_delay)
        } else {
            0.0
        };
        self.schedule(entity, delay, duration)
    }

    /// Advance every animation by `dt` seconds and write the new scales into
    /// `scene`. Finished, cancelled and orphaned animations are dropped.
    pub fn tick(&mut self, dt: f64, scene: &mut Scene) {
        self.tasks.retain_mut(|task| {
            if task.handle.is_cancelled() {
                return false;
            }
            let Some(entity) = scene.get_mut(task.handle.entity) else {
                return false;
            };

            task.elapsed += dt;
            let progress = if task.duration > 0.0 {
                (task.elapsed - task.delay) / task.duration
            } else if task.elapsed >= task.delay {
                1.0
            } else {
                0.0
            };

            if progress >= 1.0 {
                entity.transform.scale = entity.target_scale;
                task.handle.finished.store(true, Ordering::Relaxed);
                return false;
            }
            entity.transform.scale = entity.target_scale * smoothstep(0.0, 1.0, progress);
            true
        });
    }

    /// Number of animations still running or waiting.
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Cancel every animation.
    pub fn cancel_all(&mut self) {
        for task in self.tasks.drain(..) {
            task.handle.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::EntityArchetype;
    use crate::scene::Entity;
    use glam::DVec3;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn scene_with(count: usize) -> (Scene, Vec<EntityHandle>) {
        let mut scene = Scene::new();
        let handles = (0..count)
            .map(|i| {
                scene.spawn(Entity::new(
                    EntityArchetype::Bush,
                    DVec3::new(i as f64, 0.0, 0.0),
                    4.0,
                ))
            })
            .collect();
        (scene, handles)
    }

    #[test]
    fn test_grows_to_target_after_delay() {
        let (mut scene, handles) = scene_with(1);
        let mut scheduler = SpawnScheduler::new();
        let spawn = scheduler.schedule(handles[0], 0.5, 1.0);

        scheduler.tick(0.4, &mut scene);
        assert_eq!(scene.get(handles[0]).unwrap().transform.scale, 0.0);

        scheduler.tick(0.6, &mut scene);
        let mid = scene.get(handles[0]).unwrap().transform.scale;
        assert!(mid > 0.0 && mid < 4.0, "mid-animation scale {mid}");
        assert!(!spawn.is_finished());

        scheduler.tick(1.0, &mut scene);
        assert_eq!(scene.get(handles[0]).unwrap().transform.scale, 4.0);
        assert!(spawn.is_finished());
        assert!(scheduler.is_idle());
    }

    #[test]
    fn test_cancel_freezes_scale() {
        let (mut scene, handles) = scene_with(1);
        let mut scheduler = SpawnScheduler::new();
        let spawn = scheduler.schedule(handles[0], 0.0, 2.0);
        scheduler.tick(1.0, &mut scene);
        let frozen = scene.get(handles[0]).unwrap().transform.scale;

        spawn.cancel();
        scheduler.tick(5.0, &mut scene);
        assert_eq!(scene.get(handles[0]).unwrap().transform.scale, frozen);
        assert!(!spawn.is_finished());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_staggered_batch_completes_within_bound() {
        let (mut scene, handles) = scene_with(50);
        let mut scheduler = SpawnScheduler::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let spawns: Vec<_> = handles
            .iter()
            .map(|&h| scheduler.schedule_staggered(h, 2.0, 0.5, &mut rng))
            .collect();

        let mut elapsed = 0.0;
        while elapsed < 2.5 + 1e-9 {
            scheduler.tick(0.05, &mut scene);
            elapsed += 0.05;
        }
        scheduler.tick(0.05, &mut scene);
        assert!(scheduler.is_idle());
        assert!(spawns.iter().all(SpawnHandle::is_finished));
        assert!(scene.iter().all(|(_, e)| e.transform.scale == e.target_scale));
    }

    #[test]
    fn test_removed_entity_drops_animation() {
        let (mut scene, handles) = scene_with(1);
        let mut scheduler = SpawnScheduler::new();
        scheduler.schedule(handles[0], 0.0, 1.0);
        scene.remove(handles[0]);
        scheduler.tick(0.1, &mut scene);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn test_zero_duration_snaps_after_delay() {
        let (mut scene, handles) = scene_with(1);
        let mut scheduler = SpawnScheduler::new();
        scheduler.schedule(handles[0], 0.2, 0.0);
        scheduler.tick(0.1, &mut scene);
        assert_eq!(scene.get(handles[0]).unwrap().transform.scale, 0.0);
        scheduler.tick(0.1, &mut scene);
        assert_eq!(scene.get(handles[0]).unwrap().transform.scale, 4.0);
    }
}
