//! Background island generation.
//!
//! A single worker thread runs [`TerrainGenerator`] off the caller's thread
//! and delivers each island as a one-shot message. Every submission is
//! stamped with a monotonically increasing [`Generation`]; once a newer
//! request is submitted, results for older generations are discarded so
//! stale terrain is never activated.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError, bounded};
use tracing::{debug, warn};

use crate::error::TerrainError;
use crate::generator::{GeneratedTerrain, TerrainGenerator};
use crate::params::TerrainParameters;

/// Identifies one island generation. Later submissions compare greater.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(pub u64);

/// A request to build one island.
#[derive(Clone, Debug)]
pub struct TerrainRequest {
    /// Parameters for the island.
    pub params: TerrainParameters,
    /// Seed for the linear-congruential source.
    pub seed: u32,
}

/// A finished (or failed) generation delivered by the worker.
#[derive(Debug)]
pub struct GenerationResult {
    /// Generation the request was stamped with at submission.
    pub generation: Generation,
    /// The island, or the validation error that prevented it.
    pub terrain: Result<GeneratedTerrain, TerrainError>,
    /// Wall-clock generation time in microseconds.
    pub generation_time_us: u64,
}

/// Failure modes of the background generator itself.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The worker thread exited and can no longer deliver results.
    #[error("terrain worker disconnected")]
    Disconnected,
}

struct StampedRequest {
    generation: Generation,
    request: TerrainRequest,
}

/// Runs island generation on a dedicated worker thread.
pub struct AsyncTerrainGenerator {
    request_sender: Sender<StampedRequest>,
    result_receiver: Receiver<GenerationResult>,
    latest: Arc<AtomicU64>,
    next: AtomicU64,
}

impl AsyncTerrainGenerator {
    /// Spawn the worker with room for `queue_capacity` pending requests.
    pub fn new(queue_capacity: usize) -> Self {
        let capacity = queue_capacity.max(1);
        let (request_sender, request_receiver) = bounded::<StampedRequest>(capacity);
        let (result_sender, result_receiver) = bounded::<GenerationResult>(capacity);
        let latest = Arc::new(AtomicU64::new(0));
        let worker_latest = Arc::clone(&latest);

        std::thread::Builder::new()
            .name("terrain-gen-worker".into())
            .spawn(move || {
                while let Ok(stamped) = request_receiver.recv() {
                    // Skip requests superseded while they sat in the queue.
                    if stamped.generation.0 < worker_latest.load(Ordering::Acquire) {
                        debug!(generation = stamped.generation.0, "skipping superseded request");
                        continue;
                    }

                    let start = Instant::now();
                    let terrain = TerrainGenerator::new(stamped.request.params)
                        .and_then(|generator| generator.generate(stamped.request.seed));
                    let elapsed = start.elapsed().as_micros() as u64;

                    if result_sender
                        .send(GenerationResult {
                            generation: stamped.generation,
                            terrain,
                            generation_time_us: elapsed,
                        })
                        .is_err()
                    {
                        break;
                    }
                }
            })
            .expect("Failed to spawn terrain generation worker thread");

        Self {
            request_sender,
            result_receiver,
            latest,
            next: AtomicU64::new(0),
        }
    }

    /// Queue a request and return the generation it was stamped with.
    ///
    /// Stamps are unique even across threads submitting concurrently.
    /// Returns `Err(request)` if the queue is full; a rejected request does
    /// not advance [`latest_generation`](Self::latest_generation).
    #[allow(clippy::result_large_err)]
    pub fn submit(&self, request: TerrainRequest) -> Result<Generation, TerrainRequest> {
        let generation = Generation(self.next.fetch_add(1, Ordering::AcqRel) + 1);
        let stamped = StampedRequest {
            generation,
            request,
        };
        match self.request_sender.try_send(stamped) {
            Ok(()) => {
                self.latest.fetch_max(generation.0, Ordering::AcqRel);
                Ok(generation)
            }
            Err(TrySendError::Full(stamped) | TrySendError::Disconnected(stamped)) => {
                warn!("terrain request rejected");
                Err(stamped.request)
            }
        }
    }

    /// The most recently submitted generation, or `Generation(0)` before the
    /// first submission.
    pub fn latest_generation(&self) -> Generation {
        Generation(self.latest.load(Ordering::Acquire))
    }

    /// Whether results stamped with `generation` may still be applied.
    pub fn is_current(&self, generation: Generation) -> bool {
        generation == self.latest_generation()
    }

    /// Drain delivered results, keeping only the current generation.
    pub fn drain_results(&self) -> Vec<GenerationResult> {
        let mut results = Vec::new();
        while let Ok(result) = self.result_receiver.try_recv() {
            if self.is_current(result.generation) {
                results.push(result);
            } else {
                debug!(generation = result.generation.0, "discarding stale terrain");
            }
        }
        results
    }

    /// Block up to `timeout` for the result of the current generation.
    ///
    /// Returns `Ok(None)` on timeout. Stale results received while waiting
    /// are dropped.
    pub fn recv_latest(
        &self,
        timeout: Duration,
    ) -> Result<Option<GenerationResult>, GenerationError> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.result_receiver.recv_timeout(remaining) {
                Ok(result) if self.is_current(result.generation) => return Ok(Some(result)),
                Ok(result) => {
                    debug!(generation = result.generation.0, "discarding stale terrain");
                }
                Err(RecvTimeoutError::Timeout) => return Ok(None),
                Err(RecvTimeoutError::Disconnected) => return Err(GenerationError::Disconnected),
            }
        }
    }
}

impl Default for AsyncTerrainGenerator {
    fn default() -> Self {
        Self::new(4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_request(seed: u32) -> TerrainRequest {
        TerrainRequest {
            params: TerrainParameters {
                width: 6.0,
                height: 6.0,
                resolution: 0.2,
                ..Default::default()
            },
            seed,
        }
    }

    #[test]
    fn test_generations_increase_monotonically() {
        let generator = AsyncTerrainGenerator::new(8);
        assert_eq!(generator.latest_generation(), Generation(0));

        let a = generator.submit(small_request(1)).unwrap();
        let b = generator.submit(small_request(2)).unwrap();
        assert!(b > a, "{b:?} should follow {a:?}");
        assert_eq!(generator.latest_generation(), b);
        assert!(generator.is_current(b));
        assert!(!generator.is_current(a));
    }

    #[test]
    fn test_concurrent_submissions_get_unique_generations() {
        let generator = AsyncTerrainGenerator::new(256);
        let mut stamps: Vec<Generation> = std::thread::scope(|scope| {
            let workers: Vec<_> = (0..4)
                .map(|t| {
                    let generator = &generator;
                    scope.spawn(move || {
                        (0..50)
                            .map(|i| {
                                let mut request = small_request(t * 50 + i);
                                request.params.resolution = -1.0;
                                generator.submit(request).unwrap()
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            workers.into_iter().flat_map(|w| w.join().unwrap()).collect()
        });

        stamps.sort();
        stamps.dedup();
        assert_eq!(stamps.len(), 200, "duplicate generation stamps");
        assert_eq!(generator.latest_generation(), Generation(200));
    }

    #[test]
    fn test_rejected_request_keeps_latest_generation() {
        let generator = AsyncTerrainGenerator::new(1);
        let mut accepted = Generation(0);
        let mut rejected = false;
        for seed in 0..64 {
            // Large enough that the worker is still busy while the loop runs.
            let mut request = small_request(seed);
            request.params.resolution = 0.05;
            match generator.submit(request) {
                Ok(generation) => accepted = generation,
                Err(_) => {
                    rejected = true;
                    break;
                }
            }
        }
        assert!(rejected, "a one-slot queue should fill up");
        assert_eq!(generator.latest_generation(), accepted);
    }

    #[test]
    fn test_result_arrives_for_current_generation() {
        let generator = AsyncTerrainGenerator::new(4);
        let generation = generator.submit(small_request(1337)).unwrap();

        let result = generator
            .recv_latest(Duration::from_secs(30))
            .unwrap()
            .expect("terrain should arrive before the timeout");
        assert_eq!(result.generation, generation);

        let terrain = result.terrain.unwrap();
        assert_eq!(terrain.seed, 1337);
        assert_eq!(terrain.grid.width(), 31);
    }

    #[test]
    fn test_async_matches_synchronous_generation() {
        let request = small_request(7);
        let expected = TerrainGenerator::new(request.params.clone())
            .unwrap()
            .generate(request.seed)
            .unwrap();

        let generator = AsyncTerrainGenerator::new(4);
        generator.submit(request).unwrap();
        let result = generator
            .recv_latest(Duration::from_secs(30))
            .unwrap()
            .expect("terrain should arrive before the timeout");
        assert_eq!(result.terrain.unwrap().grid, expected.grid);
    }

    #[test]
    fn test_stale_results_are_discarded() {
        let generator = AsyncTerrainGenerator::new(8);
        generator.submit(small_request(1)).unwrap();
        generator.submit(small_request(2)).unwrap();
        let latest = generator.submit(small_request(3)).unwrap();

        let result = generator
            .recv_latest(Duration::from_secs(30))
            .unwrap()
            .expect("latest terrain should arrive");
        assert_eq!(result.generation, latest);
        assert!(
            generator.drain_results().is_empty(),
            "nothing older than the latest generation may remain"
        );
    }

    #[test]
    fn test_invalid_params_are_reported_not_generated() {
        let generator = AsyncTerrainGenerator::new(2);
        let mut request = small_request(1);
        request.params.resolution = -1.0;
        generator.submit(request).unwrap();

        let result = generator
            .recv_latest(Duration::from_secs(30))
            .unwrap()
            .expect("validation failure should still be delivered");
        assert!(matches!(
            result.terrain,
            Err(TerrainError::InvalidResolution(_))
        ));
    }
}
