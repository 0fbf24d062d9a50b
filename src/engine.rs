//! Thread-safe engine handle.
//!
//! One mutex guards the whole [`World`]. Ticks, drains and snapshot reads
//! all take it, so a renderer never observes a half-applied tick and every
//! random draw happens in a single total order. A background thread can
//! drive ticks at a fixed cadence; stopping is cooperative and waits for the
//! tick in flight to finish.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::ConfigError;
use crate::world::{Activity, GroupId, GroupSummary, RenderChange, World};

/// Shared handle to a running simulation.
#[derive(Debug)]
pub struct Engine {
    world: Arc<Mutex<World>>,
    worker: Mutex<Option<Worker>>,
    tick_interval: Duration,
}

/// One generation of the background loop. Each loop watches its own flag,
/// so a restart can never revive a loop that is being stopped.
#[derive(Debug)]
struct Worker {
    running: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Engine {
    /// Build a world from `config` and wrap it in an idle engine.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration is invalid.
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        let world = World::new(config)?;
        Ok(Self::from_world(world, config.tick_interval()))
    }

    /// Wrap an already built world.
    #[must_use]
    pub fn from_world(world: World, tick_interval: Duration) -> Self {
        Self {
            world: Arc::new(Mutex::new(world)),
            worker: Mutex::new(None),
            tick_interval,
        }
    }

    /// Start the background tick loop. No-op if it is already running.
    pub fn start(&self) {
        let mut worker = lock(&self.worker);
        if worker.is_some() {
            return;
        }

        let world = Arc::clone(&self.world);
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let interval = self.tick_interval;
        let handle = thread::spawn(move || {
            let mut ticks: u64 = 0;
            while flag.load(Ordering::Acquire) {
                lock(&world).tick();
                ticks += 1;
                if interval.is_zero() {
                    thread::yield_now();
                } else {
                    thread::sleep(interval);
                }
            }
            debug!(ticks, "tick loop exited");
        });
        *worker = Some(Worker { running, handle });
        info!(interval_ms = interval.as_millis(), "engine started");
    }

    /// Stop the background tick loop and wait for it to exit.
    ///
    /// The tick in progress, if any, completes first. No-op if the loop is
    /// not running.
    pub fn stop(&self) {
        let Some(worker) = lock(&self.worker).take() else {
            return;
        };
        worker.running.store(false, Ordering::Release);
        // A panicking tick has already poisoned the lock; later calls
        // recover the world as it was left.
        let _ = worker.handle.join();
        info!("engine stopped");
    }

    /// Whether the background loop is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        lock(&self.worker).is_some()
    }

    /// Advance one group's turn on the calling thread.
    pub fn tick(&self) -> Option<GroupId> {
        lock(&self.world).tick()
    }

    /// Take every tile change recorded since the previous drain.
    pub fn drain_render_changes(&self) -> Vec<RenderChange> {
        lock(&self.world).drain_render_changes()
    }

    /// Take every activity recorded since the previous drain.
    pub fn drain_activities(&self) -> Vec<Activity> {
        lock(&self.world).drain_activities()
    }

    /// Summaries of every surviving group.
    #[must_use]
    pub fn summaries(&self) -> Vec<GroupSummary> {
        lock(&self.world).summaries()
    }

    /// Run `f` against the world while holding the lock.
    pub fn with_world<R>(&self, f: impl FnOnce(&World) -> R) -> R {
        f(&lock(&self.world))
    }

    /// Run `f` against the world mutably while holding the lock.
    pub fn with_world_mut<R>(&self, f: impl FnOnce(&mut World) -> R) -> R {
        f(&mut lock(&self.world))
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.stop();
    }
}
