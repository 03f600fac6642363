//! Thread-safe handle to a [`Simulation`] plus the pause/quit state shared by
//! the update loop, input handling and the auto-runner.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use glam::DVec2;
use log::{debug, error};

use crate::error::Result;
use crate::simulation::Simulation;

/// Cloneable flag that tells background loops to stop.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimulationContext {
    paused: Arc<AtomicBool>,
    cancel: CancelToken,
}

impl SimulationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::Release);
    }

    /// Flips the pause flag and returns the new state.
    pub fn toggle_pause(&self) -> bool {
        !self.paused.fetch_xor(true, Ordering::AcqRel)
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Sleeps for `duration` in short slices. Returns `false` as soon as the
    /// context is cancelled.
    pub fn wait(&self, duration: Duration) -> bool {
        const SLICE: Duration = Duration::from_millis(10);
        let deadline = Instant::now() + duration;
        loop {
            if self.is_cancelled() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            thread::sleep(SLICE.min(deadline - now));
        }
    }
}

/// A simulation behind a read/write lock. Every mutation holds the write
/// lock for its whole duration, so readers never see a half-updated grid.
#[derive(Debug, Clone)]
pub struct SharedSimulation {
    inner: Arc<RwLock<Simulation>>,
}

impl SharedSimulation {
    pub fn new(simulation: Simulation) -> Self {
        Self {
            inner: Arc::new(RwLock::new(simulation)),
        }
    }

    // Mutations either complete or panic before touching the fields, so a
    // poisoned lock still guards consistent data.
    pub fn read(&self) -> RwLockReadGuard<'_, Simulation> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Simulation> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` against one consistent view of the simulation.
    pub fn with_read<R>(&self, f: impl FnOnce(&Simulation) -> R) -> R {
        f(&self.read())
    }

    pub fn snapshot(&self) -> Simulation {
        self.read().clone()
    }

    pub fn dimensions(&self) -> (usize, usize) {
        let sim = self.read();
        (sim.width(), sim.height())
    }

    pub fn update(&self) {
        self.write().update();
    }

    pub fn set(&self, x: isize, y: isize, density: f64, velocity: DVec2) {
        self.write().set(x, y, density, velocity);
    }

    pub fn density_at(&self, x: isize, y: isize) -> f64 {
        self.read().density_at(x, y)
    }

    pub fn resize(&self, width: usize, height: usize) -> Result<()> {
        self.write().resize(width, height)
    }

    pub fn reset(&self) {
        self.write().reset();
    }
}

/// Steps the simulation every `interval` until the context is cancelled.
/// Paused frames are skipped. Returns the number of steps taken.
pub fn run_update_loop(shared: &SharedSimulation, ctx: &SimulationContext, interval: Duration) -> u64 {
    let mut frames = 0;
    while !ctx.is_cancelled() {
        if !ctx.is_paused() {
            shared.update();
            frames += 1;
        }
        if !ctx.wait(interval) {
            break;
        }
    }
    debug!("update loop stopped after {frames} frames");
    frames
}

pub fn spawn_update_loop(
    shared: SharedSimulation,
    ctx: SimulationContext,
    interval: Duration,
) -> JoinHandle<u64> {
    thread::spawn(move || run_update_loop(&shared, &ctx, interval))
}

/// Joins a background thread, logging instead of propagating its panic.
pub fn join_logged<T>(name: &str, handle: JoinHandle<T>) -> Option<T> {
    match handle.join() {
        Ok(value) => Some(value),
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            error!("{name} thread panicked: {message}");
            None
        }
    }
}
