//! Straight-line source injection, used both for pointer drags and for the
//! autonomous stroke generator.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use glam::DVec2;
use log::trace;
use rand::Rng;

use crate::shared::{SharedSimulation, SimulationContext};
use crate::simulation::Simulation;

/// Density written at every point of a stroke.
pub const STROKE_DENSITY: f64 = 15.0;
/// Velocity magnitude along the stroke direction.
pub const STROKE_SPEED: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stamp {
    pub x: isize,
    pub y: isize,
    pub density: f64,
    pub velocity: DVec2,
}

/// A segment in grid coordinates, rasterized at unit spacing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    from: DVec2,
    direction: DVec2,
    length: f64,
}

impl Stroke {
    /// `None` when the endpoints are closer than one cell.
    pub fn new(from: DVec2, to: DVec2) -> Option<Self> {
        let delta = to - from;
        let length = delta.length();
        if length < 1.0 {
            return None;
        }
        Some(Self {
            from,
            direction: delta / length,
            length,
        })
    }

    pub fn direction(&self) -> DVec2 {
        self.direction
    }

    pub fn len(&self) -> usize {
        self.length as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One stamp per whole unit of length, starting at `from`; the end point
    /// itself is not stamped.
    pub fn stamps(&self) -> impl Iterator<Item = Stamp> + '_ {
        let velocity = self.direction * STROKE_SPEED;
        (0..self.len()).map(move |i| {
            let p = self.from + self.direction * i as f64;
            Stamp {
                x: p.x as isize,
                y: p.y as isize,
                density: STROKE_DENSITY,
                velocity,
            }
        })
    }

    pub fn apply(&self, sim: &mut Simulation) {
        for stamp in self.stamps() {
            sim.set(stamp.x, stamp.y, stamp.density, stamp.velocity);
        }
    }
}

/// Draws random strokes across the grid, one point at a time, the way a hand
/// dragging across the window would.
pub struct AutoRunner<R: Rng> {
    shared: SharedSimulation,
    ctx: SimulationContext,
    rng: R,
}

impl<R: Rng> AutoRunner<R> {
    pub fn new(shared: SharedSimulation, ctx: SimulationContext, rng: R) -> Self {
        Self { shared, ctx, rng }
    }

    pub fn random_stroke(&mut self, width: usize, height: usize) -> Option<Stroke> {
        let (w, h) = (width as f64, height as f64);
        let from = DVec2::new(self.rng.gen_range(0.0..w), self.rng.gen_range(0.0..h));
        let to = DVec2::new(self.rng.gen_range(0.0..w), self.rng.gen_range(0.0..h));
        Stroke::new(from, to)
    }

    /// Applies one random stroke in a single write and returns how many
    /// points it stamped.
    pub fn apply_random_stroke(&mut self) -> usize {
        let (width, height) = self.shared.dimensions();
        match self.random_stroke(width, height) {
            Some(stroke) => {
                stroke.apply(&mut self.shared.write());
                stroke.len()
            }
            None => 0,
        }
    }

    /// Draws strokes until the context is cancelled. Points within a stroke
    /// are spaced by a delay starting at 2-4 ms that grows 100 µs per point;
    /// strokes are 1-4 s apart. Nothing is drawn while paused.
    pub fn run(&mut self) {
        while !self.ctx.is_cancelled() {
            if !self.ctx.is_paused() {
                let (width, height) = self.shared.dimensions();
                if let Some(stroke) = self.random_stroke(width, height) {
                    trace!("auto stroke of {} points", stroke.len());
                    let mut delay = Duration::from_micros(self.rng.gen_range(2000..4000));
                    for stamp in stroke.stamps() {
                        self.shared.set(stamp.x, stamp.y, stamp.density, stamp.velocity);
                        if !self.ctx.wait(delay) {
                            return;
                        }
                        delay += Duration::from_micros(100);
                    }
                }
            }
            let pause = Duration::from_millis(self.rng.gen_range(1000..4000));
            if !self.ctx.wait(pause) {
                return;
            }
        }
    }
}

impl<R: Rng + Send + 'static> AutoRunner<R> {
    pub fn spawn(mut self) -> JoinHandle<()> {
        thread::spawn(move || self.run())
    }
}
