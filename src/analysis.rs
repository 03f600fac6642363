use std::collections::HashMap;

use log::info;

use crate::export::FluidData;
use crate::field::Field;
use crate::solver::divergence;

#[derive(Debug, Clone)]
pub struct FluidMetrics {
    pub total_mass: f64,
    pub max_density: f64,
    pub avg_density: f64,
    pub total_kinetic_energy: f64,
    pub max_velocity: f64,
    pub avg_velocity: f64,
    pub density_entropy: f64,
    /// L2 norm of the central-difference divergence over the whole grid.
    pub divergence_norm: f64,
    pub frame: usize,
}

impl FluidMetrics {
    pub fn analyze(simulation: &impl FluidData, frame: usize) -> Self {
        let (width, height) = (simulation.width(), simulation.height());
        let size = (width * height).max(1) as f64;

        let mut total_mass = 0.0;
        let mut max_density: f64 = 0.0;
        let mut total_kinetic_energy = 0.0;
        let mut max_velocity: f64 = 0.0;
        let mut velocity_sum = 0.0;
        let mut density_histogram: HashMap<i64, usize> = HashMap::new();

        let density = simulation.density();
        let velocity_x = simulation.velocity_x();
        let velocity_y = simulation.velocity_y();

        for idx in 0..width * height {
            let d = density[idx];
            let speed = velocity_x[idx].hypot(velocity_y[idx]);

            total_mass += d;
            max_density = max_density.max(d);
            total_kinetic_energy += 0.5 * d * speed * speed;
            max_velocity = max_velocity.max(speed);
            velocity_sum += speed;

            // Bucket density in steps of 0.1 for the entropy estimate
            *density_histogram.entry((d * 10.0).floor() as i64).or_insert(0) += 1;
        }

        let mut entropy = 0.0;
        for &count in density_histogram.values() {
            let probability = count as f64 / size;
            if probability > 0.0 {
                entropy -= probability * probability.log2();
            }
        }

        let vx = Field::from_fn(width, height, |x, y| velocity_x[y * width + x]);
        let vy = Field::from_fn(width, height, |x, y| velocity_y[y * width + x]);
        let divergence_norm = divergence(&vx, &vy).l2_norm();

        Self {
            total_mass,
            max_density,
            avg_density: total_mass / size,
            total_kinetic_energy,
            max_velocity,
            avg_velocity: velocity_sum / size,
            density_entropy: entropy,
            divergence_norm,
            frame,
        }
    }

    pub fn log_summary(&self) {
        info!(
            "frame {}: mass {:.6}, max density {:.6}, avg density {:.6}, kinetic energy {:.6}, \
             max velocity {:.6}, avg velocity {:.6}, entropy {:.6}, divergence {:.6}",
            self.frame,
            self.total_mass,
            self.max_density,
            self.avg_density,
            self.total_kinetic_energy,
            self.max_velocity,
            self.avg_velocity,
            self.density_entropy,
            self.divergence_norm,
        );
    }
}

#[derive(Debug, Default)]
pub struct AnalysisRecorder {
    pub metrics_history: Vec<FluidMetrics>,
}

impl AnalysisRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_frame(&mut self, simulation: &impl FluidData, frame: usize) -> &FluidMetrics {
        self.metrics_history.push(FluidMetrics::analyze(simulation, frame));
        &self.metrics_history[self.metrics_history.len() - 1]
    }

    pub fn first(&self) -> Option<&FluidMetrics> {
        self.metrics_history.first()
    }

    pub fn last(&self) -> Option<&FluidMetrics> {
        self.metrics_history.last()
    }

    pub fn log_trends(&self) {
        let (Some(first), Some(last)) = (self.first(), self.last()) else {
            return;
        };
        if self.metrics_history.len() < 2 {
            return;
        }

        let change = |a: f64, b: f64| (b - a) / a.abs().max(0.001) * 100.0;
        info!(
            "mass {:.6} -> {:.6} ({:+.3}%)",
            first.total_mass,
            last.total_mass,
            change(first.total_mass, last.total_mass)
        );
        info!(
            "kinetic energy {:.6} -> {:.6} ({:+.3}%)",
            first.total_kinetic_energy,
            last.total_kinetic_energy,
            change(first.total_kinetic_energy, last.total_kinetic_energy)
        );
        info!(
            "entropy {:.6} -> {:.6} ({:+.3}%)",
            first.density_entropy,
            last.density_entropy,
            change(first.density_entropy, last.density_entropy)
        );
    }
}
