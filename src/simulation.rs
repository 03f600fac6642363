use glam::DVec2;
use log::{debug, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{FluidError, Result};
use crate::field::{Field, FieldKind};
use crate::solver::{advect, diffuse, non_negative, project};

/// Tunable knobs of the solver. None of these are range-checked; unstable
/// values produce unstable output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// Diffusion strength applied to density and both velocity components.
    pub viscosity: f64,
    /// Fraction of density removed after every step.
    pub decay: f64,
    /// Relaxation sweeps per diffusion and pressure solve.
    pub iterations: usize,
    /// Run the three diffusion solves on the rayon pool.
    pub parallel: bool,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            viscosity: 0.1,
            decay: 0.01,
            iterations: 5,
            parallel: true,
        }
    }
}

impl SimulationParams {
    fn warn_if_degenerate(&self) {
        if self.iterations == 0 {
            warn!("iterations is 0: diffusion and projection will do nothing");
        }
        if self.decay >= 1.0 {
            warn!("decay {} >= 1 removes all density every step", self.decay);
        }
    }
}

/// Density plus a two-component velocity field on a shared grid.
#[derive(Debug, Clone)]
pub struct Simulation {
    width: usize,
    height: usize,
    density: Field,
    velocity_x: Field,
    velocity_y: Field,
    params: SimulationParams,
}

fn check_dimensions(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(FluidError::InvalidDimensions { width, height });
    }
    Ok(())
}

impl Simulation {
    pub fn new(width: usize, height: usize, params: SimulationParams) -> Result<Self> {
        check_dimensions(width, height)?;
        params.warn_if_degenerate();

        Ok(Self {
            width,
            height,
            density: Field::new(width, height),
            velocity_x: Field::new(width, height),
            velocity_y: Field::new(width, height),
            params,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn set_params(&mut self, params: SimulationParams) {
        params.warn_if_degenerate();
        self.params = params;
    }

    pub fn field(&self, kind: FieldKind) -> &Field {
        match kind {
            FieldKind::Density => &self.density,
            FieldKind::VelocityX => &self.velocity_x,
            FieldKind::VelocityY => &self.velocity_y,
        }
    }

    fn field_mut(&mut self, kind: FieldKind) -> &mut Field {
        match kind {
            FieldKind::Density => &mut self.density,
            FieldKind::VelocityX => &mut self.velocity_x,
            FieldKind::VelocityY => &mut self.velocity_y,
        }
    }

    /// Advances the simulation by one step:
    /// diffuse all fields, advect density, project velocity, decay density.
    pub fn update(&mut self) {
        let SimulationParams {
            viscosity,
            decay,
            iterations,
            parallel,
        } = self.params;

        // The three solves only read their own field, so they can run side by side.
        let diffused: Vec<Field> = if parallel {
            FieldKind::ALL
                .as_slice()
                .par_iter()
                .map(|&kind| diffuse(self.field(kind), viscosity, iterations))
                .collect()
        } else {
            FieldKind::ALL
                .iter()
                .map(|&kind| diffuse(self.field(kind), viscosity, iterations))
                .collect()
        };
        for (kind, field) in FieldKind::ALL.into_iter().zip(diffused) {
            *self.field_mut(kind) = field;
        }

        // Velocity is diffused and projected but never carried by its own flow.
        self.density = advect(&self.density, &self.velocity_x, &self.velocity_y);

        project(&mut self.velocity_x, &mut self.velocity_y, iterations);

        let keep = 1.0 - decay;
        for d in self.density.as_mut_slice() {
            *d = non_negative(*d * keep);
        }
    }

    /// Overwrites density and velocity at `(x, y)`. Out-of-range coordinates
    /// are ignored.
    pub fn set(&mut self, x: isize, y: isize, density: f64, velocity: DVec2) {
        if !self.density.set(x, y, density) {
            return;
        }
        self.velocity_x.set(x, y, velocity.x);
        self.velocity_y.set(x, y, velocity.y);
    }

    /// Density at `(x, y)`, `0.0` outside the grid.
    pub fn density_at(&self, x: isize, y: isize) -> f64 {
        self.density.get(x, y)
    }

    pub fn velocity_at(&self, x: isize, y: isize) -> DVec2 {
        DVec2::new(self.velocity_x.get(x, y), self.velocity_y.get(x, y))
    }

    pub fn total_density(&self) -> f64 {
        self.density.sum()
    }

    /// Reallocates every field at the new size, keeping the cells both
    /// grids have in common. On error nothing is changed.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<()> {
        check_dimensions(width, height)?;
        debug!(
            "resizing simulation {}x{} -> {}x{}",
            self.width, self.height, width, height
        );

        let resized: Vec<Field> = FieldKind::ALL
            .iter()
            .map(|&kind| self.field(kind).resized(width, height))
            .collect();
        for (kind, field) in FieldKind::ALL.into_iter().zip(resized) {
            *self.field_mut(kind) = field;
        }
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Zeroes every field without reallocating.
    pub fn reset(&mut self) {
        for kind in FieldKind::ALL {
            self.field_mut(kind).fill(0.0);
        }
    }
}
