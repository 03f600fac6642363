use std::path::Path;

use log::debug;

use crate::error::Result;
use crate::field::FieldKind;
use crate::render::{Palette, Renderer};
use crate::simulation::Simulation;

/// Read-only view of the fields, shared by rendering and analysis.
pub trait FluidData {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn density(&self) -> &[f64];
    fn velocity_x(&self) -> &[f64];
    fn velocity_y(&self) -> &[f64];
}

impl FluidData for Simulation {
    fn width(&self) -> usize { Simulation::width(self) }
    fn height(&self) -> usize { Simulation::height(self) }
    fn density(&self) -> &[f64] { self.field(FieldKind::Density).as_slice() }
    fn velocity_x(&self) -> &[f64] { self.field(FieldKind::VelocityX).as_slice() }
    fn velocity_y(&self) -> &[f64] { self.field(FieldKind::VelocityY).as_slice() }
}

pub trait Step {
    fn step(&mut self);
}

impl Step for Simulation {
    fn step(&mut self) {
        self.update();
    }
}

pub struct ImageExporter {
    renderer: Renderer,
}

impl ImageExporter {
    pub fn new(palette: Palette, scale: u32) -> Self {
        Self {
            renderer: Renderer::new(palette, scale),
        }
    }

    pub fn export_density_png(&self, simulation: &impl FluidData, path: &Path) -> Result<()> {
        let img = self.renderer.render_to_image(simulation);
        img.save(path)?;
        debug!("wrote {}", path.display());
        Ok(())
    }

    /// Steps `steps` times, writing `<prefix>_frame_NNNN.png` after each step.
    pub fn export_frame_sequence(
        &self,
        simulation: &mut (impl FluidData + Step),
        steps: usize,
        output_dir: &Path,
        prefix: &str,
    ) -> Result<()> {
        std::fs::create_dir_all(output_dir)?;
        for i in 0..steps {
            simulation.step();

            let filename = format!("{}_frame_{:04}.png", prefix, i);
            self.export_density_png(simulation, &output_dir.join(filename))?;
        }
        Ok(())
    }
}
