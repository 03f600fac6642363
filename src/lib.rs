//! Stable-fluids density simulation on a 2-D grid, with an interactive
//! front-end, an autonomous stroke generator and PNG export.

pub mod analysis;
pub mod config;
pub mod desktop;
pub mod error;
pub mod export;
pub mod field;
pub mod render;
pub mod shared;
pub mod simulation;
pub mod solver;
pub mod strokes;

pub use analysis::{AnalysisRecorder, FluidMetrics};
pub use config::Config;
pub use desktop::FluidApp;
pub use error::{FluidError, Result};
pub use export::{FluidData, ImageExporter};
pub use field::{Field, FieldKind};
pub use render::{Palette, Renderer};
pub use shared::{CancelToken, SharedSimulation, SimulationContext};
pub use simulation::{Simulation, SimulationParams};
pub use strokes::{AutoRunner, Stroke};
