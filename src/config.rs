use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FluidError, Result};
use crate::render::Palette;
use crate::simulation::{Simulation, SimulationParams};

/// Everything needed to start a session. Missing keys in a config file take
/// their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub width: usize,
    pub height: usize,
    pub params: SimulationParams,
    pub palette: Palette,
    /// Spawn the autonomous stroke generator.
    pub auto_run: bool,
    pub frame_interval_ms: u64,
    /// Pixels per grid cell in the desktop view and exported images.
    pub cell_size: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 160,
            height: 100,
            params: SimulationParams::default(),
            palette: Palette::default(),
            auto_run: true,
            frame_interval_ms: 33,
            cell_size: 5.0,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(FluidError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn build_simulation(&self) -> Result<Simulation> {
        Simulation::new(self.width, self.height, self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn partial_json_uses_defaults() {
        let config = Config::from_json(r#"{ "width": 40, "params": { "decay": 0.2 } }"#).unwrap();
        assert_eq!(config.width, 40);
        assert_eq!(config.height, Config::default().height);
        assert_eq!(config.params.decay, 0.2);
        assert_eq!(config.params.viscosity, 0.1);
        assert_eq!(config.params.iterations, 5);
        assert!(config.auto_run);
    }

    #[test]
    fn palette_is_read_from_hex() {
        let config = Config::from_json(
            r##"{ "palette": { "foreground": "#00ff00", "background": "#000000" } }"##,
        )
        .unwrap();
        assert_eq!(config.palette.foreground, Rgb([0, 255, 0]));
        assert_eq!(config.palette.background, Rgb([0, 0, 0]));
    }

    #[test]
    fn rejects_zero_dimensions_and_bad_colors() {
        assert!(matches!(
            Config::from_json(r#"{ "height": 0 }"#),
            Err(FluidError::InvalidDimensions { height: 0, .. })
        ));
        assert!(matches!(
            Config::from_json(
                r##"{ "palette": { "foreground": "red", "background": "#000000" } }"##
            ),
            Err(FluidError::Config(_))
        ));
    }

    #[test]
    fn load_reads_file() {
        let path = std::env::temp_dir().join(format!("fluidt-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "width": 12, "height": 8, "auto_run": false }"#).unwrap();
        let config = Config::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(!config.auto_run);
        let sim = config.build_simulation().unwrap();
        assert_eq!((sim.width(), sim.height()), (12, 8));
    }
}
