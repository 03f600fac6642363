use image::{ImageBuffer, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::error::{FluidError, Result};
use crate::export::FluidData;

/// Two colors that density is blended between: background at zero density,
/// foreground at density one and above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PaletteSpec", into = "PaletteSpec")]
pub struct Palette {
    pub foreground: Rgb<u8>,
    pub background: Rgb<u8>,
}

#[derive(Serialize, Deserialize)]
struct PaletteSpec {
    foreground: String,
    background: String,
}

impl TryFrom<PaletteSpec> for Palette {
    type Error = FluidError;

    fn try_from(spec: PaletteSpec) -> Result<Self> {
        Palette::from_hex(&spec.foreground, &spec.background)
    }
}

impl From<Palette> for PaletteSpec {
    fn from(palette: Palette) -> Self {
        Self {
            foreground: to_hex(palette.foreground),
            background: to_hex(palette.background),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            foreground: Rgb([0xff, 0x00, 0x00]),
            background: Rgb([0x00, 0xee, 0xff]),
        }
    }
}

impl Palette {
    pub fn from_hex(foreground: &str, background: &str) -> Result<Self> {
        Ok(Self {
            foreground: parse_hex(foreground)?,
            background: parse_hex(background)?,
        })
    }

    /// Color for a density value. Values are clamped to `[0, 1]` before
    /// blending, so anything denser than one shows the full foreground.
    pub fn blend(&self, density: f64) -> Rgb<u8> {
        let ratio = if density.is_nan() { 0.0 } else { density.clamp(0.0, 1.0) };
        let Rgb(bg) = self.background;
        let Rgb(fg) = self.foreground;
        let channel = |i: usize| {
            let (a, b) = (bg[i] as f64, fg[i] as f64);
            (a + (b - a) * ratio) as u8
        };
        Rgb([channel(0), channel(1), channel(2)])
    }
}

/// Parses `#rrggbb` (the leading `#` is optional).
pub fn parse_hex(color: &str) -> Result<Rgb<u8>> {
    let invalid = || FluidError::InvalidColor(color.to_string());
    let hex = color.strip_prefix('#').unwrap_or(color);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    Ok(Rgb([channel(0)?, channel(2)?, channel(4)?]))
}

pub fn to_hex(color: Rgb<u8>) -> String {
    let Rgb([r, g, b]) = color;
    format!("#{r:02x}{g:02x}{b:02x}")
}

pub struct Renderer {
    palette: Palette,
    scale: u32,
}

impl Renderer {
    /// `scale` is the edge length in pixels of one grid cell.
    pub fn new(palette: Palette, scale: u32) -> Self {
        Self {
            palette,
            scale: scale.max(1),
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn render_to_image(&self, simulation: &impl FluidData) -> RgbImage {
        let width = simulation.width() as u32 * self.scale;
        let height = simulation.height() as u32 * self.scale;
        let density = simulation.density();
        let stride = simulation.width();

        ImageBuffer::from_fn(width, height, |x, y| {
            let sim_x = (x / self.scale) as usize;
            let sim_y = (y / self.scale) as usize;
            self.palette.blend(density[sim_y * stride + sim_x])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_hex("#ff0000").unwrap(), Rgb([255, 0, 0]));
        assert_eq!(parse_hex("00eeff").unwrap(), Rgb([0, 0xee, 0xff]));
        assert!(parse_hex("#ff00").is_err());
        assert!(parse_hex("#gg0000").is_err());
        assert_eq!(to_hex(Rgb([1, 2, 255])), "#0102ff");
    }

    #[test]
    fn blend_clamps_density() {
        let palette = Palette::from_hex("#ffffff", "#000000").unwrap();
        assert_eq!(palette.blend(0.0), Rgb([0, 0, 0]));
        assert_eq!(palette.blend(-3.0), Rgb([0, 0, 0]));
        assert_eq!(palette.blend(1.0), Rgb([255, 255, 255]));
        assert_eq!(palette.blend(20.0), Rgb([255, 255, 255]));
        assert_eq!(palette.blend(0.5), Rgb([127, 127, 127]));
    }

    #[test]
    fn palette_round_trips_through_json() {
        let palette = Palette::default();
        let json = serde_json::to_string(&palette).unwrap();
        assert!(json.contains("#ff0000"));
        let back: Palette = serde_json::from_str(&json).unwrap();
        assert_eq!(back, palette);
    }
}
