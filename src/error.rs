use std::error::Error;
use std::fmt;

pub type Result<T> = std::result::Result<T, FluidError>;

#[derive(Debug)]
pub enum FluidError {
    /// A grid was requested with a zero width or height.
    InvalidDimensions { width: usize, height: usize },
    /// A palette color was not of the form `#rrggbb`.
    InvalidColor(String),
    Io(std::io::Error),
    Config(serde_json::Error),
    Image(image::ImageError),
}

impl fmt::Display for FluidError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions { width, height } => {
                write!(f, "invalid grid dimensions {width}x{height}: both must be non-zero")
            }
            Self::InvalidColor(color) => write!(f, "invalid color '{color}', expected #rrggbb"),
            Self::Io(e) => write!(f, "i/o error: {e}"),
            Self::Config(e) => write!(f, "config error: {e}"),
            Self::Image(e) => write!(f, "image error: {e}"),
        }
    }
}

impl Error for FluidError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Image(e) => Some(e),
            Self::InvalidDimensions { .. } | Self::InvalidColor(_) => None,
        }
    }
}

impl From<std::io::Error> for FluidError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for FluidError {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e)
    }
}

impl From<image::ImageError> for FluidError {
    fn from(e: image::ImageError) -> Self {
        Self::Image(e)
    }
}
