//! Turn an image into something that can be painted cell by cell
//!
//! Images are reduced to a small palette with median cut, their pixels are
//! grouped by exact color, and the pixel grid is projected through a four
//! corner perspective quadrilateral so every cell gets a physical position
//! on an arbitrarily rotated or skewed target.

#![deny(missing_docs)]

pub use color::Color;
pub use config::{ConfigError, GridConfig};
pub use error::{Error, ErrorKind};
pub use extract::{Cell, PaletteExtractor, PalettedImage};
pub use grid::{Corner, GridDimensions, Projection, TransformableGrid};
pub use homography::Homography;
pub use palette::Palette;
pub use plan::{PaintPlan, Stroke};
pub use quantizer::*;

mod color;
mod config;
mod error;
mod extract;
mod grid;
mod homography;
mod palette;
mod plan;
mod quantizer;
