//! JSON persistence for grid placement.

use std::fs;
use std::path::Path;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::{Error, GridDimensions, TransformableGrid};

/// Errors while reading or writing a [`GridConfig`]
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// File access failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Malformed JSON
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// Well formed but unusable contents
    #[error("invalid grid: {0}")]
    Grid(#[from] Error),
}

fn default_size() -> u32 {
    GridDimensions::default().columns()
}

/// Saved corners (TL, TR, BR, BL) and dimensions of a grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Corner positions, TL, TR, BR, BL
    pub corners: [Point2<f64>; 4],
    /// Logical columns
    #[serde(default = "default_size")]
    pub columns: u32,
    /// Logical rows
    #[serde(default = "default_size")]
    pub rows: u32,
}

impl GridConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Load a config and build the grid it describes.
    pub fn load_grid(path: impl AsRef<Path>) -> Result<TransformableGrid, ConfigError> {
        let config = Self::load_json(path)?;
        Ok(TransformableGrid::from_config(&config)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

impl TransformableGrid {
    /// Grid described by `config`, dimensions validated.
    pub fn from_config(config: &GridConfig) -> Result<Self, Error> {
        let dimensions = GridDimensions::new(config.columns, config.rows)?;
        Ok(Self::new(config.corners, dimensions))
    }

    /// Snapshot of the corners and dimensions.
    pub fn config(&self) -> GridConfig {
        let dimensions = self.dimensions();
        GridConfig {
            corners: *self.corners(),
            columns: dimensions.columns(),
            rows: dimensions.rows(),
        }
    }
}
