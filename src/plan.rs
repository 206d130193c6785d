//! Per color click lists for an external painting agent.

use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::{Cell, Color, Error, PalettedImage, TransformableGrid};

/// Every cell of one color with its physical position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Exact color of the cells
    pub color: Color,
    /// `#RRGGBB` form of `color`
    pub hex: String,
    /// Logical cells, raster order
    pub cells: Vec<Cell>,
    /// Physical position of each cell, parallel to `cells`
    pub points: Vec<Point2<f64>>,
}

/// Strokes in ascending color order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaintPlan {
    /// One stroke per color with at least one cell left
    pub strokes: Vec<Stroke>,
}

impl PaintPlan {
    /// Resolve every cell of `paletted` through `grid`.
    ///
    /// Cells for which `skip` returns true are left out, and colors left
    /// without cells get no stroke. A cell outside the grid fails with
    /// [`Error::CellOutOfRange`].
    pub fn build<F>(
        paletted: &PalettedImage,
        grid: &mut TransformableGrid,
        mut skip: F,
    ) -> Result<Self, Error>
    where
        F: FnMut(Color, Cell) -> bool,
    {
        let mut strokes = Vec::with_capacity(paletted.len());
        for (color, cells) in paletted.iter() {
            let cells: Vec<Cell> = cells.iter().copied().filter(|&c| !skip(color, c)).collect();
            if cells.is_empty() {
                continue;
            }
            let points = cells
                .iter()
                .map(|c| grid.position_of(c.x, c.y))
                .collect::<Result<Vec<_>, _>>()?;
            strokes.push(Stroke {
                color,
                hex: color.hex_rgb(),
                cells,
                points,
            });
        }
        debug!(
            "paint plan: {} strokes, {} cells",
            strokes.len(),
            strokes.iter().map(|s| s.cells.len()).sum::<usize>()
        );
        Ok(Self { strokes })
    }

    /// Total number of cells over all strokes
    pub fn cell_count(&self) -> usize {
        self.strokes.iter().map(|s| s.cells.len()).sum()
    }

    /// Pretty JSON for the agent.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
