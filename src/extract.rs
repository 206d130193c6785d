//! Exact palette extraction.
//!
//! Buckets every pixel coordinate of an image under its exact 32-bit color.
//! Alpha takes part in equality, so two pixels that only differ in alpha end
//! up in different buckets.

use std::collections::{BTreeMap, HashMap};

use image::{GenericImageView, Pixel};
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::quantizer::{argb_pixels, reduce_colors};
use crate::{Color, Error, MedianCut};

/// Integer pixel / grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// Column
    pub x: u32,
    /// Row
    pub y: u32,
}

impl Cell {
    /// Cell at `(x, y)`
    pub const fn new(x: u32, y: u32) -> Self {
        Cell { x, y }
    }
}

impl From<(u32, u32)> for Cell {
    fn from((x, y): (u32, u32)) -> Self {
        Cell { x, y }
    }
}

/// Pixel coordinates grouped by exact color.
///
/// Every coordinate of the source image appears in exactly one bucket, and
/// within a bucket coordinates are kept in raster order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PalettedImage {
    width: u32,
    height: u32,
    first_seen: Vec<Color>,
    buckets: BTreeMap<Color, Vec<Cell>>,
}

impl PalettedImage {
    /// Source image width
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Source image height
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of distinct colors
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether there are no buckets at all (zero area source)
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Distinct colors in the order a raster scan first meets them
    pub fn first_seen(&self) -> &[Color] {
        &self.first_seen
    }

    /// Coordinates carrying `color`
    pub fn get(&self, color: Color) -> Option<&[Cell]> {
        self.buckets.get(&color).map(Vec::as_slice)
    }

    /// Buckets in ascending color value order
    pub fn iter(&self) -> impl Iterator<Item = (Color, &[Cell])> + '_ {
        self.buckets.iter().map(|(&c, cells)| (c, cells.as_slice()))
    }

    /// Total number of coordinates over all buckets
    pub fn pixel_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Color stored for `(x, y)`.
    ///
    /// Scans the buckets one by one; each bucket is searched by raster position.
    pub fn color_at(&self, x: u32, y: u32) -> Option<Color> {
        self.buckets
            .iter()
            .find(|(_, cells)| {
                cells
                    .binary_search_by(|c| (c.y, c.x).cmp(&(y, x)))
                    .is_ok()
            })
            .map(|(&c, _)| c)
    }
}

/// Builds [`PalettedImage`]s.
///
/// By default extraction is exact. With [`with_max_colors`](Self::with_max_colors)
/// images holding more distinct colors than allowed are reduced with
/// [`MedianCut`] first.
#[derive(Debug, Clone, Default)]
pub struct PaletteExtractor {
    max_colors: Option<usize>,
}

impl PaletteExtractor {
    /// Exact extractor
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the number of buckets to `max_colors` (at least 2).
    ///
    /// When the bound kicks in, every visible pixel is stored as its opaque
    /// palette color, whatever its original alpha. Fully transparent pixels
    /// are never reclassified, so their distinct values still get buckets of
    /// their own on top of the bound.
    pub fn with_max_colors(mut self, max_colors: usize) -> Self {
        self.max_colors = Some(max_colors);
        self
    }

    /// Distinct colors of the image in raster first-seen order.
    pub fn extract_colors<I, P>(&self, image: &I) -> Vec<Color>
    where
        P: Pixel<Subpixel = u8> + 'static,
        I: GenericImageView<Pixel = P>,
    {
        distinct_colors(&argb_pixels(image))
    }

    /// Group every pixel coordinate by its color.
    ///
    /// A zero area image gives an empty result rather than an error. With a
    /// color bound in place, an out of range bound is reported as
    /// [`Error::ColorCountOutOfBounds`].
    pub fn extract_paletted<I, P>(&self, image: &I) -> Result<PalettedImage, Error>
    where
        P: Pixel<Subpixel = u8> + 'static,
        I: GenericImageView<Pixel = P>,
    {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Ok(PalettedImage {
                width,
                height,
                ..PalettedImage::default()
            });
        }

        let pixels = argb_pixels(image);
        if let Some(max_colors) = self.max_colors {
            if max_colors < 2 {
                return Err(Error::ColorCountOutOfBounds(max_colors));
            }
            let distinct = pixels.iter().unique().count();
            if distinct > max_colors {
                debug!(
                    "{} distinct colors exceed the bound of {}, reducing",
                    distinct, max_colors
                );
                let reduced = reduce_colors(&MedianCut, image, max_colors)?;
                let flattened: Vec<Color> = argb_pixels(&reduced.image)
                    .into_iter()
                    .map(|c| if c.is_transparent() { c } else { c.with_alpha(0xFF) })
                    .collect();
                return Ok(bucket(&flattened, width, height));
            }
        }
        Ok(bucket(&pixels, width, height))
    }
}

fn distinct_colors(pixels: &[Color]) -> Vec<Color> {
    pixels.iter().copied().unique().collect()
}

/// Two passes: collect the distinct colors, then fill pre-created buckets in
/// raster order.
fn bucket(pixels: &[Color], width: u32, height: u32) -> PalettedImage {
    let first_seen = distinct_colors(pixels);
    let mut slots: HashMap<Color, Vec<Cell>> =
        first_seen.iter().map(|&c| (c, Vec::new())).collect();

    for (y, row) in (0..height).zip(pixels.chunks(width as usize)) {
        for (x, color) in (0..width).zip(row) {
            if let Some(cells) = slots.get_mut(color) {
                cells.push(Cell::new(x, y));
            }
        }
    }

    debug!(
        "bucketed {}x{} image into {} colors",
        width,
        height,
        first_seen.len()
    );
    PalettedImage {
        width,
        height,
        first_seen,
        buckets: slots.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn checker() -> RgbaImage {
        RgbaImage::from_fn(3, 2, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 255])
            }
        })
    }

    #[test]
    fn colors_in_first_seen_order() {
        let colors = PaletteExtractor::new().extract_colors(&checker());
        assert_eq!(
            colors,
            vec![Color::from_rgb(255, 255, 255), Color::from_rgb(0, 0, 0)]
        );
    }

    #[test]
    fn alpha_separates_colors() {
        let img = RgbaImage::from_fn(2, 1, |x, _| Rgba([5, 5, 5, if x == 0 { 255 } else { 0 }]));
        assert_eq!(PaletteExtractor::new().extract_colors(&img).len(), 2);
    }

    #[test]
    fn buckets_in_raster_order() {
        let paletted = PaletteExtractor::new().extract_paletted(&checker()).unwrap();
        assert_eq!(paletted.len(), 2);
        assert_eq!(
            paletted.get(Color::from_rgb(255, 255, 255)).unwrap(),
            &[Cell::new(0, 0), Cell::new(2, 0), Cell::new(1, 1)]
        );
        assert_eq!(
            paletted.get(Color::from_rgb(0, 0, 0)).unwrap(),
            &[Cell::new(1, 0), Cell::new(0, 1), Cell::new(2, 1)]
        );
        assert_eq!(paletted.pixel_count(), 6);
        assert_eq!(paletted.color_at(1, 1), Some(Color::from_rgb(255, 255, 255)));
        assert_eq!(paletted.color_at(3, 0), None);
    }

    #[test]
    fn iterates_by_color_value() {
        let paletted = PaletteExtractor::new().extract_paletted(&checker()).unwrap();
        let order: Vec<Color> = paletted.iter().map(|(c, _)| c).collect();
        assert_eq!(
            order,
            vec![Color::from_rgb(0, 0, 0), Color::from_rgb(255, 255, 255)]
        );
    }

    #[test]
    fn zero_area_is_empty() {
        let paletted = PaletteExtractor::new()
            .extract_paletted(&RgbaImage::new(0, 4))
            .unwrap();
        assert!(paletted.is_empty());
        assert_eq!(paletted.height(), 4);
        assert!(PaletteExtractor::new()
            .extract_colors(&RgbaImage::new(4, 0))
            .is_empty());
    }

    #[test]
    fn bounded_extraction_reduces() {
        let img = RgbaImage::from_fn(8, 1, |x, _| Rgba([(x * 30) as u8, 0, 0, 255]));
        let paletted = PaletteExtractor::new()
            .with_max_colors(2)
            .extract_paletted(&img)
            .unwrap();
        assert_eq!(paletted.len(), 2);
        assert_eq!(paletted.pixel_count(), 8);

        let exact = PaletteExtractor::new()
            .with_max_colors(8)
            .extract_paletted(&img)
            .unwrap();
        assert_eq!(exact.len(), 8);
    }

    #[test]
    fn bounded_extraction_folds_alpha_levels() {
        let img = RgbaImage::from_fn(8, 1, |x, _| {
            let rgb = if x < 4 { [200, 10, 10] } else { [10, 10, 200] };
            Rgba([rgb[0], rgb[1], rgb[2], [255, 192, 128, 64][(x % 4) as usize]])
        });
        let paletted = PaletteExtractor::new()
            .with_max_colors(2)
            .extract_paletted(&img)
            .unwrap();
        assert_eq!(paletted.len(), 2);
        assert_eq!(paletted.pixel_count(), 8);
        assert!(paletted.iter().all(|(c, _)| c.alpha() == 0xFF));
        assert_eq!(
            paletted.get(Color::from_rgb(200, 10, 10)).unwrap(),
            &[Cell::new(0, 0), Cell::new(1, 0), Cell::new(2, 0), Cell::new(3, 0)]
        );
    }

    #[test]
    fn bounded_extraction_keeps_transparent_values() {
        let img = RgbaImage::from_fn(6, 1, |x, _| match x {
            0 => Rgba([1, 2, 3, 0]),
            1 => Rgba([4, 5, 6, 0]),
            _ => Rgba([(x * 40) as u8, 0, 0, 100]),
        });
        let paletted = PaletteExtractor::new()
            .with_max_colors(2)
            .extract_paletted(&img)
            .unwrap();
        assert_eq!(paletted.get(Color::from_rgba(1, 2, 3, 0)).unwrap(), &[Cell::new(0, 0)]);
        assert_eq!(paletted.get(Color::from_rgba(4, 5, 6, 0)).unwrap(), &[Cell::new(1, 0)]);
        let visible = paletted.iter().filter(|(c, _)| !c.is_transparent()).count();
        assert!(visible <= 2);
        assert_eq!(paletted.pixel_count(), 6);
    }

    #[test]
    fn bad_bound_is_rejected() {
        let err = PaletteExtractor::new()
            .with_max_colors(1)
            .extract_paletted(&checker())
            .unwrap_err();
        assert_eq!(err, Error::ColorCountOutOfBounds(1));
    }
}
