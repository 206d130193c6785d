use std::collections::HashMap;

use crate::{Color, Palette};

/// Maps pixels onto their nearest palette entry.
///
/// Lookups are memoized by RGB value, so an image only pays the palette
/// scan once per distinct color.
#[derive(Debug, Clone)]
pub struct Remapper<'a> {
    palette: &'a Palette,
    cache: HashMap<Color, Color>,
}

impl<'a> Remapper<'a> {
    /// Remapper over `palette` with an empty cache
    pub fn new(palette: &'a Palette) -> Self {
        Self {
            palette,
            cache: HashMap::new(),
        }
    }

    /// Nearest palette color for one pixel.
    ///
    /// Fully transparent pixels, and every pixel when the palette is empty,
    /// pass through unchanged. Otherwise the result carries the pixel's own
    /// alpha with the palette entry's RGB.
    pub fn map(&mut self, pixel: Color) -> Color {
        if pixel.is_transparent() {
            return pixel;
        }
        let key = pixel.rgb_only();
        let nearest = match self.cache.get(&key) {
            Some(&hit) => hit,
            None => match self.palette.nearest(key) {
                Some(found) => {
                    self.cache.insert(key, found);
                    found
                }
                None => return pixel,
            },
        };
        nearest.with_alpha(pixel.alpha())
    }

    /// Distinct RGB values looked up so far
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

/// Map every pixel onto `palette`, preserving length, order and alpha.
pub fn remap(pixels: &[Color], palette: &Palette) -> Vec<Color> {
    let mut remapper = Remapper::new(palette);
    pixels.iter().map(|&p| remapper.map(p)).collect()
}
