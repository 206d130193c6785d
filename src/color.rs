use std::fmt;

use image::Rgba;
use serde::{Deserialize, Serialize};

const RGB_MASK: u32 = 0x00FF_FFFF;
const ALPHA_MASK: u32 = 0xFF00_0000;

/// Packed 32-bit ARGB color.
///
/// Colors order by their packed value, which is what palettes and
/// paletted images iterate in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(u32);

impl Color {
    /// Color from a packed `0xAARRGGBB` value, alpha kept as is
    pub const fn from_argb(argb: u32) -> Self {
        Color(argb)
    }

    /// Color from a packed value with alpha forced to 255
    pub const fn opaque(rgb: u32) -> Self {
        Color(ALPHA_MASK | rgb)
    }

    /// Color from separate channels
    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    /// Fully opaque color from separate channels
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba(r, g, b, 255)
    }

    /// Packed `0xAARRGGBB` value
    pub const fn argb(self) -> u32 {
        self.0
    }

    /// Alpha channel
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Red channel
    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Green channel
    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Blue channel
    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Same color with the alpha channel cleared
    pub const fn rgb_only(self) -> Self {
        Color(self.0 & RGB_MASK)
    }

    /// Same RGB with a different alpha
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Color((alpha as u32) << 24 | (self.0 & RGB_MASK))
    }

    /// Whether alpha is zero
    pub const fn is_transparent(self) -> bool {
        self.alpha() == 0
    }

    /// Squared euclidean distance over red, green and blue.
    pub fn distance_sq(self, other: Color) -> u32 {
        let dr = self.red() as i32 - other.red() as i32;
        let dg = self.green() as i32 - other.green() as i32;
        let db = self.blue() as i32 - other.blue() as i32;
        (dr * dr + dg * dg + db * db) as u32
    }

    /// `#RRGGBB`, uppercase, alpha dropped
    pub fn hex_rgb(self) -> String {
        format!("#{:06X}", self.0 & RGB_MASK)
    }

    /// Scale every color channel up by `factor`, keeping alpha.
    ///
    /// Black turns into a dim grey first so that it can brighten at all.
    pub fn brighter(self, factor: f64) -> Self {
        let floor = (1.0 / (1.0 - 1.0 / factor)) as i32;
        let (mut r, mut g, mut b) = (self.red() as i32, self.green() as i32, self.blue() as i32);
        if r == 0 && g == 0 && b == 0 {
            let v = floor.clamp(0, 255) as u8;
            return Self::from_rgba(v, v, v, self.alpha());
        }
        for c in [&mut r, &mut g, &mut b] {
            if *c > 0 && *c < floor {
                *c = floor;
            }
        }
        let scale = |c: i32| ((c as f64 * factor) as i32).clamp(0, 255) as u8;
        Self::from_rgba(scale(r), scale(g), scale(b), self.alpha())
    }

    /// Scale every color channel down by `factor`, keeping alpha
    pub fn darker(self, factor: f64) -> Self {
        let scale = |c: u8| ((c as f64 / factor) as i32).clamp(0, 255) as u8;
        Self::from_rgba(
            scale(self.red()),
            scale(self.green()),
            scale(self.blue()),
            self.alpha(),
        )
    }
}

impl From<Rgba<u8>> for Color {
    fn from(pixel: Rgba<u8>) -> Self {
        let [r, g, b, a] = pixel.0;
        Color::from_rgba(r, g, b, a)
    }
}

impl From<Color> for Rgba<u8> {
    fn from(color: Color) -> Self {
        Rgba([color.red(), color.green(), color.blue(), color.alpha()])
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}
