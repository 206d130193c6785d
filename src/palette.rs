use std::collections::BTreeSet;
use std::fmt;

use itertools::Itertools;
#[cfg(feature = "print-truecolor")]
use termion::color;

use crate::Color;

/// Palette of colors.
///
/// A set of distinct colors, iterated in packed value order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    colors: BTreeSet<Color>,
}

impl Palette {
    /// Palette holding the given colors, duplicates collapsed
    pub fn new(colors: impl IntoIterator<Item = Color>) -> Self {
        Palette {
            colors: colors.into_iter().collect(),
        }
    }

    /// Number of distinct colors
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the palette holds no colors at all
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Whether `color` is an entry of this palette
    pub fn contains(&self, color: Color) -> bool {
        self.colors.contains(&color)
    }

    /// Colors in ascending value order
    pub fn iter(&self) -> impl Iterator<Item = Color> + '_ {
        self.colors.iter().copied()
    }

    /// Palette entry closest to `color` in RGB space.
    ///
    /// Ties go to the smallest color value. Returns `None` on an empty palette.
    pub fn nearest(&self, color: Color) -> Option<Color> {
        let mut best: Option<(u32, Color)> = None;
        for entry in self.iter() {
            let dist = entry.distance_sq(color);
            if best.map_or(true, |(min, _)| dist < min) {
                best = Some((dist, entry));
                if dist == 0 {
                    break;
                }
            }
        }
        best.map(|(_, c)| c)
    }
}

impl FromIterator<Color> for Palette {
    fn from_iter<T: IntoIterator<Item = Color>>(iter: T) -> Self {
        Palette::new(iter)
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a Color;
    type IntoIter = std::collections::btree_set::Iter<'a, Color>;

    fn into_iter(self) -> Self::IntoIter {
        self.colors.iter()
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        #[cfg(not(feature = "print-truecolor"))]
        let color_list = self.iter().map(|c| c.hex_rgb()).join(", ");
        #[cfg(feature = "print-truecolor")]
        let color_list = self
            .iter()
            .map(|c| {
                format!(
                    "{}███{} {}",
                    color::Fg(color::Rgb(c.red(), c.green(), c.blue())),
                    color::Fg(color::Reset),
                    c.hex_rgb()
                )
            })
            .join(", ");

        write!(f, "Color Palette {{ {} }}", color_list)
    }
}
