use image::{GenericImageView, Pixel, RgbaImage};

mod median_cut;
mod remap;

pub use median_cut::MedianCut;
pub use remap::{remap, Remapper};

use crate::{Color, Error, Palette};

/// Quantizer trait
pub trait Quantizer {
    /// Builds a palette of at most `max_colors` entries representing `samples`.
    ///
    /// Only the RGB part of the samples takes part; callers drop fully
    /// transparent pixels beforehand.
    fn palette(&self, samples: &[Color], max_colors: usize) -> Result<Palette, Error>;
}

/// Image reduced to a palette
#[derive(Debug, Clone)]
pub struct Reduced {
    /// Palette every visible pixel was mapped onto
    pub palette: Palette,
    /// Remapped image, same size as the input
    pub image: RgbaImage,
}

/// Quantizes the input image into at most `max_colors` colors and remaps
/// every pixel onto the result.
///
/// An all transparent image is valid: it yields an empty palette and an
/// unchanged copy of the pixels.
pub fn reduce_colors<Q, I, P>(quantizer: &Q, image: &I, max_colors: usize) -> Result<Reduced, Error>
where
    Q: Quantizer + ?Sized,
    P: Pixel<Subpixel = u8> + 'static,
    I: GenericImageView<Pixel = P>,
{
    if max_colors < 2 {
        return Err(Error::ColorCountOutOfBounds(max_colors));
    }
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::EmptyImage { width, height });
    }

    let pixels = argb_pixels(image);
    let samples: Vec<Color> = pixels
        .iter()
        .filter(|c| !c.is_transparent())
        .map(|c| c.rgb_only())
        .collect();

    let palette = if samples.is_empty() {
        Palette::default()
    } else {
        quantizer.palette(&samples, max_colors)?
    };
    let remapped = remap(&pixels, &palette);

    let mut out = RgbaImage::new(width, height);
    for (target, color) in out.pixels_mut().zip(remapped) {
        *target = color.into();
    }
    Ok(Reduced {
        palette,
        image: out,
    })
}

/// Raster order (rows top to bottom, x fastest) packed pixels.
pub(crate) fn argb_pixels<I, P>(image: &I) -> Vec<Color>
where
    P: Pixel<Subpixel = u8> + 'static,
    I: GenericImageView<Pixel = P>,
{
    let (width, height) = image.dimensions();
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        for x in 0..width {
            pixels.push(Color::from(image.get_pixel(x, y).to_rgba()));
        }
    }
    pixels
}
