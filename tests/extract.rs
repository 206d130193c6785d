use std::collections::HashSet;

use gridpaint::{Cell, Color, PaletteExtractor};
use image::{Rgba, RgbaImage};

fn tile() -> RgbaImage {
    RgbaImage::from_fn(7, 5, |x, y| match (x * 3 + y) % 4 {
        0 => Rgba([10, 20, 30, 255]),
        1 => Rgba([10, 20, 30, 128]),
        2 => Rgba([0, 0, 0, 0]),
        _ => Rgba([200, 100, 0, 255]),
    })
}

#[test]
fn every_pixel_lands_in_exactly_one_bucket() {
    let img = tile();
    let paletted = PaletteExtractor::new().extract_paletted(&img).unwrap();
    assert_eq!(paletted.len(), 4);

    let mut seen = HashSet::new();
    for (color, cells) in paletted.iter() {
        for &cell in cells {
            assert!(cell.x < img.width() && cell.y < img.height());
            assert!(seen.insert(cell), "{:?} in two buckets", cell);
            assert_eq!(Color::from(*img.get_pixel(cell.x, cell.y)), color);
        }
    }
    assert_eq!(seen.len(), (img.width() * img.height()) as usize);
    assert_eq!(paletted.pixel_count(), seen.len());
}

#[test]
fn buckets_keep_raster_order() {
    let paletted = PaletteExtractor::new().extract_paletted(&tile()).unwrap();
    for (_, cells) in paletted.iter() {
        assert!(cells.windows(2).all(|w| (w[0].y, w[0].x) < (w[1].y, w[1].x)));
    }
}

#[test]
fn first_seen_matches_extract_colors() {
    let img = tile();
    let extractor = PaletteExtractor::new();
    let colors = extractor.extract_colors(&img);
    let paletted = extractor.extract_paletted(&img).unwrap();
    assert_eq!(paletted.first_seen(), colors.as_slice());
    assert_eq!(colors[0], Color::from_rgba(10, 20, 30, 255));
    assert_eq!(paletted.get(colors[0]).unwrap()[0], Cell::new(0, 0));
}

#[test]
fn all_transparent_image_still_buckets() {
    let img = RgbaImage::from_pixel(3, 2, Rgba([0, 0, 0, 0]));
    let paletted = PaletteExtractor::new()
        .with_max_colors(4)
        .extract_paletted(&img)
        .unwrap();
    assert_eq!(paletted.len(), 1);
    assert_eq!(paletted.pixel_count(), 6);
}
