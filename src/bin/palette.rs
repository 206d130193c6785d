use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;

use gridpaint::{reduce_colors, MedianCut, Palette, PaletteExtractor};

/// Print the palette of an image.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Source image
    image: PathBuf,
    /// Reduce to at most this many colors with median cut
    #[arg(short = 'k', long)]
    max_colors: Option<usize>,
    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .parse_default_env()
        .init();

    let img = image::open(&args.image)
        .with_context(|| format!("could not load image {:?}", args.image))?;

    let palette = match args.max_colors {
        Some(k) => reduce_colors(&MedianCut, &img, k)?.palette,
        None => Palette::new(PaletteExtractor::new().extract_colors(&img)),
    };
    println!("{}", palette);
    Ok(())
}
