use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::{info, LevelFilter};

use gridpaint::{GridConfig, PaintPlan, PaletteExtractor};

/// Resolve every pixel of an image to a physical point on a perspective grid
/// and write the result as JSON.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Source image
    image: PathBuf,
    /// Grid corners as JSON (`{"corners": [[x, y], ...]}`, TL, TR, BR, BL)
    #[arg(short, long)]
    grid: PathBuf,
    /// Reduce to at most this many colors with median cut
    #[arg(short = 'k', long)]
    max_colors: Option<usize>,
    /// Leave fully transparent pixels out of the plan
    #[arg(long)]
    skip_transparent: bool,
    /// Output path, stdout when missing
    #[arg(short, long)]
    output: Option<PathBuf>,
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

    let mut extractor = PaletteExtractor::new();
    if let Some(k) = args.max_colors {
        extractor = extractor.with_max_colors(k);
    }
    let paletted = extractor.extract_paletted(&img)?;
    info!(
        "{}x{} image, {} colors",
        paletted.width(),
        paletted.height(),
        paletted.len()
    );

    let mut grid = GridConfig::load_grid(&args.grid)
        .with_context(|| format!("could not load grid {:?}", args.grid))?;
    grid.fit_to_image(paletted.width(), paletted.height())?;

    let skip_transparent = args.skip_transparent;
    let plan = PaintPlan::build(&paletted, &mut grid, |color, _| {
        skip_transparent && color.is_transparent()
    })?;
    info!("{} strokes, {} cells", plan.strokes.len(), plan.cell_count());

    let json = plan.to_json_pretty()?;
    match args.output {
        Some(path) => fs::write(&path, json).with_context(|| format!("could not write {:?}", path))?,
        None => println!("{}", json),
    }
    Ok(())
}
