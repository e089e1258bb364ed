use argh::FromArgs;
use std::path::PathBuf;

use sdfgen_field::{distance_field_with, ExecutionStrategy};
use sdfgen_image::{Image, ImageSize};
use sdfgen_io::functional as F;

#[derive(FromArgs)]
/// Generate a quantized signed distance field image from a binary bitmap.
struct Args {
    /// path to the source bitmap (tga or png)
    #[argh(positional)]
    source_path: PathBuf,

    /// search radius as a fraction of the source resolution
    #[argh(positional)]
    ratio: f32,

    /// path to write the distance field image to (tga or png)
    #[argh(positional)]
    output_path: PathBuf,

    /// output width in pixels
    #[argh(positional)]
    output_width: usize,

    /// output height in pixels
    #[argh(positional)]
    output_height: usize,

    /// number of worker threads (default: one per core)
    #[argh(option, short = 'j')]
    jobs: Option<usize>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();

    let source = F::read_image_any_rgb8(&args.source_path)?;
    log::info!(
        "loaded {} ({})",
        args.source_path.display(),
        source.size()
    );

    let mut output = Image::<u8, 3>::from_size_val(
        ImageSize {
            width: args.output_width,
            height: args.output_height,
        },
        0u8,
    )?;

    let strategy = match args.jobs {
        Some(n) => ExecutionStrategy::Fixed(n),
        None => ExecutionStrategy::ParallelRows,
    };
    distance_field_with(&source, &mut output, args.ratio, strategy)?;

    F::write_image_any_rgb8(&args.output_path, &output)?;
    log::info!(
        "wrote {} ({})",
        args.output_path.display(),
        output.size()
    );

    Ok(())
}
