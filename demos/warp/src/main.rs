use argh::FromArgs;
use std::{path::PathBuf, sync::Arc};

use pixmorph::imgproc::{
    context::ProcessingContext,
    filter::{BoxFilter, MedianFilter, SobelFilter},
    interpolation::InterpolationMode,
    pipeline::{LogObserver, Pipeline},
    transform::{AffineTransform, GeometricTransform, RotateTransform},
    warp::GeometricKind,
    Operation,
};
use pixmorph::io::functional as F;

#[derive(FromArgs)]
/// Load an image, run a chain of transforms and filters on it and save the result
struct Args {
    /// path to an input image (ppm, pgm, pnm, bmp, jpg)
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// path to the output image, the format follows the extension
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// operation as `name[:value]`, repeat to chain: rotate, scale, shear, barrel, pincushion,
    /// fisheye, polar, unpolar, box, median, sobel
    #[argh(option)]
    op: Vec<String>,

    /// interpolation mode: nearest, bilinear or bicubic
    #[argh(option, default = "InterpolationMode::Bilinear")]
    interpolation: InterpolationMode,

    /// grow the canvas so rotated images are not cropped
    #[argh(switch)]
    resize: bool,

    /// number of worker threads, the global pool is used when omitted
    #[argh(option)]
    threads: Option<usize>,

    /// jpeg quality in [0, 100]
    #[argh(option)]
    quality: Option<u8>,
}

fn parse_op(
    op: &str,
    interpolation: InterpolationMode,
    resize: bool,
) -> Result<Box<dyn Operation>, Box<dyn std::error::Error>> {
    let (name, value) = match op.split_once(':') {
        Some((name, value)) => (name, Some(value.parse::<f32>()?)),
        None => (op, None),
    };

    let op: Box<dyn Operation> = match name {
        "rotate" => Box::new(
            RotateTransform::new(value.unwrap_or(30.0))
                .with_resize_output(resize)
                .with_interpolation(interpolation),
        ),
        "scale" => {
            let s = value.unwrap_or(2.0);
            Box::new(AffineTransform::scaling(s, s).with_interpolation(interpolation))
        }
        "shear" => Box::new(
            AffineTransform::shear(value.unwrap_or(0.3), 0.0).with_interpolation(interpolation),
        ),
        "barrel" | "pincushion" | "fisheye" | "polar" | "unpolar" => {
            let strength = value.unwrap_or(0.3);
            let kind = match name {
                "barrel" => GeometricKind::Barrel { strength },
                "pincushion" => GeometricKind::Pincushion { strength },
                "fisheye" => GeometricKind::FishEye { strength },
                "polar" => GeometricKind::CartesianToPolar,
                _ => GeometricKind::PolarToCartesian,
            };
            Box::new(GeometricTransform::new(kind)?.with_interpolation(interpolation))
        }
        "box" => Box::new(BoxFilter::new(value.unwrap_or(3.0) as usize)?),
        "median" => Box::new(MedianFilter::new(value.unwrap_or(3.0) as usize)?),
        "sobel" => Box::new(SobelFilter),
        _ => return Err(format!("unknown operation: {name}").into()),
    };
    Ok(op)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let mut pipeline = Pipeline::new().with_observer(Arc::new(LogObserver));
    for op in &args.op {
        pipeline.push(parse_op(op, args.interpolation, args.resize)?);
    }

    let ctx = match args.threads {
        Some(n) => ProcessingContext::new().with_num_threads(n)?,
        None => ProcessingContext::new(),
    };

    // read the image
    let image = F::read_image(&args.input)?;
    log::info!(
        "loaded {} {} from {}",
        image.image_type(),
        image.size(),
        args.input.display()
    );

    let output = pipeline.run(&ctx, &image)?;
    log::info!(
        "ran {:?}, peak intermediate memory: {} bytes",
        pipeline.names(),
        ctx.memory().peak()
    );

    F::write_image(&args.output, &output, args.quality)?;
    log::info!("wrote {} {}", output.size(), args.output.display());

    Ok(())
}
