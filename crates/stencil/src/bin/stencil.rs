use std::{path::PathBuf, time::Instant};

use argh::FromArgs;
use stencil::{
    app::{self, FilterConfig},
    imgproc::{filter::kernels::KernelType, parallel::ExecutionStrategy},
};

/// Apply a 3x3 convolution kernel to an image and save the result as PNG
#[derive(Debug, FromArgs)]
struct Args {
    /// path to the input image (jpg, png, bmp, tga, ...)
    #[argh(positional)]
    input: PathBuf,

    /// kernel to apply: edge, sharpen, blur, gauss, emboss or identity.
    /// Unknown names fall back to identity.
    #[argh(positional)]
    kernel: String,

    /// execution strategy: serial, pool or parallel
    #[argh(option, short = 's', default = "ExecutionStrategy::default()")]
    strategy: ExecutionStrategy,

    /// number of worker threads for the pool and parallel strategies
    #[argh(option, short = 't')]
    threads: Option<usize>,

    /// directory to write the result to (defaults to the current directory)
    #[argh(option, short = 'o')]
    output_dir: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();
    let start = Instant::now();

    let kernel = KernelType::lookup(&args.kernel);
    if kernel.name() != args.kernel {
        log::warn!("Unknown kernel '{}', using {}", args.kernel, kernel);
    }

    let strategy = match args.threads {
        Some(n) => args.strategy.with_threads(n),
        None => args.strategy,
    };

    let config = FilterConfig {
        input: args.input,
        kernel,
        strategy,
        output_dir: args.output_dir,
    };

    let output = app::run(&config)?;

    log::info!("Saved {} in {:?}", output.display(), start.elapsed());

    Ok(())
}
