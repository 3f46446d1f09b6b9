use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use stencil_imgproc::{
    filter::{self, kernels::KernelType, FilterError},
    parallel::ExecutionStrategy,
};
use stencil_io::{functional::read_image_any, png::write_image_png, IoError};

/// An error type for the filtering pipeline.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// The input path has no file name to derive the output name from.
    #[error("Input path has no file name: {0}")]
    InvalidInputPath(PathBuf),

    /// Error reading or writing an image.
    #[error(transparent)]
    Io(#[from] IoError),

    /// Error applying the filter.
    #[error(transparent)]
    Filter(#[from] FilterError),
}

/// Settings for one run of the pipeline.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    /// Image to read.
    pub input: PathBuf,
    /// Kernel to apply.
    pub kernel: KernelType,
    /// How the rows are scheduled.
    pub strategy: ExecutionStrategy,
    /// Directory the result is written to. The current directory when `None`.
    pub output_dir: Option<PathBuf>,
}

/// Path of the filtered image: `<kernel>_<strategy>_<input stem>.png` in `output_dir`.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use stencil::app::output_path;
/// use stencil::imgproc::{filter::kernels::KernelType, parallel::ExecutionStrategy};
///
/// let path = output_path(
///     Path::new("images/dog.jpeg"),
///     KernelType::Edge,
///     ExecutionStrategy::Serial,
///     None,
/// );
/// assert_eq!(path, Some(PathBuf::from("edge_serial_dog.png")));
/// ```
pub fn output_path(
    input: &Path,
    kernel: KernelType,
    strategy: ExecutionStrategy,
    output_dir: Option<&Path>,
) -> Option<PathBuf> {
    let stem = input.file_stem()?.to_string_lossy();
    let file_name = format!("{}_{}_{}.png", kernel.name(), strategy.name(), stem);

    Some(match output_dir {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    })
}

/// Read the input image, apply the kernel and write the result as PNG.
///
/// # Returns
///
/// The path of the written image.
pub fn run(config: &FilterConfig) -> Result<PathBuf, AppError> {
    let output = output_path(
        &config.input,
        config.kernel,
        config.strategy,
        config.output_dir.as_deref(),
    )
    .ok_or_else(|| AppError::InvalidInputPath(config.input.clone()))?;

    let src = read_image_any(&config.input)?;
    log::info!(
        "Loaded {} ({}, channels: {})",
        config.input.display(),
        src.size(),
        src.num_channels()
    );

    let start = Instant::now();
    let dst = filter::filter3x3_alloc(&src, config.kernel.kernel(), config.strategy)?;
    log::info!(
        "Applied {} kernel with {} strategy in {:?}",
        config.kernel,
        config.strategy,
        start.elapsed()
    );

    write_image_png(&output, &dst)?;
    log::debug!("Wrote {}", output.display());

    Ok(output)
}
