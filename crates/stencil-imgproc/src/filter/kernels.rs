use std::{fmt, str::FromStr};

/// A fixed 3x3 convolution kernel.
///
/// The coefficients are stored as integer-valued weights and a common divisor, so that
/// the effective coefficient at `(row, col)` is `weights[row][col] / divisor`. Row 0 is
/// applied to the row above the center pixel and column 0 to the column on its left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kernel {
    weights: [[f64; 3]; 3],
    divisor: f64,
}

impl Kernel {
    /// Create a kernel from its weights and divisor.
    pub const fn new(weights: [[f64; 3]; 3], divisor: f64) -> Self {
        Self { weights, divisor }
    }

    /// The undivided weights in row-major order.
    pub fn weights(&self) -> &[[f64; 3]; 3] {
        &self.weights
    }

    /// The value every weighted sum is divided by.
    pub fn divisor(&self) -> f64 {
        self.divisor
    }

    /// The effective coefficient at `(row, col)`.
    pub fn coefficient(&self, row: usize, col: usize) -> f64 {
        self.weights[row][col] / self.divisor
    }

    /// The effective coefficients in row-major order.
    pub fn coefficients(&self) -> [[f64; 3]; 3] {
        let mut out = [[0.0; 3]; 3];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, v) in row.iter_mut().enumerate() {
                *v = self.coefficient(r, c);
            }
        }
        out
    }

    /// Sum of the effective coefficients.
    pub fn sum(&self) -> f64 {
        self.weights.iter().flatten().sum::<f64>() / self.divisor
    }
}

/// Laplacian edge detection.
pub const EDGE: Kernel = Kernel::new([[0., -1., 0.], [-1., 4., -1.], [0., -1., 0.]], 1.);

/// Sharpening: identity plus laplacian.
pub const SHARPEN: Kernel = Kernel::new([[0., -1., 0.], [-1., 5., -1.], [0., -1., 0.]], 1.);

/// 3x3 box blur.
pub const BLUR: Kernel = Kernel::new([[1., 1., 1.], [1., 1., 1.], [1., 1., 1.]], 9.);

/// 3x3 binomial approximation of a gaussian blur.
pub const GAUSSIAN_BLUR: Kernel = Kernel::new([[1., 2., 1.], [2., 4., 2.], [1., 2., 1.]], 16.);

/// Emboss, lit from the top left.
pub const EMBOSS: Kernel = Kernel::new([[-2., -1., 0.], [-1., 1., 1.], [0., 1., 2.]], 1.);

/// Copies the source unchanged.
pub const IDENTITY: Kernel = Kernel::new([[0., 0., 0.], [0., 1., 0.], [0., 0., 0.]], 1.);

/// The catalog of available kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KernelType {
    /// [`EDGE`]
    Edge,
    /// [`SHARPEN`]
    Sharpen,
    /// [`BLUR`]
    Blur,
    /// [`GAUSSIAN_BLUR`]
    GaussianBlur,
    /// [`EMBOSS`]
    Emboss,
    /// [`IDENTITY`]
    #[default]
    Identity,
}

impl KernelType {
    /// Every kernel in the catalog.
    pub const ALL: [KernelType; 6] = [
        KernelType::Edge,
        KernelType::Sharpen,
        KernelType::Blur,
        KernelType::GaussianBlur,
        KernelType::Emboss,
        KernelType::Identity,
    ];

    /// Resolve a kernel by name.
    ///
    /// Recognized names are `edge`, `sharpen`, `blur`, `gauss`, `emboss` and `identity`.
    /// Any other name resolves to [`KernelType::Identity`].
    ///
    /// # Examples
    ///
    /// ```
    /// use stencil_imgproc::filter::kernels::KernelType;
    ///
    /// assert_eq!(KernelType::lookup("gauss"), KernelType::GaussianBlur);
    /// assert_eq!(KernelType::lookup("unknown"), KernelType::Identity);
    /// ```
    pub fn lookup(name: &str) -> Self {
        match name {
            "edge" => KernelType::Edge,
            "sharpen" => KernelType::Sharpen,
            "blur" => KernelType::Blur,
            "gauss" => KernelType::GaussianBlur,
            "emboss" => KernelType::Emboss,
            _ => KernelType::Identity,
        }
    }

    /// The name accepted by [`KernelType::lookup`].
    pub fn name(&self) -> &'static str {
        match self {
            KernelType::Edge => "edge",
            KernelType::Sharpen => "sharpen",
            KernelType::Blur => "blur",
            KernelType::GaussianBlur => "gauss",
            KernelType::Emboss => "emboss",
            KernelType::Identity => "identity",
        }
    }

    /// The coefficients of the kernel.
    pub fn kernel(&self) -> &'static Kernel {
        match self {
            KernelType::Edge => &EDGE,
            KernelType::Sharpen => &SHARPEN,
            KernelType::Blur => &BLUR,
            KernelType::GaussianBlur => &GAUSSIAN_BLUR,
            KernelType::Emboss => &EMBOSS,
            KernelType::Identity => &IDENTITY,
        }
    }
}

impl fmt::Display for KernelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KernelType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(KernelType::lookup(s))
    }
}

/// Look up the coefficients of a kernel by name, defaulting to [`IDENTITY`].
pub fn lookup(name: &str) -> Kernel {
    *KernelType::lookup(name).kernel()
}
