//! Heatmap accumulation, normalization and smoothing.

use ndarray::Array2;

use crate::{HeatmapError, HeatmapResult};

/// Upper bound of the normalized intensity range.
pub const NORMALIZED_MAX: f32 = 255.0;

/// Fixed Gaussian kernel width (must be odd).
const SMOOTH_KERNEL_WIDTH: usize = 15;

/// Sigma for the fixed smoothing kernel.
const SMOOTH_SIGMA: f32 = SMOOTH_KERNEL_WIDTH as f32 / 6.0;

/// A 2D grid of non-negative attention intensities, one cell per pixel.
///
/// Rows are indexed `[y][x]` (`Array2` shape is `(height, width)`).
#[derive(Debug, Clone, PartialEq)]
pub struct Heatmap {
    grid: Array2<f32>,
}

impl Heatmap {
    /// Zero-filled heatmap of the given resolution.
    pub fn zeros(width: usize, height: usize) -> HeatmapResult<Self> {
        if width == 0 || height == 0 {
            return Err(HeatmapError::EmptyGrid);
        }
        Ok(Self {
            grid: Array2::zeros((height, width)),
        })
    }

    /// Wrap an existing grid.
    pub fn from_grid(grid: Array2<f32>) -> HeatmapResult<Self> {
        if grid.nrows() == 0 || grid.ncols() == 0 {
            return Err(HeatmapError::EmptyGrid);
        }
        if let Some(&v) = grid.iter().find(|v| **v < 0.0) {
            return Err(HeatmapError::NegativeIntensity(v));
        }
        Ok(Self { grid })
    }

    pub fn width(&self) -> usize {
        self.grid.ncols()
    }

    pub fn height(&self) -> usize {
        self.grid.nrows()
    }

    /// Intensity at `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.grid[(y, x)]
    }

    /// Borrow the underlying grid.
    pub fn grid(&self) -> &Array2<f32> {
        &self.grid
    }

    /// Maximum intensity in the grid.
    pub fn max_intensity(&self) -> f32 {
        self.grid.iter().copied().fold(0.0_f32, f32::max)
    }

    /// Rescale intensities to the [0, 255] range.
    ///
    /// A grid whose values already span [0, max] maps `max` to 255 and 0 to 0,
    /// so normalizing twice is a no-op within float tolerance. An all-zero
    /// grid stays all-zero.
    pub fn normalize(&mut self) {
        let max = self.max_intensity();
        if max <= 0.0 {
            return;
        }
        let scale = NORMALIZED_MAX / max;
        self.grid.mapv_inplace(|v| v * scale);
    }

    /// Smooth the grid with the fixed separable Gaussian kernel.
    pub fn smooth(&mut self) {
        let kernel = gaussian_kernel(SMOOTH_KERNEL_WIDTH, SMOOTH_SIGMA);
        self.grid = convolve_separable(&self.grid, &kernel);
    }
}

/// Accumulates per-frame scalar energy grids into a single heatmap.
///
/// The caller decides the sampling stride; every grid handed to
/// [`add_frame`](Self::add_frame) is summed monotonically. [`finish`](Self::finish)
/// normalizes to [0, 255] and applies the fixed Gaussian smoothing. If no
/// frames were added the result is the zero-filled grid of the declared
/// resolution — an empty video is not an error.
#[derive(Debug)]
pub struct HeatmapAccumulator {
    heatmap: Heatmap,
    frames_added: usize,
}

impl HeatmapAccumulator {
    /// Accumulator for a grid of the declared video resolution.
    pub fn new(width: usize, height: usize) -> HeatmapResult<Self> {
        Ok(Self {
            heatmap: Heatmap::zeros(width, height)?,
            frames_added: 0,
        })
    }

    /// Add one frame's energy grid.
    pub fn add_frame(&mut self, energy: &Array2<f32>) -> HeatmapResult<()> {
        let expected = (self.heatmap.height(), self.heatmap.width());
        let got = (energy.nrows(), energy.ncols());
        if expected != got {
            return Err(HeatmapError::DimensionMismatch { expected, got });
        }
        if let Some(&v) = energy.iter().find(|v| **v < 0.0) {
            return Err(HeatmapError::NegativeIntensity(v));
        }
        self.heatmap.grid += energy;
        self.frames_added += 1;
        Ok(())
    }

    /// Number of frames accumulated so far.
    pub fn frames_added(&self) -> usize {
        self.frames_added
    }

    /// Normalize and smooth into the final heatmap.
    pub fn finish(self) -> Heatmap {
        let mut heatmap = self.heatmap;
        if self.frames_added == 0 {
            return heatmap;
        }
        heatmap.normalize();
        heatmap.smooth();
        heatmap
    }
}

/// Build a normalized 1D Gaussian kernel.
fn gaussian_kernel(width: usize, sigma: f32) -> Vec<f32> {
    debug_assert!(width % 2 == 1);
    let half = (width / 2) as isize;
    let mut kernel: Vec<f32> = (-half..=half)
        .map(|i| {
            let x = i as f32;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    for v in &mut kernel {
        *v /= sum;
    }
    kernel
}

/// Separable convolution with edge clamping.
fn convolve_separable(grid: &Array2<f32>, kernel: &[f32]) -> Array2<f32> {
    let (rows, cols) = grid.dim();
    let half = (kernel.len() / 2) as isize;

    // Horizontal pass.
    let mut horizontal = Array2::<f32>::zeros((rows, cols));
    for y in 0..rows {
        for x in 0..cols {
            let mut acc = 0.0;
            for (k, &w) in kernel.iter().enumerate() {
                let sx = (x as isize + k as isize - half).clamp(0, cols as isize - 1) as usize;
                acc += grid[(y, sx)] * w;
            }
            horizontal[(y, x)] = acc;
        }
    }

    // Vertical pass.
    let mut out = Array2::<f32>::zeros((rows, cols));
    for y in 0..rows {
        for x in 0..cols {
            let mut acc = 0.0;
            for (k, &w) in kernel.iter().enumerate() {
                let sy = (y as isize + k as isize - half).clamp(0, rows as isize - 1) as usize;
                acc += horizontal[(sy, x)] * w;
            }
            out[(y, x)] = acc;
        }
    }
    out
}
