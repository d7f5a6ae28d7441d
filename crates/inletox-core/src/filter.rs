//! Lowpass filtering of daily and hourly series.
//!
//! Two kernels are supported:
//!
//! - **Hanning**: a raised-cosine window of any length, used to smooth daily
//!   series (e.g. a 30-day window on deep layer DO).
//! - **Godin**: the fixed 71-point 24-24-25 tidal averaging filter of
//!   Emery & Thomson (1997), eq. 5.10.37. Only meaningful for hourly data.
//!
//! Filtering is a "same"-length convolution. The first and last `M / 2`
//! samples (M being the kernel length) lack full support and are replaced,
//! either by NaN or by the unfiltered values.

use crate::errors::{InletError, InletResult};
use crate::timeseries::FloatValue;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Number of weights in the Godin kernel.
pub const GODIN_LENGTH: usize = 71;

/// Kernel shape used by [`LowpassFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KernelKind {
    Hanning,
    Godin,
}

impl KernelKind {
    /// Build the normalised kernel.
    ///
    /// `length` is only used by the Hanning kernel; the Godin kernel always
    /// has [`GODIN_LENGTH`] weights whatever length is requested.
    pub fn kernel(&self, length: usize) -> InletResult<Array1<FloatValue>> {
        match self {
            KernelKind::Hanning => hanning_kernel(length),
            KernelKind::Godin => Ok(godin_kernel()),
        }
    }
}

impl FromStr for KernelKind {
    type Err = InletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hanning" => Ok(KernelKind::Hanning),
            "godin" => Ok(KernelKind::Godin),
            _ => Err(InletError::InvalidKernelKind(s.to_string())),
        }
    }
}

impl fmt::Display for KernelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelKind::Hanning => write!(f, "hanning"),
            KernelKind::Godin => write!(f, "godin"),
        }
    }
}

/// What to write into the samples that lack full kernel support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EdgePadding {
    /// Replace with NaN.
    #[default]
    Nan,
    /// Keep the unfiltered values.
    Original,
}

/// Hanning window of `n` weights, normalised to sum to one.
///
/// The weights are `(1 + cos x) / 2` at the `n` interior points of an
/// `n + 2` point grid spanning `[-π, π]`, so no weight is zero.
pub fn hanning_kernel(n: usize) -> InletResult<Array1<FloatValue>> {
    if n == 0 {
        return Err(InletError::InvalidKernelLength(n));
    }

    let step = 2.0 * PI / (n + 1) as FloatValue;
    let raw = Array1::from_shape_fn(n, |i| {
        let x = -PI + step * (i + 1) as FloatValue;
        (1.0 + x.cos()) / 2.0
    });
    let total = raw.sum();
    Ok(raw / total)
}

/// The 71 weights of the Godin 24-24-25 filter.
pub fn godin_kernel() -> Array1<FloatValue> {
    let scale = 0.5 / (24.0 * 24.0 * 25.0);
    let centre = GODIN_LENGTH / 2;
    let mut weights = Array1::zeros(GODIN_LENGTH);

    for k in 0..12 {
        let kf = k as FloatValue;
        weights[centre + k] =
            scale * (1200.0 - (12.0 - kf) * (13.0 - kf) - (12.0 + kf) * (13.0 + kf));
    }
    for k in 12..36 {
        let kf = k as FloatValue;
        weights[centre + k] = scale * (36.0 - kf) * (37.0 - kf);
    }
    for i in 0..centre {
        weights[i] = weights[GODIN_LENGTH - 1 - i];
    }
    weights
}

/// Discrete convolution returning the central part with the length of `x`.
///
/// Values outside the record count as zero. A NaN sample contaminates every
/// output it contributes to.
fn convolve_same(x: ArrayView1<FloatValue>, kernel: ArrayView1<FloatValue>) -> Array1<FloatValue> {
    let n = x.len();
    let m = kernel.len();
    if n == 0 || m == 0 {
        return Array1::zeros(n);
    }
    let offset = (m - 1) / 2;

    Array1::from_shape_fn(n, |k| {
        let lo = (k + offset + 1).saturating_sub(m);
        let hi = (k + offset).min(n - 1);
        (lo..=hi).map(|i| x[i] * kernel[k + offset - i]).sum()
    })
}

/// A configured lowpass filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowpassFilter {
    pub kind: KernelKind,
    pub length: usize,
    pub padding: EdgePadding,
}

impl Default for LowpassFilter {
    fn default() -> Self {
        Self::hanning(40)
    }
}

impl LowpassFilter {
    pub fn new(kind: KernelKind, length: usize) -> Self {
        Self {
            kind,
            length,
            padding: EdgePadding::default(),
        }
    }

    pub fn hanning(length: usize) -> Self {
        Self::new(KernelKind::Hanning, length)
    }

    /// The Godin filter. Use with hourly data only.
    pub fn godin() -> Self {
        Self::new(KernelKind::Godin, GODIN_LENGTH)
    }

    pub fn with_padding(mut self, padding: EdgePadding) -> Self {
        self.padding = padding;
        self
    }

    pub fn kernel(&self) -> InletResult<Array1<FloatValue>> {
        self.kind.kernel(self.length)
    }

    /// Filter a single series.
    ///
    /// A length of 1 returns the input unchanged for either kernel kind.
    pub fn apply(&self, series: ArrayView1<FloatValue>) -> InletResult<Array1<FloatValue>> {
        if self.length == 1 {
            return Ok(series.to_owned());
        }
        let kernel = self.kernel()?;
        Ok(self.apply_kernel(series, kernel.view()))
    }

    /// Filter every column of `data` independently. Time runs along axis 0.
    pub fn apply_channels(&self, data: ArrayView2<FloatValue>) -> InletResult<Array2<FloatValue>> {
        if self.length == 1 {
            return Ok(data.to_owned());
        }
        let kernel = self.kernel()?;
        let mut smooth = Array2::zeros(data.raw_dim());
        for (channel, mut out) in data
            .axis_iter(Axis(1))
            .zip(smooth.axis_iter_mut(Axis(1)))
        {
            out.assign(&self.apply_kernel(channel, kernel.view()));
        }
        Ok(smooth)
    }

    fn apply_kernel(
        &self,
        series: ArrayView1<FloatValue>,
        kernel: ArrayView1<FloatValue>,
    ) -> Array1<FloatValue> {
        let n = series.len();
        let mut smooth = convolve_same(series, kernel);
        let npad = (kernel.len() / 2).min(n);
        if 2 * npad >= n {
            debug!(
                samples = n,
                kernel = kernel.len(),
                "Series too short for the kernel; every sample is padding"
            );
        }

        for k in (0..npad).chain(n - npad..n) {
            smooth[k] = match self.padding {
                EdgePadding::Nan => FloatValue::NAN,
                EdgePadding::Original => series[k],
            };
        }
        smooth
    }
}

/// Filter `series` with the given kernel, padding the edges with NaN or the
/// original values.
///
/// ```
/// use inletox_core::filter::{lowpass, EdgePadding, KernelKind};
/// use ndarray::Array1;
///
/// let series = Array1::from_elem(100, 2.0);
/// let smooth = lowpass(series.view(), KernelKind::Hanning, 10, EdgePadding::Nan).unwrap();
/// assert!(smooth[0].is_nan());
/// assert!((smooth[50] - 2.0).abs() < 1e-12);
/// ```
pub fn lowpass(
    series: ArrayView1<FloatValue>,
    kind: KernelKind,
    length: usize,
    padding: EdgePadding,
) -> InletResult<Array1<FloatValue>> {
    LowpassFilter::new(kind, length)
        .with_padding(padding)
        .apply(series)
}
