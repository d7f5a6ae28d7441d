//! Monthly mean diagnostics
//!
//! Reduces the daily per-inlet records to one value per calendar-month window
//! for four quantities:
//!
//! - deep layer DO (mg/L)
//! - DO of the inflowing water (mg/L)
//! - flushing time of the deep layer (days)
//! - percent hypoxic volume (%)
//!
//! # Flushing time
//!
//! Flushing time is derived per day from the inlet volume and the inflowing
//! volume flux of the exchange flow:
//!
//! $$T_{flush} = \frac{V}{Q_{in} \cdot 86400}$$
//!
//! # Missing data
//!
//! Each month is the mean of the samples that are not NaN. A month without a
//! single valid sample yields NaN rather than an error.

use inletox_core::errors::{InletError, InletResult};
use inletox_core::parameters::{MonthWindows, StudyParameters};
use inletox_core::quantities::{DEEP_LAYER_DO, DO_IN, PERCENT_HYPOXIC_VOLUME, QIN};
use inletox_core::reductions::nanmean;
use inletox_core::timeseries::{FloatValue, InletDataset};
use inletox_core::units::residence_time_days;
use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Quantities reduced to monthly means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonthlyQuantity {
    DeepDo,
    InflowDo,
    FlushingTime,
    PercentHypoxicVolume,
}

impl MonthlyQuantity {
    pub fn unit(&self) -> &'static str {
        match self {
            MonthlyQuantity::DeepDo | MonthlyQuantity::InflowDo => "mg/L",
            MonthlyQuantity::FlushingTime => "days",
            MonthlyQuantity::PercentHypoxicVolume => "%",
        }
    }
}

impl fmt::Display for MonthlyQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthlyQuantity::DeepDo => write!(f, "DO_deep"),
            MonthlyQuantity::InflowDo => write!(f, "DO_in"),
            MonthlyQuantity::FlushingTime => write!(f, "T_flush"),
            MonthlyQuantity::PercentHypoxicVolume => write!(f, "% hypoxic volume"),
        }
    }
}

/// Monthly means of one quantity for every inlet.
///
/// Stored as an inlet x month matrix. [`flattened`](Self::flattened) gives
/// the inlet-major sequence used for cross-inlet analyses and
/// [`table`](Self::table) the month x inlet view used to pick out single
/// inlets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyMeanResult {
    quantity: MonthlyQuantity,
    inlets: Vec<String>,
    months: Vec<String>,
    values: Array2<FloatValue>,
}

impl MonthlyMeanResult {
    pub fn quantity(&self) -> MonthlyQuantity {
        self.quantity
    }

    pub fn inlets(&self) -> &[String] {
        &self.inlets
    }

    pub fn months(&self) -> &[String] {
        &self.months
    }

    /// Inlet x month matrix.
    pub fn values(&self) -> ArrayView2<'_, FloatValue> {
        self.values.view()
    }

    /// `[inlet0 month0..11, inlet1 month0..11, ...]`
    pub fn flattened(&self) -> Array1<FloatValue> {
        self.values.iter().copied().collect()
    }

    /// Month x inlet view, one column per inlet.
    pub fn table(&self) -> ArrayView2<'_, FloatValue> {
        self.values.t()
    }

    /// The monthly values of a single inlet.
    pub fn inlet(&self, inlet: &str) -> Option<ArrayView1<'_, FloatValue>> {
        self.inlets
            .iter()
            .position(|name| name == inlet)
            .map(|row| self.values.row(row))
    }

    pub fn get(&self, inlet: &str, month: usize) -> Option<FloatValue> {
        self.inlet(inlet).and_then(|row| row.get(month).copied())
    }
}

/// The four monthly mean diagnostics of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyMeans {
    pub deep_do: MonthlyMeanResult,
    pub inflow_do: MonthlyMeanResult,
    pub flushing_time: MonthlyMeanResult,
    pub percent_hypoxic_volume: MonthlyMeanResult,
}

impl MonthlyMeans {
    pub fn get(&self, quantity: MonthlyQuantity) -> &MonthlyMeanResult {
        match quantity {
            MonthlyQuantity::DeepDo => &self.deep_do,
            MonthlyQuantity::InflowDo => &self.inflow_do,
            MonthlyQuantity::FlushingTime => &self.flushing_time,
            MonthlyQuantity::PercentHypoxicVolume => &self.percent_hypoxic_volume,
        }
    }
}

/// Daily flushing time in days from an inlet volume (m^3) and the inflowing
/// volume flux (m^3/s).
pub fn flushing_time(inlet_volume: FloatValue, qin: ArrayView1<FloatValue>) -> Array1<FloatValue> {
    qin.mapv(|q| residence_time_days(inlet_volume, q))
}

/// Reduces daily records to monthly means over a fixed window table.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyAggregator {
    windows: MonthWindows,
}

impl Default for MonthlyAggregator {
    fn default() -> Self {
        Self {
            windows: MonthWindows::default(),
        }
    }
}

impl MonthlyAggregator {
    pub fn new(windows: MonthWindows) -> InletResult<Self> {
        windows.validate()?;
        Ok(Self { windows })
    }

    pub fn from_parameters(parameters: &StudyParameters) -> InletResult<Self> {
        Self::new(parameters.month_windows.clone())
    }

    pub fn windows(&self) -> &MonthWindows {
        &self.windows
    }

    /// Mean of `series` over every window.
    ///
    /// `name` identifies the series in errors and log messages. The series
    /// must cover the whole window table; extra trailing samples are ignored.
    pub fn window_means(
        &self,
        name: &str,
        series: ArrayView1<FloatValue>,
    ) -> InletResult<Vec<FloatValue>> {
        let required = self.windows.record_len();
        if series.len() < required {
            return Err(InletError::LengthMismatch {
                name: name.to_string(),
                expected: required,
                actual: series.len(),
            });
        }

        Ok(self
            .windows
            .iter()
            .map(|window| {
                let days = series.slice(s![window.range()]);
                nanmean(days.iter().copied()).unwrap_or_else(|| {
                    debug!(
                        series = name,
                        month = %window.label,
                        "No valid samples in month window"
                    );
                    FloatValue::NAN
                })
            })
            .collect())
    }

    fn reduce<F>(
        &self,
        quantity: MonthlyQuantity,
        inlets: &[String],
        mut daily: F,
    ) -> InletResult<MonthlyMeanResult>
    where
        F: FnMut(&str) -> InletResult<(String, Array1<FloatValue>)>,
    {
        let mut values = Array2::from_elem((inlets.len(), self.windows.len()), FloatValue::NAN);
        for (row, inlet) in inlets.iter().enumerate() {
            let (name, series) = daily(inlet)?;
            let means = self.window_means(&name, series.view())?;
            for (column, mean) in means.into_iter().enumerate() {
                values[[row, column]] = mean;
            }
        }

        Ok(MonthlyMeanResult {
            quantity,
            inlets: inlets.to_vec(),
            months: self.windows.labels(),
            values,
        })
    }

    /// Monthly mean of a single stored DO concentration quantity.
    fn concentration_means(
        &self,
        dataset: &InletDataset,
        inlets: &[String],
        quantity: MonthlyQuantity,
        name: &str,
    ) -> InletResult<MonthlyMeanResult> {
        self.reduce(quantity, inlets, |inlet| {
            let series = dataset.concentrations.series(inlet, name)?;
            Ok((format!("{inlet}: {name}"), series.to_owned()))
        })
    }

    /// Monthly mean flushing time of every inlet.
    pub fn flushing_time_means(
        &self,
        dataset: &InletDataset,
        inlets: &[String],
    ) -> InletResult<MonthlyMeanResult> {
        self.reduce(MonthlyQuantity::FlushingTime, inlets, |inlet| {
            let volume = dataset.dimensions(inlet)?.inlet_volume;
            let qin = dataset.deep.series(inlet, QIN)?;
            Ok((format!("{inlet}: {QIN}"), flushing_time(volume, qin)))
        })
    }

    /// Compute all four monthly mean diagnostics for `inlets`.
    pub fn compute_monthly_means(
        &self,
        dataset: &InletDataset,
        inlets: &[String],
    ) -> InletResult<MonthlyMeans> {
        Ok(MonthlyMeans {
            deep_do: self.concentration_means(
                dataset,
                inlets,
                MonthlyQuantity::DeepDo,
                DEEP_LAYER_DO,
            )?,
            inflow_do: self.concentration_means(dataset, inlets, MonthlyQuantity::InflowDo, DO_IN)?,
            flushing_time: self.flushing_time_means(dataset, inlets)?,
            percent_hypoxic_volume: self.concentration_means(
                dataset,
                inlets,
                MonthlyQuantity::PercentHypoxicVolume,
                PERCENT_HYPOXIC_VOLUME,
            )?,
        })
    }
}
