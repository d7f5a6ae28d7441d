//! Budget rates during the summer drawdown
//!
//! Between mid-June and mid-August deep layer oxygen drops in every inlet.
//! This module reduces each deep layer budget term over that period to a
//! single volume-normalised rate in mg/L per day and compares the rates of
//! the hypoxic and oxygenated inlets.
//!
//! # Rates
//!
//! For a term $F$ (kmol O2/s) and the daily deep layer volume $V$ (m^3):
//!
//! $$r = \overline{\left(\frac{F_d}{V_d}\right)} \cdot k$$
//!
//! where the mean skips missing days and $k$ converts kmol/m^3/s to mg/L/day.
//!
//! # Combined terms
//!
//! `Exchange Flow & Vertical` and `Photosynthesis & Consumption` are read
//! from the records when present. Otherwise they are the daily sum of their
//! two components.

use inletox_core::errors::{InletError, InletResult};
use inletox_core::parameters::{DrawdownWindow, InletRoster, OxygenStatus, StudyParameters};
use inletox_core::quantities::{
    BIOLOGICAL_NET, BIO_CONSUMPTION, PHOTOSYNTHESIS, PHYSICAL_TRANSPORT, STORAGE,
    TEF_EXCHANGE_FLOW, VERTICAL_TRANSPORT, VOLUME,
};
use inletox_core::reductions::nanmean_or_nan;
use inletox_core::timeseries::{FloatValue, InletDataset, QuantityTable};
use inletox_core::units::KMOL_M3_S_TO_MG_L_DAY;
use ndarray::{s, Array1, ArrayView1, Zip};
use serde::Serialize;
use std::collections::BTreeMap;

/// Deep layer budget terms reduced over the drawdown period.
pub const BUDGET_TERMS: [&str; 7] = [
    TEF_EXCHANGE_FLOW,
    VERTICAL_TRANSPORT,
    PHOTOSYNTHESIS,
    BIO_CONSUMPTION,
    STORAGE,
    PHYSICAL_TRANSPORT,
    BIOLOGICAL_NET,
];

/// Components of a combined term, if `term` is one.
fn components(term: &str) -> Option<(&'static str, &'static str)> {
    match term {
        PHYSICAL_TRANSPORT => Some((TEF_EXCHANGE_FLOW, VERTICAL_TRANSPORT)),
        BIOLOGICAL_NET => Some((PHOTOSYNTHESIS, BIO_CONSUMPTION)),
        _ => None,
    }
}

fn missing(inlet: &str, quantity: &str) -> InletError {
    InletError::MissingQuantity {
        inlet: inlet.to_string(),
        quantity: quantity.to_string(),
    }
}

/// Daily series of a budget term, summing the components of combined terms
/// that are not stored.
fn term_series(table: &QuantityTable, inlet: &str, term: &str) -> InletResult<Array1<FloatValue>> {
    if let Some(series) = table.get(term) {
        return Ok(series.to_owned());
    }
    let (first, second) = components(term).ok_or_else(|| missing(inlet, term))?;
    let first = table.get(first).ok_or_else(|| missing(inlet, first))?;
    let second = table.get(second).ok_or_else(|| missing(inlet, second))?;
    if first.len() != second.len() {
        return Err(InletError::LengthMismatch {
            name: format!("{inlet}: {term}"),
            expected: first.len(),
            actual: second.len(),
        });
    }
    Ok(&first + &second)
}

/// Drawdown rates of a single inlet, keyed by term.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InletRates {
    pub inlet: String,
    pub status: OxygenStatus,
    pub rates: BTreeMap<String, FloatValue>,
}

impl InletRates {
    pub fn rate(&self, term: &str) -> Option<FloatValue> {
        self.rates.get(term).copied()
    }
}

/// Per-inlet rates of one term split by oxygen status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupComparison {
    pub term: String,
    pub oxygenated: Vec<FloatValue>,
    pub hypoxic: Vec<FloatValue>,
}

impl GroupComparison {
    pub fn oxygenated_mean(&self) -> FloatValue {
        nanmean_or_nan(self.oxygenated.iter().copied())
    }

    pub fn hypoxic_mean(&self) -> FloatValue {
        nanmean_or_nan(self.hypoxic.iter().copied())
    }

    /// The `(oxygenated, hypoxic)` samples, e.g. for a two-sample test.
    pub fn samples(&self) -> (&[FloatValue], &[FloatValue]) {
        (&self.oxygenated, &self.hypoxic)
    }
}

/// Drawdown rates of every inlet in roster order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedRates {
    pub inlets: Vec<InletRates>,
}

impl GroupedRates {
    pub fn inlet(&self, inlet: &str) -> Option<&InletRates> {
        self.inlets.iter().find(|entry| entry.inlet == inlet)
    }

    /// Rates of `term` for the inlets with the given status.
    pub fn samples(&self, term: &str, status: OxygenStatus) -> Vec<FloatValue> {
        self.inlets
            .iter()
            .filter(|entry| entry.status == status)
            .filter_map(|entry| entry.rate(term))
            .collect()
    }

    pub fn group_mean(&self, term: &str, status: OxygenStatus) -> FloatValue {
        nanmean_or_nan(self.samples(term, status))
    }

    pub fn comparison(&self, term: &str) -> GroupComparison {
        GroupComparison {
            term: term.to_string(),
            oxygenated: self.samples(term, OxygenStatus::Oxygenated),
            hypoxic: self.samples(term, OxygenStatus::Hypoxic),
        }
    }
}

/// Daily net oxygen change of one inlet over the drawdown period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InletNetDecrease {
    pub inlet: String,
    /// unit: mg/L/day
    pub daily: Array1<FloatValue>,
    /// unit: mg/L/day
    pub mean: FloatValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetDecreaseSummary {
    pub inlets: Vec<InletNetDecrease>,
    /// Mean of the per-inlet means
    /// unit: mg/L/day
    pub mean_of_means: FloatValue,
}

/// Reduces deep layer budget terms over the drawdown window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawdownAnalyzer {
    window: DrawdownWindow,
    unit_conversion: FloatValue,
}

impl Default for DrawdownAnalyzer {
    fn default() -> Self {
        Self {
            window: DrawdownWindow::default(),
            unit_conversion: KMOL_M3_S_TO_MG_L_DAY,
        }
    }
}

impl DrawdownAnalyzer {
    /// Fails with [`InletError::InvalidParameters`] if the window is empty.
    pub fn new(window: DrawdownWindow, unit_conversion: FloatValue) -> InletResult<Self> {
        window.validate()?;
        Ok(Self {
            window,
            unit_conversion,
        })
    }

    pub fn from_parameters(parameters: &StudyParameters) -> InletResult<Self> {
        Self::new(parameters.drawdown, parameters.unit_conversion)
    }

    pub fn window(&self) -> DrawdownWindow {
        self.window
    }

    fn windowed<'a>(
        &self,
        name: String,
        series: ArrayView1<'a, FloatValue>,
    ) -> InletResult<ArrayView1<'a, FloatValue>> {
        if series.len() < self.window.end {
            return Err(InletError::LengthMismatch {
                name,
                expected: self.window.end,
                actual: series.len(),
            });
        }
        Ok(series.slice_move(s![self.window.range()]))
    }

    /// Daily `term / Volume` in mg/L/day over the window.
    fn daily_rates(
        &self,
        table: &QuantityTable,
        inlet: &str,
        term: &str,
    ) -> InletResult<Array1<FloatValue>> {
        let volume = table.get(VOLUME).ok_or_else(|| missing(inlet, VOLUME))?;
        let volume = self.windowed(format!("{inlet}: {VOLUME}"), volume)?;
        let series = term_series(table, inlet, term)?;
        let series = self.windowed(format!("{inlet}: {term}"), series.view())?;

        Ok(Zip::from(&series)
            .and(&volume)
            .map_collect(|flux, v| flux / v * self.unit_conversion))
    }

    /// Mean rate of one term in mg/L/day.
    pub fn inlet_rate(&self, dataset: &InletDataset, inlet: &str, term: &str) -> InletResult<FloatValue> {
        let table = dataset.deep.table(inlet)?;
        Ok(nanmean_or_nan(self.daily_rates(table, inlet, term)?.iter().copied()))
    }

    /// Mean rates of every term in [`BUDGET_TERMS`].
    pub fn inlet_rates(
        &self,
        dataset: &InletDataset,
        inlet: &str,
        status: OxygenStatus,
    ) -> InletResult<InletRates> {
        let table = dataset.deep.table(inlet)?;
        let rates = BUDGET_TERMS
            .iter()
            .map(|term| {
                let rate = nanmean_or_nan(self.daily_rates(table, inlet, term)?.iter().copied());
                Ok((term.to_string(), rate))
            })
            .collect::<InletResult<BTreeMap<_, _>>>()?;

        Ok(InletRates {
            inlet: inlet.to_string(),
            status,
            rates,
        })
    }

    /// Rates of every roster inlet tagged with its oxygen status.
    pub fn group_rates(&self, dataset: &InletDataset, roster: &InletRoster) -> InletResult<GroupedRates> {
        let inlets = roster
            .inlets
            .iter()
            .map(|inlet| self.inlet_rates(dataset, inlet, roster.status(inlet)))
            .collect::<InletResult<Vec<_>>>()?;
        Ok(GroupedRates { inlets })
    }

    /// Daily net oxygen change `d/dt(DO) / Volume` of every inlet.
    pub fn net_decrease(&self, dataset: &InletDataset, inlets: &[String]) -> InletResult<NetDecreaseSummary> {
        let entries = inlets
            .iter()
            .map(|inlet| {
                let table = dataset.deep.table(inlet)?;
                let daily = self.daily_rates(table, inlet, STORAGE)?;
                let mean = nanmean_or_nan(daily.iter().copied());
                Ok(InletNetDecrease {
                    inlet: inlet.clone(),
                    daily,
                    mean,
                })
            })
            .collect::<InletResult<Vec<_>>>()?;

        let mean_of_means = nanmean_or_nan(entries.iter().map(|e| e.mean));
        Ok(NetDecreaseSummary {
            inlets: entries,
            mean_of_means,
        })
    }
}
