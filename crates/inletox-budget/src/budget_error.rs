//! Deep layer budget error
//!
//! The deep layer budget is closed by the vertical transport terms. The sum of
//! the shallow and deep layer vertical transport does not vanish exactly,
//! and that residual is the error of the budget.
//!
//! # What This Computes
//!
//! For every inlet, with all fluxes divided by the inlet volume and converted
//! to mg/L per day:
//!
//! 1. Annual mean error: shallow + deep `Vertical Transport`
//! 2. Annual mean supply by the exchange flow: deep `TEF Exchange Flow`
//!    (QinDOin)
//! 3. Annual mean deep consumption: deep `Bio Consumption`
//! 4. The ratios error/QinDOin and error/consumption
//!
//! The bulk statistics are the absolute mean of the per-inlet ratios in
//! percent, i.e. a mean of ratios rather than a ratio of means.
//!
//! # Denominators
//!
//! Ratios are not clamped. A zero supply or consumption gives an infinite
//! ratio that carries through to the bulk statistic; these inlets are logged.

use inletox_core::errors::{InletError, InletResult};
use inletox_core::parameters::StudyParameters;
use inletox_core::quantities::{BIO_CONSUMPTION, TEF_EXCHANGE_FLOW, VERTICAL_TRANSPORT};
use inletox_core::reductions::nanmean_or_nan;
use inletox_core::timeseries::{FloatValue, InletDataset};
use inletox_core::units::KMOL_M3_S_TO_MG_L_DAY;
use ndarray::{Array1, ArrayView1};
use serde::Serialize;
use std::fmt;
use tracing::warn;

/// Annual means and error ratios of a single inlet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InletBudgetError {
    pub inlet: String,
    /// Annual mean residual vertical transport
    /// unit: mg/L/day
    pub error: FloatValue,
    /// Annual mean QinDOin
    /// unit: mg/L/day
    pub supply: FloatValue,
    /// Annual mean deep biological consumption
    /// unit: mg/L/day
    pub consumption: FloatValue,
    pub error_vs_supply: FloatValue,
    pub error_vs_consumption: FloatValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetErrorReport {
    pub inlets: Vec<InletBudgetError>,
    /// `|mean(error / QinDOin)| * 100`
    pub bulk_error_vs_supply_pct: FloatValue,
    /// `|mean(error / consumption)| * 100`
    pub bulk_error_vs_consumption_pct: FloatValue,
}

impl BudgetErrorReport {
    pub fn inlet(&self, inlet: &str) -> Option<&InletBudgetError> {
        self.inlets.iter().find(|entry| entry.inlet == inlet)
    }
}

impl fmt::Display for BudgetErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "(annual mean error)/(annual mean QinDOin) [expressed as percentage]"
        )?;
        writeln!(f, "    {:.2}%", self.bulk_error_vs_supply_pct)?;
        writeln!(f)?;
        writeln!(f)?;
        writeln!(
            f,
            "(annual mean error)/(annual mean deep consumption) [expressed as percentage]"
        )?;
        write!(f, "    {:.2}%", self.bulk_error_vs_consumption_pct)
    }
}

/// Estimates the relative error of the deep layer budgets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetErrorEstimator {
    unit_conversion: FloatValue,
}

impl Default for BudgetErrorEstimator {
    fn default() -> Self {
        Self::new(KMOL_M3_S_TO_MG_L_DAY)
    }
}

impl BudgetErrorEstimator {
    pub fn new(unit_conversion: FloatValue) -> Self {
        Self { unit_conversion }
    }

    pub fn from_parameters(parameters: &StudyParameters) -> Self {
        Self::new(parameters.unit_conversion)
    }

    /// Annual mean of a flux (kmol O2/s) per unit volume in mg/L/day.
    fn volume_mean(&self, flux: ArrayView1<FloatValue>, inlet_volume: FloatValue) -> FloatValue {
        nanmean_or_nan(flux.iter().map(|v| v / inlet_volume * self.unit_conversion))
    }

    /// Residual vertical transport of an inlet, shallow plus deep layer.
    fn residual_transport(&self, dataset: &InletDataset, inlet: &str) -> InletResult<Array1<FloatValue>> {
        let shallow = dataset.shallow.series(inlet, VERTICAL_TRANSPORT)?;
        let deep = dataset.deep.series(inlet, VERTICAL_TRANSPORT)?;
        if shallow.len() != deep.len() {
            return Err(InletError::LengthMismatch {
                name: format!("{inlet}: shallow {VERTICAL_TRANSPORT}"),
                expected: deep.len(),
                actual: shallow.len(),
            });
        }
        Ok(&shallow + &deep)
    }

    pub fn inlet_error(&self, dataset: &InletDataset, inlet: &str) -> InletResult<InletBudgetError> {
        let volume = dataset.dimensions(inlet)?.inlet_volume;

        let error = self.volume_mean(self.residual_transport(dataset, inlet)?.view(), volume);
        let supply = self.volume_mean(dataset.deep.series(inlet, TEF_EXCHANGE_FLOW)?, volume);
        let consumption = self.volume_mean(dataset.deep.series(inlet, BIO_CONSUMPTION)?, volume);

        let error_vs_supply = error / supply;
        let error_vs_consumption = error / consumption;
        if !error_vs_supply.is_finite() || !error_vs_consumption.is_finite() {
            warn!(
                inlet,
                supply, consumption, "Budget error ratio is not finite for this inlet"
            );
        }

        Ok(InletBudgetError {
            inlet: inlet.to_string(),
            error,
            supply,
            consumption,
            error_vs_supply,
            error_vs_consumption,
        })
    }

    /// Compute the budget error of every inlet and the bulk percentages.
    pub fn compute_budget_error(
        &self,
        dataset: &InletDataset,
        inlets: &[String],
    ) -> InletResult<BudgetErrorReport> {
        let entries = inlets
            .iter()
            .map(|inlet| self.inlet_error(dataset, inlet))
            .collect::<InletResult<Vec<_>>>()?;

        let bulk_error_vs_supply_pct =
            nanmean_or_nan(entries.iter().map(|e| e.error_vs_supply)).abs() * 100.0;
        let bulk_error_vs_consumption_pct =
            nanmean_or_nan(entries.iter().map(|e| e.error_vs_consumption)).abs() * 100.0;

        Ok(BudgetErrorReport {
            inlets: entries,
            bulk_error_vs_supply_pct,
            bulk_error_vs_consumption_pct,
        })
    }
}
