//! Runs every inlet diagnostic over one dataset.

use inletox_budget::budget_error::{BudgetErrorEstimator, BudgetErrorReport};
use inletox_budget::drawdown::{DrawdownAnalyzer, GroupedRates, NetDecreaseSummary};
use inletox_budget::hypoxia::RegionalVolume;
use inletox_budget::monthly::{MonthlyAggregator, MonthlyMeans};
use inletox_budget::regression::{fit_deep_do, RegressionFit};
use inletox_core::errors::{InletError, InletResult};
use inletox_core::parameters::StudyParameters;
use inletox_core::time::LocalTimeConverter;
use inletox_core::timeseries::InletDataset;
use serde::Serialize;
use tracing::info;

/// Build a [`Study`] from parameters and a dataset.
///
/// Parameters default to [`StudyParameters::default`]; the dataset is
/// required.
#[derive(Debug, Default)]
pub struct StudyBuilder {
    parameters: StudyParameters,
    dataset: Option<InletDataset>,
}

impl StudyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parameters(&mut self, parameters: StudyParameters) -> &mut Self {
        self.parameters = parameters;
        self
    }

    /// Load the parameters from a TOML document.
    pub fn with_parameters_toml(&mut self, source: &str) -> InletResult<&mut Self> {
        self.parameters = StudyParameters::from_toml_str(source)?;
        Ok(self)
    }

    pub fn with_dataset(&mut self, dataset: InletDataset) -> &mut Self {
        self.dataset = Some(dataset);
        self
    }

    /// Validate the parameters and check that every roster inlet has records.
    pub fn build(&self) -> InletResult<Study> {
        self.parameters.validate()?;
        let dataset = self
            .dataset
            .clone()
            .ok_or_else(|| InletError::InvalidParameters("no dataset provided".to_string()))?;

        let converter = LocalTimeConverter::new(&self.parameters.timezone)?;

        for inlet in &self.parameters.roster.inlets {
            dataset.deep.table(inlet)?;
            dataset.dimensions(inlet)?;
        }

        Ok(Study {
            parameters: self.parameters.clone(),
            dataset,
            converter,
        })
    }
}

/// One analysis run over a validated dataset.
#[derive(Debug, Clone)]
pub struct Study {
    parameters: StudyParameters,
    dataset: InletDataset,
    converter: LocalTimeConverter,
}

/// Every diagnostic of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudyResults {
    pub monthly: MonthlyMeans,
    pub budget_error: BudgetErrorReport,
    pub drawdown: GroupedRates,
    pub net_decrease: NetDecreaseSummary,
    pub regression: RegressionFit,
}

impl Study {
    pub fn parameters(&self) -> &StudyParameters {
        &self.parameters
    }

    pub fn dataset(&self) -> &InletDataset {
        &self.dataset
    }

    pub fn converter(&self) -> &LocalTimeConverter {
        &self.converter
    }

    /// Regional volume used to express hypoxic volumes as percentages.
    pub fn regional_volume(&self) -> InletResult<RegionalVolume> {
        RegionalVolume::from_parameters(&self.parameters)
    }

    pub fn run(&self) -> InletResult<StudyResults> {
        let parameters = &self.parameters;
        let inlets = &parameters.roster.inlets;
        info!(
            year = parameters.year,
            inlets = inlets.len(),
            days = parameters.month_windows.record_len(),
            timezone = %self.converter.timezone(),
            "Running inlet oxygen study"
        );

        let monthly =
            MonthlyAggregator::from_parameters(parameters)?.compute_monthly_means(&self.dataset, inlets)?;
        info!(months = parameters.month_windows.len(), "Computed monthly means");

        let budget_error =
            BudgetErrorEstimator::from_parameters(parameters).compute_budget_error(&self.dataset, inlets)?;
        info!(
            error_vs_supply_pct = budget_error.bulk_error_vs_supply_pct,
            error_vs_consumption_pct = budget_error.bulk_error_vs_consumption_pct,
            "Computed budget error"
        );

        let analyzer = DrawdownAnalyzer::from_parameters(parameters)?;
        let drawdown = analyzer.group_rates(&self.dataset, &parameters.roster)?;
        let net_decrease = analyzer.net_decrease(&self.dataset, inlets)?;
        info!(
            start = parameters.drawdown.start,
            end = parameters.drawdown.end,
            mean_net_decrease = net_decrease.mean_of_means,
            "Computed drawdown rates"
        );

        let regression = fit_deep_do(&monthly)?;
        info!(rows = regression.rows_used, "Fitted deep layer DO regression");

        Ok(StudyResults {
            monthly,
            budget_error,
            drawdown,
            net_decrease,
            regression,
        })
    }
}
