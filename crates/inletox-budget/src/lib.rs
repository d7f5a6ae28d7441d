//! Oxygen budget diagnostics for the terminal inlets.
//!
//! Each module reduces the daily per-inlet records of an
//! [`InletDataset`](inletox_core::timeseries::InletDataset) to one family of
//! diagnostics:
//!
//! - `monthly`: monthly means of deep DO, DOin, flushing time and % hypoxic volume
//! - `budget_error`: residual vertical transport relative to supply and consumption
//! - `drawdown`: budget term rates over the summer drawdown, split by oxygen status
//! - `regression`: deep DO regressed on DOin and flushing time
//! - `hypoxia`: regional hypoxic volume from gridded hypoxic thickness

pub mod budget_error;
pub mod drawdown;
pub mod hypoxia;
pub mod monthly;
pub mod regression;

pub use budget_error::{BudgetErrorEstimator, BudgetErrorReport};
pub use drawdown::{DrawdownAnalyzer, GroupedRates, NetDecreaseSummary};
pub use hypoxia::RegionalVolume;
pub use monthly::{MonthlyAggregator, MonthlyMeans};
pub use regression::RegressionFit;
