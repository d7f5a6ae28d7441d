//! Core types for terminal inlet oxygen budgets.
//!
//! - `timeseries`: per-inlet named series and the dataset bundle
//! - `parameters`: inlet roster, month windows, drawdown period
//! - `filter`: Hanning and Godin lowpass filters
//! - `reductions`: NaN-skipping means and medians
//! - `time`: UTC to local time conversion and record time axes

pub mod errors;
pub mod filter;
pub mod parameters;
pub mod quantities;
pub mod reductions;
pub mod time;
pub mod timeseries;
pub mod units;
