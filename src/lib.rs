//! Oxygen budget diagnostics for the terminal inlets of Puget Sound.
//!
//! The analyses live in two crates that are re-exported here:
//!
//! - [`inletox_core`]: data model, configuration, filters and time handling
//! - [`inletox_budget`]: monthly means, budget error, drawdown rates, regression
//!   and hypoxic volume
//!
//! [`Study`] runs every diagnostic over one dataset and [`report::render`]
//! formats the results for the console.
//!
//! ```no_run
//! use inletox::{InletDataset, StudyBuilder};
//!
//! # fn main() -> inletox::InletResult<()> {
//! let json = std::fs::read_to_string("inlets.json").map_err(|e| inletox::InletError::Error(e.to_string()))?;
//! let study = StudyBuilder::new()
//!     .with_dataset(InletDataset::from_json_str(&json)?)
//!     .build()?;
//! println!("{}", inletox::report::render(&study.run()?));
//! # Ok(())
//! # }
//! ```

pub mod report;
pub mod study;

pub use inletox_budget;
pub use inletox_core;

pub use inletox_core::errors::{InletError, InletResult};
pub use inletox_core::parameters::StudyParameters;
pub use inletox_core::timeseries::InletDataset;
pub use study::{Study, StudyBuilder, StudyResults};
