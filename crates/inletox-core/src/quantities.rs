//! Names of the quantities stored per inlet.
//!
//! The names match the column labels of the model output, so datasets
//! exported from the model post-processing can be read without renaming.
//!
//! # Layer budget terms (kmol O2 / s)
//! - [`TEF_EXCHANGE_FLOW`] - advective supply through the total exchange flow
//! - [`VERTICAL_TRANSPORT`] - flux between the shallow and deep layer
//! - [`PHOTOSYNTHESIS`] - biological production
//! - [`BIO_CONSUMPTION`] - biological consumption
//! - [`STORAGE`] - rate of change of the layer oxygen inventory
//!
//! # Layer geometry
//! - [`VOLUME`] - layer volume (m3)
//! - [`QIN`] - inflowing volume flux of the exchange flow (m3 / s)
//!
//! # Concentrations
//! - [`DEEP_LAYER_DO`] - mean deep layer dissolved oxygen (mg / L)
//! - [`DO_IN`] - dissolved oxygen of the inflowing water (mg / L)
//! - [`PERCENT_HYPOXIC_VOLUME`] - share of the inlet volume below the hypoxia threshold (%)

pub const TEF_EXCHANGE_FLOW: &str = "TEF Exchange Flow";
pub const VERTICAL_TRANSPORT: &str = "Vertical Transport";
pub const PHOTOSYNTHESIS: &str = "Photosynthesis";
pub const BIO_CONSUMPTION: &str = "Bio Consumption";
pub const STORAGE: &str = "d/dt(DO)";

/// Exchange flow plus vertical transport.
pub const PHYSICAL_TRANSPORT: &str = "Exchange Flow & Vertical";
/// Photosynthesis plus consumption.
pub const BIOLOGICAL_NET: &str = "Photosynthesis & Consumption";

pub const VOLUME: &str = "Volume";
pub const QIN: &str = "Qin m3/s";

pub const DEEP_LAYER_DO: &str = "Deep Layer DO";
pub const DO_IN: &str = "DOin";
pub const PERCENT_HYPOXIC_VOLUME: &str = "percent hypoxic volume";
