//! Unit constants for oxygen budget terms.
//!
//! Budget terms arrive as kmol O2 per second. Divided by a layer volume they
//! become kmol O2 m^-3 s^-1, which is reported as mg/L per day.

use crate::timeseries::FloatValue;

pub const SECONDS_PER_DAY: FloatValue = 86_400.0;

/// Molar mass of O2.
/// unit: g / mol
pub const O2_MOLAR_MASS: FloatValue = 32.0;

/// kmol O2 m^-3 s^-1 to mg/L per day.
///
/// 1 kmol m^-3 = 1000 mol m^-3 = 1000 mmol L^-1, times 32 mg/mmol, times
/// 86400 s/day.
pub const KMOL_M3_S_TO_MG_L_DAY: FloatValue = 1000.0 * O2_MOLAR_MASS * SECONDS_PER_DAY;

/// Convert a volume and volume flux into a residence time in days.
///
/// `volume` in m^3, `flow` in m^3/s. A zero flow gives an infinite time and a
/// NaN flow gives NaN.
pub fn residence_time_days(volume: FloatValue, flow: FloatValue) -> FloatValue {
    volume / flow / SECONDS_PER_DAY
}
