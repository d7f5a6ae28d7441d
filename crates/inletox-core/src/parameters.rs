//! Study configuration
//!
//! The inlet roster, the calendar-month windows, the drawdown period and the
//! unit conversion are all plain data. They live here so the analyses can be
//! run against synthetic rosters and records in tests.

use crate::errors::{InletError, InletResult};
use crate::timeseries::FloatValue;
use crate::units::KMOL_M3_S_TO_MG_L_DAY;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A calendar-month window over the daily record, `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthWindow {
    pub label: String,
    pub start: usize,
    pub end: usize,
}

impl MonthWindow {
    pub fn new(label: &str, start: usize, end: usize) -> Self {
        Self {
            label: label.to_string(),
            start,
            end,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Ordered table of month windows.
///
/// The daily record runs from January 2 to December 30 (363 days) once the
/// timezone shift has trimmed one day at each end. The default boundaries
/// approximate calendar months on that record and ignore leap years.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthWindows(Vec<MonthWindow>);

impl Default for MonthWindows {
    fn default() -> Self {
        Self(vec![
            MonthWindow::new("Jan", 0, 30),
            MonthWindow::new("Feb", 30, 58),
            MonthWindow::new("Mar", 58, 89),
            MonthWindow::new("Apr", 89, 119),
            MonthWindow::new("May", 119, 150),
            MonthWindow::new("Jun", 150, 180),
            MonthWindow::new("Jul", 180, 211),
            MonthWindow::new("Aug", 211, 242),
            MonthWindow::new("Sep", 242, 272),
            MonthWindow::new("Oct", 272, 303),
            MonthWindow::new("Nov", 303, 332),
            MonthWindow::new("Dec", 332, 363),
        ])
    }
}

impl MonthWindows {
    /// Build a table, checking that the windows tile `[0, record_len)`.
    pub fn new(windows: Vec<MonthWindow>) -> InletResult<Self> {
        let table = Self(windows);
        table.validate()?;
        Ok(table)
    }

    /// Windows must be non-empty, start at day 0 and follow each other
    /// without gaps or overlaps.
    pub fn validate(&self) -> InletResult<()> {
        let first = self
            .0
            .first()
            .ok_or_else(|| InletError::InvalidMonthWindows("no windows defined".to_string()))?;
        if first.start != 0 {
            return Err(InletError::InvalidMonthWindows(format!(
                "first window '{}' starts at day {} instead of 0",
                first.label, first.start
            )));
        }

        let mut expected_start = 0;
        for window in &self.0 {
            if window.start != expected_start {
                return Err(InletError::InvalidMonthWindows(format!(
                    "window '{}' starts at day {} but the previous window ends at day {}",
                    window.label, window.start, expected_start
                )));
            }
            if window.is_empty() {
                return Err(InletError::InvalidMonthWindows(format!(
                    "window '{}' is empty ({}..{})",
                    window.label, window.start, window.end
                )));
            }
            expected_start = window.end;
        }
        Ok(())
    }

    /// Number of days covered by the table.
    pub fn record_len(&self) -> usize {
        self.0.last().map(|w| w.end).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MonthWindow> {
        self.0.iter()
    }

    pub fn labels(&self) -> Vec<String> {
        self.0.iter().map(|w| w.label.clone()).collect()
    }
}

impl<'a> IntoIterator for &'a MonthWindows {
    type Item = &'a MonthWindow;
    type IntoIter = std::slice::Iter<'a, MonthWindow>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Day-index window of the summer drawdown period, `[start, end)`.
///
/// Default: June 15 to August 15 (days 164..225 of the record).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawdownWindow {
    pub start: usize,
    pub end: usize,
}

impl Default for DrawdownWindow {
    fn default() -> Self {
        Self {
            start: 164,
            end: 225,
        }
    }
}

impl DrawdownWindow {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Reject windows that cover no days.
    pub fn validate(&self) -> InletResult<()> {
        if self.start >= self.end {
            return Err(InletError::InvalidParameters(format!(
                "drawdown window {}..{} is empty",
                self.start, self.end
            )));
        }
        Ok(())
    }
}

/// Oxygen status of an inlet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OxygenStatus {
    Hypoxic,
    Oxygenated,
}

/// The inlets under study and which of them are hypoxic.
///
/// Every inlet outside the hypoxic subset counts as oxygenated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InletRoster {
    pub inlets: Vec<String>,
    pub hypoxic: Vec<String>,
}

impl Default for InletRoster {
    fn default() -> Self {
        let inlets = [
            "sinclair",
            "quartermaster",
            "dyes",
            "crescent",
            "penn",
            "case",
            "lynchcove",
            "carr",
            "holmes",
            "portsusan",
            "elliott",
            "commencement",
            "dabob",
        ];
        let hypoxic = ["penn", "case", "holmes", "portsusan", "lynchcove", "dabob"];
        Self {
            inlets: inlets.iter().map(|s| s.to_string()).collect(),
            hypoxic: hypoxic.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl InletRoster {
    pub fn new(inlets: Vec<String>, hypoxic: Vec<String>) -> InletResult<Self> {
        let roster = Self { inlets, hypoxic };
        roster.validate()?;
        Ok(roster)
    }

    pub fn status(&self, inlet: &str) -> OxygenStatus {
        if self.is_hypoxic(inlet) {
            OxygenStatus::Hypoxic
        } else {
            OxygenStatus::Oxygenated
        }
    }

    pub fn is_hypoxic(&self, inlet: &str) -> bool {
        self.hypoxic.iter().any(|h| h == inlet)
    }

    pub fn validate(&self) -> InletResult<()> {
        if let Some(stray) = self.hypoxic.iter().find(|h| !self.inlets.contains(h)) {
            return Err(InletError::InvalidParameters(format!(
                "hypoxic inlet '{stray}' is not part of the roster"
            )));
        }
        Ok(())
    }
}

/// Parameters for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyParameters {
    /// Model year of the record.
    ///
    /// Default: 2017
    pub year: i32,

    /// IANA name of the local timezone used to label the record.
    ///
    /// Default: "US/Pacific"
    pub timezone: String,

    /// Conversion from kmol O2 m^-3 s^-1 to mg/L per day.
    ///
    /// Default: 1000 * 32 * 86400
    pub unit_conversion: FloatValue,

    /// Volume of the Puget Sound region with the straits omitted.
    /// unit: km^3
    /// default: 195.2716230839466
    pub regional_volume_km3: FloatValue,

    pub roster: InletRoster,

    pub month_windows: MonthWindows,

    pub drawdown: DrawdownWindow,
}

impl Default for StudyParameters {
    fn default() -> Self {
        Self {
            year: 2017,
            timezone: "US/Pacific".to_string(),
            unit_conversion: KMOL_M3_S_TO_MG_L_DAY,
            regional_volume_km3: 195.2716230839466,
            roster: InletRoster::default(),
            month_windows: MonthWindows::default(),
            drawdown: DrawdownWindow::default(),
        }
    }
}

impl StudyParameters {
    /// Parse parameters from TOML. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> InletResult<Self> {
        let parameters: Self = toml::from_str(source)?;
        parameters.validate()?;
        Ok(parameters)
    }

    pub fn validate(&self) -> InletResult<()> {
        self.month_windows.validate()?;
        self.roster.validate()?;
        self.drawdown.validate()?;

        if self.drawdown.end > self.month_windows.record_len() {
            return Err(InletError::InvalidParameters(format!(
                "drawdown window ends at day {} beyond the {}-day record",
                self.drawdown.end,
                self.month_windows.record_len()
            )));
        }
        if self.regional_volume_km3.is_nan() || self.regional_volume_km3 <= 0.0 {
            return Err(InletError::InvalidParameters(format!(
                "regional volume must be positive, got {}",
                self.regional_volume_km3
            )));
        }
        Ok(())
    }
}
