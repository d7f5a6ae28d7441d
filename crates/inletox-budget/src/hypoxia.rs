//! Regional hypoxic volume
//!
//! The hypoxic thickness (m) of every grid cell is integrated over the cell
//! areas to give a daily hypoxic volume in km^3. Years are aligned on a
//! 366-day axis so they can be compared day by day.

use inletox_core::errors::{InletError, InletResult};
use inletox_core::parameters::StudyParameters;
use inletox_core::reductions::nanmedian;
use inletox_core::timeseries::FloatValue;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, ArrayView3, Zip};

/// Day index of February 29 on a leap-year axis.
pub const LEAP_DAY_INDEX: usize = 59;

/// Cell areas in km^2 from the inverse grid spacings `pm` and `pn` (1/m).
pub fn cell_area_km2(pm: ArrayView2<FloatValue>, pn: ArrayView2<FloatValue>) -> InletResult<Array2<FloatValue>> {
    if pm.dim() != pn.dim() {
        return Err(InletError::InvalidParameters(format!(
            "grid metric shapes differ: pm {:?}, pn {:?}",
            pm.dim(),
            pn.dim()
        )));
    }
    Ok(Zip::from(&pm)
        .and(&pn)
        .map_collect(|m, n| (1.0 / m) * (1.0 / n) / 1.0e6))
}

/// Daily hypoxic volume in km^3.
///
/// `thickness` is time x eta x xi in metres. A NaN cell (e.g. land) makes
/// the whole day NaN.
pub fn hypoxic_volume_km3(
    thickness: ArrayView3<FloatValue>,
    cell_area: ArrayView2<FloatValue>,
) -> InletResult<Array1<FloatValue>> {
    let (_, eta, xi) = thickness.dim();
    if (eta, xi) != cell_area.dim() {
        return Err(InletError::InvalidParameters(format!(
            "hypoxic thickness grid {:?} does not match cell areas {:?}",
            (eta, xi),
            cell_area.dim()
        )));
    }

    Ok(thickness
        .outer_iter()
        .map(|day| (&day * &cell_area).sum() / 1000.0)
        .collect())
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Insert a NaN for February 29 into the record of a non-leap year.
///
/// Leap years are returned unchanged.
pub fn align_to_leap_year(series: ArrayView1<FloatValue>, year: i32) -> Array1<FloatValue> {
    if is_leap_year(year) || series.len() < LEAP_DAY_INDEX {
        return series.to_owned();
    }
    series
        .iter()
        .take(LEAP_DAY_INDEX)
        .copied()
        .chain(std::iter::once(FloatValue::NAN))
        .chain(series.iter().skip(LEAP_DAY_INDEX).copied())
        .collect()
}

/// Expresses hypoxic volumes relative to the whole region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionalVolume {
    /// unit: km^3
    total_km3: FloatValue,
}

impl RegionalVolume {
    pub fn new(total_km3: FloatValue) -> InletResult<Self> {
        if total_km3.is_nan() || total_km3 <= 0.0 {
            return Err(InletError::InvalidParameters(format!(
                "regional volume must be positive, got {total_km3}"
            )));
        }
        Ok(Self { total_km3 })
    }

    pub fn from_parameters(parameters: &StudyParameters) -> InletResult<Self> {
        Self::new(parameters.regional_volume_km3)
    }

    pub fn total_km3(&self) -> FloatValue {
        self.total_km3
    }

    /// Daily hypoxic volume as a percentage of the regional volume.
    pub fn percent(&self, volume_km3: ArrayView1<FloatValue>) -> Array1<FloatValue> {
        volume_km3.mapv(|v| v / self.total_km3 * 100.0)
    }
}

/// Day-wise median across years, ignoring NaN.
///
/// Days without any valid year are NaN.
pub fn median_across_years(years: &[Array1<FloatValue>]) -> InletResult<Array1<FloatValue>> {
    let first = years
        .first()
        .ok_or_else(|| InletError::InsufficientData("no yearly records to combine".to_string()))?;
    let days = first.len();
    if let Some(other) = years.iter().find(|y| y.len() != days) {
        return Err(InletError::LengthMismatch {
            name: "yearly hypoxic volume".to_string(),
            expected: days,
            actual: other.len(),
        });
    }

    Ok((0..days)
        .map(|day| nanmedian(years.iter().map(|y| y[day])).unwrap_or(FloatValue::NAN))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{Array1, Array3};

    #[test]
    fn test_cell_area() {
        let pm = Array2::from_elem((2, 2), 1.0 / 500.0);
        let pn = Array2::from_elem((2, 2), 1.0 / 200.0);
        let area = cell_area_km2(pm.view(), pn.view()).unwrap();
        assert_relative_eq!(area[[1, 1]], 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_volume_sums_cells() {
        let area = Array2::from_elem((2, 3), 0.5);
        let mut thickness = Array3::from_elem((2, 2, 3), 2.0);
        thickness[[1, 0, 0]] = f64::NAN;

        let volume = hypoxic_volume_km3(thickness.view(), area.view()).unwrap();
        // 6 cells * 2 m / 1000 * 0.5 km^2
        assert_relative_eq!(volume[0], 0.006);
        assert!(volume[1].is_nan());
    }

    #[test]
    fn test_volume_grid_mismatch() {
        let area = Array2::from_elem((3, 3), 0.5);
        let thickness = Array3::from_elem((1, 2, 3), 2.0);
        assert!(hypoxic_volume_km3(thickness.view(), area.view()).is_err());
    }

    #[test]
    fn test_leap_day_alignment() {
        let series = Array1::from_shape_fn(365, |d| d as f64);
        let aligned = align_to_leap_year(series.view(), 2017);
        assert_eq!(aligned.len(), 366);
        assert_eq!(aligned[58], 58.0);
        assert!(aligned[59].is_nan());
        assert_eq!(aligned[60], 59.0);
        assert_eq!(aligned[365], 364.0);

        let leap = Array1::from_shape_fn(366, |d| d as f64);
        assert_eq!(align_to_leap_year(leap.view(), 2016), leap);
        assert!(!is_leap_year(1900));
        assert!(is_leap_year(2000));
    }

    #[test]
    fn test_percent_of_regional_volume() {
        let region = RegionalVolume::from_parameters(&StudyParameters::default()).unwrap();
        assert_eq!(region.total_km3(), 195.2716230839466);

        let volume = Array1::from(vec![19.527_162_308_394_66, 0.0, f64::NAN]);
        let percent = region.percent(volume.view());
        assert_relative_eq!(percent[0], 10.0, epsilon = 1e-12);
        assert_eq!(percent[1], 0.0);
        assert!(percent[2].is_nan());

        let mut parameters = StudyParameters::default();
        parameters.regional_volume_km3 = 19.527_162_308_394_66;
        let region = RegionalVolume::from_parameters(&parameters).unwrap();
        assert_relative_eq!(region.percent(volume.view())[0], 100.0, epsilon = 1e-12);

        assert!(RegionalVolume::new(0.0).is_err());
        assert!(RegionalVolume::new(f64::NAN).is_err());
    }

    #[test]
    fn test_median_across_years() {
        let years = vec![
            Array1::from(vec![1.0, f64::NAN, f64::NAN]),
            Array1::from(vec![3.0, 2.0, f64::NAN]),
            Array1::from(vec![2.0, 4.0, f64::NAN]),
        ];
        let median = median_across_years(&years).unwrap();
        assert_eq!(median[0], 2.0);
        assert_eq!(median[1], 3.0);
        assert!(median[2].is_nan());

        assert!(median_across_years(&[]).is_err());
        let ragged = vec![Array1::from(vec![1.0]), Array1::from(vec![1.0, 2.0])];
        assert!(matches!(
            median_across_years(&ragged).unwrap_err(),
            InletError::LengthMismatch { .. }
        ));
    }
}
