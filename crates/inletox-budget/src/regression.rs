//! Multiple linear regression of deep layer DO
//!
//! Explains the monthly mean deep layer DO of all inlets by the DO of the
//! inflowing water and the flushing time:
//!
//! $$DO_{deep} = a \cdot DO_{in} + b \cdot T_{flush} + c$$
//!
//! The coefficients are the least-squares solution computed through a
//! singular value decomposition, which also gives the minimum-norm solution
//! when the predictors are collinear.
//!
//! Along with the fit three Pearson correlations are reported:
//!
//! - DO_deep against DO_in
//! - (DO_in - DO_deep) against T_flush
//! - DO_deep against the fitted DO_deep
//!
//! Significance levels are left to external statistics packages.

use crate::monthly::MonthlyMeans;
use inletox_core::errors::{InletError, InletResult};
use inletox_core::timeseries::FloatValue;
use nalgebra::{DMatrix, DVector};
use ndarray::ArrayView1;
use serde::Serialize;
use std::fmt;
use tracing::warn;

/// Pearson correlation of two samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Correlation {
    pub r: FloatValue,
    pub r_squared: FloatValue,
    /// Number of paired samples
    pub n: usize,
}

impl fmt::Display for Correlation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "   r = {:.3}", self.r)?;
        write!(f, "   R^2 = {:.3}", self.r_squared)
    }
}

/// Pearson correlation coefficient of `x` and `y`.
///
/// Undefined correlations are NaN: samples of unequal length, fewer than two
/// pairs, or a sample without variance.
pub fn pearson(x: &[FloatValue], y: &[FloatValue]) -> Correlation {
    let n = x.len();
    if n != y.len() {
        warn!(x = n, y = y.len(), "Correlated samples differ in length");
        return Correlation {
            r: FloatValue::NAN,
            r_squared: FloatValue::NAN,
            n: 0,
        };
    }
    if n < 2 {
        return Correlation {
            r: FloatValue::NAN,
            r_squared: FloatValue::NAN,
            n,
        };
    }

    let mean_x = x.iter().sum::<FloatValue>() / n as FloatValue;
    let mean_y = y.iter().sum::<FloatValue>() / n as FloatValue;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let r = if sxx == 0.0 || syy == 0.0 {
        FloatValue::NAN
    } else {
        (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
    };
    Correlation {
        r,
        r_squared: r * r,
        n,
    }
}

/// Result of the deep layer DO regression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionFit {
    /// unit: 1
    pub slope_do_in: FloatValue,
    /// unit: mg/L/day
    pub slope_flushing_time: FloatValue,
    /// unit: mg/L
    pub intercept: FloatValue,
    pub rows_used: usize,
    pub rows_dropped: usize,
    pub deep_vs_inflow: Correlation,
    pub deficit_vs_flushing: Correlation,
    pub fitted_vs_observed: Correlation,
}

impl RegressionFit {
    pub fn predict(&self, do_in: FloatValue, flushing_time: FloatValue) -> FloatValue {
        self.slope_do_in * do_in + self.slope_flushing_time * flushing_time + self.intercept
    }
}

impl fmt::Display for RegressionFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DO_deep dependence on DO_in")?;
        writeln!(f, "{}", self.deep_vs_inflow)?;
        writeln!(f)?;
        writeln!(f, "(DO_in - DO_deep) dependence on T_flush")?;
        writeln!(f, "{}", self.deficit_vs_flushing)?;
        writeln!(f)?;
        writeln!(
            f,
            "Mean deep layer DO [mg/L] = {:.2}*DOin + {:.2}*Tflush + {:.2}",
            self.slope_do_in, self.slope_flushing_time, self.intercept
        )?;
        writeln!(f)?;
        writeln!(f, "DO_deep dependence on DO_in and T_flush")?;
        write!(f, "{}", self.fitted_vs_observed)
    }
}

/// Fit the regression to the flattened monthly means of every inlet.
pub fn fit_deep_do(monthly: &MonthlyMeans) -> InletResult<RegressionFit> {
    fit_deep_do_arrays(
        monthly.deep_do.flattened().view(),
        monthly.inflow_do.flattened().view(),
        monthly.flushing_time.flattened().view(),
    )
}

/// Fit `deep = a * inflow + b * flushing_time + c`.
///
/// Rows where any of the three values is NaN or infinite are dropped. At
/// least three complete rows are required.
pub fn fit_deep_do_arrays(
    deep: ArrayView1<FloatValue>,
    inflow: ArrayView1<FloatValue>,
    flushing_time: ArrayView1<FloatValue>,
) -> InletResult<RegressionFit> {
    let total = deep.len();
    if inflow.len() != total || flushing_time.len() != total {
        return Err(InletError::LengthMismatch {
            name: "regression predictors".to_string(),
            expected: total,
            actual: inflow.len().min(flushing_time.len()),
        });
    }

    let rows: Vec<(FloatValue, FloatValue, FloatValue)> = deep
        .iter()
        .zip(inflow.iter())
        .zip(flushing_time.iter())
        .map(|((d, i), t)| (*d, *i, *t))
        .filter(|(d, i, t)| d.is_finite() && i.is_finite() && t.is_finite())
        .collect();

    let n = rows.len();
    let rows_dropped = total - n;
    if rows_dropped > 0 {
        warn!(
            dropped = rows_dropped,
            total, "Dropping incomplete rows from the regression"
        );
    }
    if n < 3 {
        return Err(InletError::InsufficientData(format!(
            "the regression needs at least 3 complete rows, got {n}"
        )));
    }

    let design = DMatrix::from_fn(n, 3, |row, column| match column {
        0 => rows[row].1,
        1 => rows[row].2,
        _ => 1.0,
    });
    let target = DVector::from_iterator(n, rows.iter().map(|r| r.0));

    let svd = design.svd(true, true);
    let tolerance = FloatValue::EPSILON * n as FloatValue * svd.singular_values.max();
    let coefficients = svd
        .solve(&target, tolerance)
        .map_err(|e| InletError::Error(format!("least-squares solve failed: {e}")))?;

    let slope_do_in = coefficients[0];
    let slope_flushing_time = coefficients[1];
    let intercept = coefficients[2];

    let observed: Vec<FloatValue> = rows.iter().map(|r| r.0).collect();
    let do_in: Vec<FloatValue> = rows.iter().map(|r| r.1).collect();
    let tflush: Vec<FloatValue> = rows.iter().map(|r| r.2).collect();
    let deficit: Vec<FloatValue> = rows.iter().map(|r| r.1 - r.0).collect();
    let fitted: Vec<FloatValue> = rows
        .iter()
        .map(|r| slope_do_in * r.1 + slope_flushing_time * r.2 + intercept)
        .collect();

    Ok(RegressionFit {
        slope_do_in,
        slope_flushing_time,
        intercept,
        rows_used: n,
        rows_dropped,
        deep_vs_inflow: pearson(&do_in, &observed),
        deficit_vs_flushing: pearson(&tflush, &deficit),
        fitted_vs_observed: pearson(&observed, &fitted),
    })
}
