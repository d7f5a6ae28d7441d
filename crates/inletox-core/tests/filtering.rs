//! Filter behaviour on synthetic tidal and daily records.

use approx::assert_abs_diff_eq;
use inletox_core::filter::{lowpass, EdgePadding, KernelKind, LowpassFilter, GODIN_LENGTH};
use ndarray::{Array1, Array2};
use std::f64::consts::PI;

/// Hourly record of a constant plus the M2, K1 and O1 tidal constituents.
fn tidal_record(hours: usize, mean: f64) -> Array1<f64> {
    Array1::from_shape_fn(hours, |t| {
        let t = t as f64;
        mean + 0.8 * (2.0 * PI * t / 12.42).sin()
            + 0.5 * (2.0 * PI * t / 23.93).sin()
            + 0.3 * (2.0 * PI * t / 25.82).sin()
    })
}

#[test]
fn test_godin_removes_tides() {
    let hours = 24 * 30;
    let record = tidal_record(hours, 5.0);
    let smooth = LowpassFilter::godin().apply(record.view()).unwrap();

    let npad = GODIN_LENGTH / 2;
    for t in npad..hours - npad {
        assert_abs_diff_eq!(smooth[t], 5.0, epsilon = 1e-3);
    }
    assert!(smooth[npad - 1].is_nan());
    assert!(smooth[hours - npad].is_nan());
}

#[test]
fn test_kernel_kind_from_config_string() {
    let hours = 24 * 10;
    let record = tidal_record(hours, 1.0);
    let kind: KernelKind = "godin".parse().unwrap();
    let smooth = lowpass(record.view(), kind, 40, EdgePadding::Original).unwrap();

    // Godin ignores the requested length: padding follows its 71 weights
    assert_eq!(smooth[34], record[34]);
    assert_eq!(smooth[hours - 35], record[hours - 35]);
    assert_ne!(smooth[35], record[35]);
}

#[test]
fn test_hanning_smooths_daily_inlets_together() {
    let days = 363;
    let inlets = 4;
    let data = Array2::from_shape_fn((days, inlets), |(d, i)| {
        let seasonal = (2.0 * PI * d as f64 / 365.0).cos();
        let noise = if d % 2 == 0 { 0.2 } else { -0.2 };
        6.0 + i as f64 + seasonal + noise
    });

    let filter = LowpassFilter::hanning(30);
    let smooth = filter.apply_channels(data.view()).unwrap();

    for i in 0..inlets {
        let single = filter.apply(data.column(i)).unwrap();
        for d in 15..days - 15 {
            assert_abs_diff_eq!(smooth[[d, i]], single[d], epsilon = 1e-12);
            // The day-to-day alternation is averaged out
            let expected = 6.0 + i as f64 + (2.0 * PI * d as f64 / 365.0).cos();
            assert_abs_diff_eq!(smooth[[d, i]], expected, epsilon = 0.05);
        }
    }
}
