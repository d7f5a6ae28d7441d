//! Diagnostics on small synthetic inlet records.
//!
//! Records are built with the default month windows (363 days) so the
//! monthly and drawdown tables are exercised with their real boundaries.

use approx::assert_abs_diff_eq;
use inletox_budget::budget_error::BudgetErrorEstimator;
use inletox_budget::monthly::{MonthlyAggregator, MonthlyQuantity};
use inletox_budget::regression::fit_deep_do;
use inletox_core::parameters::MonthWindows;
use inletox_core::quantities::{
    BIO_CONSUMPTION, DEEP_LAYER_DO, DO_IN, PERCENT_HYPOXIC_VOLUME, QIN, TEF_EXCHANGE_FLOW,
    VERTICAL_TRANSPORT,
};
use inletox_core::timeseries::{InletDataset, InletDimensions, QuantityTable};
use ndarray::Array1;

const DAYS: usize = 363;

fn constant(value: f64) -> Array1<f64> {
    Array1::from_elem(DAYS, value)
}

fn dataset(inlets: &[&str]) -> InletDataset {
    let mut dataset = InletDataset::new();
    for (i, inlet) in inlets.iter().enumerate() {
        let offset = i as f64;
        dataset.deep.insert(
            inlet,
            QuantityTable::new()
                .with(QIN, constant(1.0))
                .with(VERTICAL_TRANSPORT, constant(-2.0))
                .with(TEF_EXCHANGE_FLOW, constant(4.0 + offset))
                .with(BIO_CONSUMPTION, constant(-3.0)),
        );
        dataset
            .shallow
            .insert(inlet, QuantityTable::new().with(VERTICAL_TRANSPORT, constant(2.0)));
        dataset.concentrations.insert(
            inlet,
            QuantityTable::new()
                .with(DEEP_LAYER_DO, constant(1.0))
                .with(
                    DO_IN,
                    Array1::from_shape_fn(DAYS, |d| 6.0 + offset + (d % 7) as f64),
                )
                .with(PERCENT_HYPOXIC_VOLUME, constant(0.0)),
        );
        dataset.dimensions.insert(
            inlet.to_string(),
            InletDimensions {
                inlet_volume: 100.0,
                mean_depth: 20.0 + offset,
            },
        );
    }
    dataset
}

fn names(inlets: &[&str]) -> Vec<String> {
    inlets.iter().map(|s| s.to_string()).collect()
}

mod monthly {
    use super::*;

    #[test]
    fn test_constant_series_gives_exact_monthly_means() {
        let inlets = ["carr", "dabob"];
        let means = MonthlyAggregator::default()
            .compute_monthly_means(&dataset(&inlets), &names(&inlets))
            .unwrap();

        let deep = means.get(MonthlyQuantity::DeepDo);
        assert_eq!(deep.values().dim(), (2, 12));
        assert!(deep.values().iter().all(|&v| v == 1.0));
        assert_eq!(deep.flattened().len(), 24);
        assert_eq!(deep.months()[11], "Dec");
    }

    #[test]
    fn test_flushing_time_from_volume_and_inflow() {
        let inlets = ["carr"];
        let means = MonthlyAggregator::default()
            .compute_monthly_means(&dataset(&inlets), &names(&inlets))
            .unwrap();

        for value in means.flushing_time.inlet("carr").unwrap() {
            assert_abs_diff_eq!(*value, 100.0 / 86_400.0, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_partial_and_empty_months() {
        let inlets = ["carr"];
        let mut dataset = dataset(&inlets);
        let mut deep_do = Array1::from_elem(DAYS, f64::NAN);
        // January: two valid days
        deep_do[3] = 2.0;
        deep_do[10] = 4.0;
        // February stays empty
        for day in 58..89 {
            deep_do[day] = 5.0;
        }
        dataset.concentrations.insert(
            "carr",
            QuantityTable::new()
                .with(DEEP_LAYER_DO, deep_do)
                .with(DO_IN, constant(6.0))
                .with(PERCENT_HYPOXIC_VOLUME, constant(0.0)),
        );

        let means = MonthlyAggregator::default()
            .compute_monthly_means(&dataset, &names(&inlets))
            .unwrap();
        let carr = means.deep_do.inlet("carr").unwrap();
        assert_eq!(carr[0], 3.0);
        assert!(carr[1].is_nan());
        assert_eq!(carr[2], 5.0);
    }

    #[test]
    fn test_month_windows_partition_record() {
        let windows = MonthWindows::default();
        let lengths: usize = windows.iter().map(|w| w.len()).sum();
        assert_eq!(lengths, DAYS);
        assert_eq!(windows.record_len(), DAYS);
    }
}

mod budget_error {
    use super::*;

    #[test]
    fn test_balanced_vertical_transport_has_no_error() {
        let inlets = ["carr", "dabob", "case"];
        let report = BudgetErrorEstimator::default()
            .compute_budget_error(&dataset(&inlets), &names(&inlets))
            .unwrap();

        assert_eq!(report.bulk_error_vs_supply_pct, 0.0);
        assert_eq!(report.bulk_error_vs_consumption_pct, 0.0);
        assert_eq!(report.inlets.len(), 3);
    }

    #[test]
    fn test_bulk_error_is_mean_of_ratios() {
        let inlets = ["carr", "dabob"];
        let mut dataset = dataset(&inlets);
        // Residual of 1 in both inlets; supply 4 and 5
        for inlet in inlets {
            dataset
                .shallow
                .insert(inlet, QuantityTable::new().with(VERTICAL_TRANSPORT, constant(3.0)));
        }
        let report = BudgetErrorEstimator::new(1.0)
            .compute_budget_error(&dataset, &names(&inlets))
            .unwrap();

        let expected = (1.0 / 4.0 + 1.0 / 5.0) / 2.0 * 100.0;
        assert_abs_diff_eq!(report.bulk_error_vs_supply_pct, expected, epsilon = 1e-9);
        assert_abs_diff_eq!(report.bulk_error_vs_consumption_pct, 100.0 / 3.0, epsilon = 1e-9);
        assert!(report.to_string().contains("    22.50%"));
    }
}

mod regression {
    use super::*;

    #[test]
    fn test_fit_on_monthly_means() {
        let inlets = ["carr", "dabob", "case"];
        let mut dataset = dataset(&inlets);
        for (i, inlet) in inlets.iter().enumerate() {
            let do_in = Array1::from_shape_fn(DAYS, |d| 5.0 + i as f64 + (d / 30) as f64 * 0.25);
            let qin = Array1::from_shape_fn(DAYS, |d| 1.0 + ((d / 30) % 3) as f64);
            let deep_do = Array1::from_shape_fn(DAYS, |d| {
                let tflush = 100.0 / qin[d] / 86_400.0;
                0.9 * do_in[d] - 200.0 * tflush + 0.5
            });
            dataset.concentrations.insert(
                inlet,
                QuantityTable::new()
                    .with(DEEP_LAYER_DO, deep_do)
                    .with(DO_IN, do_in)
                    .with(PERCENT_HYPOXIC_VOLUME, constant(0.0)),
            );
            dataset.deep.insert(
                inlet,
                QuantityTable::new()
                    .with(QIN, qin)
                    .with(VERTICAL_TRANSPORT, constant(0.0))
                    .with(TEF_EXCHANGE_FLOW, constant(1.0))
                    .with(BIO_CONSUMPTION, constant(-1.0)),
            );
        }

        let means = MonthlyAggregator::default()
            .compute_monthly_means(&dataset, &names(&inlets))
            .unwrap();
        let fit = fit_deep_do(&means).unwrap();

        assert_eq!(fit.rows_used, 36);
        assert_abs_diff_eq!(fit.fitted_vs_observed.r, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(fit.slope_do_in, 0.9, epsilon = 1e-6);
    }
}
