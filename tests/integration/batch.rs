//! Independent fits of one model on the rayon pool.

use approx::assert_relative_eq;
use modelfit_rs::{FitArgs, ModelFitError, Series};

use crate::test_helpers::{decay_data, decay_model, CountingMinimizer};

#[test]
fn test_fit_batch_keeps_job_order() {
    let counter = CountingMinimizer::default();
    let model = decay_model().with_minimizer(counter.clone());
    let taus = [0.5, 1.0, 2.0, 4.0, 8.0, 16.0];

    let jobs = taus
        .iter()
        .enumerate()
        .map(|(i, &tau)| {
            let (t, data) = decay_data(60, tau, 3.0, 0.0, i as u64);
            (
                Series::from(data),
                FitArgs::new().arg("t", t).arg("N", 1.0).arg("tau", tau * 0.6),
            )
        })
        .collect();

    let results = model.fit_batch(jobs);
    assert_eq!(results.len(), taus.len());
    assert_eq!(counter.calls(), taus.len());
    for (result, &tau) in results.iter().zip(&taus) {
        let result = result.as_ref().unwrap();
        assert_relative_eq!(
            result.params().get("tau").unwrap().value(),
            tau,
            max_relative = 1e-6
        );
    }
}

#[test]
fn test_fit_batch_reports_failures_per_job() {
    let model = decay_model();
    let (t, data) = decay_data(30, 2.0, 3.0, 0.0, 9);
    let jobs = vec![
        (
            Series::from(data.clone()),
            FitArgs::new().arg("t", t.clone()).arg("N", 1.0).arg("tau", 1.0),
        ),
        (Series::from(data), FitArgs::new().arg("t", t).arg("tau", 1.0)),
    ];

    let results = model.fit_batch(jobs);
    assert!(results[0].is_ok());
    assert!(matches!(
        results[1],
        Err(ModelFitError::MissingParameter { ref name }) if name == "N"
    ));
}
