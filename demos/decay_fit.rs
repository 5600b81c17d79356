//! Fit an exponential decay the way a lab notebook would.
//!
//! Run with `cargo run --example decay_fit`; set `RUST_LOG=modelfit_rs=debug`
//! (or `trace`) to watch parameter resolution and the solver.

use modelfit_rs::{
    FitArgs, MissingPolicy, Model, ModelFitError, Parameter, Result, Series, Signature,
};
use ndarray::Array1;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logger() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("modelfit_rs=info,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .compact(),
        )
        .init();
}

fn main() {
    init_logger();
    if let Err(err) = run() {
        error!(%err, "decay fit failed");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let model = Model::new(Signature::from_names(&["t", "tau", "N"]), |args| {
        let (tau, n) = (args.param("tau")?, args.param("N")?);
        Ok(args.var("t")?.mapv(|t| n * (-t / tau).exp()))
    })?
    .with_name("decay");

    let t: Array1<f64> = Array1::linspace(0.0, 5.0, 100);
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let noise = Normal::new(0.0, 0.3).map_err(|e| ModelFitError::InvalidArgument(e.to_string()))?;
    let data = t.mapv(|t| 10.0 * (-t / 0.5).exp() + noise.sample(&mut rng));

    // 1. starting values through a parameter table
    let mut params = model.make_params();
    for (name, value) in [("tau", 1.0), ("N", 10.0)] {
        if let Some(param) = params.get_mut(name) {
            param.set_value(value);
        }
    }
    let result = model.fit(data.clone(), FitArgs::new().params(params).arg("t", t.clone()))?;
    println!("{}", result);

    // 2. keyword overrides, one with bounds, plus an argument nobody uses
    let result = model.fit(
        data.clone(),
        FitArgs::new()
            .arg("t", t.clone())
            .arg("N", 10.0)
            .arg("tau", Parameter::with_bounds("tau", 1.0, 0.0, 2.0)?)
            .arg("extra_param", 5.0),
    )?;
    println!("{}", result);

    // 3. forgetting a parameter fails before any solving
    match model.fit(data.clone(), FitArgs::new().arg("t", t.clone()).arg("tau", 1.0)) {
        Err(err) => info!(%err, "expected failure"),
        Ok(_) => info!("unexpected success"),
    }

    // 4. missing observations: raise by default, omit on request
    let mut holed = data.clone();
    holed[10] = f64::NAN;
    holed[40] = f64::NAN;
    let args = FitArgs::new().arg("t", t.clone()).arg("N", 10.0).arg("tau", 1.0);
    if let Err(err) = model.fit(holed.clone(), args.clone()) {
        info!(%err, "raise policy rejected the data");
    }
    let omitting = model.clone().with_missing(MissingPolicy::Omit);
    let result = omitting.fit(holed, args)?;
    println!("{}", result);

    // 5. a shorter observed series fitted against the full time axis
    let labels: Vec<i64> = (0..t.len() as i64).collect();
    let axis = Series::indexed(t.clone(), labels)?;
    let tail: Array1<f64> = data.iter().skip(20).copied().collect();
    let observed = Series::indexed(tail, (20..t.len() as i64).collect())?;
    let result = model.fit(
        observed,
        FitArgs::new().arg("t", axis).arg("N", 10.0).arg("tau", 1.0),
    )?;
    println!("{}", result);

    Ok(())
}
