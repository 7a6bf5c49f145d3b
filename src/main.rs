//! Diabetes Risk Dashboard - Main Entry Point
//!
//! Runs the pipeline once: load dataset, train both models, predict the
//! first record. Payloads are printed as JSON.
//!
//! Usage: `diabetes-risk [DATASET_PATH_OR_URL]`

use std::process::ExitCode;

use serde::Serialize;

use diabetes_risk_core::api::commands;
use diabetes_risk_core::config::Config;
use diabetes_risk_core::constants::{APP_NAME, APP_VERSION};
use diabetes_risk_core::error::CommandError;
use diabetes_risk_core::logic::model::TrainingPhase;
use diabetes_risk_core::logic::AppState;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} v{}...", APP_NAME, APP_VERSION);

    let config = Config::from_env();
    let source = std::env::args().nth(1);
    let state = AppState::new(config);

    match run(&state, source.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{} ({})", e.message, e.kind);
            ExitCode::FAILURE
        }
    }
}

fn run(state: &AppState, source: Option<&str>) -> Result<(), CommandError> {
    let summary = commands::load_dataset(state, source)?;
    print_json("dataset", &summary);

    let report = commands::train_models_with_progress(state, |phase| match phase {
        TrainingPhase::EpochCompleted { model, epoch, loss } => {
            log::debug!("{} epoch {} loss {:.4}", model.label(), epoch, loss);
        }
        other => log::info!("Training phase: {:?}", other),
    })?;
    print_json("training", &report);

    let first = state
        .dataset()
        .and_then(|d| d.records.first().cloned())
        .ok_or_else(|| CommandError {
            kind: "empty_dataset".to_string(),
            message: "Dataset is empty".to_string(),
        })?;
    let prediction = commands::predict_risk(state, &first)?;
    print_json("prediction", &prediction);
    for scenario in &prediction.what_if {
        log::info!("{}: {}", scenario.title, scenario.display_delta());
    }

    print_json("status", &commands::get_engine_status(state)?);

    Ok(())
}

fn print_json<T: Serialize>(label: &str, payload: &T) {
    match serde_json::to_string_pretty(payload) {
        Ok(json) => println!("{}: {}", label, json),
        Err(e) => log::warn!("Could not serialize {}: {}", label, e),
    }
}
