pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod knowledge;
pub mod model;
pub mod parsing;
pub mod render;
pub mod report;
pub mod suggest;

use client::PredictionBackend;
use controller::{Controller, SubmitOutcome};
use error::NutriError;
use model::{PredictionResult, SoilType};
use report::Report;

/// One leaf image to diagnose, with the optional context sent alongside it.
#[derive(Debug, Clone)]
pub struct Diagnosis {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub soil_type: Option<SoilType>,
    pub location: Option<String>,
}

/// Main API entry point: run one image through the controller and return
/// the raw prediction with its composed report.
///
/// Service errors come back as `NutriError::Service` with the service's
/// message; every other failure as `NutriError::Transport`.
pub async fn diagnose<B: PredictionBackend>(
    controller: &Controller<B>,
    input: Diagnosis,
) -> Result<(PredictionResult, Report), NutriError> {
    controller.select_file(&input.file_name, input.bytes)?;
    if let Some(soil) = input.soil_type {
        controller.select_soil_type(soil);
    }
    if let Some(ref location) = input.location {
        controller.set_location(location);
    }

    match controller.submit().await? {
        SubmitOutcome::Success { result, report } => Ok((result, *report)),
        SubmitOutcome::ServiceError(message) => Err(NutriError::Service(message)),
        SubmitOutcome::TransportError(message) => Err(NutriError::Transport(message)),
        SubmitOutcome::Superseded => Err(NutriError::Transport(
            "request was superseded by a newer submission".into(),
        )),
    }
}
