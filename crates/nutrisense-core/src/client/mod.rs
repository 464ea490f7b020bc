pub mod http;

use crate::error::NutriError;
use crate::model::{CropPrediction, LocationPlants, PredictionResult, SoilType};
use std::future::Future;

/// An image ready to be sent as the `file` part of a multipart body.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// Everything one prediction request carries.
#[derive(Debug, Clone, Default)]
pub struct PredictRequest {
    pub file: Option<ImageUpload>,
    pub location: Option<String>,
    pub soil_type: Option<SoilType>,
}

impl PredictRequest {
    pub fn is_empty(&self) -> bool {
        self.file.is_none() && self.location.as_deref().map_or(true, |l| l.trim().is_empty())
    }
}

/// Trait for prediction service backends.
pub trait PredictionBackend: Send + Sync {
    /// Submit an image and/or location for diagnosis.
    fn predict(
        &self,
        request: PredictRequest,
    ) -> impl Future<Output = Result<PredictionResult, NutriError>> + Send;

    /// Ask which crops suit a location.
    fn predict_crops(
        &self,
        location: &str,
    ) -> impl Future<Output = Result<CropPrediction, NutriError>> + Send;

    /// Locations the service has soil data for.
    fn locations(&self) -> impl Future<Output = Result<Vec<String>, NutriError>> + Send;

    /// Plants known to be grown at each location.
    fn location_plants(&self) -> impl Future<Output = Result<LocationPlants, NutriError>> + Send;

    /// Name of this backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
