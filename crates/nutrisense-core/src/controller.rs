//! Upload-and-predict flow: file selection, submission and view state.

use crate::client::{ImageUpload, PredictRequest, PredictionBackend};
use crate::error::NutriError;
use crate::knowledge::schema::AgronomyTable;
use crate::model::{PredictionResult, SoilType};
use crate::report::{compose_report, Report};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::ImageFormat;
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Message shown for every failure that is not reported by the service itself.
pub const TRANSPORT_ERROR_MESSAGE: &str = "Error processing image. Please try again.";

const PREVIEW_SIZE: u32 = 256;

/// What the user has picked so far. Lives in memory only.
#[derive(Debug, Clone, Default)]
pub struct UploadState {
    pub file: Option<ImageUpload>,
    /// `data:image/png;base64,...` thumbnail of the selected file.
    pub preview_url: Option<String>,
    pub soil_type: Option<SoilType>,
    pub location: Option<String>,
}

#[derive(Debug, Clone)]
pub enum ViewState {
    Idle,
    Loading { token: u64 },
    Results(Box<Report>),
    Error(String),
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading { .. })
    }
}

#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    Success {
        result: PredictionResult,
        report: Box<Report>,
    },
    /// The service answered with an `error` field.
    ServiceError(String),
    /// The request failed or the response was unusable.
    TransportError(String),
    /// A later submission was issued before this one settled.
    Superseded,
}

pub struct Controller<B: PredictionBackend> {
    backend: B,
    table: Arc<AgronomyTable>,
    max_upload_bytes: usize,
    state: Mutex<UploadState>,
    view: Mutex<ViewState>,
    sequence: AtomicU64,
}

impl<B: PredictionBackend> Controller<B> {
    pub fn new(backend: B, table: Arc<AgronomyTable>, max_upload_bytes: usize) -> Self {
        Self {
            backend,
            table,
            max_upload_bytes,
            state: Mutex::new(UploadState::default()),
            view: Mutex::new(ViewState::Idle),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Accept an image and build its local preview. On any error the
    /// current selection is kept as it was. A request still pending for the
    /// previous selection is invalidated.
    pub fn select_file(&self, name: &str, bytes: Vec<u8>) -> Result<(), NutriError> {
        let mime = mime_for(name)?;
        if bytes.len() > self.max_upload_bytes {
            return Err(NutriError::FileTooLarge {
                size: bytes.len(),
                limit: self.max_upload_bytes,
            });
        }
        let preview_url = preview_data_url(&bytes)?;

        info!("selected {name} ({} bytes)", bytes.len());
        self.sequence.fetch_add(1, Ordering::SeqCst);
        *lock(&self.state) = UploadState {
            file: Some(ImageUpload {
                file_name: name.to_string(),
                mime,
                bytes,
            }),
            preview_url: Some(preview_url),
            soil_type: None,
            location: None,
        };
        *lock(&self.view) = ViewState::Idle;
        Ok(())
    }

    /// Drop the selection and hide any results. A pending request is
    /// invalidated.
    pub fn clear_file(&self) {
        self.sequence.fetch_add(1, Ordering::SeqCst);
        *lock(&self.state) = UploadState::default();
        *lock(&self.view) = ViewState::Idle;
        debug!("selection cleared");
    }

    pub fn select_soil_type(&self, soil: SoilType) {
        lock(&self.state).soil_type = Some(soil);
    }

    pub fn set_location(&self, location: &str) {
        let trimmed = location.trim();
        lock(&self.state).location = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    pub fn upload_state(&self) -> UploadState {
        lock(&self.state).clone()
    }

    pub fn view(&self) -> ViewState {
        lock(&self.view).clone()
    }

    /// Send the current selection to the prediction service.
    ///
    /// Returns `Err` only for input errors, in which case no request is made
    /// and the view is untouched. Service and transport failures come back
    /// as outcomes and are reflected in the view.
    pub async fn submit(&self) -> Result<SubmitOutcome, NutriError> {
        let (request, soil) = {
            let state = lock(&self.state);
            let request = PredictRequest {
                file: state.file.clone(),
                location: state.location.clone(),
                soil_type: state.soil_type,
            };
            (request, state.soil_type)
        };
        if request.is_empty() {
            return Err(NutriError::InputMissing);
        }

        let token = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        *lock(&self.view) = ViewState::Loading { token };
        debug!("submit #{token} via {}", self.backend.backend_name());

        let result = self.backend.predict(request).await;

        let mut view = lock(&self.view);
        if self.sequence.load(Ordering::SeqCst) != token {
            debug!("discarding stale response #{token}");
            return Ok(SubmitOutcome::Superseded);
        }

        let outcome = match result {
            Ok(prediction) => {
                info!(
                    "#{token}: {} / {} / {}",
                    prediction.plant.kind, prediction.deficiency.kind, prediction.severity.level
                );
                let report = Box::new(compose_report(&prediction, &self.table, soil));
                *view = ViewState::Results(report.clone());
                SubmitOutcome::Success {
                    result: prediction,
                    report,
                }
            }
            Err(NutriError::Service(message)) => {
                warn!("#{token}: service error: {message}");
                *view = ViewState::Error(message.clone());
                SubmitOutcome::ServiceError(message)
            }
            Err(e) => {
                warn!("#{token}: {e}");
                *view = ViewState::Error(TRANSPORT_ERROR_MESSAGE.to_string());
                SubmitOutcome::TransportError(TRANSPORT_ERROR_MESSAGE.to_string())
            }
        };
        Ok(outcome)
    }

    /// Compose the report for a result using the current soil selection.
    pub fn render(&self, result: &PredictionResult) -> Report {
        let soil = lock(&self.state).soil_type;
        compose_report(result, &self.table, soil)
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

fn mime_for(name: &str) -> Result<&'static str, NutriError> {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        _ => Err(NutriError::UnsupportedFileType(name.to_string())),
    }
}

/// Decode the image and encode a small PNG thumbnail as a data URL.
pub fn preview_data_url(bytes: &[u8]) -> Result<String, NutriError> {
    let img = image::load_from_memory(bytes).map_err(|e| NutriError::InvalidImage(e.to_string()))?;
    let thumb = img.thumbnail(PREVIEW_SIZE, PREVIEW_SIZE);
    let mut png = Vec::new();
    thumb
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| NutriError::InvalidImage(e.to_string()))?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(&png)))
}
