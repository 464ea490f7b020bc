use crate::client::{PredictRequest, PredictionBackend};
use crate::config::ClientConfig;
use crate::error::NutriError;
use crate::model::{CropPrediction, LocationPlants, PredictionResult};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Prediction backend talking to the HTTP service with reqwest.
#[derive(Clone)]
pub struct HttpBackend {
    http: Client,
    config: ClientConfig,
}

#[derive(Deserialize)]
struct LocationsResponse {
    locations: Vec<String>,
}

impl HttpBackend {
    pub fn new(config: ClientConfig) -> Result<Self, NutriError> {
        config.validate()?;
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn post_form<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T, NutriError> {
        let url = self.config.endpoint(path);
        debug!("POST {url}");
        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| NutriError::Transport(format!("POST {url} failed: {e}")))?;
        read_json(&url, response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, NutriError> {
        let url = self.config.endpoint(path);
        debug!("GET {url}");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| NutriError::Transport(format!("GET {url} failed: {e}")))?;
        read_json(&url, response).await
    }
}

impl PredictionBackend for HttpBackend {
    async fn predict(&self, request: PredictRequest) -> Result<PredictionResult, NutriError> {
        let mut form = Form::new();
        if let Some(file) = request.file {
            let part = Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(file.mime)?;
            form = form.part("file", part);
        }
        if let Some(location) = request.location {
            form = form.text("location", location);
        }
        if let Some(soil) = request.soil_type {
            form = form.text("soil_type", soil.to_string());
        }
        self.post_form(&self.config.predict_path, form).await
    }

    async fn predict_crops(&self, location: &str) -> Result<CropPrediction, NutriError> {
        let form = Form::new().text("location", location.to_string());
        self.post_form(&self.config.predict_crop_path, form).await
    }

    async fn locations(&self) -> Result<Vec<String>, NutriError> {
        let response: LocationsResponse = self.get_json(&self.config.locations_path).await?;
        Ok(response.locations)
    }

    async fn location_plants(&self) -> Result<LocationPlants, NutriError> {
        self.get_json(&self.config.location_plants_path).await
    }

    fn backend_name(&self) -> &str {
        "http"
    }
}

async fn read_json<T: DeserializeOwned>(url: &str, response: Response) -> Result<T, NutriError> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| NutriError::Transport(format!("failed to read response from {url}: {e}")))?;
    let decoded = decode_response(status, &body);
    if let Err(ref e) = decoded {
        warn!("{url} -> {status}: {e}");
    }
    decoded
}

/// Interpret a response body.
///
/// An `error` field in a JSON body is a service error whatever the status.
/// Otherwise a non-2xx status or a body that does not parse into `T` is a
/// transport error.
pub fn decode_response<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T, NutriError> {
    let value: Value = match serde_json::from_slice(body) {
        Ok(v) => v,
        Err(_) if !status.is_success() => {
            return Err(NutriError::HttpStatus {
                status: status.as_u16(),
            })
        }
        Err(e) => {
            return Err(NutriError::Transport(format!("malformed response body: {e}")));
        }
    };

    match value.get("error") {
        None | Some(Value::Null) => {}
        Some(Value::String(message)) => return Err(NutriError::Service(message.clone())),
        Some(other) => return Err(NutriError::Service(other.to_string())),
    }

    if !status.is_success() {
        return Err(NutriError::HttpStatus {
            status: status.as_u16(),
        });
    }

    serde_json::from_value(value)
        .map_err(|e| NutriError::Transport(format!("unexpected response shape: {e}")))
}
