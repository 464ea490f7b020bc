use crate::error::NutriError;
use std::{env, fmt::Display, str::FromStr, time::Duration};
use tracing::{debug, info};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Where the prediction service lives and how the client talks to it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server_url: String,
    pub predict_path: String,
    pub predict_crop_path: String,
    pub locations_path: String,
    pub location_plants_path: String,
    pub timeout: Duration,
    pub max_upload_bytes: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.into(),
            predict_path: "/predict".into(),
            predict_crop_path: "/predict-crop".into(),
            locations_path: "/get-locations".into(),
            location_plants_path: "/getExcelData".into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `NUTRISENSE_*` environment variables.
    pub fn from_env() -> Result<Self, NutriError> {
        let defaults = Self::default();
        Ok(Self {
            server_url: try_load("NUTRISENSE_SERVER_URL", defaults.server_url)?,
            predict_path: try_load("NUTRISENSE_PREDICT_PATH", defaults.predict_path)?,
            predict_crop_path: try_load(
                "NUTRISENSE_PREDICT_CROP_PATH",
                defaults.predict_crop_path,
            )?,
            locations_path: try_load("NUTRISENSE_LOCATIONS_PATH", defaults.locations_path)?,
            location_plants_path: try_load(
                "NUTRISENSE_LOCATION_PLANTS_PATH",
                defaults.location_plants_path,
            )?,
            timeout: Duration::from_secs(try_load(
                "NUTRISENSE_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )?),
            max_upload_bytes: try_load("NUTRISENSE_MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
        })
    }

    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into();
        self
    }

    /// Absolute URL for an endpoint path.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.server_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn validate(&self) -> Result<(), NutriError> {
        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            return Err(NutriError::Config(format!(
                "server url '{}' must start with http:// or https://",
                self.server_url
            )));
        }
        if self.timeout.is_zero() {
            return Err(NutriError::Config("timeout must be greater than zero".into()));
        }
        if self.max_upload_bytes == 0 {
            return Err(NutriError::Config(
                "max upload size must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

fn try_load<T>(key: &str, default: T) -> Result<T, NutriError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => {
            debug!("{key} set to {raw}");
            raw.trim()
                .parse()
                .map_err(|e| NutriError::Config(format!("invalid {key} value '{raw}': {e}")))
        }
        Err(_) => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
