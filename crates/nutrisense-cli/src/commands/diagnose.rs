use nutrisense_core::client::http::HttpBackend;
use nutrisense_core::config::ClientConfig;
use nutrisense_core::controller::Controller;
use nutrisense_core::error::NutriError;
use nutrisense_core::model::SoilType;
use nutrisense_core::render::{self, Format};
use nutrisense_core::Diagnosis;
use std::path::{Path, PathBuf};

use crate::commands::knowledge;
use crate::output;

pub async fn run(
    config: ClientConfig,
    knowledge_file: Option<&Path>,
    image: PathBuf,
    soil: Option<String>,
    location: Option<String>,
    output_format: &str,
    output_file: Option<PathBuf>,
) -> Result<(), NutriError> {
    let format: Format = output_format.parse()?;
    let soil_type = soil.as_deref().map(str::parse::<SoilType>).transpose()?;
    let table = knowledge::load(knowledge_file)?;

    let file_name = image
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| image.display().to_string());
    let backend = HttpBackend::new(config)?;
    let max_upload_bytes = backend.config().max_upload_bytes;
    let bytes = read_image(&image, max_upload_bytes)?;
    let controller = Controller::new(backend, table, max_upload_bytes);

    let (_, report) = nutrisense_core::diagnose(
        &controller,
        Diagnosis {
            file_name,
            bytes,
            soil_type,
            location,
        },
    )
    .await?;

    let rendered = render::render(&report, format)?;
    output::emit(&rendered, output_file.as_deref())
}

/// Read an image, refusing files over `limit` before loading them.
fn read_image(path: &Path, limit: usize) -> Result<Vec<u8>, NutriError> {
    let size = std::fs::metadata(path)?.len();
    if size > limit as u64 {
        return Err(NutriError::FileTooLarge {
            size: usize::try_from(size).unwrap_or(usize::MAX),
            limit,
        });
    }
    Ok(std::fs::read(path)?)
}
