//! Report output formats.

pub mod html;
pub mod text;

use crate::error::NutriError;
use crate::report::Report;
use std::str::FromStr;

/// Output format for a rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Text,
    Json,
    Html,
}

impl FromStr for Format {
    type Err = NutriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Format::Text),
            "json" => Ok(Format::Json),
            "html" => Ok(Format::Html),
            other => Err(NutriError::Config(format!(
                "unknown output format '{other}' (expected text, json or html)"
            ))),
        }
    }
}

/// Render a report in the given format.
pub fn render(report: &Report, format: Format) -> Result<String, NutriError> {
    match format {
        Format::Text => Ok(text::render(report)),
        Format::Html => Ok(html::render(report)),
        Format::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse() {
        assert_eq!("HTML".parse::<Format>().unwrap(), Format::Html);
        assert_eq!("txt".parse::<Format>().unwrap(), Format::Text);
        assert!("pdf".parse::<Format>().is_err());
    }
}
