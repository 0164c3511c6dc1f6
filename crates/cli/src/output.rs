use std::str::FromStr;

use serde_json::json;
use siftpage_core::Extraction;

/// Which result to print
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Text,
    Image,
    All,
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "text" => Ok(Self::Text),
            "image" | "img" => Ok(Self::Image),
            "all" => Ok(Self::All),
            _ => Err(format!("Invalid field: {}. Valid options: title, text, image, all", s)),
        }
    }
}

/// Output format for extracted results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: text, json", s)),
        }
    }
}

/// Renders a single result. Absent values print nothing in text mode and
/// `null` in JSON.
pub fn render_field(name: &str, value: Option<&str>, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(value.map(|v| format!("{v}\n")).unwrap_or_default()),
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(&json!({ name: value }))?)),
    }
}

/// Renders all three results.
pub fn render_extraction(extraction: &Extraction, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(format!(
            "title: {}\nimage: {}\ntext: {}\n",
            extraction.title,
            extraction.image.as_deref().unwrap_or("-"),
            extraction.text.as_deref().unwrap_or("-"),
        )),
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(&extraction.to_json()?)?)),
    }
}
