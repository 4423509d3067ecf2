use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),
    #[error("Empty geometry for flood {flood}")]
    EmptyGeometry { flood: String },
    #[error("Unknown depth band {label:?}{}", describe_context(.context))]
    UnknownBand {
        label: String,
        context: Option<String>,
    },
    #[error("Invalid width for link {link}: {reason}")]
    InvalidWidth { link: String, reason: String },
    #[error("Invalid feature {feature}: {reason}")]
    InvalidFeature { feature: String, reason: String },
    #[error("Failed to write {}: {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(String),
}

fn describe_context(context: &Option<String>) -> String {
    context
        .as_ref()
        .map(|c| format!(" for {c}"))
        .unwrap_or_default()
}

impl Error {
    pub(crate) fn unknown_band(label: impl Into<String>) -> Self {
        Error::UnknownBand {
            label: label.into(),
            context: None,
        }
    }

    /// Attach the offending record to an `UnknownBand` error.
    pub(crate) fn with_band_context(self, context: impl Into<String>) -> Self {
        match self {
            Error::UnknownBand { label, .. } => Error::UnknownBand {
                label,
                context: Some(context.into()),
            },
            other => other,
        }
    }
}
