use std::io;
use std::path::PathBuf;

use thiserror::Error;

use maskview_core::CoreError;

#[derive(Error, Debug)]
pub enum PlotError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to open {} in a browser: {source}", path.display())]
    Browser { path: PathBuf, source: io::Error },

    #[error("No slider {index} (device has {count} parameters)")]
    NoSuchSlider { index: usize, count: usize },

    #[error("Slider '{param}' has no step {step} ({count} steps)")]
    NoSuchStep {
        param: String,
        step: usize,
        count: usize,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}
