//! Crate error type.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Layout error: {0}")]
    Layout(String),
    #[error("Palette error: {0}")]
    Palette(String),
    #[error("Audio error: {0}")]
    Audio(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Wav(#[from] hound::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}
