use std::path::PathBuf;

use thiserror::Error;

/// Failures at the edges of the app: file I/O, image decoding, config.
///
/// The annotation session itself never fails; these only come from reading
/// and writing things on disk.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot decode {name} as an image: {source}")]
    Decode {
        name: String,
        source: image::ImageError,
    },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
