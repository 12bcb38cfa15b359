use std::io;
use thiserror::Error;

/// Failure reading or writing the best-score slot.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no data directory available")]
    NoDataDir,
    #[error("score file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("score file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("value under `{0}` is not a non-negative integer")]
    NotAnInteger(String),
}

/// Failure opening or using the audio output.
#[derive(Debug, Error)]
pub enum SoundError {
    #[error("no audio output: {0}")]
    Stream(#[from] rodio::StreamError),
    #[error("cannot play: {0}")]
    Play(#[from] rodio::PlayError),
}
