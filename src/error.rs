//! Error types for the format plugin

use std::io;

use thiserror::Error;

/// Errors raised while configuring the format or talking to the viewer.
///
/// Molecules with incomplete O/H data are not errors; the renderer skips them.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Option key outside the recognized set
    #[error("Unknown option: {0} (recognized options: H)")]
    UnknownOption(String),

    /// Recognized key with a value that cannot be used
    #[error("Invalid value for option {key}: {value:?} ({reason})")]
    InvalidOption {
        key: String,
        value: String,
        reason: String,
    },

    /// The standalone viewer could not be reached
    #[error("Scene viewer unavailable at {address}: {source}")]
    SinkUnavailable {
        address: String,
        #[source]
        source: io::Error,
    },

    /// Writing to an already connected viewer failed
    #[error("Scene viewer error: {0}")]
    Sink(#[source] io::Error),

    /// Settings file could not be written
    #[error("Config file error: {0}")]
    Config(#[source] io::Error),

    /// Hook stage not provided by this format
    #[error("Unknown hook stage: {0}")]
    UnknownHook(u8),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FormatError>;
