/*!
 * Error types for the vocasub engine.
 *
 * This module contains custom error types for different parts of the engine,
 * using the thiserror crate for ergonomic error definitions.
 *
 * Failures in this crate are deliberately local: a bad dictionary line or an
 * undecodable texture never propagates past the subsystem that hit it. These
 * types exist for the few boundaries that do return errors (configuration
 * loading, reload plumbing) and for log formatting.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur while loading dictionary files
#[derive(Error, Debug)]
pub enum DictionaryError {
    /// Error reading a dictionary file from disk
    #[error("Failed to read dictionary file: {0}")]
    ReadFailed(String),

    /// A `$`-prefixed line carried a pattern the regex engine rejected
    #[error("Invalid regex pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The offending pattern text (after the leading `$` was stripped)
        pattern: String,
        /// Compile error reported by the regex engine
        message: String,
    },
}

/// Errors that can occur while loading replacement textures
#[derive(Error, Debug)]
pub enum TextureError {
    /// Error reading a texture file from disk
    #[error("Failed to read texture file: {0}")]
    ReadFailed(String),

    /// The file bytes could not be decoded as an image
    #[error("Failed to decode texture '{name}': {message}")]
    DecodeFailed {
        /// Normalized texture name
        name: String,
        /// Decode error reported by the image crate
        message: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error in the configuration surface
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from dictionary loading
    #[error("Dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),

    /// Error from texture loading
    #[error("Texture error: {0}")]
    Texture(#[from] TextureError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
