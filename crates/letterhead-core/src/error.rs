// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Letterhead.

use thiserror::Error;

/// Top-level error type for all Letterhead operations.
///
/// Every variant is fatal for the call that produced it: the engine never
/// returns a partially branded document.
#[derive(Debug, Error)]
pub enum LetterheadError {
    // -- Engine errors --
    #[error("input is not a readable PDF document: {0}")]
    MalformedInputDocument(String),

    #[error("unsupported image format: {0}")]
    UnsupportedImageFormat(String),

    #[error("QR encoding failed: {0}")]
    QrEncoding(String),

    #[error("failed to serialise branded document: {0}")]
    SerializationFailure(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // -- Outer surfaces --
    #[error("document import failed: {0}")]
    Import(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LetterheadError>;
