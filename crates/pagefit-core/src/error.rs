// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for pagefit.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all pagefit operations.
#[derive(Debug, Error)]
pub enum PagefitError {
    // -- Setup errors (abort the whole batch) --
    #[error("source directory '{}' does not exist", .0.display())]
    SourceNotFound(PathBuf),

    #[error("source path '{}' is not a directory", .0.display())]
    SourceNotDirectory(PathBuf),

    #[error("failed to list source directory '{}': {source}", .path.display())]
    ListSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create output directory '{}': {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("output path '{}' exists but is not a directory", .0.display())]
    OutputNotDirectory(PathBuf),

    // -- Per-file errors --
    #[error("image processing failed: {0}")]
    Image(String),

    #[error("PDF operation failed: {0}")]
    Pdf(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PagefitError>;
