// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Library error type.

use std::path::PathBuf;

/// Errors raised by the I/O facing parts of the library.
///
/// The analytic functions (geometry, classification, grouping, summaries)
/// are total and never produce one of these.
#[derive(Debug, thiserror::Error)]
pub enum SonoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("frame {index} out of range ({count} frames)")]
    FrameOutOfRange { index: usize, count: usize },

    #[error("unsupported file extension: {0:?}")]
    UnsupportedFormat(Option<String>),

    #[error("unknown group: {0}")]
    UnknownGroup(String),

    #[error("unknown acquisition: {0}")]
    UnknownAcquisition(String),
}

pub type Result<T> = std::result::Result<T, SonoError>;
