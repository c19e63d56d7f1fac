// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Acquisition metadata.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Acquisition mode inferred from pixel spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Classification {
    /// Contrast-enhanced ultrasound.
    #[default]
    Ceus,
    /// Second harmonic imaging.
    Shi,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Ceus => write!(f, "CEUS"),
            Classification::Shi => write!(f, "SHI"),
        }
    }
}

/// One loaded acquisition (a single- or multi-frame image set).
///
/// Everything except `classification` is fixed once the directory has been
/// loaded; the classifier sets that field exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Acquisition {
    /// File name, used as the key for per-acquisition means.
    pub name: String,
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Always at least 1.
    pub frame_count: usize,
    pub acquired_at: Option<NaiveDateTime>,
    /// `[row, column]` spacing.
    pub pixel_spacing: Option<[f64; 2]>,
    pub classification: Classification,
    /// One decoded image per frame, in frame order.
    #[serde(default)]
    pub frame_files: Vec<PathBuf>,
    /// Formatted metadata attributes, searched by the listing filter.
    /// `None` when the directory carries no tag dump for this acquisition.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl Acquisition {
    /// Create an acquisition with no timestamp, spacing or frame files.
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        let name = name.into();
        Self {
            path: PathBuf::from(&name),
            name,
            width,
            height,
            frame_count: 1,
            acquired_at: None,
            pixel_spacing: None,
            classification: Classification::default(),
            frame_files: Vec::new(),
            tags: None,
        }
    }

    pub fn with_timestamp(mut self, acquired_at: NaiveDateTime) -> Self {
        self.acquired_at = Some(acquired_at);
        self
    }

    pub fn with_spacing(mut self, spacing: [f64; 2]) -> Self {
        self.pixel_spacing = Some(spacing);
        self
    }

    /// Label shown in listings: the file name with its mode appended.
    pub fn display_name(&self) -> String {
        format!("{} [{}]", self.name, self.classification)
    }
}
