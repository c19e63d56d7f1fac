// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Acquisition directory loading.
//!
//! A directory is described by `acquisitions.json`, a list of entries
//! carrying each acquisition's dimensions, its raw timestamp and spacing
//! attributes, and the image files holding its decoded frames (relative
//! to the directory).

use super::metadata::{parse_spacing, resolve_timestamp, spacing_from_values};
use super::serialization::import_json;
use crate::error::{Result, SonoError};
use crate::models::Acquisition;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the acquisition manifest inside a directory.
pub const MANIFEST_FILE_NAME: &str = "acquisitions.json";

/// Pixel spacing as written in a manifest: the raw attribute string or a
/// list of numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpacingValue {
    Text(String),
    Values(Vec<f64>),
}

impl SpacingValue {
    pub fn resolve(&self) -> Option<[f64; 2]> {
        match self {
            SpacingValue::Text(text) => parse_spacing(text),
            SpacingValue::Values(values) => spacing_from_values(values),
        }
    }
}

/// One acquisition as listed in the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub name: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default = "default_frame_count")]
    pub frame_count: usize,
    #[serde(default)]
    pub acquisition_date_time: Option<String>,
    #[serde(default)]
    pub acquisition_date: Option<String>,
    #[serde(default)]
    pub acquisition_time: Option<String>,
    #[serde(default)]
    pub pixel_spacing: Option<SpacingValue>,
    #[serde(default)]
    pub frames: Vec<PathBuf>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

fn default_frame_count() -> usize {
    1
}

impl ManifestEntry {
    /// Resolve raw attributes into an unclassified acquisition rooted at `directory`.
    pub fn into_acquisition(self, directory: &Path) -> Acquisition {
        let acquired_at = resolve_timestamp(
            self.acquisition_date_time.as_deref(),
            self.acquisition_date.as_deref(),
            self.acquisition_time.as_deref(),
        );
        let pixel_spacing = self.pixel_spacing.as_ref().and_then(SpacingValue::resolve);
        let mut acquisition = Acquisition::new(self.name, self.width, self.height);
        acquisition.path = directory.join(&acquisition.name);
        acquisition.frame_count = self.frame_count.max(1);
        acquisition.acquired_at = acquired_at;
        acquisition.pixel_spacing = pixel_spacing;
        acquisition.frame_files = self.frames.iter().map(|f| directory.join(f)).collect();
        acquisition.tags = self.tags;
        acquisition
    }
}

/// Load every acquisition listed in `directory`'s manifest, sorted by name.
pub fn load_directory(directory: &Path) -> Result<Vec<Acquisition>> {
    if !directory.is_dir() {
        return Err(SonoError::DirectoryNotFound(directory.to_path_buf()));
    }
    let entries: Vec<ManifestEntry> = import_json(&directory.join(MANIFEST_FILE_NAME))?;
    let mut acquisitions: Vec<Acquisition> = entries
        .into_iter()
        .map(|entry| entry.into_acquisition(directory))
        .collect();
    acquisitions.sort_by(|a, b| a.name.cmp(&b.name));

    log::info!("Loaded {} acquisitions from {}", acquisitions.len(), directory.display());
    Ok(acquisitions)
}
