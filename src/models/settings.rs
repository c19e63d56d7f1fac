// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-folder configuration stored alongside the acquisitions.

use crate::error::Result;
use crate::io::serialization;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name of the folder settings inside an acquisition directory.
pub const FOLDER_SETTINGS_FILE_NAME: &str = "dicom_viewer_directory.settings";

/// Grouping window and classification targets for one directory.
///
/// Missing fields in the stored file fall back to their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FolderSettings {
    pub time_window_seconds: f64,
    pub ceus_spacing: f64,
    pub shi_spacing: f64,
}

impl Default for FolderSettings {
    fn default() -> Self {
        Self {
            time_window_seconds: 60.0,
            ceus_spacing: 0.5,
            shi_spacing: 0.3,
        }
    }
}

impl FolderSettings {
    /// Load the settings of `directory`, or defaults when the file is
    /// missing or unreadable.
    pub fn load(directory: &Path) -> Self {
        let path = directory.join(FOLDER_SETTINGS_FILE_NAME);
        if !path.exists() {
            return Self::default();
        }
        match serialization::import_json(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring unreadable folder settings {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, directory: &Path) -> Result<()> {
        serialization::export_json(self, &directory.join(FOLDER_SETTINGS_FILE_NAME))
    }
}
