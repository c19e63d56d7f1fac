// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! File serialization and deserialization.
//!
//! This module handles the ROI sidecar file, generic JSON/YAML import and
//! export, and the group summary report.

use crate::analysis::statistics::Report;
use crate::error::{Result, SonoError};
use crate::models::RoiRegion;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use uuid::Uuid;

/// File name of the ROI sidecar inside an acquisition directory.
pub const ROI_FILE_NAME: &str = "dicom_viewer.roi";

/// Group id to ordered region list, as persisted.
pub type RoiMap = BTreeMap<String, Vec<RoiRegion>>;

/// Export data as pretty-printed JSON.
pub fn export_json<T: Serialize + ?Sized>(data: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Import data from JSON.
pub fn import_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = std::fs::read_to_string(path)?;
    let data = serde_json::from_str(&json)?;
    Ok(data)
}

/// Export data as YAML.
pub fn export_yaml<T: Serialize + ?Sized>(data: &T, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(data)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

/// Import data from YAML.
pub fn import_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let yaml = std::fs::read_to_string(path)?;
    let data = serde_yaml::from_str(&yaml)?;
    Ok(data)
}

/// Write the report, choosing YAML or JSON by extension.
pub fn export_report(report: &Report, path: &Path) -> Result<()> {
    let extension = path.extension().and_then(|s| s.to_str());
    match extension {
        Some("yaml") | Some("yml") => export_yaml(report, path),
        Some("json") => export_json(report, path),
        _ => Err(SonoError::UnsupportedFormat(extension.map(str::to_string))),
    }
}

/// A group entry in the sidecar: current files hold a list, legacy files a
/// single region.
#[derive(Deserialize)]
#[serde(untagged)]
enum GroupEntry {
    Many(Vec<RoiRegion>),
    Legacy(RoiRegion),
}

/// Read an ROI sidecar, upgrading legacy single-region entries to lists.
///
/// Regions without a group id take the id of the entry they appear under.
/// A region whose id is empty or repeats an earlier one in the same entry
/// gets a fresh id. Entries with no regions are dropped.
pub fn read_roi_map(path: &Path) -> Result<RoiMap> {
    let entries: BTreeMap<String, GroupEntry> = import_json(path)?;
    let mut map = RoiMap::new();
    for (group_id, entry) in entries {
        let mut regions = match entry {
            GroupEntry::Many(regions) => regions,
            GroupEntry::Legacy(region) => {
                log::info!("Migrating legacy single-ROI entry for group {}", group_id);
                vec![region]
            }
        };
        if regions.is_empty() {
            continue;
        }
        let mut seen = HashSet::new();
        for region in regions.iter_mut() {
            if region.group_id.is_empty() {
                region.group_id = group_id.clone();
            }
            if region.id.is_empty() || seen.contains(&region.id) {
                let fresh = Uuid::new_v4().to_string();
                log::warn!("Reassigning ROI id {:?} in group {} to {}", region.id, group_id, fresh);
                region.id = fresh;
            }
            seen.insert(region.id.clone());
        }
        map.insert(group_id, regions);
    }
    Ok(map)
}

/// Write an ROI sidecar. Always writes the list form.
pub fn write_roi_map(map: &RoiMap, path: &Path) -> Result<()> {
    export_json(map, path)
}
