// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-group ROI store with undo and sidecar persistence.
//!
//! Each group owns an ordered list of regions; list order is hit-test
//! priority. A group with no regions has no entry. Every mutating call
//! first pushes the group's previous state onto that group's undo stack.
//!
//! The store is not synchronized. Callers serialize mutating calls, e.g.
//! from a single command thread.

pub mod history;

use crate::error::Result;
use crate::io::serialization::{self, RoiMap, ROI_FILE_NAME};
use crate::models::{RoiRegion, RoiShape};
use history::{History, Snapshot};
use std::collections::HashMap;
use std::path::Path;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct RoiStore {
    regions: RoiMap,
    history: HashMap<String, History>,
}

impl RoiStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Regions of a group in hit-test order; empty for unknown groups.
    pub fn regions(&self, group_id: &str) -> &[RoiRegion] {
        self.regions.get(group_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First region of a group.
    pub fn lead_region(&self, group_id: &str) -> Option<&RoiRegion> {
        self.regions(group_id).first()
    }

    pub fn group_ids(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    fn snapshot(&mut self, group_id: &str) {
        let snapshot = Snapshot::from(self.regions.get(group_id));
        self.history.entry(group_id.to_string()).or_default().push(snapshot);
    }

    /// Append a region to a group, lowest hit-test priority, and return its id.
    ///
    /// A fresh id is generated when the region has none or its id is
    /// already taken in the group.
    pub fn add_region(&mut self, group_id: &str, mut region: RoiRegion) -> String {
        self.snapshot(group_id);
        let list = self.regions.entry(group_id.to_string()).or_default();
        if region.id.is_empty() || list.iter().any(|r| r.id == region.id) {
            region.id = Uuid::new_v4().to_string();
        }
        region.group_id = group_id.to_string();
        let id = region.id.clone();
        list.push(region);
        log::info!("Added ROI {} to {}, total: {}", id, group_id, list.len());
        id
    }

    /// Append a new region with the given shape.
    pub fn add_shape(&mut self, group_id: &str, shape: RoiShape) -> String {
        self.add_region(group_id, RoiRegion::new(shape))
    }

    /// Replace the shape of a region, keeping its id and means.
    pub fn replace_shape(&mut self, group_id: &str, id: &str, shape: RoiShape) -> bool {
        if !self.regions(group_id).iter().any(|r| r.id == id) {
            return false;
        }
        self.snapshot(group_id);
        if let Some(region) = self
            .regions
            .get_mut(group_id)
            .and_then(|list| list.iter_mut().find(|r| r.id == id))
        {
            region.shape = shape;
        }
        log::info!("Replaced shape of ROI {} in {}", id, group_id);
        true
    }

    /// Remove the first region with `id`; drops the group when it empties.
    pub fn remove_region(&mut self, group_id: &str, id: &str) -> bool {
        self.snapshot(group_id);
        let Some(list) = self.regions.get_mut(group_id) else {
            return false;
        };
        let Some(index) = list.iter().position(|r| r.id == id) else {
            return false;
        };
        list.remove(index);
        let remaining = list.len();
        if remaining == 0 {
            self.regions.remove(group_id);
        }
        log::info!("Removed ROI {} from {}, total: {}", id, group_id, remaining);
        true
    }

    pub fn clear_group(&mut self, group_id: &str) {
        self.snapshot(group_id);
        self.regions.remove(group_id);
        log::info!("Cleared ROIs of {}", group_id);
    }

    /// First region (by list order) containing the point.
    pub fn hit_test(&self, group_id: &str, px: f64, py: f64) -> Option<&RoiRegion> {
        self.regions(group_id).iter().find(|r| r.contains_point(px, py))
    }

    /// Restore the group's state before its last mutation.
    pub fn undo(&mut self, group_id: &str) -> bool {
        let Some(snapshot) = self.history.get_mut(group_id).and_then(History::undo) else {
            return false;
        };
        match snapshot {
            Snapshot::Absent => {
                self.regions.remove(group_id);
            }
            Snapshot::Regions(list) if list.is_empty() => {
                self.regions.remove(group_id);
            }
            Snapshot::Regions(list) => {
                self.regions.insert(group_id.to_string(), list);
            }
        }
        log::info!("Undo in {}, total: {}", group_id, self.regions(group_id).len());
        true
    }

    pub fn can_undo(&self, group_id: &str) -> bool {
        self.history.get(group_id).is_some_and(History::can_undo)
    }

    /// Record a mean intensity on the group's lead region only. No-op for
    /// groups without regions.
    pub fn attach_mean(&mut self, group_id: &str, acquisition: &str, value: f64) {
        if let Some(lead) = self.regions.get_mut(group_id).and_then(|list| list.first_mut()) {
            lead.file_means.insert(acquisition.to_string(), value);
        }
    }

    /// Write all groups to the sidecar in `directory`. An empty path is a no-op.
    pub fn save(&self, directory: &Path) -> Result<()> {
        if directory.as_os_str().is_empty() {
            return Ok(());
        }
        let path = directory.join(ROI_FILE_NAME);
        serialization::write_roi_map(&self.regions, &path)?;
        log::info!("Saved ROIs for {} groups to {}", self.regions.len(), path.display());
        Ok(())
    }

    /// Replace the contents with the sidecar in `directory`.
    ///
    /// A missing or unreadable sidecar leaves the store empty. Undo history
    /// is discarded either way.
    pub fn load(&mut self, directory: &Path) {
        self.history.clear();
        let path = directory.join(ROI_FILE_NAME);
        if !path.exists() {
            self.regions = RoiMap::new();
            return;
        }
        self.regions = match serialization::read_roi_map(&path) {
            Ok(map) => {
                log::info!("Loaded ROIs for {} groups from {}", map.len(), path.display());
                map
            }
            Err(e) => {
                log::warn!("Discarding unreadable ROI file {}: {}", path.display(), e);
                RoiMap::new()
            }
        };
    }
}
