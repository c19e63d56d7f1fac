// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Time-series groups.
//!
//! A group is a cluster of acquisitions taken close together in time,
//! presumed to be one imaging episode. Groups are always rebuilt from
//! scratch by the grouper; nothing patches them in place.

use super::acquisition::Acquisition;
use serde::{Deserialize, Serialize};

/// Id of the trailing group that collects acquisitions without a timestamp.
pub const UNKNOWN_GROUP_ID: &str = "group_unknown";

/// Label of the trailing group that collects acquisitions without a timestamp.
pub const UNKNOWN_GROUP_LABEL: &str = "Unknown Time";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesGroup {
    /// Stable id derived from the first timestamp, e.g. `group_20250101120000`.
    pub id: String,
    /// e.g. `12:00:01 - 12:00:55`, or a single time for one-instant groups.
    pub label: String,
    /// Ascending by timestamp (input order for the unknown group).
    pub acquisitions: Vec<Acquisition>,
}

impl TimeSeriesGroup {
    pub fn new(id: impl Into<String>, label: impl Into<String>, acquisitions: Vec<Acquisition>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            acquisitions,
        }
    }

    pub fn len(&self) -> usize {
        self.acquisitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.acquisitions.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&Acquisition> {
        self.acquisitions.iter().find(|a| a.name == name)
    }
}
