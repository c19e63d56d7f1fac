// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! ROI intensity statistics.
//!
//! Mean luminance of the pixels inside a region, taken over every frame of
//! an acquisition, and summary statistics over the per-acquisition means
//! of a group. The per-acquisition computation is O(width x height x
//! frames) and is meant to run off the interactive thread.

use crate::io::media::PixelProvider;
use crate::models::{BoundingBox, RoiRegion, ShapeKind, TimeSeriesGroup};
use crate::store::RoiStore;
use crate::util::geometry;
use serde::{Deserialize, Serialize};

/// Rec. 601 luma of an RGB pixel.
pub fn luminance([r, g, b]: [u8; 3]) -> f64 {
    0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64
}

/// Mean luminance of the pixels inside `region`, over all frames.
///
/// Frames the provider fails to render are skipped. Returns 0 when the
/// image is empty or no pixel anywhere falls inside the region.
pub fn compute_mean_intensity<P>(provider: &P, region: &RoiRegion) -> f64
where
    P: PixelProvider + ?Sized,
{
    let (width, height) = (provider.width(), provider.height());
    if width == 0 || height == 0 {
        return 0.0;
    }
    let Some(window) = geometry::scan_window(&region.shape, width, height) else {
        return 0.0;
    };

    let mut sum = 0.0;
    let mut count: u64 = 0;
    for index in 0..provider.frame_count() {
        let frame = match provider.render_frame(index) {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("Skipping frame {}: {}", index, e);
                continue;
            }
        };
        for (x, y) in window.pixels() {
            if !region.contains_point(x as f64, y as f64) {
                continue;
            }
            if let Some(rgb) = frame.rgb(x, y) {
                sum += luminance(rgb);
                count += 1;
            }
        }
    }

    if count > 0 {
        sum / count as f64
    } else {
        0.0
    }
}

/// Count, mean, extremes and sample standard deviation of a set of means.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntensitySummary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Uses the n - 1 denominator; 0 for fewer than two values.
    pub std_dev: f64,
}

/// Summarize a collection of per-acquisition means. Empty input gives all zeros.
pub fn summarize(means: impl IntoIterator<Item = f64>) -> IntensitySummary {
    let values: Vec<f64> = means.into_iter().collect();
    if values.is_empty() {
        return IntensitySummary::default();
    }

    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let std_dev = if count > 1 {
        let squares: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
        (squares / (count - 1) as f64).sqrt()
    } else {
        0.0
    };

    IntensitySummary {
        count,
        mean,
        min,
        max,
        std_dev,
    }
}

/// One row of the group summary report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupReport {
    pub group_id: String,
    pub label: String,
    pub summary: IntensitySummary,
}

/// Summaries of the lead-region means of every group, in group order.
///
/// Groups with no region, or whose lead region has no means yet, are left out.
pub fn summarize_groups(groups: &[TimeSeriesGroup], store: &RoiStore) -> Vec<GroupReport> {
    groups
        .iter()
        .filter_map(|group| {
            let lead = store.lead_region(&group.id)?;
            if lead.file_means.is_empty() {
                return None;
            }
            Some(GroupReport {
                group_id: group.id.clone(),
                label: group.label.clone(),
                summary: summarize(lead.file_means.values().copied()),
            })
        })
        .collect()
}

/// One acquisition of a group that has an ROI, with the lead region's
/// geometry and the acquisition's mean if it has been computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquisitionRow {
    pub group_id: String,
    pub group_label: String,
    pub acquisition: String,
    pub mean: Option<f64>,
    pub shape: ShapeKind,
    pub bounds: BoundingBox,
}

/// Per-acquisition rows for every group with a region, in group then
/// acquisition order. Groups without regions contribute nothing.
pub fn acquisition_rows(groups: &[TimeSeriesGroup], store: &RoiStore) -> Vec<AcquisitionRow> {
    let mut rows = Vec::new();
    for group in groups {
        let Some(lead) = store.lead_region(&group.id) else {
            continue;
        };
        let bounds = geometry::bounding_box(&lead.shape);
        for acquisition in &group.acquisitions {
            rows.push(AcquisitionRow {
                group_id: group.id.clone(),
                group_label: group.label.clone(),
                acquisition: acquisition.name.clone(),
                mean: lead.file_means.get(&acquisition.name).copied(),
                shape: lead.shape.kind(),
                bounds,
            });
        }
    }
    rows
}

/// Exported report: per-acquisition data and per-group summaries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Report {
    pub acquisitions: Vec<AcquisitionRow>,
    pub summary: Vec<GroupReport>,
}

impl Report {
    pub fn build(groups: &[TimeSeriesGroup], store: &RoiStore) -> Self {
        Self {
            acquisitions: acquisition_rows(groups, store),
            summary: summarize_groups(groups, store),
        }
    }
}
