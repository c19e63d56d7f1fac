// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Gap-based temporal grouping of acquisitions.
//!
//! Timestamped acquisitions are sorted and scanned in order; a new group
//! starts whenever the gap to the previous acquisition exceeds the window.
//! Acquisitions without a timestamp are collected into one trailing group.

use crate::models::group::{UNKNOWN_GROUP_ID, UNKNOWN_GROUP_LABEL};
use crate::models::{Acquisition, TimeSeriesGroup};
use chrono::{NaiveDateTime, TimeDelta};

/// Partition `items` into time-series groups.
///
/// A gap strictly greater than `window_seconds` starts a new group, so a
/// non-positive window puts every distinct timestamp in its own group.
/// Output is deterministic for identical input and window.
pub fn group_acquisitions(items: &[Acquisition], window_seconds: f64) -> Vec<TimeSeriesGroup> {
    let (mut timed, untimed): (Vec<&Acquisition>, Vec<&Acquisition>) =
        items.iter().partition(|a| a.acquired_at.is_some());
    timed.sort_by_key(|a| a.acquired_at);
    let window = window_delta(window_seconds);

    let mut clusters: Vec<Vec<Acquisition>> = Vec::new();
    let mut last: Option<NaiveDateTime> = None;
    for acquisition in timed {
        let Some(t) = acquisition.acquired_at else {
            continue;
        };
        match (last, clusters.last_mut()) {
            (Some(prev), Some(current)) if window.is_some_and(|w| t - prev <= w) => {
                current.push(acquisition.clone());
            }
            _ => clusters.push(vec![acquisition.clone()]),
        }
        last = Some(t);
    }

    let mut groups: Vec<TimeSeriesGroup> = clusters.into_iter().filter_map(finish_cluster).collect();

    if !untimed.is_empty() {
        groups.push(TimeSeriesGroup::new(
            UNKNOWN_GROUP_ID,
            UNKNOWN_GROUP_LABEL,
            untimed.into_iter().cloned().collect(),
        ));
    }

    log::debug!(
        "Grouped {} acquisitions into {} groups (window {}s)",
        items.len(),
        groups.len(),
        window_seconds
    );
    groups
}

/// Window as a duration at nanosecond precision, or `None` when every gap
/// exceeds it (negative or NaN).
fn window_delta(window_seconds: f64) -> Option<TimeDelta> {
    if window_seconds.is_nan() || window_seconds < 0.0 {
        return None;
    }
    let nanos = (window_seconds * 1e9).round();
    if nanos >= i64::MAX as f64 {
        return Some(TimeDelta::MAX);
    }
    Some(TimeDelta::nanoseconds(nanos as i64))
}

fn finish_cluster(acquisitions: Vec<Acquisition>) -> Option<TimeSeriesGroup> {
    let first = acquisitions.first()?.acquired_at?;
    let last = acquisitions.last()?.acquired_at?;
    let label = if first == last {
        first.format("%H:%M:%S").to_string()
    } else {
        format!("{} - {}", first.format("%H:%M:%S"), last.format("%H:%M:%S"))
    };
    Some(TimeSeriesGroup::new(
        format!("group_{}", first.format("%Y%m%d%H%M%S")),
        label,
        acquisitions,
    ))
}
