// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Classification, grouping, filtering and intensity statistics.

pub mod classifier;
pub mod filter;
pub mod grouping;
pub mod statistics;

pub use classifier::{classify, Classifier};
pub use grouping::group_acquisitions;
pub use statistics::{
    acquisition_rows, compute_mean_intensity, summarize, summarize_groups, AcquisitionRow, GroupReport,
    IntensitySummary, Report,
};
