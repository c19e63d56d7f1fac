// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! SonoROI - time-series ROI analysis for ultrasound acquisitions
//!
//! Groups timestamped acquisitions into time series, classifies them by
//! pixel spacing, tracks operator-drawn regions of interest per group with
//! undo, and aggregates masked pixel intensity across every frame.

pub mod analysis;
pub mod app;
pub mod error;
pub mod io;
pub mod models;
pub mod store;
pub mod util;

pub use app::Session;
pub use error::{Result, SonoError};
pub use store::RoiStore;
