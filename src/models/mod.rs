// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: acquisitions, groups, ROIs and folder settings.

pub mod acquisition;
pub mod group;
pub mod roi;
pub mod settings;

pub use acquisition::{Acquisition, Classification};
pub use group::TimeSeriesGroup;
pub use roi::{BoundingBox, Point, RoiRegion, RoiShape, ShapeKind};
pub use settings::FolderSettings;
