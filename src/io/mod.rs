// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for acquisitions, pixel data and sidecar files.

pub mod manifest;
pub mod media;
pub mod metadata;
pub mod serialization;
