// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pixel access for acquisitions.
//!
//! Decoding the native acquisition container is not done here. Statistics
//! only need dimensions, a frame count and per-pixel RGB for each frame,
//! which is what [`PixelProvider`] exposes. Two providers are included: one
//! over pre-decoded frames in memory and one over a sequence of image
//! files, one file per frame.

use crate::error::{Result, SonoError};
use crate::models::Acquisition;
use image::RgbImage;
use std::path::{Path, PathBuf};

/// Source of decoded frames for one acquisition.
pub trait PixelProvider {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn frame_count(&self) -> usize;
    /// Decode frame `index`. Callers treat an error as "skip this frame".
    fn render_frame(&self, index: usize) -> Result<Frame>;
}

/// One rendered RGB frame.
#[derive(Debug, Clone)]
pub struct Frame {
    image: RgbImage,
}

impl Frame {
    pub fn new(image: RgbImage) -> Self {
        Self { image }
    }

    /// RGB at `(x, y)`, or `None` outside the decoded image.
    pub fn rgb(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }
}

/// Decode a single image file to 8-bit RGB.
pub fn load_frame(path: &Path) -> Result<RgbImage> {
    Ok(image::open(path)?.to_rgb8())
}

/// Frames held in memory. Dimensions come from the first frame.
#[derive(Debug, Clone, Default)]
pub struct FrameStack {
    frames: Vec<RgbImage>,
}

impl FrameStack {
    pub fn new(frames: Vec<RgbImage>) -> Self {
        Self { frames }
    }
}

impl PixelProvider for FrameStack {
    fn width(&self) -> u32 {
        self.frames.first().map_or(0, |f| f.width())
    }

    fn height(&self) -> u32 {
        self.frames.first().map_or(0, |f| f.height())
    }

    fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn render_frame(&self, index: usize) -> Result<Frame> {
        self.frames
            .get(index)
            .cloned()
            .map(Frame::new)
            .ok_or(SonoError::FrameOutOfRange {
                index,
                count: self.frames.len(),
            })
    }
}

/// Frames decoded lazily from image files.
///
/// Width, height and frame count are the acquisition's metadata, so a
/// frame whose file is missing or undecodable fails on its own without
/// affecting the others.
#[derive(Debug, Clone)]
pub struct ImageSequence {
    width: u32,
    height: u32,
    frame_count: usize,
    files: Vec<PathBuf>,
}

impl ImageSequence {
    pub fn new(width: u32, height: u32, frame_count: usize, files: Vec<PathBuf>) -> Self {
        Self {
            width,
            height,
            frame_count,
            files,
        }
    }

    pub fn for_acquisition(acquisition: &Acquisition) -> Self {
        Self::new(
            acquisition.width,
            acquisition.height,
            acquisition.frame_count,
            acquisition.frame_files.clone(),
        )
    }
}

impl PixelProvider for ImageSequence {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn frame_count(&self) -> usize {
        self.frame_count
    }

    fn render_frame(&self, index: usize) -> Result<Frame> {
        let path = self.files.get(index).ok_or(SonoError::FrameOutOfRange {
            index,
            count: self.files.len(),
        })?;
        load_frame(path).map(Frame::new)
    }
}
