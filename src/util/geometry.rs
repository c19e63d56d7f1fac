// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! Point containment and bounding boxes for ROI shapes, plus the pixel
//! scan window used when masking an image with a shape. Everything here
//! is a pure function of its arguments.

use crate::models::roi::{BoundingBox, Point, RoiShape};

/// Test whether `(px, py)` lies inside `shape`.
///
/// Rectangle and ellipse boundaries are inclusive. Freeform shapes use the
/// even-odd crossing rule over the implicitly closed vertex ring.
pub fn contains_point(shape: &RoiShape, px: f64, py: f64) -> bool {
    match shape {
        RoiShape::Rectangle(b) => {
            px >= b.x && px <= b.x + b.width && py >= b.y && py <= b.y + b.height
        }
        RoiShape::Ellipse(b) => ellipse_contains(b, px, py),
        RoiShape::Freeform(points) => polygon_contains(points, px, py),
    }
}

fn ellipse_contains(b: &BoundingBox, px: f64, py: f64) -> bool {
    let rx = b.width / 2.0;
    let ry = b.height / 2.0;
    if rx <= 0.0 || ry <= 0.0 {
        return false;
    }
    let dx = (px - (b.x + rx)) / rx;
    let dy = (py - (b.y + ry)) / ry;
    dx * dx + dy * dy <= 1.0
}

fn polygon_contains(points: &[Point], px: f64, py: f64) -> bool {
    if points.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = points.len() - 1;
    for (i, pi) in points.iter().enumerate() {
        let pj = &points[j];
        if (pi.y > py) != (pj.y > py) && px < (pj.x - pi.x) * (py - pi.y) / (pj.y - pi.y) + pi.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Bounding box of a shape.
///
/// Rectangle and ellipse return their stored box. Freeform returns the
/// floor of the vertex minimum and the ceiling of the vertex maximum, so the
/// result is integral; an empty vertex list yields an all-zero box.
pub fn bounding_box(shape: &RoiShape) -> BoundingBox {
    match shape {
        RoiShape::Rectangle(b) | RoiShape::Ellipse(b) => *b,
        RoiShape::Freeform(points) => {
            let Some(first) = points.first() else {
                return BoundingBox::default();
            };
            let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
            for p in &points[1..] {
                min_x = min_x.min(p.x);
                min_y = min_y.min(p.y);
                max_x = max_x.max(p.x);
                max_y = max_y.max(p.y);
            }
            let (x, y) = (min_x.floor(), min_y.floor());
            BoundingBox::new(x, y, max_x.ceil() - x, max_y.ceil() - y)
        }
    }
}

/// Integer pixel window, half-open: columns `x..x + width`, rows `y..y + height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelWindow {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelWindow {
    /// Iterate `(x, y)` over every pixel in the window, row by row.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.y..self.y + self.height).flat_map(move |y| (self.x..self.x + self.width).map(move |x| (x, y)))
    }
}

/// Pixel window to scan when masking an image of `image_width` x
/// `image_height` with `shape`, or `None` when nothing of the shape falls
/// inside the image.
///
/// Rectangle and ellipse boxes are rounded half-to-even first.
pub fn scan_window(shape: &RoiShape, image_width: u32, image_height: u32) -> Option<PixelWindow> {
    let b = match shape {
        RoiShape::Rectangle(b) | RoiShape::Ellipse(b) => BoundingBox::new(
            b.x.round_ties_even(),
            b.y.round_ties_even(),
            b.width.round_ties_even(),
            b.height.round_ties_even(),
        ),
        RoiShape::Freeform(_) => bounding_box(shape),
    };

    let x0 = b.x.max(0.0);
    let y0 = b.y.max(0.0);
    let x1 = (b.x + b.width).min(image_width as f64);
    let y1 = (b.y + b.height).min(image_height as f64);
    if !(x1 - x0 > 0.0 && y1 - y0 > 0.0) {
        return None;
    }

    Some(PixelWindow {
        x: x0 as u32,
        y: y0 as u32,
        width: (x1 - x0) as u32,
        height: (y1 - y0) as u32,
    })
}
