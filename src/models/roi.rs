// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! ROI data structures.
//!
//! This module defines the shapes an operator can draw over an image and
//! the region record that carries a shape together with the mean
//! intensities computed for it.
//!
//! Shapes live in memory as a closed enum. On disk a region is a flat
//! record (`shape`, `x`, `y`, `width`, `height`, `points`, `fileMeans`),
//! converted through [`RoiRecord`].

use crate::util::geometry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A 2D point in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Geometry of a region of interest.
#[derive(Debug, Clone, PartialEq)]
pub enum RoiShape {
    Rectangle(BoundingBox),
    /// Axis-aligned ellipse inscribed in the box.
    Ellipse(BoundingBox),
    /// Implicitly closed polygon. Fewer than 3 vertices never contains anything.
    Freeform(Vec<Point>),
}

impl RoiShape {
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Self {
        RoiShape::Rectangle(BoundingBox::new(x, y, width, height))
    }

    pub fn ellipse(x: f64, y: f64, width: f64, height: f64) -> Self {
        RoiShape::Ellipse(BoundingBox::new(x, y, width, height))
    }

    pub fn freeform(points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        RoiShape::Freeform(points.into_iter().map(|(x, y)| Point::new(x, y)).collect())
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            RoiShape::Rectangle(_) => ShapeKind::Rectangle,
            RoiShape::Ellipse(_) => ShapeKind::Ellipse,
            RoiShape::Freeform(_) => ShapeKind::Freeform,
        }
    }
}

/// Discriminant of [`RoiShape`], as written to the sidecar file.
///
/// Reading also accepts the numeric form (0, 1, 2) and any letter case,
/// which older sidecars use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "KindRepr")]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    Freeform,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum KindRepr {
    Index(u8),
    Name(String),
}

impl TryFrom<KindRepr> for ShapeKind {
    type Error = String;

    fn try_from(repr: KindRepr) -> Result<Self, Self::Error> {
        match repr {
            KindRepr::Index(0) => Ok(ShapeKind::Rectangle),
            KindRepr::Index(1) => Ok(ShapeKind::Ellipse),
            KindRepr::Index(2) => Ok(ShapeKind::Freeform),
            KindRepr::Index(n) => Err(format!("unknown shape index {}", n)),
            KindRepr::Name(name) => match name.to_ascii_lowercase().as_str() {
                "rectangle" => Ok(ShapeKind::Rectangle),
                "ellipse" => Ok(ShapeKind::Ellipse),
                "freeform" => Ok(ShapeKind::Freeform),
                _ => Err(format!("unknown shape kind {:?}", name)),
            },
        }
    }
}

/// A region of interest owned by one time-series group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RoiRecord", into = "RoiRecord")]
pub struct RoiRegion {
    /// Unique within the owning group. Empty until the store assigns one.
    pub id: String,
    pub group_id: String,
    pub shape: RoiShape,
    /// Mean intensity per acquisition name.
    pub file_means: BTreeMap<String, f64>,
}

impl RoiRegion {
    /// Create a region with no id, no group and no computed means.
    pub fn new(shape: RoiShape) -> Self {
        Self {
            id: String::new(),
            group_id: String::new(),
            shape,
            file_means: BTreeMap::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Test whether an image-space point is inside this region.
    pub fn contains_point(&self, px: f64, py: f64) -> bool {
        geometry::contains_point(&self.shape, px, py)
    }
}

/// Flat on-disk form of a [`RoiRegion`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoiRecord {
    pub id: String,
    pub group_id: String,
    pub shape: Option<ShapeKind>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub points: Vec<[f64; 2]>,
    pub file_means: BTreeMap<String, f64>,
}

impl From<RoiRecord> for RoiRegion {
    fn from(record: RoiRecord) -> Self {
        let bounds = BoundingBox::new(record.x, record.y, record.width, record.height);
        let shape = match record.shape.unwrap_or(ShapeKind::Rectangle) {
            ShapeKind::Rectangle => RoiShape::Rectangle(bounds),
            ShapeKind::Ellipse => RoiShape::Ellipse(bounds),
            ShapeKind::Freeform => RoiShape::Freeform(
                record.points.iter().map(|p| Point::new(p[0], p[1])).collect(),
            ),
        };
        Self {
            id: record.id,
            group_id: record.group_id,
            shape,
            file_means: record.file_means,
        }
    }
}

impl From<RoiRegion> for RoiRecord {
    fn from(region: RoiRegion) -> Self {
        let bounds = geometry::bounding_box(&region.shape);
        let points = match &region.shape {
            RoiShape::Freeform(points) => points.iter().map(|p| [p.x, p.y]).collect(),
            _ => Vec::new(),
        };
        Self {
            id: region.id,
            group_id: region.group_id,
            shape: Some(region.shape.kind()),
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            points,
            file_means: region.file_means,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_roundtrip_keeps_freeform_points() {
        let mut region = RoiRegion::new(RoiShape::freeform([(0.0, 0.0), (10.5, 0.0), (5.0, 9.2)]))
            .with_id("a");
        region.file_means.insert("IM_0001".to_string(), 42.0);

        let json = serde_json::to_string(&region).unwrap();
        let back: RoiRegion = serde_json::from_str(&json).unwrap();

        assert_eq!(back, region);
    }

    #[test]
    fn test_record_writes_camel_case_fields() {
        let region = RoiRegion::new(RoiShape::ellipse(1.0, 2.0, 3.0, 4.0)).with_id("e");
        let value = serde_json::to_value(&region).unwrap();

        assert_eq!(value["shape"], "ellipse");
        assert_eq!(value["width"], 3.0);
        assert!(value.get("fileMeans").is_some());
        assert!(value.get("groupId").is_some());
    }

    #[test]
    fn test_shape_kind_accepts_numeric_and_mixed_case() {
        let kinds: Vec<ShapeKind> = serde_json::from_str(r#"[0, "Ellipse", "FREEFORM"]"#).unwrap();
        assert_eq!(kinds, vec![ShapeKind::Rectangle, ShapeKind::Ellipse, ShapeKind::Freeform]);

        assert!(serde_json::from_str::<ShapeKind>("7").is_err());
        assert!(serde_json::from_str::<ShapeKind>(r#""hexagon""#).is_err());
    }

    #[test]
    fn test_record_missing_fields_default_to_rectangle() {
        let region: RoiRegion = serde_json::from_str(r#"{"x": 10, "width": 5}"#).unwrap();

        assert_eq!(region.shape, RoiShape::rectangle(10.0, 0.0, 5.0, 0.0));
        assert!(region.id.is_empty());
        assert!(region.file_means.is_empty());
    }
}
