// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! End-to-end workflow over a synthetic acquisition directory.

use image::{Rgb, RgbImage};
use sonoroi::analysis::{group_acquisitions, summarize_groups, Classifier, Report};
use sonoroi::io::manifest::{load_directory, MANIFEST_FILE_NAME};
use sonoroi::io::serialization::{import_yaml, ROI_FILE_NAME};
use sonoroi::models::{BoundingBox, Classification, RoiShape, ShapeKind};
use sonoroi::{RoiStore, Session};
use std::path::Path;
use tempfile::tempdir;

/// Two bursts of acquisitions a few minutes apart plus one without a
/// timestamp. Each frame is a flat grey level.
fn write_fixture(dir: &Path) {
    let frames = [("s1_0.png", 100u8), ("s1_1.png", 200), ("s2_0.png", 50), ("c1_0.png", 10), ("u_0.png", 255)];
    for (name, level) in frames {
        RgbImage::from_pixel(32, 24, Rgb([level, level, level]))
            .save(dir.join(name))
            .unwrap();
    }
    std::fs::write(
        dir.join(MANIFEST_FILE_NAME),
        r#"[
            {"name": "IM_0001", "width": 32, "height": 24, "frameCount": 2,
             "acquisitionDateTime": "20251125101500", "pixelSpacing": "0.29\\0.29",
             "frames": ["s1_0.png", "s1_1.png"]},
            {"name": "IM_0002", "width": 32, "height": 24,
             "acquisitionDate": "20251125", "acquisitionTime": "101540",
             "pixelSpacing": [0.51, 0.51], "frames": ["s2_0.png"]},
            {"name": "IM_0003", "width": 32, "height": 24,
             "acquisitionDateTime": "20251125102500", "pixelSpacing": "0.4",
             "frames": ["c1_0.png"]},
            {"name": "IM_0004", "width": 32, "height": 24, "frames": ["u_0.png"]}
        ]"#,
    )
    .unwrap();
}

#[test]
fn test_load_classify_group() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());

    let mut acquisitions = load_directory(dir.path()).unwrap();
    Classifier::default().classify_all(&mut acquisitions);

    let classes: Vec<_> = acquisitions.iter().map(|a| a.classification).collect();
    assert_eq!(
        classes,
        vec![Classification::Shi, Classification::Ceus, Classification::Ceus, Classification::Ceus]
    );

    let groups = group_acquisitions(&acquisitions, 60.0);
    let ids: Vec<_> = groups.iter().map(|g| g.id.as_str()).collect();
    assert_eq!(ids, vec!["group_20251125101500", "group_20251125102500", "group_unknown"]);
    assert_eq!(groups[0].label, "10:15:00 - 10:15:40");
    assert_eq!(groups[1].label, "10:25:00");

    let wide = group_acquisitions(&acquisitions, 900.0);
    assert_eq!(wide.len(), 2);
    assert_eq!(wide[0].len(), 3);
}

#[test]
fn test_session_roi_statistics_roundtrip() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());
    let group = "group_20251125101500";

    let mut session = Session::open(dir.path()).unwrap();
    let lead = session
        .add_roi(group, RoiShape::rectangle(4.0, 4.0, 10.0, 10.0))
        .unwrap();
    session
        .add_roi(group, RoiShape::freeform([(0.0, 0.0), (31.0, 0.0), (16.0, 23.0)]))
        .unwrap();

    assert!(session.compute_group_means(group).unwrap());
    session.wait_for_means().unwrap();

    let regions = session.store().regions(group);
    assert_eq!(regions[0].id, lead);
    assert!((regions[0].file_means["IM_0001"] - 150.0).abs() < 1e-9);
    assert!((regions[0].file_means["IM_0002"] - 50.0).abs() < 1e-9);
    assert!(regions[1].file_means.is_empty());

    assert!(dir.path().join(ROI_FILE_NAME).exists());
    let mut reloaded = RoiStore::new();
    reloaded.load(dir.path());
    assert_eq!(reloaded.regions(group), regions);

    let report = summarize_groups(session.groups(), &reloaded);
    assert_eq!(report.len(), 1);
    let summary = report[0].summary;
    assert_eq!(summary.count, 2);
    assert!((summary.mean - 100.0).abs() < 1e-9);
    assert_eq!(summary.min, 50.0);
    assert_eq!(summary.max, 150.0);
    assert!((summary.std_dev - 5000.0f64.sqrt()).abs() < 1e-9);

    let out = dir.path().join("report.yaml");
    session.export_report(&out).unwrap();
    let exported: Report = import_yaml(&out).unwrap();
    assert_eq!(exported.summary, report);
    let names: Vec<_> = exported.acquisitions.iter().map(|r| r.acquisition.as_str()).collect();
    assert_eq!(names, vec!["IM_0001", "IM_0002"]);
    assert!((exported.acquisitions[0].mean.unwrap() - 150.0).abs() < 1e-9);
    assert!((exported.acquisitions[1].mean.unwrap() - 50.0).abs() < 1e-9);
    assert!(exported
        .acquisitions
        .iter()
        .all(|r| r.shape == ShapeKind::Rectangle && r.bounds == BoundingBox::new(4.0, 4.0, 10.0, 10.0)));
}

#[test]
fn test_missing_frames_are_skipped() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());
    std::fs::remove_file(dir.path().join("s1_1.png")).unwrap();
    let group = "group_20251125101500";

    let mut session = Session::open(dir.path()).unwrap();
    session
        .add_roi(group, RoiShape::ellipse(0.0, 0.0, 32.0, 24.0))
        .unwrap();

    let mean = session.compute_mean(group, "IM_0001").unwrap().unwrap();

    assert!((mean - 100.0).abs() < 1e-9);
}

#[test]
fn test_legacy_sidecar_is_upgraded_on_save() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());
    std::fs::write(
        dir.path().join(ROI_FILE_NAME),
        r#"{"group_20251125102500": {"id": "old", "shape": 0, "x": 0, "y": 0, "width": 5, "height": 5,
             "points": [], "fileMeans": {"IM_0003": 10.0}}}"#,
    )
    .unwrap();

    let mut session = Session::open(dir.path()).unwrap();
    assert_eq!(session.store().regions("group_20251125102500").len(), 1);

    session
        .add_roi("group_20251125102500", RoiShape::rectangle(1.0, 1.0, 2.0, 2.0))
        .unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join(ROI_FILE_NAME)).unwrap()).unwrap();
    let entry = raw["group_20251125102500"].as_array().unwrap();
    assert_eq!(entry.len(), 2);
    assert_eq!(entry[0]["id"], "old");
}
