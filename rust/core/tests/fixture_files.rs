// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Loads the sample files under `tests/fixtures` through the public API.

use std::path::PathBuf;

use sinusx_core::{
    load_file, CoordinateShift, CurveType, FileStatus, LoadParameters, LoadReport, Severity,
    ShiftMode, Status, UpAxis,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load(name: &str) -> LoadReport {
    load_file(fixture(name), &LoadParameters::default()).expect("fixture should load")
}

#[test]
fn test_mixed_curve_types() {
    let report = load("mixed_types.sx");
    assert_eq!(report.status(), Status::Ok);
    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    assert_eq!(report.shift, None);

    let types: Vec<CurveType> = report.polylines.iter().map(|p| p.curve_type).collect();
    assert_eq!(
        types,
        vec![
            CurveType::Set,
            CurveType::Profile,
            CurveType::PlaneAtAltitude,
            CurveType::Circle
        ]
    );

    let bank = &report.polylines[0];
    assert_eq!(bank.name, "bank line");
    assert_eq!(bank.len(), 3);
    assert!(!bank.closed);

    let profile = &report.polylines[1];
    assert_eq!(profile.name, "profile 12");
    assert_eq!(profile.up_axis, UpAxis::Y);

    let contour = &report.polylines[2];
    assert!(contour.closed);
    assert_eq!(contour.const_altitude, Some(100.0));
    assert_eq!(contour.up_axis, UpAxis::Z);

    let pillar = &report.polylines[3];
    assert_eq!(pillar.name, "pillar");
    assert!(pillar.closed);
    assert!(!pillar.visible);
    assert!(pillar.vertices_visible);
    assert_eq!(pillar.len(), 4);
}

#[test]
fn test_corrupted_file_is_partially_recovered() {
    let report = load("corrupted.sx");
    assert_eq!(report.status(), Status::Malformed);
    assert_eq!(
        FileStatus::from(report.status()),
        FileStatus::MalformedContent
    );

    let names: Vec<&str> = report.polylines.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["first", "last"]);
    assert_eq!(report.polylines[0].len(), 2);
    assert_eq!(report.polylines[0].vertices[1].x, 2.0);

    let malformed_lines: Vec<usize> = report
        .diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Malformed)
        .filter_map(|d| d.line)
        .collect();
    assert_eq!(malformed_lines, vec![7, 9, 10, 23, 24]);

    let warnings: Vec<_> = report
        .diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].line, Some(16));
    assert!(warnings[0].message.contains("too short"));
}

#[test]
fn test_large_coordinates_are_recentered_once() {
    let report = load("lambert93.sx");
    assert_eq!(report.status(), Status::Ok);

    let shift = report.shift.expect("recentering expected");
    assert_eq!(shift, CoordinateShift::new(652_300.0, 6_862_300.0, 0.0));

    for poly in &report.polylines {
        assert_eq!(poly.global_shift, Some(shift));
    }
    let south = &report.polylines[1];
    assert_eq!(south.vertices[0].x, -200.0);
    assert_eq!(south.vertices[0].y, -200.0);
    assert!(south.closed);
}

#[test]
fn test_shift_can_be_disabled() {
    let params = LoadParameters::with_shift(ShiftMode::Disabled);
    let report = load_file(fixture("lambert93.sx"), &params).unwrap();
    assert_eq!(report.shift, None);
    assert_eq!(report.polylines[0].vertices[0].x, 652_310.125);
    assert_eq!(report.polylines[0].global_shift, None);
}
