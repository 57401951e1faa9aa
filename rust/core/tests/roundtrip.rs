// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Write-then-read behaviour of the codec.

use std::path::PathBuf;

use approx::assert_relative_eq;
use sinusx_core::{
    load_file, read_str, save_file, write_string, LoadParameters, Point3, Polyline, Status,
    UpAxis,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn vertex_lines(text: &str) -> Vec<&str> {
    text.lines().filter(|l| l.ends_with(" A")).collect()
}

#[test]
fn test_set_curve_roundtrip() {
    let original = Polyline::from_vertices(
        "levee",
        vec![
            Point3::new(0.123456789012, -4.5, 17.25),
            Point3::new(1.0, 2.0, 3.0),
            Point3::new(-7.75, 1e-6, 0.0),
        ],
    );

    let (text, save) = write_string(std::slice::from_ref(&original)).unwrap();
    assert_eq!(save.status(), Status::Ok);

    let report = read_str(&text, &LoadParameters::default()).unwrap();
    assert_eq!(report.status(), Status::Ok);
    assert_eq!(report.polylines.len(), 1);

    let read = &report.polylines[0];
    assert_eq!(read.name, "levee");
    assert!(!read.closed);
    assert_eq!(read.up_axis, UpAxis::Z);
    assert_eq!(read.len(), original.len());
    for (a, b) in read.vertices.iter().zip(&original.vertices) {
        assert_relative_eq!(a.x, b.x, epsilon = 1e-12);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-12);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-12);
    }
}

#[test]
fn test_names_lose_spaces() {
    let poly = Polyline::from_vertices(
        "left bank",
        vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0)],
    )
    .with_closed(true);
    let (text, _) = write_string(&[poly]).unwrap();

    let report = read_str(&text, &LoadParameters::default()).unwrap();
    assert_eq!(report.polylines[0].name, "left_bank");
    assert!(report.polylines[0].closed);
}

#[test]
fn test_plane_at_altitude_keeps_altitude_exactly() {
    for altitude in [0.0, 125.75, -3.125, 1234.000000000001] {
        let text = format!(
            "B N\nCP 1 0\nCP {:+.12}\nCP 0\n0 0 0 A\n1 1 1 A\n",
            altitude
        );
        let report = read_str(&text, &LoadParameters::default()).unwrap();
        let expected: f64 = format!("{:.12}", altitude).parse().unwrap();
        assert_eq!(report.polylines[0].const_altitude, Some(expected));
    }
}

#[test]
fn test_shifted_load_writes_original_coordinates() {
    let path = fixture("lambert93.sx");
    let source = std::fs::read_to_string(&path).unwrap();

    let report = load_file(&path, &LoadParameters::default()).unwrap();
    assert!(report.shift.is_some());

    let (text, save) = write_string(&report.polylines).unwrap();
    assert_eq!(save.written, 2);
    assert_eq!(vertex_lines(&text), vertex_lines(&source));
}

#[test]
fn test_save_file_then_load_file() {
    let path = std::env::temp_dir().join(format!("sinusx_roundtrip_{}.sx", std::process::id()));
    let polylines = vec![
        Polyline::from_vertices(
            "a",
            vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)],
        ),
        Polyline::from_vertices("too short", vec![Point3::new(0.0, 0.0, 0.0)]),
        Polyline::from_vertices(
            "b",
            vec![Point3::new(0.0, 1.0, 0.0), Point3::new(1.0, 1.0, 0.0)],
        )
        .with_2d_axis(UpAxis::X),
    ];

    let save = save_file(&path, &polylines).unwrap();
    assert_eq!(save.status(), Status::Ok);
    assert_eq!((save.written, save.skipped), (2, 1));

    let report = load_file(&path, &LoadParameters::default()).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(report.status(), Status::Ok);
    assert_eq!(report.polylines.len(), 2);
    assert_eq!(report.polylines[1].name, "b");
    assert_eq!(report.polylines[1].up_axis, UpAxis::X);
}
