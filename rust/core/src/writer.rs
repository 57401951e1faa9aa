// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! SinusX writer
//!
//! Every curve is written as a generic `S` block in absolute coordinates,
//! whatever type it was read from.

use std::io::Write;

use crate::diagnostics::{DiagnosticLog, SaveReport};
use crate::error::Result;
use crate::fast_parse::format_coordinate;
use crate::model::{Polyline, UpAxis};

/// Token closing every vertex line
const POINT_TERMINATOR: &str = "A";

/// Streams polylines to a SinusX sink
pub struct SinusxWriter<W: Write> {
    out: W,
    header_written: bool,
    /// 1-based index of the last curve handed to the writer
    index: usize,
    written: usize,
    skipped: usize,
    log: DiagnosticLog,
}

impl<W: Write> SinusxWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            header_written: false,
            index: 0,
            written: 0,
            skipped: 0,
            log: DiagnosticLog::default(),
        }
    }

    /// Write the leading comment; done automatically before the first block
    pub fn write_header(&mut self) -> Result<()> {
        if !self.header_written {
            writeln!(self.out, "C Generated by sinusx {}", env!("CARGO_PKG_VERSION"))?;
            self.header_written = true;
        }
        Ok(())
    }

    /// Write one curve; returns `false` if it was skipped for lack of vertices
    pub fn write_polyline(&mut self, poly: &Polyline) -> Result<bool> {
        self.index += 1;
        if !poly.is_valid() {
            self.skipped += 1;
            self.log.warning(
                None,
                format!(
                    "Polyline '{}' (#{}) does not have enough vertices",
                    poly.name, self.index
                ),
            );
            return Ok(false);
        }

        self.write_header()?;

        // Base plane is only meaningful for 2D curves; 3D ones get (XY)
        let base_plane = if poly.is_2d {
            poly.up_axis.base_plane_code()
        } else {
            UpAxis::Z.base_plane_code()
        };

        writeln!(self.out, "B S")?;
        writeln!(self.out, "CN {}", poly.sinusx_name())?;
        writeln!(self.out, "CP 1 {}", u8::from(poly.closed))?;
        writeln!(self.out, "CP {}", base_plane)?;

        for p in poly.global_vertices() {
            writeln!(
                self.out,
                " {} {} {} {}",
                format_coordinate(p.x),
                format_coordinate(p.y),
                format_coordinate(p.z),
                POINT_TERMINATOR
            )?;
        }

        self.written += 1;
        tracing::debug!(name = %poly.name, vertices = poly.len(), "[SinusX] Curve written");
        Ok(true)
    }

    /// Flush the sink and hand it back with the report
    pub fn finish(mut self) -> Result<(W, SaveReport)> {
        self.out.flush()?;
        let report = SaveReport {
            written: self.written,
            skipped: self.skipped,
            diagnostics: self.log.into_entries(),
        };
        tracing::info!(
            written = report.written,
            skipped = report.skipped,
            status = ?report.status(),
            "[SinusX] Save complete"
        );
        Ok((self.out, report))
    }
}

/// Write all curves to `out`
pub fn write_polylines<W: Write>(out: W, polylines: &[Polyline]) -> Result<SaveReport> {
    let mut writer = SinusxWriter::new(out);
    for poly in polylines {
        writer.write_polyline(poly)?;
    }
    let (_, report) = writer.finish()?;
    Ok(report)
}

/// Write all curves into a string
pub fn write_string(polylines: &[Polyline]) -> Result<(String, SaveReport)> {
    let mut writer = SinusxWriter::new(Vec::new());
    for poly in polylines {
        writer.write_polyline(poly)?;
    }
    let (buf, report) = writer.finish()?;
    Ok((String::from_utf8_lossy(&buf).into_owned(), report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Status;
    use crate::shift::CoordinateShift;
    use nalgebra::Point3;

    fn square() -> Polyline {
        Polyline::from_vertices(
            "my square",
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, -2.5),
            ],
        )
    }

    #[test]
    fn test_write_single_curve() {
        let (text, report) = write_string(&[square().with_closed(true)]).unwrap();
        assert_eq!(report.status(), Status::Ok);
        assert_eq!(report.written, 1);

        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("C Generated by sinusx"));
        assert_eq!(lines[1], "B S");
        assert_eq!(lines[2], "CN my_square");
        assert_eq!(lines[3], "CP 1 1");
        assert_eq!(lines[4], "CP 0");
        assert_eq!(lines[5], " +0.000000000000 +0.000000000000 +0.000000000000 A");
        assert_eq!(lines[7], " +1.000000000000 +1.000000000000 -2.500000000000 A");
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn test_base_plane_follows_up_axis_only_in_2d() {
        let (text, _) = write_string(&[
            square().with_2d_axis(UpAxis::Y),
            square().with_2d_axis(UpAxis::X),
            Polyline {
                up_axis: UpAxis::X,
                ..square()
            },
        ])
        .unwrap();
        let planes: Vec<&str> = text
            .lines()
            .filter(|l| l.starts_with("CP ") && l.len() == 4)
            .collect();
        assert_eq!(planes, vec!["CP 2", "CP 1", "CP 0"]);
    }

    #[test]
    fn test_vertices_are_written_in_global_frame() {
        let poly = square().with_global_shift(CoordinateShift::new(500_000.0, 5_000_000.0, 0.0));
        let (text, _) = write_string(&[poly]).unwrap();
        assert!(text.contains(" +500000.000000000000 +5000000.000000000000 +0.000000000000 A"));
    }

    #[test]
    fn test_short_curves_are_skipped() {
        let short = Polyline::from_vertices("dot", vec![Point3::new(1.0, 1.0, 1.0)]);
        let (text, report) = write_string(&[short.clone(), square()]).unwrap();
        assert_eq!(report.status(), Status::Ok);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.diagnostics.len(), 1);
        assert!(report.diagnostics[0].message.contains("'dot' (#1)"));
        assert_eq!(text.matches("B S").count(), 1);

        let (text, report) = write_string(&[short, Polyline::new("empty")]).unwrap();
        assert_eq!(report.status(), Status::NothingToSave);
        assert_eq!(report.skipped, 2);
        assert!(text.is_empty());
    }
}
