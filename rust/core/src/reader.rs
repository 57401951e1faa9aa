// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! SinusX reader
//!
//! A line-driven state machine. A `B` line opens a block, the following
//! `CP` lines fill in the block header one stage at a time, and every other
//! line is a vertex record. A block is finalized (or discarded when it has
//! fewer than two vertices) when the next `B` line or the end of the stream
//! is reached.
//!
//! Corrupted lines are reported and skipped; they never abort the load.

use std::io::BufRead;

use nalgebra::Point3;

use crate::diagnostics::{DiagnosticLog, LoadReport};
use crate::error::{Error, Result};
use crate::fast_parse::{parse_f64, parse_int, parse_xyz};
use crate::model::{CurveType, Polyline, UpAxis};
use crate::parser::{classify_line, tokenize, Line, Tokens};
use crate::shift::{CoordinateShift, ShiftMode, ShiftPolicy};

/// Values describing a circle's local frame and scale
const CIRCLE_FRAME_VALUES: usize = 16;

/// Vertex storage grows by at least this many points at a time
const VERTEX_CHUNK: usize = 256;

/// Options for a load operation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadParameters {
    pub shift: ShiftMode,
}

impl LoadParameters {
    pub fn with_shift(shift: ShiftMode) -> Self {
        Self { shift }
    }
}

/// Position inside a block header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderStage {
    /// Next `CP` line: `connected closed`
    AwaitingConnectivity,
    /// Next `CP` line carries type-specific data (`P`, `N`, `C` only)
    AwaitingTypeHeader,
    /// Consuming the circle frame values, possibly spread over several lines
    SkippingCircleFrame { remaining: usize },
    /// Next `CP` line: base plane code
    AwaitingBasePlane,
    /// Header complete; further `CP` lines are ignored
    ReadingVertices,
}

impl HeaderStage {
    /// `S` blocks have no type header: the line after the connectivity
    /// descriptor is already the base plane.
    fn after_connectivity(curve_type: CurveType) -> Self {
        match curve_type {
            CurveType::Set => HeaderStage::AwaitingBasePlane,
            _ => HeaderStage::AwaitingTypeHeader,
        }
    }
}

#[derive(Debug)]
struct OpenBlock {
    polyline: Polyline,
    stage: HeaderStage,
    /// Line of the `B` header
    header_line: usize,
}

/// Incremental SinusX reader
///
/// Feed it one line at a time with [`feed_line`](Self::feed_line), then
/// call [`finish`](Self::finish) to close the last block and get the report.
/// If `feed_line` fails (out of memory), the in-flight curve is dropped but
/// curves finalized so far can still be collected with `finish`, or attached
/// to the error with [`fail`](Self::fail).
#[derive(Debug)]
pub struct SinusxReader<P: ShiftPolicy = ShiftMode> {
    policy: P,
    block: Option<OpenBlock>,
    polylines: Vec<Polyline>,
    log: DiagnosticLog,
    /// Decided on the first vertex of the load, then immutable
    shift: Option<Option<CoordinateShift>>,
    line_number: usize,
    blocks_opened: usize,
    /// Per-curve vertex cap; storage growth beyond it fails like an allocation
    vertex_limit: usize,
}

impl SinusxReader<ShiftMode> {
    pub fn new(params: &LoadParameters) -> Self {
        Self::with_policy(params.shift)
    }
}

impl<P: ShiftPolicy> SinusxReader<P> {
    /// Create a reader with a custom recentering policy
    pub fn with_policy(policy: P) -> Self {
        Self {
            policy,
            block: None,
            polylines: Vec::new(),
            log: DiagnosticLog::default(),
            shift: None,
            line_number: 0,
            blocks_opened: 0,
            vertex_limit: usize::MAX,
        }
    }

    /// Number of lines consumed so far
    #[inline]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Shift applied to this load, once the first vertex has been read
    #[inline]
    pub fn shift(&self) -> Option<CoordinateShift> {
        self.shift.flatten()
    }

    /// Curves finalized so far
    #[inline]
    pub fn polylines(&self) -> &[Polyline] {
        &self.polylines
    }

    /// Process one input line
    pub fn feed_line(&mut self, line: &str) -> Result<()> {
        self.line_number += 1;
        let parsed = classify_line(line);

        if self.skip_circle_frame(line, &parsed) {
            return Ok(());
        }

        match parsed {
            Line::Blank | Line::Comment(_) => {}
            Line::BlockHeader(tokens) => {
                self.close_block();
                self.open_block(&tokens);
            }
            Line::Name(name) => {
                if let Some(block) = self.block.as_mut() {
                    if !name.is_empty() {
                        block.polyline.name = name.to_string();
                    }
                }
            }
            Line::Descriptor(tokens) => self.read_descriptor(&tokens),
            Line::Record(tokens) => self.read_vertex(&tokens)?,
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn with_vertex_limit(mut self, limit: usize) -> Self {
        self.vertex_limit = limit;
        self
    }

    /// Close the last block and produce the report
    pub fn finish(mut self) -> LoadReport {
        self.close_block();

        let report = LoadReport {
            polylines: self.polylines,
            diagnostics: self.log.into_entries(),
            shift: self.shift.flatten(),
            lines_read: self.line_number,
        };
        tracing::info!(
            curves = report.polylines.len(),
            vertices = report.vertex_count(),
            lines = report.lines_read,
            status = ?report.status(),
            "[SinusX] Load complete"
        );
        report
    }

    /// Turn a `feed_line` error into the load's final error, attaching the
    /// curves finalized so far to an out-of-memory failure
    pub fn fail(self, err: Error) -> Error {
        match err {
            Error::OutOfMemory { line, .. } => {
                let partial = self.finish();
                tracing::error!(
                    line,
                    recovered = partial.polylines.len(),
                    "[SinusX] Not enough memory, load aborted"
                );
                Error::OutOfMemory {
                    line,
                    partial: Box::new(partial),
                }
            }
            other => other,
        }
    }

    /// Circle frames are skipped positionally: every raw token counts,
    /// whatever the line looks like. A blank line or a new block ends the
    /// skip early. Returns `true` when the line was consumed.
    fn skip_circle_frame(&mut self, raw: &str, parsed: &Line<'_>) -> bool {
        let Some(block) = self.block.as_mut() else {
            return false;
        };
        let HeaderStage::SkippingCircleFrame { remaining } = block.stage else {
            return false;
        };

        match parsed {
            Line::BlockHeader(_) => {
                block.stage = HeaderStage::AwaitingBasePlane;
                false
            }
            Line::Blank => {
                block.stage = HeaderStage::AwaitingBasePlane;
                true
            }
            _ => {
                let count = tokenize(raw).len();
                block.stage = if count >= remaining {
                    HeaderStage::AwaitingBasePlane
                } else {
                    HeaderStage::SkippingCircleFrame {
                        remaining: remaining - count,
                    }
                };
                true
            }
        }
    }

    fn open_block(&mut self, tokens: &Tokens<'_>) {
        let line = self.line_number;

        let tag = match tokens.first() {
            Some(tag) if tag.chars().count() == 1 => tag.chars().next(),
            _ => None,
        };
        let Some(tag) = tag else {
            self.log
                .malformed_line(line, format!("Line {} is corrupted", line));
            return;
        };
        let Some(curve_type) = CurveType::from_tag(tag) else {
            self.log.malformed_line(
                line,
                format!("Unhandled curve type '{}' on line {}", tag, line),
            );
            return;
        };

        self.blocks_opened += 1;
        let mut polyline = Polyline::new(format!("Polyline {}", self.blocks_opened));
        polyline.curve_type = curve_type;

        tracing::debug!(line, curve_type = ?curve_type, "[SinusX] Block opened");
        self.block = Some(OpenBlock {
            polyline,
            stage: HeaderStage::AwaitingConnectivity,
            header_line: line,
        });
    }

    /// Finalize the open block, or discard it when it is too short
    fn close_block(&mut self) {
        let Some(block) = self.block.take() else {
            return;
        };

        let mut polyline = block.polyline;
        if polyline.finalize() {
            // Every vertex of this curve was read after the shift decision
            polyline.global_shift = self.shift.flatten();
            tracing::debug!(
                name = %polyline.name,
                vertices = polyline.len(),
                "[SinusX] Block closed"
            );
            self.polylines.push(polyline);
        } else {
            self.log.warning(
                Some(block.header_line),
                format!(
                    "Polyline '{}' does not have enough vertices ({}), discarded",
                    polyline.name,
                    polyline.len()
                ),
            );
        }
    }

    fn read_descriptor(&mut self, tokens: &Tokens<'_>) {
        let line = self.line_number;
        let Some(block) = self.block.as_mut() else {
            return;
        };
        let poly = &mut block.polyline;

        match block.stage {
            HeaderStage::AwaitingConnectivity => {
                let flags = match tokens.as_slice() {
                    [connected, closed] => parse_int(connected).zip(parse_int(closed)),
                    _ => None,
                };
                match flags {
                    Some((connected, closed)) => {
                        if connected == 0 {
                            // Unconnected points: hide the curve, show its vertices
                            poly.visible = false;
                            poly.vertices_visible = true;
                        }
                        poly.closed = closed != 0;
                    }
                    None => self.log.malformed_line(
                        line,
                        format!(
                            "Line {} is corrupted (expected: 'CP connected_flag closed_flag')",
                            line
                        ),
                    ),
                }
                block.stage = HeaderStage::after_connectivity(poly.curve_type);
            }
            HeaderStage::AwaitingTypeHeader => {
                block.stage = HeaderStage::AwaitingBasePlane;
                let curve_type = poly.curve_type;
                match curve_type {
                    CurveType::Profile => {}
                    CurveType::PlaneAtAltitude => {
                        let altitude = match tokens.as_slice() {
                            [z] => parse_f64(z),
                            _ => None,
                        };
                        match altitude {
                            Some(z) => poly.const_altitude = Some(z),
                            None => self.log.malformed_line(
                                line,
                                format!(
                                    "Line {} is corrupted (expected: 'CP const_altitude')",
                                    line
                                ),
                            ),
                        }
                    }
                    CurveType::Circle => {
                        let remaining = CIRCLE_FRAME_VALUES.saturating_sub(tokens.len());
                        if remaining > 0 {
                            block.stage = HeaderStage::SkippingCircleFrame { remaining };
                        }
                    }
                    CurveType::Set => {
                        // Not reachable through `after_connectivity`, but keep
                        // the line meaningful should the stage ever be entered.
                        self.read_base_plane(tokens);
                    }
                }
            }
            HeaderStage::AwaitingBasePlane => self.read_base_plane(tokens),
            HeaderStage::SkippingCircleFrame { .. } | HeaderStage::ReadingVertices => {}
        }
    }

    fn read_base_plane(&mut self, tokens: &Tokens<'_>) {
        let line = self.line_number;
        let Some(block) = self.block.as_mut() else {
            return;
        };

        let up_axis = match tokens.as_slice() {
            [code] => parse_int(code)
                .and_then(|c| u8::try_from(c).ok())
                .and_then(UpAxis::from_base_plane),
            _ => None,
        };
        match up_axis {
            Some(axis) => block.polyline.up_axis = axis,
            None => self.log.malformed_line(
                line,
                format!("Line {} is corrupted (expected: 'CP base_plane')", line),
            ),
        }
        block.stage = HeaderStage::ReadingVertices;
    }

    fn read_vertex(&mut self, tokens: &Tokens<'_>) -> Result<()> {
        let line = self.line_number;
        if self.block.is_none() {
            return Ok(());
        }

        let xyz = match tokens.as_slice() {
            [x, y, z, _key] => parse_xyz(x, y, z),
            _ => None,
        };
        let Some([x, y, z]) = xyz else {
            self.log.malformed_line(
                line,
                format!("Line {} is corrupted (expected: 'X Y Z Key ...')", line),
            );
            return Ok(());
        };

        let raw = Point3::new(x, y, z);
        let shift = self.decide_shift(&raw);
        let local = match shift {
            Some(shift) => shift.to_local(&raw),
            None => raw,
        };

        let Some(block) = self.block.as_mut() else {
            return Ok(());
        };
        let vertices = &mut block.polyline.vertices;
        let has_room =
            vertices.len() < vertices.capacity() || vertices.try_reserve(VERTEX_CHUNK).is_ok();
        if vertices.len() >= self.vertex_limit || !has_room {
            self.block = None;
            return Err(Error::OutOfMemory {
                line,
                partial: Box::default(),
            });
        }
        vertices.push(local);
        Ok(())
    }

    /// The first vertex of the load decides the shift for the whole load
    fn decide_shift(&mut self, first: &Point3<f64>) -> Option<CoordinateShift> {
        if let Some(decided) = self.shift {
            return decided;
        }

        let shift = self.policy.maybe_compute_shift(first);
        if let Some(s) = &shift {
            tracing::warn!(
                x = s.x,
                y = s.y,
                z = s.z,
                "[SinusX] Coordinates have been recentered! Translation: ({:.2},{:.2},{:.2})",
                s.x,
                s.y,
                s.z
            );
        }
        self.shift = Some(shift);
        shift
    }
}

/// Read a whole SinusX document held in memory
pub fn read_str(content: &str, params: &LoadParameters) -> Result<LoadReport> {
    let mut reader = SinusxReader::new(params);
    for line in content.lines() {
        if let Err(err) = reader.feed_line(line) {
            return Err(reader.fail(err));
        }
    }
    Ok(reader.finish())
}

/// Read a SinusX stream line by line
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected.
pub fn read_from<R: BufRead>(mut input: R, params: &LoadParameters) -> Result<LoadReport> {
    let mut reader = SinusxReader::new(params);
    let mut buf = Vec::with_capacity(128);
    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        if let Err(err) = reader.feed_line(&String::from_utf8_lossy(&buf)) {
            return Err(reader.fail(err));
        }
    }
    Ok(reader.finish())
}
