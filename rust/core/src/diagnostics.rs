// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Diagnostics and operation reports
//!
//! Line-level problems never abort a load. They are recorded here, logged
//! through `tracing`, and folded into the overall [`Status`].

use std::fmt;

use crate::model::Polyline;
use crate::shift::CoordinateShift;

/// How a diagnostic affects the overall status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Severity {
    /// A line could not be parsed; degrades the status to [`Status::Malformed`]
    Malformed,
    /// Informational (e.g. a curve dropped for lack of vertices); status unchanged
    Warning,
}

/// One recorded problem
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Diagnostic {
    /// 1-based input line, when the problem is tied to one
    pub line: Option<usize>,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {}: {}", line, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Non-fatal outcome of a read or write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Status {
    Ok,
    /// Some lines were rejected; whatever could be recovered is still returned
    Malformed,
    NothingToLoad,
    NothingToSave,
}

/// Collects diagnostics and mirrors each one to the log.
#[derive(Debug, Default, Clone)]
pub(crate) struct DiagnosticLog {
    entries: Vec<Diagnostic>,
}

impl DiagnosticLog {
    pub(crate) fn malformed_line(&mut self, line: usize, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(line, "[SinusX] {}", message);
        self.entries.push(Diagnostic {
            line: Some(line),
            severity: Severity::Malformed,
            message,
        });
    }

    pub(crate) fn warning(&mut self, line: Option<usize>, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(?line, "[SinusX] {}", message);
        self.entries.push(Diagnostic {
            line,
            severity: Severity::Warning,
            message,
        });
    }

    pub(crate) fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}

/// Result of a successful (possibly partial) load
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LoadReport {
    /// Finalized curves, in order of appearance
    pub polylines: Vec<Polyline>,
    pub diagnostics: Vec<Diagnostic>,
    /// Shift applied to every vertex of this load, if recentering happened
    pub shift: Option<CoordinateShift>,
    /// Number of input lines consumed
    pub lines_read: usize,
}

impl LoadReport {
    /// Overall status: a clean file with output is `Ok`, any rejected line
    /// makes it `Malformed`, and a clean file without output is `NothingToLoad`.
    pub fn status(&self) -> Status {
        if self.has_malformed_lines() {
            Status::Malformed
        } else if self.polylines.is_empty() {
            Status::NothingToLoad
        } else {
            Status::Ok
        }
    }

    pub fn has_malformed_lines(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Malformed)
    }

    /// Total vertex count over all curves
    pub fn vertex_count(&self) -> usize {
        self.polylines.iter().map(|p| p.len()).sum()
    }
}

/// Result of a write
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SaveReport {
    /// Curves written to the output
    pub written: usize,
    /// Curves skipped because they had fewer than two vertices
    pub skipped: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl SaveReport {
    /// `Ok` as soon as one curve was written, `NothingToSave` otherwise.
    /// Skipped curves only leave a warning behind.
    pub fn status(&self) -> Status {
        if self.written > 0 {
            Status::Ok
        } else {
            Status::NothingToSave
        }
    }
}
