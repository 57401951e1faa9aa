// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fatal errors and the unified file status surface.

use thiserror::Error;

use crate::diagnostics::{LoadReport, Status};

/// Result type for SinusX operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a read or write operation.
///
/// Recoverable problems (a corrupted line, a curve with too few vertices)
/// are never reported here; they are collected as
/// [`Diagnostic`](crate::Diagnostic)s on the operation's report instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Bad argument: {0}")]
    BadArgument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// `partial` holds the curves finalized before the failing line; the
    /// in-flight curve is lost.
    #[error("Not enough memory to store vertices (line {line})")]
    OutOfMemory {
        line: usize,
        partial: Box<LoadReport>,
    },
}

impl Error {
    /// Create a bad-argument error
    pub fn bad_argument(message: impl Into<String>) -> Self {
        Self::BadArgument(message.into())
    }

    /// Curves recovered before an out-of-memory failure
    pub fn partial_report(&self) -> Option<&LoadReport> {
        match self {
            Error::OutOfMemory { partial, .. } => Some(&**partial),
            _ => None,
        }
    }
}

/// The single discriminated outcome of a load or save call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FileStatus {
    Success,
    BadArgument,
    IoFailure,
    MalformedContent,
    NothingToSave,
    NothingToLoad,
    OutOfMemory,
}

impl FileStatus {
    /// Collapse a report-or-error into one status value.
    pub fn from_result<T>(result: &Result<T>, status_of: impl FnOnce(&T) -> Status) -> Self {
        match result {
            Ok(report) => status_of(report).into(),
            Err(err) => err.into(),
        }
    }

    /// True for statuses where usable output was produced.
    #[inline]
    pub fn produced_output(&self) -> bool {
        matches!(self, FileStatus::Success | FileStatus::MalformedContent)
    }
}

impl From<Status> for FileStatus {
    fn from(status: Status) -> Self {
        match status {
            Status::Ok => FileStatus::Success,
            Status::Malformed => FileStatus::MalformedContent,
            Status::NothingToLoad => FileStatus::NothingToLoad,
            Status::NothingToSave => FileStatus::NothingToSave,
        }
    }
}

impl From<&Error> for FileStatus {
    fn from(err: &Error) -> Self {
        match err {
            Error::BadArgument(_) => FileStatus::BadArgument,
            Error::Io(_) => FileStatus::IoFailure,
            Error::OutOfMemory { .. } => FileStatus::OutOfMemory,
        }
    }
}
