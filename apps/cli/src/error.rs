// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the command-line front end.

use sinusx_core::FileStatus;
use thiserror::Error;

/// CLI error types.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("{path}: {source}")]
    Codec {
        path: String,
        #[source]
        source: sinusx_core::Error,
    },

    #[error("{path}: {status:?}")]
    Unusable { path: String, status: FileStatus },
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::MissingArgument(_)
            | CliError::UnknownOption(_)
            | CliError::UnknownCommand(_) => 2,
            CliError::Codec { .. } | CliError::Unusable { .. } => 1,
        }
    }
}
