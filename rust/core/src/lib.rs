// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # SinusX Core
//!
//! Reader and writer for the SinusX line-oriented ASCII format used to
//! exchange 3D polylines (open curves, profiles, contour lines, circles).
//!
//! ## Overview
//!
//! - **Reader**: a line-driven state machine that recovers every valid
//!   curve of a file and reports corrupted lines instead of failing
//! - **Writer**: emits curves as generic `S` blocks in absolute coordinates
//! - **Global shift**: large coordinates are recentered once per load, on
//!   the first vertex, and the same offset is applied to every curve
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sinusx_core::{read_str, write_string, LoadParameters, Status};
//!
//! let content = "B S\nCN edge\nCP 1 0\nCP 0\n+0.0 +0.0 +0.0 A\n+1.0 +0.0 +0.0 A\n";
//! let report = read_str(content, &LoadParameters::default())?;
//! assert_eq!(report.status(), Status::Ok);
//!
//! let (text, _) = write_string(&report.polylines)?;
//! println!("{}", text);
//! ```
//!
//! ## Format
//!
//! ```text
//! C <comment>
//! B <S|P|N|C>
//! CN <name>
//! CP <connected> <closed>
//! CP <type-specific>        (P, N and C blocks only)
//! CP <base plane: 0|1|2>
//! <x> <y> <z> <key>
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for curves and reports

pub mod diagnostics;
pub mod error;
pub mod fast_parse;
pub mod file;
pub mod model;
pub mod parser;
pub mod reader;
pub mod shift;
pub mod writer;

pub use diagnostics::{Diagnostic, LoadReport, SaveReport, Severity, Status};
pub use error::{Error, FileStatus, Result};
pub use file::{can_load_extension, is_sinusx_path, load_file, save_file};
pub use model::{CurveType, Polyline, UpAxis, MIN_VERTEX_COUNT};
pub use parser::{classify_line, Line};
pub use reader::{read_from, read_str, LoadParameters, SinusxReader};
pub use shift::{CoordinateShift, ShiftMode, ShiftPolicy, DEFAULT_SHIFT_THRESHOLD};
pub use writer::{write_polylines, write_string, SinusxWriter};

pub use nalgebra::Point3;
