// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Path-based entry points and format registration

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::diagnostics::{LoadReport, SaveReport};
use crate::error::{Error, Result};
use crate::model::Polyline;
use crate::reader::{read_from, LoadParameters};
use crate::writer::write_polylines;

/// Extension used when saving
pub const DEFAULT_EXTENSION: &str = "sx";

/// Extensions recognised on load (compared case-insensitively)
pub const SUPPORTED_EXTENSIONS: &[&str] = &["sx", "sinusx"];

/// File dialog filter
pub const FILE_FILTER: &str = "SinusX curve (*.sx)";

/// Check whether a file extension (without the dot) names a SinusX file
pub fn can_load_extension(ext: &str) -> bool {
    SUPPORTED_EXTENSIONS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(ext))
}

/// Check a path's extension
pub fn is_sinusx_path(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(can_load_extension)
}

fn check_path(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(Error::bad_argument("empty file path"));
    }
    Ok(())
}

/// Load every curve of a SinusX file
pub fn load_file(path: impl AsRef<Path>, params: &LoadParameters) -> Result<LoadReport> {
    let path = path.as_ref();
    check_path(path)?;

    let file = File::open(path)?;
    tracing::info!(path = %path.display(), "[SinusX] Loading file");
    read_from(BufReader::new(file), params)
}

/// Save curves to a SinusX file
///
/// An empty curve list reports `NothingToSave` without touching the disk.
pub fn save_file(path: impl AsRef<Path>, polylines: &[Polyline]) -> Result<SaveReport> {
    let path = path.as_ref();
    check_path(path)?;

    if polylines.is_empty() {
        return Ok(SaveReport::default());
    }

    let file = File::create(path)?;
    tracing::info!(path = %path.display(), curves = polylines.len(), "[SinusX] Saving file");
    write_polylines(BufWriter::new(file), polylines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Status;
    use crate::error::FileStatus;

    #[test]
    fn test_extensions() {
        assert!(can_load_extension("sx"));
        assert!(can_load_extension("SX"));
        assert!(can_load_extension("SinusX"));
        assert!(!can_load_extension("dxf"));

        assert!(is_sinusx_path("profiles/river.SX"));
        assert!(!is_sinusx_path("profiles/river"));
    }

    #[test]
    fn test_empty_path_is_bad_argument() {
        let result = load_file("", &LoadParameters::default());
        assert!(matches!(result, Err(Error::BadArgument(_))));

        let result = save_file("", &[]);
        assert_eq!(
            FileStatus::from_result(&result, SaveReport::status),
            FileStatus::BadArgument
        );
    }

    #[test]
    fn test_missing_file_is_io_failure() {
        let result = load_file(
            "/nonexistent/dir/for/sinusx/test.sx",
            &LoadParameters::default(),
        );
        assert_eq!(
            FileStatus::from_result(&result, LoadReport::status),
            FileStatus::IoFailure
        );
    }

    #[test]
    fn test_save_nothing() {
        let path = std::env::temp_dir().join("sinusx_core_never_created.sx");
        let report = save_file(&path, &[]).unwrap();
        assert_eq!(report.status(), Status::NothingToSave);
        assert!(!path.exists());
    }
}
