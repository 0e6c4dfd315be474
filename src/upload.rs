//! Uploaded CSI files.
//!
//! The core never parses CSV structure: a file is accepted or refused on its name alone, and the
//! bytes travel to the backend untouched.

use std::path::Path;

use crate::error::{PoseError, Result};

const ACCEPTED_EXTENSION: &str = ".csv";

/// A file handed in by the view layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Upload {
    name: String,
    bytes: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Reads a file from disk. The upload is named after the final path component.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { name, bytes })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size_kb(&self) -> f64 {
        self.bytes.len() as f64 / 1024.0
    }

    /// Checks the file name before anything is dispatched.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(PoseError::Validation("No file selected".to_string()));
        }
        let lowered = self.name.to_lowercase();
        let has_stem = lowered
            .strip_suffix(ACCEPTED_EXTENSION)
            .is_some_and(|stem| !stem.trim().is_empty());
        if !has_stem {
            return Err(PoseError::Validation(format!(
                "'{}' is not a CSV file",
                self.name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn accepts_csv_in_any_case() {
        assert!(Upload::new("capture.csv", vec![]).validate().is_ok());
        assert!(Upload::new("CAPTURE.CSV", vec![]).validate().is_ok());
    }

    #[test]
    fn rejects_other_extensions() {
        for name in ["capture.txt", "capture.csv.gz", "csv", ".csv", " .CSV", ""] {
            let err = Upload::new(name, b"a,b\n".to_vec()).validate().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation, "{name}");
        }
    }

    #[test]
    fn reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.csv");
        std::fs::write(&path, b"subcarrier_0\n0.1\n").unwrap();

        let upload = Upload::from_path(&path).unwrap();
        assert_eq!(upload.name(), "sample.csv");
        assert_eq!(upload.bytes(), b"subcarrier_0\n0.1\n");
        assert!(upload.validate().is_ok());
    }
}
