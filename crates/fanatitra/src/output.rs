//! Output file placement

use crate::{ReceiptError, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Prefix of every generated file name
pub const FILE_PREFIX: &str = "fanatitra";

/// Directory under the home directory used when none is configured
const DOWNLOADS_DIR: &str = "Downloads";

/// Where generated receipts are written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputLocation {
    dir: Option<PathBuf>,
}

impl OutputLocation {
    /// `<home>/Downloads`
    pub fn downloads() -> Self {
        Self { dir: None }
    }

    /// A fixed directory
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// Resolve the directory and create it if missing
    pub fn ensure_dir(&self) -> Result<PathBuf> {
        let dir = match &self.dir {
            Some(dir) => dir.clone(),
            None => home_dir()?.join(DOWNLOADS_DIR),
        };

        std::fs::create_dir_all(&dir).map_err(|source| ReceiptError::OutputDir {
            path: dir.clone(),
            source,
        })?;

        Ok(dir)
    }

    /// Full path of the receipt for `zone` on `date`, creating the directory
    pub fn file_path(&self, zone: &str, date: NaiveDate) -> Result<PathBuf> {
        Ok(self.ensure_dir()?.join(file_name(zone, date)))
    }
}

/// `fanatitra_<zone>_<YYYY-MM-DD>.pdf`, with the zone made safe for a file name
pub fn file_name(zone: &str, date: NaiveDate) -> String {
    format!(
        "{FILE_PREFIX}_{}_{}.pdf",
        sanitize_component(zone),
        date.format("%Y-%m-%d")
    )
}

/// Replace characters that cannot appear in a file name on common systems
fn sanitize_component(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    // "." and ".." would still be path components on their own
    if cleaned.chars().all(|c| c == '.') {
        cleaned.replace('.', "_")
    } else {
        cleaned
    }
}

/// Current user's home directory, from `HOME` or `USERPROFILE`
pub(crate) fn home_dir() -> Result<PathBuf> {
    ["HOME", "USERPROFILE"]
        .iter()
        .filter_map(std::env::var_os)
        .find(|value| !value.is_empty())
        .map(PathBuf::from)
        .ok_or(ReceiptError::HomeDirUnavailable)
}

/// Write bytes to `path` in a single call
pub(crate) fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes)
        .map_err(|e| ReceiptError::Save(format!("{}: {e}", path.display())))
}
