//! Directory listing entries.

use serde::{Deserialize, Serialize};

/// Extension appended to directory downloads, which the server archives.
pub const ARCHIVE_EXTENSION: &str = "zip";

/// A file or directory record as returned by the listing endpoint.
///
/// Entries are produced only by `/api/files` and never edited client-side;
/// a new listing replaces the old one wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Entry name (last path segment)
    pub name: String,
    /// Full server path, usable directly for navigation and actions
    pub path: String,
    /// Whether the entry is a directory
    pub is_dir: bool,
    /// File size in bytes (0 for directories)
    #[serde(default)]
    pub size: u64,
}

impl FileEntry {
    /// Check if this entry is a regular file.
    pub fn is_file(&self) -> bool {
        !self.is_dir
    }

    /// Filename suggested to the local save mechanism on download.
    ///
    /// Directories arrive as a server-built archive, so they get the archive
    /// extension appended; files keep their name verbatim.
    ///
    /// # Example
    /// ```
    /// use remotefm::FileEntry;
    ///
    /// let dir = FileEntry {
    ///     name: "reports".into(),
    ///     path: "/srv/reports".into(),
    ///     is_dir: true,
    ///     size: 0,
    /// };
    /// assert_eq!(dir.download_name(), "reports.zip");
    /// ```
    pub fn download_name(&self) -> String {
        if self.is_dir {
            format!("{}.{}", self.name, ARCHIVE_EXTENSION)
        } else {
            self.name.clone()
        }
    }

    /// Human-readable size, or `-` for directories.
    pub fn display_size(&self) -> String {
        if self.is_dir {
            "-".to_string()
        } else {
            format_size(self.size)
        }
    }
}

/// Format a byte count with base-1024 units and up to two decimals.
///
/// Trailing zeros are dropped, so `1536` renders as `1.5 KB` and `1024` as
/// `1 KB`.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let text = format!("{:.2}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", text, UNITS[unit])
}
