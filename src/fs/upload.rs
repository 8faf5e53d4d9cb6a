//! Upload payloads and batch results.

use std::path::Path;

use crate::api::Ack;
use crate::error::{FmError, Result};

/// A single file to send to `/api/upload`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// Remote file name
    pub name: String,
    /// File contents
    pub data: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Read a local file, naming the upload after its final path component.
    pub async fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .ok_or_else(|| FmError::Custom(format!("Invalid file path: {}", path.display())))?
            .to_string_lossy()
            .to_string();

        let data = tokio::fs::read(path).await?;
        Ok(Self { name, data })
    }

    /// Payload size in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Result of one file of a batch.
#[derive(Debug)]
pub struct UploadOutcome {
    pub name: String,
    pub result: Result<Ack>,
}

impl UploadOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-file results of an upload batch, in submission order.
#[derive(Debug)]
pub struct UploadReport {
    /// Directory the batch was bound to at submission.
    pub destination: String,
    pub outcomes: Vec<UploadOutcome>,
    /// Whether the destination listing was reloaded after the batch.
    pub refreshed: bool,
}

impl UploadReport {
    /// Names of the files that reached the server.
    pub fn succeeded(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|o| o.is_ok())
            .map(|o| o.name.as_str())
    }

    /// Names of the files that failed, with their errors.
    pub fn failed(&self) -> impl Iterator<Item = (&str, &FmError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.name.as_str(), e)))
    }

    /// True when every file of the batch was uploaded.
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(UploadOutcome::is_ok)
    }
}
