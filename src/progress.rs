//! Progress reporting for upload batches.

/// Where a file of a batch stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    /// The transfer is about to be sent.
    Started,
    /// The server accepted the file.
    Finished,
    /// The transfer failed; the batch carries on.
    Failed,
}

/// Progress information for one file of an upload batch.
#[derive(Debug, Clone)]
pub struct BatchProgress {
    /// Zero-based position of the file in the batch
    pub index: usize,
    /// Number of files in the batch
    pub total: usize,
    /// Name of the file being transferred
    pub filename: String,
    pub phase: UploadPhase,
}

impl BatchProgress {
    /// Create a new progress report.
    pub fn new(index: usize, total: usize, filename: impl Into<String>, phase: UploadPhase) -> Self {
        Self {
            index,
            total,
            filename: filename.into(),
            phase,
        }
    }

    /// Files settled so far, counting this one once it has finished or failed.
    pub fn completed(&self) -> usize {
        match self.phase {
            UploadPhase::Started => self.index,
            UploadPhase::Finished | UploadPhase::Failed => self.index + 1,
        }
    }

    /// Get progress as a percentage (0.0 to 100.0).
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.completed() as f64 / self.total as f64) * 100.0
    }

    /// Check if the batch is complete.
    pub fn is_complete(&self) -> bool {
        self.completed() >= self.total
    }
}

/// Type alias for progress callback function.
///
/// Invoked as each file of a batch starts and again when it settles.
pub type ProgressCallback = Box<dyn FnMut(&BatchProgress) + Send>;

/// Create a simple progress callback that prints to stdout.
///
/// # Example
/// ```no_run
/// use remotefm::progress::make_progress_printer;
///
/// let callback = make_progress_printer();
/// ```
pub fn make_progress_printer() -> ProgressCallback {
    Box::new(|progress: &BatchProgress| {
        let label = match progress.phase {
            UploadPhase::Started => "uploading",
            UploadPhase::Finished => "done",
            UploadPhase::Failed => "FAILED",
        };
        println!(
            "[{}/{}] {:.0}% {} - {}",
            progress.index + 1,
            progress.total,
            progress.percent(),
            progress.filename,
            label
        );
    })
}
