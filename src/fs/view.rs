//! The currently displayed directory and its listing.

use super::entry::FileEntry;
use super::path::{self, Breadcrumbs, ROOT};

/// What the user sees: the active path and its entries.
///
/// The view itself performs no I/O. Listing requests are tagged through
/// [`RemoteDirectoryView::begin_load`] and their results offered back through
/// [`RemoteDirectoryView::apply`]; only the most recently issued request can
/// replace the listing, so a slow response for an abandoned directory never
/// overwrites a newer one.
#[derive(Debug, Clone)]
pub struct RemoteDirectoryView {
    path: String,
    entries: Vec<FileEntry>,
    issued: u64,
    loading: usize,
}

impl Default for RemoteDirectoryView {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteDirectoryView {
    /// An empty view positioned at the root.
    pub fn new() -> Self {
        Self {
            path: ROOT.to_string(),
            entries: Vec::new(),
            issued: 0,
            loading: 0,
        }
    }

    /// Active directory path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Entries of the active directory, in server order.
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    /// Look up an entry of the active listing by name.
    pub fn entry(&self, name: &str) -> Option<&FileEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// True while at least one listing request is outstanding.
    pub fn is_loading(&self) -> bool {
        self.loading > 0
    }

    /// Number of outstanding listing requests.
    pub fn pending_loads(&self) -> usize {
        self.loading
    }

    /// Whether the active path is the root.
    pub fn is_root(&self) -> bool {
        path::is_root(&self.path)
    }

    /// Parent of the active path, `None` at the root.
    pub fn parent(&self) -> Option<String> {
        path::parent_path(&self.path)
    }

    /// Breadcrumbs of the active path, derived fresh on every call.
    pub fn breadcrumbs(&self) -> Breadcrumbs<'_> {
        path::breadcrumbs(&self.path)
    }

    /// Register a new listing request and return its sequence number.
    pub fn begin_load(&mut self) -> u64 {
        self.issued += 1;
        self.loading += 1;
        self.issued
    }

    /// Mark request `seq` as finished and report whether it is still the
    /// latest one issued.
    pub fn finish_load(&mut self, seq: u64) -> bool {
        self.loading = self.loading.saturating_sub(1);
        seq == self.issued
    }

    /// Finish request `seq` and, when it is still the latest, replace path and
    /// entries in one step. Returns whether the listing was applied.
    pub fn apply(&mut self, seq: u64, path: &str, entries: Vec<FileEntry>) -> bool {
        if !self.finish_load(seq) {
            return false;
        }
        self.path = normalize(path);
        self.entries = entries;
        true
    }

    /// Drop the listing and return to the root, leaving nothing stale on
    /// screen. Outstanding requests are invalidated.
    pub fn reset(&mut self) {
        self.issued += 1;
        self.path = ROOT.to_string();
        self.entries.clear();
    }
}

fn normalize(path: &str) -> String {
    if path::is_root(path) {
        ROOT.to_string()
    } else {
        path.to_string()
    }
}
