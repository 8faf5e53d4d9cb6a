//! The file manager controller.
//!
//! [`FileManager`] wires the session, the directory view, the clipboard, the
//! upload lane and the action dispatcher together. It is a cheap-to-clone
//! handle; every clone drives the same state, so navigation, pastes and
//! uploads may run from different tasks at once.
//!
//! Local state changes happen under a short-lived lock that is never held
//! across a network round-trip, so no caller can observe a half-updated path
//! or listing.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::api::{Ack, Action, ActionRequest, ApiClient, RemoteApi};
use crate::config::ClientConfig;
use crate::error::{FmError, Result};
use crate::fs::path::{self, child_path, ROOT};
use crate::fs::{
    Breadcrumb, ClipAction, Clipboard, ClipboardEntry, DownloadSink, FileEntry,
    RemoteDirectoryView, SavedDownload, UploadFile, UploadOutcome, UploadReport,
};
use crate::progress::{BatchProgress, ProgressCallback, UploadPhase};
use crate::prompt::Prompter;
use crate::session::{FileStore, KeyValueStore, MemoryStore, Session};

const LOAD_FAILED: &str = "Error loading files.";

#[derive(Default)]
struct State {
    view: RemoteDirectoryView,
    clipboard: Clipboard,
    status: Option<String>,
    uploading: Option<String>,
    in_flight: HashSet<String>,
}

struct Inner {
    api: Arc<dyn RemoteApi>,
    session: Arc<Session>,
    state: Mutex<State>,
    // Serializes upload batches against each other.
    upload_lane: tokio::sync::Mutex<()>,
}

/// Releases an in-flight target when dropped.
struct InFlightGuard<'a> {
    state: &'a Mutex<State>,
    target: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.state.lock().in_flight.remove(&self.target);
    }
}

/// Finishes listing request `seq` if its future is dropped before the
/// response is handled.
struct LoadGuard<'a> {
    state: &'a Mutex<State>,
    seq: u64,
    armed: bool,
}

impl LoadGuard<'_> {
    /// The response is about to be handled; the caller finishes the request.
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            debug!("listing request {} cancelled", self.seq);
            self.state.lock().view.finish_load(self.seq);
        }
    }
}

/// Publishes the name of the file being uploaded for as long as it lives.
struct UploadingGuard<'a> {
    state: &'a Mutex<State>,
}

impl<'a> UploadingGuard<'a> {
    fn new(state: &'a Mutex<State>, name: &str) -> Self {
        state.lock().uploading = Some(name.to_string());
        Self { state }
    }
}

impl Drop for UploadingGuard<'_> {
    fn drop(&mut self) {
        self.state.lock().uploading = None;
    }
}

/// Client-side controller for a remote file manager.
///
/// # Example
/// ```no_run
/// use remotefm::{ClientConfig, FileManager};
///
/// # async fn example() -> remotefm::Result<()> {
/// let manager = FileManager::connect(&ClientConfig::discover()?)?;
/// manager.login("admin", "admin123").await?;
///
/// for entry in manager.entries() {
///     println!("{} {}", entry.name, entry.display_size());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct FileManager {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for FileManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileManager")
            .field("session", &self.inner.session)
            .field("path", &self.path())
            .finish_non_exhaustive()
    }
}

impl FileManager {
    /// Create a controller talking to `api` on behalf of `session`.
    pub fn new(api: Arc<dyn RemoteApi>, session: Arc<Session>) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                session,
                state: Mutex::new(State::default()),
                upload_lane: tokio::sync::Mutex::new(()),
            }),
        }
    }

    /// Build the HTTP client and restore any persisted session as described
    /// by `config`.
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        let api = ApiClient::from_config(config)?;
        let store: Arc<dyn KeyValueStore> = match config.credentials_path() {
            Some(path) => {
                debug!("credentials stored in {}", path.display());
                Arc::new(FileStore::new(path))
            }
            None => {
                warn!("no location for stored credentials, session will not persist");
                Arc::new(MemoryStore::new())
            }
        };
        Ok(Self::new(Arc::new(api), Arc::new(Session::restore(store))))
    }

    /// The shared session.
    pub fn session(&self) -> &Arc<Session> {
        &self.inner.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.session.is_authenticated()
    }

    // ------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------

    /// Log in and show the root directory.
    ///
    /// The root listing is requested once after the credentials are accepted;
    /// its failure is reported on the status line, not as a login failure.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let api = self.inner.api.as_ref();
        if let Err(e) = self.inner.session.login(api, username, password).await {
            let message = match e {
                FmError::InvalidCredentials => "Invalid credentials",
                _ => "Login failed",
            };
            warn!("login failed: {}", e);
            self.set_status(message);
            return Err(e);
        }

        {
            let mut state = self.inner.state.lock();
            state.view.reset();
            state.status = None;
        }

        if let Err(e) = self.load(ROOT).await {
            debug!("initial listing failed: {}", e);
        }
        Ok(())
    }

    /// Show the root directory of a restored session.
    ///
    /// The first successful listing verifies restored credentials; a 401
    /// clears them.
    pub async fn resume(&self) -> Result<()> {
        if !self.is_authenticated() {
            return Err(FmError::Unauthorized);
        }
        self.load(ROOT).await.map(|_| ())
    }

    /// Log out and drop the listing. The clipboard is kept.
    pub fn logout(&self) {
        self.inner.session.logout();
        let mut state = self.inner.state.lock();
        state.view.reset();
        state.status = None;
    }

    /// Attribute the outcome of a request issued during `epoch` to the
    /// session: success verifies it, a 401 ends it.
    fn settle<T>(&self, epoch: u64, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.inner.session.confirm(epoch),
            Err(e) if e.is_unauthorized() => {
                if self.inner.session.expire(epoch) {
                    let mut state = self.inner.state.lock();
                    state.view.reset();
                    state.status = Some(FmError::Unauthorized.status_message());
                }
            }
            Err(_) => {}
        }
        result
    }

    // ------------------------------------------------------------------
    // Directory view
    // ------------------------------------------------------------------

    /// Fetch the listing of `path` and show it.
    ///
    /// Returns the fetched entries. They replace the displayed listing only
    /// if no other listing was requested in the meantime; a stale response is
    /// dropped. On failure the previous listing stays visible, except after a
    /// 401, which clears it along with the session.
    pub async fn load(&self, path: &str) -> Result<Vec<FileEntry>> {
        let (auth, epoch) = self.inner.session.authorize()?;
        let seq = self.inner.state.lock().view.begin_load();
        let mut guard = LoadGuard {
            state: &self.inner.state,
            seq,
            armed: true,
        };
        debug!("listing {} (request {})", path, seq);

        let result = self.inner.api.list(&auth, path).await;
        guard.disarm();
        let result = self.settle(epoch, result);
        let current = self.inner.session.epoch() == epoch;

        let mut state = self.inner.state.lock();
        match result {
            Ok(entries) => {
                let applied = if current {
                    state.view.apply(seq, path, entries.clone())
                } else {
                    state.view.finish_load(seq);
                    false
                };
                if applied {
                    info!("showing {} ({} entries)", state.view.path(), entries.len());
                } else {
                    debug!("discarding stale listing of {} (request {})", path, seq);
                }
                Ok(entries)
            }
            Err(e) => {
                let latest = state.view.finish_load(seq);
                if latest && current && !e.is_unauthorized() {
                    warn!("listing {} failed: {}", path, e);
                    state.status = Some(LOAD_FAILED.to_string());
                }
                Err(e)
            }
        }
    }

    /// Navigate into `entry`, which must be a directory.
    pub async fn open_entry(&self, entry: &FileEntry) -> Result<()> {
        if !entry.is_dir {
            return Err(FmError::NotADirectory(entry.path.clone()));
        }
        self.load(&entry.path).await.map(|_| ())
    }

    /// Navigate to the parent directory. Does nothing at the root.
    pub async fn navigate_up(&self) -> Result<()> {
        let parent = self.inner.state.lock().view.parent();
        match parent {
            Some(parent) => self.load(&parent).await.map(|_| ()),
            None => Ok(()),
        }
    }

    /// Navigate to the root directory.
    pub async fn go_root(&self) -> Result<()> {
        self.load(ROOT).await.map(|_| ())
    }

    /// Reload the active directory.
    pub async fn refresh(&self) -> Result<()> {
        let path = self.path();
        self.load(&path).await.map(|_| ())
    }

    /// Active directory path.
    pub fn path(&self) -> String {
        self.inner.state.lock().view.path().to_string()
    }

    /// Entries of the active directory.
    pub fn entries(&self) -> Vec<FileEntry> {
        self.inner.state.lock().view.entries().to_vec()
    }

    /// Consistent copy of the directory view.
    pub fn view(&self) -> RemoteDirectoryView {
        self.inner.state.lock().view.clone()
    }

    /// Breadcrumbs of the active path.
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        self.inner.state.lock().view.breadcrumbs().collect()
    }

    /// True while a listing request is outstanding.
    pub fn is_loading(&self) -> bool {
        self.inner.state.lock().view.is_loading()
    }

    // ------------------------------------------------------------------
    // Status line
    // ------------------------------------------------------------------

    /// Latest status message, if any.
    pub fn status(&self) -> Option<String> {
        self.inner.state.lock().status.clone()
    }

    /// Dismiss the status message.
    pub fn clear_status(&self) {
        self.inner.state.lock().status = None;
    }

    fn set_status(&self, message: impl Into<String>) {
        self.inner.state.lock().status = Some(message.into());
    }

    // ------------------------------------------------------------------
    // Clipboard
    // ------------------------------------------------------------------

    /// Remember `entry` for a later copy.
    pub fn copy(&self, entry: &FileEntry) {
        self.clip(ClipAction::Copy, entry);
    }

    /// Remember `entry` for a later move.
    pub fn cut(&self, entry: &FileEntry) {
        self.clip(ClipAction::Move, entry);
    }

    fn clip(&self, action: ClipAction, entry: &FileEntry) {
        debug!("clipboard: {:?} {}", action, entry.path);
        let mut state = self.inner.state.lock();
        state.clipboard.set(ClipboardEntry::new(action, entry));
        state.status = Some(format!("{} {} to clipboard", action.past_tense(), entry.name));
    }

    /// Current clipboard entry.
    pub fn clipboard(&self) -> Option<ClipboardEntry> {
        self.inner.state.lock().clipboard.peek().cloned()
    }

    pub fn clear_clipboard(&self) {
        self.inner.state.lock().clipboard.clear();
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    fn claim(&self, target: &str) -> Result<InFlightGuard<'_>> {
        let mut state = self.inner.state.lock();
        if !state.in_flight.insert(target.to_string()) {
            debug!("{} already in flight", target);
            return Err(FmError::Busy(target.to_string()));
        }
        Ok(InFlightGuard {
            state: &self.inner.state,
            target: target.to_string(),
        })
    }

    /// Send one action to the server, guarded against a concurrent action on
    /// the same target. Sets the failure status; success handling is left to
    /// the caller.
    async fn dispatch(&self, request: &ActionRequest) -> Result<Ack> {
        let target = match request.action {
            Action::CreateFolder => child_path(
                &request.source_path,
                request.dest_path.as_deref().unwrap_or_default(),
            ),
            _ => request.source_path.clone(),
        };

        let _guard = self.claim(&target)?;
        let (auth, epoch) = self.inner.session.authorize()?;
        info!("{} {}", request.action, target);

        let result = self.inner.api.action(&auth, request).await;
        match self.settle(epoch, result) {
            Ok(ack) => {
                debug!("{} {} acknowledged: {:?}", request.action, target, ack);
                Ok(ack)
            }
            Err(e) => {
                if !e.is_unauthorized() {
                    warn!("{} {} failed: {}", request.action, target, e);
                    self.set_status(failure_message(request.action));
                }
                Err(e)
            }
        }
    }

    /// Report success and reload the active directory. A failed reload only
    /// shows up on the status line.
    async fn finish(&self, action: Action) {
        if let Some(message) = success_message(action) {
            self.set_status(message);
        }
        if let Err(e) = self.refresh().await {
            debug!("reload after {} failed: {}", action, e);
        }
    }

    /// Perform a server action and reload the active directory afterwards.
    ///
    /// For copy and move `dest_path` is the destination directory; for
    /// create_folder `source_path` is the parent and `dest_path` the new name.
    pub async fn perform(
        &self,
        action: Action,
        source_path: &str,
        dest_path: Option<&str>,
    ) -> Result<Ack> {
        let request = match (action, dest_path) {
            (Action::Delete, _) => ActionRequest::delete(source_path),
            (Action::CreateFolder, Some(name)) => ActionRequest::create_folder(source_path, name),
            (Action::Copy | Action::Move, Some(dest)) => {
                ActionRequest::transfer(action, source_path, dest)
            }
            (_, None) => {
                return Err(FmError::Custom(format!("{} needs a destination", action)));
            }
        };
        let ack = self.dispatch(&request).await?;
        self.finish(action).await;
        Ok(ack)
    }

    /// Delete `path` once `prompter` confirms.
    ///
    /// Returns `Ok(None)` without contacting the server when the user
    /// declines.
    pub async fn delete(&self, path: &str, prompter: &dyn Prompter) -> Result<Option<Ack>> {
        if !prompter.confirm(&format!("Are you sure you want to delete {}?", path)) {
            debug!("delete of {} declined", path);
            return Ok(None);
        }
        self.perform(Action::Delete, path, None).await.map(Some)
    }

    /// Create a folder in the active directory, named by `prompter`.
    ///
    /// An empty or cancelled name returns `Ok(None)` without a server call.
    pub async fn create_folder(&self, prompter: &dyn Prompter) -> Result<Option<Ack>> {
        let name = match prompter.folder_name() {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => {
                debug!("create folder cancelled");
                return Ok(None);
            }
        };
        let parent = self.path();
        self.perform(Action::CreateFolder, &parent, Some(&name))
            .await
            .map(Some)
    }

    /// Paste the clipboard entry into the active directory.
    ///
    /// Returns `Ok(None)` when the clipboard is empty. The clipboard is
    /// emptied only when the server accepted the paste.
    pub async fn paste(&self) -> Result<Option<Ack>> {
        let (entry, destination) = {
            let state = self.inner.state.lock();
            match state.clipboard.take_for_paste() {
                Some(entry) => (entry, state.view.path().to_string()),
                None => return Ok(None),
            }
        };

        let request =
            ActionRequest::transfer(entry.action.action(), &entry.source_path, &destination);
        let ack = self.dispatch(&request).await?;

        if !self.inner.state.lock().clipboard.complete_paste(&entry) {
            debug!("clipboard changed during paste, keeping new entry");
        }
        self.finish(request.action).await;
        Ok(Some(ack))
    }

    /// Download `entry` and hand it to `sink` under its suggested name.
    ///
    /// Directories are archived by the server and saved with a `.zip` suffix.
    pub async fn download(&self, entry: &FileEntry, sink: &dyn DownloadSink) -> Result<SavedDownload> {
        let (auth, epoch) = self.inner.session.authorize()?;
        self.set_status(if entry.is_dir {
            "Zipping and downloading..."
        } else {
            "Downloading..."
        });
        info!("downloading {}", entry.path);

        let result = self.inner.api.download(&auth, &entry.path).await;
        let saved = match self.settle(epoch, result) {
            Ok(bytes) => {
                let filename = entry.download_name();
                sink.save(&filename, &bytes)
                    .await
                    .map(|location| SavedDownload {
                        filename,
                        size: bytes.len() as u64,
                        location,
                    })
            }
            Err(e) => Err(e),
        };

        match saved {
            Ok(saved) => {
                info!("saved {} ({} bytes)", saved.location.display(), saved.size);
                self.clear_status();
                Ok(saved)
            }
            Err(e) => {
                if !e.is_unauthorized() {
                    warn!("download of {} failed: {}", entry.path, e);
                    self.set_status("Download failed.");
                }
                Err(e)
            }
        }
    }

    // ------------------------------------------------------------------
    // Uploads
    // ------------------------------------------------------------------

    /// Name of the file currently being uploaded.
    pub fn current_upload(&self) -> Option<String> {
        self.inner.state.lock().uploading.clone()
    }

    /// Upload `files` into the directory active at the time of the call.
    ///
    /// See [`FileManager::upload_to`].
    pub async fn upload(
        &self,
        files: Vec<UploadFile>,
        progress: Option<ProgressCallback>,
    ) -> UploadReport {
        let destination = self.path();
        self.upload_to(files, &destination, progress).await
    }

    /// Upload a single file into the active directory.
    pub async fn upload_file(&self, file: UploadFile) -> Result<Ack> {
        let mut report = self.upload(vec![file], None).await;
        match report.outcomes.pop() {
            Some(outcome) => outcome.result,
            None => Err(FmError::Custom("upload produced no result".to_string())),
        }
    }

    /// Upload `files` one after another into `destination`.
    ///
    /// A failed file is reported in the returned [`UploadReport`] and never
    /// stops the remaining ones. Batches queue behind each other. Once the
    /// batch has drained the destination is reloaded once, provided it is
    /// still the displayed directory and the session is alive. If the user
    /// navigated elsewhere meanwhile the reload is skipped rather than pulling
    /// the view back to `destination`; [`UploadReport::refreshed`] is then
    /// false.
    ///
    /// Dropping the returned future abandons the batch and clears
    /// [`FileManager::current_upload`].
    pub async fn upload_to(
        &self,
        files: Vec<UploadFile>,
        destination: &str,
        mut progress: Option<ProgressCallback>,
    ) -> UploadReport {
        let _lane = self.inner.upload_lane.lock().await;
        let total = files.len();
        info!("uploading {} file(s) to {}", total, destination);

        let mut outcomes = Vec::with_capacity(total);
        for (index, file) in files.into_iter().enumerate() {
            let uploading = UploadingGuard::new(&self.inner.state, &file.name);
            notify(&mut progress, index, total, &file.name, UploadPhase::Started);

            let result = self.upload_one(destination, &file).await;
            drop(uploading);

            let phase = if result.is_ok() {
                UploadPhase::Finished
            } else {
                UploadPhase::Failed
            };
            notify(&mut progress, index, total, &file.name, phase);
            outcomes.push(UploadOutcome {
                name: file.name,
                result,
            });
        }

        let refreshed = total > 0 && self.refresh_destination(destination).await;
        UploadReport {
            destination: destination.to_string(),
            outcomes,
            refreshed,
        }
    }

    async fn upload_one(&self, destination: &str, file: &UploadFile) -> Result<Ack> {
        let (auth, epoch) = self.inner.session.authorize()?;
        debug!("uploading {} ({} bytes)", file.name, file.size());

        let result = self.inner.api.upload(&auth, destination, file).await;
        let result = self.settle(epoch, result);
        match &result {
            Ok(_) => {
                info!("uploaded {} to {}", file.name, destination);
                self.set_status(format!("Uploaded {}", file.name));
            }
            Err(e) if e.is_unauthorized() => {}
            Err(e) => {
                warn!("upload of {} failed: {}", file.name, e);
                self.set_status(format!("Failed to upload {}", file.name));
            }
        }
        result
    }

    async fn refresh_destination(&self, destination: &str) -> bool {
        if !self.is_authenticated() {
            return false;
        }
        if !path::segments(&self.path()).eq(path::segments(destination)) {
            debug!("{} no longer displayed, skipping reload", destination);
            return false;
        }
        self.load(destination).await.is_ok()
    }
}

fn notify(
    progress: &mut Option<ProgressCallback>,
    index: usize,
    total: usize,
    name: &str,
    phase: UploadPhase,
) {
    if let Some(callback) = progress.as_mut() {
        callback(&BatchProgress::new(index, total, name, phase));
    }
}

fn success_message(action: Action) -> Option<&'static str> {
    match action {
        Action::Delete => Some("Deleted successfully."),
        Action::Copy | Action::Move => Some("Paste successful."),
        Action::CreateFolder => None,
    }
}

fn failure_message(action: Action) -> &'static str {
    match action {
        Action::Delete => "Delete failed.",
        Action::Copy | Action::Move => "Paste failed.",
        Action::CreateFolder => "Failed to create folder.",
    }
}
