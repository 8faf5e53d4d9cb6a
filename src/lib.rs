//! # remotefm
//!
//! Rust client library for browsing and managing a remote filesystem served
//! over the file-manager HTTP API.
//!
//! ## Features
//!
//! - **Authentication**: HTTP Basic login, credentials persisted locally and
//!   restored on startup, forced logout on any 401.
//! - **Navigation**: directory listings, navigate up, breadcrumbs. Only the
//!   most recently requested listing is ever shown.
//! - **Clipboard**: copy or cut an entry, navigate elsewhere, paste.
//! - **Actions**: delete (with confirmation), create folder, copy, move.
//! - **Transfers**:
//!   - Sequential upload batches with per-file results and progress callbacks.
//!   - Downloads of files and of directories (archived by the server).
//!
//! ## Example: Basic Usage
//!
//! ```no_run
//! use remotefm::{ClientConfig, FileManager, LocalDirSink};
//!
//! # async fn example() -> remotefm::Result<()> {
//! let manager = FileManager::connect(&ClientConfig::discover()?)?;
//!
//! // Login (also loads the root listing)
//! manager.login("admin", "admin123").await?;
//! for entry in manager.entries() {
//!     println!("{} ({})", entry.name, entry.display_size());
//! }
//!
//! // Copy the first file into a sub directory
//! if let Some(file) = manager.entries().into_iter().find(|e| e.is_file()) {
//!     manager.copy(&file);
//!     manager.load("/backup").await?;
//!     manager.paste().await?;
//! }
//!
//! // Download a directory as a zip archive
//! if let Some(dir) = manager.entries().into_iter().find(|e| e.is_dir) {
//!     let saved = manager.download(&dir, &LocalDirSink::new(".")).await?;
//!     println!("saved {}", saved.location.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Example: Restoring a Session
//!
//! ```no_run
//! use remotefm::{ClientConfig, FileManager};
//!
//! # async fn example() -> remotefm::Result<()> {
//! let manager = FileManager::connect(&ClientConfig::discover()?)?;
//! if manager.is_authenticated() {
//!     // Restored credentials are verified by the first successful call.
//!     manager.resume().await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod base64;
pub mod config;
pub mod error;
pub mod fs;
pub mod http;
pub mod manager;
pub mod progress;
pub mod prompt;
pub mod session;

pub use api::{Ack, Action, ActionRequest, ApiClient, RemoteApi};
pub use config::ClientConfig;
pub use error::{FmError, Result};
pub use fs::{
    Breadcrumb, ClipAction, ClipboardEntry, DownloadSink, FileEntry, LocalDirSink,
    RemoteDirectoryView, SavedDownload, UploadFile, UploadReport,
};
pub use manager::FileManager;
pub use progress::{BatchProgress, ProgressCallback, UploadPhase};
pub use prompt::{Prompter, StdinPrompter};
pub use session::{Credentials, FileStore, KeyValueStore, MemoryStore, Session, SessionState};
