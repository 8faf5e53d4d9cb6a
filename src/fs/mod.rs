//! Remote filesystem model: entries, paths, the directory view, clipboard,
//! upload payloads and the local download sink.

mod clipboard;
mod download;
mod entry;
pub mod path;
mod upload;
mod view;

pub use clipboard::{ClipAction, Clipboard, ClipboardEntry};
pub use download::{DownloadSink, LocalDirSink, SavedDownload};
pub use entry::{format_size, FileEntry, ARCHIVE_EXTENSION};
pub use path::{breadcrumbs, parent_path, Breadcrumb, Breadcrumbs};
pub use upload::{UploadFile, UploadOutcome, UploadReport};
pub use view::RemoteDirectoryView;
