//! Example: Download a remote file or directory (directories arrive as zip)
//!
//! Usage:
//!   cargo run --example download -- [--username USER --password PASS] REMOTE_PATH [LOCAL_DIR]

mod cli;

use remotefm::fs::parent_path;
use remotefm::LocalDirSink;

use cli::{exit_with, init_tracing, parse_connection, usage_and_exit};

const USAGE: &str = "Usage: cargo run --example download -- [--username USER --password PASS] [--url URL] REMOTE_PATH [LOCAL_DIR]";

#[tokio::main]
async fn main() {
    init_tracing();
    let conn = parse_connection(USAGE);
    let (remote, local) = match conn.positionals.as_slice() {
        [remote] => (remote.clone(), ".".to_string()),
        [remote, local] => (remote.clone(), local.clone()),
        _ => usage_and_exit(USAGE),
    };

    let manager = match conn.connect(USAGE).await {
        Ok(manager) => manager,
        Err(e) => exit_with(e),
    };

    // Entries can only be addressed through the listing of their parent.
    let parent = parent_path(&remote).unwrap_or_else(|| usage_and_exit(USAGE));
    let entries = match manager.load(&parent).await {
        Ok(entries) => entries,
        Err(e) => exit_with(e),
    };
    let Some(entry) = entries.into_iter().find(|e| e.path == remote) else {
        eprintln!("Not found: {}", remote);
        std::process::exit(1);
    };

    if entry.is_dir {
        println!("Zipping and downloading {}...", entry.path);
    } else {
        println!("Downloading {} ({})...", entry.path, entry.display_size());
    }

    match manager.download(&entry, &LocalDirSink::new(&local)).await {
        Ok(saved) => println!("Saved {} ({} bytes)", saved.location.display(), saved.size),
        Err(e) => exit_with(e),
    }
}
