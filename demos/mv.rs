//! Example: Move or copy a remote entry with the clipboard
//!
//! Usage:
//!   cargo run --example mv -- [--username USER --password PASS] [--copy] SOURCE DEST_DIR

mod cli;

use remotefm::fs::parent_path;

use cli::{exit_with, init_tracing, parse_connection, usage_and_exit};

const USAGE: &str = "Usage: cargo run --example mv -- [--username USER --password PASS] [--url URL] [--copy] SOURCE DEST_DIR";

#[tokio::main]
async fn main() {
    init_tracing();
    let conn = parse_connection(USAGE);
    let copy = conn.positionals.iter().any(|a| a == "--copy");
    let args: Vec<&String> = conn.positionals.iter().filter(|a| *a != "--copy").collect();
    let (source, dest) = match args.as_slice() {
        [source, dest] => (source.to_string(), dest.to_string()),
        _ => usage_and_exit(USAGE),
    };

    let manager = match conn.connect(USAGE).await {
        Ok(manager) => manager,
        Err(e) => exit_with(e),
    };

    let parent = parent_path(&source).unwrap_or_else(|| usage_and_exit(USAGE));
    let entries = match manager.load(&parent).await {
        Ok(entries) => entries,
        Err(e) => exit_with(e),
    };
    let Some(entry) = entries.iter().find(|e| e.path == source) else {
        eprintln!("Not found: {}", source);
        std::process::exit(1);
    };

    if copy {
        manager.copy(entry);
    } else {
        manager.cut(entry);
    }

    // Navigate to the destination, then paste there.
    if let Err(e) = manager.load(&dest).await {
        exit_with(e);
    }
    match manager.paste().await {
        Ok(_) => println!("{} -> {}", source, manager.path()),
        Err(e) => exit_with(e),
    }
}
