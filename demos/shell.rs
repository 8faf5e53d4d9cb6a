//! Example: Interactive file manager shell
//!
//! Usage:
//!   cargo run --example shell -- [--username USER --password PASS] [--url URL]
//!
//! Commands: ls, cd NAME|..|/, crumbs, copy NAME, cut NAME, paste, clear,
//! rm NAME, mkdir, get NAME [DIR], put FILE..., status, logout, quit

mod cli;

use std::io::{self, Write};

use remotefm::{FileEntry, FileManager, LocalDirSink, StdinPrompter, UploadFile};

use cli::{exit_with, init_tracing, parse_connection};

const USAGE: &str =
    "Usage: cargo run --example shell -- [--username USER --password PASS] [--url URL] [--config FILE]";

fn print_listing(manager: &FileManager) {
    for entry in manager.entries() {
        let marker = if entry.is_dir { "/" } else { "" };
        println!("  {:>10}  {}{}", entry.display_size(), entry.name, marker);
    }
}

fn find(manager: &FileManager, name: &str) -> Option<FileEntry> {
    manager.view().entry(name).cloned()
}

fn prompt(manager: &FileManager) {
    let clip = match manager.clipboard() {
        Some(c) => format!(" [{:?} {}]", c.action, c.name),
        None => String::new(),
    };
    print!("{}{}> ", manager.path(), clip);
    let _ = io::stdout().flush();
}

#[tokio::main]
async fn main() {
    init_tracing();
    let conn = parse_connection(USAGE);
    let manager = match conn.connect(USAGE).await {
        Ok(manager) => manager,
        Err(e) => exit_with(e),
    };
    print_listing(&manager);

    // Lines are read one at a time; confirmation prompts read stdin too.
    let mut line = String::new();
    loop {
        prompt(&manager);
        line.clear();
        match io::stdin().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default();
        let args: Vec<&str> = words.collect();

        let result = match (command, args.as_slice()) {
            ("", _) => Ok(()),
            ("ls", _) => {
                print_listing(&manager);
                Ok(())
            }
            ("cd", [".."]) => manager.navigate_up().await,
            ("cd", ["/"]) | ("cd", []) => manager.go_root().await,
            ("cd", [name]) => match find(&manager, name) {
                Some(entry) => manager.open_entry(&entry).await,
                None => manager.load(name).await.map(|_| ()),
            },
            ("crumbs", _) => {
                for crumb in manager.breadcrumbs() {
                    println!("  {} -> {}", crumb.name, crumb.path);
                }
                Ok(())
            }
            ("copy", [name]) | ("cut", [name]) => {
                match find(&manager, name) {
                    Some(entry) if command == "copy" => manager.copy(&entry),
                    Some(entry) => manager.cut(&entry),
                    None => println!("no such entry: {}", name),
                }
                Ok(())
            }
            ("paste", _) => manager.paste().await.map(|_| ()),
            ("clear", _) => {
                manager.clear_clipboard();
                Ok(())
            }
            ("rm", [name]) => match find(&manager, name) {
                Some(entry) => manager.delete(&entry.path, &StdinPrompter).await.map(|_| ()),
                None => {
                    println!("no such entry: {}", name);
                    Ok(())
                }
            },
            ("mkdir", _) => manager.create_folder(&StdinPrompter).await.map(|_| ()),
            ("get", [name, rest @ ..]) => match find(&manager, name) {
                Some(entry) => {
                    let dir = rest.first().copied().unwrap_or(".");
                    manager
                        .download(&entry, &LocalDirSink::new(dir))
                        .await
                        .map(|saved| println!("saved {}", saved.location.display()))
                }
                None => {
                    println!("no such entry: {}", name);
                    Ok(())
                }
            },
            ("put", paths) if !paths.is_empty() => {
                let mut files = Vec::new();
                for path in paths {
                    match UploadFile::from_path(path).await {
                        Ok(file) => files.push(file),
                        Err(e) => println!("skipping {}: {}", path, e),
                    }
                }
                let report = manager.upload(files, None).await;
                for (name, e) in report.failed() {
                    println!("failed {}: {}", name, e);
                }
                Ok(())
            }
            ("status", _) => {
                println!("{}", manager.status().unwrap_or_default());
                Ok(())
            }
            ("logout", _) => {
                manager.logout();
                break;
            }
            ("quit", _) | ("exit", _) => break,
            _ => {
                println!("unknown command: {}", line.trim());
                Ok(())
            }
        };

        if let Err(e) = result {
            println!("error: {}", manager.status().unwrap_or_else(|| e.status_message()));
            if !manager.is_authenticated() {
                println!("session ended, please log in again");
                break;
            }
        }
    }
}
