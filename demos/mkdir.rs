//! Example: Create a folder inside a remote directory
//!
//! Usage:
//!   cargo run --example mkdir -- [--username USER --password PASS] PARENT NAME

mod cli;

use remotefm::Prompter;

use cli::{exit_with, init_tracing, parse_connection, usage_and_exit};

const USAGE: &str =
    "Usage: cargo run --example mkdir -- [--username USER --password PASS] [--url URL] PARENT NAME";

/// Answers the folder-name prompt from the command line.
struct Named(String);

impl Prompter for Named {
    fn confirm(&self, _question: &str) -> bool {
        false
    }

    fn folder_name(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    let conn = parse_connection(USAGE);
    let (parent, name) = match conn.positionals.as_slice() {
        [parent, name] => (parent.clone(), name.clone()),
        _ => usage_and_exit(USAGE),
    };

    let manager = match conn.connect(USAGE).await {
        Ok(manager) => manager,
        Err(e) => exit_with(e),
    };
    if let Err(e) = manager.load(&parent).await {
        exit_with(e);
    }

    match manager.create_folder(&Named(name.clone())).await {
        Ok(Some(_)) => println!("Created {} in {}", name, manager.path()),
        Ok(None) => println!("Nothing to create"),
        Err(e) => exit_with(e),
    }
}
