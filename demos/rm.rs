//! Example: Delete a remote file or directory (asks for confirmation)
//!
//! Usage:
//!   cargo run --example rm -- [--username USER --password PASS] PATH

mod cli;

use remotefm::StdinPrompter;

use cli::{exit_with, init_tracing, parse_connection, usage_and_exit};

const USAGE: &str =
    "Usage: cargo run --example rm -- [--username USER --password PASS] [--url URL] PATH";

#[tokio::main]
async fn main() {
    init_tracing();
    let conn = parse_connection(USAGE);
    let [path] = conn.positionals.as_slice() else {
        usage_and_exit(USAGE);
    };

    let manager = match conn.connect(USAGE).await {
        Ok(manager) => manager,
        Err(e) => exit_with(e),
    };

    match manager.delete(path, &StdinPrompter).await {
        Ok(Some(_)) => println!("Deleted {}", path),
        Ok(None) => println!("Cancelled"),
        Err(e) => exit_with(e),
    }
}
