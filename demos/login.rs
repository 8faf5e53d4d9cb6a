//! Example: Log in and store the session
//!
//! Usage:
//!   cargo run --example login -- --username USER --password PASS [--url URL]

mod cli;

use cli::{exit_with, init_tracing, parse_connection, usage_and_exit};

const USAGE: &str =
    "Usage: cargo run --example login -- --username USER --password PASS [--url URL] [--config FILE]";

#[tokio::main]
async fn main() {
    init_tracing();
    let conn = parse_connection(USAGE);
    if !conn.positionals.is_empty() || conn.username.is_none() {
        usage_and_exit(USAGE);
    }

    let manager = match conn.connect(USAGE).await {
        Ok(manager) => manager,
        Err(e) => exit_with(e),
    };

    println!("Login successful!");
    println!();
    println!("User: {}", manager.session().username().unwrap_or_default());
    println!("Root: {} entries", manager.entries().len());
    println!("Session stored; later demos can omit --username/--password.");
}
