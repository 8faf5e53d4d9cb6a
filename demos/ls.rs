//! Example: List a remote directory
//!
//! Usage:
//!   cargo run --example ls -- [--username USER --password PASS] [PATH]

mod cli;

use cli::{exit_with, init_tracing, parse_connection, usage_and_exit};

const USAGE: &str = "Usage: cargo run --example ls -- [--username USER --password PASS] [--url URL] [PATH]";

#[tokio::main]
async fn main() {
    init_tracing();
    let conn = parse_connection(USAGE);
    if conn.positionals.len() > 1 {
        usage_and_exit(USAGE);
    }
    let path = conn.positionals.first().cloned().unwrap_or_else(|| "/".to_string());

    let manager = match conn.connect(USAGE).await {
        Ok(manager) => manager,
        Err(e) => exit_with(e),
    };

    if let Err(e) = manager.load(&path).await {
        exit_with(e);
    }

    let crumbs: Vec<String> = manager.breadcrumbs().into_iter().map(|c| c.name).collect();
    println!("\nListing: /{}\n", crumbs.join("/"));

    let entries = manager.entries();
    if entries.is_empty() {
        println!("  (empty)");
    }
    for entry in entries {
        let kind = if entry.is_dir { "d" } else { "-" };
        println!("  {} {:>10}  {}", kind, entry.display_size(), entry.name);
    }
}
