//! Example: Upload local files into a remote directory, one after another
//!
//! Usage:
//!   cargo run --example upload -- [--username USER --password PASS] --dest /remote/dir FILE...

mod cli;

use indicatif::{ProgressBar, ProgressStyle};
use remotefm::{BatchProgress, ProgressCallback, UploadFile, UploadPhase};

use cli::{exit_with, init_tracing, parse_connection, usage_and_exit, ArgParser};

const USAGE: &str =
    "Usage: cargo run --example upload -- [--username USER --password PASS] [--url URL] [--dest DIR] FILE...";

#[tokio::main]
async fn main() {
    init_tracing();
    let mut conn = parse_connection(USAGE);
    let mut parser = ArgParser::from_args(std::mem::take(&mut conn.positionals), USAGE);
    let dest = parser.take_value(&["--dest", "-d"]).unwrap_or_else(|| "/".to_string());
    let paths = parser.remaining();
    if paths.is_empty() {
        usage_and_exit(USAGE);
    }

    let mut files = Vec::with_capacity(paths.len());
    for path in &paths {
        match UploadFile::from_path(path).await {
            Ok(file) => files.push(file),
            Err(e) => exit_with(e),
        }
    }

    let manager = match conn.connect(USAGE).await {
        Ok(manager) => manager,
        Err(e) => exit_with(e),
    };
    if let Err(e) = manager.load(&dest).await {
        exit_with(e);
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    let bar = pb.clone();
    let progress: ProgressCallback = Box::new(move |p: &BatchProgress| match p.phase {
        UploadPhase::Started => bar.set_message(p.filename.clone()),
        UploadPhase::Finished => bar.inc(1),
        UploadPhase::Failed => {
            bar.println(format!("failed: {}", p.filename));
            bar.inc(1);
        }
    });

    let report = manager.upload(files, Some(progress)).await;
    pb.finish_with_message("done");

    for name in report.succeeded() {
        println!("Uploaded {}", name);
    }
    for (name, error) in report.failed() {
        eprintln!("Failed to upload {}: {}", name, error);
    }
    if !report.all_succeeded() {
        std::process::exit(1);
    }
}
