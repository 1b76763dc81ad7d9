//! Entry point: reads Markdown from a file or stdin, converts it, and prints
//! the resulting `batchUpdate` request array as formatted JSON.
//!
//! This is the offline substitute for a "dry run against the live API"
//! oracle: there is nowhere else to inspect what a conversion would send.

mod cli;

use std::fs;
use std::io::Read;

use anyhow::Context;
use clap::Parser;

use cli::Cli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let source = read_source(&cli.file)
        .with_context(|| format!("failed to read Markdown from `{}`", cli.file))?;

    let operations = docs_convert::convert(&source, cli.index)
        .context("failed to convert Markdown into a Google Docs batch")?;

    let requests = docs_convert::operations_to_requests(&operations);

    let json = serde_json::to_string_pretty(&requests)
        .context("failed to serialize the request batch as JSON")?;

    println!("{json}");

    Ok(())
}

/// Reads the full Markdown source from `path`, or from stdin if `path` is
/// `"-"`.
fn read_source(path: &str) -> anyhow::Result<String> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(path).with_context(|| format!("could not open `{path}`"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_source_from_a_file_path() {
        let dir = std::env::temp_dir();
        let path = dir.join("docs-convert-cli-test-input.md");
        fs::write(&path, "# Hello\n").unwrap();

        let source = read_source(path.to_str().unwrap()).unwrap();

        assert_eq!(source, "# Hello\n");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_path_is_a_readable_error() {
        let err = read_source("/nonexistent/path/does-not-exist.md").unwrap_err();
        assert!(format!("{err:#}").contains("does-not-exist.md"));
    }
}
