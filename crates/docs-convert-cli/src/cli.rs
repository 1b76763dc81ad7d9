//! CLI argument definition for the `docs-convert` binary.

use clap::Parser;

/// Convert a Markdown file into a Google Docs `batchUpdate` request batch.
#[derive(Parser)]
#[clap(name = "docs-convert", version, about = "Markdown to Google Docs batchUpdate converter")]
pub struct Cli {
    /// Markdown file to convert (use "-" for stdin).
    pub file: String,

    /// 1-based document index the converted batch's operations start at.
    #[clap(long, short, default_value = "1")]
    pub index: usize,
}
