//! `umlsync extract`: show blocks and their output paths without rendering.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use umlsync_core::OutputTemplate;
use umlsync_extractor::{extract_file, load_sources};
use umlsync_sync::resolve;

/// Arguments for `umlsync extract`.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Repository-relative files to scan.
    #[arg(required = true)]
    pub files: Vec<String>,

    /// Output directory template, as for `sync`.
    #[arg(long, env = "INPUT_PATH", default_value = ".")]
    pub path: String,

    /// Checkout the files are read from.
    #[arg(long, env = "GITHUB_WORKSPACE", default_value = ".")]
    pub workspace: PathBuf,

    /// Print blocks as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct BlockListing {
    source: String,
    target: String,
    lines: usize,
}

impl ExtractArgs {
    pub fn run(self) -> Result<()> {
        let template = OutputTemplate::parse(&self.path);
        let sources = load_sources(&self.workspace, &self.files)?;
        tracing::debug!("scanning {} of {} file(s)", sources.len(), self.files.len());

        let mut listings = Vec::new();
        for source in &sources {
            for block in extract_file(&source.path, &source.contents) {
                listings.push(BlockListing {
                    source: source.path.clone(),
                    target: resolve(&template, &block).into_path(),
                    lines: block.code.lines().count(),
                });
            }
        }

        if self.json {
            let json =
                serde_json::to_string_pretty(&listings).context("failed to serialize blocks")?;
            println!("{json}");
            return Ok(());
        }

        if listings.is_empty() {
            println!("No diagram blocks in {} scanned file(s).", sources.len());
            return Ok(());
        }
        for listing in &listings {
            println!(
                "{} → {} ({} line(s))",
                listing.source,
                listing.target.bold(),
                listing.lines
            );
        }
        Ok(())
    }
}
