//! `umlsync sync`: render the blocks of a push and commit changed SVGs.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use umlsync_core::{ConfigError, OutputTemplate, PushEvent, SyncConfig, SyncResult, Token};
use umlsync_renderer::{PlantUmlServer, DEFAULT_SERVER_URL};
use umlsync_sync::{pipeline, ArtifactResult, GitHubStore, SyncReport, DEFAULT_API_URL};

/// Arguments for `umlsync sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Output directory template: `.` next to the source, `dir` below it,
    /// `/dir` from the repository root.
    #[arg(long, env = "INPUT_PATH", default_value = ".")]
    pub path: String,

    /// Message of the generated commit.
    #[arg(long, env = "INPUT_MESSAGE", default_value = umlsync_core::DEFAULT_COMMIT_MESSAGE)]
    pub message: String,

    /// PlantUML server base URL.
    #[arg(long, env = "INPUT_SERVER", default_value = DEFAULT_SERVER_URL)]
    pub server: String,

    /// API access token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Push event payload (JSON).
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub event: Option<PathBuf>,

    /// Checkout the changed paths are read from.
    #[arg(long, env = "GITHUB_WORKSPACE", default_value = ".")]
    pub workspace: PathBuf,

    /// REST API root.
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Render and compare, but create no tree, commit, or ref update.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run report as JSON.
    #[arg(long)]
    pub json: bool,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let token = Token::require(self.token)?;
        let event_path = self.event.ok_or(ConfigError::MissingEvent)?;
        let event = PushEvent::load_at(&event_path)?;
        tracing::debug!("loaded push event: {}", event_path.display());

        let config = SyncConfig {
            output: OutputTemplate::parse(&self.path),
            commit_message: self.message,
            dry_run: self.dry_run,
        };
        let renderer = PlantUmlServer::new(self.server);
        let store = GitHubStore::new(self.api_url, token);

        let report = pipeline::run(&event, &self.workspace, &renderer, &store, &config)
            .context("sync failed")?;

        if self.json {
            let json =
                serde_json::to_string_pretty(&report).context("failed to serialize sync report")?;
            println!("{json}");
        } else {
            print_report(&report);
        }
        Ok(())
    }
}

fn print_report(report: &SyncReport) {
    for artifact in &report.artifacts {
        match artifact {
            ArtifactResult::Updated { path, .. } => println!("  {}  {path}", "✎".green()),
            ArtifactResult::Unchanged { path } => println!("  {}  {path}", "·".dimmed()),
            ArtifactResult::RenderFailed { path, reason } => {
                println!("  {}  {path} ({reason})", "✗".red())
            }
            ArtifactResult::Duplicate { path } => {
                println!("  {}  {path} (duplicate, skipped)", "=".yellow())
            }
        }
    }

    match &report.result {
        SyncResult::NoChanges => println!("✓ nothing to commit"),
        SyncResult::WouldCommit { paths } => {
            println!("[dry-run] ✓ would commit {} file(s)", paths.len())
        }
        SyncResult::Committed { commit, paths } => {
            println!("✓ committed {} file(s) as {}", paths.len(), commit.as_str().bold())
        }
    }

    let failures = report.render_failures();
    if failures > 0 {
        println!("{}", format!("! {failures} block(s) failed to render").yellow());
    }
}
