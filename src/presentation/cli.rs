//! Command-line interface for the agent dashboard.
//!
//! # Example
//!
//! ```bash
//! # Sign in and show the last 7 days
//! agent-dashboard --agent-id agent_01 --period last7days show
//!
//! # Export the conversation list
//! agent-dashboard export-csv --out ./exports
//! ```

use crate::application::dashboard_shell::{Dashboard, DashboardShell};
use crate::application::period_controller::LoadOutcome;
use crate::domain::conversation::Download;
use crate::domain::period::Period;
use crate::infrastructure::config::DashboardConfig;
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Agent analytics dashboard
#[derive(Parser, Debug)]
#[command(name = "agent-dashboard", version, about = "Analytics dashboard for a conversational agent")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the backend base URL
    #[arg(long, global = true, env = "AGENT_DASHBOARD_BASE_URL")]
    pub base_url: Option<String>,

    /// Agent to sign in as
    #[arg(long, global = true, env = "AGENT_DASHBOARD_AGENT_ID")]
    pub agent_id: Option<String>,

    /// Password for --agent-id
    #[arg(long, global = true, env = "AGENT_DASHBOARD_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Initial period (today, last7days, last30days)
    #[arg(short, long, global = true)]
    pub period: Option<Period>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Show metrics, charts, insights and conversations
    Show,
    /// Switch through periods in order; only the last one is rendered
    Periods {
        #[arg(required = true)]
        periods: Vec<Period>,
    },
    /// Show a conversation transcript
    Transcript { id: String },
    /// Show the cached brief summary of a conversation
    Summary { id: String },
    /// Show the tools used in a conversation
    Tools { id: String },
    /// Show the data analysis of a conversation
    Analysis { id: String },
    /// Export the conversation list as CSV
    ExportCsv {
        /// Directory to write into
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Download a conversation recording
    Audio {
        id: String,
        /// Directory to write into
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// End the session
    Logout,
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Show)
    }
}

/// Apply CLI overrides on top of the loaded configuration.
pub fn apply_overrides(config: &mut DashboardConfig, args: &GlobalArgs) {
    if let Some(url) = &args.base_url {
        config.backend.base_url = url.clone();
    }
    if let Some(period) = args.period {
        config.dashboard.default_period = period.query_value().to_string();
    }
}

/// Run one command against a bootstrapped dashboard.
pub async fn execute(
    command: Commands,
    shell: &DashboardShell,
    dashboard: Dashboard,
) -> anyhow::Result<()> {
    let Dashboard {
        controller,
        conversations,
        initial_analytics,
        initial_conversations,
        ..
    } = dashboard;

    if command == Commands::Logout {
        shell.logout().await;
        return Ok(());
    }

    // The summary is built from the cached list, so it must have landed.
    let (analytics, listed) = futures::join!(
        async {
            match initial_analytics {
                Some(handle) => Some(handle.await),
                None => None,
            }
        },
        initial_conversations
    );
    if let Some(outcome) = analytics {
        report_outcome(outcome.context("analytics task panicked")?);
    }
    if let Err(e) = listed.context("conversation task panicked")? {
        tracing::debug!(error = %e, "Conversation list unavailable");
    }

    match command {
        Commands::Show | Commands::Logout => {}
        Commands::Periods { periods } => {
            let handles: Vec<_> = periods
                .into_iter()
                .filter_map(|period| controller.set_period(period))
                .collect();
            for outcome in futures::future::join_all(handles).await {
                report_outcome(outcome.context("analytics task panicked")?);
            }
        }
        Commands::Transcript { id } => conversations.show_transcript(&id).await?,
        Commands::Summary { id } => {
            if !conversations.show_summary(&id) {
                anyhow::bail!("Conversation {} is not in the current list", id);
            }
        }
        Commands::Tools { id } => conversations.show_tools_used(&id).await?,
        Commands::Analysis { id } => conversations.show_data_analysis(&id).await?,
        Commands::ExportCsv { out } => {
            let download = conversations.export_csv().await?;
            save(&out, &download).await?;
        }
        Commands::Audio { id, out } => {
            let download = conversations.download_audio(&id).await?;
            save(&out, &download).await?;
        }
    }

    Ok(())
}

fn report_outcome(outcome: LoadOutcome) {
    match outcome {
        LoadOutcome::Rendered => tracing::debug!("Analytics load rendered"),
        LoadOutcome::Stale => tracing::debug!("Analytics load superseded"),
        LoadOutcome::Failed(e) => tracing::warn!(error = %e, "Analytics load failed"),
        LoadOutcome::SessionExpired => tracing::warn!("Session expired during analytics load"),
    }
}

async fn save(dir: &Path, download: &Download) -> anyhow::Result<PathBuf> {
    // Never let a server-provided name escape the target directory.
    let name = Path::new(&download.filename)
        .file_name()
        .context("download has no usable file name")?;
    let path = dir.join(name);
    tokio::fs::write(&path, &download.content)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "Saved download");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_parse_defaults_to_show() {
        let cli = Cli::parse_from(["agent-dashboard"]);
        assert_eq!(cli.command(), Commands::Show);
        assert!(cli.global.period.is_none());
    }

    #[test]
    fn test_parse_global_args_after_subcommand() {
        let cli = Cli::parse_from([
            "agent-dashboard",
            "periods",
            "today",
            "Last 7 Days",
            "--period",
            "last30days",
        ]);
        assert_eq!(cli.global.period, Some(Period::Last30Days));
        assert_eq!(
            cli.command(),
            Commands::Periods {
                periods: vec![Period::Today, Period::Last7Days]
            }
        );
    }

    #[test]
    fn test_parse_rejects_unknown_period() {
        assert!(Cli::try_parse_from(["agent-dashboard", "--period", "yesterday"]).is_err());
    }

    #[tokio::test]
    async fn test_save_strips_directories_from_filename() {
        let dir = tempfile::tempdir().unwrap();
        let download = Download::new(
            "../../conversations_a1.csv".to_string(),
            "text/csv",
            Bytes::from_static(b"id,title\n"),
        );

        let path = save(dir.path(), &download).await.unwrap();
        assert_eq!(path, dir.path().join("conversations_a1.csv"));
        assert_eq!(std::fs::read(&path).unwrap(), b"id,title\n");
    }
}
