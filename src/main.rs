// Main entry point - Dependency injection and dashboard startup
use std::sync::Arc;

use agent_dashboard::application::analytics_backend::{AnalyticsBackend, Credentials};
use agent_dashboard::application::chart_registry::ChartRegistry;
use agent_dashboard::application::dashboard_shell::{BootOutcome, DashboardShell};
use agent_dashboard::infrastructure::config::load_dashboard_config;
use agent_dashboard::infrastructure::http_backend::HttpBackend;
use agent_dashboard::infrastructure::logging::init_logging;
use agent_dashboard::presentation::cli::{self, Cli};
use agent_dashboard::presentation::console::{Console, ConsoleChartSurface, ConsoleRenderTarget};
use anyhow::Context;
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = load_dashboard_config(cli.global.config.as_deref())?;
    cli::apply_overrides(&mut config, &cli.global);
    config.validate()?;

    // Initialize tracing
    init_logging(&config.logging)?;

    // Create backend (infrastructure layer)
    let backend: Arc<dyn AnalyticsBackend> =
        Arc::new(HttpBackend::new(&config.backend).context("failed to build HTTP client")?);

    if let (Some(agent_id), Some(password)) = (&cli.global.agent_id, &cli.global.password) {
        backend
            .login(&Credentials {
                agent_id: agent_id.clone(),
                password: password.clone(),
            })
            .await
            .context("login failed")?;
    }

    // Create console output (presentation layer)
    let console = Console::new(std::io::stdout());
    let target = Arc::new(ConsoleRenderTarget::new(console.clone()));
    let charts = Arc::new(ChartRegistry::new(Arc::new(ConsoleChartSurface::new(console))));

    // Create shell (application layer)
    let shell = Arc::new(DashboardShell::new(
        backend,
        target,
        charts,
        config.shell_settings()?,
    ));

    match shell.bootstrap().await {
        BootOutcome::Ready(dashboard) => cli::execute(cli.command(), &shell, dashboard).await,
        BootOutcome::Redirected => anyhow::bail!("no authenticated session; pass --agent-id and --password"),
    }
}
