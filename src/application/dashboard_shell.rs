// Dashboard shell - session bootstrap, agent binding, logout
use crate::application::analytics_backend::{AnalyticsBackend, FetchError};
use crate::application::chart_registry::ChartRegistry;
use crate::application::conversation_service::ConversationService;
use crate::application::period_controller::{LoadOutcome, PeriodController};
use crate::application::render_target::RenderTarget;
use crate::application::session_signal::SessionSignal;
use crate::domain::agent::Agent;
use crate::domain::period::Period;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::{AbortHandle, JoinHandle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellSettings {
    pub default_period: Period,
    pub login_location: String,
}

impl Default for ShellSettings {
    fn default() -> Self {
        Self {
            default_period: Period::Today,
            login_location: "/login".to_string(),
        }
    }
}

/// A bootstrapped dashboard for one agent.
pub struct Dashboard {
    pub agent: Agent,
    pub controller: Arc<PeriodController>,
    pub conversations: Arc<ConversationService>,
    /// Raised by any loader that sees the session rejected.
    pub session: SessionSignal,
    /// Initial load for the default period.
    pub initial_analytics: Option<JoinHandle<LoadOutcome>>,
    pub initial_conversations: JoinHandle<Result<usize, FetchError>>,
    /// Completes once an expired session has been torn down.
    pub session_watch: JoinHandle<()>,
}

pub enum BootOutcome {
    Ready(Dashboard),
    /// No usable session; the user was sent to the login page.
    Redirected,
}

struct ActiveSession {
    agent: Agent,
    controller: Arc<PeriodController>,
    session_watch: AbortHandle,
}

impl ActiveSession {
    /// Stop the watcher and silence any request still in flight.
    fn close(&self) {
        self.session_watch.abort();
        self.controller.close();
    }
}

pub struct DashboardShell {
    backend: Arc<dyn AnalyticsBackend>,
    target: Arc<dyn RenderTarget>,
    charts: Arc<ChartRegistry>,
    settings: ShellSettings,
    active: Mutex<Option<ActiveSession>>,
}

impl DashboardShell {
    pub fn new(
        backend: Arc<dyn AnalyticsBackend>,
        target: Arc<dyn RenderTarget>,
        charts: Arc<ChartRegistry>,
        settings: ShellSettings,
    ) -> Self {
        Self {
            backend,
            target,
            charts,
            settings,
            active: Mutex::new(None),
        }
    }

    fn active(&self) -> MutexGuard<'_, Option<ActiveSession>> {
        self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn agent(&self) -> Option<Agent> {
        self.active().as_ref().map(|s| s.agent.clone())
    }

    /// Check the session and, when authenticated, start the dashboard.
    pub async fn bootstrap(self: &Arc<Self>) -> BootOutcome {
        let agent = match self.backend.session().await {
            Ok(info) => info.into_agent(),
            Err(e) => {
                tracing::warn!(error = %e, "Session check failed");
                None
            }
        };

        let Some(agent) = agent else {
            tracing::info!("No authenticated session, redirecting to login");
            self.target.redirect(&self.settings.login_location);
            return BootOutcome::Redirected;
        };

        tracing::info!(agent = %agent.id, name = %agent.name, "Dashboard session started");
        self.target.bind_agent(&agent);

        let signal = SessionSignal::new();
        let controller = Arc::new(PeriodController::new(
            agent.id.clone(),
            self.backend.clone(),
            self.target.clone(),
            self.charts.clone(),
            signal.clone(),
        ));
        let conversations = Arc::new(ConversationService::new(
            agent.id.clone(),
            self.backend.clone(),
            self.target.clone(),
            signal.clone(),
        ));

        let session_watch = {
            let shell = Arc::clone(self);
            let signal = signal.clone();
            tokio::spawn(async move {
                signal.invalidated().await;
                shell.expire_session();
            })
        };
        let previous = self.active().replace(ActiveSession {
            agent: agent.clone(),
            controller: controller.clone(),
            session_watch: session_watch.abort_handle(),
        });
        if let Some(previous) = previous {
            previous.close();
        }

        // Independent concerns; neither waits for the other.
        let initial_conversations = {
            let conversations = conversations.clone();
            tokio::spawn(async move { conversations.load_conversations().await })
        };
        let initial_analytics = controller.set_period(self.settings.default_period);

        BootOutcome::Ready(Dashboard {
            agent,
            controller,
            conversations,
            session: signal,
            initial_analytics,
            initial_conversations,
            session_watch,
        })
    }

    /// Best-effort server logout, then always back to the login page.
    pub async fn logout(&self) {
        // Closed before the request so nothing renders while it is pending.
        let active = self.active().take();
        if let Some(active) = &active {
            active.close();
        }
        if let Err(e) = self.backend.logout().await {
            tracing::warn!(error = %e, "Logout request failed, redirecting anyway");
        }
        if let Some(active) = active {
            tracing::info!(agent = %active.agent.id, "Logged out");
        }
        self.charts.destroy_all();
        self.target.redirect(&self.settings.login_location);
    }

    fn expire_session(&self) {
        let Some(active) = self.active().take() else {
            return;
        };
        tracing::warn!(agent = %active.agent.id, "Session expired, returning to login");
        active.controller.close();
        self.charts.destroy_all();
        self.target.redirect(&self.settings.login_location);
    }
}
