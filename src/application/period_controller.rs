// Period controller - owns the selected time window and sequences fetch -> render
use crate::application::analytics_backend::{AnalyticsBackend, FetchError};
use crate::application::chart_registry::ChartRegistry;
use crate::application::insights_renderer::InsightsRenderer;
use crate::application::metrics_renderer::MetricsRenderer;
use crate::application::render_target::{LoadFailure, RenderTarget};
use crate::application::session_signal::SessionSignal;
use crate::domain::chart::ChartId;
use crate::domain::dashboard::AnalyticsPayload;
use crate::domain::period::{Period, PeriodError};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;

/// How a single analytics load ended.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Rendered,
    /// The user moved on before the response arrived; nothing was drawn.
    Stale,
    Failed(FetchError),
    /// The backend rejected the session; the shell has been signalled.
    SessionExpired,
}

/// Identity of one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ticket {
    period: Period,
    seq: u64,
}

#[derive(Debug, Default)]
struct ControllerState {
    current: Option<Period>,
    issued: u64,
    /// Last request issued for `current`; the only one allowed to render.
    latest: Option<Ticket>,
    pending: bool,
    /// Set on teardown; nothing renders afterwards.
    closed: bool,
}

impl ControllerState {
    fn issue(&mut self, period: Period) -> Ticket {
        self.issued += 1;
        let ticket = Ticket {
            period,
            seq: self.issued,
        };
        if self.current == Some(period) {
            self.latest = Some(ticket);
            self.pending = true;
        }
        ticket
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        self.current == Some(ticket.period) && self.latest == Some(ticket)
    }
}

pub struct PeriodController {
    agent_id: String,
    backend: Arc<dyn AnalyticsBackend>,
    target: Arc<dyn RenderTarget>,
    charts: Arc<ChartRegistry>,
    session: SessionSignal,
    state: Mutex<ControllerState>,
}

impl PeriodController {
    pub fn new(
        agent_id: String,
        backend: Arc<dyn AnalyticsBackend>,
        target: Arc<dyn RenderTarget>,
        charts: Arc<ChartRegistry>,
        session: SessionSignal,
    ) -> Self {
        Self {
            agent_id,
            backend,
            target,
            charts,
            session,
            state: Mutex::new(ControllerState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub fn current_period(&self) -> Option<Period> {
        self.state().current
    }

    /// Stop rendering for good. Requests still in flight settle as `Stale`.
    pub fn close(&self) {
        let mut state = self.state();
        if !state.closed {
            state.closed = true;
            state.pending = false;
            tracing::debug!(agent = %self.agent_id, "Period controller closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.state().closed
    }

    /// True while the request for the current period has not settled.
    pub fn is_loading(&self) -> bool {
        self.state().pending
    }

    /// Make `period` current and load it.
    ///
    /// Returns `None` when `period` is already current and its request is
    /// still in flight; selecting it again after that request settles
    /// refetches.
    pub fn set_period(self: &Arc<Self>, period: Period) -> Option<JoinHandle<LoadOutcome>> {
        let ticket = {
            let mut state = self.state();
            if state.closed {
                tracing::debug!(period = %period, "Dashboard closed, ignoring selection");
                return None;
            }
            if state.current == Some(period) && state.pending {
                tracing::debug!(period = %period, "Period already loading, not refetching");
                return None;
            }
            state.current = Some(period);
            state.issue(period)
        };

        tracing::info!(period = %period, seq = ticket.seq, "Period selected");
        self.target.set_loading(true);
        Some(self.spawn(ticket))
    }

    /// Parse a selector label and hand it to [`set_period`](Self::set_period).
    pub fn set_period_label(
        self: &Arc<Self>,
        label: &str,
    ) -> Result<Option<JoinHandle<LoadOutcome>>, PeriodError> {
        let period = label.parse::<Period>().inspect_err(|e| {
            tracing::warn!(label, error = %e, "Ignoring unknown period");
        })?;
        Ok(self.set_period(period))
    }

    /// Re-run the failed request behind a retry affordance.
    ///
    /// Ignored unless `period` is still current and idle.
    pub fn retry(self: &Arc<Self>, period: Period) -> Option<JoinHandle<LoadOutcome>> {
        let ticket = {
            let mut state = self.state();
            if state.closed || state.current != Some(period) || state.pending {
                tracing::debug!(period = %period, "Retry no longer applicable");
                return None;
            }
            state.issue(period)
        };

        tracing::info!(period = %period, seq = ticket.seq, "Retrying analytics load");
        self.target.set_loading(true);
        Some(self.spawn(ticket))
    }

    /// Fetch and, if still current on arrival, render analytics for `period`.
    pub async fn load_analytics(&self, period: Period) -> LoadOutcome {
        let ticket = {
            let mut state = self.state();
            if state.closed {
                return LoadOutcome::Stale;
            }
            let ticket = state.issue(period);
            if state.latest == Some(ticket) {
                self.target.set_loading(true);
            }
            ticket
        };
        self.run(ticket).await
    }

    fn spawn(self: &Arc<Self>, ticket: Ticket) -> JoinHandle<LoadOutcome> {
        let controller = Arc::clone(self);
        tokio::spawn(async move { controller.run(ticket).await })
    }

    async fn run(&self, ticket: Ticket) -> LoadOutcome {
        let result = self
            .backend
            .time_based_analytics(&self.agent_id, ticket.period)
            .await;

        // Auth failures end the session even when the request is stale.
        if matches!(result, Err(FetchError::Unauthorized)) {
            tracing::warn!(period = %ticket.period, "Analytics request unauthenticated");
            {
                let mut state = self.state();
                if state.latest == Some(ticket) {
                    state.pending = false;
                }
            }
            self.session.invalidate();
            return LoadOutcome::SessionExpired;
        }

        // Check and render under one lock so no selection or teardown can interleave.
        let mut state = self.state();
        if self.session.is_invalidated() {
            tracing::debug!(period = %ticket.period, "Session gone, discarding analytics response");
            return LoadOutcome::SessionExpired;
        }
        if state.closed {
            tracing::debug!(period = %ticket.period, "Dashboard closed, discarding analytics response");
            return LoadOutcome::Stale;
        }
        if !state.is_current(ticket) {
            tracing::debug!(
                period = %ticket.period,
                seq = ticket.seq,
                current = ?state.current,
                "Discarding stale analytics response"
            );
            return LoadOutcome::Stale;
        }
        state.pending = false;

        match result {
            Ok(payload) => {
                self.render(ticket.period, &payload);
                self.target.set_loading(false);
                tracing::info!(period = %ticket.period, "Analytics rendered");
                LoadOutcome::Rendered
            }
            Err(err) => {
                tracing::warn!(period = %ticket.period, error = %err, "Analytics load failed");
                self.target.set_loading(false);
                self.target.render_load_failure(&LoadFailure {
                    period: ticket.period,
                    message: format!("Failed to load analytics: {}", err),
                });
                LoadOutcome::Failed(err)
            }
        }
    }

    /// Metric cards, then charts, then insights.
    fn render(&self, period: Period, payload: &AnalyticsPayload) {
        self.target
            .render_metrics(&MetricsRenderer::render(period, &payload.metrics));

        let bindings = payload.charts.bindings();
        for binding in &bindings {
            if let Err(e) = self.charts.upsert(
                binding.id,
                binding.kind,
                binding.series.clone(),
                binding.options.clone(),
            ) {
                tracing::warn!(chart = %binding.id, error = %e, "Skipping malformed chart");
                self.charts.remove(binding.id);
            }
        }
        // Charts the new period has no data for must not keep showing the old period.
        for id in ChartId::DASHBOARD {
            if !bindings.iter().any(|b| b.id == id) {
                self.charts.remove(id);
            }
        }

        self.target
            .render_insights(&InsightsRenderer::render(payload.insights.as_ref()));
    }
}
