//! Shared fakes for dashboard integration tests.
//!
//! `ScriptedBackend` holds every analytics request open until the test
//! resolves it, so arrival order is fully under test control.

#![allow(dead_code)]

use agent_dashboard::application::analytics_backend::{
    AnalyticsBackend, Credentials, FetchError,
};
use agent_dashboard::application::chart_registry::{ChartRegistry, ChartSpec};
use agent_dashboard::application::conversation_service::ConversationRow;
use agent_dashboard::application::insights_renderer::InsightsView;
use agent_dashboard::application::metrics_renderer::MetricsView;
use agent_dashboard::application::period_controller::PeriodController;
use agent_dashboard::application::render_target::{
    ChartInstance, ChartSurface, LoadFailure, Modal, Notice, RenderTarget,
};
use agent_dashboard::application::session_signal::SessionSignal;
use agent_dashboard::domain::agent::{Agent, SessionInfo};
use agent_dashboard::domain::chart::{ChartId, ChartSeries, ChartsPayload};
use agent_dashboard::domain::conversation::{
    ConversationList, ConversationSummary, DataAnalysisDetail, Download, ToolsUsedDetail,
    TranscriptDetail,
};
use agent_dashboard::domain::dashboard::AnalyticsPayload;
use agent_dashboard::domain::insight::{InsightRecord, InsightsPayload};
use agent_dashboard::domain::metrics::MetricsSnapshot;
use agent_dashboard::domain::period::Period;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

pub const AGENT_ID: &str = "agent_0123456789";

type AnalyticsReply = oneshot::Sender<Result<AnalyticsPayload, FetchError>>;

// =============================================================================
// Scripted backend
// =============================================================================

pub struct ScriptedBackend {
    session: Mutex<Result<SessionInfo, FetchError>>,
    requests: Mutex<Vec<Period>>,
    pending: Mutex<Vec<(Period, AnalyticsReply)>>,
    conversations: Mutex<Result<ConversationList, FetchError>>,
    logout_result: Mutex<Result<(), FetchError>>,
    logout_calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            session: Mutex::new(Ok(authenticated_session(AGENT_ID))),
            requests: Mutex::new(Vec::new()),
            pending: Mutex::new(Vec::new()),
            conversations: Mutex::new(Ok(ConversationList::default())),
            logout_result: Mutex::new(Ok(())),
            logout_calls: AtomicUsize::new(0),
        })
    }

    pub fn set_session(&self, session: Result<SessionInfo, FetchError>) {
        *self.session.lock().unwrap() = session;
    }

    pub fn set_conversations(&self, result: Result<ConversationList, FetchError>) {
        *self.conversations.lock().unwrap() = result;
    }

    pub fn set_logout_result(&self, result: Result<(), FetchError>) {
        *self.logout_result.lock().unwrap() = result;
    }

    pub fn logout_calls(&self) -> usize {
        self.logout_calls.load(Ordering::SeqCst)
    }

    /// Periods requested so far, in issue order.
    pub fn requests(&self) -> Vec<Period> {
        self.requests.lock().unwrap().clone()
    }

    /// Yield until `count` analytics requests have been issued.
    pub async fn wait_for_requests(&self, count: usize) {
        for _ in 0..10_000 {
            if self.requests.lock().unwrap().len() >= count {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!(
            "expected {} analytics requests, saw {:?}",
            count,
            self.requests()
        );
    }

    /// Complete the oldest open request for `period`.
    pub fn resolve(&self, period: Period, result: Result<AnalyticsPayload, FetchError>) {
        let mut pending = self.pending.lock().unwrap();
        let index = pending
            .iter()
            .position(|(p, _)| *p == period)
            .unwrap_or_else(|| panic!("no open request for {}", period));
        let (_, reply) = pending.remove(index);
        let _ = reply.send(result);
    }

    pub fn open_requests(&self) -> usize {
        self.pending.lock().unwrap().len()
    }
}

#[async_trait]
impl AnalyticsBackend for ScriptedBackend {
    async fn login(&self, _credentials: &Credentials) -> Result<(), FetchError> {
        Ok(())
    }

    async fn session(&self) -> Result<SessionInfo, FetchError> {
        self.session.lock().unwrap().clone()
    }

    async fn time_based_analytics(
        &self,
        agent_id: &str,
        period: Period,
    ) -> Result<AnalyticsPayload, FetchError> {
        assert_eq!(agent_id, AGENT_ID);
        let (tx, rx) = oneshot::channel();
        self.pending.lock().unwrap().push((period, tx));
        self.requests.lock().unwrap().push(period);
        rx.await
            .unwrap_or_else(|_| Err(FetchError::Network("request abandoned".to_string())))
    }

    async fn conversations(&self, _agent_id: &str) -> Result<ConversationList, FetchError> {
        self.conversations.lock().unwrap().clone()
    }

    async fn transcript(&self, conversation_id: &str) -> Result<TranscriptDetail, FetchError> {
        Ok(TranscriptDetail {
            conversation_id: conversation_id.to_string(),
            transcript: "Agent: Hello\n\nUser: Hi".to_string(),
            message_count: 2,
            duration: "0m 30s".to_string(),
        })
    }

    async fn data_analysis(
        &self,
        conversation_id: &str,
    ) -> Result<DataAnalysisDetail, FetchError> {
        Ok(DataAnalysisDetail {
            conversation_id: conversation_id.to_string(),
            ..DataAnalysisDetail::default()
        })
    }

    async fn tools_used(&self, _conversation_id: &str) -> Result<ToolsUsedDetail, FetchError> {
        Err(FetchError::Unauthorized)
    }

    async fn export_conversations_csv(&self, agent_id: &str) -> Result<Download, FetchError> {
        Ok(Download::new(
            format!("conversations_{}_2026-10-18.csv", agent_id),
            "text/csv",
            Bytes::from_static(b"id,title\nconv_1,Refund\n"),
        ))
    }

    async fn conversation_audio(&self, _conversation_id: &str) -> Result<Download, FetchError> {
        Err(FetchError::Status {
            status: 404,
            message: "Audio not found".to_string(),
        })
    }

    async fn logout(&self) -> Result<(), FetchError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        self.logout_result.lock().unwrap().clone()
    }
}

// =============================================================================
// Recording render target
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    BindAgent(Agent),
    Loading(bool),
    Metrics(MetricsView),
    Insights(InsightsView),
    LoadFailure(LoadFailure),
    ClearConversations,
    Conversation(ConversationRow),
    ConversationsEmpty(String),
    ConversationsFailure(String),
    Modal(Modal),
    Download(String),
    Notice(Notice),
    Redirect(String),
}

#[derive(Default)]
pub struct RecordingRenderTarget {
    events: Mutex<Vec<Event>>,
}

impl RecordingRenderTarget {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn metrics(&self) -> Vec<MetricsView> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Metrics(view) => Some(view),
                _ => None,
            })
            .collect()
    }

    pub fn insights(&self) -> Vec<InsightsView> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Insights(view) => Some(view),
                _ => None,
            })
            .collect()
    }

    pub fn failures(&self) -> Vec<LoadFailure> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::LoadFailure(f) => Some(f),
                _ => None,
            })
            .collect()
    }

    pub fn redirects(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Redirect(location) => Some(location),
                _ => None,
            })
            .collect()
    }

    pub fn last_loading(&self) -> Option<bool> {
        self.events().into_iter().rev().find_map(|e| match e {
            Event::Loading(loading) => Some(loading),
            _ => None,
        })
    }
}

impl RenderTarget for RecordingRenderTarget {
    fn bind_agent(&self, agent: &Agent) {
        self.push(Event::BindAgent(agent.clone()));
    }

    fn set_loading(&self, loading: bool) {
        self.push(Event::Loading(loading));
    }

    fn render_metrics(&self, view: &MetricsView) {
        self.push(Event::Metrics(view.clone()));
    }

    fn render_insights(&self, view: &InsightsView) {
        self.push(Event::Insights(view.clone()));
    }

    fn render_load_failure(&self, failure: &LoadFailure) {
        self.push(Event::LoadFailure(failure.clone()));
    }

    fn clear_conversations(&self) {
        self.push(Event::ClearConversations);
    }

    fn render_conversation(&self, row: &ConversationRow) {
        self.push(Event::Conversation(row.clone()));
    }

    fn render_conversations_empty(&self, message: &str) {
        self.push(Event::ConversationsEmpty(message.to_string()));
    }

    fn render_conversations_failure(&self, message: &str) {
        self.push(Event::ConversationsFailure(message.to_string()));
    }

    fn show_modal(&self, modal: &Modal) {
        self.push(Event::Modal(modal.clone()));
    }

    fn offer_download(&self, download: &Download) {
        self.push(Event::Download(download.filename.clone()));
    }

    fn notify(&self, notice: &Notice) {
        self.push(Event::Notice(notice.clone()));
    }

    fn redirect(&self, location: &str) {
        self.push(Event::Redirect(location.to_string()));
    }
}

// =============================================================================
// Recording chart surface
// =============================================================================

pub struct RecordingChartSurface {
    anchors: HashSet<ChartId>,
    live: Arc<AtomicUsize>,
    created: Mutex<Vec<ChartSpec>>,
}

impl RecordingChartSurface {
    /// A page with every dashboard anchor.
    pub fn new() -> Arc<Self> {
        Self::with_anchors(&ChartId::DASHBOARD)
    }

    pub fn with_anchors(anchors: &[ChartId]) -> Arc<Self> {
        Arc::new(Self {
            anchors: anchors.iter().copied().collect(),
            live: Arc::new(AtomicUsize::new(0)),
            created: Mutex::new(Vec::new()),
        })
    }

    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> Vec<ChartSpec> {
        self.created.lock().unwrap().clone()
    }
}

struct RecordingChart {
    live: Arc<AtomicUsize>,
}

impl ChartInstance for RecordingChart {
    fn destroy(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ChartSurface for RecordingChartSurface {
    fn has_anchor(&self, id: ChartId) -> bool {
        self.anchors.contains(&id)
    }

    fn create(&self, spec: &ChartSpec) -> Box<dyn ChartInstance> {
        self.created.lock().unwrap().push(spec.clone());
        self.live.fetch_add(1, Ordering::SeqCst);
        Box::new(RecordingChart {
            live: self.live.clone(),
        })
    }
}

// =============================================================================
// Harness
// =============================================================================

pub struct Harness {
    pub backend: Arc<ScriptedBackend>,
    pub target: Arc<RecordingRenderTarget>,
    pub surface: Arc<RecordingChartSurface>,
    pub charts: Arc<ChartRegistry>,
    pub session: SessionSignal,
    pub controller: Arc<PeriodController>,
}

impl Harness {
    pub fn new() -> Self {
        let backend = ScriptedBackend::new();
        let target = RecordingRenderTarget::new();
        let surface = RecordingChartSurface::new();
        let charts = Arc::new(ChartRegistry::new(surface.clone()));
        let session = SessionSignal::new();
        let controller = Arc::new(PeriodController::new(
            AGENT_ID.to_string(),
            backend.clone(),
            target.clone(),
            charts.clone(),
            session.clone(),
        ));
        Self {
            backend,
            target,
            surface,
            charts,
            session,
            controller,
        }
    }
}

// =============================================================================
// Payload builders
// =============================================================================

pub fn authenticated_session(agent_id: &str) -> SessionInfo {
    SessionInfo {
        authenticated: true,
        agent_id: Some(agent_id.to_string()),
        ..SessionInfo::default()
    }
}

pub fn series(labels: &[&str], values: &[f64]) -> ChartSeries {
    ChartSeries::new(
        labels.iter().map(|l| l.to_string()).collect(),
        values.to_vec(),
    )
}

pub fn full_charts() -> ChartsPayload {
    ChartsPayload {
        performance_trend: Some(series(&["09:00", "10:00"], &[88.0, 91.0])),
        success_rate_trend: Some(series(&["09:00", "10:00"], &[90.0, 95.0])),
        duration_distribution: Some(series(&["0-1m", "1-3m", "3m+"], &[4.0, 9.0, 2.0])),
        call_outcomes: Some(series(&["completed", "transferred"], &[12.0, 3.0])),
    }
}

pub fn insights(title: &str) -> InsightsPayload {
    InsightsPayload {
        insights: vec![InsightRecord {
            title: title.to_string(),
            description: "Compared with the previous period".to_string(),
            tag: Some("positive".to_string()),
            ..InsightRecord::default()
        }],
        ..InsightsPayload::default()
    }
}

/// Analytics payload whose total call count identifies it.
pub fn payload(total_calls: u64) -> AnalyticsPayload {
    AnalyticsPayload::new(
        MetricsSnapshot {
            total_calls: Some(total_calls),
            success_rate: Some(90.0),
            ..MetricsSnapshot::default()
        },
        full_charts(),
        Some(insights("Call volume up")),
    )
}

pub fn conversation(id: &str, title: &str) -> ConversationSummary {
    ConversationSummary {
        id: id.to_string(),
        title: title.to_string(),
        summary: format!("{} summary", title),
        status: "completed".to_string(),
        duration: "2m 5s".to_string(),
        date: "2026-10-18".to_string(),
        message_count: 6,
        has_audio: true,
    }
}
