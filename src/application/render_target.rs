// Presentation seams - what the application layer may ask a UI to do
use crate::application::chart_registry::ChartSpec;
use crate::application::conversation_service::ConversationRow;
use crate::application::insights_renderer::InsightsView;
use crate::application::metrics_renderer::MetricsView;
use crate::domain::agent::Agent;
use crate::domain::chart::ChartId;
use crate::domain::conversation::Download;
use crate::domain::period::Period;

/// Inline error for the analytics area; the UI offers a retry bound to `period`.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadFailure {
    pub period: Period,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Modal {
    pub title: String,
    /// Labelled header fields, in display order.
    pub fields: Vec<(String, String)>,
    pub heading: String,
    pub paragraphs: Vec<String>,
}

impl Modal {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn field(mut self, label: &str, value: impl Into<String>) -> Self {
        self.fields.push((label.to_string(), value.into()));
        self
    }

    pub fn heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = heading.into();
        self
    }

    pub fn paragraph(mut self, text: impl Into<String>) -> Self {
        self.paragraphs.push(text.into());
        self
    }
}

/// Everything the dashboard draws outside of charts.
///
/// Implementations hold their own interior mutability; every call happens on
/// the dashboard's event loop and must not block.
pub trait RenderTarget: Send + Sync {
    /// Show the dashboard chrome for the signed-in agent.
    fn bind_agent(&self, agent: &Agent);

    fn set_loading(&self, loading: bool);

    fn render_metrics(&self, view: &MetricsView);

    fn render_insights(&self, view: &InsightsView);

    fn render_load_failure(&self, failure: &LoadFailure);

    fn clear_conversations(&self);

    fn render_conversation(&self, row: &ConversationRow);

    fn render_conversations_empty(&self, message: &str);

    fn render_conversations_failure(&self, message: &str);

    fn show_modal(&self, modal: &Modal);

    fn offer_download(&self, download: &Download);

    fn notify(&self, notice: &Notice);

    fn redirect(&self, location: &str);
}

/// A live chart owned by the chart library.
pub trait ChartInstance: Send {
    /// Release library resources (timers, canvases). Called exactly once.
    fn destroy(&mut self);
}

/// The chart library plus the page's chart anchors.
pub trait ChartSurface: Send + Sync {
    fn has_anchor(&self, id: ChartId) -> bool;

    fn create(&self, spec: &ChartSpec) -> Box<dyn ChartInstance>;
}
