// Console presentation - text rendering of the dashboard for the CLI
use crate::application::chart_registry::ChartSpec;
use crate::application::conversation_service::ConversationRow;
use crate::application::insights_renderer::InsightsView;
use crate::application::metrics_renderer::MetricsView;
use crate::application::render_target::{
    ChartInstance, ChartSurface, LoadFailure, Modal, Notice, NoticeLevel, RenderTarget,
};
use crate::domain::agent::Agent;
use crate::domain::chart::{ChartId, ChartKind};
use crate::domain::conversation::Download;
use crate::domain::metrics::format_number;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

const BAR_WIDTH: usize = 30;

/// Writer shared by the render target and the chart surface.
pub struct Console<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> Console<W> {
    pub fn new(out: W) -> Arc<Self> {
        Arc::new(Self {
            out: Mutex::new(out),
        })
    }

    pub fn writer(&self) -> MutexGuard<'_, W> {
        self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn line(&self, text: &str) {
        // A closed stdout is not worth failing a render over.
        if let Err(e) = writeln!(self.writer(), "{}", text) {
            tracing::debug!(error = %e, "Console write failed");
        }
    }
}

pub struct ConsoleRenderTarget<W> {
    console: Arc<Console<W>>,
}

impl<W: Write + Send> ConsoleRenderTarget<W> {
    pub fn new(console: Arc<Console<W>>) -> Self {
        Self { console }
    }
}

impl<W: Write + Send> RenderTarget for ConsoleRenderTarget<W> {
    fn bind_agent(&self, agent: &Agent) {
        self.console.line(&format!("== {} ==", agent.dashboard_title()));
        self.console
            .line(&format!("{} | {}", agent.agent_type, agent.description));
    }

    fn set_loading(&self, loading: bool) {
        if loading {
            self.console.line("Loading analytics...");
        }
    }

    fn render_metrics(&self, view: &MetricsView) {
        self.console.line(&format!("-- Metrics ({}) --", view.period));
        for card in &view.cards {
            let mut text = format!("{:<20}{:>10}", card.slot.title(), card.value);
            if !card.change.text.is_empty() {
                text.push_str(&format!("  ({})", card.change.text));
            }
            self.console.line(&text);
        }
    }

    fn render_insights(&self, view: &InsightsView) {
        for section in &view.sections {
            self.console.line(&format!("-- {} --", section.kind.title()));
            for card in &section.cards {
                let mut text = format!("[{}] {}", card.color, card.title);
                if let Some(value) = &card.value {
                    text.push_str(&format!(" ({})", value));
                }
                self.console.line(&text);
                if !card.description.is_empty() {
                    self.console.line(&format!("    {}", card.description));
                }
            }
        }
    }

    fn render_load_failure(&self, failure: &LoadFailure) {
        self.console.line(&format!(
            "{} (retry with --period {})",
            failure.message,
            failure.period.query_value()
        ));
    }

    fn clear_conversations(&self) {
        self.console.line("-- Conversations --");
    }

    fn render_conversation(&self, row: &ConversationRow) {
        let audio = if row.has_audio { " [audio]" } else { "" };
        self.console.line(&format!(
            "{}  {}  {}  {}  {}  {}{}",
            row.id, row.date, row.status, row.duration, row.messages, row.title, audio
        ));
        if !row.summary.is_empty() {
            self.console.line(&format!("    {}", row.summary));
        }
    }

    fn render_conversations_empty(&self, message: &str) {
        self.console.line("-- Conversations --");
        self.console.line(message);
    }

    fn render_conversations_failure(&self, message: &str) {
        self.console.line(&format!("Conversations: {}", message));
    }

    fn show_modal(&self, modal: &Modal) {
        self.console.line(&format!("== {} ==", modal.title));
        for (label, value) in &modal.fields {
            self.console.line(&format!("{}: {}", label, value));
        }
        if !modal.heading.is_empty() {
            self.console.line("");
            self.console.line(&modal.heading);
        }
        for paragraph in &modal.paragraphs {
            self.console.line(paragraph);
        }
    }

    fn offer_download(&self, download: &Download) {
        self.console.line(&format!(
            "Download ready: {} ({}, {} bytes)",
            download.filename,
            download.content_type,
            download.content.len()
        ));
    }

    fn notify(&self, notice: &Notice) {
        let prefix = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "ok",
            NoticeLevel::Error => "error",
        };
        self.console.line(&format!("[{}] {}", prefix, notice.message));
    }

    fn redirect(&self, location: &str) {
        self.console
            .line(&format!("Not signed in. Continue at {}", location));
    }
}

/// Draws charts as text bars. Every dashboard anchor exists.
pub struct ConsoleChartSurface<W> {
    console: Arc<Console<W>>,
    live: Arc<AtomicUsize>,
}

impl<W: Write + Send> ConsoleChartSurface<W> {
    pub fn new(console: Arc<Console<W>>) -> Self {
        Self {
            console,
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Charts drawn and not yet destroyed.
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

struct ConsoleChart {
    id: ChartId,
    live: Arc<AtomicUsize>,
    destroyed: bool,
}

impl ChartInstance for ConsoleChart {
    fn destroy(&mut self) {
        if !self.destroyed {
            self.destroyed = true;
            self.live.fetch_sub(1, Ordering::SeqCst);
            tracing::trace!(chart = %self.id, "Console chart destroyed");
        }
    }
}

impl<W: Write + Send> ChartSurface for ConsoleChartSurface<W> {
    fn has_anchor(&self, id: ChartId) -> bool {
        ChartId::DASHBOARD.contains(&id)
    }

    fn create(&self, spec: &ChartSpec) -> Box<dyn ChartInstance> {
        for line in chart_lines(spec) {
            self.console.line(&line);
        }
        self.live.fetch_add(1, Ordering::SeqCst);
        Box::new(ConsoleChart {
            id: spec.id,
            live: self.live.clone(),
            destroyed: false,
        })
    }
}

fn chart_lines(spec: &ChartSpec) -> Vec<String> {
    let mut lines = vec![format!("-- {} --", spec.options.title)];
    if spec.series.is_empty() {
        lines.push("(no data)".to_string());
        return lines;
    }

    let unit = spec.options.unit.as_deref().unwrap_or("");
    let total: f64 = spec.series.values.iter().filter(|v| v.is_finite()).sum();
    let max = spec
        .options
        .y_max
        .unwrap_or_else(|| spec.series.values.iter().cloned().fold(0.0, f64::max));
    let width = spec.series.labels.iter().map(|l| l.len()).max().unwrap_or(0);

    for (label, value) in spec.series.labels.iter().zip(&spec.series.values) {
        let suffix = match spec.kind {
            ChartKind::Doughnut if total > 0.0 => {
                format!("{} ({}%)", format_number(*value), format_number(value / total * 100.0))
            }
            _ => format!("{}{}", format_number(*value), unit),
        };
        lines.push(format!(
            "{:<width$} | {} {}",
            label,
            bar(*value, max),
            suffix,
            width = width
        ));
    }
    lines
}

fn bar(value: f64, max: f64) -> String {
    if !value.is_finite() || !max.is_finite() || max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let filled = ((value / max).min(1.0) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(filled)
}
