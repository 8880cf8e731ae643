// Conversation service - conversation list, detail modals and downloads
use crate::application::analytics_backend::{AnalyticsBackend, FetchError};
use crate::application::render_target::{Modal, Notice, RenderTarget};
use crate::application::session_signal::SessionSignal;
use crate::domain::conversation::{
    ConversationSummary, DataAnalysisDetail, Download, ToolsUsedDetail, TranscriptDetail,
};
use crate::domain::metrics::format_number;
use std::sync::{Arc, Mutex, MutexGuard};

pub const EMPTY_CONVERSATIONS_MESSAGE: &str =
    "No conversations found for the selected time period.";

/// One rendered conversation entry with its action buttons.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationRow {
    pub id: String,
    pub title: String,
    pub status: String,
    pub date: String,
    pub duration: String,
    pub messages: String,
    pub summary: String,
    pub has_audio: bool,
}

impl From<&ConversationSummary> for ConversationRow {
    fn from(conv: &ConversationSummary) -> Self {
        Self {
            id: conv.id.clone(),
            title: conv.title.clone(),
            status: conv.status.clone(),
            date: conv.date.clone(),
            duration: conv.duration.clone(),
            messages: format!("{} messages", conv.message_count),
            summary: conv.summary.clone(),
            has_audio: conv.has_audio,
        }
    }
}

pub struct ConversationService {
    agent_id: String,
    backend: Arc<dyn AnalyticsBackend>,
    target: Arc<dyn RenderTarget>,
    session: SessionSignal,
    conversations: Mutex<Vec<ConversationSummary>>,
}

impl ConversationService {
    pub fn new(
        agent_id: String,
        backend: Arc<dyn AnalyticsBackend>,
        target: Arc<dyn RenderTarget>,
        session: SessionSignal,
    ) -> Self {
        Self {
            agent_id,
            backend,
            target,
            session,
            conversations: Mutex::new(Vec::new()),
        }
    }

    fn conversations(&self) -> MutexGuard<'_, Vec<ConversationSummary>> {
        self.conversations
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Load and render the conversation list; returns the number of rows.
    pub async fn load_conversations(&self) -> Result<usize, FetchError> {
        let list = match self.backend.conversations(&self.agent_id).await {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!(agent = %self.agent_id, error = %e, "Failed to load conversations");
                if e.is_unauthorized() {
                    self.session.invalidate();
                } else {
                    self.target
                        .render_conversations_failure("Failed to load conversations");
                }
                return Err(e);
            }
        };

        let count = list.conversations.len();
        if count == 0 {
            self.target
                .render_conversations_empty(EMPTY_CONVERSATIONS_MESSAGE);
        } else {
            self.target.clear_conversations();
            for conv in &list.conversations {
                self.target.render_conversation(&ConversationRow::from(conv));
            }
        }

        tracing::debug!(agent = %self.agent_id, count, "Conversations rendered");
        *self.conversations() = list.conversations;
        Ok(count)
    }

    pub async fn show_transcript(&self, conversation_id: &str) -> Result<(), FetchError> {
        let detail = self
            .backend
            .transcript(conversation_id)
            .await
            .map_err(|e| self.report("Failed to load transcript", e))?;
        self.target.show_modal(&transcript_modal(&detail));
        Ok(())
    }

    /// Summary modal from the cached list; no request is made.
    pub fn show_summary(&self, conversation_id: &str) -> bool {
        let conversations = self.conversations();
        let Some(conv) = conversations.iter().find(|c| c.id == conversation_id) else {
            tracing::debug!(conversation = conversation_id, "No cached conversation for summary");
            return false;
        };

        let modal = Modal::new("Brief Summary")
            .field("Date", conv.date.clone())
            .field("Duration", conv.duration.clone())
            .field("Messages", conv.message_count.to_string())
            .field("Status", conv.status.clone())
            .heading(conv.title.clone())
            .paragraph(conv.summary.clone());
        self.target.show_modal(&modal);
        true
    }

    pub async fn show_tools_used(&self, conversation_id: &str) -> Result<(), FetchError> {
        let detail = self
            .backend
            .tools_used(conversation_id)
            .await
            .map_err(|e| self.report("Failed to load tools data", e))?;
        self.target.show_modal(&tools_modal(&detail));
        Ok(())
    }

    pub async fn show_data_analysis(&self, conversation_id: &str) -> Result<(), FetchError> {
        let detail = self
            .backend
            .data_analysis(conversation_id)
            .await
            .map_err(|e| self.report("Failed to load analysis data", e))?;
        self.target.show_modal(&analysis_modal(&detail));
        Ok(())
    }

    pub async fn export_csv(&self) -> Result<Download, FetchError> {
        let download = self
            .backend
            .export_conversations_csv(&self.agent_id)
            .await
            .map_err(|e| self.report("Failed to export CSV", e))?;
        self.target.offer_download(&download);
        self.target
            .notify(&Notice::success("CSV export completed successfully"));
        tracing::info!(file = %download.filename, bytes = download.content.len(), "CSV exported");
        Ok(download)
    }

    pub async fn download_audio(&self, conversation_id: &str) -> Result<Download, FetchError> {
        let download = self
            .backend
            .conversation_audio(conversation_id)
            .await
            .map_err(|e| self.report("Audio not available", e))?;
        self.target.offer_download(&download);
        Ok(download)
    }

    fn report(&self, what: &str, error: FetchError) -> FetchError {
        tracing::warn!(error = %error, "{}", what);
        if error.is_unauthorized() {
            self.session.invalidate();
        } else {
            self.target.notify(&Notice::error(what));
        }
        error
    }
}

fn transcript_modal(detail: &TranscriptDetail) -> Modal {
    let mut modal = Modal::new("Conversation Transcript")
        .field("Conversation ID", detail.conversation_id.clone())
        .field("Messages", detail.message_count.to_string())
        .field("Duration", detail.duration.clone())
        .heading("Full Transcript:");
    for turn in detail.transcript.split("\n\n").filter(|t| !t.trim().is_empty()) {
        modal = modal.paragraph(turn.trim());
    }
    modal
}

fn tools_modal(detail: &ToolsUsedDetail) -> Modal {
    let mut modal = Modal::new("Tools Used")
        .field("Conversation ID", detail.conversation_id.clone())
        .field("Status", detail.status.clone())
        .heading("Tools Used:");
    if detail.tools_used.is_empty() {
        return modal
            .paragraph("No tools were used in this conversation.")
            .paragraph("Tools usage data will appear here when available.");
    }
    for tool in &detail.tools_used {
        let mut text = tool.name.clone();
        if !tool.description.is_empty() {
            text.push_str(&format!(": {}", tool.description));
        }
        if !tool.result.is_empty() {
            text.push_str(&format!(" (result: {})", tool.result));
        }
        modal = modal.paragraph(text);
    }
    modal
}

fn analysis_modal(detail: &DataAnalysisDetail) -> Modal {
    let mut modal = Modal::new("Data Analysis")
        .field("Conversation ID", detail.conversation_id.clone())
        .field("Status", detail.status.clone())
        .field("Messages", detail.message_count.to_string())
        .field("Duration", detail.duration.clone())
        .field("Date", detail.date.clone());
    if let Some(score) = detail.evaluation_score {
        modal = modal.field("Evaluation Score", format!("{}%", format_number(score)));
    }
    modal = modal.heading("Analysis Results:");
    if !detail.transcript_summary.is_empty() {
        modal = modal.paragraph(detail.transcript_summary.clone());
    }
    for (key, result) in &detail.data_collection_results {
        let value = match &result.value {
            serde_json::Value::Null => "No value provided".to_string(),
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        modal = modal.paragraph(format!("{}: {} ({})", key, value, result.rationale));
    }
    modal
}
