// Backend trait for dashboard data access
use crate::domain::agent::SessionInfo;
use crate::domain::conversation::{
    ConversationList, DataAnalysisDetail, Download, ToolsUsedDetail, TranscriptDetail,
};
use crate::domain::dashboard::AnalyticsPayload;
use crate::domain::period::Period;
use async_trait::async_trait;
use thiserror::Error;

/// Why a backend request did not produce a usable payload.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// The session is gone; fatal for the whole dashboard.
    #[error("session is not authenticated")]
    Unauthorized,

    #[error("request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    /// 2xx response whose body carried an `error` field.
    #[error("backend reported an error: {0}")]
    Backend(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, FetchError::Unauthorized)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub agent_id: String,
    pub password: String,
}

#[async_trait]
pub trait AnalyticsBackend: Send + Sync {
    /// Establish a session (`POST /api/login`)
    async fn login(&self, credentials: &Credentials) -> Result<(), FetchError>;

    /// Current session and bound agent (`GET /session`)
    async fn session(&self) -> Result<SessionInfo, FetchError>;

    /// Metrics, chart series and insights for one agent and period
    async fn time_based_analytics(
        &self,
        agent_id: &str,
        period: Period,
    ) -> Result<AnalyticsPayload, FetchError>;

    async fn conversations(&self, agent_id: &str) -> Result<ConversationList, FetchError>;

    async fn transcript(&self, conversation_id: &str) -> Result<TranscriptDetail, FetchError>;

    async fn data_analysis(&self, conversation_id: &str)
    -> Result<DataAnalysisDetail, FetchError>;

    async fn tools_used(&self, conversation_id: &str) -> Result<ToolsUsedDetail, FetchError>;

    async fn export_conversations_csv(&self, agent_id: &str) -> Result<Download, FetchError>;

    async fn conversation_audio(&self, conversation_id: &str) -> Result<Download, FetchError>;

    /// Best-effort session teardown; callers ignore the outcome for control flow
    async fn logout(&self) -> Result<(), FetchError>;
}
