// Conversation list and per-conversation detail payloads
use bytes::Bytes;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConversationSummary {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub status: String,
    pub duration: String,
    pub date: String,
    #[serde(alias = "message_count")]
    pub message_count: u64,
    #[serde(alias = "has_audio")]
    pub has_audio: bool,
}

/// Body of `GET /conversations/{agentId}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConversationList {
    pub conversations: Vec<ConversationSummary>,
}

/// Body of `GET /conversation-transcript/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranscriptDetail {
    #[serde(alias = "conversation_id")]
    pub conversation_id: String,
    pub transcript: String,
    #[serde(alias = "message_count", alias = "messages")]
    pub message_count: u64,
    pub duration: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ToolUse {
    pub name: String,
    pub description: String,
    pub result: String,
}

/// Body of `GET /conversation-tools-used/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolsUsedDetail {
    #[serde(alias = "conversation_id")]
    pub conversation_id: String,
    pub title: String,
    pub status: String,
    #[serde(alias = "tools_used")]
    pub tools_used: Vec<ToolUse>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataCollectionResult {
    #[serde(alias = "data_collection_id")]
    pub data_collection_id: String,
    pub rationale: String,
    pub value: serde_json::Value,
}

/// Body of `GET /conversation-data-analysis/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataAnalysisDetail {
    #[serde(alias = "conversation_id")]
    pub conversation_id: String,
    pub title: String,
    pub duration: String,
    pub date: String,
    pub status: String,
    #[serde(alias = "message_count")]
    pub message_count: u64,
    #[serde(alias = "evaluation_score")]
    pub evaluation_score: Option<f64>,
    #[serde(alias = "transcript_summary")]
    pub transcript_summary: String,
    #[serde(alias = "data_collection_results")]
    pub data_collection_results: BTreeMap<String, DataCollectionResult>,
}

/// A file handed to the user (CSV export, call audio).
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    pub filename: String,
    pub content_type: String,
    pub content: Bytes,
}

impl Download {
    pub fn new(filename: String, content_type: &str, content: Bytes) -> Self {
        Self {
            filename,
            content_type: content_type.to_string(),
            content,
        }
    }
}
