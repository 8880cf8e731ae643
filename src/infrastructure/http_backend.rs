// HTTP backend implementation
use crate::application::analytics_backend::{AnalyticsBackend, Credentials, FetchError};
use crate::domain::agent::SessionInfo;
use crate::domain::conversation::{
    ConversationList, DataAnalysisDetail, Download, ToolsUsedDetail, TranscriptDetail,
};
use crate::domain::dashboard::AnalyticsPayload;
use crate::domain::period::Period;
use crate::infrastructure::config::BackendSettings;
use async_trait::async_trait;
use reqwest::{Response, StatusCode, header};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    session_path: String,
    login_path: String,
    logout_path: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: String,
}

impl HttpBackend {
    pub fn new(settings: &BackendSettings) -> Result<Self, reqwest::Error> {
        // The session lives in a cookie set by the login endpoint.
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            session_path: settings.session_path.clone(),
            login_path: settings.login_path.clone(),
            logout_path: settings.logout_path.clone(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = self.url(path);
        tracing::debug!(url = %url, "GET");

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport_error)?;

        let response = check_status(response).await?;
        let text = response.text().await.map_err(transport_error)?;
        decode_body(&text)
    }

    async fn get_download(
        &self,
        path: &str,
        fallback_name: String,
        fallback_type: &str,
    ) -> Result<Download, FetchError> {
        let url = self.url(path);
        tracing::debug!(url = %url, "GET download");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response).await?;

        let filename = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(attachment_filename)
            .unwrap_or(fallback_name);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(fallback_type)
            .to_string();

        let content = response.bytes().await.map_err(transport_error)?;
        Ok(Download::new(filename, &content_type, content))
    }
}

fn transport_error(e: reqwest::Error) -> FetchError {
    if e.is_decode() {
        FetchError::Decode(e.to_string())
    } else {
        FetchError::Network(e.to_string())
    }
}

/// Map 401 and other non-2xx statuses onto the error taxonomy.
async fn check_status(response: Response) -> Result<Response, FetchError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(FetchError::Unauthorized);
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = error_field(&body).unwrap_or(body);
        return Err(FetchError::Status {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response)
}

fn error_field(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("error").and_then(|e| match e {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    })
}

/// A 2xx body with an `error` field is still a failure.
fn decode_body<T: DeserializeOwned>(text: &str) -> Result<T, FetchError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| FetchError::Decode(e.to_string()))?;
    if let Some(message) = error_field(text) {
        return Err(FetchError::Backend(message));
    }
    serde_json::from_value(value).map_err(|e| FetchError::Decode(e.to_string()))
}

/// `attachment; filename="report.csv"` -> `report.csv`
fn attachment_filename(disposition: &str) -> Option<String> {
    disposition
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}

fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[async_trait]
impl AnalyticsBackend for HttpBackend {
    async fn login(&self, credentials: &Credentials) -> Result<(), FetchError> {
        let url = self.url(&self.login_path);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "agent_id": credentials.agent_id,
                "password": credentials.password,
            }))
            .send()
            .await
            .map_err(transport_error)?;

        let response = check_status(response).await?;
        let body: LoginResponse = response.json().await.map_err(transport_error)?;
        if !body.success {
            return Err(FetchError::Backend(body.message));
        }
        tracing::info!(agent = %credentials.agent_id, "Logged in");
        Ok(())
    }

    async fn session(&self) -> Result<SessionInfo, FetchError> {
        match self.get_json::<SessionInfo>(&self.session_path).await {
            Err(FetchError::Unauthorized) => Ok(SessionInfo::default()),
            other => other,
        }
    }

    async fn time_based_analytics(
        &self,
        agent_id: &str,
        period: Period,
    ) -> Result<AnalyticsPayload, FetchError> {
        let path = format!(
            "/analytics/{}/time-based?period={}",
            segment(agent_id),
            period.query_value()
        );
        self.get_json(&path).await
    }

    async fn conversations(&self, agent_id: &str) -> Result<ConversationList, FetchError> {
        self.get_json(&format!("/conversations/{}", segment(agent_id)))
            .await
    }

    async fn transcript(&self, conversation_id: &str) -> Result<TranscriptDetail, FetchError> {
        self.get_json(&format!("/conversation-transcript/{}", segment(conversation_id)))
            .await
    }

    async fn data_analysis(
        &self,
        conversation_id: &str,
    ) -> Result<DataAnalysisDetail, FetchError> {
        self.get_json(&format!(
            "/conversation-data-analysis/{}",
            segment(conversation_id)
        ))
        .await
    }

    async fn tools_used(&self, conversation_id: &str) -> Result<ToolsUsedDetail, FetchError> {
        self.get_json(&format!("/conversation-tools-used/{}", segment(conversation_id)))
            .await
    }

    async fn export_conversations_csv(&self, agent_id: &str) -> Result<Download, FetchError> {
        let fallback = format!(
            "conversations_{}_{}.csv",
            agent_id,
            chrono::Local::now().format("%Y-%m-%d")
        );
        self.get_download(
            &format!("/conversations/{}/export", segment(agent_id)),
            fallback,
            "text/csv",
        )
        .await
    }

    async fn conversation_audio(&self, conversation_id: &str) -> Result<Download, FetchError> {
        self.get_download(
            &format!("/conversation-audio/{}/download", segment(conversation_id)),
            format!("conversation_{}_audio.mp3", conversation_id),
            "audio/mpeg",
        )
        .await
    }

    async fn logout(&self) -> Result<(), FetchError> {
        let url = self.url(&self.logout_path);
        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response).await?;
        Ok(())
    }
}
