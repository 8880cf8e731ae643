// Agent domain model
use serde::Deserialize;

const DEFAULT_AGENT_TYPE: &str = "AI Agent";
const DEFAULT_AGENT_DESCRIPTION: &str = "Conversational AI agent";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub agent_type: String,
    pub description: String,
}

impl Agent {
    pub fn new(id: String) -> Self {
        let name = Self::fallback_name(&id);
        Self {
            id,
            name,
            agent_type: DEFAULT_AGENT_TYPE.to_string(),
            description: DEFAULT_AGENT_DESCRIPTION.to_string(),
        }
    }

    fn fallback_name(id: &str) -> String {
        // "agent_01jx9k2mabcdefgh" -> "Agent abcdefgh"
        let tail_start = id
            .char_indices()
            .rev()
            .nth(7)
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        format!("Agent {}", &id[tail_start..])
    }

    pub fn dashboard_title(&self) -> String {
        format!("{} Analytics Dashboard", self.name)
    }
}

/// Body of `GET /session`.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default, alias = "agent_id")]
    pub agent_id: Option<String>,
    #[serde(default, alias = "agent_name")]
    pub agent_name: Option<String>,
    #[serde(default, alias = "agent_type")]
    pub agent_type: Option<String>,
    #[serde(default, alias = "agent_description")]
    pub agent_description: Option<String>,
}

impl SessionInfo {
    /// The bound agent, or `None` when the session is not usable.
    pub fn into_agent(self) -> Option<Agent> {
        if !self.authenticated {
            return None;
        }
        let id = self.agent_id.filter(|id| !id.trim().is_empty())?;
        let mut agent = Agent::new(id);
        if let Some(name) = self.agent_name.filter(|s| !s.is_empty()) {
            agent.name = name;
        }
        if let Some(agent_type) = self.agent_type.filter(|s| !s.is_empty()) {
            agent.agent_type = agent_type;
        }
        if let Some(description) = self.agent_description.filter(|s| !s.is_empty()) {
            agent.description = description;
        }
        Some(agent)
    }
}
