// Insight, benchmark and recommendation display records
use super::lenient;
use serde::Deserialize;

/// Qualitative trend tag attached to every display record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrendTag {
    Positive,
    Negative,
    Neutral,
    Warning,
}

impl TrendTag {
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "positive" | "success" | "up" => Some(TrendTag::Positive),
            "negative" | "danger" | "down" => Some(TrendTag::Negative),
            "warning" => Some(TrendTag::Warning),
            "neutral" => Some(TrendTag::Neutral),
            _ => None,
        }
    }

    /// Unrecognized or missing tags fall back to `Neutral`.
    pub fn from_label(label: Option<&str>) -> Self {
        label.and_then(Self::parse).unwrap_or(TrendTag::Neutral)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct InsightRecord {
    #[serde(deserialize_with = "lenient::optional")]
    pub icon: Option<String>,
    pub title: String,
    pub description: String,
    pub tag: Option<String>,
    #[serde(rename = "trend")]
    pub trend_label: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub value: Option<f64>,
}

impl InsightRecord {
    /// First recognized label among `tag`, `trend`, `type`, `status`.
    pub fn trend(&self) -> TrendTag {
        [&self.tag, &self.trend_label, &self.kind, &self.status]
            .into_iter()
            .find_map(|label| label.as_deref().and_then(TrendTag::parse))
            .unwrap_or(TrendTag::Neutral)
    }
}

/// `insights` block of the time-based analytics payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsightsPayload {
    #[serde(deserialize_with = "lenient::entries")]
    pub insights: Vec<InsightRecord>,
    #[serde(deserialize_with = "lenient::entries")]
    pub benchmarks: Vec<InsightRecord>,
    #[serde(deserialize_with = "lenient::entries")]
    pub recommendations: Vec<InsightRecord>,
    #[serde(alias = "top_conversations", deserialize_with = "lenient::entries")]
    pub top_conversations: Vec<InsightRecord>,
}
