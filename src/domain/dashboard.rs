// Time-based analytics payload
use super::chart::ChartsPayload;
use super::insight::InsightsPayload;
use super::lenient;
use super::metrics::MetricsSnapshot;
use serde::Deserialize;

/// Body of `GET /analytics/{agentId}/time-based?period=<period>`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalyticsPayload {
    #[serde(deserialize_with = "lenient::or_default")]
    pub metrics: MetricsSnapshot,
    #[serde(deserialize_with = "lenient::or_default")]
    pub charts: ChartsPayload,
    #[serde(deserialize_with = "lenient::optional")]
    pub insights: Option<InsightsPayload>,
}

impl AnalyticsPayload {
    pub fn new(
        metrics: MetricsSnapshot,
        charts: ChartsPayload,
        insights: Option<InsightsPayload>,
    ) -> Self {
        Self {
            metrics,
            charts,
            insights,
        }
    }
}
