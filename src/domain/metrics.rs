// Metrics domain models
use super::lenient;
use serde::Deserialize;

/// Average duration as delivered by the backend: either preformatted
/// (`"2m 30s"`) or a number of seconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(f64),
    Text(String),
}

/// Delta against the previous period, one per metric.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetricChanges {
    #[serde(alias = "total_calls", deserialize_with = "lenient::optional")]
    pub total_calls: Option<f64>,
    #[serde(alias = "success_rate", deserialize_with = "lenient::optional")]
    pub success_rate: Option<f64>,
    #[serde(alias = "avg_duration", deserialize_with = "lenient::optional")]
    pub avg_duration: Option<f64>,
    #[serde(alias = "evaluation_score", deserialize_with = "lenient::optional")]
    pub evaluation_score: Option<f64>,
    #[serde(alias = "positive_sentiment", deserialize_with = "lenient::optional")]
    pub positive_sentiment: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetricsSnapshot {
    #[serde(alias = "total_calls", deserialize_with = "lenient::optional")]
    pub total_calls: Option<u64>,
    #[serde(alias = "success_rate", deserialize_with = "lenient::optional")]
    pub success_rate: Option<f64>,
    #[serde(alias = "avg_duration", deserialize_with = "lenient::optional")]
    pub avg_duration: Option<DurationValue>,
    #[serde(alias = "evaluation_score", deserialize_with = "lenient::optional")]
    pub evaluation_score: Option<f64>,
    #[serde(alias = "positive_sentiment", deserialize_with = "lenient::optional")]
    pub positive_sentiment: Option<f64>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub changes: MetricChanges,
}

/// Formats whole seconds as `"<m>m <s>s"`.
pub fn format_duration(total_secs: u64) -> String {
    format!("{}m {}s", total_secs / 60, total_secs % 60)
}

/// Formats a number with at most one decimal, dropping a trailing `.0`.
pub fn format_number(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{:.1}", rounded)
    }
}
