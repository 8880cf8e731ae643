// Chart domain models
use super::lenient;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Stable key of a chart anchor and its owned instance slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChartId(&'static str);

impl ChartId {
    pub const PERFORMANCE_TREND: ChartId = ChartId("performanceTrend");
    pub const CALL_OUTCOMES: ChartId = ChartId("callOutcomes");
    pub const DURATION_DISTRIBUTION: ChartId = ChartId("durationDistribution");
    pub const CALL_SUCCESS_RATE_TREND: ChartId = ChartId("callSuccessRateTrend");

    /// Every chart slot the analytics payload can fill.
    pub const DASHBOARD: [ChartId; 4] = [
        ChartId::PERFORMANCE_TREND,
        ChartId::CALL_SUCCESS_RATE_TREND,
        ChartId::DURATION_DISTRIBUTION,
        ChartId::CALL_OUTCOMES,
    ];

    pub const fn new(id: &'static str) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
    Doughnut,
}

/// Labels and values of one chart; both sequences have the same length.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    #[serde(alias = "data")]
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn new(labels: Vec<String>, values: Vec<f64>) -> Self {
        Self { labels, values }
    }

    pub fn validate(&self) -> Result<(), ChartError> {
        if self.labels.len() != self.values.len() {
            return Err(ChartError::LengthMismatch {
                labels: self.labels.len(),
                values: self.values.len(),
            });
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub title: String,
    pub unit: Option<String>,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
}

impl ChartOptions {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            unit: None,
            y_min: None,
            y_max: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_range(mut self, y_min: f64, y_max: f64) -> Self {
        self.y_min = Some(y_min);
        self.y_max = Some(y_max);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("chart series has {labels} labels but {values} values")]
    LengthMismatch { labels: usize, values: usize },
}

/// `charts` block of the time-based analytics payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartsPayload {
    #[serde(alias = "performance_trend", deserialize_with = "lenient::optional")]
    pub performance_trend: Option<ChartSeries>,
    #[serde(alias = "success_rate_trend", deserialize_with = "lenient::optional")]
    pub success_rate_trend: Option<ChartSeries>,
    #[serde(alias = "duration_distribution", deserialize_with = "lenient::optional")]
    pub duration_distribution: Option<ChartSeries>,
    #[serde(alias = "call_outcomes", deserialize_with = "lenient::optional")]
    pub call_outcomes: Option<ChartSeries>,
}

/// How one payload entry is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartBinding<'a> {
    pub id: ChartId,
    pub kind: ChartKind,
    pub options: ChartOptions,
    pub series: &'a ChartSeries,
}

impl ChartsPayload {
    /// Present series in fixed display order, paired with their chart slot.
    pub fn bindings(&self) -> Vec<ChartBinding<'_>> {
        let entries = [
            (
                ChartId::PERFORMANCE_TREND,
                ChartKind::Line,
                ChartOptions::new("Performance Trend").with_unit("%").with_range(0.0, 100.0),
                self.performance_trend.as_ref(),
            ),
            (
                ChartId::CALL_SUCCESS_RATE_TREND,
                ChartKind::Line,
                ChartOptions::new("Call Success Rate").with_unit("%").with_range(0.0, 100.0),
                self.success_rate_trend.as_ref(),
            ),
            (
                ChartId::DURATION_DISTRIBUTION,
                ChartKind::Bar,
                ChartOptions::new("Duration Distribution").with_unit("calls"),
                self.duration_distribution.as_ref(),
            ),
            (
                ChartId::CALL_OUTCOMES,
                ChartKind::Doughnut,
                ChartOptions::new("Call Outcomes"),
                self.call_outcomes.as_ref(),
            ),
        ];

        entries
            .into_iter()
            .filter_map(|(id, kind, options, series)| {
                series.map(|series| ChartBinding {
                    id,
                    kind,
                    options,
                    series,
                })
            })
            .collect()
    }
}
