// Metrics renderer - maps a metrics snapshot onto the metric card slots
use crate::domain::metrics::{DurationValue, MetricsSnapshot, format_duration, format_number};
use crate::domain::period::Period;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricSlot {
    TotalCalls,
    SuccessRate,
    AvgDuration,
    EvaluationScore,
    PositiveSentiment,
}

impl MetricSlot {
    pub const ALL: [MetricSlot; 5] = [
        MetricSlot::TotalCalls,
        MetricSlot::SuccessRate,
        MetricSlot::AvgDuration,
        MetricSlot::EvaluationScore,
        MetricSlot::PositiveSentiment,
    ];

    /// Id of the bound card element.
    pub fn element_id(&self) -> &'static str {
        match self {
            MetricSlot::TotalCalls => "total-calls",
            MetricSlot::SuccessRate => "success-rate",
            MetricSlot::AvgDuration => "avg-duration",
            MetricSlot::EvaluationScore => "evaluation-score",
            MetricSlot::PositiveSentiment => "positive-sentiment",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            MetricSlot::TotalCalls => "Total Calls",
            MetricSlot::SuccessRate => "Success Rate",
            MetricSlot::AvgDuration => "Avg Duration",
            MetricSlot::EvaluationScore => "Evaluation Score",
            MetricSlot::PositiveSentiment => "Positive Sentiment",
        }
    }
}

/// Tri-state classification of a change value; zero is its own class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeClass {
    Positive,
    Negative,
    Neutral,
}

impl ChangeClass {
    pub fn classify(change: Option<f64>) -> Self {
        match change {
            Some(c) if c > 0.0 => ChangeClass::Positive,
            Some(c) if c < 0.0 => ChangeClass::Negative,
            _ => ChangeClass::Neutral,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            ChangeClass::Positive => "change-positive",
            ChangeClass::Negative => "change-negative",
            ChangeClass::Neutral => "change-neutral",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChangeIndicator {
    pub text: String,
    pub class: ChangeClass,
}

impl ChangeIndicator {
    pub fn from_change(change: Option<f64>) -> Self {
        // NaN is not a usable delta; classify what will be displayed
        let change = change
            .filter(|c| c.is_finite())
            .map(|c| (c * 10.0).round() / 10.0);
        let class = ChangeClass::classify(change);
        let text = match (change, class) {
            (None, _) => String::new(),
            (Some(c), ChangeClass::Positive) => format!("+{}%", format_number(c)),
            (Some(c), ChangeClass::Negative) => format!("-{}%", format_number(c.abs())),
            (Some(_), ChangeClass::Neutral) => "0%".to_string(),
        };
        Self { text, class }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricCard {
    pub slot: MetricSlot,
    pub value: String,
    pub change: ChangeIndicator,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricsView {
    pub period: Period,
    pub cards: Vec<MetricCard>,
}

impl MetricsView {
    pub fn card(&self, slot: MetricSlot) -> Option<&MetricCard> {
        self.cards.iter().find(|c| c.slot == slot)
    }

    pub fn value(&self, slot: MetricSlot) -> Option<&str> {
        self.card(slot).map(|c| c.value.as_str())
    }
}

pub struct MetricsRenderer;

impl MetricsRenderer {
    /// One card per slot, with deterministic defaults for missing fields.
    pub fn render(period: Period, metrics: &MetricsSnapshot) -> MetricsView {
        let cards = MetricSlot::ALL
            .into_iter()
            .map(|slot| {
                let (value, change) = match slot {
                    MetricSlot::TotalCalls => (
                        metrics.total_calls.unwrap_or(0).to_string(),
                        metrics.changes.total_calls,
                    ),
                    MetricSlot::SuccessRate => {
                        (percent(metrics.success_rate), metrics.changes.success_rate)
                    }
                    MetricSlot::AvgDuration => (
                        duration(metrics.avg_duration.as_ref()),
                        metrics.changes.avg_duration,
                    ),
                    MetricSlot::EvaluationScore => (
                        percent(metrics.evaluation_score),
                        metrics.changes.evaluation_score,
                    ),
                    MetricSlot::PositiveSentiment => (
                        percent(metrics.positive_sentiment),
                        metrics.changes.positive_sentiment,
                    ),
                };
                MetricCard {
                    slot,
                    value,
                    change: ChangeIndicator::from_change(change),
                }
            })
            .collect();

        MetricsView { period, cards }
    }
}

fn percent(value: Option<f64>) -> String {
    let value = value.filter(|v| v.is_finite()).unwrap_or(0.0);
    format!("{}%", format_number(value))
}

fn duration(value: Option<&DurationValue>) -> String {
    match value {
        Some(DurationValue::Text(text)) if !text.trim().is_empty() => text.clone(),
        Some(DurationValue::Seconds(secs)) if secs.is_finite() && *secs > 0.0 => {
            format_duration(secs.round() as u64)
        }
        _ => format_duration(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::MetricChanges;

    #[test]
    fn test_missing_fields_default_fill() {
        let view = MetricsRenderer::render(Period::Today, &MetricsSnapshot::default());

        assert_eq!(view.value(MetricSlot::TotalCalls), Some("0"));
        assert_eq!(view.value(MetricSlot::SuccessRate), Some("0%"));
        assert_eq!(view.value(MetricSlot::AvgDuration), Some("0m 0s"));
        assert_eq!(view.value(MetricSlot::EvaluationScore), Some("0%"));
        assert_eq!(view.value(MetricSlot::PositiveSentiment), Some("0%"));
        assert_eq!(view.cards.len(), MetricSlot::ALL.len());
    }

    #[test]
    fn test_formats_present_fields() {
        let metrics = MetricsSnapshot {
            total_calls: Some(128),
            success_rate: Some(92.25),
            avg_duration: Some(DurationValue::Seconds(185.0)),
            evaluation_score: Some(88.0),
            positive_sentiment: None,
            changes: MetricChanges::default(),
        };
        let view = MetricsRenderer::render(Period::Last7Days, &metrics);

        assert_eq!(view.period, Period::Last7Days);
        assert_eq!(view.value(MetricSlot::TotalCalls), Some("128"));
        assert_eq!(view.value(MetricSlot::SuccessRate), Some("92.3%"));
        assert_eq!(view.value(MetricSlot::AvgDuration), Some("3m 5s"));
        assert_eq!(view.value(MetricSlot::EvaluationScore), Some("88%"));
    }

    #[test]
    fn test_preformatted_duration_passes_through() {
        let metrics = MetricsSnapshot {
            avg_duration: Some(DurationValue::Text("4m 10s".to_string())),
            ..MetricsSnapshot::default()
        };
        let view = MetricsRenderer::render(Period::Today, &metrics);
        assert_eq!(view.value(MetricSlot::AvgDuration), Some("4m 10s"));
    }

    #[test]
    fn test_zero_change_is_neutral_not_positive() {
        let zero = ChangeIndicator::from_change(Some(0.0));
        assert_eq!(zero.class, ChangeClass::Neutral);
        assert_eq!(zero.text, "0%");

        let negative_zero = ChangeIndicator::from_change(Some(-0.0));
        assert_eq!(negative_zero.class, ChangeClass::Neutral);
    }

    #[test]
    fn test_change_sign_and_class() {
        let up = ChangeIndicator::from_change(Some(12.5));
        assert_eq!(up.text, "+12.5%");
        assert_eq!(up.class.css_class(), "change-positive");

        let down = ChangeIndicator::from_change(Some(-4.0));
        assert_eq!(down.text, "-4%");
        assert_eq!(down.class.css_class(), "change-negative");

        let missing = ChangeIndicator::from_change(None);
        assert_eq!(missing.text, "");
        assert_eq!(missing.class, ChangeClass::Neutral);

        let nan = ChangeIndicator::from_change(Some(f64::NAN));
        assert_eq!(nan.class, ChangeClass::Neutral);
    }

    #[test]
    fn test_changes_bound_to_their_cards() {
        let metrics = MetricsSnapshot {
            changes: MetricChanges {
                total_calls: Some(3.0),
                success_rate: Some(-1.5),
                ..MetricChanges::default()
            },
            ..MetricsSnapshot::default()
        };
        let view = MetricsRenderer::render(Period::Today, &metrics);

        let calls = view.card(MetricSlot::TotalCalls).unwrap();
        assert_eq!(calls.change.class, ChangeClass::Positive);
        let success = view.card(MetricSlot::SuccessRate).unwrap();
        assert_eq!(success.change.class, ChangeClass::Negative);
        let score = view.card(MetricSlot::EvaluationScore).unwrap();
        assert_eq!(score.change.class, ChangeClass::Neutral);
    }

    #[test]
    fn test_change_that_rounds_to_zero_is_neutral() {
        for change in [0.04, -0.04, -0.0] {
            let indicator = ChangeIndicator::from_change(Some(change));
            assert_eq!(indicator.text, "0%");
            assert_eq!(indicator.class, ChangeClass::Neutral);
        }

        let small = ChangeIndicator::from_change(Some(0.05));
        assert_eq!(small.text, "+0.1%");
        assert_eq!(small.class, ChangeClass::Positive);
    }
}
