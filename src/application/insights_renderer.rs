// Insights renderer - maps insight/benchmark/recommendation records to cards
use crate::domain::insight::{InsightRecord, InsightsPayload, TrendTag};
use crate::domain::metrics::format_number;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightSectionKind {
    Insights,
    Benchmarks,
    Recommendations,
    TopConversations,
}

impl InsightSectionKind {
    pub fn title(&self) -> &'static str {
        match self {
            InsightSectionKind::Insights => "Performance Insights",
            InsightSectionKind::Benchmarks => "Benchmarks",
            InsightSectionKind::Recommendations => "Recommendations",
            InsightSectionKind::TopConversations => "Top Conversations",
        }
    }
}

/// Icon and color picked for a trend tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagStyle {
    pub icon: &'static str,
    pub color: &'static str,
}

const NEUTRAL_STYLE: TagStyle = TagStyle {
    icon: "fa-minus-circle",
    color: "gray",
};

const TAG_STYLES: [(TrendTag, TagStyle); 4] = [
    (
        TrendTag::Positive,
        TagStyle {
            icon: "fa-arrow-up",
            color: "green",
        },
    ),
    (
        TrendTag::Negative,
        TagStyle {
            icon: "fa-arrow-down",
            color: "red",
        },
    ),
    (
        TrendTag::Warning,
        TagStyle {
            icon: "fa-exclamation-triangle",
            color: "yellow",
        },
    ),
    (TrendTag::Neutral, NEUTRAL_STYLE),
];

impl TagStyle {
    /// Never fails: anything not in the table renders with the neutral style.
    pub fn for_tag(tag: TrendTag) -> Self {
        TAG_STYLES
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, style)| *style)
            .unwrap_or(NEUTRAL_STYLE)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsightCard {
    pub icon: String,
    pub color: &'static str,
    pub tag: TrendTag,
    pub title: String,
    pub description: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsightSection {
    pub kind: InsightSectionKind,
    pub cards: Vec<InsightCard>,
}

/// Replaces whatever insights were shown before; empty hides the panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsightsView {
    pub sections: Vec<InsightSection>,
}

impl InsightsView {
    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|s| s.cards.is_empty())
    }

    pub fn section(&self, kind: InsightSectionKind) -> Option<&InsightSection> {
        self.sections.iter().find(|s| s.kind == kind)
    }
}

pub struct InsightsRenderer;

impl InsightsRenderer {
    /// Cards keep the input order of each section.
    pub fn render(payload: Option<&InsightsPayload>) -> InsightsView {
        let Some(payload) = payload else {
            return InsightsView::default();
        };

        let sections = [
            (InsightSectionKind::Insights, &payload.insights),
            (InsightSectionKind::Benchmarks, &payload.benchmarks),
            (InsightSectionKind::Recommendations, &payload.recommendations),
            (InsightSectionKind::TopConversations, &payload.top_conversations),
        ]
        .into_iter()
        .filter(|(_, records)| !records.is_empty())
        .map(|(kind, records)| InsightSection {
            kind,
            cards: records.iter().map(Self::card).collect(),
        })
        .collect();

        InsightsView { sections }
    }

    fn card(record: &InsightRecord) -> InsightCard {
        let tag = record.trend();
        let style = TagStyle::for_tag(tag);
        let icon = record
            .icon
            .clone()
            .filter(|i| !i.trim().is_empty())
            .unwrap_or_else(|| style.icon.to_string());

        InsightCard {
            icon,
            color: style.color,
            tag,
            title: record.title.clone(),
            description: record.description.clone(),
            value: record.value.filter(|v| v.is_finite()).map(format_number),
        }
    }
}
