// Period domain model - the time window a dashboard view covers
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown period '{0}' (expected today, last7days or last30days)")]
pub struct PeriodError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Today,
    Last7Days,
    Last30Days,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::Today, Period::Last7Days, Period::Last30Days];

    /// Value sent as the `period` query parameter.
    pub fn query_value(&self) -> &'static str {
        match self {
            Period::Today => "today",
            Period::Last7Days => "last7days",
            Period::Last30Days => "last30days",
        }
    }

    /// Label shown on the period selector.
    pub fn label(&self) -> &'static str {
        match self {
            Period::Today => "Today",
            Period::Last7Days => "Last 7 Days",
            Period::Last30Days => "Last 30 Days",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Period {
    type Err = PeriodError;

    /// Accepts either the query value or the display label, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Period::ALL
            .into_iter()
            .find(|p| {
                p.query_value().eq_ignore_ascii_case(needle) || p.label().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| PeriodError(s.to_string()))
    }
}
