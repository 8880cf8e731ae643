// Domain layer - Data model of the agent dashboard
pub mod agent;
pub mod chart;
pub mod conversation;
pub mod dashboard;
pub mod insight;
pub mod lenient;
pub mod metrics;
pub mod period;
