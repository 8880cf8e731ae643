//! Agent analytics dashboard.
//!
//! Loads time-windowed analytics for a signed-in conversational agent and
//! renders metric cards, charts, insights and the conversation list through
//! pluggable render targets. Responses that arrive after the user has moved
//! to another period are never drawn.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
