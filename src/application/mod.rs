// Application layer - Renderers, chart lifecycle and the period state machine
pub mod analytics_backend;
pub mod chart_registry;
pub mod conversation_service;
pub mod dashboard_shell;
pub mod insights_renderer;
pub mod metrics_renderer;
pub mod period_controller;
pub mod render_target;
pub mod session_signal;
