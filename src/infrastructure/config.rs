use crate::application::dashboard_shell::ShellSettings;
use crate::domain::period::Period;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

const DEFAULT_CONFIG_FILE: &str = "config/dashboard";
const ENV_PREFIX: &str = "AGENT_DASHBOARD";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for '{field}': {message}")]
    Validation { field: String, message: String },
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub backend: BackendSettings,
    pub dashboard: DashboardSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    pub timeout_secs: u64,
    pub session_path: String,
    pub login_path: String,
    pub logout_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    pub default_period: String,
    pub login_redirect: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: {}", s)),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
    pub format: LogFormat,
}

impl DashboardConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.base_url.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "backend.base_url".to_string(),
                message: "URL cannot be empty".to_string(),
            });
        }
        if self.backend.timeout_secs == 0 {
            return Err(ConfigError::Validation {
                field: "backend.timeout_secs".to_string(),
                message: "timeout must be non-zero".to_string(),
            });
        }
        if let Err(e) = self.dashboard.default_period.parse::<Period>() {
            return Err(ConfigError::Validation {
                field: "dashboard.default_period".to_string(),
                message: e.to_string(),
            });
        }
        Ok(())
    }

    pub fn shell_settings(&self) -> Result<ShellSettings, ConfigError> {
        let default_period =
            self.dashboard
                .default_period
                .parse::<Period>()
                .map_err(|e| ConfigError::Validation {
                    field: "dashboard.default_period".to_string(),
                    message: e.to_string(),
                })?;
        Ok(ShellSettings {
            default_period,
            login_location: self.dashboard.login_redirect.clone(),
        })
    }
}

/// Defaults, then `config/dashboard.*` (or `path`), then `AGENT_DASHBOARD__*` variables.
pub fn load_dashboard_config(path: Option<&Path>) -> anyhow::Result<DashboardConfig> {
    build_config(path, None)
}

fn build_config(
    path: Option<&Path>,
    env: Option<HashMap<String, String>>,
) -> anyhow::Result<DashboardConfig> {
    let file = match path {
        Some(p) => config::File::from(p).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let settings = config::Config::builder()
        .set_default("backend.base_url", "http://localhost:5000")?
        .set_default("backend.timeout_secs", 10)?
        .set_default("backend.session_path", "/session")?
        .set_default("backend.login_path", "/api/login")?
        .set_default("backend.logout_path", "/api/logout")?
        .set_default("dashboard.default_period", Period::Today.query_value())?
        .set_default("dashboard.login_redirect", "/login")?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "pretty")?
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .source(env),
        )
        .build()?;

    let config: DashboardConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}
