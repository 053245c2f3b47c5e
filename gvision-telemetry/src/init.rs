//! Telemetry initialization and configuration

use std::sync::OnceLock;

use tracing_subscriber::{
    EnvFilter,
    filter::{Directive, ParseError},
    fmt,
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

static INSTALLED: OnceLock<()> = OnceLock::new();

const DEFAULT_LEVEL: &str = "info";

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log filter: {0}")]
    InvalidFilter(#[from] ParseError),

    #[error("failed to install tracing subscriber: {0}")]
    Install(#[from] TryInitError),
}

/// Configuration for the telemetry system
#[derive(Debug, Clone, Default)]
pub struct TelemetryConfig {
    pub service_name: String,
    pub default_level: Option<String>,
    pub log_directives: Vec<String>,
}

impl TelemetryConfig {
    /// Create a new configuration with the given service name.
    pub fn new(service_name: impl Into<String>) -> Self {
        Self { service_name: service_name.into(), ..Default::default() }
    }

    /// Set the default log level (e.g., "debug", "info").
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.default_level = Some(level.into());
        self
    }

    /// Add a custom tracing directive (e.g., "gvision_client=debug").
    pub fn with_log_directive(mut self, directive: impl Into<String>) -> Self {
        self.log_directives.push(directive.into());
        self
    }

    /// Load configuration from environment variables.
    ///
    /// - `LOG_LEVEL`: default log level when `RUST_LOG` is unset
    pub fn from_env(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            default_level: std::env::var("LOG_LEVEL").ok(),
            log_directives: Vec::new(),
        }
    }

    fn env_filter(&self) -> Result<EnvFilter, TelemetryError> {
        let mut filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(self.default_level.as_deref().unwrap_or(DEFAULT_LEVEL))?,
        };
        for directive in &self.log_directives {
            filter = filter.add_directive(directive.parse::<Directive>()?);
        }
        Ok(filter)
    }
}

/// Installs the global subscriber. Calls after the first successful one are
/// no-ops; a failed install is reported again on the next call.
pub fn init_with_config(config: TelemetryConfig) -> Result<(), TelemetryError> {
    if INSTALLED.get().is_some() {
        return Ok(());
    }

    let filter = config.env_filter()?;
    let fmt_layer = fmt::layer().with_writer(std::io::stderr).with_target(true);

    tracing_subscriber::registry().with(filter).with(fmt_layer).try_init()?;
    let _ = INSTALLED.set(());

    tracing::debug!(
        service.name = config.service_name,
        log.level = config.default_level.as_deref().unwrap_or("env"),
        "Telemetry system initialized"
    );
    Ok(())
}
