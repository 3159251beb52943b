//! Configuration loading and validation for the vault sidecar.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or invalid.
//! Master secret text is never echoed in those messages.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated sidecar configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Base64url master secret for the active key version. **Required.**
    pub token_encryption_key_b64: String,

    /// Key version the active master secret belongs to.
    #[serde(default = "default_token_key_version")]
    pub token_key_version: u32,

    /// Decrypt-only master secrets for earlier key versions, as
    /// comma-separated `version:base64url` pairs.
    #[serde(default)]
    pub token_retired_keys: String,

    /// Socket address the HTTP server binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// OTLP endpoint for span export. Logs only when unset.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_token_key_version() -> u32 {
    1
}
fn default_listen_addr() -> String {
    "127.0.0.1:8080".into()
}
fn default_log_level() -> String {
    "info".into()
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("token_encryption_key_b64", &"[REDACTED]")
            .field("token_key_version", &self.token_key_version)
            .field("token_retired_keys", &"[REDACTED]")
            .field("listen_addr", &self.listen_addr)
            .field("otel_exporter_otlp_endpoint", &self.otel_exporter_otlp_endpoint)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.token_encryption_key_b64, "TOKEN_ENCRYPTION_KEY_B64")?;
        ensure_non_empty(&self.listen_addr, "LISTEN_ADDR")?;

        if self.token_key_version == 0 {
            anyhow::bail!("TOKEN_KEY_VERSION must be >= 1");
        }
        self.listen_addr
            .parse::<std::net::SocketAddr>()
            .context("LISTEN_ADDR must be a socket address such as 127.0.0.1:8080")?;
        if let Some(endpoint) = &self.otel_exporter_otlp_endpoint {
            ensure_non_empty(endpoint, "OTEL_EXPORTER_OTLP_ENDPOINT")?;
        }
        Ok(())
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}
