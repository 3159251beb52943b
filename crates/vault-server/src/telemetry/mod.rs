//! Tracing setup: structured JSON logs, plus OTLP span export when configured.
//!
//! # Telemetry invariants
//!
//! - **No token plaintext or key material** may appear in any span attribute
//!   or log field. Context fields (tenant, provider, token class, key version)
//!   are fine.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`).

pub mod init;

pub use init::init_telemetry;
