//! Telemetry pipeline assembly and lifecycle.

use std::collections::HashMap;
use std::time::Duration;

use opentelemetry::trace::TracerProvider as _;
use opentelemetry::{KeyValue, global};
use opentelemetry_otlp::{Protocol, WithExportConfig, WithHttpConfig};
use opentelemetry_sdk::{Resource, runtime, trace::TracerProvider};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use mcp_otel_core::{Error, Result};

use crate::headers::parse_otlp_headers;
use crate::intercept::TRACER_NAME;

/// Endpoint of the OTLP collector, overridable via the environment.
pub const OTLP_ENDPOINT_ENV: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";

/// Raw exporter header configuration, `key=value` pairs separated by commas.
pub const OTLP_HEADERS_ENV: &str = "OTEL_EXPORTER_OTLP_HEADERS";

const DEFAULT_ENDPOINT: &str = "http://localhost:4318/v1/traces";

/// OTLP exporter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtlpConfig {
    pub endpoint: String,
    pub headers: HashMap<String, String>,
    pub timeout_seconds: u64,
}

impl Default for OtlpConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            headers: HashMap::new(),
            timeout_seconds: 10,
        }
    }
}

/// Telemetry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub service_name: String,
    pub service_version: String,
    pub otlp: OtlpConfig,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "mcp-otel".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            otlp: OtlpConfig::default(),
        }
    }
}

impl TelemetryConfig {
    /// Resolve endpoint and headers from the process environment.
    ///
    /// Both variables are optional: the endpoint falls back to the local
    /// collector default and headers default to empty.
    pub fn from_env() -> Self {
        Self::resolve(
            std::env::var(OTLP_ENDPOINT_ENV).ok().as_deref(),
            std::env::var(OTLP_HEADERS_ENV).ok().as_deref(),
        )
    }

    fn resolve(endpoint: Option<&str>, headers_raw: Option<&str>) -> Self {
        let mut config = Self::default();
        if let Some(endpoint) = endpoint {
            let endpoint = endpoint.trim();
            if !endpoint.is_empty() {
                config.otlp.endpoint = endpoint.to_string();
            }
        }
        config.otlp.headers = parse_otlp_headers(headers_raw);
        config
    }
}

/// Lifecycle handle for the process's trace pipeline.
///
/// Owned by whichever component performs process bootstrap; `start` is a
/// no-op after the first call, so repeated registration attempts cannot
/// stand up a second pipeline.
#[derive(Default)]
pub struct TelemetryPipeline {
    started: bool,
    provider: Option<TracerProvider>,
}

impl TelemetryPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn started(&self) -> bool {
        self.started
    }

    /// Assemble and start the pipeline. Returns `true` only on the call
    /// that performed the work.
    ///
    /// A failure to start is logged and swallowed: the flag still flips, so
    /// tracing stays off for the process lifetime and the host application
    /// is otherwise unaffected. Must be called from within a Tokio runtime;
    /// span batches are exported on it.
    pub fn start(&mut self, config: &TelemetryConfig) -> bool {
        if self.started {
            return false;
        }
        self.started = true;

        match build_pipeline(config) {
            Ok(provider) => {
                self.provider = Some(provider);
                info!(
                    endpoint = %config.otlp.endpoint,
                    "telemetry pipeline started"
                );
            }
            Err(err) => {
                init_basic_tracing();
                warn!(error = %err, "failed to start telemetry pipeline, tracing disabled");
            }
        }

        true
    }

    /// Flush remaining spans and shut the provider down.
    pub fn shutdown(&mut self) {
        if let Some(provider) = self.provider.take() {
            if let Err(err) = provider.shutdown() {
                warn!(error = %err, "telemetry pipeline shutdown failed");
            }
        }
    }
}

fn build_pipeline(config: &TelemetryConfig) -> Result<TracerProvider> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_protocol(Protocol::HttpBinary)
        .with_endpoint(&config.otlp.endpoint)
        .with_headers(config.otlp.headers.clone())
        .with_timeout(Duration::from_secs(config.otlp.timeout_seconds))
        .build()
        .map_err(|e| Error::PipelineInit(e.to_string()))?;

    let provider = TracerProvider::builder()
        .with_batch_exporter(exporter, runtime::Tokio)
        .with_resource(build_resource(config))
        .build();

    let tracer = provider.tracer(TRACER_NAME);
    global::set_tracer_provider(provider.clone());

    let telemetry_layer = tracing_opentelemetry::layer().with_tracer(tracer);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);

    // The host may already have a subscriber installed; spans still flow
    // through the global provider in that case.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(telemetry_layer)
        .try_init();

    Ok(provider)
}

fn build_resource(config: &TelemetryConfig) -> Resource {
    Resource::new(vec![
        KeyValue::new("service.name", config.service_name.clone()),
        KeyValue::new("service.version", config.service_version.clone()),
    ])
}

fn init_basic_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}
