//! OpenTelemetry instrumentation for MCP tool handlers.
//!
//! Wraps the tool-registration capability of a loaded MCP server module so
//! every tool invocation produces one span, and assembles the OTLP export
//! pipeline those spans flow into.

pub mod headers;
pub mod intercept;
pub mod tracer;

pub use headers::parse_otlp_headers;
pub use intercept::{
    ANY_VERSION, MCP_SDK_MODULE, McpInstrumentation, ModuleHook, TOOL_SPAN_PREFIX, TRACER_NAME,
    TracedRegistry, traced_handler,
};
pub use tracer::{
    OTLP_ENDPOINT_ENV, OTLP_HEADERS_ENV, OtlpConfig, TelemetryConfig, TelemetryPipeline,
};
