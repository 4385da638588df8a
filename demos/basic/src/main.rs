//! Minimal host wiring: start the telemetry pipeline, instrument a server
//! module at load time, register a tool, invoke it.
//!
//! Point `OTEL_EXPORTER_OTLP_ENDPOINT` at a collector and set
//! `OTEL_EXPORTER_OTLP_HEADERS` (e.g. `Authorization=Api-Token ...`) to see
//! the `mcp.tool:echo` span arrive.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use mcp_otel_core::{ServerModule, ToolHandler, ToolSet};
use mcp_otel_trace::{McpInstrumentation, TelemetryConfig, TelemetryPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut pipeline = TelemetryPipeline::new();
    pipeline.start(&TelemetryConfig::from_env());

    // What a host loader does when the MCP SDK module resolves.
    let tools = ToolSet::new();
    let mut hook = McpInstrumentation::new().init().remove(0);
    let mut module = hook.on_load(ServerModule::with_registry("mcp-sdk", Box::new(tools.clone())));
    info!(installed = hook.is_installed(), "module hook fired");

    // What application code does: register a tool by name.
    let echo: ToolHandler = Arc::new(|args, _extra| Box::pin(async move { Ok(args) }));
    if let Some(registry) = module.registry_mut() {
        registry.register_tool("echo", Some("Echoes its arguments"), None, echo);
    }

    // What the SDK does when the named capability is requested.
    let result = tools.invoke("echo", json!({"msg": "hello"}), None).await?;
    info!(%result, "tool returned");

    pipeline.shutdown();
    Ok(())
}
