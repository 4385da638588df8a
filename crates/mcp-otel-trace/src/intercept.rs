//! Load-time interception of MCP tool registration.
//!
//! Every tool registered through a wrapped registry gets its handler replaced
//! by a span-producing adapter; the tool's observable input/output contract is
//! untouched. Tools registered before the hook installs are not wrapped.

use std::sync::{Arc, Mutex};

use opentelemetry::global;
use opentelemetry::trace::{FutureExt, Status, TraceContextExt, Tracer};
use serde_json::Value;
use tracing::debug;

use mcp_otel_core::{ServerModule, ToolHandler, ToolRegistry};

/// Instrumentation scope reported on every span this crate produces.
pub const TRACER_NAME: &str = "mcp-otel";

/// Prefix for tool-invocation span names: `mcp.tool:<toolName>`.
pub const TOOL_SPAN_PREFIX: &str = "mcp.tool:";

/// Host-loader identifier of the MCP SDK server module.
pub const MCP_SDK_MODULE: &str = "mcp-sdk";

/// Version range the hook accepts.
pub const ANY_VERSION: &str = ">=0.0.0";

/// Entry point the host instrumentation runtime consumes.
pub struct McpInstrumentation;

impl McpInstrumentation {
    pub fn new() -> Self {
        Self
    }

    /// Module hooks this instrumentation wants installed.
    pub fn init(&self) -> Vec<ModuleHook> {
        vec![ModuleHook::new(MCP_SDK_MODULE, ANY_VERSION)]
    }
}

impl Default for McpInstrumentation {
    fn default() -> Self {
        Self::new()
    }
}

/// A load/unload hook for one named module.
///
/// The host runtime calls `on_load` when the module resolves and `on_unload`
/// when instrumentation is disabled. Both return the module so loading can
/// proceed whether or not wrapping happened.
pub struct ModuleHook {
    module_name: &'static str,
    version_range: &'static str,
    original: Option<SharedRegistry>,
}

impl ModuleHook {
    fn new(module_name: &'static str, version_range: &'static str) -> Self {
        Self {
            module_name,
            version_range,
            original: None,
        }
    }

    pub fn module_name(&self) -> &'static str {
        self.module_name
    }

    pub fn version_range(&self) -> &'static str {
        self.version_range
    }

    /// Whether `on_load` found the registration capability and wrapped it.
    pub fn is_installed(&self) -> bool {
        self.original.is_some()
    }

    /// Wrap the module's tool registry, if it exposes one.
    ///
    /// A module without the capability (an incompatible SDK build) passes
    /// through unchanged; the host must still be able to load it.
    pub fn on_load(&mut self, mut module: ServerModule) -> ServerModule {
        if self.is_installed() {
            return module;
        }

        match module.take_tool_registry() {
            Some(inner) => {
                let shared = SharedRegistry::new(inner);
                self.original = Some(shared.clone());
                module.set_tool_registry(Box::new(TracedRegistry::new(shared)));
                debug!(module = module.name(), "wrapped tool registration");
            }
            None => {
                debug!(
                    module = module.name(),
                    "module exposes no tool registration, skipping"
                );
            }
        }

        module
    }

    /// Restore the original registry reference.
    ///
    /// Handlers already wrapped keep their adapters; only future
    /// registrations go back to the plain registry.
    pub fn on_unload(&mut self, mut module: ServerModule) -> ServerModule {
        if let Some(original) = self.original.take() {
            module.set_tool_registry(Box::new(original));
            debug!(module = module.name(), "restored tool registration");
        }
        module
    }
}

/// Shared handle to the registry that was in place before wrapping.
///
/// Both the decorator and the hook hold a reference, so `on_unload` can put
/// the original back while installed adapters keep delegating to it.
#[derive(Clone)]
struct SharedRegistry {
    inner: Arc<Mutex<Box<dyn ToolRegistry>>>,
}

impl SharedRegistry {
    fn new(inner: Box<dyn ToolRegistry>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }
}

impl ToolRegistry for SharedRegistry {
    fn register_tool(
        &mut self,
        name: &str,
        description: Option<&str>,
        schema: Option<Value>,
        handler: ToolHandler,
    ) {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .register_tool(name, description, schema, handler);
    }
}

/// Decorator that substitutes every registered handler with a span-producing
/// adapter before delegating to the wrapped registry.
pub struct TracedRegistry {
    inner: SharedRegistry,
}

impl TracedRegistry {
    fn new(inner: SharedRegistry) -> Self {
        Self { inner }
    }
}

impl ToolRegistry for TracedRegistry {
    fn register_tool(
        &mut self,
        name: &str,
        description: Option<&str>,
        schema: Option<Value>,
        handler: ToolHandler,
    ) {
        let wrapped = traced_handler(name, handler);
        self.inner.register_tool(name, description, schema, wrapped);
    }
}

/// Wrap a tool handler so each invocation runs under its own span.
///
/// The span name is fixed at registration time. The handler's future runs
/// with the span's context attached, so the span is ambient for the full
/// asynchronous duration of the call and nested spans parent correctly;
/// the caller's context is restored when the future settles. Failures are
/// recorded on the span and re-raised unchanged.
pub fn traced_handler(tool_name: &str, handler: ToolHandler) -> ToolHandler {
    let span_name = format!("{TOOL_SPAN_PREFIX}{tool_name}");

    Arc::new(move |args, extra| {
        let span_name = span_name.clone();
        let handler = Arc::clone(&handler);

        Box::pin(async move {
            let tracer = global::tracer(TRACER_NAME);
            let span = tracer.start(span_name);
            let cx = opentelemetry::Context::current_with_span(span);

            let result = handler(args, extra).with_context(cx.clone()).await;

            let span = cx.span();
            match &result {
                Ok(_) => span.set_status(Status::Ok),
                Err(err) => {
                    span.record_error(err);
                    span.set_status(Status::error(err.to_string()));
                }
            }
            span.end();

            result
        })
    })
}
