//! Tool handler types and the tool-registration capability trait.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use serde_json::Value;

use crate::error::{Error, Result};

/// Outcome of one tool invocation.
pub type ToolResult = Result<Value>;

/// In-flight tool invocation.
pub type ToolFuture = BoxFuture<'static, ToolResult>;

/// A named tool's callback: JSON arguments plus optional per-request extra.
pub type ToolHandler = Arc<dyn Fn(Value, Option<Value>) -> ToolFuture + Send + Sync>;

/// The narrow capability a server module exposes for registering tools.
///
/// This is the seam instrumentation decorates: anything that accepts a
/// `(name, description, schema, handler)` registration can be wrapped so
/// every handler registered through it produces a span per invocation.
pub trait ToolRegistry: Send {
    fn register_tool(
        &mut self,
        name: &str,
        description: Option<&str>,
        schema: Option<Value>,
        handler: ToolHandler,
    );
}

/// A registered tool's metadata and callback.
#[derive(Clone)]
pub struct RegisteredTool {
    pub description: Option<String>,
    pub schema: Option<Value>,
    pub handler: ToolHandler,
}

/// In-memory tool registry with shared ownership.
///
/// Clones share the same underlying table, so a server loop can invoke
/// tools while another component holds the registration handle.
#[derive(Clone, Default)]
pub struct ToolSet {
    tools: Arc<Mutex<HashMap<String, RegisteredTool>>>,
}

impl ToolSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invoke a registered tool by name.
    ///
    /// An unknown name resolves to `Error::ToolNotFound` rather than failing
    /// eagerly, so callers treat lookup and execution failures uniformly.
    pub fn invoke(&self, name: &str, args: Value, extra: Option<Value>) -> ToolFuture {
        let handler = self
            .lock()
            .get(name)
            .map(|tool| Arc::clone(&tool.handler));

        match handler {
            Some(handler) => handler(args, extra),
            None => {
                let name = name.to_string();
                Box::pin(async move { Err(Error::ToolNotFound(name)) })
            }
        }
    }

    /// Get a registered tool's metadata and handler.
    pub fn get(&self, name: &str) -> Option<RegisteredTool> {
        self.lock().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Names of all registered tools, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().keys().cloned().collect();
        names.sort();
        names
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, RegisteredTool>> {
        self.tools.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ToolRegistry for ToolSet {
    fn register_tool(
        &mut self,
        name: &str,
        description: Option<&str>,
        schema: Option<Value>,
        handler: ToolHandler,
    ) {
        let tool = RegisteredTool {
            description: description.map(str::to_string),
            schema,
            handler,
        };
        // Re-registering a name replaces the earlier tool.
        self.lock().insert(name.to_string(), tool);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn echo_handler() -> ToolHandler {
        Arc::new(|args, _extra| Box::pin(async move { Ok(args) }))
    }

    #[tokio::test]
    async fn test_register_and_invoke() {
        let mut tools = ToolSet::new();
        tools.register_tool("echo", Some("Echoes input"), None, echo_handler());

        assert!(tools.contains("echo"));
        assert_eq!(tools.len(), 1);

        let result = tools.invoke("echo", json!({"msg": "hi"}), None).await;
        assert_eq!(result.unwrap(), json!({"msg": "hi"}));
    }

    #[tokio::test]
    async fn test_invoke_unknown_tool() {
        let tools = ToolSet::new();
        let result = tools.invoke("missing", json!({}), None).await;
        match result {
            Err(Error::ToolNotFound(name)) => assert_eq!(name, "missing"),
            other => panic!("expected ToolNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_reregistration_replaces_handler() {
        let mut tools = ToolSet::new();
        tools.register_tool("t", None, None, echo_handler());
        tools.register_tool(
            "t",
            None,
            None,
            Arc::new(|_args, _extra| Box::pin(async { Ok(json!("second")) })),
        );

        assert_eq!(tools.len(), 1);
        let result = tools.invoke("t", json!({}), None).await;
        assert_eq!(result.unwrap(), json!("second"));
    }

    #[test]
    fn test_clones_share_state() {
        let mut tools = ToolSet::new();
        let view = tools.clone();
        tools.register_tool("a", None, None, echo_handler());

        assert!(view.contains("a"));
        assert_eq!(view.names(), vec!["a".to_string()]);
    }
}
