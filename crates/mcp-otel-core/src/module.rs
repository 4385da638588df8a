//! The exports surface of a loaded MCP server module.

use crate::tool::ToolRegistry;

/// What a loaded server module exposes to instrumentation hooks.
///
/// A module built against an SDK version without tool registration simply
/// carries no registry; hooks must pass such a module through unchanged.
pub struct ServerModule {
    name: String,
    tool_registry: Option<Box<dyn ToolRegistry>>,
}

impl ServerModule {
    /// A module that exposes no tool-registration capability.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tool_registry: None,
        }
    }

    /// A module exposing the given tool registry.
    pub fn with_registry(name: impl Into<String>, registry: Box<dyn ToolRegistry>) -> Self {
        Self {
            name: name.into(),
            tool_registry: Some(registry),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_tool_registry(&self) -> bool {
        self.tool_registry.is_some()
    }

    /// Remove and return the module's registry, leaving the slot empty.
    pub fn take_tool_registry(&mut self) -> Option<Box<dyn ToolRegistry>> {
        self.tool_registry.take()
    }

    /// Replace the module's registry slot.
    pub fn set_tool_registry(&mut self, registry: Box<dyn ToolRegistry>) {
        self.tool_registry = Some(registry);
    }

    /// Mutable access to the registry, for registering tools.
    pub fn registry_mut(&mut self) -> Option<&mut (dyn ToolRegistry + 'static)> {
        self.tool_registry.as_deref_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::ToolSet;

    #[test]
    fn test_module_without_registry() {
        let mut module = ServerModule::new("mcp-sdk");
        assert_eq!(module.name(), "mcp-sdk");
        assert!(!module.has_tool_registry());
        assert!(module.take_tool_registry().is_none());
        assert!(module.registry_mut().is_none());
    }

    #[test]
    fn test_take_and_set_registry() {
        let mut module = ServerModule::with_registry("mcp-sdk", Box::new(ToolSet::new()));
        assert!(module.has_tool_registry());

        let registry = module.take_tool_registry();
        assert!(registry.is_some());
        assert!(!module.has_tool_registry());

        module.set_tool_registry(registry.unwrap());
        assert!(module.has_tool_registry());
    }
}
