//! MCP Instrumentation Core
//!
//! Shared vocabulary for instrumenting MCP servers: tool handler types, the
//! tool-registration capability trait, and the module exports surface that
//! load-time hooks operate on. This crate has minimal dependencies and no
//! telemetry wiring of its own.

pub mod error;
pub mod module;
pub mod tool;

pub use error::{Error, Result};
pub use module::ServerModule;
pub use tool::{RegisteredTool, ToolFuture, ToolHandler, ToolRegistry, ToolResult, ToolSet};
