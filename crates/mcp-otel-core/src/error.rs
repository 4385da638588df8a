//! Error types shared across the MCP instrumentation crates.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    // Tool errors
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Tool failed: {0}")]
    Tool(String),

    // Telemetry pipeline errors
    #[error("Failed to initialize telemetry pipeline: {0}")]
    PipelineInit(String),

    #[error("Failed to export traces: {0}")]
    Export(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::ToolNotFound("echo".to_string());
        assert_eq!(err.to_string(), "Tool not found: echo");

        let err = Error::PipelineInit("bad endpoint".to_string());
        assert_eq!(
            err.to_string(),
            "Failed to initialize telemetry pipeline: bad endpoint"
        );
    }
}
