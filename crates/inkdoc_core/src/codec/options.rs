//! Codec configuration.

use crate::model::environment::InkEnvironment;

/// Default cap on a decoded body: 64 MiB.
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Authoring tool recorded in provenance when none is configured.
pub const DEFAULT_AUTHORING_TOOL: &str = "inkdoc";

/// Decode-side limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Bodies declaring more bytes than this are rejected before parsing.
    pub max_body_bytes: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Encode-side settings.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeOptions {
    /// Value of the `author` provenance fact.
    pub authoring_tool: String,
    /// Live environment, written when saved sensor data points at it.
    pub environment: Option<InkEnvironment>,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            authoring_tool: DEFAULT_AUTHORING_TOOL.to_string(),
            environment: None,
        }
    }
}

impl EncodeOptions {
    pub fn with_environment(mut self, environment: InkEnvironment) -> Self {
        self.environment = Some(environment);
        self
    }

    pub fn with_authoring_tool(mut self, tool: impl Into<String>) -> Self {
        self.authoring_tool = tool.into();
        self
    }
}
