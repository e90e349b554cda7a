/// MCP tools for streak and mood journal operations
///
/// Each tool has a parameter struct (deserialized from the tool call's
/// arguments, with a generated JSON schema) and a response carrying both
/// structured data and a human-readable message.

pub mod mood;
pub mod stats;
pub mod streak;

pub use mood::*;
pub use stats::*;
pub use streak::*;

use schemars::JsonSchema;
use serde::Deserialize;

/// Arguments for tools that take none
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct NoParams {}
