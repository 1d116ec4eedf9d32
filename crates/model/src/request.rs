use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::OpaqueMessage;

/// A request to be sent to the model provider.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelRequest {
    /// Identifier of the model that should handle the request.
    pub model: String,
    /// The full transcript, oldest message first.
    pub messages: Vec<ModelMessage>,
    /// Tools that are available to the model.
    pub tools: Vec<ModelTool>,
}

/// A message in the transcript.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ModelMessage {
    /// The system-level instruction, sent once at the start.
    Developer(String),
    /// A user input text.
    User(String),
    /// An output entry from an earlier response, replayed verbatim.
    Opaque(OpaqueMessage),
    /// The result of a function call made by the assistant.
    FunctionCallOutput(FunctionCallOutput),
}

/// The result of calling a tool, correlated to the request by `call_id`.
///
/// Serializes as `{"type": "function_call_output", "call_id", "output"}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename = "function_call_output")]
pub struct FunctionCallOutput {
    /// The identifier of the function call this output answers.
    pub call_id: String,
    /// The JSON-encoded return value of the tool.
    pub output: String,
}

/// Describes a tool that can be used by the model.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelTool {
    /// Name of the tool.
    pub name: String,
    /// Description of the tool.
    pub description: String,
    /// Parameters definition of the tool.
    ///
    /// For most model providers, the parameters should typically be
    /// defined by a [JSON schema](https://json-schema.org/).
    pub parameters: Value,
}
