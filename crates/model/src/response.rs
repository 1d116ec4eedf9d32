use serde::{Deserialize, Serialize};

use crate::OpaqueMessage;

/// A complete response from the model provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelResponse {
    /// Output entries, in the order the model produced them.
    pub output: Vec<OutputEntry>,
}

/// One entry of a model response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputEntry {
    /// What the assistant should do with this entry.
    pub kind: OutputKind,
    /// The entry in the provider's own format, appended to the transcript
    /// as is.
    pub opaque: OpaqueMessage,
}

/// The interpreted content of an [`OutputEntry`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum OutputKind {
    /// A natural-language message made of content blocks.
    Message(Vec<ContentBlock>),
    /// A request to invoke a local tool.
    FunctionCall(FunctionCall),
    /// Any other entry, identified by its type tag. The assistant keeps it
    /// in the transcript but doesn't interpret it.
    Unknown(String),
}

/// A content block of a message entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentBlock {
    /// Text produced by the model, usually markdown.
    Text(String),
    /// The model refused to answer.
    Refusal(String),
    /// A block without any text, identified by its type tag.
    Other(String),
}

impl ContentBlock {
    /// Returns the renderable text of this block, if any.
    #[inline]
    pub fn text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text(text) | ContentBlock::Refusal(text) => {
                Some(text)
            }
            ContentBlock::Other(_) => None,
        }
    }
}

/// Describes a function call request from the model.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionCall {
    /// The identifier that correlates this call with its output.
    pub call_id: String,
    /// The name of the tool to call.
    pub name: String,
    /// The JSON-encoded arguments, exactly as the model produced them.
    pub arguments: String,
}
