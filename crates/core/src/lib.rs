//! Core logic including the chat loop, tool registry and schema generation.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

pub mod assistant;
pub mod conversation;
mod interface;
mod model_client;
pub mod tool;

pub use assistant::{AssistantBuilder, ChatAssistant};
pub use conversation::Conversation;
pub use interface::{ARGUMENTS_PREVIEW_LEN, ChatInterface, shorten};
