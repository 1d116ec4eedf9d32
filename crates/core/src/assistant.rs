//! The chat loop.

mod builder;
mod stage;

use std::error::Error as StdError;
use std::fmt::{self, Display};

use chat_assistant_model::ModelProviderError;

use crate::conversation::Conversation;
use crate::interface::ChatInterface;
use crate::model_client::ModelClient;
use crate::tool::{self, Registry};
pub use builder::{AssistantBuilder, DEFAULT_DEVELOPER_PROMPT, DEFAULT_MODEL};
use stage::Stage;

/// The input that ends a session. Matched exactly, case-sensitive.
pub const STOP_COMMAND: &str = "stop";

/// The notification shown when a session ends.
pub const SESSION_ENDED_NOTICE: &str = "Chat Ended";

/// A chat assistant, which relays a conversation between the user, a model
/// and a set of local tools.
///
/// The assistant holds no state of its own between runs. Each call to
/// [`ChatAssistant::run`] starts a new conversation.
pub struct ChatAssistant {
    model_client: ModelClient,
    model: String,
    developer_prompt: String,
    registry: Registry,
}

impl ChatAssistant {
    /// Returns the identifier of the model requests are sent to.
    #[inline]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the tools the model may call.
    #[inline]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Runs a chat session until the user ends it.
    ///
    /// Each turn reads one user input and then keeps calling the model for
    /// as long as its responses contain function calls. The session ends
    /// when the user enters [`STOP_COMMAND`] or the input runs out, and the
    /// full conversation is returned.
    ///
    /// Model and tool errors end the session immediately.
    pub async fn run<I: ChatInterface>(
        &self,
        interface: &mut I,
    ) -> Result<Conversation, Error> {
        let mut conversation = Conversation::default();
        conversation.push_developer(&self.developer_prompt);

        let mut stage = Stage::AwaitingUserInput;
        loop {
            let next_stage = match stage {
                Stage::AwaitingUserInput => {
                    self.read_user_input(interface, &mut conversation).await
                }
                Stage::AwaitingModelResponse => {
                    self.request_model(interface, &mut conversation).await?
                }
                Stage::ProcessingResponseEntries(entries) => {
                    self.process_entries(interface, &mut conversation, entries)
                        .await?
                }
                Stage::SessionEnded => break,
            };
            debug!("entering stage {next_stage:?}");
            stage = next_stage;
        }

        info!("session ended with {} items", conversation.len());
        Ok(conversation)
    }
}

/// An error that ends a chat session.
#[derive(Debug)]
pub enum Error {
    /// The model provider failed.
    Model(Box<dyn ModelProviderError>),
    /// A tool call failed.
    Tool(tool::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Model(err) => write!(f, "model error ({}): {err}", err.kind()),
            Error::Tool(err) => write!(f, "tool error: {err}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Model(err) => Some(&**err),
            Error::Tool(err) => Some(err),
        }
    }
}

impl From<tool::Error> for Error {
    #[inline]
    fn from(err: tool::Error) -> Self {
        Error::Tool(err)
    }
}

impl From<Box<dyn ModelProviderError>> for Error {
    #[inline]
    fn from(err: Box<dyn ModelProviderError>) -> Self {
        Error::Model(err)
    }
}
