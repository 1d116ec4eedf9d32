use chat_assistant_model::ModelProvider;

use super::ChatAssistant;
use crate::model_client::ModelClient;
use crate::tool::{Registry, Tool, ToolDescriptor, Toolset};

/// The model used when none is set.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// The developer prompt used when none is set.
pub const DEFAULT_DEVELOPER_PROMPT: &str = "You are a helpful assistant.";

/// [`ChatAssistant`] builder.
pub struct AssistantBuilder {
    model_client: ModelClient,
    model: String,
    developer_prompt: String,
    registry: Registry,
}

impl AssistantBuilder {
    /// Creates a new builder with the specified model provider.
    #[inline]
    pub fn with_model_provider<P: ModelProvider + 'static>(
        provider: P,
    ) -> Self {
        Self {
            model_client: ModelClient::new(provider),
            model: DEFAULT_MODEL.to_owned(),
            developer_prompt: DEFAULT_DEVELOPER_PROMPT.to_owned(),
            registry: Registry::new(),
        }
    }

    /// Sets the identifier of the model to send requests to.
    #[inline]
    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the instruction placed at the start of every conversation.
    #[inline]
    pub fn with_developer_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.developer_prompt = prompt.into();
        self
    }

    /// Registers a tool.
    #[inline]
    pub fn with_tool<T: Tool>(mut self, tool: T) -> Self {
        self.registry.register(tool);
        self
    }

    /// Registers a tool with an explicit descriptor.
    #[inline]
    pub fn with_described_tool<T: Tool>(
        mut self,
        tool: T,
        descriptor: ToolDescriptor,
    ) -> Self {
        self.registry.register_with_descriptor(tool, descriptor);
        self
    }

    /// Registers every tool of a toolset.
    #[inline]
    pub fn with_tools<S: Toolset>(mut self, toolset: S) -> Self {
        self.registry.register_all(toolset);
        self
    }

    /// Builds the assistant.
    #[inline]
    pub fn build(self) -> ChatAssistant {
        let AssistantBuilder {
            model_client,
            model,
            developer_prompt,
            registry,
        } = self;
        debug!("building assistant for `{model}` with tools {registry:?}");

        ChatAssistant {
            model_client,
            model,
            developer_prompt,
            registry,
        }
    }
}
