use chat_assistant_core::assistant::Error;
use chat_assistant_core::tool::Tool;
use chat_assistant_core::{
    AssistantBuilder, ChatAssistant, ChatInterface, Conversation,
};
use chat_assistant_model::ModelProvider;

use crate::tools::KnowledgeBase;

/// A session builder.
///
/// See [`Session`].
pub struct SessionBuilder {
    assistant_builder: AssistantBuilder,
    knowledge_base: KnowledgeBase,
}

impl SessionBuilder {
    /// Creates a session builder with a specified model provider.
    pub fn with_model_provider<M: ModelProvider + 'static>(
        provider: M,
    ) -> Self {
        let assistant_builder = AssistantBuilder::with_model_provider(provider);
        Self {
            assistant_builder,
            knowledge_base: KnowledgeBase::new(),
        }
    }

    /// Sets the model to chat with.
    #[inline]
    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.assistant_builder = self.assistant_builder.with_model(model);
        self
    }

    /// Sets the developer prompt for the assistant.
    #[inline]
    pub fn with_developer_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.assistant_builder =
            self.assistant_builder.with_developer_prompt(prompt);
        self
    }

    /// Sets the knowledge base the assistant searches and extends.
    ///
    /// An empty one is used by default.
    #[inline]
    pub fn with_knowledge_base(mut self, knowledge_base: KnowledgeBase) -> Self {
        self.knowledge_base = knowledge_base;
        self
    }

    /// Registers an extra tool.
    #[inline]
    pub fn with_tool<T: Tool>(mut self, tool: T) -> Self {
        self.assistant_builder = self.assistant_builder.with_tool(tool);
        self
    }

    /// Builds a new session.
    pub fn build(self) -> Session {
        let assistant = self
            .assistant_builder
            .with_tools(self.knowledge_base.clone())
            .build();

        Session {
            assistant,
            knowledge_base: self.knowledge_base,
        }
    }
}

/// A chat session, like a window that displays messages and has a input box.
///
/// The session holds a fully configured assistant, and it is basically a
/// wrapper around [`ChatAssistant`].
pub struct Session {
    assistant: ChatAssistant,
    knowledge_base: KnowledgeBase,
}

impl Session {
    /// Runs the chat until the user ends it. See [`ChatAssistant::run`].
    #[inline]
    pub async fn run<I: ChatInterface>(
        &self,
        interface: &mut I,
    ) -> Result<Conversation, Error> {
        self.assistant.run(interface).await
    }

    /// Returns the assistant of this session.
    #[inline]
    pub fn assistant(&self) -> &ChatAssistant {
        &self.assistant
    }

    /// Returns the knowledge base, including entries the model added.
    #[inline]
    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.knowledge_base
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use chat_assistant_model::{ModelMessage, OutputEntry};
    use chat_assistant_test_model::{PresetResponse, TestModelProvider};

    use super::*;
    use crate::tools::KnowledgeBaseEntry;

    #[derive(Default)]
    struct Transcript {
        inputs: VecDeque<&'static str>,
        lines: Vec<String>,
    }

    impl ChatInterface for Transcript {
        async fn read_input(&mut self) -> Option<String> {
            self.inputs.pop_front().map(ToOwned::to_owned)
        }

        fn render_message(&mut self, markdown: &str) {
            self.lines.push(format!("assistant: {markdown}"));
        }

        fn render_tool_call(
            &mut self,
            _entry: &OutputEntry,
            tool_name: &str,
            arguments_preview: &str,
            _output: &str,
        ) {
            self.lines.push(format!("{tool_name}({arguments_preview})"));
        }

        fn notify(&mut self, text: &str) {
            self.lines.push(text.to_owned());
        }
    }

    #[tokio::test]
    async fn test_model_adds_entry() {
        let model_provider = TestModelProvider::default();
        model_provider.add_response(PresetResponse::function_call(
            "c1",
            "add_entry",
            r#"{"question":"Where are the videos?","answer":"On YouTube."}"#,
        ));
        model_provider.add_response(PresetResponse::message("Saved it."));

        let session = SessionBuilder::with_model_provider(model_provider.clone())
            .with_developer_prompt("You are a course teaching assistant.")
            .build();
        let mut interface = Transcript {
            inputs: ["Remember: videos are on YouTube.", "stop"].into(),
            ..Default::default()
        };
        session.run(&mut interface).await.unwrap();

        assert_eq!(
            interface.lines,
            [
                r#"add_entry({"question":"Where are the videos?","answer":"O...)"#,
                "assistant: Saved it.",
                "Chat Ended",
            ]
        );
        assert_eq!(
            session.knowledge_base().entries(),
            [KnowledgeBaseEntry {
                section: "user added".to_owned(),
                question: "Where are the videos?".to_owned(),
                answer: "On YouTube.".to_owned(),
            }]
        );

        let requests = model_provider.requests();
        let tool_names: Vec<_> =
            requests[0].tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(tool_names, ["search", "add_entry"]);
        assert_eq!(
            requests[0].messages[0],
            ModelMessage::Developer(
                "You are a course teaching assistant.".to_owned()
            )
        );
    }
}
