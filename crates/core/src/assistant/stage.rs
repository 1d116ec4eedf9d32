use chat_assistant_model::{ContentBlock, ModelRequest, OutputEntry, OutputKind};

use super::{ChatAssistant, Error, SESSION_ENDED_NOTICE, STOP_COMMAND};
use crate::conversation::Conversation;
use crate::interface::{ARGUMENTS_PREVIEW_LEN, ChatInterface, shorten};

#[derive(Debug)]
pub(super) enum Stage {
    AwaitingUserInput,
    AwaitingModelResponse,
    /// Entries of the latest response, already appended to the
    /// conversation.
    ProcessingResponseEntries(Vec<OutputEntry>),
    SessionEnded,
}

impl ChatAssistant {
    pub(super) async fn read_user_input<I: ChatInterface>(
        &self,
        interface: &mut I,
        conversation: &mut Conversation,
    ) -> Stage {
        let Some(input) = interface.read_input().await else {
            debug!("input closed");
            interface.notify(SESSION_ENDED_NOTICE);
            return Stage::SessionEnded;
        };
        if input == STOP_COMMAND {
            interface.notify(SESSION_ENDED_NOTICE);
            return Stage::SessionEnded;
        }

        conversation.push_user(&input);
        Stage::AwaitingModelResponse
    }

    pub(super) async fn request_model<I: ChatInterface>(
        &self,
        interface: &mut I,
        conversation: &mut Conversation,
    ) -> Result<Stage, Error> {
        let request = ModelRequest {
            model: self.model.clone(),
            messages: conversation.messages(),
            tools: self.registry.definitions(),
        };

        interface.model_request_started();
        let resp_or_err = self.model_client.send_request(&request).await;
        interface.model_request_finished();
        let resp = resp_or_err?;

        // Everything the model said goes into the conversation before any of
        // it is acted upon.
        for entry in &resp.output {
            conversation.push_output_entry(entry);
        }
        Ok(Stage::ProcessingResponseEntries(resp.output))
    }

    pub(super) async fn process_entries<I: ChatInterface>(
        &self,
        interface: &mut I,
        conversation: &mut Conversation,
        entries: Vec<OutputEntry>,
    ) -> Result<Stage, Error> {
        let mut has_function_call = false;

        for entry in &entries {
            match &entry.kind {
                OutputKind::Message(blocks) => {
                    match blocks.first().and_then(ContentBlock::text) {
                        Some(text) => interface.render_message(text),
                        None => debug!(
                            "message {} has nothing to render",
                            entry.opaque.id()
                        ),
                    }
                }
                OutputKind::FunctionCall(call) => {
                    has_function_call = true;
                    let output = self.registry.dispatch(call).await?;
                    let arguments_preview =
                        shorten(&call.arguments, ARGUMENTS_PREVIEW_LEN);
                    interface.render_tool_call(
                        entry,
                        &call.name,
                        &arguments_preview,
                        &output.output,
                    );
                    conversation.push_function_call_output(output);
                }
                OutputKind::Unknown(tag) => {
                    debug!("skipping output entry of type `{tag}`");
                }
            }
        }

        if has_function_call {
            Ok(Stage::AwaitingModelResponse)
        } else {
            Ok(Stage::AwaitingUserInput)
        }
    }
}
