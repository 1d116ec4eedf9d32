//! Conversation-related types.

use chat_assistant_model::{FunctionCallOutput, ModelMessage, OutputEntry};

/// Represents a conversation.
///
/// Items are only ever appended, and the whole conversation is sent to the
/// model on every request.
#[derive(Clone, Default, Debug)]
pub struct Conversation {
    items: Vec<Item>,
}

impl Conversation {
    /// Returns all items, oldest first.
    #[inline]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Returns the number of items.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the conversation has no items.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the messages to send to the model.
    pub fn messages(&self) -> Vec<ModelMessage> {
        self.items.iter().map(|item| item.msg.clone()).collect()
    }

    pub(crate) fn push_developer(&mut self, prompt: &str) {
        self.push(
            ModelMessage::Developer(prompt.to_owned()),
            format!("developer: {prompt}"),
        );
    }

    pub(crate) fn push_user(&mut self, input: &str) {
        self.push(
            ModelMessage::User(input.to_owned()),
            format!("user: {input}"),
        );
    }

    pub(crate) fn push_output_entry(&mut self, entry: &OutputEntry) {
        self.push(
            ModelMessage::Opaque(entry.opaque.clone()),
            format!("assistant: {:?}", entry.kind),
        );
    }

    pub(crate) fn push_function_call_output(
        &mut self,
        output: FunctionCallOutput,
    ) {
        let transcript =
            format!("tool ({}): {}", output.call_id, output.output);
        self.push(ModelMessage::FunctionCallOutput(output), transcript);
    }

    fn push(&mut self, msg: ModelMessage, transcript: String) {
        trace!("appending {transcript}");
        self.items.push(Item { msg, transcript });
    }
}

/// An item in the conversation.
#[derive(Clone, Debug)]
pub struct Item {
    msg: ModelMessage,
    transcript: String,
}

impl Item {
    /// Returns the transcript of this item.
    ///
    /// The transcript is a string representation of the message item,
    /// which can be exported later. But transcript alone is not enough
    /// to reconstruct the message item.
    #[inline]
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// Returns the message sent to the model for this item.
    #[inline]
    pub fn message(&self) -> &ModelMessage {
        &self.msg
    }
}
