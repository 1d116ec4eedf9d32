use std::borrow::Cow;

use chat_assistant_model::OutputEntry;

/// Length of the argument preview passed to
/// [`ChatInterface::render_tool_call`].
pub const ARGUMENTS_PREVIEW_LEN: usize = 50;

/// The front end of a chat session.
///
/// The assistant calls these methods from a single task and never from two
/// places at once.
pub trait ChatInterface {
    /// Reads the next user utterance, trimmed.
    ///
    /// Returns `None` when there is no more input, which ends the session
    /// the same way `stop` does.
    fn read_input(&mut self) -> impl Future<Output = Option<String>>;

    /// Shows a message from the assistant. The text is usually markdown.
    fn render_message(&mut self, markdown: &str);

    /// Shows a tool call the assistant just made.
    ///
    /// `entry` is the response entry holding the call, with the provider's
    /// raw item in its opaque message. `arguments_preview` is the argument
    /// text shortened with [`shorten`], and `output` is the JSON the tool
    /// returned.
    fn render_tool_call(
        &mut self,
        entry: &OutputEntry,
        tool_name: &str,
        arguments_preview: &str,
        output: &str,
    );

    /// Shows a status line, such as the end of the session.
    fn notify(&mut self, text: &str);

    /// Called right before a request is sent to the model.
    fn model_request_started(&mut self) {}

    /// Called when the model responded, whether successfully or not.
    fn model_request_finished(&mut self) {}
}

/// Shortens `text` to at most `max_len` characters.
///
/// Text that fits is returned unchanged. Otherwise the first `max_len - 3`
/// characters are kept and `"..."` is appended.
pub fn shorten(text: &str, max_len: usize) -> Cow<'_, str> {
    if text.chars().count() <= max_len {
        return Cow::Borrowed(text);
    }
    let mut shortened: String =
        text.chars().take(max_len.saturating_sub(3)).collect();
    shortened.push_str("...");
    Cow::Owned(shortened)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorten() {
        let fits = "a".repeat(50);
        assert!(matches!(shorten(&fits, 50), Cow::Borrowed(_)));

        let long = "b".repeat(51);
        let preview = shorten(&long, 50);
        assert_eq!(preview.chars().count(), 50);
        assert_eq!(preview, format!("{}...", "b".repeat(47)));
    }

    #[test]
    fn test_shorten_multibyte() {
        let text = "日本語のテキスト";
        assert_eq!(shorten(text, 6), "日本語...");
        assert_eq!(shorten(text, 8), text);
    }
}
