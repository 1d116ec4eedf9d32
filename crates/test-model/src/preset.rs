use chat_assistant_model::FunctionCall;
use serde::{Deserialize, Serialize};

/// The entries in a preset response.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetEntry {
    #[serde(rename = "message")]
    Message(String),
    #[serde(rename = "function_call")]
    FunctionCall(FunctionCall),
    /// An entry the assistant doesn't interpret, such as reasoning.
    #[serde(rename = "other")]
    Other(String),
}

/// The preset response for one model request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetResponse {
    /// Entries in this response.
    pub entries: Vec<PresetEntry>,
}

impl PresetResponse {
    /// Creates a `PresetResponse` with the specified entries.
    #[inline]
    pub fn with_entries(entries: impl Into<Vec<PresetEntry>>) -> Self {
        Self {
            entries: entries.into(),
        }
    }

    /// Creates a response holding a single text message.
    #[inline]
    pub fn message<S: Into<String>>(text: S) -> Self {
        Self::with_entries([PresetEntry::Message(text.into())])
    }

    /// Creates a response holding a single function call.
    #[inline]
    pub fn function_call<S1, S2, S3>(call_id: S1, name: S2, arguments: S3) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Self::with_entries([PresetEntry::function_call(
            call_id, name, arguments,
        )])
    }
}

impl PresetEntry {
    /// Creates a function call entry.
    #[inline]
    pub fn function_call<S1, S2, S3>(call_id: S1, name: S2, arguments: S3) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        PresetEntry::FunctionCall(FunctionCall {
            call_id: call_id.into(),
            name: name.into(),
            arguments: arguments.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_deserialize() {
        let response = PresetResponse::with_entries([
            PresetEntry::Other("reasoning".to_owned()),
            PresetEntry::function_call(
                "c1",
                "add_entry",
                r#"{"question": "Where?", "answer": "Here."}"#,
            ),
            PresetEntry::Message("I have saved it for you.".to_owned()),
        ]);

        let serialized = serde_json::to_string(&response).unwrap();
        let deserialized: PresetResponse =
            serde_json::from_str(&serialized).unwrap();

        assert_eq!(response, deserialized);
    }
}
