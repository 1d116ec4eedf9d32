use chat_assistant_model::{ContentBlock, ModelMessage, ModelRequest, ModelTool};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ResponseObject {
    pub id: String,
    #[serde(default)]
    pub output: Vec<Value>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    pub error: ApiError,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputItem {
    Message {
        #[serde(default)]
        content: Vec<OutputContent>,
    },
    FunctionCall {
        call_id: String,
        name: String,
        arguments: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputContent {
    OutputText { text: String },
    Refusal { refusal: String },
    #[serde(other)]
    Other,
}

impl OutputContent {
    fn into_block(self, raw_type: &str) -> ContentBlock {
        match self {
            OutputContent::OutputText { text } => ContentBlock::Text(text),
            OutputContent::Refusal { refusal } => ContentBlock::Refusal(refusal),
            OutputContent::Other => ContentBlock::Other(raw_type.to_owned()),
        }
    }
}

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Serialize)]
struct FunctionTool {
    r#type: &'static str,
    name: String,
    description: String,
    parameters: Value,
    strict: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InputMessage {
    r#type: &'static str,
    role: &'static str,
    content: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FunctionCallOutputItem {
    r#type: &'static str,
    call_id: String,
    output: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InputItem {
    Message(InputMessage),
    FunctionCallOutput(FunctionCallOutputItem),
    /// An output item of an earlier response, sent back as it was received.
    Raw(Value),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CreateResponseRequest {
    model: String,
    input: Vec<InputItem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<FunctionTool>,
}

// -----------
// Conversions
// -----------

#[inline]
pub fn create_request(req: &ModelRequest) -> CreateResponseRequest {
    CreateResponseRequest {
        model: req.model.clone(),
        input: req.messages.iter().filter_map(create_input_item).collect(),
        tools: req.tools.iter().map(create_tool).collect(),
    }
}

fn create_input_item(msg: &ModelMessage) -> Option<InputItem> {
    let item = match msg {
        ModelMessage::Developer(content) => InputItem::Message(InputMessage {
            r#type: "message",
            role: "developer",
            content: content.clone(),
        }),
        ModelMessage::User(content) => InputItem::Message(InputMessage {
            r#type: "message",
            role: "user",
            content: content.clone(),
        }),
        ModelMessage::FunctionCallOutput(output) => {
            InputItem::FunctionCallOutput(FunctionCallOutputItem {
                r#type: "function_call_output",
                call_id: output.call_id.clone(),
                output: output.output.clone(),
            })
        }
        ModelMessage::Opaque(opaque_message) => {
            // Opaque messages from this provider always hold the raw item.
            let Some(raw) = opaque_message.to_raw::<Value>() else {
                warn!(
                    "dropping opaque message {} from another provider",
                    opaque_message.id()
                );
                return None;
            };
            InputItem::Raw(raw.clone())
        }
    };
    Some(item)
}

#[inline]
fn create_tool(tool: &ModelTool) -> FunctionTool {
    FunctionTool {
        r#type: "function",
        name: tool.name.clone(),
        description: tool.description.clone(),
        parameters: tool.parameters.clone(),
        // Strict mode would force every parameter to be required.
        strict: false,
    }
}

/// Returns the `type` tag of a raw output item.
#[inline]
pub fn item_type(raw: &Value) -> &str {
    raw.get("type").and_then(Value::as_str).unwrap_or("unknown")
}

/// Converts the content of a message item, keeping the type tag of blocks
/// that have no text.
pub fn content_blocks(raw: &Value, content: Vec<OutputContent>) -> Vec<ContentBlock> {
    let raw_blocks = raw.get("content").and_then(Value::as_array);
    content
        .into_iter()
        .enumerate()
        .map(|(idx, block)| {
            let raw_type = raw_blocks
                .and_then(|blocks| blocks.get(idx))
                .map(item_type)
                .unwrap_or("unknown");
            block.into_block(raw_type)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chat_assistant_model::{FunctionCallOutput, OpaqueMessage};
    use serde_json::json;

    use super::*;

    #[test]
    fn test_create_request() {
        let function_call = json!({
            "type": "function_call",
            "id": "fc_1",
            "call_id": "c1",
            "name": "add",
            "arguments": "{\"a\": 2, \"b\": 3}"
        });
        let request = ModelRequest {
            model: "gpt-4o-mini".to_owned(),
            messages: vec![
                ModelMessage::Developer("You are a helpful assistant.".to_owned()),
                ModelMessage::User("What is 2 + 3?".to_owned()),
                ModelMessage::Opaque(OpaqueMessage::new(
                    "fc_1",
                    function_call.clone(),
                )),
                ModelMessage::FunctionCallOutput(FunctionCallOutput {
                    call_id: "c1".to_owned(),
                    output: "5".to_owned(),
                }),
            ],
            tools: vec![ModelTool {
                name: "add".to_owned(),
                description: "Adds two integers.".to_owned(),
                parameters: json!({ "type": "object" }),
            }],
        };

        let body = serde_json::to_value(create_request(&request)).unwrap();
        assert_eq!(
            body,
            json!({
                "model": "gpt-4o-mini",
                "input": [
                    {
                        "type": "message",
                        "role": "developer",
                        "content": "You are a helpful assistant."
                    },
                    {
                        "type": "message",
                        "role": "user",
                        "content": "What is 2 + 3?"
                    },
                    function_call,
                    {
                        "type": "function_call_output",
                        "call_id": "c1",
                        "output": "5"
                    }
                ],
                "tools": [{
                    "type": "function",
                    "name": "add",
                    "description": "Adds two integers.",
                    "parameters": { "type": "object" },
                    "strict": false
                }]
            })
        );
    }

    #[test]
    fn test_foreign_opaque_message_is_dropped() {
        let request = ModelRequest {
            model: "gpt-4o-mini".to_owned(),
            messages: vec![
                ModelMessage::User("Hi".to_owned()),
                ModelMessage::Opaque(OpaqueMessage::new("x", 1_u8)),
            ],
            tools: vec![],
        };
        let body = serde_json::to_value(create_request(&request)).unwrap();
        assert_eq!(body["input"].as_array().unwrap().len(), 1);
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_parse_output_items() {
        let item: OutputItem = serde_json::from_value(json!({
            "type": "reasoning",
            "id": "rs_1",
            "summary": []
        }))
        .unwrap();
        assert_eq!(item, OutputItem::Other);

        let raw = json!({
            "type": "message",
            "content": [
                { "type": "output_text", "text": "Hi", "annotations": [] },
                { "type": "output_audio" }
            ]
        });
        let OutputItem::Message { content } =
            serde_json::from_value(raw.clone()).unwrap()
        else {
            unreachable!();
        };
        assert_eq!(
            content_blocks(&raw, content),
            vec![
                ContentBlock::Text("Hi".to_owned()),
                ContentBlock::Other("output_audio".to_owned())
            ]
        );
    }
}
