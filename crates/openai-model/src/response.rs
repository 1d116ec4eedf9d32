use chat_assistant_model::{
    ErrorKind, FunctionCall, ModelResponse, OpaqueMessage, OutputEntry,
    OutputKind,
};
use serde_json::Value;

use crate::Error;
use crate::proto::{self, OutputItem, ResponseObject};

/// Converts a response object into the model-agnostic form.
///
/// Every output item keeps its raw JSON as the opaque message, so the item
/// can be sent back unchanged in later requests.
pub fn into_model_response(resp: ResponseObject) -> Result<ModelResponse, Error> {
    if let Some(err) = resp.error {
        return Err(Error::new(err.message, ErrorKind::Other));
    }

    let response_id = resp.id;
    let mut output = Vec::with_capacity(resp.output.len());
    for (idx, raw) in resp.output.into_iter().enumerate() {
        let item: OutputItem = serde_json::from_value(raw.clone())
            .map_err(|err| {
                Error::new(
                    format!("malformed output item #{idx}: {err}"),
                    ErrorKind::Other,
                )
            })?;
        let kind = match item {
            OutputItem::Message { content } => {
                OutputKind::Message(proto::content_blocks(&raw, content))
            }
            OutputItem::FunctionCall {
                call_id,
                name,
                arguments,
            } => OutputKind::FunctionCall(FunctionCall {
                call_id,
                name,
                arguments,
            }),
            OutputItem::Other => {
                OutputKind::Unknown(proto::item_type(&raw).to_owned())
            }
        };
        trace!("got output item: {kind:?}");

        let id = raw
            .get("id")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| format!("{response_id}:{idx}"));
        output.push(OutputEntry {
            kind,
            opaque: OpaqueMessage::new(id, raw),
        });
    }

    Ok(ModelResponse { output })
}
