//! A local fake model for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chat_assistant_model::{
    ContentBlock, ErrorKind, ModelProvider, ModelProviderError, ModelRequest,
    ModelResponse, OpaqueMessage, OutputEntry, OutputKind,
};
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    #[allow(dead_code)]
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[derive(Default)]
struct Script {
    responses: VecDeque<PresetResponse>,
    requests: Vec<ModelRequest>,
}

/// A local fake model for testing purpose.
///
/// Before sending requests, you need to queue the responses the model should
/// give, one per request. Each request takes the next queued response, and
/// fails once the queue runs dry. Every request is recorded, so tests can
/// check how many times the model was called and what it was sent.
///
/// Clones share the same script and request log, so a test can keep one
/// clone while the other is moved into the code under test.
///
/// # Note
///
/// This type is not optimized for production use, there are heavy memory
/// copies involved. You should only use it for testing.
#[derive(Clone, Default)]
pub struct TestModelProvider {
    script: Arc<Mutex<Script>>,
    delay: Option<Duration>,
}

impl TestModelProvider {
    #[inline]
    pub fn add_response(&self, preset: PresetResponse) {
        self.script().responses.push_back(preset);
    }

    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns all requests received so far.
    #[inline]
    pub fn requests(&self) -> Vec<ModelRequest> {
        self.script().requests.clone()
    }

    #[inline]
    pub fn request_count(&self) -> usize {
        self.script().requests.len()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ModelProvider for TestModelProvider {
    type Error = crate::Error;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelResponse, Self::Error>> + Send + 'static
    {
        let result = {
            let mut script = self.script();
            script.requests.push(req.clone());
            let request_idx = script.requests.len();
            match script.responses.pop_front() {
                Some(preset) => Ok(make_response(request_idx, preset)),
                None => Err(Error {
                    message: "no enough steps",
                    kind: ErrorKind::Other,
                }),
            }
        };
        let delay = self.delay;

        async move {
            if let Some(delay) = delay {
                sleep(delay).await;
            }
            result
        }
    }
}

fn make_response(request_idx: usize, preset: PresetResponse) -> ModelResponse {
    let output = preset
        .entries
        .into_iter()
        .enumerate()
        .map(|(entry_idx, entry)| {
            let kind = match &entry {
                PresetEntry::Message(text) => {
                    OutputKind::Message(vec![ContentBlock::Text(text.clone())])
                }
                PresetEntry::FunctionCall(call) => {
                    OutputKind::FunctionCall(call.clone())
                }
                PresetEntry::Other(tag) => OutputKind::Unknown(tag.clone()),
            };
            let id = format!("resp:{request_idx}:{entry_idx}");
            OutputEntry {
                kind,
                opaque: OpaqueMessage::new(id, entry),
            }
        })
        .collect();
    ModelResponse { output }
}

#[cfg(test)]
mod tests {
    use chat_assistant_model::{FunctionCall, ModelMessage};
    use tokio::time::Instant;

    use super::*;

    fn request(messages: Vec<ModelMessage>) -> ModelRequest {
        ModelRequest {
            model: "test".to_owned(),
            messages,
            tools: vec![],
        }
    }

    #[tokio::test]
    async fn test_send_request() {
        let provider = TestModelProvider::default();
        provider.add_response(PresetResponse::message("Hello, world!"));
        provider.add_response(PresetResponse::with_entries([
            PresetEntry::Message("Sure, let me take a look.".to_owned()),
            PresetEntry::function_call("c1", "search", r#"{"query":"todo"}"#),
        ]));

        let mut req = request(vec![ModelMessage::User("Hi".to_owned())]);
        let resp = provider.send_request(&req).await.unwrap();
        assert_eq!(
            resp.output[0].kind,
            OutputKind::Message(vec![ContentBlock::Text(
                "Hello, world!".to_owned()
            )])
        );

        req.messages
            .push(ModelMessage::Opaque(resp.output[0].opaque.clone()));
        req.messages
            .push(ModelMessage::User("Check my todo".to_owned()));
        let resp = provider.send_request(&req).await.unwrap();
        assert_eq!(resp.output.len(), 2);
        assert_eq!(
            resp.output[1].kind,
            OutputKind::FunctionCall(FunctionCall {
                call_id: "c1".to_owned(),
                name: "search".to_owned(),
                arguments: r#"{"query":"todo"}"#.to_owned(),
            })
        );
        assert_eq!(resp.output[1].opaque.id(), "resp:2:1");

        let requests = provider.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].messages.len(), 3);
    }

    #[tokio::test]
    async fn test_script_exhausted() {
        let provider = TestModelProvider::default();
        let err = provider
            .send_request(&request(vec![]))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
        assert_eq!(provider.request_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay() {
        let mut provider = TestModelProvider::default();
        provider.set_delay(Duration::from_secs(3));
        provider.add_response(PresetResponse::message("Late."));

        let started = Instant::now();
        provider.send_request(&request(vec![])).await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(3));
    }
}
