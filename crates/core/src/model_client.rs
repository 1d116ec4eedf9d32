use std::pin::Pin;
use std::sync::Arc;

use chat_assistant_model::{
    ModelProvider, ModelProviderError, ModelRequest, ModelResponse,
};
use tracing::Instrument;

type SendRequestResult = Result<ModelResponse, Box<dyn ModelProviderError>>;
type BoxedSendRequestFuture =
    Pin<Box<dyn Future<Output = SendRequestResult> + Send>>;
type HandlerFn =
    Arc<dyn Fn(&ModelRequest) -> BoxedSendRequestFuture + Send + Sync>;

/// A wrapper around a model provider that provides a type-erased
/// interface for the other modules.
#[derive(Clone)]
pub struct ModelClient {
    handler_fn: HandlerFn,
}

impl ModelClient {
    #[inline]
    pub fn new<P: ModelProvider + 'static>(provider: P) -> Self {
        // We have to erase the type `P`, since `ModelClient` doesn't have a
        // generic parameter and we don't want it either.
        let handler_fn: HandlerFn = Arc::new(
            move |req: &ModelRequest| -> BoxedSendRequestFuture {
                trace!("sending a request: {req:?}");
                let fut = provider.send_request(req);
                Box::pin(
                    async move {
                        match fut.await {
                            Ok(resp) => {
                                trace!("got {} output entries", resp.output.len());
                                Ok(resp)
                            }
                            Err(err) => {
                                error!("got an error: {err:?}");
                                Err(Box::new(err) as Box<dyn ModelProviderError>)
                            }
                        }
                    }
                    .instrument(trace_span!("model client req")),
                )
            },
        );
        Self { handler_fn }
    }

    /// Sends a request and waits for the complete response.
    #[inline]
    pub async fn send_request(&self, req: &ModelRequest) -> SendRequestResult {
        (self.handler_fn)(req).await
    }
}

#[cfg(test)]
mod tests {
    use chat_assistant_model::{ErrorKind, ModelMessage, OutputKind};
    use chat_assistant_test_model::{PresetResponse, TestModelProvider};

    use super::*;

    fn request() -> ModelRequest {
        ModelRequest {
            model: "test".to_owned(),
            messages: vec![ModelMessage::User("Hi".to_owned())],
            tools: vec![],
        }
    }

    #[tokio::test]
    async fn test_send_request() {
        let model_provider = TestModelProvider::default();
        for _ in 0..3 {
            model_provider.add_response(PresetResponse::message("How are you?"));
        }

        let model_client = ModelClient::new(model_provider.clone());
        for _ in 0..3 {
            let resp = model_client.send_request(&request()).await.unwrap();
            assert!(matches!(
                &resp.output[0].kind,
                OutputKind::Message(blocks) if blocks[0].text() == Some("How are you?")
            ));
        }
        assert_eq!(model_provider.request_count(), 3);
    }

    #[tokio::test]
    async fn test_error_handling() {
        let model_provider = TestModelProvider::default();
        let model_client = ModelClient::new(model_provider);
        let err = model_client.send_request(&request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
    }
}
