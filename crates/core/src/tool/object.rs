use std::pin::Pin;

use serde_json::Value;

use super::{Error, Tool};

pub(crate) type BoxedCallFuture =
    Pin<Box<dyn Future<Output = Result<String, Error>> + Send>>;

/// Type-erased form of a [`Tool`], called with raw argument text.
pub(crate) trait ToolObject: Send + Sync + 'static {
    fn call(&self, arguments: &str) -> BoxedCallFuture;
}

pub(crate) struct ToolObjectImpl<T: Tool>(pub T);

impl<T: Tool> ToolObject for ToolObjectImpl<T> {
    fn call(&self, arguments: &str) -> BoxedCallFuture {
        let value: Value = match serde_json::from_str(arguments) {
            Ok(value) => value,
            Err(err) => {
                return Box::pin(std::future::ready(Err(
                    Error::malformed_arguments()
                        .with_reason(format!("arguments are not JSON: {err}")),
                )));
            }
        };
        let input: T::Input = match serde_json::from_value(value) {
            Ok(input) => input,
            Err(err) => {
                return Box::pin(std::future::ready(Err(
                    Error::malformed_arguments().with_reason(format!("{err}")),
                )));
            }
        };

        let fut = self.0.execute(input);
        Box::pin(async move {
            let output = fut.await?;
            serde_json::to_string(&output).map_err(|err| {
                Error::execution_error()
                    .with_reason(format!("failed to serialize output: {err}"))
                    .with_source(err)
            })
        })
    }
}
