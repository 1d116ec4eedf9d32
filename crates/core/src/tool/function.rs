use std::error::Error as StdError;
use std::fmt::{self, Debug};
use std::marker::PhantomData;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{Error, Tool};

/// A [`Tool`] backed by a plain function.
///
/// Created with [`function`].
pub struct FunctionTool<F, I, O, E> {
    name: String,
    func: Arc<F>,
    _marker: PhantomData<fn(I) -> Result<O, E>>,
}

/// Wraps a function as a tool named `name`.
///
/// The function's error becomes the source of an `ExecutionError`.
///
/// # Example
///
/// ```
/// use std::convert::Infallible;
///
/// use chat_assistant_core::tool;
/// use schemars::JsonSchema;
/// use serde::Deserialize;
///
/// /// Adds two integers.
/// #[derive(Deserialize, JsonSchema)]
/// struct AddParameters {
///     a: i64,
///     b: i64,
/// }
///
/// let add = tool::function("add", |p: AddParameters| {
///     Ok::<_, Infallible>(p.a + p.b)
/// });
/// ```
pub fn function<F, I, O, E>(name: &str, func: F) -> FunctionTool<F, I, O, E>
where
    F: Fn(I) -> Result<O, E> + Send + Sync + 'static,
{
    FunctionTool {
        name: name.to_owned(),
        func: Arc::new(func),
        _marker: PhantomData,
    }
}

impl<F, I, O, E> Tool for FunctionTool<F, I, O, E>
where
    F: Fn(I) -> Result<O, E> + Send + Sync + 'static,
    I: DeserializeOwned + JsonSchema + Send + 'static,
    O: Serialize + Send + 'static,
    E: StdError + Send + Sync + 'static,
{
    type Input = I;
    type Output = O;

    #[inline]
    fn name(&self) -> &str {
        &self.name
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        input: Self::Input,
    ) -> impl Future<Output = Result<Self::Output, Error>> + Send + 'static
    {
        // Called when polled, so the function runs inside the caller's span.
        let func = Arc::clone(&self.func);
        async move {
            (*func)(input)
                .map_err(|err| Error::execution_error().with_source(err))
        }
    }
}

impl<F, I, O, E> Debug for FunctionTool<F, I, O, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionTool")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
