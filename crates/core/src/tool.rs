//! Tool call supports.

mod error;
mod function;
mod object;
mod registry;
pub mod schema;

use schemars::JsonSchema;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use error::{Error, ErrorKind};
pub use function::{FunctionTool, function};
pub use registry::Registry;
pub use schema::{ParameterSpec, ParameterType, ToolDescriptor};

/// A tool that can be called by the model.
///
/// The model calls a tool by name with a JSON object of arguments, which is
/// deserialized into [`Tool::Input`]. Whatever the tool returns is encoded
/// as JSON and handed back to the model.
///
/// Derive [`JsonSchema`] for the input type and document it: the doc comment
/// of the type describes the tool, and the doc comments of its fields
/// describe the parameters. Fields that are `Option` or `#[serde(default)]`
/// are optional, the rest are required.
pub trait Tool: Send + Sync + 'static {
    /// The type of input that the tool accepts.
    type Input: DeserializeOwned + JsonSchema;

    /// The type of value that the tool returns.
    type Output: Serialize + Send + 'static;

    /// Returns the name of the tool.
    fn name(&self) -> &str;

    /// Returns the descriptor advertised to the model.
    ///
    /// The default derives it from the schema of [`Tool::Input`].
    fn descriptor(&self) -> ToolDescriptor {
        schema::describe::<Self::Input>(self.name())
    }

    /// Executes the tool with the given input.
    ///
    /// This method must return a future that is fully independent of `self`.
    /// Errors should be created with [`Error::execution_error`] and carry
    /// the underlying error as their source.
    fn execute(
        &self,
        input: Self::Input,
    ) -> impl Future<Output = Result<Self::Output, Error>> + Send + 'static;
}

/// A group of tools that are registered together.
pub trait Toolset {
    /// Registers every tool in the set.
    fn register(self, registry: &mut Registry);
}
