use std::collections::HashMap;
use std::fmt::{self, Debug};

use chat_assistant_model::{FunctionCall, FunctionCallOutput, ModelTool};
use tracing::Instrument;

use super::object::{ToolObject, ToolObjectImpl};
use super::{Error, Tool, ToolDescriptor, Toolset};

struct Entry {
    descriptor: ToolDescriptor,
    tool: Box<dyn ToolObject>,
}

/// The set of tools the model may call, keyed by name.
///
/// Tools are kept in registration order, which is also the order they are
/// advertised to the model. Registering a tool under a name that is already
/// taken replaces the earlier tool but keeps its position.
#[derive(Default)]
pub struct Registry {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// Creates an empty registry.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool with the descriptor it derives from its input type.
    pub fn register<T: Tool>(&mut self, tool: T) {
        let descriptor = tool.descriptor();
        self.insert(descriptor, tool);
    }

    /// Registers a tool with an explicit descriptor.
    ///
    /// The descriptor is renamed after the tool, since the tool's name is
    /// what dispatch looks up.
    pub fn register_with_descriptor<T: Tool>(
        &mut self,
        tool: T,
        mut descriptor: ToolDescriptor,
    ) {
        if descriptor.name() != tool.name() {
            debug!(
                "renaming descriptor `{}` to `{}`",
                descriptor.name(),
                tool.name()
            );
            descriptor.set_name(tool.name());
        }
        self.insert(descriptor, tool);
    }

    /// Registers every tool of a toolset.
    #[inline]
    pub fn register_all<S: Toolset>(&mut self, toolset: S) {
        toolset.register(self);
    }

    fn insert<T: Tool>(&mut self, descriptor: ToolDescriptor, tool: T) {
        let entry = Entry {
            descriptor,
            tool: Box::new(ToolObjectImpl(tool)),
        };
        let name = entry.descriptor.name().to_owned();
        if let Some(&idx) = self.index.get(&name) {
            warn!("tool `{name}` is already registered, replacing it");
            self.entries[idx] = entry;
            return;
        }
        trace!("registered tool `{name}`");
        self.index.insert(name, self.entries.len());
        self.entries.push(entry);
    }

    /// Returns the descriptors of all tools, in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.entries.iter().map(|entry| &entry.descriptor)
    }

    /// Renders all tools as definitions for a model request.
    pub fn definitions(&self) -> Vec<ModelTool> {
        self.descriptors()
            .map(ToolDescriptor::to_model_tool)
            .collect()
    }

    /// Returns the descriptor of the tool named `name`.
    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.index
            .get(name)
            .map(|&idx| &self.entries[idx].descriptor)
    }

    /// Returns `true` if a tool named `name` is registered.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns the number of registered tools.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no tool is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Calls the tool the model asked for.
    ///
    /// The output carries the call id of the request. Errors of the tool
    /// itself are kept as the source of the returned error.
    pub async fn dispatch(
        &self,
        call: &FunctionCall,
    ) -> Result<FunctionCallOutput, Error> {
        let Some(&idx) = self.index.get(&call.name) else {
            return Err(Error::unknown_tool()
                .with_reason(format!("no tool named `{}`", call.name)));
        };

        let span = debug_span!("tool dispatch", name = %call.name, call_id = %call.call_id);
        let tool = &self.entries[idx].tool;
        let output = span
            .in_scope(|| tool.call(&call.arguments))
            .instrument(span)
            .await?;
        trace!("tool `{}` returned {output}", call.name);
        Ok(FunctionCallOutput {
            call_id: call.call_id.clone(),
            output,
        })
    }
}

impl Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.descriptors().map(ToolDescriptor::name))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;
    use std::error::Error as StdError;
    use std::fmt::Display;
    use std::sync::{Arc, Mutex};

    use schemars::JsonSchema;
    use serde::Deserialize;

    use super::*;
    use crate::tool::{self, ErrorKind, ParameterType};

    /// Adds two integers.
    #[derive(Deserialize, JsonSchema)]
    struct AddParameters {
        a: i64,
        b: i64,
    }

    #[derive(Deserialize, JsonSchema)]
    struct Empty {}

    #[derive(Debug)]
    struct Overheated;

    impl Display for Overheated {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("overheated")
        }
    }

    impl StdError for Overheated {}

    fn add_registry() -> Registry {
        let mut registry = Registry::new();
        registry.register(tool::function("add", |p: AddParameters| {
            Ok::<_, Infallible>(p.a + p.b)
        }));
        registry
    }

    fn call(call_id: &str, name: &str, arguments: &str) -> FunctionCall {
        FunctionCall {
            call_id: call_id.to_owned(),
            name: name.to_owned(),
            arguments: arguments.to_owned(),
        }
    }

    #[tokio::test]
    async fn test_add() {
        let registry = add_registry();

        let descriptor = registry.get("add").unwrap();
        assert_eq!(descriptor.required().collect::<Vec<_>>(), ["a", "b"]);
        assert!(
            descriptor
                .parameters()
                .iter()
                .all(|p| p.ty == ParameterType::Integer)
        );

        let output = registry
            .dispatch(&call("c1", "add", r#"{"a":2,"b":3}"#))
            .await
            .unwrap();
        assert_eq!(output.call_id, "c1");
        assert_eq!(output.output, "5");
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let registry = add_registry();
        let err = registry
            .dispatch(&call("c1", "weather", "{}"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownTool);
    }

    #[tokio::test]
    async fn test_malformed_arguments() {
        let registry = add_registry();
        for arguments in ["not json", r#"{"a":"two","b":3}"#, r#"{"a":2}"#] {
            let err = registry
                .dispatch(&call("c1", "add", arguments))
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedArguments, "{arguments}");
        }
    }

    #[tokio::test]
    async fn test_tool_runs_in_dispatch_span() {
        let _guard =
            tracing::subscriber::set_default(tracing_subscriber::registry());
        let span_name = Arc::new(Mutex::new(None));
        let mut registry = Registry::new();
        registry.register(tool::function("where", {
            let span_name = Arc::clone(&span_name);
            move |_: Empty| {
                *span_name.lock().unwrap() =
                    tracing::Span::current().metadata().map(|m| m.name());
                Ok::<_, Infallible>(())
            }
        }));

        registry
            .dispatch(&call("c1", "where", "{}"))
            .await
            .unwrap();
        assert_eq!(*span_name.lock().unwrap(), Some("tool dispatch"));
    }

    #[tokio::test]
    async fn test_execution_error_keeps_source() {
        let mut registry = Registry::new();
        registry.register(tool::function("fan", |_: Empty| {
            Err::<(), _>(Overheated)
        }));

        let err = registry
            .dispatch(&call("c1", "fan", "{}"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExecutionError);
        assert!(err.source().unwrap().is::<Overheated>());
    }

    #[tokio::test]
    async fn test_last_registration_wins() {
        let mut registry = add_registry();
        registry.register(tool::function("noop", |_: Empty| {
            Ok::<_, Infallible>(())
        }));
        registry.register(tool::function("add", |p: AddParameters| {
            Ok::<_, Infallible>(p.a * p.b)
        }));

        let names: Vec<_> = registry.descriptors().map(|d| d.name()).collect();
        assert_eq!(names, ["add", "noop"]);
        assert_eq!(registry.len(), 2);

        let output = registry
            .dispatch(&call("c1", "add", r#"{"a":2,"b":3}"#))
            .await
            .unwrap();
        assert_eq!(output.output, "6");

        let output = registry
            .dispatch(&call("c2", "noop", "{}"))
            .await
            .unwrap();
        assert_eq!(output.output, "null");
    }

    #[test]
    fn test_register_with_descriptor() {
        let mut registry = Registry::new();
        registry.register_with_descriptor(
            tool::function("add", |p: AddParameters| {
                Ok::<_, Infallible>(p.a + p.b)
            }),
            ToolDescriptor::new("sum", "Sums things.")
                .with_required("a", ParameterType::Number, "First.")
                .with_required("b", ParameterType::Number, "Second."),
        );

        assert!(registry.contains("add"));
        assert!(!registry.contains("sum"));
        let definitions = registry.definitions();
        assert_eq!(definitions[0].name, "add");
        assert_eq!(definitions[0].description, "Sums things.");
        assert_eq!(definitions[0].parameters["properties"]["a"]["type"], "number");
    }

    #[test]
    fn test_register_all() {
        struct Arithmetic;

        impl Toolset for Arithmetic {
            fn register(self, registry: &mut Registry) {
                registry.register(tool::function("add", |p: AddParameters| {
                    Ok::<_, Infallible>(p.a + p.b)
                }));
                registry.register(tool::function("sub", |p: AddParameters| {
                    Ok::<_, Infallible>(p.a - p.b)
                }));
            }
        }

        let mut registry = Registry::new();
        registry.register_all(Arithmetic);
        assert_eq!(format!("{registry:?}"), r#"["add", "sub"]"#);
        assert!(
            registry
                .definitions()
                .iter()
                .all(|d| d.parameters["additionalProperties"] == false)
        );
    }
}
