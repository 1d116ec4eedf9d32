//! Tool descriptors and their derivation from input types.
//!
//! A [`ToolDescriptor`] is what the model sees of a tool: its name, what it
//! does, and the parameters it takes. Descriptors can be written by hand
//! with the builder methods, or derived from a tool's input type with
//! [`describe`], which reads the JSON schema `schemars` generates for the
//! type.

use std::fmt::{self, Display};

use chat_assistant_model::ModelTool;
use schemars::JsonSchema;
use serde_json::{Map, Value, json};

/// Description used when the input type has no doc comment.
pub const NO_DESCRIPTION: &str = "No description provided.";

// `$ref` chains longer than this are treated as unknown types.
const MAX_REF_DEPTH: usize = 8;

/// The JSON type of a tool parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ParameterType {
    /// Any parameter whose type is not one of the others.
    #[default]
    String,
    /// A whole number.
    Integer,
    /// Any JSON number.
    Number,
    /// `true` or `false`.
    Boolean,
    /// A JSON array.
    Array,
    /// A JSON object.
    Object,
}

impl ParameterType {
    /// Maps a JSON schema type name to a parameter type.
    ///
    /// Names outside the supported set, such as `"null"`, map to `String`.
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "integer" => ParameterType::Integer,
            "number" => ParameterType::Number,
            "boolean" => ParameterType::Boolean,
            "array" => ParameterType::Array,
            "object" => ParameterType::Object,
            _ => ParameterType::String,
        }
    }

    /// Returns the JSON schema type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterType::String => "string",
            ParameterType::Integer => "integer",
            ParameterType::Number => "number",
            ParameterType::Boolean => "boolean",
            ParameterType::Array => "array",
            ParameterType::Object => "object",
        }
    }
}

impl Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parameter of a tool.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParameterSpec {
    /// Name of the parameter, as it appears in the arguments object.
    pub name: String,
    /// JSON type of the parameter.
    pub ty: ParameterType,
    /// What the parameter means, shown to the model.
    pub description: String,
    /// Whether the model must always provide this parameter.
    pub required: bool,
}

/// The structured description of a tool advertised to the model.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ToolDescriptor {
    name: String,
    description: String,
    parameters: Vec<ParameterSpec>,
}

impl ToolDescriptor {
    /// Creates a descriptor without parameters.
    #[inline]
    pub fn new<S1: Into<String>, S2: Into<String>>(
        name: S1,
        description: S2,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: vec![],
        }
    }

    /// Adds a parameter the model must provide.
    #[inline]
    pub fn with_required<S1, S2>(
        self,
        name: S1,
        ty: ParameterType,
        description: S2,
    ) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        self.with_parameter(name.into(), ty, description.into(), true)
    }

    /// Adds a parameter the model may leave out.
    #[inline]
    pub fn with_optional<S1, S2>(
        self,
        name: S1,
        ty: ParameterType,
        description: S2,
    ) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        self.with_parameter(name.into(), ty, description.into(), false)
    }

    fn with_parameter(
        mut self,
        name: String,
        ty: ParameterType,
        description: String,
        required: bool,
    ) -> Self {
        // A later declaration of the same name wins.
        self.parameters.retain(|p| p.name != name);
        self.parameters.push(ParameterSpec {
            name,
            ty,
            description,
            required,
        });
        self
    }

    /// Returns the name the model calls the tool by.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description of the tool.
    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the parameters, in declaration order.
    #[inline]
    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    /// Returns the names of required parameters, in declaration order.
    pub fn required(&self) -> impl Iterator<Item = &str> {
        self.parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        name.clone_into(&mut self.name);
    }

    /// Renders the parameter schema sent to the model.
    ///
    /// The schema never allows properties that are not declared.
    pub fn parameters_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .parameters
            .iter()
            .map(|p| {
                let property = json!({
                    "type": p.ty.as_str(),
                    "description": p.description,
                });
                (p.name.clone(), property)
            })
            .collect();
        json!({
            "type": "object",
            "properties": properties,
            "required": self.required().collect::<Vec<_>>(),
            "additionalProperties": false,
        })
    }

    /// Converts the descriptor into the model-agnostic tool definition.
    #[inline]
    pub fn to_model_tool(&self) -> ModelTool {
        ModelTool {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.parameters_schema(),
        }
    }
}

/// Derives a descriptor for a tool whose input type is `T`.
///
/// See [`describe_schema`] for the rules.
pub fn describe<T: JsonSchema>(name: &str) -> ToolDescriptor {
    let schema = schemars::schema_for!(T);
    describe_schema(name, schema.as_value())
}

/// Derives a descriptor from the JSON schema of a tool's input.
///
/// - The description is the schema's root `description`, or
///   [`NO_DESCRIPTION`].
/// - Every entry of `properties` becomes a parameter, in order. Its type is
///   the schema type when that is one of the six supported names, and
///   `string` otherwise, including when the property has no type at all.
///   Nullable types use their non-null member, and `$ref`s are followed.
/// - A parameter is required if and only if the schema lists it in
///   `required`, which `schemars` does exactly for fields without a
///   default.
pub fn describe_schema(name: &str, schema: &Value) -> ToolDescriptor {
    let description = schema
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or(NO_DESCRIPTION);
    let mut descriptor = ToolDescriptor::new(name, description);

    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let Some(properties) = schema.get("properties").and_then(Value::as_object)
    else {
        trace!("input of `{name}` has no properties");
        return descriptor;
    };

    for (param_name, property) in properties {
        let ty = resolve_type(property, schema, 0);
        let description = property
            .get("description")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| format!("{param_name} parameter"));
        let is_required = required.contains(&param_name.as_str());
        descriptor = descriptor.with_parameter(
            param_name.clone(),
            ty,
            description,
            is_required,
        );
    }
    descriptor
}

fn resolve_type(schema: &Value, root: &Value, depth: usize) -> ParameterType {
    if depth > MAX_REF_DEPTH {
        return ParameterType::String;
    }

    match schema.get("type") {
        Some(Value::String(name)) => {
            return ParameterType::from_type_name(name);
        }
        Some(Value::Array(names)) => {
            let name = names
                .iter()
                .filter_map(Value::as_str)
                .find(|name| *name != "null");
            return name
                .map(ParameterType::from_type_name)
                .unwrap_or_default();
        }
        _ => {}
    }

    if let Some(reference) = schema.get("$ref").and_then(Value::as_str) {
        return lookup_definition(root, reference)
            .map(|target| resolve_type(target, root, depth + 1))
            .unwrap_or_default();
    }

    for key in ["anyOf", "oneOf"] {
        let Some(variants) = schema.get(key).and_then(Value::as_array) else {
            continue;
        };
        let non_null = variants
            .iter()
            .find(|variant| variant.get("type").and_then(Value::as_str) != Some("null"));
        if let Some(variant) = non_null {
            return resolve_type(variant, root, depth + 1);
        }
    }

    ParameterType::String
}

fn lookup_definition<'a>(root: &'a Value, reference: &str) -> Option<&'a Value> {
    let pointer = reference.strip_prefix('#')?;
    root.pointer(pointer)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use schemars::JsonSchema;
    use serde::Deserialize;

    use super::*;

    /// Adds two integers.
    #[allow(dead_code)]
    #[derive(Deserialize, JsonSchema)]
    struct AddParameters {
        a: i64,
        b: i64,
    }

    #[allow(dead_code)]
    #[derive(Deserialize, JsonSchema)]
    struct Location {
        city: String,
    }

    #[allow(dead_code)]
    #[derive(Deserialize, JsonSchema)]
    #[serde(rename_all = "snake_case")]
    enum Units {
        Metric,
        Imperial,
    }

    #[allow(dead_code)]
    #[derive(Deserialize, JsonSchema)]
    struct MixedParameters {
        /// The text to search for.
        query: String,
        limit: Option<u32>,
        #[serde(default)]
        exact: bool,
        ratio: f64,
        tags: Vec<String>,
        headers: HashMap<String, String>,
        location: Location,
        fallback: Option<Location>,
        units: Units,
    }

    #[test]
    fn test_add_scenario() {
        let descriptor = describe::<AddParameters>("add");
        assert_eq!(descriptor.name(), "add");
        assert_eq!(descriptor.description(), "Adds two integers.");
        assert_eq!(descriptor.required().collect::<Vec<_>>(), ["a", "b"]);
        assert!(
            descriptor
                .parameters()
                .iter()
                .all(|p| p.ty == ParameterType::Integer)
        );
        assert_eq!(descriptor.parameters()[0].description, "a parameter");
    }

    #[test]
    fn test_required_iff_no_default() {
        let descriptor = describe::<MixedParameters>("mixed");
        let optional: Vec<_> = descriptor
            .parameters()
            .iter()
            .filter(|p| !p.required)
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(optional, ["limit", "exact", "fallback"]);
    }

    #[test]
    fn test_type_mapping() {
        let descriptor = describe::<MixedParameters>("mixed");
        let types: Vec<_> = descriptor
            .parameters()
            .iter()
            .map(|p| (p.name.as_str(), p.ty))
            .collect();
        assert_eq!(
            types,
            [
                ("query", ParameterType::String),
                ("limit", ParameterType::Integer),
                ("exact", ParameterType::Boolean),
                ("ratio", ParameterType::Number),
                ("tags", ParameterType::Array),
                ("headers", ParameterType::Object),
                ("location", ParameterType::Object),
                ("fallback", ParameterType::Object),
                ("units", ParameterType::String),
            ]
        );
        assert_eq!(descriptor.description(), NO_DESCRIPTION);
        assert_eq!(
            descriptor.parameters()[0].description,
            "The text to search for."
        );
    }

    #[test]
    fn test_unsupported_and_missing_types() {
        let schema = json!({
            "type": "object",
            "properties": {
                "when": { "type": "null" },
                "blob": {},
                "flag": true,
                "dangling": { "$ref": "#/$defs/Missing" }
            },
            "required": ["when", "blob", "flag", "dangling"]
        });
        let descriptor = describe_schema("odd", &schema);
        assert!(
            descriptor
                .parameters()
                .iter()
                .all(|p| p.ty == ParameterType::String && p.required)
        );
    }

    #[test]
    fn test_parameters_schema() {
        let descriptor = ToolDescriptor::new("search", "Searches the FAQ.")
            .with_required("query", ParameterType::String, "What to look for.")
            .with_optional("num_results", ParameterType::Integer, "How many.");
        assert_eq!(
            descriptor.parameters_schema(),
            json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "What to look for."
                    },
                    "num_results": {
                        "type": "integer",
                        "description": "How many."
                    }
                },
                "required": ["query"],
                "additionalProperties": false
            })
        );
    }

    #[test]
    fn test_additional_properties_always_false() {
        for descriptor in [
            describe::<AddParameters>("add"),
            describe::<MixedParameters>("mixed"),
            describe_schema("empty", &json!({})),
        ] {
            assert_eq!(
                descriptor.parameters_schema()["additionalProperties"],
                json!(false)
            );
        }
    }
}
