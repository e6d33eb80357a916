// ── Schema descriptors ──
//
// Describes every resource and data source to the host runtime. Each
// model type implements `SchemaType`; its `Serialize` impl produces the
// matching value. `AttrType::conforms` checks the two against each other.

use serde::Serialize;
use serde_json::Value;

use crate::attr::UNKNOWN;

/// Who supplies an attribute's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Required,
    Optional,
    Computed,
    OptionalComputed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AttrType {
    String,
    Int64,
    Bool,
    Map { element: Box<AttrType> },
    List { element: Box<AttrType> },
    Object { attributes: Vec<Attribute> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    pub mode: Mode,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub sensitive: bool,
    #[serde(flatten)]
    pub ty: AttrType,
}

impl Attribute {
    pub fn new(name: &'static str, ty: AttrType, mode: Mode) -> Self {
        Self {
            name,
            mode,
            sensitive: false,
            ty,
        }
    }

    pub fn required(name: &'static str, ty: AttrType) -> Self {
        Self::new(name, ty, Mode::Required)
    }

    pub fn optional(name: &'static str, ty: AttrType) -> Self {
        Self::new(name, ty, Mode::Optional)
    }

    pub fn computed(name: &'static str, ty: AttrType) -> Self {
        Self::new(name, ty, Mode::Computed)
    }

    pub fn optional_computed(name: &'static str, ty: AttrType) -> Self {
        Self::new(name, ty, Mode::OptionalComputed)
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }
}

impl AttrType {
    pub fn object<T: SchemaType>() -> Self {
        T::attribute_type()
    }

    pub fn list(element: AttrType) -> Self {
        Self::List {
            element: Box::new(element),
        }
    }

    pub fn list_of<T: SchemaType>() -> Self {
        Self::list(T::attribute_type())
    }

    pub fn string_map() -> Self {
        Self::Map {
            element: Box::new(Self::String),
        }
    }

    /// Check that `value` has the shape this descriptor promises.
    ///
    /// Null and the unknown sentinel are accepted everywhere. Objects
    /// must carry exactly the described keys.
    pub fn conforms(&self, value: &Value) -> Result<(), String> {
        if value.is_null() || value.as_str() == Some(UNKNOWN) {
            return Ok(());
        }
        match (self, value) {
            (Self::String, Value::String(_)) | (Self::Bool, Value::Bool(_)) => Ok(()),
            (Self::Int64, Value::Number(n)) if n.is_i64() => Ok(()),
            (Self::Map { element }, Value::Object(map)) => map
                .iter()
                .try_for_each(|(k, v)| element.conforms(v).map_err(|e| format!("{k}: {e}"))),
            (Self::List { element }, Value::Array(items)) => items
                .iter()
                .enumerate()
                .try_for_each(|(i, v)| element.conforms(v).map_err(|e| format!("[{i}]: {e}"))),
            (Self::Object { attributes }, Value::Object(map)) => {
                for attr in attributes {
                    let field = map
                        .get(attr.name)
                        .ok_or_else(|| format!("missing key `{}`", attr.name))?;
                    attr.ty
                        .conforms(field)
                        .map_err(|e| format!("{}: {e}", attr.name))?;
                }
                match map
                    .keys()
                    .find(|k| !attributes.iter().any(|a| a.name == k.as_str()))
                {
                    Some(extra) => Err(format!("undescribed key `{extra}`")),
                    None => Ok(()),
                }
            }
            (ty, v) => Err(format!("expected {}, got {v}", ty.label())),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int64 => "int64",
            Self::Bool => "bool",
            Self::Map { .. } => "map",
            Self::List { .. } => "list",
            Self::Object { .. } => "object",
        }
    }
}

/// Pairs a model type with its descriptor.
pub trait SchemaType {
    fn attributes() -> Vec<Attribute>;

    fn attribute_type() -> AttrType {
        AttrType::Object {
            attributes: Self::attributes(),
        }
    }
}

/// Top-level schema of a resource, data source or the provider block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    pub version: u32,
    pub attributes: Vec<Attribute>,
}

impl Schema {
    pub fn of<T: SchemaType>() -> Self {
        Self {
            version: 0,
            attributes: T::attributes(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    struct Pair;

    impl SchemaType for Pair {
        fn attributes() -> Vec<Attribute> {
            vec![
                Attribute::required("name", AttrType::String),
                Attribute::computed("count", AttrType::Int64),
                Attribute::optional("labels", AttrType::string_map()),
            ]
        }
    }

    #[test]
    fn conforming_value_passes() {
        let ty = Pair::attribute_type();
        ty.conforms(&json!({"name": "a", "count": 2, "labels": {"k": "v"}}))
            .unwrap();
        ty.conforms(&json!({"name": UNKNOWN, "count": null, "labels": null}))
            .unwrap();
    }

    #[test]
    fn key_mismatch_is_reported() {
        let ty = Pair::attribute_type();
        let err = ty
            .conforms(&json!({"name": "a", "count": 2}))
            .unwrap_err();
        assert!(err.contains("labels"));
        let err = ty
            .conforms(&json!({"name": "a", "count": 2, "labels": null, "extra": 1}))
            .unwrap_err();
        assert!(err.contains("extra"));
    }

    #[test]
    fn type_mismatch_is_reported() {
        let err = AttrType::list(AttrType::Int64)
            .conforms(&json!([1, 2.5]))
            .unwrap_err();
        assert!(err.starts_with("[1]"));
    }

    #[test]
    fn schema_serializes_with_flat_type_tag() {
        let schema = Schema::of::<Pair>();
        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(
            value["attributes"][0],
            json!({"name": "name", "mode": "required", "type": "string"})
        );
        assert_eq!(
            value["attributes"][2],
            json!({"name": "labels", "mode": "optional", "type": "map", "element": {"type": "string"}})
        );
    }
}
