//! Core value types for tfplug
//!
//! `Dynamic` is the in-memory form of any Terraform value. `DynamicValue`
//! wraps it with path-based accessors, the msgpack/JSON wire encodings and a
//! serde bridge so providers can decode whole objects into typed models.

use crate::error::{Result, TfplugError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Marker used when an unknown value has to cross a serde boundary
const UNKNOWN_SENTINEL: &str = "__unknown__";

/// Dynamic represents Terraform values that can be of any type
/// Objects and maps share the `Map` variant
#[derive(Debug, Clone, PartialEq)]
pub enum Dynamic {
    Null,
    Bool(bool),
    /// All numbers are f64 to match Terraform
    Number(f64),
    String(String),
    List(Vec<Dynamic>),
    Map(HashMap<String, Dynamic>),
    /// Value not yet known (during planning)
    Unknown,
}

impl Dynamic {
    pub fn type_name(&self) -> &'static str {
        match self {
            Dynamic::Null => "null",
            Dynamic::Bool(_) => "bool",
            Dynamic::Number(_) => "number",
            Dynamic::String(_) => "string",
            Dynamic::List(_) => "list",
            Dynamic::Map(_) => "map",
            Dynamic::Unknown => "unknown",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Dynamic::String(s) => Some(s),
            _ => None,
        }
    }

    /// Converts to a JSON value for model decoding.
    /// Unknown becomes null and integral numbers become integers so that
    /// `i64` model fields decode cleanly.
    fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;

        match self {
            Dynamic::Null | Dynamic::Unknown => Value::Null,
            Dynamic::Bool(b) => Value::Bool(*b),
            Dynamic::Number(n) => {
                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    Value::from(*n as i64)
                } else {
                    serde_json::Number::from_f64(*n)
                        .map(Value::Number)
                        .unwrap_or(Value::Null)
                }
            }
            Dynamic::String(s) => Value::String(s.clone()),
            Dynamic::List(items) => Value::Array(items.iter().map(Dynamic::to_json).collect()),
            Dynamic::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    fn from_json(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Dynamic::Null,
            Value::Bool(b) => Dynamic::Bool(b),
            Value::Number(n) => Dynamic::Number(n.as_f64().unwrap_or_default()),
            Value::String(s) => Dynamic::String(s),
            Value::Array(items) => Dynamic::List(items.into_iter().map(Dynamic::from_json).collect()),
            Value::Object(map) => Dynamic::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Dynamic::from_json(v)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for Dynamic {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Dynamic::Null => serializer.serialize_unit(),
            Dynamic::Bool(b) => serializer.serialize_bool(*b),
            Dynamic::Number(n) => serializer.serialize_f64(*n),
            Dynamic::String(s) => serializer.serialize_str(s),
            Dynamic::List(l) => l.serialize(serializer),
            Dynamic::Map(m) => m.serialize(serializer),
            Dynamic::Unknown => serializer.serialize_str(UNKNOWN_SENTINEL),
        }
    }
}

impl<'de> Deserialize<'de> for Dynamic {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, Visitor};
        use std::fmt;

        struct DynamicVisitor;

        impl<'de> Visitor<'de> for DynamicVisitor {
            type Value = Dynamic;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a terraform value")
            }

            fn visit_unit<E: de::Error>(self) -> std::result::Result<Dynamic, E> {
                Ok(Dynamic::Null)
            }

            fn visit_none<E: de::Error>(self) -> std::result::Result<Dynamic, E> {
                Ok(Dynamic::Null)
            }

            fn visit_some<D2>(self, deserializer: D2) -> std::result::Result<Dynamic, D2::Error>
            where
                D2: serde::Deserializer<'de>,
            {
                Dynamic::deserialize(deserializer)
            }

            fn visit_bool<E: de::Error>(self, value: bool) -> std::result::Result<Dynamic, E> {
                Ok(Dynamic::Bool(value))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<Dynamic, E> {
                Ok(Dynamic::Number(value as f64))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<Dynamic, E> {
                Ok(Dynamic::Number(value as f64))
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> std::result::Result<Dynamic, E> {
                Ok(Dynamic::Number(value))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<Dynamic, E> {
                if value == UNKNOWN_SENTINEL {
                    Ok(Dynamic::Unknown)
                } else {
                    Ok(Dynamic::String(value.to_string()))
                }
            }

            fn visit_seq<V>(self, mut seq: V) -> std::result::Result<Dynamic, V::Error>
            where
                V: de::SeqAccess<'de>,
            {
                let mut items = Vec::new();
                while let Some(item) = seq.next_element()? {
                    items.push(item);
                }
                Ok(Dynamic::List(items))
            }

            fn visit_map<V>(self, mut map: V) -> std::result::Result<Dynamic, V::Error>
            where
                V: de::MapAccess<'de>,
            {
                let mut values = HashMap::new();
                while let Some((key, value)) = map.next_entry()? {
                    values.insert(key, value);
                }
                Ok(Dynamic::Map(values))
            }
        }

        deserializer.deserialize_any(DynamicVisitor)
    }
}

/// DynamicValue is what gets passed between Terraform and the provider:
/// configs, plans and states are all DynamicValues
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicValue {
    pub value: Dynamic,
}

impl DynamicValue {
    pub fn new(value: Dynamic) -> Self {
        Self { value }
    }

    pub fn null() -> Self {
        Self::new(Dynamic::Null)
    }

    pub fn unknown() -> Self {
        Self::new(Dynamic::Unknown)
    }

    /// Empty object, the usual starting point for a new state
    pub fn object() -> Self {
        Self::new(Dynamic::Map(HashMap::new()))
    }

    /// Encodes a typed model. `None` fields become null attributes.
    pub fn from_model<T: Serialize>(model: &T) -> Result<Self> {
        let json = serde_json::to_value(model)
            .map_err(|e| TfplugError::EncodingError(format!("model encoding failed: {}", e)))?;
        Ok(Self::new(Dynamic::from_json(json)))
    }

    /// Decodes into a typed model. Unknown values decode as null, so
    /// computed attributes that are still unknown in a plan read as `None`.
    pub fn to_model<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.value.to_json())
            .map_err(|e| TfplugError::DecodingError(format!("model decoding failed: {}", e)))
    }

    /// Terraform uses msgpack on the wire; null is encoded as an empty payload
    pub fn encode_msgpack(&self) -> Result<Vec<u8>> {
        if self.is_null() {
            return Ok(Vec::new());
        }
        rmp_serde::encode::to_vec(&self.value)
            .map_err(|e| TfplugError::EncodingError(format!("msgpack encoding failed: {}", e)))
    }

    pub fn decode_msgpack(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Ok(Self::null());
        }
        let value = rmp_serde::decode::from_slice::<Dynamic>(data)
            .map_err(|e| TfplugError::DecodingError(format!("msgpack decoding failed: {}", e)))?;
        Ok(Self::new(value))
    }

    pub fn encode_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(&self.value)
            .map_err(|e| TfplugError::EncodingError(format!("json encoding failed: {}", e)))
    }

    pub fn decode_json(data: &[u8]) -> Result<Self> {
        let value = serde_json::from_slice(data)
            .map_err(|e| TfplugError::DecodingError(format!("json decoding failed: {}", e)))?;
        Ok(Self::new(value))
    }

    pub fn get(&self, path: &AttributePath) -> Result<&Dynamic> {
        self.navigate_path(path)
    }

    pub fn get_string(&self, path: &AttributePath) -> Result<String> {
        match self.navigate_path(path)? {
            Dynamic::String(s) => Ok(s.clone()),
            other => Err(mismatch("string", other)),
        }
    }

    pub fn get_number(&self, path: &AttributePath) -> Result<f64> {
        match self.navigate_path(path)? {
            Dynamic::Number(n) => Ok(*n),
            other => Err(mismatch("number", other)),
        }
    }

    pub fn get_bool(&self, path: &AttributePath) -> Result<bool> {
        match self.navigate_path(path)? {
            Dynamic::Bool(b) => Ok(*b),
            other => Err(mismatch("bool", other)),
        }
    }

    pub fn get_list(&self, path: &AttributePath) -> Result<Vec<Dynamic>> {
        match self.navigate_path(path)? {
            Dynamic::List(l) => Ok(l.clone()),
            other => Err(mismatch("list", other)),
        }
    }

    pub fn get_map(&self, path: &AttributePath) -> Result<HashMap<String, Dynamic>> {
        match self.navigate_path(path)? {
            Dynamic::Map(m) => Ok(m.clone()),
            other => Err(mismatch("map", other)),
        }
    }

    /// Known, non-null string at `path`; anything else is `None`
    pub fn get_string_opt(&self, path: &AttributePath) -> Option<String> {
        self.get_string(path).ok()
    }

    pub fn set(&mut self, path: &AttributePath, value: Dynamic) -> Result<()> {
        self.set_value(path, value)
    }

    pub fn set_string(&mut self, path: &AttributePath, value: String) -> Result<()> {
        self.set_value(path, Dynamic::String(value))
    }

    pub fn set_number(&mut self, path: &AttributePath, value: f64) -> Result<()> {
        self.set_value(path, Dynamic::Number(value))
    }

    pub fn set_bool(&mut self, path: &AttributePath, value: bool) -> Result<()> {
        self.set_value(path, Dynamic::Bool(value))
    }

    pub fn set_list(&mut self, path: &AttributePath, value: Vec<Dynamic>) -> Result<()> {
        self.set_value(path, Dynamic::List(value))
    }

    pub fn set_null(&mut self, path: &AttributePath) -> Result<()> {
        self.set_value(path, Dynamic::Null)
    }

    pub fn mark_unknown(&mut self, path: &AttributePath) -> Result<()> {
        self.set_value(path, Dynamic::Unknown)
    }

    pub fn is_null(&self) -> bool {
        matches!(self.value, Dynamic::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.value, Dynamic::Unknown)
    }

    /// A missing attribute counts as null
    pub fn is_null_at(&self, path: &AttributePath) -> bool {
        matches!(self.navigate_path(path), Ok(Dynamic::Null) | Err(_))
    }

    pub fn is_unknown_at(&self, path: &AttributePath) -> bool {
        matches!(self.navigate_path(path), Ok(Dynamic::Unknown))
    }

    fn navigate_path(&self, path: &AttributePath) -> Result<&Dynamic> {
        let mut current = &self.value;

        for step in &path.steps {
            current = match (current, step) {
                (Dynamic::Map(m), AttributePathStep::AttributeName(name))
                | (Dynamic::Map(m), AttributePathStep::ElementKeyString(name)) => m
                    .get(name)
                    .ok_or_else(|| TfplugError::AttributeNotFound(name.clone()))?,
                (Dynamic::List(l), AttributePathStep::ElementKeyInt(idx)) => {
                    usize::try_from(*idx)
                        .ok()
                        .and_then(|i| l.get(i))
                        .ok_or_else(|| {
                            TfplugError::InvalidPath(format!("list index {} out of bounds", idx))
                        })?
                }
                (value, step) => {
                    return Err(TfplugError::InvalidPath(format!(
                        "cannot apply {:?} to {}",
                        step,
                        value.type_name()
                    )))
                }
            };
        }

        Ok(current)
    }

    /// Sets a value, creating intermediate objects along the way.
    /// List elements must already exist.
    fn set_value(&mut self, path: &AttributePath, new_value: Dynamic) -> Result<()> {
        let Some((last, parents)) = path.steps.split_last() else {
            self.value = new_value;
            return Ok(());
        };

        if !matches!(self.value, Dynamic::Map(_)) {
            self.value = Dynamic::Map(HashMap::new());
        }

        let mut current = &mut self.value;
        for step in parents {
            current = match (current, step) {
                (Dynamic::Map(m), AttributePathStep::AttributeName(name))
                | (Dynamic::Map(m), AttributePathStep::ElementKeyString(name)) => {
                    let entry = m
                        .entry(name.clone())
                        .or_insert_with(|| Dynamic::Map(HashMap::new()));
                    if matches!(entry, Dynamic::Null | Dynamic::Unknown) {
                        *entry = Dynamic::Map(HashMap::new());
                    }
                    entry
                }
                (Dynamic::List(l), AttributePathStep::ElementKeyInt(idx)) => {
                    let len = l.len();
                    usize::try_from(*idx)
                        .ok()
                        .and_then(|i| l.get_mut(i))
                        .ok_or_else(|| {
                            TfplugError::InvalidPath(format!(
                                "list index {} out of bounds (len {})",
                                idx, len
                            ))
                        })?
                }
                (value, step) => {
                    return Err(TfplugError::InvalidPath(format!(
                        "cannot apply {:?} to {}",
                        step,
                        value.type_name()
                    )))
                }
            };
        }

        match (current, last) {
            (Dynamic::Map(m), AttributePathStep::AttributeName(name))
            | (Dynamic::Map(m), AttributePathStep::ElementKeyString(name)) => {
                m.insert(name.clone(), new_value);
                Ok(())
            }
            (Dynamic::List(l), AttributePathStep::ElementKeyInt(idx)) => {
                let slot = usize::try_from(*idx)
                    .ok()
                    .and_then(|i| l.get_mut(i))
                    .ok_or_else(|| {
                        TfplugError::InvalidPath(format!("list index {} out of bounds", idx))
                    })?;
                *slot = new_value;
                Ok(())
            }
            (value, step) => Err(TfplugError::InvalidPath(format!(
                "cannot apply {:?} to {}",
                step,
                value.type_name()
            ))),
        }
    }
}

fn mismatch(expected: &str, actual: &Dynamic) -> TfplugError {
    TfplugError::TypeMismatch {
        expected: expected.to_string(),
        actual: actual.type_name().to_string(),
    }
}

/// AttributePath represents a path to an attribute within a DynamicValue
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributePath {
    pub steps: Vec<AttributePathStep>,
}

impl AttributePath {
    pub fn new(name: &str) -> Self {
        Self::root().attribute(name)
    }

    pub fn root() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn attribute(mut self, name: &str) -> Self {
        self.steps
            .push(AttributePathStep::AttributeName(name.to_string()));
        self
    }

    pub fn index(mut self, idx: i64) -> Self {
        self.steps.push(AttributePathStep::ElementKeyInt(idx));
        self
    }

    pub fn key(mut self, key: &str) -> Self {
        self.steps
            .push(AttributePathStep::ElementKeyString(key.to_string()));
        self
    }
}

impl std::fmt::Display for AttributePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                AttributePathStep::AttributeName(name) if i == 0 => write!(f, "{}", name)?,
                AttributePathStep::AttributeName(name) => write!(f, ".{}", name)?,
                AttributePathStep::ElementKeyString(key) => write!(f, "[{:?}]", key)?,
                AttributePathStep::ElementKeyInt(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributePathStep {
    AttributeName(String),
    ElementKeyString(String),
    ElementKeyInt(i64),
}

/// Diagnostic represents a warning or error from the provider
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub summary: String,
    pub detail: String,
    pub attribute: Option<AttributePath>,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Error,
            summary: summary.into(),
            detail: detail.into(),
            attribute: None,
        }
    }

    pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Warning,
            summary: summary.into(),
            detail: detail.into(),
            attribute: None,
        }
    }

    pub fn with_attribute(mut self, path: AttributePath) -> Self {
        self.attribute = Some(path);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}

/// True when any diagnostic in the slice is an error
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DiagnosticSeverity {
    Invalid,
    Error,
    Warning,
}

/// ServerCapabilities indicates provider capabilities
#[derive(Debug, Clone, Default)]
pub struct ServerCapabilities {
    pub plan_destroy: bool,
    pub get_provider_schema_optional: bool,
    pub move_resource_state: bool,
}

/// ClientCapabilities indicates Terraform client capabilities
#[derive(Debug, Clone, Default)]
pub struct ClientCapabilities {
    pub deferral_allowed: bool,
    pub write_only_attributes_allowed: bool,
}
