//! Schema types and builders for tfplug
//!
//! Providers, resources and data sources describe their attributes with
//! `SchemaBuilder` and `AttributeBuilder`. Nested objects are expressed as
//! nested attributes (`NestedType`), not blocks.

use crate::types::{AttributePath, Diagnostic, DynamicValue};
use std::collections::HashMap;

/// AttributeType defines the type system for Terraform attributes
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeType {
    String,
    Number,
    Bool,
    List(Box<AttributeType>),
    Object(HashMap<String, AttributeType>),
}

impl AttributeType {
    pub fn list_of(element: AttributeType) -> Self {
        AttributeType::List(Box::new(element))
    }
}

/// Version is used for state migration
#[derive(Debug, Clone)]
pub struct Schema {
    pub version: i64,
    pub block: Block,
}

impl Schema {
    /// Top-level attribute by name
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.block.attributes.iter().find(|a| a.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct Block {
    pub version: i64,
    pub attributes: Vec<Attribute>,
    pub description: String,
    pub description_kind: StringKind,
}

pub struct Attribute {
    pub name: String,
    pub r#type: AttributeType,
    pub description: String,
    pub description_kind: StringKind,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    /// Accepted in configuration but never persisted to plan or state
    pub write_only: bool,
    pub validators: Vec<Box<dyn Validator>>,
    pub plan_modifiers: Vec<Box<dyn PlanModifier>>,
    pub nested_type: Option<NestedType>,
}

impl Attribute {
    /// Attribute of a nested object by name
    pub fn nested(&self, name: &str) -> Option<&Attribute> {
        self.nested_type
            .as_ref()
            .and_then(|n| n.attributes.iter().find(|a| a.name == name))
    }
}

impl std::fmt::Debug for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("type", &self.r#type)
            .field("required", &self.required)
            .field("optional", &self.optional)
            .field("computed", &self.computed)
            .field("sensitive", &self.sensitive)
            .field("write_only", &self.write_only)
            .field("validators", &self.validators.len())
            .field("plan_modifiers", &self.plan_modifiers.len())
            .field("nested_type", &self.nested_type)
            .finish()
    }
}

// Validators and plan modifiers are behaviour, not data; clones drop them
impl Clone for Attribute {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            r#type: self.r#type.clone(),
            description: self.description.clone(),
            description_kind: self.description_kind,
            required: self.required,
            optional: self.optional,
            computed: self.computed,
            sensitive: self.sensitive,
            write_only: self.write_only,
            validators: vec![],
            plan_modifiers: vec![],
            nested_type: self.nested_type.clone(),
        }
    }
}

/// NestedType for attributes with nested structures
#[derive(Debug, Clone)]
pub struct NestedType {
    pub attributes: Vec<Attribute>,
    pub nesting: ObjectNestingMode,
}

impl NestedType {
    pub fn single(attributes: Vec<Attribute>) -> Self {
        Self {
            attributes,
            nesting: ObjectNestingMode::Single,
        }
    }

    pub fn list(attributes: Vec<Attribute>) -> Self {
        Self {
            attributes,
            nesting: ObjectNestingMode::List,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObjectNestingMode {
    Single,
    List,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StringKind {
    Plain,
    Markdown,
}

/// Validator performs validation on attribute values during planning
pub trait Validator: Send + Sync {
    fn description(&self) -> String;
    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse;
}

pub struct ValidatorRequest {
    pub config_value: DynamicValue,
    pub path: AttributePath,
}

pub struct ValidatorResponse {
    pub diagnostics: Vec<Diagnostic>,
}

/// PlanModifier modifies planned values during planning
pub trait PlanModifier: Send + Sync {
    fn description(&self) -> String;
    fn modify(&self, request: PlanModifierRequest) -> PlanModifierResponse;
}

pub struct PlanModifierRequest {
    pub config_value: DynamicValue,
    pub state_value: DynamicValue,
    pub plan_value: DynamicValue,
    pub path: AttributePath,
}

pub struct PlanModifierResponse {
    pub plan_value: DynamicValue,
    pub requires_replace: bool,
    pub diagnostics: Vec<Diagnostic>,
}

/// AttributeBuilder provides fluent API for building attributes
pub struct AttributeBuilder {
    attribute: Attribute,
}

impl AttributeBuilder {
    pub fn new(name: &str, type_: AttributeType) -> Self {
        Self {
            attribute: Attribute {
                name: name.to_string(),
                r#type: type_,
                description: String::new(),
                description_kind: StringKind::Plain,
                required: false,
                optional: false,
                computed: false,
                sensitive: false,
                write_only: false,
                validators: Vec::new(),
                plan_modifiers: Vec::new(),
                nested_type: None,
            },
        }
    }

    /// Single nested object attribute
    pub fn object(name: &str, attributes: Vec<Attribute>) -> Self {
        let types = object_type(&attributes);
        Self::new(name, AttributeType::Object(types)).nested_type(NestedType::single(attributes))
    }

    /// List of nested objects
    pub fn list_of_objects(name: &str, attributes: Vec<Attribute>) -> Self {
        let types = object_type(&attributes);
        Self::new(name, AttributeType::list_of(AttributeType::Object(types)))
            .nested_type(NestedType::list(attributes))
    }

    pub fn description(mut self, desc: &str) -> Self {
        self.attribute.description = desc.to_string();
        self
    }

    pub fn markdown_description(mut self, desc: &str) -> Self {
        self.attribute.description = desc.to_string();
        self.attribute.description_kind = StringKind::Markdown;
        self
    }

    pub fn required(mut self) -> Self {
        self.attribute.required = true;
        self.attribute.optional = false;
        self
    }

    pub fn optional(mut self) -> Self {
        self.attribute.optional = true;
        self.attribute.required = false;
        self
    }

    pub fn computed(mut self) -> Self {
        self.attribute.computed = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.attribute.sensitive = true;
        self
    }

    pub fn write_only(mut self) -> Self {
        self.attribute.write_only = true;
        self
    }

    pub fn validator(mut self, validator: Box<dyn Validator>) -> Self {
        self.attribute.validators.push(validator);
        self
    }

    pub fn plan_modifier(mut self, modifier: Box<dyn PlanModifier>) -> Self {
        self.attribute.plan_modifiers.push(modifier);
        self
    }

    pub fn nested_type(mut self, nested: NestedType) -> Self {
        self.attribute.nested_type = Some(nested);
        self
    }

    pub fn build(self) -> Attribute {
        self.attribute
    }
}

fn object_type(attributes: &[Attribute]) -> HashMap<String, AttributeType> {
    attributes
        .iter()
        .map(|a| (a.name.clone(), a.r#type.clone()))
        .collect()
}

/// SchemaBuilder provides fluent API for building schemas
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self {
            schema: Schema {
                version: 0,
                block: Block {
                    version: 0,
                    attributes: Vec::new(),
                    description: String::new(),
                    description_kind: StringKind::Plain,
                },
            },
        }
    }

    pub fn version(mut self, version: i64) -> Self {
        self.schema.version = version;
        self.schema.block.version = version;
        self
    }

    pub fn attribute(mut self, attr: Attribute) -> Self {
        self.schema.block.attributes.push(attr);
        self
    }

    pub fn description(mut self, desc: &str) -> Self {
        self.schema.block.description = desc.to_string();
        self
    }

    pub fn markdown_description(mut self, desc: &str) -> Self {
        self.schema.block.description = desc.to_string();
        self.schema.block.description_kind = StringKind::Markdown;
        self
    }

    pub fn build(self) -> Schema {
        self.schema
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_builder_creates_required_string() {
        let attr = AttributeBuilder::new("name", AttributeType::String)
            .description("The name of the resource")
            .required()
            .build();

        assert_eq!(attr.name, "name");
        assert!(matches!(attr.r#type, AttributeType::String));
        assert!(attr.required);
        assert!(!attr.optional);
        assert_eq!(attr.description, "The name of the resource");
    }

    #[test]
    fn optional_after_required_clears_required() {
        let attr = AttributeBuilder::new("branch", AttributeType::String)
            .required()
            .optional()
            .computed()
            .build();

        assert!(!attr.required);
        assert!(attr.optional);
        assert!(attr.computed);
    }

    #[test]
    fn write_only_sensitive_attribute() {
        let attr = AttributeBuilder::new("auth_token", AttributeType::String)
            .required()
            .sensitive()
            .write_only()
            .build();

        assert!(attr.sensitive);
        assert!(attr.write_only);
    }

    #[test]
    fn object_attribute_derives_its_type_from_children() {
        let attr = AttributeBuilder::object(
            "parent_server",
            vec![
                AttributeBuilder::new("id", AttributeType::String)
                    .computed()
                    .build(),
                AttributeBuilder::new("name", AttributeType::String)
                    .computed()
                    .build(),
            ],
        )
        .computed()
        .build();

        match &attr.r#type {
            AttributeType::Object(fields) => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields.get("id"), Some(&AttributeType::String));
            }
            other => panic!("expected object type, got {:?}", other),
        }
        assert!(attr.nested("name").is_some_and(|a| a.computed));
        assert!(attr.nested("missing").is_none());
    }

    #[test]
    fn list_of_objects_uses_list_nesting() {
        let attr = AttributeBuilder::list_of_objects(
            "open_ports",
            vec![AttributeBuilder::new("port", AttributeType::Number)
                .computed()
                .build()],
        )
        .build();

        assert!(matches!(attr.r#type, AttributeType::List(_)));
        assert_eq!(
            attr.nested_type.as_ref().map(|n| n.nesting),
            Some(ObjectNestingMode::List)
        );
    }

    #[test]
    fn schema_builder_creates_schema_with_attributes() {
        let schema = SchemaBuilder::new()
            .version(1)
            .markdown_description("Test resource schema")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("name", AttributeType::String)
                    .required()
                    .build(),
            )
            .build();

        assert_eq!(schema.version, 1);
        assert_eq!(schema.block.attributes.len(), 2);
        assert_eq!(schema.block.description_kind, StringKind::Markdown);
        assert!(schema.attribute("name").is_some_and(|a| a.required));
    }
}
