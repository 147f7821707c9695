//! Built-in attribute validators and the schema-driven validation pass

use crate::schema::{Attribute, ObjectNestingMode, Schema, Validator, ValidatorRequest, ValidatorResponse};
use crate::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};

/// Accepts only one of a fixed set of strings.
/// Null and unknown values are left to required/optional checks.
pub struct StringOneOf {
    values: Vec<String>,
}

impl StringOneOf {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    fn quoted(&self) -> String {
        self.values
            .iter()
            .map(|v| format!("\"{}\"", v))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Validator for StringOneOf {
    fn description(&self) -> String {
        format!("value must be one of: [{}]", self.quoted())
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let mut diagnostics = vec![];

        match &request.config_value.value {
            Dynamic::Null | Dynamic::Unknown => {}
            Dynamic::String(s) if self.values.iter().any(|v| v == s) => {}
            other => {
                let shown = match other {
                    Dynamic::String(s) => format!("\"{}\"", s),
                    v => v.type_name().to_string(),
                };
                diagnostics.push(
                    Diagnostic::error(
                        "Invalid Attribute Value Match",
                        format!(
                            "Attribute {} value must be one of: [{}], got: {}",
                            request.path,
                            self.quoted(),
                            shown
                        ),
                    )
                    .with_attribute(request.path),
                );
            }
        }

        ValidatorResponse { diagnostics }
    }
}

/// Runs every attribute validator in `schema` against `config`.
/// Nested objects and list elements are visited when present.
pub fn validate_attributes(schema: &Schema, config: &DynamicValue) -> Vec<Diagnostic> {
    let mut diagnostics = vec![];
    for attr in &schema.block.attributes {
        validate_attribute(attr, AttributePath::new(&attr.name), config, &mut diagnostics);
    }
    diagnostics
}

fn validate_attribute(
    attr: &Attribute,
    path: AttributePath,
    config: &DynamicValue,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let value = match config.get(&path) {
        Ok(v) => v.clone(),
        Err(_) => Dynamic::Null,
    };

    for validator in &attr.validators {
        let response = validator.validate(ValidatorRequest {
            config_value: DynamicValue::new(value.clone()),
            path: path.clone(),
        });
        diagnostics.extend(response.diagnostics);
    }

    let Some(nested) = &attr.nested_type else {
        return;
    };

    match (nested.nesting, &value) {
        (ObjectNestingMode::Single, Dynamic::Map(_)) => {
            for child in &nested.attributes {
                validate_attribute(child, path.clone().attribute(&child.name), config, diagnostics);
            }
        }
        (ObjectNestingMode::List, Dynamic::List(items)) => {
            for idx in 0..items.len() {
                for child in &nested.attributes {
                    let child_path = path.clone().index(idx as i64).attribute(&child.name);
                    validate_attribute(child, child_path, config, diagnostics);
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
    use std::collections::HashMap;

    fn check(validator: &StringOneOf, value: Dynamic) -> Vec<Diagnostic> {
        validator
            .validate(ValidatorRequest {
                config_value: DynamicValue::new(value),
                path: AttributePath::new("registry"),
            })
            .diagnostics
    }

    #[test]
    fn string_one_of_accepts_listed_values() {
        let validator = StringOneOf::new(["GITHUB", "GITLAB", "DOCKER"]);
        assert!(check(&validator, Dynamic::String("DOCKER".to_string())).is_empty());
    }

    #[test]
    fn string_one_of_rejects_other_values_and_names_them() {
        let validator = StringOneOf::new(["GITHUB", "GITLAB", "DOCKER"]);
        let diags = check(&validator, Dynamic::String("QUAY".to_string()));

        assert_eq!(diags.len(), 1);
        assert!(diags[0].is_error());
        assert!(diags[0].detail.contains("\"QUAY\""));
        assert_eq!(diags[0].attribute, Some(AttributePath::new("registry")));
    }

    #[test]
    fn string_one_of_is_case_sensitive() {
        let validator = StringOneOf::new(["DOCKER"]);
        assert_eq!(check(&validator, Dynamic::String("docker".to_string())).len(), 1);
    }

    #[test]
    fn string_one_of_skips_null_and_unknown() {
        let validator = StringOneOf::new(["node"]);
        assert!(check(&validator, Dynamic::Null).is_empty());
        assert!(check(&validator, Dynamic::Unknown).is_empty());
    }

    #[test]
    fn validate_attributes_reaches_nested_objects_and_lists() {
        let schema = SchemaBuilder::new()
            .attribute(
                AttributeBuilder::object(
                    "service_details",
                    vec![AttributeBuilder::new("env", AttributeType::String)
                        .required()
                        .validator(Box::new(StringOneOf::new(["node", "docker"])))
                        .build()],
                )
                .required()
                .build(),
            )
            .attribute(
                AttributeBuilder::list_of_objects(
                    "items",
                    vec![AttributeBuilder::new("kind", AttributeType::String)
                        .required()
                        .validator(Box::new(StringOneOf::new(["a"])))
                        .build()],
                )
                .optional()
                .build(),
            )
            .build();

        let mut config = DynamicValue::object();
        config
            .set_string(
                &AttributePath::new("service_details").attribute("env"),
                "java".to_string(),
            )
            .unwrap();
        config
            .set_list(
                &AttributePath::new("items"),
                vec![
                    Dynamic::Map(HashMap::from([(
                        "kind".to_string(),
                        Dynamic::String("a".to_string()),
                    )])),
                    Dynamic::Map(HashMap::from([(
                        "kind".to_string(),
                        Dynamic::String("b".to_string()),
                    )])),
                ],
            )
            .unwrap();

        let diags = validate_attributes(&schema, &config);
        assert_eq!(diags.len(), 2);
        assert_eq!(
            diags[0].attribute.as_ref().map(|p| p.to_string()),
            Some("service_details.env".to_string())
        );
        assert_eq!(
            diags[1].attribute.as_ref().map(|p| p.to_string()),
            Some("items[1].kind".to_string())
        );
    }
}
