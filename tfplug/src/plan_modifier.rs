//! Built-in plan modifiers and the schema-driven planning pass

use crate::schema::{
    Attribute, ObjectNestingMode, PlanModifier, PlanModifierRequest, PlanModifierResponse, Schema,
};
use crate::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};

/// Copies the prior state value into the plan when the planned value is
/// unknown, so server-computed attributes don't show as "(known after apply)"
/// on every update.
///
/// Nothing happens on create (no prior state) or when the configuration
/// itself is unknown.
pub struct UseStateForUnknown;

impl PlanModifier for UseStateForUnknown {
    fn description(&self) -> String {
        "Once set, the value of this attribute in state will not change.".to_string()
    }

    fn modify(&self, request: PlanModifierRequest) -> PlanModifierResponse {
        let keep_state = request.plan_value.is_unknown()
            && !request.state_value.is_null()
            && !request.config_value.is_unknown();

        PlanModifierResponse {
            plan_value: if keep_state {
                request.state_value
            } else {
                request.plan_value
            },
            requires_replace: false,
            diagnostics: vec![],
        }
    }
}

/// Result of running every attribute's plan modifiers
pub struct PlanOutcome {
    pub planned_state: DynamicValue,
    pub requires_replace: Vec<AttributePath>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Runs the plan modifiers declared in `schema` against a proposed new state.
/// Single nested objects are walked recursively; list elements are not.
pub fn apply_plan_modifiers(
    schema: &Schema,
    config: &DynamicValue,
    prior_state: &DynamicValue,
    proposed: DynamicValue,
) -> PlanOutcome {
    let mut outcome = PlanOutcome {
        planned_state: proposed,
        requires_replace: vec![],
        diagnostics: vec![],
    };

    for attr in &schema.block.attributes {
        modify_attribute(attr, AttributePath::new(&attr.name), config, prior_state, &mut outcome);
    }

    outcome
}

fn modify_attribute(
    attr: &Attribute,
    path: AttributePath,
    config: &DynamicValue,
    prior_state: &DynamicValue,
    outcome: &mut PlanOutcome,
) {
    let value_at = |dv: &DynamicValue| {
        dv.get(&path)
            .cloned()
            .map(DynamicValue::new)
            .unwrap_or_else(|_| DynamicValue::null())
    };

    for modifier in &attr.plan_modifiers {
        let response = modifier.modify(PlanModifierRequest {
            config_value: value_at(config),
            state_value: value_at(prior_state),
            plan_value: value_at(&outcome.planned_state),
            path: path.clone(),
        });

        if response.requires_replace {
            outcome.requires_replace.push(path.clone());
        }
        outcome.diagnostics.extend(response.diagnostics);

        if let Err(e) = outcome.planned_state.set(&path, response.plan_value.value) {
            outcome.diagnostics.push(
                Diagnostic::error("Failed to apply plan modifier", e.to_string())
                    .with_attribute(path.clone()),
            );
        }
    }

    let Some(nested) = &attr.nested_type else {
        return;
    };
    if nested.nesting != ObjectNestingMode::Single {
        return;
    }
    if !matches!(outcome.planned_state.get(&path), Ok(Dynamic::Map(_))) {
        return;
    }

    for child in &nested.attributes {
        modify_attribute(
            child,
            path.clone().attribute(&child.name),
            config,
            prior_state,
            outcome,
        );
    }
}
