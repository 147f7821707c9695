//! Import helpers

use crate::context::Context;
use crate::resource::{ImportResourceStateRequest, ImportResourceStateResponse, ImportedResource};
use crate::types::{AttributePath, Diagnostic, DynamicValue};

/// Seeds a state whose only known attribute is the import id at `attr_path`.
/// The following read fills in everything else.
///
/// Example: `terraform import render_web_service.app srv-123` gives
/// `state.id = "srv-123"`.
pub fn import_state_passthrough_id(
    _ctx: &Context,
    attr_path: AttributePath,
    request: &ImportResourceStateRequest,
    response: &mut ImportResourceStateResponse,
) {
    if request.id.is_empty() {
        response.diagnostics.push(
            Diagnostic::error(
                "Missing import ID",
                "An ID is required to import this resource",
            )
            .with_attribute(attr_path),
        );
        return;
    }

    let mut state = DynamicValue::object();
    if let Err(e) = state.set_string(&attr_path, request.id.clone()) {
        response.diagnostics.push(
            Diagnostic::error(
                format!("Failed to set import ID: {}", e),
                format!("Could not set attribute '{}' to '{}'", attr_path, request.id),
            )
            .with_attribute(attr_path),
        );
        return;
    }

    response.imported_resources.push(ImportedResource {
        type_name: request.type_name.clone(),
        state,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(id: &str) -> ImportResourceStateRequest {
        ImportResourceStateRequest {
            type_name: "render_registrycredential".to_string(),
            id: id.to_string(),
        }
    }

    #[test]
    fn passthrough_sets_only_the_id() {
        let mut response = ImportResourceStateResponse::default();
        import_state_passthrough_id(
            &Context::new(),
            AttributePath::new("id"),
            &request("rgc-cnim7h7sc6pc73d1op80"),
            &mut response,
        );

        assert!(response.diagnostics.is_empty());
        assert_eq!(response.imported_resources.len(), 1);

        let imported = &response.imported_resources[0];
        assert_eq!(imported.type_name, "render_registrycredential");
        assert_eq!(
            imported.state.get_string(&AttributePath::new("id")).unwrap(),
            "rgc-cnim7h7sc6pc73d1op80"
        );
        assert_eq!(imported.state.get_map(&AttributePath::root()).unwrap().len(), 1);
    }

    #[test]
    fn passthrough_rejects_empty_id() {
        let mut response = ImportResourceStateResponse::default();
        import_state_passthrough_id(
            &Context::new(),
            AttributePath::new("id"),
            &request(""),
            &mut response,
        );

        assert!(response.imported_resources.is_empty());
        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(response.diagnostics[0].summary, "Missing import ID");
    }
}
