//! Resource implementations

pub mod registry_credential;
pub mod web_service;

pub use registry_credential::RegistryCredentialResource;
pub use web_service::WebServiceResource;

use crate::RenderProviderData;
use std::any::Any;
use std::sync::Arc;
use tfplug::types::Diagnostic;

pub(crate) fn not_configured() -> Diagnostic {
    Diagnostic::error(
        "Provider not configured",
        "Provider data was not properly configured",
    )
}

/// Shared `configure` body. No provider data yet is not an error; Terraform
/// configures resources before the provider during validation.
pub(crate) fn configure_provider_data(
    slot: &mut Option<RenderProviderData>,
    provider_data: Option<Arc<dyn Any + Send + Sync>>,
) -> Vec<Diagnostic> {
    let Some(data) = provider_data else {
        return vec![];
    };

    match RenderProviderData::from_any(&data) {
        Ok(provider_data) => {
            *slot = Some(provider_data);
            vec![]
        }
        Err(got) => vec![Diagnostic::error(
            "Unexpected Resource Configure Type",
            format!(
                "Expected RenderProviderData, got: {}. Please report this issue to the provider developers.",
                got
            ),
        )],
    }
}
