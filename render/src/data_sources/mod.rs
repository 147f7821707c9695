//! Data source implementations

pub mod owner;
pub mod owners;
pub mod registry_credential;
pub mod registry_credentials;
pub mod web_service;
pub mod web_services;

pub use owner::OwnerDataSource;
pub use owners::OwnersDataSource;
pub use registry_credential::RegistryCredentialDataSource;
pub use registry_credentials::RegistryCredentialsDataSource;
pub use web_service::WebServiceDataSource;
pub use web_services::WebServicesDataSource;

use crate::RenderProviderData;
use std::any::Any;
use std::sync::Arc;
use tfplug::data_source::ReadDataSourceResponse;
use tfplug::types::Diagnostic;

pub(crate) fn configure_provider_data(
    slot: &mut Option<RenderProviderData>,
    provider_data: Option<Arc<dyn Any + Send + Sync>>,
) -> Vec<Diagnostic> {
    let Some(data) = provider_data else {
        tracing::debug!("Data source configured before the provider");
        return vec![];
    };

    match RenderProviderData::from_any(&data) {
        Ok(provider_data) => {
            *slot = Some(provider_data);
            vec![]
        }
        Err(got) => vec![Diagnostic::error(
            "Unexpected Data Source Configure Type",
            format!(
                "Expected RenderProviderData, got: {}. Please report this issue to the provider developers.",
                got
            ),
        )],
    }
}

pub(crate) fn not_configured() -> ReadDataSourceResponse {
    ReadDataSourceResponse::error(Diagnostic::error(
        "Provider not configured",
        "Provider data was not properly configured",
    ))
}
