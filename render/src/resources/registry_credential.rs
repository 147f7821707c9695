//! Registry credential resource implementation

use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::import::import_state_passthrough_id;
use tfplug::plan_modifier::UseStateForUnknown;
use tfplug::resource::{
    ConfigureResourceRequest, ConfigureResourceResponse, CreateResourceRequest,
    CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ReadResourceRequest,
    ReadResourceResponse, Resource, ResourceMetadataRequest, ResourceMetadataResponse,
    ResourceSchemaRequest, ResourceSchemaResponse, ResourceWithConfigure, ResourceWithImportState,
    UpdateResourceRequest, UpdateResourceResponse, ValidateResourceConfigRequest,
    ValidateResourceConfigResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, DynamicValue};
use tfplug::validator::{validate_attributes, StringOneOf};

use crate::model::{
    hydrate_registry_credential, registry_credential_request, Registry, RegistryCredentialModel,
    TranslateError,
};

#[derive(Default)]
pub struct RegistryCredentialResource {
    provider_data: Option<crate::RenderProviderData>,
}

impl RegistryCredentialResource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .version(0)
            .markdown_description("Create registry credential")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .markdown_description("Unique identifier for this credential")
                    .computed()
                    .plan_modifier(Box::new(UseStateForUnknown))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("name", AttributeType::String)
                    .markdown_description("Descriptive name for this credential")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("registry", AttributeType::String)
                    .markdown_description(
                        "The registry to use this credential with. Valid values are GITHUB, GITLAB, DOCKER.",
                    )
                    .required()
                    .validator(Box::new(StringOneOf::new(Registry::ALL)))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("username", AttributeType::String)
                    .markdown_description("The username associated with the credential")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("auth_token", AttributeType::String)
                    .markdown_description("The auth token associated with the credential")
                    .required()
                    .sensitive()
                    .write_only()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("owner_id", AttributeType::String)
                    .markdown_description("The owner id associated with the credential")
                    .required()
                    .build(),
            )
            .build()
    }

    /// Decodes the plan and picks the write-only token out of the config
    fn planned_model(
        planned_state: &DynamicValue,
        config: &DynamicValue,
    ) -> Result<RegistryCredentialModel, Diagnostic> {
        let mut model: RegistryCredentialModel = planned_state
            .to_model()
            .map_err(|e| Diagnostic::error("Failed to decode plan", e.to_string()))?;
        model.auth_token = config.get_string_opt(&AttributePath::new("auth_token"));
        Ok(model)
    }

    /// State never carries the token
    fn to_state(mut model: RegistryCredentialModel) -> Result<DynamicValue, Diagnostic> {
        model.auth_token = None;
        DynamicValue::from_model(&model)
            .map_err(|e| Diagnostic::error("Failed to encode state", e.to_string()))
    }
}

fn invalid_registry(e: TranslateError) -> Diagnostic {
    Diagnostic::error("Invalid registry", e.to_string())
        .with_attribute(AttributePath::new("registry"))
}

#[async_trait]
impl Resource for RegistryCredentialResource {
    fn type_name(&self) -> &str {
        "render_registrycredential"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: ResourceMetadataRequest,
    ) -> ResourceMetadataResponse {
        ResourceMetadataResponse {
            type_name: self.type_name().to_string(),
        }
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: ResourceSchemaRequest,
    ) -> ResourceSchemaResponse {
        ResourceSchemaResponse {
            schema: Self::schema_static(),
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        ValidateResourceConfigResponse {
            diagnostics: validate_attributes(&Self::schema_static(), &request.config),
        }
    }

    async fn create(
        &self,
        _ctx: Context,
        request: CreateResourceRequest,
    ) -> CreateResourceResponse {
        let Some(provider_data) = &self.provider_data else {
            return CreateResourceResponse::failed(request.planned_state, super::not_configured());
        };

        let mut plan = match Self::planned_model(&request.planned_state, &request.config) {
            Ok(plan) => plan,
            Err(diag) => return CreateResourceResponse::failed(request.planned_state, diag),
        };

        let body = match registry_credential_request(&plan) {
            Ok(body) => body,
            Err(e) => {
                return CreateResourceResponse::failed(request.planned_state, invalid_registry(e))
            }
        };

        let credential = match provider_data.client.registry_credentials().create(&body).await {
            Ok(credential) => credential,
            Err(e) => {
                return CreateResourceResponse::failed(
                    request.planned_state,
                    Diagnostic::error(
                        "Error creating Render registry credential",
                        format!(
                            "Could not create registry credential, unexpected error: {}",
                            e
                        ),
                    ),
                )
            }
        };

        tracing::info!("Created registry credential {}", credential.id);
        hydrate_registry_credential(&mut plan, &credential);
        match Self::to_state(plan) {
            Ok(new_state) => CreateResourceResponse {
                new_state,
                diagnostics: vec![],
            },
            Err(diag) => CreateResourceResponse::failed(request.planned_state, diag),
        }
    }

    async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let Some(provider_data) = &self.provider_data else {
            return ReadResourceResponse::failed(request.current_state, super::not_configured());
        };

        let mut state: RegistryCredentialModel = match request.current_state.to_model() {
            Ok(state) => state,
            Err(e) => {
                return ReadResourceResponse::failed(
                    request.current_state,
                    Diagnostic::error("Failed to decode state", e.to_string()),
                )
            }
        };
        let id = state.id.clone().unwrap_or_default();

        let credential = match provider_data.client.registry_credentials().get(&id).await {
            Ok(credential) => credential,
            Err(e) => {
                return ReadResourceResponse::failed(
                    request.current_state,
                    Diagnostic::error(
                        format!("Could not get Render registry credential: {}", id),
                        e.to_string(),
                    ),
                )
            }
        };

        hydrate_registry_credential(&mut state, &credential);
        match Self::to_state(state) {
            Ok(new_state) => ReadResourceResponse {
                new_state: Some(new_state),
                diagnostics: vec![],
            },
            Err(diag) => ReadResourceResponse::failed(request.current_state, diag),
        }
    }

    async fn update(
        &self,
        _ctx: Context,
        request: UpdateResourceRequest,
    ) -> UpdateResourceResponse {
        let Some(provider_data) = &self.provider_data else {
            return UpdateResourceResponse::failed(request.planned_state, super::not_configured());
        };

        let mut plan = match Self::planned_model(&request.planned_state, &request.config) {
            Ok(plan) => plan,
            Err(diag) => return UpdateResourceResponse::failed(request.planned_state, diag),
        };
        let id = request
            .prior_state
            .get_string_opt(&AttributePath::new("id"))
            .unwrap_or_default();
        plan.id = Some(id.clone());

        let body = match registry_credential_request(&plan) {
            Ok(body) => body,
            Err(e) => {
                return UpdateResourceResponse::failed(request.planned_state, invalid_registry(e))
            }
        };

        let credential = match provider_data
            .client
            .registry_credentials()
            .update(&id, &body)
            .await
        {
            Ok(credential) => credential,
            Err(e) => {
                return UpdateResourceResponse::failed(
                    request.planned_state,
                    Diagnostic::error(
                        "Error updating Render registry credential",
                        format!("Could not update registry credential ID: {}: {}", id, e),
                    ),
                )
            }
        };

        tracing::info!("Updated registry credential {}", id);
        hydrate_registry_credential(&mut plan, &credential);
        match Self::to_state(plan) {
            Ok(new_state) => UpdateResourceResponse {
                new_state,
                diagnostics: vec![],
            },
            Err(diag) => UpdateResourceResponse::failed(request.planned_state, diag),
        }
    }

    async fn delete(
        &self,
        _ctx: Context,
        request: DeleteResourceRequest,
    ) -> DeleteResourceResponse {
        let Some(provider_data) = &self.provider_data else {
            return DeleteResourceResponse::failed(super::not_configured());
        };

        let id = request
            .prior_state
            .get_string_opt(&AttributePath::new("id"))
            .unwrap_or_default();

        match provider_data.client.registry_credentials().delete(&id).await {
            Ok(()) => {
                tracing::info!("Deleted registry credential {}", id);
                DeleteResourceResponse::default()
            }
            Err(e) => DeleteResourceResponse::failed(Diagnostic::error(
                "Error deleting Render registry credential",
                format!("Could not delete registry credential ID: {}: {}", id, e),
            )),
        }
    }
}

#[async_trait]
impl ResourceWithConfigure for RegistryCredentialResource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureResourceRequest,
    ) -> ConfigureResourceResponse {
        ConfigureResourceResponse {
            diagnostics: super::configure_provider_data(
                &mut self.provider_data,
                request.provider_data,
            ),
        }
    }

    fn as_import_state(&self) -> Option<&dyn ResourceWithImportState> {
        Some(self)
    }
}

#[async_trait]
impl ResourceWithImportState for RegistryCredentialResource {
    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        let mut response = ImportResourceStateResponse::default();
        import_state_passthrough_id(&ctx, AttributePath::new("id"), &request, &mut response);
        response
    }
}

#[cfg(test)]
#[path = "./registry_credential_test.rs"]
mod registry_credential_test;
