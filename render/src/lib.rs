pub mod api;
pub mod data_sources;
pub mod model;
pub mod provider_data;
pub mod resources;

pub use provider_data::RenderProviderData;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tfplug::context::Context;
use tfplug::provider::{
    ConfigureProviderRequest, ConfigureProviderResponse, DataSourceFactory, Provider,
    ProviderMetaSchemaRequest, ProviderMetaSchemaResponse, ProviderMetadataRequest,
    ProviderMetadataResponse, ProviderSchemaRequest, ProviderSchemaResponse, ResourceFactory,
    StopProviderRequest, StopProviderResponse, ValidateProviderConfigRequest,
    ValidateProviderConfigResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, DynamicValue, ServerCapabilities};

pub const API_KEY_ENV: &str = "RENDER_API_KEY";
pub const API_URL_ENV: &str = "RENDER_API_URL";

pub struct RenderProvider {
    version: String,
}

impl Default for RenderProvider {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_VERSION"))
    }
}

impl RenderProvider {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .version(0)
            .attribute(
                AttributeBuilder::new("api_key", AttributeType::String)
                    .markdown_description("The Render API key to use for authentication. May also be provided via RENDER_API_KEY environment variable.")
                    .optional()
                    .sensitive()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("api_url", AttributeType::String)
                    .markdown_description("Base URL of the Render API. May also be provided via RENDER_API_URL environment variable. Defaults to `https://api.render.com/v1`.")
                    .optional()
                    .build(),
            )
            .build()
    }
}

/// Config wins over the environment; an empty value counts as unset
fn resolve_setting(config: &DynamicValue, attribute: &str, env_var: &str) -> Option<String> {
    config
        .get_string_opt(&AttributePath::new(attribute))
        .or_else(|| std::env::var(env_var).ok())
        .filter(|value| !value.is_empty())
}

#[async_trait]
impl Provider for RenderProvider {
    fn type_name(&self) -> &str {
        "render"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: ProviderMetadataRequest,
    ) -> ProviderMetadataResponse {
        ProviderMetadataResponse {
            type_name: self.type_name().to_string(),
            server_capabilities: ServerCapabilities::default(),
        }
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: ProviderSchemaRequest,
    ) -> ProviderSchemaResponse {
        ProviderSchemaResponse {
            schema: Self::schema_static(),
            diagnostics: vec![],
        }
    }

    async fn meta_schema(
        &self,
        _ctx: Context,
        _request: ProviderMetaSchemaRequest,
    ) -> ProviderMetaSchemaResponse {
        ProviderMetaSchemaResponse {
            schema: None,
            diagnostics: vec![],
        }
    }

    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureProviderRequest,
    ) -> ConfigureProviderResponse {
        tfplug::init_from_env();

        let api_key_path = AttributePath::new("api_key");
        if request.config.is_unknown_at(&api_key_path) {
            return ConfigureProviderResponse {
                diagnostics: vec![Diagnostic::error(
                    "Unknown Render API KEY",
                    "The provider cannot create the Render API client as there is an unknown configuration value for the Render API Key. \
                     Either target apply the source of the value first, set the value statically in the configuration, or use the RENDER_API_KEY environment variable.",
                )
                .with_attribute(api_key_path)],
                provider_data: None,
            };
        }

        let Some(api_key) = resolve_setting(&request.config, "api_key", API_KEY_ENV) else {
            return ConfigureProviderResponse {
                diagnostics: vec![Diagnostic::error(
                    "Missing Render API KEY",
                    "The provider cannot create the Render API client as there is a missing or empty value for the Render API Key. \
                     Set the api_key value in the configuration or use the RENDER_API_KEY environment variable. \
                     If either is already set, ensure the value is not empty.",
                )
                .with_attribute(api_key_path)],
                provider_data: None,
            };
        };

        let api_url = resolve_setting(&request.config, "api_url", API_URL_ENV)
            .unwrap_or_else(|| api::DEFAULT_API_URL.to_string());

        match api::Client::new(&api_url, &api_key) {
            Ok(client) => {
                tracing::info!(
                    "Configured Render provider {} against {} (terraform {})",
                    self.version,
                    api_url,
                    request.terraform_version
                );
                ConfigureProviderResponse {
                    diagnostics: vec![],
                    provider_data: Some(Arc::new(RenderProviderData::new(client))),
                }
            }
            Err(e) => ConfigureProviderResponse {
                diagnostics: vec![Diagnostic::error(
                    "Unable to Create Render API Client",
                    format!(
                        "An unexpected error occurred when creating the Render API client. \
                         If the error is not clear, please contact the provider developers.\n\n\
                         Render Client Error: {}",
                        e
                    ),
                )],
                provider_data: None,
            },
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        request: ValidateProviderConfigRequest,
    ) -> ValidateProviderConfigResponse {
        let mut diagnostics = vec![];

        if let Some(api_url) = request.config.get_string_opt(&AttributePath::new("api_url")) {
            if let Err(e) = url::Url::parse(&api_url) {
                diagnostics.push(
                    Diagnostic::error("Invalid Render API URL", format!("{}: {}", api_url, e))
                        .with_attribute(AttributePath::new("api_url")),
                );
            }
        }

        ValidateProviderConfigResponse { diagnostics }
    }

    async fn stop(&self, _ctx: Context, _request: StopProviderRequest) -> StopProviderResponse {
        StopProviderResponse { error: None }
    }

    fn resources(&self) -> HashMap<String, ResourceFactory> {
        let mut factories: HashMap<String, ResourceFactory> = HashMap::new();
        factories.insert(
            "render_registrycredential".to_string(),
            Box::new(|| Box::new(resources::RegistryCredentialResource::new())),
        );
        factories.insert(
            "render_web_service".to_string(),
            Box::new(|| Box::new(resources::WebServiceResource::new())),
        );
        factories
    }

    fn data_sources(&self) -> HashMap<String, DataSourceFactory> {
        let mut factories: HashMap<String, DataSourceFactory> = HashMap::new();
        factories.insert(
            "render_owner".to_string(),
            Box::new(|| Box::new(data_sources::OwnerDataSource::new())),
        );
        factories.insert(
            "render_owners".to_string(),
            Box::new(|| Box::new(data_sources::OwnersDataSource::new())),
        );
        factories.insert(
            "render_registrycredential".to_string(),
            Box::new(|| Box::new(data_sources::RegistryCredentialDataSource::new())),
        );
        factories.insert(
            "render_registrycredentials".to_string(),
            Box::new(|| Box::new(data_sources::RegistryCredentialsDataSource::new())),
        );
        factories.insert(
            "render_web_service".to_string(),
            Box::new(|| Box::new(data_sources::WebServiceDataSource::new())),
        );
        factories.insert(
            "render_web_services".to_string(),
            Box::new(|| Box::new(data_sources::WebServicesDataSource::new())),
        );
        factories
    }
}
