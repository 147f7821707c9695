//! Registry credentials list data source implementation

use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::data_source::{
    ConfigureDataSourceRequest, ConfigureDataSourceResponse, DataSource, DataSourceMetadataRequest,
    DataSourceMetadataResponse, DataSourceSchemaRequest, DataSourceSchemaResponse,
    DataSourceWithConfigure, ReadDataSourceRequest, ReadDataSourceResponse,
    ValidateDataSourceConfigRequest, ValidateDataSourceConfigResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::Diagnostic;

use super::registry_credential::registry_credential_attributes;
use crate::model::{registry_credential_data_source_model, RegistryCredentialsDataSourceModel};

#[derive(Default)]
pub struct RegistryCredentialsDataSource {
    provider_data: Option<crate::RenderProviderData>,
}

impl RegistryCredentialsDataSource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DataSource for RegistryCredentialsDataSource {
    fn type_name(&self) -> &str {
        "render_registrycredentials"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: DataSourceMetadataRequest,
    ) -> DataSourceMetadataResponse {
        DataSourceMetadataResponse {
            type_name: self.type_name().to_string(),
        }
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: DataSourceSchemaRequest,
    ) -> DataSourceSchemaResponse {
        let id = AttributeBuilder::new("id", AttributeType::String)
            .description("Unique identifier for this credential")
            .computed()
            .build();

        let schema = SchemaBuilder::new()
            .version(0)
            .description("Get a list of registry credentials.")
            .attribute(
                AttributeBuilder::list_of_objects(
                    "registry_credentials",
                    registry_credential_attributes(id),
                )
                .computed()
                .build(),
            )
            .build();

        DataSourceSchemaResponse {
            schema,
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        _request: ValidateDataSourceConfigRequest,
    ) -> ValidateDataSourceConfigResponse {
        ValidateDataSourceConfigResponse::default()
    }

    async fn read(&self, _ctx: Context, _request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        let Some(provider_data) = &self.provider_data else {
            return super::not_configured();
        };

        match provider_data.client.registry_credentials().list().await {
            Ok(credentials) => {
                let model = RegistryCredentialsDataSourceModel {
                    registry_credentials: Some(
                        credentials
                            .iter()
                            .map(registry_credential_data_source_model)
                            .collect(),
                    ),
                };
                ReadDataSourceResponse::from_model(&model)
            }
            Err(e) => ReadDataSourceResponse::error(Diagnostic::error(
                "Unable to Read Render RegistryCredentials",
                e.to_string(),
            )),
        }
    }
}

#[async_trait]
impl DataSourceWithConfigure for RegistryCredentialsDataSource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureDataSourceRequest,
    ) -> ConfigureDataSourceResponse {
        ConfigureDataSourceResponse {
            diagnostics: super::configure_provider_data(
                &mut self.provider_data,
                request.provider_data,
            ),
        }
    }
}
