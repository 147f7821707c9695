//! Owners data source implementation

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

use super::owner::owner_attributes;
use crate::model::{owner_model, OwnersDataSourceModel};

#[derive(Default)]
pub struct OwnersDataSource {
    provider_data: Option<crate::RenderProviderData>,
}

impl OwnersDataSource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DataSource for OwnersDataSource {
    fn type_name(&self) -> &str {
        "render_owners"
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
            .markdown_description("The ID of the user or team")
            .computed()
            .build();

        let schema = SchemaBuilder::new()
            .version(0)
            .markdown_description("This endpoint lists all users and teams that your API key has access to. This can be helpful for getting the correct ownerId to use for creating new resources, such as services.")
            .attribute(
                AttributeBuilder::list_of_objects("owners", owner_attributes(id))
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

        match provider_data.client.owners().list().await {
            Ok(owners) => {
                tracing::debug!("Read {} owners", owners.len());
                ReadDataSourceResponse::from_model(&OwnersDataSourceModel {
                    owners: Some(owners.iter().map(owner_model).collect()),
                })
            }
            Err(e) => ReadDataSourceResponse::error(Diagnostic::error(
                "Unable to Read Render Owners",
                e.to_string(),
            )),
        }
    }
}

#[async_trait]
impl DataSourceWithConfigure for OwnersDataSource {
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
