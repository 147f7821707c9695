//! Web services list data source implementation

use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::data_source::{
    ConfigureDataSourceRequest, ConfigureDataSourceResponse, DataSource, DataSourceMetadataRequest,
    DataSourceMetadataResponse, DataSourceSchemaRequest, DataSourceSchemaResponse,
    DataSourceWithConfigure, ReadDataSourceRequest, ReadDataSourceResponse,
    ValidateDataSourceConfigRequest, ValidateDataSourceConfigResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic};

use super::web_service::service_attributes;
use crate::api::services::ServiceFilter;
use crate::model::{service_data_source_model, WebServicesDataSourceModel};

#[derive(Default)]
pub struct WebServicesDataSource {
    provider_data: Option<crate::RenderProviderData>,
}

impl WebServicesDataSource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DataSource for WebServicesDataSource {
    fn type_name(&self) -> &str {
        "render_web_services"
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
            .description("Unique identifier for this web service")
            .computed()
            .build();

        let schema = SchemaBuilder::new()
            .version(0)
            .markdown_description(
                "Returns a list of Render web services owned by you or a team you belong to.",
            )
            .attribute(
                AttributeBuilder::new("name", AttributeType::String)
                    .description("Only return services with this name")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::list_of_objects("web_services", service_attributes(id))
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

    async fn read(&self, _ctx: Context, request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        let Some(provider_data) = &self.provider_data else {
            return super::not_configured();
        };

        let name = request.config.get_string_opt(&AttributePath::new("name"));
        let filter = match &name {
            Some(name) => ServiceFilter::web_services().with_name(name.clone()),
            None => ServiceFilter::web_services(),
        };

        match provider_data.client.services().list(&filter).await {
            Ok(services) => {
                tracing::debug!("Read {} web services", services.len());
                ReadDataSourceResponse::from_model(&WebServicesDataSourceModel {
                    name,
                    web_services: Some(services.iter().map(service_data_source_model).collect()),
                })
            }
            Err(e) => ReadDataSourceResponse::error(Diagnostic::error(
                "Unable to Read Render Web Services",
                e.to_string(),
            )),
        }
    }
}

#[async_trait]
impl DataSourceWithConfigure for WebServicesDataSource {
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
