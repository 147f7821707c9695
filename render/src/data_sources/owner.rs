//! Owner data source implementation

use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::data_source::{
    ConfigureDataSourceRequest, ConfigureDataSourceResponse, DataSource, DataSourceMetadataRequest,
    DataSourceMetadataResponse, DataSourceSchemaRequest, DataSourceSchemaResponse,
    DataSourceWithConfigure, ReadDataSourceRequest, ReadDataSourceResponse,
    ValidateDataSourceConfigRequest, ValidateDataSourceConfigResponse,
};
use tfplug::schema::{Attribute, AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic};

use crate::model::owner_model;

#[derive(Default)]
pub struct OwnerDataSource {
    provider_data: Option<crate::RenderProviderData>,
}

impl OwnerDataSource {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Attributes shared with the `owners` list. `id` is computed there.
pub(crate) fn owner_attributes(id: Attribute) -> Vec<Attribute> {
    vec![
        id,
        AttributeBuilder::new("name", AttributeType::String)
            .markdown_description("The name of the user or team")
            .computed()
            .build(),
        AttributeBuilder::new("email", AttributeType::String)
            .markdown_description("The email of the user or team")
            .computed()
            .build(),
        AttributeBuilder::new("type", AttributeType::String)
            .markdown_description("The type. Valid values are `user` or `team`")
            .computed()
            .build(),
    ]
}

#[async_trait]
impl DataSource for OwnerDataSource {
    fn type_name(&self) -> &str {
        "render_owner"
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
            .required()
            .build();

        let mut builder = SchemaBuilder::new()
            .version(0)
            .markdown_description("This endpoint gets information for a specific user or team that your API key has permission to access, based on ownerId.");
        for attribute in owner_attributes(id) {
            builder = builder.attribute(attribute);
        }

        DataSourceSchemaResponse {
            schema: builder.build(),
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

        let id = request
            .config
            .get_string_opt(&AttributePath::new("id"))
            .unwrap_or_default();

        match provider_data.client.owners().get(&id).await {
            Ok(owner) => ReadDataSourceResponse::from_model(&owner_model(&owner)),
            Err(e) => ReadDataSourceResponse::error(Diagnostic::error(
                format!("Unable to Read Render Owner: {}", id),
                e.to_string(),
            )),
        }
    }
}

#[async_trait]
impl DataSourceWithConfigure for OwnerDataSource {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_helpers::create_test_client;
    use crate::RenderProviderData;
    use mockito::Server;
    use std::sync::Arc;
    use tfplug::types::{Dynamic, DynamicValue};

    fn id_config(id: &str) -> DynamicValue {
        let mut config = DynamicValue::object();
        config
            .set_string(&AttributePath::new("id"), id.to_string())
            .unwrap();
        config
    }

    #[test]
    fn test_metadata() {
        let data_source = OwnerDataSource::new();
        let response =
            tokio_test::block_on(data_source.metadata(Context::new(), DataSourceMetadataRequest));
        assert_eq!(response.type_name, "render_owner");
    }

    #[tokio::test]
    async fn test_read_owner() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/owners/tea-1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"tea-1","name":"Acme","email":"ops@acme.dev","type":"team"}"#)
            .create_async()
            .await;

        let mut data_source = OwnerDataSource::new();
        data_source
            .configure(
                Context::new(),
                ConfigureDataSourceRequest {
                    provider_data: Some(Arc::new(RenderProviderData::new(create_test_client(
                        &server.url(),
                    )))),
                },
            )
            .await;

        let response = data_source
            .read(
                Context::new(),
                ReadDataSourceRequest {
                    type_name: "render_owner".to_string(),
                    config: id_config("tea-1"),
                },
            )
            .await;

        assert!(response.diagnostics.is_empty());
        assert_eq!(
            response.state.get_string(&AttributePath::new("type")).unwrap(),
            "team"
        );
        assert_eq!(
            response.state.get_string(&AttributePath::new("email")).unwrap(),
            "ops@acme.dev"
        );
    }

    #[tokio::test]
    async fn test_read_owner_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/owners/usr-x")
            .with_status(404)
            .create_async()
            .await;

        let data_source = OwnerDataSource {
            provider_data: Some(RenderProviderData::new(create_test_client(&server.url()))),
        };
        let response = data_source
            .read(
                Context::new(),
                ReadDataSourceRequest {
                    type_name: "render_owner".to_string(),
                    config: id_config("usr-x"),
                },
            )
            .await;

        assert_eq!(
            response.diagnostics[0].summary,
            "Unable to Read Render Owner: usr-x"
        );
        assert_eq!(response.state.value, Dynamic::Null);
    }

    #[tokio::test]
    async fn test_configure_wrong_type() {
        let mut data_source = OwnerDataSource::new();
        let response = data_source
            .configure(
                Context::new(),
                ConfigureDataSourceRequest {
                    provider_data: Some(Arc::new(42_u32)),
                },
            )
            .await;

        assert_eq!(
            response.diagnostics[0].summary,
            "Unexpected Data Source Configure Type"
        );
        assert!(data_source.provider_data.is_none());
    }
}
