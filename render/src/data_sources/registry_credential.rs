//! Registry credential data source implementation

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

use crate::model::registry_credential_data_source_model;

#[derive(Default)]
pub struct RegistryCredentialDataSource {
    provider_data: Option<crate::RenderProviderData>,
}

impl RegistryCredentialDataSource {
    pub fn new() -> Self {
        Self::default()
    }
}

pub(crate) fn registry_credential_attributes(id: Attribute) -> Vec<Attribute> {
    let computed = |name: &str, description: &str| {
        AttributeBuilder::new(name, AttributeType::String)
            .description(description)
            .computed()
            .build()
    };

    vec![
        id,
        computed("name", "Descriptive name for this credential"),
        computed("registry", "The registry to use this credential with"),
        computed("username", "The username associated with the credential"),
    ]
}

#[async_trait]
impl DataSource for RegistryCredentialDataSource {
    fn type_name(&self) -> &str {
        "render_registrycredential"
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
            .required()
            .build();

        let mut builder = SchemaBuilder::new()
            .version(0)
            .description("RegistryCredential data source");
        for attribute in registry_credential_attributes(id) {
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

        match provider_data.client.registry_credentials().get(&id).await {
            Ok(credential) => ReadDataSourceResponse::from_model(
                &registry_credential_data_source_model(&credential),
            ),
            Err(e) => ReadDataSourceResponse::error(Diagnostic::error(
                format!("Unable to Read Render RegistryCredential: {}", id),
                e.to_string(),
            )),
        }
    }
}

#[async_trait]
impl DataSourceWithConfigure for RegistryCredentialDataSource {
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
