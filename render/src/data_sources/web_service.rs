//! Web service data source implementation

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

use crate::model::service_data_source_model;

#[derive(Default)]
pub struct WebServiceDataSource {
    provider_data: Option<crate::RenderProviderData>,
}

impl WebServiceDataSource {
    pub fn new() -> Self {
        Self::default()
    }
}

fn computed(name: &str, type_: AttributeType) -> Attribute {
    AttributeBuilder::new(name, type_).computed().build()
}

fn computed_string(name: &str) -> Attribute {
    computed(name, AttributeType::String)
}

fn computed_object(name: &str, attributes: Vec<Attribute>) -> Attribute {
    AttributeBuilder::object(name, attributes).computed().build()
}

fn autoscaling_attribute() -> Attribute {
    let criteria_object = |name: &str| {
        computed_object(
            name,
            vec![
                computed("enabled", AttributeType::Bool),
                computed("percentage", AttributeType::Number),
            ],
        )
    };

    computed_object(
        "autoscaling",
        vec![
            computed("enabled", AttributeType::Bool),
            computed("min", AttributeType::Number),
            computed("max", AttributeType::Number),
            computed_object("criteria", vec![criteria_object("cpu"), criteria_object("memory")]),
        ],
    )
}

fn env_specific_details_attribute() -> Attribute {
    computed_object(
        "env_specific_details",
        vec![
            computed_string("docker_command"),
            computed_string("docker_context"),
            computed_string("dockerfile_path"),
            computed_string("pre_deploy_command"),
            computed_string("build_command"),
            computed_string("start_command"),
            computed_object(
                "registry_credential",
                vec![
                    computed_string("id"),
                    computed_string("name"),
                    computed_string("registry"),
                    computed_string("username"),
                ],
            ),
        ],
    )
}

fn service_details_attribute() -> Attribute {
    computed_object(
        "service_details",
        vec![
            autoscaling_attribute(),
            computed_object("disk", vec![computed_string("id"), computed_string("name")]),
            computed_string("env"),
            env_specific_details_attribute(),
            computed_string("health_check_path"),
            computed("num_instances", AttributeType::Number),
            AttributeBuilder::list_of_objects(
                "open_ports",
                vec![
                    computed("port", AttributeType::Number),
                    computed_string("protocol"),
                ],
            )
            .computed()
            .build(),
            computed_object(
                "parent_server",
                vec![computed_string("id"), computed_string("name")],
            ),
            computed_string("plan"),
            computed_string("pull_request_previews_enabled"),
            computed_string("region"),
            computed_string("url"),
        ],
    )
}

/// Read-only service attributes shared by `render_web_service` and each
/// element of `render_web_services`
pub(crate) fn service_attributes(id: Attribute) -> Vec<Attribute> {
    vec![
        id,
        computed_string("name"),
        computed_string("owner_id"),
        computed_string("repo"),
        computed_string("auto_deploy"),
        computed_string("branch"),
        computed_string("root_dir"),
        computed_object(
            "build_filter",
            vec![
                computed("paths", AttributeType::list_of(AttributeType::String)),
                computed("ignored_paths", AttributeType::list_of(AttributeType::String)),
            ],
        ),
        AttributeBuilder::list_of_objects(
            "environment_variables",
            vec![computed_string("key"), computed_string("value")],
        )
        .computed()
        .build(),
        service_details_attribute(),
        computed_string("type"),
        computed_string("created_at"),
        computed_string("updated_at"),
        computed_string("image_path"),
        computed_string("notify_on_fail"),
        computed_string("slug"),
        computed_string("suspended"),
        computed("suspenders", AttributeType::list_of(AttributeType::String)),
    ]
}

#[async_trait]
impl DataSource for WebServiceDataSource {
    fn type_name(&self) -> &str {
        "render_web_service"
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
            .required()
            .build();

        let mut builder = SchemaBuilder::new()
            .version(0)
            .markdown_description("Returns the details of a single Render Web Service (specified by `id`) that's owned by you or a team you belong to.");
        for attribute in service_attributes(id) {
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

        match provider_data.client.services().get(&id).await {
            Ok(service) => {
                ReadDataSourceResponse::from_model(&service_data_source_model(&service))
            }
            Err(e) => ReadDataSourceResponse::error(Diagnostic::error(
                format!("Unable to Read Render Web Service: {}", id),
                e.to_string(),
            )),
        }
    }
}

#[async_trait]
impl DataSourceWithConfigure for WebServiceDataSource {
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
