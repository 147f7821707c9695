//! Web service resource implementation

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
use tfplug::schema::{Attribute, AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, DynamicValue};
use tfplug::validator::{validate_attributes, StringOneOf};

use crate::model::{hydrate_web_service, web_service_request, ServiceEnv, WebServiceModel};

const CREATE_ERROR: &str = "Error creating Render web service";
const UPDATE_ERROR: &str = "Error updating Render web service";

#[derive(Default)]
pub struct WebServiceResource {
    provider_data: Option<crate::RenderProviderData>,
}

impl WebServiceResource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .version(0)
            .markdown_description(
                "Creates a new Render Web service owned by you or a team you belong to.\n~> **Note:** You can't create free-tier services with the Render API.",
            )
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .markdown_description("The ID of the service")
                    .computed()
                    .plan_modifier(Box::new(UseStateForUnknown))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("name", AttributeType::String)
                    .markdown_description("The name of the service")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("owner_id", AttributeType::String)
                    .markdown_description("The ID of the owner of the service")
                    .required()
                    .build(),
            )
            .attribute(optional_computed_string(
                "repo",
                "The git repository of the service",
            ))
            .attribute(optional_computed_string(
                "auto_deploy",
                "Whether the service is set to auto-deploy. Valid values are `yes` or `no`. Default: `yes`.",
            ))
            .attribute(optional_computed_string(
                "branch",
                "The branch of the service. If left empty, this will fall back to the default branch of the repository",
            ))
            .attribute(image_attribute())
            .attribute(build_filter_attribute())
            .attribute(optional_computed_string(
                "root_dir",
                "The root directory of the service",
            ))
            .attribute(service_details_attribute())
            .attribute(
                AttributeBuilder::list_of_objects(
                    "secret_files",
                    vec![
                        optional_computed_string("name", "The name of the secret file"),
                        optional_computed_string("contents", "The content of the secret file"),
                    ],
                )
                .markdown_description("The secret files for the service")
                .optional()
                .computed()
                .build(),
            )
            .attribute(
                AttributeBuilder::list_of_objects(
                    "environment_variables",
                    vec![
                        optional_computed_string("key", "The key of the environment variable"),
                        optional_computed_string("value", "The value of the environment variable"),
                    ],
                )
                .markdown_description("The environment variables for the service")
                .optional()
                .computed()
                .build(),
            )
            .attribute(stable_computed_string(
                "type",
                "The type of the service. Valid values are `web_service`, `static_site`, `cron_job`, `background_worker`, `private_service`.",
            ))
            .attribute(stable_computed_string(
                "created_at",
                "The date and time the service was created",
            ))
            .attribute(
                AttributeBuilder::new("updated_at", AttributeType::String)
                    .markdown_description("The date and time the service was last updated")
                    .computed()
                    .build(),
            )
            .attribute(stable_computed_string(
                "image_path",
                "The image path for the service",
            ))
            .attribute(stable_computed_string(
                "notify_on_fail",
                "Whether to notify on fail. Valid values are `default`, `notify` or `ignore`.",
            ))
            .attribute(stable_computed_string("slug", "The slug of the service"))
            .attribute(stable_computed_string(
                "suspended",
                "Whether the service is suspended. Valid values are `suspended` or `not_suspended`.",
            ))
            .attribute(
                AttributeBuilder::new("suspenders", AttributeType::list_of(AttributeType::String))
                    .markdown_description("The suspenders of the service")
                    .computed()
                    .plan_modifier(Box::new(UseStateForUnknown))
                    .build(),
            )
            .build()
    }

    fn decode(value: &DynamicValue, what: &str) -> Result<WebServiceModel, Diagnostic> {
        value
            .to_model()
            .map_err(|e| Diagnostic::error(format!("Failed to decode {}", what), e.to_string()))
    }

    fn encode(model: &WebServiceModel) -> Result<DynamicValue, Diagnostic> {
        DynamicValue::from_model(model)
            .map_err(|e| Diagnostic::error("Failed to encode state", e.to_string()))
    }

    /// Configuration combinations the API would silently ignore
    fn check_env_specific_details(config: &DynamicValue) -> Vec<Diagnostic> {
        let details = AttributePath::new("service_details");
        let Some(env) = config.get_string_opt(&details.clone().attribute("env")) else {
            return vec![];
        };
        let Ok(env) = env.parse::<ServiceEnv>() else {
            return vec![];
        };

        let native = details.attribute("native_environment_details");
        if env.is_container() && !config.is_null_at(&native) && !config.is_unknown_at(&native) {
            return vec![Diagnostic::warning(
                "Ignored native environment details",
                format!(
                    "native_environment_details is only used by native runtimes and is not sent for env \"{}\".",
                    env
                ),
            )
            .with_attribute(native)];
        }

        vec![]
    }
}

fn optional_computed_string(name: &str, description: &str) -> Attribute {
    AttributeBuilder::new(name, AttributeType::String)
        .markdown_description(description)
        .optional()
        .computed()
        .plan_modifier(Box::new(UseStateForUnknown))
        .build()
}

fn stable_computed_string(name: &str, description: &str) -> Attribute {
    AttributeBuilder::new(name, AttributeType::String)
        .markdown_description(description)
        .computed()
        .plan_modifier(Box::new(UseStateForUnknown))
        .build()
}

fn computed_string(name: &str, description: &str) -> Attribute {
    AttributeBuilder::new(name, AttributeType::String)
        .markdown_description(description)
        .computed()
        .build()
}

fn image_attribute() -> Attribute {
    AttributeBuilder::object(
        "image",
        vec![
            AttributeBuilder::new("owner_id", AttributeType::String)
                .markdown_description("The ID of the owner for this image. This should match the owner of the service as well as the owner of any specified registry credential.")
                .required()
                .build(),
            AttributeBuilder::new("registry_credential_id", AttributeType::String)
                .markdown_description("Optional reference to the registry credential passed to the image repository to retrieve this image.")
                .optional()
                .build(),
            AttributeBuilder::new("image_path", AttributeType::String)
                .markdown_description("Path to the image used for this server e.g `docker.io/library/nginx:latest`.")
                .required()
                .build(),
        ],
    )
    .markdown_description("The image used for this server")
    .optional()
    .plan_modifier(Box::new(UseStateForUnknown))
    .build()
}

fn build_filter_attribute() -> Attribute {
    let paths = |name: &str| {
        AttributeBuilder::new(name, AttributeType::list_of(AttributeType::String))
            .optional()
            .computed()
            .plan_modifier(Box::new(UseStateForUnknown))
            .build()
    };

    AttributeBuilder::object("build_filter", vec![paths("paths"), paths("ignored_paths")])
        .markdown_description("The build filter for this service")
        .optional()
        .build()
}

fn autoscaling_attribute() -> Attribute {
    let criteria_object = |name: &str, label: &str| {
        AttributeBuilder::object(
            name,
            vec![
                AttributeBuilder::new("enabled", AttributeType::Bool)
                    .markdown_description(&format!("Whether {} autoscaling is enabled.", label))
                    .optional()
                    .build(),
                AttributeBuilder::new("percentage", AttributeType::Number)
                    .markdown_description("Determines when your service will be scaled. If the average resource utilization is significantly above/below the target, we will increase/decrease the number of instances.")
                    .optional()
                    .build(),
            ],
        )
        .markdown_description(&format!(
            "The {} autoscaling criteria for the service",
            label
        ))
        .required()
        .build()
    };

    AttributeBuilder::object(
        "autoscaling",
        vec![
            AttributeBuilder::new("enabled", AttributeType::Bool)
                .markdown_description("Whether autoscaling is enabled.")
                .optional()
                .build(),
            AttributeBuilder::new("min", AttributeType::Number)
                .markdown_description("The minimum number of instances.")
                .optional()
                .build(),
            AttributeBuilder::new("max", AttributeType::Number)
                .markdown_description("The maximum number of instances.")
                .optional()
                .build(),
            AttributeBuilder::object(
                "criteria",
                vec![criteria_object("cpu", "CPU"), criteria_object("memory", "memory")],
            )
            .markdown_description("The autoscaling criteria for the service")
            .required()
            .build(),
        ],
    )
    .markdown_description("The autoscaling for the service")
    .optional()
    .build()
}

fn disk_attribute() -> Attribute {
    AttributeBuilder::object(
        "disk",
        vec![
            optional_computed_string("name", "The name of the disk"),
            AttributeBuilder::new("size_gb", AttributeType::Number)
                .markdown_description("The size of the disk in GB. Default: `1`.")
                .optional()
                .build(),
            AttributeBuilder::new("mount_path", AttributeType::String)
                .markdown_description("The mount path of the disk.")
                .optional()
                .build(),
            stable_computed_string("id", "The ID of the disk"),
        ],
    )
    .markdown_description("The disk for the service")
    .optional()
    .build()
}

fn native_environment_details_attribute() -> Attribute {
    AttributeBuilder::object(
        "native_environment_details",
        vec![
            AttributeBuilder::new("pre_deploy_command", AttributeType::String)
                .markdown_description("The pre-deploy command for the service")
                .optional()
                .build(),
            AttributeBuilder::new("build_command", AttributeType::String)
                .markdown_description("The build command for the service")
                .required()
                .build(),
            AttributeBuilder::new("start_command", AttributeType::String)
                .markdown_description("The start command for the service")
                .required()
                .build(),
        ],
    )
    .markdown_description("The build and start commands for native runtimes")
    .optional()
    .computed()
    .plan_modifier(Box::new(UseStateForUnknown))
    .build()
}

fn docker_details_attribute() -> Attribute {
    AttributeBuilder::object(
        "docker_details",
        vec![
            computed_string("docker_command", "The docker command for the service"),
            computed_string("docker_context", "The docker context for the service"),
            computed_string("dockerfile_path", "The dockerfile path for the service."),
            computed_string("pre_deploy_command", "The pre-deploy command for the service"),
            computed_string(
                "registry_credential_id",
                "The ID of the registry credential for the service",
            ),
        ],
    )
    .markdown_description("The docker settings for `docker` and `image` services")
    .optional()
    .computed()
    .plan_modifier(Box::new(UseStateForUnknown))
    .build()
}

fn service_details_attribute() -> Attribute {
    AttributeBuilder::object(
        "service_details",
        vec![
            autoscaling_attribute(),
            optional_computed_string(
                "pull_request_previews_enabled",
                "Whether pull request previews are enabled. Valid values are `yes` or `no`. Default: `no`.",
            ),
            disk_attribute(),
            AttributeBuilder::new("env", AttributeType::String)
                .markdown_description("Environment (runtime). Valid values are `node`, `python`, `ruby`, `go`, `elixir`, `image`, `rust`, `docker`.")
                .required()
                .validator(Box::new(StringOneOf::new(ServiceEnv::ALL)))
                .build(),
            native_environment_details_attribute(),
            docker_details_attribute(),
            optional_computed_string(
                "health_check_path",
                "The health check path for the service",
            ),
            AttributeBuilder::new("num_instances", AttributeType::Number)
                .markdown_description("The number of instances for the service. Default: `1`.")
                .required()
                .build(),
            optional_computed_string(
                "plan",
                "The plan for the service. Valid values are `starter`, `starter_plus`, `standard`, `standard_plus`, `pro`, `pro_plus`, `pro_max`, `pro_ultra`. Default: `starter`.",
            ),
            optional_computed_string(
                "region",
                "The region for the service. Valid values are `oregon` `frankfurt` . Defaults to `oregon`.",
            ),
            AttributeBuilder::list_of_objects(
                "open_ports",
                vec![
                    AttributeBuilder::new("port", AttributeType::Number)
                        .markdown_description("The number of the open port")
                        .computed()
                        .build(),
                    computed_string("protocol", "The protocol of the open port"),
                ],
            )
            .markdown_description("The open ports for the service")
            .computed()
            .build(),
            AttributeBuilder::object(
                "parent_server",
                vec![
                    computed_string("id", "The ID of the parent server"),
                    computed_string("name", "The name of the parent server"),
                ],
            )
            .markdown_description("The parent server for the service")
            .computed()
            .build(),
            stable_computed_string("url", "The URL for the service"),
        ],
    )
    .markdown_description("The service details for the service")
    .required()
    .build()
}

#[async_trait]
impl Resource for WebServiceResource {
    fn type_name(&self) -> &str {
        "render_web_service"
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
        let mut diagnostics = validate_attributes(&Self::schema_static(), &request.config);
        diagnostics.extend(Self::check_env_specific_details(&request.config));

        ValidateResourceConfigResponse { diagnostics }
    }

    async fn create(
        &self,
        _ctx: Context,
        request: CreateResourceRequest,
    ) -> CreateResourceResponse {
        let Some(provider_data) = &self.provider_data else {
            return CreateResourceResponse::failed(request.planned_state, super::not_configured());
        };

        let mut plan = match Self::decode(&request.planned_state, "plan") {
            Ok(plan) => plan,
            Err(diag) => return CreateResourceResponse::failed(request.planned_state, diag),
        };

        let body = match web_service_request(&plan) {
            Ok(body) => body,
            Err(e) => {
                return CreateResourceResponse::failed(
                    request.planned_state,
                    Diagnostic::error(CREATE_ERROR, e.to_string()),
                )
            }
        };

        let service = match provider_data.client.services().create(&body).await {
            Ok(service) => service,
            Err(e) => {
                return CreateResourceResponse::failed(
                    request.planned_state,
                    Diagnostic::error(
                        CREATE_ERROR,
                        format!("Could not create web service, unexpected error: {}", e),
                    ),
                )
            }
        };

        tracing::info!("Created web service {} ({})", service.id, service.name);
        hydrate_web_service(&mut plan, &service);

        match Self::encode(&plan) {
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

        let mut state = match Self::decode(&request.current_state, "state") {
            Ok(state) => state,
            Err(diag) => return ReadResourceResponse::failed(request.current_state, diag),
        };
        let id = state.id.clone().unwrap_or_default();

        let service = match provider_data.client.services().get(&id).await {
            Ok(service) => service,
            Err(e) => {
                return ReadResourceResponse::failed(
                    request.current_state,
                    Diagnostic::error(
                        format!("Could not get Render web service: {}", id),
                        e.to_string(),
                    ),
                )
            }
        };

        hydrate_web_service(&mut state, &service);
        match Self::encode(&state) {
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

        let mut plan = match Self::decode(&request.planned_state, "plan") {
            Ok(plan) => plan,
            Err(diag) => return UpdateResourceResponse::failed(request.planned_state, diag),
        };
        let id = request
            .prior_state
            .get_string_opt(&AttributePath::new("id"))
            .unwrap_or_default();
        plan.id = Some(id.clone());

        let body = match web_service_request(&plan) {
            Ok(body) => body,
            Err(e) => {
                return UpdateResourceResponse::failed(
                    request.planned_state,
                    Diagnostic::error(UPDATE_ERROR, e.to_string()),
                )
            }
        };

        let service = match provider_data.client.services().update(&id, &body).await {
            Ok(service) => service,
            Err(e) => {
                return UpdateResourceResponse::failed(
                    request.planned_state,
                    Diagnostic::error(
                        UPDATE_ERROR,
                        format!("Could not update web service ID: {}: {}", id, e),
                    ),
                )
            }
        };

        tracing::info!("Updated web service {}", id);
        hydrate_web_service(&mut plan, &service);

        match Self::encode(&plan) {
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

        match provider_data.client.services().delete(&id).await {
            Ok(()) => {
                tracing::info!("Deleted web service {}", id);
                DeleteResourceResponse::default()
            }
            Err(e) => DeleteResourceResponse::failed(Diagnostic::error(
                "Error deleting Render web service",
                format!("Could not delete web service ID: {}: {}", id, e),
            )),
        }
    }
}

#[async_trait]
impl ResourceWithConfigure for WebServiceResource {
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
impl ResourceWithImportState for WebServiceResource {
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
#[path = "./web_service_test.rs"]
mod web_service_test;
