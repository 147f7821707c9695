//! Service API implementation
//!
//! Render reports an absent optional group (disk, autoscaling, parent server,
//! env specific details) as a zero-valued object instead of omitting it, so
//! every nested record here decodes to its `Default` when missing or null.

use super::common::{null_as_default, ApiQueryParams, CursorItem};
use super::{ApiError, Client};
use serde::{Deserialize, Serialize};

/// A Render service as returned by the API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Service {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub owner_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub repo: String,
    #[serde(deserialize_with = "null_as_default")]
    pub branch: String,
    /// `yes` or `no`
    #[serde(deserialize_with = "null_as_default")]
    pub auto_deploy: String,
    #[serde(deserialize_with = "null_as_default")]
    pub root_dir: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub service_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub slug: String,
    /// `suspended` or `not_suspended`
    #[serde(deserialize_with = "null_as_default")]
    pub suspended: String,
    #[serde(deserialize_with = "null_as_default")]
    pub suspenders: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub image_path: String,
    #[serde(deserialize_with = "null_as_default")]
    pub notify_on_fail: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub updated_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub build_filter: BuildFilter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
    #[serde(deserialize_with = "null_as_default")]
    pub env_vars: Vec<EnvVar>,
    #[serde(deserialize_with = "null_as_default")]
    pub secret_files: Vec<SecretFile>,
    #[serde(deserialize_with = "null_as_default")]
    pub service_details: ServiceDetails,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceDetails {
    #[serde(deserialize_with = "null_as_default")]
    pub autoscaling: Autoscaling,
    #[serde(deserialize_with = "null_as_default")]
    pub disk: Disk,
    #[serde(deserialize_with = "null_as_default")]
    pub env: String,
    #[serde(deserialize_with = "null_as_default")]
    pub env_specific_details: EnvSpecificDetails,
    #[serde(deserialize_with = "null_as_default")]
    pub health_check_path: String,
    #[serde(deserialize_with = "null_as_default")]
    pub num_instances: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub open_ports: Vec<OpenPort>,
    #[serde(deserialize_with = "null_as_default")]
    pub parent_server: ParentServer,
    #[serde(deserialize_with = "null_as_default")]
    pub plan: String,
    /// `yes` or `no`
    #[serde(deserialize_with = "null_as_default")]
    pub pull_request_previews_enabled: String,
    #[serde(deserialize_with = "null_as_default")]
    pub region: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Autoscaling {
    #[serde(deserialize_with = "null_as_default")]
    pub enabled: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub min: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub max: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub criteria: AutoscalingCriteria,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoscalingCriteria {
    #[serde(deserialize_with = "null_as_default")]
    pub cpu: AutoscalingCriteriaObject,
    #[serde(deserialize_with = "null_as_default")]
    pub memory: AutoscalingCriteriaObject,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoscalingCriteriaObject {
    #[serde(deserialize_with = "null_as_default")]
    pub enabled: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub percentage: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Disk {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount_path: Option<String>,
    #[serde(rename = "sizeGB", skip_serializing_if = "Option::is_none")]
    pub size_gb: Option<i64>,
}

/// Runtime specific commands. Docker fields are set for docker and image
/// services, build/start commands for native runtimes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnvSpecificDetails {
    #[serde(deserialize_with = "null_as_default")]
    pub docker_command: String,
    #[serde(deserialize_with = "null_as_default")]
    pub docker_context: String,
    #[serde(deserialize_with = "null_as_default")]
    pub dockerfile_path: String,
    #[serde(deserialize_with = "null_as_default")]
    pub pre_deploy_command: String,
    #[serde(deserialize_with = "null_as_default")]
    pub build_command: String,
    #[serde(deserialize_with = "null_as_default")]
    pub start_command: String,
    #[serde(deserialize_with = "null_as_default")]
    pub registry_credential: RegistryCredentialRef,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryCredentialRef {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub registry: String,
    #[serde(deserialize_with = "null_as_default")]
    pub username: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenPort {
    #[serde(deserialize_with = "null_as_default")]
    pub port: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub protocol: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParentServer {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildFilter {
    #[serde(deserialize_with = "null_as_default")]
    pub paths: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub ignored_paths: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Image {
    #[serde(deserialize_with = "null_as_default")]
    pub owner_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_credential_id: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub image_path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvVar {
    #[serde(deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(deserialize_with = "null_as_default")]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretFile {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
}

/// Body of POST /services and PATCH /services/{id}
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    #[serde(rename = "type")]
    pub service_type: String,
    pub name: String,
    pub owner_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_deploy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_filter: Option<BuildFilter>,
    pub env_vars: Vec<EnvVar>,
    pub secret_files: Vec<SecretFile>,
    pub service_details: ServiceDetailsRequest,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDetailsRequest {
    pub env: String,
    pub num_instances: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_request_previews_enabled: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoscaling: Option<Autoscaling>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk: Option<DiskRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_specific_details: Option<NativeCommandsRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount_path: Option<String>,
    #[serde(rename = "sizeGB", skip_serializing_if = "Option::is_none")]
    pub size_gb: Option<i64>,
}

/// Build and start commands for native runtimes
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeCommandsRequest {
    pub build_command: String,
    pub start_command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_deploy_command: Option<String>,
}

/// Query for GET /services
#[derive(Debug, Clone, Default)]
pub struct ServiceFilter {
    pub name: Option<String>,
    pub service_type: Option<String>,
}

impl ServiceFilter {
    pub fn web_services() -> Self {
        Self {
            name: None,
            service_type: Some("web_service".to_string()),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn to_query_params(&self) -> ApiQueryParams {
        ApiQueryParams::new()
            .add_optional("name", self.name.as_deref())
            .add_optional("type", self.service_type.as_deref())
    }
}

/// Element of GET /services
#[derive(Debug, Deserialize)]
pub struct ServiceWithCursor {
    pub service: Service,
    #[serde(default)]
    pub cursor: String,
}

impl CursorItem for ServiceWithCursor {
    type Item = Service;

    fn into_parts(self) -> (Service, String) {
        (self.service, self.cursor)
    }
}

/// POST /services answers `{service, deployId}`; older responses were the bare service
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CreateServiceResponse {
    Deployed {
        service: Service,
        #[serde(rename = "deployId", default)]
        deploy_id: Option<String>,
    },
    Bare(Service),
}

impl CreateServiceResponse {
    fn into_service(self) -> Service {
        match self {
            CreateServiceResponse::Deployed { service, deploy_id } => {
                if let Some(deploy_id) = deploy_id {
                    tracing::debug!("Service {} created with deploy {}", service.id, deploy_id);
                }
                service
            }
            CreateServiceResponse::Bare(service) => service,
        }
    }
}

pub struct ServicesApi<'a> {
    client: &'a Client,
}

impl<'a> ServicesApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    fn path(id: &str) -> String {
        format!("/services/{}", urlencoding::encode(id))
    }

    /// GET /services, every page
    pub async fn list(&self, filter: &ServiceFilter) -> Result<Vec<Service>, ApiError> {
        self.client
            .get_all_pages::<ServiceWithCursor>("/services", &filter.to_query_params())
            .await
    }

    /// GET /services/{id}
    pub async fn get(&self, id: &str) -> Result<Service, ApiError> {
        self.client.get(&Self::path(id)).await
    }

    /// POST /services
    pub async fn create(&self, request: &ServiceRequest) -> Result<Service, ApiError> {
        let response: CreateServiceResponse = self.client.post("/services", request).await?;
        Ok(response.into_service())
    }

    /// PATCH /services/{id}
    pub async fn update(&self, id: &str, request: &ServiceRequest) -> Result<Service, ApiError> {
        self.client.patch(&Self::path(id), request).await
    }

    /// DELETE /services/{id}
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&Self::path(id)).await
    }
}
