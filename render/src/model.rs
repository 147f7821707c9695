//! Terraform-side models and their translation to and from Render API records
//!
//! Models mirror the resource and data source schemas attribute for attribute
//! and are moved in and out of `DynamicValue` with `to_model`/`from_model`.
//! Every field is optional because plan and state values may be null.

use crate::api::owners::Owner;
use crate::api::registry_credentials::{RegistryCredential, RegistryCredentialRequest};
use crate::api::services::{
    Autoscaling, AutoscalingCriteria, AutoscalingCriteriaObject, BuildFilter, Disk, DiskRequest,
    EnvSpecificDetails as ApiEnvSpecificDetails, EnvVar, Image, NativeCommandsRequest,
    ParentServer, RegistryCredentialRef, SecretFile, Service, ServiceDetailsRequest,
    ServiceRequest,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const WEB_SERVICE_TYPE: &str = "web_service";

#[derive(Debug, Error, PartialEq)]
pub enum TranslateError {
    #[error("The registry value must be one of GITHUB, GITLAB, or DOCKER, got: {0}")]
    InvalidRegistry(String),

    #[error("the environment value must be one of docker, image, rust, go, elixir, node, python, or ruby, got: {0}")]
    InvalidEnv(String),

    #[error("missing required attribute: {0}")]
    MissingAttribute(&'static str),
}

/// Container registries a credential can authenticate against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registry {
    Github,
    Gitlab,
    Docker,
}

impl Registry {
    pub const ALL: [&'static str; 3] = ["GITHUB", "GITLAB", "DOCKER"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Registry::Github => "GITHUB",
            Registry::Gitlab => "GITLAB",
            Registry::Docker => "DOCKER",
        }
    }
}

impl FromStr for Registry {
    type Err = TranslateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GITHUB" => Ok(Registry::Github),
            "GITLAB" => Ok(Registry::Gitlab),
            "DOCKER" => Ok(Registry::Docker),
            other => Err(TranslateError::InvalidRegistry(other.to_string())),
        }
    }
}

impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceEnv {
    Node,
    Python,
    Ruby,
    Go,
    Elixir,
    Rust,
    Image,
    Docker,
}

impl ServiceEnv {
    pub const ALL: [&'static str; 8] = [
        "node", "python", "ruby", "go", "elixir", "rust", "image", "docker",
    ];

    /// Docker and prebuilt image services carry docker details rather than
    /// build and start commands.
    pub fn is_container(&self) -> bool {
        matches!(self, ServiceEnv::Image | ServiceEnv::Docker)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceEnv::Node => "node",
            ServiceEnv::Python => "python",
            ServiceEnv::Ruby => "ruby",
            ServiceEnv::Go => "go",
            ServiceEnv::Elixir => "elixir",
            ServiceEnv::Rust => "rust",
            ServiceEnv::Image => "image",
            ServiceEnv::Docker => "docker",
        }
    }
}

impl FromStr for ServiceEnv {
    type Err = TranslateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "node" => Ok(ServiceEnv::Node),
            "python" => Ok(ServiceEnv::Python),
            "ruby" => Ok(ServiceEnv::Ruby),
            "go" => Ok(ServiceEnv::Go),
            "elixir" => Ok(ServiceEnv::Elixir),
            "rust" => Ok(ServiceEnv::Rust),
            "image" => Ok(ServiceEnv::Image),
            "docker" => Ok(ServiceEnv::Docker),
            other => Err(TranslateError::InvalidEnv(other.to_string())),
        }
    }
}

impl fmt::Display for ServiceEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryCredentialModel {
    pub id: Option<String>,
    pub name: Option<String>,
    pub registry: Option<String>,
    pub username: Option<String>,
    pub auth_token: Option<String>,
    pub owner_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryCredentialDataSourceModel {
    pub id: Option<String>,
    pub name: Option<String>,
    pub registry: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryCredentialsDataSourceModel {
    pub registry_credentials: Option<Vec<RegistryCredentialDataSourceModel>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwnerModel {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "type")]
    pub owner_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwnersDataSourceModel {
    pub owners: Option<Vec<OwnerModel>>,
}

/// Validates the registry before anything is sent
pub fn registry_credential_request(
    model: &RegistryCredentialModel,
) -> Result<RegistryCredentialRequest, TranslateError> {
    let registry: Registry = model.registry.as_deref().unwrap_or_default().parse()?;

    Ok(RegistryCredentialRequest {
        registry: registry.to_string(),
        name: model.name.clone().unwrap_or_default(),
        username: model.username.clone().unwrap_or_default(),
        auth_token: model.auth_token.clone().unwrap_or_default(),
        owner_id: model.owner_id.clone().unwrap_or_default(),
    })
}

/// `auth_token` and `owner_id` are not part of the API record and are left alone
pub fn hydrate_registry_credential(
    model: &mut RegistryCredentialModel,
    credential: &RegistryCredential,
) {
    model.id = Some(credential.id.clone());
    model.name = Some(credential.name.clone());
    model.registry = Some(credential.registry.clone());
    model.username = Some(credential.username.clone());
}

pub fn registry_credential_data_source_model(
    credential: &RegistryCredential,
) -> RegistryCredentialDataSourceModel {
    RegistryCredentialDataSourceModel {
        id: Some(credential.id.clone()),
        name: Some(credential.name.clone()),
        registry: Some(credential.registry.clone()),
        username: Some(credential.username.clone()),
    }
}

pub fn owner_model(owner: &Owner) -> OwnerModel {
    OwnerModel {
        id: Some(owner.id.clone()),
        name: Some(owner.name.clone()),
        email: Some(owner.email.clone()),
        owner_type: Some(owner.owner_type.clone()),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebServiceModel {
    pub id: Option<String>,
    pub name: Option<String>,
    pub owner_id: Option<String>,
    pub repo: Option<String>,
    pub auto_deploy: Option<String>,
    pub branch: Option<String>,
    pub root_dir: Option<String>,
    pub image: Option<ImageModel>,
    pub build_filter: Option<BuildFilterModel>,
    pub service_details: Option<ServiceDetailsModel>,
    pub secret_files: Option<Vec<SecretFileModel>>,
    pub environment_variables: Option<Vec<EnvironmentVariableModel>>,
    #[serde(rename = "type")]
    pub service_type: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub image_path: Option<String>,
    pub notify_on_fail: Option<String>,
    pub slug: Option<String>,
    pub suspended: Option<String>,
    pub suspenders: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceDetailsModel {
    pub autoscaling: Option<AutoscalingModel>,
    pub pull_request_previews_enabled: Option<String>,
    pub disk: Option<DiskModel>,
    pub env: Option<String>,
    pub native_environment_details: Option<NativeEnvironmentDetailsModel>,
    pub docker_details: Option<DockerDetailsModel>,
    pub health_check_path: Option<String>,
    pub num_instances: Option<i64>,
    pub plan: Option<String>,
    pub region: Option<String>,
    pub open_ports: Option<Vec<OpenPortModel>>,
    pub parent_server: Option<ParentServerModel>,
    pub url: Option<String>,
}

/// The runtime specific half of `service_details`. Only the variant that
/// matches `env` is ever stored.
#[derive(Debug, Clone, PartialEq)]
pub enum EnvSpecificDetails {
    Docker(DockerDetailsModel),
    Native(NativeEnvironmentDetailsModel),
}

impl ServiceDetailsModel {
    pub fn env_specific_details(&self) -> Option<EnvSpecificDetails> {
        self.docker_details
            .clone()
            .map(EnvSpecificDetails::Docker)
            .or_else(|| {
                self.native_environment_details
                    .clone()
                    .map(EnvSpecificDetails::Native)
            })
    }

    /// Stores one variant and clears the other
    pub fn set_env_specific_details(&mut self, details: Option<EnvSpecificDetails>) {
        match details {
            Some(EnvSpecificDetails::Docker(docker)) => {
                self.docker_details = Some(docker);
                self.native_environment_details = None;
            }
            Some(EnvSpecificDetails::Native(native)) => {
                self.docker_details = None;
                self.native_environment_details = Some(native);
            }
            None => {
                self.docker_details = None;
                self.native_environment_details = None;
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoscalingModel {
    pub enabled: Option<bool>,
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub criteria: Option<AutoscalingCriteriaModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoscalingCriteriaModel {
    pub cpu: Option<AutoscalingCriteriaObjectModel>,
    pub memory: Option<AutoscalingCriteriaObjectModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoscalingCriteriaObjectModel {
    pub enabled: Option<bool>,
    pub percentage: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiskModel {
    pub name: Option<String>,
    pub size_gb: Option<i64>,
    pub mount_path: Option<String>,
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NativeEnvironmentDetailsModel {
    pub pre_deploy_command: Option<String>,
    pub build_command: Option<String>,
    pub start_command: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockerDetailsModel {
    pub docker_command: Option<String>,
    pub docker_context: Option<String>,
    pub dockerfile_path: Option<String>,
    pub pre_deploy_command: Option<String>,
    pub registry_credential_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenPortModel {
    pub port: Option<i64>,
    pub protocol: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParentServerModel {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildFilterModel {
    pub paths: Option<Vec<String>>,
    pub ignored_paths: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageModel {
    pub owner_id: Option<String>,
    pub registry_credential_id: Option<String>,
    pub image_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentVariableModel {
    pub key: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretFileModel {
    pub name: Option<String>,
    pub contents: Option<String>,
}

// Data source views of a service

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceDataSourceModel {
    pub id: Option<String>,
    pub name: Option<String>,
    pub owner_id: Option<String>,
    pub repo: Option<String>,
    pub auto_deploy: Option<String>,
    pub branch: Option<String>,
    pub root_dir: Option<String>,
    pub build_filter: Option<BuildFilterModel>,
    pub environment_variables: Option<Vec<EnvironmentVariableModel>>,
    pub service_details: Option<ServiceDetailsDataSourceModel>,
    #[serde(rename = "type")]
    pub service_type: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub image_path: Option<String>,
    pub notify_on_fail: Option<String>,
    pub slug: Option<String>,
    pub suspended: Option<String>,
    pub suspenders: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceDetailsDataSourceModel {
    pub autoscaling: Option<AutoscalingModel>,
    pub disk: Option<DiskRefModel>,
    pub env: Option<String>,
    pub env_specific_details: Option<EnvSpecificDetailsDataSourceModel>,
    pub health_check_path: Option<String>,
    pub num_instances: Option<i64>,
    pub open_ports: Option<Vec<OpenPortModel>>,
    pub parent_server: Option<ParentServerModel>,
    pub plan: Option<String>,
    pub pull_request_previews_enabled: Option<String>,
    pub region: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiskRefModel {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvSpecificDetailsDataSourceModel {
    pub docker_command: Option<String>,
    pub docker_context: Option<String>,
    pub dockerfile_path: Option<String>,
    pub pre_deploy_command: Option<String>,
    pub build_command: Option<String>,
    pub start_command: Option<String>,
    pub registry_credential: Option<RegistryCredentialRefModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryCredentialRefModel {
    pub id: Option<String>,
    pub name: Option<String>,
    pub registry: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebServicesDataSourceModel {
    pub name: Option<String>,
    pub web_services: Option<Vec<ServiceDataSourceModel>>,
}

// Presence predicates. Render sends a zero-valued object for a group that
// isn't configured, so presence is read off one discriminating field.

pub fn disk_present(disk: &Disk) -> bool {
    !disk.id.is_empty()
}

pub fn autoscaling_present(autoscaling: &Autoscaling) -> bool {
    autoscaling.enabled
}

pub fn parent_server_present(parent: &ParentServer) -> bool {
    !parent.id.is_empty()
}

pub fn env_specific_details_present(details: &ApiEnvSpecificDetails) -> bool {
    [
        &details.docker_command,
        &details.docker_context,
        &details.dockerfile_path,
        &details.pre_deploy_command,
        &details.build_command,
        &details.start_command,
    ]
    .iter()
    .any(|s| !s.is_empty())
}

pub fn registry_credential_present(credential: &RegistryCredentialRef) -> bool {
    !credential.id.is_empty()
}

pub fn build_filter_present(filter: &BuildFilter) -> bool {
    !filter.paths.is_empty() || !filter.ignored_paths.is_empty()
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Builds the create/update body for a web service. `env` is validated
/// before anything else is read.
pub fn web_service_request(model: &WebServiceModel) -> Result<ServiceRequest, TranslateError> {
    let details = model
        .service_details
        .as_ref()
        .ok_or(TranslateError::MissingAttribute("service_details"))?;
    let env: ServiceEnv = details.env.as_deref().unwrap_or_default().parse()?;

    let name = model
        .name
        .clone()
        .ok_or(TranslateError::MissingAttribute("name"))?;
    let owner_id = model
        .owner_id
        .clone()
        .ok_or(TranslateError::MissingAttribute("owner_id"))?;
    let num_instances = details
        .num_instances
        .ok_or(TranslateError::MissingAttribute("service_details.num_instances"))?;

    let env_specific_details = if env.is_container() {
        None
    } else {
        details
            .native_environment_details
            .as_ref()
            .map(|native| NativeCommandsRequest {
                build_command: native.build_command.clone().unwrap_or_default(),
                start_command: native.start_command.clone().unwrap_or_default(),
                pre_deploy_command: native.pre_deploy_command.clone(),
            })
    };

    let service_details = ServiceDetailsRequest {
        env: env.to_string(),
        num_instances,
        plan: details.plan.clone(),
        region: details.region.clone(),
        health_check_path: details.health_check_path.clone(),
        pull_request_previews_enabled: details.pull_request_previews_enabled.clone(),
        autoscaling: details.autoscaling.as_ref().map(autoscaling_request),
        disk: details.disk.as_ref().map(|disk| DiskRequest {
            name: disk.name.clone().unwrap_or_default(),
            mount_path: disk.mount_path.clone(),
            size_gb: disk.size_gb,
        }),
        env_specific_details,
    };

    Ok(ServiceRequest {
        service_type: WEB_SERVICE_TYPE.to_string(),
        name,
        owner_id,
        repo: model.repo.clone(),
        auto_deploy: model.auto_deploy.clone(),
        branch: model.branch.clone(),
        root_dir: model.root_dir.clone(),
        image: model.image.as_ref().map(|image| Image {
            owner_id: image.owner_id.clone().unwrap_or_default(),
            registry_credential_id: image.registry_credential_id.clone(),
            image_path: image.image_path.clone().unwrap_or_default(),
        }),
        build_filter: model.build_filter.as_ref().map(|filter| BuildFilter {
            paths: filter.paths.clone().unwrap_or_default(),
            ignored_paths: filter.ignored_paths.clone().unwrap_or_default(),
        }),
        env_vars: model
            .environment_variables
            .iter()
            .flatten()
            .map(|var| EnvVar {
                key: var.key.clone().unwrap_or_default(),
                value: var.value.clone().unwrap_or_default(),
            })
            .collect(),
        secret_files: model
            .secret_files
            .iter()
            .flatten()
            .map(|file| SecretFile {
                name: file.name.clone().unwrap_or_default(),
                content: file.contents.clone().unwrap_or_default(),
            })
            .collect(),
        service_details,
    })
}

fn autoscaling_request(model: &AutoscalingModel) -> Autoscaling {
    let criteria = model.criteria.clone().unwrap_or_default();
    let object = |o: Option<AutoscalingCriteriaObjectModel>| {
        let o = o.unwrap_or_default();
        AutoscalingCriteriaObject {
            enabled: o.enabled.unwrap_or(false),
            percentage: o.percentage.unwrap_or_default(),
        }
    };

    Autoscaling {
        enabled: model.enabled.unwrap_or(false),
        min: model.min.unwrap_or_default(),
        max: model.max.unwrap_or_default(),
        criteria: AutoscalingCriteria {
            cpu: object(criteria.cpu),
            memory: object(criteria.memory),
        },
    }
}

fn autoscaling_model(autoscaling: &Autoscaling) -> AutoscalingModel {
    let object = |o: &AutoscalingCriteriaObject| AutoscalingCriteriaObjectModel {
        enabled: Some(o.enabled),
        percentage: Some(o.percentage),
    };

    AutoscalingModel {
        enabled: Some(autoscaling.enabled),
        min: Some(autoscaling.min),
        max: Some(autoscaling.max),
        criteria: Some(AutoscalingCriteriaModel {
            cpu: Some(object(&autoscaling.criteria.cpu)),
            memory: Some(object(&autoscaling.criteria.memory)),
        }),
    }
}

fn open_ports_model(service: &Service) -> Vec<OpenPortModel> {
    service
        .service_details
        .open_ports
        .iter()
        .map(|port| OpenPortModel {
            port: Some(port.port),
            protocol: Some(port.protocol.clone()),
        })
        .collect()
}

fn parent_server_model(parent: &ParentServer) -> Option<ParentServerModel> {
    parent_server_present(parent).then(|| ParentServerModel {
        id: Some(parent.id.clone()),
        name: Some(parent.name.clone()),
    })
}

fn build_filter_model(filter: &BuildFilter) -> Option<BuildFilterModel> {
    build_filter_present(filter).then(|| BuildFilterModel {
        paths: Some(filter.paths.clone()),
        ignored_paths: Some(filter.ignored_paths.clone()),
    })
}

/// Render lists come back newest first; state keeps them oldest first
fn environment_variables_model(service: &Service) -> Vec<EnvironmentVariableModel> {
    service
        .env_vars
        .iter()
        .rev()
        .map(|var| EnvironmentVariableModel {
            key: Some(var.key.clone()),
            value: Some(var.value.clone()),
        })
        .collect()
}

fn secret_files_model(service: &Service) -> Vec<SecretFileModel> {
    service
        .secret_files
        .iter()
        .rev()
        .map(|file| SecretFileModel {
            name: Some(file.name.clone()),
            contents: Some(file.content.clone()),
        })
        .collect()
}

/// Picks the variant for `env`. Unknown runtimes are treated as native.
fn env_specific_details_model(
    env: &str,
    details: &ApiEnvSpecificDetails,
) -> Option<EnvSpecificDetails> {
    if !env_specific_details_present(details) {
        return None;
    }

    let container = env
        .parse::<ServiceEnv>()
        .map(|e| e.is_container())
        .unwrap_or(false);

    if container {
        Some(EnvSpecificDetails::Docker(DockerDetailsModel {
            docker_command: non_empty(&details.docker_command),
            docker_context: non_empty(&details.docker_context),
            dockerfile_path: non_empty(&details.dockerfile_path),
            pre_deploy_command: non_empty(&details.pre_deploy_command),
            registry_credential_id: registry_credential_present(&details.registry_credential)
                .then(|| details.registry_credential.id.clone()),
        }))
    } else {
        Some(EnvSpecificDetails::Native(NativeEnvironmentDetailsModel {
            pre_deploy_command: non_empty(&details.pre_deploy_command),
            build_command: non_empty(&details.build_command),
            start_command: non_empty(&details.start_command),
        }))
    }
}

/// Copies an API service into the resource model.
///
/// `image` is never returned by Render and keeps its planned value. Disk
/// `mount_path` and `size_gb` are only overwritten when Render returns them.
pub fn hydrate_web_service(model: &mut WebServiceModel, service: &Service) {
    model.id = Some(service.id.clone());
    model.name = Some(service.name.clone());
    model.owner_id = Some(service.owner_id.clone());
    model.repo = Some(service.repo.clone());
    model.auto_deploy = Some(service.auto_deploy.clone());
    model.branch = Some(service.branch.clone());
    model.root_dir = Some(service.root_dir.clone());
    model.service_type = Some(service.service_type.clone());
    model.created_at = Some(service.created_at.clone());
    model.updated_at = Some(service.updated_at.clone());
    model.image_path = Some(service.image_path.clone());
    model.notify_on_fail = Some(service.notify_on_fail.clone());
    model.slug = Some(service.slug.clone());
    model.suspended = Some(service.suspended.clone());
    model.suspenders = Some(service.suspenders.clone());

    if let Some(filter) = build_filter_model(&service.build_filter) {
        model.build_filter = Some(filter);
    }

    model.environment_variables = Some(environment_variables_model(service));
    model.secret_files = Some(secret_files_model(service));

    let api = &service.service_details;
    let prior_disk = model
        .service_details
        .as_ref()
        .and_then(|d| d.disk.clone())
        .unwrap_or_default();

    let mut details = ServiceDetailsModel {
        autoscaling: autoscaling_present(&api.autoscaling).then(|| autoscaling_model(&api.autoscaling)),
        pull_request_previews_enabled: Some(api.pull_request_previews_enabled.clone()),
        disk: disk_present(&api.disk).then(|| DiskModel {
            id: Some(api.disk.id.clone()),
            name: Some(api.disk.name.clone()),
            mount_path: api.disk.mount_path.clone().or(prior_disk.mount_path),
            size_gb: api.disk.size_gb.or(prior_disk.size_gb),
        }),
        env: Some(api.env.clone()),
        native_environment_details: None,
        docker_details: None,
        health_check_path: Some(api.health_check_path.clone()),
        num_instances: Some(api.num_instances),
        plan: Some(api.plan.clone()),
        region: Some(api.region.clone()),
        open_ports: Some(open_ports_model(service)),
        parent_server: parent_server_model(&api.parent_server),
        url: Some(api.url.clone()),
    };
    details.set_env_specific_details(env_specific_details_model(
        &api.env,
        &api.env_specific_details,
    ));

    model.service_details = Some(details);
}

/// The read-only view used by both web service data sources
pub fn service_data_source_model(service: &Service) -> ServiceDataSourceModel {
    let api = &service.service_details;
    let env_details = &api.env_specific_details;

    let env_specific_details =
        env_specific_details_present(env_details).then(|| EnvSpecificDetailsDataSourceModel {
            docker_command: Some(env_details.docker_command.clone()),
            docker_context: Some(env_details.docker_context.clone()),
            dockerfile_path: Some(env_details.dockerfile_path.clone()),
            pre_deploy_command: Some(env_details.pre_deploy_command.clone()),
            build_command: Some(env_details.build_command.clone()),
            start_command: Some(env_details.start_command.clone()),
            registry_credential: registry_credential_present(&env_details.registry_credential)
                .then(|| RegistryCredentialRefModel {
                    id: Some(env_details.registry_credential.id.clone()),
                    name: Some(env_details.registry_credential.name.clone()),
                    registry: Some(env_details.registry_credential.registry.clone()),
                    username: Some(env_details.registry_credential.username.clone()),
                }),
        });

    ServiceDataSourceModel {
        id: Some(service.id.clone()),
        name: Some(service.name.clone()),
        owner_id: Some(service.owner_id.clone()),
        repo: Some(service.repo.clone()),
        auto_deploy: Some(service.auto_deploy.clone()),
        branch: Some(service.branch.clone()),
        root_dir: Some(service.root_dir.clone()),
        build_filter: build_filter_model(&service.build_filter),
        environment_variables: Some(environment_variables_model(service)),
        service_details: Some(ServiceDetailsDataSourceModel {
            autoscaling: autoscaling_present(&api.autoscaling)
                .then(|| autoscaling_model(&api.autoscaling)),
            disk: disk_present(&api.disk).then(|| DiskRefModel {
                id: Some(api.disk.id.clone()),
                name: Some(api.disk.name.clone()),
            }),
            env: Some(api.env.clone()),
            env_specific_details,
            health_check_path: Some(api.health_check_path.clone()),
            num_instances: Some(api.num_instances),
            open_ports: Some(open_ports_model(service)),
            parent_server: parent_server_model(&api.parent_server),
            plan: Some(api.plan.clone()),
            pull_request_previews_enabled: Some(api.pull_request_previews_enabled.clone()),
            region: Some(api.region.clone()),
            url: Some(api.url.clone()),
        }),
        service_type: Some(service.service_type.clone()),
        created_at: Some(service.created_at.clone()),
        updated_at: Some(service.updated_at.clone()),
        image_path: Some(service.image_path.clone()),
        notify_on_fail: Some(service.notify_on_fail.clone()),
        slug: Some(service.slug.clone()),
        suspended: Some(service.suspended.clone()),
        suspenders: Some(service.suspenders.clone()),
    }
}

#[cfg(test)]
#[path = "./model_test.rs"]
mod model_test;
