//! Managed resources
//!
//! A resource is built by its provider factory, configured once with the
//! provider data and then driven through plan and apply. Every lifecycle
//! call reports problems as diagnostics; none of them return `Result`.

use crate::context::Context;
use crate::schema::Schema;
use crate::types::{ClientCapabilities, Diagnostic, DynamicValue};
use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;

#[async_trait]
pub trait Resource: Send + Sync {
    /// Full type name, e.g. "render_web_service"
    fn type_name(&self) -> &str;

    async fn metadata(
        &self,
        ctx: Context,
        request: ResourceMetadataRequest,
    ) -> ResourceMetadataResponse;

    async fn schema(&self, ctx: Context, request: ResourceSchemaRequest) -> ResourceSchemaResponse;

    async fn validate(
        &self,
        ctx: Context,
        request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse;

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse;

    /// Refresh. `new_state: None` means the remote object is known to be gone.
    async fn read(&self, ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse;

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse;

    async fn delete(&self, ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse;
}

/// Receives the provider data right after the factory builds the resource
#[async_trait]
pub trait ResourceWithConfigure: Resource {
    async fn configure(
        &mut self,
        ctx: Context,
        request: ConfigureResourceRequest,
    ) -> ConfigureResourceResponse;

    /// Importable resources return `Some(self)`
    fn as_import_state(&self) -> Option<&dyn ResourceWithImportState> {
        None
    }
}

#[async_trait]
pub trait ResourceWithImportState: Resource {
    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse;
}

// Metadata and schema

pub struct ResourceMetadataRequest;

pub struct ResourceMetadataResponse {
    pub type_name: String,
}

pub struct ResourceSchemaRequest;

pub struct ResourceSchemaResponse {
    pub schema: Schema,
    pub diagnostics: Vec<Diagnostic>,
}

// Configuration

pub struct ValidateResourceConfigRequest {
    pub type_name: String,
    pub config: DynamicValue,
    pub client_capabilities: ClientCapabilities,
}

#[derive(Default)]
pub struct ValidateResourceConfigResponse {
    pub diagnostics: Vec<Diagnostic>,
}

pub struct ConfigureResourceRequest {
    pub provider_data: Option<Arc<dyn Any + Send + Sync>>,
}

#[derive(Default)]
pub struct ConfigureResourceResponse {
    pub diagnostics: Vec<Diagnostic>,
}

// Apply

pub struct CreateResourceRequest {
    pub type_name: String,
    pub planned_state: DynamicValue,
    /// Only place write-only attributes can be read from
    pub config: DynamicValue,
}

pub struct CreateResourceResponse {
    pub new_state: DynamicValue,
    pub diagnostics: Vec<Diagnostic>,
}

impl CreateResourceResponse {
    /// Nothing was created; the plan is handed back unchanged
    pub fn failed(planned_state: DynamicValue, diagnostic: Diagnostic) -> Self {
        Self {
            new_state: planned_state,
            diagnostics: vec![diagnostic],
        }
    }
}

pub struct ReadResourceRequest {
    pub type_name: String,
    pub current_state: DynamicValue,
}

pub struct ReadResourceResponse {
    pub new_state: Option<DynamicValue>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ReadResourceResponse {
    /// Keeps the current state so a failed refresh never drops the resource
    pub fn failed(current_state: DynamicValue, diagnostic: Diagnostic) -> Self {
        Self {
            new_state: Some(current_state),
            diagnostics: vec![diagnostic],
        }
    }
}

pub struct UpdateResourceRequest {
    pub type_name: String,
    pub prior_state: DynamicValue,
    pub planned_state: DynamicValue,
    pub config: DynamicValue,
}

pub struct UpdateResourceResponse {
    pub new_state: DynamicValue,
    pub diagnostics: Vec<Diagnostic>,
}

impl UpdateResourceResponse {
    pub fn failed(planned_state: DynamicValue, diagnostic: Diagnostic) -> Self {
        Self {
            new_state: planned_state,
            diagnostics: vec![diagnostic],
        }
    }
}

pub struct DeleteResourceRequest {
    pub type_name: String,
    pub prior_state: DynamicValue,
}

#[derive(Default)]
pub struct DeleteResourceResponse {
    pub diagnostics: Vec<Diagnostic>,
}

impl DeleteResourceResponse {
    pub fn failed(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
        }
    }
}

// Import

pub struct ImportResourceStateRequest {
    pub type_name: String,
    pub id: String,
}

#[derive(Default)]
pub struct ImportResourceStateResponse {
    pub imported_resources: Vec<ImportedResource>,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct ImportedResource {
    pub type_name: String,
    pub state: DynamicValue,
}
