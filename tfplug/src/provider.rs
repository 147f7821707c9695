//! Provider trait and related types

use crate::context::Context;
use crate::data_source::DataSourceWithConfigure;
use crate::resource::ResourceWithConfigure;
use crate::schema::Schema;
use crate::types::{ClientCapabilities, Diagnostic, DynamicValue, ServerCapabilities};
use async_trait::async_trait;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// Builds a fresh resource instance for each request
pub type ResourceFactory = Box<dyn Fn() -> Box<dyn ResourceWithConfigure> + Send + Sync>;

/// Builds a fresh data source instance for each request
pub type DataSourceFactory = Box<dyn Fn() -> Box<dyn DataSourceWithConfigure> + Send + Sync>;

#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider type name, the prefix of every resource type (e.g. "render")
    fn type_name(&self) -> &str;

    async fn metadata(
        &self,
        ctx: Context,
        request: ProviderMetadataRequest,
    ) -> ProviderMetadataResponse;

    async fn schema(&self, ctx: Context, request: ProviderSchemaRequest) -> ProviderSchemaResponse;

    async fn meta_schema(
        &self,
        ctx: Context,
        request: ProviderMetaSchemaRequest,
    ) -> ProviderMetaSchemaResponse;

    /// Called once with the provider block. The returned provider_data is
    /// handed to every resource and data source configure call.
    async fn configure(
        &mut self,
        ctx: Context,
        request: ConfigureProviderRequest,
    ) -> ConfigureProviderResponse;

    async fn validate(
        &self,
        ctx: Context,
        request: ValidateProviderConfigRequest,
    ) -> ValidateProviderConfigResponse;

    async fn stop(&self, ctx: Context, request: StopProviderRequest) -> StopProviderResponse;

    /// Keys are full resource type names
    fn resources(&self) -> HashMap<String, ResourceFactory>;

    /// Keys are full data source type names
    fn data_sources(&self) -> HashMap<String, DataSourceFactory>;
}

pub struct ProviderMetadataRequest;

pub struct ProviderMetadataResponse {
    pub type_name: String,
    pub server_capabilities: ServerCapabilities,
}

pub struct ProviderSchemaRequest;

pub struct ProviderSchemaResponse {
    pub schema: Schema,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct ProviderMetaSchemaRequest;

pub struct ProviderMetaSchemaResponse {
    pub schema: Option<Schema>,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct ConfigureProviderRequest {
    pub terraform_version: String,
    pub config: DynamicValue,
    pub client_capabilities: ClientCapabilities,
}

pub struct ConfigureProviderResponse {
    pub diagnostics: Vec<Diagnostic>,
    pub provider_data: Option<Arc<dyn Any + Send + Sync>>,
}

pub struct ValidateProviderConfigRequest {
    pub config: DynamicValue,
}

pub struct ValidateProviderConfigResponse {
    pub diagnostics: Vec<Diagnostic>,
}

pub struct StopProviderRequest;

pub struct StopProviderResponse {
    pub error: Option<String>,
}
