//! Read-only data sources

use crate::context::Context;
use crate::schema::Schema;
use crate::types::{Diagnostic, DynamicValue};
use async_trait::async_trait;
use serde::Serialize;
use std::any::Any;
use std::sync::Arc;

#[async_trait]
pub trait DataSource: Send + Sync {
    /// Same key the provider registers the factory under
    fn type_name(&self) -> &str;

    async fn metadata(
        &self,
        ctx: Context,
        request: DataSourceMetadataRequest,
    ) -> DataSourceMetadataResponse;

    async fn schema(
        &self,
        ctx: Context,
        request: DataSourceSchemaRequest,
    ) -> DataSourceSchemaResponse;

    async fn validate(
        &self,
        ctx: Context,
        request: ValidateDataSourceConfigRequest,
    ) -> ValidateDataSourceConfigResponse;

    /// Every computed attribute must be known in the returned state
    async fn read(&self, ctx: Context, request: ReadDataSourceRequest) -> ReadDataSourceResponse;
}

#[async_trait]
pub trait DataSourceWithConfigure: DataSource {
    async fn configure(
        &mut self,
        ctx: Context,
        request: ConfigureDataSourceRequest,
    ) -> ConfigureDataSourceResponse;
}

pub struct DataSourceMetadataRequest;

pub struct DataSourceMetadataResponse {
    pub type_name: String,
}

pub struct DataSourceSchemaRequest;

pub struct DataSourceSchemaResponse {
    pub schema: Schema,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct ValidateDataSourceConfigRequest {
    pub type_name: String,
    pub config: DynamicValue,
}

#[derive(Default)]
pub struct ValidateDataSourceConfigResponse {
    pub diagnostics: Vec<Diagnostic>,
}

pub struct ConfigureDataSourceRequest {
    pub provider_data: Option<Arc<dyn Any + Send + Sync>>,
}

#[derive(Default)]
pub struct ConfigureDataSourceResponse {
    pub diagnostics: Vec<Diagnostic>,
}

pub struct ReadDataSourceRequest {
    pub type_name: String,
    pub config: DynamicValue,
}

pub struct ReadDataSourceResponse {
    pub state: DynamicValue,
    pub diagnostics: Vec<Diagnostic>,
}

impl ReadDataSourceResponse {
    /// Encodes a typed model as the state
    pub fn from_model<T: Serialize>(model: &T) -> Self {
        match DynamicValue::from_model(model) {
            Ok(state) => Self {
                state,
                diagnostics: vec![],
            },
            Err(e) => Self::error(Diagnostic::error("Failed to encode state", e.to_string())),
        }
    }

    /// Null state carrying a single diagnostic
    pub fn error(diagnostic: Diagnostic) -> Self {
        Self {
            state: DynamicValue::null(),
            diagnostics: vec![diagnostic],
        }
    }
}
