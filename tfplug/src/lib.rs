//! tfplug - Terraform Plugin Framework for Rust
//!
//! The provider-facing half of a Terraform plugin: the value model, schema
//! builders, plan modifiers, validators and the async Provider, Resource and
//! DataSource traits. Transport (the plugin gRPC server) lives outside this
//! crate.

// Core modules
pub mod context;
pub mod error;
pub mod logging;
pub mod schema;
pub mod types;

// Provider API modules
pub mod data_source;
pub mod provider;
pub mod resource;

// Helper modules
pub mod import;
pub mod plan_modifier;
pub mod validator;

// Re-exports for convenience
pub use context::Context;
pub use data_source::{DataSource, DataSourceWithConfigure};
pub use error::{Result, TfplugError};
pub use import::import_state_passthrough_id;
pub use logging::{init_from_env, init_logging, LogLevel};
pub use plan_modifier::{apply_plan_modifiers, UseStateForUnknown};
pub use provider::{DataSourceFactory, Provider, ResourceFactory};
pub use resource::{Resource, ResourceWithConfigure, ResourceWithImportState};
pub use schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
pub use types::{AttributePath, Diagnostic, Dynamic, DynamicValue};
pub use validator::{validate_attributes, StringOneOf};
