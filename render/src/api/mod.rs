pub mod client;
pub mod common;
pub mod error;
pub mod owners;
pub mod registry_credentials;
pub mod services;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use client::{Client, RetryConfig, DEFAULT_API_URL};
pub use error::ApiError;
