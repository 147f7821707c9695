//! Registry credential API implementation

use super::common::{null_as_default, ApiQueryParams, PAGE_LIMIT};
use super::{ApiError, Client};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistryCredential {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub registry: String,
    #[serde(deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(deserialize_with = "null_as_default")]
    pub updated_at: String,
}

/// Body of POST /registrycredentials and PATCH /registrycredentials/{id}
#[derive(Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryCredentialRequest {
    pub registry: String,
    pub name: String,
    pub username: String,
    pub auth_token: String,
    pub owner_id: String,
}

// The token must never reach the logs
impl std::fmt::Debug for RegistryCredentialRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryCredentialRequest")
            .field("registry", &self.registry)
            .field("name", &self.name)
            .field("username", &self.username)
            .field("auth_token", &"<redacted>")
            .field("owner_id", &self.owner_id)
            .finish()
    }
}

impl std::fmt::Display for RegistryCredentialRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}, {}) for owner {}",
            self.name, self.registry, self.username, self.owner_id
        )
    }
}

pub struct RegistryCredentialsApi<'a> {
    client: &'a Client,
}

impl<'a> RegistryCredentialsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    fn path(id: &str) -> String {
        format!("/registrycredentials/{}", urlencoding::encode(id))
    }

    /// GET /registrycredentials
    pub async fn list(&self) -> Result<Vec<RegistryCredential>, ApiError> {
        let params = ApiQueryParams::new().add("limit", PAGE_LIMIT);
        self.client
            .get_with_params("/registrycredentials", &params)
            .await
    }

    /// GET /registrycredentials/{id}
    pub async fn get(&self, id: &str) -> Result<RegistryCredential, ApiError> {
        self.client.get(&Self::path(id)).await
    }

    /// POST /registrycredentials
    pub async fn create(
        &self,
        request: &RegistryCredentialRequest,
    ) -> Result<RegistryCredential, ApiError> {
        tracing::debug!("Creating registry credential {}", request);
        self.client.post("/registrycredentials", request).await
    }

    /// PATCH /registrycredentials/{id}
    pub async fn update(
        &self,
        id: &str,
        request: &RegistryCredentialRequest,
    ) -> Result<RegistryCredential, ApiError> {
        tracing::debug!("Updating registry credential {} to {}", id, request);
        self.client.patch(&Self::path(id), request).await
    }

    /// DELETE /registrycredentials/{id}
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&Self::path(id)).await
    }
}
