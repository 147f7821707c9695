//! Owner (user or team) API implementation

use super::common::{null_as_default, ApiQueryParams, CursorItem};
use super::{ApiError, Client};
use serde::{Deserialize, Serialize};

/// A Render workspace owner. `owner_type` is `user` or `team`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Owner {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub owner_type: String,
}

/// Element of GET /owners
#[derive(Debug, Deserialize)]
pub struct OwnerWithCursor {
    pub owner: Owner,
    #[serde(default)]
    pub cursor: String,
}

impl CursorItem for OwnerWithCursor {
    type Item = Owner;

    fn into_parts(self) -> (Owner, String) {
        (self.owner, self.cursor)
    }
}

pub struct OwnersApi<'a> {
    client: &'a Client,
}

impl<'a> OwnersApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// GET /owners, every page
    pub async fn list(&self) -> Result<Vec<Owner>, ApiError> {
        self.client
            .get_all_pages::<OwnerWithCursor>("/owners", &ApiQueryParams::new())
            .await
    }

    /// GET /owners/{id}
    pub async fn get(&self, id: &str) -> Result<Owner, ApiError> {
        self.client
            .get(&format!("/owners/{}", urlencoding::encode(id)))
            .await
    }
}
