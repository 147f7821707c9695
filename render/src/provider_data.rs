//! Provider data structure passed to resources and data sources

use crate::api::Client;
use std::any::Any;
use std::sync::Arc;

#[derive(Clone)]
pub struct RenderProviderData {
    pub client: Arc<Client>,
}

impl RenderProviderData {
    pub fn new(client: Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Recovers the provider data from the type-erased handle passed to
    /// `configure`. `Err` carries a description of what was received instead.
    pub fn from_any(data: &Arc<dyn Any + Send + Sync>) -> Result<Self, String> {
        data.downcast_ref::<RenderProviderData>()
            .cloned()
            .ok_or_else(|| format!("{:?}", (**data).type_id()))
    }
}
