//! Product operations

use crate::session::DashboardClient;
use crate::types::RequestSpec;
use crate::Result;
use serde_json::Value;

/// Accessor for product operations
#[derive(Debug)]
pub struct Products<'a> {
    client: &'a DashboardClient,
}

impl<'a> Products<'a> {
    pub(crate) fn new(client: &'a DashboardClient) -> Self {
        Self { client }
    }

    /// All products of the company
    pub async fn all(&self) -> Result<Option<Value>> {
        self.client
            .fetch_data(RequestSpec::get("api/mi/productos"))
            .await
    }

    /// Search products by name
    pub async fn search(&self, term: &str) -> Result<Option<Value>> {
        self.client
            .fetch_data(
                RequestSpec::post("api/miV2/searchProduct")
                    .with_param("dato", term.trim())
                    .with_param("busqueda", term.trim())
                    .json(),
            )
            .await
    }
}
