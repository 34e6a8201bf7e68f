//! Payout operations

use crate::session::DashboardClient;
use crate::types::RequestSpec;
use crate::Result;
use serde_json::Value;

/// Accessor for payout operations
#[derive(Debug)]
pub struct Payouts<'a> {
    client: &'a DashboardClient,
}

impl<'a> Payouts<'a> {
    pub(crate) fn new(client: &'a DashboardClient) -> Self {
        Self { client }
    }

    /// All settled payouts of the account
    pub async fn all(&self) -> Result<Option<Value>> {
        self.client
            .fetch_data(RequestSpec::get("api/mi/liquidaciones"))
            .await
    }
}
