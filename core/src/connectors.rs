//! Connector operations.

use crate::client::IntelOwlClient;
use crate::context::Context;
use crate::error::Result;
use crate::types::{ConnectorConfig, PluginKind};

#[derive(Debug, Clone, Copy)]
pub struct ConnectorService<'a> {
    client: &'a IntelOwlClient,
}

impl IntelOwlClient {
    pub fn connectors(&self) -> ConnectorService<'_> {
        ConnectorService { client: self }
    }
}

impl ConnectorService<'_> {
    /// `GET /api/get_connector_configs`, sorted by connector name.
    pub async fn list_configs(&self, ctx: &Context) -> Result<Vec<ConnectorConfig>> {
        self.client.list_configs(ctx, PluginKind::Connector).await
    }

    /// `GET /api/connector/{name}/healthcheck`
    pub async fn health_check(&self, ctx: &Context, name: &str) -> Result<bool> {
        self.client
            .health_check(ctx, PluginKind::Connector, name)
            .await
    }
}
