//! Analyzer operations.

use crate::client::IntelOwlClient;
use crate::context::Context;
use crate::error::Result;
use crate::types::{AnalyzerConfig, PluginKind};

/// Analyzer endpoints of the IntelOwl API.
///
/// Borrowed from an `IntelOwlClient` via [`IntelOwlClient::analyzers`].
#[derive(Debug, Clone, Copy)]
pub struct AnalyzerService<'a> {
    client: &'a IntelOwlClient,
}

impl IntelOwlClient {
    pub fn analyzers(&self) -> AnalyzerService<'_> {
        AnalyzerService { client: self }
    }
}

impl AnalyzerService<'_> {
    /// List every analyzer configuration on the instance.
    ///
    /// Endpoint: `GET /api/get_analyzer_configs`
    ///
    /// The server returns a JSON object keyed by analyzer name; the result is
    /// sorted by that name, ascending.
    ///
    /// # Errors
    ///
    /// Returns the construction, network, API or decode error of the first
    /// stage that fails.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use intelowl_core::{Context, IntelOwlClient};
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = IntelOwlClient::from_env()?;
    /// for analyzer in client.analyzers().list_configs(&Context::background()).await? {
    ///     println!("{}: {}", analyzer.base.name, analyzer.analyzer_type);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list_configs(&self, ctx: &Context) -> Result<Vec<AnalyzerConfig>> {
        self.client.list_configs(ctx, PluginKind::Analyzer).await
    }

    /// Check whether the named analyzer is up.
    ///
    /// Endpoint: `GET /api/analyzer/{name}/healthcheck`
    ///
    /// # Errors
    ///
    /// A response without a boolean `status` field is a
    /// `ClientError::Decode`, never `Ok(false)`. An unknown analyzer surfaces
    /// as `ClientError::Api` with the server's status (usually 404).
    pub async fn health_check(&self, ctx: &Context, name: &str) -> Result<bool> {
        self.client
            .health_check(ctx, PluginKind::Analyzer, name)
            .await
    }
}
