//! Client configuration.
//!
//! # Design
//! `ClientOptions` is assembled once (by hand or from the environment) and
//! then frozen inside the client behind an `Arc`. Nothing mutates it after
//! `IntelOwlClient::new`, so concurrent calls read it without locking.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ClientError, Result};

pub const ENV_URL: &str = "INTELOWL_URL";
pub const ENV_TOKEN: &str = "INTELOWL_TOKEN";
pub const ENV_TIMEOUT_SECS: &str = "INTELOWL_TIMEOUT_SECS";
pub const ENV_INSECURE: &str = "INTELOWL_INSECURE";
pub const ENV_CA_CERT: &str = "INTELOWL_CA_CERT";

/// Connection settings for an IntelOwl instance.
#[derive(Clone)]
pub struct ClientOptions {
    /// Base URL, e.g. `https://intelowl.example.com`.
    pub url: String,
    /// API token sent as `Authorization: Token <token>`.
    pub token: String,
    /// Whole-request timeout enforced by the transport. `None` disables it.
    pub timeout: Option<Duration>,
    /// Verify the server's TLS certificate.
    pub verify_tls: bool,
    /// Extra PEM root certificate to trust, for self-signed deployments.
    pub ca_certificate: Option<PathBuf>,
}

impl ClientOptions {
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: token.into(),
            timeout: None,
            verify_tls: true,
            ca_certificate: None,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    #[must_use]
    pub fn with_ca_certificate(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_certificate = Some(path.into());
        self
    }

    /// Read options from `INTELOWL_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read options through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ClientError::Construction(format!("{key} is not set")))
        };

        let mut options = Self::new(required(ENV_URL)?, required(ENV_TOKEN)?);

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                ClientError::Construction(format!("{ENV_TIMEOUT_SECS} is not a number: {raw:?}"))
            })?;
            options.timeout = Some(Duration::from_secs(secs));
        }

        if let Some(raw) = lookup(ENV_INSECURE) {
            options.verify_tls = !parse_flag(ENV_INSECURE, &raw)?;
        }

        if let Some(path) = lookup(ENV_CA_CERT).filter(|v| !v.trim().is_empty()) {
            options.ca_certificate = Some(PathBuf::from(path));
        }

        Ok(options)
    }

    /// Base URL without trailing slashes.
    pub(crate) fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ClientError::Construction(format!(
            "{key} is not a boolean: {raw:?}"
        ))),
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("verify_tls", &self.verify_tls)
            .field("ca_certificate", &self.ca_certificate)
            .finish()
    }
}
