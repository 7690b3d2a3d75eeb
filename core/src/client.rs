//! Request building, execution, and the shared facade pipeline.
//!
//! # Design
//! `IntelOwlClient` owns its `ClientOptions` behind an `Arc` plus a
//! `reqwest::Client` configured from them; both are read-only after `new`,
//! so the client is cheap to clone and safe to share across tasks.
//!
//! Every operation runs the same one-shot pipeline:
//! `build_request` (pure) → `execute` (one round trip, then
//! `Envelope::from_response`) → a function from `decode`. No retries happen
//! here; errors from each stage are returned as they are.

use std::sync::Arc;

use reqwest::header::HeaderValue;
use serde::de::DeserializeOwned;

use crate::context::Context;
use crate::decode;
use crate::envelope::{Envelope, SuccessResponse};
use crate::error::{ClientError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::options::ClientOptions;
use crate::types::PluginKind;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Async client for the IntelOwl REST API.
#[derive(Debug, Clone)]
pub struct IntelOwlClient {
    options: Arc<ClientOptions>,
    http: reqwest::Client,
}

impl IntelOwlClient {
    /// Create a client from `options`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Construction` if the base URL is not an absolute
    /// http(s) URL, the CA certificate cannot be loaded, or the transport
    /// cannot be initialised.
    pub fn new(options: ClientOptions) -> Result<Self> {
        parse_absolute_url(options.base_url())?;

        let mut builder =
            reqwest::Client::builder().danger_accept_invalid_certs(!options.verify_tls);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(path) = &options.ca_certificate {
            let pem = std::fs::read(path).map_err(|e| {
                ClientError::Construction(format!(
                    "cannot read CA certificate {}: {e}",
                    path.display()
                ))
            })?;
            let certificate = reqwest::Certificate::from_pem(&pem).map_err(|e| {
                ClientError::Construction(format!("invalid CA certificate: {e}"))
            })?;
            builder = builder.add_root_certificate(certificate);
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::Construction(e.to_string()))?;

        Ok(Self {
            options: Arc::new(options),
            http,
        })
    }

    /// Create a client from `INTELOWL_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientOptions::from_env()?)
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Absolute URL for an API path relative to the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.options.base_url(), path.trim_start_matches('/'))
    }

    /// Build an authenticated request. No I/O happens here.
    ///
    /// `url` must already be absolute, with path parameters and query string
    /// interpolated. An empty `body` is treated as no body, and
    /// `Content-Type` is only attached when a body is present.
    pub fn build_request(
        &self,
        ctx: &Context,
        method: HttpMethod,
        content_type: &str,
        body: Option<Vec<u8>>,
        url: &str,
    ) -> Result<HttpRequest> {
        let url = parse_absolute_url(url)?;
        let body = body.filter(|b| !b.is_empty());

        let authorization = format!("Token {}", self.options.token);
        HeaderValue::from_str(&authorization).map_err(|_| {
            ClientError::Construction("API token is not a valid header value".to_string())
        })?;
        let mut headers = vec![("Authorization".to_string(), authorization)];

        if body.is_some() {
            HeaderValue::from_str(content_type).map_err(|_| {
                ClientError::Construction(format!("invalid content type: {content_type:?}"))
            })?;
            headers.push(("Content-Type".to_string(), content_type.to_string()));
        }

        Ok(HttpRequest {
            method,
            url: url.into(),
            headers,
            body,
            context: ctx.clone(),
        })
    }

    /// Send `request` and classify the response.
    ///
    /// Exactly one round trip. The request's context bounds the whole
    /// exchange including reading the body.
    pub async fn execute(&self, request: HttpRequest) -> Result<SuccessResponse> {
        let method = request.method;
        let url = request.url.clone();
        tracing::debug!(method = method.as_str(), url = %url, "sending request");

        let response = self.send(request).await.inspect_err(|err| {
            tracing::debug!(method = method.as_str(), url = %url, error = %err, "request did not complete");
        })?;

        let envelope = Envelope::from_response(response);
        tracing::debug!(status = envelope.status(), url = %url, "received response");
        if let Envelope::Failure { status, failure } = &envelope {
            tracing::warn!(status, url = %url, message = %failure.message, "API request failed");
        }
        envelope.into_result()
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
            context,
        } = request;

        let mut builder = self.http.request(method.into(), url.as_str());
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        context
            .run(async move {
                let response = builder.send().await?;
                let status = response.status().as_u16();
                let headers = response
                    .headers()
                    .iter()
                    .filter_map(|(name, value)| {
                        value
                            .to_str()
                            .ok()
                            .map(|value| (name.to_string(), value.to_string()))
                    })
                    .collect();
                let body = response.bytes().await?.to_vec();
                Ok::<_, ClientError>(HttpResponse {
                    status,
                    headers,
                    body,
                })
            })
            .await
    }

    async fn get(&self, ctx: &Context, url: &str) -> Result<SuccessResponse> {
        let request = self.build_request(ctx, HttpMethod::Get, JSON_CONTENT_TYPE, None, url)?;
        self.execute(request).await
    }

    /// Fetch the name-keyed config map of `kind`, sorted by name.
    pub(crate) async fn list_configs<T: DeserializeOwned>(
        &self,
        ctx: &Context,
        kind: PluginKind,
    ) -> Result<Vec<T>> {
        let url = self.endpoint(&kind.configs_path());
        let success = self.get(ctx, &url).await?;
        decode::decode_list(&success.data)
    }

    pub(crate) async fn health_check(
        &self,
        ctx: &Context,
        kind: PluginKind,
        name: &str,
    ) -> Result<bool> {
        let url = self.endpoint(&kind.healthcheck_path(name)?);
        let success = self.get(ctx, &url).await?;
        decode::decode_status(&success.data)
    }
}

fn parse_absolute_url(raw: &str) -> Result<reqwest::Url> {
    let url = reqwest::Url::parse(raw)
        .map_err(|e| ClientError::Construction(format!("invalid URL {raw:?}: {e}")))?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        _ => Err(ClientError::Construction(format!(
            "URL must be an absolute http(s) URL, got: {raw:?}"
        ))),
    }
}
