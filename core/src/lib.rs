//! Async client core for the IntelOwl analysis-orchestration API.
//!
//! # Overview
//! Every operation is one stateless pipeline: build an authenticated
//! `HttpRequest`, execute it once, classify the response into an
//! `Envelope`, then decode the success payload into typed values.
//!
//! # Design
//! - `IntelOwlClient` holds immutable `ClientOptions` behind an `Arc`; clones
//!   share them and concurrent calls need no locking.
//! - Building, classification and decoding are pure. A host that executes
//!   `HttpRequest`s with its own HTTP stack can still use them, see
//!   `Envelope::from_response`.
//! - Cancellation and deadlines come from a caller-supplied `Context` that
//!   the built request carries into the executor.
//! - Errors are a `ClientError` tagged by kind: construction, network, API
//!   or decode.
//! - Name-keyed list resources are returned sorted by key, since JSON
//!   objects carry no order.
//!
//! ```no_run
//! use intelowl_core::{ClientOptions, Context, IntelOwlClient};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), intelowl_core::ClientError> {
//! let client = IntelOwlClient::new(
//!     ClientOptions::new("https://intelowl.example.com", "my-token")
//!         .with_timeout(Duration::from_secs(30)),
//! )?;
//! let ctx = Context::background().with_timeout(Duration::from_secs(10));
//!
//! let analyzers = client.analyzers().list_configs(&ctx).await?;
//! let up = client.analyzers().health_check(&ctx, "Yara").await?;
//! println!("{} analyzers, Yara up: {up}", analyzers.len());
//! # Ok(())
//! # }
//! ```

pub mod analyzers;
pub mod client;
pub mod connectors;
pub mod context;
pub mod decode;
pub mod envelope;
pub mod error;
pub mod http;
pub mod options;
pub mod types;

pub use analyzers::AnalyzerService;
pub use client::{IntelOwlClient, JSON_CONTENT_TYPE};
pub use connectors::ConnectorService;
pub use context::Context;
pub use decode::{decode_array, decode_list, decode_named_list, decode_scalar, decode_status};
pub use envelope::{ApiFailure, Envelope, SuccessResponse};
pub use error::{ClientError, NetworkErrorKind, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use options::ClientOptions;
pub use types::{
    AnalyzerConfig, BaseConfig, ConfigParams, ConnectorConfig, Parameter, PluginKind, Secret,
    StatusResponse, Verification,
};
