//! Classification of raw responses into a success/failure envelope.
//!
//! Pure functions only: no I/O happens here, so hosts that execute
//! `HttpRequest`s themselves reuse exactly the same status handling.

use serde_json::Value;

use crate::error::{ClientError, Result};
use crate::http::HttpResponse;

/// JSON fields probed, in order, for a human-readable error message.
const MESSAGE_FIELDS: [&str; 3] = ["error", "detail", "message"];

/// Payload of a 2xx response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessResponse {
    pub status: u16,
    pub data: Vec<u8>,
}

/// Error details extracted from a non-2xx response body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiFailure {
    pub message: String,
    pub code: Option<String>,
    pub detail: Option<Value>,
}

/// Uniform result of one HTTP exchange, before decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Success(SuccessResponse),
    Failure { status: u16, failure: ApiFailure },
}

impl Envelope {
    pub fn from_response(response: HttpResponse) -> Self {
        if (200..300).contains(&response.status) {
            return Envelope::Success(SuccessResponse {
                status: response.status,
                data: response.body,
            });
        }
        Envelope::Failure {
            status: response.status,
            failure: parse_failure(response.status, &response.body),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success(_))
    }

    pub fn status(&self) -> u16 {
        match self {
            Envelope::Success(success) => success.status,
            Envelope::Failure { status, .. } => *status,
        }
    }

    pub fn into_result(self) -> Result<SuccessResponse> {
        match self {
            Envelope::Success(success) => Ok(success),
            Envelope::Failure { status, failure } => Err(ClientError::Api {
                status,
                message: failure.message,
                code: failure.code,
                detail: failure.detail,
            }),
        }
    }
}

/// Extract the structured API error, falling back to the raw body text and
/// then to the status's canonical reason.
fn parse_failure(status: u16, body: &[u8]) -> ApiFailure {
    let text = String::from_utf8_lossy(body).trim().to_string();

    let json = serde_json::from_slice::<Value>(body).ok();
    let structured = json.as_ref().and_then(|value| {
        MESSAGE_FIELDS
            .iter()
            .find_map(|field| value.get(field).and_then(Value::as_str))
            .map(str::to_string)
    });
    let code = json
        .as_ref()
        .and_then(|value| value.get("code"))
        .and_then(|code| match code {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });

    let message = match structured {
        Some(message) => message,
        None if !text.is_empty() => text,
        None => generic_message(status),
    };

    ApiFailure {
        message,
        code,
        detail: json,
    }
}

fn generic_message(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {status}"))
}
