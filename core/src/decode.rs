//! Response decoding.
//!
//! # Design
//! Name-keyed list resources arrive as JSON objects, which carry no order.
//! `decode_named_list` therefore decodes into a `HashMap` first, sorts the
//! collected keys, and only then projects the records. The output order
//! depends on the key names alone, never on wire order or map iteration.

use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::error::{ClientError, Result};
use crate::types::StatusResponse;

fn decode_error(err: serde_json::Error) -> ClientError {
    ClientError::Decode(err.to_string())
}

/// Decode a name-keyed JSON object into `(name, record)` pairs sorted by
/// name ascending.
pub fn decode_named_list<T: DeserializeOwned>(payload: &[u8]) -> Result<Vec<(String, T)>> {
    let mut by_name: HashMap<String, T> = serde_json::from_slice(payload).map_err(decode_error)?;

    let mut names: Vec<String> = by_name.keys().cloned().collect();
    names.sort();

    Ok(names
        .into_iter()
        .filter_map(|name| by_name.remove(&name).map(|record| (name, record)))
        .collect())
}

/// Decode a name-keyed JSON object into records sorted by name ascending.
pub fn decode_list<T: DeserializeOwned>(payload: &[u8]) -> Result<Vec<T>> {
    Ok(decode_named_list(payload)?
        .into_iter()
        .map(|(_, record)| record)
        .collect())
}

/// Decode a JSON array, keeping wire order.
pub fn decode_array<T: DeserializeOwned>(payload: &[u8]) -> Result<Vec<T>> {
    serde_json::from_slice(payload).map_err(decode_error)
}

pub fn decode_scalar<T: DeserializeOwned>(payload: &[u8]) -> Result<T> {
    serde_json::from_slice(payload).map_err(decode_error)
}

/// Extract the required boolean `status` field.
pub fn decode_status(payload: &[u8]) -> Result<bool> {
    decode_scalar::<StatusResponse>(payload).map(|response| response.status)
}
