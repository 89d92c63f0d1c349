//! JSON parser for listing payloads.

use anyhow::{Context, Result, bail};
use serde_json::Value;
use tracing::warn;

use crate::listing::{Listing, ListingKind};

/// Decodes listings of the given `kind` from raw JSON bytes.
///
/// Accepts either a bare array of listings or the backend's response
/// envelope, an object carrying the kind's array (`restaurants` or `farms`).
/// Records that do not decode as a listing are logged and skipped.
///
/// # Errors
///
/// Returns an error if the bytes are not JSON, if an object lacks the kind's
/// envelope key, or if the listings are not an array.
pub fn parse_listings(bytes: &[u8], kind: ListingKind) -> Result<Vec<Listing>> {
    let value: Value = serde_json::from_slice(bytes).context("listing payload is not valid JSON")?;

    let array = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => match map.remove(kind.envelope_key()) {
            Some(inner) => inner,
            None => bail!("listing object has no `{}` array", kind.envelope_key()),
        },
        other => bail!("expected a listing array, found {}", kind_of(&other)),
    };

    let records: Vec<Value> = match array {
        Value::Array(records) => records,
        other => bail!(
            "`{}` holds {}, not an array",
            kind.envelope_key(),
            kind_of(&other)
        ),
    };

    let total = records.len();
    let listings: Vec<Listing> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<Listing>(record) {
            Ok(listing) => Some(listing),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed listing record");
                None
            }
        })
        .collect();

    if listings.len() < total {
        warn!(total, decoded = listings.len(), "Some listing records were skipped");
    }
    Ok(listings)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
