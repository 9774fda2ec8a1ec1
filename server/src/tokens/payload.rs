//! The text encoded into a token's QR code.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::models::Token;
use crate::registry::TempleRegistry;

/// Fixed-shape scanner record. Fields serialize in declaration order, and
/// an unresolved temple is written as `null` rather than omitted.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QrPayload<'a> {
    token_id: Uuid,
    temple: Option<&'a str>,
    name: &'a str,
    date: NaiveDate,
    time_slot: &'a str,
}

/// Builds the scanner payload for `token` as compact JSON. The temple is
/// given by display name. Identical inputs always produce byte-identical
/// output.
pub fn encode_payload(token: &Token, registry: &TempleRegistry) -> String {
    let payload = QrPayload {
        token_id: token.id,
        temple: registry.find_by_id(&token.temple).map(|t| t.name.as_str()),
        name: &token.name,
        date: token.date,
        time_slot: &token.time_slot,
    };

    // Strings, a UUID and a date have no failing serialization path.
    serde_json::to_string(&payload).unwrap_or_else(|e| {
        tracing::error!(token_id = %token.id, error = %e, "QR payload serialization failed");
        String::new()
    })
}
