//! Request signing for the media provider's authenticated endpoints.

use sha1::{Digest, Sha1};

/// Parameters that are sent but never signed.
const UNSIGNED: [&str; 5] = ["file", "api_key", "cloud_name", "resource_type", "signature"];

/// Canonical form of the parameters: sorted by key, empty values dropped,
/// joined as `key=value` pairs separated by `&`.
pub fn string_to_sign(params: &[(&str, String)]) -> String {
    let mut pairs: Vec<&(&str, String)> = params
        .iter()
        .filter(|(key, value)| {
            !value.is_empty() && !UNSIGNED.iter().any(|unsigned| unsigned == key)
        })
        .collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));

    pairs
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Hex encoded SHA-1 of the canonical parameters followed by the secret.
pub fn sign(params: &[(&str, String)], api_secret: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(string_to_sign(params).as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}
