//! Request signatures for the media host's signed REST endpoints.
//!
//! Rules:
//! - Drop `file`, `cloud_name`, `resource_type`, `api_key` and empty values.
//! - Sort the rest by key and join as `k=v` with `&`.
//! - Append the API secret with no separator.
//! - SHA-1 the result and hex-encode it in lowercase.

use sha1::{Digest, Sha1};
use std::collections::BTreeMap;

/// Parameters that are sent but never signed.
pub const UNSIGNED_PARAMS: &[&str] = &["file", "cloud_name", "resource_type", "api_key"];

/// Builds the canonical `k=v&k=v` string covered by the signature.
pub fn string_to_sign<'a, I>(params: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let sorted: BTreeMap<&str, &str> = params
        .into_iter()
        .filter(|(key, value)| {
            !value.is_empty() && !UNSIGNED_PARAMS.iter().any(|unsigned| unsigned == key)
        })
        .collect();

    sorted
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Signs request parameters with the API secret.
pub fn sign<'a, I>(params: I, api_secret: &str) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut payload = string_to_sign(params);
    payload.push_str(api_secret);
    sha1_hex(payload.as_bytes())
}

fn sha1_hex(bytes: &[u8]) -> String {
    hex::encode(Sha1::digest(bytes))
}
