//! Query-string canonicalization and request signing for key-pair auth.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::Error;

type HmacSha256 = Hmac<Sha256>;

/// Renders parameters as a canonical query string: keys ascending,
/// values percent-encoded.
#[must_use]
pub fn encode_params(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Computes the request signature over the lower-cased canonical query.
///
/// # Errors
/// Fails when the secret key cannot seed the MAC (empty keys are fine;
/// this is effectively unreachable for HMAC).
pub fn signature(encoded_params: &str, secret_key: &str) -> Result<String, Error> {
    let payload = encoded_params.to_lowercase().replace('+', "%20");
    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
        .map_err(|e| Error::Auth(format!("invalid secret key: {e}")))?;
    mac.update(payload.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// Builds the full signed query string for a key-pair authenticated call.
///
/// # Errors
/// Propagates signature failures.
pub fn signed_query(
    params: &BTreeMap<String, String>,
    api_key: &str,
    secret_key: &str,
) -> Result<String, Error> {
    let mut signed = params.clone();
    signed.insert(
        crate::constants::PARAM_API_KEY.to_string(),
        api_key.to_string(),
    );
    let encoded = encode_params(&signed);
    let sig = signature(&encoded, secret_key)?;
    Ok(format!(
        "{encoded}&{}={}",
        crate::constants::PARAM_SIGNATURE,
        urlencoding::encode(&sig)
    ))
}
