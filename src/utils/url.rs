//! URL utilities for substituting deciphered signatures into stream URLs

use crate::error::RsigError;
use url::Url;

/// Default query parameter carrying the deciphered signature
pub const DEFAULT_SIGNATURE_PARAM: &str = "signature";

/// Set `param` of `stream_url` to `signature`, replacing any existing value.
///
/// Other query parameters keep their order.
pub fn apply_signature(stream_url: &str, param: &str, signature: &str) -> Result<String, RsigError> {
    if param.is_empty() {
        return Err(RsigError::InvalidUrl(
            "Empty signature parameter name".to_string(),
        ));
    }

    let mut parsed = Url::parse(stream_url)?;
    if parsed.cannot_be_a_base() {
        return Err(RsigError::InvalidUrl(stream_url.to_string()));
    }

    let mut pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| key != param)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    pairs.push((param.to_string(), signature.to_string()));

    parsed.query_pairs_mut().clear().extend_pairs(pairs);
    Ok(parsed.to_string())
}
