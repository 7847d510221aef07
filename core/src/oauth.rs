//! HMAC-SHA1 request signing in the OAuth 1.0 style used by the service.
//!
//! Only the subset the client needs is implemented: a consumer key, no
//! token, no nonce or timestamp. The signature is the hex digest of the
//! HMAC over the signing base string, and the `Authorization` header lists
//! the realm followed by every `oauth_`-prefixed parameter.
//!
//! Protocol parameters are emitted in sorted key order because [`Params`]
//! is a `BTreeMap`, so the header for a given input is fully deterministic.

use std::collections::BTreeMap;

use hmac::{Hmac, Mac};
use percent_encoding::{percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha1::Sha1;
use tracing::debug;

use crate::error::{ApiError, Result};

type HmacSha1 = Hmac<Sha1>;

/// Prefix that marks a parameter as part of the signing protocol.
pub const PROTOCOL_PREFIX: &str = "oauth_";

pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";

/// Everything except ASCII alphanumerics and `-._~` is percent-encoded.
const ESCAPE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// A request parameter value. Values are kept as raw bytes so that the
/// UTF-8 check happens once, at escaping time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    One(Vec<u8>),
    /// Expanded into one `key=value` pair per element when normalizing.
    Many(Vec<Vec<u8>>),
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::One(s.as_bytes().to_vec())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::One(s.into_bytes())
    }
}

impl From<&[u8]> for ParamValue {
    fn from(b: &[u8]) -> Self {
        ParamValue::One(b.to_vec())
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(values: Vec<&str>) -> Self {
        ParamValue::Many(values.into_iter().map(|v| v.as_bytes().to_vec()).collect())
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        ParamValue::Many(values.into_iter().map(String::into_bytes).collect())
    }
}

pub type Params = BTreeMap<String, ParamValue>;

/// Interpret `bytes` as UTF-8 text. Invalid input is an error, never
/// replaced.
pub fn to_text(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|source| ApiError::Encoding { source })
}

/// Percent-encode a string, including `/`. `~` is left as is.
pub fn escape(s: &str) -> String {
    percent_encode(s.as_bytes(), ESCAPE_SET).to_string()
}

/// Like [`escape`], for values that arrive as bytes.
pub fn escape_bytes(bytes: &[u8]) -> Result<String> {
    to_text(bytes).map(escape)
}

/// Build the normalized parameter string: pairs sorted by key then value,
/// escaped, and joined as `k=v&k=v`.
pub fn normalize_parameters(params: &Params) -> Result<String> {
    let mut items: Vec<(&str, &[u8])> = Vec::new();
    for (key, value) in params {
        match value {
            ParamValue::One(v) => items.push((key.as_str(), v.as_slice())),
            ParamValue::Many(vs) => items.extend(vs.iter().map(|v| (key.as_str(), v.as_slice()))),
        }
    }
    items.sort();

    let pairs = items
        .into_iter()
        .map(|(k, v)| Ok(format!("{}={}", escape(k), escape_bytes(v)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(pairs.join("&"))
}

/// Returns `(signing_key, base_string)`.
pub fn signing_base(method: &str, url: &str, params: &Params, secret: &str) -> Result<(String, String)> {
    let raw = [
        escape(method),
        escape(url),
        escape(&normalize_parameters(params)?),
    ]
    .join("&");
    let key = format!("{}&", escape(secret));
    Ok((key, raw))
}

fn hmac_sha1_hex(key: &str, data: &str) -> String {
    let mut mac = HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC can take any size");
    mac.update(data.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Sign a request and return the value of its `Authorization` header.
///
/// `params` receives `oauth_consumer_key`, `oauth_signature_method` and,
/// once computed, `oauth_signature`.
pub fn sign_request(
    key: &str,
    secret: &str,
    method: &str,
    url: &str,
    params: &mut Params,
    realm: &str,
) -> Result<String> {
    params.insert(format!("{PROTOCOL_PREFIX}consumer_key"), key.into());
    params.insert(format!("{PROTOCOL_PREFIX}signature_method"), SIGNATURE_METHOD.into());

    let (signing_key, raw) = signing_base(method, url, params, secret)?;
    let signature = hmac_sha1_hex(&signing_key, &raw);
    debug!(%method, %url, "signed request");
    params.insert(format!("{PROTOCOL_PREFIX}signature"), signature.into());

    let mut header = format!("OAuth realm=\"{realm}\"");
    for (k, v) in params.iter().filter(|(k, _)| k.starts_with(PROTOCOL_PREFIX)) {
        let ParamValue::One(value) = v else {
            return Err(ApiError::precondition(format!(
                "protocol parameter {k} must have a single value"
            )));
        };
        header.push_str(&format!(", {k}=\"{}\"", escape_bytes(value)?));
    }
    Ok(header)
}
