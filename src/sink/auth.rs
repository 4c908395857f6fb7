use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Storage service version pinned on every request.
pub const MS_VERSION: &str = "2023-11-03";

/// Canonicalized `x-ms-*` header block: lowercase names, sorted, one
/// `name:value` line each, every line newline-terminated.
fn canonical_headers(headers: &[(&str, &str)]) -> String {
    let mut pairs: Vec<(String, &str)> = headers
        .iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value.trim()))
        .collect();
    pairs.sort();
    pairs
        .iter()
        .map(|(name, value)| format!("{name}:{value}\n"))
        .collect()
}

/// Canonicalized resource: `/{account}{path}` followed by the query
/// parameters as sorted lowercase `name:value` lines.
fn canonical_resource(account: &str, path: &str, query: &[(&str, &str)]) -> String {
    let mut params: Vec<(String, &str)> = query
        .iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), *value))
        .collect();
    params.sort();

    let mut out = format!("/{account}{path}");
    for (name, value) in params {
        out.push('\n');
        out.push_str(&name);
        out.push(':');
        out.push_str(value);
    }
    out
}

/// Shared Key string-to-sign for a request that sets no optional standard
/// headers. A zero Content-Length is signed as the empty string.
fn string_to_sign(
    verb: &str,
    content_length: usize,
    canonical_headers: &str,
    canonical_resource: &str,
) -> String {
    let length = if content_length == 0 {
        String::new()
    } else {
        content_length.to_string()
    };
    format!("{verb}\n\n\n{length}\n\n\n\n\n\n\n\n\n{canonical_headers}{canonical_resource}")
}

/// `Authorization` header value for one request against the account.
pub fn authorization(
    account: &str,
    access_key: &str,
    verb: &str,
    content_length: usize,
    x_ms_headers: &[(&str, &str)],
    path: &str,
    query: &[(&str, &str)],
) -> Result<String> {
    let sts = string_to_sign(
        verb,
        content_length,
        &canonical_headers(x_ms_headers),
        &canonical_resource(account, path, query),
    );

    let key = BASE64
        .decode(access_key)
        .context("storage access key is not valid base64")?;
    let mut mac = HmacSha256::new_from_slice(&key)
        .map_err(|_| anyhow::anyhow!("storage access key has an unusable length"))?;
    mac.update(sts.as_bytes());
    let signature = BASE64.encode(mac.finalize().into_bytes());

    Ok(format!("SharedKey {account}:{signature}"))
}
