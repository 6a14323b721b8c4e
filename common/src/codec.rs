//! Line format of intermediate files.
//!
//! Each record is `base64(key) base64(value)` followed by a newline, using the
//! URL-safe alphabet. Encoding both halves keeps spaces and newlines inside
//! keys or values from breaking the line structure.

use anyhow::{anyhow, Result};
use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use bytes::Bytes;

use crate::KeyValue;

/// Encode a pair as a single line, without the trailing newline.
pub fn encode(kv: &KeyValue) -> String {
    format!("{} {}", URL_SAFE.encode(&kv.key), URL_SAFE.encode(&kv.value))
}

/// Encode a run of pairs, one line each.
pub fn encode_all<'a>(pairs: impl IntoIterator<Item = &'a KeyValue>) -> Vec<u8> {
    let mut buf = Vec::new();
    for kv in pairs {
        buf.extend_from_slice(encode(kv).as_bytes());
        buf.push(b'\n');
    }
    buf
}

/// Decode a line produced by [`encode`].
pub fn decode(line: &str) -> Result<KeyValue> {
    let (key, value) = line
        .split_once(' ')
        .ok_or_else(|| anyhow!("missing separator"))?;

    let key = URL_SAFE
        .decode(key)
        .map_err(|e| anyhow!("bad key encoding: {e}"))?;
    let value = URL_SAFE
        .decode(value)
        .map_err(|e| anyhow!("bad value encoding: {e}"))?;

    Ok(KeyValue {
        key: Bytes::from(key),
        value: Bytes::from(value),
    })
}
