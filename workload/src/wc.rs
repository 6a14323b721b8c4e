//! A MapReduce-compatible implementation of word count.
//!
//! A word is a maximal run of alphabetic characters. Output lines read
//! `word count`.

use anyhow::Result;
use bytes::{BufMut, Bytes, BytesMut};

use common::utils::{count_from_bytes, string_from_bytes};
use common::{KeyValue, MapOutput};

pub fn map(kv: KeyValue, _aux: Bytes) -> MapOutput {
    let s = string_from_bytes(kv.value)?;
    let words = s
        .split(|c: char| !c.is_alphabetic())
        .filter(|s| !s.is_empty())
        .map(|word| word.to_string())
        .collect::<Vec<_>>();

    let mut key_buf = BytesMut::new();

    let iter = words.into_iter().map(move |word| {
        key_buf.put_slice(word.as_bytes());
        let key = key_buf.split().freeze();

        Ok(KeyValue {
            key,
            value: Bytes::from_static(b"1"),
        })
    });
    Ok(Box::new(iter))
}

pub fn reduce(
    _key: Bytes,
    values: Box<dyn Iterator<Item = Bytes> + '_>,
    _aux: Bytes,
) -> Result<Bytes> {
    let mut count = 0u64;
    for value in values {
        count += count_from_bytes(&value)?;
    }

    Ok(Bytes::from(count.to_string()))
}
