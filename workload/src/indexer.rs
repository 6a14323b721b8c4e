//! An inverted index: for every word, the inputs it appears in.
//!
//! Output lines read `word n a.txt,b.txt` where `n` is the number of inputs.

use std::collections::BTreeSet;

use anyhow::Result;
use bytes::Bytes;
use itertools::Itertools;

use common::utils::string_from_bytes;
use common::{KeyValue, MapOutput};

pub fn map(kv: KeyValue, _aux: Bytes) -> MapOutput {
    let document = kv.key;
    let s = string_from_bytes(kv.value)?;
    let words = s
        .split(|c: char| !c.is_alphabetic())
        .filter(|s| !s.is_empty())
        .map(|word| word.to_string())
        .collect::<BTreeSet<_>>();

    let iter = words.into_iter().map(move |word| {
        Ok(KeyValue {
            key: Bytes::from(word),
            value: document.clone(),
        })
    });
    Ok(Box::new(iter))
}

pub fn reduce(
    _key: Bytes,
    values: Box<dyn Iterator<Item = Bytes> + '_>,
    _aux: Bytes,
) -> Result<Bytes> {
    let documents = values
        .map(string_from_bytes)
        .collect::<Result<BTreeSet<_>>>()?;

    Ok(Bytes::from(format!(
        "{} {}",
        documents.len(),
        documents.iter().join(",")
    )))
}
