//! Utility functions that may be helpful for implementing
//! MapReduce applications.

use anyhow::Result;
use bytes::Bytes;

/// Read an entire [`Bytes`] slice into a [`String`].
///
/// Returns an error if the slice contains invalid UTF-8.
pub fn string_from_bytes(buf: Bytes) -> Result<String> {
    Ok(String::from_utf8(buf.as_ref().into())?)
}

/// Parse a decimal count stored as text.
pub fn count_from_bytes(buf: &Bytes) -> Result<u64> {
    Ok(std::str::from_utf8(buf)?.trim().parse()?)
}
