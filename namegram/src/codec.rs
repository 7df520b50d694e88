//! Value encodings for the persistent tables.
//!
//! Posting lists are fixed-width little-endian u64s. Document term lists are
//! NUL-terminated strings.

use byteorder::{ByteOrder, LittleEndian};
use thiserror::Error;

const ID_WIDTH: usize = std::mem::size_of::<u64>();

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CodecError {
    #[error("posting list of {0} bytes is not a multiple of 8")]
    TruncatedPostings(usize),
    #[error("term {0:?} contains a NUL byte")]
    EmbeddedNul(String),
}

pub fn encode(ids: &[u64]) -> Vec<u8> {
    let mut out = vec![0u8; ids.len() * ID_WIDTH];
    LittleEndian::write_u64_into(ids, &mut out);
    out
}

pub fn decode(bytes: &[u8]) -> Result<Vec<u64>, CodecError> {
    if bytes.len() % ID_WIDTH != 0 {
        return Err(CodecError::TruncatedPostings(bytes.len()));
    }
    let mut ids = vec![0u64; bytes.len() / ID_WIDTH];
    LittleEndian::read_u64_into(bytes, &mut ids);
    Ok(ids)
}

pub fn encode_terms(terms: &[String]) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::with_capacity(terms.iter().map(|t| t.len() + 1).sum());
    for term in terms {
        if term.as_bytes().contains(&0) {
            return Err(CodecError::EmbeddedNul(term.clone()));
        }
        out.extend_from_slice(term.as_bytes());
        out.push(0);
    }
    Ok(out)
}

pub fn decode_terms(bytes: &[u8]) -> Vec<String> {
    if bytes.is_empty() {
        return Vec::new();
    }
    let body = bytes.strip_suffix(b"\0").unwrap_or(bytes);
    body.split(|&b| b == 0)
        .map(|t| String::from_utf8_lossy(t).into_owned())
        .collect()
}
