//! Transport wrapping: raw DEFLATE, then URL-safe base64 without padding.

use std::io::{self, Read, Write};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::DecodeError;

/// Upper bound on an inflated payload.
pub const MAX_INFLATED_BYTES: u64 = 4 * 1024 * 1024;

pub fn pack(json: &[u8]) -> io::Result<String> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(json)?;
    let compressed = encoder.finish()?;
    Ok(URL_SAFE_NO_PAD.encode(compressed))
}

/// Reverse of [`pack`]. Trailing `=` padding is tolerated.
pub fn unpack(text: &str) -> Result<Vec<u8>, DecodeError> {
    let compressed = URL_SAFE_NO_PAD.decode(text.trim_end_matches('='))?;
    let mut json = Vec::new();
    DeflateDecoder::new(compressed.as_slice())
        .take(MAX_INFLATED_BYTES)
        .read_to_end(&mut json)
        .map_err(DecodeError::Inflate)?;
    Ok(json)
}
