//! Share-string codec. A design is turned into compact JSON, deflated and
//! base64 encoded so it fits in a single URL query parameter. Decoding
//! accepts every layout older share strings were written in.

mod compact;
pub mod envelope;
mod keyed;
mod legacy;
mod shape;

use baseplan_geometry::Piece;
use baseplan_layout::{BuildableArea, Design, Settings};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// Longest share string most chat embeds accept.
pub const EMBED_LIMIT: usize = 2048;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("share string is empty")]
    Empty,

    #[error("share string is not URL-safe base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("share string does not inflate: {0}")]
    Inflate(#[source] std::io::Error),

    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payload layout is not recognized")]
    UnrecognizedFormat,

    #[error("shape {index}: {reason}")]
    InvalidShape { index: usize, reason: String },

    #[error("area {index}: {reason}")]
    InvalidArea { index: usize, reason: String },
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed to serialize design: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to compress design: {0}")]
    Compress(#[from] std::io::Error),
}

/// Which generation of share string a payload was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WireFormat {
    /// Flat numeric shape arrays.
    Compact,
    /// Shape objects with short keys.
    Keyed,
    /// Verbose named fields.
    Legacy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub text: String,
    /// Set when `text` is longer than [`EMBED_LIMIT`].
    pub exceeds_limit: bool,
}

/// What every wire layout decodes to before it becomes a [`Design`].
#[derive(Debug, Default)]
pub(crate) struct Decoded {
    pub settings: Settings,
    pub areas: Vec<BuildableArea>,
    pub pieces: Vec<(u32, Piece)>,
}

const SHORT_KEYS: [&str; 10] = ["s", "f", "fi", "a", "g", "gs", "b", "p", "st", "c"];

pub fn encode(design: &Design) -> Result<Encoded, EncodeError> {
    let json = serde_json::to_vec(&compact::to_value(design))?;
    let text = envelope::pack(&json)?;
    let exceeds_limit = text.len() > EMBED_LIMIT;
    if exceeds_limit {
        warn!(
            length = text.len(),
            limit = EMBED_LIMIT,
            "share string is longer than the embed limit"
        );
    }
    debug!(json = json.len(), text = text.len(), "encoded design");
    Ok(Encoded {
        text,
        exceeds_limit,
    })
}

pub fn decode(text: &str) -> Result<Design, DecodeError> {
    decode_with_format(text).map(|(design, _)| design)
}

/// Like [`decode`], also reporting which layout the payload used.
pub fn decode_with_format(text: &str) -> Result<(Design, WireFormat), DecodeError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DecodeError::Empty);
    }
    let json = envelope::unpack(text)?;
    let value: Value = serde_json::from_slice(&json)?;
    let format = detect_format(&value).ok_or(DecodeError::UnrecognizedFormat)?;
    debug!(?format, "decoding share string");

    let decoded = match format {
        WireFormat::Compact | WireFormat::Keyed => compact::read(value)?,
        WireFormat::Legacy => legacy::read(value)?,
    };
    let design = Design::from_pieces(decoded.settings, decoded.areas, decoded.pieces);
    Ok((design, format))
}

/// Classify a parsed payload without decoding it.
#[must_use]
pub fn detect_format(value: &Value) -> Option<WireFormat> {
    match value {
        Value::Array(shapes) => Some(shape_layout(shapes.iter())),
        Value::Object(map) if map.contains_key("shapes") => Some(WireFormat::Legacy),
        Value::Object(map) if SHORT_KEYS.iter().any(|key| map.contains_key(*key)) => {
            let single = map.get("s").and_then(Value::as_array).into_iter().flatten();
            let keyed = map
                .get("f")
                .and_then(Value::as_object)
                .into_iter()
                .flat_map(|floors| floors.values())
                .filter_map(Value::as_array)
                .flatten();
            Some(shape_layout(single.chain(keyed)))
        }
        _ => None,
    }
}

fn shape_layout<'a>(mut shapes: impl Iterator<Item = &'a Value>) -> WireFormat {
    if shapes.any(Value::is_object) {
        WireFormat::Keyed
    } else {
        WireFormat::Compact
    }
}
