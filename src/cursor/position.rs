//! Position record and its token codec

use crate::error::{Error, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// A resumable position inside a paged collection
///
/// `link` is the page to fetch when resuming and `offset` is the number of
/// items to drop from that page. An empty link means no resumption is
/// possible from here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Resumption URL (empty = none)
    pub link: String,
    /// Items to skip within the page at `link`
    pub offset: usize,
}

impl Position {
    /// Create a new position
    pub fn new(link: impl Into<String>, offset: usize) -> Self {
        Self {
            link: link.into(),
            offset,
        }
    }

    /// Position at the start of the page behind `link`
    pub fn page_start(link: impl Into<String>) -> Self {
        Self::new(link, 0)
    }

    /// Check if this position carries no resumption link
    pub fn is_empty(&self) -> bool {
        self.link.is_empty()
    }

    /// Encode into an opaque cursor token
    ///
    /// The record is serialized as JSON, deflated at the best compression
    /// level and written as unpadded URL-safe base64. A position without a
    /// link always encodes to the empty string.
    pub fn encode(&self) -> String {
        if self.is_empty() {
            return String::new();
        }

        // Writing into a Vec never fails and Position always serializes.
        let json = serde_json::to_vec(self).unwrap_or_default();
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
        let compressed = encoder
            .write_all(&json)
            .and_then(|()| encoder.finish())
            .unwrap_or_default();

        URL_SAFE_NO_PAD.encode(compressed)
    }

    /// Decode a cursor token produced by [`Position::encode`]
    ///
    /// The empty token decodes to the empty position. Any failure along the
    /// way (base64, inflate, JSON) is reported as [`Error::CursorDecode`].
    pub fn decode(token: &str) -> Result<Self> {
        if token.is_empty() {
            return Ok(Self::default());
        }

        let compressed = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|e| Error::cursor_decode(format!("invalid encoding: {e}")))?;

        let mut json = Vec::new();
        DeflateDecoder::new(compressed.as_slice())
            .read_to_end(&mut json)
            .map_err(|e| Error::cursor_decode(format!("invalid compressed data: {e}")))?;

        serde_json::from_slice(&json)
            .map_err(|e| Error::cursor_decode(format!("invalid position record: {e}")))
    }
}
