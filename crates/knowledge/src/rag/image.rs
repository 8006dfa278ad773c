//! Image side-channel.
//!
//! Attached images are never forwarded to the provider; they are reduced to
//! a one-line description that is appended to the prompt.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;

/// Largest decoded image accepted, in bytes.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

const UNDECODABLE: &str = "Image provided but could not be processed.";
const TOO_LARGE: &str = "Image too large (max 10MB).";

/// Image format detected from magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Webp,
    Unknown,
}

impl ImageFormat {
    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Self::Jpeg
        } else if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
            Self::Png
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Self::Gif
        } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            Self::Webp
        } else {
            Self::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::Gif => "GIF",
            Self::Webp => "WEBP",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Describe a base64 image for the prompt.
///
/// Accepts plain base64 or a `data:` URL. Never fails: undecodable or
/// oversized input yields a fixed notice instead.
pub fn describe_image(encoded: &str) -> String {
    let payload = match encoded.trim().strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map_or(rest, |(_, data)| data),
        None => encoded,
    };
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();

    let bytes = match STANDARD.decode(compact.as_bytes()) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Image decoding failed: {}", e);
            return UNDECODABLE.to_string();
        }
    };

    if bytes.len() > MAX_IMAGE_BYTES {
        tracing::warn!("Image rejected: {} bytes", bytes.len());
        return TOO_LARGE.to_string();
    }

    let format = ImageFormat::sniff(&bytes);
    tracing::debug!("Image attached: {} ({} bytes)", format, bytes.len());

    format!(
        "Image provided ({}, {} bytes). This appears to be a screenshot or diagram related to the TDS question.",
        format,
        bytes.len()
    )
}
