//! Photo input for the vision model. Bytes are forwarded as-is; nothing is
//! decoded or resized.

use std::path::Path;

use crate::error::{OdoError, Result};

const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];

#[derive(Clone, Debug)]
pub struct ImageInput {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
}

impl ImageInput {
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let hint = mime_from_extension(path);
        Self::from_bytes(bytes, hint).map_err(|e| match e {
            OdoError::Validation(msg) => {
                OdoError::Validation(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Extension hint wins; otherwise the type is sniffed from the header.
    pub fn from_bytes(bytes: Vec<u8>, mime_hint: Option<&'static str>) -> Result<Self> {
        if bytes.is_empty() {
            return Err(OdoError::Validation("image is empty".into()));
        }
        let mime_type = mime_hint.or_else(|| sniff_mime(&bytes)).ok_or_else(|| {
            OdoError::Validation("unsupported image type (expected png, jpg or jpeg)".into())
        })?;
        Ok(Self { bytes, mime_type })
    }
}

pub fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        _ => None,
    }
}

pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(PNG_MAGIC) {
        Some("image/png")
    } else if bytes.starts_with(JPEG_MAGIC) {
        Some("image/jpeg")
    } else {
        None
    }
}
