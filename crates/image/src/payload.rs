//! Transfer encoding: base64 payloads, optionally wrapped in a data URL.

use {
    crate::{Image, ImageError},
    base64::{Engine, engine::general_purpose::STANDARD},
};

const DATA_URL_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64";

/// Decode a transfer-encoded payload into the raw encoded image bytes.
///
/// Accepts plain base64 or a `data:image/<fmt>;base64,` URL. The decoded bytes
/// must carry a recognizable image signature.
///
/// # Errors
///
/// Returns `ImageError::InvalidFormat` for anything that is not a structurally
/// valid image payload.
pub fn decode_payload(payload: &str) -> Result<Vec<u8>, ImageError> {
    let payload = payload.trim();
    let body = match payload.strip_prefix(DATA_URL_PREFIX) {
        Some(rest) => {
            let (header, body) = rest
                .split_once(',')
                .ok_or_else(|| ImageError::InvalidFormat("data URL has no payload".to_string()))?;
            if !header.ends_with(BASE64_MARKER) {
                return Err(ImageError::InvalidFormat(format!(
                    "data URL is not base64 encoded: {header}"
                )));
            }
            body
        }
        None => payload,
    };
    if body.is_empty() {
        return Err(ImageError::InvalidFormat("empty payload".to_string()));
    }
    let bytes = STANDARD
        .decode(body)
        .map_err(|e| ImageError::InvalidFormat(format!("base64: {e}")))?;
    crates_image::guess_format(&bytes)
        .map_err(|_| ImageError::InvalidFormat("unrecognized image signature".to_string()))?;
    Ok(bytes)
}

/// Encode raw bytes as a data URL with the given media type.
pub fn encode_payload(bytes: &[u8], media_type: &str) -> String {
    format!("{DATA_URL_PREFIX}{media_type}{BASE64_MARKER},{}", STANDARD.encode(bytes))
}

/// Encode an image as a PNG data URL.
pub fn to_data_url(image: &Image) -> Result<String, ImageError> {
    let png = crate::encode_png(image)?;
    Ok(encode_payload(&png, "image/png"))
}
