//! `data:<mime>[;base64],<payload>` parsing and encoding

use std::borrow::Cow;

use base64::alphabet;
use base64::engine::general_purpose::STANDARD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;

use crate::error::{CompressError, CompressResult};

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64";

/// Standard alphabet, padding optional, trailing bits ignored (same leniency as `atob`)
const FORGIVING: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// A parsed data URL, borrowing from the input string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl<'a> {
    /// Media type as written, may be empty
    pub mime_type: &'a str,
    pub is_base64: bool,
    /// Everything after the first comma, not yet decoded
    pub payload: &'a str,
}

impl<'a> DataUrl<'a> {
    /// Split a data URL into its parts.
    ///
    /// The MIME type ends at the first comma; a `;base64` suffix on it is the
    /// encoding marker. Line terminators are not allowed anywhere.
    pub fn parse(raw: &'a str) -> CompressResult<Self> {
        if raw.contains(is_line_terminator) {
            return Err(CompressError::MalformedDataUrl);
        }

        let rest = raw.strip_prefix(SCHEME).ok_or(CompressError::MalformedDataUrl)?;
        let (header, payload) = rest.split_once(',').ok_or(CompressError::MalformedDataUrl)?;

        let (mime_type, is_base64) = match header.strip_suffix(BASE64_MARKER) {
            Some(mime) => (mime, true),
            None => (header, false),
        };

        Ok(Self {
            mime_type,
            is_base64,
            payload,
        })
    }
}

/// Decoded image content with the MIME type it was declared as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBytes {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Decode a base64 data URL into raw bytes
pub fn decode(raw: &str) -> CompressResult<ImageBytes> {
    let url = DataUrl::parse(raw)?;
    if !url.is_base64 {
        return Err(CompressError::UnsupportedEncoding);
    }

    let payload = strip_whitespace(url.payload);
    let bytes = FORGIVING.decode(payload.as_bytes())?;

    Ok(ImageBytes {
        mime_type: url.mime_type.to_string(),
        bytes,
    })
}

/// Encode bytes as `data:<mime>;base64,<payload>`
pub fn encode(bytes: &[u8], mime_type: &str) -> String {
    let prefix_len = SCHEME.len() + mime_type.len() + BASE64_MARKER.len() + 1;
    let payload_len = base64::encoded_len(bytes.len(), true).unwrap_or(0);

    let mut out = String::with_capacity(prefix_len + payload_len);
    out.push_str(SCHEME);
    out.push_str(mime_type);
    out.push_str(BASE64_MARKER);
    out.push(',');
    STANDARD.encode_string(bytes, &mut out);
    out
}

/// Drop the ASCII whitespace `atob` ignores; line breaks never reach here
fn strip_whitespace(payload: &str) -> Cow<'_, str> {
    if payload.contains(is_payload_whitespace) {
        Cow::Owned(payload.chars().filter(|c| !is_payload_whitespace(*c)).collect())
    } else {
        Cow::Borrowed(payload)
    }
}

fn is_payload_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0C')
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_decode_png_header() {
        let image = decode("data:image/png;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.bytes, PNG_SIGNATURE);
    }

    #[test]
    fn test_decode_without_padding() {
        let image = decode("data:image/png;base64,iVBORw0KGgo").unwrap();
        assert_eq!(image.bytes, PNG_SIGNATURE);
    }

    #[test]
    fn test_decode_empty_mime_and_payload() {
        let image = decode("data:;base64,").unwrap();
        assert_eq!(image.mime_type, "");
        assert!(image.bytes.is_empty());
    }

    #[test]
    fn test_parse_mime_with_parameters() {
        let url = DataUrl::parse("data:image/svg+xml;charset=utf-8;base64,PHN2Zy8+").unwrap();
        assert_eq!(url.mime_type, "image/svg+xml;charset=utf-8");
        assert!(url.is_base64);
        assert_eq!(url.payload, "PHN2Zy8+");
    }

    #[test]
    fn test_marker_must_precede_first_comma() {
        // ";base64" after the first comma belongs to the payload
        let url = DataUrl::parse("data:text/plain,a;base64,b").unwrap();
        assert_eq!(url.mime_type, "text/plain");
        assert!(!url.is_base64);
        assert_eq!(url.payload, "a;base64,b");
    }

    #[test]
    fn test_malformed() {
        for raw in [
            "",
            "image/png;base64,iVBORw0KGgo=",
            "data:image/png;base64",
            "DATA:image/png;base64,iVBORw0KGgo=",
            "data:image/png;base64,iVBO\nRw0KGgo=",
        ] {
            assert!(
                matches!(decode(raw), Err(CompressError::MalformedDataUrl)),
                "expected malformed: {raw:?}"
            );
        }
    }

    #[test]
    fn test_unsupported_encoding() {
        let err = decode("data:text/plain,hello").unwrap_err();
        assert!(matches!(err, CompressError::UnsupportedEncoding));
    }

    #[test]
    fn test_invalid_base64() {
        for raw in [
            "data:image/png;base64,@@@@",
            "data:image/png;base64,A",
            "data:image/png;base64,iVBO\u{00A0}Rw0KGgo=",
        ] {
            assert!(
                matches!(decode(raw), Err(CompressError::Base64Decode(_))),
                "expected base64 error: {raw:?}"
            );
        }
    }

    #[test]
    fn test_decode_ignores_spaces_tabs_and_form_feeds() {
        for raw in [
            "data:image/png;base64,iVBO Rw0KGgo=",
            "data:image/png;base64, iVBORw0K\tGgo= ",
            "data:image/png;base64,iVBO\x0CRw0KGgo",
        ] {
            let image = decode(raw).unwrap();
            assert_eq!(image.bytes, PNG_SIGNATURE, "payload: {raw:?}");
        }
    }

    #[test]
    fn test_encode() {
        assert_eq!(encode(&[0x01, 0x02], "image/png"), "data:image/png;base64,AQI=");
        assert_eq!(encode(&[], ""), "data:;base64,");
    }

    #[test]
    fn test_round_trip() {
        let samples: Vec<(Vec<u8>, &str)> = vec![
            (vec![], ""),
            (vec![0], "image/png"),
            (vec![0xFF, 0xFE], "image/jpeg"),
            (PNG_SIGNATURE.to_vec(), "image/svg+xml;charset=utf-8"),
            ((0..=255u8).cycle().take(4099).collect(), "application/octet-stream"),
        ];

        for (bytes, mime) in samples {
            let decoded = decode(&encode(&bytes, mime)).unwrap();
            assert_eq!(decoded.bytes, bytes);
            assert_eq!(decoded.mime_type, mime);
        }
    }

    #[test]
    fn test_encode_is_deterministic() {
        let bytes: Vec<u8> = (0..1024u32).map(|i| (i * 7 % 251) as u8).collect();
        assert_eq!(encode(&bytes, "image/webp"), encode(&bytes, "image/webp"));
    }

    #[test]
    fn test_encode_large_payload() {
        let bytes = vec![0xABu8; 16 * 1024 * 1024];
        let url = encode(&bytes, "image/png");
        let expected_len = "data:image/png;base64,".len() + base64::encoded_len(bytes.len(), true).unwrap();
        assert_eq!(url.len(), expected_len);
        assert_eq!(decode(&url).unwrap().bytes.len(), bytes.len());
    }
}
