//! Image utility functions

/// MIME type used when nothing better is known
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// Guess an image MIME type from its magic bytes
pub fn sniff_mime(data: &[u8]) -> Option<&'static str> {
    image::guess_format(data).ok().map(|format| format.to_mime_type())
}

/// Whether `value` parses as a `type/subtype` media type
pub fn is_media_type(value: &str) -> bool {
    value.parse::<mime::Mime>().is_ok()
}

/// MIME type to declare for an upload.
///
/// Uses the declared type when it is a valid media type, otherwise sniffs the bytes.
pub fn upload_mime<'a>(declared: &'a str, data: &[u8]) -> &'a str {
    if is_media_type(declared) {
        return declared;
    }
    sniff_mime(data).unwrap_or(FALLBACK_MIME)
}
