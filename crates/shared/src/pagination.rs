//! Cursor-based pagination utilities.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Error type for cursor operations.
#[derive(Debug, Error)]
pub enum CursorError {
    #[error("Invalid cursor format")]
    InvalidFormat,
    #[error("Invalid cursor encoding")]
    InvalidEncoding,
    #[error("Invalid timestamp in cursor")]
    InvalidTimestamp,
    #[error("Invalid ID in cursor")]
    InvalidId,
}

/// Encodes a cursor from timestamp and ID.
///
/// The cursor format is: base64(RFC3339_timestamp:id)
/// The composite cursor keeps pagination stable across rows that share a
/// timestamp.
pub fn encode_cursor(created_at: DateTime<Utc>, id: i64) -> String {
    let raw = format!(
        "{}:{}",
        created_at.to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
        id
    );
    URL_SAFE_NO_PAD.encode(raw.as_bytes())
}

/// Decodes a cursor into timestamp and ID.
pub fn decode_cursor(cursor: &str) -> Result<(DateTime<Utc>, i64), CursorError> {
    let decoded = URL_SAFE_NO_PAD
        .decode(cursor)
        .map_err(|_| CursorError::InvalidEncoding)?;

    let s = String::from_utf8(decoded).map_err(|_| CursorError::InvalidFormat)?;

    // Split on the last colon; the timestamp itself contains colons.
    let colon_pos = s.rfind(':').ok_or(CursorError::InvalidFormat)?;

    let timestamp_str = &s[..colon_pos];
    let id_str = &s[colon_pos + 1..];

    let id: i64 = id_str.parse().map_err(|_| CursorError::InvalidId)?;

    let timestamp = DateTime::parse_from_rfc3339(timestamp_str)
        .map_err(|_| CursorError::InvalidTimestamp)?
        .with_timezone(&Utc);

    Ok((timestamp, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_encode_decode_cursor_roundtrip() {
        let timestamp = Utc.with_ymd_and_hms(2026, 2, 5, 14, 0, 0).unwrap();
        let id = 42i64;

        let cursor = encode_cursor(timestamp, id);
        let (decoded_ts, decoded_id) = decode_cursor(&cursor).unwrap();

        assert_eq!(decoded_ts, timestamp);
        assert_eq!(decoded_id, id);
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        assert!(matches!(
            decode_cursor("!!not base64!!"),
            Err(CursorError::InvalidEncoding)
        ));
    }

    #[test]
    fn test_decode_rejects_missing_separator() {
        let cursor = URL_SAFE_NO_PAD.encode(b"no-separator-here");
        assert!(decode_cursor(&cursor).is_err());
    }

    #[test]
    fn test_decode_rejects_bad_id() {
        let cursor = URL_SAFE_NO_PAD.encode(b"2026-02-05T14:00:00Z:not_a_number");
        assert!(matches!(decode_cursor(&cursor), Err(CursorError::InvalidId)));
    }

    #[test]
    fn test_decode_rejects_bad_timestamp() {
        let cursor = URL_SAFE_NO_PAD.encode(b"yesterday:42");
        assert!(matches!(
            decode_cursor(&cursor),
            Err(CursorError::InvalidTimestamp)
        ));
    }

    #[test]
    fn test_cursor_is_url_safe() {
        let timestamp = Utc.with_ymd_and_hms(2026, 2, 5, 14, 0, 0).unwrap();
        let cursor = encode_cursor(timestamp, 9_999_999);
        assert!(!cursor.contains('+'));
        assert!(!cursor.contains('/'));
        assert!(!cursor.contains('='));
    }
}
