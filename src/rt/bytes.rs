//! Byte array codecs (spec §4.10): C-string/Latin-1 decoding, and
//! hex/base64 encode-decode pairs. Hex goes through the `hex` crate and
//! base64 through the `base64` crate — both already depended on for
//! exactly this purpose (see the dependency ledger), rather than
//! hand-rolled codecs.

use crate::error::RtError;
use arrayvec::ArrayVec;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Hex-encodes a short, fixed-size byte sequence (a UUID, a SHA-1 digest)
/// through a stack-allocated scratch buffer rather than `hex::encode`'s
/// heap `Vec`, the way the code generator scratches small fixed-size
/// buffers through an `ArrayVec` instead of a `Vec`. Panics if `bytes` is
/// longer than 32 bytes; callers only ever pass fixed small digests.
pub fn short_bytes_to_hex(bytes: &[u8]) -> String {
    let mut buf: ArrayVec<u8, 64> = ArrayVec::new();
    for &b in bytes {
        buf.push(HEX_DIGITS[(b >> 4) as usize]);
        buf.push(HEX_DIGITS[(b & 0xF) as usize]);
    }
    String::from_utf8(buf.to_vec()).expect("hex digits are ascii")
}

/// Interprets `bytes` as a C string: stops at the first NUL, so embedded
/// NULs truncate the result.
pub fn byte_array_to_string(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// Latin-1 decode: byte values map 1:1 onto the first 256 Unicode code
/// points, which `char::from(u8)` already gives for free.
pub fn byte_array_to_string_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Lowercase hex, two characters per byte, no separator.
pub fn byte_array_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Standard base64 alphabet with `=` padding.
pub fn byte_array_to_base64(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Accepts mixed-case hex; odd length or a non-hex character is an error.
pub fn bytes_from_hex(s: &str) -> Result<Vec<u8>, RtError> {
    hex::decode(s).map_err(|_| RtError::InvalidHex)
}

/// Accepts the standard alphabet with trailing `=` padding.
pub fn bytes_from_base64(s: &str) -> Result<Vec<u8>, RtError> {
    BASE64.decode(s).map_err(|_| RtError::InvalidBase64)
}

/// `NULL` reads as the empty byte array.
pub fn string_to_bytes(s: Option<&str>) -> Vec<u8> {
    s.map_or_else(Vec::new, |s| s.as_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_array_to_string_stops_at_first_nul() {
        let bytes = b"hello\0world";
        assert_eq!(byte_array_to_string(bytes), "hello");
    }

    #[test]
    fn byte_array_to_string_latin1_round_trips_high_bytes() {
        let bytes = [0x41, 0xE9, 0x00];
        let s = byte_array_to_string_latin1(&bytes);
        assert_eq!(s, "A\u{00E9}\u{0000}");
    }

    #[test]
    fn hex_round_trip() {
        let bytes = [0xDE, 0xAD, 0xBE, 0xEF];
        let hex = byte_array_to_hex(&bytes);
        assert_eq!(hex, "deadbeef");
        assert_eq!(bytes_from_hex(&hex).unwrap(), bytes.to_vec());
        assert_eq!(bytes_from_hex("DEADBEEF").unwrap(), bytes.to_vec());
    }

    #[test]
    fn hex_empty_input_is_empty_string() {
        assert_eq!(byte_array_to_hex(&[]), "");
    }

    #[test]
    fn hex_rejects_odd_length_and_bad_characters() {
        assert!(bytes_from_hex("abc").is_err());
        assert!(bytes_from_hex("zz").is_err());
    }

    #[test]
    fn short_bytes_to_hex_matches_the_general_codec() {
        let bytes = [0xDE, 0xAD, 0xBE, 0xEF];
        assert_eq!(short_bytes_to_hex(&bytes), byte_array_to_hex(&bytes));
    }

    #[test]
    fn short_bytes_to_hex_of_empty_is_empty() {
        assert_eq!(short_bytes_to_hex(&[]), "");
    }

    #[test]
    fn base64_round_trip() {
        let bytes = b"the quick brown fox";
        let b64 = byte_array_to_base64(bytes);
        assert_eq!(bytes_from_base64(&b64).unwrap(), bytes.to_vec());
    }

    #[test]
    fn base64_output_length_matches_ceil_n_over_3_times_4() {
        let bytes = [0u8; 5];
        let b64 = byte_array_to_base64(&bytes);
        assert_eq!(b64.len(), 8);
    }

    #[test]
    fn string_to_bytes_of_absent_is_empty() {
        assert_eq!(string_to_bytes(None), Vec::<u8>::new());
        assert_eq!(string_to_bytes(Some("hi")), b"hi".to_vec());
    }

    #[test]
    fn round_trip_string_through_bytes() {
        let s = "round trip";
        let bytes = string_to_bytes(Some(s));
        assert_eq!(byte_array_to_string(&bytes), s);
    }
}
