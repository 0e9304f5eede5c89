//! UUIDs (spec §4.12, RFC 9562): v4 (random), v5 (SHA-1 name-based) and
//! v7 (time-ordered), stored as two 64-bit halves per spec §3.3.
//!
//! v5 reuses this crate's own [`crate::rt::hash`] SHA-1 rather than a
//! `sha1`/`uuid` crate, since the spec is exercised against the exact
//! byte layout this crate already implements for §4.11. Randomness comes
//! from `rand`, grounded on the same crate `Brahmastra-Labs-logicaffeine`
//! (the one other pack example with random-ID generation) depends on.

use crate::error::RtError;
use crate::rt::hash;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::Rng;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RtUuid {
    high: u64,
    low: u64,
}

fn set_version_and_variant(bytes: &mut [u8; 16], version: u8) {
    bytes[6] = (bytes[6] & 0x0F) | (version << 4);
    bytes[8] = (bytes[8] & 0x3F) | 0x80;
}

impl RtUuid {
    pub fn from_bytes_exact(bytes: [u8; 16]) -> RtUuid {
        let high = u64::from_be_bytes(bytes[0..8].try_into().unwrap());
        let low = u64::from_be_bytes(bytes[8..16].try_into().unwrap());
        RtUuid { high, low }
    }

    pub fn to_bytes(&self) -> [u8; 16] {
        let mut out = [0u8; 16];
        out[0..8].copy_from_slice(&self.high.to_be_bytes());
        out[8..16].copy_from_slice(&self.low.to_be_bytes());
        out
    }

    /// All 128 bits random except the version (0100) and variant (10).
    pub fn new_v4() -> RtUuid {
        let mut bytes: [u8; 16] = rand::thread_rng().gen();
        set_version_and_variant(&mut bytes, 4);
        RtUuid::from_bytes_exact(bytes)
    }

    /// First 16 bytes of `SHA1(namespace_bytes ++ name)`, version and
    /// variant overwritten. Deterministic: same inputs, same UUID.
    pub fn new_v5(namespace: &RtUuid, name: &[u8]) -> RtUuid {
        let mut input = Vec::with_capacity(16 + name.len());
        input.extend_from_slice(&namespace.to_bytes());
        input.extend_from_slice(name);
        let digest = hash::hash(&input);
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest[..16]);
        set_version_and_variant(&mut bytes, 5);
        RtUuid::from_bytes_exact(bytes)
    }

    /// High 48 bits = milliseconds since epoch; remaining bits random
    /// (no monotonic counter, per Open Question decision on the 12 bits
    /// adjacent to the timestamp).
    pub fn new_v7() -> RtUuid {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before 1970-01-01")
            .as_millis() as u64;
        let mut bytes = [0u8; 16];
        bytes[0..6].copy_from_slice(&millis.to_be_bytes()[2..8]);
        let tail: [u8; 10] = rand::thread_rng().gen();
        bytes[6..16].copy_from_slice(&tail);
        set_version_and_variant(&mut bytes, 7);
        RtUuid::from_bytes_exact(bytes)
    }

    /// Bits 15-12 of the high half.
    pub fn get_version(&self) -> u8 {
        ((self.high >> 12) & 0xF) as u8
    }

    /// The raw two variant bits (bits 63-62 of the low half).
    pub fn variant_bits(&self) -> u8 {
        ((self.low >> 62) & 0b11) as u8
    }

    /// `1` for the RFC 9562/DCE variant (`10`), `0` otherwise.
    pub fn get_variant(&self) -> u8 {
        if self.variant_bits() == 0b10 {
            1
        } else {
            0
        }
    }

    pub fn to_hex(&self) -> String {
        crate::rt::bytes::short_bytes_to_hex(&self.to_bytes())
    }

    pub fn to_base64(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.to_bytes())
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<RtUuid> {
        let arr: [u8; 16] = bytes.try_into().ok()?;
        Some(RtUuid::from_bytes_exact(arr))
    }

    pub fn from_hex(s: &str) -> Option<RtUuid> {
        if s.len() != 32 {
            return None;
        }
        let bytes = hex::decode(s).ok()?;
        RtUuid::from_bytes(&bytes)
    }

    pub fn from_string(s: &str) -> Option<RtUuid> {
        let bytes = s.as_bytes();
        if bytes.len() != 36 || bytes[8] != b'-' || bytes[13] != b'-' || bytes[18] != b'-' || bytes[23] != b'-' {
            return None;
        }
        let compact: String = s.chars().filter(|&c| c != '-').collect();
        RtUuid::from_hex(&compact)
    }

    pub fn from_base64(s: &str) -> Option<RtUuid> {
        if s.len() != 22 {
            return None;
        }
        let bytes = URL_SAFE_NO_PAD.decode(s).ok()?;
        RtUuid::from_bytes(&bytes)
    }

    pub fn from_string_result(s: &str) -> Result<RtUuid, RtError> {
        RtUuid::from_string(s).ok_or(RtError::InvalidUuid)
    }
}

impl fmt::Display for RtUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        write!(f, "{}-{}-{}-{}-{}", &hex[0..8], &hex[8..12], &hex[12..16], &hex[16..20], &hex[20..32])
    }
}

macro_rules! namespace {
    ($name:ident, $hex:literal) => {
        pub fn $name() -> RtUuid {
            RtUuid::from_hex($hex).expect("well-formed RFC 9562 namespace constant")
        }
    };
}

namespace!(namespace_dns, "6ba7b8109dad11d180b400c04fd430c8");
namespace!(namespace_url, "6ba7b8119dad11d180b400c04fd430c8");
namespace!(namespace_oid, "6ba7b8129dad11d180b400c04fd430c8");
namespace!(namespace_x500, "6ba7b8149dad11d180b400c04fd430c8");
