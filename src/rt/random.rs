//! `RtRandom` (spec §2 "RtRandom" table entry). Only the external
//! `next_u32`/`next_bytes` shape is specified; the generator's internal
//! state is whatever `rand`'s default thread-local generator provides.

use rand::{Rng, RngCore};

pub trait RtRandom {
    fn next_u32(&mut self) -> u32;
    fn next_bytes(&mut self, buf: &mut [u8]);
}

pub struct StdRandom {
    rng: rand::rngs::ThreadRng,
}

impl StdRandom {
    pub fn new() -> Self {
        StdRandom { rng: rand::thread_rng() }
    }
}

impl Default for StdRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RtRandom for StdRandom {
    fn next_u32(&mut self) -> u32 {
        self.rng.gen()
    }

    fn next_bytes(&mut self, buf: &mut [u8]) {
        self.rng.fill_bytes(buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_bytes_fills_the_whole_buffer() {
        let mut rng = StdRandom::new();
        let mut buf = [0u8; 16];
        rng.next_bytes(&mut buf);
        assert!(buf.iter().any(|&b| b != 0));
    }

    #[test]
    fn next_u32_produces_varying_values() {
        let mut rng = StdRandom::new();
        let a = rng.next_u32();
        let b = rng.next_u32();
        assert_ne!(a, b);
    }
}
