//! Tenhou-compatible wall derivation.
//!
//! A 2496-byte base64 seed (624 32-bit words) keys an MT19937 instance; 288
//! outputs are hashed in nine 128-byte SHA-512 blocks, and the 144 resulting
//! words drive a forward swap shuffle of the 136 tile ids. Every byte order
//! below is load-bearing; the test suite pins a frozen golden vector.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha512};

use crate::errors::{EngineError, EngineResult};

const MT_N: usize = 624;
const MT_M: usize = 397;

/// Minimal MT19937, local state only.
struct Mt19937 {
    mt: [u32; MT_N],
    idx: usize,
}

impl Mt19937 {
    fn seeded(s: u32) -> Self {
        let mut mt = [0u32; MT_N];
        mt[0] = s;
        for i in 1..MT_N {
            mt[i] = 1_812_433_253u32
                .wrapping_mul(mt[i - 1] ^ (mt[i - 1] >> 30))
                .wrapping_add(i as u32);
        }
        Mt19937 { mt, idx: MT_N }
    }

    /// The reference `init_by_array` ritual.
    fn from_key(key: &[u32]) -> Self {
        let mut g = Self::seeded(19_650_218);
        let mut i = 1usize;
        let mut j = 0usize;
        let mut k = MT_N.max(key.len());
        while k > 0 {
            g.mt[i] = (g.mt[i]
                ^ (g.mt[i - 1] ^ (g.mt[i - 1] >> 30)).wrapping_mul(1_664_525))
            .wrapping_add(key[j])
            .wrapping_add(j as u32);
            i += 1;
            j += 1;
            if i >= MT_N {
                g.mt[0] = g.mt[MT_N - 1];
                i = 1;
            }
            if j >= key.len() {
                j = 0;
            }
            k -= 1;
        }
        k = MT_N - 1;
        while k > 0 {
            g.mt[i] = (g.mt[i]
                ^ (g.mt[i - 1] ^ (g.mt[i - 1] >> 30)).wrapping_mul(1_566_083_941))
            .wrapping_sub(i as u32);
            i += 1;
            if i >= MT_N {
                g.mt[0] = g.mt[MT_N - 1];
                i = 1;
            }
            k -= 1;
        }
        g.mt[0] = 0x8000_0000;
        g
    }

    fn next_u32(&mut self) -> u32 {
        const MAG: [u32; 2] = [0, 0x9908_b0df];
        if self.idx >= MT_N {
            for kk in 0..MT_N - MT_M {
                let y = (self.mt[kk] & 0x8000_0000) | (self.mt[kk + 1] & 0x7fff_ffff);
                self.mt[kk] = self.mt[kk + MT_M] ^ (y >> 1) ^ MAG[(y & 1) as usize];
            }
            for kk in MT_N - MT_M..MT_N - 1 {
                let y = (self.mt[kk] & 0x8000_0000) | (self.mt[kk + 1] & 0x7fff_ffff);
                self.mt[kk] = self.mt[kk + MT_M - MT_N] ^ (y >> 1) ^ MAG[(y & 1) as usize];
            }
            let y = (self.mt[MT_N - 1] & 0x8000_0000) | (self.mt[0] & 0x7fff_ffff);
            self.mt[MT_N - 1] = self.mt[MT_M - 1] ^ (y >> 1) ^ MAG[(y & 1) as usize];
            self.idx = 0;
        }
        let mut y = self.mt[self.idx];
        self.idx += 1;
        y ^= y >> 11;
        y ^= (y << 7) & 0x9d2c_5680;
        y ^= (y << 15) & 0xefc6_0000;
        y ^= y >> 18;
        y
    }
}

/// Derive the 136-tile draw order from a base64 seed.
pub fn tenhou_yama_from_seed(seed_b64: &str) -> EngineResult<Vec<u8>> {
    let bytes = STANDARD.decode(seed_b64).map_err(|e| EngineError::Init {
        message: format!("seed base64 decode: {}", e),
    })?;
    if bytes.len() < 4 * MT_N {
        return Err(EngineError::Init {
            message: format!("seed is {} bytes, need {}", bytes.len(), 4 * MT_N),
        });
    }

    // Words are read big-endian then byte-reversed; net effect: little-endian.
    let mut key = [0u32; MT_N];
    for (i, w) in key.iter_mut().enumerate() {
        *w = u32::from_le_bytes([
            bytes[4 * i],
            bytes[4 * i + 1],
            bytes[4 * i + 2],
            bytes[4 * i + 3],
        ]);
    }

    let mut mt = Mt19937::from_key(&key);
    let mut src = [0u32; 288];
    for v in src.iter_mut() {
        *v = mt.next_u32();
    }

    let mut rnd = [0u32; 144];
    for block in 0..9 {
        let mut chunk = [0u8; 128];
        for j in 0..32 {
            chunk[j * 4..j * 4 + 4].copy_from_slice(&src[block * 32 + j].to_le_bytes());
        }
        let digest = Sha512::digest(chunk);
        for k in 0..16 {
            rnd[block * 16 + k] = u32::from_le_bytes([
                digest[k * 4],
                digest[k * 4 + 1],
                digest[k * 4 + 2],
                digest[k * 4 + 3],
            ]);
        }
    }

    let mut yama: Vec<u8> = (0..136).collect();
    for i in 0..135usize {
        let j = i + (rnd[i] % (136 - i as u32)) as usize;
        yama.swap(i, j);
    }
    Ok(yama)
}
