//! Wall, dead wall, and dora indicators.
//!
//! `tiles` is drawn from the back; the first 14 entries are the dead wall:
//! indices 0-3 the rinshan tiles, 4/6/8/10/12 the dora indicator slots and
//! 5/7/9/11/13 the ura slots. Rinshan draws remove index 0, so indicator
//! indexing compensates with the rinshan draw count.

use rand::prelude::*;
use rand::rngs::StdRng;
use sha2::{Digest, Sha256};

use crate::errors::{EngineError, EngineResult};

#[derive(Debug, Clone)]
pub struct WallState {
    pub tiles: Vec<u8>,
    pub dora_indicators: Vec<u8>,
    pub rinshan_drawn: u8,
    /// SHA-256 over salt + tile order, committed at shuffle time.
    pub digest: String,
    pub salt: String,
    seed: Option<u64>,
    hand_index: u64,
}

fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

impl WallState {
    pub fn new(seed: Option<u64>) -> Self {
        WallState {
            tiles: Vec::new(),
            dora_indicators: Vec::new(),
            rinshan_drawn: 0,
            digest: String::new(),
            salt: String::new(),
            seed,
            hand_index: 0,
        }
    }

    pub fn shuffle(&mut self) {
        let mut order: Vec<u8> = (0..136).collect();
        let mut rng = if let Some(seed) = self.seed {
            let hand_seed = splitmix64(seed.wrapping_add(self.hand_index));
            StdRng::seed_from_u64(hand_seed)
        } else {
            StdRng::from_entropy()
        };
        self.hand_index = self.hand_index.wrapping_add(1);
        order.shuffle(&mut rng);
        self.salt = format!("{:016x}", rng.next_u64());
        self.install(order);
    }

    /// Replace the wall with an explicit draw order (136 distinct ids).
    pub fn import(&mut self, draw_order: Vec<u8>) -> EngineResult<()> {
        if draw_order.len() != 136 {
            return Err(EngineError::Init {
                message: format!("wall import has {} tiles, need 136", draw_order.len()),
            });
        }
        let mut seen = [false; 136];
        for &t in &draw_order {
            if (t as usize) >= 136 || seen[t as usize] {
                return Err(EngineError::Init {
                    message: format!("wall import has duplicate or out-of-range id {}", t),
                });
            }
            seen[t as usize] = true;
        }
        self.salt = String::new();
        self.hand_index = self.hand_index.wrapping_add(1);
        self.install(draw_order);
        Ok(())
    }

    /// Draw order, comma separated with a trailing comma.
    pub fn export(&self) -> String {
        let mut out = String::new();
        for &t in self.tiles.iter().rev() {
            out.push_str(&t.to_string());
            out.push(',');
        }
        out
    }

    fn install(&mut self, draw_order: Vec<u8>) {
        let mut hasher = Sha256::new();
        hasher.update(self.salt.as_bytes());
        for &t in &draw_order {
            hasher.update([t]);
        }
        self.digest = format!("{:x}", hasher.finalize());

        // Stored back-to-front so draws pop from the end.
        let mut tiles = draw_order;
        tiles.reverse();
        self.tiles = tiles;

        self.dora_indicators.clear();
        if self.tiles.len() > 4 {
            self.dora_indicators.push(self.tiles[4]);
        }
        self.rinshan_drawn = 0;
    }

    /// Tiles still drawable before exhaustion (the dead wall stays put).
    #[inline]
    pub fn live_remaining(&self) -> usize {
        self.tiles.len().saturating_sub(14)
    }

    pub fn draw(&mut self) -> Option<u8> {
        if self.live_remaining() == 0 {
            return None;
        }
        self.tiles.pop()
    }

    pub fn rinshan_draw(&mut self) -> Option<u8> {
        if self.live_remaining() == 0 || self.tiles.is_empty() {
            return None;
        }
        self.rinshan_drawn += 1;
        Some(self.tiles.remove(0))
    }

    /// Flip the next dora indicator; capped at five, never rolled back.
    pub fn reveal_kan_dora(&mut self) -> Option<u8> {
        let count = self.dora_indicators.len();
        if count >= 5 {
            return None;
        }
        let idx = (4 + 2 * count).saturating_sub(self.rinshan_drawn as usize);
        if idx >= self.tiles.len() {
            return None;
        }
        let tile = self.tiles[idx];
        self.dora_indicators.push(tile);
        Some(tile)
    }

    /// Ura indicators under each revealed dora indicator.
    pub fn ura_indicators(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for i in 0..self.dora_indicators.len() {
            let idx = (5 + 2 * i).saturating_sub(self.rinshan_drawn as usize);
            if idx < self.tiles.len() {
                out.push(self.tiles[idx]);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_export_round_trip() {
        let order: Vec<u8> = (0..136).rev().collect();
        let mut wall = WallState::new(None);
        wall.import(order.clone()).unwrap();
        let exported = wall.export();
        let parsed: Vec<u8> = exported
            .split_terminator(',')
            .map(|s| s.parse().unwrap())
            .collect();
        assert_eq!(parsed, order);
        assert!(exported.ends_with(','));
    }

    #[test]
    fn import_validates() {
        let mut wall = WallState::new(None);
        assert!(wall.import(vec![0; 136]).is_err());
        assert!(wall.import((0..135).collect()).is_err());
    }

    #[test]
    fn seeded_shuffles_differ_between_hands() {
        let mut wall = WallState::new(Some(7));
        wall.shuffle();
        let first = wall.digest.clone();
        wall.shuffle();
        assert_ne!(first, wall.digest);
    }

    #[test]
    fn same_seed_same_first_wall() {
        let mut a = WallState::new(Some(99));
        let mut b = WallState::new(Some(99));
        a.shuffle();
        b.shuffle();
        assert_eq!(a.tiles, b.tiles);
    }

    #[test]
    fn rinshan_shifts_indicator_slots() {
        let mut wall = WallState::new(None);
        wall.import((0..136).collect()).unwrap();
        // Draw order 0,1,2,.. stored reversed: dead wall is the last 14 ids.
        let first_indicator = wall.dora_indicators[0];
        let _ = wall.rinshan_draw().unwrap();
        let second = wall.reveal_kan_dora().unwrap();
        // Second indicator sits two slots past the first in the dead wall.
        assert_eq!(wall.dora_indicators, vec![first_indicator, second]);
        assert_eq!(wall.live_remaining(), 136 - 14 - 1);
    }
}
