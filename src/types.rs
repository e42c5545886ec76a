use serde::{Deserialize, Serialize};

pub const TILE_MAX: usize = 34;

/// Hand as a histogram over the 34 tile kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hand {
    pub counts: [u8; TILE_MAX],
}

impl Default for Hand {
    fn default() -> Self {
        Hand {
            counts: [0; TILE_MAX],
        }
    }
}

impl Hand {
    pub fn new() -> Self {
        Hand::default()
    }

    pub fn from_kinds(kinds: &[u8]) -> Self {
        let mut h = Hand::new();
        for &k in kinds {
            h.add(k);
        }
        h
    }

    #[inline]
    pub fn add(&mut self, kind: u8) {
        if (kind as usize) < TILE_MAX {
            self.counts[kind as usize] += 1;
        }
    }

    #[inline]
    pub fn remove(&mut self, kind: u8) {
        if (kind as usize) < TILE_MAX && self.counts[kind as usize] > 0 {
            self.counts[kind as usize] -= 1;
        }
    }

    #[inline]
    pub fn total(&self) -> u8 {
        self.counts.iter().sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeldType {
    Chi,
    Pon,
    /// Open quad claimed from a discard.
    Daiminkan,
    /// Closed quad from hand.
    Ankan,
    /// Added quad upgrading an existing pon.
    Kakan,
}

impl MeldType {
    #[inline]
    pub fn is_quad(self) -> bool {
        matches!(self, MeldType::Daiminkan | MeldType::Ankan | MeldType::Kakan)
    }
}

/// A called (or, for ankan, declared) tile group. Tiles are physical ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meld {
    pub meld_type: MeldType,
    pub tiles: Vec<u8>,
    pub opened: bool,
    /// Seat the key tile was claimed from; `None` for closed quads.
    pub called_from: Option<u8>,
}

impl Meld {
    pub fn new(meld_type: MeldType, tiles: Vec<u8>, called_from: Option<u8>) -> Self {
        Meld {
            meld_type,
            tiles,
            opened: meld_type != MeldType::Ankan,
            called_from,
        }
    }

    /// Kind of the meld's tiles (for chi, the lowest).
    pub fn kind(&self) -> u8 {
        let mut k = crate::tile::kind(self.tiles[0]);
        for &t in &self.tiles[1..] {
            k = k.min(crate::tile::kind(t));
        }
        k
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Wind {
    East = 0,
    South = 1,
    West = 2,
    North = 3,
}

impl Wind {
    /// The honor kind (27..=30) carrying this wind.
    #[inline]
    pub fn kind(self) -> u8 {
        27 + self as u8
    }

    pub fn next(self) -> Wind {
        Wind::from((self as u8 + 1) % 4)
    }
}

impl From<u8> for Wind {
    fn from(v: u8) -> Self {
        match v % 4 {
            0 => Wind::East,
            1 => Wind::South,
            2 => Wind::West,
            _ => Wind::North,
        }
    }
}

/// Turn-context flags a win is evaluated under.
#[derive(Debug, Clone, Copy)]
pub struct WinContext {
    pub tsumo: bool,
    pub riichi: bool,
    pub double_riichi: bool,
    pub ippatsu: bool,
    pub haitei: bool,
    pub houtei: bool,
    pub rinshan: bool,
    pub chankan: bool,
    /// Uninterrupted first self-draw (tenhou/chiihou window).
    pub first_draw: bool,
    pub seat_wind: Wind,
    pub round_wind: Wind,
}

impl Default for WinContext {
    fn default() -> Self {
        WinContext {
            tsumo: false,
            riichi: false,
            double_riichi: false,
            ippatsu: false,
            haitei: false,
            houtei: false,
            rinshan: false,
            chankan: false,
            first_draw: false,
            seat_wind: Wind::East,
            round_wind: Wind::East,
        }
    }
}

/// Outcome of evaluating a candidate winning hand.
#[derive(Debug, Clone, Default)]
pub struct WinResult {
    /// Legal win: completed shape with at least one yaku.
    pub agari: bool,
    /// Completed shape regardless of yaku (used for missed-ron furiten).
    pub has_shape: bool,
    pub yakuman_count: u8,
    pub han: u32,
    pub fu: u32,
    pub yaku: Vec<crate::yaku::Yaku>,
    /// Full ron payment owed by the discarder (before honba).
    pub pay_ron: u32,
    /// Tsumo payment owed by the dealer (zero on a dealer win).
    pub pay_tsumo_dealer: u32,
    /// Tsumo payment owed by each non-dealer.
    pub pay_tsumo_each: u32,
    /// Seat liable under pao, if any.
    pub pao_payer: Option<u8>,
}
