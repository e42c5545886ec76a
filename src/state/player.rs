//! Per-seat state.

use crate::hand_calculator::HandCalculator;
use crate::tile;
use crate::types::Meld;

/// One tile in a player's river.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiverTile {
    pub tile: u8,
    /// False for a tsumogiri (discard straight from the draw).
    pub from_hand: bool,
    /// Riichi was declared on this discard.
    pub riichi: bool,
    /// Cleared when another player claims the tile for a meld.
    pub still_visible: bool,
}

#[derive(Debug, Clone)]
pub struct PlayerState {
    /// Concealed physical tiles, kept sorted.
    pub hand: Vec<u8>,
    /// Called melds, append-only.
    pub melds: Vec<Meld>,
    pub river: Vec<RiverTile>,
    pub score: i32,
    pub last_delta: i32,

    pub riichi: bool,
    pub double_riichi: bool,
    /// Declared this turn; accepted once the discard clears all ron checks.
    pub riichi_pending: bool,
    pub riichi_index: Option<usize>,
    pub ippatsu: bool,

    /// Declined a winning (or win-shaped) discard this go-around.
    pub temporary_furiten: bool,
    /// Declined a winning discard while in riichi; permanent.
    pub riichi_furiten: bool,

    /// River is all terminals/honors and nothing was claimed from it.
    pub nagashi_eligible: bool,

    /// Liability (pao): who fed the decisive valued triplet.
    pub pao_daisangen: Option<u8>,
    pub pao_daisuushi: Option<u8>,

    /// Kinds this player may not discard this turn (kuikae).
    pub forbidden_kinds: Vec<u8>,

    /// Completing kinds, recomputed after every hand change.
    pub waits: Vec<u8>,
}

impl PlayerState {
    pub fn new(starting_score: i32) -> Self {
        PlayerState {
            hand: Vec::new(),
            melds: Vec::new(),
            river: Vec::new(),
            score: starting_score,
            last_delta: 0,
            riichi: false,
            double_riichi: false,
            riichi_pending: false,
            riichi_index: None,
            ippatsu: false,
            temporary_furiten: false,
            riichi_furiten: false,
            nagashi_eligible: true,
            pao_daisangen: None,
            pao_daisuushi: None,
            forbidden_kinds: Vec::new(),
            waits: Vec::new(),
        }
    }

    pub fn reset_hand(&mut self) {
        self.hand.clear();
        self.melds.clear();
        self.river.clear();
        self.last_delta = 0;
        self.riichi = false;
        self.double_riichi = false;
        self.riichi_pending = false;
        self.riichi_index = None;
        self.ippatsu = false;
        self.temporary_furiten = false;
        self.riichi_furiten = false;
        self.nagashi_eligible = true;
        self.pao_daisangen = None;
        self.pao_daisuushi = None;
        self.forbidden_kinds.clear();
        self.waits.clear();
    }

    pub fn is_menzen(&self) -> bool {
        self.melds.iter().all(|m| !m.opened)
    }

    pub fn calculator(&self) -> HandCalculator {
        HandCalculator::new(&self.hand, &self.melds)
    }

    /// Recompute the cached wait set from the current 13-tile hand.
    pub fn update_waits(&mut self) {
        self.waits = self.calculator().waits();
    }

    /// A wait kind sitting in the player's own river locks out ron.
    pub fn river_furiten(&self) -> bool {
        self.waits.iter().any(|&w| {
            self.river.iter().any(|r| tile::kind(r.tile) == w)
        })
    }

    pub fn is_furiten(&self) -> bool {
        self.temporary_furiten || self.riichi_furiten || self.river_furiten()
    }

    pub fn remove_tile(&mut self, tid: u8) -> bool {
        if let Some(idx) = self.hand.iter().position(|&t| t == tid) {
            self.hand.remove(idx);
            true
        } else {
            false
        }
    }

    pub fn sort_hand(&mut self) {
        self.hand.sort_unstable();
    }

    pub fn count_kind(&self, kind: u8) -> usize {
        self.hand.iter().filter(|&&t| tile::kind(t) == kind).count()
    }

    pub fn quad_count(&self) -> usize {
        self.melds.iter().filter(|m| m.meld_type.is_quad()).count()
    }
}
