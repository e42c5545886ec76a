use serde::{Deserialize, Serialize};

/// Swap-calling (kuikae) restriction after a chi or pon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KuikaeMode {
    /// No restriction.
    None,
    /// The claimed kind may not be discarded this turn.
    Basic,
    /// Also forbids the far end of the claimed sequence (suji kuikae).
    StrictFlank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameLength {
    /// One hand, then stop (harness/analysis mode).
    SingleHand,
    /// East round, sudden death into south while nobody holds 30,000.
    EastOnly,
    /// East + south rounds, sudden death into west.
    HalfGame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRule {
    /// Simultaneous ron pays every winner; off = head bump (atama-hane).
    pub multi_ron: bool,
    /// Kokushi may rob a closed quad.
    pub kokushi_chankan_on_ankan: bool,
    pub kuikae: KuikaeMode,
    pub length: GameLength,
}

impl Default for GameRule {
    fn default() -> Self {
        GameRule {
            multi_ron: true,
            kokushi_chankan_on_ankan: true,
            kuikae: KuikaeMode::Basic,
            length: GameLength::HalfGame,
        }
    }
}

impl GameRule {
    /// Tenhou-style settings: no robbing closed quads for kokushi.
    pub fn tenhou() -> Self {
        GameRule {
            kokushi_chankan_on_ankan: false,
            ..Default::default()
        }
    }

    pub fn single_hand() -> Self {
        GameRule {
            length: GameLength::SingleHand,
            ..Default::default()
        }
    }
}
