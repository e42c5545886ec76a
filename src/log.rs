//! Append-only typed event stream.
//!
//! The table appends one record per observable transition; rendering to
//! JSON lines is the only formatting step and lives here, away from the
//! rules logic.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallKind {
    Chi,
    Pon,
    OpenQuad,
    AddedQuad,
    ClosedQuad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclareKind {
    NineTerminals,
    Tsumo,
    Ron,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    Draw {
        seat: u8,
        tile: u8,
        rinshan: bool,
    },
    Discard {
        seat: u8,
        tile: u8,
        from_hand: bool,
        riichi: bool,
    },
    Call {
        kind: CallKind,
        seat: u8,
        from: u8,
        tile: u8,
        tiles: Vec<u8>,
    },
    RevealDora {
        tile: u8,
    },
    Declare {
        kind: DeclareKind,
        seat: u8,
        tile: Option<u8>,
    },
    ScoreSnapshot {
        scores: [i32; 4],
    },
}

#[derive(Debug, Clone, Default)]
pub struct GameLog {
    events: Vec<GameEvent>,
}

impl GameLog {
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// One JSON object per line, in append order.
    pub fn to_json_lines(&self) -> String {
        let mut out = String::new();
        for e in &self.events {
            out.push_str(&serde_json::to_string(e).unwrap_or_default());
            out.push('\n');
        }
        out
    }
}
