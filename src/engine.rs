//! Host-facing facade over the table state machine.

use std::collections::HashMap;

use crate::errors::EngineResult;
use crate::log::GameLog;
use crate::rule::GameRule;
use crate::state::{Action, GameState, Phase};
use crate::tenhou;

pub struct Engine {
    pub state: GameState,
}

impl Engine {
    /// Fresh engine on an entropy-shuffled wall; deals the first hand.
    pub fn new(rule: GameRule) -> Self {
        Engine {
            state: GameState::new(rule, None),
        }
    }

    /// Deterministic walls derived from the seed, one per hand.
    pub fn with_seed(rule: GameRule, seed: u64) -> Self {
        Engine {
            state: GameState::new(rule, Some(seed)),
        }
    }

    /// Restart the current hand on an explicit 136-tile draw order.
    pub fn init_with_wall(&mut self, draw_order: Vec<u8>) -> EngineResult<()> {
        self.state.begin_hand_with_wall(draw_order)
    }

    /// Restart the current hand on a Tenhou-derived wall.
    pub fn init_with_tenhou_seed(&mut self, seed_b64: &str) -> EngineResult<()> {
        let yama = tenhou::tenhou_yama_from_seed(seed_b64)?;
        self.init_with_wall(yama)
    }

    pub fn legal_actions(&self, seat: u8) -> Vec<Action> {
        self.state.legal_actions(seat)
    }

    pub fn apply(&mut self, actions: &HashMap<u8, Action>) -> EngineResult<()> {
        self.state.apply(actions)
    }

    pub fn is_done(&self) -> bool {
        self.state.is_done
    }

    pub fn scores(&self) -> [i32; 4] {
        self.state.scores()
    }

    pub fn log(&self) -> &GameLog {
        &self.state.log
    }

    pub fn export_wall(&self) -> String {
        self.state.wall.export()
    }

    /// Drive the game to its end, asking `choose` to pick among the legal
    /// actions of every deciding seat.
    pub fn run_to_completion(
        &mut self,
        mut choose: impl FnMut(u8, &[Action]) -> Action,
    ) -> EngineResult<u32> {
        let mut steps = 0u32;
        const MAX_STEPS: u32 = 100_000;
        while !self.state.is_done && steps < MAX_STEPS {
            steps += 1;
            if self.state.needs_next_hand {
                self.state.apply(&HashMap::new())?;
                continue;
            }
            let mut actions = HashMap::new();
            match self.state.phase {
                Phase::SelfAction => {
                    let seat = self.state.current_player;
                    let legals = self.state.legal_actions(seat);
                    if legals.is_empty() {
                        break;
                    }
                    actions.insert(seat, choose(seat, &legals));
                }
                Phase::DiscardResponse | Phase::QuadResponse => {
                    let mut seats: Vec<u8> = self.state.claims.keys().copied().collect();
                    seats.sort_unstable();
                    for seat in seats {
                        let legals = self.state.legal_actions(seat);
                        if !legals.is_empty() {
                            actions.insert(seat, choose(seat, &legals));
                        }
                    }
                }
                Phase::Ended => break,
            }
            self.state.apply(&actions)?;
        }
        Ok(steps)
    }
}
