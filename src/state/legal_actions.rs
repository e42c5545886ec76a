//! Legal self-actions and claim generators.

use crate::rule::KuikaeMode;
use crate::tile;
use crate::types::{Meld, MeldType};

use super::{Action, GameState, Phase};

pub trait GameStateLegalActions {
    fn legal_actions_for(&self, seat: u8) -> Vec<Action>;
    /// Claims `seat` may raise against `tile` discarded by `discarder`,
    /// plus whether a win-shaped hand was declinable (furiten bookkeeping).
    fn claim_actions_for(&self, seat: u8, discarder: u8, tile: u8) -> (Vec<Action>, bool);
}

impl GameStateLegalActions for GameState {
    fn legal_actions_for(&self, seat: u8) -> Vec<Action> {
        let mut legals = Vec::new();
        if self.is_done || self.needs_next_hand {
            return legals;
        }

        match self.phase {
            Phase::SelfAction => {
                if seat != self.current_player {
                    return legals;
                }
                self.self_actions(seat, &mut legals);
            }
            Phase::DiscardResponse | Phase::QuadResponse => {
                if let Some(acts) = self.claims.get(&seat) {
                    legals.extend(acts.iter().cloned());
                    legals.push(Action::Pass);
                }
            }
            Phase::Ended => {}
        }
        legals
    }

    fn claim_actions_for(&self, seat: u8, discarder: u8, tile: u8) -> (Vec<Action>, bool) {
        let mut legals = Vec::new();
        let mut missed_shape = false;
        let p = &self.players[seat as usize];
        let kind = tile::kind(tile);

        // Ron
        if p.waits.contains(&kind) && !p.is_furiten() {
            let ctx = self.win_context(seat, false, false);
            let res = p
                .calculator()
                .evaluate(tile, &self.wall.dora_indicators, &[], &ctx);
            if res.agari {
                legals.push(Action::Ron);
            } else if res.has_shape {
                missed_shape = true;
            }
        } else if p.waits.contains(&kind) {
            // Furiten player watching a wait go by still misses agari.
            missed_shape = true;
        }

        // Pon / open quad
        let copies: Vec<u8> = p
            .hand
            .iter()
            .filter(|&&t| tile::kind(t) == kind)
            .copied()
            .collect();
        if !p.riichi && self.wall.live_remaining() > 0 {
            if copies.len() >= 2 && p.hand.len() >= 3 {
                let consumes = [copies[0], copies[1]];
                let forbidden = if self.rule.kuikae == KuikaeMode::None {
                    Vec::new()
                } else {
                    vec![kind]
                };
                if self.has_legal_discard_after(seat, &consumes, &forbidden) {
                    legals.push(Action::Pon { tile, consumes });
                }
            }
            if copies.len() >= 3 && self.total_quads() < 4 {
                legals.push(Action::Daiminkan {
                    tile,
                    consumes: [copies[0], copies[1], copies[2]],
                });
            }
        }

        // Chi, left neighbor only, number suits only
        let is_left_neighbor = seat == (discarder + 1) % 4;
        if is_left_neighbor
            && !p.riichi
            && self.wall.live_remaining() > 0
            && kind < 27
            && p.hand.len() >= 3
        {
            self.chi_claims(seat, tile, &mut legals);
        }

        (legals, missed_shape)
    }
}

impl GameState {
    fn self_actions(&self, seat: u8, legals: &mut Vec<Action>) {
        let p = &self.players[seat as usize];

        // Tsumo
        if let Some(drawn) = self.drawn_tile {
            let mut concealed = p.hand.clone();
            if let Some(idx) = concealed.iter().rposition(|&t| t == drawn) {
                concealed.remove(idx);
            }
            let calc = crate::hand_calculator::HandCalculator::new(&concealed, &p.melds);
            let ctx = self.win_context(seat, true, false);
            let res = calc.evaluate(drawn, &self.wall.dora_indicators, &[], &ctx);
            if res.agari {
                legals.push(Action::Tsumo);
            }
        }

        // Discards
        if p.riichi {
            if let Some(drawn) = self.drawn_tile {
                legals.push(Action::Discard { tile: drawn });
            }
        } else {
            for &tile in distinct_discards(&p.hand).iter() {
                let kind = tile::kind(tile);
                if !p.forbidden_kinds.contains(&kind) {
                    legals.push(Action::Discard { tile });
                }
            }

            // Riichi, one entry per discard that leaves tenpai
            if p.is_menzen()
                && !p.riichi_pending
                && p.score >= 1000
                && self.wall.live_remaining() >= 4
            {
                for &tile in distinct_discards(&p.hand).iter() {
                    let mut rest = p.hand.clone();
                    if let Some(idx) = rest.iter().position(|&t| t == tile) {
                        rest.remove(idx);
                    }
                    let calc = crate::hand_calculator::HandCalculator::new(&rest, &p.melds);
                    if calc.is_tenpai() {
                        legals.push(Action::Riichi { tile });
                    }
                }
            }
        }

        // Quads
        if self.drawn_tile.is_some() && self.wall.live_remaining() > 0 && self.total_quads() < 4
        {
            let mut counts = [0u8; 34];
            for &t in &p.hand {
                counts[tile::kind(t) as usize] += 1;
            }

            if !p.riichi && !p.riichi_pending {
                for (kind, &c) in counts.iter().enumerate() {
                    if c == 4 {
                        legals.push(Action::Ankan { kind: kind as u8 });
                    }
                }
                for m in &p.melds {
                    if m.meld_type == MeldType::Pon {
                        let target = m.kind();
                        for &t in &p.hand {
                            if tile::kind(t) == target {
                                legals.push(Action::Kakan { tile: t });
                            }
                        }
                    }
                }
            } else if let Some(drawn) = self.drawn_tile {
                // Post-riichi: closed quad only on the drawn kind, and only
                // when it leaves the wait set untouched.
                let kind = tile::kind(drawn);
                if counts[kind as usize] == 4 && self.ankan_keeps_waits(seat, kind) {
                    legals.push(Action::Ankan { kind });
                }
            }
        }

        // Nine terminals, first uninterrupted turn only
        let no_calls = self.players.iter().all(|q| q.melds.is_empty());
        if self.first_go_around && no_calls && p.river.is_empty() && !p.riichi_pending {
            let mut distinct = [false; 34];
            for &t in &p.hand {
                let k = tile::kind(t);
                if tile::is_terminal_or_honor(k) {
                    distinct[k as usize] = true;
                }
            }
            if distinct.iter().filter(|&&d| d).count() >= 9 {
                legals.push(Action::NineTerminals);
            }
        }
    }

    /// Post-kan wait check for a riichi player's closed quad.
    fn ankan_keeps_waits(&self, seat: u8, kind: u8) -> bool {
        let p = &self.players[seat as usize];
        let drawn = match self.drawn_tile {
            Some(t) => t,
            None => return false,
        };

        let mut pre = p.hand.clone();
        if let Some(idx) = pre.iter().position(|&t| t == drawn) {
            pre.remove(idx);
        }
        let mut waits_pre = crate::hand_calculator::HandCalculator::new(&pre, &p.melds).waits();
        waits_pre.sort_unstable();

        let mut post = p.hand.clone();
        post.retain(|&t| tile::kind(t) != kind);
        let mut melds_post = p.melds.clone();
        let base = kind * 4;
        melds_post.push(Meld::new(
            MeldType::Ankan,
            vec![base, base + 1, base + 2, base + 3],
            None,
        ));
        let mut waits_post =
            crate::hand_calculator::HandCalculator::new(&post, &melds_post).waits();
        waits_post.sort_unstable();

        !waits_pre.is_empty() && waits_pre == waits_post
    }

    fn chi_claims(&self, seat: u8, tile: u8, legals: &mut Vec<Action>) {
        let p = &self.players[seat as usize];
        let kind = tile::kind(tile);
        let r = kind % 9;

        let options = |k: u8| -> Vec<u8> {
            let mut seen_black = false;
            let mut out = Vec::new();
            for &t in &p.hand {
                if tile::kind(t) != k {
                    continue;
                }
                // One black copy is enough; the red copy stays distinct.
                if tile::is_red(t) {
                    out.push(t);
                } else if !seen_black {
                    seen_black = true;
                    out.push(t);
                }
            }
            out
        };

        let push_pair = |c1: u8, c2: u8, legals: &mut Vec<Action>| {
            if self.chi_leaves_a_discard(seat, tile, c1, c2) {
                legals.push(Action::Chi {
                    tile,
                    consumes: [c1, c2],
                });
            }
        };

        if r >= 2 {
            for &c1 in &options(kind - 2) {
                for &c2 in &options(kind - 1) {
                    push_pair(c1, c2, legals);
                }
            }
        }
        if (1..=7).contains(&r) {
            for &c1 in &options(kind - 1) {
                for &c2 in &options(kind + 1) {
                    push_pair(c1, c2, legals);
                }
            }
        }
        if r <= 6 {
            for &c1 in &options(kind + 1) {
                for &c2 in &options(kind + 2) {
                    push_pair(c1, c2, legals);
                }
            }
        }
    }

    /// Kuikae viability: after the call there must be something left to
    /// discard.
    fn chi_leaves_a_discard(&self, seat: u8, tile: u8, c1: u8, c2: u8) -> bool {
        let kind = tile::kind(tile);
        let forbidden = self.kuikae_forbidden(kind, tile::kind(c1), tile::kind(c2));
        self.has_legal_discard_after(seat, &[c1, c2], &forbidden)
    }

    pub(super) fn kuikae_forbidden(&self, claimed: u8, c1: u8, c2: u8) -> Vec<u8> {
        let mut forbidden = Vec::new();
        if self.rule.kuikae == KuikaeMode::None {
            return forbidden;
        }
        forbidden.push(claimed);
        if self.rule.kuikae == KuikaeMode::StrictFlank {
            let mut cons = [c1, c2];
            cons.sort_unstable();
            let r = claimed % 9;
            if cons[0] == claimed + 1 && cons[1] == claimed + 2 && r <= 5 {
                forbidden.push(claimed + 3);
            } else if claimed >= 2 && cons[0] == claimed - 2 && cons[1] == claimed - 1 && r >= 3 {
                forbidden.push(claimed - 3);
            }
        }
        forbidden
    }

    fn has_legal_discard_after(&self, seat: u8, consumed: &[u8], forbidden: &[u8]) -> bool {
        let p = &self.players[seat as usize];
        let mut used = vec![false; consumed.len()];
        for &t in &p.hand {
            let mut consumed_here = false;
            for (i, &c) in consumed.iter().enumerate() {
                if !used[i] && c == t {
                    used[i] = true;
                    consumed_here = true;
                    break;
                }
            }
            if consumed_here {
                continue;
            }
            if !forbidden.contains(&tile::kind(t)) {
                return true;
            }
        }
        false
    }

    pub(super) fn total_quads(&self) -> usize {
        self.players.iter().map(|p| p.quad_count()).sum()
    }
}

/// One discard entry per distinct (kind, red) present in the hand.
fn distinct_discards(hand: &[u8]) -> Vec<u8> {
    let mut out: Vec<u8> = Vec::new();
    for &t in hand {
        let dup = out
            .iter()
            .any(|&o| tile::kind(o) == tile::kind(t) && tile::is_red(o) == tile::is_red(t));
        if !dup {
            out.push(t);
        }
    }
    out
}
