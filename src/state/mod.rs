//! Table state machine: wall, turns, claims, payouts, abortive draws.
//!
//! The engine is synchronous: a host reads `legal_actions`, submits one
//! action per deciding seat through `apply`, and the machine advances.
//! Draws are internal; the observable phases are a player deciding on their
//! own turn, the table waiting on responses to a discard or a quad, and the
//! end of the game. An action outside the legal set is rejected with the
//! state untouched.

use std::collections::HashMap;

use ahash::AHashMap;

use crate::errors::{EngineError, EngineResult};
use crate::hand_calculator::HandCalculator;
use crate::log::{CallKind, DeclareKind, GameEvent, GameLog};
use crate::rule::{GameLength, GameRule, KuikaeMode};
use crate::score;
use crate::tile;
use crate::types::{Meld, MeldType, WinContext, WinResult, Wind};
use crate::yaku::Yaku;

pub mod legal_actions;
pub mod player;
pub mod wall;

use legal_actions::GameStateLegalActions;
use player::{PlayerState, RiverTile};
use wall::WallState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Discard { tile: u8 },
    /// Declare riichi and discard the named tile.
    Riichi { tile: u8 },
    Tsumo,
    Ankan { kind: u8 },
    Kakan { tile: u8 },
    NineTerminals,
    Chi { tile: u8, consumes: [u8; 2] },
    Pon { tile: u8, consumes: [u8; 2] },
    Daiminkan { tile: u8, consumes: [u8; 3] },
    Ron,
    Pass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The current player acts on their own turn.
    SelfAction,
    /// Other seats may claim the last discard.
    DiscardResponse,
    /// Other seats may rob the pending quad.
    QuadResponse,
    /// Game over.
    Ended,
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub wall: WallState,
    pub players: [PlayerState; 4],
    pub rule: GameRule,

    pub phase: Phase,
    pub current_player: u8,
    /// Offered responses per seat while a response window is open.
    pub claims: AHashMap<u8, Vec<Action>>,
    pub last_discard: Option<(u8, u8)>,
    pending_kan: Option<(u8, Action)>,
    riichi_acceptance: Option<u8>,
    pub drawn_tile: Option<u8>,

    pub dealer: u8,
    pub honba: u8,
    pub riichi_sticks: u32,
    round_index: u8,
    pub first_go_around: bool,
    after_kan: bool,

    pub is_done: bool,
    pub needs_next_hand: bool,
    pending_dealer_keeps: bool,
    pending_is_draw: bool,

    pub log: GameLog,
    /// Winning evaluations of the hand that just ended, by seat.
    pub win_results: AHashMap<u8, WinResult>,
}

impl GameState {
    pub fn new(rule: GameRule, seed: Option<u64>) -> Self {
        let players = [
            PlayerState::new(25000),
            PlayerState::new(25000),
            PlayerState::new(25000),
            PlayerState::new(25000),
        ];
        let mut state = GameState {
            wall: WallState::new(seed),
            players,
            rule,
            phase: Phase::SelfAction,
            current_player: 0,
            claims: AHashMap::new(),
            last_discard: None,
            pending_kan: None,
            riichi_acceptance: None,
            drawn_tile: None,
            dealer: 0,
            honba: 0,
            riichi_sticks: 0,
            round_index: 0,
            first_go_around: true,
            after_kan: false,
            is_done: false,
            needs_next_hand: false,
            pending_dealer_keeps: false,
            pending_is_draw: false,
            log: GameLog::default(),
            win_results: AHashMap::new(),
        };
        state.begin_hand(0, 0, 0, 0);
        state
    }

    pub fn round_wind(&self) -> Wind {
        Wind::from(self.round_index)
    }

    pub fn seat_wind(&self, seat: u8) -> Wind {
        Wind::from((seat + 4 - self.dealer) % 4)
    }

    pub fn scores(&self) -> [i32; 4] {
        [
            self.players[0].score,
            self.players[1].score,
            self.players[2].score,
            self.players[3].score,
        ]
    }

    /// Every physical tile, wherever it sits. Always 136.
    pub fn total_tiles(&self) -> usize {
        self.wall.tiles.len()
            + self
                .players
                .iter()
                .map(|p| {
                    p.hand.len()
                        + p.melds.iter().map(|m| m.tiles.len()).sum::<usize>()
                        + p.river.iter().filter(|r| r.still_visible).count()
                })
                .sum::<usize>()
    }

    pub fn legal_actions(&self, seat: u8) -> Vec<Action> {
        self.legal_actions_for(seat)
    }

    /// Advance the machine with one action per deciding seat. Response
    /// seats may be omitted; omission is a pass.
    pub fn apply(&mut self, actions: &HashMap<u8, Action>) -> EngineResult<()> {
        if self.is_done {
            return Err(EngineError::InvalidState {
                message: "game is over".to_string(),
            });
        }
        if self.needs_next_hand {
            self.start_next_hand();
            return Ok(());
        }

        for (&seat, action) in actions {
            if seat >= 4 {
                return Err(EngineError::IllegalAction {
                    seat,
                    message: "no such seat".to_string(),
                });
            }
            let legals = self.legal_actions_for(seat);
            if !legals.contains(action) {
                return Err(EngineError::IllegalAction {
                    seat,
                    message: format!("{:?} is not in the legal set", action),
                });
            }
        }

        match self.phase {
            Phase::SelfAction => {
                let seat = self.current_player;
                let action = actions
                    .get(&seat)
                    .ok_or_else(|| EngineError::InvalidState {
                        message: format!("no action submitted for seat {}", seat),
                    })?
                    .clone();
                self.apply_self_action(seat, action);
            }
            Phase::DiscardResponse | Phase::QuadResponse => {
                self.resolve_responses(actions);
            }
            Phase::Ended => {
                return Err(EngineError::InvalidState {
                    message: "game is over".to_string(),
                });
            }
        }

        debug_assert_eq!(self.total_tiles(), 136);
        Ok(())
    }

    fn apply_self_action(&mut self, seat: u8, action: Action) {
        match action {
            Action::Discard { tile } => {
                let from_hand = self.drawn_tile != Some(tile);
                self.players[seat as usize].remove_tile(tile);
                self.resolve_discard(seat, tile, from_hand, false);
            }
            Action::Riichi { tile } => {
                let no_melds = self.players.iter().all(|p| p.melds.is_empty());
                let from_hand = self.drawn_tile != Some(tile);
                let p = &mut self.players[seat as usize];
                p.double_riichi = self.first_go_around && no_melds && p.river.is_empty();
                p.riichi_pending = true;
                p.remove_tile(tile);
                self.resolve_discard(seat, tile, from_hand, true);
            }
            Action::Tsumo => self.payout_tsumo(seat),
            Action::Ankan { kind } => self.begin_ankan(seat, kind),
            Action::Kakan { tile } => self.begin_kakan(seat, tile),
            Action::NineTerminals => {
                self.log.push(GameEvent::Declare {
                    kind: DeclareKind::NineTerminals,
                    seat,
                    tile: None,
                });
                self.abort_hand();
            }
            _ => {}
        }
    }

    fn resolve_discard(&mut self, seat: u8, tile: u8, from_hand: bool, riichi: bool) {
        let s = seat as usize;
        self.players[s].ippatsu = false;
        self.players[s].temporary_furiten = false;
        self.players[s].river.push(RiverTile {
            tile,
            from_hand,
            riichi,
            still_visible: true,
        });
        if riichi {
            self.players[s].riichi = true;
            self.players[s].riichi_pending = false;
            self.players[s].riichi_index = Some(self.players[s].river.len() - 1);
            self.riichi_acceptance = Some(seat);
        }
        self.drawn_tile = None;
        self.players[s].sort_hand();
        self.players[s].update_waits();
        let kind = tile::kind(tile);
        self.players[s].nagashi_eligible &= tile::is_terminal_or_honor(kind);
        self.players[s].forbidden_kinds.clear();

        self.log.push(GameEvent::Discard {
            seat,
            tile,
            from_hand,
            riichi,
        });

        self.last_discard = Some((seat, tile));
        self.claims.clear();
        for i in 0..4u8 {
            if i == seat {
                continue;
            }
            let (claims, missed_shape) = self.claim_actions_for(i, seat, tile);
            if missed_shape {
                self.players[i as usize].temporary_furiten = true;
                if self.players[i as usize].riichi {
                    self.players[i as usize].riichi_furiten = true;
                }
            }
            if !claims.is_empty() {
                self.claims.insert(i, claims);
            }
        }

        if self.claims.is_empty() {
            self.accept_riichi();
            if self.check_aborts() {
                return;
            }
            self.current_player = (seat + 1) % 4;
            self.draw_for(self.current_player);
        } else {
            self.phase = Phase::DiscardResponse;
        }
    }

    fn resolve_responses(&mut self, actions: &HashMap<u8, Action>) {
        // Declining an offered ron locks the seat out for the go-around,
        // permanently under riichi.
        let offered_ron: Vec<u8> = self
            .claims
            .iter()
            .filter(|(_, acts)| acts.contains(&Action::Ron))
            .map(|(&s, _)| s)
            .collect();
        for seat in offered_ron {
            if actions.get(&seat) != Some(&Action::Ron) {
                let p = &mut self.players[seat as usize];
                p.temporary_furiten = true;
                if p.riichi {
                    p.riichi_furiten = true;
                }
            }
        }

        let mut ron_seats: Vec<u8> = Vec::new();
        let mut call: Option<(u8, Action)> = None;
        for (&seat, action) in actions {
            match action {
                Action::Ron => ron_seats.push(seat),
                Action::Pon { .. } | Action::Daiminkan { .. } | Action::Chi { .. } => {
                    let outranks = match (&call, action) {
                        (None, _) => true,
                        (Some((_, Action::Chi { .. })), Action::Pon { .. }) => true,
                        (Some((_, Action::Chi { .. })), Action::Daiminkan { .. }) => true,
                        _ => false,
                    };
                    if outranks {
                        call = Some((seat, action.clone()));
                    }
                }
                _ => {}
            }
        }

        if !ron_seats.is_empty() {
            self.payout_ron(ron_seats);
        } else if let Some((claimer, action)) = call {
            self.execute_call(claimer, action);
        } else {
            // Everyone passed.
            self.claims.clear();
            if let Some((seat, action)) = self.pending_kan.take() {
                self.resolve_kan(seat, action);
            } else {
                self.accept_riichi();
                if self.check_aborts() {
                    return;
                }
                let next = match self.last_discard {
                    Some((d, _)) => (d + 1) % 4,
                    None => (self.current_player + 1) % 4,
                };
                self.current_player = next;
                self.draw_for(next);
            }
        }
    }

    fn execute_call(&mut self, claimer: u8, action: Action) {
        let (discarder, claimed) = match self.last_discard {
            Some(x) => x,
            None => return,
        };

        self.accept_riichi();
        self.first_go_around = false;
        self.after_kan = false;
        self.claims.clear();
        for p in self.players.iter_mut() {
            p.ippatsu = false;
        }
        self.players[claimer as usize].temporary_furiten = false;

        // The claimed tile leaves the river for the meld.
        if let Some(r) = self.players[discarder as usize]
            .river
            .iter_mut()
            .rev()
            .find(|r| r.tile == claimed && r.still_visible)
        {
            r.still_visible = false;
        }
        self.players[discarder as usize].nagashi_eligible = false;

        match action {
            Action::Chi { tile, consumes } => {
                for &c in &consumes {
                    self.players[claimer as usize].remove_tile(c);
                }
                let mut tiles = vec![consumes[0], consumes[1], tile];
                tiles.sort_unstable();
                self.players[claimer as usize].melds.push(Meld::new(
                    MeldType::Chi,
                    tiles.clone(),
                    Some(discarder),
                ));
                self.log.push(GameEvent::Call {
                    kind: CallKind::Chi,
                    seat: claimer,
                    from: discarder,
                    tile,
                    tiles,
                });
                self.players[claimer as usize].forbidden_kinds = self.kuikae_forbidden(
                    tile::kind(tile),
                    tile::kind(consumes[0]),
                    tile::kind(consumes[1]),
                );
                self.current_player = claimer;
                self.phase = Phase::SelfAction;
                self.drawn_tile = None;
            }
            Action::Pon { tile, consumes } => {
                for &c in &consumes {
                    self.players[claimer as usize].remove_tile(c);
                }
                let mut tiles = vec![consumes[0], consumes[1], tile];
                tiles.sort_unstable();
                self.players[claimer as usize].melds.push(Meld::new(
                    MeldType::Pon,
                    tiles.clone(),
                    Some(discarder),
                ));
                self.log.push(GameEvent::Call {
                    kind: CallKind::Pon,
                    seat: claimer,
                    from: discarder,
                    tile,
                    tiles,
                });
                self.note_pao(claimer, discarder, tile::kind(tile));
                self.players[claimer as usize].forbidden_kinds =
                    if self.rule.kuikae == KuikaeMode::None {
                        Vec::new()
                    } else {
                        vec![tile::kind(tile)]
                    };
                self.current_player = claimer;
                self.phase = Phase::SelfAction;
                self.drawn_tile = None;
            }
            Action::Daiminkan { tile, consumes } => {
                for &c in &consumes {
                    self.players[claimer as usize].remove_tile(c);
                }
                let mut tiles = vec![consumes[0], consumes[1], consumes[2], tile];
                tiles.sort_unstable();
                self.players[claimer as usize].melds.push(Meld::new(
                    MeldType::Daiminkan,
                    tiles.clone(),
                    Some(discarder),
                ));
                self.log.push(GameEvent::Call {
                    kind: CallKind::OpenQuad,
                    seat: claimer,
                    from: discarder,
                    tile,
                    tiles,
                });
                self.note_pao(claimer, discarder, tile::kind(tile));
                self.players[claimer as usize].forbidden_kinds.clear();
                self.kan_aftermath(claimer);
            }
            _ => {}
        }
    }

    /// Feeding the decisive valued triplet makes the feeder liable.
    fn note_pao(&mut self, claimer: u8, discarder: u8, kind: u8) {
        let p = &mut self.players[claimer as usize];
        if kind >= tile::WHITE {
            let dragons = p
                .melds
                .iter()
                .filter(|m| m.meld_type != MeldType::Chi && m.kind() >= tile::WHITE)
                .count();
            if dragons == 3 {
                p.pao_daisangen = Some(discarder);
            }
        } else if (tile::EAST..=tile::NORTH).contains(&kind) {
            let winds = p
                .melds
                .iter()
                .filter(|m| {
                    m.meld_type != MeldType::Chi
                        && (tile::EAST..=tile::NORTH).contains(&m.kind())
                })
                .count();
            if winds == 4 {
                p.pao_daisuushi = Some(discarder);
            }
        }
    }

    fn begin_ankan(&mut self, seat: u8, kind: u8) {
        let copies: Vec<u8> = self.players[seat as usize]
            .hand
            .iter()
            .filter(|&&t| tile::kind(t) == kind)
            .copied()
            .collect();
        let robbed = copies.first().copied().unwrap_or(kind * 4);

        // Kokushi may rob a closed quad when the rule allows it.
        let mut ronners = Vec::new();
        if self.rule.kokushi_chankan_on_ankan {
            for i in 0..4u8 {
                if i == seat {
                    continue;
                }
                let p = &self.players[i as usize];
                if !p.waits.contains(&kind) || p.is_furiten() {
                    continue;
                }
                let ctx = self.win_context(i, false, true);
                let res = p
                    .calculator()
                    .evaluate(robbed, &self.wall.dora_indicators, &[], &ctx);
                if res.agari && res.yaku.contains(&Yaku::Kokushi) {
                    ronners.push(i);
                }
            }
        }

        let action = Action::Ankan { kind };
        if ronners.is_empty() {
            self.resolve_kan(seat, action);
        } else {
            self.pending_kan = Some((seat, action));
            self.last_discard = Some((seat, robbed));
            self.claims.clear();
            for r in ronners {
                self.claims.insert(r, vec![Action::Ron]);
            }
            self.phase = Phase::QuadResponse;
        }
    }

    fn begin_kakan(&mut self, seat: u8, tile: u8) {
        let s = seat as usize;
        let kind = tile::kind(tile);

        // The tile joins the meld before the robbing window so observers see
        // a consistent table.
        self.players[s].remove_tile(tile);
        for m in self.players[s].melds.iter_mut() {
            if m.meld_type == MeldType::Pon && m.kind() == kind {
                m.meld_type = MeldType::Kakan;
                m.tiles.push(tile);
                m.tiles.sort_unstable();
                break;
            }
        }
        let tiles = self.players[s]
            .melds
            .iter()
            .find(|m| m.meld_type == MeldType::Kakan && m.kind() == kind)
            .map(|m| m.tiles.clone())
            .unwrap_or_default();
        self.players[s].update_waits();
        self.log.push(GameEvent::Call {
            kind: CallKind::AddedQuad,
            seat,
            from: seat,
            tile,
            tiles,
        });

        let mut ronners = Vec::new();
        for i in 0..4u8 {
            if i == seat {
                continue;
            }
            let p = &self.players[i as usize];
            if !p.waits.contains(&kind) || p.is_furiten() {
                continue;
            }
            let ctx = self.win_context(i, false, true);
            let res = p
                .calculator()
                .evaluate(tile, &self.wall.dora_indicators, &[], &ctx);
            if res.agari {
                ronners.push(i);
            }
        }

        let action = Action::Kakan { tile };
        if ronners.is_empty() {
            self.resolve_kan(seat, action);
        } else {
            self.pending_kan = Some((seat, action));
            self.last_discard = Some((seat, tile));
            self.claims.clear();
            for r in ronners {
                self.claims.insert(r, vec![Action::Ron]);
            }
            self.phase = Phase::QuadResponse;
        }
    }

    fn resolve_kan(&mut self, seat: u8, action: Action) {
        let s = seat as usize;
        if let Action::Ankan { kind } = action {
            let copies: Vec<u8> = self.players[s]
                .hand
                .iter()
                .filter(|&&t| tile::kind(t) == kind)
                .copied()
                .collect();
            self.players[s].hand.retain(|&t| tile::kind(t) != kind);
            self.players[s]
                .melds
                .push(Meld::new(MeldType::Ankan, copies.clone(), None));
            self.log.push(GameEvent::Call {
                kind: CallKind::ClosedQuad,
                seat,
                from: seat,
                tile: copies.first().copied().unwrap_or(kind * 4),
                tiles: copies,
            });
        }
        // A kakan already moved its tile in `begin_kakan`.

        self.first_go_around = false;
        for p in self.players.iter_mut() {
            p.ippatsu = false;
        }
        self.claims.clear();
        self.kan_aftermath(seat);
    }

    /// New indicator first, then the replacement draw.
    fn kan_aftermath(&mut self, seat: u8) {
        if let Some(t) = self.wall.reveal_kan_dora() {
            self.log.push(GameEvent::RevealDora { tile: t });
        }
        match self.wall.rinshan_draw() {
            Some(t) => {
                self.players[seat as usize].hand.push(t);
                self.drawn_tile = Some(t);
                self.after_kan = true;
                self.log.push(GameEvent::Draw {
                    seat,
                    tile: t,
                    rinshan: true,
                });
                self.current_player = seat;
                self.phase = Phase::SelfAction;
            }
            None => self.exhaustive_draw(),
        }
    }

    fn accept_riichi(&mut self) {
        if let Some(seat) = self.riichi_acceptance.take() {
            let s = seat as usize;
            self.players[s].score -= 1000;
            self.players[s].last_delta = -1000;
            self.riichi_sticks += 1;
            self.players[s].ippatsu = true;
        }
    }

    fn draw_for(&mut self, seat: u8) {
        self.after_kan = false;
        if self.players.iter().all(|p| !p.river.is_empty()) {
            self.first_go_around = false;
        }
        match self.wall.draw() {
            Some(t) => {
                self.players[seat as usize].hand.push(t);
                self.drawn_tile = Some(t);
                self.players[seat as usize].forbidden_kinds.clear();
                self.phase = Phase::SelfAction;
                self.current_player = seat;
                self.log.push(GameEvent::Draw {
                    seat,
                    tile: t,
                    rinshan: false,
                });
            }
            None => self.exhaustive_draw(),
        }
    }

    pub fn win_context(&self, seat: u8, tsumo: bool, chankan: bool) -> WinContext {
        let p = &self.players[seat as usize];
        let no_melds = self.players.iter().all(|q| q.melds.is_empty());
        WinContext {
            tsumo,
            riichi: p.riichi,
            double_riichi: p.double_riichi,
            ippatsu: p.ippatsu,
            haitei: tsumo && self.wall.live_remaining() == 0 && !self.after_kan,
            houtei: !tsumo && !chankan && self.wall.live_remaining() == 0 && !self.after_kan,
            rinshan: tsumo && self.after_kan,
            chankan,
            first_draw: tsumo && self.first_go_around && no_melds && p.river.is_empty(),
            seat_wind: self.seat_wind(seat),
            round_wind: self.round_wind(),
        }
    }

    fn pao_liability(&self, winner: u8, res: &WinResult) -> Option<(u8, u32)> {
        let p = &self.players[winner as usize];
        let mut units = 0u32;
        let mut liable = None;
        if res.yaku.contains(&Yaku::Daisangen) {
            if let Some(l) = p.pao_daisangen {
                units += 1;
                liable = Some(l);
            }
        }
        if res.yaku.contains(&Yaku::Daisuushi) {
            if let Some(l) = p.pao_daisuushi {
                units += 1;
                liable = Some(l);
            }
        }
        liable.map(|l| (l, units))
    }

    fn payout_tsumo(&mut self, seat: u8) {
        let drawn = match self.drawn_tile {
            Some(t) => t,
            None => return,
        };
        let s = seat as usize;
        let ctx = self.win_context(seat, true, false);
        let mut concealed = self.players[s].hand.clone();
        if let Some(idx) = concealed.iter().rposition(|&t| t == drawn) {
            concealed.remove(idx);
        }
        let ura = if self.players[s].riichi {
            self.wall.ura_indicators()
        } else {
            Vec::new()
        };
        let calc = HandCalculator::new(&concealed, &self.players[s].melds);
        let mut res = calc.evaluate(drawn, &self.wall.dora_indicators, &ura, &ctx);
        if !res.agari {
            return;
        }

        let is_dealer = seat == self.dealer;
        let honba = self.honba as u32;
        let mut deltas = [0i32; 4];

        if let Some((liable, units)) = self.pao_liability(seat, &res) {
            // The liable seat covers the fed yakuman in full; any other
            // yakuman on the hand splits normally.
            let unit: u32 = if is_dealer { 48000 } else { 32000 };
            deltas[liable as usize] -= (units * unit + honba * 300) as i32;
            let rest = (res.yakuman_count as u32).saturating_sub(units);
            if rest > 0 {
                let pay = score::calculate(13 * rest, 0, is_dealer, true, 0);
                for i in 0..4u8 {
                    if i == seat {
                        continue;
                    }
                    let owed = if i == self.dealer {
                        pay.pay_tsumo_dealer
                    } else {
                        pay.pay_tsumo_each
                    };
                    deltas[i as usize] -= owed as i32;
                }
            }
            res.pao_payer = Some(liable);
        } else {
            let pay = score::calculate(res.han, res.fu, is_dealer, true, honba);
            for i in 0..4u8 {
                if i == seat {
                    continue;
                }
                let owed = if i == self.dealer {
                    pay.pay_tsumo_dealer
                } else {
                    pay.pay_tsumo_each
                };
                deltas[i as usize] -= owed as i32;
            }
        }

        let won: i32 = -deltas.iter().sum::<i32>();
        deltas[s] = won + (self.riichi_sticks * 1000) as i32;
        self.riichi_sticks = 0;

        self.log.push(GameEvent::Declare {
            kind: DeclareKind::Tsumo,
            seat,
            tile: Some(drawn),
        });
        self.win_results.clear();
        self.win_results.insert(seat, res);
        self.apply_deltas(deltas);
        self.snapshot();
        self.end_hand(is_dealer, false);
    }

    fn payout_ron(&mut self, mut ron_seats: Vec<u8>) {
        let (discarder, win_tile) = match self.last_discard {
            Some(x) => x,
            None => return,
        };
        ron_seats.sort_by_key(|&s| (s + 4 - discarder) % 4);
        let winners: Vec<u8> = if self.rule.multi_ron {
            ron_seats
        } else {
            ron_seats.into_iter().take(1).collect()
        };

        let chankan = self.pending_kan.is_some();
        let mut deltas = [0i32; 4];
        let mut dealer_won = false;
        let mut first = true;
        self.win_results.clear();

        for &w in &winners {
            let ctx = self.win_context(w, false, chankan);
            let p = &self.players[w as usize];
            let ura = if p.riichi {
                self.wall.ura_indicators()
            } else {
                Vec::new()
            };
            let mut res = p
                .calculator()
                .evaluate(win_tile, &self.wall.dora_indicators, &ura, &ctx);
            if !res.agari {
                continue;
            }

            let honba = if first { self.honba as u32 } else { 0 };
            let pay = score::calculate(res.han, res.fu, w == self.dealer, false, honba);
            let value = pay.pay_ron as i32;

            if let Some((liable, units)) = self.pao_liability(w, &res) {
                // Half the fed yakuman from the liable seat, rest from the
                // discarder.
                let unit: u32 = if w == self.dealer { 48000 } else { 32000 };
                let pao_amt = ((units * unit / 2 + honba * 300) as i32).min(value);
                deltas[liable as usize] -= pao_amt;
                deltas[discarder as usize] -= value - pao_amt;
                res.pao_payer = Some(liable);
            } else {
                deltas[discarder as usize] -= value;
            }
            deltas[w as usize] += value;

            if first {
                deltas[w as usize] += (self.riichi_sticks * 1000) as i32;
                self.riichi_sticks = 0;
                first = false;
            }
            if w == self.dealer {
                dealer_won = true;
            }
            self.log.push(GameEvent::Declare {
                kind: DeclareKind::Ron,
                seat: w,
                tile: Some(win_tile),
            });
            self.win_results.insert(w, res);
        }

        self.pending_kan = None;
        self.apply_deltas(deltas);
        self.snapshot();
        self.end_hand(dealer_won, false);
    }

    fn exhaustive_draw(&mut self) {
        self.accept_riichi();

        let nagashi: Vec<u8> = (0..4u8)
            .filter(|&i| {
                let p = &self.players[i as usize];
                !p.river.is_empty() && p.nagashi_eligible
            })
            .collect();

        let mut deltas = [0i32; 4];
        let mut tenpai = [false; 4];
        for i in 0..4 {
            tenpai[i] = self.players[i].calculator().is_tenpai();
        }

        let dealer_keeps;
        if !nagashi.is_empty() {
            // Paid on the mangan tsumo schedule.
            for &w in &nagashi {
                if w == self.dealer {
                    for i in 0..4u8 {
                        if i != w {
                            deltas[i as usize] -= 4000;
                            deltas[w as usize] += 4000;
                        }
                    }
                } else {
                    for i in 0..4u8 {
                        if i == w {
                            continue;
                        }
                        let owed = if i == self.dealer { 4000 } else { 2000 };
                        deltas[i as usize] -= owed;
                        deltas[w as usize] += owed;
                    }
                }
            }
            dealer_keeps = nagashi.contains(&self.dealer);
        } else {
            let n = tenpai.iter().filter(|&&t| t).count();
            if (1..=3).contains(&n) {
                let gain = 3000 / n as i32;
                let loss = 3000 / (4 - n) as i32;
                for (i, &t) in tenpai.iter().enumerate() {
                    deltas[i] = if t { gain } else { -loss };
                }
            }
            dealer_keeps = tenpai[self.dealer as usize];
        }

        self.apply_deltas(deltas);
        self.snapshot();
        self.end_hand(dealer_keeps, true);
    }

    /// Four winds, four riichi, and split four-quad aborts.
    fn check_aborts(&mut self) -> bool {
        let one_discard_each = self.players.iter().all(|p| p.river.len() == 1);
        let no_melds = self.players.iter().all(|p| p.melds.is_empty());
        if one_discard_each && no_melds {
            let first = tile::kind(self.players[0].river[0].tile);
            if (tile::EAST..=tile::NORTH).contains(&first)
                && self
                    .players
                    .iter()
                    .all(|p| tile::kind(p.river[0].tile) == first)
            {
                self.abort_hand();
                return true;
            }
        }

        if self.total_quads() == 4 {
            let owners: Vec<usize> = self
                .players
                .iter()
                .enumerate()
                .filter(|(_, p)| p.quad_count() > 0)
                .map(|(i, _)| i)
                .collect();
            if owners.len() >= 2 {
                self.abort_hand();
                return true;
            }
        }

        if self.players.iter().all(|p| p.riichi) {
            self.abort_hand();
            return true;
        }

        false
    }

    /// Abortive draw: dealer keeps, honba up, sticks stay on the table.
    fn abort_hand(&mut self) {
        self.accept_riichi();
        self.snapshot();
        self.end_hand(true, true);
    }

    fn apply_deltas(&mut self, deltas: [i32; 4]) {
        for (p, d) in self.players.iter_mut().zip(deltas) {
            p.score += d;
            p.last_delta = d;
        }
    }

    fn snapshot(&mut self) {
        self.log.push(GameEvent::ScoreSnapshot {
            scores: self.scores(),
        });
    }

    fn end_hand(&mut self, dealer_keeps: bool, is_draw: bool) {
        self.needs_next_hand = true;
        self.pending_dealer_keeps = dealer_keeps;
        self.pending_is_draw = is_draw;
        self.claims.clear();
        self.pending_kan = None;
        self.riichi_acceptance = None;
        self.drawn_tile = None;
    }

    fn start_next_hand(&mut self) {
        let mut honba = self.honba;
        let mut dealer = self.dealer;
        let mut round = self.round_index;

        if self.pending_dealer_keeps {
            honba = honba.saturating_add(1);
        } else {
            honba = if self.pending_is_draw {
                honba.saturating_add(1)
            } else {
                0
            };
            dealer = (dealer + 1) % 4;
            if dealer == 0 {
                round += 1;
            }
        }

        let top_score = self.players.iter().map(|p| p.score).max().unwrap_or(0);
        let over = match self.rule.length {
            GameLength::SingleHand => true,
            GameLength::EastOnly => round >= 1 && (top_score >= 30000 || round > 1),
            GameLength::HalfGame => round >= 2 && (top_score >= 30000 || round > 2),
        };
        if over {
            self.is_done = true;
            self.phase = Phase::Ended;
            self.needs_next_hand = false;
            return;
        }

        let sticks = self.riichi_sticks;
        self.begin_hand(dealer, round, honba, sticks);
    }

    fn begin_hand(&mut self, dealer: u8, round: u8, honba: u8, sticks: u32) {
        self.dealer = dealer;
        self.current_player = dealer;
        self.round_index = round;
        self.honba = honba;
        self.riichi_sticks = sticks;
        self.phase = Phase::SelfAction;
        self.claims.clear();
        self.last_discard = None;
        self.pending_kan = None;
        self.riichi_acceptance = None;
        self.drawn_tile = None;
        self.first_go_around = true;
        self.after_kan = false;
        self.needs_next_hand = false;
        self.pending_dealer_keeps = false;
        self.pending_is_draw = false;
        self.win_results.clear();
        for p in self.players.iter_mut() {
            p.reset_hand();
        }

        self.wall.shuffle();
        self.deal();
    }

    /// Restart the current hand on an explicit wall (replay import).
    pub fn begin_hand_with_wall(&mut self, draw_order: Vec<u8>) -> EngineResult<()> {
        let dealer = self.dealer;
        self.current_player = dealer;
        self.phase = Phase::SelfAction;
        self.claims.clear();
        self.last_discard = None;
        self.pending_kan = None;
        self.riichi_acceptance = None;
        self.drawn_tile = None;
        self.first_go_around = true;
        self.after_kan = false;
        self.needs_next_hand = false;
        self.pending_dealer_keeps = false;
        self.pending_is_draw = false;
        self.win_results.clear();
        self.is_done = false;
        for p in self.players.iter_mut() {
            p.reset_hand();
        }
        self.log.clear();

        self.wall.import(draw_order)?;
        self.deal();
        Ok(())
    }

    fn deal(&mut self) {
        for _ in 0..3 {
            for offset in 0..4u8 {
                let seat = ((offset + self.dealer) % 4) as usize;
                for _ in 0..4 {
                    if let Some(t) = self.wall.tiles.pop() {
                        self.players[seat].hand.push(t);
                    }
                }
            }
        }
        for offset in 0..4u8 {
            let seat = ((offset + self.dealer) % 4) as usize;
            if let Some(t) = self.wall.tiles.pop() {
                self.players[seat].hand.push(t);
            }
        }
        for p in self.players.iter_mut() {
            p.sort_hand();
            p.update_waits();
        }

        // Dealer's fourteenth.
        self.draw_for(self.dealer);
    }
}
