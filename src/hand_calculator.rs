//! Win/wait analysis for one player's tiles.
//!
//! Holds the concealed tiles as a kind histogram next to the called melds,
//! keeps a parallel histogram including meld tiles for dora counting, and
//! answers the three questions play needs: what completes this hand, is it
//! tenpai, and what is a given winning tile worth.

use crate::agari;
use crate::errors::EngineResult;
use crate::score;
use crate::tile;
use crate::types::{Hand, Meld, WinContext, WinResult, Wind, TILE_MAX};
use crate::yaku::{self, DoraCounts, MeldView};

pub struct HandCalculator {
    /// Concealed kinds only.
    hand: Hand,
    /// Concealed + meld kinds, quads at full weight (dora counting).
    full: Hand,
    melds: Vec<MeldView>,
    aka_count: u8,
}

impl HandCalculator {
    pub fn new(tiles_136: &[u8], melds: &[Meld]) -> Self {
        let mut aka_count = 0;
        let mut hand = Hand::new();
        for &t in tiles_136 {
            if tile::is_red(t) {
                aka_count += 1;
            }
            hand.add(tile::kind(t));
        }

        let mut full = hand.clone();
        let mut views = Vec::with_capacity(melds.len());
        for m in melds {
            for &t in &m.tiles {
                if tile::is_red(t) {
                    aka_count += 1;
                }
                full.add(tile::kind(t));
            }
            views.push(MeldView {
                meld_type: m.meld_type,
                kind: m.kind(),
            });
        }

        HandCalculator {
            hand,
            full,
            melds: views,
            aka_count,
        }
    }

    pub fn from_text(text: &str) -> EngineResult<Self> {
        let (tiles, melds) = crate::parser::parse_hand(text)?;
        Ok(Self::new(&tiles, &melds))
    }

    #[inline]
    fn concealed_total(&self) -> u8 {
        self.hand.total() + self.melds.len() as u8 * 3
    }

    /// All kinds that complete the 13-tile hand.
    pub fn waits(&self) -> Vec<u8> {
        let mut waits = Vec::new();
        if self.concealed_total() != 13 {
            return waits;
        }
        let mut probe = self.hand.clone();
        for k in 0..TILE_MAX as u8 {
            if probe.counts[k as usize] < 4 {
                probe.add(k);
                if agari::is_agari(&mut probe) {
                    waits.push(k);
                }
                probe.remove(k);
            }
        }
        waits
    }

    pub fn is_tenpai(&self) -> bool {
        !self.waits().is_empty()
    }

    pub fn shanten(&self) -> i8 {
        crate::shanten::shanten(&self.hand, self.melds.len() as u8)
    }

    /// Score the hand completed by `win_tile` under `ctx`. Honba and riichi
    /// sticks ride on top at the table layer.
    pub fn evaluate(
        &self,
        win_tile: u8,
        dora_indicators: &[u8],
        ura_indicators: &[u8],
        ctx: &WinContext,
    ) -> WinResult {
        let win_kind = tile::kind(win_tile);
        let mut hand14 = self.hand.clone();
        let mut full14 = self.full.clone();
        let mut aka = self.aka_count;

        let added = self.concealed_total() == 13;
        if added {
            hand14.add(win_kind);
            full14.add(win_kind);
            if tile::is_red(win_tile) {
                aka += 1;
            }
        }

        if !agari::is_agari(&mut hand14) {
            return WinResult::default();
        }

        let count_pointed = |indicators: &[u8], counts: &Hand| {
            let mut n = 0u8;
            for &ind in indicators {
                let pointed = tile::dora_next(tile::kind(ind));
                n += counts.counts[pointed as usize];
            }
            n
        };
        let dora = DoraCounts {
            dora: count_pointed(dora_indicators, &full14),
            aka,
            ura: count_pointed(ura_indicators, &full14),
        };

        let eval = yaku::evaluate(&hand14, &self.melds, ctx, win_kind, dora);
        let has_yaku = eval.yaku.iter().any(|y| !y.is_dora());
        let agari = (has_yaku || eval.yakuman_count > 0) && eval.han >= 1;

        let is_dealer = ctx.seat_wind == Wind::East;
        let payment = if agari {
            score::calculate(eval.han, eval.fu, is_dealer, ctx.tsumo, 0)
        } else {
            score::Payment::default()
        };

        WinResult {
            agari,
            has_shape: true,
            yakuman_count: eval.yakuman_count,
            han: eval.han,
            fu: eval.fu,
            yaku: eval.yaku,
            pay_ron: payment.pay_ron,
            pay_tsumo_dealer: payment.pay_tsumo_dealer,
            pay_tsumo_each: payment.pay_tsumo_each,
            pao_payer: None,
        }
    }
}
