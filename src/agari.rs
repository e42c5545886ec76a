//! Completed-hand detection and full decomposition.
//!
//! Works on 14-kind histograms (melds already stripped). The three terminal
//! shapes are the standard head + four groups, seven pairs, and thirteen
//! orphans.

use crate::types::{Hand, TILE_MAX};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mentsu {
    /// Triplet of the given kind.
    Koutsu(u8),
    /// Sequence starting at the given kind.
    Shuntsu(u8),
}

/// One partition of a standard hand: a pair head plus four groups.
#[derive(Debug, Clone)]
pub struct Division {
    pub head: u8,
    pub body: Vec<Mentsu>,
}

/// A kind can start a sequence only inside a number suit with rank <= 7.
#[inline]
fn seq_start_ok(i: usize) -> bool {
    matches!(i, 0..=6 | 9..=15 | 18..=24)
}

pub fn is_agari(hand: &mut Hand) -> bool {
    is_kokushi(hand) || is_chiitoitsu(hand) || is_standard_agari(hand)
}

/// Enumerate every (head, body) partition of the hand. Groups are taken
/// smallest-kind-first, so permutations of the same partition never appear
/// twice.
pub fn find_divisions(hand: &Hand) -> Vec<Division> {
    let mut divisions = Vec::new();
    for head in 0..TILE_MAX {
        if hand.counts[head] < 2 {
            continue;
        }
        let mut rest = hand.clone();
        rest.counts[head] -= 2;
        let mut body = Vec::with_capacity(4);
        collect_bodies(&mut rest, 0, &mut body, &mut |body| {
            divisions.push(Division {
                head: head as u8,
                body: body.to_vec(),
            });
        });
    }
    divisions
}

fn collect_bodies(
    hand: &mut Hand,
    start: usize,
    body: &mut Vec<Mentsu>,
    sink: &mut impl FnMut(&[Mentsu]),
) {
    let mut i = start;
    while i < TILE_MAX && hand.counts[i] == 0 {
        i += 1;
    }
    if i == TILE_MAX {
        sink(body);
        return;
    }

    if hand.counts[i] >= 3 {
        hand.counts[i] -= 3;
        body.push(Mentsu::Koutsu(i as u8));
        collect_bodies(hand, i, body, sink);
        body.pop();
        hand.counts[i] += 3;
    }

    if seq_start_ok(i) && hand.counts[i + 1] > 0 && hand.counts[i + 2] > 0 {
        hand.counts[i] -= 1;
        hand.counts[i + 1] -= 1;
        hand.counts[i + 2] -= 1;
        body.push(Mentsu::Shuntsu(i as u8));
        collect_bodies(hand, i, body, sink);
        body.pop();
        hand.counts[i] += 1;
        hand.counts[i + 1] += 1;
        hand.counts[i + 2] += 1;
    }
}

pub fn is_standard_agari(hand: &mut Hand) -> bool {
    for i in 0..TILE_MAX {
        if hand.counts[i] >= 2 {
            hand.counts[i] -= 2;
            let ok = decompose(hand, 0);
            hand.counts[i] += 2;
            if ok {
                return true;
            }
        }
    }
    false
}

fn decompose(hand: &mut Hand, start: usize) -> bool {
    let mut i = start;
    while i < TILE_MAX && hand.counts[i] == 0 {
        i += 1;
    }
    if i == TILE_MAX {
        return true;
    }

    if hand.counts[i] >= 3 {
        hand.counts[i] -= 3;
        let ok = decompose(hand, i);
        hand.counts[i] += 3;
        if ok {
            return true;
        }
    }

    if seq_start_ok(i) && hand.counts[i + 1] > 0 && hand.counts[i + 2] > 0 {
        hand.counts[i] -= 1;
        hand.counts[i + 1] -= 1;
        hand.counts[i + 2] -= 1;
        let ok = decompose(hand, i);
        hand.counts[i] += 1;
        hand.counts[i + 1] += 1;
        hand.counts[i + 2] += 1;
        if ok {
            return true;
        }
    }

    false
}

pub fn is_kokushi(hand: &Hand) -> bool {
    let mut pair_found = false;
    for &k in &crate::tile::YAOCHUU_KINDS {
        match hand.counts[k as usize] {
            0 => return false,
            1 => {}
            2 if !pair_found => pair_found = true,
            _ => return false,
        }
    }
    // Any tile outside the thirteen kinds disqualifies the shape.
    for (k, &c) in hand.counts.iter().enumerate() {
        if c > 0 && !crate::tile::is_terminal_or_honor(k as u8) {
            return false;
        }
    }
    pair_found
}

pub fn is_chiitoitsu(hand: &Hand) -> bool {
    let mut pairs = 0;
    for &c in hand.counts.iter() {
        match c {
            0 => {}
            2 => pairs += 1,
            _ => return false,
        }
    }
    pairs == 7
}
