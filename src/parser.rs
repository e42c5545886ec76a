//! Hand-notation parsing.
//!
//! `"123m456p0s77z"` style: digit runs followed by a suit letter, `0` for a
//! red five. Parenthesized groups are melds: no prefix = chi, `p` = pon,
//! `k` = quad (closed unless a caller index follows the suit), `s` = added
//! quad. Physical ids are allocated so the same copy is never handed out
//! twice within one string.

use crate::errors::{EngineError, EngineResult};
use crate::types::{Meld, MeldType};
use std::iter::Peekable;
use std::str::Chars;

/// Tracks which of the four physical copies of each kind are spoken for.
struct TileAllocator {
    used: [[bool; 4]; 34],
}

impl TileAllocator {
    fn new() -> Self {
        Self { used: [[false; 4]; 34] }
    }

    fn take(&mut self, kind: usize, red: bool) -> Result<u8, String> {
        if kind >= 34 {
            return Err(format!("invalid tile kind {}", kind));
        }
        let is_five = kind == 4 || kind == 13 || kind == 22;
        // Copy 0 of each number-suit five is the red one; black fives come
        // from copies 1-3 first so a later `0` can still find the red.
        let order: &[usize] = match (is_five, red) {
            (true, true) => &[0],
            (true, false) => &[1, 2, 3, 0],
            (false, _) => &[0, 1, 2, 3],
        };
        let slot = order
            .iter()
            .find(|&&i| !self.used[kind][i])
            .copied()
            .ok_or_else(|| format!("no copies of kind {} left", kind))?;
        self.used[kind][slot] = true;
        Ok((kind * 4 + slot) as u8)
    }
}

fn suit_offset(c: char) -> Option<usize> {
    match c {
        'm' => Some(0),
        'p' => Some(9),
        's' => Some(18),
        'z' => Some(27),
        _ => None,
    }
}

fn parse_err(input: &str, message: impl Into<String>) -> EngineError {
    EngineError::Parse {
        input: input.to_string(),
        message: message.into(),
    }
}

/// Parse a full hand string into concealed tiles plus melds.
pub fn parse_hand(text: &str) -> EngineResult<(Vec<u8>, Vec<Meld>)> {
    let mut alloc = TileAllocator::new();
    let mut tiles = Vec::new();
    let mut melds = Vec::new();
    let mut chars = text.chars().peekable();
    let mut pending: Vec<char> = Vec::new();

    while let Some(&c) = chars.peek() {
        if c == '(' {
            chars.next();
            melds.push(parse_meld(text, &mut chars, &mut alloc)?);
        } else if c.is_ascii_digit() {
            chars.next();
            pending.push(c);
        } else if let Some(offset) = suit_offset(c) {
            chars.next();
            for d in &pending {
                let val = d.to_digit(10).unwrap_or(0) as usize;
                let (kind, red) = digit_to_kind(text, offset, val)?;
                let tid = alloc.take(kind, red).map_err(|m| parse_err(text, m))?;
                tiles.push(tid);
            }
            pending.clear();
        } else if c.is_whitespace() {
            chars.next();
        } else {
            return Err(parse_err(text, format!("unexpected character '{}'", c)));
        }
    }

    if !pending.is_empty() {
        return Err(parse_err(text, "digits without a suit letter"));
    }
    Ok((tiles, melds))
}

/// Parse exactly one tile, e.g. `"2z"` or `"0p"`.
pub fn parse_tile(text: &str) -> EngineResult<u8> {
    let (tiles, melds) = parse_hand(text)?;
    if !melds.is_empty() || tiles.len() != 1 {
        return Err(parse_err(text, "expected exactly one tile"));
    }
    Ok(tiles[0])
}

fn digit_to_kind(input: &str, offset: usize, val: usize) -> EngineResult<(usize, bool)> {
    if val == 0 {
        if offset == 27 {
            return Err(parse_err(input, "honors have no red five"));
        }
        return Ok((offset + 4, true));
    }
    let kind = offset + val - 1;
    if offset == 27 && val > 7 {
        return Err(parse_err(input, format!("honor rank {} out of range", val)));
    }
    Ok((kind, false))
}

fn parse_meld(
    input: &str,
    chars: &mut Peekable<Chars>,
    alloc: &mut TileAllocator,
) -> EngineResult<Meld> {
    let mut content = String::new();
    loop {
        match chars.next() {
            Some(')') => break,
            Some(c) => content.push(c),
            None => return Err(parse_err(input, "unterminated meld group")),
        }
    }

    let (prefix, rest) = match content.chars().next() {
        Some(p @ ('p' | 'k' | 's')) => (p, &content[1..]),
        _ => (' ', content.as_str()),
    };

    let body: Vec<char> = rest.chars().collect();
    let mut idx = 0;
    let mut digits = Vec::new();
    while idx < body.len() && body[idx].is_ascii_digit() {
        digits.push(body[idx].to_digit(10).unwrap_or(0) as usize);
        idx += 1;
    }
    let suit = body
        .get(idx)
        .copied()
        .and_then(suit_offset)
        .ok_or_else(|| parse_err(input, "meld group missing suit"))?;
    idx += 1;
    let caller_idx = body.get(idx).and_then(|c| c.to_digit(10));

    if prefix == ' ' {
        // Chi
        if digits.len() != 3 {
            return Err(parse_err(input, "chi requires three digits"));
        }
        let mut tiles = Vec::with_capacity(3);
        for &val in &digits {
            let (kind, red) = digit_to_kind(input, suit, val)?;
            tiles.push(alloc.take(kind, red).map_err(|m| parse_err(input, m))?);
        }
        tiles.sort();
        return Ok(Meld::new(MeldType::Chi, tiles, caller_idx.map(|i| i as u8)));
    }

    let val = *digits
        .first()
        .ok_or_else(|| parse_err(input, "meld group missing rank"))?;
    let (kind, red) = digit_to_kind(input, suit, val)?;
    let count = match prefix {
        'p' => 3,
        _ => 4,
    };

    let mut tiles = Vec::with_capacity(count);
    let mut got_red = red;
    if red {
        tiles.push(alloc.take(kind, true).map_err(|m| parse_err(input, m))?);
    }
    while tiles.len() < count {
        match alloc.take(kind, false) {
            Ok(t) => tiles.push(t),
            Err(_) if !got_red => {
                tiles.push(alloc.take(kind, true).map_err(|m| parse_err(input, m))?);
                got_red = true;
            }
            Err(m) => return Err(parse_err(input, m)),
        }
    }
    tiles.sort();

    let meld_type = match prefix {
        'p' => MeldType::Pon,
        's' => MeldType::Kakan,
        // A quad without a caller index is closed.
        _ if caller_idx.is_none() => MeldType::Ankan,
        _ => MeldType::Daiminkan,
    };
    Ok(Meld::new(meld_type, tiles, caller_idx.map(|i| i as u8)))
}
