//! Tile model over the 136-id space.
//!
//! Physical tiles are ids in `0..136`; four copies of each of the 34 kinds,
//! kind = `id / 4`. Kinds: man 0-8, pin 9-17, sou 18-26, honors 27-33
//! (E, S, W, N, white, green, red). The first physical copy of each five in
//! a number suit (ids 16, 52, 88) is the red five.

pub const KIND_COUNT: usize = 34;
pub const TILE_COUNT: usize = 136;

pub const RED_5M: u8 = 16;
pub const RED_5P: u8 = 52;
pub const RED_5S: u8 = 88;

pub const EAST: u8 = 27;
pub const NORTH: u8 = 30;
pub const WHITE: u8 = 31;
pub const RED_DRAGON: u8 = 33;

/// The thirteen terminal/honor kinds, in kind order.
pub const YAOCHUU_KINDS: [u8; 13] = [0, 8, 9, 17, 18, 26, 27, 28, 29, 30, 31, 32, 33];

/// Kinds legal in an all-green hand: 2s 3s 4s 6s 8s and the green dragon.
pub const GREEN_KINDS: [u8; 6] = [19, 20, 21, 23, 25, 32];

#[inline]
pub fn kind(tid: u8) -> u8 {
    tid / 4
}

#[inline]
pub fn is_red(tid: u8) -> bool {
    tid == RED_5M || tid == RED_5P || tid == RED_5S
}

/// Suit index: 0 man, 1 pin, 2 sou, 3 honors.
#[inline]
pub fn suit(kind: u8) -> u8 {
    kind / 9
}

/// 1-based rank within a number suit; honors report their index + 1.
#[inline]
pub fn rank(kind: u8) -> u8 {
    kind % 9 + 1
}

#[inline]
pub fn is_honor(kind: u8) -> bool {
    kind >= EAST
}

/// 1 or 9 of a number suit.
#[inline]
pub fn is_number_terminal(kind: u8) -> bool {
    kind < EAST && (kind % 9 == 0 || kind % 9 == 8)
}

#[inline]
pub fn is_terminal_or_honor(kind: u8) -> bool {
    is_honor(kind) || is_number_terminal(kind)
}

/// The tile a dora indicator points at: 9→1 within each number suit,
/// N wraps to E, red dragon wraps to white.
pub fn dora_next(kind: u8) -> u8 {
    match kind {
        8 => 0,
        17 => 9,
        26 => 18,
        NORTH => EAST,
        RED_DRAGON => WHITE,
        k => k + 1,
    }
}

/// Valued-pair / valued-triplet test: dragons always, winds when they match
/// the round or the seat. Winds are passed as kinds (27..=30).
#[inline]
pub fn is_yakuhai(kind: u8, round_wind: u8, seat_wind: u8) -> bool {
    kind >= WHITE || kind == round_wind || kind == seat_wind
}

/// `Nc` display form of a kind: `5m`, `1z`, ...
pub fn kind_to_string(kind: u8) -> String {
    let suit_char = match suit(kind) {
        0 => 'm',
        1 => 'p',
        2 => 's',
        _ => 'z',
    };
    format!("{}{}", rank(kind), suit_char)
}

/// `Nc` display form of a physical tile; red fives print as `0m`/`0p`/`0s`.
pub fn tid_to_string(tid: u8) -> String {
    if is_red(tid) {
        let suit_char = match suit(kind(tid)) {
            0 => 'm',
            1 => 'p',
            _ => 's',
        };
        return format!("0{}", suit_char);
    }
    kind_to_string(kind(tid))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dora_next_wraps() {
        assert_eq!(dora_next(8), 0); // 9m -> 1m
        assert_eq!(dora_next(17), 9); // 9p -> 1p
        assert_eq!(dora_next(26), 18); // 9s -> 1s
        assert_eq!(dora_next(NORTH), EAST); // 4z -> 1z
        assert_eq!(dora_next(RED_DRAGON), WHITE); // 7z -> 5z
        assert_eq!(dora_next(4), 5); // 5m -> 6m
        assert_eq!(dora_next(29), 30); // W -> N
    }

    #[test]
    fn red_five_display() {
        assert_eq!(tid_to_string(RED_5M), "0m");
        assert_eq!(tid_to_string(RED_5P), "0p");
        assert_eq!(tid_to_string(RED_5S), "0s");
        assert_eq!(tid_to_string(17), "5m");
        assert_eq!(tid_to_string(108), "1z");
    }

    #[test]
    fn yakuhai_winds() {
        // South seat in an east round: south is valued, west is not.
        assert!(is_yakuhai(28, EAST, 28));
        assert!(!is_yakuhai(29, EAST, 28));
        assert!(is_yakuhai(WHITE, EAST, 28));
        assert!(is_yakuhai(EAST, EAST, 28));
    }
}
