//! Yaku enumeration and fu calculation.
//!
//! A win is scored by enumerating every decomposition of the 14 kinds and,
//! within each, every group the winning tile can complete. Each variant gets
//! its own yaku set and fu; the winner is the lexicographic maximum of
//! (han, fu, ron payout), ties resolved by enumeration order.

use crate::agari::{self, Division, Mentsu};
use crate::score;
use crate::tile;
use crate::types::{Hand, MeldType, WinContext, Wind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Yaku {
    Riichi,
    DoubleRiichi,
    Ippatsu,
    MenzenTsumo,
    Pinfu,
    Iipeiko,
    Tanyao,
    YakuhaiWhite,
    YakuhaiGreen,
    YakuhaiRed,
    YakuhaiSeatWind,
    YakuhaiRoundWind,
    Rinshan,
    Haitei,
    Houtei,
    Chankan,
    Chiitoitsu,
    Toitoi,
    Sanankou,
    Sankantsu,
    SanshokuDoujun,
    SanshokuDoukou,
    Ittsuu,
    Chanta,
    Honroutou,
    Shousangen,
    Honitsu,
    Junchan,
    Ryanpeiko,
    Chinitsu,
    // Yakuman
    Kokushi,
    Suuankou,
    Daisangen,
    Shousuushi,
    Daisuushi,
    Tsuuiisou,
    Ryuuiisou,
    Chinroutou,
    ChuurenPoutou,
    Tenhou,
    Chiihou,
    Suukantsu,
    // Counters riding on a won hand; these never satisfy the one-yaku rule.
    Dora,
    AkaDora,
    UraDora,
}

impl Yaku {
    pub fn is_yakuman(self) -> bool {
        matches!(
            self,
            Yaku::Kokushi
                | Yaku::Suuankou
                | Yaku::Daisangen
                | Yaku::Shousuushi
                | Yaku::Daisuushi
                | Yaku::Tsuuiisou
                | Yaku::Ryuuiisou
                | Yaku::Chinroutou
                | Yaku::ChuurenPoutou
                | Yaku::Tenhou
                | Yaku::Chiihou
                | Yaku::Suukantsu
        )
    }

    pub fn is_dora(self) -> bool {
        matches!(self, Yaku::Dora | Yaku::AkaDora | Yaku::UraDora)
    }

    pub fn han(self, menzen: bool) -> u32 {
        match self {
            Yaku::Riichi
            | Yaku::Ippatsu
            | Yaku::MenzenTsumo
            | Yaku::Pinfu
            | Yaku::Iipeiko
            | Yaku::Tanyao
            | Yaku::YakuhaiWhite
            | Yaku::YakuhaiGreen
            | Yaku::YakuhaiRed
            | Yaku::YakuhaiSeatWind
            | Yaku::YakuhaiRoundWind
            | Yaku::Rinshan
            | Yaku::Haitei
            | Yaku::Houtei
            | Yaku::Chankan => 1,
            Yaku::DoubleRiichi
            | Yaku::Chiitoitsu
            | Yaku::Toitoi
            | Yaku::Sanankou
            | Yaku::Sankantsu
            | Yaku::SanshokuDoukou
            | Yaku::Honroutou
            | Yaku::Shousangen => 2,
            Yaku::SanshokuDoujun | Yaku::Ittsuu | Yaku::Chanta => {
                if menzen {
                    2
                } else {
                    1
                }
            }
            Yaku::Honitsu | Yaku::Junchan => {
                if menzen {
                    3
                } else {
                    2
                }
            }
            Yaku::Ryanpeiko => 3,
            Yaku::Chinitsu => {
                if menzen {
                    6
                } else {
                    5
                }
            }
            y if y.is_yakuman() => 13,
            _ => 1, // dora counters contribute 1 per tile, tallied separately
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Yaku::Riichi => "riichi",
            Yaku::DoubleRiichi => "double riichi",
            Yaku::Ippatsu => "ippatsu",
            Yaku::MenzenTsumo => "menzen tsumo",
            Yaku::Pinfu => "pinfu",
            Yaku::Iipeiko => "iipeiko",
            Yaku::Tanyao => "tanyao",
            Yaku::YakuhaiWhite => "yakuhai (white)",
            Yaku::YakuhaiGreen => "yakuhai (green)",
            Yaku::YakuhaiRed => "yakuhai (red)",
            Yaku::YakuhaiSeatWind => "yakuhai (seat wind)",
            Yaku::YakuhaiRoundWind => "yakuhai (round wind)",
            Yaku::Rinshan => "rinshan",
            Yaku::Haitei => "haitei",
            Yaku::Houtei => "houtei",
            Yaku::Chankan => "chankan",
            Yaku::Chiitoitsu => "chiitoitsu",
            Yaku::Toitoi => "toitoi",
            Yaku::Sanankou => "sanankou",
            Yaku::Sankantsu => "sankantsu",
            Yaku::SanshokuDoujun => "sanshoku doujun",
            Yaku::SanshokuDoukou => "sanshoku doukou",
            Yaku::Ittsuu => "ittsuu",
            Yaku::Chanta => "chanta",
            Yaku::Honroutou => "honroutou",
            Yaku::Shousangen => "shousangen",
            Yaku::Honitsu => "honitsu",
            Yaku::Junchan => "junchan",
            Yaku::Ryanpeiko => "ryanpeiko",
            Yaku::Chinitsu => "chinitsu",
            Yaku::Kokushi => "kokushi musou",
            Yaku::Suuankou => "suuankou",
            Yaku::Daisangen => "daisangen",
            Yaku::Shousuushi => "shousuushi",
            Yaku::Daisuushi => "daisuushi",
            Yaku::Tsuuiisou => "tsuuiisou",
            Yaku::Ryuuiisou => "ryuuiisou",
            Yaku::Chinroutou => "chinroutou",
            Yaku::ChuurenPoutou => "chuuren poutou",
            Yaku::Tenhou => "tenhou",
            Yaku::Chiihou => "chiihou",
            Yaku::Suukantsu => "suukantsu",
            Yaku::Dora => "dora",
            Yaku::AkaDora => "aka dora",
            Yaku::UraDora => "ura dora",
        }
    }
}

/// Kind-space view of a called meld: everything yaku and fu need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeldView {
    pub meld_type: MeldType,
    /// Lowest kind for chi, the kind itself otherwise.
    pub kind: u8,
}

impl MeldView {
    #[inline]
    pub fn opened(self) -> bool {
        self.meld_type != MeldType::Ankan
    }

    #[inline]
    fn triplet_like(self) -> bool {
        self.meld_type != MeldType::Chi
    }
}

#[derive(Debug, Clone, Default)]
pub struct YakuEval {
    pub han: u32,
    pub fu: u32,
    pub yaku: Vec<Yaku>,
    pub yakuman_count: u8,
}

/// Dora tallies riding on a winning hand.
#[derive(Debug, Clone, Copy, Default)]
pub struct DoraCounts {
    pub dora: u8,
    pub aka: u8,
    pub ura: u8,
}

/// Where the winning tile sits inside a division.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WinSpot {
    Head,
    Group(usize),
}

/// Evaluate a completed 14-kind hand. `hand` holds the concealed kinds plus
/// the winning tile, quads already reduced to triplets; melds come as
/// kind-space views.
pub fn evaluate(
    hand: &Hand,
    melds: &[MeldView],
    ctx: &WinContext,
    win_kind: u8,
    dora: DoraCounts,
) -> YakuEval {
    let menzen = melds.iter().all(|m| !m.opened());
    let mut candidates: Vec<YakuEval> = Vec::new();

    if melds.is_empty() && agari::is_kokushi(hand) {
        let mut yaku = vec![Yaku::Kokushi];
        push_blessing(&mut yaku, ctx);
        candidates.push(yakuman_eval(yaku));
    }

    if melds.is_empty() && agari::is_chiitoitsu(hand) {
        candidates.push(chiitoitsu_eval(hand, ctx));
    }

    for div in agari::find_divisions(hand) {
        for spot in win_spots(&div, win_kind) {
            candidates.push(variant_eval(hand, &div, melds, ctx, win_kind, spot, menzen));
        }
    }

    let is_dealer = ctx.seat_wind == Wind::East;
    let mut best: Option<(YakuEval, (u32, u32, u32))> = None;
    for cand in candidates {
        let probe = score::calculate(cand.han, cand.fu, is_dealer, false, 0).pay_ron;
        let key = (cand.han, cand.fu, probe);
        match &best {
            Some((_, best_key)) if *best_key >= key => {}
            _ => best = Some((cand, key)),
        }
    }

    let mut result = best.map(|(e, _)| e).unwrap_or_default();
    if result.yakuman_count == 0 && (!result.yaku.is_empty() || result.han > 0) {
        if dora.dora > 0 {
            result.han += dora.dora as u32;
            result.yaku.push(Yaku::Dora);
        }
        if dora.aka > 0 {
            result.han += dora.aka as u32;
            result.yaku.push(Yaku::AkaDora);
        }
        if dora.ura > 0 {
            result.han += dora.ura as u32;
            result.yaku.push(Yaku::UraDora);
        }
    }
    result
}

fn yakuman_eval(yaku: Vec<Yaku>) -> YakuEval {
    let count = yaku.len() as u8;
    YakuEval {
        han: 13 * count as u32,
        fu: 0,
        yaku,
        yakuman_count: count,
    }
}

/// Tenhou / chiihou window.
fn push_blessing(yaku: &mut Vec<Yaku>, ctx: &WinContext) {
    if ctx.first_draw && ctx.tsumo {
        if ctx.seat_wind == Wind::East {
            yaku.push(Yaku::Tenhou);
        } else {
            yaku.push(Yaku::Chiihou);
        }
    }
}

fn chiitoitsu_eval(hand: &Hand, ctx: &WinContext) -> YakuEval {
    if all_honors(hand, &[]) {
        let mut yaku = vec![Yaku::Tsuuiisou];
        push_blessing(&mut yaku, ctx);
        return yakuman_eval(yaku);
    }

    let mut eval = YakuEval {
        han: 0,
        fu: 25,
        yaku: Vec::new(),
        yakuman_count: 0,
    };
    let mut add = |e: &mut YakuEval, y: Yaku| {
        e.han += y.han(true);
        e.yaku.push(y);
    };
    add(&mut eval, Yaku::Chiitoitsu);
    if is_tanyao(hand, &[]) {
        add(&mut eval, Yaku::Tanyao);
    }
    if is_chinitsu(hand, &[]) {
        add(&mut eval, Yaku::Chinitsu);
    } else if is_honitsu(hand, &[]) {
        add(&mut eval, Yaku::Honitsu);
    }
    if all_terminal_or_honor(hand, &[]) {
        add(&mut eval, Yaku::Honroutou);
    }
    apply_static(&mut eval, ctx, true);
    eval
}

fn win_spots(div: &Division, win_kind: u8) -> Vec<WinSpot> {
    let mut spots = Vec::new();
    if div.head == win_kind {
        spots.push(WinSpot::Head);
    }
    for (idx, m) in div.body.iter().enumerate() {
        match *m {
            Mentsu::Koutsu(t) if t == win_kind => spots.push(WinSpot::Group(idx)),
            Mentsu::Shuntsu(t) if win_kind >= t && win_kind <= t + 2 => {
                spots.push(WinSpot::Group(idx))
            }
            _ => {}
        }
    }
    spots
}

fn variant_eval(
    hand: &Hand,
    div: &Division,
    melds: &[MeldView],
    ctx: &WinContext,
    win_kind: u8,
    spot: WinSpot,
    menzen: bool,
) -> YakuEval {
    if let Some(yakuman) = check_yakuman(hand, div, melds, ctx, spot) {
        return yakuman;
    }

    let mut eval = YakuEval::default();
    let mut add = |e: &mut YakuEval, y: Yaku| {
        e.han += y.han(menzen);
        e.yaku.push(y);
    };

    apply_static(&mut eval, ctx, menzen);

    if is_tanyao(hand, melds) {
        add(&mut eval, Yaku::Tanyao);
    }

    let pinfu = check_pinfu(div, melds, ctx, spot, win_kind, menzen);
    if pinfu {
        add(&mut eval, Yaku::Pinfu);
    }

    // Valued triplets: dragons plus each matching wind (a doubled wind
    // counts once per role).
    let round_kind = ctx.round_wind.kind();
    let seat_kind = ctx.seat_wind.kind();
    for (kind, yaku) in [
        (tile::WHITE, Yaku::YakuhaiWhite),
        (32, Yaku::YakuhaiGreen),
        (tile::RED_DRAGON, Yaku::YakuhaiRed),
        (round_kind, Yaku::YakuhaiRoundWind),
        (seat_kind, Yaku::YakuhaiSeatWind),
    ] {
        if has_triplet_of(div, melds, kind) {
            add(&mut eval, yaku);
        }
    }

    let dragon_triplets = [tile::WHITE, 32, tile::RED_DRAGON]
        .iter()
        .filter(|&&d| has_triplet_of(div, melds, d))
        .count();
    if dragon_triplets == 2 && div.head >= tile::WHITE {
        add(&mut eval, Yaku::Shousangen);
    }

    let triplet_count = div
        .body
        .iter()
        .filter(|m| matches!(m, Mentsu::Koutsu(_)))
        .count()
        + melds.iter().filter(|m| m.triplet_like()).count();
    if triplet_count == 4 {
        add(&mut eval, Yaku::Toitoi);
    }

    if closed_triplets(div, melds, ctx, spot) == 3 {
        add(&mut eval, Yaku::Sanankou);
    }

    let quads = melds.iter().filter(|m| m.meld_type.is_quad()).count();
    if quads == 3 {
        add(&mut eval, Yaku::Sankantsu);
    }

    if menzen {
        match duplicate_sequence_pairs(div) {
            2 => add(&mut eval, Yaku::Ryanpeiko),
            1 => add(&mut eval, Yaku::Iipeiko),
            _ => {}
        }
    }

    if check_ittsuu(div, melds) {
        add(&mut eval, Yaku::Ittsuu);
    }
    if check_sanshoku_doujun(div, melds) {
        add(&mut eval, Yaku::SanshokuDoujun);
    }
    if check_sanshoku_doukou(div, melds) {
        add(&mut eval, Yaku::SanshokuDoukou);
    }

    if is_chinitsu(hand, melds) {
        add(&mut eval, Yaku::Chinitsu);
    } else if is_honitsu(hand, melds) {
        add(&mut eval, Yaku::Honitsu);
    }

    if all_terminal_or_honor(hand, melds) {
        add(&mut eval, Yaku::Honroutou);
    } else if check_junchan(div, melds) {
        add(&mut eval, Yaku::Junchan);
    } else if check_chanta(div, melds) {
        add(&mut eval, Yaku::Chanta);
    }

    eval.fu = if pinfu {
        if ctx.tsumo {
            20
        } else {
            30
        }
    } else {
        calculate_fu(div, melds, ctx, spot, win_kind, menzen)
    };
    eval
}

fn apply_static(eval: &mut YakuEval, ctx: &WinContext, menzen: bool) {
    let mut add = |e: &mut YakuEval, y: Yaku| {
        e.han += y.han(menzen);
        e.yaku.push(y);
    };
    if ctx.double_riichi {
        add(eval, Yaku::DoubleRiichi);
    } else if ctx.riichi {
        add(eval, Yaku::Riichi);
    }
    if ctx.ippatsu {
        add(eval, Yaku::Ippatsu);
    }
    if menzen && ctx.tsumo {
        add(eval, Yaku::MenzenTsumo);
    }
    if ctx.haitei {
        add(eval, Yaku::Haitei);
    }
    if ctx.houtei {
        add(eval, Yaku::Houtei);
    }
    if ctx.rinshan {
        add(eval, Yaku::Rinshan);
    }
    if ctx.chankan {
        add(eval, Yaku::Chankan);
    }
}

fn check_yakuman(
    hand: &Hand,
    div: &Division,
    melds: &[MeldView],
    ctx: &WinContext,
    spot: WinSpot,
) -> Option<YakuEval> {
    let menzen = melds.iter().all(|m| !m.opened());
    let mut yaku = Vec::new();

    if closed_triplets(div, melds, ctx, spot) == 4 {
        yaku.push(Yaku::Suuankou);
    }
    if [tile::WHITE, 32, tile::RED_DRAGON]
        .iter()
        .all(|&d| has_triplet_of(div, melds, d))
    {
        yaku.push(Yaku::Daisangen);
    }

    let wind_triplets = (tile::EAST..=tile::NORTH)
        .filter(|&w| has_triplet_of(div, melds, w))
        .count();
    if wind_triplets == 4 {
        yaku.push(Yaku::Daisuushi);
    } else if wind_triplets == 3 && (tile::EAST..=tile::NORTH).contains(&div.head) {
        yaku.push(Yaku::Shousuushi);
    }

    if all_honors(hand, melds) {
        yaku.push(Yaku::Tsuuiisou);
    }
    if all_number_terminals(hand, melds) {
        yaku.push(Yaku::Chinroutou);
    }
    if all_green(hand, melds) {
        yaku.push(Yaku::Ryuuiisou);
    }
    if melds.iter().filter(|m| m.meld_type.is_quad()).count() == 4 {
        yaku.push(Yaku::Suukantsu);
    }
    if menzen && melds.is_empty() && is_chuuren(hand) {
        yaku.push(Yaku::ChuurenPoutou);
    }
    push_blessing(&mut yaku, ctx);

    if yaku.is_empty() {
        None
    } else {
        Some(yakuman_eval(yaku))
    }
}

fn calculate_fu(
    div: &Division,
    melds: &[MeldView],
    ctx: &WinContext,
    spot: WinSpot,
    win_kind: u8,
    menzen: bool,
) -> u32 {
    let mut fu: u32 = 20;

    if ctx.tsumo {
        fu += 2;
    } else if menzen {
        fu += 10;
    }

    if div.head == ctx.round_wind.kind() {
        fu += 2;
    }
    if div.head == ctx.seat_wind.kind() {
        fu += 2;
    }
    if div.head >= tile::WHITE {
        fu += 2;
    }

    match spot {
        WinSpot::Head => fu += 2, // tanki
        WinSpot::Group(idx) => {
            if let Mentsu::Shuntsu(t) = div.body[idx] {
                let kanchan = win_kind == t + 1;
                let penchan =
                    (win_kind == t + 2 && t % 9 == 0) || (win_kind == t && t % 9 == 6);
                if kanchan || penchan {
                    fu += 2;
                }
            }
        }
    }

    for (idx, m) in div.body.iter().enumerate() {
        if let Mentsu::Koutsu(t) = *m {
            // A triplet completed by ron counts as open.
            let open = !ctx.tsumo && spot == WinSpot::Group(idx);
            let mut f = if open { 2 } else { 4 };
            if tile::is_terminal_or_honor(t) {
                f *= 2;
            }
            fu += f;
        }
    }
    for m in melds {
        if !m.triplet_like() {
            continue;
        }
        let mut f = if m.opened() { 2 } else { 4 };
        if tile::is_terminal_or_honor(m.kind) {
            f *= 2;
        }
        if m.meld_type.is_quad() {
            f *= 4;
        }
        fu += f;
    }

    if fu == 20 && !ctx.tsumo && !menzen {
        fu = 30;
    }
    fu.div_ceil(10) * 10
}

fn check_pinfu(
    div: &Division,
    melds: &[MeldView],
    ctx: &WinContext,
    spot: WinSpot,
    win_kind: u8,
    menzen: bool,
) -> bool {
    if !menzen || !melds.is_empty() {
        return false;
    }
    if div
        .body
        .iter()
        .any(|m| matches!(m, Mentsu::Koutsu(_)))
    {
        return false;
    }
    if tile::is_yakuhai(div.head, ctx.round_wind.kind(), ctx.seat_wind.kind()) {
        return false;
    }
    // The winning tile must fill an open-ended two-sided wait.
    match spot {
        WinSpot::Head => false,
        WinSpot::Group(idx) => match div.body[idx] {
            Mentsu::Shuntsu(t) => {
                (win_kind == t && t % 9 != 6) || (win_kind == t + 2 && t % 9 != 0)
            }
            Mentsu::Koutsu(_) => false,
        },
    }
}

fn has_triplet_of(div: &Division, melds: &[MeldView], kind: u8) -> bool {
    div.body
        .iter()
        .any(|m| matches!(m, Mentsu::Koutsu(t) if *t == kind))
        || melds.iter().any(|m| m.triplet_like() && m.kind == kind)
}

/// Concealed triplets, counting closed quads and excluding a triplet the
/// ron tile completed.
fn closed_triplets(div: &Division, melds: &[MeldView], ctx: &WinContext, spot: WinSpot) -> usize {
    let mut n = 0;
    for (idx, m) in div.body.iter().enumerate() {
        if matches!(m, Mentsu::Koutsu(_)) {
            if !ctx.tsumo && spot == WinSpot::Group(idx) {
                continue;
            }
            n += 1;
        }
    }
    n + melds
        .iter()
        .filter(|m| m.meld_type == MeldType::Ankan)
        .count()
}

fn duplicate_sequence_pairs(div: &Division) -> usize {
    let mut starts: Vec<u8> = div
        .body
        .iter()
        .filter_map(|m| match m {
            Mentsu::Shuntsu(t) => Some(*t),
            _ => None,
        })
        .collect();
    starts.sort_unstable();
    let mut pairs = 0;
    let mut i = 0;
    while i + 1 < starts.len() {
        if starts[i] == starts[i + 1] {
            pairs += 1;
            i += 2;
        } else {
            i += 1;
        }
    }
    pairs
}

fn sequence_starts(div: &Division, melds: &[MeldView]) -> Vec<u8> {
    let mut starts: Vec<u8> = div
        .body
        .iter()
        .filter_map(|m| match m {
            Mentsu::Shuntsu(t) => Some(*t),
            _ => None,
        })
        .collect();
    starts.extend(
        melds
            .iter()
            .filter(|m| m.meld_type == MeldType::Chi)
            .map(|m| m.kind),
    );
    starts
}

fn check_ittsuu(div: &Division, melds: &[MeldView]) -> bool {
    let starts = sequence_starts(div, melds);
    [0u8, 9, 18].iter().any(|&base| {
        starts.contains(&base) && starts.contains(&(base + 3)) && starts.contains(&(base + 6))
    })
}

fn check_sanshoku_doujun(div: &Division, melds: &[MeldView]) -> bool {
    let starts = sequence_starts(div, melds);
    (0..7u8).any(|r| {
        starts.contains(&r) && starts.contains(&(r + 9)) && starts.contains(&(r + 18))
    })
}

fn check_sanshoku_doukou(div: &Division, melds: &[MeldView]) -> bool {
    let kinds: Vec<u8> = div
        .body
        .iter()
        .filter_map(|m| match m {
            Mentsu::Koutsu(t) => Some(*t),
            _ => None,
        })
        .chain(melds.iter().filter(|m| m.triplet_like()).map(|m| m.kind))
        .collect();
    (0..9u8).any(|r| {
        kinds.contains(&r) && kinds.contains(&(r + 9)) && kinds.contains(&(r + 18))
    })
}

fn group_has_yaochuu(m: &Mentsu) -> bool {
    match *m {
        Mentsu::Koutsu(t) => tile::is_terminal_or_honor(t),
        Mentsu::Shuntsu(t) => tile::is_number_terminal(t) || tile::is_number_terminal(t + 2),
    }
}

fn meld_has_yaochuu(m: &MeldView) -> bool {
    if m.meld_type == MeldType::Chi {
        tile::is_number_terminal(m.kind) || tile::is_number_terminal(m.kind + 2)
    } else {
        tile::is_terminal_or_honor(m.kind)
    }
}

fn check_chanta(div: &Division, melds: &[MeldView]) -> bool {
    tile::is_terminal_or_honor(div.head)
        && div.body.iter().all(group_has_yaochuu)
        && melds.iter().all(meld_has_yaochuu)
}

fn check_junchan(div: &Division, melds: &[MeldView]) -> bool {
    let group_ok = |m: &Mentsu| match *m {
        Mentsu::Koutsu(t) => tile::is_number_terminal(t),
        Mentsu::Shuntsu(t) => tile::is_number_terminal(t) || tile::is_number_terminal(t + 2),
    };
    let meld_ok = |m: &MeldView| {
        if m.meld_type == MeldType::Chi {
            tile::is_number_terminal(m.kind) || tile::is_number_terminal(m.kind + 2)
        } else {
            tile::is_number_terminal(m.kind)
        }
    };
    tile::is_number_terminal(div.head)
        && div.body.iter().all(group_ok)
        && melds.iter().all(meld_ok)
}

fn hand_kinds(hand: &Hand) -> impl Iterator<Item = u8> + '_ {
    hand.counts
        .iter()
        .enumerate()
        .filter(|(_, &c)| c > 0)
        .map(|(k, _)| k as u8)
}

fn meld_kinds(m: &MeldView) -> Vec<u8> {
    if m.meld_type == MeldType::Chi {
        vec![m.kind, m.kind + 1, m.kind + 2]
    } else {
        vec![m.kind]
    }
}

fn is_tanyao(hand: &Hand, melds: &[MeldView]) -> bool {
    hand_kinds(hand).all(|k| !tile::is_terminal_or_honor(k))
        && melds
            .iter()
            .flat_map(meld_kinds)
            .all(|k| !tile::is_terminal_or_honor(k))
}

fn all_terminal_or_honor(hand: &Hand, melds: &[MeldView]) -> bool {
    hand_kinds(hand).all(tile::is_terminal_or_honor)
        && melds
            .iter()
            .flat_map(meld_kinds)
            .all(tile::is_terminal_or_honor)
}

fn all_honors(hand: &Hand, melds: &[MeldView]) -> bool {
    hand_kinds(hand).all(tile::is_honor)
        && melds.iter().flat_map(meld_kinds).all(tile::is_honor)
}

fn all_number_terminals(hand: &Hand, melds: &[MeldView]) -> bool {
    hand_kinds(hand).all(tile::is_number_terminal)
        && melds
            .iter()
            .flat_map(meld_kinds)
            .all(tile::is_number_terminal)
}

fn all_green(hand: &Hand, melds: &[MeldView]) -> bool {
    hand_kinds(hand).all(|k| tile::GREEN_KINDS.contains(&k))
        && melds
            .iter()
            .flat_map(meld_kinds)
            .all(|k| tile::GREEN_KINDS.contains(&k))
}

fn suits_used(hand: &Hand, melds: &[MeldView]) -> ([bool; 3], bool) {
    let mut suits = [false; 3];
    let mut honors = false;
    let mut mark = |k: u8| {
        if tile::is_honor(k) {
            honors = true;
        } else {
            suits[tile::suit(k) as usize] = true;
        }
    };
    for k in hand_kinds(hand) {
        mark(k);
    }
    for m in melds {
        for k in meld_kinds(m) {
            mark(k);
        }
    }
    (suits, honors)
}

fn is_honitsu(hand: &Hand, melds: &[MeldView]) -> bool {
    let (suits, honors) = suits_used(hand, melds);
    suits.iter().filter(|&&s| s).count() == 1 && honors
}

fn is_chinitsu(hand: &Hand, melds: &[MeldView]) -> bool {
    let (suits, honors) = suits_used(hand, melds);
    suits.iter().filter(|&&s| s).count() == 1 && !honors
}

/// 1112345678999 + one extra tile of the same suit.
fn is_chuuren(hand: &Hand) -> bool {
    let mut suit = None;
    let mut ranks = [0u8; 9];
    for (k, &c) in hand.counts.iter().enumerate() {
        if c == 0 {
            continue;
        }
        if tile::is_honor(k as u8) {
            return false;
        }
        let s = tile::suit(k as u8);
        if *suit.get_or_insert(s) != s {
            return false;
        }
        ranks[k % 9] = c;
    }
    ranks[0] >= 3 && ranks[8] >= 3 && ranks[1..8].iter().all(|&c| c >= 1)
}
