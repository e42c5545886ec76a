//! Shanten (distance-to-tenpai) via a precomputed per-suit table.
//!
//! One number suit packs into a 27-bit code, three bits per rank (rank 1 at
//! bit 0, counts 0-7 representable, 0-4 produced). For every code the table
//! stores two `(melds, pairs)` alternatives, where "pairs" counts partial
//! sets (pairs plus adjacent or gapped proto-sequences), and a caller picks
//! the alternative maximizing `2*melds + pairs`.
//!
//! Regular-shape shanten sums the per-suit best over the three number suits
//! plus a direct honors pass, clamps `melds + pairs <= 4 - called_melds`
//! dropping pairs first, and evaluates
//! `8 - 2*melds - pairs - 2*called_melds`. Seven pairs and thirteen orphans
//! are computed directly (reaching -1 on completion) and the reported value
//! is the minimum of the three shapes.
//!
//! The table is process-wide, read-only after a one-shot initialization:
//! either loaded from the on-disk resource (exactly 405,350 records, a fatal
//! error otherwise) or computed in memory.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use ahash::AHashMap;

use crate::errors::{EngineError, EngineResult};
use crate::types::{Hand, TILE_MAX};

/// Exact record count of a well-formed table resource.
pub const TABLE_RECORDS: usize = 405_350;

type Alt = (i8, i8);

#[derive(Debug)]
pub struct ShantenTable {
    map: AHashMap<u32, [Alt; 2]>,
}

/// Pack one suit's rank counts into the 27-bit table key.
#[inline]
pub fn pack_suit(counts: &[u8; 9]) -> u32 {
    let mut key = 0u32;
    for (i, &c) in counts.iter().enumerate() {
        key |= (c as u32) << (3 * i);
    }
    key
}

/// Enumerate every 9-rank count vector with entries <= 4 and sum <= 14, in
/// lexicographic order (the resource-file record order).
fn enumerate_vectors<F: FnMut(&[u8; 9])>(f: &mut F) {
    fn rec<F: FnMut(&[u8; 9])>(pos: usize, rem: u8, counts: &mut [u8; 9], f: &mut F) {
        if pos == 9 {
            f(counts);
            return;
        }
        for c in 0..=rem.min(4) {
            counts[pos] = c;
            rec(pos + 1, rem - c, counts, f);
        }
        counts[pos] = 0;
    }
    let mut counts = [0u8; 9];
    rec(0, 14, &mut counts, f);
}

impl ShantenTable {
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// The better of the two stored alternatives under `2*melds + pairs`.
    pub fn best(&self, key: u32) -> Alt {
        match self.map.get(&key) {
            Some([a, b]) => {
                if 2 * a.0 + a.1 >= 2 * b.0 + b.1 {
                    *a
                } else {
                    *b
                }
            }
            None => {
                debug_assert!(false, "suit code {key:#x} outside table domain");
                (0, 0)
            }
        }
    }

    /// Build the table in memory. Every key is solved from smaller keys: at
    /// the lowest occupied rank the tile either starts a group (triplet,
    /// sequence, pair, or partial) or is left isolated.
    pub fn compute() -> Self {
        let mut vectors: Vec<[u8; 9]> = Vec::with_capacity(TABLE_RECORDS);
        enumerate_vectors(&mut |v| vectors.push(*v));
        vectors.sort_by_key(|v| v.iter().map(|&c| c as u16).sum::<u16>());

        let mut map: AHashMap<u32, [Alt; 2]> = AHashMap::with_capacity(TABLE_RECORDS);
        for v in &vectors {
            let key = pack_suit(v);
            let i = match v.iter().position(|&c| c > 0) {
                None => {
                    map.insert(key, [(0, 0), (0, 0)]);
                    continue;
                }
                Some(i) => i,
            };

            let mut trans: Vec<([u8; 9], i8, i8)> = Vec::with_capacity(6);
            let mut child = *v;
            child[i] -= 1;
            trans.push((child, 0, 0));
            if v[i] >= 2 {
                let mut c = *v;
                c[i] -= 2;
                trans.push((c, 0, 1));
            }
            if v[i] >= 3 {
                let mut c = *v;
                c[i] -= 3;
                trans.push((c, 1, 0));
            }
            if i + 2 < 9 && v[i + 1] > 0 && v[i + 2] > 0 {
                let mut c = *v;
                c[i] -= 1;
                c[i + 1] -= 1;
                c[i + 2] -= 1;
                trans.push((c, 1, 0));
            }
            if i + 1 < 9 && v[i + 1] > 0 {
                let mut c = *v;
                c[i] -= 1;
                c[i + 1] -= 1;
                trans.push((c, 0, 1));
            }
            if i + 2 < 9 && v[i + 2] > 0 {
                let mut c = *v;
                c[i] -= 1;
                c[i + 2] -= 1;
                trans.push((c, 0, 1));
            }

            let mut best_melds: Alt = (-1, -1);
            let mut best_total: Alt = (-1, -1);
            for (child, dm, dp) in trans {
                let [ca, cb] = map[&pack_suit(&child)];
                let a = (ca.0 + dm, ca.1 + dp);
                if a > best_melds {
                    best_melds = a;
                }
                let b = (cb.0 + dm, cb.1 + dp);
                let score = 2 * b.0 + b.1;
                let best_score = 2 * best_total.0 + best_total.1;
                if score > best_score || (score == best_score && b.0 > best_total.0) {
                    best_total = b;
                }
            }
            map.insert(key, [best_melds, best_total]);
        }
        ShantenTable { map }
    }

    /// Load the table resource: one record per non-blank line, a 9-character
    /// decimal code over [0-4] followed by `m1 p1 m2 p2`.
    pub fn load(path: &Path) -> EngineResult<Self> {
        let file = File::open(path).map_err(|e| EngineError::Init {
            message: format!("open shanten table {}: {}", path.display(), e),
        })?;
        let reader = BufReader::new(file);
        let mut map: AHashMap<u32, [Alt; 2]> = AHashMap::with_capacity(TABLE_RECORDS);
        let mut records = 0usize;
        for line in reader.lines() {
            let line = line.map_err(|e| EngineError::Init {
                message: format!("read shanten table: {}", e),
            })?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut fields = line.split_whitespace();
            let code = fields.next().unwrap_or("");
            if code.len() != 9 || !code.bytes().all(|b| b.is_ascii_digit()) {
                return Err(EngineError::Init {
                    message: format!("malformed shanten record: '{}'", line),
                });
            }
            let mut key = 0u32;
            for (i, b) in code.bytes().enumerate() {
                let d = (b - b'0') as u32;
                if d > 7 {
                    return Err(EngineError::Init {
                        message: format!("rank count out of range in record '{}'", line),
                    });
                }
                key |= d << (3 * i);
            }
            let mut vals = [0i8; 4];
            for v in vals.iter_mut() {
                *v = fields
                    .next()
                    .and_then(|f| f.parse().ok())
                    .ok_or_else(|| EngineError::Init {
                        message: format!("malformed shanten record: '{}'", line),
                    })?;
            }
            map.insert(key, [(vals[0], vals[1]), (vals[2], vals[3])]);
            records += 1;
        }
        if records != TABLE_RECORDS {
            return Err(EngineError::Init {
                message: format!(
                    "shanten table has {} records, expected {}",
                    records, TABLE_RECORDS
                ),
            });
        }
        Ok(ShantenTable { map })
    }

    /// Emit the resource-file form of this table.
    pub fn write(&self, path: &Path) -> std::io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        let mut io_err = None;
        enumerate_vectors(&mut |v| {
            if io_err.is_some() {
                return;
            }
            let [a, b] = self.map[&pack_suit(v)];
            let mut code = String::with_capacity(9);
            for &c in v.iter() {
                code.push((b'0' + c) as char);
            }
            if let Err(e) = writeln!(out, "{} {} {} {} {}", code, a.0, a.1, b.0, b.1) {
                io_err = Some(e);
            }
        });
        match io_err {
            Some(e) => Err(e),
            None => out.flush(),
        }
    }
}

static TABLE: OnceLock<ShantenTable> = OnceLock::new();

/// `resource/shanten.dat` next to the running binary.
pub fn default_table_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|d| d.join("resource/shanten.dat")))
        .unwrap_or_else(|| PathBuf::from("resource/shanten.dat"))
}

/// One-shot load from a resource file. A second call (or a call after the
/// table was computed in memory) is a no-op.
pub fn init_from_file(path: &Path) -> EngineResult<()> {
    if TABLE.get().is_some() {
        return Ok(());
    }
    let t = ShantenTable::load(path)?;
    let _ = TABLE.set(t);
    Ok(())
}

/// The process-wide table, computed in memory on first use when no resource
/// file was installed.
pub fn table() -> &'static ShantenTable {
    TABLE.get_or_init(ShantenTable::compute)
}

/// Regular-shape shanten from the table.
pub fn shanten_standard(hand: &Hand, called_melds: u8) -> i8 {
    let t = table();
    let mut melds = 0i32;
    let mut pairs = 0i32;
    for suit in 0..3usize {
        let mut counts = [0u8; 9];
        counts.copy_from_slice(&hand.counts[suit * 9..suit * 9 + 9]);
        let (m, p) = t.best(pack_suit(&counts));
        melds += m as i32;
        pairs += p as i32;
    }
    for k in 27..TILE_MAX {
        match hand.counts[k] {
            c if c >= 3 => melds += 1,
            2 => pairs += 1,
            _ => {}
        }
    }
    let cap = 4 - called_melds as i32;
    while melds + pairs > cap && pairs > 0 {
        pairs -= 1;
    }
    while melds + pairs > cap {
        melds -= 1;
    }
    (8 - 2 * melds - pairs - 2 * called_melds as i32) as i8
}

pub fn shanten_chiitoitsu(hand: &Hand) -> i8 {
    let mut pairs = 0i32;
    let mut kinds = 0i32;
    for &c in hand.counts.iter() {
        if c > 0 {
            kinds += 1;
            if c >= 2 {
                pairs += 1;
            }
        }
    }
    let mut s = 6 - pairs;
    if kinds < 7 {
        s += 7 - kinds;
    }
    s as i8
}

pub fn shanten_kokushi(hand: &Hand) -> i8 {
    let mut kinds = 0i32;
    let mut has_pair = false;
    for &k in &crate::tile::YAOCHUU_KINDS {
        let c = hand.counts[k as usize];
        if c > 0 {
            kinds += 1;
            if c >= 2 {
                has_pair = true;
            }
        }
    }
    (13 - kinds - has_pair as i32) as i8
}

/// Minimum over the three terminal shapes. The special shapes only apply to
/// a hand with no calls.
pub fn shanten(hand: &Hand, called_melds: u8) -> i8 {
    let mut s = shanten_standard(hand, called_melds);
    if called_melds == 0 {
        s = s.min(shanten_chiitoitsu(hand)).min(shanten_kokushi(hand));
    }
    s
}

/// Cheap analytical estimate used only for sanity checks; production paths
/// go through the table.
pub fn estimate_shanten(hand: &Hand, called_melds: u8) -> i8 {
    let mut melds = called_melds as i32;
    let mut pairs = 0i32;
    for &c in hand.counts.iter() {
        if c >= 3 {
            melds += 1;
        } else if c == 2 {
            pairs += 1;
        }
    }
    let mut taatsu = 0i32;
    for suit_start in [0usize, 9, 18] {
        for r in 0..7 {
            let i = suit_start + r;
            if hand.counts[i] > 0 && hand.counts[i + 1] > 0 && hand.counts[i + 2] > 0 {
                taatsu += 1;
            }
        }
    }
    let has_pair = pairs > 0 || melds + taatsu >= 5;
    if melds >= 4 {
        if has_pair {
            -1
        } else {
            0
        }
    } else {
        ((4 - melds - taatsu.min(4 - melds)) + if has_pair { 0 } else { 1 }) as i8
    }
}
