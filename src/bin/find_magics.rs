//! Offline magic-number search.
//!
//! Regenerates the multiplier tables embedded in
//! `board::attack_tables::magics`. For each square, random sparse 64-bit
//! candidates are tried until one maps every relevant-occupancy subset to
//! a non-colliding table index (two subsets sharing an index is fine only
//! when they produce the same attack set). Exits non-zero if any square
//! exhausts its trial budget.
//!
//! Usage: `cargo run --release --bin find_magics`

use rand::prelude::*;

const TRIAL_BUDGET: u64 = 100_000_000;

fn rook_relevant_mask(sq: usize) -> u64 {
    let r = (sq / 8) as isize;
    let f = (sq % 8) as isize;
    let mut m = 0u64;
    for rr in r + 1..7 {
        m |= 1u64 << (rr * 8 + f);
    }
    for rr in 1..r {
        m |= 1u64 << (rr * 8 + f);
    }
    for ff in f + 1..7 {
        m |= 1u64 << (r * 8 + ff);
    }
    for ff in 1..f {
        m |= 1u64 << (r * 8 + ff);
    }
    m
}

fn bishop_relevant_mask(sq: usize) -> u64 {
    let r = (sq / 8) as isize;
    let f = (sq % 8) as isize;
    let mut m = 0u64;
    for (dr, df) in [(1, 1), (1, -1), (-1, 1), (-1, -1)] {
        let mut rr = r + dr;
        let mut ff = f + df;
        while (1..7).contains(&rr) && (1..7).contains(&ff) {
            m |= 1u64 << (rr * 8 + ff);
            rr += dr;
            ff += df;
        }
    }
    m
}

fn slider_attacks_slow(sq: usize, occ: u64, bishop: bool) -> u64 {
    let dirs: &[(isize, isize)] = if bishop {
        &[(1, 1), (1, -1), (-1, 1), (-1, -1)]
    } else {
        &[(1, 0), (-1, 0), (0, 1), (0, -1)]
    };
    let r = (sq / 8) as isize;
    let f = (sq % 8) as isize;
    let mut attacks = 0u64;
    for &(dr, df) in dirs {
        let mut rr = r + dr;
        let mut ff = f + df;
        while (0..8).contains(&rr) && (0..8).contains(&ff) {
            let bit = 1u64 << (rr * 8 + ff);
            attacks |= bit;
            if occ & bit != 0 {
                break;
            }
            rr += dr;
            ff += df;
        }
    }
    attacks
}

fn enumerate_subsets(mask: u64, mut f: impl FnMut(u64)) {
    let mut sub = 0u64;
    loop {
        f(sub);
        sub = sub.wrapping_sub(mask) & mask;
        if sub == 0 {
            break;
        }
    }
}

/// Does `magic` perfectly hash every subset of `mask` for this square?
fn validates(sq: usize, mask: u64, magic: u64, bishop: bool) -> bool {
    let bits = mask.count_ones();
    let shift = 64 - bits;
    let mut table = vec![0u64; 1 << bits];
    let mut filled = vec![false; 1 << bits];
    let mut ok = true;

    enumerate_subsets(mask, |sub| {
        if !ok {
            return;
        }
        let idx = (sub.wrapping_mul(magic) >> shift) as usize;
        let attacks = slider_attacks_slow(sq, sub, bishop);
        if filled[idx] && table[idx] != attacks {
            ok = false;
        } else {
            table[idx] = attacks;
            filled[idx] = true;
        }
    });

    ok
}

fn find_magic(sq: usize, bishop: bool, rng: &mut StdRng) -> Option<u64> {
    let mask = if bishop {
        bishop_relevant_mask(sq)
    } else {
        rook_relevant_mask(sq)
    };

    for _ in 0..TRIAL_BUDGET {
        // Sparse candidates succeed far more often than uniform ones
        let candidate: u64 = rng.gen::<u64>() & rng.gen::<u64>() & rng.gen::<u64>();
        // A multiplier must push mask bits into the top index bits
        if (mask.wrapping_mul(candidate) & 0xFF00_0000_0000_0000).count_ones() < 6 {
            continue;
        }
        if validates(sq, mask, candidate, bishop) {
            return Some(candidate);
        }
    }

    None
}

fn main() {
    let mut rng = StdRng::from_entropy();

    for (label, bishop) in [("ROOK_MAGICS", false), ("BISHOP_MAGICS", true)] {
        println!("pub(crate) const {label}: [u64; 64] = [");
        for sq in 0..64 {
            match find_magic(sq, bishop, &mut rng) {
                Some(magic) => println!("    {magic},"),
                None => {
                    eprintln!("no magic found for {label} square {sq} within budget");
                    std::process::exit(1);
                }
            }
        }
        println!("];");
        println!();
    }
}
