//! Super-dice and sub-dice enumeration with per-input memoization.
//!
//! - super dice of a hold h: every full set s with h <= s, i.e. every way the
//!   5 - |h| rerolled dice can land. |super(h)| = C(r + 5, 5) for residual r.
//! - sub dice of a full roll r: every hold h <= r, i.e. every choice of dice to
//!   keep. |sub(r)| = prod_f (count_f + 1).
//!
//! Both are generated by assigning face counts directly, so each multiset
//! appears exactly once.

use std::sync::Arc;

use crate::constants::*;
use crate::dice_mechanics::DiceSet;
use crate::types::MemoTable;

pub struct DiceTable {
    super_cache: MemoTable<DiceSet, Arc<[DiceSet]>>,
    sub_cache: MemoTable<DiceSet, Arc<[DiceSet]>>,
}

impl Default for DiceTable {
    fn default() -> Self {
        Self::new()
    }
}

impl DiceTable {
    pub fn new() -> Self {
        Self {
            super_cache: MemoTable::new(),
            sub_cache: MemoTable::new(),
        }
    }

    /// All full sets reachable from `partial` by rolling the missing dice.
    pub fn super_dice(&self, partial: &DiceSet) -> Arc<[DiceSet]> {
        self.super_cache
            .get_or_compute(*partial, || enumerate_super_dice(partial).into())
    }

    /// All holds (including the empty hold and `full` itself) that can be kept from `full`.
    pub fn sub_dice(&self, full: &DiceSet) -> Arc<[DiceSet]> {
        self.sub_cache
            .get_or_compute(*full, || enumerate_sub_dice(full).into())
    }

    /// R_{5,6}: the 252 distinct full rolls.
    pub fn full_dice_sets(&self) -> Arc<[DiceSet]> {
        self.super_dice(&DiceSet::EMPTY)
    }

    /// Number of memoized inputs (super, sub).
    pub fn cached_inputs(&self) -> (usize, usize) {
        (self.super_cache.len(), self.sub_cache.len())
    }
}

fn enumerate_super_dice(partial: &DiceSet) -> Vec<DiceSet> {
    let residual = NUM_DICE.saturating_sub(partial.len()) as u8;
    let mut out = Vec::new();
    let mut counts = *partial.counts();
    distribute(residual, 0, &mut counts, &mut out);
    out
}

/// Spread `remaining` extra dice over faces `face..6` on top of `counts`.
fn distribute(remaining: u8, face: usize, counts: &mut [u8; NUM_FACES], out: &mut Vec<DiceSet>) {
    if face == NUM_FACES - 1 {
        counts[face] += remaining;
        out.push(DiceSet::from_counts_unchecked(*counts));
        counts[face] -= remaining;
        return;
    }
    for extra in 0..=remaining {
        counts[face] += extra;
        distribute(remaining - extra, face + 1, counts, out);
        counts[face] -= extra;
    }
}

fn enumerate_sub_dice(full: &DiceSet) -> Vec<DiceSet> {
    let limits = full.counts();
    let size: usize = limits.iter().map(|&c| c as usize + 1).product();
    let mut out = Vec::with_capacity(size);
    let mut counts = [0u8; NUM_FACES];
    loop {
        out.push(DiceSet::from_counts_unchecked(counts));
        // Odometer increment, face 1 fastest
        let mut f = 0;
        while f < NUM_FACES {
            if counts[f] < limits[f] {
                counts[f] += 1;
                break;
            }
            counts[f] = 0;
            f += 1;
        }
        if f == NUM_FACES {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    fn dice(faces: &[u8]) -> DiceSet {
        DiceSet::from_faces(faces).unwrap()
    }

    #[test]
    fn test_super_dice_counts() {
        let table = DiceTable::new();
        let cases: [(&[u8], usize); 6] = [
            (&[], 252),
            (&[1], 126),
            (&[1, 1], 56),
            (&[1, 1, 1], 21),
            (&[1, 1, 1, 1], 6),
            (&[1, 1, 1, 1, 1], 1),
        ];
        for (faces, expected) in cases {
            let partial = dice(faces);
            let supers = table.super_dice(&partial);
            assert_eq!(supers.len(), expected, "hold {:?}", faces);

            let unique: FxHashSet<DiceSet> = supers.iter().copied().collect();
            assert_eq!(unique.len(), supers.len());
            for s in supers.iter() {
                assert!(s.is_full());
                assert!(partial <= *s);
            }
        }
    }

    #[test]
    fn test_sub_dice_counts() {
        let table = DiceTable::new();
        let cases: [(&[u8], usize); 3] = [
            (&[1, 1, 1, 1, 1], 6),
            (&[1, 2, 3, 4, 5], 32),
            (&[1, 1, 2, 2, 2], 12),
        ];
        for (faces, expected) in cases {
            let full = dice(faces);
            let subs = table.sub_dice(&full);
            assert_eq!(subs.len(), expected, "roll {:?}", faces);

            let unique: FxHashSet<DiceSet> = subs.iter().copied().collect();
            assert_eq!(unique.len(), subs.len());
            assert!(subs.iter().all(|h| *h <= full));
            assert_eq!(subs[0], DiceSet::EMPTY);
            assert!(subs.contains(&full));
        }
    }

    #[test]
    fn test_full_dice_sets() {
        let table = DiceTable::new();
        let all = table.full_dice_sets();
        assert_eq!(all.len(), NUM_FULL_DICE_SETS);
        assert!(all.iter().all(DiceSet::is_full));
    }

    #[test]
    fn test_memoized_results_are_shared() {
        let table = DiceTable::new();
        let hold = dice(&[6, 6]);
        let a = table.super_dice(&hold);
        let b = table.super_dice(&hold);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(table.cached_inputs(), (1, 0));
    }
}
