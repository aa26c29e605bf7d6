//! `DiceSet`: an unordered multiset of at most five dice, stored as face counts.

use std::cmp::Ordering;
use std::fmt;

use crate::constants::*;
use crate::error::YachtError;

/// Face-count vector: `counts[i]` is the number of dice showing face `i + 1`.
///
/// A set with 5 dice is *full*; anything smaller is a *partial* set (a hold).
/// The partial order is coordinate-wise: `a <= b` iff `a` can be obtained
/// from `b` by dropping dice.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DiceSet {
    counts: [u8; NUM_FACES],
}

impl DiceSet {
    /// The empty hold.
    pub const EMPTY: DiceSet = DiceSet {
        counts: [0; NUM_FACES],
    };

    /// Build from a count vector. Fails when the total exceeds 5.
    pub fn from_counts(counts: [u8; NUM_FACES]) -> Result<Self, YachtError> {
        let total: usize = counts.iter().map(|&c| c as usize).sum();
        if total > NUM_DICE {
            return Err(YachtError::TooManyDice(total));
        }
        Ok(Self { counts })
    }

    /// Build from face values (1-6), in any order, at most 5 of them.
    pub fn from_faces(faces: &[u8]) -> Result<Self, YachtError> {
        if faces.len() > NUM_DICE {
            return Err(YachtError::TooManyDice(faces.len()));
        }
        let mut counts = [0u8; NUM_FACES];
        for &face in faces {
            if !(1..=NUM_FACES as u8).contains(&face) {
                return Err(YachtError::InvalidFace(face));
            }
            counts[(face - 1) as usize] += 1;
        }
        Ok(Self { counts })
    }

    /// Build a full set from exactly 5 faces.
    pub fn full_from_faces(faces: &[u8]) -> Result<Self, YachtError> {
        if faces.len() != NUM_DICE {
            return Err(YachtError::NotFullDice(faces.len()));
        }
        Self::from_faces(faces)
    }

    pub(crate) const fn from_counts_unchecked(counts: [u8; NUM_FACES]) -> Self {
        Self { counts }
    }

    #[inline]
    pub fn counts(&self) -> &[u8; NUM_FACES] {
        &self.counts
    }

    /// Number of dice showing `face`; 0 for anything outside 1-6.
    #[inline]
    pub fn count(&self, face: u8) -> u8 {
        face.checked_sub(1)
            .and_then(|i| self.counts.get(i as usize))
            .copied()
            .unwrap_or(0)
    }

    /// Number of dice in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.counts.iter().map(|&c| c as usize).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == NUM_DICE
    }

    /// Faces in ascending order, one entry per die.
    pub fn faces(&self) -> Vec<u8> {
        let mut faces = Vec::with_capacity(self.len());
        for (i, &c) in self.counts.iter().enumerate() {
            faces.extend(std::iter::repeat((i + 1) as u8).take(c as usize));
        }
        faces
    }

    /// Sum of all face values.
    pub fn sum_of_faces(&self) -> u32 {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &c)| (i as u32 + 1) * c as u32)
            .sum()
    }

    /// Coordinate-wise sum; `None` if the result would exceed 5 dice.
    pub fn checked_add(&self, other: &DiceSet) -> Option<DiceSet> {
        let mut counts = [0u8; NUM_FACES];
        for f in 0..NUM_FACES {
            counts[f] = self.counts[f] + other.counts[f];
        }
        DiceSet::from_counts(counts).ok()
    }

    /// Coordinate-wise difference; `None` if any face count would go negative.
    pub fn checked_sub(&self, other: &DiceSet) -> Option<DiceSet> {
        let mut counts = [0u8; NUM_FACES];
        for f in 0..NUM_FACES {
            counts[f] = self.counts[f].checked_sub(other.counts[f])?;
        }
        Some(DiceSet { counts })
    }
}

impl PartialOrd for DiceSet {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let le = self.counts.iter().zip(&other.counts).all(|(a, b)| a <= b);
        let ge = self.counts.iter().zip(&other.counts).all(|(a, b)| a >= b);
        match (le, ge) {
            (true, true) => Some(Ordering::Equal),
            (true, false) => Some(Ordering::Less),
            (false, true) => Some(Ordering::Greater),
            (false, false) => None,
        }
    }
}

impl fmt::Debug for DiceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DiceSet{:?}", self.faces())
    }
}
