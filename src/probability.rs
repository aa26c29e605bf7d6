//! Roll probabilities for unordered dice outcomes.
//!
//! P(d) = n! / (6^n * prod_f count_f!)  with n = |d|
//!
//! This is the probability that rolling n fair dice shows exactly the face
//! distribution d. Used with n = 5 for a fresh roll and with n = 5 - |hold|
//! for the dice thrown on a reroll.

use crate::constants::*;
use crate::dice_mechanics::DiceSet;
use crate::types::MemoTable;

pub struct ProbabilityTable {
    cache: MemoTable<DiceSet, f64>,
}

impl Default for ProbabilityTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ProbabilityTable {
    pub fn new() -> Self {
        Self {
            cache: MemoTable::new(),
        }
    }

    /// Probability of rolling exactly `dice` with `dice.len()` fresh dice.
    pub fn get(&self, dice: &DiceSet) -> f64 {
        self.cache
            .get_or_compute(*dice, || compute_probability_of_dice_set(dice))
    }
}

/// n! for the small counts that occur here.
pub fn factorial(n: u32) -> u64 {
    assert!(n <= 20, "factorial({n}) overflows u64");
    (2..=n as u64).product()
}

/// Multinomial probability of an unordered outcome.
pub fn compute_probability_of_dice_set(dice: &DiceSet) -> f64 {
    let n = dice.len() as u32;
    let permutations = dice
        .counts()
        .iter()
        .fold(factorial(n), |acc, &c| acc / factorial(c as u32));
    permutations as f64 / (NUM_FACES as f64).powi(n as i32)
}
