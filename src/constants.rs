//! Game constants, artifact layout constants and state-indexing functions.
//!
//! - |categories| = [`CATEGORY_COUNT`] = 12
//! - |full dice sets| = [`NUM_FULL_DICE_SETS`] = C(10,5) = 252
//! - STATE_ID(C, m) = [`state_id`]`(C, m)` = C << 6 | m

/// Number of scoring categories (ace through yacht).
pub const CATEGORY_COUNT: usize = 12;

/// Number of faces on a die.
pub const NUM_FACES: usize = 6;

/// Number of dice in a full roll.
pub const NUM_DICE: usize = 5;

/// Number of distinct unordered 5-dice rolls from {1..6}: C(10,5) = 252.
pub const NUM_FULL_DICE_SETS: usize = 252;

/// Bits used by the capped upper-section score inside a state id.
pub const UPPER_SCORE_BITS: u32 = 6;

/// Total number of state ids: 2^12 scored-category bitmasks * 2^6 upper scores.
pub const NUM_STATES: usize = 1 << (CATEGORY_COUNT as u32 + UPPER_SCORE_BITS);

/// Bitmask with every category scored.
pub const ALL_SCORED: u16 = (1 << CATEGORY_COUNT) - 1;

/// Upper section threshold and cap.
pub const UPPER_SCORE_CAP: u32 = 63;

/// Upper section bonus: 35 points once ace..six reach 63.
pub const UPPER_BONUS: u32 = 35;

/// Fixed scores for the pattern categories.
pub const SMALL_STRAIGHT_SCORE: u32 = 15;
pub const BIG_STRAIGHT_SCORE: u32 = 30;
pub const YACHT_SCORE: u32 = 50;

/// Terminal value file magic: the ASCII bytes "YACHT_EVAL".
pub const TABLE_MAGIC: &[u8; 10] = b"YACHT_EVAL";

/// Format version written by [`crate::storage::save_terminal_values`].
pub const TABLE_VERSION: u32 = 1;

/// Header layout (little-endian).
pub const TABLE_VERSION_OFFSET: usize = 10;
pub const TABLE_FLAGS_OFFSET: usize = 14;
pub const TABLE_COUNT_OFFSET: usize = 16;
pub const TABLE_CHECKSUM_OFFSET: usize = 20;
pub const TABLE_HEADER_SIZE: usize = 32;

/// Map a state (scored bitmask C, capped upper score m) to its table index.
#[inline(always)]
pub fn state_id(scored_categories: u16, upper_score: u32) -> usize {
    ((scored_categories as usize) << UPPER_SCORE_BITS) | upper_score.min(UPPER_SCORE_CAP) as usize
}

/// Test whether the category at bit `bit` has been scored.
#[inline(always)]
pub fn is_bit_scored(scored: u16, bit: u32) -> bool {
    scored & (1 << bit) != 0
}
