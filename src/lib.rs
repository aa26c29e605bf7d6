//! # Yacht expected-value move advisor
//!
//! Ranks the actions available during one turn of the twelve-category Yacht
//! dice game by the expected final score under optimal play.
//!
//! ## Algorithm overview
//!
//! The expected remaining score E(S) of every turn-start state is produced
//! offline and loaded from a checksummed binary table ([`storage`]). Within a
//! turn the engine recurses over three roll stages ([`widget_solver`]):
//!
//! | Stage | Decision | Built from |
//! |-------|----------|------------|
//! | first roll | which dice to hold | second roll, averaged over the reroll |
//! | second roll | which dice to hold | final roll, averaged over the reroll |
//! | final roll | which category to score | E(S') + score + bonus change |
//!
//! [`api_computations::evaluate`] turns those stage values into a ranked list
//! of [`types::Choice`]s.
//!
//! ## State representation
//!
//! A turn-start state S = (m, C) where:
//! - `m` ∈ [0, 63]: upper-section score (capped)
//! - `C`: 12-bit bitmask of scored categories (see [`types::Category::bit`])
//!
//! Table index: `state_id(C, m) = C << 6 | m`, giving 262,144 entries.
//!
//! ## Dice representation
//!
//! A [`dice_mechanics::DiceSet`] is a face-count vector. Holds are partial
//! sets; rolls are full sets of five. [`dice_table`] enumerates the holds of
//! a roll and the completions of a hold; [`probability`] gives the chance of
//! each completion.

#![allow(clippy::needless_range_loop)]

pub mod api_computations;
pub mod constants;
pub mod context;
pub mod dice_mechanics;
pub mod dice_table;
pub mod env_config;
pub mod error;
pub mod game_mechanics;
pub mod probability;
pub mod server;
pub mod storage;
pub mod types;
pub mod widget_solver;
