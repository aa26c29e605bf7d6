//! Per-turn expected values: the three roll stages of one turn.
//!
//! For a turn-start state S and the terminal values E(S'):
//!
//! | Stage | Function | Value |
//! |-------|----------|-------|
//! | final roll, one category | [`category_value`] | E(n(S,r,c)) + s(r,c) + Δbonus |
//! | final roll | [`final_roll_value`] | max_c category_value |
//! | second roll, hold h | [`second_roll_hold_value`] | Σ_{r ≥ h} P(r − h) · final_roll_value(r) |
//! | second roll | [`second_roll_value`] | max_{h ≤ r} second_roll_hold_value(h) |
//! | first roll, hold h | [`first_roll_hold_value`] | Σ_{r ≥ h} P(r − h) · second_roll_value(r) |
//! | first roll | [`first_roll_value`] | max_{h ≤ r} first_roll_hold_value(h) |
//! | turn start | [`turn_start_value`] | Σ_r P(r) · first_roll_value(r) |
//!
//! Values are deltas: points gained from this turn onwards, without the points
//! already on the sheet. Every stage is `None` when no category is open.
//! Results are memoized on (StateId, DiceSet), so sheets that map to the same
//! state share entries.

use crate::context::YachtContext;
use crate::dice_mechanics::DiceSet;
use crate::game_mechanics::calculate_score;
use crate::types::{Category, MemoTable, StateId, YachtState};

type StageKey = (StateId, DiceSet);

/// Memo tables for every stage.
pub(crate) struct EvaluatorCache {
    category: MemoTable<(StateId, DiceSet, Category), f64>,
    final_roll: MemoTable<StageKey, Option<f64>>,
    second_roll_hold: MemoTable<StageKey, Option<f64>>,
    second_roll: MemoTable<StageKey, Option<f64>>,
    first_roll_hold: MemoTable<StageKey, Option<f64>>,
    first_roll: MemoTable<StageKey, Option<f64>>,
}

impl EvaluatorCache {
    pub(crate) fn new() -> Self {
        Self {
            category: MemoTable::new(),
            final_roll: MemoTable::new(),
            second_roll_hold: MemoTable::new(),
            second_roll: MemoTable::new(),
            first_roll_hold: MemoTable::new(),
            first_roll: MemoTable::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.category.len()
            + self.final_roll.len()
            + self.second_roll_hold.len()
            + self.second_roll.len()
            + self.first_roll_hold.len()
            + self.first_roll.len()
    }
}

/// Final roll: value of recording full roll `dice` in `category`.
/// `None` if the category is already scored.
pub fn category_value(
    ctx: &YachtContext,
    state: &YachtState,
    dice: &DiceSet,
    category: Category,
) -> Option<f64> {
    if state.is_scored(category) {
        return None;
    }
    let value = ctx
        .cache
        .category
        .get_or_compute((state.id(), *dice, category), || {
            let score = calculate_score(category, dice);
            let next = state.after_scoring(category, score);
            let bonus_delta = next.bonus() as f64 - state.bonus() as f64;
            ctx.terminal_values.get_state(&next) + score as f64 + bonus_delta
        });
    Some(value)
}

/// Final roll: best category for full roll `dice`.
pub fn final_roll_value(ctx: &YachtContext, state: &YachtState, dice: &DiceSet) -> Option<f64> {
    ctx.cache.final_roll.get_or_compute((state.id(), *dice), || {
        Category::ALL
            .iter()
            .filter_map(|&c| category_value(ctx, state, dice, c))
            .reduce(f64::max)
    })
}

/// Second roll: keep `hold`, reroll the rest once, then score.
pub fn second_roll_hold_value(
    ctx: &YachtContext,
    state: &YachtState,
    hold: &DiceSet,
) -> Option<f64> {
    ctx.cache
        .second_roll_hold
        .get_or_compute((state.id(), *hold), || {
            expected_after_reroll(ctx, hold, |r| final_roll_value(ctx, state, r))
        })
}

/// Second roll: best hold for full roll `dice`.
pub fn second_roll_value(ctx: &YachtContext, state: &YachtState, dice: &DiceSet) -> Option<f64> {
    ctx.cache.second_roll.get_or_compute((state.id(), *dice), || {
        best_hold(ctx, dice, |h| second_roll_hold_value(ctx, state, h))
    })
}

/// First roll: keep `hold`, reroll the rest, with one more reroll to come.
pub fn first_roll_hold_value(
    ctx: &YachtContext,
    state: &YachtState,
    hold: &DiceSet,
) -> Option<f64> {
    ctx.cache
        .first_roll_hold
        .get_or_compute((state.id(), *hold), || {
            expected_after_reroll(ctx, hold, |r| second_roll_value(ctx, state, r))
        })
}

/// First roll: best hold for full roll `dice`.
pub fn first_roll_value(ctx: &YachtContext, state: &YachtState, dice: &DiceSet) -> Option<f64> {
    ctx.cache.first_roll.get_or_compute((state.id(), *dice), || {
        best_hold(ctx, dice, |h| first_roll_hold_value(ctx, state, h))
    })
}

/// Expected points from the start of a turn: the online counterpart of E(S).
pub fn turn_start_value(ctx: &YachtContext, state: &YachtState) -> Option<f64> {
    let mut ev = 0.0;
    for dice in ctx.dice_table.full_dice_sets().iter() {
        ev += ctx.probabilities.get(dice) * first_roll_value(ctx, state, dice)?;
    }
    Some(ev)
}

/// Σ over every completion r of `hold`: P(r − hold) · next(r).
fn expected_after_reroll(
    ctx: &YachtContext,
    hold: &DiceSet,
    next: impl Fn(&DiceSet) -> Option<f64>,
) -> Option<f64> {
    let mut ev = 0.0;
    for outcome in ctx.dice_table.super_dice(hold).iter() {
        let rolled = outcome
            .checked_sub(hold)
            .expect("super dice always contain the hold");
        ev += ctx.probabilities.get(&rolled) * next(outcome)?;
    }
    Some(ev)
}

/// max over every hold h ≤ dice of hold_value(h).
fn best_hold(
    ctx: &YachtContext,
    dice: &DiceSet,
    hold_value: impl Fn(&DiceSet) -> Option<f64>,
) -> Option<f64> {
    ctx.dice_table
        .sub_dice(dice)
        .iter()
        .map(|h| hold_value(h))
        .collect::<Option<Vec<f64>>>()?
        .into_iter()
        .reduce(f64::max)
}
