use crate::context::YachtContext;
use crate::dice_mechanics::DiceSet;
use crate::error::YachtError;
use crate::game_mechanics::calculate_bonus;
use crate::types::{Choice, ScoreSheet, YachtState};
use crate::widget_solver::*;

/// Rank every legal action for the current roll.
///
/// `roll_count` is the number of the roll just made: 1 and 2 leave rerolls,
/// 3 is final. With rerolls left, each hold except keeping all five dice is a
/// choice; on the final roll each open category is. Expected values are
/// absolute final totals (points already scored, current bonus, expected
/// future points), sorted best first.
pub fn evaluate(
    ctx: &YachtContext,
    sheet: &ScoreSheet,
    faces: &[u8],
    roll_count: u8,
) -> Result<Vec<Choice>, YachtError> {
    if !(1..=3).contains(&roll_count) {
        return Err(YachtError::InvalidRollCount(roll_count));
    }
    let dice = DiceSet::full_from_faces(faces)?;
    if sheet.is_complete() {
        return Ok(Vec::new());
    }
    let state = sheet.state();

    let banked = (sheet.total() + calculate_bonus(sheet)) as f64;
    let mut choices = match roll_count {
        3 => category_choices(ctx, sheet, &state, &dice),
        2 => dice_choices(ctx, &dice, |h| second_roll_hold_value(ctx, &state, h)),
        _ => dice_choices(ctx, &dice, |h| first_roll_hold_value(ctx, &state, h)),
    };
    for choice in &mut choices {
        match choice {
            Choice::Dice { expected_value, .. } | Choice::Category { expected_value, .. } => {
                *expected_value += banked
            }
        }
    }

    // Stable: ties keep enumeration order
    choices.sort_by(|a, b| b.expected_value().total_cmp(&a.expected_value()));
    ctx.log_cache_sizes();
    Ok(choices)
}

fn category_choices(
    ctx: &YachtContext,
    sheet: &ScoreSheet,
    state: &YachtState,
    dice: &DiceSet,
) -> Vec<Choice> {
    sheet
        .unscored()
        .filter_map(|category| {
            category_value(ctx, state, dice, category).map(|expected_value| Choice::Category {
                category,
                expected_value,
            })
        })
        .collect()
}

fn dice_choices(
    ctx: &YachtContext,
    dice: &DiceSet,
    hold_value: impl Fn(&DiceSet) -> Option<f64>,
) -> Vec<Choice> {
    ctx.dice_table
        .sub_dice(dice)
        .iter()
        .filter(|hold| *hold != dice)
        .filter_map(|hold| {
            hold_value(hold).map(|expected_value| Choice::Dice {
                dice_to_hold: hold.faces(),
                expected_value,
            })
        })
        .collect()
}

/// Expected final total of the game from the start of the next turn, given `sheet`.
pub fn expected_final_score(ctx: &YachtContext, sheet: &ScoreSheet) -> f64 {
    (sheet.total() + calculate_bonus(sheet)) as f64 + ctx.terminal_values.get(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use crate::storage::{encode_terminal_values, TerminalValueTable};
    use crate::types::Category;

    fn zero_ctx() -> YachtContext {
        let bytes = encode_terminal_values(&vec![0.0; NUM_STATES], TABLE_VERSION, 0);
        YachtContext::new(TerminalValueTable::from_bytes(&bytes).unwrap())
    }

    fn zeroed_except(open: &[Category]) -> ScoreSheet {
        let mut sheet = ScoreSheet::new();
        for c in Category::ALL {
            if !open.contains(&c) {
                let score = if c == Category::Choice { 5 } else { 0 };
                sheet = sheet.with_score(c, score).unwrap();
            }
        }
        sheet
    }

    #[test]
    fn test_rejects_bad_roll_count() {
        let ctx = zero_ctx();
        for rc in [0, 4, 255] {
            assert!(matches!(
                evaluate(&ctx, &ScoreSheet::new(), &[1, 1, 1, 1, 1], rc),
                Err(YachtError::InvalidRollCount(_))
            ));
        }
    }

    #[test]
    fn test_rejects_bad_dice() {
        let ctx = zero_ctx();
        assert!(matches!(
            evaluate(&ctx, &ScoreSheet::new(), &[], 1),
            Err(YachtError::NotFullDice(0))
        ));
        assert!(matches!(
            evaluate(&ctx, &ScoreSheet::new(), &[1, 2, 3, 4, 9], 1),
            Err(YachtError::InvalidFace(9))
        ));
    }

    #[test]
    fn test_complete_sheet_has_no_choices() {
        let ctx = zero_ctx();
        let sheet = zeroed_except(&[]);
        for rc in 1..=3 {
            assert!(evaluate(&ctx, &sheet, &[1, 1, 1, 1, 1], rc).unwrap().is_empty());
        }
    }

    #[test]
    fn test_final_roll_lists_open_categories() {
        let ctx = zero_ctx();
        let sheet = zeroed_except(&[Category::Six, Category::Choice]);
        let choices = evaluate(&ctx, &sheet, &[1, 1, 1, 1, 1], 3).unwrap();
        assert_eq!(choices.len(), 2);
        // Choice scores 5 now, six scores 0; the sheet already holds 0 points
        assert_eq!(
            choices[0],
            Choice::Category {
                category: Category::Choice,
                expected_value: 5.0
            }
        );
        assert!(choices.iter().all(|c| matches!(c, Choice::Category { .. })));
    }

    #[test]
    fn test_rerolls_exclude_keeping_everything() {
        let ctx = zero_ctx();
        let sheet = zeroed_except(&[Category::Choice]);
        for rc in [1, 2] {
            let choices = evaluate(&ctx, &sheet, &[1, 1, 1, 1, 1], rc).unwrap();
            // Holds of 0..=4 ones
            assert_eq!(choices.len(), 5);
            for c in &choices {
                match c {
                    Choice::Dice { dice_to_hold, .. } => assert!(dice_to_hold.len() < 5),
                    other => panic!("unexpected {:?}", other),
                }
            }
        }

        let choices = evaluate(&ctx, &sheet, &[1, 4, 5, 6, 6], 1).unwrap();
        assert_eq!(choices.len(), 2 * 2 * 2 * 3 - 1);
    }

    #[test]
    fn test_sorted_descending() {
        let ctx = zero_ctx();
        let choices = evaluate(&ctx, &ScoreSheet::new(), &[1, 4, 5, 6, 6], 2).unwrap();
        assert!(choices
            .windows(2)
            .all(|w| w[0].expected_value() >= w[1].expected_value()));
    }

    #[test]
    fn test_first_roll_uses_deeper_recursion() {
        // Only yacht open: with two rerolls ahead the chance is higher than with one
        let ctx = zero_ctx();
        let sheet = zeroed_except(&[Category::Yacht]);
        let faces = [2, 2, 2, 5, 6];
        let one_left = evaluate(&ctx, &sheet, &faces, 2).unwrap();
        let two_left = evaluate(&ctx, &sheet, &faces, 1).unwrap();
        assert!(two_left[0].expected_value() > one_left[0].expected_value());
        let best = Choice::Dice {
            dice_to_hold: vec![2, 2, 2],
            expected_value: one_left[0].expected_value(),
        };
        assert_eq!(one_left[0], best);
        // Two fixed dice, one reroll: hit both with 1/36 (+5 from the choice row)
        assert!((one_left[0].expected_value() - (5.0 + 50.0 / 36.0)).abs() < 1e-9);
    }

    #[test]
    fn test_expected_final_score() {
        let mut values = vec![0.0; NUM_STATES];
        values[0] = 190.5;
        let table = TerminalValueTable::from_bytes(&encode_terminal_values(&values, 1, 0)).unwrap();
        let ctx = YachtContext::new(table);
        assert_eq!(expected_final_score(&ctx, &ScoreSheet::new()), 190.5);
    }
}
