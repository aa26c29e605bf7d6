//! Yacht scoring rules: s(r, c) for all 12 categories, the upper bonus, and
//! recording a roll on a score sheet.

use crate::constants::*;
use crate::dice_mechanics::DiceSet;
use crate::error::YachtError;
use crate::types::{Category, ScoreSheet};

/// Compute s(r, c): the score for placing `dice` in `category`.
///
/// Categories ace–six score face × count. Pattern categories score only for a
/// full set of 5 dice.
pub fn calculate_score(category: Category, dice: &DiceSet) -> u32 {
    let counts = dice.counts();
    let full = dice.is_full();

    match category {
        Category::Choice if full => dice.sum_of_faces(),
        Category::FourOfAKind if full && counts.iter().any(|&c| c >= 4) => dice.sum_of_faces(),
        Category::FullHouse if full && counts.iter().all(|&c| c != 1) => dice.sum_of_faces(),
        Category::SmallStraight if full && longest_run(dice) >= 4 => SMALL_STRAIGHT_SCORE,
        Category::BigStraight if full && longest_run(dice) == 5 => BIG_STRAIGHT_SCORE,
        Category::Yacht if counts.iter().any(|&c| c as usize == NUM_DICE) => YACHT_SCORE,
        c => match c.face() {
            Some(face) => face as u32 * dice.count(face) as u32,
            None => 0,
        },
    }
}

/// Score for a full roll given as faces.
pub fn calculate_score_for_faces(category: Category, faces: &[u8]) -> Result<u32, YachtError> {
    let dice = DiceSet::full_from_faces(faces)?;
    Ok(calculate_score(category, &dice))
}

/// Upper bonus: 35 once the scored ace..six total reaches 63. Unscored rows count as 0.
pub fn calculate_bonus(sheet: &ScoreSheet) -> u32 {
    if sheet.upper_total() >= UPPER_SCORE_CAP {
        UPPER_BONUS
    } else {
        0
    }
}

/// Record `dice` in `category`, returning the updated sheet and its bonus.
pub fn commit_category(
    sheet: &ScoreSheet,
    category: Category,
    faces: &[u8],
) -> Result<(ScoreSheet, u32), YachtError> {
    if sheet.is_scored(category) {
        return Err(YachtError::CategoryAlreadyScored(category));
    }
    let score = calculate_score_for_faces(category, faces)?;
    let updated = sheet.with_score(category, score)?;
    let bonus = calculate_bonus(&updated);
    Ok((updated, bonus))
}

/// Length of the longest run of consecutive faces present in the set.
fn longest_run(dice: &DiceSet) -> usize {
    let mut current = 0;
    let mut best = 0;
    for &c in dice.counts() {
        current = if c > 0 { current + 1 } else { 0 };
        best = best.max(current);
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(category: Category, faces: &[u8]) -> u32 {
        calculate_score_for_faces(category, faces).unwrap()
    }

    #[test]
    fn test_upper_categories() {
        assert_eq!(score(Category::Ace, &[1, 1, 1, 1, 1]), 5);
        assert_eq!(score(Category::Ace, &[1, 1, 2, 3, 5]), 2);
        assert_eq!(score(Category::Ace, &[2, 5, 6, 3, 3]), 0);
        assert_eq!(score(Category::Deuce, &[1, 6, 2, 3, 2]), 4);
        assert_eq!(score(Category::Trey, &[1, 3, 2, 3, 2]), 6);
        assert_eq!(score(Category::Four, &[4, 3, 4, 1, 6]), 8);
        assert_eq!(score(Category::Five, &[5, 5, 5, 5, 5]), 25);
        assert_eq!(score(Category::Six, &[2, 1, 6, 6, 5]), 12);
        assert_eq!(score(Category::Six, &[1, 5, 2, 3, 1]), 0);
    }

    #[test]
    fn test_choice() {
        assert_eq!(score(Category::Choice, &[6, 6, 6, 6, 6]), 30);
        assert_eq!(score(Category::Choice, &[2, 1, 6, 6, 5]), 20);
        assert_eq!(score(Category::Choice, &[1, 5, 2, 3, 2]), 13);
    }

    #[test]
    fn test_four_of_a_kind() {
        assert_eq!(score(Category::FourOfAKind, &[6, 6, 6, 6, 6]), 30);
        assert_eq!(score(Category::FourOfAKind, &[2, 2, 6, 2, 2]), 14);
        assert_eq!(score(Category::FourOfAKind, &[1, 5, 2, 3, 2]), 0);
    }

    #[test]
    fn test_full_house() {
        assert_eq!(score(Category::FullHouse, &[6, 6, 6, 6, 6]), 30);
        assert_eq!(score(Category::FullHouse, &[2, 2, 6, 6, 2]), 18);
        assert_eq!(score(Category::FullHouse, &[3, 3, 3, 5, 6]), 0);
        assert_eq!(score(Category::FullHouse, &[2, 2, 2, 2, 6]), 0);
    }

    #[test]
    fn test_straights() {
        assert_eq!(score(Category::SmallStraight, &[2, 3, 4, 5, 6]), 15);
        assert_eq!(score(Category::SmallStraight, &[1, 2, 3, 4, 6]), 15);
        assert_eq!(score(Category::SmallStraight, &[3, 1, 2, 5, 6]), 0);
        assert_eq!(score(Category::BigStraight, &[2, 3, 4, 5, 6]), 30);
        assert_eq!(score(Category::BigStraight, &[1, 2, 3, 4, 5]), 30);
        assert_eq!(score(Category::BigStraight, &[1, 2, 3, 4, 6]), 0);
    }

    #[test]
    fn test_yacht() {
        assert_eq!(score(Category::Yacht, &[5, 5, 5, 5, 5]), 50);
        assert_eq!(score(Category::Yacht, &[1, 1, 1, 1, 1]), 50);
        assert_eq!(score(Category::Yacht, &[2, 2, 2, 2, 3]), 0);
    }

    #[test]
    fn test_partial_sets_score_only_upper() {
        let hold = DiceSet::from_faces(&[6, 6, 6, 6]).unwrap();
        assert_eq!(calculate_score(Category::Six, &hold), 24);
        assert_eq!(calculate_score(Category::Choice, &hold), 0);
        assert_eq!(calculate_score(Category::FourOfAKind, &hold), 0);
        assert_eq!(calculate_score(Category::FullHouse, &hold), 0);
    }

    #[test]
    fn test_requires_five_dice() {
        assert!(matches!(
            calculate_score_for_faces(Category::Ace, &[1, 1]),
            Err(YachtError::NotFullDice(2))
        ));
    }

    #[test]
    fn test_bonus() {
        let empty = ScoreSheet::new();
        assert_eq!(calculate_bonus(&empty), 0);

        let short = empty
            .with_score(Category::Ace, 5)
            .unwrap()
            .with_score(Category::Deuce, 10)
            .unwrap()
            .with_score(Category::Six, 30)
            .unwrap();
        assert_eq!(calculate_bonus(&short), 0);

        let made = empty
            .with_score(Category::Four, 20)
            .unwrap()
            .with_score(Category::Five, 25)
            .unwrap()
            .with_score(Category::Six, 30)
            .unwrap();
        assert_eq!(calculate_bonus(&made), UPPER_BONUS);
    }

    #[test]
    fn test_commit_category() {
        let sheet = ScoreSheet::new()
            .with_score(Category::Five, 25)
            .unwrap()
            .with_score(Category::Six, 30)
            .unwrap();
        let (updated, bonus) = commit_category(&sheet, Category::Four, &[4, 4, 4, 2, 1]).unwrap();
        assert_eq!(updated.get(Category::Four), Some(12));
        assert_eq!(bonus, 35);

        let (updated, bonus) =
            commit_category(&ScoreSheet::new(), Category::FullHouse, &[2, 2, 2, 2, 6]).unwrap();
        assert_eq!(updated.get(Category::FullHouse), Some(0));
        assert_eq!(bonus, 0);

        assert!(matches!(
            commit_category(&updated, Category::FullHouse, &[2, 2, 3, 3, 3]),
            Err(YachtError::CategoryAlreadyScored(Category::FullHouse))
        ));
    }
}
