use std::fmt;
use std::hash::Hash;
use std::sync::RwLock;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::YachtError;

/// The twelve scoring categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Ace,
    Deuce,
    Trey,
    Four,
    Five,
    Six,
    Choice,
    FourOfAKind,
    FullHouse,
    SmallStraight,
    BigStraight,
    Yacht,
}

impl Category {
    pub const ALL: [Category; CATEGORY_COUNT] = [
        Category::Ace,
        Category::Deuce,
        Category::Trey,
        Category::Four,
        Category::Five,
        Category::Six,
        Category::Choice,
        Category::FourOfAKind,
        Category::FullHouse,
        Category::SmallStraight,
        Category::BigStraight,
        Category::Yacht,
    ];

    /// Bit position in the scored-category bitmask of the terminal value table.
    /// Full house precedes four of a kind here, unlike the display order.
    pub const fn bit(self) -> u32 {
        match self {
            Category::Ace => 0,
            Category::Deuce => 1,
            Category::Trey => 2,
            Category::Four => 3,
            Category::Five => 4,
            Category::Six => 5,
            Category::Choice => 6,
            Category::FullHouse => 7,
            Category::FourOfAKind => 8,
            Category::SmallStraight => 9,
            Category::BigStraight => 10,
            Category::Yacht => 11,
        }
    }

    /// Face counted by an upper-section category.
    pub const fn face(self) -> Option<u8> {
        match self {
            Category::Ace => Some(1),
            Category::Deuce => Some(2),
            Category::Trey => Some(3),
            Category::Four => Some(4),
            Category::Five => Some(5),
            Category::Six => Some(6),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_upper(self) -> bool {
        self.face().is_some()
    }

    /// Whether `score` can ever be recorded in this category.
    pub fn accepts(self, score: u32) -> bool {
        match self {
            Category::Choice => (5..=30).contains(&score),
            Category::FourOfAKind => score == 0 || (5..=30).contains(&score),
            Category::FullHouse => {
                score == 0 || ((5..=30).contains(&score) && score != 6 && score != 29)
            }
            Category::SmallStraight => score == 0 || score == SMALL_STRAIGHT_SCORE,
            Category::BigStraight => score == 0 || score == BIG_STRAIGHT_SCORE,
            Category::Yacht => score == 0 || score == YACHT_SCORE,
            upper => {
                let face = upper.face().map_or(1, u32::from);
                score % face == 0 && score / face <= NUM_DICE as u32
            }
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Category::Ace => "ace",
            Category::Deuce => "deuce",
            Category::Trey => "trey",
            Category::Four => "four",
            Category::Five => "five",
            Category::Six => "six",
            Category::Choice => "choice",
            Category::FourOfAKind => "fourOfAKind",
            Category::FullHouse => "fullHouse",
            Category::SmallStraight => "smallStraight",
            Category::BigStraight => "bigStraight",
            Category::Yacht => "yacht",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A player's score sheet: each category is either unscored or holds a valid score.
///
/// On the wire it is a JSON object with all twelve category keys, each a score
/// or `null`. Every score must be achievable in its category; unknown keys are
/// ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawScoreSheet", into = "RawScoreSheet")]
pub struct ScoreSheet {
    scores: [Option<u32>; CATEGORY_COUNT],
}

impl ScoreSheet {
    /// A sheet with nothing scored.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, category: Category) -> Option<u32> {
        self.scores[category as usize]
    }

    #[inline]
    pub fn is_scored(&self, category: Category) -> bool {
        self.get(category).is_some()
    }

    /// Return a copy with `category` set to `score`.
    pub fn with_score(&self, category: Category, score: u32) -> Result<Self, YachtError> {
        if !category.accepts(score) {
            return Err(YachtError::InvalidScore { category, score });
        }
        let mut next = *self;
        next.scores[category as usize] = Some(score);
        Ok(next)
    }

    /// Categories still open, in display order.
    pub fn unscored(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL.into_iter().filter(|&c| !self.is_scored(c))
    }

    /// Every category scored: the game is over.
    pub fn is_complete(&self) -> bool {
        self.scores.iter().all(Option::is_some)
    }

    /// Sum of ace..six, unscored counting as 0.
    pub fn upper_total(&self) -> u32 {
        Category::ALL[..6].iter().filter_map(|&c| self.get(c)).sum()
    }

    /// Sum of every scored category, excluding the bonus.
    pub fn total(&self) -> u32 {
        self.scores.iter().flatten().sum()
    }

    /// Bitmask of scored categories (see [`Category::bit`]).
    pub fn scored_mask(&self) -> u16 {
        Category::ALL
            .iter()
            .filter(|&&c| self.is_scored(c))
            .fold(0u16, |mask, &c| mask | (1 << c.bit()))
    }

    /// Compact turn-start state used by the evaluator.
    pub fn state(&self) -> YachtState {
        YachtState {
            upper_score: self.upper_total().min(UPPER_SCORE_CAP) as u8,
            scored_categories: self.scored_mask(),
        }
    }

    #[inline]
    pub fn state_id(&self) -> StateId {
        self.state().id()
    }
}

/// Wire form of [`ScoreSheet`]. Every key is required; `null` means unscored.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawScoreSheet {
    #[serde(deserialize_with = "nullable")]
    ace: Option<u32>,
    #[serde(deserialize_with = "nullable")]
    deuce: Option<u32>,
    #[serde(deserialize_with = "nullable")]
    trey: Option<u32>,
    #[serde(deserialize_with = "nullable")]
    four: Option<u32>,
    #[serde(deserialize_with = "nullable")]
    five: Option<u32>,
    #[serde(deserialize_with = "nullable")]
    six: Option<u32>,
    #[serde(deserialize_with = "nullable")]
    choice: Option<u32>,
    #[serde(deserialize_with = "nullable")]
    four_of_a_kind: Option<u32>,
    #[serde(deserialize_with = "nullable")]
    full_house: Option<u32>,
    #[serde(deserialize_with = "nullable")]
    small_straight: Option<u32>,
    #[serde(deserialize_with = "nullable")]
    big_straight: Option<u32>,
    #[serde(deserialize_with = "nullable")]
    yacht: Option<u32>,
}

/// A present key holding a score or `null`. Unlike a bare `Option` field, a
/// missing key is an error.
fn nullable<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::deserialize(deserializer)
}

impl TryFrom<RawScoreSheet> for ScoreSheet {
    type Error = YachtError;

    fn try_from(raw: RawScoreSheet) -> Result<Self, Self::Error> {
        let values = [
            raw.ace,
            raw.deuce,
            raw.trey,
            raw.four,
            raw.five,
            raw.six,
            raw.choice,
            raw.four_of_a_kind,
            raw.full_house,
            raw.small_straight,
            raw.big_straight,
            raw.yacht,
        ];
        let mut sheet = ScoreSheet::new();
        for (category, value) in Category::ALL.into_iter().zip(values) {
            if let Some(score) = value {
                sheet = sheet.with_score(category, score)?;
            }
        }
        Ok(sheet)
    }
}

impl From<ScoreSheet> for RawScoreSheet {
    fn from(sheet: ScoreSheet) -> Self {
        let s = |c| sheet.get(c);
        RawScoreSheet {
            ace: s(Category::Ace),
            deuce: s(Category::Deuce),
            trey: s(Category::Trey),
            four: s(Category::Four),
            five: s(Category::Five),
            six: s(Category::Six),
            choice: s(Category::Choice),
            four_of_a_kind: s(Category::FourOfAKind),
            full_house: s(Category::FullHouse),
            small_straight: s(Category::SmallStraight),
            big_straight: s(Category::BigStraight),
            yacht: s(Category::Yacht),
        }
    }
}

/// Index into the terminal value table: `scored_mask << 6 | capped_upper_score`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub u32);

impl StateId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Turn-start state S = (m, C): capped upper score and scored-category bitmask.
///
/// Two score sheets with the same state are interchangeable for evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct YachtState {
    pub upper_score: u8,
    pub scored_categories: u16,
}

impl YachtState {
    #[inline(always)]
    pub fn id(&self) -> StateId {
        StateId(state_id(self.scored_categories, self.upper_score as u32) as u32)
    }

    #[inline]
    pub fn is_scored(&self, category: Category) -> bool {
        is_bit_scored(self.scored_categories, category.bit())
    }

    /// Upper bonus already secured in this state.
    #[inline]
    pub fn bonus(&self) -> u32 {
        if self.upper_score as u32 >= UPPER_SCORE_CAP {
            UPPER_BONUS
        } else {
            0
        }
    }

    /// Successor state after recording `score` in `category`.
    pub fn after_scoring(&self, category: Category, score: u32) -> YachtState {
        let upper_score = if category.is_upper() {
            (self.upper_score as u32 + score).min(UPPER_SCORE_CAP) as u8
        } else {
            self.upper_score
        };
        YachtState {
            upper_score,
            scored_categories: self.scored_categories | (1 << category.bit()),
        }
    }
}

/// One ranked action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "choiceType")]
pub enum Choice {
    /// Keep `dice_to_hold` and reroll the rest.
    #[serde(rename = "dice", rename_all = "camelCase")]
    Dice {
        dice_to_hold: Vec<u8>,
        expected_value: f64,
    },
    /// Record the current roll in `category`.
    #[serde(rename = "category", rename_all = "camelCase")]
    Category {
        category: Category,
        expected_value: f64,
    },
}

impl Choice {
    pub fn expected_value(&self) -> f64 {
        match self {
            Choice::Dice { expected_value, .. } | Choice::Category { expected_value, .. } => {
                *expected_value
            }
        }
    }
}

/// Process-wide append-only memo table.
///
/// Values are computed outside the lock and stored only if absent, so two
/// threads racing on the same key both compute the same value and the first
/// insert wins.
pub struct MemoTable<K, V> {
    entries: RwLock<FxHashMap<K, V>>,
}

impl<K: Eq + Hash, V: Clone> Default for MemoTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V: Clone> MemoTable<K, V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(FxHashMap::default()),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    /// Store `value` unless another caller got there first; return the stored value.
    pub fn insert(&self, key: K, value: V) -> V {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.entry(key).or_insert(value).clone()
    }

    pub fn get_or_compute(&self, key: K, compute: impl FnOnce() -> V) -> V {
        if let Some(v) = self.get(&key) {
            return v;
        }
        let value = compute();
        self.insert(key, value)
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
