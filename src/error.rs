use thiserror::Error;

use crate::types::Category;

/// Errors surfaced by the engine: artifact loading failures and rejected caller input.
#[derive(Debug, Error)]
pub enum YachtError {
    #[error("failed to read terminal value table: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid magic: expected \"YACHT_EVAL\", got {found:?}")]
    BadMagic { found: String },
    #[error("terminal value table truncated: need {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
    #[error("checksum mismatch: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },
    #[error("terminal value table has {entries} entries but state ids reach {required}")]
    StateIdOutOfRange { entries: usize, required: usize },

    #[error("roll count must be 1, 2 or 3 (got {0})")]
    InvalidRollCount(u8),
    #[error("expected exactly 5 dice, got {0}")]
    NotFullDice(usize),
    #[error("at most 5 dice allowed, got {0}")]
    TooManyDice(usize),
    #[error("die face must be between 1 and 6 (got {0})")]
    InvalidFace(u8),
    #[error("score {score} is not possible for {category}")]
    InvalidScore { category: Category, score: u32 },
    #[error("{0} has already been scored")]
    CategoryAlreadyScored(Category),
}
