//! Error types for DiceKey parsing.

use thiserror::Error;

/// Errors from constructing faces or DiceKeys.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiceKeyError {
    /// Letter is not one of the 25 valid face letters (A-Z without Q).
    #[error("invalid face letter: {0:?}")]
    InvalidLetter(char),

    /// Digit is not in 1..=6.
    #[error("invalid face digit: {0:?}")]
    InvalidDigit(char),

    /// Orientation character is not one of 't', 'r', 'b', 'l'.
    #[error("invalid face orientation: {0:?}")]
    InvalidOrientation(char),

    /// Human-readable form has the wrong length.
    #[error("human-readable form must be 50 or 75 characters, got {0}")]
    InvalidLength(usize),

    /// A DiceKey needs exactly 25 faces.
    #[error("a DiceKey requires exactly 25 faces, got {0}")]
    WrongFaceCount(usize),
}
