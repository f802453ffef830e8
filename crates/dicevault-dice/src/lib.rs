//! DiceKey value types and canonical orientation.
//!
//! A DiceKey is a 5x5 grid of 25 dice, each showing a letter, a digit,
//! and an orientation. A physical DiceKey can be read starting from any
//! of its four sides, so the same key has four equally valid readings.
//! The canonical-orientation algorithm reduces all four to one
//! bit-identical seed string; without it, every derivation would depend
//! on which way the box happened to face the camera.
//!
//! Everything here is immutable value types and pure transforms: rotating
//! or stripping orientations returns a new [`DiceKey`], never mutates in
//! place.

pub mod dicekey;
pub mod error;
pub mod face;

pub use dicekey::{DiceKey, most_similar_rotation_with_difference};
pub use error::DiceKeyError;
pub use face::{Face, FaceDigit, FaceLetter, FaceOrientation};
