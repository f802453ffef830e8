//! A single die face: letter, digit, and orientation.

use std::fmt;

use crate::error::DiceKeyError;

/// The 25 valid face letters: A-Z without Q.
pub const FACE_LETTERS: [char; 25] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'R', 'S',
    'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// The six valid face digits.
pub const FACE_DIGITS: [char; 6] = ['1', '2', '3', '4', '5', '6'];

/// A face letter (one of 25; Q is excluded).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FaceLetter(char);

impl FaceLetter {
    /// Construct from a character.
    ///
    /// # Errors
    ///
    /// `DiceKeyError::InvalidLetter` if the character is not a valid face
    /// letter.
    pub fn new(c: char) -> Result<Self, DiceKeyError> {
        if FACE_LETTERS.contains(&c) { Ok(Self(c)) } else { Err(DiceKeyError::InvalidLetter(c)) }
    }

    /// The underlying character.
    #[must_use]
    pub fn as_char(self) -> char {
        self.0
    }
}

/// A face digit (1 through 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FaceDigit(char);

impl FaceDigit {
    /// Construct from a character.
    ///
    /// # Errors
    ///
    /// `DiceKeyError::InvalidDigit` if the character is not `'1'..='6'`.
    pub fn new(c: char) -> Result<Self, DiceKeyError> {
        if FACE_DIGITS.contains(&c) { Ok(Self(c)) } else { Err(DiceKeyError::InvalidDigit(c)) }
    }

    /// The underlying character.
    #[must_use]
    pub fn as_char(self) -> char {
        self.0
    }
}

/// Which way the top of a die points relative to the top of the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FaceOrientation {
    /// Top of die points to the top of the key (`'t'`).
    Top,
    /// Top of die points to the right (`'r'`).
    Right,
    /// Top of die points to the bottom (`'b'`).
    Bottom,
    /// Top of die points to the left (`'l'`).
    Left,
}

impl FaceOrientation {
    /// Construct from a character (`t`, `r`, `b`, or `l`).
    ///
    /// # Errors
    ///
    /// `DiceKeyError::InvalidOrientation` for any other character.
    pub fn new(c: char) -> Result<Self, DiceKeyError> {
        match c {
            't' => Ok(Self::Top),
            'r' => Ok(Self::Right),
            'b' => Ok(Self::Bottom),
            'l' => Ok(Self::Left),
            other => Err(DiceKeyError::InvalidOrientation(other)),
        }
    }

    /// The character code for this orientation.
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Self::Top => 't',
            Self::Right => 'r',
            Self::Bottom => 'b',
            Self::Left => 'l',
        }
    }

    /// Orientation after rotating the whole key 90 degrees clockwise.
    #[must_use]
    pub fn rotated_90cw(self) -> Self {
        match self {
            Self::Top => Self::Right,
            Self::Right => Self::Bottom,
            Self::Bottom => Self::Left,
            Self::Left => Self::Top,
        }
    }
}

/// One die face. Immutable value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Face {
    /// The letter shown.
    pub letter: FaceLetter,
    /// The digit shown.
    pub digit: FaceDigit,
    /// The orientation of the die.
    pub orientation: FaceOrientation,
}

impl Face {
    /// Construct a face from its three character codes.
    ///
    /// # Errors
    ///
    /// The first invalid field's error.
    pub fn new(letter: char, digit: char, orientation: char) -> Result<Self, DiceKeyError> {
        Ok(Self {
            letter: FaceLetter::new(letter)?,
            digit: FaceDigit::new(digit)?,
            orientation: FaceOrientation::new(orientation)?,
        })
    }

    /// This face with the key rotated 90 degrees clockwise.
    #[must_use]
    pub fn rotated_90cw(self) -> Self {
        Self { orientation: self.orientation.rotated_90cw(), ..self }
    }

    /// This face with orientation reset to [`FaceOrientation::Top`].
    #[must_use]
    pub fn without_orientation(self) -> Self {
        Self { orientation: FaceOrientation::Top, ..self }
    }

    /// Number of fields (letter, digit, orientation) differing from
    /// `other`. At most 3.
    #[must_use]
    pub fn difference(self, other: Self) -> u8 {
        u8::from(self.letter != other.letter)
            + u8::from(self.digit != other.digit)
            + u8::from(self.orientation != other.orientation)
    }

    /// Append this face's human-readable form to `out`.
    pub(crate) fn write_human_readable(self, out: &mut String, include_orientation: bool) {
        out.push(self.letter.as_char());
        out.push(self.digit.as_char());
        if include_orientation {
            out.push(self.orientation.as_char());
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.letter.as_char(), self.digit.as_char(), self.orientation.as_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn q_is_not_a_face_letter() {
        assert_eq!(FaceLetter::new('Q'), Err(DiceKeyError::InvalidLetter('Q')));
        assert_eq!(FACE_LETTERS.len(), 25);
    }

    #[test]
    fn digits_are_one_through_six() {
        assert!(FaceDigit::new('1').is_ok());
        assert!(FaceDigit::new('6').is_ok());
        assert_eq!(FaceDigit::new('0'), Err(DiceKeyError::InvalidDigit('0')));
        assert_eq!(FaceDigit::new('7'), Err(DiceKeyError::InvalidDigit('7')));
    }

    #[test]
    fn orientation_rotation_cycles_in_four() {
        let mut orientation = FaceOrientation::Top;
        for _ in 0..4 {
            orientation = orientation.rotated_90cw();
        }
        assert_eq!(orientation, FaceOrientation::Top);

        assert_eq!(FaceOrientation::Top.rotated_90cw(), FaceOrientation::Right);
        assert_eq!(FaceOrientation::Right.rotated_90cw(), FaceOrientation::Bottom);
    }

    #[test]
    fn face_difference_counts_fields() {
        let a = Face::new('A', '1', 't').expect("valid face");
        assert_eq!(a.difference(a), 0);

        let letter_changed = Face::new('B', '1', 't').expect("valid face");
        assert_eq!(a.difference(letter_changed), 1);

        let all_changed = Face::new('B', '2', 'r').expect("valid face");
        assert_eq!(a.difference(all_changed), 3);
    }

    #[test]
    fn display_is_letter_digit_orientation() {
        let face = Face::new('Z', '6', 'l').expect("valid face");
        assert_eq!(face.to_string(), "Z6l");
    }
}
