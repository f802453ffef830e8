//! The DiceKey: 25 faces in row-major 5x5 order.
//!
//! # Canonical orientation
//!
//! The same physical key has four valid readings (one per side facing
//! up). [`DiceKey::to_seed`] generates all four, renders each as its
//! human-readable form, and picks the lexicographically earliest - a
//! total order with no ties, because the 25 letter/digit pairs are unique
//! across a key, so two distinct rotations always differ somewhere.

use rand::Rng;

use crate::error::DiceKeyError;
use crate::face::Face;

/// Index permutation for a 90-degree clockwise rotation of the 5x5 grid.
///
/// The face at new position `i` comes from old position
/// `ROTATION_INDEXES[i]` (new row r, column c reads old row 4-c,
/// column r).
const ROTATION_INDEXES: [usize; 25] = [
    20, 15, 10, 5, 0, //
    21, 16, 11, 6, 1, //
    22, 17, 12, 7, 2, //
    23, 18, 13, 8, 3, //
    24, 19, 14, 9, 4, //
];

/// A DiceKey: exactly 25 faces, row-major. Immutable; all transforms
/// return new instances.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiceKey {
    faces: [Face; 25],
}

impl DiceKey {
    /// Construct from exactly 25 faces in row-major order.
    pub fn new(faces: [Face; 25]) -> Self {
        Self { faces }
    }

    /// Construct from a slice of faces.
    ///
    /// # Errors
    ///
    /// `DiceKeyError::WrongFaceCount` unless the slice holds exactly 25.
    pub fn from_faces(faces: &[Face]) -> Result<Self, DiceKeyError> {
        let faces: [Face; 25] =
            faces.try_into().map_err(|_| DiceKeyError::WrongFaceCount(faces.len()))?;
        Ok(Self { faces })
    }

    /// Parse a human-readable form: 25 `letter digit orientation` triples
    /// (75 chars) or 25 `letter digit` pairs (50 chars, orientations
    /// default to top).
    ///
    /// # Errors
    ///
    /// `DiceKeyError::InvalidLength` for any other length; per-character
    /// errors for invalid letters, digits, or orientations.
    pub fn from_human_readable(form: &str) -> Result<Self, DiceKeyError> {
        let chars: Vec<char> = form.chars().collect();
        let stride = match chars.len() {
            75 => 3,
            50 => 2,
            other => return Err(DiceKeyError::InvalidLength(other)),
        };

        let mut faces = Vec::with_capacity(25);
        for triple in chars.chunks(stride) {
            let orientation = if stride == 3 { triple[2] } else { 't' };
            faces.push(Face::new(triple[0], triple[1], orientation)?);
        }
        Self::from_faces(&faces)
    }

    /// Generate a random DiceKey (manual-entry and test flows).
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let faces: Vec<Face> = (0..25)
            .map(|_| {
                let letter = crate::face::FACE_LETTERS[rng.gen_range(0..25)];
                let digit = crate::face::FACE_DIGITS[rng.gen_range(0..6)];
                let orientation = ['t', 'r', 'b', 'l'][rng.gen_range(0..4)];
                // Characters come from the valid alphabets above.
                Face::new(letter, digit, orientation)
            })
            .collect::<Result<_, _>>()
            .unwrap_or_else(|_| unreachable!("characters drawn from valid alphabets"));
        Self::from_faces(&faces)
            .unwrap_or_else(|_| unreachable!("exactly 25 faces were generated"))
    }

    /// The 25 faces in row-major order.
    #[must_use]
    pub fn faces(&self) -> &[Face; 25] {
        &self.faces
    }

    /// The center face (position 12), used for key identification.
    #[must_use]
    pub fn center_face(&self) -> Face {
        self.faces[12]
    }

    /// The four corner letters (top-left, top-right, bottom-left,
    /// bottom-right), used as a recipe seed hint.
    #[must_use]
    pub fn corner_letters(&self) -> String {
        [0, 4, 20, 24].iter().map(|&i| self.faces[i].letter.as_char()).collect()
    }

    /// This key rotated 90 degrees clockwise.
    #[must_use]
    pub fn rotated_90cw(&self) -> Self {
        let faces: Vec<Face> =
            ROTATION_INDEXES.iter().map(|&i| self.faces[i].rotated_90cw()).collect();
        Self::from_faces(&faces)
            .unwrap_or_else(|_| unreachable!("permutation preserves face count"))
    }

    /// This key with every face's orientation reset to top.
    #[must_use]
    pub fn without_orientations(&self) -> Self {
        let faces: Vec<Face> = self.faces.iter().map(|f| f.without_orientation()).collect();
        Self::from_faces(&faces)
            .unwrap_or_else(|_| unreachable!("face count unchanged"))
    }

    /// Human-readable form: concatenation of each face's
    /// `letter digit [orientation]` in row-major order.
    #[must_use]
    pub fn to_human_readable(&self, include_orientations: bool) -> String {
        let mut out = String::with_capacity(if include_orientations { 75 } else { 50 });
        for face in &self.faces {
            face.write_human_readable(&mut out, include_orientations);
        }
        out
    }

    /// All four rotations of this key (0, 90, 180, 270 degrees clockwise).
    #[must_use]
    pub fn all_rotations(&self) -> [Self; 4] {
        let r90 = self.rotated_90cw();
        let r180 = r90.rotated_90cw();
        let r270 = r180.rotated_90cw();
        [self.clone(), r90, r180, r270]
    }

    /// The rotation whose human-readable form is lexicographically
    /// earliest.
    #[must_use]
    pub fn rotated_to_canonical_form(&self, include_orientations: bool) -> Self {
        let key = if include_orientations { self.clone() } else { self.without_orientations() };
        key.all_rotations()
            .into_iter()
            .min_by(|a, b| {
                a.to_human_readable(include_orientations)
                    .cmp(&b.to_human_readable(include_orientations))
            })
            .unwrap_or_else(|| unreachable!("all_rotations is non-empty"))
    }

    /// The seed string: the canonical rotation's human-readable form.
    ///
    /// Identical for all four readings of the same physical key, so a
    /// recipe hash derived from it is reproducible regardless of how the
    /// key was scanned.
    #[must_use]
    pub fn to_seed(&self, include_orientations: bool) -> String {
        self.rotated_to_canonical_form(include_orientations).to_human_readable(include_orientations)
    }
}

/// Rotate `b` through its four orientations and return the rotation with
/// the fewest field differences against `a`, along with that count.
///
/// Used to validate a physical backup copy without requiring it to be
/// scanned in the same orientation as the original. The difference counts
/// letter, digit, and orientation per face, so it ranges over 0..=75.
#[must_use]
pub fn most_similar_rotation_with_difference(a: &DiceKey, b: &DiceKey) -> (DiceKey, u8) {
    b.all_rotations()
        .into_iter()
        .map(|rotation| {
            let difference: u8 = a
                .faces()
                .iter()
                .zip(rotation.faces().iter())
                .map(|(fa, fb)| fa.difference(*fb))
                .sum();
            (rotation, difference)
        })
        .min_by_key(|(_, difference)| *difference)
        .unwrap_or_else(|| unreachable!("all_rotations is non-empty"))
}
