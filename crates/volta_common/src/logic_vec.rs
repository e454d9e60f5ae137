//! Packed vectors of four-state logic values.

use crate::logic::Logic;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Logic values packed per `u64` word (2 bits each).
const PER_WORD: u32 = 32;

/// A fixed-width vector of four-state [`Logic`] values.
///
/// Each value occupies 2 bits, 32 values per `u64` word. Nets use these
/// for their per-bit initial values (defaulting to all-Z); constant
/// driver nodes use them for their driven value.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogicVec {
    width: u32,
    words: Vec<u64>,
}

impl LogicVec {
    /// Creates a vector of the given width with every bit set to `fill`.
    pub fn filled(width: u32, fill: Logic) -> Self {
        let pattern = fill as u64;
        let mut word = 0u64;
        for i in 0..PER_WORD {
            word |= pattern << (i * 2);
        }
        let n = width.div_ceil(PER_WORD) as usize;
        let mut words = vec![word; n];
        // Storage beyond the width stays zeroed so derived equality and
        // hashing see only real values.
        let used = width % PER_WORD;
        if used != 0 {
            if let Some(last) = words.last_mut() {
                *last &= (1u64 << (used * 2)) - 1;
            }
        }
        Self { width, words }
    }

    /// Creates an all-zero vector.
    pub fn all_zero(width: u32) -> Self {
        Self::filled(width, Logic::Zero)
    }

    /// Creates an all-one vector.
    pub fn all_one(width: u32) -> Self {
        Self::filled(width, Logic::One)
    }

    /// Creates an all-unknown vector.
    pub fn all_x(width: u32) -> Self {
        Self::filled(width, Logic::X)
    }

    /// Creates an all-high-impedance vector.
    pub fn all_z(width: u32) -> Self {
        Self::filled(width, Logic::Z)
    }

    /// Creates a vector of the given width from the low bits of `value`.
    /// Bits beyond bit 63 are zero.
    pub fn from_u64(value: u64, width: u32) -> Self {
        let mut v = Self::all_zero(width);
        for i in 0..width.min(64) {
            if (value >> i) & 1 != 0 {
                v.set(i, Logic::One);
            }
        }
        v
    }

    /// Parses a string like `"10xz"` into a vector, leftmost character
    /// as the most significant bit. Returns `None` on any character
    /// outside the `0/1/x/z` alphabet.
    pub fn from_binary_str(s: &str) -> Option<Self> {
        let width = s.len() as u32;
        let mut v = Self::all_zero(width);
        for (i, c) in s.chars().rev().enumerate() {
            v.set(i as u32, Logic::from_char(c)?);
        }
        Some(v)
    }

    /// The number of logic values in this vector.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Reads the value at bit `index` (0 is the least significant).
    ///
    /// # Panics
    ///
    /// Panics if `index >= width`.
    pub fn get(&self, index: u32) -> Logic {
        assert!(
            index < self.width,
            "bit {index} out of range for width {}",
            self.width
        );
        let bits = (self.words[(index / PER_WORD) as usize] >> ((index % PER_WORD) * 2)) & 0b11;
        match bits {
            0 => Logic::Zero,
            1 => Logic::One,
            2 => Logic::X,
            _ => Logic::Z,
        }
    }

    /// Writes the value at bit `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= width`.
    pub fn set(&mut self, index: u32, value: Logic) {
        assert!(
            index < self.width,
            "bit {index} out of range for width {}",
            self.width
        );
        let word = &mut self.words[(index / PER_WORD) as usize];
        let shift = (index % PER_WORD) * 2;
        *word = (*word & !(0b11u64 << shift)) | ((value as u64) << shift);
    }

    /// Converts to a `u64` when every bit is definite and the width fits;
    /// `None` if any bit is X or Z or the width exceeds 64.
    pub fn to_u64(&self) -> Option<u64> {
        if self.width > 64 {
            return None;
        }
        let mut out = 0u64;
        for i in 0..self.width {
            match self.get(i) {
                Logic::Zero => {}
                Logic::One => out |= 1 << i,
                Logic::X | Logic::Z => return None,
            }
        }
        Some(out)
    }

    /// Returns `true` when every bit is definite (no X or Z).
    pub fn is_definite(&self) -> bool {
        (0..self.width).all(|i| self.get(i).is_definite())
    }

    /// Grows or truncates the vector to `width`, zero-extending at the
    /// most significant end.
    pub fn resize(&mut self, width: u32) {
        let mut next = LogicVec::all_zero(width);
        for i in 0..self.width.min(width) {
            next.set(i, self.get(i));
        }
        *self = next;
    }
}

impl fmt::Display for LogicVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (0..self.width).rev() {
            write!(f, "{}", self.get(i))?;
        }
        Ok(())
    }
}

impl fmt::Debug for LogicVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LogicVec({self})")
    }
}
