#[cfg(test)]
mod tests;

use std::ops::{Add, Mul, Sub};

/// A displacement from a block to its match in a reference picture.
///
/// Depending on context the unit is either full pixels or 1/8 pixels. The
/// full-pel search works on full-pel vectors; cost attribution and the
/// final rescoring use the 1/8-pel form, obtained with [`MotionVector::to_eighth_pel`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MotionVector {
    pub row: i32,
    pub col: i32,
}

impl MotionVector {
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    #[must_use]
    pub const fn zero() -> Self {
        Self { row: 0, col: 0 }
    }

    /// Full-pel to 1/8-pel.
    #[must_use]
    pub const fn to_eighth_pel(self) -> Self {
        Self {
            row: self.row * 8,
            col: self.col * 8,
        }
    }

    /// 1/8-pel to full-pel, truncating towards negative infinity.
    #[must_use]
    pub const fn to_full_pel(self) -> Self {
        Self {
            row: self.row >> 3,
            col: self.col >> 3,
        }
    }

    /// True when a 1/8-pel vector has no fractional part.
    #[must_use]
    pub const fn is_full_pel(self) -> bool {
        (self.row & 7) == 0 && (self.col & 7) == 0
    }

    #[must_use]
    pub fn joint(self) -> MvJoint {
        match (self.row == 0, self.col == 0) {
            (true, true) => MvJoint::Zero,
            (true, false) => MvJoint::HnzVz,
            (false, true) => MvJoint::HzVnz,
            (false, false) => MvJoint::HnzVnz,
        }
    }

    /// Chebyshev length, the largest absolute component.
    #[must_use]
    pub fn max_abs(self) -> u32 {
        self.row.unsigned_abs().max(self.col.unsigned_abs())
    }
}

impl Add for MotionVector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            row: self.row + rhs.row,
            col: self.col + rhs.col,
        }
    }
}

impl Sub for MotionVector {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            row: self.row - rhs.row,
            col: self.col - rhs.col,
        }
    }
}

impl Mul<i32> for MotionVector {
    type Output = Self;

    fn mul(self, rhs: i32) -> Self {
        Self {
            row: self.row * rhs,
            col: self.col * rhs,
        }
    }
}

/// Which components of an MV difference are non-zero.
///
/// `H` refers to the horizontal (column) component, `V` to the vertical (row)
/// component. The discriminants index the joint cost table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MvJoint {
    Zero = 0,
    HnzVz = 1,
    HzVnz = 2,
    HnzVnz = 3,
}
