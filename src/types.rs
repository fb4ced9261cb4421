//! Fundamental data types used throughout bf2c

use std::{
    num::Wrapping,
    ops::{Add, AddAssign},
};

/// A tape cell as the generated runtime sees it with the default `char`
/// cell type (u8 with wrapping semantics).
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct BfNum(Wrapping<u8>);

impl BfNum {
    pub fn is_zero(&self) -> bool {
        self.0 .0 == 0
    }
}

impl Add for BfNum {
    type Output = BfNum;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for BfNum {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

/// Reduces a (possibly huge, possibly negative) run magnitude modulo 256,
/// which is what `*(mem + ptr) += n` does to a `char` cell.
impl From<i64> for BfNum {
    fn from(value: i64) -> Self {
        Self(Wrapping::<u8>(value.rem_euclid(256) as u8))
    }
}

impl From<u8> for BfNum {
    fn from(value: u8) -> Self {
        Self(Wrapping::<u8>(value))
    }
}

impl From<BfNum> for u8 {
    fn from(value: BfNum) -> Self {
        value.0 .0
    }
}
