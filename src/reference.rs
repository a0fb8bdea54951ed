use std::fmt::{Display, Formatter};
use std::ops::Neg;

/// A reference to a BDD node, potentially negated (complement edge).
///
/// The least significant bit holds the negation flag, the remaining bits the
/// index of the node in the manager's table.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Ref(u32);

impl Ref {
    /// Creates a new reference with the given node index and negation flag.
    pub const fn new(index: u32, negated: bool) -> Self {
        assert!(index < 0x8000_0000, "Node index is too large");
        Self((index << 1) | (negated as u32))
    }

    /// Creates a positive (non-negated) reference.
    pub const fn positive(index: u32) -> Self {
        Self::new(index, false)
    }

    /// Returns the index of the node this reference points to.
    #[inline]
    pub const fn index(self) -> usize {
        (self.0 >> 1) as usize
    }

    /// Returns true if this reference is negated.
    #[inline]
    pub const fn is_negated(self) -> bool {
        (self.0 & 1) != 0
    }

    /// Returns the same reference without the negation flag.
    #[inline]
    pub const fn regular(self) -> Self {
        Self(self.0 & !1)
    }

    /// Returns the raw underlying value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

// -Ref
impl Neg for Ref {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(self.0 ^ 1)
    }
}

impl Display for Ref {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_negated() {
            write!(f, "~@{}", self.index())
        } else {
            write!(f, "@{}", self.index())
        }
    }
}
