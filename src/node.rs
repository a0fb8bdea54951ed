use crate::reference::Ref;
use crate::utils::MyHash;

/// A decision node: `if variable then high else low`.
///
/// Terminal nodes carry `variable == 0`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Node {
    pub variable: u32,
    pub low: Ref,
    pub high: Ref,
}

impl Node {
    pub fn new(variable: u32, low: Ref, high: Ref) -> Self {
        Self {
            variable,
            low,
            high,
        }
    }

    /// The terminal node. Its children are never followed.
    pub fn terminal() -> Self {
        Self::new(0, Ref::positive(0), Ref::positive(0))
    }
}

impl MyHash for Node {
    fn hash(&self) -> u64 {
        MyHash::hash(&(
            self.variable as u64,
            self.low.raw() as u64,
            self.high.raw() as u64,
        ))
    }
}
