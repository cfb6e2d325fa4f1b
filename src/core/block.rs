#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use core::fmt;
use core::ops::Deref;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stimulus category label. Ordinary categories are `0..K`, the special one is `K`.
pub type Category = usize;

/// One randomized presentation sequence for a single experimental block.
///
/// A `Block` is only a container; balance is established by the builder and
/// checked by the verifier.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Block(Vec<Category>);

impl Block {
    pub fn new(labels: Vec<Category>) -> Self {
        Self(labels)
    }

    pub fn as_slice(&self) -> &[Category] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<Category> {
        self.0
    }
}

impl Deref for Block {
    type Target = [Category];

    fn deref(&self) -> &[Category] {
        &self.0
    }
}

impl From<Vec<Category>> for Block {
    fn from(labels: Vec<Category>) -> Self {
        Self(labels)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{c}")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_as_bracketed_list() {
        let block = Block::new(vec![0, 2, 1, 2, 2]);
        assert_eq!(block.to_string(), "[0, 2, 1, 2, 2]");
        assert_eq!(Block::default().to_string(), "[]");
    }
}
