use derive_more::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Classifies a span of text in an edit script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EditType {
    /// The span only exists in the source text
    #[display(fmt = "-")]
    Delete,

    /// The span only exists in the target text
    #[display(fmt = "+")]
    Insert,

    /// The span exists in both texts
    #[display(fmt = " ")]
    Equal,
}

impl EditType {
    /// The one-character symbol used in the patch text format
    pub fn symbol(self) -> char {
        match self {
            EditType::Delete => '-',
            EditType::Insert => '+',
            EditType::Equal => ' ',
        }
    }

    /// Parse a patch line symbol
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '-' => Some(EditType::Delete),
            '+' => Some(EditType::Insert),
            ' ' => Some(EditType::Equal),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_symbol() {
        for edit_type in [EditType::Delete, EditType::Insert, EditType::Equal] {
            assert_eq!(edit_type.to_string(), edit_type.symbol().to_string());
            assert_eq!(EditType::from_symbol(edit_type.symbol()), Some(edit_type));
        }
        assert_eq!(EditType::from_symbol('@'), None);
    }
}
