#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::edit_type::EditType;

/// One span of an edit script: a piece of text tagged as deleted, inserted
/// or unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Difference {
    /// What happened to the text
    pub edit_type: EditType,

    /// The text of the span
    pub text: String,

    /// Offset of the span in the target text, when assigned
    pub index: Option<usize>,
}

impl Difference {
    /// Create a new difference
    pub fn new(edit_type: EditType, text: impl Into<String>) -> Self {
        Self {
            edit_type,
            text: text.into(),
            index: None,
        }
    }

    /// Create a deletion
    pub fn delete(text: impl Into<String>) -> Self {
        Self::new(EditType::Delete, text)
    }

    /// Create an insertion
    pub fn insert(text: impl Into<String>) -> Self {
        Self::new(EditType::Insert, text)
    }

    /// Create an equality
    pub fn equal(text: impl Into<String>) -> Self {
        Self::new(EditType::Equal, text)
    }

    /// Append text to the end of the span
    pub fn append_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Prepend text to the start of the span
    pub fn prepend_text(&mut self, text: &str) {
        self.text.insert_str(0, text);
    }

    /// Length of the span in chars
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Check if the span is an equality
    pub fn is_equal(&self) -> bool {
        self.edit_type == EditType::Equal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_and_prepend_edit_in_place() {
        let mut diff = Difference::equal("cat");
        diff.prepend_text("the ");
        diff.append_text(" sat");
        assert_eq!(diff.text, "the cat sat");
        assert_eq!(diff.char_len(), 11);
        assert!(diff.is_equal());
    }

    #[test]
    fn char_len_counts_scalars() {
        assert_eq!(Difference::insert("héllo 🚀").char_len(), 7);
    }
}
