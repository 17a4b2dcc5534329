use crate::bitap::Bitap;
use crate::config::Config;
use crate::locator::Locator;

/// Locates a pattern in a text near an expected position, trying the cheap
/// exact checks before handing over to a fuzzy [`Locator`].
#[derive(Debug, Clone, Copy)]
pub struct Match<L = Bitap> {
    locator: L,
}

impl Match<Bitap> {
    /// Create a matcher backed by [`Bitap`]
    pub fn new(config: Config) -> Self {
        Self {
            locator: Bitap::new(config),
        }
    }
}

impl<L: Locator> Match<L> {
    /// Create a matcher backed by any locator
    pub fn with_locator(locator: L) -> Self {
        Self { locator }
    }

    /// The fuzzy locator used when no exact match is at hand
    pub fn locator(&self) -> &L {
        &self.locator
    }

    /// Find the best char offset of `pattern` in `text` near `loc`.
    pub fn locate(&self, text: &str, pattern: &str, loc: usize) -> Option<usize> {
        let text: Vec<char> = text.chars().collect();
        let pattern: Vec<char> = pattern.chars().collect();
        self.locate_chars(&text, &pattern, loc)
    }

    pub(crate) fn locate_chars(&self, text: &[char], pattern: &[char], loc: usize) -> Option<usize> {
        if text == pattern {
            return Some(0);
        }
        let loc = loc.min(text.len());
        if pattern.is_empty() {
            return Some(loc);
        }
        if text.is_empty() {
            return None;
        }
        if text.get(loc..loc + pattern.len()) == Some(pattern) {
            return Some(loc);
        }
        self.locator.locate(text, pattern, loc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortcuts() {
        let matcher = Match::new(Config::default());
        assert_eq!(matcher.locate("abcdef", "abcdef", 1000), Some(0));
        assert_eq!(matcher.locate("", "abcdef", 1), None);
        assert_eq!(matcher.locate("abcdef", "", 3), Some(3));
        assert_eq!(matcher.locate("abcdef", "", 30), Some(6));
        assert_eq!(matcher.locate("abcdef", "de", 3), Some(3));
    }

    #[test]
    fn clamps_location() {
        let matcher = Match::new(Config::default());
        assert_eq!(matcher.locate("abcdef", "abcdefy", 0), Some(0));
        // One error plus one char of distance is just over the default.
        assert_eq!(matcher.locate("abcdef", "defy", 4), None);
        let lenient = Match::new(Config::default().threshold(0.6));
        assert_eq!(lenient.locate("abcdef", "defy", 4), Some(3));
    }

    #[test]
    fn complex_match() {
        let matcher = Match::new(Config::default().threshold(0.7));
        assert_eq!(
            matcher.locate(
                "I am the very model of a modern major general.",
                " that berry ",
                5
            ),
            Some(4)
        );
    }

    struct Never;

    impl Locator for Never {
        fn locate(&self, _: &[char], _: &[char], _: usize) -> Option<usize> {
            None
        }

        fn max_pattern_length(&self) -> usize {
            0
        }
    }

    #[test]
    fn custom_locator_is_consulted_last() {
        let matcher = Match::with_locator(Never);
        assert_eq!(matcher.locate("abcdef", "cd", 2), Some(2));
        assert_eq!(matcher.locate("abcdef", "cx", 2), None);
    }
}
