/// Finds the best approximate occurrence of a pattern near an expected
/// location.
pub trait Locator {
    /// Best-scoring start index of `pattern` in `text` around `loc`, or
    /// `None` when nothing scores within the locator's threshold.
    fn locate(&self, text: &[char], pattern: &[char], loc: usize) -> Option<usize>;

    /// Longest pattern the locator can search for.
    fn max_pattern_length(&self) -> usize;
}
