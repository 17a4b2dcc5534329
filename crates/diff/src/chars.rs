//! Search helpers over char slices.

/// First position at or after `from` where `needle` occurs in `haystack`.
pub(crate) fn index_of(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() {
        return (from <= haystack.len()).then_some(from);
    }
    if needle.len() > haystack.len() {
        return None;
    }
    (from..=haystack.len() - needle.len()).find(|&i| haystack[i..i + needle.len()] == *needle)
}

/// Last position at or before `from` where `needle` occurs in `haystack`.
pub(crate) fn last_index_of(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    let last = (haystack.len() - needle.len()).min(from);
    (0..=last)
        .rev()
        .find(|&i| haystack[i..i + needle.len()] == *needle)
}

/// Collect a char slice into an owned string
pub(crate) fn collect(chars: &[char]) -> String {
    chars.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn forward_search() {
        let text = chars("abcabc");
        assert_eq!(index_of(&text, &chars("bc"), 0), Some(1));
        assert_eq!(index_of(&text, &chars("bc"), 2), Some(4));
        assert_eq!(index_of(&text, &chars("bc"), 5), None);
        assert_eq!(index_of(&text, &chars(""), 3), Some(3));
        assert_eq!(index_of(&text, &chars("abcabcd"), 0), None);
    }

    #[test]
    fn backward_search() {
        let text = chars("abcabc");
        assert_eq!(last_index_of(&text, &chars("abc"), 10), Some(3));
        assert_eq!(last_index_of(&text, &chars("abc"), 2), Some(0));
        assert_eq!(last_index_of(&text, &chars("x"), 10), None);
    }
}
