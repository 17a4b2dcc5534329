/// Levenshtein edit distance between two texts, counted in chars.
///
/// Classic dynamic programme keeping only two rows.
pub fn levenshtein_distance(source: &str, target: &str) -> usize {
    let source: Vec<char> = source.chars().collect();
    let target: Vec<char> = target.chars().collect();
    if source.is_empty() {
        return target.len();
    }
    if target.is_empty() {
        return source.len();
    }

    let mut previous: Vec<usize> = (0..=source.len()).collect();
    let mut current = vec![0; source.len() + 1];
    for (j, &t) in target.iter().enumerate() {
        current[0] = j + 1;
        for (i, &s) in source.iter().enumerate() {
            let cost = usize::from(s != t);
            current[i + 1] = (current[i] + 1)
                .min(previous[i + 1] + 1)
                .min(previous[i] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[source.len()]
}
