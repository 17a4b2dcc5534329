//! Post-processing passes over an edit script.
//!
//! Each pass rewrites the list with plain indices. Semantic and efficiency
//! cleanup keep a stack of candidate equality positions and step back to
//! the previous candidate after every rewrite; merge rebuilds the list in a
//! single forward pass.

use crate::commonality;
use crate::difference::Difference;
use crate::edit_type::EditType;

/// Turn equalities that are shorter than the edits on both sides of them
/// into a delete/insert pair, then merge.
///
/// `x<del>abc</del>y<ins>def</ins>` reads better as one replacement than as
/// two edits held together by a single char.
pub fn cleanup_semantic(diffs: &mut Vec<Difference>) {
    let mut changes = false;
    let mut equalities: Vec<usize> = Vec::new();
    let mut last_equality: Option<usize> = None;
    // Chars changed before and after the last equality.
    let mut length_changes1 = 0;
    let mut length_changes2 = 0;
    let mut pointer = 0;

    while pointer < diffs.len() {
        if diffs[pointer].is_equal() {
            equalities.push(pointer);
            length_changes1 = length_changes2;
            length_changes2 = 0;
            last_equality = Some(diffs[pointer].char_len());
            pointer += 1;
            continue;
        }

        length_changes2 += diffs[pointer].char_len();
        if let (Some(len), Some(&at)) = (last_equality, equalities.last()) {
            if len <= length_changes1 && len <= length_changes2 {
                split_equality(diffs, at);
                // Drop this equality and the one before it, which has to be
                // looked at again.
                equalities.pop();
                equalities.pop();
                pointer = equalities.last().map_or(0, |&p| p + 1);
                length_changes1 = 0;
                length_changes2 = 0;
                last_equality = None;
                changes = true;
                continue;
            }
        }
        pointer += 1;
    }

    if changes {
        cleanup_merge(diffs);
    }
}

/// Turn short equalities that sit between edits into a delete/insert pair
/// when keeping them costs more than the `edit_cost` of one extra edit.
///
/// An equality `X` is split in these shapes:
///
/// ```text
/// <ins>A</ins><del>B</del>XY<ins>C</ins><del>D</del>
/// <ins>A</ins>X<ins>C</ins><del>D</del>
/// <ins>A</ins><del>B</del>X<ins>C</ins>
/// <del>A</del>X<ins>C</ins><del>D</del>
/// <ins>A</ins><del>B</del>X<del>C</del>
/// ```
///
/// The first needs `len(X) < edit_cost`, the others with three of the four
/// surrounding edits need `len(X) < edit_cost / 2`.
pub fn cleanup_efficiency(diffs: &mut Vec<Difference>, edit_cost: usize) {
    let mut changes = false;
    let mut equalities: Vec<usize> = Vec::new();
    let mut last_equality: Option<usize> = None;
    // Whether there is an insertion/deletion before and after the last
    // candidate equality.
    let mut pre_ins = false;
    let mut pre_del = false;
    let mut post_ins = false;
    let mut post_del = false;
    let mut pointer = 0;

    while pointer < diffs.len() {
        if diffs[pointer].is_equal() {
            let len = diffs[pointer].char_len();
            if len < edit_cost && (post_ins || post_del) {
                equalities.push(pointer);
                pre_ins = post_ins;
                pre_del = post_del;
                last_equality = Some(len);
            } else {
                // Not a candidate, and can never become one.
                equalities.clear();
                last_equality = None;
            }
            post_ins = false;
            post_del = false;
            pointer += 1;
            continue;
        }

        if diffs[pointer].edit_type == EditType::Delete {
            post_del = true;
        } else {
            post_ins = true;
        }

        let surrounding = [pre_ins, pre_del, post_ins, post_del]
            .iter()
            .filter(|&&edit| edit)
            .count();
        if let (Some(len), Some(&at)) = (last_equality, equalities.last()) {
            if len > 0 && (surrounding == 4 || (len < edit_cost / 2 && surrounding == 3)) {
                split_equality(diffs, at);
                equalities.pop();
                last_equality = None;
                changes = true;
                if pre_ins && pre_del {
                    // Nothing before the split can be affected.
                    post_ins = true;
                    post_del = true;
                    equalities.clear();
                    pointer += 1;
                } else {
                    equalities.pop();
                    pointer = equalities.last().map_or(0, |&p| p + 1);
                    post_ins = false;
                    post_del = false;
                }
                continue;
            }
        }
        pointer += 1;
    }

    if changes {
        cleanup_merge(diffs);
    }
}

/// Normalise an edit script in one forward pass.
///
/// Consecutive deletions and insertions between two equalities collapse
/// into at most one deletion followed by one insertion, any prefix or suffix
/// they share moves into the neighbouring equalities, adjacent equalities
/// are joined and empty spans disappear. Running it twice gives the same
/// list as running it once.
pub fn cleanup_merge(diffs: &mut Vec<Difference>) {
    let mut merged: Vec<Difference> = Vec::with_capacity(diffs.len());
    let mut text_delete = String::new();
    let mut text_insert = String::new();

    for diff in diffs.drain(..) {
        match diff.edit_type {
            EditType::Delete => text_delete.push_str(&diff.text),
            EditType::Insert => text_insert.push_str(&diff.text),
            // An empty equality does not separate the edits around it.
            EditType::Equal if diff.text.is_empty() => {}
            EditType::Equal => flush_edits(&mut merged, &mut text_delete, &mut text_insert, diff.text),
        }
    }
    flush_edits(&mut merged, &mut text_delete, &mut text_insert, String::new());

    *diffs = merged;
}

/// Emit the pending run of edits followed by `equality`, moving any text
/// the deletion and insertion share into the surrounding equalities.
fn flush_edits(
    merged: &mut Vec<Difference>,
    text_delete: &mut String,
    text_insert: &mut String,
    mut equality: String,
) {
    if !text_delete.is_empty() && !text_insert.is_empty() {
        let deleted: Vec<char> = text_delete.chars().collect();
        let inserted: Vec<char> = text_insert.chars().collect();

        let common = commonality::prefix(&inserted, &deleted);
        let inserted_rest = &inserted[common..];
        let deleted_rest = &deleted[common..];
        push_equality(merged, &inserted[..common].iter().collect::<String>());

        let common_end = commonality::suffix(inserted_rest, deleted_rest);
        let shared_tail: String = inserted_rest[inserted_rest.len() - common_end..]
            .iter()
            .collect();
        equality.insert_str(0, &shared_tail);

        *text_insert = inserted_rest[..inserted_rest.len() - common_end]
            .iter()
            .collect();
        *text_delete = deleted_rest[..deleted_rest.len() - common_end]
            .iter()
            .collect();
    }
    if !text_delete.is_empty() {
        merged.push(Difference::delete(std::mem::take(text_delete)));
    }
    if !text_insert.is_empty() {
        merged.push(Difference::insert(std::mem::take(text_insert)));
    }
    push_equality(merged, &equality);
}

/// Append an equality, joining it with a preceding one.
fn push_equality(diffs: &mut Vec<Difference>, text: &str) {
    if text.is_empty() {
        return;
    }
    match diffs.last_mut() {
        Some(last) if last.is_equal() => last.append_text(text),
        _ => diffs.push(Difference::equal(text)),
    }
}

/// Replace the equality at `at` with a deletion and an insertion of the
/// same text.
fn split_equality(diffs: &mut Vec<Difference>, at: usize) {
    let text = diffs[at].text.clone();
    diffs.insert(at, Difference::delete(text));
    diffs[at + 1].edit_type = EditType::Insert;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn del(s: &str) -> Difference {
        Difference::delete(s)
    }

    fn ins(s: &str) -> Difference {
        Difference::insert(s)
    }

    fn eq(s: &str) -> Difference {
        Difference::equal(s)
    }

    fn merged(mut diffs: Vec<Difference>) -> Vec<Difference> {
        cleanup_merge(&mut diffs);
        diffs
    }

    #[test]
    fn merge_empty_list() {
        assert_eq!(merged(vec![]), vec![]);
    }

    #[test]
    fn merge_leaves_normal_list() {
        let diffs = vec![eq("a"), del("b"), ins("c")];
        assert_eq!(merged(diffs.clone()), diffs);
    }

    #[test]
    fn merge_joins_same_types() {
        assert_eq!(merged(vec![eq("a"), eq("b"), eq("c")]), vec![eq("abc")]);
        assert_eq!(merged(vec![del("a"), del("b"), del("c")]), vec![del("abc")]);
        assert_eq!(merged(vec![ins("a"), ins("b"), ins("c")]), vec![ins("abc")]);
    }

    #[test]
    fn merge_interleaved_edits() {
        assert_eq!(
            merged(vec![del("a"), ins("b"), del("c"), ins("d"), eq("e"), eq("f")]),
            vec![del("ac"), ins("bd"), eq("ef")]
        );
    }

    #[test]
    fn merge_factors_common_prefix_and_suffix() {
        assert_eq!(
            merged(vec![del("a"), ins("abc"), del("dc")]),
            vec![eq("a"), del("d"), ins("b"), eq("c")]
        );
        assert_eq!(
            merged(vec![eq("x"), del("a"), ins("abc"), del("dc"), eq("y")]),
            vec![eq("xa"), del("d"), ins("b"), eq("cy")]
        );
    }

    #[test]
    fn merge_drops_empty_spans() {
        assert_eq!(
            merged(vec![eq(""), del("a"), ins(""), eq("b"), eq("")]),
            vec![del("a"), eq("b")]
        );
        assert_eq!(merged(vec![eq("")]), vec![]);
    }

    #[test]
    fn merge_is_idempotent() {
        let once = merged(vec![
            del("ab"),
            ins("ax"),
            eq("1"),
            ins("q"),
            del("r"),
            ins("rq"),
            eq("2"),
        ]);
        assert_eq!(merged(once.clone()), once);
    }

    #[test]
    fn merge_joins_edits_across_empty_equality() {
        let once = merged(vec![del("a"), eq(""), del("b")]);
        assert_eq!(once, vec![del("ab")]);
        assert_eq!(merged(once.clone()), once);

        assert_eq!(
            merged(vec![del("ab"), ins("1"), eq(""), del("c"), ins("2b")]),
            vec![del("abc"), ins("12b")]
        );
    }

    #[test]
    fn semantic_keeps_meaningful_equalities() {
        let mut diffs = vec![del("a"), ins("b"), eq("cd"), del("e")];
        cleanup_semantic(&mut diffs);
        assert_eq!(diffs, vec![del("a"), ins("b"), eq("cd"), del("e")]);
    }

    #[test]
    fn semantic_eliminates_trivial_equality() {
        let mut diffs = vec![del("a"), eq("b"), del("c")];
        cleanup_semantic(&mut diffs);
        assert_eq!(diffs, vec![del("abc"), ins("b")]);
    }

    #[test]
    fn semantic_reevaluates_previous_equality() {
        let mut diffs = vec![del("ab"), eq("cd"), del("e"), eq("f"), ins("g")];
        cleanup_semantic(&mut diffs);
        assert_eq!(diffs, vec![del("abcdef"), ins("cdfg")]);
    }

    #[test]
    fn efficiency_keeps_long_equality() {
        let mut diffs = vec![del("ab"), ins("12"), eq("wxyz"), del("cd"), ins("34")];
        cleanup_efficiency(&mut diffs, 4);
        assert_eq!(
            diffs,
            vec![del("ab"), ins("12"), eq("wxyz"), del("cd"), ins("34")]
        );
    }

    #[test]
    fn efficiency_four_surrounding_edits() {
        let mut diffs = vec![del("ab"), ins("12"), eq("xyz"), del("cd"), ins("34")];
        cleanup_efficiency(&mut diffs, 4);
        assert_eq!(diffs, vec![del("abxyzcd"), ins("12xyz34")]);
    }

    #[test]
    fn efficiency_three_surrounding_edits() {
        let mut diffs = vec![ins("12"), eq("x"), del("cd"), ins("34")];
        cleanup_efficiency(&mut diffs, 4);
        assert_eq!(diffs, vec![del("xcd"), ins("12x34")]);
    }

    #[test]
    fn efficiency_edits_before_and_insertion_after() {
        let mut diffs = vec![ins("12"), del("ab"), eq("x"), ins("34")];
        cleanup_efficiency(&mut diffs, 4);
        assert_eq!(diffs, vec![del("abx"), ins("12x34")]);
    }

    #[test]
    fn efficiency_deletion_before_and_edits_after() {
        let mut diffs = vec![del("ab"), eq("x"), ins("12"), del("cd")];
        cleanup_efficiency(&mut diffs, 4);
        assert_eq!(diffs, vec![del("abxcd"), ins("x12")]);
    }

    #[test]
    fn efficiency_edits_before_and_deletion_after() {
        let mut diffs = vec![ins("12"), del("ab"), eq("x"), del("cd")];
        cleanup_efficiency(&mut diffs, 4);
        assert_eq!(diffs, vec![del("abxcd"), ins("12x")]);
    }

    #[test]
    fn efficiency_three_edits_needs_half_cost() {
        // Two chars is not below half of the edit cost.
        let mut diffs = vec![ins("12"), eq("xy"), del("cd"), ins("34")];
        cleanup_efficiency(&mut diffs, 4);
        assert_eq!(diffs, vec![ins("12"), eq("xy"), del("cd"), ins("34")]);

        // Half of an odd cost rounds down.
        let mut diffs = vec![ins("12"), eq("xy"), del("cd"), ins("34")];
        cleanup_efficiency(&mut diffs, 5);
        assert_eq!(diffs, vec![ins("12"), eq("xy"), del("cd"), ins("34")]);
    }

    #[test]
    fn efficiency_backpass() {
        let mut diffs = vec![
            del("ab"),
            ins("12"),
            eq("xy"),
            ins("34"),
            eq("z"),
            del("cd"),
            ins("56"),
        ];
        cleanup_efficiency(&mut diffs, 4);
        assert_eq!(diffs, vec![del("abxyzcd"), ins("12xy34z56")]);
    }

    #[test]
    fn efficiency_high_cost() {
        let mut diffs = vec![del("ab"), ins("12"), eq("wxyz"), del("cd"), ins("34")];
        cleanup_efficiency(&mut diffs, 5);
        assert_eq!(diffs, vec![del("abwxyzcd"), ins("12wxyz34")]);
    }
}
