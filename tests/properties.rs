//! Property tests for the alignment invariants.

use hcsdiff::hcs::heaviest_common_subsequence;
use hcsdiff::{character_diff, line_diff, DiffTool, Document, DocumentDiff, EditType, Range};
use proptest::prelude::*;

fn cover(diff: &DocumentDiff<'_>, left: bool) -> Vec<Range> {
    let mut ranges: Vec<Range> = diff
        .similarities
        .iter()
        .map(|s| if left { s.left.range } else { s.right.range })
        .chain(diff.edits.iter().filter_map(|e| {
            let side = if left { &e.left } else { &e.right };
            side.as_ref().map(|l| l.range)
        }))
        .collect();
    ranges.sort();
    ranges
}

fn is_partition(ranges: &[Range], extent: Range) -> bool {
    !ranges.is_empty()
        && ranges[0].start == extent.start
        && ranges[ranges.len() - 1].end == extent.end
        && ranges.windows(2).all(|pair| pair[0].touches(&pair[1]))
}

type Item = (u8, Option<Range>, Option<Range>);

/// Edits and similarities as sorted `(kind, left, right)` tuples.
///
/// With `mirror` set, the diff is read as if its inputs had been swapped back.
fn normalized(diff: &DocumentDiff<'_>, mirror: bool) -> Vec<Item> {
    let mut items: Vec<Item> = diff
        .edits
        .iter()
        .map(|e| {
            let kind = match (e.edit_type, mirror) {
                (EditType::Add, false) | (EditType::Delete, true) => 0,
                (EditType::Delete, false) | (EditType::Add, true) => 1,
                (EditType::Move, _) => 2,
                _ => 4,
            };
            let (left, right) = (e.left.as_ref().map(|l| l.range), e.right.as_ref().map(|r| r.range));
            if mirror {
                (kind, right, left)
            } else {
                (kind, left, right)
            }
        })
        .chain(diff.similarities.iter().map(|s| {
            if mirror {
                (3, Some(s.right.range), Some(s.left.range))
            } else {
                (3, Some(s.left.range), Some(s.right.range))
            }
        }))
        .collect();
    items.sort();
    items
}

proptest! {
    #[test]
    fn test_line_diff_partitions_both_documents(
        left in "([abc]{0,3}\n){0,6}[abc]{0,3}",
        right in "([abc]{0,3}\n){0,6}[abc]{0,3}"
    ) {
        let left = Document::new("string:left", &left);
        let right = Document::new("string:right", &right);
        let diff = line_diff(0).compare(&left, &right);

        prop_assert!(is_partition(&cover(&diff, true), left.extent()));
        prop_assert!(is_partition(&cover(&diff, false), right.extent()));
    }

    #[test]
    fn test_character_diff_partitions_both_documents(
        left in "[ab\n]{0,16}",
        right in "[ab\n]{0,16}",
        threshold in 0u64..3
    ) {
        let left = Document::new("string:left", &left);
        let right = Document::new("string:right", &right);
        let diff = character_diff(threshold).compare(&left, &right);

        prop_assert!(is_partition(&cover(&diff, true), left.extent()));
        prop_assert!(is_partition(&cover(&diff, false), right.extent()));
    }

    #[test]
    fn test_swapping_inputs_mirrors_line_diff(
        left in "([abc]{0,2}\n){0,6}[abc]{0,2}",
        right in "([abc]{0,2}\n){0,6}[abc]{0,2}"
    ) {
        let left = Document::new("string:left", &left);
        let right = Document::new("string:right", &right);
        let forward = line_diff(0).compare(&left, &right);
        let backward = line_diff(0).compare(&right, &left);

        prop_assert_eq!(normalized(&forward, false), normalized(&backward, true));
    }

    #[test]
    fn test_swapping_inputs_mirrors_character_diff(
        left in "[ab\n]{0,14}",
        right in "[ab\n]{0,14}",
        threshold in 0u64..3
    ) {
        let left = Document::new("string:left", &left);
        let right = Document::new("string:right", &right);
        let forward = character_diff(threshold).compare(&left, &right);
        let backward = character_diff(threshold).compare(&right, &left);

        prop_assert_eq!(normalized(&forward, false), normalized(&backward, true));
    }

    #[test]
    fn test_identity_has_no_edits(text in "[a-z \n]{0,40}") {
        let left = Document::new("string:left", &text);
        let right = Document::new("string:right", &text);
        let diff = line_diff(0).compare(&left, &right);

        prop_assert!(diff.edits.is_empty());
        prop_assert_eq!(diff.similarities.len(), 1);
    }

    #[test]
    fn test_hcs_is_deterministic_and_orientation_free(
        left in proptest::collection::vec(0u8..4, 0..24),
        right in proptest::collection::vec(0u8..4, 0..24)
    ) {
        let forward = heaviest_common_subsequence(|a, b| a == b, |_| 1, &left, &right);
        let again = heaviest_common_subsequence(|a, b| a == b, |_| 1, &left, &right);
        prop_assert_eq!(&forward, &again);

        let backward = heaviest_common_subsequence(|a, b| a == b, |_| 1, &right, &left);
        prop_assert_eq!(forward.weight, backward.weight);
        let mirrored: Vec<(usize, usize)> = backward.pairs.iter().map(|&(l, r)| (r, l)).collect();
        prop_assert_eq!(&forward.pairs, &mirrored);
        for &(l, r) in &forward.pairs {
            prop_assert_eq!(left[l], right[r]);
        }
    }
}
