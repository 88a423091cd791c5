//! Diff orchestration: similarity pairing, move detection and edit assembly.
//!
//! An [`HcsDiffTool`] maps both documents to excerpt sequences and aligns them
//! in three phases:
//!
//! 1. A weighted heaviest common subsequence over the full sequences. Matched
//!    pairs are coalesced into runs that are contiguous on both sides; runs
//!    heavier than the similarity threshold become [`Similarity`] regions.
//! 2. Repeated unweighted passes over the excerpts that are still unpaired.
//!    Qualifying runs become `Move` edits. Moved blocks keep their internal
//!    contiguity but lost their place relative to the rest of the document,
//!    so they only surface once the unchanged content has been pulled out.
//! 3. Whatever is still unpaired becomes `Delete` (left) and `Add` (right)
//!    edits, grouped into maximal contiguous ranges.
//!
//! Paired state lives in per-call boolean vectors indexed by excerpt position,
//! so independent comparisons can run in parallel.
//!
//! # Examples
//!
//! ```
//! use hcsdiff::{line_diff, DiffTool, Document, EditType};
//!
//! let left = Document::new("string:left", "abc\ndef");
//! let right = Document::new("string:right", "abc\nxyz\ndef");
//!
//! let diff = line_diff(0).compare(&left, &right);
//! assert_eq!(diff.edits.len(), 1);
//! assert_eq!(diff.edits[0].edit_type, EditType::Add);
//! ```

use crate::document::{content_length, same_content, Document};
use crate::hcs::heaviest_common_subsequence_by;
use crate::model::{
    DiffLevel, DocumentDiff, Edit, Excerpt, Excerpted, Range, Similarity, Weight,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Default upper bound on move-detection passes.
pub const DEFAULT_MAX_MOVE_PASSES: usize = 256;

/// Maps a document to the ordered excerpts a tool compares.
pub type ExcerptMapper<T> = Arc<dyn Fn(&Document) -> Vec<T> + Send + Sync>;

/// Decides whether two excerpts may be paired.
pub type Equals<T> = Arc<dyn Fn(&T, &T) -> bool + Send + Sync>;

/// Weight an excerpt contributes when paired.
pub type Weigh<T> = Arc<dyn Fn(&T) -> Weight + Send + Sync>;

/// Something that compares two documents.
pub trait DiffTool: Send + Sync {
    fn compare<'d>(&self, left: &'d Document, right: &'d Document) -> DocumentDiff<'d>;
}

/// Options for an [`HcsDiffTool`].
///
/// `equals` defaults to [`same_content`] and `weigh` to [`content_length`].
pub struct DiffOptions<T> {
    pub level: DiffLevel,
    pub excerpt_mapper: ExcerptMapper<T>,
    /// Runs must weigh strictly more than this to be reported
    pub similarity_threshold: Weight,
    pub equals: Option<Equals<T>>,
    pub weigh: Option<Weigh<T>>,
    /// Upper bound on move-detection passes
    pub max_move_passes: usize,
}

impl<T> DiffOptions<T> {
    pub fn new(
        level: DiffLevel,
        excerpt_mapper: impl Fn(&Document) -> Vec<T> + Send + Sync + 'static,
        similarity_threshold: Weight,
    ) -> Self {
        Self {
            level,
            excerpt_mapper: Arc::new(excerpt_mapper),
            similarity_threshold,
            equals: None,
            weigh: None,
            max_move_passes: DEFAULT_MAX_MOVE_PASSES,
        }
    }

    pub fn equals(mut self, equals: impl Fn(&T, &T) -> bool + Send + Sync + 'static) -> Self {
        let equals: Equals<T> = Arc::new(equals);
        self.equals = Some(equals);
        self
    }

    pub fn weigh(mut self, weigh: impl Fn(&T) -> Weight + Send + Sync + 'static) -> Self {
        let weigh: Weigh<T> = Arc::new(weigh);
        self.weigh = Some(weigh);
        self
    }

    pub fn max_move_passes(mut self, passes: usize) -> Self {
        self.max_move_passes = passes;
        self
    }
}

/// A diff tool aligning one kind of excerpt with the HCS solver.
pub struct HcsDiffTool<T> {
    level: DiffLevel,
    excerpt_mapper: ExcerptMapper<T>,
    similarity_threshold: Weight,
    equals: Equals<T>,
    weigh: Weigh<T>,
    max_move_passes: usize,
}

impl<T> HcsDiffTool<T>
where
    T: Excerpted + 'static,
{
    pub fn new(options: DiffOptions<T>) -> Self {
        let equals: Equals<T> = match options.equals {
            Some(equals) => equals,
            None => Arc::new(|a: &T, b: &T| same_content(a, b)),
        };
        let weigh: Weigh<T> = match options.weigh {
            Some(weigh) => weigh,
            None => Arc::new(|e: &T| content_length(e)),
        };

        Self {
            level: options.level,
            excerpt_mapper: options.excerpt_mapper,
            similarity_threshold: options.similarity_threshold,
            equals,
            weigh,
            max_move_passes: options.max_move_passes,
        }
    }

    pub fn level(&self) -> DiffLevel {
        self.level
    }

    pub fn similarity_threshold(&self) -> Weight {
        self.similarity_threshold
    }

    pub fn with_max_move_passes(mut self, passes: usize) -> Self {
        self.max_move_passes = passes;
        self
    }
}

impl<T> DiffTool for HcsDiffTool<T>
where
    T: Excerpted + Send + Sync + 'static,
{
    fn compare<'d>(&self, left: &'d Document, right: &'d Document) -> DocumentDiff<'d> {
        let left_items = (self.excerpt_mapper)(left);
        let right_items = (self.excerpt_mapper)(right);
        let mut alignment = Alignment::new(&left_items, &right_items);

        let similarities = self.pair_similarities(&mut alignment, left, right);
        let moves = self.detect_moves(&mut alignment, left, right);

        let deletes = unpaired_ranges(&left_items, &alignment.left_paired)
            .into_iter()
            .map(|range| Edit::delete(self.level, left.location(range)));
        let adds = unpaired_ranges(&right_items, &alignment.right_paired)
            .into_iter()
            .map(|range| Edit::add(self.level, right.location(range)));

        let edits: Vec<Edit> = deletes.chain(adds).chain(moves).collect();
        debug!(
            level = %self.level,
            left = left.uri(),
            right = right.uri(),
            edits = edits.len(),
            similarities = similarities.len(),
            "diff complete"
        );

        DocumentDiff {
            left,
            right,
            edits,
            similarities,
        }
    }
}

impl<T> HcsDiffTool<T>
where
    T: Excerpted + 'static,
{
    fn pair_similarities(
        &self,
        alignment: &mut Alignment<'_, T>,
        left: &Document,
        right: &Document,
    ) -> Vec<Similarity> {
        let result = heaviest_common_subsequence_by(
            |a: &T, b: &T| (self.equals)(a, b),
            |e: &T| (self.weigh)(e),
            |a: &T, b: &T| a.content().cmp(b.content()),
            alignment.left,
            alignment.right,
        );
        debug!(
            level = %self.level,
            pairs = result.len(),
            weight = result.weight,
            "similarity pass"
        );

        let runs = alignment.coalesce(&result.pairs, |e| (self.weigh)(e));
        runs.into_iter()
            .filter(|run| run.weight > self.similarity_threshold)
            .map(|run| {
                let (left_range, right_range) = alignment.pair_run(&result.pairs, &run);
                Similarity::new(
                    self.level,
                    left.location(left_range),
                    right.location(right_range),
                )
            })
            .collect()
    }

    fn detect_moves(
        &self,
        alignment: &mut Alignment<'_, T>,
        left: &Document,
        right: &Document,
    ) -> Vec<Edit> {
        let mut moves = Vec::new();
        let (left_all, right_all) = (alignment.left, alignment.right);

        for pass in 0..self.max_move_passes {
            let left_free = alignment.unpaired_left();
            let right_free = alignment.unpaired_right();
            let left_items: Vec<&T> = left_free.iter().map(|&i| &left_all[i]).collect();
            let right_items: Vec<&T> = right_free.iter().map(|&i| &right_all[i]).collect();

            let result = heaviest_common_subsequence_by(
                |a: &&T, b: &&T| (self.equals)(*a, *b),
                |_| 1,
                |a: &&T, b: &&T| a.content().cmp(b.content()),
                &left_items,
                &right_items,
            );
            if result.len() as Weight <= self.similarity_threshold {
                debug!(level = %self.level, pass, pairs = result.len(), "move detection converged");
                return moves;
            }

            let pairs: Vec<(usize, usize)> = result
                .pairs
                .iter()
                .map(|&(l, r)| (left_free[l], right_free[r]))
                .collect();
            let runs: Vec<Run> = alignment
                .coalesce(&pairs, |_| 1)
                .into_iter()
                .filter(|run| run.weight > self.similarity_threshold)
                .collect();

            // Nothing qualifies: the next pass would see the same input.
            if runs.is_empty() {
                debug!(level = %self.level, pass, "no movable runs left");
                return moves;
            }

            debug!(level = %self.level, pass, moves = runs.len(), "move pass");
            for run in runs {
                let (left_range, right_range) = alignment.pair_run(&pairs, &run);
                moves.push(Edit::moved(
                    self.level,
                    left.location(left_range),
                    right.location(right_range),
                ));
            }
        }

        warn!(
            level = %self.level,
            passes = self.max_move_passes,
            "move detection stopped at the pass limit"
        );
        moves
    }
}

/// A maximal stretch of consecutive pairs contiguous on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run {
    /// Index of the first pair of the run
    start: usize,
    /// One past the last pair of the run
    end: usize,
    weight: Weight,
}

/// Both excerpt sequences and which of their items are already paired.
struct Alignment<'a, T> {
    left: &'a [T],
    right: &'a [T],
    left_paired: Vec<bool>,
    right_paired: Vec<bool>,
}

impl<'a, T: Excerpted> Alignment<'a, T> {
    fn new(left: &'a [T], right: &'a [T]) -> Self {
        Self {
            left,
            right,
            left_paired: vec![false; left.len()],
            right_paired: vec![false; right.len()],
        }
    }

    fn unpaired_left(&self) -> Vec<usize> {
        unpaired_indices(&self.left_paired)
    }

    fn unpaired_right(&self) -> Vec<usize> {
        unpaired_indices(&self.right_paired)
    }

    /// Splits `pairs` into runs whose items touch on both sides.
    fn coalesce(&self, pairs: &[(usize, usize)], weigh: impl Fn(&T) -> Weight) -> Vec<Run> {
        let mut runs = Vec::new();
        let Some(&(first_left, _)) = pairs.first() else {
            return runs;
        };

        let mut current = Run {
            start: 0,
            end: 1,
            weight: weigh(&self.left[first_left]),
        };
        for (index, window) in pairs.windows(2).enumerate() {
            let (prev_left, prev_right) = window[0];
            let (next_left, next_right) = window[1];
            let contiguous = self.left[prev_left].range().touches(self.left[next_left].range())
                && self.right[prev_right].range().touches(self.right[next_right].range());

            if contiguous {
                current.end += 1;
                current.weight += weigh(&self.left[next_left]);
            } else {
                runs.push(current);
                current = Run {
                    start: index + 1,
                    end: index + 2,
                    weight: weigh(&self.left[next_left]),
                };
            }
        }
        runs.push(current);

        runs
    }

    /// Marks the run's items as paired and returns its left and right extents.
    fn pair_run(&mut self, pairs: &[(usize, usize)], run: &Run) -> (Range, Range) {
        let members = &pairs[run.start..run.end];
        for &(l, r) in members {
            self.left_paired[l] = true;
            self.right_paired[r] = true;
        }

        let (first_left, first_right) = members[0];
        let (last_left, last_right) = members[members.len() - 1];
        (
            Range::new(
                self.left[first_left].range().start,
                self.left[last_left].range().end,
            ),
            Range::new(
                self.right[first_right].range().start,
                self.right[last_right].range().end,
            ),
        )
    }
}

fn unpaired_indices(paired: &[bool]) -> Vec<usize> {
    paired
        .iter()
        .enumerate()
        .filter_map(|(index, &paired)| (!paired).then_some(index))
        .collect()
}

/// Groups unpaired items into maximal ranges of touching, consecutive excerpts.
fn unpaired_ranges<T: Excerpted>(items: &[T], paired: &[bool]) -> Vec<Range> {
    let mut ranges = Vec::new();
    let mut open: Option<(usize, Range)> = None;

    for (index, item) in items.iter().enumerate() {
        if paired[index] {
            if let Some((_, range)) = open.take() {
                ranges.push(range);
            }
            continue;
        }

        let range = *item.range();
        open = match open {
            Some((last, current)) if last + 1 == index && current.touches(&range) => {
                Some((index, Range::new(current.start, range.end)))
            }
            Some((_, current)) => {
                ranges.push(current);
                Some((index, range))
            }
            None => Some((index, range)),
        };
    }
    if let Some((_, range)) = open {
        ranges.push(range);
    }

    ranges
}

/// Character-level textual diff. The conventional threshold is `1`.
pub fn character_diff(similarity_threshold: Weight) -> HcsDiffTool<Excerpt> {
    HcsDiffTool::new(DiffOptions::new(
        DiffLevel::Textual,
        |document: &Document| document.characters().to_vec(),
        similarity_threshold,
    ))
}

/// Line-level textual diff. The conventional threshold is `0`.
pub fn line_diff(similarity_threshold: Weight) -> HcsDiffTool<Excerpt> {
    HcsDiffTool::new(DiffOptions::new(
        DiffLevel::Textual,
        |document: &Document| document.lines().to_vec(),
        similarity_threshold,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EditType, Position};

    fn range(start: (usize, usize), end: (usize, usize)) -> Range {
        Range::new(Position::new(start.0, start.1), Position::new(end.0, end.1))
    }

    #[test]
    fn test_identical_documents_single_similarity() {
        let left = Document::new("string:left", "abc\ndef\nghi");
        let right = Document::new("string:right", "abc\ndef\nghi");

        let diff = line_diff(0).compare(&left, &right);
        assert!(diff.edits.is_empty());
        assert_eq!(diff.similarities.len(), 1);
        assert_eq!(diff.similarities[0].left.range, left.extent());
        assert_eq!(diff.similarities[0].right.range, right.extent());
    }

    #[test]
    fn test_character_threshold_drops_short_runs() {
        let left = Document::new("string:left", "abc");
        let right = Document::new("string:right", "bc");

        let diff = character_diff(1).compare(&left, &right);
        assert_eq!(diff.edits.len(), 1);
        assert_eq!(diff.edits[0].edit_type, EditType::Delete);
        assert_eq!(
            diff.edits[0].left.as_ref().unwrap().range,
            range((1, 1), (1, 2))
        );
        assert_eq!(diff.similarities.len(), 1);
        assert_eq!(diff.similarities[0].left.range, range((1, 2), (2, 1)));
        assert_eq!(diff.similarities[0].right.range, range((1, 1), (2, 1)));
    }

    #[test]
    fn test_swapped_lines_pair_one_and_move_one() {
        let left = Document::new("string:left", "abc\ndef");
        let right = Document::new("string:right", "def\nabc");

        let diff = line_diff(0).compare(&left, &right);
        let moves: Vec<_> = diff
            .edits
            .iter()
            .filter(|e| e.edit_type == EditType::Move)
            .collect();
        assert_eq!(moves.len(), 1);
        assert_eq!(diff.edits.len(), 1);
        assert_eq!(diff.similarities.len(), 1);
    }

    #[test]
    fn test_single_character_matches_not_paired_above_threshold() {
        let left = Document::new("string:left", "axb");
        let right = Document::new("string:right", "ayb");

        // Runs "a" and "b\n" (weight 2) against threshold 1.
        let diff = character_diff(1).compare(&left, &right);
        assert_eq!(diff.similarities.len(), 1);
        assert_eq!(diff.similarities[0].left.range, range((1, 3), (2, 1)));
        let deletes = diff
            .edits
            .iter()
            .filter(|e| e.edit_type == EditType::Delete)
            .count();
        let adds = diff
            .edits
            .iter()
            .filter(|e| e.edit_type == EditType::Add)
            .count();
        assert_eq!(deletes, 1);
        assert_eq!(adds, 1);
    }

    #[test]
    fn test_unpaired_ranges_group_contiguous_items() {
        let document = Document::new("string:test", "abcd");
        let characters = document.characters();
        let paired = vec![false, false, true, false, false];
        let ranges = unpaired_ranges(characters, &paired);
        assert_eq!(ranges, vec![range((1, 1), (1, 3)), range((1, 4), (2, 1))]);
    }

    #[test]
    fn test_coalesce_splits_on_gaps() {
        let left = Document::new("string:left", "abcd");
        let right = Document::new("string:right", "abxcd");
        let alignment = Alignment::new(left.characters(), right.characters());

        let pairs = vec![(0, 0), (1, 1), (2, 3), (3, 4), (4, 5)];
        let runs = alignment.coalesce(&pairs, |_| 1);
        assert_eq!(runs.len(), 2);
        assert_eq!((runs[0].start, runs[0].end, runs[0].weight), (0, 2, 2));
        assert_eq!((runs[1].start, runs[1].end, runs[1].weight), (2, 5, 3));
    }

    #[test]
    fn test_move_pass_cap_is_respected() {
        let left = Document::new("string:left", "abc\ndef\nghi");
        let right = Document::new("string:right", "ghi\ndef\nabc");

        let tool = HcsDiffTool::new(
            DiffOptions::new(
                DiffLevel::Textual,
                |document: &Document| document.lines().to_vec(),
                0,
            )
            .max_move_passes(0),
        );
        let diff = tool.compare(&left, &right);
        assert!(diff.edits.iter().all(|e| e.edit_type != EditType::Move));
    }

    #[test]
    fn test_custom_weigh_changes_alignment() {
        let left = Document::new("string:left", "abc\ndef\nghijklmn");
        let right = Document::new("string:right", "abc\nghijklmn\ndef");

        let weighted = line_diff(0).compare(&left, &right);
        let moved = weighted
            .edits
            .iter()
            .find(|e| e.edit_type == EditType::Move)
            .unwrap();
        // The heavy line stays put, the short one moves.
        assert_eq!(moved.left.as_ref().unwrap().range, range((2, 1), (3, 1)));

        let tool = HcsDiffTool::new(
            DiffOptions::new(
                DiffLevel::Textual,
                |document: &Document| document.lines().to_vec(),
                0,
            )
            .weigh(|_| 1),
        );
        let unweighted = tool.compare(&left, &right);
        assert_eq!(
            unweighted
                .edits
                .iter()
                .filter(|e| e.edit_type == EditType::Move)
                .count(),
            1
        );
    }
}
