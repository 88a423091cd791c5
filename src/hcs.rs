//! Heaviest Common Subsequence solver.
//!
//! The heaviest common subsequence of two sequences is the order-preserving
//! pairing of equal items that maximizes the total weight of the paired items.
//! With a uniform weight of `1` it is the classic longest common subsequence.
//!
//! The solver fills the `(left + 1) x (right + 1)` dynamic programming grid
//! one row at a time, keeping only the previous row. Rows run along the
//! shorter input, so the frontier is `O(min(left, right))` cells. Each cell
//! holds the best partial alignment found so far as a shared, persistent list
//! of pairs, so extending or copying a cell is `O(1)`.
//!
//! # Tie-breaking
//!
//! When neither neighbor can be extended by a match, the heavier neighbor
//! wins. On equal weight the neighbor holding *fewer* pairs wins. Remaining
//! ties compare the two alignments pair by pair from their last pair: the
//! smaller paired content wins, then the smaller `left + right` position sum,
//! then the smaller `|left - right|` distance. None of these keys change when
//! the inputs are swapped, so `HCS(right, left)` pairs the same items as
//! `HCS(left, right)` with each pair mirrored. Only alignments that agree on
//! every key fall back to the neighbor that skips the left item.
//!
//! # Examples
//!
//! ```
//! use hcsdiff::hcs::heaviest_common_subsequence;
//!
//! let left: Vec<char> = "XMJYAUZ".chars().collect();
//! let right: Vec<char> = "MZJAWXU".chars().collect();
//!
//! let result = heaviest_common_subsequence(|a, b| a == b, |_| 1, &left, &right);
//! let matched: String = result.left_indices().map(|i| left[i]).collect();
//! assert_eq!(matched, "MJAU");
//! assert_eq!(result.weight, 4);
//! ```

use crate::model::Weight;
use std::cmp::Ordering;
use std::rc::Rc;

/// The heaviest common subsequence as index pairs into the two inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HcsResult {
    /// Total weight of the paired items
    pub weight: Weight,
    /// `(left index, right index)` pairs, strictly increasing on both sides
    pub pairs: Vec<(usize, usize)>,
}

impl HcsResult {
    /// Number of paired items.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn left_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.pairs.iter().map(|&(left, _)| left)
    }

    pub fn right_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.pairs.iter().map(|&(_, right)| right)
    }
}

struct Link {
    pair: (usize, usize),
    prev: Option<Rc<Link>>,
}

// Long alignments form long chains; unlink them iteratively.
impl Drop for Link {
    fn drop(&mut self) {
        let mut prev = self.prev.take();
        while let Some(link) = prev {
            match Rc::try_unwrap(link) {
                Ok(mut inner) => prev = inner.prev.take(),
                Err(_) => break,
            }
        }
    }
}

#[derive(Clone, Default)]
struct Cell {
    weight: Weight,
    len: usize,
    last: Option<Rc<Link>>,
}

impl Cell {
    fn extend(&self, pair: (usize, usize), weight: Weight) -> Cell {
        Cell {
            weight: self.weight + weight,
            len: self.len + 1,
            last: Some(Rc::new(Link {
                pair,
                prev: self.last.clone(),
            })),
        }
    }

    fn into_result(self) -> HcsResult {
        let mut pairs = Vec::with_capacity(self.len);
        let mut cursor = self.last.as_deref();
        while let Some(link) = cursor {
            pairs.push(link.pair);
            cursor = link.prev.as_deref();
        }
        pairs.reverse();

        HcsResult {
            weight: self.weight,
            pairs,
        }
    }
}

/// Orders two equally long alignments by their pairs, last pair first.
///
/// Chains that meet at a shared link have identical prefixes from there on.
fn compare_chains<P>(a: &Cell, b: &Cell, pair_order: &P) -> Ordering
where
    P: Fn((usize, usize), (usize, usize)) -> Ordering,
{
    let mut a = a.last.as_ref();
    let mut b = b.last.as_ref();
    loop {
        match (a, b) {
            (Some(x), Some(y)) => {
                if Rc::ptr_eq(x, y) {
                    return Ordering::Equal;
                }
                let ordering = pair_order(x.pair, y.pair);
                if ordering != Ordering::Equal {
                    return ordering;
                }
                a = x.prev.as_ref();
                b = y.prev.as_ref();
            }
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
        }
    }
}

/// Picks the better of two cells; `preferred` wins a complete tie.
fn better<'c, P>(preferred: &'c Cell, other: &'c Cell, pair_order: &P) -> &'c Cell
where
    P: Fn((usize, usize), (usize, usize)) -> Ordering,
{
    let other_wins = other
        .weight
        .cmp(&preferred.weight)
        .then(preferred.len.cmp(&other.len))
        .then_with(|| compare_chains(preferred, other, pair_order));
    if other_wins == Ordering::Greater {
        other
    } else {
        preferred
    }
}

/// Computes the heaviest common subsequence of `left` and `right`.
///
/// `equals` decides whether two items may be paired and `weigh` gives the
/// weight a pair contributes (the weight of its left item). Empty inputs
/// yield an empty, zero-weight result. Ties are broken with the items'
/// natural order; see [`heaviest_common_subsequence_by`].
///
/// Runs in `O(left.len() * right.len())` time.
pub fn heaviest_common_subsequence<T, E, W>(
    equals: E,
    weigh: W,
    left: &[T],
    right: &[T],
) -> HcsResult
where
    T: Ord,
    E: Fn(&T, &T) -> bool,
    W: Fn(&T) -> Weight,
{
    heaviest_common_subsequence_by(equals, weigh, Ord::cmp, left, right)
}

/// Like [`heaviest_common_subsequence`], with `order` ranking item contents
/// when two alignments tie on weight and length.
///
/// The result is mirrored under swapped inputs as long as `equals` is
/// symmetric and equal items weigh the same.
pub fn heaviest_common_subsequence_by<T, E, W, O>(
    equals: E,
    weigh: W,
    order: O,
    left: &[T],
    right: &[T],
) -> HcsResult
where
    E: Fn(&T, &T) -> bool,
    W: Fn(&T) -> Weight,
    O: Fn(&T, &T) -> Ordering,
{
    if left.is_empty() || right.is_empty() {
        return HcsResult::default();
    }

    let sides = |(l, r): (usize, usize)| {
        let (a, b) = (&left[l], &right[r]);
        if order(a, b) == Ordering::Greater {
            (b, a)
        } else {
            (a, b)
        }
    };
    let pair_order = |p: (usize, usize), q: (usize, usize)| {
        let (p_low, p_high) = sides(p);
        let (q_low, q_high) = sides(q);
        order(p_low, q_low)
            .then_with(|| order(p_high, q_high))
            .then((p.0 + p.1).cmp(&(q.0 + q.1)))
            .then(p.0.abs_diff(p.1).cmp(&q.0.abs_diff(q.1)))
    };

    // Rows run along the shorter input.
    let transposed = right.len() < left.len();
    let (width, height) = if transposed {
        (right.len(), left.len())
    } else {
        (left.len(), right.len())
    };

    let mut previous = vec![Cell::default(); width + 1];
    for row in 1..=height {
        let mut current = Vec::with_capacity(width + 1);
        current.push(Cell::default());

        for column in 1..=width {
            let (l, r) = if transposed {
                (row - 1, column - 1)
            } else {
                (column - 1, row - 1)
            };

            let cell = if equals(&left[l], &right[r]) {
                previous[column - 1].extend((l, r), weigh(&left[l]))
            } else {
                let skip_column = &current[column - 1];
                let skip_row = &previous[column];
                let (skip_left, skip_right) = if transposed {
                    (skip_row, skip_column)
                } else {
                    (skip_column, skip_row)
                };
                better(skip_left, skip_right, &pair_order).clone()
            };
            current.push(cell);
        }

        previous = current;
    }

    previous.pop().unwrap_or_default().into_result()
}
