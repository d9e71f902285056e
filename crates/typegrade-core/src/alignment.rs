//! Word-level minimum edit distance alignment (Wagner–Fischer).
//!
//! The cost and back-pointer tables are flat `(n + 1) * (m + 1)` buffers.
//! Time and memory are both O(n * m): a 5 000 word reference against a
//! 5 000 word transcript already needs 25M cells per table. Callers that
//! accept arbitrary input should bound `n * m` first (see
//! [`cell_count`]).

use serde::{Deserialize, Serialize};

use crate::model::{AlignmentOp, AlignmentStep};

/// How a DP cell was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backpointer {
    Start,
    Match,
    Sub,
    Del,
    Ins,
}

/// Row-major 2D table over a single allocation.
struct Grid<T> {
    width: usize,
    cells: Vec<T>,
}

impl<T: Copy> Grid<T> {
    fn new(rows: usize, cols: usize, fill: T) -> Self {
        Self {
            width: cols,
            cells: vec![fill; rows * cols],
        }
    }

    fn get(&self, i: usize, j: usize) -> T {
        self.cells[i * self.width + j]
    }

    fn set(&mut self, i: usize, j: usize, value: T) {
        self.cells[i * self.width + j] = value;
    }
}

/// Per-op tallies over an alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditCounts {
    pub correct: usize,
    pub substitutions: usize,
    pub insertions: usize,
    pub deletions: usize,
}

impl EditCounts {
    /// S + I + D.
    pub fn errors(&self) -> usize {
        self.substitutions + self.insertions + self.deletions
    }

    fn record(&mut self, op: AlignmentOp) {
        match op {
            AlignmentOp::Correct => self.correct += 1,
            AlignmentOp::Sub => self.substitutions += 1,
            AlignmentOp::Ins => self.insertions += 1,
            AlignmentOp::Del => self.deletions += 1,
        }
    }
}

/// A complete edit path between two token sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    /// Steps in left-to-right order.
    pub steps: Vec<AlignmentStep>,
    pub counts: EditCounts,
    /// Minimum edit distance, equal to `counts.errors()`.
    pub distance: usize,
}

/// Number of cells each DP table needs for the given token counts.
pub fn cell_count(reference_len: usize, typed_len: usize) -> usize {
    reference_len.saturating_add(1).saturating_mul(typed_len.saturating_add(1))
}

/// Align `typed` against `reference` with unit costs.
///
/// When several operations reach the same minimum cost the cell records
/// substitution first, then deletion, then insertion. Token comparison is
/// exact and case-sensitive.
pub fn align<R, T>(reference: &[R], typed: &[T]) -> Alignment
where
    R: AsRef<str>,
    T: AsRef<str>,
{
    let n = reference.len();
    let m = typed.len();

    let mut cost = Grid::new(n + 1, m + 1, 0usize);
    let mut back = Grid::new(n + 1, m + 1, Backpointer::Start);

    for i in 1..=n {
        cost.set(i, 0, i);
        back.set(i, 0, Backpointer::Del);
    }
    for j in 1..=m {
        cost.set(0, j, j);
        back.set(0, j, Backpointer::Ins);
    }

    for i in 1..=n {
        let ref_token = reference[i - 1].as_ref();
        for j in 1..=m {
            if ref_token == typed[j - 1].as_ref() {
                cost.set(i, j, cost.get(i - 1, j - 1));
                back.set(i, j, Backpointer::Match);
                continue;
            }

            let del_cost = cost.get(i - 1, j) + 1;
            let ins_cost = cost.get(i, j - 1) + 1;
            let sub_cost = cost.get(i - 1, j - 1) + 1;
            let min_cost = sub_cost.min(del_cost).min(ins_cost);

            let pointer = if min_cost == sub_cost {
                Backpointer::Sub
            } else if min_cost == del_cost {
                Backpointer::Del
            } else {
                Backpointer::Ins
            };
            cost.set(i, j, min_cost);
            back.set(i, j, pointer);
        }
    }

    let mut steps = Vec::with_capacity(n.max(m));
    let mut counts = EditCounts::default();
    let (mut i, mut j) = (n, m);
    while i > 0 || j > 0 {
        let step = match back.get(i, j) {
            Backpointer::Match => {
                let step = AlignmentStep::correct(reference[i - 1].as_ref());
                i -= 1;
                j -= 1;
                step
            }
            Backpointer::Sub => {
                let step = AlignmentStep::sub(reference[i - 1].as_ref(), typed[j - 1].as_ref());
                i -= 1;
                j -= 1;
                step
            }
            Backpointer::Del => {
                let step = AlignmentStep::del(reference[i - 1].as_ref());
                i -= 1;
                step
            }
            Backpointer::Ins => {
                let step = AlignmentStep::ins(typed[j - 1].as_ref());
                j -= 1;
                step
            }
            // Only (0, 0) holds Start, and the loop exits before reaching it.
            Backpointer::Start => break,
        };
        counts.record(step.op);
        steps.push(step);
    }
    steps.reverse();

    Alignment {
        steps,
        counts,
        distance: cost.get(n, m),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(s: &str) -> Vec<&str> {
        s.split_whitespace().collect()
    }

    fn ops(alignment: &Alignment) -> Vec<AlignmentOp> {
        alignment.steps.iter().map(|s| s.op).collect()
    }

    #[test]
    fn deletion_in_the_middle() {
        let a = align(&words("o gato preto dormiu"), &words("o gato dormiu"));
        assert_eq!(
            a.steps,
            vec![
                AlignmentStep::correct("o"),
                AlignmentStep::correct("gato"),
                AlignmentStep::del("preto"),
                AlignmentStep::correct("dormiu"),
            ]
        );
        assert_eq!(a.distance, 1);
        assert_eq!(a.counts.deletions, 1);
        assert_eq!(a.counts.correct, 3);
    }

    #[test]
    fn both_empty_gives_empty_path() {
        let empty: Vec<&str> = Vec::new();
        let a = align(&empty, &empty);
        assert!(a.steps.is_empty());
        assert_eq!(a.distance, 0);
    }

    #[test]
    fn empty_typed_is_all_deletions() {
        let empty: Vec<&str> = Vec::new();
        let a = align(&words("um dois três"), &empty);
        assert_eq!(ops(&a), vec![AlignmentOp::Del; 3]);
        assert_eq!(a.counts.deletions, 3);
    }

    #[test]
    fn empty_reference_is_all_insertions() {
        let empty: Vec<&str> = Vec::new();
        let a = align(&empty, &words("um dois"));
        assert_eq!(ops(&a), vec![AlignmentOp::Ins; 2]);
        assert_eq!(a.steps[0].typed_word.as_deref(), Some("um"));
        assert!(a.steps[0].ref_word.is_none());
    }

    #[test]
    fn substitution_wins_tie_against_deletion() {
        // Both "del a, sub b->c" and "sub a->c, del b" cost 2.
        let a = align(&["a", "b"], &["c"]);
        assert_eq!(a.steps, vec![AlignmentStep::del("a"), AlignmentStep::sub("b", "c")]);
    }

    #[test]
    fn substitution_wins_tie_against_insertion() {
        let a = align(&["a"], &["b", "c"]);
        assert_eq!(a.steps, vec![AlignmentStep::ins("b"), AlignmentStep::sub("a", "c")]);
    }

    #[test]
    fn deletion_wins_tie_against_insertion() {
        let a = align(&["a", "b", "a"], &["b", "a", "b"]);
        assert_eq!(
            a.steps,
            vec![
                AlignmentStep::ins("b"),
                AlignmentStep::correct("a"),
                AlignmentStep::correct("b"),
                AlignmentStep::del("a"),
            ]
        );
    }

    #[test]
    fn tie_break_is_reproducible() {
        let reference = words("x y z x y");
        let typed = words("y z x q y x");
        let first = align(&reference, &typed);
        for _ in 0..10 {
            assert_eq!(align(&reference, &typed), first);
        }
    }

    #[test]
    fn comparison_is_case_sensitive() {
        let a = align(&["Energia"], &["energia"]);
        assert_eq!(ops(&a), vec![AlignmentOp::Sub]);
    }

    #[test]
    fn every_token_is_consumed_exactly_once() {
        let reference = words("a rapida raposa castanha salta sobre o cao");
        let typed = words("a rapida rapoza salta salta sobre cao preguiçoso");
        let a = align(&reference, &typed);

        let refs: Vec<&str> = a.steps.iter().filter_map(|s| s.ref_word.as_deref()).collect();
        let typed_back: Vec<&str> = a.steps.iter().filter_map(|s| s.typed_word.as_deref()).collect();
        assert_eq!(refs, reference);
        assert_eq!(typed_back, typed);
        assert_eq!(a.counts.errors(), a.distance);
        assert!(a.steps.len() >= reference.len().max(typed.len()));
        assert!(a.steps.len() <= reference.len() + typed.len());
    }

    #[test]
    fn cell_count_saturates() {
        assert_eq!(cell_count(3, 4), 20);
        assert_eq!(cell_count(usize::MAX, 2), usize::MAX);
    }
}
