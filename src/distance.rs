//! Bounded distance engine — segment-aware Levenshtein with early exit.
//!
//! The matrix is indexed by code points of the two titles but filled one
//! segment pair at a time. Same-category words and digit runs substitute for
//! each other at no cost; bracket pairs are compared child by child.

use tracing::trace;

use crate::consumer::segment;
use crate::context::{resolve, Resolved};
use crate::error::ParseError;
use crate::segment::{Bracket, Segments};

/// Levenshtein cost matrix of size `(rows) x (cols)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<usize>,
}

impl DistanceMatrix {
    /// Row 0 holds the column index and column 0 the row index; all other
    /// cells start at 0 until filled.
    fn new(rows: usize, cols: usize) -> Self {
        let mut cells = vec![0; rows * cols];
        for (x, cell) in cells.iter_mut().take(cols).enumerate() {
            *cell = x;
        }
        for (y, cell) in cells.iter_mut().step_by(cols.max(1)).enumerate() {
            *cell = y;
        }
        Self { rows, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, y: usize, x: usize) -> usize {
        self.cells[y * self.cols + x]
    }

    pub fn row(&self, y: usize) -> &[usize] {
        &self.cells[y * self.cols..(y + 1) * self.cols]
    }

    /// Bottom-right cell: the distance once the matrix is complete.
    pub fn final_cost(&self) -> usize {
        self.cells[self.cells.len() - 1]
    }

    fn set(&mut self, y: usize, x: usize, cost: usize) {
        self.cells[y * self.cols + x] = cost;
    }
}

/// Outcome of [`within_threshold`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub within: bool,
    /// Partial when the comparison stopped early.
    pub matrix: DistanceMatrix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Substitution {
    /// Per character pair, 0 if equal else 1.
    PerCharacter,
    /// The block's top-left corner cost for every cell.
    Fixed,
}

/// Fill the block spanned by `ys` x `xs` whose first cell is `(sy, sx)`.
fn fill_block(m: &mut DistanceMatrix, ys: &str, xs: &str, sy: usize, sx: usize, sub: Substitution) {
    let corner = m.get(sy - 1, sx - 1);
    let xs: Vec<char> = xs.chars().collect();

    for (iy, yc) in ys.chars().enumerate() {
        let y = sy + iy;
        for (ix, xc) in xs.iter().enumerate() {
            let x = sx + ix;
            let ins = m.get(y, x - 1) + 1;
            let del = m.get(y - 1, x) + 1;
            let rep = match sub {
                Substitution::Fixed => corner,
                Substitution::PerCharacter => m.get(y - 1, x - 1) + usize::from(yc != *xc),
            };
            m.set(y, x, ins.min(del).min(rep));
        }
    }
}

/// Fill the block of segment `i` of `a` against segment `j` of `b`.
fn fill_pair(m: &mut DistanceMatrix, a: &Segments, i: usize, b: &Segments, j: usize, y: usize, x: usize) {
    let (ys, xs) = (a[i].value(), b[j].value());
    match (resolve(a, i), resolve(b, j)) {
        (Resolved::Word(c1), Resolved::Word(c2)) if c1 == c2 => {
            fill_block(m, ys, xs, y, x, Substitution::Fixed)
        }
        (Resolved::Digit, Resolved::Digit) => fill_block(m, ys, xs, y, x, Substitution::Fixed),
        (Resolved::Bracket(p), Resolved::Bracket(q)) => fill_brackets(m, p, q, y, x),
        _ => fill_block(m, ys, xs, y, x, Substitution::PerCharacter),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Open,
    Child(usize),
    Close,
}

/// One axis slice of a bracket block: a delimiter or a child segment.
struct Part<'a> {
    value: &'a str,
    len: usize,
    slot: Slot,
}

fn parts(bracket: &Bracket) -> Vec<Part<'_>> {
    let mut parts = vec![Part {
        value: &bracket.open,
        len: bracket.open.chars().count(),
        slot: Slot::Open,
    }];
    parts.extend(bracket.children.iter().enumerate().map(|(i, s)| Part {
        value: s.value(),
        len: s.len(),
        slot: Slot::Child(i),
    }));
    if !bracket.close.is_empty() {
        parts.push(Part {
            value: &bracket.close,
            len: bracket.close.chars().count(),
            slot: Slot::Close,
        });
    }
    parts
}

fn fill_brackets(m: &mut DistanceMatrix, p: &Bracket, q: &Bracket, y: usize, x: usize) {
    let cols = parts(q);
    let mut py = y;
    for row in parts(p) {
        let mut px = x;
        for col in &cols {
            match (row.slot, col.slot) {
                (Slot::Child(i), Slot::Child(j)) => fill_pair(m, &p.children, i, &q.children, j, py, px),
                // "(" and "（" are the same delimiter for comparison
                (Slot::Open, Slot::Open) | (Slot::Close, Slot::Close) => {
                    fill_block(m, row.value, col.value, py, px, Substitution::Fixed)
                }
                _ => fill_block(m, row.value, col.value, py, px, Substitution::PerCharacter),
            }
            px += col.len;
        }
        py += row.len;
    }
}

fn run(a: &Segments, b: &Segments, max_cost: Option<usize>) -> Verdict {
    let mut matrix = DistanceMatrix::new(a.char_len() + 1, b.char_len() + 1);

    let mut y = 1;
    for i in 0..a.len() {
        let mut x = 1;
        for j in 0..b.len() {
            fill_pair(&mut matrix, a, i, b, j, y, x);
            x += b[j].len();
        }
        y += a[i].len();

        // Every path to the bottom-right cell crosses the last row of this
        // band, and costs never decrease along a path.
        if let Some(max_cost) = max_cost {
            let frontier = matrix.row(y - 1).iter().filter(|&&c| c <= max_cost).count();
            if frontier == 0 {
                trace!(row = y - 1, max_cost, "distance exceeds threshold, stopping early");
                return Verdict {
                    within: false,
                    matrix,
                };
            }
        }
    }

    let within = max_cost.map_or(true, |t| matrix.final_cost() <= t);
    Verdict { within, matrix }
}

/// Whether the distance between `a` and `b` is at most `max_cost`.
///
/// The check runs once per segment of `a`, after that segment's whole row
/// band is filled, rather than cell by cell: the comparison stops as soon as
/// no cell in the last row of a completed band is within `max_cost`. The
/// returned matrix is then partial, filled up to and including that band;
/// the verdict is the same as for a full computation.
pub fn within_threshold(a: &Segments, b: &Segments, max_cost: usize) -> Verdict {
    run(a, b, Some(max_cost))
}

/// Full segment-aware distance between `a` and `b`, without early exit.
pub fn distance(a: &Segments, b: &Segments) -> usize {
    run(a, b, None).matrix.final_cost()
}

/// Segment two titles with the default rules and compare them.
pub fn titles_within_threshold(a: &str, b: &str, max_cost: usize) -> Result<bool, ParseError> {
    Ok(within_threshold(&segment(a)?, &segment(b)?, max_cost).within)
}
