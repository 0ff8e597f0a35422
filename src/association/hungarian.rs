//! Hungarian (Munkres) algorithm for optimal assignment
//!
//! Finds a minimum-total-cost one-to-one matching between the rows and
//! columns of a rectangular cost matrix. Rectangular inputs are padded to a
//! square matrix with a constant value, which leaves the optimal matching of
//! the real rows and columns unchanged.

use ndarray::Array2;

use crate::error::AssignmentError;

/// Hungarian algorithm result
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Matched `(row, col)` pairs, ordered by row
    pub pairs: Vec<(usize, usize)>,
    /// Total cost of the matched pairs
    pub cost: f64,
}

impl Assignment {
    fn empty() -> Self {
        Self {
            pairs: Vec::new(),
            cost: 0.0,
        }
    }

    /// Column matched to `row`, if any
    pub fn col_for_row(&self, row: usize) -> Option<usize> {
        self.pairs.iter().find(|&&(r, _)| r == row).map(|&(_, c)| c)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    None,
    Star,
    Prime,
}

#[derive(Debug, Clone, Copy)]
enum Step {
    CoverStarredColumns,
    PrimeZeros,
    Augment(usize, usize),
    AdjustWeights,
    Done,
}

/// Hungarian algorithm for optimal assignment
///
/// Every row is matched to at most one column and vice versa; exactly
/// `min(nrows, ncols)` pairs are returned. Zero rows or zero columns give an
/// empty assignment.
///
/// # Arguments
/// * `cost` - Cost matrix (MxN), all entries finite
pub fn hungarian(cost: &Array2<f64>) -> Result<Assignment, AssignmentError> {
    let (m, n) = cost.dim();
    if m == 0 || n == 0 {
        return Ok(Assignment::empty());
    }

    let mut pmax = f64::NEG_INFINITY;
    for ((row, col), &val) in cost.indexed_iter() {
        if !val.is_finite() {
            return Err(AssignmentError::NonFiniteCost { row, col });
        }
        pmax = pmax.max(val);
    }

    // Pad to square with the largest cost
    let size = m.max(n);
    let mut work = Array2::from_elem((size, size), pmax);
    work.slice_mut(ndarray::s![..m, ..n]).assign(cost);

    let marks = solve(&mut work);

    let mut pairs = Vec::with_capacity(m.min(n));
    let mut total = 0.0;
    for i in 0..m {
        for j in 0..n {
            if marks[(i, j)] == Mark::Star {
                pairs.push((i, j));
                total += cost[(i, j)];
            }
        }
    }

    Ok(Assignment { pairs, cost: total })
}

/// Main Hungarian algorithm loop over a square matrix
fn solve(work: &mut Array2<f64>) -> Array2<Mark> {
    let size = work.nrows();

    subtract_row_minimums(work);
    let mut marks = star_initial_zeros(work);
    let mut row_cov = vec![false; size];
    let mut col_cov = vec![false; size];

    let mut step = Step::CoverStarredColumns;
    loop {
        step = match step {
            Step::CoverStarredColumns => cover_starred_columns(&marks, &mut col_cov),
            Step::PrimeZeros => prime_zeros(work, &mut marks, &mut row_cov, &mut col_cov),
            Step::Augment(r, c) => augment(&mut marks, r, c, &mut row_cov, &mut col_cov),
            Step::AdjustWeights => adjust_weights(work, &row_cov, &col_cov),
            Step::Done => break,
        };
    }

    marks
}

/// Step 1: Subtract row minimums
fn subtract_row_minimums(work: &mut Array2<f64>) {
    for mut row in work.rows_mut() {
        let row_min = row.iter().cloned().fold(f64::INFINITY, f64::min);
        row.mapv_inplace(|v| v - row_min);
    }
}

/// Step 2: Star a zero in every row and column where possible
fn star_initial_zeros(work: &Array2<f64>) -> Array2<Mark> {
    let size = work.nrows();
    let mut marks = Array2::from_elem((size, size), Mark::None);
    let mut row_used = vec![false; size];
    let mut col_used = vec![false; size];

    for i in 0..size {
        for j in 0..size {
            if work[(i, j)] == 0.0 && !row_used[i] && !col_used[j] {
                marks[(i, j)] = Mark::Star;
                row_used[i] = true;
                col_used[j] = true;
            }
        }
    }

    marks
}

/// Step 3: Cover columns with starred zeros
fn cover_starred_columns(marks: &Array2<Mark>, col_cov: &mut [bool]) -> Step {
    for (j, column) in marks.columns().into_iter().enumerate() {
        if column.iter().any(|&m| m == Mark::Star) {
            col_cov[j] = true;
        }
    }

    if col_cov.iter().all(|&c| c) {
        Step::Done
    } else {
        Step::PrimeZeros
    }
}

/// Step 4: Find uncovered zeros and prime them
fn prime_zeros(
    work: &Array2<f64>,
    marks: &mut Array2<Mark>,
    row_cov: &mut [bool],
    col_cov: &mut [bool],
) -> Step {
    let size = work.nrows();

    loop {
        let uncovered_zero = (0..size)
            .filter(|&i| !row_cov[i])
            .flat_map(|i| (0..size).map(move |j| (i, j)))
            .find(|&(i, j)| !col_cov[j] && work[(i, j)] == 0.0);

        let Some((r, c)) = uncovered_zero else {
            return Step::AdjustWeights;
        };

        marks[(r, c)] = Mark::Prime;

        match (0..size).find(|&j| marks[(r, j)] == Mark::Star) {
            Some(star_col) => {
                row_cov[r] = true;
                col_cov[star_col] = false;
            }
            None => return Step::Augment(r, c),
        }
    }
}

/// Step 5: Augment matching along the alternating prime/star path
fn augment(
    marks: &mut Array2<Mark>,
    z_r: usize,
    z_c: usize,
    row_cov: &mut [bool],
    col_cov: &mut [bool],
) -> Step {
    let size = marks.nrows();
    let mut path = vec![(z_r, z_c)];

    loop {
        let (_, last_col) = path[path.len() - 1];
        let Some(star_row) = (0..size).find(|&i| marks[(i, last_col)] == Mark::Star) else {
            break;
        };
        path.push((star_row, last_col));

        // A starred zero on the path always has a primed zero in its row
        let Some(prime_col) = (0..size).find(|&j| marks[(star_row, j)] == Mark::Prime) else {
            break;
        };
        path.push((star_row, prime_col));
    }

    for &(i, j) in &path {
        marks[(i, j)] = if marks[(i, j)] == Mark::Star {
            Mark::None
        } else {
            Mark::Star
        };
    }

    row_cov.fill(false);
    col_cov.fill(false);
    marks.mapv_inplace(|m| if m == Mark::Prime { Mark::None } else { m });

    Step::CoverStarredColumns
}

/// Step 6: Add minimum to covered rows, subtract from uncovered columns
fn adjust_weights(work: &mut Array2<f64>, row_cov: &[bool], col_cov: &[bool]) -> Step {
    let size = work.nrows();

    let mut minval = f64::INFINITY;
    for i in (0..size).filter(|&i| !row_cov[i]) {
        for j in (0..size).filter(|&j| !col_cov[j]) {
            minval = minval.min(work[(i, j)]);
        }
    }

    for i in 0..size {
        for j in 0..size {
            if row_cov[i] {
                work[(i, j)] += minval;
            }
            if !col_cov[j] {
                work[(i, j)] -= minval;
            }
        }
    }

    Step::PrimeZeros
}
