//! Cost matrix construction and gated assignment.
//!
//! Rows are live tracks (their last known midpoint), columns are the current
//! frame's detections. The cost of a cell is the Euclidean displacement
//! between the two. [`gated_assignment`] solves the matrix with the Hungarian
//! algorithm and then drops every matched cell whose cost reaches the gate.

use nalgebra::Point2;
use ndarray::Array2;

use crate::error::AssignmentError;

use super::hungarian::hungarian;

/// Euclidean cost matrix between `rows` (track positions) and `cols` (detections)
pub fn build_cost_matrix(rows: &[Point2<f64>], cols: &[Point2<f64>]) -> Array2<f64> {
    Array2::from_shape_fn((rows.len(), cols.len()), |(i, j)| {
        nalgebra::distance(&rows[i], &cols[j])
    })
}

/// A single accepted or rejected cell of a gated assignment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchedCell {
    pub row: usize,
    pub col: usize,
    pub cost: f64,
}

/// Result of solving and gating a cost matrix
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GatedAssignment {
    /// Optimal matches with cost strictly below the gate
    pub accepted: Vec<MatchedCell>,
    /// Optimal matches discarded because cost >= gate
    pub rejected: Vec<MatchedCell>,
    /// Sum of all optimal matched costs before gating
    pub total_cost: f64,
}

impl GatedAssignment {
    /// Row accepted for `col`, if any
    pub fn row_for_col(&self, col: usize) -> Option<usize> {
        self.accepted.iter().find(|m| m.col == col).map(|m| m.row)
    }

    /// Number of accepted matches
    #[inline]
    pub fn num_accepted(&self) -> usize {
        self.accepted.len()
    }
}

/// Solve `cost` for the minimum-total-cost matching, then gate each match.
///
/// Gating happens after the global optimum is found, so a rejected cell
/// leaves both its row and column unmatched rather than triggering a
/// re-solve.
pub fn gated_assignment(cost: &Array2<f64>, gate: f64) -> Result<GatedAssignment, AssignmentError> {
    let assignment = hungarian(cost)?;

    let mut result = GatedAssignment {
        total_cost: assignment.cost,
        ..Default::default()
    };
    for (row, col) in assignment.pairs {
        let cell = MatchedCell {
            row,
            col,
            cost: cost[(row, col)],
        };
        if cell.cost < gate {
            result.accepted.push(cell);
        } else {
            result.rejected.push(cell);
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_matrix_shape_and_values() {
        let rows = [Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)];
        let cols = [Point2::new(3.0, 4.0), Point2::new(10.0, 0.0), Point2::new(0.0, 1.0)];
        let cost = build_cost_matrix(&rows, &cols);

        assert_eq!(cost.dim(), (2, 3));
        assert_eq!(cost[(0, 0)], 5.0);
        assert_eq!(cost[(1, 1)], 0.0);
        assert_eq!(cost[(0, 2)], 1.0);
    }

    #[test]
    fn test_gate_is_exclusive() {
        let rows = [Point2::new(0.0, 0.0)];
        let cols = [Point2::new(400.0, 0.0)];
        let result = gated_assignment(&build_cost_matrix(&rows, &cols), 400.0).unwrap();

        assert!(result.accepted.is_empty());
        assert_eq!(result.rejected.len(), 1);
        assert_eq!(result.row_for_col(0), None);
    }

    #[test]
    fn test_gating_does_not_rematch() {
        // Optimum pairs row 0 with col 1 and row 1 with col 0 (cost 1 + 500);
        // the rejected cell must not fall back to a different pairing.
        let cost = ndarray::array![[2.0, 1.0], [500.0, 600.0]];
        let result = gated_assignment(&cost, 100.0).unwrap();

        assert_eq!(result.num_accepted(), 1);
        assert_eq!(result.row_for_col(1), Some(0));
        assert_eq!(result.row_for_col(0), None);
        assert!((result.total_cost - 501.0).abs() < 1e-10);
    }
}
