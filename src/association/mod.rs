//! Track-to-detection association
//!
//! This module provides:
//! - [`builder`] - Cost matrix construction and gating
//! - [`hungarian`] - Hungarian algorithm for assignment

pub mod builder;
pub mod hungarian;

pub use builder::{build_cost_matrix, gated_assignment, GatedAssignment, MatchedCell};
pub use hungarian::{hungarian, Assignment};
