//! Layer 5: Algorithms
//!
//! # Purpose
//!
//! This layer turns measurement datasets into dissimilarity matrices:
//! - Grouping observations into conditions and cross-validation folds
//! - Condition means and within-condition residuals
//! - Euclidean, Mahalanobis, correlation, and crossnobis estimators
//!
//! # Architecture
//!
//! ```text
//! Layer 7: API
//!   ↓
//! Layer 6: Evaluation
//!   ↓
//! Layer 5: Algorithms ← You are here
//!   ↓
//! Layer 4: Data
//!   ↓
//! Layer 3: Engine
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Condition grouping, means, residuals, and folds.
pub mod parse;

/// RDM estimators.
pub mod calc;
