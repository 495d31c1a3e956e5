//! Layer 2: Math
//!
//! # Purpose
//!
//! This layer provides pure mathematical functions used throughout the crate:
//! - Conversion between condensed vectors and full dissimilarity matrices
//! - Linear algebra backend (inversion, batched inner products)
//! - Rank transforms for rank-based statistics
//! - Covariance and precision estimation from residuals
//! - Row centering and unit-norm scaling
//!
//! These are reusable mathematical building blocks with no container-specific logic.
//!
//! # Architecture
//!
//! ```text
//! Layer 7: API
//!   ↓
//! Layer 6: Evaluation
//!   ↓
//! Layer 5: Algorithms
//!   ↓
//! Layer 4: Data
//!   ↓
//! Layer 3: Engine
//!   ↓
//! Layer 2: Math ← You are here
//!   ↓
//! Layer 1: Primitives
//! ```

/// Condensed (upper-triangle) vector and full matrix conversion.
pub mod condensed;

/// Linear algebra backend.
pub mod linalg;

/// Rank transforms with tie handling.
pub mod rank;

/// Covariance and precision estimation.
pub mod covariance;

/// Row centering and normalization.
pub mod normalize;
