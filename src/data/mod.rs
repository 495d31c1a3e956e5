//! Layer 4: Data
//!
//! # Purpose
//!
//! This layer holds the two containers the algorithms exchange:
//! - `Dataset`: raw observations × channels measurements with descriptors
//! - `Rdms`: a batch of dissimilarity matrices over a shared set of conditions
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
//! Layer 4: Data ← You are here
//!   ↓
//! Layer 3: Engine
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Measurement dataset.
pub mod dataset;

/// RDM container.
pub mod rdms;
