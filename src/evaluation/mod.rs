//! Layer 6: Evaluation
//!
//! # Purpose
//!
//! This layer scores the similarity between sets of RDMs. Every metric
//! returns `1 - similarity`, so identical RDMs score 0.
//!
//! # Architecture
//!
//! ```text
//! Layer 7: API
//!   ↓
//! Layer 6: Evaluation ← You are here
//!   ↓
//! Layer 5: Algorithms
//!   ↓
//! Layer 4: Data
//!   ↓
//! Layer 3: Engine
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// All-pairs RDM comparison.
pub mod compare;
