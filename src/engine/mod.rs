//! Layer 3: Engine
//!
//! # Purpose
//!
//! This layer holds the eager input validation shared by the containers, the
//! estimators and the comparator. Every public entry point checks its inputs
//! here before doing any work, so failures surface with no partial results.
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
//! Layer 3: Engine ← You are here
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Input validation.
pub mod validator;
