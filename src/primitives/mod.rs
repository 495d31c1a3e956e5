//! Layer 1: Primitives
//!
//! # Purpose
//!
//! This layer provides the data structures every other layer builds on:
//! - The crate error type and its taxonomy
//! - Descriptor values and insertion-ordered descriptor maps
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
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives ← You are here
//! ```

/// Error type and error taxonomy.
pub mod errors;

/// Descriptor values and ordered descriptor maps.
pub mod descriptors;
