//! Linear algebra backend abstraction.
//!
//! ## Purpose
//!
//! This module provides a trait-based abstraction over the dense linear
//! algebra the estimators and the comparator need: matrix inversion for
//! precision matrices, batched products for whitening and for all-pairs
//! inner products, and a fast dot product.
//!
//! ## Design notes
//!
//! * Uses QR decomposition (Householder reflections) for inversion, with a
//!   pseudo-inverse fallback for rank-deficient matrices.
//! * Batched products go through nalgebra so the M×K grid is one matrix product.
//! * `f64` dot products use `wide` SIMD lanes; `f32` uses the scalar path.
//! * All buffers are row-major; conversion to nalgebra's column-major storage
//!   happens at the boundary.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use core::fmt::Debug;
use num_traits::Float;
use wide::f64x2;

// ============================================================================
// FloatLinalg Trait
// ============================================================================

/// Helper trait to bridge generic Float types to the nalgebra backend.
pub trait FloatLinalg: Float + Debug + Send + Sync + 'static {
    /// Invert a row-major `n × n` matrix.
    fn invert(a: &[Self], n: usize) -> Option<Vec<Self>>;
    /// Pseudo-inverse of a row-major `n × n` matrix.
    fn pseudo_invert(a: &[Self], n: usize) -> Option<Vec<Self>>;
    /// Row-major product of `a` (`rows × inner`) and `b` (`inner × cols`).
    fn matmul(a: &[Self], b: &[Self], rows: usize, inner: usize, cols: usize) -> Vec<Self>;
    /// Inner products of every row of `a` with every row of `b` (both `len` wide).
    fn cross_products(a: &[Self], b: &[Self], len: usize) -> Vec<Self>;
    /// Dot product of two equal-length slices.
    fn dot(a: &[Self], b: &[Self]) -> Self;
}

impl FloatLinalg for f64 {
    #[inline]
    fn invert(a: &[Self], n: usize) -> Option<Vec<Self>> {
        nalgebra_backend::invert(a, n, f64::EPSILON * 100.0)
    }
    #[inline]
    fn pseudo_invert(a: &[Self], n: usize) -> Option<Vec<Self>> {
        nalgebra_backend::pseudo_invert(a, n, f64::EPSILON * 100.0)
    }
    #[inline]
    fn matmul(a: &[Self], b: &[Self], rows: usize, inner: usize, cols: usize) -> Vec<Self> {
        nalgebra_backend::matmul(a, b, rows, inner, cols)
    }
    #[inline]
    fn cross_products(a: &[Self], b: &[Self], len: usize) -> Vec<Self> {
        nalgebra_backend::cross_products(a, b, len)
    }
    #[inline]
    fn dot(a: &[Self], b: &[Self]) -> Self {
        dot_simd(a, b)
    }
}

impl FloatLinalg for f32 {
    #[inline]
    fn invert(a: &[Self], n: usize) -> Option<Vec<Self>> {
        nalgebra_backend::invert(a, n, f32::EPSILON * 100.0)
    }
    #[inline]
    fn pseudo_invert(a: &[Self], n: usize) -> Option<Vec<Self>> {
        nalgebra_backend::pseudo_invert(a, n, f32::EPSILON * 100.0)
    }
    #[inline]
    fn matmul(a: &[Self], b: &[Self], rows: usize, inner: usize, cols: usize) -> Vec<Self> {
        nalgebra_backend::matmul(a, b, rows, inner, cols)
    }
    #[inline]
    fn cross_products(a: &[Self], b: &[Self], len: usize) -> Vec<Self> {
        nalgebra_backend::cross_products(a, b, len)
    }
    #[inline]
    fn dot(a: &[Self], b: &[Self]) -> Self {
        dot_scalar(a, b)
    }
}

// ============================================================================
// Dot Products
// ============================================================================

/// Scalar dot product.
#[inline]
pub fn dot_scalar<T: Float>(a: &[T], b: &[T]) -> T {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .fold(T::zero(), |acc, (&x, &y)| acc + x * y)
}

/// Dot product using two-lane SIMD accumulation.
#[inline]
pub fn dot_simd(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    let n = a.len();
    let mut acc = f64x2::splat(0.0);
    let mut i = 0;

    // Process 2 elements at a time (f64x2)
    while i + 2 <= n {
        let va = f64x2::new([a[i], a[i + 1]]);
        let vb = f64x2::new([b[i], b[i + 1]]);
        acc += va * vb;
        i += 2;
    }

    let mut sum = acc.reduce_add();
    // Remainder
    while i < n {
        sum += a[i] * b[i];
        i += 1;
    }
    sum
}

// ============================================================================
// Nalgebra Backend Implementation
// ============================================================================

/// Nalgebra-based linear algebra operations.
pub mod nalgebra_backend {
    use super::*;
    use nalgebra::{DMatrix, RealField};

    fn to_row_major<T: RealField + Copy>(m: &DMatrix<T>) -> Vec<T> {
        let (rows, cols) = m.shape();
        let mut out = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                out.push(m[(i, j)]);
            }
        }
        out
    }

    /// Invert a row-major square matrix via QR.
    ///
    /// Returns `None` when `R` has a diagonal entry below `eps` relative to
    /// its largest one (numerically singular).
    pub fn invert<T: RealField + Copy>(a: &[T], n: usize, eps: T) -> Option<Vec<T>> {
        let qr = DMatrix::from_row_slice(n, n, a).qr();
        let diag = qr.r().diagonal();
        // Compare squares to stay clear of sign handling
        let largest = diag
            .iter()
            .fold(T::zero(), |acc, &v| if v * v > acc { v * v } else { acc });
        if diag.iter().any(|&v| v * v <= largest * eps * eps) {
            return None;
        }

        let identity = DMatrix::identity(n, n);
        qr.solve(&identity).map(|inv| to_row_major(&inv))
    }

    /// Moore-Penrose pseudo-inverse of a row-major square matrix.
    pub fn pseudo_invert<T: RealField + Copy>(a: &[T], n: usize, eps: T) -> Option<Vec<T>> {
        DMatrix::from_row_slice(n, n, a)
            .pseudo_inverse(eps)
            .ok()
            .map(|inv| to_row_major(&inv))
    }

    /// Row-major matrix product.
    pub fn matmul<T: RealField + Copy>(
        a: &[T],
        b: &[T],
        rows: usize,
        inner: usize,
        cols: usize,
    ) -> Vec<T> {
        let ma = DMatrix::from_row_slice(rows, inner, a);
        let mb = DMatrix::from_row_slice(inner, cols, b);
        to_row_major(&(ma * mb))
    }

    /// All-pairs row inner products, `A · Bᵀ`.
    pub fn cross_products<T: RealField + Copy>(a: &[T], b: &[T], len: usize) -> Vec<T> {
        let ma = DMatrix::from_row_slice(a.len() / len, len, a);
        let mb = DMatrix::from_row_slice(b.len() / len, len, b);
        to_row_major(&(ma * mb.transpose()))
    }
}
