// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! SIMD-Vectorized Batch Scoring
//!
//! Computes `scores[i] = dot(features.row(i), weights)` for every candidate
//! row. Rows are processed in tiles of 8 (AVX2 + FMA) or 4 (NEON) with one
//! accumulator per row, sharing each loaded weight chunk across the whole
//! tile; leftover rows fall back to the scalar kernel.
//!
//! Accumulation order is fixed per kernel: 8-lane (or 4-lane) chunked FMA
//! over the dimension, horizontal sum, then the scalar tail added last.
//! Identical inputs therefore always produce identical outputs.

use framerank_core::{FeatureMatrix, Result, SelectError};

/// Rows per tile in the AVX2 kernel.
pub const TILE_AVX2: usize = 8;

/// Rows per tile in the NEON kernel.
pub const TILE_NEON: usize = 4;

/// Score every row of `features` against `weights`, writing into `out`.
///
/// `out` must have exactly one slot per row. The best available SIMD
/// kernel is picked at runtime; all kernels agree with the scalar one up
/// to floating-point associativity.
pub fn score_into(features: &FeatureMatrix<'_>, weights: &[f32], out: &mut [f32]) -> Result<()> {
    if weights.len() != features.dim() {
        return Err(SelectError::DimensionMismatch {
            dim: features.dim(),
            weights: weights.len(),
        });
    }
    if out.len() != features.rows() {
        return Err(SelectError::InvalidInput(format!(
            "score buffer has {} slots for {} rows",
            out.len(),
            features.rows()
        )));
    }
    score_dispatch(features, weights, out);
    Ok(())
}

fn score_dispatch(features: &FeatureMatrix<'_>, weights: &[f32], out: &mut [f32]) {
    #[cfg(target_arch = "x86_64")]
    {
        if avx2::is_available() {
            let n = features.rows();
            let dim = features.dim();
            let mut i = 0;
            while i + TILE_AVX2 <= n {
                let rows: [&[f32]; TILE_AVX2] = [
                    features.row(i),
                    features.row(i + 1),
                    features.row(i + 2),
                    features.row(i + 3),
                    features.row(i + 4),
                    features.row(i + 5),
                    features.row(i + 6),
                    features.row(i + 7),
                ];
                let sums = unsafe { avx2::dot_8x(weights, &rows, dim) };
                out[i..i + TILE_AVX2].copy_from_slice(&sums);
                i += TILE_AVX2;
            }
            for j in i..n {
                out[j] = dot_scalar(weights, features.row(j));
            }
            return;
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        if neon::is_available() {
            let n = features.rows();
            let dim = features.dim();
            let mut i = 0;
            while i + TILE_NEON <= n {
                let rows: [&[f32]; TILE_NEON] = [
                    features.row(i),
                    features.row(i + 1),
                    features.row(i + 2),
                    features.row(i + 3),
                ];
                let sums = unsafe { neon::dot_4x(weights, &rows, dim) };
                out[i..i + TILE_NEON].copy_from_slice(&sums);
                i += TILE_NEON;
            }
            for j in i..n {
                out[j] = dot_scalar(weights, features.row(j));
            }
            return;
        }
    }

    score_scalar(features, weights, out);
}

/// Scalar scoring kernel, used as the universal fallback and for tail rows.
pub fn score_scalar(features: &FeatureMatrix<'_>, weights: &[f32], out: &mut [f32]) {
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = dot_scalar(weights, features.row(i));
    }
}

#[inline]
pub(crate) fn dot_scalar(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Score rows in parallel over disjoint chunks.
///
/// Per-row math is identical to [`score_into`]'s scalar kernel, so the
/// result is deterministic regardless of how rayon splits the work. This
/// path allocates inside rayon's runtime and is therefore not used by the
/// scheduler's steady-state entry points.
#[cfg(feature = "parallel")]
pub fn score_into_parallel(
    features: &FeatureMatrix<'_>,
    weights: &[f32],
    out: &mut [f32],
) -> Result<()> {
    use rayon::prelude::*;

    if weights.len() != features.dim() {
        return Err(SelectError::DimensionMismatch {
            dim: features.dim(),
            weights: weights.len(),
        });
    }
    if out.len() != features.rows() {
        return Err(SelectError::InvalidInput(format!(
            "score buffer has {} slots for {} rows",
            out.len(),
            features.rows()
        )));
    }

    let dim = features.dim();
    if dim == 0 {
        out.fill(0.0);
        return Ok(());
    }

    const ROWS_PER_CHUNK: usize = 4096;
    let data = features.as_slice();
    out.par_chunks_mut(ROWS_PER_CHUNK)
        .zip(data.par_chunks(ROWS_PER_CHUNK * dim))
        .for_each(|(out_chunk, rows)| {
            for (slot, row) in out_chunk.iter_mut().zip(rows.chunks_exact(dim)) {
                *slot = dot_scalar(weights, row);
            }
        });
    Ok(())
}

// ============================================================================
// x86_64 AVX2 Kernel
// ============================================================================

#[cfg(target_arch = "x86_64")]
pub mod avx2 {
    use super::TILE_AVX2;

    /// Check for AVX2 + FMA at runtime.
    #[inline]
    pub fn is_available() -> bool {
        is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma")
    }

    /// Dot products of 8 rows against one weight vector.
    ///
    /// # Safety
    /// Requires AVX2 and FMA support. Use `is_available()` to check.
    /// Every row and `weights` must hold at least `dim` floats.
    #[target_feature(enable = "avx2", enable = "fma")]
    pub unsafe fn dot_8x(
        weights: &[f32],
        rows: &[&[f32]; TILE_AVX2],
        dim: usize,
    ) -> [f32; TILE_AVX2] {
        use std::arch::x86_64::*;

        let mut acc0 = _mm256_setzero_ps();
        let mut acc1 = _mm256_setzero_ps();
        let mut acc2 = _mm256_setzero_ps();
        let mut acc3 = _mm256_setzero_ps();
        let mut acc4 = _mm256_setzero_ps();
        let mut acc5 = _mm256_setzero_ps();
        let mut acc6 = _mm256_setzero_ps();
        let mut acc7 = _mm256_setzero_ps();

        let w_ptr = weights.as_ptr();
        let chunks = dim / 8;

        for i in 0..chunks {
            let d = i * 8;
            let w = _mm256_loadu_ps(w_ptr.add(d));

            macro_rules! fma_row {
                ($idx:expr, $acc:ident) => {
                    let r = _mm256_loadu_ps(rows[$idx].as_ptr().add(d));
                    $acc = _mm256_fmadd_ps(w, r, $acc);
                };
            }

            fma_row!(0, acc0);
            fma_row!(1, acc1);
            fma_row!(2, acc2);
            fma_row!(3, acc3);
            fma_row!(4, acc4);
            fma_row!(5, acc5);
            fma_row!(6, acc6);
            fma_row!(7, acc7);
        }

        let mut sums = [
            hsum_256(acc0),
            hsum_256(acc1),
            hsum_256(acc2),
            hsum_256(acc3),
            hsum_256(acc4),
            hsum_256(acc5),
            hsum_256(acc6),
            hsum_256(acc7),
        ];

        // Tail dims accumulate after the horizontal sum so each product
        // contributes exactly once.
        for d in chunks * 8..dim {
            let w_val = *weights.get_unchecked(d);
            for (i, row) in rows.iter().enumerate() {
                sums[i] += w_val * *row.get_unchecked(d);
            }
        }

        sums
    }

    /// Horizontal sum of 8 floats in a 256-bit register
    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn hsum_256(v: std::arch::x86_64::__m256) -> f32 {
        use std::arch::x86_64::*;

        // [a0,a1,a2,a3,a4,a5,a6,a7]
        let hi = _mm256_extractf128_ps(v, 1); // [a4,a5,a6,a7]
        let lo = _mm256_castps256_ps128(v); // [a0,a1,a2,a3]
        let sum128 = _mm_add_ps(lo, hi); // [a0+a4, a1+a5, a2+a6, a3+a7]
        let hi64 = _mm_movehl_ps(sum128, sum128);
        let sum64 = _mm_add_ps(sum128, hi64);
        let hi32 = _mm_shuffle_ps(sum64, sum64, 0x1);
        let sum32 = _mm_add_ss(sum64, hi32);
        _mm_cvtss_f32(sum32)
    }
}

// ============================================================================
// aarch64 NEON Kernel
// ============================================================================

#[cfg(target_arch = "aarch64")]
pub mod neon {
    use super::TILE_NEON;

    /// NEON is always available on aarch64
    #[inline]
    pub fn is_available() -> bool {
        true
    }

    /// Dot products of 4 rows against one weight vector.
    ///
    /// # Safety
    /// Every row and `weights` must hold at least `dim` floats.
    pub unsafe fn dot_4x(
        weights: &[f32],
        rows: &[&[f32]; TILE_NEON],
        dim: usize,
    ) -> [f32; TILE_NEON] {
        use std::arch::aarch64::*;

        unsafe {
            let mut acc0 = vdupq_n_f32(0.0);
            let mut acc1 = vdupq_n_f32(0.0);
            let mut acc2 = vdupq_n_f32(0.0);
            let mut acc3 = vdupq_n_f32(0.0);

            let w_ptr = weights.as_ptr();
            let chunks = dim / 4;

            for i in 0..chunks {
                let d = i * 4;
                let w = vld1q_f32(w_ptr.add(d));

                let r0 = vld1q_f32(rows[0].as_ptr().add(d));
                acc0 = vfmaq_f32(acc0, w, r0);

                let r1 = vld1q_f32(rows[1].as_ptr().add(d));
                acc1 = vfmaq_f32(acc1, w, r1);

                let r2 = vld1q_f32(rows[2].as_ptr().add(d));
                acc2 = vfmaq_f32(acc2, w, r2);

                let r3 = vld1q_f32(rows[3].as_ptr().add(d));
                acc3 = vfmaq_f32(acc3, w, r3);
            }

            let mut sums = [
                vaddvq_f32(acc0),
                vaddvq_f32(acc1),
                vaddvq_f32(acc2),
                vaddvq_f32(acc3),
            ];

            for d in chunks * 4..dim {
                let w_val = *weights.get_unchecked(d);
                for (i, row) in rows.iter().enumerate() {
                    sums[i] += w_val * *row.get_unchecked(d);
                }
            }

            sums
        }
    }
}
