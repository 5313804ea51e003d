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

//! Per-Frame Entity Selection Engine
//!
//! Selects the K highest-scoring entities out of N candidates every frame,
//! optionally bounded by a per-group quota, without sorting all N scores and
//! without allocating on the steady-state path.
//!
//! # Pipeline
//!
//! ```text
//! FeatureMatrix + weights -> score (SIMD dot products)
//!                         -> topk (bounded heap) | quota (per-group heaps + merge)
//!                         -> (id, score) pairs, descending
//! ```
//!
//! # Ordering contract
//!
//! Output is sorted by descending score. Equal scores break ties by
//! ascending original row index, so results are reproducible across runs
//! and across SIMD widths. NaN scores rank below every real value,
//! including negative infinity.
//!
//! # Usage
//!
//! [`FrameScheduler`] is the front door: construct it once with the maximum
//! entity/group counts, then call [`FrameScheduler::select_top_k`] or
//! [`FrameScheduler::select_with_quotas`] once per frame. All scratch is
//! sized at construction; repeated calls within the configured bounds do
//! not touch the allocator.
//!
//! A scheduler instance is only sequentially re-entrant (both entry points
//! take `&mut self`). Threads that need parallel selection use one
//! instance each.

pub mod config;
pub mod quota;
pub mod scheduler;
pub mod score;
pub mod topk;

pub use config::SchedulerConfig;
pub use framerank_core::{FeatureMatrix, Result, SelectError};
pub use scheduler::FrameScheduler;
pub use topk::Entry;
