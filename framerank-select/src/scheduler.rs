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

//! Frame Scheduler
//!
//! The reusable façade over scoring and selection. All scratch buffers are
//! sized once at construction for `max_entities`/`max_groups`; each frame
//! resets logical lengths instead of reallocating, so repeated calls
//! within the configured bounds never touch the allocator.
//!
//! Every call validates inputs first, scores into owned scratch, runs the
//! selector on owned scratch, and only then writes `(id, score)` pairs
//! into the caller's output slices. A failed call leaves the outputs
//! untouched.
//!
//! Both entry points take `&mut self`: an instance is re-entrant
//! sequentially but never concurrently. Parallel callers use one
//! scheduler per thread.

use tracing::{debug, trace};

use framerank_core::{FeatureMatrix, Result, SelectError};

use crate::config::SchedulerConfig;
use crate::quota::{self, QuotaScratch};
use crate::score;
use crate::topk::{self, Entry};

/// Per-frame selection engine with construction-time scratch sizing.
pub struct FrameScheduler {
    max_entities: usize,
    max_groups: usize,
    scores: Vec<f32>,
    rank_scratch: Vec<Entry>,
    quota_scratch: QuotaScratch,
}

impl FrameScheduler {
    /// Scheduler for up to `max_entities` candidates, top-K only.
    pub fn new(max_entities: usize) -> Result<Self> {
        Self::with_groups(max_entities, 0)
    }

    /// Scheduler for up to `max_entities` candidates across up to
    /// `max_groups` quota groups.
    pub fn with_groups(max_entities: usize, max_groups: usize) -> Result<Self> {
        // candidate indices are tracked as u32 in the rank scratch
        if max_entities > u32::MAX as usize {
            return Err(SelectError::InvalidInput(format!(
                "max_entities {} exceeds the supported candidate index range",
                max_entities
            )));
        }
        debug!(max_entities, max_groups, "frame scheduler initialized");
        Ok(Self {
            max_entities,
            max_groups,
            scores: vec![0.0; max_entities],
            rank_scratch: vec![Entry::ZERO; max_entities],
            quota_scratch: QuotaScratch::with_capacity(max_entities, max_groups),
        })
    }

    pub fn from_config(config: &SchedulerConfig) -> Result<Self> {
        Self::with_groups(config.max_entities, config.max_groups)
    }

    pub fn max_entities(&self) -> usize {
        self.max_entities
    }

    pub fn max_groups(&self) -> usize {
        self.max_groups
    }

    /// Score all rows and write the `min(k, n)` best `(id, score)` pairs
    /// into the outputs, descending. Returns the count written.
    pub fn select_top_k(
        &mut self,
        features: &FeatureMatrix<'_>,
        weights: &[f32],
        ids: &[u64],
        k: usize,
        out_ids: &mut [u64],
        out_scores: &mut [f32],
    ) -> Result<usize> {
        let n = features.rows();
        if n > self.max_entities {
            return Err(SelectError::CapacityExceeded {
                what: "entities",
                got: n,
                max: self.max_entities,
            });
        }
        if ids.len() != n {
            return Err(SelectError::InvalidInput(format!(
                "{} ids for {} rows",
                ids.len(),
                n
            )));
        }
        if weights.len() != features.dim() {
            return Err(SelectError::DimensionMismatch {
                dim: features.dim(),
                weights: weights.len(),
            });
        }
        let take = k.min(n);
        if out_ids.len() < take || out_scores.len() < take {
            return Err(SelectError::InvalidInput(format!(
                "output buffers hold {} ids / {} scores, selection needs {}",
                out_ids.len(),
                out_scores.len(),
                take
            )));
        }

        trace!(n, k, "top-k selection");
        if take == 0 {
            return Ok(0);
        }

        score::score_into(features, weights, &mut self.scores[..n])?;
        let ranked = topk::select_descending(&self.scores[..n], k, &mut self.rank_scratch[..n]);
        for (slot, entry) in ranked.iter().enumerate() {
            out_ids[slot] = ids[entry.index as usize];
            out_scores[slot] = entry.score;
        }
        Ok(ranked.len())
    }

    /// Score all rows and write at most `quota[g]` candidates per group,
    /// merged descending and capped at the output length. The two output
    /// buffers must be the same length; that length is the requested
    /// output capacity. Returns the count written.
    pub fn select_with_quotas(
        &mut self,
        features: &FeatureMatrix<'_>,
        weights: &[f32],
        ids: &[u64],
        groups: &[u32],
        quotas: &[u32],
        out_ids: &mut [u64],
        out_scores: &mut [f32],
    ) -> Result<usize> {
        let n = features.rows();
        let g = quotas.len();
        if n > self.max_entities {
            return Err(SelectError::CapacityExceeded {
                what: "entities",
                got: n,
                max: self.max_entities,
            });
        }
        if g > self.max_groups {
            return Err(SelectError::CapacityExceeded {
                what: "groups",
                got: g,
                max: self.max_groups,
            });
        }
        if ids.len() != n || groups.len() != n {
            return Err(SelectError::InvalidInput(format!(
                "{} ids / {} group tags for {} rows",
                ids.len(),
                groups.len(),
                n
            )));
        }
        if weights.len() != features.dim() {
            return Err(SelectError::DimensionMismatch {
                dim: features.dim(),
                weights: weights.len(),
            });
        }
        if out_ids.len() != out_scores.len() {
            return Err(SelectError::InvalidInput(format!(
                "quota output buffers must match: {} ids vs {} scores",
                out_ids.len(),
                out_scores.len()
            )));
        }
        for &group in groups {
            if group as usize >= g {
                return Err(SelectError::GroupOutOfRange {
                    group: group as usize,
                    groups: g,
                });
            }
        }

        let out_capacity = out_ids.len();
        trace!(n, groups = g, out_capacity, "quota selection");

        score::score_into(features, weights, &mut self.scores[..n])?;
        let ranked = quota::select_with_quotas(
            &self.scores[..n],
            groups,
            quotas,
            out_capacity,
            &mut self.quota_scratch,
            &mut self.rank_scratch[..n],
        )?;
        for (slot, entry) in ranked.iter().enumerate() {
            out_ids[slot] = ids[entry.index as usize];
            out_scores[slot] = entry.score;
        }
        Ok(ranked.len())
    }
}
