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

//! Quota-Constrained Selection
//!
//! Reference semantics: walk all candidates in total descending order
//! (score desc, index asc on ties); accept a candidate when its group has
//! remaining quota and fewer than `out_capacity` candidates have been
//! accepted; stop at `out_capacity`. Exhausted quota skips the candidate;
//! unused quota is never redistributed to other groups.
//!
//! Non-sorting implementation: quota consumption within group g depends
//! only on g's own members and the global order, so the accepted set is
//! exactly the first `out_capacity` entries — in global descending order —
//! of the union of each group's top `quota[g]` members. That holds whether
//! or not the quota sum exceeds `out_capacity`, because the merge below
//! always truncates at `out_capacity`. So instead of sorting N scores:
//!
//! 1. count members per group (also validates group ids)
//! 2. run a bounded top-K per group, capacity `quota[g]`, all regions
//!    packed into one flat arena
//! 3. merge the union through a single bounded selector with capacity
//!    `out_capacity`, drained descending
//!
//! A group member ranked at or below position `out_capacity` within its own
//! group can never survive the final truncation, so per-group capacity is
//! clamped to `min(quota[g], count[g], out_capacity)` and the arena never
//! needs more than one slot per candidate.

use framerank_core::{Result, SelectError};

use crate::topk::{BoundedTopK, Entry};

/// Pre-sized scratch for quota selection: per-group bookkeeping plus the
/// flat heap arena. Created once by the scheduler; every call resets
/// logical lengths only.
pub struct QuotaScratch {
    counts: Vec<u32>,
    caps: Vec<u32>,
    offsets: Vec<u32>,
    lens: Vec<u32>,
    arena: Vec<Entry>,
}

impl QuotaScratch {
    /// Scratch for up to `max_entities` candidates across `max_groups` groups.
    pub fn with_capacity(max_entities: usize, max_groups: usize) -> Self {
        Self {
            counts: vec![0; max_groups],
            caps: vec![0; max_groups],
            offsets: vec![0; max_groups],
            lens: vec![0; max_groups],
            arena: vec![Entry::ZERO; max_entities],
        }
    }

    /// Number of groups this scratch can handle.
    pub fn max_groups(&self) -> usize {
        self.counts.len()
    }

    /// Number of candidates this scratch can handle.
    pub fn max_entities(&self) -> usize {
        self.arena.len()
    }
}

/// Select at most `quota[g]` candidates per group, merged descending and
/// truncated at `out_capacity`.
///
/// `merge_scratch` must hold at least `min(out_capacity, scores.len())`
/// slots. Returns ranked entries borrowed from `merge_scratch`.
pub fn select_with_quotas<'a>(
    scores: &[f32],
    groups: &[u32],
    quotas: &[u32],
    out_capacity: usize,
    scratch: &mut QuotaScratch,
    merge_scratch: &'a mut [Entry],
) -> Result<&'a mut [Entry]> {
    let n = scores.len();
    let g = quotas.len();
    debug_assert_eq!(groups.len(), n);
    debug_assert!(scratch.counts.len() >= g);
    debug_assert!(scratch.arena.len() >= n);

    // Count pass. Runs before anything else so an out-of-range group id
    // fails the call with no work done.
    let counts = &mut scratch.counts[..g];
    counts.fill(0);
    for &group in groups {
        let gi = group as usize;
        if gi >= g {
            return Err(SelectError::GroupOutOfRange { group: gi, groups: g });
        }
        counts[gi] += 1;
    }

    // Region layout: prefix sums of clamped per-group capacities.
    let region_cap = out_capacity.min(n) as u32;
    let mut total: u32 = 0;
    for gi in 0..g {
        let cap = quotas[gi].min(scratch.counts[gi]).min(region_cap);
        scratch.caps[gi] = cap;
        scratch.offsets[gi] = total;
        total += cap;
    }
    scratch.lens[..g].fill(0);

    // Distribution pass: bounded push into each group's region.
    for (i, &score) in scores.iter().enumerate() {
        let gi = groups[i] as usize;
        let cap = scratch.caps[gi] as usize;
        if cap == 0 {
            continue;
        }
        let offset = scratch.offsets[gi] as usize;
        let mut region = BoundedTopK::resume(
            &mut scratch.arena[offset..offset + cap],
            scratch.lens[gi] as usize,
        );
        region.push(Entry {
            score,
            index: i as u32,
        });
        scratch.lens[gi] = region.len() as u32;
    }

    // Merge the union, truncated at out_capacity.
    let merge_cap = out_capacity.min(total as usize);
    let mut merged = BoundedTopK::new(&mut merge_scratch[..merge_cap]);
    for gi in 0..g {
        let offset = scratch.offsets[gi] as usize;
        let len = scratch.lens[gi] as usize;
        for &entry in &scratch.arena[offset..offset + len] {
            merged.push(entry);
        }
    }
    Ok(merged.into_sorted())
}
