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

//! Bounded Streaming Top-K
//!
//! Keeps the K best candidates seen so far in an array-backed bounded heap
//! instead of sorting all N scores.
//!
//! The heap is min-oriented on candidate rank: the root is the worst
//! retained candidate and acts as the admission threshold. A candidate
//! that does not beat the root costs a single comparison; only admissions
//! pay the O(log K) sift. With K << N and non-adversarial score order the
//! overall cost is close to one comparison per candidate.
//!
//! Complexity:
//! - Push: O(1) rejected, O(log K) admitted
//! - Drain: O(K log K) in-place heapsort
//! - Space: O(K), entirely in caller-provided scratch

use std::cmp::Ordering;

/// One ranked candidate: its computed score and original row index.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Entry {
    pub score: f32,
    pub index: u32,
}

impl Entry {
    pub(crate) const ZERO: Entry = Entry { score: 0.0, index: 0 };
}

/// Total descending order over candidates.
///
/// `Less` means `a` is ranked ahead of `b`. Higher scores come first;
/// NaN ranks below every real value, including negative infinity; equal
/// scores (and NaN vs NaN) break ties by ascending original index.
#[inline]
pub fn cmp_desc(a: &Entry, b: &Entry) -> Ordering {
    match (a.score.is_nan(), b.score.is_nan()) {
        (true, true) => a.index.cmp(&b.index),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b
            .score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.index.cmp(&b.index)),
    }
}

/// Bounded top-K structure over borrowed scratch slots.
///
/// Capacity is `slots.len()`; the structure never allocates. Invariant:
/// `slots[..len]` is a binary min-heap on rank, so `slots[0]` is the
/// worst retained candidate whenever `len > 0`.
pub struct BoundedTopK<'a> {
    slots: &'a mut [Entry],
    len: usize,
}

impl<'a> BoundedTopK<'a> {
    /// Empty structure over `slots` (capacity = `slots.len()`).
    pub fn new(slots: &'a mut [Entry]) -> Self {
        Self { slots, len: 0 }
    }

    /// Rebuild a view over slots that already hold `len` heap-ordered
    /// entries, e.g. a per-group region of a shared arena.
    pub fn resume(slots: &'a mut [Entry], len: usize) -> Self {
        debug_assert!(len <= slots.len());
        Self { slots, len }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The current admission threshold: the worst retained candidate,
    /// once the structure is full.
    #[inline]
    pub fn threshold(&self) -> Option<&Entry> {
        if self.len == self.slots.len() {
            self.slots.first()
        } else {
            None
        }
    }

    /// Offer a candidate. Below-threshold candidates are rejected with a
    /// single comparison once the structure is full.
    #[inline]
    pub fn push(&mut self, entry: Entry) {
        if self.slots.is_empty() {
            return;
        }
        if self.len < self.slots.len() {
            self.slots[self.len] = entry;
            self.sift_up(self.len);
            self.len += 1;
        } else if cmp_desc(&entry, &self.slots[0]) == Ordering::Less {
            self.slots[0] = entry;
            self.sift_down(0, self.len);
        }
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            // child ranked after parent must move toward the root
            if cmp_desc(&self.slots[i], &self.slots[parent]) == Ordering::Greater {
                self.slots.swap(i, parent);
                i = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut i: usize, end: usize) {
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut worst = i;
            if left < end && cmp_desc(&self.slots[left], &self.slots[worst]) == Ordering::Greater {
                worst = left;
            }
            if right < end && cmp_desc(&self.slots[right], &self.slots[worst]) == Ordering::Greater {
                worst = right;
            }
            if worst == i {
                break;
            }
            self.slots.swap(i, worst);
            i = worst;
        }
    }

    /// Drain into descending order (best first) via in-place heapsort and
    /// return the sorted entries.
    pub fn into_sorted(mut self) -> &'a mut [Entry] {
        let mut end = self.len;
        while end > 1 {
            end -= 1;
            self.slots.swap(0, end);
            self.sift_down(0, end);
        }
        let BoundedTopK { slots, len } = self;
        &mut slots[..len]
    }
}

/// Select the top `k` of `scores` in descending order.
///
/// Returns ranked entries in `scratch`, which must hold at least
/// `min(k, scores.len())` slots — or `scores.len()` slots when `k >= n`,
/// where the bounded structure is skipped and all candidates are sorted
/// directly (it would retain everything anyway).
pub fn select_descending<'a>(
    scores: &[f32],
    k: usize,
    scratch: &'a mut [Entry],
) -> &'a mut [Entry] {
    let n = scores.len();
    if k == 0 || n == 0 {
        return &mut scratch[..0];
    }

    if k >= n {
        let slots = &mut scratch[..n];
        for (i, (&score, slot)) in scores.iter().zip(slots.iter_mut()).enumerate() {
            *slot = Entry {
                score,
                index: i as u32,
            };
        }
        slots.sort_unstable_by(cmp_desc);
        return slots;
    }

    let mut retained = BoundedTopK::new(&mut scratch[..k]);
    for (i, &score) in scores.iter().enumerate() {
        retained.push(Entry {
            score,
            index: i as u32,
        });
    }
    retained.into_sorted()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(scores: &[f32], k: usize) -> Vec<Entry> {
        let mut scratch = vec![Entry::ZERO; scores.len().max(k).max(1)];
        select_descending(scores, k, &mut scratch).to_vec()
    }

    fn indices(entries: &[Entry]) -> Vec<u32> {
        entries.iter().map(|e| e.index).collect()
    }

    #[test]
    fn test_basic_topk() {
        let out = run(&[0.2, 0.9, 0.1, 0.7, 0.5], 3);
        assert_eq!(indices(&out), vec![1, 3, 4]);
        assert_eq!(out[0].score, 0.9);
    }

    #[test]
    fn test_tie_break_ascending_index() {
        let out = run(&[0.2, 0.9, 0.1, 0.9, 0.5], 3);
        assert_eq!(indices(&out), vec![1, 3, 4]);
    }

    #[test]
    fn test_all_equal_scores() {
        let out = run(&[1.0; 6], 4);
        assert_eq!(indices(&out), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_k_zero_and_empty() {
        assert!(run(&[1.0, 2.0], 0).is_empty());
        assert!(run(&[], 5).is_empty());
    }

    #[test]
    fn test_k_at_least_n_sorts_everything() {
        let out = run(&[0.3, 0.1, 0.2], 3);
        assert_eq!(indices(&out), vec![0, 2, 1]);
        let out = run(&[0.3, 0.1, 0.2], 99);
        assert_eq!(out.len(), 3);
        assert_eq!(indices(&out), vec![0, 2, 1]);
    }

    #[test]
    fn test_ascending_scores_worst_case() {
        // every candidate beats the threshold; ordering must still hold
        let scores: Vec<f32> = (0..100).map(|i| i as f32).collect();
        let out = run(&scores, 5);
        assert_eq!(indices(&out), vec![99, 98, 97, 96, 95]);
    }

    #[test]
    fn test_nan_ranks_below_everything() {
        let out = run(&[f32::NAN, 1.0, f32::NEG_INFINITY, 2.0], 4);
        assert_eq!(indices(&out), vec![3, 1, 2, 0]);

        // NaN never admitted while real scores fill the structure
        let out = run(&[f32::NAN, 1.0, -5.0, 2.0], 2);
        assert_eq!(indices(&out), vec![3, 1]);
    }

    #[test]
    fn test_nan_tie_break_by_index() {
        let out = run(&[f32::NAN, f32::NAN], 2);
        assert_eq!(indices(&out), vec![0, 1]);
    }

    #[test]
    fn test_threshold_exposed_when_full() {
        let mut scratch = vec![Entry::ZERO; 2];
        let mut h = BoundedTopK::new(&mut scratch);
        h.push(Entry { score: 1.0, index: 0 });
        assert!(h.threshold().is_none());
        h.push(Entry { score: 3.0, index: 1 });
        assert_eq!(h.threshold().map(|e| e.index), Some(0));
        h.push(Entry { score: 2.0, index: 2 });
        assert_eq!(h.threshold().map(|e| e.index), Some(2));
    }

    #[test]
    fn test_zero_capacity() {
        let mut scratch: Vec<Entry> = Vec::new();
        let mut h = BoundedTopK::new(&mut scratch);
        h.push(Entry { score: 1.0, index: 0 });
        assert_eq!(h.len(), 0);
        assert!(h.into_sorted().is_empty());
    }
}
