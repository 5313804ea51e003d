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

//! Error types for framerank

use thiserror::Error;

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, SelectError>;

/// Errors returned by selection operations.
///
/// Every error is detected before any output buffer is mutated, so a
/// failed call never leaves partial results behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    /// Feature column count does not match the weight vector length.
    #[error("dimension mismatch: feature rows have {dim} columns but weight vector has {weights} entries")]
    DimensionMismatch { dim: usize, weights: usize },

    /// A candidate references a group id outside the quota table.
    #[error("group id {group} out of range: quota table has {groups} groups")]
    GroupOutOfRange { group: usize, groups: usize },

    /// Mismatched or undersized input/output buffers.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Inputs exceed the limits the scheduler was sized for at construction.
    #[error("capacity exceeded: {what} is {got} but scheduler was sized for {max}")]
    CapacityExceeded {
        what: &'static str,
        got: usize,
        max: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SelectError::DimensionMismatch { dim: 32, weights: 16 };
        assert!(err.to_string().contains("32"));
        assert!(err.to_string().contains("16"));

        let err = SelectError::CapacityExceeded {
            what: "entities",
            got: 20_000,
            max: 10_000,
        };
        assert!(err.to_string().contains("entities"));
        assert!(err.to_string().contains("20000"));
    }
}
