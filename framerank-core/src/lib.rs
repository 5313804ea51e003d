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

//! Core types for the framerank selection engine.
//!
//! This crate holds the leaf types shared by the engine and its callers:
//! the non-owning [`FeatureMatrix`] view over caller-owned feature data,
//! and the [`SelectError`] type returned by every fallible operation.

pub mod error;
pub mod matrix;

pub use error::{Result, SelectError};
pub use matrix::FeatureMatrix;
