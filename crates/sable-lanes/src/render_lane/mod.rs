// Copyright 2025 eraflo
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

//! Rendering lane - hot path for recording and replaying draws.
//!
//! - [`DrawCommandQueue`]: records compact draw commands and replays them with
//!   redundant state changes removed.
//! - [`ShaderResourceBindingCache`]: de-duplicates backend resource bindings.
//! - [`PipelineStateCache`]: de-duplicates compiled pipeline states.
//! - [`PipelineStateBuilder`]: derives pipeline states for scene batches.

mod draw_queue;
mod pipeline_builder;
mod pipeline_cache;
mod srb_cache;

pub use draw_queue::*;
pub use pipeline_builder::*;
pub use pipeline_cache::*;
pub use srb_cache::*;
