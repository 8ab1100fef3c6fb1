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

//! Backend-agnostic rendering API.
//!
//! Organized into several logical sub-modules:
//!
//! - **[`core`]**: Device capabilities, settings, and statistics.
//! - **[`resource`]**: GPU handles (Buffer, Texture) and their descriptors.
//! - **[`command`]**: Recorded draw commands and shader resource bindings.
//! - **[`pipeline`]**: Pipeline state descriptions, layouts, and reflection.
//! - **[`scene`]**: The scene-facing data consumed by pipeline derivation.
//! - **[`util`]**: Shared enums and the per-frame constant buffer allocator.

pub mod command;
pub mod core;
pub mod pipeline;
pub mod resource;
pub mod scene;
pub mod util;
