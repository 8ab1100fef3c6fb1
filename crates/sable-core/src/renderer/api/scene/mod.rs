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

//! The scene-facing inputs of pipeline state derivation.
//!
//! These are plain data snapshots. Whoever owns the scene fills them in; the
//! submission lanes only read them.

pub mod drawable;
pub mod geometry;
pub mod light;
pub mod material;
pub mod shader_resources;

pub use self::drawable::*;
pub use self::geometry::*;
pub use self::light::*;
pub use self::material::*;
