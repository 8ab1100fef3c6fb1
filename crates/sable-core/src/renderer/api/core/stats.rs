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

//! Statistics gathered while replaying a draw command queue.

/// Counters for a single `execute` of a draw command queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecuteStats {
    /// Number of recorded commands visited.
    pub commands: u32,
    /// Number of draw calls issued to the render pass.
    pub draw_calls: u32,
    /// Commands dropped because their pipeline or vertex buffers could not be bound.
    pub skipped_commands: u32,
    /// Pipeline state binds.
    pub pipeline_binds: u32,
    /// Scissor state changes.
    pub scissor_changes: u32,
    /// Index buffer binds.
    pub index_buffer_binds: u32,
    /// Vertex buffer binds.
    pub vertex_buffer_binds: u32,
    /// Shader resource binding commits.
    pub resource_binding_commits: u32,
    /// Shader resource bindings created during this execute.
    pub resource_bindings_created: u32,
}
