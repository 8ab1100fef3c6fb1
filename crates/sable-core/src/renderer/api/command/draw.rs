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

//! The compact, replayable description of a single draw.

use crate::renderer::api::resource::{BufferId, TextureId};
use crate::renderer::api::util::{CBufferTicketId, IndexFormat, MAX_SHADER_PARAMETER_GROUPS};
use crate::StringHash;
use std::ops::Range;

/// Number of vertex buffer slots a draw can bind.
pub const MAX_VERTEX_STREAMS: usize = 4;

/// An index buffer together with the format of its indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexBufferBinding {
    /// The buffer.
    pub buffer: BufferId,
    /// Index format.
    pub format: IndexFormat,
}

/// The index buffer and vertex buffers of a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DrawInputBuffers {
    /// Index buffer, or `None` for non-indexed draws.
    pub index_buffer: Option<IndexBufferBinding>,
    /// Vertex buffers by slot.
    pub vertex_buffers: [Option<BufferId>; MAX_VERTEX_STREAMS],
}

/// A named texture recorded for a draw. `None` leaves the resource unbound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderResourceEntry {
    /// The shader resource name.
    pub name: StringHash,
    /// The texture, if any.
    pub texture: Option<TextureId>,
}

/// A half-open range into the shader resource table of a draw queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ShaderResourceRange {
    /// First entry.
    pub start: u32,
    /// One past the last entry.
    pub end: u32,
}

impl ShaderResourceRange {
    /// Returns the range as slice indices.
    pub fn as_range(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }

    /// Number of entries.
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the range holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A recorded draw. Bulky state lives in side tables of the queue and is
/// referenced by index, keeping each command a small `Copy` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCommandDescription {
    /// Index into the pipeline state table.
    pub pipeline_state: u32,
    /// Index and vertex buffers.
    pub input_buffers: DrawInputBuffers,
    /// Constant buffer block for each parameter group.
    pub constant_buffers: [CBufferTicketId; MAX_SHADER_PARAMETER_GROUPS],
    /// Entries of the shader resource table.
    pub shader_resources: ShaderResourceRange,
    /// Index into the scissor rectangle table.
    pub scissor_rect: u32,
    /// First index, or first vertex for non-indexed draws.
    pub index_start: u32,
    /// Number of indices, or vertices for non-indexed draws.
    pub index_count: u32,
    /// Value added to every index.
    pub base_vertex_index: i32,
    /// First instance in the instancing buffer.
    pub instance_start: u32,
    /// Number of instances. `0` for non-instanced draws.
    pub instance_count: u32,
}

impl Default for DrawCommandDescription {
    fn default() -> Self {
        Self {
            pipeline_state: 0,
            input_buffers: DrawInputBuffers::default(),
            constant_buffers: [CBufferTicketId::INVALID; MAX_SHADER_PARAMETER_GROUPS],
            shader_resources: ShaderResourceRange::default(),
            scissor_rect: 0,
            index_start: 0,
            index_count: 0,
            base_vertex_index: 0,
            instance_start: 0,
            instance_count: 0,
        }
    }
}

impl DrawCommandDescription {
    /// Returns `true` for instanced draws.
    pub fn is_instanced(&self) -> bool {
        self.instance_count != 0
    }

    /// The index (or vertex) range of the draw.
    pub fn index_range(&self) -> Range<u32> {
        self.index_start..self.index_start + self.index_count
    }
}
