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

use crate::math::IntRect;
use crate::renderer::api::command::{IndexBufferBinding, ShaderResourceBindingId};
use crate::renderer::api::pipeline::{PipelineState, PrimitiveTopology};
use crate::renderer::api::resource::{BufferId, TextureId};
use crate::renderer::api::util::{ConstantBufferRange, MAX_SHADER_PARAMETER_GROUPS};
use crate::renderer::error::RenderError;
use std::ops::Range;

/// A trait representing an active render pass that recorded draw commands are replayed into.
///
/// The pass owns the bound render targets. Bindings persist until they are replaced,
/// so callers only issue the changes between consecutive draws.
pub trait RenderPass {
    /// Sets the active pipeline state for subsequent draw calls.
    fn set_pipeline_state(&mut self, state: &PipelineState) -> Result<(), RenderError>;

    /// Enables or disables the scissor test. [`IntRect::ZERO`] means the full viewport.
    fn set_scissor_test(&mut self, enabled: bool, rect: IntRect);

    /// Binds an index buffer, or unbinds it with `None`.
    fn set_index_buffer(&mut self, binding: Option<IndexBufferBinding>);

    /// Binds vertex buffers to consecutive slots, starting per-instance data at `instance_offset`.
    fn set_vertex_buffers(
        &mut self,
        buffers: &[Option<BufferId>],
        instance_offset: u32,
    ) -> Result<(), RenderError>;

    /// Returns the texture bound as color target `slot`, if any.
    fn render_target(&self, slot: u32) -> Option<TextureId>;

    /// Commits a shader resource binding and the constant buffer ranges of every group.
    fn commit_shader_resources(
        &mut self,
        binding: ShaderResourceBindingId,
        constant_buffers: &[Option<ConstantBufferRange>; MAX_SHADER_PARAMETER_GROUPS],
    );

    /// Records a non-indexed draw call.
    fn draw(&mut self, primitive: PrimitiveTopology, vertices: Range<u32>);

    /// Records an indexed draw call.
    fn draw_indexed(&mut self, primitive: PrimitiveTopology, indices: Range<u32>);

    /// Records an indexed draw call with a vertex offset added to every index.
    fn draw_indexed_base_vertex(
        &mut self,
        primitive: PrimitiveTopology,
        indices: Range<u32>,
        base_vertex: i32,
    );

    /// Records an instanced indexed draw call.
    fn draw_indexed_instanced(
        &mut self,
        primitive: PrimitiveTopology,
        indices: Range<u32>,
        instance_count: u32,
    );

    /// Records an instanced indexed draw call with a vertex offset added to every index.
    fn draw_indexed_instanced_base_vertex(
        &mut self,
        primitive: PrimitiveTopology,
        indices: Range<u32>,
        base_vertex: i32,
        instance_count: u32,
    );
}
