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

//! Per-frame draw command recording and replay.
//!
//! Commands are recorded against side tables (pipeline states, scissor rectangles,
//! shader resources) and constant buffer tickets, so a recorded draw is a small
//! `Copy` value. [`DrawCommandQueue::execute`] walks the commands in order and only
//! issues the state changes between consecutive draws.

use super::srb_cache::ShaderResourceBindingCache;
use bytemuck::Pod;
use sable_core::{
    math::IntRect,
    renderer::{
        api::{
            command::{
                DrawCommandDescription, DrawInputBuffers, IndexBufferBinding,
                ShaderResourceBindingCreateInfo, ShaderResourceBindingId, ShaderResourceEntry,
                ShaderResourceRange, MAX_VERTEX_STREAMS,
            },
            core::{ConstantBufferSettings, DeviceCaps, ExecuteStats},
            pipeline::{PipelineState, PipelineStateId, ShaderProgramReflection},
            resource::{BufferId, TextureId},
            util::{
                ConstantBufferManager, ConstantBufferRange, ShaderParameterGroup,
                MAX_SHADER_PARAMETER_GROUPS,
            },
        },
        GraphicsDevice, RenderPass, ResourceError,
    },
    StringHash,
};
use std::sync::Arc;

/// The shader parameter block being assembled between `begin` and `commit`.
#[derive(Debug, Default)]
struct ParameterStaging {
    group: Option<ShaderParameterGroup>,
    block: Vec<u8>,
    /// Layout each group's current block was written for.
    layouts: [Option<Arc<ShaderProgramReflection>>; MAX_SHADER_PARAMETER_GROUPS],
}

impl ParameterStaging {
    fn reset(&mut self) {
        self.group = None;
        self.block.clear();
        self.layouts = Default::default();
    }
}

/// Records the draws of one pass and replays them into a [`RenderPass`].
///
/// Recording is stateful: setters change the staged command, and every draw call
/// snapshots it. The queue owns the frame's constant buffers and a shader resource
/// binding cache that survives [`reset`](Self::reset).
#[derive(Debug)]
pub struct DrawCommandQueue {
    current: DrawCommandDescription,
    current_pipeline: Option<Arc<PipelineState>>,
    pipeline_states: Vec<Arc<PipelineState>>,
    scissor_rects: Vec<IntRect>,
    shader_resources: Vec<ShaderResourceEntry>,
    uncommitted_resources_start: u32,
    draw_commands: Vec<DrawCommandDescription>,
    constant_buffers: ConstantBufferManager,
    parameters: ParameterStaging,
    srb_cache: ShaderResourceBindingCache,
    srb_info: ShaderResourceBindingCreateInfo,
}

impl Default for DrawCommandQueue {
    fn default() -> Self {
        Self::new(ConstantBufferSettings::default())
    }
}

impl DrawCommandQueue {
    /// Creates an empty queue.
    pub fn new(settings: ConstantBufferSettings) -> Self {
        Self {
            current: DrawCommandDescription::default(),
            current_pipeline: None,
            pipeline_states: Vec::new(),
            scissor_rects: vec![IntRect::ZERO],
            shader_resources: Vec::new(),
            uncommitted_resources_start: 0,
            draw_commands: Vec::new(),
            constant_buffers: ConstantBufferManager::new(settings),
            parameters: ParameterStaging::default(),
            srb_cache: ShaderResourceBindingCache::new(),
            srb_info: ShaderResourceBindingCreateInfo::new(PipelineStateId(0)),
        }
    }

    /// Clears every recorded command and table and starts a new frame.
    ///
    /// The scissor table is re-seeded with the full-viewport rectangle at index 0.
    pub fn reset(&mut self, caps: &DeviceCaps) {
        self.current = DrawCommandDescription::default();
        self.current_pipeline = None;
        self.pipeline_states.clear();
        self.scissor_rects.clear();
        self.scissor_rects.push(IntRect::ZERO);
        self.shader_resources.clear();
        self.uncommitted_resources_start = 0;
        self.draw_commands.clear();
        self.constant_buffers
            .clear_and_initialize(caps.constant_buffer_offset_alignment);
        self.parameters.reset();
    }

    /// Sets the pipeline state of the following draws.
    pub fn set_pipeline_state(&mut self, state: &Arc<PipelineState>) {
        if let Some(current) = &self.current_pipeline {
            if Arc::ptr_eq(current, state) {
                return;
            }
        }
        self.current.pipeline_state = self.pipeline_states.len() as u32;
        self.pipeline_states.push(Arc::clone(state));
        self.current_pipeline = Some(Arc::clone(state));
    }

    /// Sets the scissor rectangle of the following draws.
    ///
    /// Only used by pipeline states with the scissor test enabled.
    pub fn set_scissor_rect(&mut self, rect: IntRect) {
        if self.scissor_rects.get(self.current.scissor_rect as usize) == Some(&rect) {
            return;
        }
        self.current.scissor_rect = self.scissor_rects.len() as u32;
        self.scissor_rects.push(rect);
    }

    /// Sets the index and vertex buffers of the following draws.
    pub fn set_buffers(&mut self, buffers: DrawInputBuffers) {
        self.current.input_buffers = buffers;
    }

    /// Starts writing the block of a shader parameter group.
    ///
    /// Returns `false` when nothing needs to be written: the current program does not
    /// read the group, or `different_from_previous` is `false` and the block written
    /// for the same program layout is still valid. Only call the `add_*` methods and
    /// [`commit_shader_parameter_group`](Self::commit_shader_parameter_group) after
    /// this returns `true`.
    pub fn begin_shader_parameter_group(
        &mut self,
        group: ShaderParameterGroup,
        different_from_previous: bool,
    ) -> bool {
        let Some(pipeline) = &self.current_pipeline else {
            log::warn!("DrawCommandQueue: shader parameters written before any pipeline state");
            return false;
        };

        let layout = pipeline.reflection();
        let size = layout.constant_buffer_size(group);
        if size == 0 {
            return false;
        }

        let previous_layout = &mut self.parameters.layouts[group.index()];
        let layout_changed = !previous_layout
            .as_ref()
            .is_some_and(|previous| Arc::ptr_eq(previous, layout));
        if !different_from_previous
            && !layout_changed
            && self.current.constant_buffers[group.index()].is_valid()
        {
            return false;
        }

        *previous_layout = Some(Arc::clone(layout));
        self.parameters.group = Some(group);
        self.parameters.block.clear();
        self.parameters.block.resize(size as usize, 0);
        true
    }

    /// Writes a parameter into the group block being assembled.
    ///
    /// Parameters the program does not read are ignored. Values larger than the
    /// reflected parameter are truncated.
    pub fn add_shader_parameter<T: Pod>(&mut self, name: StringHash, value: &T) {
        self.write_parameter_bytes(name, bytemuck::bytes_of(value));
    }

    /// Writes an array parameter into the group block being assembled.
    pub fn add_shader_parameter_slice<T: Pod>(&mut self, name: StringHash, values: &[T]) {
        self.write_parameter_bytes(name, bytemuck::cast_slice(values));
    }

    fn write_parameter_bytes(&mut self, name: StringHash, bytes: &[u8]) {
        let Some(group) = self.parameters.group else {
            log::warn!("DrawCommandQueue: parameter {name} added outside of a parameter group");
            return;
        };
        let Some(layout) = &self.parameters.layouts[group.index()] else {
            return;
        };
        let Some(parameter) = layout.shader_parameter(name) else {
            return;
        };
        if parameter.group != group {
            log::trace!(
                "DrawCommandQueue: parameter {name} belongs to {:?}, not {:?}",
                parameter.group,
                group
            );
            return;
        }

        let len = bytes.len().min(parameter.size as usize);
        let start = parameter.offset as usize;
        if let Some(target) = self.parameters.block.get_mut(start..start + len) {
            target.copy_from_slice(&bytes[..len]);
        }
    }

    /// Finishes the group block and attaches it to the following draws.
    ///
    /// # Errors
    ///
    /// Fails if the block does not fit in a constant buffer.
    pub fn commit_shader_parameter_group(
        &mut self,
        group: ShaderParameterGroup,
    ) -> Result<(), ResourceError> {
        if self.parameters.group != Some(group) {
            log::warn!(
                "DrawCommandQueue: commit of {:?} while {:?} is being written",
                group,
                self.parameters.group
            );
            return Ok(());
        }
        self.parameters.group = None;

        match self.constant_buffers.write(group, &self.parameters.block) {
            Ok(ticket) => {
                self.current.constant_buffers[group.index()] = ticket;
                Ok(())
            }
            Err(e) => {
                self.parameters.layouts[group.index()] = None;
                Err(e)
            }
        }
    }

    /// Attaches a pre-built block to a group, bypassing parameter reflection.
    pub fn write_shader_parameter_group(
        &mut self,
        group: ShaderParameterGroup,
        data: &[u8],
    ) -> Result<(), ResourceError> {
        let ticket = self.constant_buffers.write(group, data)?;
        self.current.constant_buffers[group.index()] = ticket;
        self.parameters.layouts[group.index()] = self
            .current_pipeline
            .as_ref()
            .map(|pipeline| Arc::clone(pipeline.reflection()));
        Ok(())
    }

    /// Adds a texture to the resource group being assembled.
    pub fn add_shader_resource(&mut self, name: StringHash, texture: Option<TextureId>) {
        self.shader_resources
            .push(ShaderResourceEntry { name, texture });
    }

    /// Makes the resources added since the last commit the resources of the following draws.
    pub fn commit_shader_resources(&mut self) {
        let end = self.shader_resources.len() as u32;
        self.current.shader_resources = ShaderResourceRange {
            start: self.uncommitted_resources_start,
            end,
        };
        self.uncommitted_resources_start = end;
    }

    /// Records a non-indexed draw. Any index buffer set is ignored.
    pub fn draw(&mut self, vertex_start: u32, vertex_count: u32) {
        if let Some(mut command) = self.snapshot(vertex_start, vertex_count, 0) {
            command.input_buffers.index_buffer = None;
            self.draw_commands.push(command);
        }
    }

    /// Records an indexed draw.
    pub fn draw_indexed(&mut self, index_start: u32, index_count: u32) {
        self.draw_indexed_base_vertex(index_start, index_count, 0);
    }

    /// Records an indexed draw with a vertex offset.
    pub fn draw_indexed_base_vertex(&mut self, index_start: u32, index_count: u32, base_vertex: i32) {
        if let Some(command) = self.snapshot(index_start, index_count, base_vertex) {
            self.draw_commands.push(command);
        }
    }

    /// Records an instanced indexed draw. `instance_start` is the first instance in the
    /// instancing vertex buffer.
    pub fn draw_indexed_instanced(
        &mut self,
        index_start: u32,
        index_count: u32,
        instance_start: u32,
        instance_count: u32,
    ) {
        self.draw_indexed_instanced_base_vertex(
            index_start,
            index_count,
            0,
            instance_start,
            instance_count,
        );
    }

    /// Records an instanced indexed draw with a vertex offset.
    pub fn draw_indexed_instanced_base_vertex(
        &mut self,
        index_start: u32,
        index_count: u32,
        base_vertex: i32,
        instance_start: u32,
        instance_count: u32,
    ) {
        if instance_count == 0 {
            log::trace!("DrawCommandQueue: instanced draw with zero instances skipped");
            return;
        }
        if let Some(mut command) = self.snapshot(index_start, index_count, base_vertex) {
            command.instance_start = instance_start;
            command.instance_count = instance_count;
            self.draw_commands.push(command);
        }
    }

    fn snapshot(
        &self,
        index_start: u32,
        index_count: u32,
        base_vertex: i32,
    ) -> Option<DrawCommandDescription> {
        if self.current_pipeline.is_none() {
            log::warn!("DrawCommandQueue: draw recorded without a pipeline state; ignored");
            return None;
        }
        Some(DrawCommandDescription {
            index_start,
            index_count,
            base_vertex_index: base_vertex,
            instance_start: 0,
            instance_count: 0,
            ..self.current
        })
    }

    /// Drops cached bindings that reference grown constant buffers, then frees the buffers.
    fn release_retired_constant_buffers(&mut self, device: &dyn GraphicsDevice) {
        let srb_cache = &mut self.srb_cache;
        self.constant_buffers
            .release_retired_buffers(device, |buffer| srb_cache.invalidate_buffer(device, buffer));
    }

    /// Replays every recorded command into `pass`.
    ///
    /// Commands whose pipeline state or vertex buffers cannot be bound are skipped.
    /// Constant buffers are finalized afterwards, so the queue must be
    /// [`reset`](Self::reset) before recording the next frame.
    ///
    /// # Panics
    ///
    /// Panics if the device fails to create a shader resource binding.
    pub fn execute(
        &mut self,
        device: &dyn GraphicsDevice,
        pass: &mut dyn RenderPass,
    ) -> ExecuteStats {
        let mut stats = ExecuteStats::default();
        if self.draw_commands.is_empty() {
            return stats;
        }

        if let Err(e) = self.constant_buffers.prepare_buffers(device) {
            log::error!("DrawCommandQueue: Failed to prepare constant buffers: {}", e);
        }
        self.release_retired_constant_buffers(device);

        let render_target = pass.render_target(0);
        let bindings_before = self.srb_cache.misses();

        let mut bound_pipeline: Option<&Arc<PipelineState>> = None;
        let mut bound_scissor: Option<Option<u32>> = None;
        let mut bound_index_buffer: Option<Option<IndexBufferBinding>> = None;
        let mut bound_vertex_buffers: Option<[Option<BufferId>; MAX_VERTEX_STREAMS]> = None;
        let mut bound_resources: Option<(
            ShaderResourceBindingId,
            [Option<ConstantBufferRange>; MAX_SHADER_PARAMETER_GROUPS],
        )> = None;

        for command in &self.draw_commands {
            stats.commands += 1;

            let Some(pipeline) = self.pipeline_states.get(command.pipeline_state as usize) else {
                log::warn!(
                    "DrawCommandQueue: command references unknown pipeline slot {}",
                    command.pipeline_state
                );
                stats.skipped_commands += 1;
                continue;
            };

            if !bound_pipeline.is_some_and(|bound| Arc::ptr_eq(bound, pipeline)) {
                if let Err(e) = pass.set_pipeline_state(pipeline) {
                    log::warn!(
                        "DrawCommandQueue: Failed to bind pipeline state {:?}: {}",
                        pipeline.id(),
                        e
                    );
                    bound_pipeline = None;
                    stats.skipped_commands += 1;
                    continue;
                }
                bound_pipeline = Some(pipeline);
                bound_resources = None;
                stats.pipeline_binds += 1;
            }

            let scissor_enabled = pipeline.is_scissor_test_enabled();
            let scissor = scissor_enabled.then_some(command.scissor_rect);
            if bound_scissor != Some(scissor) {
                let rect = self
                    .scissor_rects
                    .get(command.scissor_rect as usize)
                    .copied()
                    .unwrap_or(IntRect::ZERO);
                pass.set_scissor_test(scissor_enabled, rect);
                bound_scissor = Some(scissor);
                stats.scissor_changes += 1;
            }

            let index_buffer = command.input_buffers.index_buffer;
            if bound_index_buffer != Some(index_buffer) {
                pass.set_index_buffer(index_buffer);
                bound_index_buffer = Some(index_buffer);
                stats.index_buffer_binds += 1;
            }

            let vertex_buffers = command.input_buffers.vertex_buffers;
            if command.is_instanced() || bound_vertex_buffers != Some(vertex_buffers) {
                if let Err(e) = pass.set_vertex_buffers(&vertex_buffers, command.instance_start) {
                    log::warn!("DrawCommandQueue: Failed to bind vertex buffers: {}", e);
                    bound_vertex_buffers = None;
                    stats.skipped_commands += 1;
                    continue;
                }
                bound_vertex_buffers = Some(vertex_buffers);
                stats.vertex_buffer_binds += 1;
            }

            let reflection = pipeline.reflection();
            self.srb_info.reset(pipeline.id());
            let entries = self
                .shader_resources
                .get(command.shader_resources.as_range())
                .unwrap_or_default();
            for entry in entries {
                let Some(mut texture) = entry.texture else {
                    continue;
                };
                if !reflection.has_shader_resource(entry.name) {
                    continue;
                }
                if render_target == Some(texture) {
                    match device.backup_texture(texture) {
                        Some(backup) => texture = backup,
                        None => {
                            log::warn!(
                                "DrawCommandQueue: {:?} is sampled while bound as render target and has no backup",
                                texture
                            );
                            continue;
                        }
                    }
                }
                let dirty = device.texture_dirty_state(texture);
                if dirty.levels_dirty {
                    device.regenerate_texture_levels(texture);
                }
                if dirty.parameters_dirty {
                    device.update_texture_parameters(texture);
                }
                self.srb_info.add_texture(entry.name, texture);
            }

            let mut ranges = [None; MAX_SHADER_PARAMETER_GROUPS];
            for group in ShaderParameterGroup::ALL {
                if reflection.constant_buffer_size(group) == 0 {
                    continue;
                }
                let range = self.constant_buffers.dispatch(
                    device,
                    group,
                    command.constant_buffers[group.index()],
                );
                self.srb_info.constant_buffers[group.index()] = range.map(|r| r.buffer);
                ranges[group.index()] = range;
            }

            let binding = self
                .srb_cache
                .get_or_create(device, &self.srb_info)
                .unwrap_or_else(|e| {
                    panic!(
                        "DrawCommandQueue: cannot create shader resource binding for {:?}: {}",
                        pipeline.id(),
                        e
                    )
                });
            if bound_resources != Some((binding, ranges)) {
                pass.commit_shader_resources(binding, &ranges);
                bound_resources = Some((binding, ranges));
                stats.resource_binding_commits += 1;
            }

            let primitive = pipeline.desc().primitive_type;
            let indices = command.index_range();
            let base_vertex = command.base_vertex_index;
            if command.is_instanced() {
                if base_vertex == 0 {
                    pass.draw_indexed_instanced(primitive, indices, command.instance_count);
                } else {
                    pass.draw_indexed_instanced_base_vertex(
                        primitive,
                        indices,
                        base_vertex,
                        command.instance_count,
                    );
                }
            } else if index_buffer.is_none() {
                pass.draw(primitive, indices);
            } else if base_vertex == 0 {
                pass.draw_indexed(primitive, indices);
            } else {
                pass.draw_indexed_base_vertex(primitive, indices, base_vertex);
            }
            stats.draw_calls += 1;
        }

        stats.resource_bindings_created = (self.srb_cache.misses() - bindings_before) as u32;
        self.release_retired_constant_buffers(device);
        self.constant_buffers.finalize(device);

        log::trace!(
            "DrawCommandQueue: executed {} commands, {} draw calls, {} skipped",
            stats.commands,
            stats.draw_calls,
            stats.skipped_commands
        );
        stats
    }

    /// Recorded commands, in submission order.
    pub fn commands(&self) -> &[DrawCommandDescription] {
        &self.draw_commands
    }

    /// Number of recorded commands.
    pub fn len(&self) -> usize {
        self.draw_commands.len()
    }

    /// Returns `true` if no command is recorded.
    pub fn is_empty(&self) -> bool {
        self.draw_commands.is_empty()
    }

    /// Entries of the pipeline state table.
    pub fn pipeline_states(&self) -> &[Arc<PipelineState>] {
        &self.pipeline_states
    }

    /// Entries of the scissor rectangle table.
    pub fn scissor_rects(&self) -> &[IntRect] {
        &self.scissor_rects
    }

    /// Entries of the shader resource table.
    pub fn shader_resources(&self) -> &[ShaderResourceEntry] {
        &self.shader_resources
    }

    /// The binding cache.
    pub fn srb_cache(&self) -> &ShaderResourceBindingCache {
        &self.srb_cache
    }

    /// The binding cache, for invalidation.
    pub fn srb_cache_mut(&mut self) -> &mut ShaderResourceBindingCache {
        &mut self.srb_cache
    }

    /// The constant buffers of the frame.
    pub fn constant_buffers(&self) -> &ConstantBufferManager {
        &self.constant_buffers
    }

    /// Releases the GPU objects owned by the queue.
    pub fn destroy(&mut self, device: &dyn GraphicsDevice) {
        self.srb_cache.clear(device);
        self.constant_buffers.destroy(device);
    }
}
