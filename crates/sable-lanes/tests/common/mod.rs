#![allow(dead_code)]

use sable_core::math::IntRect;
use sable_core::renderer::api::command::{
    IndexBufferBinding, ShaderResourceBindingCreateInfo, ShaderResourceBindingId,
};
use sable_core::renderer::api::core::{DeviceCaps, ShadowMapSettings};
use sable_core::renderer::api::pipeline::{
    FillMode, PipelineState, PipelineStateDesc, PipelineStateId, PrimitiveTopology, ShaderId,
    ShaderProgramReflection, VertexBufferLayout,
};
use sable_core::renderer::api::resource::{
    BufferDescriptor, BufferId, SamplerStateDesc, TextureDirtyState, TextureId,
};
use sable_core::renderer::api::util::{
    ConstantBufferRange, ShaderStage, MAX_SHADER_PARAMETER_GROUPS,
};
use sable_core::renderer::{GraphicsDevice, RenderError, RenderPass, ResourceError};
use sable_lanes::{
    BatchCompositorPass, CameraProcessor, DrawableProcessorPassFlags, InstancingBuffer,
    SceneProcessor, ShadowMapAllocator,
};
use std::collections::HashMap;
use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A device that hands out sequential ids and records what it was asked to do.
#[derive(Debug)]
pub struct MockGraphicsDevice {
    pub caps: DeviceCaps,
    pub id_counter: AtomicUsize,
    pub reflection: Arc<ShaderProgramReflection>,
    pub missing_shaders: Vec<String>,
    pub shader_requests: Mutex<Vec<(ShaderStage, String, String)>>,
    pub shaders: Mutex<HashMap<(ShaderStage, String, String), ShaderId>>,
    pub pipelines_created: AtomicUsize,
    pub bindings: Mutex<Vec<ShaderResourceBindingCreateInfo>>,
    pub buffer_writes: AtomicUsize,
    pub backups: HashMap<TextureId, TextureId>,
    pub dirty: Mutex<HashMap<TextureId, TextureDirtyState>>,
    pub regenerated: Mutex<Vec<TextureId>>,
    pub reapplied: Mutex<Vec<TextureId>>,
}

impl Default for MockGraphicsDevice {
    fn default() -> Self {
        Self {
            caps: DeviceCaps::default(),
            id_counter: AtomicUsize::new(1),
            reflection: Arc::new(ShaderProgramReflection::new()),
            missing_shaders: Vec::new(),
            shader_requests: Mutex::new(Vec::new()),
            shaders: Mutex::new(HashMap::new()),
            pipelines_created: AtomicUsize::new(0),
            bindings: Mutex::new(Vec::new()),
            buffer_writes: AtomicUsize::new(0),
            backups: HashMap::new(),
            dirty: Mutex::new(HashMap::new()),
            regenerated: Mutex::new(Vec::new()),
            reapplied: Mutex::new(Vec::new()),
        }
    }
}

impl MockGraphicsDevice {
    pub fn next_id(&self) -> usize {
        self.id_counter.fetch_add(1, Ordering::Relaxed)
    }

    pub fn bindings_created(&self) -> usize {
        self.bindings.lock().unwrap().len()
    }

    /// A pipeline state built outside of the device, for recording tests.
    pub fn pipeline(&self, desc: PipelineStateDesc, reflection: ShaderProgramReflection) -> Arc<PipelineState> {
        Arc::new(PipelineState::new(
            PipelineStateId(self.next_id()),
            desc,
            Arc::new(reflection),
        ))
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn caps(&self) -> &DeviceCaps {
        &self.caps
    }

    fn create_buffer(&self, _descriptor: &BufferDescriptor) -> Result<BufferId, ResourceError> {
        Ok(BufferId(self.next_id()))
    }

    fn destroy_buffer(&self, _id: BufferId) -> Result<(), ResourceError> {
        Ok(())
    }

    fn write_buffer(&self, _id: BufferId, _offset: u64, _data: &[u8]) -> Result<(), ResourceError> {
        self.buffer_writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn get_shader(&self, stage: ShaderStage, name: &str, defines: &str) -> Option<ShaderId> {
        self.shader_requests
            .lock()
            .unwrap()
            .push((stage, name.to_owned(), defines.to_owned()));
        if self.missing_shaders.iter().any(|missing| missing == name) {
            return None;
        }
        let key = (stage, name.to_owned(), defines.to_owned());
        let mut shaders = self.shaders.lock().unwrap();
        if let Some(id) = shaders.get(&key) {
            return Some(*id);
        }
        let id = ShaderId(self.next_id());
        shaders.insert(key, id);
        Some(id)
    }

    fn create_pipeline_state(&self, desc: &PipelineStateDesc) -> Result<PipelineState, ResourceError> {
        self.pipelines_created.fetch_add(1, Ordering::Relaxed);
        Ok(PipelineState::new(
            PipelineStateId(self.next_id()),
            desc.clone(),
            Arc::clone(&self.reflection),
        ))
    }

    fn destroy_pipeline_state(&self, _id: PipelineStateId) -> Result<(), ResourceError> {
        Ok(())
    }

    fn create_shader_resource_binding(
        &self,
        info: &ShaderResourceBindingCreateInfo,
    ) -> Result<ShaderResourceBindingId, ResourceError> {
        self.bindings.lock().unwrap().push(info.clone());
        Ok(ShaderResourceBindingId(self.next_id()))
    }

    fn destroy_shader_resource_binding(
        &self,
        _id: ShaderResourceBindingId,
    ) -> Result<(), ResourceError> {
        Ok(())
    }

    fn texture_dirty_state(&self, id: TextureId) -> TextureDirtyState {
        self.dirty
            .lock()
            .unwrap()
            .remove(&id)
            .unwrap_or(TextureDirtyState::CLEAN)
    }

    fn regenerate_texture_levels(&self, id: TextureId) {
        self.regenerated.lock().unwrap().push(id);
    }

    fn update_texture_parameters(&self, id: TextureId) {
        self.reapplied.lock().unwrap().push(id);
    }

    fn backup_texture(&self, id: TextureId) -> Option<TextureId> {
        self.backups.get(&id).copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PassEvent {
    SetPipeline(PipelineStateId),
    SetScissor(bool, IntRect),
    SetIndexBuffer(Option<IndexBufferBinding>),
    SetVertexBuffers(Vec<Option<BufferId>>, u32),
    Commit(ShaderResourceBindingId),
    Draw(Range<u32>),
    DrawIndexed(Range<u32>),
    DrawIndexedBaseVertex(Range<u32>, i32),
    DrawIndexedInstanced(Range<u32>, u32),
    DrawIndexedInstancedBaseVertex(Range<u32>, i32, u32),
}

impl PassEvent {
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            PassEvent::Draw(_)
                | PassEvent::DrawIndexed(_)
                | PassEvent::DrawIndexedBaseVertex(..)
                | PassEvent::DrawIndexedInstanced(..)
                | PassEvent::DrawIndexedInstancedBaseVertex(..)
        )
    }
}

/// A render pass that records every call it receives.
#[derive(Debug, Default)]
pub struct MockRenderPass {
    pub events: Vec<PassEvent>,
    pub committed_ranges: Vec<[Option<ConstantBufferRange>; MAX_SHADER_PARAMETER_GROUPS]>,
    pub render_target: Option<TextureId>,
    pub failing_pipelines: Vec<PipelineStateId>,
    pub fail_vertex_buffers: bool,
}

impl MockRenderPass {
    pub fn count(&self, predicate: impl Fn(&PassEvent) -> bool) -> usize {
        self.events.iter().filter(|event| predicate(event)).count()
    }

    pub fn draws(&self) -> Vec<&PassEvent> {
        self.events.iter().filter(|event| event.is_draw()).collect()
    }
}

impl RenderPass for MockRenderPass {
    fn set_pipeline_state(&mut self, state: &PipelineState) -> Result<(), RenderError> {
        if self.failing_pipelines.contains(&state.id()) {
            return Err(RenderError::RenderingFailed("pipeline rejected".into()));
        }
        self.events.push(PassEvent::SetPipeline(state.id()));
        Ok(())
    }

    fn set_scissor_test(&mut self, enabled: bool, rect: IntRect) {
        self.events.push(PassEvent::SetScissor(enabled, rect));
    }

    fn set_index_buffer(&mut self, binding: Option<IndexBufferBinding>) {
        self.events.push(PassEvent::SetIndexBuffer(binding));
    }

    fn set_vertex_buffers(
        &mut self,
        buffers: &[Option<BufferId>],
        instance_offset: u32,
    ) -> Result<(), RenderError> {
        if self.fail_vertex_buffers {
            return Err(RenderError::RenderingFailed("vertex buffers rejected".into()));
        }
        self.events
            .push(PassEvent::SetVertexBuffers(buffers.to_vec(), instance_offset));
        Ok(())
    }

    fn render_target(&self, slot: u32) -> Option<TextureId> {
        if slot == 0 {
            self.render_target
        } else {
            None
        }
    }

    fn commit_shader_resources(
        &mut self,
        binding: ShaderResourceBindingId,
        constant_buffers: &[Option<ConstantBufferRange>; MAX_SHADER_PARAMETER_GROUPS],
    ) {
        self.events.push(PassEvent::Commit(binding));
        self.committed_ranges.push(*constant_buffers);
    }

    fn draw(&mut self, _primitive: PrimitiveTopology, vertices: Range<u32>) {
        self.events.push(PassEvent::Draw(vertices));
    }

    fn draw_indexed(&mut self, _primitive: PrimitiveTopology, indices: Range<u32>) {
        self.events.push(PassEvent::DrawIndexed(indices));
    }

    fn draw_indexed_base_vertex(
        &mut self,
        _primitive: PrimitiveTopology,
        indices: Range<u32>,
        base_vertex: i32,
    ) {
        self.events
            .push(PassEvent::DrawIndexedBaseVertex(indices, base_vertex));
    }

    fn draw_indexed_instanced(
        &mut self,
        _primitive: PrimitiveTopology,
        indices: Range<u32>,
        instance_count: u32,
    ) {
        self.events
            .push(PassEvent::DrawIndexedInstanced(indices, instance_count));
    }

    fn draw_indexed_instanced_base_vertex(
        &mut self,
        _primitive: PrimitiveTopology,
        indices: Range<u32>,
        base_vertex: i32,
        instance_count: u32,
    ) {
        self.events.push(PassEvent::DrawIndexedInstancedBaseVertex(
            indices,
            base_vertex,
            instance_count,
        ));
    }
}

#[derive(Debug, Default)]
pub struct MockCamera {
    pub reversed: bool,
    pub fill_mode: FillMode,
    pub orthographic: bool,
}

impl CameraProcessor for MockCamera {
    fn is_camera_reversed(&self) -> bool {
        self.reversed
    }

    fn camera_fill_mode(&self) -> FillMode {
        self.fill_mode
    }

    fn is_camera_orthographic(&self) -> bool {
        self.orthographic
    }
}

#[derive(Debug, Default)]
pub struct MockShadowMaps {
    pub settings: ShadowMapSettings,
}

impl ShadowMapAllocator for MockShadowMaps {
    fn settings(&self) -> &ShadowMapSettings {
        &self.settings
    }

    fn sampler_state(&self) -> SamplerStateDesc {
        SamplerStateDesc::shadow_comparison()
    }
}

#[derive(Debug)]
pub struct MockInstancing {
    pub layout: VertexBufferLayout,
}

impl InstancingBuffer for MockInstancing {
    fn vertex_layout(&self) -> &VertexBufferLayout {
        &self.layout
    }
}

#[derive(Debug)]
pub struct MockUserPass {
    pub name: String,
    pub flags: DrawableProcessorPassFlags,
}

impl BatchCompositorPass for MockUserPass {
    fn name(&self) -> &str {
        &self.name
    }

    fn flags(&self) -> DrawableProcessorPassFlags {
        self.flags
    }
}

#[derive(Default)]
pub struct MockScene {
    pub passes: Vec<Box<dyn BatchCompositorPass>>,
}

impl MockScene {
    pub fn with_pass(mut self, name: &str, flags: DrawableProcessorPassFlags) -> Self {
        self.passes.push(Box::new(MockUserPass {
            name: name.to_owned(),
            flags,
        }));
        self
    }
}

impl SceneProcessor for MockScene {
    fn user_pass(&self, index: u32) -> Option<&dyn BatchCompositorPass> {
        self.passes.get(index as usize).map(|pass| pass.as_ref())
    }
}
