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

//! The full description of a pipeline state and the compiled object built from it.

use super::enums::{
    BlendMode, CompareFunction, CullMode, FillMode, PrimitiveTopology, StencilOperation,
};
use super::layout::{InputLayoutDesc, VertexBufferLayout};
use super::reflection::ShaderProgramReflection;
use crate::renderer::api::resource::SamplerStateDesc;
use crate::renderer::api::util::TextureFormat;
use crate::StringHash;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// An opaque handle to a shader variation owned by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderId(pub usize);

/// An opaque handle to a compiled pipeline state object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PipelineStateId(pub usize);

/// Stencil test configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StencilState {
    /// Enables the stencil test.
    pub enabled: bool,
    /// Comparison between the reference and the masked buffer value.
    pub compare: CompareFunction,
    /// Operation when both stencil and depth tests pass.
    pub on_passed: StencilOperation,
    /// Operation when the stencil test fails.
    pub on_stencil_failed: StencilOperation,
    /// Operation when the stencil test passes but the depth test fails.
    pub on_depth_failed: StencilOperation,
    /// Reference value.
    pub reference: u32,
    /// Mask applied before comparing.
    pub compare_mask: u32,
    /// Mask applied when writing.
    pub write_mask: u32,
}

impl Default for StencilState {
    fn default() -> Self {
        Self {
            enabled: false,
            compare: CompareFunction::Always,
            on_passed: StencilOperation::Keep,
            on_stencil_failed: StencilOperation::Keep,
            on_depth_failed: StencilOperation::Keep,
            reference: 0,
            compare_mask: u32::MAX,
            write_mask: u32::MAX,
        }
    }
}

/// Every piece of fixed-function and shader state a draw needs.
///
/// Two descriptions that differ only in `debug_name` are equal and hash alike, so
/// they resolve to the same cached pipeline state.
#[derive(Debug, Clone)]
pub struct PipelineStateDesc {
    /// Label forwarded to the backend. Not part of the identity.
    pub debug_name: String,
    /// Vertex input.
    pub input_layout: InputLayoutDesc,
    /// Primitive topology.
    pub primitive_type: PrimitiveTopology,
    /// Vertex shader variation.
    pub vertex_shader: Option<ShaderId>,
    /// Fragment shader variation.
    pub fragment_shader: Option<ShaderId>,
    /// Color target formats, one per target.
    pub render_target_formats: Vec<TextureFormat>,
    /// Depth/stencil target format.
    pub depth_stencil_format: Option<TextureFormat>,
    /// Writes to color targets are enabled.
    pub color_write_enabled: bool,
    /// Blending preset.
    pub blend_mode: BlendMode,
    /// Alpha-to-coverage is enabled.
    pub alpha_to_coverage_enabled: bool,
    /// Rasterization fill mode.
    pub fill_mode: FillMode,
    /// Face culling.
    pub cull_mode: CullMode,
    /// Constant depth bias.
    pub constant_depth_bias: f32,
    /// Slope-scaled depth bias.
    pub slope_scaled_depth_bias: f32,
    /// Depth writes are enabled.
    pub depth_write_enabled: bool,
    /// Depth comparison.
    pub depth_compare: CompareFunction,
    /// Stencil test.
    pub stencil: StencilState,
    /// The scissor test is enabled.
    pub scissor_test_enabled: bool,
    /// Immutable samplers, sorted by shader resource name.
    pub samplers: Vec<(StringHash, SamplerStateDesc)>,
}

impl Default for PipelineStateDesc {
    fn default() -> Self {
        Self {
            debug_name: String::new(),
            input_layout: InputLayoutDesc::default(),
            primitive_type: PrimitiveTopology::TriangleList,
            vertex_shader: None,
            fragment_shader: None,
            render_target_formats: Vec::new(),
            depth_stencil_format: None,
            color_write_enabled: true,
            blend_mode: BlendMode::Replace,
            alpha_to_coverage_enabled: false,
            fill_mode: FillMode::Solid,
            cull_mode: CullMode::Ccw,
            constant_depth_bias: 0.0,
            slope_scaled_depth_bias: 0.0,
            depth_write_enabled: true,
            depth_compare: CompareFunction::LessEqual,
            stencil: StencilState::default(),
            scissor_test_enabled: false,
            samplers: Vec::new(),
        }
    }
}

impl PipelineStateDesc {
    /// Resets to the default state while keeping allocations.
    pub fn reset(&mut self) {
        let mut debug_name = std::mem::take(&mut self.debug_name);
        let mut input_layout = std::mem::take(&mut self.input_layout);
        let mut render_target_formats = std::mem::take(&mut self.render_target_formats);
        let mut samplers = std::mem::take(&mut self.samplers);
        debug_name.clear();
        input_layout.clear();
        render_target_formats.clear();
        samplers.clear();

        *self = Self {
            debug_name,
            input_layout,
            render_target_formats,
            samplers,
            ..Self::default()
        };
    }

    /// Adds an immutable sampler. A sampler already registered under `name` is replaced.
    pub fn add_sampler(&mut self, name: StringHash, sampler: SamplerStateDesc) {
        match self
            .samplers
            .binary_search_by_key(&name, |(existing, _)| *existing)
        {
            Ok(index) => self.samplers[index].1 = sampler,
            Err(index) => self.samplers.insert(index, (name, sampler)),
        }
    }

    /// Returns the sampler registered under `name`.
    pub fn sampler(&self, name: StringHash) -> Option<&SamplerStateDesc> {
        self.samplers
            .binary_search_by_key(&name, |(existing, _)| *existing)
            .ok()
            .map(|index| &self.samplers[index].1)
    }

    /// Sets the input layout from geometry vertex streams and an optional instancing stream.
    ///
    /// The instancing stream, if any, is bound to the slot after the last geometry stream.
    pub fn set_vertex_input(
        &mut self,
        streams: &[VertexBufferLayout],
        instancing: Option<&VertexBufferLayout>,
        primitive_type: PrimitiveTopology,
    ) {
        self.input_layout.clear();
        for (slot, layout) in streams.iter().enumerate() {
            self.input_layout.push_buffer(slot as u32, layout);
        }
        if let Some(layout) = instancing {
            self.input_layout.push_buffer(streams.len() as u32, layout);
        }
        self.primitive_type = primitive_type;
    }
}

impl PartialEq for PipelineStateDesc {
    fn eq(&self, other: &Self) -> bool {
        self.input_layout == other.input_layout
            && self.primitive_type == other.primitive_type
            && self.vertex_shader == other.vertex_shader
            && self.fragment_shader == other.fragment_shader
            && self.render_target_formats == other.render_target_formats
            && self.depth_stencil_format == other.depth_stencil_format
            && self.color_write_enabled == other.color_write_enabled
            && self.blend_mode == other.blend_mode
            && self.alpha_to_coverage_enabled == other.alpha_to_coverage_enabled
            && self.fill_mode == other.fill_mode
            && self.cull_mode == other.cull_mode
            && self.constant_depth_bias.to_bits() == other.constant_depth_bias.to_bits()
            && self.slope_scaled_depth_bias.to_bits() == other.slope_scaled_depth_bias.to_bits()
            && self.depth_write_enabled == other.depth_write_enabled
            && self.depth_compare == other.depth_compare
            && self.stencil == other.stencil
            && self.scissor_test_enabled == other.scissor_test_enabled
            && self.samplers == other.samplers
    }
}

impl Eq for PipelineStateDesc {}

impl Hash for PipelineStateDesc {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.input_layout.hash(state);
        self.primitive_type.hash(state);
        self.vertex_shader.hash(state);
        self.fragment_shader.hash(state);
        self.render_target_formats.hash(state);
        self.depth_stencil_format.hash(state);
        self.color_write_enabled.hash(state);
        self.blend_mode.hash(state);
        self.alpha_to_coverage_enabled.hash(state);
        self.fill_mode.hash(state);
        self.cull_mode.hash(state);
        self.constant_depth_bias.to_bits().hash(state);
        self.slope_scaled_depth_bias.to_bits().hash(state);
        self.depth_write_enabled.hash(state);
        self.depth_compare.hash(state);
        self.stencil.hash(state);
        self.scissor_test_enabled.hash(state);
        self.samplers.hash(state);
    }
}

/// A compiled pipeline state together with the reflection of its shader program.
#[derive(Debug)]
pub struct PipelineState {
    id: PipelineStateId,
    desc: PipelineStateDesc,
    reflection: Arc<ShaderProgramReflection>,
}

impl PipelineState {
    /// Wraps a backend pipeline object.
    pub fn new(
        id: PipelineStateId,
        desc: PipelineStateDesc,
        reflection: Arc<ShaderProgramReflection>,
    ) -> Self {
        Self {
            id,
            desc,
            reflection,
        }
    }

    /// The backend handle.
    pub fn id(&self) -> PipelineStateId {
        self.id
    }

    /// The description the state was created from.
    pub fn desc(&self) -> &PipelineStateDesc {
        &self.desc
    }

    /// Reflection of the linked shader program.
    pub fn reflection(&self) -> &Arc<ShaderProgramReflection> {
        &self.reflection
    }

    /// Whether draws with this state use the scissor test.
    pub fn is_scissor_test_enabled(&self) -> bool {
        self.desc.scissor_test_enabled
    }
}
