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

//! Shader resource bindings: the textures and constant buffers bound to a pipeline.

use crate::renderer::api::pipeline::PipelineStateId;
use crate::renderer::api::resource::{BufferId, TextureId};
use crate::renderer::api::util::MAX_SHADER_PARAMETER_GROUPS;
use crate::StringHash;

/// An opaque handle to a backend shader resource binding object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderResourceBindingId(pub usize);

/// Everything a backend needs to create a [`ShaderResourceBindingId`].
///
/// This is also the key of the binding cache: two infos with the same pipeline,
/// textures (in order) and constant buffers resolve to the same binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShaderResourceBindingCreateInfo {
    /// The pipeline state whose layout the binding targets.
    pub pipeline: PipelineStateId,
    /// Textures by shader resource name.
    pub textures: Vec<(StringHash, TextureId)>,
    /// Constant buffer bound for each parameter group.
    pub constant_buffers: [Option<BufferId>; MAX_SHADER_PARAMETER_GROUPS],
}

impl ShaderResourceBindingCreateInfo {
    /// Creates an info with no resources.
    pub fn new(pipeline: PipelineStateId) -> Self {
        Self {
            pipeline,
            textures: Vec::new(),
            constant_buffers: [None; MAX_SHADER_PARAMETER_GROUPS],
        }
    }

    /// Clears all resources and retargets the info, keeping allocations.
    pub fn reset(&mut self, pipeline: PipelineStateId) {
        self.pipeline = pipeline;
        self.textures.clear();
        self.constant_buffers = [None; MAX_SHADER_PARAMETER_GROUPS];
    }

    /// Appends a texture binding.
    pub fn add_texture(&mut self, name: StringHash, texture: TextureId) {
        self.textures.push((name, texture));
    }

    /// Returns `true` if the binding references `texture`.
    pub fn uses_texture(&self, texture: TextureId) -> bool {
        self.textures.iter().any(|(_, bound)| *bound == texture)
    }

    /// Returns `true` if the binding references `buffer`.
    pub fn uses_buffer(&self, buffer: BufferId) -> bool {
        self.constant_buffers.contains(&Some(buffer))
    }
}
