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

//! Shader program reflection consumed by the submission lanes.

use crate::renderer::api::util::{ShaderParameterGroup, MAX_SHADER_PARAMETER_GROUPS};
use crate::StringHash;
use ahash::{AHashMap, AHashSet};

/// Constant buffer blocks are sized in multiples of a 16-byte register.
const REGISTER_SIZE: u32 = 16;

/// Location of a uniform parameter inside its constant buffer group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderParameterReflection {
    /// The group whose block contains the parameter.
    pub group: ShaderParameterGroup,
    /// Byte offset inside the group block.
    pub offset: u32,
    /// Size of the parameter in bytes.
    pub size: u32,
}

/// Names of textures sampled and uniform parameters read by a linked shader program.
#[derive(Debug, Clone, Default)]
pub struct ShaderProgramReflection {
    resources: AHashSet<StringHash>,
    parameters: AHashMap<StringHash, ShaderParameterReflection>,
    group_sizes: [u32; MAX_SHADER_PARAMETER_GROUPS],
}

impl ShaderProgramReflection {
    /// Creates an empty reflection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a texture the program samples.
    pub fn add_shader_resource(&mut self, name: StringHash) {
        self.resources.insert(name);
    }

    /// Registers a uniform parameter and grows its group block to contain it.
    pub fn add_shader_parameter(
        &mut self,
        group: ShaderParameterGroup,
        name: StringHash,
        offset: u32,
        size: u32,
    ) {
        self.parameters.insert(
            name,
            ShaderParameterReflection {
                group,
                offset,
                size,
            },
        );
        let end = (offset + size).div_ceil(REGISTER_SIZE) * REGISTER_SIZE;
        let block = &mut self.group_sizes[group.index()];
        *block = (*block).max(end);
    }

    /// Builder form of [`Self::add_shader_resource`].
    pub fn with_resource(mut self, name: impl Into<StringHash>) -> Self {
        self.add_shader_resource(name.into());
        self
    }

    /// Builder form of [`Self::add_shader_parameter`].
    pub fn with_parameter(
        mut self,
        group: ShaderParameterGroup,
        name: impl Into<StringHash>,
        offset: u32,
        size: u32,
    ) -> Self {
        self.add_shader_parameter(group, name.into(), offset, size);
        self
    }

    /// Returns `true` if the program samples a texture with this name.
    pub fn has_shader_resource(&self, name: StringHash) -> bool {
        self.resources.contains(&name)
    }

    /// Looks up a uniform parameter.
    pub fn shader_parameter(&self, name: StringHash) -> Option<&ShaderParameterReflection> {
        self.parameters.get(&name)
    }

    /// Size of the constant buffer block of `group`. Zero if the program does not use it.
    pub fn constant_buffer_size(&self, group: ShaderParameterGroup) -> u32 {
        self.group_sizes[group.index()]
    }

    /// Iterates over the sampled texture names.
    pub fn shader_resources(&self) -> impl Iterator<Item = StringHash> + '_ {
        self.resources.iter().copied()
    }
}
