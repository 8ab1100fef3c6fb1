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

//! Cache of shader resource bindings keyed by their full creation info.

use ahash::AHashMap;
use sable_core::renderer::{
    api::{
        command::{ShaderResourceBindingCreateInfo, ShaderResourceBindingId},
        pipeline::PipelineStateId,
        resource::{BufferId, TextureId},
    },
    GraphicsDevice, ResourceError,
};

/// Maps binding creation infos to backend binding objects.
///
/// The draw queue rebuilds a creation info for every draw and relies on this cache
/// to turn repeated combinations into a single hash lookup.
#[derive(Debug, Default)]
pub struct ShaderResourceBindingCache {
    bindings: AHashMap<ShaderResourceBindingCreateInfo, ShaderResourceBindingId>,
    hits: u64,
    misses: u64,
}

impl ShaderResourceBindingCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the binding for `info`, creating it on a miss.
    ///
    /// Identical infos always return the same binding.
    pub fn get_or_create(
        &mut self,
        device: &dyn GraphicsDevice,
        info: &ShaderResourceBindingCreateInfo,
    ) -> Result<ShaderResourceBindingId, ResourceError> {
        if let Some(&binding) = self.bindings.get(info) {
            self.hits += 1;
            return Ok(binding);
        }

        let binding = device.create_shader_resource_binding(info)?;
        log::trace!(
            "ShaderResourceBindingCache: created {:?} for pipeline {:?} ({} textures)",
            binding,
            info.pipeline,
            info.textures.len()
        );
        self.bindings.insert(info.clone(), binding);
        self.misses += 1;
        Ok(binding)
    }

    /// Number of cached bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` if the cache holds no bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Lookups served from the cache.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that created a binding.
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Destroys every binding that targets `pipeline`.
    pub fn invalidate_pipeline(&mut self, device: &dyn GraphicsDevice, pipeline: PipelineStateId) {
        self.evict(device, |info| info.pipeline == pipeline);
    }

    /// Destroys every binding that references `texture`.
    pub fn invalidate_texture(&mut self, device: &dyn GraphicsDevice, texture: TextureId) {
        self.evict(device, |info| info.uses_texture(texture));
    }

    /// Destroys every binding that references `buffer`.
    pub fn invalidate_buffer(&mut self, device: &dyn GraphicsDevice, buffer: BufferId) {
        self.evict(device, |info| info.uses_buffer(buffer));
    }

    /// Destroys every binding.
    pub fn clear(&mut self, device: &dyn GraphicsDevice) {
        self.evict(device, |_| true);
    }

    fn evict(
        &mut self,
        device: &dyn GraphicsDevice,
        mut predicate: impl FnMut(&ShaderResourceBindingCreateInfo) -> bool,
    ) {
        self.bindings.retain(|info, binding| {
            if !predicate(info) {
                return true;
            }
            if let Err(e) = device.destroy_shader_resource_binding(*binding) {
                log::warn!(
                    "ShaderResourceBindingCache: Failed to destroy binding {:?}: {:?}",
                    binding,
                    e
                );
            }
            false
        });
    }
}
