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

use crate::renderer::api::command::{ShaderResourceBindingCreateInfo, ShaderResourceBindingId};
use crate::renderer::api::core::DeviceCaps;
use crate::renderer::api::pipeline::{PipelineState, PipelineStateDesc, PipelineStateId, ShaderId};
use crate::renderer::api::resource::{BufferDescriptor, BufferId, TextureDirtyState, TextureId};
use crate::renderer::api::util::ShaderStage;
use crate::renderer::error::ResourceError;
use std::fmt::Debug;

/// The resource factory of a graphics backend.
///
/// Methods take `&self`; implementations synchronize their internal registries.
pub trait GraphicsDevice: Send + Sync + Debug + 'static {
    /// Returns the limits and preferred formats of the device.
    fn caps(&self) -> &DeviceCaps;

    /// Creates a new GPU buffer.
    /// ## Arguments
    /// * `descriptor` - A reference to a `BufferDescriptor` containing the buffer configuration.
    /// ## Returns
    /// A `Result` containing the ID of the created buffer or an error if the creation fails.
    fn create_buffer(&self, descriptor: &BufferDescriptor) -> Result<BufferId, ResourceError>;

    /// Destroys a GPU buffer.
    /// ## Arguments
    /// * `id` - The ID of the buffer to be destroyed.
    /// ## Returns
    /// A `Result` indicating success or failure of the operation.
    fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError>;

    /// Writes data to a GPU buffer.
    /// ## Arguments
    /// * `id` - The ID of the buffer to write to.
    /// * `offset` - The offset in the buffer where the data will be written.
    /// * `data` - A slice of bytes containing the data to be written.
    /// ## Returns
    /// A `Result` indicating success or failure of the operation.
    fn write_buffer(&self, id: BufferId, offset: u64, data: &[u8]) -> Result<(), ResourceError>;

    /// Looks up the shader variation for a stage, name and define string.
    /// ## Arguments
    /// * `stage` - The pipeline stage.
    /// * `name` - The shader name.
    /// * `defines` - Space-separated preprocessor defines.
    /// ## Returns
    /// The shader handle, or `None` if no such variation can be built.
    fn get_shader(&self, stage: ShaderStage, name: &str, defines: &str) -> Option<ShaderId>;

    /// Compiles a pipeline state object.
    /// ## Arguments
    /// * `desc` - The full pipeline description.
    /// ## Returns
    /// The compiled state, including the reflection of its linked shader program.
    /// ## Errors
    /// * `ResourceError` - If the backend rejects the description.
    fn create_pipeline_state(&self, desc: &PipelineStateDesc)
        -> Result<PipelineState, ResourceError>;

    /// Destroys a pipeline state object.
    fn destroy_pipeline_state(&self, id: PipelineStateId) -> Result<(), ResourceError>;

    /// Creates the backend object binding textures and constant buffers for a pipeline.
    /// ## Arguments
    /// * `info` - The pipeline and the resources to bind to it.
    /// ## Returns
    /// The handle of the created binding.
    fn create_shader_resource_binding(
        &self,
        info: &ShaderResourceBindingCreateInfo,
    ) -> Result<ShaderResourceBindingId, ResourceError>;

    /// Destroys a shader resource binding.
    fn destroy_shader_resource_binding(
        &self,
        id: ShaderResourceBindingId,
    ) -> Result<(), ResourceError>;

    /// Reports which lazy maintenance a texture needs before sampling.
    fn texture_dirty_state(&self, _id: TextureId) -> TextureDirtyState {
        TextureDirtyState::CLEAN
    }

    /// Regenerates the mip chain of a texture.
    fn regenerate_texture_levels(&self, _id: TextureId) {}

    /// Re-applies the sampling parameters of a texture.
    fn update_texture_parameters(&self, _id: TextureId) {}

    /// Returns a copy of a texture that can be sampled while the original is bound as a
    /// render target.
    fn backup_texture(&self, _id: TextureId) -> Option<TextureId> {
        None
    }
}
