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

//! Interfaces of the render pipeline subsystems the builder reads from.

use super::{BatchStateCreateContext, BatchStateCreateKey, BuilderServices, PipelineBuildError, ShaderProgramDesc};
use sable_core::renderer::api::{
    core::ShadowMapSettings,
    pipeline::{FillMode, PipelineStateDesc, VertexBufferLayout},
    resource::SamplerStateDesc,
};
use sable_core::sable_bitflags;
use std::fmt;

/// Index of the shadow subpass of the built-in shadow pass.
pub const SHADOW_SUBPASS: u32 = 0;
/// Index of the light volume subpass of the built-in deferred lighting pass.
pub const LIGHT_VOLUME_SUBPASS: u32 = 1;

sable_bitflags! {
    /// Behavior switches a user pass exposes to the builder.
    pub struct DrawableProcessorPassFlags: u32 {
        /// The pass applies ambient lighting and samples the zone environment maps.
        const HAS_AMBIENT_LIGHTING = 1 << 0;
        /// The deferred subpass writes the drawable light mask into the stencil buffer.
        const DEFERRED_LIGHT_MASK_TO_STENCIL = 1 << 1;
        /// The pass builds its pipeline states itself.
        const PIPELINE_STATE_CALLBACK = 1 << 2;
    }
}

/// Subpasses of a user pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchCompositorSubpass {
    /// Batches not drawn by the pass.
    Ignored,
    /// Geometry buffer fill of deferred lighting.
    Deferred,
    /// Unlit or ambient-lit base batches.
    Base,
    /// Additive per-pixel light batches.
    Light,
}

impl BatchCompositorSubpass {
    /// Maps a context subpass index to a subpass.
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(Self::Ignored),
            1 => Some(Self::Deferred),
            2 => Some(Self::Base),
            3 => Some(Self::Light),
            _ => None,
        }
    }
}

/// Per-frame camera state.
pub trait CameraProcessor: fmt::Debug {
    /// Returns `true` if the camera projection mirrors the triangle winding.
    fn is_camera_reversed(&self) -> bool;

    /// The fill mode forced by the camera (wireframe debug views).
    fn camera_fill_mode(&self) -> FillMode;

    /// Returns `true` for orthographic projections.
    fn is_camera_orthographic(&self) -> bool;
}

/// Owner of the shadow map atlas.
pub trait ShadowMapAllocator: fmt::Debug {
    /// Shadow map configuration.
    fn settings(&self) -> &ShadowMapSettings;

    /// The sampler shadow maps are read with.
    fn sampler_state(&self) -> SamplerStateDesc;
}

/// The per-frame instancing vertex stream.
pub trait InstancingBuffer: fmt::Debug {
    /// Layout of one instance in the stream.
    fn vertex_layout(&self) -> &VertexBufferLayout;
}

/// A pass registered with the scene that draws drawables through the batch compositor.
pub trait BatchCompositorPass {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    /// Behavior switches of the pass.
    fn flags(&self) -> DrawableProcessorPassFlags;

    /// Fills `desc` for a batch. Only called when the pass sets
    /// [`DrawableProcessorPassFlags::PIPELINE_STATE_CALLBACK`].
    ///
    /// `desc` and `program` are cleared before the call.
    fn create_pipeline_state(
        &self,
        desc: &mut PipelineStateDesc,
        program: &mut ShaderProgramDesc,
        services: &BuilderServices<'_>,
        key: &BatchStateCreateKey<'_>,
        ctx: &BatchStateCreateContext,
    ) -> Result<(), PipelineBuildError> {
        let _ = (desc, program, services, key, ctx);
        Err(PipelineBuildError::CallbackNotImplemented(
            self.name().to_owned(),
        ))
    }
}

/// Resolves the user passes referenced by batch contexts.
pub trait SceneProcessor {
    /// Returns the user pass registered at `index`.
    fn user_pass(&self, index: u32) -> Option<&dyn BatchCompositorPass>;
}
