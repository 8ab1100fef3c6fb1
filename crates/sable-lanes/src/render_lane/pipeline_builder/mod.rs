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

//! Derivation of batch pipeline states from material, pass and light data.
//!
//! [`PipelineStateBuilder::create_batch_pipeline_state`] picks a policy from the
//! batch context, evaluated in order:
//!
//! 1. no user pass and the shadow subpass: shadow map state;
//! 2. no user pass and the light volume subpass: deferred light volume state;
//! 3. a user pass flagged with a pipeline state callback: the pass fills the state;
//! 4. any other user pass: the generic drawable state.
//!
//! The resulting description is resolved through the shared [`PipelineStateCache`].

mod collaborators;
mod compositor;
mod error;
mod policies;
mod samplers;

pub use self::collaborators::*;
pub use self::compositor::*;
pub use self::error::*;

use super::pipeline_cache::PipelineStateCache;
use sable_core::renderer::{
    api::{
        pipeline::{PipelineState, PipelineStateDesc, ShaderId},
        scene::{Drawable, GlobalIlluminationType, Geometry, Material, Pass, PixelLight},
        util::{GeometryType, ShaderStage},
    },
    GraphicsDevice, ShaderError,
};
use std::sync::Arc;

/// The inputs of a batch that select its pipeline state.
#[derive(Debug, Clone, Copy)]
pub struct BatchStateCreateKey<'a> {
    /// Vertex streams and primitive type of the batch.
    pub geometry: &'a Geometry,
    /// How the vertex shader transforms the geometry.
    pub geometry_type: GeometryType,
    /// The material drawn.
    pub material: &'a Material,
    /// The material technique pass drawn.
    pub pass: &'a Pass,
    /// The drawable owning the geometry.
    pub drawable: &'a Drawable,
    /// The per-pixel light of the batch, if any.
    pub pixel_light: Option<&'a PixelLight>,
}

/// Where in the render pipeline the batch is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchStateCreateContext {
    /// The user pass, or `None` for the built-in shadow and light volume passes.
    pub pass: Option<u32>,
    /// Subpass inside the pass.
    pub subpass_index: u32,
    /// Shadow cascade split of shadow batches.
    pub shadow_split_index: u32,
}

/// The subsystems a pipeline state is derived against.
#[derive(Debug, Clone, Copy)]
pub struct BuilderServices<'a> {
    /// Shader lookup, capabilities and pipeline creation.
    pub device: &'a dyn GraphicsDevice,
    /// The camera of the frame.
    pub camera: &'a dyn CameraProcessor,
    /// Shadow map settings and sampler.
    pub shadow_maps: &'a dyn ShadowMapAllocator,
    /// The instancing stream, if the renderer uses instancing.
    pub instancing: Option<&'a dyn InstancingBuffer>,
}

impl<'a> BuilderServices<'a> {
    /// Sets the input layout from the geometry streams, adding the instancing stream
    /// when the program uses it.
    pub fn setup_input_layout_and_primitive_type(
        &self,
        desc: &mut PipelineStateDesc,
        program: &ShaderProgramDesc,
        geometry: &Geometry,
    ) {
        let instancing = if program.is_instancing_used {
            let layout = self.instancing.map(|buffer| buffer.vertex_layout());
            if layout.is_none() {
                log::warn!("PipelineStateBuilder: instanced batch without an instancing buffer");
            }
            layout
        } else {
            None
        };
        desc.set_vertex_input(&geometry.vertex_layouts, instancing, geometry.primitive_type);
    }

    /// Appends the common defines to every stage and looks up the shaders.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError::NotFound`] if a stage has no matching variation.
    pub fn setup_shaders(
        &self,
        desc: &mut PipelineStateDesc,
        program: &mut ShaderProgramDesc,
    ) -> Result<(), PipelineBuildError> {
        for defines in &mut program.shader_defines {
            defines.push_str(&program.common_defines);
        }
        desc.vertex_shader = Some(self.shader(program, ShaderStage::Vertex)?);
        desc.fragment_shader = Some(self.shader(program, ShaderStage::Fragment)?);
        Ok(())
    }

    fn shader(
        &self,
        program: &ShaderProgramDesc,
        stage: ShaderStage,
    ) -> Result<ShaderId, ShaderError> {
        let name = &program.shader_name[stage.index()];
        let defines = program.shader_defines[stage.index()].trim_end();
        self.device
            .get_shader(stage, name, defines)
            .ok_or_else(|| ShaderError::NotFound {
                stage,
                name: name.clone(),
                defines: defines.to_owned(),
            })
    }
}

/// Builds and de-duplicates the pipeline states of scene batches.
///
/// The builder keeps scratch descriptions between calls but no state that affects
/// the result: the same key and context always give the same pipeline state.
pub struct PipelineStateBuilder<'a> {
    services: BuilderServices<'a>,
    scene: &'a dyn SceneProcessor,
    cache: &'a PipelineStateCache,
    compositor: ShaderProgramCompositor,
    desc: PipelineStateDesc,
    program: ShaderProgramDesc,
}

impl<'a> PipelineStateBuilder<'a> {
    /// Creates a builder over the given subsystems.
    ///
    /// ## Arguments
    ///
    /// * `services` - Device, camera, shadow and instancing subsystems.
    /// * `scene` - Resolves user passes by index.
    /// * `cache` - The pipeline state cache shared by the renderer.
    pub fn new(
        services: BuilderServices<'a>,
        scene: &'a dyn SceneProcessor,
        cache: &'a PipelineStateCache,
    ) -> Self {
        Self {
            services,
            scene,
            cache,
            compositor: ShaderProgramCompositor::default(),
            desc: PipelineStateDesc::default(),
            program: ShaderProgramDesc::default(),
        }
    }

    /// Replaces the shader variation settings.
    pub fn set_settings(&mut self, settings: ShaderProgramCompositorSettings) {
        self.compositor.set_settings(settings);
    }

    /// Captures the camera state. Call once per frame before building states.
    pub fn update_frame_settings(&mut self) {
        self.compositor.set_frame_settings(self.services.camera);
    }

    /// The subsystems the builder reads from.
    pub fn services(&self) -> &BuilderServices<'a> {
        &self.services
    }

    /// Returns the pipeline state of a batch, creating it on first use.
    ///
    /// ## Returns
    ///
    /// `None` if the state cannot be derived (missing shader, unknown pass) or the
    /// device fails to create it. The failure is logged.
    pub fn create_batch_pipeline_state(
        &mut self,
        key: &BatchStateCreateKey<'_>,
        ctx: &BatchStateCreateContext,
    ) -> Option<Arc<PipelineState>> {
        if let Err(e) = self.build(key, ctx) {
            log::error!(
                "PipelineStateBuilder: Failed to build pipeline state for material '{}', pass '{}': {}",
                key.material.name,
                key.pass.name,
                e
            );
            return None;
        }

        match self.cache.get_or_create(self.services.device, &self.desc) {
            Ok(state) => Some(state),
            Err(e) => {
                log::error!(
                    "PipelineStateBuilder: Failed to create pipeline state '{}': {}",
                    self.desc.debug_name,
                    e
                );
                None
            }
        }
    }

    fn build(
        &mut self,
        key: &BatchStateCreateKey<'_>,
        ctx: &BatchStateCreateContext,
    ) -> Result<(), PipelineBuildError> {
        self.desc.reset();
        self.program.clear();

        let Some(pass_index) = ctx.pass else {
            return match ctx.subpass_index {
                SHADOW_SUBPASS => self.build_shadow_batch(key, ctx),
                LIGHT_VOLUME_SUBPASS => self.build_light_volume_batch(key),
                other => Err(PipelineBuildError::InvalidSubpass(other)),
            };
        };

        let scene = self.scene;
        let user_pass = scene
            .user_pass(pass_index)
            .ok_or(PipelineBuildError::UnknownPass(pass_index))?;

        if user_pass
            .flags()
            .contains(DrawableProcessorPassFlags::PIPELINE_STATE_CALLBACK)
        {
            user_pass.create_pipeline_state(
                &mut self.desc,
                &mut self.program,
                &self.services,
                key,
                ctx,
            )
        } else {
            self.build_user_batch(user_pass, key, ctx)
        }
    }

    fn build_shadow_batch(
        &mut self,
        key: &BatchStateCreateKey<'_>,
        ctx: &BatchStateCreateContext,
    ) -> Result<(), PipelineBuildError> {
        let light = key.pixel_light.ok_or(PipelineBuildError::MissingLight)?;

        self.compositor.process_shadow_batch(
            &mut self.program,
            key.geometry_type,
            key.material,
            key.pass,
            &light.light,
            self.services.shadow_maps.settings(),
        );
        policies::setup_shadow_pass_state(
            &mut self.desc,
            &self.services,
            ctx.shadow_split_index,
            light,
            key.material,
            key.pass,
        );
        samplers::setup_samplers_for_user_or_shadow_pass(
            &mut self.desc,
            &self.services,
            key.material,
            None,
            false,
            false,
        );
        self.services
            .setup_input_layout_and_primitive_type(&mut self.desc, &self.program, key.geometry);
        self.services.setup_shaders(&mut self.desc, &mut self.program)
    }

    fn build_light_volume_batch(
        &mut self,
        key: &BatchStateCreateKey<'_>,
    ) -> Result<(), PipelineBuildError> {
        let light = key.pixel_light.ok_or(PipelineBuildError::MissingLight)?;
        let shadow_maps = self.services.shadow_maps;

        self.compositor.process_light_volume_batch(
            &mut self.program,
            key.geometry_type,
            key.pass,
            &light.light,
            light.has_shadow.then(|| shadow_maps.settings()),
        );
        policies::setup_light_volume_pass_state(&mut self.desc, &self.services, light);
        self.services
            .setup_input_layout_and_primitive_type(&mut self.desc, &self.program, key.geometry);
        self.services.setup_shaders(&mut self.desc, &mut self.program)
    }

    fn build_user_batch(
        &mut self,
        user_pass: &dyn BatchCompositorPass,
        key: &BatchStateCreateKey<'_>,
        ctx: &BatchStateCreateContext,
    ) -> Result<(), PipelineBuildError> {
        let subpass = BatchCompositorSubpass::from_index(ctx.subpass_index)
            .ok_or(PipelineBuildError::InvalidSubpass(ctx.subpass_index))?;
        let flags = user_pass.flags();
        let light_mask_to_stencil = subpass == BatchCompositorSubpass::Deferred
            && flags.contains(DrawableProcessorPassFlags::DEFERRED_LIGHT_MASK_TO_STENCIL);
        let has_ambient = flags.contains(DrawableProcessorPassFlags::HAS_AMBIENT_LIGHTING);
        let has_lightmap = key.drawable.gi_type == GlobalIlluminationType::UseLightMap;
        let pixel_light = key.pixel_light;
        let shadow_maps = self.services.shadow_maps;

        self.compositor.process_user_batch(
            &mut self.program,
            flags,
            key.drawable,
            key.geometry_type,
            key.material,
            key.pass,
            pixel_light.map(|light| &light.light),
            pixel_light
                .filter(|light| light.has_shadow)
                .map(|_| shadow_maps.settings()),
            subpass,
        );

        self.desc.debug_name = format!("DrawablePipeline({})", key.material.name);
        policies::setup_user_pass_state(
            &mut self.desc,
            &self.services,
            key.drawable,
            key.material,
            key.pass,
            light_mask_to_stencil,
        );

        if pixel_light.is_some_and(|light| light.light.negative) {
            if subpass == BatchCompositorSubpass::Light {
                self.desc.blend_mode = self.desc.blend_mode.to_subtractive();
            } else {
                log::warn!(
                    "PipelineStateBuilder: negative light in {:?} subpass of '{}' keeps its blend mode",
                    subpass,
                    user_pass.name()
                );
            }
        }

        samplers::setup_samplers_for_user_or_shadow_pass(
            &mut self.desc,
            &self.services,
            key.material,
            pixel_light,
            has_lightmap,
            has_ambient,
        );
        self.services
            .setup_input_layout_and_primitive_type(&mut self.desc, &self.program, key.geometry);
        self.services.setup_shaders(&mut self.desc, &mut self.program)
    }
}
