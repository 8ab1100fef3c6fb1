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

//! Shader variation selection.
//!
//! The compositor turns the inputs of a batch into shader names and preprocessor
//! defines. Defines are space separated; the common defines are appended to every
//! stage when the shaders are looked up.

use super::collaborators::{BatchCompositorSubpass, CameraProcessor, DrawableProcessorPassFlags};
use sable_core::renderer::api::{
    core::{RenderSettings, ShadowMapSettings},
    scene::{Drawable, GlobalIlluminationType, Light, Material, Pass},
    util::{GeometryType, ShaderStage, MAX_SHADER_STAGES},
};

/// Shader names and defines of one shader program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderProgramDesc {
    /// Shader name per stage.
    pub shader_name: [String; MAX_SHADER_STAGES],
    /// Stage-specific defines.
    pub shader_defines: [String; MAX_SHADER_STAGES],
    /// Defines shared by every stage.
    pub common_defines: String,
    /// The vertex shader reads the instancing stream.
    pub is_instancing_used: bool,
}

impl ShaderProgramDesc {
    /// Clears the description, keeping allocations.
    pub fn clear(&mut self) {
        for name in &mut self.shader_name {
            name.clear();
        }
        for defines in &mut self.shader_defines {
            defines.clear();
        }
        self.common_defines.clear();
        self.is_instancing_used = false;
    }

    /// Adds a define to every stage.
    pub fn add_common_define(&mut self, define: &str) {
        push_defines(&mut self.common_defines, define);
    }

    /// Adds defines to one stage.
    pub fn add_shader_defines(&mut self, stage: ShaderStage, defines: &str) {
        push_defines(&mut self.shader_defines[stage.index()], defines);
    }

    /// Sets the shader of one stage.
    pub fn set_shader_name(&mut self, stage: ShaderStage, name: &str) {
        let slot = &mut self.shader_name[stage.index()];
        slot.clear();
        slot.push_str(name);
    }
}

fn push_defines(target: &mut String, defines: &str) {
    for define in defines.split_whitespace() {
        target.push_str(define);
        target.push(' ');
    }
}

/// Global switches of the compositor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShaderProgramCompositorSettings {
    /// Lighting is computed in linear space.
    pub linear_space_lighting: bool,
}

impl From<&RenderSettings> for ShaderProgramCompositorSettings {
    fn from(settings: &RenderSettings) -> Self {
        Self {
            linear_space_lighting: settings.linear_space_lighting,
        }
    }
}

/// Accumulates the shader variation of each kind of batch.
#[derive(Debug, Clone, Default)]
pub struct ShaderProgramCompositor {
    settings: ShaderProgramCompositorSettings,
    camera_orthographic: bool,
}

impl ShaderProgramCompositor {
    /// Creates a compositor with default settings.
    pub fn new(settings: ShaderProgramCompositorSettings) -> Self {
        Self {
            settings,
            camera_orthographic: false,
        }
    }

    /// Replaces the global settings.
    pub fn set_settings(&mut self, settings: ShaderProgramCompositorSettings) {
        self.settings = settings;
    }

    /// The global settings.
    pub fn settings(&self) -> &ShaderProgramCompositorSettings {
        &self.settings
    }

    /// Captures the camera state of the frame.
    pub fn set_frame_settings(&mut self, camera: &dyn CameraProcessor) {
        self.camera_orthographic = camera.is_camera_orthographic();
    }

    /// Variation of a shadow map batch.
    ///
    /// `shadow_maps` must be the settings the shadow map targets are allocated with.
    pub fn process_shadow_batch(
        &self,
        program: &mut ShaderProgramDesc,
        geometry_type: GeometryType,
        material: &Material,
        pass: &Pass,
        light: &Light,
        shadow_maps: &ShadowMapSettings,
    ) {
        self.apply_pass_and_material(program, material, pass);
        self.apply_geometry(program, geometry_type);
        program.add_common_define(light.light_type.shader_define());
        if shadow_maps.enable_variance_shadow_maps {
            program.add_common_define("VSM_SHADOW");
        }
    }

    /// Variation of a deferred light volume batch.
    ///
    /// `shadow_maps` is set when the light has a shadow map this frame.
    pub fn process_light_volume_batch(
        &self,
        program: &mut ShaderProgramDesc,
        geometry_type: GeometryType,
        pass: &Pass,
        light: &Light,
        shadow_maps: Option<&ShadowMapSettings>,
    ) {
        self.apply_pass(program, pass);
        self.apply_geometry(program, geometry_type);
        self.apply_pixel_light(program, light, shadow_maps);
        self.apply_camera(program);
    }

    /// Variation of a user pass batch.
    #[allow(clippy::too_many_arguments)]
    pub fn process_user_batch(
        &self,
        program: &mut ShaderProgramDesc,
        flags: DrawableProcessorPassFlags,
        drawable: &Drawable,
        geometry_type: GeometryType,
        material: &Material,
        pass: &Pass,
        light: Option<&Light>,
        shadow_maps: Option<&ShadowMapSettings>,
        subpass: BatchCompositorSubpass,
    ) {
        self.apply_pass_and_material(program, material, pass);
        self.apply_geometry(program, geometry_type);

        if drawable.gi_type == GlobalIlluminationType::UseLightMap {
            program.add_common_define("LIGHTMAP");
        }
        if flags.contains(DrawableProcessorPassFlags::HAS_AMBIENT_LIGHTING)
            && subpass != BatchCompositorSubpass::Light
        {
            program.add_common_define("AMBIENT");
        }
        if subpass == BatchCompositorSubpass::Deferred {
            program.add_common_define("DEFERRED");
        }
        if let Some(light) = light {
            self.apply_pixel_light(program, light, shadow_maps);
        }
        self.apply_camera(program);
    }

    fn apply_pass(&self, program: &mut ShaderProgramDesc, pass: &Pass) {
        program.set_shader_name(ShaderStage::Vertex, &pass.vertex_shader);
        program.set_shader_name(ShaderStage::Fragment, &pass.fragment_shader);
        program.add_shader_defines(ShaderStage::Vertex, &pass.vertex_shader_defines);
        program.add_shader_defines(ShaderStage::Fragment, &pass.fragment_shader_defines);
    }

    fn apply_pass_and_material(&self, program: &mut ShaderProgramDesc, material: &Material, pass: &Pass) {
        self.apply_pass(program, pass);
        program.add_common_define(&material.shader_defines);
    }

    fn apply_geometry(&self, program: &mut ShaderProgramDesc, geometry_type: GeometryType) {
        if let Some(define) = geometry_type.shader_define() {
            program.add_common_define(define);
        }
        program.is_instancing_used = geometry_type == GeometryType::Instanced;
    }

    fn apply_pixel_light(
        &self,
        program: &mut ShaderProgramDesc,
        light: &Light,
        shadow_maps: Option<&ShadowMapSettings>,
    ) {
        program.add_common_define("PERPIXEL");
        program.add_common_define(light.light_type.shader_define());
        if let Some(shadow_maps) = shadow_maps {
            program.add_common_define("SHADOW");
            if shadow_maps.enable_variance_shadow_maps {
                program.add_common_define("VSM_SHADOW");
            }
        }
        if self.settings.linear_space_lighting {
            program.add_common_define("LINEAR_LIGHTING");
        }
    }

    fn apply_camera(&self, program: &mut ShaderProgramDesc) {
        if self.camera_orthographic {
            program.add_common_define("ORTHO");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sable_core::renderer::api::scene::LightType;

    fn defines(program: &ShaderProgramDesc) -> Vec<&str> {
        program.common_defines.split_whitespace().collect()
    }

    #[test]
    fn test_defines_are_normalized() {
        let mut program = ShaderProgramDesc::default();
        program.add_common_define("  NORMALMAP   PARALLAX ");
        assert_eq!(program.common_defines, "NORMALMAP PARALLAX ");
        program.clear();
        assert!(program.common_defines.is_empty());
    }

    #[test]
    fn test_user_batch_with_shadowed_light() {
        let compositor = ShaderProgramCompositor::new(ShaderProgramCompositorSettings {
            linear_space_lighting: true,
        });
        let mut program = ShaderProgramDesc::default();
        let light = Light {
            light_type: LightType::Spot,
            ..Light::default()
        };
        let drawable = Drawable {
            gi_type: GlobalIlluminationType::UseLightMap,
            ..Drawable::default()
        };

        compositor.process_user_batch(
            &mut program,
            DrawableProcessorPassFlags::HAS_AMBIENT_LIGHTING,
            &drawable,
            GeometryType::Skinned,
            &Material::new("Stone"),
            &Pass::new("litbase", "LitSolid"),
            Some(&light),
            Some(&ShadowMapSettings::default()),
            BatchCompositorSubpass::Base,
        );

        let defines = defines(&program);
        for expected in ["SKINNED", "LIGHTMAP", "AMBIENT", "PERPIXEL", "SPOTLIGHT", "SHADOW", "LINEAR_LIGHTING"] {
            assert!(defines.contains(&expected), "missing {expected}");
        }
        assert!(!defines.contains(&"VSM_SHADOW"));
        assert!(!program.is_instancing_used);
        assert_eq!(program.shader_name[ShaderStage::Vertex.index()], "LitSolid");
    }

    #[test]
    fn test_instanced_geometry_uses_instancing_stream() {
        let compositor = ShaderProgramCompositor::default();
        let mut program = ShaderProgramDesc::default();
        compositor.process_shadow_batch(
            &mut program,
            GeometryType::Instanced,
            &Material::default(),
            &Pass::new("shadow", "Shadow"),
            &Light::default(),
            &ShadowMapSettings::default(),
        );
        assert!(program.is_instancing_used);
        assert!(defines(&program).contains(&"POINTLIGHT"));
    }

    #[test]
    fn test_variance_shadow_define_follows_shadow_map_settings() {
        let compositor = ShaderProgramCompositor::default();
        let vsm = ShadowMapSettings {
            enable_variance_shadow_maps: true,
            ..ShadowMapSettings::default()
        };

        let mut shadow = ShaderProgramDesc::default();
        compositor.process_shadow_batch(
            &mut shadow,
            GeometryType::Static,
            &Material::default(),
            &Pass::new("shadow", "Shadow"),
            &Light::default(),
            &vsm,
        );
        assert!(defines(&shadow).contains(&"VSM_SHADOW"));

        let mut unshadowed = ShaderProgramDesc::default();
        compositor.process_light_volume_batch(
            &mut unshadowed,
            GeometryType::Static,
            &Pass::new("light", "DeferredLight"),
            &Light::default(),
            None,
        );
        let defines = defines(&unshadowed);
        assert!(!defines.contains(&"SHADOW"));
        assert!(!defines.contains(&"VSM_SHADOW"));
    }
}
