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

//! Materials and the technique passes they are drawn with.

use super::shader_resources;
use crate::renderer::api::pipeline::{BlendMode, CompareFunction, CullMode, FillMode};
use crate::renderer::api::resource::{SamplerStateDesc, TextureId};
use crate::StringHash;

/// Material texture slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextureUnit {
    /// Diffuse (albedo).
    Diffuse,
    /// Normal map.
    Normal,
    /// Specular map.
    Specular,
    /// Emissive map.
    Emissive,
    /// Environment cube map.
    Environment,
    /// Volume texture.
    VolumeMap,
    /// First user texture.
    Custom1,
    /// Second user texture.
    Custom2,
}

impl TextureUnit {
    /// The shader resource a texture in this unit is bound to.
    pub const fn shader_resource_name(self) -> StringHash {
        match self {
            TextureUnit::Diffuse => shader_resources::DIFF_MAP,
            TextureUnit::Normal => shader_resources::NORMAL_MAP,
            TextureUnit::Specular => shader_resources::SPEC_MAP,
            TextureUnit::Emissive => shader_resources::EMISSIVE_MAP,
            TextureUnit::Environment => shader_resources::ENV_MAP,
            TextureUnit::VolumeMap => shader_resources::VOLUME_MAP,
            TextureUnit::Custom1 => shader_resources::CUSTOM1,
            TextureUnit::Custom2 => shader_resources::CUSTOM2,
        }
    }
}

/// A texture together with the sampler it is read with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SampledTexture {
    /// The texture.
    pub texture: TextureId,
    /// Sampling state.
    pub sampler: SamplerStateDesc,
}

impl SampledTexture {
    /// Pairs a texture with a sampler.
    pub fn new(texture: TextureId, sampler: SamplerStateDesc) -> Self {
        Self { texture, sampler }
    }
}

/// Depth bias applied while rasterizing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BiasParameters {
    /// Constant bias.
    pub constant_bias: f32,
    /// Slope-scaled bias.
    pub slope_scaled_bias: f32,
}

impl BiasParameters {
    /// Creates bias parameters.
    pub const fn new(constant_bias: f32, slope_scaled_bias: f32) -> Self {
        Self {
            constant_bias,
            slope_scaled_bias,
        }
    }
}

/// Surface description shared by every pass that draws it.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Name, used in diagnostics.
    pub name: String,
    /// Textures, sorted by unit.
    pub textures: Vec<(TextureUnit, SampledTexture)>,
    /// Culling in lit passes.
    pub cull_mode: CullMode,
    /// Culling in shadow passes.
    pub shadow_cull_mode: CullMode,
    /// Fill mode.
    pub fill_mode: FillMode,
    /// Depth bias in lit passes.
    pub depth_bias: BiasParameters,
    /// Alpha-to-coverage request.
    pub alpha_to_coverage: bool,
    /// Defines added to both shader stages.
    pub shader_defines: String,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            textures: Vec::new(),
            cull_mode: CullMode::Ccw,
            shadow_cull_mode: CullMode::Ccw,
            fill_mode: FillMode::Solid,
            depth_bias: BiasParameters::default(),
            alpha_to_coverage: false,
            shader_defines: String::new(),
        }
    }
}

impl Material {
    /// Creates a material with default state.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the texture of a unit, replacing any previous one.
    pub fn with_texture(mut self, unit: TextureUnit, texture: SampledTexture) -> Self {
        match self
            .textures
            .binary_search_by_key(&unit, |(existing, _)| *existing)
        {
            Ok(index) => self.textures[index].1 = texture,
            Err(index) => self.textures.insert(index, (unit, texture)),
        }
        self
    }

    /// Returns the texture of a unit.
    pub fn texture(&self, unit: TextureUnit) -> Option<&SampledTexture> {
        self.textures
            .iter()
            .find(|(existing, _)| *existing == unit)
            .map(|(_, texture)| texture)
    }
}

/// One pass of a technique: the shaders and fixed-function state of a draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Pass {
    /// Pass name.
    pub name: String,
    /// Blending.
    pub blend_mode: BlendMode,
    /// Culling override. `None` defers to the material.
    pub cull_mode: Option<CullMode>,
    /// Depth writes.
    pub depth_write: bool,
    /// Depth comparison.
    pub depth_test_mode: CompareFunction,
    /// Color writes.
    pub color_write: bool,
    /// Alpha-to-coverage request.
    pub alpha_to_coverage: bool,
    /// Vertex shader name.
    pub vertex_shader: String,
    /// Fragment shader name.
    pub fragment_shader: String,
    /// Vertex shader defines.
    pub vertex_shader_defines: String,
    /// Fragment shader defines.
    pub fragment_shader_defines: String,
}

impl Default for Pass {
    fn default() -> Self {
        Self {
            name: String::new(),
            blend_mode: BlendMode::Replace,
            cull_mode: None,
            depth_write: true,
            depth_test_mode: CompareFunction::LessEqual,
            color_write: true,
            alpha_to_coverage: false,
            vertex_shader: String::new(),
            fragment_shader: String::new(),
            vertex_shader_defines: String::new(),
            fragment_shader_defines: String::new(),
        }
    }
}

impl Pass {
    /// Creates a pass drawing with the same shader on both stages.
    pub fn new(name: impl Into<String>, shader: impl Into<String>) -> Self {
        let shader = shader.into();
        Self {
            name: name.into(),
            vertex_shader: shader.clone(),
            fragment_shader: shader,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_texture_replaces_unit() {
        let material = Material::new("Stone")
            .with_texture(
                TextureUnit::Diffuse,
                SampledTexture::new(TextureId(1), SamplerStateDesc::default()),
            )
            .with_texture(
                TextureUnit::Diffuse,
                SampledTexture::new(TextureId(2), SamplerStateDesc::default()),
            );
        assert_eq!(material.textures.len(), 1);
        assert_eq!(
            material.texture(TextureUnit::Diffuse).map(|t| t.texture),
            Some(TextureId(2))
        );
        assert!(material.texture(TextureUnit::Normal).is_none());
    }

    #[test]
    fn test_textures_are_kept_in_unit_order() {
        let diffuse = SampledTexture::new(TextureId(1), SamplerStateDesc::default());
        let normal = SampledTexture::new(TextureId(2), SamplerStateDesc::default());
        let a = Material::new("Stone")
            .with_texture(TextureUnit::Diffuse, diffuse)
            .with_texture(TextureUnit::Normal, normal);
        let b = Material::new("Stone")
            .with_texture(TextureUnit::Normal, normal)
            .with_texture(TextureUnit::Diffuse, diffuse);
        assert_eq!(a, b);
    }

    #[test]
    fn test_units_map_to_distinct_names() {
        let units = [
            TextureUnit::Diffuse,
            TextureUnit::Normal,
            TextureUnit::Specular,
            TextureUnit::Emissive,
            TextureUnit::Environment,
            TextureUnit::VolumeMap,
            TextureUnit::Custom1,
            TextureUnit::Custom2,
        ];
        let mut names: Vec<u32> = units
            .iter()
            .map(|u| u.shader_resource_name().value())
            .collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), units.len());
    }
}
