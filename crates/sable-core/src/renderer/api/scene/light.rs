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

//! Lights as seen by per-pixel lighting passes.

use super::material::{BiasParameters, SampledTexture};

/// Light mask of lights and drawables that opt out of masking.
pub const DEFAULT_LIGHTMASK: u32 = u32::MAX;

/// Light mask bits that survive in an 8-bit stencil buffer.
pub const PORTABLE_LIGHTMASK: u32 = 0xff;

/// Maximum number of directional shadow cascades.
pub const MAX_CASCADE_SPLITS: usize = 4;

/// Shape of a light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LightType {
    /// Infinitely far light with parallel rays.
    Directional,
    /// Cone light.
    Spot,
    /// Omnidirectional light.
    #[default]
    Point,
}

impl LightType {
    /// The shader define selecting the light type.
    pub fn shader_define(&self) -> &'static str {
        match self {
            LightType::Directional => "DIRLIGHT",
            LightType::Spot => "SPOTLIGHT",
            LightType::Point => "POINTLIGHT",
        }
    }
}

/// A light component.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    /// Shape.
    pub light_type: LightType,
    /// Negative lights darken instead of brighten.
    pub negative: bool,
    /// Drawables are lit only if their light mask intersects this one.
    pub light_mask: u32,
    /// Depth bias used when rendering the shadow map.
    pub shadow_bias: BiasParameters,
    /// Attenuation ramp texture.
    pub ramp_texture: Option<SampledTexture>,
    /// Projected shape texture.
    pub shape_texture: Option<SampledTexture>,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            light_type: LightType::default(),
            negative: false,
            light_mask: DEFAULT_LIGHTMASK,
            shadow_bias: BiasParameters::default(),
            ramp_texture: None,
            shape_texture: None,
        }
    }
}

/// A light that affects the current view per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelLight {
    /// The light.
    pub light: Light,
    /// A shadow map was allocated for the light this frame.
    pub has_shadow: bool,
    /// The camera is inside the light volume.
    pub overlaps_camera: bool,
    /// Depth bias multiplier per shadow split.
    pub shadow_depth_bias_multiplier: [f32; MAX_CASCADE_SPLITS],
}

impl PixelLight {
    /// Wraps a light with no shadow and unit bias multipliers.
    pub fn new(light: Light) -> Self {
        Self {
            light,
            has_shadow: false,
            overlaps_camera: false,
            shadow_depth_bias_multiplier: [1.0; MAX_CASCADE_SPLITS],
        }
    }

    /// Depth bias multiplier of a shadow split, if the split exists.
    pub fn shadow_bias_multiplier(&self, split: u32) -> Option<f32> {
        self.shadow_depth_bias_multiplier
            .get(split as usize)
            .copied()
    }
}
