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

//! Global settings for render submission.
//!
//! Settings are plain data and can be loaded from RON:
//!
//! ```
//! use sable_core::renderer::api::core::RenderSettings;
//!
//! let settings = RenderSettings::from_ron_str(
//!     "(shadow_maps: (enable_variance_shadow_maps: true))",
//! )
//! .unwrap();
//! assert!(settings.shadow_maps.enable_variance_shadow_maps);
//! assert_eq!(settings.constant_buffers.max_buffer_size, 65536);
//! ```

use serde::{Deserialize, Serialize};

/// A linear correction applied to shadow depth bias after the per-split multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthBiasAdjustment {
    /// Scales both the constant and the slope-scaled bias.
    pub multiplier: f32,
    /// Added to the constant bias after scaling.
    pub addition: f32,
}

impl Default for DepthBiasAdjustment {
    fn default() -> Self {
        Self {
            multiplier: 1.0,
            addition: 0.0,
        }
    }
}

/// How shadow maps are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowMapSettings {
    /// Render variance shadow maps (moments in a float color target) instead of depth.
    pub enable_variance_shadow_maps: bool,
    /// Use the 16-bit depth format for depth shadow maps.
    pub use_16bit_shadow_maps: bool,
    /// Optional correction of depth shadow bias.
    pub depth_bias_adjustment: Option<DepthBiasAdjustment>,
}

/// Sizing of the per-frame constant buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstantBufferSettings {
    /// Size of the first GPU buffer created for a constant buffer page.
    pub initial_buffer_size: u32,
    /// Upper bound of a single constant buffer page. Larger blocks are rejected.
    pub max_buffer_size: u32,
}

impl Default for ConstantBufferSettings {
    fn default() -> Self {
        Self {
            initial_buffer_size: 16 * 1024,
            max_buffer_size: 64 * 1024,
        }
    }
}

/// A collection of global settings that affect render submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Lighting is computed in linear space.
    pub linear_space_lighting: bool,
    /// Shadow map configuration.
    pub shadow_maps: ShadowMapSettings,
    /// Constant buffer allocator configuration.
    pub constant_buffers: ConstantBufferSettings,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            linear_space_lighting: true,
            shadow_maps: ShadowMapSettings::default(),
            constant_buffers: ConstantBufferSettings::default(),
        }
    }
}

impl RenderSettings {
    /// Parses settings from a RON document. Missing fields keep their defaults.
    pub fn from_ron_str(source: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(source)
    }
}
