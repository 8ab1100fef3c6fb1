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

//! Capabilities reported by a graphics device.

use crate::renderer::api::util::TextureFormat;

/// Texture formats a device prefers for the render targets this crate configures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatCaps {
    /// Format of ordinary color targets.
    pub rgba: TextureFormat,
    /// Depth format of the swap chain.
    pub swap_chain_depth: TextureFormat,
    /// Low precision shadow map depth format.
    pub shadow_map_16bit: TextureFormat,
    /// High precision shadow map depth format.
    pub shadow_map_hires: TextureFormat,
    /// Two-channel float format used by variance shadow maps.
    pub rg_float32: TextureFormat,
}

impl Default for FormatCaps {
    fn default() -> Self {
        Self {
            rgba: TextureFormat::Rgba8Unorm,
            swap_chain_depth: TextureFormat::Depth24PlusStencil8,
            shadow_map_16bit: TextureFormat::Depth16Unorm,
            shadow_map_hires: TextureFormat::Depth32Float,
            rg_float32: TextureFormat::Rg32Float,
        }
    }
}

/// Limits and preferred formats of a graphics device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceCaps {
    /// Required alignment, in bytes, of constant buffer binding offsets. Always a power of two.
    pub constant_buffer_offset_alignment: u32,
    /// Largest constant buffer range that can be bound at once.
    pub max_constant_buffer_size: u32,
    /// Number of simultaneous color targets.
    pub max_render_targets: u32,
    /// Number of vertex streams a pipeline can read.
    pub max_vertex_streams: u32,
    /// Highest supported sampler anisotropy.
    pub max_anisotropy: u16,
    /// Whether `AddressMode::ClampToBorder` is available.
    pub supports_border_address_mode: bool,
    /// Preferred formats.
    pub formats: FormatCaps,
}

impl Default for DeviceCaps {
    fn default() -> Self {
        Self {
            constant_buffer_offset_alignment: 256,
            max_constant_buffer_size: 65536,
            max_render_targets: 8,
            max_vertex_streams: 4,
            max_anisotropy: 16,
            supports_border_address_mode: true,
            formats: FormatCaps::default(),
        }
    }
}
