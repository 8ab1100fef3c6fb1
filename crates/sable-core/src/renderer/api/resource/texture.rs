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

//! Texture handles, sampler states, and mip-chain helpers.

use crate::math::Extent3D;
use crate::renderer::api::core::DeviceCaps;
use crate::renderer::api::pipeline::CompareFunction;

/// Defines how texture coordinates are handled when sampling outside the `[0, 1]` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AddressMode {
    /// Coordinates wrap around. `1.1` becomes `0.1`.
    #[default]
    Repeat,
    /// Coordinates are clamped to the edge. `1.1` becomes `1.0`.
    ClampToEdge,
    /// Coordinates wrap around, mirroring at each integer boundary.
    MirrorRepeat,
    /// Coordinates outside the range are given a fixed border color.
    ClampToBorder,
}

/// Defines the filtering mode for texture sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterMode {
    /// Point sampling. Returns the value of the nearest texel.
    Nearest,
    /// Linear interpolation. Returns a weighted average of the four nearest texels.
    #[default]
    Linear,
}

/// The border color to use when `AddressMode::ClampToBorder` is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SamplerBorderColor {
    /// A transparent black color `[0.0, 0.0, 0.0, 0.0]`.
    TransparentBlack,
    /// An opaque black color `[0.0, 0.0, 0.0, 1.0]`.
    OpaqueBlack,
    /// An opaque white color `[1.0, 1.0, 1.0, 1.0]`.
    OpaqueWhite,
}

/// An immutable sampler description baked into a pipeline state.
///
/// Samplers are part of the pipeline key, so this type only holds hashable fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SamplerStateDesc {
    /// The address mode for the U texture coordinate.
    pub address_mode_u: AddressMode,
    /// The address mode for the V texture coordinate.
    pub address_mode_v: AddressMode,
    /// The address mode for the W texture coordinate.
    pub address_mode_w: AddressMode,
    /// Magnification filter.
    pub mag_filter: FilterMode,
    /// Minification filter.
    pub min_filter: FilterMode,
    /// Filter between mipmap levels.
    pub mipmap_filter: FilterMode,
    /// If `Some`, creates a comparison sampler for tasks like shadow mapping.
    pub compare: Option<CompareFunction>,
    /// The maximum anisotropy level to use. `1` disables anisotropic filtering.
    pub anisotropy_clamp: u16,
    /// The border color to use if any address mode is `ClampToBorder`.
    pub border_color: Option<SamplerBorderColor>,
}

impl Default for SamplerStateDesc {
    fn default() -> Self {
        Self {
            address_mode_u: AddressMode::Repeat,
            address_mode_v: AddressMode::Repeat,
            address_mode_w: AddressMode::Repeat,
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            mipmap_filter: FilterMode::Linear,
            compare: None,
            anisotropy_clamp: 1,
            border_color: None,
        }
    }
}

impl SamplerStateDesc {
    /// A bilinear sampler clamped at the edges.
    pub fn clamped() -> Self {
        Self {
            address_mode_u: AddressMode::ClampToEdge,
            address_mode_v: AddressMode::ClampToEdge,
            address_mode_w: AddressMode::ClampToEdge,
            ..Self::default()
        }
    }

    /// A depth-comparison sampler for shadow maps.
    pub fn shadow_comparison() -> Self {
        Self {
            compare: Some(CompareFunction::LessEqual),
            mipmap_filter: FilterMode::Nearest,
            ..Self::clamped()
        }
    }

    fn address_modes_mut(&mut self) -> [&mut AddressMode; 3] {
        [
            &mut self.address_mode_u,
            &mut self.address_mode_v,
            &mut self.address_mode_w,
        ]
    }

    /// Returns a copy of this sampler restricted to what the device supports.
    ///
    /// Anisotropy is clamped to the device maximum and border addressing falls back to
    /// edge clamping when the device lacks it.
    pub fn clamp_to_caps(&self, caps: &DeviceCaps) -> Self {
        let mut sampler = *self;
        sampler.anisotropy_clamp = sampler.anisotropy_clamp.clamp(1, caps.max_anisotropy.max(1));
        if !caps.supports_border_address_mode {
            for mode in sampler.address_modes_mut() {
                if *mode == AddressMode::ClampToBorder {
                    *mode = AddressMode::ClampToEdge;
                }
            }
            sampler.border_color = None;
        }
        sampler
    }
}

/// Describes which lazy maintenance a texture needs before it can be sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextureDirtyState {
    /// The mip chain is stale and must be regenerated.
    pub levels_dirty: bool,
    /// Sampling parameters changed and must be re-applied.
    pub parameters_dirty: bool,
}

impl TextureDirtyState {
    /// A texture that needs no maintenance.
    pub const CLEAN: Self = Self {
        levels_dirty: false,
        parameters_dirty: false,
    };
}

/// Returns the number of mip levels of a full chain for a texture of the given size.
pub fn mip_level_count(size: Extent3D) -> u32 {
    let max = size.max_dimension();
    if max == 0 {
        return 0;
    }
    u32::BITS - max.leading_zeros()
}

/// Returns the size of mip `level`, never smaller than one texel per axis.
pub fn mip_level_size(size: Extent3D, level: u32) -> Extent3D {
    let shrink = |v: u32| v.checked_shr(level).unwrap_or(0).max(1);
    Extent3D::new(
        shrink(size.width),
        shrink(size.height),
        shrink(size.depth_or_array_layers),
    )
}

/// An opaque handle to a GPU texture resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub usize);
