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

//! Per-drawable lighting state.

use super::light::DEFAULT_LIGHTMASK;

/// How a drawable receives indirect light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GlobalIlluminationType {
    /// No global illumination.
    #[default]
    None,
    /// Baked lightmap, sampled through the emissive slot.
    UseLightMap,
    /// Interpolated light probes.
    BlendLightProbes,
}

/// The parts of a drawable that influence its pipeline state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Drawable {
    /// Indirect lighting source.
    pub gi_type: GlobalIlluminationType,
    /// The light mask of the drawable, restricted by its zone.
    pub light_mask_in_zone: u32,
}

impl Default for Drawable {
    fn default() -> Self {
        Self {
            gi_type: GlobalIlluminationType::None,
            light_mask_in_zone: DEFAULT_LIGHTMASK,
        }
    }
}
