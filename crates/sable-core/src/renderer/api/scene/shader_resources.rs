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

//! Well-known shader resource names.

use crate::StringHash;

/// Diffuse (albedo) texture.
pub const DIFF_MAP: StringHash = StringHash::new("DiffMap");
/// Tangent space normal map.
pub const NORMAL_MAP: StringHash = StringHash::new("NormalMap");
/// Specular map.
pub const SPEC_MAP: StringHash = StringHash::new("SpecMap");
/// Emissive map. Also receives the lightmap of lightmapped drawables.
pub const EMISSIVE_MAP: StringHash = StringHash::new("EmissiveMap");
/// Environment (reflection) cube map.
pub const ENV_MAP: StringHash = StringHash::new("EnvMap");
/// 3D volume texture.
pub const VOLUME_MAP: StringHash = StringHash::new("VolumeMap");
/// First user texture.
pub const CUSTOM1: StringHash = StringHash::new("Custom1");
/// Second user texture.
pub const CUSTOM2: StringHash = StringHash::new("Custom2");
/// Light attenuation ramp.
pub const LIGHT_RAMP_MAP: StringHash = StringHash::new("LightRampMap");
/// Light projection shape.
pub const LIGHT_SHAPE_MAP: StringHash = StringHash::new("LightSpotMap");
/// Shadow map of the current light.
pub const SHADOW_MAP: StringHash = StringHash::new("ShadowMap");
/// Reflection probe of the zone.
pub const ZONE_CUBE_MAP: StringHash = StringHash::new("ZoneCubeMap");
/// Scene depth, readable in post passes.
pub const DEPTH_BUFFER: StringHash = StringHash::new("DepthBuffer");
