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

//! Immutable sampler resolution for shadow and user pass batches.

use super::BuilderServices;
use sable_core::renderer::api::{
    pipeline::PipelineStateDesc,
    resource::SamplerStateDesc,
    scene::{shader_resources, Material, PixelLight},
};

/// Registers the samplers of the material, the lightmap, the light and the ambient
/// environment maps, clamped to what the device supports.
pub(crate) fn setup_samplers_for_user_or_shadow_pass(
    desc: &mut PipelineStateDesc,
    services: &BuilderServices<'_>,
    material: &Material,
    light: Option<&PixelLight>,
    has_lightmap: bool,
    has_ambient: bool,
) {
    let mut material_has_environment_map = false;
    for (unit, texture) in &material.textures {
        let name = unit.shader_resource_name();
        if name == shader_resources::EMISSIVE_MAP && has_lightmap {
            continue;
        }
        if name == shader_resources::ENV_MAP {
            material_has_environment_map = true;
        }
        desc.add_sampler(name, texture.sampler);
    }

    if has_lightmap {
        desc.add_sampler(shader_resources::EMISSIVE_MAP, SamplerStateDesc::clamped());
    }

    if let Some(light) = light {
        if let Some(ramp) = &light.light.ramp_texture {
            desc.add_sampler(shader_resources::LIGHT_RAMP_MAP, ramp.sampler);
        }
        if let Some(shape) = &light.light.shape_texture {
            desc.add_sampler(shader_resources::LIGHT_SHAPE_MAP, shape.sampler);
        }
        if light.has_shadow {
            desc.add_sampler(
                shader_resources::SHADOW_MAP,
                services.shadow_maps.sampler_state(),
            );
        }
    }

    if has_ambient {
        if !material_has_environment_map {
            desc.add_sampler(shader_resources::ENV_MAP, SamplerStateDesc::default());
        }
        desc.add_sampler(shader_resources::ZONE_CUBE_MAP, SamplerStateDesc::default());
    }

    let caps = services.device.caps();
    for (name, sampler) in &mut desc.samplers {
        let supported = sampler.clamp_to_caps(caps);
        if supported != *sampler {
            log::warn!(
                "PipelineStateBuilder: sampler {} exceeds device limits and was clamped",
                name
            );
            *sampler = supported;
        }
    }
}
