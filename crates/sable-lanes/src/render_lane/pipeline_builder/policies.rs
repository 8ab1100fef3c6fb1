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

//! Fixed-function state of each kind of batch.

use super::BuilderServices;
use sable_core::renderer::api::{
    pipeline::{BlendMode, CompareFunction, CullMode, PipelineStateDesc, StencilOperation, StencilState},
    scene::{Drawable, LightType, Material, Pass, PixelLight, PORTABLE_LIGHTMASK},
};

/// State of a shadow map batch.
///
/// Shadow maps are rendered from the light, so the camera winding never applies.
pub(crate) fn setup_shadow_pass_state(
    desc: &mut PipelineStateDesc,
    services: &BuilderServices<'_>,
    split_index: u32,
    light: &PixelLight,
    material: &Material,
    pass: &Pass,
) {
    let settings = services.shadow_maps.settings();
    let formats = services.device.caps().formats;

    desc.debug_name = format!("ShadowPass({})|Split: {}", pass.name, split_index);
    desc.depth_stencil_format = Some(if settings.use_16bit_shadow_maps {
        formats.shadow_map_16bit
    } else {
        formats.shadow_map_hires
    });

    if settings.enable_variance_shadow_maps {
        desc.color_write_enabled = true;
        desc.render_target_formats.clear();
        desc.render_target_formats.push(formats.rg_float32);
        desc.constant_depth_bias = 0.0;
        desc.slope_scaled_depth_bias = 0.0;
    } else {
        let multiplier = light.shadow_bias_multiplier(split_index).unwrap_or_else(|| {
            log::warn!(
                "PipelineStateBuilder: shadow split {} out of range, bias left unscaled",
                split_index
            );
            1.0
        });
        let bias = light.light.shadow_bias;
        let mut constant_bias = multiplier * bias.constant_bias;
        let mut slope_scaled_bias = multiplier * bias.slope_scaled_bias;
        if let Some(adjustment) = settings.depth_bias_adjustment {
            constant_bias = constant_bias * adjustment.multiplier + adjustment.addition;
            slope_scaled_bias *= adjustment.multiplier;
        }

        desc.color_write_enabled = false;
        desc.constant_depth_bias = constant_bias;
        desc.slope_scaled_depth_bias = slope_scaled_bias;
    }

    desc.depth_write_enabled = pass.depth_write;
    desc.depth_compare = pass.depth_test_mode;
    desc.cull_mode = pass.cull_mode.unwrap_or(material.shadow_cull_mode);
}

/// State of a deferred light volume batch.
pub(crate) fn setup_light_volume_pass_state(
    desc: &mut PipelineStateDesc,
    services: &BuilderServices<'_>,
    light: &PixelLight,
) {
    let camera_reversed = services.camera.is_camera_reversed();

    desc.debug_name = "LightVolumePass".to_owned();
    desc.color_write_enabled = true;
    desc.blend_mode = if light.light.negative {
        BlendMode::Subtract
    } else {
        BlendMode::Add
    };

    if light.light.light_type == LightType::Directional {
        desc.cull_mode = CullMode::None;
        desc.depth_compare = CompareFunction::Always;
    } else if light.overlaps_camera {
        // Camera inside the volume: draw the back faces behind the scene.
        desc.cull_mode = CullMode::Cw.for_camera(camera_reversed);
        desc.depth_compare = CompareFunction::Greater;
    } else {
        desc.cull_mode = CullMode::Ccw.for_camera(camera_reversed);
        desc.depth_compare = CompareFunction::LessEqual;
    }

    desc.stencil = StencilState {
        enabled: true,
        compare: CompareFunction::NotEqual,
        compare_mask: light.light.light_mask & PORTABLE_LIGHTMASK,
        reference: 0,
        ..StencilState::default()
    };
}

/// State of a batch drawn by a user pass.
pub(crate) fn setup_user_pass_state(
    desc: &mut PipelineStateDesc,
    services: &BuilderServices<'_>,
    drawable: &Drawable,
    material: &Material,
    pass: &Pass,
    light_mask_to_stencil: bool,
) {
    let formats = services.device.caps().formats;
    let camera = services.camera;

    desc.render_target_formats.clear();
    desc.render_target_formats.push(formats.rgba);
    desc.depth_stencil_format = Some(formats.swap_chain_depth);

    desc.depth_write_enabled = pass.depth_write;
    desc.depth_compare = pass.depth_test_mode;
    desc.color_write_enabled = pass.color_write;
    desc.blend_mode = pass.blend_mode;
    desc.alpha_to_coverage_enabled = pass.alpha_to_coverage || material.alpha_to_coverage;
    desc.constant_depth_bias = material.depth_bias.constant_bias;
    desc.slope_scaled_depth_bias = material.depth_bias.slope_scaled_bias;

    desc.fill_mode = camera.camera_fill_mode().max(material.fill_mode);
    desc.cull_mode = pass
        .cull_mode
        .unwrap_or(material.cull_mode)
        .for_camera(camera.is_camera_reversed());

    if light_mask_to_stencil {
        desc.stencil = StencilState {
            enabled: true,
            on_passed: StencilOperation::Replace,
            write_mask: PORTABLE_LIGHTMASK,
            reference: drawable.light_mask_in_zone & PORTABLE_LIGHTMASK,
            ..StencilState::default()
        };
    }
}
