mod common;

use common::{MockGraphicsDevice, MockRenderPass, PassEvent};
use sable_core::math::IntRect;
use sable_core::renderer::api::command::{DrawInputBuffers, IndexBufferBinding};
use sable_core::renderer::api::core::{ConstantBufferSettings, ExecuteStats};
use sable_core::renderer::api::pipeline::{PipelineStateDesc, ShaderProgramReflection};
use sable_core::renderer::api::resource::{BufferId, TextureDirtyState, TextureId};
use sable_core::renderer::api::scene::shader_resources;
use sable_core::renderer::api::util::{IndexFormat, ShaderParameterGroup};
use sable_core::renderer::ResourceError;
use sable_core::StringHash;
use sable_lanes::DrawCommandQueue;

fn indexed_buffers() -> DrawInputBuffers {
    let mut buffers = DrawInputBuffers {
        index_buffer: Some(IndexBufferBinding {
            buffer: BufferId(500),
            format: IndexFormat::Uint16,
        }),
        ..Default::default()
    };
    buffers.vertex_buffers[0] = Some(BufferId(501));
    buffers
}

fn new_queue(device: &MockGraphicsDevice) -> DrawCommandQueue {
    common::init_logging();
    let mut queue = DrawCommandQueue::new(ConstantBufferSettings::default());
    queue.reset(&device.caps);
    queue
}

#[test]
fn test_identical_draws_bind_state_once() {
    let device = MockGraphicsDevice::default();
    let pipeline = device.pipeline(PipelineStateDesc::default(), ShaderProgramReflection::new());
    let mut queue = new_queue(&device);

    for i in 0..10 {
        queue.set_pipeline_state(&pipeline);
        queue.set_buffers(indexed_buffers());
        queue.draw_indexed(i * 6, 6);
    }

    let mut pass = MockRenderPass::default();
    let stats = queue.execute(&device, &mut pass);

    assert_eq!(pass.count(|e| matches!(e, PassEvent::SetPipeline(_))), 1);
    assert_eq!(pass.count(|e| matches!(e, PassEvent::SetScissor(..))), 1);
    assert_eq!(pass.count(|e| matches!(e, PassEvent::SetIndexBuffer(_))), 1);
    assert_eq!(pass.count(|e| matches!(e, PassEvent::SetVertexBuffers(..))), 1);
    assert_eq!(pass.draws().len(), 10);
    assert_eq!(stats.commands, 10);
    assert_eq!(stats.draw_calls, 10);
    assert_eq!(stats.pipeline_binds, 1);
    assert_eq!(stats.skipped_commands, 0);
}

#[test]
fn test_empty_queue_issues_no_calls() {
    let device = MockGraphicsDevice::default();
    let mut queue = new_queue(&device);
    let mut pass = MockRenderPass::default();

    let stats = queue.execute(&device, &mut pass);

    assert_eq!(stats, ExecuteStats::default());
    assert!(pass.events.is_empty());
    assert_eq!(device.bindings_created(), 0);
    assert_eq!(device.buffer_writes.load(std::sync::atomic::Ordering::Relaxed), 0);
}

#[test]
fn test_indexed_draw_uses_command_range() {
    let device = MockGraphicsDevice::default();
    let pipeline = device.pipeline(PipelineStateDesc::default(), ShaderProgramReflection::new());
    let mut queue = new_queue(&device);

    queue.set_pipeline_state(&pipeline);
    queue.set_buffers(indexed_buffers());
    queue.draw_indexed(12, 36);

    let mut pass = MockRenderPass::default();
    queue.execute(&device, &mut pass);

    assert_eq!(pass.draws(), vec![&PassEvent::DrawIndexed(12..48)]);
}

#[test]
fn test_draw_call_shapes() {
    let device = MockGraphicsDevice::default();
    let pipeline = device.pipeline(PipelineStateDesc::default(), ShaderProgramReflection::new());
    let mut queue = new_queue(&device);

    queue.set_pipeline_state(&pipeline);
    queue.set_buffers(indexed_buffers());
    queue.draw(0, 3);
    queue.draw_indexed_base_vertex(0, 6, 4);
    queue.draw_indexed_instanced(0, 6, 10, 3);
    queue.draw_indexed_instanced_base_vertex(6, 6, 8, 13, 2);

    let mut pass = MockRenderPass::default();
    queue.execute(&device, &mut pass);

    assert_eq!(
        pass.draws(),
        vec![
            &PassEvent::Draw(0..3),
            &PassEvent::DrawIndexedBaseVertex(0..6, 4),
            &PassEvent::DrawIndexedInstanced(0..6, 3),
            &PassEvent::DrawIndexedInstancedBaseVertex(6..12, 8, 2),
        ]
    );
}

#[test]
fn test_instanced_draws_always_rebind_vertex_buffers() {
    let device = MockGraphicsDevice::default();
    let pipeline = device.pipeline(PipelineStateDesc::default(), ShaderProgramReflection::new());
    let mut queue = new_queue(&device);

    queue.set_pipeline_state(&pipeline);
    queue.set_buffers(indexed_buffers());
    queue.draw_indexed_instanced(0, 6, 0, 4);
    queue.draw_indexed_instanced(0, 6, 4, 4);

    let mut pass = MockRenderPass::default();
    queue.execute(&device, &mut pass);

    let offsets: Vec<u32> = pass
        .events
        .iter()
        .filter_map(|e| match e {
            PassEvent::SetVertexBuffers(_, offset) => Some(*offset),
            _ => None,
        })
        .collect();
    assert_eq!(offsets, vec![0, 4]);
}

#[test]
fn test_pipeline_bind_failure_skips_only_that_command() {
    let device = MockGraphicsDevice::default();
    let broken = device.pipeline(PipelineStateDesc::default(), ShaderProgramReflection::new());
    let working = device.pipeline(PipelineStateDesc::default(), ShaderProgramReflection::new());
    let mut queue = new_queue(&device);

    queue.set_buffers(indexed_buffers());
    queue.set_pipeline_state(&broken);
    queue.draw_indexed(0, 3);
    queue.set_pipeline_state(&working);
    queue.draw_indexed(3, 3);

    let mut pass = MockRenderPass {
        failing_pipelines: vec![broken.id()],
        ..Default::default()
    };
    let stats = queue.execute(&device, &mut pass);

    assert_eq!(stats.skipped_commands, 1);
    assert_eq!(pass.draws(), vec![&PassEvent::DrawIndexed(3..6)]);
    assert_eq!(pass.events[0], PassEvent::SetPipeline(working.id()));
}

#[test]
fn test_vertex_buffer_failure_skips_command() {
    let device = MockGraphicsDevice::default();
    let pipeline = device.pipeline(PipelineStateDesc::default(), ShaderProgramReflection::new());
    let mut queue = new_queue(&device);

    queue.set_pipeline_state(&pipeline);
    queue.set_buffers(indexed_buffers());
    queue.draw_indexed(0, 3);
    queue.draw_indexed(3, 3);

    let mut pass = MockRenderPass {
        fail_vertex_buffers: true,
        ..Default::default()
    };
    let stats = queue.execute(&device, &mut pass);

    assert_eq!(stats.skipped_commands, 2);
    assert!(pass.draws().is_empty());
}

#[test]
fn test_scissor_follows_pipeline_flag() {
    let device = MockGraphicsDevice::default();
    let clipped = device.pipeline(
        PipelineStateDesc {
            scissor_test_enabled: true,
            ..Default::default()
        },
        ShaderProgramReflection::new(),
    );
    let unclipped = device.pipeline(PipelineStateDesc::default(), ShaderProgramReflection::new());
    let first = IntRect::new(0, 0, 32, 32);
    let second = IntRect::new(32, 0, 64, 32);
    let mut queue = new_queue(&device);

    queue.set_pipeline_state(&unclipped);
    queue.set_scissor_rect(first);
    queue.draw(0, 3);
    queue.set_scissor_rect(second);
    queue.draw(0, 3);
    queue.set_pipeline_state(&clipped);
    queue.draw(0, 3);
    queue.set_scissor_rect(first);
    queue.draw(0, 3);

    let mut pass = MockRenderPass::default();
    queue.execute(&device, &mut pass);

    let scissors: Vec<&PassEvent> = pass
        .events
        .iter()
        .filter(|e| matches!(e, PassEvent::SetScissor(..)))
        .collect();
    assert_eq!(
        scissors,
        vec![
            &PassEvent::SetScissor(false, first),
            &PassEvent::SetScissor(true, second),
            &PassEvent::SetScissor(true, first),
        ]
    );
}

#[test]
fn test_equal_resource_sets_share_one_binding() {
    let device = MockGraphicsDevice::default();
    let reflection = ShaderProgramReflection::new().with_resource(shader_resources::DIFF_MAP);
    let pipeline = device.pipeline(PipelineStateDesc::default(), reflection);
    let mut queue = new_queue(&device);

    queue.set_pipeline_state(&pipeline);
    queue.set_buffers(indexed_buffers());
    for texture in [1, 1, 2] {
        queue.add_shader_resource(shader_resources::DIFF_MAP, Some(TextureId(texture)));
        queue.commit_shader_resources();
        queue.draw_indexed(0, 3);
    }

    let mut pass = MockRenderPass::default();
    let stats = queue.execute(&device, &mut pass);

    assert_eq!(device.bindings_created(), 2);
    assert_eq!(stats.resource_bindings_created, 2);
    assert_eq!(pass.count(|e| matches!(e, PassEvent::Commit(_))), 2);
    assert_eq!(queue.srb_cache().hits(), 1);
}

#[test]
fn test_unused_and_empty_resources_are_not_bound() {
    let device = MockGraphicsDevice::default();
    let reflection = ShaderProgramReflection::new().with_resource(shader_resources::DIFF_MAP);
    let pipeline = device.pipeline(PipelineStateDesc::default(), reflection);
    let mut queue = new_queue(&device);

    queue.set_pipeline_state(&pipeline);
    queue.add_shader_resource(shader_resources::DIFF_MAP, Some(TextureId(1)));
    queue.add_shader_resource(shader_resources::NORMAL_MAP, Some(TextureId(2)));
    queue.add_shader_resource(shader_resources::SPEC_MAP, None);
    queue.commit_shader_resources();
    queue.draw(0, 3);

    queue.execute(&device, &mut MockRenderPass::default());

    let bindings = device.bindings.lock().unwrap();
    assert_eq!(bindings[0].textures, vec![(shader_resources::DIFF_MAP, TextureId(1))]);
}

#[test]
fn test_render_target_is_sampled_through_backup() {
    let mut device = MockGraphicsDevice::default();
    device.backups.insert(TextureId(7), TextureId(70));
    let reflection = ShaderProgramReflection::new()
        .with_resource(shader_resources::DIFF_MAP)
        .with_resource(shader_resources::DEPTH_BUFFER);
    let pipeline = device.pipeline(PipelineStateDesc::default(), reflection);
    let mut queue = new_queue(&device);

    queue.set_pipeline_state(&pipeline);
    queue.add_shader_resource(shader_resources::DIFF_MAP, Some(TextureId(7)));
    queue.commit_shader_resources();
    queue.draw(0, 3);

    let mut pass = MockRenderPass {
        render_target: Some(TextureId(7)),
        ..Default::default()
    };
    queue.execute(&device, &mut pass);

    let bindings = device.bindings.lock().unwrap();
    assert_eq!(bindings[0].textures, vec![(shader_resources::DIFF_MAP, TextureId(70))]);
}

#[test]
fn test_render_target_without_backup_is_unbound() {
    let device = MockGraphicsDevice::default();
    let reflection = ShaderProgramReflection::new().with_resource(shader_resources::DIFF_MAP);
    let pipeline = device.pipeline(PipelineStateDesc::default(), reflection);
    let mut queue = new_queue(&device);

    queue.set_pipeline_state(&pipeline);
    queue.add_shader_resource(shader_resources::DIFF_MAP, Some(TextureId(7)));
    queue.commit_shader_resources();
    queue.draw(0, 3);

    let mut pass = MockRenderPass {
        render_target: Some(TextureId(7)),
        ..Default::default()
    };
    let stats = queue.execute(&device, &mut pass);

    assert_eq!(stats.draw_calls, 1);
    assert!(device.bindings.lock().unwrap()[0].textures.is_empty());
}

#[test]
fn test_dirty_textures_are_refreshed_before_binding() {
    let device = MockGraphicsDevice::default();
    device.dirty.lock().unwrap().insert(
        TextureId(3),
        TextureDirtyState {
            levels_dirty: true,
            parameters_dirty: true,
        },
    );
    let reflection = ShaderProgramReflection::new().with_resource(shader_resources::NORMAL_MAP);
    let pipeline = device.pipeline(PipelineStateDesc::default(), reflection);
    let mut queue = new_queue(&device);

    queue.set_pipeline_state(&pipeline);
    queue.add_shader_resource(shader_resources::NORMAL_MAP, Some(TextureId(3)));
    queue.commit_shader_resources();
    queue.draw(0, 3);
    queue.execute(&device, &mut MockRenderPass::default());

    assert_eq!(*device.regenerated.lock().unwrap(), vec![TextureId(3)]);
    assert_eq!(*device.reapplied.lock().unwrap(), vec![TextureId(3)]);
}

#[test]
fn test_constant_buffer_blocks_are_bound_per_draw() {
    let device = MockGraphicsDevice::default();
    let reflection = ShaderProgramReflection::new().with_parameter(
        ShaderParameterGroup::Object,
        "Model",
        0,
        64,
    );
    let pipeline = device.pipeline(PipelineStateDesc::default(), reflection);
    let model = StringHash::new("Model");
    let mut queue = new_queue(&device);

    queue.set_pipeline_state(&pipeline);
    for scale in [1.0f32, 1.0, 2.0] {
        assert!(queue.begin_shader_parameter_group(ShaderParameterGroup::Object, true));
        let mut matrix = [0.0f32; 16];
        matrix[0] = scale;
        queue.add_shader_parameter_slice(model, &matrix);
        queue
            .commit_shader_parameter_group(ShaderParameterGroup::Object)
            .unwrap();
        queue.draw(0, 3);
    }

    let mut pass = MockRenderPass::default();
    queue.execute(&device, &mut pass);

    assert_eq!(queue.constant_buffers().num_blocks(), 2);
    assert_eq!(pass.count(|e| matches!(e, PassEvent::Commit(_))), 2);

    let object = ShaderParameterGroup::Object.index();
    let offsets: Vec<u32> = pass
        .committed_ranges
        .iter()
        .map(|ranges| ranges[object].expect("object block bound").offset)
        .collect();
    assert_eq!(offsets, vec![0, device.caps.constant_buffer_offset_alignment]);
    assert!(pass.committed_ranges[0][ShaderParameterGroup::Frame.index()].is_none());
}

#[test]
fn test_oversized_constant_block_is_rejected() {
    let device = MockGraphicsDevice::default();
    let pipeline = device.pipeline(PipelineStateDesc::default(), ShaderProgramReflection::new());
    let mut queue = new_queue(&device);
    queue.set_pipeline_state(&pipeline);

    let block = vec![0u8; ConstantBufferSettings::default().max_buffer_size as usize + 16];
    let result = queue.write_shader_parameter_group(ShaderParameterGroup::Material, &block);

    assert!(matches!(
        result,
        Err(ResourceError::ConstantBufferOverflow { .. })
    ));
}

#[test]
fn test_grown_constant_buffers_drop_their_bindings() {
    common::init_logging();
    let device = MockGraphicsDevice::default();
    let reflection = ShaderProgramReflection::new().with_parameter(
        ShaderParameterGroup::Object,
        "Model",
        0,
        64,
    );
    let pipeline = device.pipeline(PipelineStateDesc::default(), reflection);
    let mut queue = DrawCommandQueue::new(ConstantBufferSettings {
        initial_buffer_size: 256,
        max_buffer_size: 64 * 1024,
    });
    let object = ShaderParameterGroup::Object.index();

    let record_frame = |queue: &mut DrawCommandQueue, blocks: u8| {
        queue.reset(&device.caps);
        queue.set_pipeline_state(&pipeline);
        for i in 0..blocks {
            queue
                .write_shader_parameter_group(ShaderParameterGroup::Object, &[i; 64])
                .unwrap();
            queue.draw(0, 3);
        }
        let mut pass = MockRenderPass::default();
        queue.execute(&device, &mut pass);
        pass.committed_ranges[0][object].expect("object block bound").buffer
    };

    let first_slot_buffer = record_frame(&mut queue, 1);
    record_frame(&mut queue, 1);
    assert_eq!(queue.srb_cache().len(), 2);

    // Same ring slot as the first frame, but too many blocks for its buffer.
    let grown_buffer = record_frame(&mut queue, 8);
    assert_ne!(grown_buffer, first_slot_buffer);
    assert_eq!(queue.srb_cache().len(), 2);

    let before = queue.srb_cache().len();
    queue
        .srb_cache_mut()
        .invalidate_buffer(&device, first_slot_buffer);
    assert_eq!(queue.srb_cache().len(), before);
}
