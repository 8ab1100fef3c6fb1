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

//! Per-frame constant buffer allocator shared by every draw of a frame.
//!
//! Blocks are written on the CPU while commands are recorded, then uploaded lazily,
//! one page per GPU buffer, the first time a draw dispatches them. GPU buffers are
//! ring-buffered across [`MAX_FRAMES_IN_FLIGHT`] frames and grow on demand.

use super::constant_buffer::{
    CBufferTicketId, ConstantBufferRange, ShaderParameterGroup, MAX_SHADER_PARAMETER_GROUPS,
};
use super::constant_buffer_collection::ConstantBufferCollection;
use crate::renderer::{
    api::{
        core::{ConstantBufferSettings, MAX_FRAMES_IN_FLIGHT},
        resource::{BufferDescriptor, BufferId, BufferUsage},
    },
    error::ResourceError,
    traits::GraphicsDevice,
};
use ahash::RandomState;
use std::borrow::Cow;

/// A GPU buffer backing one staging page.
#[derive(Debug, Clone, Copy)]
struct GpuPage {
    buffer: BufferId,
    capacity: u32,
}

/// Where a written block lives.
#[derive(Debug, Clone, Copy)]
struct Ticket {
    group: ShaderParameterGroup,
    page: usize,
    offset: u32,
    size: u32,
}

#[derive(Debug)]
struct GroupState {
    group: ShaderParameterGroup,
    collection: ConstantBufferCollection,
    slots: [Vec<GpuPage>; MAX_FRAMES_IN_FLIGHT],
    uploaded: Vec<bool>,
    retired: Vec<BufferId>,
    last_ticket: CBufferTicketId,
    last_hash: u64,
    last_dispatched: Option<ConstantBufferRange>,
}

impl GroupState {
    fn new(group: ShaderParameterGroup, page_size: u32) -> Self {
        Self {
            group,
            collection: ConstantBufferCollection::new(group.debug_name(), page_size),
            slots: std::array::from_fn(|_| Vec::new()),
            uploaded: Vec::new(),
            retired: Vec::new(),
            last_ticket: CBufferTicketId::INVALID,
            last_hash: 0,
            last_dispatched: None,
        }
    }

    fn reset_frame(&mut self, alignment: u32) {
        self.collection.clear_and_initialize(alignment);
        self.uploaded.clear();
        self.last_ticket = CBufferTicketId::INVALID;
        self.last_dispatched = None;
    }

    /// Makes sure the GPU buffer of `page` in `slot` exists and can hold the page.
    fn ensure_page(
        &mut self,
        device: &dyn GraphicsDevice,
        slot: usize,
        page: usize,
        settings: &ConstantBufferSettings,
    ) -> Result<BufferId, ResourceError> {
        for missing in self.slots[slot].len()..page {
            self.ensure_page(device, slot, missing, settings)?;
        }

        let required = self.collection.page(page).len() as u32;
        if let Some(existing) = self.slots[slot].get(page) {
            if existing.capacity >= required {
                return Ok(existing.buffer);
            }
        }

        let max_size = settings.max_buffer_size;
        let capacity = required
            .max(1)
            .next_power_of_two()
            .clamp(settings.initial_buffer_size.min(max_size), max_size);
        let buffer = device.create_buffer(&BufferDescriptor {
            label: Some(Cow::Owned(format!(
                "{} [slot {} page {}]",
                self.group.debug_name(),
                slot,
                page
            ))),
            size: capacity as u64,
            usage: BufferUsage::UNIFORM | BufferUsage::COPY_DST,
        })?;

        let created = GpuPage { buffer, capacity };
        match self.slots[slot].get_mut(page) {
            Some(old) => {
                log::debug!(
                    "ConstantBufferManager({}): growing page {} from {} to {} bytes",
                    self.group.debug_name(),
                    page,
                    old.capacity,
                    capacity
                );
                self.retired.push(old.buffer);
                *old = created;
            }
            None => self.slots[slot].push(created),
        }
        Ok(buffer)
    }

    fn upload_page(
        &mut self,
        device: &dyn GraphicsDevice,
        slot: usize,
        page: usize,
        settings: &ConstantBufferSettings,
    ) -> Result<BufferId, ResourceError> {
        let buffer = self.ensure_page(device, slot, page, settings)?;
        if !self.uploaded[page] {
            device.write_buffer(buffer, 0, self.collection.page(page))?;
            self.uploaded[page] = true;
        }
        Ok(buffer)
    }
}

/// Allocates constant buffer blocks for a frame and binds them on demand.
///
/// The lifecycle of a frame is:
/// 1. [`clear_and_initialize`](Self::clear_and_initialize) with the device alignment;
/// 2. any number of [`write`](Self::write) calls while recording;
/// 3. [`prepare_buffers`](Self::prepare_buffers) before the first draw executes;
/// 4. [`dispatch`](Self::dispatch) per draw and group;
/// 5. [`finalize`](Self::finalize) once the frame is submitted.
pub struct ConstantBufferManager {
    groups: [GroupState; MAX_SHADER_PARAMETER_GROUPS],
    tickets: Vec<Ticket>,
    settings: ConstantBufferSettings,
    hasher: RandomState,
    current_slot: usize,
}

impl std::fmt::Debug for ConstantBufferManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstantBufferManager")
            .field("groups", &self.groups)
            .field("tickets", &self.tickets.len())
            .field("settings", &self.settings)
            .field("current_slot", &self.current_slot)
            .finish_non_exhaustive()
    }
}

impl ConstantBufferManager {
    /// Creates a manager. No GPU memory is allocated until blocks are written.
    pub fn new(settings: ConstantBufferSettings) -> Self {
        let groups = ShaderParameterGroup::ALL
            .map(|group| GroupState::new(group, settings.max_buffer_size));
        Self {
            groups,
            tickets: Vec::new(),
            settings,
            hasher: RandomState::with_seeds(
                0x243f_6a88_85a3_08d3,
                0x1319_8a2e_0370_7344,
                0xa409_3822_299f_31d0,
                0x082e_fa98_ec4e_6c89,
            ),
            current_slot: 0,
        }
    }

    /// Drops every block of the previous frame and sets the offset alignment.
    ///
    /// `alignment` must be a power of two.
    pub fn clear_and_initialize(&mut self, alignment: u32) {
        for state in &mut self.groups {
            state.reset_frame(alignment);
        }
        self.tickets.clear();
    }

    /// Writes a block for `group` and returns its ticket.
    ///
    /// Writing the same bytes as the previous block of the group returns the previous
    /// ticket instead of allocating.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::ConstantBufferOverflow`] if the block is larger than
    /// the maximum buffer size.
    pub fn write(
        &mut self,
        group: ShaderParameterGroup,
        data: &[u8],
    ) -> Result<CBufferTicketId, ResourceError> {
        let hash = self.hasher.hash_one(data);
        let state = &mut self.groups[group.index()];

        if state.last_ticket.is_valid() && state.last_hash == hash {
            let last = &self.tickets[state.last_ticket.index()];
            if state.collection.block(last.page, last.offset, last.size) == data {
                return Ok(state.last_ticket);
            }
        }

        let (page, offset) = state.collection.add_block(data)?;
        if state.uploaded.len() <= page {
            state.uploaded.resize(page + 1, false);
        }
        state.uploaded[page] = false;

        let ticket = CBufferTicketId::from_index(self.tickets.len());
        self.tickets.push(Ticket {
            group,
            page,
            offset,
            size: data.len() as u32,
        });
        state.last_ticket = ticket;
        state.last_hash = hash;
        Ok(ticket)
    }

    /// Creates or grows the GPU buffers of the current ring slot to fit this frame.
    pub fn prepare_buffers(&mut self, device: &dyn GraphicsDevice) -> Result<(), ResourceError> {
        for state in &mut self.groups {
            for page in 0..state.collection.num_pages() {
                state.ensure_page(device, self.current_slot, page, &self.settings)?;
            }
        }
        Ok(())
    }

    /// Destroys the buffers replaced by growth since the last release.
    ///
    /// `on_retire` sees each buffer before it is destroyed, so bindings that still
    /// reference it can be dropped first.
    pub fn release_retired_buffers(
        &mut self,
        device: &dyn GraphicsDevice,
        mut on_retire: impl FnMut(BufferId),
    ) {
        for state in &mut self.groups {
            for buffer in state.retired.drain(..) {
                on_retire(buffer);
                if let Err(e) = device.destroy_buffer(buffer) {
                    log::warn!(
                        "ConstantBufferManager({}): Failed to destroy buffer: {:?}",
                        state.group.debug_name(),
                        e
                    );
                }
            }
        }
    }

    /// Returns `true` if grown buffers are waiting for
    /// [`release_retired_buffers`](Self::release_retired_buffers).
    pub fn has_retired_buffers(&self) -> bool {
        self.groups.iter().any(|state| !state.retired.is_empty())
    }

    /// Resolves a ticket to a bindable range, uploading its page on first use.
    ///
    /// An [`INVALID`](CBufferTicketId::INVALID) ticket returns the range dispatched last
    /// for the group, so unchanged groups keep their binding. Returns `None` if nothing
    /// is bound for the group or the upload failed.
    pub fn dispatch(
        &mut self,
        device: &dyn GraphicsDevice,
        group: ShaderParameterGroup,
        ticket: CBufferTicketId,
    ) -> Option<ConstantBufferRange> {
        let state = &mut self.groups[group.index()];
        if !ticket.is_valid() {
            return state.last_dispatched;
        }

        let info = match self.tickets.get(ticket.index()) {
            Some(info) if info.group == group => *info,
            _ => {
                log::warn!(
                    "ConstantBufferManager({}): ticket {:?} does not belong to this frame or group",
                    group.debug_name(),
                    ticket
                );
                return state.last_dispatched;
            }
        };

        match state.upload_page(device, self.current_slot, info.page, &self.settings) {
            Ok(buffer) => {
                let range = ConstantBufferRange {
                    buffer,
                    offset: info.offset,
                    size: info.size,
                };
                state.last_dispatched = Some(range);
                Some(range)
            }
            Err(e) => {
                log::error!(
                    "ConstantBufferManager({}): Failed to upload page {}: {}",
                    group.debug_name(),
                    info.page,
                    e
                );
                None
            }
        }
    }

    /// Flushes pages no draw has dispatched and advances to the next ring slot.
    ///
    /// Pages count as not uploaded afterwards, since the next slot has its own buffers.
    pub fn finalize(&mut self, device: &dyn GraphicsDevice) {
        for state in &mut self.groups {
            for page in 0..state.collection.num_pages() {
                if state.uploaded[page] {
                    continue;
                }
                if let Err(e) = state.upload_page(device, self.current_slot, page, &self.settings)
                {
                    log::error!(
                        "ConstantBufferManager({}): Failed to flush page {}: {}",
                        state.group.debug_name(),
                        page,
                        e
                    );
                }
            }
            state.uploaded.fill(false);
            state.last_dispatched = None;
        }
        self.current_slot = (self.current_slot + 1) % MAX_FRAMES_IN_FLIGHT;
    }

    /// Returns the buffer last dispatched for `group`.
    pub fn current_buffer(&self, group: ShaderParameterGroup) -> Option<BufferId> {
        self.groups[group.index()]
            .last_dispatched
            .map(|range| range.buffer)
    }

    /// Number of blocks written this frame.
    pub fn num_blocks(&self) -> usize {
        self.tickets.len()
    }

    /// Returns the current slot index.
    pub fn current_slot_index(&self) -> usize {
        self.current_slot
    }

    /// Releases every GPU buffer.
    pub fn destroy(&mut self, device: &dyn GraphicsDevice) {
        self.release_retired_buffers(device, |_| {});
        for state in &mut self.groups {
            for slot in &mut state.slots {
                for page in slot.drain(..) {
                    if let Err(e) = device.destroy_buffer(page.buffer) {
                        log::warn!(
                            "ConstantBufferManager({}): Failed to destroy buffer: {:?}",
                            state.group.debug_name(),
                            e
                        );
                    }
                }
            }
            state.uploaded.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::api::{
        command::{ShaderResourceBindingCreateInfo, ShaderResourceBindingId},
        core::DeviceCaps,
        pipeline::{PipelineState, PipelineStateDesc, PipelineStateId, ShaderId},
        util::ShaderStage,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// A mock graphics device that counts buffer traffic.
    #[derive(Debug, Default)]
    struct MockGraphicsDevice {
        caps: DeviceCaps,
        next_id: AtomicUsize,
        created: Mutex<Vec<(BufferId, u64)>>,
        destroyed: Mutex<Vec<BufferId>>,
        writes: Mutex<Vec<(BufferId, Vec<u8>)>>,
    }

    impl MockGraphicsDevice {
        fn next(&self) -> usize {
            self.next_id.fetch_add(1, Ordering::Relaxed)
        }
    }

    impl GraphicsDevice for MockGraphicsDevice {
        fn caps(&self) -> &DeviceCaps {
            &self.caps
        }
        fn create_buffer(&self, d: &BufferDescriptor) -> Result<BufferId, ResourceError> {
            let id = BufferId(self.next());
            self.created.lock().unwrap().push((id, d.size));
            Ok(id)
        }
        fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError> {
            self.destroyed.lock().unwrap().push(id);
            Ok(())
        }
        fn write_buffer(&self, id: BufferId, _o: u64, data: &[u8]) -> Result<(), ResourceError> {
            self.writes.lock().unwrap().push((id, data.to_vec()));
            Ok(())
        }
        fn get_shader(&self, _s: ShaderStage, _n: &str, _d: &str) -> Option<ShaderId> {
            None
        }
        fn create_pipeline_state(
            &self,
            _d: &PipelineStateDesc,
        ) -> Result<PipelineState, ResourceError> {
            Err(ResourceError::NotFound)
        }
        fn destroy_pipeline_state(&self, _id: PipelineStateId) -> Result<(), ResourceError> {
            Ok(())
        }
        fn create_shader_resource_binding(
            &self,
            _i: &ShaderResourceBindingCreateInfo,
        ) -> Result<ShaderResourceBindingId, ResourceError> {
            Ok(ShaderResourceBindingId(self.next()))
        }
        fn destroy_shader_resource_binding(
            &self,
            _id: ShaderResourceBindingId,
        ) -> Result<(), ResourceError> {
            Ok(())
        }
    }

    fn settings() -> ConstantBufferSettings {
        ConstantBufferSettings {
            initial_buffer_size: 1024,
            max_buffer_size: 4096,
        }
    }

    #[test]
    fn test_dispatched_offsets_are_aligned() {
        let device = MockGraphicsDevice::default();
        let mut manager = ConstantBufferManager::new(settings());
        manager.clear_and_initialize(256);

        let a = manager
            .write(ShaderParameterGroup::Object, &[1u8; 64])
            .unwrap();
        let b = manager
            .write(ShaderParameterGroup::Object, &[2u8; 80])
            .unwrap();
        manager.prepare_buffers(&device).unwrap();

        let range_a = manager
            .dispatch(&device, ShaderParameterGroup::Object, a)
            .unwrap();
        let range_b = manager
            .dispatch(&device, ShaderParameterGroup::Object, b)
            .unwrap();
        assert_eq!(range_a.offset % 256, 0);
        assert_eq!(range_b.offset % 256, 0);
        assert_eq!(range_b.offset, 256);
        assert_eq!(range_b.size, 80);
        assert_eq!(range_a.buffer, range_b.buffer);

        // The page is uploaded once, on first dispatch.
        assert_eq!(device.writes.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_identical_writes_reuse_ticket() {
        let mut manager = ConstantBufferManager::new(settings());
        manager.clear_and_initialize(16);

        let a = manager
            .write(ShaderParameterGroup::Material, &[9u8; 32])
            .unwrap();
        let b = manager
            .write(ShaderParameterGroup::Material, &[9u8; 32])
            .unwrap();
        let c = manager
            .write(ShaderParameterGroup::Material, &[8u8; 32])
            .unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(manager.num_blocks(), 2);
    }

    #[test]
    fn test_invalid_ticket_keeps_previous_range() {
        let device = MockGraphicsDevice::default();
        let mut manager = ConstantBufferManager::new(settings());
        manager.clear_and_initialize(16);

        assert_eq!(
            manager.dispatch(&device, ShaderParameterGroup::Camera, CBufferTicketId::INVALID),
            None
        );

        let ticket = manager
            .write(ShaderParameterGroup::Camera, &[3u8; 16])
            .unwrap();
        let range = manager.dispatch(&device, ShaderParameterGroup::Camera, ticket);
        assert!(range.is_some());
        assert_eq!(
            manager.dispatch(&device, ShaderParameterGroup::Camera, CBufferTicketId::INVALID),
            range
        );
        assert_eq!(
            manager.current_buffer(ShaderParameterGroup::Camera),
            range.map(|r| r.buffer)
        );
    }

    #[test]
    fn test_ticket_of_other_group_is_rejected() {
        let device = MockGraphicsDevice::default();
        let mut manager = ConstantBufferManager::new(settings());
        manager.clear_and_initialize(16);

        let ticket = manager
            .write(ShaderParameterGroup::Zone, &[3u8; 16])
            .unwrap();
        assert_eq!(
            manager.dispatch(&device, ShaderParameterGroup::Light, ticket),
            None
        );
    }

    #[test]
    fn test_oversized_block_is_a_configuration_error() {
        let mut manager = ConstantBufferManager::new(settings());
        manager.clear_and_initialize(16);

        let result = manager.write(ShaderParameterGroup::Custom, &[0u8; 5000]);
        assert!(matches!(
            result,
            Err(ResourceError::ConstantBufferOverflow {
                label: "CustomCB",
                requested: 5000,
                capacity: 4096,
            })
        ));
    }

    #[test]
    fn test_ring_slots_use_distinct_buffers() {
        let device = MockGraphicsDevice::default();
        let mut manager = ConstantBufferManager::new(settings());

        let mut buffers = Vec::new();
        for _ in 0..MAX_FRAMES_IN_FLIGHT + 1 {
            manager.clear_and_initialize(16);
            let ticket = manager
                .write(ShaderParameterGroup::Frame, &[1u8; 16])
                .unwrap();
            manager.prepare_buffers(&device).unwrap();
            let range = manager
                .dispatch(&device, ShaderParameterGroup::Frame, ticket)
                .unwrap();
            buffers.push(range.buffer);
            manager.finalize(&device);
        }

        assert_ne!(buffers[0], buffers[1]);
        assert_eq!(buffers[0], buffers[MAX_FRAMES_IN_FLIGHT]);
        assert_eq!(device.created.lock().unwrap().len(), MAX_FRAMES_IN_FLIGHT);
    }

    #[test]
    fn test_buffer_grows_when_page_outgrows_it() {
        let device = MockGraphicsDevice::default();
        let mut manager = ConstantBufferManager::new(settings());

        manager.clear_and_initialize(256);
        manager
            .write(ShaderParameterGroup::Object, &[1u8; 16])
            .unwrap();
        manager.prepare_buffers(&device).unwrap();
        manager.finalize(&device);
        manager.finalize(&device);

        manager.clear_and_initialize(256);
        for i in 0..10u8 {
            manager
                .write(ShaderParameterGroup::Object, &[i; 16])
                .unwrap();
        }
        manager.prepare_buffers(&device).unwrap();

        let created = device.created.lock().unwrap().clone();
        assert_eq!(created.len(), 2);
        assert_eq!(created[0].1, 1024);
        assert_eq!(created[1].1, 4096);

        // The replaced buffer stays alive until its users have been told.
        assert!(device.destroyed.lock().unwrap().is_empty());
        assert!(manager.has_retired_buffers());

        let mut retired = Vec::new();
        manager.release_retired_buffers(&device, |buffer| retired.push(buffer));
        assert_eq!(retired, vec![created[0].0]);
        assert_eq!(device.destroyed.lock().unwrap().as_slice(), &[created[0].0]);
        assert!(!manager.has_retired_buffers());
    }

    #[test]
    fn test_pages_are_uploaded_again_after_finalize() {
        let device = MockGraphicsDevice::default();
        let mut manager = ConstantBufferManager::new(settings());
        manager.clear_and_initialize(16);

        let ticket = manager
            .write(ShaderParameterGroup::Object, &[7u8; 16])
            .unwrap();
        manager.prepare_buffers(&device).unwrap();
        let first = manager
            .dispatch(&device, ShaderParameterGroup::Object, ticket)
            .unwrap();
        manager.finalize(&device);

        // Replaying the same blocks lands in the next slot, which needs its own upload.
        let second = manager
            .dispatch(&device, ShaderParameterGroup::Object, ticket)
            .unwrap();
        assert_ne!(first.buffer, second.buffer);
        let writes = device.writes.lock().unwrap();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[1].0, second.buffer);
    }

    #[test]
    fn test_finalize_flushes_undispatched_pages() {
        let device = MockGraphicsDevice::default();
        let mut manager = ConstantBufferManager::new(settings());
        manager.clear_and_initialize(16);

        manager
            .write(ShaderParameterGroup::Light, &[5u8; 16])
            .unwrap();
        manager.finalize(&device);

        let writes = device.writes.lock().unwrap();
        assert_eq!(writes.len(), 1);
        assert_eq!(&writes[0].1[..16], &[5u8; 16]);
        assert_eq!(manager.current_slot_index(), 1);
    }
}
