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

//! Cache of compiled pipeline states keyed by their description.

use ahash::AHashMap;
use sable_core::renderer::{
    api::pipeline::{PipelineState, PipelineStateDesc},
    GraphicsDevice, ResourceError,
};
use std::sync::{Arc, Mutex};

/// Maps pipeline descriptions to compiled pipeline states.
///
/// Descriptions differing only in their debug name share one state.
#[derive(Debug, Default)]
pub struct PipelineStateCache {
    states: Mutex<AHashMap<PipelineStateDesc, Arc<PipelineState>>>,
}

impl PipelineStateCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the state for `desc`, compiling it on a miss.
    pub fn get_or_create(
        &self,
        device: &dyn GraphicsDevice,
        desc: &PipelineStateDesc,
    ) -> Result<Arc<PipelineState>, ResourceError> {
        let mut states = self
            .states
            .lock()
            .map_err(|_| ResourceError::BackendError("pipeline state cache poisoned".into()))?;

        if let Some(state) = states.get(desc) {
            return Ok(Arc::clone(state));
        }

        let state = Arc::new(device.create_pipeline_state(desc)?);
        log::debug!(
            "PipelineStateCache: compiled '{}' as {:?}",
            desc.debug_name,
            state.id()
        );
        states.insert(desc.clone(), Arc::clone(&state));
        Ok(state)
    }

    /// Number of cached states.
    pub fn len(&self) -> usize {
        self.states.lock().map(|states| states.len()).unwrap_or(0)
    }

    /// Returns `true` if the cache holds no states.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Destroys every cached state.
    pub fn clear(&self, device: &dyn GraphicsDevice) {
        let Ok(mut states) = self.states.lock() else {
            log::error!("PipelineStateCache: cannot clear a poisoned cache");
            return;
        };
        for (_, state) in states.drain() {
            if let Err(e) = device.destroy_pipeline_state(state.id()) {
                log::warn!(
                    "PipelineStateCache: Failed to destroy pipeline state {:?}: {:?}",
                    state.id(),
                    e
                );
            }
        }
    }
}
