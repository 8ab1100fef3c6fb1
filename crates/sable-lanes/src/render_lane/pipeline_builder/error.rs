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

//! Errors raised while deriving a batch pipeline state.

use sable_core::renderer::{ResourceError, ShaderError};
use thiserror::Error;

/// An error raised by [`PipelineStateBuilder`](super::PipelineStateBuilder) while
/// filling a pipeline description.
#[derive(Debug, Error)]
pub enum PipelineBuildError {
    /// A shader variation required by the batch does not exist.
    #[error(transparent)]
    Shader(#[from] ShaderError),

    /// The pipeline state could not be created by the device.
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Shadow and light volume batches are always drawn for a light.
    #[error("shadow and light volume batches require a pixel light")]
    MissingLight,

    /// The scene has no user pass registered at this index.
    #[error("no user pass is registered at index {0}")]
    UnknownPass(u32),

    /// The subpass index does not name a subpass of the pass kind.
    #[error("subpass {0} is not valid for this pass")]
    InvalidSubpass(u32),

    /// A pass flagged for a pipeline state callback does not implement it.
    #[error("pass '{0}' requests a pipeline state callback but does not provide one")]
    CallbackNotImplemented(String),
}
