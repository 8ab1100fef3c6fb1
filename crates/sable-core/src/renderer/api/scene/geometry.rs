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

//! Vertex stream layout of a drawable geometry.

use crate::renderer::api::pipeline::{PrimitiveTopology, VertexBufferLayout};
use crate::renderer::api::util::IndexFormat;

/// The vertex streams and topology of a geometry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Geometry {
    /// Layout of each vertex buffer, by slot.
    pub vertex_layouts: Vec<VertexBufferLayout>,
    /// Topology.
    pub primitive_type: PrimitiveTopology,
    /// Index format, or `None` for non-indexed geometry.
    pub index_format: Option<IndexFormat>,
}
