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

//! Vertex stream layouts and the flattened input layout of a pipeline state.

use super::enums::{VertexFormat, VertexSemantic};
use std::hash::{Hash, Hasher};

/// A single attribute inside a vertex stream.
///
/// Two elements are equal when they describe the same data, regardless of where in
/// the vertex it is stored. `offset` is derived by [`VertexBufferLayout::new`].
#[derive(Debug, Clone, Copy)]
pub struct VertexElement {
    /// Data format.
    pub format: VertexFormat,
    /// Meaning of the attribute.
    pub semantic: VertexSemantic,
    /// Index for semantics that repeat, like texture coordinate sets.
    pub index: u8,
    /// The attribute advances per instance instead of per vertex.
    pub per_instance: bool,
    /// Byte offset of the attribute inside the vertex.
    pub offset: u32,
}

impl VertexElement {
    /// Creates a per-vertex element.
    pub const fn new(format: VertexFormat, semantic: VertexSemantic, index: u8) -> Self {
        Self {
            format,
            semantic,
            index,
            per_instance: false,
            offset: 0,
        }
    }

    /// Creates a per-instance element.
    pub const fn per_instance(format: VertexFormat, semantic: VertexSemantic, index: u8) -> Self {
        Self {
            format,
            semantic,
            index,
            per_instance: true,
            offset: 0,
        }
    }
}

impl PartialEq for VertexElement {
    fn eq(&self, other: &Self) -> bool {
        self.format == other.format
            && self.semantic == other.semantic
            && self.index == other.index
            && self.per_instance == other.per_instance
    }
}

impl Eq for VertexElement {}

impl Hash for VertexElement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.format.hash(state);
        self.semantic.hash(state);
        self.index.hash(state);
        self.per_instance.hash(state);
    }
}

/// The packed layout of one vertex buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct VertexBufferLayout {
    elements: Vec<VertexElement>,
    stride: u32,
}

impl VertexBufferLayout {
    /// Packs the elements tightly in order and computes their offsets.
    pub fn new(elements: impl IntoIterator<Item = VertexElement>) -> Self {
        let mut stride = 0;
        let elements = elements
            .into_iter()
            .map(|mut element| {
                element.offset = stride;
                stride += element.format.size();
                element
            })
            .collect();
        Self { elements, stride }
    }

    /// The elements of the layout.
    pub fn elements(&self) -> &[VertexElement] {
        &self.elements
    }

    /// Size of one vertex in bytes.
    pub fn stride(&self) -> u32 {
        self.stride
    }
}

/// One attribute of a pipeline input layout, bound to a vertex buffer slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputLayoutElement {
    /// Vertex buffer slot.
    pub buffer_index: u32,
    /// Stride of the vertex buffer.
    pub buffer_stride: u32,
    /// Offset of the attribute inside the vertex.
    pub element_offset: u32,
    /// `0` for per-vertex data, otherwise the number of instances per step.
    pub instance_step_rate: u32,
    /// Data format.
    pub format: VertexFormat,
    /// Meaning of the attribute.
    pub semantic: VertexSemantic,
    /// Semantic index.
    pub semantic_index: u8,
}

/// The flattened vertex input of a pipeline state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct InputLayoutDesc {
    /// All attributes across all vertex buffer slots.
    pub elements: Vec<InputLayoutElement>,
}

impl InputLayoutDesc {
    /// Removes every element.
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Appends the attributes of `layout`, read from vertex buffer slot `buffer_index`.
    pub fn push_buffer(&mut self, buffer_index: u32, layout: &VertexBufferLayout) {
        self.elements
            .extend(layout.elements().iter().map(|element| InputLayoutElement {
                buffer_index,
                buffer_stride: layout.stride(),
                element_offset: element.offset,
                instance_step_rate: u32::from(element.per_instance),
                format: element.format,
                semantic: element.semantic,
                semantic_index: element.index,
            }));
    }
}
