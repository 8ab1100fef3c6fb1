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

//! CPU-side paged staging storage for one constant buffer group.

use crate::renderer::error::ResourceError;

/// Packs variable-sized blocks into fixed-size pages, each block starting at an
/// offset aligned to the device constant buffer alignment.
///
/// Pages are kept across frames, so steady-state frames do not allocate.
#[derive(Debug)]
pub struct ConstantBufferCollection {
    label: &'static str,
    alignment: u32,
    page_size: u32,
    pages: Vec<Vec<u8>>,
    active_pages: usize,
}

impl ConstantBufferCollection {
    /// Creates an empty collection whose pages hold at most `page_size` bytes.
    pub fn new(label: &'static str, page_size: u32) -> Self {
        Self {
            label,
            alignment: 1,
            page_size,
            pages: Vec::new(),
            active_pages: 0,
        }
    }

    /// Drops every block and sets the alignment used for the next blocks.
    ///
    /// `alignment` must be a power of two.
    pub fn clear_and_initialize(&mut self, alignment: u32) {
        debug_assert!(
            alignment.is_power_of_two(),
            "constant buffer alignment {alignment} is not a power of two"
        );
        self.alignment = alignment.max(1);
        for page in &mut self.pages {
            page.clear();
        }
        self.active_pages = 0;
    }

    /// Copies `data` into a new block and returns its `(page, offset)`.
    ///
    /// The block is padded with zeros up to the alignment. A block larger than a page
    /// is rejected.
    pub fn add_block(&mut self, data: &[u8]) -> Result<(usize, u32), ResourceError> {
        let size = data.len() as u32;
        let aligned_size = align_up(size.max(1), self.alignment);
        if aligned_size > self.page_size {
            log::error!(
                "ConstantBufferCollection({}): block of {} bytes does not fit in a {} byte page",
                self.label,
                size,
                self.page_size
            );
            return Err(ResourceError::ConstantBufferOverflow {
                label: self.label,
                requested: size,
                capacity: self.page_size,
            });
        }

        let needs_new_page = match self.active_pages {
            0 => true,
            n => self.pages[n - 1].len() as u32 + aligned_size > self.page_size,
        };
        if needs_new_page {
            self.active_pages += 1;
            if self.pages.len() < self.active_pages {
                self.pages
                    .push(Vec::with_capacity(self.page_size as usize));
            }
        }

        let page_index = self.active_pages - 1;
        let page = &mut self.pages[page_index];
        let offset = page.len();
        page.extend_from_slice(data);
        page.resize(offset + aligned_size as usize, 0);
        Ok((page_index, offset as u32))
    }

    /// Returns the bytes of a block previously added.
    pub fn block(&self, page: usize, offset: u32, size: u32) -> &[u8] {
        let start = offset as usize;
        &self.pages[page][start..start + size as usize]
    }

    /// Returns the used bytes of a page.
    pub fn page(&self, index: usize) -> &[u8] {
        &self.pages[index]
    }

    /// Number of pages holding blocks this frame.
    pub fn num_pages(&self) -> usize {
        self.active_pages
    }

    /// Alignment of block offsets.
    pub fn alignment(&self) -> u32 {
        self.alignment
    }

    /// Maximum size of a page.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }
}

fn align_up(value: u32, alignment: u32) -> u32 {
    (value + alignment - 1) & !(alignment - 1)
}
