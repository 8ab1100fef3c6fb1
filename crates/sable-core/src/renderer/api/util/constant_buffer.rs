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

//! Constant buffer groups, ranges, and tickets.

use crate::renderer::api::resource::BufferId;

/// The uniform groups a shader program reads, ordered by update frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShaderParameterGroup {
    /// Per-frame values (time, delta time).
    Frame,
    /// Per-camera values (view-projection, camera position).
    Camera,
    /// Per-zone values (ambient, fog).
    Zone,
    /// Per-light values.
    Light,
    /// Per-material values.
    Material,
    /// Per-object values (world transform, skinning).
    Object,
    /// User-defined values.
    Custom,
}

/// Number of [`ShaderParameterGroup`] variants.
pub const MAX_SHADER_PARAMETER_GROUPS: usize = 7;

impl ShaderParameterGroup {
    /// Every group, in binding order.
    pub const ALL: [ShaderParameterGroup; MAX_SHADER_PARAMETER_GROUPS] = [
        ShaderParameterGroup::Frame,
        ShaderParameterGroup::Camera,
        ShaderParameterGroup::Zone,
        ShaderParameterGroup::Light,
        ShaderParameterGroup::Material,
        ShaderParameterGroup::Object,
        ShaderParameterGroup::Custom,
    ];

    /// Index of the group in per-group arrays.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The group name as used in shader sources.
    pub const fn name(self) -> &'static str {
        match self {
            ShaderParameterGroup::Frame => "Frame",
            ShaderParameterGroup::Camera => "Camera",
            ShaderParameterGroup::Zone => "Zone",
            ShaderParameterGroup::Light => "Light",
            ShaderParameterGroup::Material => "Material",
            ShaderParameterGroup::Object => "Object",
            ShaderParameterGroup::Custom => "Custom",
        }
    }

    /// The label given to the constant buffers of this group.
    pub const fn debug_name(self) -> &'static str {
        match self {
            ShaderParameterGroup::Frame => "FrameCB",
            ShaderParameterGroup::Camera => "CameraCB",
            ShaderParameterGroup::Zone => "ZoneCB",
            ShaderParameterGroup::Light => "LightCB",
            ShaderParameterGroup::Material => "MaterialCB",
            ShaderParameterGroup::Object => "ObjectCB",
            ShaderParameterGroup::Custom => "CustomCB",
        }
    }

    /// Finds a group from a constant buffer name found by shader reflection.
    ///
    /// Both the bare name (`"Camera"`) and the buffer name (`"CameraCB"`) are accepted,
    /// case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|group| {
            name.eq_ignore_ascii_case(group.name()) || name.eq_ignore_ascii_case(group.debug_name())
        })
    }
}

/// A region of a GPU buffer bound as a constant buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstantBufferRange {
    /// The buffer holding the data.
    pub buffer: BufferId,
    /// Byte offset of the region. A multiple of the device constant buffer alignment.
    pub offset: u32,
    /// Size of the region in bytes.
    pub size: u32,
}

/// A handle to a block written into the per-frame constant buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CBufferTicketId(u32);

impl CBufferTicketId {
    /// The "nothing written" ticket. Dispatching it keeps the previous binding.
    pub const INVALID: Self = Self(u32::MAX);

    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    /// Returns `false` for [`CBufferTicketId::INVALID`].
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for CBufferTicketId {
    fn default() -> Self {
        Self::INVALID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_lookup_by_name() {
        assert_eq!(
            ShaderParameterGroup::from_name("camera"),
            Some(ShaderParameterGroup::Camera)
        );
        assert_eq!(
            ShaderParameterGroup::from_name("ObjectCB"),
            Some(ShaderParameterGroup::Object)
        );
        assert_eq!(ShaderParameterGroup::from_name("Unknown"), None);
    }

    #[test]
    fn test_group_indices_match_order() {
        for (i, group) in ShaderParameterGroup::ALL.into_iter().enumerate() {
            assert_eq!(group.index(), i);
        }
        assert_eq!(ShaderParameterGroup::Material.debug_name(), "MaterialCB");
    }

    #[test]
    fn test_default_ticket_is_invalid() {
        assert!(!CBufferTicketId::default().is_valid());
        assert!(CBufferTicketId::from_index(0).is_valid());
    }
}
