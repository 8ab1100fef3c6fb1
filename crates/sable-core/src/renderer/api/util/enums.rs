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

//! Generic rendering enums.

/// Specifies the data type of indices in an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexFormat {
    /// Indices are 16-bit unsigned integers.
    Uint16,
    /// Indices are 32-bit unsigned integers.
    Uint32,
}

impl IndexFormat {
    /// Size of a single index in bytes.
    pub fn size(&self) -> u32 {
        match self {
            IndexFormat::Uint16 => 2,
            IndexFormat::Uint32 => 4,
        }
    }
}

/// Defines the programmable stage in the graphics pipeline a shader is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// The vertex shader stage.
    Vertex,
    /// The fragment (or pixel) shader stage.
    Fragment,
}

impl ShaderStage {
    /// Every graphics stage, in binding order.
    pub const ALL: [ShaderStage; 2] = [ShaderStage::Vertex, ShaderStage::Fragment];

    /// Index of the stage in per-stage arrays.
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// The number of shader stages a pipeline state carries.
pub const MAX_SHADER_STAGES: usize = ShaderStage::ALL.len();

/// Defines the memory format of pixels in a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    // 8-bit formats
    /// One 8-bit unsigned normalized component.
    R8Unorm,
    /// Two 8-bit unsigned normalized components.
    Rg8Unorm,
    /// Four 8-bit unsigned normalized components (RGBA).
    Rgba8Unorm,
    /// Four 8-bit unsigned normalized components (RGBA) in the sRGB color space.
    Rgba8UnormSrgb,
    /// Four 8-bit unsigned normalized components (BGRA).
    Bgra8Unorm,
    /// Four 8-bit unsigned normalized components (BGRA) in the sRGB color space. This is a common swapchain format.
    Bgra8UnormSrgb,
    // 16-bit float formats
    /// One 16-bit float component.
    R16Float,
    /// Two 16-bit float components.
    Rg16Float,
    /// Four 16-bit float components.
    Rgba16Float,
    // 32-bit float formats
    /// One 32-bit float component.
    R32Float,
    /// Two 32-bit float components.
    Rg32Float,
    /// Four 32-bit float components.
    Rgba32Float,
    // Depth/stencil formats
    /// A 16-bit unsigned normalized depth format.
    Depth16Unorm,
    /// A 24-bit unsigned normalized depth format.
    Depth24Plus,
    /// A 24-bit unsigned normalized depth format with an 8-bit stencil component.
    Depth24PlusStencil8,
    /// A 32-bit float depth format.
    Depth32Float,
    /// A 32-bit float depth format with an 8-bit stencil component.
    Depth32FloatStencil8,
}

impl TextureFormat {
    /// Returns the size in bytes of a single pixel for this format.
    /// Note: This can be an approximation for packed or complex formats.
    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            TextureFormat::R8Unorm => 1,
            TextureFormat::Rg8Unorm => 2,
            TextureFormat::Rgba8Unorm => 4,
            TextureFormat::Rgba8UnormSrgb => 4,
            TextureFormat::Bgra8Unorm => 4,
            TextureFormat::Bgra8UnormSrgb => 4,
            TextureFormat::R16Float => 2,
            TextureFormat::Rg16Float => 4,
            TextureFormat::Rgba16Float => 8,
            TextureFormat::R32Float => 4,
            TextureFormat::Rg32Float => 8,
            TextureFormat::Rgba32Float => 16,
            TextureFormat::Depth16Unorm => 2,
            TextureFormat::Depth24Plus => 4,
            TextureFormat::Depth24PlusStencil8 => 4,
            TextureFormat::Depth32Float => 4,
            TextureFormat::Depth32FloatStencil8 => 5,
        }
    }

    /// Returns `true` for depth and depth/stencil formats.
    pub fn is_depth(&self) -> bool {
        matches!(
            self,
            TextureFormat::Depth16Unorm
                | TextureFormat::Depth24Plus
                | TextureFormat::Depth24PlusStencil8
                | TextureFormat::Depth32Float
                | TextureFormat::Depth32FloatStencil8
        )
    }

    /// Returns `true` if the format carries a stencil component.
    pub fn has_stencil(&self) -> bool {
        matches!(
            self,
            TextureFormat::Depth24PlusStencil8 | TextureFormat::Depth32FloatStencil8
        )
    }

    /// Returns `true` if reads from this format are sRGB-decoded.
    pub fn is_srgb(&self) -> bool {
        matches!(
            self,
            TextureFormat::Rgba8UnormSrgb | TextureFormat::Bgra8UnormSrgb
        )
    }

    /// Returns the sRGB or linear twin of this format.
    ///
    /// Formats without a twin are returned unchanged.
    pub fn with_srgb(self, srgb: bool) -> Self {
        match (self, srgb) {
            (TextureFormat::Rgba8Unorm, true) => TextureFormat::Rgba8UnormSrgb,
            (TextureFormat::Bgra8Unorm, true) => TextureFormat::Bgra8UnormSrgb,
            (TextureFormat::Rgba8UnormSrgb, false) => TextureFormat::Rgba8Unorm,
            (TextureFormat::Bgra8UnormSrgb, false) => TextureFormat::Bgra8Unorm,
            (format, _) => format,
        }
    }
}

/// The kind of geometry a batch draws. Selects vertex shader variations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GeometryType {
    /// Plain geometry with a per-draw world transform.
    #[default]
    Static,
    /// Skinned geometry with a bone palette.
    Skinned,
    /// Static geometry whose transforms come from the instancing buffer.
    Instanced,
    /// Camera-facing billboards.
    Billboard,
    /// Billboards rotating around a fixed direction.
    DirBillboard,
    /// Ribbon trail facing the camera.
    TrailFaceCamera,
    /// Ribbon trail aligned to a bone.
    TrailBone,
    /// Static geometry that must never be instanced.
    StaticNoInstancing,
}

impl GeometryType {
    /// Returns the shader define selecting this geometry type, if any.
    pub fn shader_define(&self) -> Option<&'static str> {
        match self {
            GeometryType::Static | GeometryType::StaticNoInstancing => None,
            GeometryType::Skinned => Some("SKINNED"),
            GeometryType::Instanced => Some("INSTANCED"),
            GeometryType::Billboard => Some("BILLBOARD"),
            GeometryType::DirBillboard => Some("DIRBILLBOARD"),
            GeometryType::TrailFaceCamera => Some("TRAILFACECAM"),
            GeometryType::TrailBone => Some("TRAILBONE"),
        }
    }
}
