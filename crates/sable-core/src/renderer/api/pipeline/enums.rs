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

//! Enums for pipeline configuration.

/// The memory format of a single vertex attribute's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    /// Four 8-bit unsigned integer components.
    Uint8x4,
    /// Four 8-bit unsigned integer components normalized to `[0.0, 1.0]`.
    Unorm8x4,
    /// One 32-bit signed integer component.
    Sint32,
    /// One 32-bit float component.
    Float32,
    /// Two 32-bit float components.
    Float32x2,
    /// Three 32-bit float components.
    Float32x3,
    /// Four 32-bit float components.
    Float32x4,
}

impl VertexFormat {
    /// Returns the size in bytes of this vertex format
    pub fn size(&self) -> u32 {
        match self {
            VertexFormat::Uint8x4 => 4,
            VertexFormat::Unorm8x4 => 4,
            VertexFormat::Sint32 => 4,
            VertexFormat::Float32 => 4,
            VertexFormat::Float32x2 => 8,
            VertexFormat::Float32x3 => 12,
            VertexFormat::Float32x4 => 16,
        }
    }
}

/// The meaning of a vertex attribute, matched against shader inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexSemantic {
    /// Object space position.
    Position,
    /// Normal vector.
    Normal,
    /// Binormal vector.
    Binormal,
    /// Tangent vector.
    Tangent,
    /// Texture coordinate set.
    TexCoord,
    /// Vertex color.
    Color,
    /// Skinning weights.
    BlendWeights,
    /// Skinning bone indices.
    BlendIndices,
    /// Index of the object in a batched draw.
    ObjectIndex,
}

/// Defines how vertices are connected to form a geometric primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveTopology {
    /// Vertices are rendered as a list of isolated points.
    PointList,
    /// Vertices are rendered as a list of isolated lines (every two vertices form a line).
    LineList,
    /// Vertices are rendered as a connected line strip.
    LineStrip,
    /// Vertices are rendered as a list of isolated triangles (every three vertices form a triangle).
    #[default]
    TriangleList,
    /// Vertices are rendered as a connected triangle strip.
    TriangleStrip,
}

/// Which triangle winding is discarded by the rasterizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CullMode {
    /// No face culling.
    None,
    /// Counter-clockwise triangles are culled. This is the usual back-face setting.
    #[default]
    Ccw,
    /// Clockwise triangles are culled.
    Cw,
}

impl CullMode {
    /// Returns the opposite winding. `None` stays `None`.
    pub fn flipped(self) -> Self {
        match self {
            CullMode::None => CullMode::None,
            CullMode::Ccw => CullMode::Cw,
            CullMode::Cw => CullMode::Ccw,
        }
    }

    /// Resolves the culling actually used when rendering through a camera.
    ///
    /// A camera with reversed winding (mirrored projection) swaps `Cw` and `Ccw`.
    pub fn for_camera(self, camera_reversed: bool) -> Self {
        if camera_reversed {
            self.flipped()
        } else {
            self
        }
    }
}

/// Rasterization fill mode. Ordered from least to most "debug" so that `max`
/// picks the override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum FillMode {
    /// Filled triangles.
    #[default]
    Solid,
    /// Triangle edges only.
    Wireframe,
    /// Triangle vertices only.
    Point,
}

/// A function used for depth or stencil testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompareFunction {
    /// The test never passes.
    Never,
    /// Passes if the new value is less than the existing value.
    Less,
    /// Passes if the new value is equal to the existing value.
    Equal,
    /// Passes if the new value is less than or equal to the existing value.
    #[default]
    LessEqual,
    /// Passes if the new value is greater than the existing value.
    Greater,
    /// Passes if the new value is not equal to the existing value.
    NotEqual,
    /// Passes if the new value is greater than or equal to the existing value.
    GreaterEqual,
    /// The test always passes.
    Always,
}

/// An operation to perform on a stencil buffer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StencilOperation {
    /// Keep the current value.
    #[default]
    Keep,
    /// Set the value to 0.
    Zero,
    /// Replace the value with the reference value.
    Replace,
    /// Increment the value, clamping at the maximum.
    IncrementClamp,
    /// Decrement the value, clamping at 0.
    DecrementClamp,
}

/// Preset color blending configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendMode {
    /// No blending, the source replaces the destination.
    #[default]
    Replace,
    /// `src + dst`.
    Add,
    /// `src * dst`.
    Multiply,
    /// Standard alpha blending.
    Alpha,
    /// `src * src_alpha + dst`.
    AddAlpha,
    /// Alpha blending with premultiplied source color.
    PremulAlpha,
    /// Blend by inverse destination alpha.
    InvDestAlpha,
    /// `dst - src`.
    Subtract,
    /// `dst - src * src_alpha`.
    SubtractAlpha,
}

impl BlendMode {
    /// Returns the subtractive counterpart used when drawing negative lights.
    ///
    /// Only additive modes have one; every other mode is returned unchanged.
    pub fn to_subtractive(self) -> Self {
        match self {
            BlendMode::Add => BlendMode::Subtract,
            BlendMode::AddAlpha => BlendMode::SubtractAlpha,
            other => other,
        }
    }
}
