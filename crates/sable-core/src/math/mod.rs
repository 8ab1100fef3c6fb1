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

//! Integer geometry primitives used by the render submission path.
//!
//! Sizes and rectangles here are pixel-based, so they use integer components.

pub mod dimension;
pub mod rect;

pub use self::dimension::{Extent2D, Extent3D};
pub use self::rect::IntRect;
