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

//! Shared enums and the per-frame constant buffer allocator.

pub mod constant_buffer;
pub mod constant_buffer_collection;
pub mod constant_buffer_manager;
pub mod enums;

pub use self::constant_buffer::*;
pub use self::constant_buffer_collection::*;
pub use self::constant_buffer_manager::*;
pub use self::enums::*;
