// Copyright 2025 John Brosnihan
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
//! Particle handles
//!
//! Handles are lightweight, copyable references into a
//! [`ParticleSet`](super::ParticleSet). They carry a generation so a handle
//! to a removed particle can never silently alias a newer one.

use std::fmt;

/// Generational handle to a particle stored in a [`ParticleSet`](super::ParticleSet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleHandle {
    index: u32,
    generation: u32,
}

impl ParticleHandle {
    /// Create a handle from a slot index and generation
    pub fn new(index: u32, generation: u32) -> Self {
        ParticleHandle { index, generation }
    }

    /// Slot index in the owning set
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Generation of the slot when the handle was issued
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ParticleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Particle({}, gen: {})", self.index, self.generation)
    }
}
