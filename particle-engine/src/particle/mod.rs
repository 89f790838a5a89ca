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
//! Point masses and their storage
//!
//! - [`Particle`]: position, velocity, damping, inverse mass and a force
//!   accumulator, with its own integrator
//! - [`ParticleSet`]: generational arena owning every particle of a world
//! - [`ParticleHandle`]: stable reference into a set

mod handle;
#[allow(clippy::module_inception)]
mod particle;
mod set;

pub use handle::ParticleHandle;
pub use particle::{Particle, DEFAULT_DAMPING};
pub use set::ParticleSet;
