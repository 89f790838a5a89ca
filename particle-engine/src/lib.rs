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
//! # Particle Engine
//!
//! A mass-aggregate particle physics engine: point masses moved by force
//! generators and held together by cables, rods and contacts.
//!
//! ## Features
//!
//! - **Particles**: point masses with damping and inverse mass, stored in a
//!   generational arena and addressed by handle
//! - **Force Generators**: gravity, drag, springs, bungees, buoyancy,
//!   pairwise gravitation and a closed-form stiff spring
//! - **Contacts**: iterative worst-first resolution of velocity and
//!   interpenetration
//! - **Links**: cables and rods between particles or to fixed anchors, plus a
//!   ground plane
//! - **World**: a per-frame pipeline tying the above together
//!
//! Durations are in seconds throughout.
//!
//! ## Example
//!
//! ```rust
//! use particle_engine::forces::Gravity;
//! use particle_engine::{Particle, ParticleWorld, Vector3};
//! use std::sync::Arc;
//!
//! let mut world = ParticleWorld::default();
//! let ball = world.add_particle(
//!     Particle::new().with_position(Vector3::new(0.0, 10.0, 0.0)),
//! );
//! world.add_force(ball, Arc::new(Gravity::default()));
//!
//! for _ in 0..10 {
//!     world.run_physics(0.01).unwrap();
//! }
//!
//! assert!(world.particle(ball).unwrap().position().y < 10.0);
//! ```

#![warn(missing_docs)]

/// World configuration
pub mod config;

/// Contacts, links and the contact resolver
pub mod contacts;

/// Error types
pub mod error;

/// Force generators and the force registry
pub mod forces;

/// Particles and the particle arena
pub mod particle;

/// Three-component vectors
pub mod vector;

/// The frame pipeline
pub mod world;

pub use config::{IterationPolicy, WorldConfig};
pub use error::{PhysicsError, Result};
pub use particle::{Particle, ParticleHandle, ParticleSet};
pub use vector::Vector3;
pub use world::{FramePhase, FrameStats, GeneratorId, ParticleWorld};
