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
//! Uniform gravity and pairwise gravitation
//!
//! [`Gravity`] applies a constant gravitational field: every movable
//! particle feels `g * m`.
//!
//! [`Gravitational`] implements Newton's law of universal gravitation
//! between two particles:
//!
//! **F = G * (m₁ * m₂) / r²**
//!
//! One generator pulls one particle toward another. A symmetric pair needs
//! two registrations, one in each direction:
//!
//! ```
//! use particle_engine::forces::{ForceRegistry, Gravitational};
//! use particle_engine::{Particle, ParticleSet, Vector3};
//! use std::sync::Arc;
//!
//! let mut particles = ParticleSet::new();
//! let a = particles.insert(Particle::new());
//! let b = particles.insert(Particle::new().with_position(Vector3::new(2.0, 0.0, 0.0)));
//!
//! let mut registry = ForceRegistry::new();
//! registry.add(a, Arc::new(Gravitational::new(b, 1.0).unwrap()));
//! registry.add(b, Arc::new(Gravitational::new(a, 1.0).unwrap()));
//! registry.update_forces(&mut particles, 0.01);
//!
//! assert_eq!(particles.get(a).unwrap().force_accumulator(), Vector3::new(0.25, 0.0, 0.0));
//! ```
//!
//! # Softening
//!
//! As particles approach each other the force grows without bound. An
//! optional softening length ε replaces `r²` with `r² + ε²`, the usual
//! N-body remedy (Aarseth, S. J. (2003). "Gravitational N-Body Simulations").
//! The default is no softening. Coincident particles without softening
//! exert no force on each other.

use super::{non_negative, ForceGenerator};
use crate::error::Result;
use crate::particle::{ParticleHandle, ParticleSet};
use crate::vector::Vector3;

/// Standard gravitational constant in SI units (m³/(kg⋅s²))
///
/// CODATA 2018 recommended value: 6.67430(15) × 10⁻¹¹ m³/(kg⋅s²)
/// Source: https://physics.nist.gov/cgi-bin/cuu/Value?bg
pub const GRAVITATIONAL_CONSTANT: f64 = 6.67430e-11;

/// Constant gravitational field
///
/// A single instance can be registered for any number of particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gravity {
    gravity: Vector3,
}

impl Gravity {
    /// Create a field with the given acceleration due to gravity
    pub fn new(gravity: Vector3) -> Self {
        Gravity { gravity }
    }

    /// Acceleration due to gravity
    pub fn gravity(&self) -> Vector3 {
        self.gravity
    }
}

impl Default for Gravity {
    fn default() -> Self {
        Gravity::new(Vector3::GRAVITY)
    }
}

impl ForceGenerator for Gravity {
    fn compute_force(
        &self,
        particle: ParticleHandle,
        particles: &ParticleSet,
        _duration: f64,
    ) -> Result<Option<Vector3>> {
        let particle = particles.try_get(particle)?;
        if particle.has_infinite_mass() {
            return Ok(None);
        }
        Ok(Some(self.gravity * particle.mass()?))
    }

    fn name(&self) -> &str {
        "gravity"
    }
}

/// Newtonian attraction toward another particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gravitational {
    other: ParticleHandle,
    g_constant: f64,
    softening: f64,
}

impl Gravitational {
    /// Attract toward `other` with gravitational constant `g_constant`
    ///
    /// Use [`GRAVITATIONAL_CONSTANT`] for SI-unit simulations; demos usually
    /// want something far larger.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `g_constant` is negative or not finite.
    pub fn new(other: ParticleHandle, g_constant: f64) -> Result<Self> {
        Ok(Gravitational {
            other,
            g_constant: non_negative("gravitational constant", g_constant)?,
            softening: 0.0,
        })
    }

    /// Set the softening length
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `softening` is negative or not finite.
    pub fn with_softening(mut self, softening: f64) -> Result<Self> {
        self.softening = non_negative("softening", softening)?;
        Ok(self)
    }

    /// The attracting particle
    pub fn other(&self) -> ParticleHandle {
        self.other
    }

    /// Gravitational constant
    pub fn g_constant(&self) -> f64 {
        self.g_constant
    }

    /// Softening length
    pub fn softening(&self) -> f64 {
        self.softening
    }
}

impl ForceGenerator for Gravitational {
    fn compute_force(
        &self,
        particle: ParticleHandle,
        particles: &ParticleSet,
        _duration: f64,
    ) -> Result<Option<Vector3>> {
        let this = particles.try_get(particle)?;
        let other = particles.try_get(self.other)?;

        // Immovable bodies neither feel nor (lacking a mass) exert this force
        if this.has_infinite_mass() || other.has_infinite_mass() {
            return Ok(None);
        }

        let separation = other.position() - this.position();
        let r_squared = separation.square_magnitude() + self.softening * self.softening;
        if r_squared == 0.0 {
            return Ok(None);
        }

        let magnitude = self.g_constant * this.mass()? * other.mass()? / r_squared;
        Ok(Some(separation.normalize() * magnitude))
    }

    fn name(&self) -> &str {
        "gravitational"
    }

    fn references(&self, particle: ParticleHandle) -> bool {
        self.other == particle
    }
}
