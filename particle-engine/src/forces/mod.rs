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
//! Force generators and the force registry
//!
//! A force generator is a rule that adds a force to one particle's
//! accumulator each frame. Generators carry their own state (an anchor, the
//! particle at the other end of a spring) and never store anything about
//! the particle they are applied to, so one instance can be registered
//! against many particles and one particle can have many generators.
//!
//! | Generator | Force |
//! |---|---|
//! | [`Gravity`] | `g * m`, nothing on immovable particles |
//! | [`Drag`] | `-v̂ * (k1*|v| + k2*|v|²)` |
//! | [`Spring`], [`AnchoredSpring`] | Hooke's law toward another particle or a fixed point |
//! | [`Bungee`], [`AnchoredBungee`] | Hooke's law, but only while stretched |
//! | [`Buoyancy`] | piecewise linear lift from submersion depth |
//! | [`Gravitational`] | `G * m1 * m2 / r²` toward another particle |
//! | [`FakeSpring`] | closed-form damped oscillator toward an anchor |
//!
//! Contributions are summed, so the order in which generators run within a
//! frame does not change the result beyond floating-point rounding.

mod buoyancy;
mod drag;
mod gravity;
mod registry;
mod spring;

pub use buoyancy::{Buoyancy, WATER_DENSITY};
pub use drag::Drag;
pub use gravity::{Gravitational, Gravity, GRAVITATIONAL_CONSTANT};
pub use registry::{ForceRegistration, ForceRegistry};
pub use spring::{AnchoredBungee, AnchoredSpring, Bungee, FakeSpring, Spring};

use crate::error::{PhysicsError, Result};
use crate::particle::{ParticleHandle, ParticleSet};
use crate::vector::Vector3;
use std::sync::Arc;

/// A force generator shared between registrations
pub type SharedForceGenerator = Arc<dyn ForceGenerator>;

/// Something that can add a force to a particle
///
/// Implementors provide [`ForceGenerator::compute_force`]; the provided
/// [`ForceGenerator::update_force`] adds the result to the particle's
/// accumulator.
pub trait ForceGenerator: Send + Sync {
    /// Compute the force this generator applies to `particle` for a frame
    /// lasting `duration` seconds
    ///
    /// Returns `Ok(None)` when the generator has nothing to contribute (an
    /// immovable particle, a slack bungee, a particle above the water).
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::StaleHandle`] when `particle`, or a particle
    /// the generator refers to, has been removed.
    fn compute_force(
        &self,
        particle: ParticleHandle,
        particles: &ParticleSet,
        duration: f64,
    ) -> Result<Option<Vector3>>;

    /// Get a descriptive name for this generator
    fn name(&self) -> &str;

    /// Whether the generator holds a handle to `particle`
    ///
    /// Generators tied to another particle (springs, bungees, gravitation)
    /// override this so their registrations can be dropped when that
    /// particle is removed.
    fn references(&self, _particle: ParticleHandle) -> bool {
        false
    }

    /// Compute the force and add it to the particle's accumulator
    ///
    /// Non-finite forces are dropped with a warning rather than poisoning
    /// the accumulator. Returns whether a force was added.
    ///
    /// # Errors
    ///
    /// Same as [`ForceGenerator::compute_force`].
    fn update_force(
        &self,
        particle: ParticleHandle,
        particles: &mut ParticleSet,
        duration: f64,
    ) -> Result<bool> {
        let force = match self.compute_force(particle, particles, duration)? {
            Some(force) => force,
            None => return Ok(false),
        };

        if !force.is_valid() {
            log::warn!(
                "force generator '{}' produced a non-finite force for {}, dropping it",
                self.name(),
                particle
            );
            return Ok(false);
        }

        particles.try_get_mut(particle)?.add_force(force);
        Ok(true)
    }
}

/// Reject spring and buoyancy parameters that are negative or not finite
pub(crate) fn non_negative(name: &str, value: f64) -> Result<f64> {
    if value >= 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(PhysicsError::invalid(format!(
            "{} must be non-negative and finite, got {}",
            name, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::Particle;

    struct ConstantForce(Vector3);

    impl ForceGenerator for ConstantForce {
        fn compute_force(
            &self,
            _particle: ParticleHandle,
            _particles: &ParticleSet,
            _duration: f64,
        ) -> Result<Option<Vector3>> {
            Ok(Some(self.0))
        }

        fn name(&self) -> &str {
            "ConstantForce"
        }
    }

    #[test]
    fn test_update_force_accumulates() {
        let mut particles = ParticleSet::new();
        let h = particles.insert(Particle::new());
        let generator = ConstantForce(Vector3::new(1.0, 2.0, 3.0));

        assert!(generator.update_force(h, &mut particles, 0.1).unwrap());
        assert!(generator.update_force(h, &mut particles, 0.1).unwrap());
        assert_eq!(
            particles.get(h).unwrap().force_accumulator(),
            Vector3::new(2.0, 4.0, 6.0)
        );
    }

    #[test]
    fn test_update_force_drops_non_finite() {
        let mut particles = ParticleSet::new();
        let h = particles.insert(Particle::new());
        let generator = ConstantForce(Vector3::new(f64::NAN, 0.0, 0.0));

        assert!(!generator.update_force(h, &mut particles, 0.1).unwrap());
        assert_eq!(particles.get(h).unwrap().force_accumulator(), Vector3::ZERO);
    }

    #[test]
    fn test_update_force_stale_particle() {
        let mut particles = ParticleSet::new();
        let h = particles.insert(Particle::new());
        particles.remove(h);
        let generator = ConstantForce(Vector3::X);

        assert_eq!(
            generator.update_force(h, &mut particles, 0.1),
            Err(PhysicsError::StaleHandle(h))
        );
    }

    #[test]
    fn test_non_negative() {
        assert_eq!(non_negative("k", 2.0).unwrap(), 2.0);
        assert!(non_negative("k", -1.0).is_err());
        assert!(non_negative("k", f64::INFINITY).is_err());
    }
}
