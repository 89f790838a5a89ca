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
//! The particle: a simulated point mass
//!
//! # Integration
//!
//! [`Particle::integrate`] advances one particle by `dt` seconds:
//!
//! ```text
//! p' = p + v*dt
//! a' = a + F*(1/m)
//! v' = (v + a'*dt) * damping^dt
//! F  = 0
//! ```
//!
//! The `a*dt²/2` term of the position update is dropped. At interactive
//! frame rates it is negligible, so this is an accepted approximation and
//! not an error in the integrator. Damping is applied as an exponential
//! decay keyed to elapsed time, which keeps drag independent of the frame
//! rate.

use crate::error::{PhysicsError, Result};
use crate::vector::Vector3;

/// Damping given to particles built with [`Particle::new`]
pub const DEFAULT_DAMPING: f64 = 0.99;

/// A point mass
///
/// Mass is stored as its inverse. An inverse mass of zero is an infinite,
/// immovable mass; there is no way to express a zero mass, which would be
/// numerically unstable anyway.
///
/// # Examples
///
/// ```
/// use particle_engine::{Particle, Vector3};
///
/// let mut particle = Particle::new()
///     .with_velocity(Vector3::new(1.0, 0.0, 0.0))
///     .with_mass(2.0)
///     .unwrap();
/// particle.add_force(Vector3::new(0.0, 4.0, 0.0));
/// particle.integrate(0.5);
///
/// assert_eq!(particle.force_accumulator(), Vector3::ZERO);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    position: Vector3,
    velocity: Vector3,
    acceleration: Vector3,
    damping: f64,
    inverse_mass: f64,
    force_accum: Vector3,
}

impl Particle {
    /// Create a particle at rest at the origin with unit mass and
    /// [`DEFAULT_DAMPING`]
    pub fn new() -> Self {
        Particle {
            position: Vector3::ZERO,
            velocity: Vector3::ZERO,
            acceleration: Vector3::ZERO,
            damping: DEFAULT_DAMPING,
            inverse_mass: 1.0,
            force_accum: Vector3::ZERO,
        }
    }

    /// Set the starting position
    pub fn with_position(mut self, position: Vector3) -> Self {
        self.position = position;
        self
    }

    /// Set the starting velocity
    pub fn with_velocity(mut self, velocity: Vector3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set the constant acceleration (e.g. gravity applied without a generator)
    pub fn with_acceleration(mut self, acceleration: Vector3) -> Self {
        self.acceleration = acceleration;
        self
    }

    /// Set the damping factor
    ///
    /// # Errors
    ///
    /// See [`Particle::set_damping`].
    pub fn with_damping(mut self, damping: f64) -> Result<Self> {
        self.set_damping(damping)?;
        Ok(self)
    }

    /// Set the mass
    ///
    /// # Errors
    ///
    /// See [`Particle::set_mass`].
    pub fn with_mass(mut self, mass: f64) -> Result<Self> {
        self.set_mass(mass)?;
        Ok(self)
    }

    /// Set the inverse mass directly
    ///
    /// # Errors
    ///
    /// See [`Particle::set_inverse_mass`].
    pub fn with_inverse_mass(mut self, inverse_mass: f64) -> Result<Self> {
        self.set_inverse_mass(inverse_mass)?;
        Ok(self)
    }

    /// Make the particle immovable
    pub fn with_infinite_mass(mut self) -> Self {
        self.inverse_mass = 0.0;
        self
    }

    /// Current position
    pub fn position(&self) -> Vector3 {
        self.position
    }

    /// Move the particle
    pub fn set_position(&mut self, position: Vector3) {
        self.position = position;
    }

    /// Current velocity
    pub fn velocity(&self) -> Vector3 {
        self.velocity
    }

    /// Overwrite the velocity
    pub fn set_velocity(&mut self, velocity: Vector3) {
        self.velocity = velocity;
    }

    /// Constant acceleration applied every step on top of accumulated forces
    pub fn acceleration(&self) -> Vector3 {
        self.acceleration
    }

    /// Overwrite the constant acceleration
    pub fn set_acceleration(&mut self, acceleration: Vector3) {
        self.acceleration = acceleration;
    }

    /// Fraction of velocity retained per second
    pub fn damping(&self) -> f64 {
        self.damping
    }

    /// Set the fraction of velocity retained per second
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidArgument`] unless `0 < damping <= 1`.
    pub fn set_damping(&mut self, damping: f64) -> Result<()> {
        if !(damping > 0.0 && damping <= 1.0) {
            return Err(PhysicsError::invalid(format!(
                "damping must be within (0, 1], got {}",
                damping
            )));
        }
        self.damping = damping;
        Ok(())
    }

    /// Inverse of the mass; zero for immovable particles
    pub fn inverse_mass(&self) -> f64 {
        self.inverse_mass
    }

    /// Set the inverse mass directly; zero makes the particle immovable
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidArgument`] if `inverse_mass` is negative
    /// or not finite.
    pub fn set_inverse_mass(&mut self, inverse_mass: f64) -> Result<()> {
        if !(inverse_mass >= 0.0 && inverse_mass.is_finite()) {
            return Err(PhysicsError::invalid(format!(
                "inverse mass must be non-negative and finite, got {}",
                inverse_mass
            )));
        }
        self.inverse_mass = inverse_mass;
        Ok(())
    }

    /// Mass of the particle
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::DivisionByZero`] for an infinite-mass particle.
    /// Check [`Particle::has_infinite_mass`] first.
    pub fn mass(&self) -> Result<f64> {
        if self.has_infinite_mass() {
            return Err(PhysicsError::DivisionByZero {
                operation: "mass of an infinite-mass particle",
            });
        }
        Ok(1.0 / self.inverse_mass)
    }

    /// Set the mass
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidArgument`] unless `mass` is positive and
    /// finite. Use [`Particle::with_infinite_mass`] for immovable particles.
    pub fn set_mass(&mut self, mass: f64) -> Result<()> {
        if !(mass > 0.0 && mass.is_finite()) {
            return Err(PhysicsError::invalid(format!(
                "mass must be positive and finite, got {}",
                mass
            )));
        }
        self.inverse_mass = 1.0 / mass;
        Ok(())
    }

    /// Whether the particle is immovable
    pub fn has_infinite_mass(&self) -> bool {
        self.inverse_mass <= 0.0
    }

    /// Add a force to be applied at the next integration only
    pub fn add_force(&mut self, force: Vector3) {
        self.force_accum += force;
    }

    /// Force accumulated since the last integration
    pub fn force_accumulator(&self) -> Vector3 {
        self.force_accum
    }

    /// Reset the accumulated force to zero
    pub fn clear_accumulator(&mut self) {
        self.force_accum.clear();
    }

    /// Kinetic energy, `0.5 * m * v²`; zero for immovable particles
    pub fn kinetic_energy(&self) -> f64 {
        if self.has_infinite_mass() {
            return 0.0;
        }
        0.5 * self.velocity.square_magnitude() / self.inverse_mass
    }

    /// Check if position and velocity are finite
    pub fn is_valid(&self) -> bool {
        self.position.is_valid() && self.velocity.is_valid()
    }

    /// Advance the particle by `dt` seconds and clear the accumulator
    pub fn integrate(&mut self, dt: f64) {
        self.position.add_scaled_vector(&self.velocity, dt);

        let mut resulting_acceleration = self.acceleration;
        resulting_acceleration.add_scaled_vector(&self.force_accum, self.inverse_mass);

        self.velocity.add_scaled_vector(&resulting_acceleration, dt);
        self.velocity *= self.damping.powf(dt);

        self.clear_accumulator();
    }
}

impl Default for Particle {
    fn default() -> Self {
        Particle::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_particle_defaults() {
        let particle = Particle::new();
        assert_eq!(particle.position(), Vector3::ZERO);
        assert_eq!(particle.velocity(), Vector3::ZERO);
        assert_eq!(particle.damping(), DEFAULT_DAMPING);
        assert_eq!(particle.mass().unwrap(), 1.0);
        assert!(!particle.has_infinite_mass());
    }

    #[test]
    fn test_simple_integrate() {
        let dt = 0.01;
        let mut particle = Particle::new()
            .with_position(Vector3::new(1.0, 2.0, 3.0))
            .with_velocity(Vector3::new(10.0, 0.0, -5.0))
            .with_acceleration(Vector3::new(0.0, -9.81, 0.0))
            .with_damping(1.0)
            .unwrap();

        particle.integrate(dt);

        assert_relative_eq!(particle.position(), Vector3::new(1.1, 2.0, 2.95), epsilon = 1e-12);
        assert_relative_eq!(
            particle.velocity(),
            Vector3::new(10.0, -0.0981, -5.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_integrate_applies_accumulated_force() {
        let mut particle = Particle::new().with_mass(2.0).unwrap().with_damping(1.0).unwrap();
        particle.add_force(Vector3::new(4.0, 0.0, 0.0));
        particle.integrate(0.5);

        // a = F/m = 2, v = a*dt = 1
        assert_relative_eq!(particle.velocity(), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(particle.force_accumulator(), Vector3::ZERO);
    }

    #[test]
    fn test_damping_is_time_based() {
        let start = Vector3::new(10.0, 0.0, 0.0);
        let mut one_step = Particle::new().with_velocity(start).with_damping(0.5).unwrap();
        let mut two_steps = one_step;

        one_step.integrate(1.0);
        two_steps.integrate(0.5);
        two_steps.integrate(0.5);

        assert_relative_eq!(one_step.velocity(), Vector3::new(5.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(one_step.velocity(), two_steps.velocity(), epsilon = 1e-12);
    }

    #[test]
    fn test_infinite_mass() {
        let particle = Particle::new().with_infinite_mass();
        assert!(particle.has_infinite_mass());
        assert_eq!(particle.inverse_mass(), 0.0);
        assert!(matches!(
            particle.mass(),
            Err(PhysicsError::DivisionByZero { .. })
        ));
        assert_eq!(particle.kinetic_energy(), 0.0);
    }

    #[test]
    fn test_infinite_mass_ignores_forces() {
        let mut particle = Particle::new().with_infinite_mass();
        particle.add_force(Vector3::new(1000.0, 0.0, 0.0));
        particle.integrate(1.0);
        assert_eq!(particle.velocity(), Vector3::ZERO);
        assert_eq!(particle.position(), Vector3::ZERO);
    }

    #[test]
    fn test_invalid_parameters() {
        let mut particle = Particle::new();
        assert!(particle.set_mass(0.0).is_err());
        assert!(particle.set_mass(-1.0).is_err());
        assert!(particle.set_mass(f64::NAN).is_err());
        assert!(particle.set_inverse_mass(-0.5).is_err());
        assert!(particle.set_damping(0.0).is_err());
        assert!(particle.set_damping(1.5).is_err());
        assert_eq!(particle, Particle::new());
    }

    #[test]
    fn test_clear_accumulator() {
        let mut particle = Particle::new();
        particle.add_force(Vector3::new(1.0, 2.0, 3.0));
        particle.add_force(Vector3::new(-4.0, 0.5, 0.0));
        assert_eq!(particle.force_accumulator(), Vector3::new(-3.0, 2.5, 3.0));

        particle.clear_accumulator();
        assert_eq!(particle.force_accumulator(), Vector3::ZERO);
    }

    #[test]
    fn test_kinetic_energy() {
        let particle = Particle::new()
            .with_mass(4.0)
            .unwrap()
            .with_velocity(Vector3::new(3.0, 4.0, 0.0));
        assert_relative_eq!(particle.kinetic_energy(), 50.0);
    }
}
