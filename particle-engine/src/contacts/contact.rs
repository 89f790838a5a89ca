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
//! Particle contacts
//!
//! A contact is a transient record of two particles (or one particle and
//! the immovable scenery) that are touching or violating a constraint. It is
//! built by a contact generator, resolved in the same frame, and thrown away.
//!
//! # Conventions
//!
//! The contact normal is a unit vector in the direction particle A has to
//! move to resolve the contact; particle B moves the opposite way. For two
//! colliding particles it points from B toward A.
//!
//! Resolution has two parts:
//!
//! - **Velocity**: an impulse along the normal so the separating velocity
//!   becomes `-restitution` times what it was
//! - **Interpenetration**: a displacement along the normal that removes the
//!   penetration, shared out in proportion to inverse mass
//!
//! Both are silent no-ops when every particle involved is immovable.

use crate::error::{PhysicsError, Result};
use crate::particle::{Particle, ParticleHandle, ParticleSet};
use crate::vector::Vector3;

/// Displacement applied to each particle of a contact by interpenetration
/// resolution; the second entry is zero for single-particle contacts
pub type ContactMovement = [Vector3; 2];

/// Two particles (or one particle and the scenery) in contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleContact {
    particle_a: ParticleHandle,
    particle_b: Option<ParticleHandle>,
    restitution: f64,
    contact_normal: Vector3,
    penetration: f64,
}

impl ParticleContact {
    /// Create a contact involving one or two particles
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidArgument`] when `particles` does not hold
    /// one or two distinct handles, when `restitution` is outside `[0, 1]`,
    /// when `penetration` is negative, or when any value is not finite.
    pub fn new(
        particles: &[ParticleHandle],
        restitution: f64,
        contact_normal: Vector3,
        penetration: f64,
    ) -> Result<Self> {
        let (particle_a, particle_b) = match *particles {
            [a] => (a, None),
            [a, b] if a != b => (a, Some(b)),
            [_, _] => {
                return Err(PhysicsError::invalid(
                    "a contact cannot involve the same particle twice",
                ))
            }
            _ => {
                return Err(PhysicsError::invalid(format!(
                    "a contact involves one or two particles, got {}",
                    particles.len()
                )))
            }
        };

        if !(0.0..=1.0).contains(&restitution) {
            return Err(PhysicsError::invalid(format!(
                "restitution must be within [0, 1], got {}",
                restitution
            )));
        }
        if !(penetration >= 0.0 && penetration.is_finite()) {
            return Err(PhysicsError::invalid(format!(
                "penetration must be non-negative and finite, got {}",
                penetration
            )));
        }
        if !contact_normal.is_valid() {
            return Err(PhysicsError::invalid("contact normal must be finite"));
        }

        Ok(ParticleContact {
            particle_a,
            particle_b,
            restitution,
            contact_normal,
            penetration,
        })
    }

    /// First particle
    pub fn particle_a(&self) -> ParticleHandle {
        self.particle_a
    }

    /// Second particle, `None` for contacts with the scenery
    pub fn particle_b(&self) -> Option<ParticleHandle> {
        self.particle_b
    }

    /// Whether `particle` takes part in this contact
    pub fn involves(&self, particle: ParticleHandle) -> bool {
        self.particle_a == particle || self.particle_b == Some(particle)
    }

    /// Coefficient of restitution
    pub fn restitution(&self) -> f64 {
        self.restitution
    }

    /// Direction particle A moves to resolve the contact
    pub fn contact_normal(&self) -> Vector3 {
        self.contact_normal
    }

    /// Depth of the interpenetration or constraint violation
    pub fn penetration(&self) -> f64 {
        self.penetration
    }

    /// Relative velocity along the normal, negative when closing
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::StaleHandle`] if a particle was removed.
    pub fn separating_velocity(&self, particles: &ParticleSet) -> Result<f64> {
        let mut relative_velocity = particles.try_get(self.particle_a)?.velocity();
        if let Some(b) = self.particle_b {
            relative_velocity -= particles.try_get(b)?.velocity();
        }
        Ok(relative_velocity.dot(&self.contact_normal))
    }

    /// Sum of the inverse masses of the particles involved
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::StaleHandle`] if a particle was removed.
    pub fn total_inverse_mass(&self, particles: &ParticleSet) -> Result<f64> {
        let mut total = particles.try_get(self.particle_a)?.inverse_mass();
        if let Some(b) = self.particle_b {
            total += particles.try_get(b)?.inverse_mass();
        }
        Ok(total)
    }

    /// Resolve velocity and then interpenetration
    ///
    /// Returns how far each particle was moved.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::StaleHandle`] if a particle was removed.
    pub fn resolve(&mut self, particles: &mut ParticleSet, duration: f64) -> Result<ContactMovement> {
        self.resolve_velocity(particles, duration)?;
        self.resolve_interpenetration(particles, duration)
    }

    /// Apply the impulse that gives the contact its post-collision
    /// separating velocity
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::StaleHandle`] if a particle was removed.
    pub fn resolve_velocity(&self, particles: &mut ParticleSet, _duration: f64) -> Result<()> {
        let separating_velocity = self.separating_velocity(particles)?;
        if separating_velocity > 0.0 {
            // Already separating or stationary
            return Ok(());
        }

        let total_inverse_mass = self.total_inverse_mass(particles)?;
        if total_inverse_mass <= 0.0 {
            return Ok(());
        }

        let new_separating_velocity = -separating_velocity * self.restitution;
        let delta_velocity = new_separating_velocity - separating_velocity;
        let impulse = delta_velocity / total_inverse_mass;
        let impulse_per_inverse_mass = self.contact_normal * impulse;

        let (a, b) = self.pair_mut(particles)?;
        let velocity = a.velocity() + impulse_per_inverse_mass * a.inverse_mass();
        a.set_velocity(velocity);
        if let Some(b) = b {
            let velocity = b.velocity() - impulse_per_inverse_mass * b.inverse_mass();
            b.set_velocity(velocity);
        }
        Ok(())
    }

    /// Move the particles apart (or together, for stretched links) to remove
    /// the penetration
    ///
    /// The contact's own penetration is set to zero. Returns how far each
    /// particle was moved.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::StaleHandle`] if a particle was removed.
    pub fn resolve_interpenetration(
        &mut self,
        particles: &mut ParticleSet,
        _duration: f64,
    ) -> Result<ContactMovement> {
        let mut movement = [Vector3::ZERO; 2];
        if self.penetration <= 0.0 {
            return Ok(movement);
        }

        let total_inverse_mass = self.total_inverse_mass(particles)?;
        if total_inverse_mass <= 0.0 {
            return Ok(movement);
        }

        let move_per_inverse_mass = self.contact_normal * (self.penetration / total_inverse_mass);

        let (a, b) = self.pair_mut(particles)?;
        movement[0] = move_per_inverse_mass * a.inverse_mass();
        a.set_position(a.position() + movement[0]);
        if let Some(b) = b {
            movement[1] = -move_per_inverse_mass * b.inverse_mass();
            b.set_position(b.position() + movement[1]);
        }

        self.penetration = 0.0;
        Ok(movement)
    }

    /// Update the penetration after particles were moved by resolving
    /// another contact
    pub(crate) fn apply_movement(
        &mut self,
        moved: [Option<ParticleHandle>; 2],
        movement: &ContactMovement,
    ) {
        for (handle, displacement) in moved.iter().zip(movement) {
            let handle = match handle {
                Some(handle) => *handle,
                None => continue,
            };
            if handle == self.particle_a {
                self.penetration -= displacement.dot(&self.contact_normal);
            } else if Some(handle) == self.particle_b {
                self.penetration += displacement.dot(&self.contact_normal);
            }
        }
    }

    fn pair_mut<'a>(
        &self,
        particles: &'a mut ParticleSet,
    ) -> Result<(&'a mut Particle, Option<&'a mut Particle>)> {
        let stale = self
            .particle_b
            .filter(|b| !particles.contains(*b))
            .unwrap_or(self.particle_a);
        particles
            .get_pair_mut(self.particle_a, self.particle_b)
            .ok_or(PhysicsError::StaleHandle(stale))
    }
}
