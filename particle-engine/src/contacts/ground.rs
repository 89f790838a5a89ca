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
//! Ground plane contacts

use super::contact::ParticleContact;
use super::ContactGenerator;
use crate::error::{PhysicsError, Result};
use crate::particle::ParticleSet;
use crate::vector::Vector3;

/// Keeps every movable particle above a horizontal plane
///
/// Emits one single-particle contact per particle below `height`, with a
/// `+Y` normal and the depth below the plane as penetration, up to `limit`
/// contacts per frame. Particles are visited in handle order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundContacts {
    height: f64,
    restitution: f64,
}

impl GroundContacts {
    /// Ground plane at `height` with the given bounce
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidArgument`] if `height` is not finite or
    /// `restitution` is outside `[0, 1]`.
    pub fn new(height: f64, restitution: f64) -> Result<Self> {
        if !height.is_finite() {
            return Err(PhysicsError::invalid(format!(
                "ground height must be finite, got {}",
                height
            )));
        }
        if !(0.0..=1.0).contains(&restitution) {
            return Err(PhysicsError::invalid(format!(
                "restitution must be within [0, 1], got {}",
                restitution
            )));
        }
        Ok(GroundContacts { height, restitution })
    }

    /// Height of the plane
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Bounce off the plane
    pub fn restitution(&self) -> f64 {
        self.restitution
    }
}

impl ContactGenerator for GroundContacts {
    fn fill_contact(
        &self,
        particles: &ParticleSet,
        contacts: &mut Vec<ParticleContact>,
        limit: usize,
    ) -> Result<usize> {
        let mut used = 0;
        for (handle, particle) in particles.iter() {
            if used >= limit {
                break;
            }
            if particle.has_infinite_mass() {
                continue;
            }

            let depth = self.height - particle.position().y;
            if depth > 0.0 {
                contacts.push(ParticleContact::new(
                    &[handle],
                    self.restitution,
                    Vector3::UP,
                    depth,
                )?);
                used += 1;
            }
        }
        Ok(used)
    }

    fn name(&self) -> &str {
        "GroundContacts"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::Particle;
    use approx::assert_relative_eq;

    fn at_height(particles: &mut ParticleSet, y: f64) {
        particles.insert(Particle::new().with_position(Vector3::new(0.0, y, 0.0)));
    }

    #[test]
    fn test_only_particles_below_plane() {
        let mut particles = ParticleSet::new();
        at_height(&mut particles, 1.0);
        at_height(&mut particles, -0.5);
        at_height(&mut particles, 0.0);

        let ground = GroundContacts::new(0.0, 0.2).unwrap();
        let mut contacts = Vec::new();
        assert_eq!(ground.fill_contact(&particles, &mut contacts, 10).unwrap(), 1);

        let contact = contacts[0];
        assert_eq!(contact.particle_b(), None);
        assert_eq!(contact.contact_normal(), Vector3::UP);
        assert_relative_eq!(contact.penetration(), 0.5);
        assert_eq!(contact.restitution(), 0.2);
    }

    #[test]
    fn test_respects_limit() {
        let mut particles = ParticleSet::new();
        for _ in 0..4 {
            at_height(&mut particles, -1.0);
        }

        let ground = GroundContacts::new(0.0, 0.0).unwrap();
        let mut contacts = Vec::new();
        assert_eq!(ground.fill_contact(&particles, &mut contacts, 3).unwrap(), 3);
        assert_eq!(contacts.len(), 3);
    }

    #[test]
    fn test_skips_immovable_particles() {
        let mut particles = ParticleSet::new();
        particles.insert(
            Particle::new()
                .with_infinite_mass()
                .with_position(Vector3::new(0.0, -1.0, 0.0)),
        );

        let ground = GroundContacts::new(0.0, 0.0).unwrap();
        let mut contacts = Vec::new();
        assert_eq!(ground.fill_contact(&particles, &mut contacts, 3).unwrap(), 0);
    }

    #[test]
    fn test_validation() {
        assert!(GroundContacts::new(f64::INFINITY, 0.5).is_err());
        assert!(GroundContacts::new(0.0, 2.0).is_err());
    }
}
