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
//! Iterative contact resolution
//!
//! The resolver repeatedly picks the contact with the most negative
//! separating velocity (ties go to the earliest contact) and resolves it,
//! until the iteration budget runs out. A contact that is not closing is
//! never picked, even while it still penetrates; once no contact is closing
//! the batch counts as resolved and the resolver stops early.
//!
//! After each resolution the penetration of every other contact that shares
//! a moved particle is updated, so the next pick sees current depths.

use log::{debug, trace, warn};

use super::contact::ParticleContact;
use crate::error::Result;
use crate::particle::ParticleSet;

/// Resolves batches of particle contacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContactResolver {
    iterations: usize,
    iterations_used: usize,
}

impl ContactResolver {
    /// Create a resolver allowed `iterations` resolution steps per call
    pub fn new(iterations: usize) -> Self {
        ContactResolver {
            iterations,
            iterations_used: 0,
        }
    }

    /// Iteration budget
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Change the iteration budget
    pub fn set_iterations(&mut self, iterations: usize) {
        self.iterations = iterations;
    }

    /// Steps taken by the most recent call to
    /// [`resolve_contacts`](Self::resolve_contacts)
    pub fn iterations_used(&self) -> usize {
        self.iterations_used
    }

    /// Resolve a batch of contacts
    ///
    /// Returns the number of resolution steps taken, which never exceeds the
    /// iteration budget. Contacts that refer to removed particles are
    /// skipped.
    pub fn resolve_contacts(
        &mut self,
        contacts: &mut [ParticleContact],
        particles: &mut ParticleSet,
        duration: f64,
    ) -> usize {
        self.iterations_used = 0;

        while self.iterations_used < self.iterations {
            let index = match select_contact(contacts, particles) {
                Some(index) => index,
                None => {
                    debug!(
                        "contact batch resolved after {} of {} iterations",
                        self.iterations_used,
                        self.iterations
                    );
                    break;
                }
            };

            let contact = &mut contacts[index];
            trace!(
                "resolving contact {} (penetration {}, restitution {})",
                index,
                contact.penetration(),
                contact.restitution()
            );
            let moved = [Some(contact.particle_a()), contact.particle_b()];
            let movement = match contact.resolve(particles, duration) {
                Ok(movement) => movement,
                Err(err) => {
                    // Selection already rejected stale contacts
                    warn!("contact {} could not be resolved: {}", index, err);
                    break;
                }
            };

            for (other_index, other) in contacts.iter_mut().enumerate() {
                if other_index != index {
                    other.apply_movement(moved, &movement);
                }
            }

            self.iterations_used += 1;
        }

        if self.iterations_used == self.iterations && self.iterations > 0 {
            debug!(
                "contact resolver used its full budget of {} iterations on {} contacts",
                self.iterations,
                contacts.len()
            );
        }

        self.iterations_used
    }
}

/// Pick the next contact to resolve, `None` when nothing needs work
fn select_contact(contacts: &[ParticleContact], particles: &ParticleSet) -> Option<usize> {
    let mut worst: Option<(usize, f64)> = None;

    for (index, contact) in contacts.iter().enumerate() {
        let (separating_velocity, total_inverse_mass) = match measure(contact, particles) {
            Ok(measured) => measured,
            Err(_) => continue,
        };
        if total_inverse_mass <= 0.0 {
            continue;
        }

        if separating_velocity < worst.map_or(0.0, |(_, velocity)| velocity) {
            worst = Some((index, separating_velocity));
        }
    }

    worst.map(|(index, _)| index)
}

fn measure(contact: &ParticleContact, particles: &ParticleSet) -> Result<(f64, f64)> {
    Ok((
        contact.separating_velocity(particles)?,
        contact.total_inverse_mass(particles)?,
    ))
}
