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
//! Cables and rods
//!
//! Links are constraints on the distance between two particles, or between
//! a particle and a fixed anchor. Each one emits at most one contact per
//! frame, and only when its length rule is broken:
//!
//! - A **cable** is slack up to `max_length` and emits a contact pulling the
//!   ends together once stretched to or beyond it
//! - A **rod** holds its ends at exactly `length`, pulling them together when
//!   stretched and pushing them apart when compressed, with zero restitution

use super::contact::ParticleContact;
use super::ContactGenerator;
use crate::error::{PhysicsError, Result};
use crate::forces::non_negative;
use crate::particle::{ParticleHandle, ParticleSet};
use crate::vector::Vector3;

/// The two particles joined by a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParticleLink {
    particles: [ParticleHandle; 2],
}

impl ParticleLink {
    /// Join exactly two distinct particles
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidArgument`] for any other number of
    /// handles, or for the same handle twice.
    pub fn new(particles: &[ParticleHandle]) -> Result<Self> {
        match *particles {
            [a, b] if a != b => Ok(ParticleLink { particles: [a, b] }),
            [_, _] => Err(PhysicsError::invalid(
                "a link cannot join a particle to itself",
            )),
            _ => Err(PhysicsError::invalid(format!(
                "a link joins exactly two particles, got {}",
                particles.len()
            ))),
        }
    }

    /// The joined particles, in construction order
    pub fn particles(&self) -> [ParticleHandle; 2] {
        self.particles
    }

    /// Current distance between the two particles
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::StaleHandle`] if either particle was removed.
    pub fn current_length(&self, particles: &ParticleSet) -> Result<f64> {
        let (a, b) = self.positions(particles)?;
        Ok(a.distance(&b))
    }

    fn positions(&self, particles: &ParticleSet) -> Result<(Vector3, Vector3)> {
        Ok((
            particles.try_get(self.particles[0])?.position(),
            particles.try_get(self.particles[1])?.position(),
        ))
    }

    fn references(&self, particle: ParticleHandle) -> bool {
        self.particles.contains(&particle)
    }
}

fn check_restitution(value: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(PhysicsError::invalid(format!(
            "restitution must be within [0, 1], got {}",
            value
        )))
    }
}

/// Contact for a cable from `from` to `to`, if it is taut
fn cable_contact(
    handles: &[ParticleHandle],
    from: Vector3,
    to: Vector3,
    max_length: f64,
    restitution: f64,
) -> Result<Option<ParticleContact>> {
    let offset = to - from;
    let length = offset.magnitude();
    if length < max_length {
        return Ok(None);
    }
    ParticleContact::new(handles, restitution, offset.normalize(), length - max_length).map(Some)
}

/// Contact for a rod from `from` to `to`, unless it is exactly at length
fn rod_contact(
    handles: &[ParticleHandle],
    from: Vector3,
    to: Vector3,
    rod_length: f64,
) -> Result<Option<ParticleContact>> {
    let offset = to - from;
    let length = offset.magnitude();
    // Coincident ends leave no direction to push along
    if length == rod_length || length == 0.0 {
        return Ok(None);
    }

    let normal = offset.normalize();
    let contact = if length > rod_length {
        ParticleContact::new(handles, 0.0, normal, length - rod_length)?
    } else {
        ParticleContact::new(handles, 0.0, -normal, rod_length - length)?
    };
    Ok(Some(contact))
}

fn push(
    contact: Option<ParticleContact>,
    contacts: &mut Vec<ParticleContact>,
    limit: usize,
) -> usize {
    match contact {
        Some(contact) if limit > 0 => {
            contacts.push(contact);
            1
        }
        _ => 0,
    }
}

/// A cable between two particles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cable {
    link: ParticleLink,
    max_length: f64,
    restitution: f64,
}

impl Cable {
    /// Create a cable of `max_length` between two particles
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidArgument`] if `particles` is not a pair
    /// of distinct handles, `max_length` is negative, or `restitution` is
    /// outside `[0, 1]`.
    pub fn new(particles: &[ParticleHandle], max_length: f64, restitution: f64) -> Result<Self> {
        Ok(Cable {
            link: ParticleLink::new(particles)?,
            max_length: non_negative("cable length", max_length)?,
            restitution: check_restitution(restitution)?,
        })
    }

    /// The joined particles
    pub fn link(&self) -> &ParticleLink {
        &self.link
    }

    /// Length at which the cable goes taut
    pub fn max_length(&self) -> f64 {
        self.max_length
    }

    /// Bounciness when the cable snaps taut
    pub fn restitution(&self) -> f64 {
        self.restitution
    }
}

impl ContactGenerator for Cable {
    fn fill_contact(
        &self,
        particles: &ParticleSet,
        contacts: &mut Vec<ParticleContact>,
        limit: usize,
    ) -> Result<usize> {
        let (a, b) = self.link.positions(particles)?;
        let contact = cable_contact(&self.link.particles, a, b, self.max_length, self.restitution)?;
        Ok(push(contact, contacts, limit))
    }

    fn name(&self) -> &str {
        "Cable"
    }

    fn references(&self, particle: ParticleHandle) -> bool {
        self.link.references(particle)
    }
}

/// A rigid rod between two particles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rod {
    link: ParticleLink,
    length: f64,
}

impl Rod {
    /// Create a rod holding two particles `length` apart
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidArgument`] if `particles` is not a pair
    /// of distinct handles or `length` is negative.
    pub fn new(particles: &[ParticleHandle], length: f64) -> Result<Self> {
        Ok(Rod {
            link: ParticleLink::new(particles)?,
            length: non_negative("rod length", length)?,
        })
    }

    /// The joined particles
    pub fn link(&self) -> &ParticleLink {
        &self.link
    }

    /// Separation the rod holds
    pub fn length(&self) -> f64 {
        self.length
    }
}

impl ContactGenerator for Rod {
    fn fill_contact(
        &self,
        particles: &ParticleSet,
        contacts: &mut Vec<ParticleContact>,
        limit: usize,
    ) -> Result<usize> {
        let (a, b) = self.link.positions(particles)?;
        let contact = rod_contact(&self.link.particles, a, b, self.length)?;
        Ok(push(contact, contacts, limit))
    }

    fn name(&self) -> &str {
        "Rod"
    }

    fn references(&self, particle: ParticleHandle) -> bool {
        self.link.references(particle)
    }
}

/// A cable from a particle to a fixed point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchoredCable {
    particle: ParticleHandle,
    anchor: Vector3,
    max_length: f64,
    restitution: f64,
}

impl AnchoredCable {
    /// Tie `particle` to `anchor` with a cable of `max_length`
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidArgument`] if `max_length` is negative
    /// or `restitution` is outside `[0, 1]`.
    pub fn new(
        particle: ParticleHandle,
        anchor: Vector3,
        max_length: f64,
        restitution: f64,
    ) -> Result<Self> {
        Ok(AnchoredCable {
            particle,
            anchor,
            max_length: non_negative("cable length", max_length)?,
            restitution: check_restitution(restitution)?,
        })
    }

    /// Fixed end of the cable
    pub fn anchor(&self) -> Vector3 {
        self.anchor
    }

    /// Move the fixed end
    pub fn set_anchor(&mut self, anchor: Vector3) {
        self.anchor = anchor;
    }

    /// Length at which the cable goes taut
    pub fn max_length(&self) -> f64 {
        self.max_length
    }
}

impl ContactGenerator for AnchoredCable {
    fn fill_contact(
        &self,
        particles: &ParticleSet,
        contacts: &mut Vec<ParticleContact>,
        limit: usize,
    ) -> Result<usize> {
        let position = particles.try_get(self.particle)?.position();
        let contact = cable_contact(
            &[self.particle],
            position,
            self.anchor,
            self.max_length,
            self.restitution,
        )?;
        Ok(push(contact, contacts, limit))
    }

    fn name(&self) -> &str {
        "AnchoredCable"
    }

    fn references(&self, particle: ParticleHandle) -> bool {
        self.particle == particle
    }
}

/// A rod from a particle to a fixed point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchoredRod {
    particle: ParticleHandle,
    anchor: Vector3,
    length: f64,
}

impl AnchoredRod {
    /// Hold `particle` exactly `length` from `anchor`
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidArgument`] if `length` is negative.
    pub fn new(particle: ParticleHandle, anchor: Vector3, length: f64) -> Result<Self> {
        Ok(AnchoredRod {
            particle,
            anchor,
            length: non_negative("rod length", length)?,
        })
    }

    /// Fixed end of the rod
    pub fn anchor(&self) -> Vector3 {
        self.anchor
    }

    /// Move the fixed end
    pub fn set_anchor(&mut self, anchor: Vector3) {
        self.anchor = anchor;
    }

    /// Separation the rod holds
    pub fn length(&self) -> f64 {
        self.length
    }
}

impl ContactGenerator for AnchoredRod {
    fn fill_contact(
        &self,
        particles: &ParticleSet,
        contacts: &mut Vec<ParticleContact>,
        limit: usize,
    ) -> Result<usize> {
        let position = particles.try_get(self.particle)?.position();
        let contact = rod_contact(&[self.particle], position, self.anchor, self.length)?;
        Ok(push(contact, contacts, limit))
    }

    fn name(&self) -> &str {
        "AnchoredRod"
    }

    fn references(&self, particle: ParticleHandle) -> bool {
        self.particle == particle
    }
}
