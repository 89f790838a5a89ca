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
//! Particle storage
//!
//! [`ParticleSet`] owns the particles of a simulation and hands out
//! [`ParticleHandle`]s. Slots are reused after removal, with the slot's
//! generation incremented so old handles stop resolving.

use super::{Particle, ParticleHandle};
use crate::error::{PhysicsError, Result};

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    particle: Option<Particle>,
}

/// Generational arena of particles
#[derive(Debug, Clone, Default)]
pub struct ParticleSet {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl ParticleSet {
    /// Create an empty set
    pub fn new() -> Self {
        ParticleSet {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Add a particle and return its handle
    pub fn insert(&mut self, particle: Particle) -> ParticleHandle {
        self.len += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.particle = Some(particle);
            return ParticleHandle::new(index, slot.generation);
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            particle: Some(particle),
        });
        ParticleHandle::new(index, 0)
    }

    /// Remove a particle, returning it if the handle was live
    ///
    /// This increments the slot generation to invalidate old handles.
    pub fn remove(&mut self, handle: ParticleHandle) -> Option<Particle> {
        let slot = self.live_slot_mut(handle)?;
        let particle = slot.particle.take();
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index());
        self.len -= 1;
        particle
    }

    /// Check if a handle still refers to a particle
    pub fn contains(&self, handle: ParticleHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Get a particle by handle
    pub fn get(&self, handle: ParticleHandle) -> Option<&Particle> {
        self.slots
            .get(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.particle.as_ref())
    }

    /// Get a particle mutably by handle
    pub fn get_mut(&mut self, handle: ParticleHandle) -> Option<&mut Particle> {
        self.live_slot_mut(handle)
            .and_then(|slot| slot.particle.as_mut())
    }

    /// Like [`ParticleSet::get`], but a dead handle is an error
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::StaleHandle`] if the particle was removed.
    pub fn try_get(&self, handle: ParticleHandle) -> Result<&Particle> {
        self.get(handle).ok_or(PhysicsError::StaleHandle(handle))
    }

    /// Like [`ParticleSet::get_mut`], but a dead handle is an error
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::StaleHandle`] if the particle was removed.
    pub fn try_get_mut(&mut self, handle: ParticleHandle) -> Result<&mut Particle> {
        self.get_mut(handle).ok_or(PhysicsError::StaleHandle(handle))
    }

    /// Borrow one or two distinct particles mutably at once
    ///
    /// Returns `None` if `a` is dead, if `b` is given but dead, or if `b`
    /// equals `a`.
    pub fn get_pair_mut(
        &mut self,
        a: ParticleHandle,
        b: Option<ParticleHandle>,
    ) -> Option<(&mut Particle, Option<&mut Particle>)> {
        let b = match b {
            None => return self.get_mut(a).map(|pa| (pa, None)),
            Some(b) => b,
        };
        if a.index() == b.index() || !self.contains(a) || !self.contains(b) {
            return None;
        }

        let (ia, ib) = (a.index() as usize, b.index() as usize);
        let (pa, pb) = if ia < ib {
            let (left, right) = self.slots.split_at_mut(ib);
            (&mut left[ia], &mut right[0])
        } else {
            let (left, right) = self.slots.split_at_mut(ia);
            (&mut right[0], &mut left[ib])
        };

        match (pa.particle.as_mut(), pb.particle.as_mut()) {
            (Some(pa), Some(pb)) => Some((pa, Some(pb))),
            _ => None,
        }
    }

    /// Number of live particles
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the set holds no particles
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Remove every particle
    ///
    /// Generations are kept, so handles issued before the clear stay dead.
    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.particle.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
            }
        }
        self.len = 0;
    }

    /// Iterate over live particles in slot order
    pub fn iter(&self) -> impl Iterator<Item = (ParticleHandle, &Particle)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.particle
                .as_ref()
                .map(|p| (ParticleHandle::new(index as u32, slot.generation), p))
        })
    }

    /// Iterate mutably over live particles in slot order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ParticleHandle, &mut Particle)> {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.particle
                .as_mut()
                .map(|p| (ParticleHandle::new(index as u32, generation), p))
        })
    }

    /// Handles of every live particle in slot order
    pub fn handles(&self) -> Vec<ParticleHandle> {
        self.iter().map(|(handle, _)| handle).collect()
    }

    fn live_slot_mut(&mut self, handle: ParticleHandle) -> Option<&mut Slot> {
        self.slots
            .get_mut(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation() && slot.particle.is_some())
    }
}
