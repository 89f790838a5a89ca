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
//! Contacts, their resolution, and the generators that produce them
//!
//! Each frame the world asks every registered [`ContactGenerator`] for the
//! constraint violations it sees, collects them into one batch, and hands
//! the batch to a [`ContactResolver`]. Contacts never outlive the frame.
//!
//! | Generator | Emits |
//! |---|---|
//! | [`Cable`], [`AnchoredCable`] | one contact once stretched to `max_length` |
//! | [`Rod`], [`AnchoredRod`] | one contact whenever not exactly at `length` |
//! | [`GroundContacts`] | one contact per particle below the plane |

mod contact;
mod ground;
mod links;
mod resolver;

pub use contact::{ContactMovement, ParticleContact};
pub use ground::GroundContacts;
pub use links::{AnchoredCable, AnchoredRod, Cable, ParticleLink, Rod};
pub use resolver::ContactResolver;

use crate::error::Result;
use crate::particle::{ParticleHandle, ParticleSet};

/// Something that inspects particles and reports contacts
pub trait ContactGenerator: Send + Sync {
    /// Append the contacts this generator sees to `contacts`
    ///
    /// At most `limit` contacts are written. Returns how many were written.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::StaleHandle`](crate::PhysicsError::StaleHandle)
    /// when a particle the generator refers to has been removed.
    fn fill_contact(
        &self,
        particles: &ParticleSet,
        contacts: &mut Vec<ParticleContact>,
        limit: usize,
    ) -> Result<usize>;

    /// Get a descriptive name for this generator
    fn name(&self) -> &str;

    /// Whether the generator holds a handle to `particle`
    fn references(&self, _particle: ParticleHandle) -> bool {
        false
    }
}
