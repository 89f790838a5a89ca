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
//! Force registry
//!
//! The registry records which generator applies to which particle and runs
//! them once per frame. It owns neither side of a registration: particles
//! are referenced by handle and generators are shared through `Arc`.
//!
//! # Logging
//!
//! Registrations whose particle (or whose generator's other particle) has
//! been removed are skipped with a `log::warn!`, unless
//! `warn_on_stale_handles` is turned off.

use super::{ForceGenerator, SharedForceGenerator};
use crate::particle::{ParticleHandle, ParticleSet};
use std::fmt;
use std::sync::Arc;

/// One generator applied to one particle
#[derive(Clone)]
pub struct ForceRegistration {
    /// The particle receiving the force
    pub particle: ParticleHandle,
    /// The generator computing it
    pub generator: SharedForceGenerator,
}

impl ForceRegistration {
    fn matches<G: ForceGenerator + ?Sized>(&self, particle: ParticleHandle, generator: &Arc<G>) -> bool {
        self.particle == particle && same_generator(&self.generator, generator)
    }
}

impl fmt::Debug for ForceRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForceRegistration")
            .field("particle", &self.particle)
            .field("generator", &self.generator.name())
            .finish()
    }
}

/// Compare generators by identity, ignoring vtable pointers
fn same_generator<G: ForceGenerator + ?Sized>(a: &SharedForceGenerator, b: &Arc<G>) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

/// Ordered list of (particle, generator) registrations
///
/// Registrations are many-to-many and need not be distinct; registering the
/// same pair twice applies the force twice.
///
/// # Examples
///
/// ```
/// use particle_engine::forces::{ForceRegistry, Gravity};
/// use particle_engine::{Particle, ParticleSet, Vector3};
/// use std::sync::Arc;
///
/// let mut particles = ParticleSet::new();
/// let ball = particles.insert(Particle::new());
///
/// let gravity = Arc::new(Gravity::new(Vector3::new(0.0, -10.0, 0.0)));
/// let mut registry = ForceRegistry::new();
/// registry.add(ball, gravity.clone());
/// registry.update_forces(&mut particles, 0.01);
///
/// assert_eq!(particles.get(ball).unwrap().force_accumulator(), Vector3::new(0.0, -10.0, 0.0));
/// assert_eq!(registry.remove(ball, &gravity), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ForceRegistry {
    registrations: Vec<ForceRegistration>,
    /// Whether to log warnings for registrations with removed particles
    pub warn_on_stale_handles: bool,
}

impl ForceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        ForceRegistry {
            registrations: Vec::new(),
            warn_on_stale_handles: true,
        }
    }

    /// Register `generator` to apply to `particle`
    pub fn add(&mut self, particle: ParticleHandle, generator: SharedForceGenerator) {
        self.registrations.push(ForceRegistration { particle, generator });
    }

    /// Remove every registration of `generator` against `particle`
    ///
    /// Generators are matched by identity (the same `Arc`), not by value.
    /// Returns the number of registrations removed; removing a pair that was
    /// never registered has no effect.
    pub fn remove<G: ForceGenerator + ?Sized>(&mut self, particle: ParticleHandle, generator: &Arc<G>) -> usize {
        let before = self.registrations.len();
        self.registrations.retain(|reg| !reg.matches(particle, generator));
        before - self.registrations.len()
    }

    /// Remove every registration targeting `particle` or whose generator
    /// refers to it
    ///
    /// Returns the number of registrations removed.
    pub fn remove_particle(&mut self, particle: ParticleHandle) -> usize {
        let before = self.registrations.len();
        self.registrations
            .retain(|reg| reg.particle != particle && !reg.generator.references(particle));
        before - self.registrations.len()
    }

    /// Remove every registration
    pub fn clear(&mut self) {
        self.registrations.clear();
    }

    /// Number of registrations
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Iterate over registrations in order
    pub fn iter(&self) -> impl Iterator<Item = &ForceRegistration> {
        self.registrations.iter()
    }

    /// Run every registration once, in registration order
    ///
    /// Failed registrations (stale handles) are skipped; the rest still run.
    /// Returns the number of registrations that added a force.
    pub fn update_forces(&self, particles: &mut ParticleSet, duration: f64) -> usize {
        let mut applied = 0;

        for reg in &self.registrations {
            match reg.generator.update_force(reg.particle, particles, duration) {
                Ok(true) => applied += 1,
                Ok(false) => {}
                Err(err) => {
                    if self.warn_on_stale_handles {
                        log::warn!(
                            "skipping force generator '{}' on {}: {}",
                            reg.generator.name(),
                            reg.particle,
                            err
                        );
                    }
                }
            }
        }

        applied
    }
}

impl Default for ForceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::forces::{Drag, Gravity, Spring};
    use crate::particle::Particle;
    use crate::vector::Vector3;

    struct ConstantForce {
        force: Vector3,
    }

    impl ForceGenerator for ConstantForce {
        fn compute_force(
            &self,
            _particle: ParticleHandle,
            _particles: &ParticleSet,
            _duration: f64,
        ) -> Result<Option<Vector3>> {
            Ok(Some(self.force))
        }

        fn name(&self) -> &str {
            "ConstantForce"
        }
    }

    #[test]
    fn test_force_registry() {
        let mut registry = ForceRegistry::new();
        assert!(registry.is_empty());

        registry.add(ParticleHandle::new(0, 0), Arc::new(Gravity::default()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_force_accumulation() {
        let mut particles = ParticleSet::new();
        let h = particles.insert(Particle::new());

        let mut registry = ForceRegistry::new();
        registry.add(h, Arc::new(ConstantForce { force: Vector3::new(10.0, 0.0, 0.0) }));
        registry.add(h, Arc::new(ConstantForce { force: Vector3::new(0.0, 20.0, 0.0) }));

        assert_eq!(registry.update_forces(&mut particles, 0.01), 2);
        assert_eq!(
            particles.get(h).unwrap().force_accumulator(),
            Vector3::new(10.0, 20.0, 0.0)
        );
    }

    #[test]
    fn test_shared_generator() {
        let mut particles = ParticleSet::new();
        let a = particles.insert(Particle::new());
        let b = particles.insert(Particle::new().with_mass(2.0).unwrap());

        let gravity = Arc::new(Gravity::new(Vector3::new(0.0, -1.0, 0.0)));
        let mut registry = ForceRegistry::new();
        registry.add(a, gravity.clone());
        registry.add(b, gravity.clone());
        registry.update_forces(&mut particles, 0.01);

        assert_eq!(particles.get(a).unwrap().force_accumulator(), Vector3::new(0.0, -1.0, 0.0));
        assert_eq!(particles.get(b).unwrap().force_accumulator(), Vector3::new(0.0, -2.0, 0.0));
    }

    #[test]
    fn test_remove_matches_identity() {
        let h = ParticleHandle::new(0, 0);
        let g1 = Arc::new(Gravity::default());
        let g2 = Arc::new(Gravity::default());
        let drag: SharedForceGenerator = Arc::new(Drag::new(0.1, 0.0).unwrap());

        let mut registry = ForceRegistry::new();
        registry.add(h, g1.clone());
        registry.add(h, g1.clone());
        registry.add(h, g2.clone());
        registry.add(h, drag.clone());

        assert_eq!(registry.remove(h, &g1), 2);
        assert_eq!(registry.remove(h, &g1), 0);
        assert_eq!(registry.remove(ParticleHandle::new(1, 0), &g2), 0);
        assert_eq!(registry.remove(h, &drag), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_particle_and_clear() {
        let a = ParticleHandle::new(0, 0);
        let b = ParticleHandle::new(1, 0);
        let gravity = Arc::new(Gravity::default());

        let mut registry = ForceRegistry::new();
        registry.add(a, gravity.clone());
        registry.add(b, gravity.clone());
        registry.add(a, gravity.clone());

        assert_eq!(registry.remove_particle(a), 2);
        assert_eq!(registry.iter().next().unwrap().particle, b);

        // A spring on `b` anchored to `c` goes away with `c`
        let c = ParticleHandle::new(2, 0);
        registry.add(b, Arc::new(Spring::new(c, 1.0, 1.0).unwrap()));
        assert_eq!(registry.remove_particle(c), 1);
        assert_eq!(registry.len(), 1);

        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_stale_registration_is_skipped() {
        let mut particles = ParticleSet::new();
        let gone = particles.insert(Particle::new());
        let kept = particles.insert(Particle::new());
        particles.remove(gone);

        let mut registry = ForceRegistry::new();
        registry.warn_on_stale_handles = false;
        let force = Arc::new(ConstantForce { force: Vector3::X });
        registry.add(gone, force.clone());
        registry.add(kept, force.clone());

        assert_eq!(registry.update_forces(&mut particles, 0.01), 1);
        assert_eq!(particles.get(kept).unwrap().force_accumulator(), Vector3::X);
    }
}
