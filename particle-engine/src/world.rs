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
//! The particle world and its frame pipeline
//!
//! A [`ParticleWorld`] owns the particles, the force registry, the contact
//! generators and the resolver. Each call to [`ParticleWorld::run_physics`]
//! advances one frame:
//!
//! 1. clear every force accumulator
//! 2. run the force registry
//! 3. integrate every particle
//! 4. poll the contact generators in insertion order, up to `max_contacts`
//! 5. resolve the collected contacts
//!
//! The steps are also public so callers can drive them one at a time. A
//! frame is never rolled back: a stale handle met along the way is logged
//! and skipped, and the frame carries on.

use log::{debug, warn};
use std::fmt;
use std::time::Duration;

use crate::config::WorldConfig;
use crate::contacts::{ContactGenerator, ContactResolver, ParticleContact};
use crate::error::{PhysicsError, Result};
use crate::forces::{ForceRegistry, SharedForceGenerator};
use crate::particle::{Particle, ParticleHandle, ParticleSet};
use crate::vector::Vector3;

/// Identifies a contact generator registered with a world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeneratorId(u64);

impl fmt::Display for GeneratorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContactGenerator({})", self.0)
    }
}

/// Where the world is in its frame pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FramePhase {
    /// Between frames
    #[default]
    Idle,
    /// Forces have been accumulated
    ForcesApplied,
    /// Particles have been integrated
    Integrated,
    /// Contacts have been collected
    ContactsGenerated,
    /// Contacts have been resolved
    Resolved,
}

/// What happened during the last frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Contacts collected from the generators
    pub contacts_used: usize,
    /// Resolver iterations the frame was allowed
    pub iterations_budget: usize,
    /// Resolver iterations actually taken
    pub iterations_used: usize,
    /// Whether the contact budget was exhausted
    pub saturated: bool,
}

/// A simulated set of particles with forces and contacts
pub struct ParticleWorld {
    config: WorldConfig,
    particles: ParticleSet,
    registry: ForceRegistry,
    resolver: ContactResolver,
    contact_generators: Vec<(GeneratorId, Box<dyn ContactGenerator>)>,
    contacts: Vec<ParticleContact>,
    next_generator_id: u64,
    phase: FramePhase,
    last_frame: FrameStats,
}

impl ParticleWorld {
    /// Create a world that collects at most `max_contacts` contacts per frame
    /// and resolves them with `iterations` steps, `0` meaning twice the
    /// number of contacts collected
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidArgument`] if `max_contacts` is zero.
    pub fn new(max_contacts: usize, iterations: usize) -> Result<Self> {
        Self::with_config(WorldConfig::new(max_contacts, iterations))
    }

    /// Create a world from a configuration
    ///
    /// # Errors
    ///
    /// Returns the error from [`WorldConfig::validate`].
    pub fn with_config(config: WorldConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: WorldConfig) -> Self {
        let mut registry = ForceRegistry::new();
        registry.warn_on_stale_handles = config.warn_on_stale_handles;

        ParticleWorld {
            contacts: Vec::with_capacity(config.max_contacts),
            config,
            particles: ParticleSet::new(),
            registry,
            resolver: ContactResolver::new(0),
            contact_generators: Vec::new(),
            next_generator_id: 0,
            phase: FramePhase::Idle,
            last_frame: FrameStats::default(),
        }
    }

    /// Create a world configured from the environment
    ///
    /// # Errors
    ///
    /// Returns the error from [`WorldConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        Self::with_config(WorldConfig::from_env()?)
    }

    /// The world's configuration
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Add a particle and return its handle
    pub fn add_particle(&mut self, particle: Particle) -> ParticleHandle {
        self.particles.insert(particle)
    }

    /// Remove a particle
    ///
    /// Force registrations and contact generators that refer to the particle
    /// are removed with it.
    pub fn remove_particle(&mut self, handle: ParticleHandle) -> Option<Particle> {
        let particle = self.particles.remove(handle)?;

        let registrations = self.registry.remove_particle(handle);
        let before = self.contact_generators.len();
        self.contact_generators
            .retain(|(_, generator)| !generator.references(handle));
        self.contacts.retain(|contact| !contact.involves(handle));

        debug!(
            "removed {} with {} force registrations and {} contact generators",
            handle,
            registrations,
            before - self.contact_generators.len()
        );
        Some(particle)
    }

    /// All particles
    pub fn particles(&self) -> &ParticleSet {
        &self.particles
    }

    /// All particles, mutably
    pub fn particles_mut(&mut self) -> &mut ParticleSet {
        &mut self.particles
    }

    /// A particle by handle
    pub fn particle(&self, handle: ParticleHandle) -> Option<&Particle> {
        self.particles.get(handle)
    }

    /// A particle by handle, mutably
    pub fn particle_mut(&mut self, handle: ParticleHandle) -> Option<&mut Particle> {
        self.particles.get_mut(handle)
    }

    /// Positions of every particle, for drawing
    pub fn positions(&self) -> impl Iterator<Item = (ParticleHandle, Vector3)> + '_ {
        self.particles
            .iter()
            .map(|(handle, particle)| (handle, particle.position()))
    }

    /// The force registry
    pub fn registry(&self) -> &ForceRegistry {
        &self.registry
    }

    /// The force registry, mutably
    ///
    /// The registry's `warn_on_stale_handles` is reset from the world's
    /// configuration at the start of every force pass.
    pub fn registry_mut(&mut self) -> &mut ForceRegistry {
        &mut self.registry
    }

    /// Register `generator` against `particle`
    pub fn add_force(&mut self, particle: ParticleHandle, generator: SharedForceGenerator) {
        self.registry.add(particle, generator);
    }

    /// Add a contact generator, polled after those already added
    pub fn add_contact_generator<G>(&mut self, generator: G) -> GeneratorId
    where
        G: ContactGenerator + 'static,
    {
        let id = GeneratorId(self.next_generator_id);
        self.next_generator_id += 1;
        self.contact_generators.push((id, Box::new(generator)));
        id
    }

    /// Remove a contact generator, returning whether it was present
    pub fn remove_contact_generator(&mut self, id: GeneratorId) -> bool {
        let before = self.contact_generators.len();
        self.contact_generators.retain(|(existing, _)| *existing != id);
        self.contact_generators.len() != before
    }

    /// Number of contact generators
    pub fn contact_generator_count(&self) -> usize {
        self.contact_generators.len()
    }

    /// Remove every contact generator
    pub fn clear_contact_generators(&mut self) {
        self.contact_generators.clear();
    }

    /// Contacts collected in the last frame
    pub fn contacts(&self) -> &[ParticleContact] {
        &self.contacts
    }

    /// The contact resolver
    pub fn resolver(&self) -> &ContactResolver {
        &self.resolver
    }

    /// Pipeline step last completed
    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    /// Statistics of the last frame
    pub fn last_frame(&self) -> FrameStats {
        self.last_frame
    }

    /// Clear every particle's force accumulator
    pub fn start_frame(&mut self) {
        for (_, particle) in self.particles.iter_mut() {
            particle.clear_accumulator();
        }
        self.phase = FramePhase::Idle;
    }

    /// Run the force registry; returns how many forces were applied
    pub fn apply_forces(&mut self, duration: f64) -> usize {
        self.registry.warn_on_stale_handles = self.config.warn_on_stale_handles;
        let applied = self.registry.update_forces(&mut self.particles, duration);
        self.phase = FramePhase::ForcesApplied;
        applied
    }

    /// Integrate every particle by `duration` seconds
    pub fn integrate(&mut self, duration: f64) {
        for (_, particle) in self.particles.iter_mut() {
            particle.integrate(duration);
        }
        self.phase = FramePhase::Integrated;
    }

    /// Poll the contact generators and return how many contacts they produced
    ///
    /// Generators are polled in the order they were added until
    /// `max_contacts` contacts have been collected; any left over are not
    /// asked this frame.
    pub fn generate_contacts(&mut self) -> usize {
        let max_contacts = self.config.max_contacts;
        self.contacts.clear();

        for (id, generator) in &self.contact_generators {
            let limit = max_contacts - self.contacts.len();
            if limit == 0 {
                break;
            }

            match generator.fill_contact(&self.particles, &mut self.contacts, limit) {
                Ok(_) => {}
                Err(err @ PhysicsError::StaleHandle(_)) => {
                    if self.config.warn_on_stale_handles {
                        warn!("{} ({}) skipped: {}", id, generator.name(), err);
                    }
                }
                Err(err) => warn!("{} ({}) failed: {}", id, generator.name(), err),
            }
            self.contacts.truncate(max_contacts);
        }

        let contacts_used = self.contacts.len();
        self.last_frame.contacts_used = contacts_used;
        self.last_frame.saturated = contacts_used >= max_contacts;
        if self.last_frame.saturated {
            warn!(
                "contact budget of {} exhausted, remaining constraints wait for the next frame",
                max_contacts
            );
        }

        self.phase = FramePhase::ContactsGenerated;
        contacts_used
    }

    /// Resolve the collected contacts and return the iterations used
    pub fn resolve_contacts(&mut self, duration: f64) -> usize {
        let budget = self.config.iterations.budget(self.contacts.len());
        self.resolver.set_iterations(budget);
        let used = self
            .resolver
            .resolve_contacts(&mut self.contacts, &mut self.particles, duration);

        self.last_frame.iterations_budget = budget;
        self.last_frame.iterations_used = used;
        self.phase = FramePhase::Resolved;
        used
    }

    /// Advance the world by one frame of `duration` seconds
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidArgument`], before anything is
    /// touched, if `duration` is negative or not finite.
    pub fn run_physics(&mut self, duration: f64) -> Result<FrameStats> {
        if !(duration >= 0.0 && duration.is_finite()) {
            return Err(PhysicsError::invalid(format!(
                "frame duration must be non-negative and finite, got {}",
                duration
            )));
        }

        self.last_frame = FrameStats::default();
        self.start_frame();
        self.apply_forces(duration);
        self.integrate(duration);
        if !self.contact_generators.is_empty() {
            self.generate_contacts();
            self.resolve_contacts(duration);
        } else {
            self.contacts.clear();
        }
        self.phase = FramePhase::Idle;

        debug!(
            "frame of {}s: {} particles, {} contacts, {}/{} iterations",
            duration,
            self.particles.len(),
            self.last_frame.contacts_used,
            self.last_frame.iterations_used,
            self.last_frame.iterations_budget
        );
        Ok(self.last_frame)
    }

    /// Advance the world by one frame of wall-clock `duration`
    ///
    /// # Errors
    ///
    /// Same as [`ParticleWorld::run_physics`].
    pub fn run_frame(&mut self, duration: Duration) -> Result<FrameStats> {
        self.run_physics(duration.as_secs_f64())
    }
}

impl Default for ParticleWorld {
    fn default() -> Self {
        Self::from_valid_config(WorldConfig::default())
    }
}

impl fmt::Debug for ParticleWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let generators: Vec<&str> = self
            .contact_generators
            .iter()
            .map(|(_, generator)| generator.name())
            .collect();
        f.debug_struct("ParticleWorld")
            .field("config", &self.config)
            .field("particles", &self.particles.len())
            .field("registry", &self.registry)
            .field("contact_generators", &generators)
            .field("phase", &self.phase)
            .field("last_frame", &self.last_frame)
            .finish()
    }
}
