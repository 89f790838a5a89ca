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
//! Spring-like force generators
//!
//! All springs follow `F = -k * ||d| - rest_length| * d̂`, where `d` runs from
//! the other end of the spring to the particle. The force always pulls the
//! particle toward the other end, in proportion to how far the spring is
//! from its rest length, whether stretched or compressed.
//! Bungees only act while stretched: compressed, they do nothing.
//!
//! Stiff springs are unstable under explicit integration. [`FakeSpring`]
//! avoids this by solving the damped harmonic oscillator in closed form over
//! the frame and converting the result back into an equivalent force.

use super::{non_negative, ForceGenerator};
use crate::error::Result;
use crate::particle::{ParticleHandle, ParticleSet};
use crate::vector::Vector3;

/// Hooke's law force on a particle at `position` from a spring end at `end`
fn hooke(position: Vector3, end: Vector3, spring_constant: f64, rest_length: f64) -> Vector3 {
    let delta = position - end;
    let extension = (delta.magnitude() - rest_length).abs();
    -delta.normalize() * (extension * spring_constant)
}

/// Like [`hooke`], but `None` while the spring is not stretched
fn bungee(position: Vector3, end: Vector3, spring_constant: f64, rest_length: f64) -> Option<Vector3> {
    if (position - end).magnitude() <= rest_length {
        return None;
    }
    Some(hooke(position, end, spring_constant, rest_length))
}

macro_rules! spring_accessors {
    () => {
        /// Spring constant (stiffness)
        pub fn spring_constant(&self) -> f64 {
            self.spring_constant
        }

        /// Length at which the spring exerts no force
        pub fn rest_length(&self) -> f64 {
            self.rest_length
        }
    };
}

/// Spring between the particle and another particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    other: ParticleHandle,
    spring_constant: f64,
    rest_length: f64,
}

impl Spring {
    /// Create a spring to `other`
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the constant or rest length is negative
    /// or not finite.
    pub fn new(other: ParticleHandle, spring_constant: f64, rest_length: f64) -> Result<Self> {
        Ok(Spring {
            other,
            spring_constant: non_negative("spring constant", spring_constant)?,
            rest_length: non_negative("rest length", rest_length)?,
        })
    }

    /// Particle at the other end of the spring
    pub fn other(&self) -> ParticleHandle {
        self.other
    }

    spring_accessors!();
}

impl ForceGenerator for Spring {
    fn compute_force(
        &self,
        particle: ParticleHandle,
        particles: &ParticleSet,
        _duration: f64,
    ) -> Result<Option<Vector3>> {
        let position = particles.try_get(particle)?.position();
        let end = particles.try_get(self.other)?.position();
        Ok(Some(hooke(position, end, self.spring_constant, self.rest_length)))
    }

    fn name(&self) -> &str {
        "spring"
    }

    fn references(&self, particle: ParticleHandle) -> bool {
        self.other == particle
    }
}

/// Spring between the particle and a fixed point in space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchoredSpring {
    anchor: Vector3,
    spring_constant: f64,
    rest_length: f64,
}

impl AnchoredSpring {
    /// Create a spring to `anchor`
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the constant or rest length is negative
    /// or not finite.
    pub fn new(anchor: Vector3, spring_constant: f64, rest_length: f64) -> Result<Self> {
        Ok(AnchoredSpring {
            anchor,
            spring_constant: non_negative("spring constant", spring_constant)?,
            rest_length: non_negative("rest length", rest_length)?,
        })
    }

    /// Fixed end of the spring
    pub fn anchor(&self) -> Vector3 {
        self.anchor
    }

    /// Move the fixed end
    pub fn set_anchor(&mut self, anchor: Vector3) {
        self.anchor = anchor;
    }

    spring_accessors!();
}

impl ForceGenerator for AnchoredSpring {
    fn compute_force(
        &self,
        particle: ParticleHandle,
        particles: &ParticleSet,
        _duration: f64,
    ) -> Result<Option<Vector3>> {
        let position = particles.try_get(particle)?.position();
        Ok(Some(hooke(position, self.anchor, self.spring_constant, self.rest_length)))
    }

    fn name(&self) -> &str {
        "anchored spring"
    }
}

/// Elastic cord between the particle and another particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bungee {
    other: ParticleHandle,
    spring_constant: f64,
    rest_length: f64,
}

impl Bungee {
    /// Create a bungee to `other`
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the constant or rest length is negative
    /// or not finite.
    pub fn new(other: ParticleHandle, spring_constant: f64, rest_length: f64) -> Result<Self> {
        Ok(Bungee {
            other,
            spring_constant: non_negative("spring constant", spring_constant)?,
            rest_length: non_negative("rest length", rest_length)?,
        })
    }

    /// Particle at the other end of the cord
    pub fn other(&self) -> ParticleHandle {
        self.other
    }

    spring_accessors!();
}

impl ForceGenerator for Bungee {
    fn compute_force(
        &self,
        particle: ParticleHandle,
        particles: &ParticleSet,
        _duration: f64,
    ) -> Result<Option<Vector3>> {
        let position = particles.try_get(particle)?.position();
        let end = particles.try_get(self.other)?.position();
        Ok(bungee(position, end, self.spring_constant, self.rest_length))
    }

    fn name(&self) -> &str {
        "bungee"
    }

    fn references(&self, particle: ParticleHandle) -> bool {
        self.other == particle
    }
}

/// Elastic cord between the particle and a fixed point in space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchoredBungee {
    anchor: Vector3,
    spring_constant: f64,
    rest_length: f64,
}

impl AnchoredBungee {
    /// Create a bungee to `anchor`
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the constant or rest length is negative
    /// or not finite.
    pub fn new(anchor: Vector3, spring_constant: f64, rest_length: f64) -> Result<Self> {
        Ok(AnchoredBungee {
            anchor,
            spring_constant: non_negative("spring constant", spring_constant)?,
            rest_length: non_negative("rest length", rest_length)?,
        })
    }

    /// Fixed end of the cord
    pub fn anchor(&self) -> Vector3 {
        self.anchor
    }

    spring_accessors!();
}

impl ForceGenerator for AnchoredBungee {
    fn compute_force(
        &self,
        particle: ParticleHandle,
        particles: &ParticleSet,
        _duration: f64,
    ) -> Result<Option<Vector3>> {
        let position = particles.try_get(particle)?.position();
        Ok(bungee(position, self.anchor, self.spring_constant, self.rest_length))
    }

    fn name(&self) -> &str {
        "anchored bungee"
    }
}

/// Stiff spring to an anchor, solved as a damped harmonic oscillator
///
/// For a particle displaced by `x` from the anchor with velocity `v`, the
/// oscillator `x'' = -k x - d x'` has the under-damped solution
///
/// ```text
/// γ = ½ √(4k − d²)
/// c = x·d/(2γ) + v/γ
/// x(t) = (x cos γt + c sin γt) · e^(−½ d t)
/// ```
///
/// Integration moves the particle by its current velocity before the force
/// takes effect, so the generator starts the oscillator from that predicted
/// position `p = x + v t` and returns the force that sets the velocity to
/// carry the particle onto `x(t)` over the following frame,
/// `m · (x(t) − p − v t)/t²`. Positions therefore trail the closed-form
/// solution by one frame. For very stiff springs (`γ·t ≫ 1`) that lag, and
/// the first-order position update behind it, act as extra damping; the
/// motion stays bounded but decays faster than the oscillator would.
///
/// When `4k ≤ d²` the characteristic roots are not complex, γ is zero or
/// undefined, and the generator contributes nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FakeSpring {
    anchor: Vector3,
    spring_constant: f64,
    damping: f64,
}

impl FakeSpring {
    /// Create an oscillator spring to `anchor`
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the constant or damping is negative or
    /// not finite.
    pub fn new(anchor: Vector3, spring_constant: f64, damping: f64) -> Result<Self> {
        Ok(FakeSpring {
            anchor,
            spring_constant: non_negative("spring constant", spring_constant)?,
            damping: non_negative("damping", damping)?,
        })
    }

    /// Fixed end of the spring
    pub fn anchor(&self) -> Vector3 {
        self.anchor
    }

    /// Spring constant (stiffness)
    pub fn spring_constant(&self) -> f64 {
        self.spring_constant
    }

    /// Damping coefficient of the oscillator
    pub fn damping(&self) -> f64 {
        self.damping
    }
}

impl ForceGenerator for FakeSpring {
    fn compute_force(
        &self,
        particle: ParticleHandle,
        particles: &ParticleSet,
        duration: f64,
    ) -> Result<Option<Vector3>> {
        let particle = particles.try_get(particle)?;
        if particle.has_infinite_mass() || duration <= 0.0 {
            return Ok(None);
        }

        let discriminant = 4.0 * self.spring_constant - self.damping * self.damping;
        if discriminant <= 0.0 {
            return Ok(None);
        }
        let gamma = 0.5 * discriminant.sqrt();

        let velocity = particle.velocity();
        let position = particle.position() - self.anchor + velocity * duration;

        let c = position * (self.damping / (2.0 * gamma)) + velocity * (1.0 / gamma);
        let (sin, cos) = (gamma * duration).sin_cos();
        let target = (position * cos + c * sin) * (-0.5 * duration * self.damping).exp();

        let acceleration = (target - position - velocity * duration) * (1.0 / (duration * duration));
        Ok(Some(acceleration * particle.mass()?))
    }

    fn name(&self) -> &str {
        "fake spring"
    }
}
