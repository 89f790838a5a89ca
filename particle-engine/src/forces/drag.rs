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
//! Velocity-dependent drag

use super::{non_negative, ForceGenerator};
use crate::error::Result;
use crate::particle::{ParticleHandle, ParticleSet};
use crate::vector::Vector3;

/// Drag opposing a particle's velocity
///
/// The magnitude is `k1 * |v| + k2 * |v|²`: `k1` models viscous drag and
/// `k2` the quadratic drag of fast-moving bodies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drag {
    k1: f64,
    k2: f64,
}

impl Drag {
    /// Create a drag generator with linear and quadratic coefficients
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if either coefficient is negative or not finite.
    pub fn new(k1: f64, k2: f64) -> Result<Self> {
        Ok(Drag {
            k1: non_negative("linear drag coefficient", k1)?,
            k2: non_negative("quadratic drag coefficient", k2)?,
        })
    }

    /// Linear coefficient
    pub fn k1(&self) -> f64 {
        self.k1
    }

    /// Quadratic coefficient
    pub fn k2(&self) -> f64 {
        self.k2
    }
}

impl ForceGenerator for Drag {
    fn compute_force(
        &self,
        particle: ParticleHandle,
        particles: &ParticleSet,
        _duration: f64,
    ) -> Result<Option<Vector3>> {
        let velocity = particles.try_get(particle)?.velocity();
        let speed = velocity.magnitude();
        if speed == 0.0 {
            return Ok(None);
        }

        let drag = self.k1 * speed + self.k2 * speed * speed;
        Ok(Some(-velocity.normalize() * drag))
    }

    fn name(&self) -> &str {
        "drag"
    }
}
