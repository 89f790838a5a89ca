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
//! Buoyancy for particles floating in a liquid
//!
//! The liquid fills everything below a horizontal plane at `water_height`
//! (along Y). A particle is treated as a body extending `max_depth` above and
//! below its centre:
//!
//! ```text
//! y >= water_height + max_depth   out of the water, no force
//! y <= water_height - max_depth   fully submerged, ρ·V up
//! otherwise                       ρ·V · (water_height + max_depth − y) / (2·max_depth)
//! ```

use super::{non_negative, ForceGenerator};
use crate::error::{PhysicsError, Result};
use crate::particle::{ParticleHandle, ParticleSet};
use crate::vector::Vector3;

/// Density of fresh water in kg/m³
pub const WATER_DENSITY: f64 = 1000.0;

/// Piecewise linear buoyancy against a horizontal water plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Buoyancy {
    max_depth: f64,
    volume: f64,
    water_height: f64,
    liquid_density: f64,
}

impl Buoyancy {
    /// Create a buoyancy generator for a body of `volume` and half-height
    /// `max_depth` in water whose surface is at `water_height`
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `max_depth` is not positive, `volume` is
    /// negative, or any value is not finite.
    pub fn new(max_depth: f64, volume: f64, water_height: f64) -> Result<Self> {
        if !(max_depth > 0.0 && max_depth.is_finite()) {
            return Err(PhysicsError::invalid(format!(
                "max depth must be positive and finite, got {}",
                max_depth
            )));
        }
        if !water_height.is_finite() {
            return Err(PhysicsError::invalid("water height must be finite"));
        }
        Ok(Buoyancy {
            max_depth,
            volume: non_negative("volume", volume)?,
            water_height,
            liquid_density: WATER_DENSITY,
        })
    }

    /// Use a liquid other than fresh water
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `density` is negative or not finite.
    pub fn with_liquid_density(mut self, density: f64) -> Result<Self> {
        self.liquid_density = non_negative("liquid density", density)?;
        Ok(self)
    }

    /// Height of the water surface
    pub fn water_height(&self) -> f64 {
        self.water_height
    }

    /// Force when fully submerged
    pub fn max_force(&self) -> f64 {
        self.liquid_density * self.volume
    }
}

impl ForceGenerator for Buoyancy {
    fn compute_force(
        &self,
        particle: ParticleHandle,
        particles: &ParticleSet,
        _duration: f64,
    ) -> Result<Option<Vector3>> {
        let depth = particles.try_get(particle)?.position().y;

        if depth >= self.water_height + self.max_depth {
            return Ok(None);
        }

        let lift = if depth <= self.water_height - self.max_depth {
            self.max_force()
        } else {
            self.max_force() * (self.water_height + self.max_depth - depth) / (2.0 * self.max_depth)
        };
        Ok(Some(Vector3::UP * lift))
    }

    fn name(&self) -> &str {
        "buoyancy"
    }
}
