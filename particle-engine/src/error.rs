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
//! Error types for the particle engine
//!
//! Every fallible operation in the crate returns [`Result`]. Conditions that
//! the engine treats as legitimate no-ops (two immovable particles in a
//! contact, an exhausted contact budget) are not errors and never surface
//! here.

use crate::particle::ParticleHandle;
use thiserror::Error;

/// Errors raised by particle engine operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// A quantity was requested that would require dividing by zero
    ///
    /// Raised by [`Particle::mass`](crate::particle::Particle::mass) on an
    /// infinite-mass particle.
    #[error("division by zero: {operation}")]
    DivisionByZero {
        /// The operation that was attempted
        operation: &'static str,
    },

    /// An argument was outside the range the operation accepts
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A handle referred to a particle that has since been removed
    #[error("stale particle handle: {0}")]
    StaleHandle(ParticleHandle),
}

impl PhysicsError {
    /// Shorthand for building an [`PhysicsError::InvalidArgument`]
    pub fn invalid(message: impl Into<String>) -> Self {
        PhysicsError::InvalidArgument(message.into())
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, PhysicsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PhysicsError::DivisionByZero { operation: "mass of infinite-mass particle" };
        assert_eq!(err.to_string(), "division by zero: mass of infinite-mass particle");

        let err = PhysicsError::invalid("restitution must be within [0, 1]");
        assert_eq!(err.to_string(), "invalid argument: restitution must be within [0, 1]");
    }

    #[test]
    fn test_stale_handle_message() {
        let err = PhysicsError::StaleHandle(ParticleHandle::new(3, 1));
        assert_eq!(err.to_string(), "stale particle handle: Particle(3, gen: 1)");
    }
}
