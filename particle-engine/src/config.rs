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
//! World configuration
//!
//! [`WorldConfig`] holds the frame-pipeline settings of a
//! [`ParticleWorld`](crate::ParticleWorld). It can be built in code with the
//! `with_*` methods or read from the environment:
//!
//! | Variable | Field | Values |
//! |---|---|---|
//! | `PARTICLE_ENGINE_MAX_CONTACTS` | `max_contacts` | positive integer |
//! | `PARTICLE_ENGINE_ITERATIONS` | `iterations` | `auto`, `0` (auto) or a positive integer |
//! | `PARTICLE_ENGINE_WARN_STALE` | `warn_on_stale_handles` | `true`/`false`/`1`/`0` |

use crate::error::{PhysicsError, Result};
use std::fmt;

/// Environment variable overriding [`WorldConfig::max_contacts`]
pub const MAX_CONTACTS_VAR: &str = "PARTICLE_ENGINE_MAX_CONTACTS";
/// Environment variable overriding [`WorldConfig::iterations`]
pub const ITERATIONS_VAR: &str = "PARTICLE_ENGINE_ITERATIONS";
/// Environment variable overriding [`WorldConfig::warn_on_stale_handles`]
pub const WARN_STALE_VAR: &str = "PARTICLE_ENGINE_WARN_STALE";

/// Default contact budget per frame
pub const DEFAULT_MAX_CONTACTS: usize = 256;

/// How many resolver iterations a frame is allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IterationPolicy {
    /// Twice the number of contacts produced in the frame
    #[default]
    Auto,
    /// A fixed number every frame
    Fixed(usize),
}

impl IterationPolicy {
    /// Policy from an iteration count, where `0` means [`IterationPolicy::Auto`]
    pub fn from_count(iterations: usize) -> Self {
        if iterations == 0 {
            IterationPolicy::Auto
        } else {
            IterationPolicy::Fixed(iterations)
        }
    }

    /// Iteration budget for a frame that produced `contacts_used` contacts
    pub fn budget(&self, contacts_used: usize) -> usize {
        match *self {
            IterationPolicy::Auto => contacts_used.saturating_mul(2),
            IterationPolicy::Fixed(iterations) => iterations,
        }
    }
}

impl fmt::Display for IterationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IterationPolicy::Auto => write!(f, "auto"),
            IterationPolicy::Fixed(n) => write!(f, "{}", n),
        }
    }
}

impl std::str::FromStr for IterationPolicy {
    type Err = PhysicsError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Ok(IterationPolicy::Auto);
        }
        s.parse::<usize>()
            .map(IterationPolicy::from_count)
            .map_err(|_| {
                PhysicsError::invalid(format!(
                    "iterations must be 'auto' or a non-negative integer, got '{}'",
                    s
                ))
            })
    }
}

/// Settings for a particle world
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldConfig {
    /// Most contacts collected in one frame
    pub max_contacts: usize,
    /// Resolver iteration policy
    pub iterations: IterationPolicy,
    /// Whether to log when a stale particle handle is met and skipped
    pub warn_on_stale_handles: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            max_contacts: DEFAULT_MAX_CONTACTS,
            iterations: IterationPolicy::Auto,
            warn_on_stale_handles: true,
        }
    }
}

impl WorldConfig {
    /// Configuration with a contact budget and an iteration count (`0` for
    /// automatic)
    pub fn new(max_contacts: usize, iterations: usize) -> Self {
        WorldConfig {
            max_contacts,
            iterations: IterationPolicy::from_count(iterations),
            ..WorldConfig::default()
        }
    }

    /// Set the contact budget
    pub fn with_max_contacts(mut self, max_contacts: usize) -> Self {
        self.max_contacts = max_contacts;
        self
    }

    /// Set the iteration policy
    pub fn with_iterations(mut self, iterations: IterationPolicy) -> Self {
        self.iterations = iterations;
        self
    }

    /// Turn stale-handle warnings on or off
    pub fn with_stale_handle_warnings(mut self, enabled: bool) -> Self {
        self.warn_on_stale_handles = enabled;
        self
    }

    /// Check the configuration can drive a world
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidArgument`] if `max_contacts` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_contacts == 0 {
            return Err(PhysicsError::invalid("max_contacts must be at least 1"));
        }
        Ok(())
    }

    /// Defaults overridden by any `PARTICLE_ENGINE_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidArgument`] if a variable is set to a
    /// value that does not parse or fails [`WorldConfig::validate`].
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by the values `lookup` returns for the
    /// `PARTICLE_ENGINE_*` variable names
    ///
    /// # Errors
    ///
    /// Same as [`WorldConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = WorldConfig::default();

        if let Some(value) = lookup(MAX_CONTACTS_VAR) {
            config.max_contacts = value.trim().parse().map_err(|_| {
                PhysicsError::invalid(format!(
                    "{} must be a positive integer, got '{}'",
                    MAX_CONTACTS_VAR, value
                ))
            })?;
        }

        if let Some(value) = lookup(ITERATIONS_VAR) {
            config.iterations = value.parse()?;
        }

        if let Some(value) = lookup(WARN_STALE_VAR) {
            config.warn_on_stale_handles = parse_flag(WARN_STALE_VAR, &value)?;
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(PhysicsError::invalid(format!(
            "{} must be a boolean, got '{}'",
            name, value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = WorldConfig::default();
        assert_eq!(config.max_contacts, 256);
        assert_eq!(config.iterations, IterationPolicy::Auto);
        assert!(config.warn_on_stale_handles);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_new_zero_iterations_is_auto() {
        assert_eq!(WorldConfig::new(10, 0).iterations, IterationPolicy::Auto);
        assert_eq!(WorldConfig::new(10, 4).iterations, IterationPolicy::Fixed(4));
    }

    #[test]
    fn test_builders() {
        let config = WorldConfig::default()
            .with_max_contacts(8)
            .with_iterations(IterationPolicy::Fixed(3))
            .with_stale_handle_warnings(false);
        assert_eq!(config.max_contacts, 8);
        assert_eq!(config.iterations, IterationPolicy::Fixed(3));
        assert!(!config.warn_on_stale_handles);
    }

    #[test]
    fn test_zero_max_contacts_rejected() {
        let config = WorldConfig::default().with_max_contacts(0);
        assert!(matches!(config.validate(), Err(PhysicsError::InvalidArgument(_))));
    }

    #[test]
    fn test_policy_budget() {
        assert_eq!(IterationPolicy::Auto.budget(7), 14);
        assert_eq!(IterationPolicy::Auto.budget(0), 0);
        assert_eq!(IterationPolicy::Fixed(5).budget(100), 5);
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("auto".parse::<IterationPolicy>().unwrap(), IterationPolicy::Auto);
        assert_eq!(" AUTO ".parse::<IterationPolicy>().unwrap(), IterationPolicy::Auto);
        assert_eq!("0".parse::<IterationPolicy>().unwrap(), IterationPolicy::Auto);
        assert_eq!("12".parse::<IterationPolicy>().unwrap(), IterationPolicy::Fixed(12));
        assert!("-1".parse::<IterationPolicy>().is_err());
        assert!("lots".parse::<IterationPolicy>().is_err());
        assert_eq!(IterationPolicy::Fixed(12).to_string(), "12");
        assert_eq!(IterationPolicy::Auto.to_string(), "auto");
    }

    #[test]
    fn test_from_lookup_empty_is_default() {
        assert_eq!(WorldConfig::from_lookup(lookup(&[])).unwrap(), WorldConfig::default());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = WorldConfig::from_lookup(lookup(&[
            (MAX_CONTACTS_VAR, "32"),
            (ITERATIONS_VAR, "6"),
            (WARN_STALE_VAR, "false"),
        ]))
        .unwrap();
        assert_eq!(config.max_contacts, 32);
        assert_eq!(config.iterations, IterationPolicy::Fixed(6));
        assert!(!config.warn_on_stale_handles);
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        assert!(WorldConfig::from_lookup(lookup(&[(MAX_CONTACTS_VAR, "many")])).is_err());
        assert!(WorldConfig::from_lookup(lookup(&[(MAX_CONTACTS_VAR, "0")])).is_err());
        assert!(WorldConfig::from_lookup(lookup(&[(ITERATIONS_VAR, "x")])).is_err());
        assert!(WorldConfig::from_lookup(lookup(&[(WARN_STALE_VAR, "maybe")])).is_err());
    }
}
