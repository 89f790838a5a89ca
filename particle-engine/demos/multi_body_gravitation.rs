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
//! Multi-Body Gravitation Example
//!
//! A handful of bodies attract each other pairwise. Every ordered pair gets
//! its own gravitational generator, so each body feels every other one.
//! Prints positions, total momentum and kinetic energy as the system evolves.
//!
//! # Running
//!
//! ```bash
//! cargo run --example multi_body_gravitation
//! ```

use particle_engine::forces::Gravitational;
use particle_engine::{Particle, ParticleHandle, ParticleWorld, Result, Vector3};
use std::sync::Arc;
use std::time::Duration;

/// Coupling constant, exaggerated so the bodies interact on screen scales
const G: f64 = 10_000.0;

/// Softening length, keeps close passes finite
const SOFTENING: f64 = 5.0;

/// Wall-clock length of one frame
const FRAME: Duration = Duration::from_millis(1);

/// Frames to simulate
const FRAMES: usize = 5000;

/// Frames between reports
const OUTPUT_INTERVAL: usize = 500;

/// Initial body state: position and velocity
const BODIES: &[([f64; 3], [f64; 3])] = &[
    ([100.0, 100.0, 0.0], [-100.0, -1000.0, 0.0]),
    ([400.0, 600.0, 0.0], [100.0, 100.0, 0.0]),
    ([200.0, 600.0, 0.0], [100.0, -200.0, 0.0]),
    ([20.0, 600.0, 0.0], [100.0, -200.0, 0.0]),
];

fn total_momentum(world: &ParticleWorld, bodies: &[ParticleHandle]) -> Vector3 {
    bodies
        .iter()
        .filter_map(|&h| world.particle(h))
        .filter_map(|p| p.mass().ok().map(|m| p.velocity() * m))
        .fold(Vector3::ZERO, |sum, momentum| sum + momentum)
}

fn kinetic_energy(world: &ParticleWorld, bodies: &[ParticleHandle]) -> f64 {
    bodies
        .iter()
        .filter_map(|&h| world.particle(h))
        .map(|p| p.kinetic_energy())
        .sum()
}

fn main() -> Result<()> {
    let mut world = ParticleWorld::default();

    let mut bodies = Vec::with_capacity(BODIES.len());
    for &(position, velocity) in BODIES {
        bodies.push(
            world.add_particle(
                Particle::new()
                    .with_position(Vector3::from(position))
                    .with_velocity(Vector3::from(velocity))
                    .with_damping(0.9)?,
            ),
        );
    }

    for &body in &bodies {
        for &other in &bodies {
            if body != other {
                let generator = Gravitational::new(other, G)?.with_softening(SOFTENING)?;
                world.add_force(body, Arc::new(generator));
            }
        }
    }

    println!("Multi-body gravitation: {} bodies, {} generators", bodies.len(), world.registry().len());
    println!("  G = {}, softening = {}", G, SOFTENING);
    println!();

    for frame in 0..=FRAMES {
        if frame % OUTPUT_INTERVAL == 0 {
            println!(
                "t = {:.3} s  momentum = {}  kinetic energy = {:.3e}",
                frame as f64 * FRAME.as_secs_f64(),
                total_momentum(&world, &bodies),
                kinetic_energy(&world, &bodies)
            );
            for (handle, position) in world.positions() {
                println!("    {}: {}", handle, position);
            }
        }
        world.run_frame(FRAME)?;
    }

    Ok(())
}
