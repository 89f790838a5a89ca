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
//! Rope Bridge Example
//!
//! Two rows of particles form the deck of a bridge. Rods keep the rows a
//! fixed distance apart, cables join neighbours along each row, and anchored
//! cables hang the deck from posts above. A ground plane catches anything
//! that falls through. Prints the sag of the deck as it settles.
//!
//! # Running
//!
//! ```bash
//! cargo run --example rope_bridge
//! ```

use particle_engine::contacts::{AnchoredCable, Cable, GroundContacts, Rod};
use particle_engine::forces::Gravity;
use particle_engine::{Particle, ParticleHandle, ParticleWorld, Result, Vector3};
use std::sync::Arc;

/// Planks along the bridge
const SEGMENTS: usize = 6;

/// Distance between neighbouring deck particles
const SPACING: f64 = 2.0;

/// Deck width, held by rods
const WIDTH: f64 = 2.0;

/// Height of the suspension posts
const POST_HEIGHT: f64 = 6.0;

/// Frame length in seconds
const FRAME: f64 = 0.01;

fn main() -> Result<()> {
    let mut world = ParticleWorld::new(SEGMENTS * 8, 0)?;
    let gravity = Arc::new(Gravity::default());

    let mut rows: [Vec<ParticleHandle>; 2] = [Vec::new(), Vec::new()];
    for i in 0..SEGMENTS {
        let x = i as f64 * SPACING;
        for (side, row) in rows.iter_mut().enumerate() {
            let z = if side == 0 { -WIDTH / 2.0 } else { WIDTH / 2.0 };
            let handle = world.add_particle(
                Particle::new()
                    .with_position(Vector3::new(x, 4.0, z))
                    .with_mass(2.0)?
                    .with_damping(0.9)?,
            );
            world.add_force(handle, gravity.clone());
            row.push(handle);
        }
    }

    for i in 0..SEGMENTS {
        world.add_contact_generator(Rod::new(&[rows[0][i], rows[1][i]], WIDTH)?);

        for row in &rows {
            if i + 1 < SEGMENTS {
                world.add_contact_generator(Cable::new(&[row[i], row[i + 1]], SPACING * 1.05, 0.3)?);
            }
            let position = world
                .particle(row[i])
                .map(|p| p.position())
                .unwrap_or(Vector3::ZERO);
            let anchor = Vector3::new(position.x, POST_HEIGHT, position.z);
            world.add_contact_generator(AnchoredCable::new(row[i], anchor, 2.5, 0.5)?);
        }
    }
    world.add_contact_generator(GroundContacts::new(0.0, 0.2)?);

    println!(
        "Rope bridge: {} particles, {} contact generators",
        world.particles().len(),
        world.contact_generator_count()
    );
    println!(
        "{:>6}  {:>10}  {:>10}  {:>8}  {:>10}",
        "frame", "lowest y", "mean y", "contacts", "iterations"
    );

    for frame in 0..=600 {
        let stats = world.run_physics(FRAME)?;
        if frame % 50 == 0 {
            let heights: Vec<f64> = world.positions().map(|(_, p)| p.y).collect();
            let lowest = heights.iter().cloned().fold(f64::INFINITY, f64::min);
            let mean = heights.iter().sum::<f64>() / heights.len() as f64;
            println!(
                "{:>6}  {:>10.3}  {:>10.3}  {:>8}  {:>10}",
                frame, lowest, mean, stats.contacts_used, stats.iterations_used
            );
        }
    }

    Ok(())
}
