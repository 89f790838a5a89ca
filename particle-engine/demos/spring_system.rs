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
//! Anchored Spring Example
//!
//! A heavy particle hangs from a fixed point on a spring and bounces under
//! gravity. Positions are printed instead of drawn.
//!
//! # Running
//!
//! ```bash
//! cargo run --example spring_system
//!
//! # Run for more frames
//! cargo run --example spring_system -- --frames 2000
//! ```

use particle_engine::forces::{AnchoredSpring, Gravity};
use particle_engine::{Particle, ParticleWorld, Result, Vector3};
use std::sync::Arc;
use std::time::Duration;

/// Wall-clock length of one frame
const FRAME: Duration = Duration::from_millis(10);

/// Frames between printed positions
const OUTPUT_INTERVAL: usize = 25;

fn parse_frames() -> usize {
    let args: Vec<String> = std::env::args().collect();
    match args.iter().position(|arg| arg == "--frames") {
        Some(i) => match args.get(i + 1).map(|value| value.parse::<usize>()) {
            Some(Ok(frames)) => frames,
            _ => {
                eprintln!("Warning: --frames needs a whole number, using 500");
                500
            }
        },
        None => 500,
    }
}

fn main() -> Result<()> {
    let frames = parse_frames();
    let anchor = Vector3::new(0.0, 250.0, 0.0);

    let mut world = ParticleWorld::default();
    let bob = world.add_particle(
        Particle::new()
            .with_position(Vector3::ZERO)
            .with_mass(100.0)?
            .with_damping(0.99)?,
    );
    world.add_force(bob, Arc::new(Gravity::new(Vector3::new(0.0, -10.0, 0.0))));
    world.add_force(bob, Arc::new(AnchoredSpring::new(anchor, 10.0, 200.0)?));

    println!("Spring system: anchor {}, rest length 200, k = 10, m = 100", anchor);
    println!("{:>6}  {:>10}  {:>10}  {:>10}", "frame", "time (s)", "y", "stretch");

    for frame in 0..=frames {
        if frame % OUTPUT_INTERVAL == 0 {
            if let Some(particle) = world.particle(bob) {
                let position = particle.position();
                println!(
                    "{:>6}  {:>10.2}  {:>10.3}  {:>10.3}",
                    frame,
                    frame as f64 * FRAME.as_secs_f64(),
                    position.y,
                    position.distance(&anchor) - 200.0
                );
            }
        }
        world.run_frame(FRAME)?;
    }

    // Equilibrium stretch is m * g / k
    println!();
    println!("Expected equilibrium stretch: {:.3}", 100.0 * 10.0 / 10.0);
    Ok(())
}
