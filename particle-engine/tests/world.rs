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
//! Integration tests for the frame pipeline

use approx::assert_relative_eq;
use particle_engine::config::{ITERATIONS_VAR, MAX_CONTACTS_VAR};
use particle_engine::contacts::{AnchoredRod, Cable, GroundContacts, Rod};
use particle_engine::forces::{AnchoredSpring, FakeSpring, Gravity};
use particle_engine::{IterationPolicy, Particle, ParticleWorld, Vector3, WorldConfig};
use std::sync::Arc;
use std::time::Duration;

#[test]
fn test_ball_comes_to_rest_on_ground() {
    let mut world = ParticleWorld::default();
    let ball = world.add_particle(
        Particle::new()
            .with_position(Vector3::new(0.0, 2.0, 0.0))
            .with_damping(0.95)
            .unwrap(),
    );
    world.add_force(ball, Arc::new(Gravity::default()));
    world.add_contact_generator(GroundContacts::new(0.0, 0.5).unwrap());

    for _ in 0..2000 {
        world.run_physics(0.005).unwrap();
        assert!(world.particle(ball).unwrap().position().y > -0.05);
    }

    let particle = world.particle(ball).unwrap();
    assert!(particle.position().y.abs() < 0.01);
    assert!(particle.velocity().magnitude() < 0.1);
}

#[test]
fn test_pendulum_keeps_rod_length() {
    let anchor = Vector3::new(0.0, 5.0, 0.0);
    let mut world = ParticleWorld::default();
    let bob = world.add_particle(
        Particle::new()
            .with_position(Vector3::new(2.0, 5.0, 0.0))
            .with_damping(1.0)
            .unwrap(),
    );
    world.add_force(bob, Arc::new(Gravity::default()));
    world.add_contact_generator(AnchoredRod::new(bob, anchor, 2.0).unwrap());

    for _ in 0..500 {
        world.run_physics(0.01).unwrap();
        let length = world.particle(bob).unwrap().position().distance(&anchor);
        assert_relative_eq!(length, 2.0, epsilon = 1e-6);
    }
}

#[test]
fn test_chain_hangs_within_cable_lengths() {
    let mut world = ParticleWorld::default();
    let top = world.add_particle(
        Particle::new()
            .with_infinite_mass()
            .with_position(Vector3::new(0.0, 10.0, 0.0)),
    );

    let gravity = Arc::new(Gravity::default());
    let mut previous = top;
    let mut links = Vec::new();
    for i in 1..=4 {
        let link = world.add_particle(
            Particle::new().with_position(Vector3::new(i as f64 * 0.5, 10.0, 0.0)),
        );
        world.add_force(link, gravity.clone());
        world.add_contact_generator(Cable::new(&[previous, link], 1.0, 0.0).unwrap());
        links.push((previous, link));
        previous = link;
    }

    for _ in 0..1000 {
        world.run_physics(0.01).unwrap();
    }

    assert_eq!(world.particle(top).unwrap().position(), Vector3::new(0.0, 10.0, 0.0));
    for (a, b) in links {
        let distance = world
            .particle(a)
            .unwrap()
            .position()
            .distance(&world.particle(b).unwrap().position());
        assert!(distance <= 1.05, "cable stretched to {}", distance);
    }
}

#[test]
fn test_spring_oscillates_about_anchor() {
    let mut world = ParticleWorld::default();
    let p = world.add_particle(
        Particle::new()
            .with_position(Vector3::new(1.0, 0.0, 0.0))
            .with_damping(1.0)
            .unwrap(),
    );
    world.add_force(p, Arc::new(AnchoredSpring::new(Vector3::ZERO, 4.0, 0.0).unwrap()));

    let mut crossed = false;
    for _ in 0..200 {
        world.run_physics(0.01).unwrap();
        if world.particle(p).unwrap().position().x < 0.0 {
            crossed = true;
        }
    }
    assert!(crossed);
    assert!(world.particle(p).unwrap().position().x.abs() < 1.5);
}

#[test]
fn test_stiff_fake_spring_never_overshoots_start() {
    for stiffness in [100.0, 400.0, 1.0e4, 1.0e6] {
        let mut world = ParticleWorld::default();
        let p = world.add_particle(Particle::new().with_position(Vector3::new(1.0, 0.0, 0.0)));
        world.add_force(p, Arc::new(FakeSpring::new(Vector3::ZERO, stiffness, 0.5).unwrap()));

        for _ in 0..500 {
            world.run_physics(0.01).unwrap();
            let x = world.particle(p).unwrap().position().x;
            assert!(x.abs() <= 1.0 + 1e-9, "k = {}: |x| = {}", stiffness, x.abs());
        }
        assert!(world.particle(p).unwrap().position().x.abs() < 0.5);
    }
}

#[test]
fn test_fake_spring_settles() {
    let mut world = ParticleWorld::default();
    let p = world.add_particle(Particle::new().with_position(Vector3::new(0.0, -3.0, 0.0)));
    world.add_force(p, Arc::new(FakeSpring::new(Vector3::ZERO, 10.0, 1.0).unwrap()));

    for _ in 0..2000 {
        world.run_physics(0.01).unwrap();
    }
    assert!(world.particle(p).unwrap().position().magnitude() < 0.1);
}

#[test]
fn test_rod_pair_resolved_each_frame() {
    let mut world = ParticleWorld::new(8, 0).unwrap();
    let a = world.add_particle(Particle::new());
    let b = world.add_particle(
        Particle::new()
            .with_position(Vector3::new(6.0, 0.0, 0.0))
            .with_velocity(Vector3::new(1.0, 0.0, 0.0)),
    );
    world.add_contact_generator(Rod::new(&[a, b], 5.0).unwrap());

    let stats = world.run_physics(0.01).unwrap();
    assert_eq!(stats.contacts_used, 1);
    assert_eq!(stats.iterations_budget, 2);
    assert_eq!(stats.iterations_used, 1);

    let distance = world
        .particle(a)
        .unwrap()
        .position()
        .distance(&world.particle(b).unwrap().position());
    assert_relative_eq!(distance, 5.0, epsilon = 1e-9);
}

#[test]
fn test_positions_for_rendering() {
    let mut world = ParticleWorld::default();
    let a = world.add_particle(Particle::new().with_position(Vector3::new(1.0, 0.0, 0.0)));
    let b = world.add_particle(Particle::new().with_position(Vector3::new(0.0, 2.0, 0.0)));

    let positions: Vec<_> = world.positions().collect();
    assert_eq!(
        positions,
        vec![(a, Vector3::new(1.0, 0.0, 0.0)), (b, Vector3::new(0.0, 2.0, 0.0))]
    );
}

#[test]
fn test_run_frame_matches_run_physics() {
    let build = || {
        let mut world = ParticleWorld::default();
        let p = world.add_particle(Particle::new().with_velocity(Vector3::new(1.0, 3.0, 0.0)));
        world.add_force(p, Arc::new(Gravity::default()));
        (world, p)
    };

    let (mut seconds, p) = build();
    let (mut wall_clock, q) = build();
    for _ in 0..10 {
        seconds.run_physics(0.02).unwrap();
        wall_clock.run_frame(Duration::from_millis(20)).unwrap();
    }
    assert_relative_eq!(
        seconds.particle(p).unwrap().position(),
        wall_clock.particle(q).unwrap().position(),
        epsilon = 1e-12
    );
}

#[test]
fn test_config_from_lookup_drives_world() {
    let config = WorldConfig::from_lookup(|name| match name {
        n if n == MAX_CONTACTS_VAR => Some("3".to_string()),
        n if n == ITERATIONS_VAR => Some("1".to_string()),
        _ => None,
    })
    .unwrap();
    assert_eq!(config.iterations, IterationPolicy::Fixed(1));

    let mut world = ParticleWorld::with_config(config).unwrap();
    for _ in 0..5 {
        world.add_particle(
            Particle::new()
                .with_position(Vector3::new(0.0, -1.0, 0.0))
                .with_velocity(Vector3::new(0.0, -1.0, 0.0)),
        );
    }
    world.add_contact_generator(GroundContacts::new(0.0, 0.0).unwrap());

    let stats = world.run_physics(0.01).unwrap();
    assert_eq!(stats.contacts_used, 3);
    assert!(stats.saturated);
    assert_eq!(stats.iterations_used, 1);
}
