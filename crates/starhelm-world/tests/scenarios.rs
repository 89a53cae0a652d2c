use glam::Quat;
use proptest::prelude::*;
use starhelm_core::{iso, BodyId, EngineParams, Vec3, Velocity};
use starhelm_flight::{FlightControls, PilotMode};
use starhelm_geom::Shape;
use starhelm_world::{LedgerEvent, World, WorldBuilder};

const DT: f32 = 0.02;

fn cruiser(world: &mut World, at: Vec3, rot: Quat, dest: Vec3) -> BodyId {
    world.add_ship(iso(at, rot), Velocity::default(), EngineParams::default(), FlightControls::new(dest))
}

#[test]
fn lone_ship_reaches_cruise_speed_on_heading() {
    let mut world = WorldBuilder::new().build();
    let ship = cruiser(&mut world, Vec3::ZERO, Quat::IDENTITY, Vec3::new(0.0, 0.0, 100.0));

    for _ in 0..200 {
        world.step(DT);
        assert!(world.get_body_vel(ship).lin.length() <= 10.0 + 1e-4);
    }
    let v = world.get_body_vel(ship);
    assert!((v.lin.z - 10.0).abs() < 1e-3);
    assert_eq!(v.ang, Vec3::ZERO);
    let p = world.get_body_pose(ship).pos;
    assert!(p.x.abs() < 1e-6 && p.y.abs() < 1e-6 && p.z > 20.0);
}

#[test]
fn overlapping_rock_is_logged_with_backward_push() {
    let mut world = WorldBuilder::new().build();
    let ship = cruiser(&mut world, Vec3::ZERO, Quat::IDENTITY, Vec3::new(0.0, 0.0, 100.0));
    let rock = world.add_obstacle(
        iso(Vec3::new(0.0, 0.0, 5.0), Quat::IDENTITY),
        Velocity::default(),
        Shape::Sphere { r: 4.5 },
        false,
    );

    let stats = world.step(DT);
    assert_eq!(stats.possible_collisions, 1);
    assert_eq!(stats.colliders, 2);

    let mut saw_hit = false;
    let mut push = None;
    for e in world.ledger().iter() {
        match e {
            LedgerEvent::PossibleCollision { ship: s, obstacle, time_to_impact, .. } if *s == ship => {
                assert_eq!(*obstacle, rock);
                assert_eq!(*time_to_impact, 0.0);
                saw_hit = true;
            }
            LedgerEvent::Avoidance { ship: s, force, .. } if *s == ship => push = Some(*force),
            _ => {}
        }
    }
    assert!(saw_hit);
    let push = push.expect("avoidance event");
    assert!(push.z < 0.0);
    assert!(push.x.abs() < 1e-6 && push.y.abs() < 1e-6);
}

#[test]
fn box_obstacle_uses_enclosing_sphere() {
    let mut world = WorldBuilder::new().build();
    cruiser(&mut world, Vec3::ZERO, Quat::IDENTITY, Vec3::new(0.0, 0.0, 100.0));
    // corner distance sqrt(3) * 2 ~ 3.46; with the ship's 1.0 that overlaps at 4.0
    world.add_obstacle(
        iso(Vec3::new(0.0, 0.0, 4.0), Quat::IDENTITY),
        Velocity::default(),
        Shape::Box { hx: 2.0, hy: 2.0, hz: 2.0 },
        false,
    );
    assert_eq!(world.step(DT).possible_collisions, 1);
}

#[test]
fn teleported_ship_sees_rock_it_was_far_from() {
    let mut world = WorldBuilder::new().build();
    let ship = cruiser(&mut world, Vec3::ZERO, Quat::IDENTITY, Vec3::new(0.0, 0.0, 100.0));
    let rock = world.add_obstacle(
        iso(Vec3::new(500.0, 0.0, 0.0), Quat::IDENTITY),
        Velocity::default(),
        Shape::Box { hx: 1.0, hy: 1.0, hz: 1.0 },
        false,
    );
    assert_eq!(world.ship_ids().collect::<Vec<_>>(), vec![ship]);
    let shapes: Vec<_> = world.colliders().iter().map(|c| (c.body, c.shape)).collect();
    assert_eq!(shapes, vec![
        (ship, Shape::Sphere { r: EngineParams::default().radius }),
        (rock, Shape::Box { hx: 1.0, hy: 1.0, hz: 1.0 }),
    ]);

    assert_eq!(world.step(DT).possible_collisions, 0);
    world.set_body_pose(ship, iso(Vec3::new(500.0, 0.0, -2.0), Quat::IDENTITY));
    assert_eq!(world.step(DT).possible_collisions, 1);
    assert_eq!(world.tick_index(), 2);
}

#[test]
fn static_obstacles_ignore_initial_velocity() {
    let mut world = WorldBuilder::new().build();
    let rock = world.add_obstacle(
        iso(Vec3::new(3.0, 0.0, 0.0), Quat::IDENTITY),
        Velocity { lin: Vec3::new(1.0, 0.0, 0.0), ang: Vec3::ZERO },
        Shape::Capsule { r: 0.5, hh: 1.0 },
        false,
    );
    for _ in 0..10 { world.step(DT); }
    assert_eq!(world.get_body_pose(rock).pos, Vec3::new(3.0, 0.0, 0.0));
}

#[test]
fn head_on_pair_sees_each_other() {
    let mut world = WorldBuilder::new().build();
    let a = cruiser(&mut world, Vec3::ZERO, Quat::IDENTITY, Vec3::new(0.0, 0.0, 200.0));
    let b = cruiser(
        &mut world,
        Vec3::new(0.0, 0.0, 40.0),
        Quat::from_rotation_y(core::f32::consts::PI),
        Vec3::new(0.0, 0.0, -160.0),
    );

    let mut first_seen = None;
    for n in 0..150 {
        let stats = world.step(DT);
        if stats.possible_collisions > 0 && first_seen.is_none() {
            first_seen = Some(n);
        }
    }
    assert!(first_seen.is_some(), "ships never predicted a collision");
    let seen: Vec<_> = world
        .ledger()
        .iter()
        .filter_map(|e| match e {
            LedgerEvent::PossibleCollision { ship, obstacle, .. } => Some((*ship, *obstacle)),
            _ => None,
        })
        .collect();
    assert!(seen.contains(&(a, b)));
    assert!(seen.contains(&(b, a)));
    assert!(seen.iter().all(|(s, o)| s != o));
}

#[test]
fn identical_worlds_hash_identically() {
    fn build() -> World {
        let mut w = WorldBuilder::new().build();
        cruiser(&mut w, Vec3::ZERO, Quat::from_rotation_y(0.4), Vec3::new(10.0, 5.0, 80.0));
        cruiser(&mut w, Vec3::new(5.0, 0.0, 30.0), Quat::IDENTITY, Vec3::new(-20.0, 0.0, -50.0));
        w.add_obstacle(
            iso(Vec3::new(2.0, 0.0, 20.0), Quat::IDENTITY),
            Velocity { lin: Vec3::new(0.0, 0.0, -1.0), ang: Vec3::ZERO },
            Shape::Sphere { r: 2.0 },
            true,
        );
        w
    }
    let mut a = build();
    let mut b = build();
    for _ in 0..300 {
        a.step(DT);
        b.step(DT);
    }
    assert_eq!(a.step_hash(), b.step_hash());

    b.step(DT);
    assert_ne!(a.step_hash(), b.step_hash());
}

#[test]
fn controls_can_switch_to_manual_midflight() {
    let mut world = WorldBuilder::new().record_ledger(false).build();
    let ship = cruiser(&mut world, Vec3::ZERO, Quat::IDENTITY, Vec3::new(0.0, 0.0, 100.0));
    for _ in 0..20 { world.step(DT); }
    {
        let c = world.controls_mut(ship).expect("ship controls");
        c.mode = PilotMode::Manual;
        c.set_stick(0.0, 1.0, 0.0);
    }
    for _ in 0..200 { world.step(DT); }
    let pose = world.get_body_pose(ship);
    let local = pose.to_local(world.get_body_vel(ship).ang);
    assert!((local.y - 90f32.to_radians()).abs() < 1e-3);
    assert!(world.ledger().is_empty());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn caps_hold_among_random_rocks(
        rocks in proptest::collection::vec((-15.0f32..15.0, -15.0f32..15.0, 5.0f32..60.0, 0.5f32..3.0), 0..6),
        dx in -40.0f32..40.0,
        dy in -40.0f32..40.0,
    ) {
        let mut world = WorldBuilder::new().record_ledger(false).build();
        let ship = cruiser(&mut world, Vec3::ZERO, Quat::IDENTITY, Vec3::new(dx, dy, 80.0));
        for (x, y, z, r) in rocks {
            world.add_obstacle(iso(Vec3::new(x, y, z), Quat::IDENTITY), Velocity::default(), Shape::Sphere { r }, false);
        }
        let cap = 90f32.to_radians();
        for _ in 0..250 {
            world.step(DT);
            let v = world.get_body_vel(ship);
            prop_assert!(v.lin.is_finite() && v.ang.is_finite());
            prop_assert!(v.lin.length() <= 10.0 + 1e-3);
            let local = world.get_body_pose(ship).to_local(v.ang);
            prop_assert!(local.abs().max_element() <= cap + 1e-3);
        }
    }
}
