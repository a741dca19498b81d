//! End-to-end contact and recovery scenarios across modules.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use tendroid_core::contact::color_fade::distance_fade;
use tendroid_core::contact::velocity_fade::velocity_from_force;
use tendroid_core::contact::{filter_contacts, ActorPatterns, RawContact};
use tendroid_core::config::{ColorFadeSource, FadeConfig};
use tendroid_core::math::lerp_color;
use tendroid_core::proximity::ObstacleCylinder;
use tendroid_core::recovery::PairFrame;
use tendroid_core::{
    vec3, ContactEvent, PairKey, ProximityDetector, ProximityState, RecoveryConfig,
    RecoveryEvent, RecoveryOrchestrator, RecoverySupervisor, Vec3, Zone,
};

const DT: f32 = 1.0 / 60.0;

fn frame(key: PairKey, agent: Vec3) -> PairFrame {
    PairFrame { key, agent, surface_position: Vec3::zeros(), surface_normal: None }
}

#[test]
fn contact_zone_at_epsilon() {
    let detector = ProximityDetector::default();
    let obstacle = ObstacleCylinder::new(Vec3::zeros(), 0.06);
    let result = detector.detect(&vec3(0.10, 0.0, 0.0), &obstacle);
    assert!((result.surface_distance - 0.04).abs() < 1e-6);
    assert_eq!(result.zone, Zone::Contact);
    assert_eq!(result.zone.name(), "contact");
}

#[test]
fn proximity_samples_walk_the_state_machine() {
    let mut supervisor = RecoverySupervisor::new(RecoveryConfig::default()).unwrap();
    let key = PairKey::new(1, 2);
    let samples = [0.5, 0.04, 0.10, 0.20];
    let states: Vec<_> = samples
        .iter()
        .enumerate()
        .filter_map(|(i, d)| supervisor.observe(key, *d, i as f64 * 0.1))
        .map(|e| e.new_state)
        .collect();
    assert_eq!(
        states,
        vec![
            ProximityState::Approaching,
            ProximityState::Contact,
            ProximityState::Retreating,
            ProximityState::Recovered,
        ]
    );
    assert_eq!(supervisor.proximity().state(key), ProximityState::Recovered);
}

#[test]
fn impulse_velocity_from_force() {
    let v = velocity_from_force(&vec3(0.0, 10.0, 0.0), 1.0, DT);
    assert!(v.x.abs() < 1e-7);
    assert!((v.y - 1.0 / 6.0).abs() < 1e-6);
    assert!(v.z.abs() < 1e-7);
}

#[test]
fn distance_fade_halfway_color() {
    let fade = FadeConfig::distance(6.0, 15.0);
    let progress = distance_fade(10.5, &fade);
    assert!((progress - 0.5).abs() < 1e-6);

    let config = RecoveryConfig::default();
    let mid = lerp_color(config.color.shock_color, config.color.normal_color, progress);
    for i in 0..3 {
        let expected = (config.color.shock_color[i] + config.color.normal_color[i]) / 2.0;
        assert!((mid[i] - expected).abs() < 1e-6);
    }
}

#[test]
fn two_pairs_recover_independently() {
    let mut supervisor = RecoverySupervisor::new(RecoveryConfig::default()).unwrap();
    let near = PairKey::new(1, 10);
    let far = PairKey::new(2, 10);
    let hit = ContactEvent::new(Vec3::zeros(), vec3(1.0, 0.0, 0.0), 6.0, 0.0);
    supervisor.dispatch_contact(near, &hit);
    supervisor.dispatch_contact(far, &hit);
    assert_eq!(supervisor.active_count(), 2);

    // only `far` walks away
    let mut far_x = 0.04;
    for _ in 0..120 {
        far_x += 0.3 * DT;
        let frames = [frame(near, vec3(0.05, 0.0, 0.0)), frame(far, vec3(far_x, 0.0, 0.0))];
        supervisor.tick_all(&frames, DT);
    }

    let near_o = supervisor.orchestrator(near).unwrap();
    let far_o = supervisor.orchestrator(far).unwrap();
    assert!(near_o.is_active());
    assert!(near_o.is_input_locked());
    assert!(!far_o.is_active());
    assert_eq!(far_o.total_recoveries(), 1);
    assert_eq!(near_o.total_recoveries(), 0);
}

#[test]
fn filtered_contacts_drive_recovery() {
    let patterns = ActorPatterns::default();
    let raw = [
        RawContact {
            actor0: "/World/Tendroids/T0/segment_3",
            actor1: "/World/Creature/body",
            point: Vec3::zeros(),
            normal: vec3(-1.0, 0.0, 0.0),
            impulse: 6.0,
            separation: -0.002,
        },
        RawContact {
            actor0: "/World/Ground",
            actor1: "/World/Creature/body",
            point: Vec3::zeros(),
            normal: vec3(0.0, 1.0, 0.0),
            impulse: 50.0,
            separation: 0.0,
        },
    ];
    let contacts = filter_contacts(&raw, &patterns);
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].agent_path, "/World/Creature/body");
    // flipped to point from the obstacle toward the agent
    assert!(contacts[0].contact_normal.x > 0.0);

    let mut orchestrator = RecoveryOrchestrator::new(RecoveryConfig::default()).unwrap();
    orchestrator.handle_contact_event(&contacts[0].event());
    assert!(orchestrator.is_input_locked());
    let step = orchestrator.update(vec3(0.1, 0.0, 0.0), Vec3::zeros(), DT, None);
    assert!(step.x > 0.0);
    assert!(matches!(
        orchestrator.pending_events().first(),
        Some(RecoveryEvent::ContactHandled { total_contacts: 1, .. })
    ));
}

#[test]
fn fade_strategy_source_recovers() {
    let mut config = RecoveryConfig::default();
    config.orchestrator.color_fade_source = ColorFadeSource::FadeStrategy;
    let mut orchestrator = RecoveryOrchestrator::new(config).unwrap();
    orchestrator.handle_contact(
        Vec3::zeros(),
        vec3(1.0, 0.0, 0.0),
        vec3(0.04, 0.0, 0.0),
        Vec3::zeros(),
        0.0,
    );

    let mut agent = vec3(0.04, 0.0, 0.0);
    let mut frames = 0;
    while orchestrator.is_active() && frames < 600 {
        agent.x += 0.3 * DT;
        orchestrator.update(agent, Vec3::zeros(), DT, None);
        frames += 1;
    }
    assert!(!orchestrator.is_active(), "{}", orchestrator.status_summary());
    assert_eq!(orchestrator.current_color(), config.color.normal_color);
}

#[test]
fn seeded_random_walk_keeps_invariants() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x7e4d);
    let mut orchestrator = RecoveryOrchestrator::new(RecoveryConfig::default()).unwrap();
    let normal = orchestrator.config().color.normal_color;
    let mut agent = vec3(0.3, 0.0, 0.0);

    for _ in 0..5_000 {
        let contacted = rng.gen_bool(0.01);
        if contacted {
            orchestrator.handle_contact(
                Vec3::zeros(),
                vec3(1.0, 0.0, 0.0),
                agent,
                vec3(rng.gen_range(0.0..20.0), 0.0, 0.0),
                rng.gen_range(0.0..0.02),
            );
        }
        let speed_before = orchestrator.state().velocity.speed();
        agent.x = (agent.x + rng.gen_range(-0.01..0.012)).clamp(0.0, 0.5);
        let settle = if rng.gen_bool(0.8) { Vec3::zeros() } else { vec3(0.01, 0.0, 0.0) };
        let step = orchestrator.update(agent, settle, DT, None);
        agent += step;

        let state = orchestrator.state();
        assert_eq!(orchestrator.is_active(), orchestrator.is_input_locked());
        assert!(state.total_recoveries <= state.total_contacts);
        assert!(state.velocity.speed() <= speed_before + 1e-6);
        if !orchestrator.is_active() {
            assert_eq!(orchestrator.current_color(), normal);
        }
        orchestrator.drain_events();
    }
    assert!(orchestrator.total_contacts() > 0);
}
