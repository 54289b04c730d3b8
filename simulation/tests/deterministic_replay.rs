use brawl_core::{AgentId, BattleConfig, Command, Event, FrameTrace};
use brawl_simulation::Simulation;
use brawl_system_collision::CollisionDetection;
use brawl_system_growth::GrowthController;
use brawl_world::{self as world, query, World};

fn replay(participants: usize, config: BattleConfig) -> (FrameTrace, Vec<Event>) {
    let mut stepped =
        Simulation::new(participants, config.clone()).expect("valid configuration");
    let mut log = Vec::new();
    while !stepped.is_terminated() {
        log.extend(stepped.step());
    }

    let mut collected = Simulation::new(participants, config).expect("valid configuration");
    (collected.run(), log)
}

fn replay_config(seed: u64) -> BattleConfig {
    BattleConfig {
        hp_default: 40.0,
        max_frames: Some(150),
        seed,
        ..BattleConfig::default()
    }
}

#[test]
fn deterministic_replay_produces_identical_traces() {
    let (first_trace, first_log) = replay(400, replay_config(17));
    let (second_trace, second_log) = replay(400, replay_config(17));

    assert_eq!(first_trace, second_trace, "trace diverged between runs");
    assert_eq!(first_log, second_log, "event log diverged between runs");

    let (reseeded, _) = replay(400, replay_config(18));
    assert_ne!(first_trace, reseeded);
}

#[test]
fn parallel_detection_does_not_change_the_outcome() {
    let sequential = BattleConfig {
        parallel_threshold: usize::MAX,
        ..replay_config(5)
    };
    let parallel = BattleConfig {
        parallel_threshold: 0,
        ..replay_config(5)
    };

    let (sequential_trace, _) = replay(800, sequential);
    let (parallel_trace, _) = replay(800, parallel);

    assert_eq!(sequential_trace, parallel_trace);
}

#[test]
fn snapshots_are_independent_frames() {
    let mut simulation = Simulation::new(250, replay_config(3)).expect("valid configuration");
    let trace = simulation.run();

    let first = trace.get(0).expect("frame 0 captured");
    let tenth = trace.get(10).expect("frame 10 captured");
    assert_eq!(first.frame, 0);
    assert_eq!(tenth.frame, 10);
    assert_ne!(first.positions, tenth.positions);
    assert_eq!(first.positions.len(), 250);
}

#[test]
fn frame_invariants_hold_throughout_a_battle() {
    let config = BattleConfig {
        hp_default: 25.0,
        max_frames: Some(600),
        ..BattleConfig::default()
    };
    let participants = 300_usize;
    let mut world = World::new(config.clone(), participants).expect("valid configuration");
    let mut collision = CollisionDetection::new(&config);
    let mut growth = GrowthController::new(&config.growth_thresholds, participants as u32);
    let mut commands = Vec::new();
    let mut events = Vec::new();
    let mut previous_alive = query::alive_count(&world);
    let mut previous_radii = radii(&world, participants);

    while query::alive_count(&world) > 1 && query::frame(&world) < config.frame_budget() {
        world::apply(&mut world, Command::Integrate, &mut events);
        assert_within_walls(&world, &config, participants);

        collision.handle(query::agent_view(&world), &mut commands);
        apply_all(&mut world, &mut commands, &mut events);
        growth.handle(query::alive_count(&world), &mut commands);
        apply_all(&mut world, &mut commands, &mut events);
        world::apply(&mut world, Command::CompleteFrame, &mut events);

        let snapshot = query::snapshot(&world);
        for index in 0..participants {
            assert_eq!(snapshot.alive[index], snapshot.hp[index] > 0.0);
            assert!(snapshot.radii[index] >= previous_radii[index]);
            assert!(snapshot.radii[index] <= config.max_radius() + 1e-4);
        }
        assert!(snapshot.alive_count <= previous_alive);

        previous_alive = snapshot.alive_count;
        previous_radii = snapshot.radii;
        events.clear();
    }

    assert!(query::frame(&world) <= config.frame_budget());
}

fn apply_all(world: &mut World, commands: &mut Vec<Command>, events: &mut Vec<Event>) {
    for command in commands.drain(..) {
        world::apply(world, command, events);
    }
}

fn radii(world: &World, participants: usize) -> Vec<f32> {
    (0..participants)
        .map(|index| {
            query::agent(world, AgentId::new(index as u32))
                .expect("agent exists")
                .radius
        })
        .collect()
}

fn assert_within_walls(world: &World, config: &BattleConfig, participants: usize) {
    let margin = config.base_radius;
    for index in 0..participants {
        let state = query::agent(world, AgentId::new(index as u32)).expect("agent exists");
        if !state.alive {
            continue;
        }
        assert!(state.position.x >= margin && state.position.x <= config.arena_width - margin);
        assert!(state.position.y >= margin && state.position.y <= config.arena_height - margin);
    }
}
