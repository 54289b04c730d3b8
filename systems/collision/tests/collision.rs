use std::collections::BTreeSet;

use brawl_core::{AgentId, AgentView, BattleConfig, Command, Contact, Vec2};
use brawl_system_collision::CollisionDetection;
use brawl_world::{query, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

struct Scatter {
    positions: Vec<Vec2>,
    radii: Vec<f32>,
    alive: Vec<bool>,
}

impl Scatter {
    fn random(count: usize, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut scatter = Self {
            positions: Vec::with_capacity(count),
            radii: Vec::with_capacity(count),
            alive: Vec::with_capacity(count),
        };
        for _ in 0..count {
            scatter.positions.push(Vec2::new(
                rng.gen_range(0.0..1_000.0),
                rng.gen_range(0.0..1_000.0),
            ));
            scatter.radii.push(rng.gen_range(4.0..40.0));
            scatter.alive.push(rng.gen_bool(0.85));
        }
        scatter
    }

    fn view(&self) -> AgentView<'_> {
        AgentView::new(&self.positions, &self.radii, &self.alive)
    }
}

fn brute_force(view: AgentView<'_>) -> BTreeSet<(u32, u32)> {
    let live: Vec<usize> = view.live_indices().collect();
    let mut pairs = BTreeSet::new();
    for (offset, &first) in live.iter().enumerate() {
        for &second in &live[offset + 1..] {
            let distance = view.positions()[first].distance(view.positions()[second]);
            if distance < view.radii()[first] + view.radii()[second] {
                let _ = pairs.insert((first as u32, second as u32));
            }
        }
    }
    pairs
}

fn pair_set(contacts: &[Contact]) -> BTreeSet<(u32, u32)> {
    contacts
        .iter()
        .map(|contact| (contact.first.get(), contact.second.get()))
        .collect()
}

fn detector(parallel_threshold: usize) -> CollisionDetection {
    CollisionDetection::new(&BattleConfig {
        parallel_threshold,
        ..BattleConfig::default()
    })
}

#[test]
fn grid_matches_brute_force_search() {
    let scatter = Scatter::random(1_500, 7);
    let mut detection = detector(usize::MAX);

    let contacts = detection.detect(scatter.view()).to_vec();

    assert!(!contacts.is_empty());
    assert_eq!(pair_set(&contacts), brute_force(scatter.view()));
}

#[test]
fn pairs_are_unique_and_ordered() {
    let scatter = Scatter::random(2_000, 21);
    let mut detection = detector(usize::MAX);

    let contacts = detection.detect(scatter.view()).to_vec();

    assert!(contacts.iter().all(|contact| contact.first < contact.second));
    assert_eq!(pair_set(&contacts).len(), contacts.len());
    assert!(contacts
        .iter()
        .all(|contact| scatter.alive[contact.first.index()] && scatter.alive[contact.second.index()]));
}

#[test]
fn parallel_scan_matches_sequential_scan() {
    let scatter = Scatter::random(3_000, 99);
    let mut sequential = detector(usize::MAX);
    let mut parallel = detector(0);

    let expected = sequential.detect(scatter.view()).to_vec();
    let actual = parallel.detect(scatter.view()).to_vec();

    assert_eq!(expected, actual);
}

#[test]
fn oversized_agents_are_found_across_cells() {
    let positions = vec![Vec2::new(40.0, 40.0), Vec2::new(160.0, 40.0)];
    let radii = vec![80.0, 45.0];
    let alive = vec![true, true];
    let view = AgentView::new(&positions, &radii, &alive);
    let mut detection = detector(usize::MAX);

    let contacts = detection.detect(view).to_vec();

    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].first, AgentId::new(0));
    assert_eq!(contacts[0].second, AgentId::new(1));
    assert!((contacts[0].distance - 120.0).abs() < 1e-4);
    assert!(detection.cell_edge() >= 160.0);
}

#[test]
fn agents_outside_the_arena_still_collide() {
    let positions = vec![Vec2::new(-30.0, 500.0), Vec2::new(-12.0, 505.0)];
    let radii = vec![10.0, 10.0];
    let alive = vec![true, true];
    let view = AgentView::new(&positions, &radii, &alive);
    let mut detection = detector(usize::MAX);

    assert_eq!(detection.detect(view).len(), 1);
}

#[test]
fn touching_agents_do_not_collide() {
    let positions = vec![Vec2::new(100.0, 100.0), Vec2::new(120.0, 100.0)];
    let radii = vec![10.0, 10.0];
    let alive = vec![true, true];
    let view = AgentView::new(&positions, &radii, &alive);
    let mut detection = detector(usize::MAX);

    assert!(detection.detect(view).is_empty());
}

#[test]
fn fewer_than_two_living_agents_emit_nothing() {
    let positions = vec![Vec2::new(100.0, 100.0), Vec2::new(101.0, 100.0)];
    let radii = vec![10.0, 10.0];
    let alive = vec![true, false];
    let view = AgentView::new(&positions, &radii, &alive);
    let mut detection = detector(usize::MAX);
    let mut commands = Vec::new();

    detection.handle(view, &mut commands);

    assert!(commands.is_empty());
}

#[test]
fn handle_emits_single_resolution_command() {
    let world = World::new(BattleConfig::default(), 2_000).expect("valid configuration");
    let view = query::agent_view(&world);
    let mut detection = CollisionDetection::new(query::config(&world));
    let mut commands = Vec::new();

    detection.handle(view, &mut commands);

    assert_eq!(commands.len(), 1);
    let Command::ResolveContacts { contacts } = &commands[0] else {
        panic!("unexpected command: {:?}", commands[0]);
    };
    assert_eq!(pair_set(contacts), brute_force(view));
}

#[test]
fn repeated_handles_emit_identical_commands() {
    let scatter = Scatter::random(800, 4);
    let mut detection = detector(usize::MAX);
    let mut first = Vec::new();
    let mut second = Vec::new();

    detection.handle(scatter.view(), &mut first);
    detection.handle(scatter.view(), &mut second);

    assert_eq!(first.len(), 1);
    assert_eq!(first, second);
}

#[test]
fn vast_arena_is_scanned_with_a_bounded_grid() {
    let positions = vec![
        Vec2::new(5.0e6, 5.0e6),
        Vec2::new(5.0e6 + 12.0, 5.0e6),
        Vec2::new(1.0e3, 9.0e6),
    ];
    let radii = vec![10.0; 3];
    let alive = vec![true; 3];
    let view = AgentView::new(&positions, &radii, &alive);
    let mut detection = CollisionDetection::new(&BattleConfig {
        arena_width: 1.0e7,
        arena_height: 1.0e7,
        ..BattleConfig::default()
    });

    let contacts = detection.detect(view).to_vec();

    assert_eq!(pair_set(&contacts), brute_force(view));
    assert_eq!(contacts.len(), 1);
    assert!(detection.cell_edge() >= 1.0e7 / 32.0 - 1.0);
}
