use bomber_core::{
    ActorId, ActorSnapshot, ArenaLayout, CellCoord, Command, Direction, Event, Rules,
};
use bomber_system_ai::{Ai, Config};
use bomber_world::{self as world, query, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const HUMAN: ActorId = ActorId::new(0);
const AI: ActorId = ActorId::new(1);

fn configured(rows: &[&str]) -> (World, Vec<Event>) {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureArena {
            layout: ArenaLayout::parse(rows).expect("valid layout"),
            rules: Rules::default(),
            seed: 9,
        },
        &mut events,
    );
    (world, events)
}

fn snapshot(world: &World, actor: ActorId) -> ActorSnapshot {
    query::actor(world, actor).expect("actor exists")
}

fn decide(ai: &mut Ai, world: &World, events: &[Event], rng: &mut ChaCha8Rng) -> Vec<Command> {
    let actor = snapshot(world, AI);
    let human = snapshot(world, HUMAN);
    let hazards = query::hazard_view(world);
    let mut commands = Vec::new();
    ai.handle(events, &actor, Some(&human), &hazards, rng, &mut commands);
    commands
}

fn eager() -> Config {
    Config {
        decision_interval: 1,
        ..Config::default()
    }
}

#[test]
fn decisions_wait_for_the_interval() {
    let (world, events) = configured(&["#########", "#P.....E#", "#########"]);
    let mut ai = Ai::new(Config {
        decision_interval: 3,
        ..Config::default()
    });
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    assert!(decide(&mut ai, &world, &events, &mut rng).is_empty());
    assert!(decide(&mut ai, &world, &[], &mut rng).is_empty());
    assert_eq!(
        decide(&mut ai, &world, &[], &mut rng),
        vec![Command::StepActor {
            actor: AI,
            direction: Direction::West,
        }]
    );
    assert!(decide(&mut ai, &world, &[], &mut rng).is_empty());
}

#[test]
fn danger_overrides_the_interval() {
    let (mut world, _) = configured(&["#######", "#...#.#", "#P.E..#", "#######"]);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::StepActor {
            actor: HUMAN,
            direction: Direction::East,
        },
        &mut events,
    );
    world::apply(&mut world, Command::PlaceBomb { actor: HUMAN }, &mut events);
    assert!(query::is_dangerous(&world, CellCoord::new(3, 2)));

    let mut ai = Ai::default();
    let mut rng = ChaCha8Rng::seed_from_u64(2);

    assert_eq!(
        decide(&mut ai, &world, &[], &mut rng),
        vec![Command::StepActor {
            actor: AI,
            direction: Direction::North,
        }]
    );
}

#[test]
fn moving_actors_are_left_alone() {
    let (world, _) = configured(&["#########", "#P.....E#", "#########"]);
    let mut ai = Ai::new(eager());
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut actor = snapshot(&world, AI);
    actor.moving = true;
    let human = snapshot(&world, HUMAN);
    let mut commands = Vec::new();

    ai.handle(
        &[],
        &actor,
        Some(&human),
        &query::hazard_view(&world),
        &mut rng,
        &mut commands,
    );

    assert!(commands.is_empty());
}

#[test]
fn bombs_breakable_walls_and_steps_clear() {
    let (world, _) = configured(&["#######", "#P.#..#", "#...E+#", "#######"]);
    let mut ai = Ai::new(eager());
    let mut rng = ChaCha8Rng::seed_from_u64(4);

    assert_eq!(
        decide(&mut ai, &world, &[], &mut rng),
        vec![
            Command::PlaceBomb { actor: AI },
            Command::StepActor {
                actor: AI,
                direction: Direction::North,
            },
        ]
    );
}

#[test]
fn bombs_the_human_when_close() {
    let (world, _) = configured(&["#######", "#.....#", "#.P.E.#", "#.....#", "#######"]);
    let mut ai = Ai::new(eager());
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let commands = decide(&mut ai, &world, &[], &mut rng);

    assert_eq!(commands.first(), Some(&Command::PlaceBomb { actor: AI }));
    assert_eq!(commands.len(), 2);
}

#[test]
fn trapped_actor_withholds_the_bomb_and_stays_put() {
    let (world, _) = configured(&["#######", "#P#.E+#", "#######"]);
    let mut ai = Ai::new(eager());
    let mut rng = ChaCha8Rng::seed_from_u64(6);

    assert!(decide(&mut ai, &world, &[], &mut rng).is_empty());
}

#[test]
fn cooldown_blocks_a_second_bomb_until_restart() {
    let layout = ["#######", "#P.#..#", "#...E+#", "#######"];
    let (world, _) = configured(&layout);
    let mut ai = Ai::new(eager());
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let _ = decide(&mut ai, &world, &[], &mut rng);

    let (fresh, _) = configured(&layout);
    let retry = decide(&mut ai, &fresh, &[], &mut rng);
    assert!(!retry.contains(&Command::PlaceBomb { actor: AI }));
    assert_eq!(
        retry,
        vec![Command::StepActor {
            actor: AI,
            direction: Direction::West,
        }]
    );

    let after_restart = decide(&mut ai, &fresh, &[Event::MatchRestarted], &mut rng);
    assert_eq!(after_restart.first(), Some(&Command::PlaceBomb { actor: AI }));
}

#[test]
fn actor_at_capacity_chases_instead_of_bombing() {
    let (world, _) = configured(&["#######", "#P.#..#", "#...E+#", "#######"]);
    let mut ai = Ai::new(eager());
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let mut actor = snapshot(&world, AI);
    actor.active_bombs = actor.max_bombs;
    let human = snapshot(&world, HUMAN);
    let mut commands = Vec::new();

    ai.handle(
        &[],
        &actor,
        Some(&human),
        &query::hazard_view(&world),
        &mut rng,
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::StepActor {
            actor: AI,
            direction: Direction::West,
        }]
    );
}

#[test]
fn seeded_decisions_are_reproducible() {
    let (world, events) = configured(&[
        "#########",
        "#P......#",
        "#.......#",
        "#......E#",
        "#########",
    ]);
    let run = || {
        let mut ai = Ai::new(eager());
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        (0..8)
            .map(|_| decide(&mut ai, &world, &events, &mut rng))
            .collect::<Vec<_>>()
    };

    assert_eq!(run(), run());
}
