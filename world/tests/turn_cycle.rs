use std::{cell::RefCell, rc::Rc};

use rol_core::{CellCoord, CellStatus, Command, Event, Facing, Key, Role, TurnPhase};
use rol_world::{self as world, query, Actor, GameConfig, GameObject, World};

fn actor(name: &str, x: i32, y: i32, role: Role, live: u32) -> Actor {
    Actor::new(GameObject::new(name, CellCoord::new(x, y)), role, live)
}

fn step_until(world: &mut World, phase: TurnPhase, limit: usize, events: &mut Vec<Event>) -> usize {
    for step in 1..=limit {
        world::update(world, events);
        if query::turn_phase(world) == phase {
            return step;
        }
    }
    panic!("phase {phase:?} not reached within {limit} updates");
}

fn phase_changes(events: &[Event]) -> Vec<TurnPhase> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::TurnPhaseChanged { to, .. } => Some(*to),
            _ => None,
        })
        .collect()
}

#[test]
fn unstarted_session_stays_idle() {
    let mut world = World::new();
    let mut events = Vec::new();
    world::update(&mut world, &mut events);
    assert_eq!(query::turn_phase(&world), TurnPhase::None);
    assert!(events.is_empty());
}

#[test]
fn rejected_move_off_the_grid_still_ends_the_player_turn() {
    let mut world = World::new();
    let mut events = Vec::new();
    let hero = world
        .register_actor(actor("Hero", 0, 0, Role::Player, 3), &mut events)
        .expect("hero");
    let _ = world
        .register_actor(actor("Goblin", 19, 19, Role::Enemy, 1), &mut events)
        .expect("goblin");

    world.start(&mut events);
    world::update(&mut world, &mut events);
    assert_eq!(query::turn_phase(&world), TurnPhase::PlayerStart);

    world.key_down(Key::Up.code());
    events.clear();
    world::update(&mut world, &mut events);

    let player = query::player(&world).expect("player registered");
    assert_eq!(player.cell, CellCoord::new(0, 0));
    assert_eq!(player.facing, Facing::Up);
    assert_eq!(query::turn_phase(&world), TurnPhase::EnemyStart);
    assert!(events.contains(&Event::MoveRejected {
        entity: hero,
        target: CellCoord::new(0, -1),
        status: CellStatus::OutOfBounds,
    }));
    assert!(!query::is_key_down(&world, Key::Up.code()));
}

#[test]
fn player_waits_without_input() {
    let mut world = World::new();
    let mut events = Vec::new();
    let _ = world
        .register_actor(actor("Hero", 4, 4, Role::Player, 3), &mut events)
        .expect("hero");
    let _ = world
        .register_actor(actor("Goblin", 19, 19, Role::Enemy, 1), &mut events)
        .expect("goblin");
    world.start(&mut events);

    for _ in 0..5 {
        world::update(&mut world, &mut events);
    }
    assert_eq!(query::turn_phase(&world), TurnPhase::PlayerStart);
    assert_eq!(
        query::player(&world).map(|player| player.cell),
        Some(CellCoord::new(4, 4))
    );
}

#[test]
fn held_movement_keys_combine_into_one_diagonal_step() {
    let mut world = World::new();
    let mut events = Vec::new();
    let _ = world
        .register_actor(actor("Hero", 4, 4, Role::Player, 3), &mut events)
        .expect("hero");
    let _ = world
        .register_actor(actor("Goblin", 19, 19, Role::Enemy, 1), &mut events)
        .expect("goblin");
    world.start(&mut events);
    world::update(&mut world, &mut events);

    world.key_down(Key::Down.code());
    world.key_down(Key::Right.code());
    world::update(&mut world, &mut events);

    let player = query::player(&world).expect("player registered");
    assert_eq!(player.cell, CellCoord::new(5, 5));
    assert_eq!(player.facing, Facing::Right);
}

#[test]
fn blocked_move_is_a_full_no_op() {
    let mut world = World::new();
    let mut events = Vec::new();
    let hero = world
        .register_actor(actor("Hero", 9, 10, Role::Player, 3), &mut events)
        .expect("hero");
    let pillar = world
        .register_actor(actor("Pillar", 10, 10, Role::StaticObject, 1), &mut events)
        .expect("pillar");
    let _ = world
        .register_actor(actor("Goblin", 19, 19, Role::Enemy, 1), &mut events)
        .expect("goblin");
    world.start(&mut events);
    world::update(&mut world, &mut events);

    world.key_down(Key::Right.code());
    world::update(&mut world, &mut events);

    let grid = query::grid(&world);
    assert_eq!(grid.occupant(CellCoord::new(9, 10)), Some(hero));
    assert_eq!(grid.occupant(CellCoord::new(10, 10)), Some(pillar));
    assert_eq!(
        query::game_object(&world, hero).map(GameObject::cell),
        Some(CellCoord::new(9, 10))
    );
    assert_eq!(query::turn_phase(&world), TurnPhase::EnemyStart);
}

#[test]
fn turn_without_player_or_actions_closes_the_cycle() {
    let mut world = World::new();
    let mut events = Vec::new();
    let _ = world
        .register_actor(actor("Goblin", 19, 19, Role::Enemy, 1), &mut events)
        .expect("goblin");
    world.start(&mut events);
    events.clear();

    let steps = step_until(&mut world, TurnPhase::Start, 16, &mut events);
    assert_eq!(steps, 6);
    assert_eq!(
        phase_changes(&events),
        vec![
            TurnPhase::PlayerStart,
            TurnPhase::EnemyStart,
            TurnPhase::EnemyAct,
            TurnPhase::EnemyEnd,
            TurnPhase::End,
            TurnPhase::Start,
        ]
    );
}

#[test]
fn start_spawns_an_enemy_when_the_roster_is_empty() {
    let mut world = World::new();
    let mut events = Vec::new();
    world.start(&mut events);
    world::update(&mut world, &mut events);

    let enemies = query::enemy_view(&world);
    assert_eq!(enemies.len(), 1);
    let enemy = enemies.iter().next().expect("enemy spawned");
    assert!(query::grid(&world).contains(enemy.cell));
    assert_eq!(query::grid(&world).occupant(enemy.cell), Some(enemy.id));
    assert_eq!(query::turn_phase(&world), TurnPhase::PlayerStart);
}

#[test]
fn spawning_gives_up_on_a_full_grid() {
    let config = GameConfig::from_toml_str(
        "spawn_attempts = 8\npillars = []\n[screen]\ncolumns = 1\nrows = 1\n",
    )
    .expect("config");
    let mut world = World::with_config(config).expect("valid config");
    let mut events = Vec::new();
    let _ = world
        .register_actor(actor("Hero", 0, 0, Role::Player, 3), &mut events)
        .expect("hero");
    world.start(&mut events);
    events.clear();

    world::update(&mut world, &mut events);

    assert!(events.contains(&Event::SpawnFailed { attempts: 8 }));
    assert!(query::enemy_view(&world).is_empty());
    assert_eq!(query::turn_phase(&world), TurnPhase::PlayerStart);
}

#[test]
fn fire_key_hands_control_to_player_actions_and_skips_the_move() {
    let mut world = World::new();
    let mut events = Vec::new();
    let hero = world
        .register_actor(actor("Hero", 0, 0, Role::Player, 3), &mut events)
        .expect("hero");
    let _ = world
        .register_actor(actor("Goblin", 19, 19, Role::Enemy, 1), &mut events)
        .expect("goblin");

    world.register_key_action(Key::Fire, |_: &World, out: &mut Vec<Command>| {
        out.push(Command::SetTurnPhase {
            phase: TurnPhase::PlayerAct,
        });
    });
    world.register_phase_action(TurnPhase::PlayerAct, |world: &World, out: &mut Vec<Command>| {
        if let Some(player) = query::player(world) {
            out.push(Command::Fire {
                owner: player.id,
                facing: player.facing,
            });
        }
    });
    world.register_phase_action(TurnPhase::PlayerWaitEnd, |_: &World, out: &mut Vec<Command>| {
        out.push(Command::AdvanceAmmo);
    });

    world.start(&mut events);
    world::update(&mut world, &mut events);
    world.key_down(Key::Right.code());
    world.key_down(Key::Fire.code());
    world::update(&mut world, &mut events);

    assert_eq!(query::turn_phase(&world), TurnPhase::PlayerAct);
    let player = query::player(&world).expect("player");
    assert_eq!(player.cell, CellCoord::new(0, 0));
    assert_eq!(player.facing, Facing::Right);

    world::update(&mut world, &mut events);
    assert_eq!(query::turn_phase(&world), TurnPhase::PlayerWaitEnd);
    let ammo = query::ammo_view(&world);
    let shot = ammo.iter().next().expect("ammo in flight");
    assert_eq!(shot.cell, CellCoord::new(1, 0));
    assert_eq!(shot.owner, hero);

    let steps = step_until(&mut world, TurnPhase::PlayerEnd, 64, &mut events);
    assert_eq!(steps, 19);
    assert!(query::ammo_view(&world).is_empty());
    assert_eq!(query::player(&world).map(|p| p.cell), Some(CellCoord::new(0, 0)));
}

#[test]
fn wait_phase_without_actions_does_not_stall() {
    let mut world = World::new();
    let mut events = Vec::new();
    let hero = world
        .register_actor(actor("Hero", 0, 0, Role::Player, 3), &mut events)
        .expect("hero");
    let _ = world
        .register_actor(actor("Goblin", 19, 19, Role::Enemy, 1), &mut events)
        .expect("goblin");
    world.register_phase_action(TurnPhase::EnemyAct, move |_: &World, out: &mut Vec<Command>| {
        out.push(Command::Fire {
            owner: hero,
            facing: Facing::Down,
        });
    });
    world.start(&mut events);
    world::update(&mut world, &mut events);
    world.key_down(Key::Right.code());

    let steps = step_until(&mut world, TurnPhase::EnemyEnd, 16, &mut events);
    assert_eq!(steps, 4);
    assert_eq!(query::ammo_view(&world).iter().count(), 1);
}

#[test]
fn actions_observe_commands_of_earlier_actions() {
    let mut world = World::new();
    let mut events = Vec::new();
    let hero = world
        .register_actor(actor("Hero", 5, 5, Role::Player, 3), &mut events)
        .expect("hero");
    let observed = Rc::new(RefCell::new(Vec::new()));

    world.register_phase_action(TurnPhase::EnemyAct, move |_: &World, out: &mut Vec<Command>| {
        out.push(Command::StepEntity {
            entity: hero,
            target: CellCoord::new(5, 6),
        });
    });
    let seen = Rc::clone(&observed);
    world.register_phase_action(TurnPhase::EnemyAct, move |world: &World, _: &mut Vec<Command>| {
        if let Some(player) = query::player(world) {
            seen.borrow_mut().push(player.cell);
        }
    });

    let _ = world
        .register_actor(actor("Goblin", 19, 19, Role::Enemy, 1), &mut events)
        .expect("goblin");
    world.start(&mut events);
    world.key_down(Key::Left.code());
    let _ = step_until(&mut world, TurnPhase::EnemyEnd, 16, &mut events);

    assert_eq!(observed.borrow().as_slice(), &[CellCoord::new(5, 6)]);
}

#[test]
fn explicit_phase_change_wins_over_fall_through() {
    let mut world = World::new();
    let mut events = Vec::new();
    let _ = world
        .register_actor(actor("Goblin", 19, 19, Role::Enemy, 1), &mut events)
        .expect("goblin");
    world.register_phase_action(TurnPhase::EnemyAct, |_: &World, out: &mut Vec<Command>| {
        out.push(Command::SetTurnPhase {
            phase: TurnPhase::End,
        });
    });
    world.start(&mut events);

    let _ = step_until(&mut world, TurnPhase::EnemyAct, 8, &mut events);
    events.clear();
    world::update(&mut world, &mut events);

    assert_eq!(query::turn_phase(&world), TurnPhase::End);
    assert_eq!(phase_changes(&events), vec![TurnPhase::End]);
}
