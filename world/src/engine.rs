//! Per-tick turn-phase state machine.

use rol_core::{CellCoord, CellTarget, EntityId, Event, Key, TurnPhase};

use crate::World;

/// Performs exactly one phase step of the session.
///
/// Sessions that were never started stay idle. Every phase change is
/// reported through [`Event::TurnPhaseChanged`].
pub fn update(world: &mut World, out_events: &mut Vec<Event>) {
    match world.turn_phase {
        TurnPhase::None => {}
        TurnPhase::Start => {
            if world.enemies.is_empty() {
                if let Err(error) = world.spawn_enemy(out_events) {
                    tracing::warn!("Turn starts without an enemy: {}", error);
                }
            }
            world.set_phase(TurnPhase::PlayerStart, out_events);
        }
        TurnPhase::PlayerStart => resolve_player_input(world, out_events),
        TurnPhase::PlayerAct => run_act_phase(
            world,
            TurnPhase::PlayerAct,
            TurnPhase::PlayerWaitEnd,
            TurnPhase::PlayerEnd,
            out_events,
        ),
        TurnPhase::PlayerWaitEnd => {
            run_wait_phase(world, TurnPhase::PlayerWaitEnd, TurnPhase::PlayerEnd, out_events);
        }
        TurnPhase::PlayerEnd => world.set_phase(TurnPhase::EnemyStart, out_events),
        TurnPhase::EnemyStart => world.set_phase(TurnPhase::EnemyAct, out_events),
        TurnPhase::EnemyAct => run_act_phase(
            world,
            TurnPhase::EnemyAct,
            TurnPhase::EnemyWaitEnd,
            TurnPhase::EnemyEnd,
            out_events,
        ),
        TurnPhase::EnemyWaitEnd => {
            run_wait_phase(world, TurnPhase::EnemyWaitEnd, TurnPhase::EnemyEnd, out_events);
        }
        TurnPhase::EnemyEnd => world.set_phase(TurnPhase::End, out_events),
        TurnPhase::End => world.set_phase(TurnPhase::Start, out_events),
    }
}

/// Consumes held keys and moves the player at most once.
///
/// The phase advances as soon as a movement key was seen, even when the
/// resulting move is rejected, so a blocked step still costs the turn.
fn resolve_player_input(world: &mut World, out_events: &mut Vec<Event>) {
    let Some(player) = world.player else {
        world.set_phase(TurnPhase::EnemyStart, out_events);
        return;
    };
    let Some(origin) = world.actor(player).map(|actor| actor.object().cell()) else {
        world.set_phase(TurnPhase::EnemyStart, out_events);
        return;
    };

    let mut candidate = origin;
    let mut moved = false;
    for key in Key::RESOLUTION_ORDER {
        if !world.keys_down.remove(&key.code()) {
            continue;
        }
        if key.is_movement() {
            let facing = key.facing();
            world.set_facing(player, facing, out_events);
            let (dx, dy) = facing.delta();
            candidate = candidate.offset(dx, dy);
            moved = true;
        } else {
            world.run_key_actions(key, out_events);
        }
    }

    if world.turn_phase != TurnPhase::PlayerStart || !moved {
        return;
    }

    world.set_phase(TurnPhase::EnemyStart, out_events);
    step(world, player, candidate, out_events);
}

fn run_act_phase(
    world: &mut World,
    phase: TurnPhase,
    wait: TurnPhase,
    terminal: TurnPhase,
    out_events: &mut Vec<Event>,
) {
    world.run_phase_actions(phase, out_events);
    if world.turn_phase != phase {
        return;
    }
    let next = if world.ammo.is_empty() { terminal } else { wait };
    world.set_phase(next, out_events);
}

fn run_wait_phase(
    world: &mut World,
    phase: TurnPhase,
    terminal: TurnPhase,
    out_events: &mut Vec<Event>,
) {
    if !world.phase_actions.has_actions(phase) {
        world.set_phase(terminal, out_events);
        return;
    }
    world.run_phase_actions(phase, out_events);
    if world.turn_phase == phase && world.ammo.is_empty() {
        world.set_phase(terminal, out_events);
    }
}

/// Validates a move against the grid, then commits it or reports the
/// rejection as a full no-op.
pub(crate) fn step(
    world: &mut World,
    entity: EntityId,
    candidate: CellCoord,
    out_events: &mut Vec<Event>,
) {
    let query = world.grid.query_occupant(candidate, Some(entity));
    if !query.is_empty() {
        tracing::debug!(
            "Move of {} to {} rejected: {:?}",
            entity,
            candidate,
            query.status()
        );
        out_events.push(Event::MoveRejected {
            entity,
            target: candidate,
            status: query.status(),
        });
        return;
    }

    if let Err(error) = world.move_entity(entity, CellTarget::to(candidate), out_events) {
        tracing::debug!("Move of {} refused: {}", entity, error);
    }
}
