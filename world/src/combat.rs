//! Firing and ammo flight resolution.

use rol_core::{AmmoRemoval, CellCoord, CellQuery, CellStatus, EntityId, Event, Facing};

use crate::{
    entity::{Ammo, EntityKind, GameObject},
    World,
};

/// Puts ammo in the cell ahead of `owner`, or resolves a point-blank hit.
pub(crate) fn fire(world: &mut World, owner: EntityId, facing: Facing, out_events: &mut Vec<Event>) {
    let Some(shooter) = world.actor(owner) else {
        tracing::debug!("Fire ignored: {} is not a registered actor", owner);
        return;
    };
    let origin = shooter.object().cell();
    let owner_role = shooter.role();

    if facing != Facing::None {
        world.set_facing(owner, facing, out_events);
    }

    let Some(cell) = facing.step(origin) else {
        out_events.push(Event::ShotUnaimed { owner });
        return;
    };

    let query = world.grid.query_occupant(cell, Some(owner));
    match (query.status(), query.occupant()) {
        (CellStatus::Empty, _) => {
            let config = &world.config.ammo;
            let mut object = GameObject::new(config.name.clone(), cell);
            if let Some(sprite) = world.ammo_sprite.clone() {
                object = object.with_sprite(sprite);
            }
            let ammo = Ammo::new(object, owner, owner_role, facing, config.damage, config.range);
            match world.register(EntityKind::Ammo(ammo), out_events) {
                Ok(id) => {
                    tracing::debug!("{} fired {} from {} toward {:?}", owner, id, cell, facing);
                    out_events.push(Event::AmmoFired {
                        ammo: id,
                        owner,
                        cell,
                        direction: facing,
                    });
                }
                Err(error) => {
                    tracing::warn!("Ammo fired by {} could not be placed: {}", owner, error);
                }
            }
        }
        (CellStatus::Busy, Some(occupant)) => {
            let hostile = world
                .actor(occupant)
                .is_some_and(|target| owner_role.is_hostile_to(target.role()));
            if hostile {
                let damage = world.config.ammo.damage;
                tracing::debug!("{} fired point-blank into {}", owner, occupant);
                damage_actor(world, occupant, owner, damage, out_events);
            } else {
                out_events.push(Event::ShotBlocked {
                    owner,
                    cell,
                    status: CellStatus::Busy,
                });
            }
        }
        (status, _) => out_events.push(Event::ShotBlocked {
            owner,
            cell,
            status,
        }),
    }
}

/// Advances every live ammo one step.
///
/// Spent ammo is collected first and removed only after the whole roster has
/// moved, so the roster is never mutated while it is being walked.
pub(crate) fn advance_ammo(world: &mut World, out_events: &mut Vec<Event>) {
    let roster = world.ammo.clone();
    let mut spent: Vec<(EntityId, CellCoord, AmmoRemoval)> = Vec::new();

    for ammo_id in roster {
        let Some(ammo) = world.ammo_entity(ammo_id) else {
            continue;
        };
        let from = ammo.object().cell();
        let owner = ammo.owner();
        let damage = ammo.damage();
        let next = ammo.direction().step(from).filter(|_| ammo.steps() > 0);
        let query = next.map_or_else(CellQuery::out_of_steps, |cell| {
            world.grid.query_occupant(cell, Some(ammo_id))
        });

        match (query.status(), query.occupant(), next) {
            (CellStatus::Empty, _, Some(next)) => {
                let steps_left = world.step_ammo(ammo_id, next);
                tracing::debug!("Ammo {} advanced {} -> {}", ammo_id, from, next);
                out_events.push(Event::AmmoAdvanced {
                    ammo: ammo_id,
                    from,
                    to: next,
                    steps_left,
                });
            }
            (CellStatus::Busy, Some(occupant), _) => {
                let hostile = world.actor(occupant).is_some_and(|target| ammo.hits(target));
                if hostile {
                    damage_actor(world, occupant, owner, damage, out_events);
                    spent.push((ammo_id, from, AmmoRemoval::Hit { target: occupant }));
                } else {
                    spent.push((ammo_id, from, AmmoRemoval::Blocked { occupant }));
                }
            }
            (CellStatus::OutOfSteps, ..) => {
                spent.push((ammo_id, from, AmmoRemoval::OutOfSteps));
            }
            _ => spent.push((ammo_id, from, AmmoRemoval::OutOfBounds)),
        }
    }

    for (ammo, cell, reason) in spent {
        if world.unregister(ammo, out_events) {
            tracing::debug!("Ammo {} removed at {}: {:?}", ammo, cell, reason);
            out_events.push(Event::AmmoRemoved { ammo, cell, reason });
        }
    }
}

/// Applies damage to an actor and unregisters it when it dies.
pub(crate) fn damage_actor(
    world: &mut World,
    target: EntityId,
    source: EntityId,
    amount: u32,
    out_events: &mut Vec<Event>,
) {
    let Some(actor) = world.actor_mut(target) else {
        return;
    };
    actor.damage(amount);
    let live_now = actor.live_now();
    let alive = actor.is_alive();
    let name = actor.object().name().to_owned();

    tracing::info!("{} {} took {} damage from {}, {} left", name, target, amount, source, live_now);
    out_events.push(Event::ActorDamaged {
        actor: target,
        source,
        amount,
        live_now,
    });

    if !alive {
        if world.player == Some(target) {
            world.player_defeated = true;
        }
        if world.unregister(target, out_events) {
            tracing::info!("{} {} died", name, target);
        }
    }
}
