#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Greedy chase system that moves enemies toward the player.

use std::cmp::Ordering;

use rol_core::{ActorSnapshot, ActorView, CellCoord, Command, Facing};

/// Default distance along the open axis at which an aligned enemy fires.
pub const DEFAULT_ENGAGE_RANGE: u32 = 1;

/// Pure system emitting one decision per enemy each enemy turn.
///
/// Enemies act in roster order. An enemy lined up with the player on one
/// axis and within the engage range on the other fires toward the player;
/// the first enemy to fire ends the decision pass. Every other enemy takes a
/// single step, closing the column gap before the row gap.
#[derive(Debug)]
pub struct EnemyAi {
    engage_range: u32,
}

impl EnemyAi {
    /// Creates a system that fires from at most `engage_range` cells away.
    #[must_use]
    pub const fn new(engage_range: u32) -> Self {
        Self { engage_range }
    }

    /// Emits movement or fire commands for the enemy roster.
    pub fn handle(&self, player: Option<&ActorSnapshot>, enemies: &ActorView, out: &mut Vec<Command>) {
        let Some(player) = player else {
            return;
        };

        for enemy in enemies.iter() {
            if let Some(facing) = self.firing_direction(enemy.cell, player.cell) {
                tracing::debug!("Enemy {} fires {:?} at {}", enemy.id, facing, player.cell);
                out.push(Command::Fire {
                    owner: enemy.id,
                    facing,
                });
                return;
            }

            if let Some(target) = step_toward(enemy.cell, player.cell) {
                out.push(Command::StepEntity {
                    entity: enemy.id,
                    target,
                });
            }
        }
    }

    fn firing_direction(&self, from: CellCoord, to: CellCoord) -> Option<Facing> {
        let gap = if from.x() == to.x() {
            from.y().abs_diff(to.y())
        } else if from.y() == to.y() {
            from.x().abs_diff(to.x())
        } else {
            return None;
        };
        if gap == 0 || gap > self.engage_range {
            return None;
        }
        direction_toward(from, to)
    }
}

impl Default for EnemyAi {
    fn default() -> Self {
        Self::new(DEFAULT_ENGAGE_RANGE)
    }
}

/// Cell one step from `from` toward `to`, closing the column gap first.
fn step_toward(from: CellCoord, to: CellCoord) -> Option<CellCoord> {
    let facing = direction_toward(from, to)?;
    facing.step(from)
}

fn direction_toward(from: CellCoord, to: CellCoord) -> Option<Facing> {
    match to.x().cmp(&from.x()) {
        Ordering::Greater => return Some(Facing::Right),
        Ordering::Less => return Some(Facing::Left),
        Ordering::Equal => {}
    }
    match to.y().cmp(&from.y()) {
        Ordering::Greater => Some(Facing::Down),
        Ordering::Less => Some(Facing::Up),
        Ordering::Equal => None,
    }
}
