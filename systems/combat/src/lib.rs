#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure systems that fire ammo and keep it flying.

use rol_core::{ActorSnapshot, AmmoView, Command};

/// Fires ammo from an actor in the direction it currently faces.
#[derive(Debug, Default)]
pub struct Firing;

impl Firing {
    /// Creates a new firing system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Emits `Command::Fire` for the shooter, if there is one.
    pub fn handle(&self, shooter: Option<&ActorSnapshot>, out: &mut Vec<Command>) {
        if let Some(shooter) = shooter {
            out.push(Command::Fire {
                owner: shooter.id,
                facing: shooter.facing,
            });
        }
    }
}

/// Advances live ammo while a side waits for its shots to land.
#[derive(Debug, Default)]
pub struct AmmoFlight;

impl AmmoFlight {
    /// Creates a new ammo flight system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Emits `Command::AdvanceAmmo` whenever ammo is in flight.
    pub fn handle(&self, ammo: &AmmoView, out: &mut Vec<Command>) {
        if !ammo.is_empty() {
            out.push(Command::AdvanceAmmo);
        }
    }
}
