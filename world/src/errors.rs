//! Typed failures surfaced by world operations.
//!
//! Collisions met while the turn engine runs are not errors; they are
//! reported as [`rol_core::Event`] values. These errors only cover direct
//! calls whose caller asked for something the world refuses to do.

use rol_core::{CellCoord, EntityId};
use thiserror::Error;

/// Reasons an entity could not be registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// The entity's cell lies outside the grid.
    #[error("cannot register entity at {cell}: outside the grid")]
    OutOfBounds {
        /// Cell the entity was placed on.
        cell: CellCoord,
    },
    /// Another entity already holds the entity's cell.
    #[error("cannot register entity at {cell}: occupied by {occupant}")]
    Occupied {
        /// Cell the entity was placed on.
        cell: CellCoord,
        /// Entity holding the cell.
        occupant: EntityId,
    },
}

/// Reasons a move could not be committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    /// No registered entity carries the identifier.
    #[error("entity {entity} is not registered")]
    UnknownEntity {
        /// Identifier that was looked up.
        entity: EntityId,
    },
    /// The destination lies outside the grid.
    #[error("cannot move to {cell}: outside the grid")]
    OutOfBounds {
        /// Destination cell.
        cell: CellCoord,
    },
    /// Another entity holds the destination.
    #[error("cannot move to {cell}: occupied by {occupant}")]
    Occupied {
        /// Destination cell.
        cell: CellCoord,
        /// Entity holding the destination.
        occupant: EntityId,
    },
}

/// Reasons an enemy could not be spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpawnError {
    /// Random sampling never landed on a free cell.
    #[error("no free cell found after {attempts} attempts")]
    NoFreeCell {
        /// Number of cells sampled.
        attempts: u32,
    },
}
