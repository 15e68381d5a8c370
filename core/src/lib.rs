#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Rol turn engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Actions registered with the world
//! read immutable snapshots and answer with [`Command`] values describing
//! desired mutations. The world executes those commands through its `apply`
//! entry point and reports [`Event`] values describing what actually
//! happened, so adapters and tests can observe every step of a turn.

use std::fmt;

use serde::{Deserialize, Serialize};

mod sprite;

pub use sprite::{Canvas, Color, Figure, Sprite};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Rol.";

/// Location of a single grid cell expressed as column (`x`) and row (`y`).
///
/// Coordinates are signed so that candidate cells computed to the left of or
/// above the grid remain representable and classify as out of bounds.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CellCoord {
    x: i32,
    y: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the cell displaced by the provided column and row deltas.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Direction a game object is facing, and the direction ammo travels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Not facing any direction; firing is impossible.
    #[default]
    None,
    /// Facing toward decreasing row indices.
    Up,
    /// Facing toward increasing row indices.
    Down,
    /// Facing toward decreasing column indices.
    Left,
    /// Facing toward increasing column indices.
    Right,
}

impl Facing {
    /// Unit cell delta `(dx, dy)` associated with the facing.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::None => (0, 0),
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Cell one step ahead of `cell`, or `None` when not facing anywhere.
    #[must_use]
    pub const fn step(self, cell: CellCoord) -> Option<CellCoord> {
        match self {
            Self::None => None,
            _ => {
                let (dx, dy) = self.delta();
                Some(cell.offset(dx, dy))
            }
        }
    }
}

/// Faction tag carried by every actor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// No role.
    #[default]
    None,
    /// Belongs to the player party.
    Player,
    /// Belongs to the enemy party.
    Enemy,
    /// Belongs to the ally party.
    Ally,
    /// Non-playable character.
    Npc,
    /// Vendor character.
    Vendor,
    /// Static background object.
    StaticObject,
    /// Dynamic background object.
    DynamicObject,
}

impl Role {
    /// Reports whether ammo fired by `self` damages an actor holding `target`.
    ///
    /// Only the player/enemy pairing in either direction is hostile.
    #[must_use]
    pub const fn is_hostile_to(self, target: Role) -> bool {
        matches!(
            (self, target),
            (Self::Player, Self::Enemy) | (Self::Enemy, Self::Player)
        )
    }
}

/// Stage of the per-tick state machine controlling whose action resolves next.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Session not started.
    #[default]
    None,
    /// Beginning of a turn; enemies are replenished here.
    Start,
    /// Waiting for player input.
    PlayerStart,
    /// Player action callbacks run.
    PlayerAct,
    /// Player ammo is in flight.
    PlayerWaitEnd,
    /// Player part of the turn finished.
    PlayerEnd,
    /// Enemy part of the turn begins.
    EnemyStart,
    /// Enemy decision callbacks run.
    EnemyAct,
    /// Enemy ammo is in flight.
    EnemyWaitEnd,
    /// Enemy part of the turn finished.
    EnemyEnd,
    /// End of the turn; wraps to [`TurnPhase::Start`].
    End,
}

/// Raw key code delivered by an input source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeyCode(u32);

impl KeyCode {
    /// Wraps a raw key code.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the raw key code.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Logical keys recognised by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    /// Placeholder key with code 0; never moves.
    None,
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
    /// Space bar.
    Fire,
}

impl Key {
    /// Stable order in which held keys are resolved during player input.
    pub const RESOLUTION_ORDER: [Key; 6] = [
        Self::None,
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::Fire,
    ];

    /// Key code the input source reports for the key.
    #[must_use]
    pub const fn code(self) -> KeyCode {
        match self {
            Self::None => KeyCode::new(0),
            Self::Up => KeyCode::new(38),
            Self::Down => KeyCode::new(40),
            Self::Left => KeyCode::new(37),
            Self::Right => KeyCode::new(39),
            Self::Fire => KeyCode::new(32),
        }
    }

    /// Maps a raw key code back to a logical key.
    #[must_use]
    pub fn from_code(code: KeyCode) -> Option<Key> {
        Self::RESOLUTION_ORDER
            .into_iter()
            .find(|key| key.code() == code)
    }

    /// Facing applied to the player when the key is resolved.
    #[must_use]
    pub const fn facing(self) -> Facing {
        match self {
            Self::Up => Facing::Up,
            Self::Down => Facing::Down,
            Self::Left => Facing::Left,
            Self::Right => Facing::Right,
            Self::None | Self::Fire => Facing::None,
        }
    }

    /// Reports whether the key contributes a movement delta.
    #[must_use]
    pub const fn is_movement(self) -> bool {
        matches!(self, Self::Up | Self::Down | Self::Left | Self::Right)
    }
}

/// Unique identifier assigned to an entity registered with the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Classification of a cell relative to the entity asking about it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellStatus {
    /// Nothing but the asking entity occupies the cell.
    Empty,
    /// Another entity occupies the cell.
    Busy,
    /// The cell lies outside the grid.
    OutOfBounds,
    /// Ammo ran out of travel steps before reaching the cell.
    OutOfSteps,
}

/// Result of a collision query: a status and, when busy, the occupant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellQuery {
    status: CellStatus,
    occupant: Option<EntityId>,
}

impl CellQuery {
    /// Query result for a free cell.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            status: CellStatus::Empty,
            occupant: None,
        }
    }

    /// Query result for a cell held by `occupant`.
    #[must_use]
    pub const fn busy(occupant: EntityId) -> Self {
        Self {
            status: CellStatus::Busy,
            occupant: Some(occupant),
        }
    }

    /// Query result for a cell outside the grid.
    #[must_use]
    pub const fn out_of_bounds() -> Self {
        Self {
            status: CellStatus::OutOfBounds,
            occupant: None,
        }
    }

    /// Query result for ammo that has no travel steps left.
    #[must_use]
    pub const fn out_of_steps() -> Self {
        Self {
            status: CellStatus::OutOfSteps,
            occupant: None,
        }
    }

    /// Status of the queried cell.
    #[must_use]
    pub const fn status(&self) -> CellStatus {
        self.status
    }

    /// Entity occupying the cell when the status is [`CellStatus::Busy`].
    #[must_use]
    pub const fn occupant(&self) -> Option<EntityId> {
        self.occupant
    }

    /// Reports whether the cell can be entered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self.status, CellStatus::Empty)
    }
}

/// Destination of a move where either axis may be left unchanged.
///
/// A rejected move is expressed as [`CellTarget::unchanged`], which keeps
/// both axes and turns the move into a full no-op.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellTarget {
    /// New column, or `None` to keep the current one.
    pub x: Option<i32>,
    /// New row, or `None` to keep the current one.
    pub y: Option<i32>,
}

impl CellTarget {
    /// Target that moves to `cell` on both axes.
    #[must_use]
    pub const fn to(cell: CellCoord) -> Self {
        Self {
            x: Some(cell.x()),
            y: Some(cell.y()),
        }
    }

    /// Target that keeps both axes.
    #[must_use]
    pub const fn unchanged() -> Self {
        Self { x: None, y: None }
    }

    /// Resolves the target against the current cell.
    #[must_use]
    pub fn resolve(self, current: CellCoord) -> CellCoord {
        CellCoord::new(
            self.x.unwrap_or(current.x()),
            self.y.unwrap_or(current.y()),
        )
    }
}

/// Commands that express all mutations actions may request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Overrides the current turn phase.
    SetTurnPhase {
        /// Phase the session should enter.
        phase: TurnPhase,
    },
    /// Requests that an entity move into a cell after a collision check.
    StepEntity {
        /// Entity attempting to move.
        entity: EntityId,
        /// Destination cell.
        target: CellCoord,
    },
    /// Requests that an actor fire ammo in the provided direction.
    Fire {
        /// Actor firing the ammo.
        owner: EntityId,
        /// Direction the ammo travels.
        facing: Facing,
    },
    /// Advances every live ammo exactly one step.
    AdvanceAmmo,
}

/// Reason an ammo left the ammo roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AmmoRemoval {
    /// The ammo exhausted its travel steps.
    OutOfSteps,
    /// The ammo left the grid.
    OutOfBounds,
    /// The ammo hit a hostile actor.
    Hit {
        /// Actor that received the damage.
        target: EntityId,
    },
    /// The ammo ran into an entity it does not damage.
    Blocked {
        /// Entity that stopped the ammo.
        occupant: EntityId,
    },
}

/// Events reported by the world after processing commands and phase steps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the session entered a new turn phase.
    TurnPhaseChanged {
        /// Phase that was active before the change.
        from: TurnPhase,
        /// Phase that is active after the change.
        to: TurnPhase,
    },
    /// Confirms that an entity was registered and placed on the grid.
    EntityRegistered {
        /// Identifier assigned to the entity.
        entity: EntityId,
        /// Cell the entity occupies.
        cell: CellCoord,
    },
    /// Confirms that an entity was removed from every roster and the grid.
    EntityUnregistered {
        /// Identifier of the removed entity.
        entity: EntityId,
        /// Cell the entity occupied.
        cell: CellCoord,
    },
    /// Confirms that an entity moved between two cells.
    EntityMoved {
        /// Entity that moved.
        entity: EntityId,
        /// Cell occupied before the move.
        from: CellCoord,
        /// Cell occupied after the move.
        to: CellCoord,
    },
    /// Reports that a move was rejected and the entity stayed put.
    MoveRejected {
        /// Entity whose move was rejected.
        entity: EntityId,
        /// Cell the entity attempted to enter.
        target: CellCoord,
        /// Collision status that caused the rejection.
        status: CellStatus,
    },
    /// Reports that an entity turned toward a new direction.
    FacingChanged {
        /// Entity that turned.
        entity: EntityId,
        /// New facing.
        facing: Facing,
    },
    /// Confirms that ammo entered the grid.
    AmmoFired {
        /// Identifier assigned to the ammo.
        ammo: EntityId,
        /// Actor that fired.
        owner: EntityId,
        /// Cell the ammo occupies.
        cell: CellCoord,
        /// Direction the ammo travels.
        direction: Facing,
    },
    /// Reports that the cell ahead of the shooter could not take ammo.
    ShotBlocked {
        /// Actor that attempted to fire.
        owner: EntityId,
        /// Cell ahead of the owner.
        cell: CellCoord,
        /// Collision status of that cell.
        status: CellStatus,
    },
    /// Reports a shot by an actor that faces nowhere.
    ShotUnaimed {
        /// Actor that attempted to fire.
        owner: EntityId,
    },
    /// Confirms that ammo advanced one cell.
    AmmoAdvanced {
        /// Ammo that advanced.
        ammo: EntityId,
        /// Cell occupied before the step.
        from: CellCoord,
        /// Cell occupied after the step.
        to: CellCoord,
        /// Travel steps left after the step.
        steps_left: u32,
    },
    /// Confirms that ammo was removed from the session.
    AmmoRemoved {
        /// Ammo that was removed.
        ammo: EntityId,
        /// Cell the ammo rested in when removed.
        cell: CellCoord,
        /// Why the ammo was removed.
        reason: AmmoRemoval,
    },
    /// Reports that an actor lost hit points.
    ActorDamaged {
        /// Actor that was damaged.
        actor: EntityId,
        /// Actor whose ammo inflicted the damage.
        source: EntityId,
        /// Damage applied.
        amount: u32,
        /// Hit points left after the damage.
        live_now: u32,
    },
    /// Reports that random placement could not find a free cell.
    SpawnFailed {
        /// Number of cells sampled before giving up.
        attempts: u32,
    },
}

/// Immutable representation of a single actor's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActorSnapshot {
    /// Identifier assigned to the actor.
    pub id: EntityId,
    /// Faction of the actor.
    pub role: Role,
    /// Cell currently occupied by the actor.
    pub cell: CellCoord,
    /// Direction the actor faces.
    pub facing: Facing,
    /// Maximum hit points.
    pub live: u32,
    /// Current hit points.
    pub live_now: u32,
}

/// Read-only snapshot describing a set of actors.
#[derive(Clone, Debug, Default)]
pub struct ActorView {
    snapshots: Vec<ActorSnapshot>,
}

impl ActorView {
    /// Creates a new actor view from the provided snapshots.
    ///
    /// Identifiers are allocated monotonically, so sorting by identifier
    /// restores registration order.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ActorSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured actor snapshots in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ActorSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured actors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no actors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Immutable representation of a single ammo's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AmmoSnapshot {
    /// Identifier assigned to the ammo.
    pub id: EntityId,
    /// Actor that fired the ammo.
    pub owner: EntityId,
    /// Role of the owner at the time of firing.
    pub owner_role: Role,
    /// Cell currently occupied by the ammo.
    pub cell: CellCoord,
    /// Direction the ammo travels.
    pub direction: Facing,
    /// Damage applied on hit.
    pub damage: u32,
    /// Travel steps left.
    pub steps: u32,
}

/// Read-only snapshot describing all live ammo.
#[derive(Clone, Debug, Default)]
pub struct AmmoView {
    snapshots: Vec<AmmoSnapshot>,
}

impl AmmoView {
    /// Creates a new ammo view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<AmmoSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured ammo snapshots in firing order.
    pub fn iter(&self) -> impl Iterator<Item = &AmmoSnapshot> {
        self.snapshots.iter()
    }

    /// Reports whether no ammo is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
