//! Game objects, actors and ammo held by the world.

use rol_core::{Canvas, CellCoord, EntityId, Facing, Role, Sprite};

/// State shared by every entity placed on the grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameObject {
    name: String,
    visible: bool,
    cell: CellCoord,
    facing: Facing,
    sprite: Option<Sprite>,
}

impl GameObject {
    /// Creates a visible object at the provided cell facing nowhere.
    #[must_use]
    pub fn new(name: impl Into<String>, cell: CellCoord) -> Self {
        Self {
            name: name.into(),
            visible: true,
            cell,
            facing: Facing::None,
            sprite: None,
        }
    }

    /// Attaches a sprite, synchronised with the object's cell and facing.
    #[must_use]
    pub fn with_sprite(mut self, mut sprite: Sprite) -> Self {
        sprite.set_origin(self.cell);
        sprite.set_facing(self.facing);
        self.sprite = Some(sprite);
        self
    }

    /// Sets whether the object is drawn.
    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Display name of the object.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cell the object occupies.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Direction the object faces.
    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    /// Sprite attached to the object, if any.
    #[must_use]
    pub const fn sprite(&self) -> Option<&Sprite> {
        self.sprite.as_ref()
    }

    /// Turns the object and its sprite toward `facing`.
    pub fn set_facing(&mut self, facing: Facing) {
        self.facing = facing;
        if let Some(sprite) = self.sprite.as_mut() {
            sprite.set_facing(facing);
        }
    }

    /// Draws the sprite when the object is visible.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        if !self.visible {
            return;
        }
        if let Some(sprite) = &self.sprite {
            sprite.draw(canvas);
        }
    }

    /// Records a committed move; only the world updates the grid alongside.
    pub(crate) fn set_cell(&mut self, cell: CellCoord) {
        self.cell = cell;
        if let Some(sprite) = self.sprite.as_mut() {
            sprite.set_origin(cell);
        }
    }
}

/// Living entity with a faction and hit points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    object: GameObject,
    role: Role,
    live: u32,
    live_now: u32,
}

impl Actor {
    /// Creates an actor at full health.
    #[must_use]
    pub fn new(object: GameObject, role: Role, live: u32) -> Self {
        Self {
            object,
            role,
            live,
            live_now: live,
        }
    }

    /// Underlying game object.
    #[must_use]
    pub const fn object(&self) -> &GameObject {
        &self.object
    }

    /// Faction of the actor.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Maximum hit points.
    #[must_use]
    pub const fn live(&self) -> u32 {
        self.live
    }

    /// Current hit points.
    #[must_use]
    pub const fn live_now(&self) -> u32 {
        self.live_now
    }

    /// Reports whether the actor has hit points left.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.live_now > 0
    }

    /// Resets both maximum and current hit points.
    pub fn set_live(&mut self, live: u32) {
        self.live = live;
        self.live_now = live;
    }

    /// Removes hit points, never dropping below zero.
    pub fn damage(&mut self, amount: u32) {
        self.live_now = self.live_now.saturating_sub(amount);
    }

    pub(crate) fn object_mut(&mut self) -> &mut GameObject {
        &mut self.object
    }
}

/// Projectile travelling in a fixed direction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ammo {
    object: GameObject,
    owner: EntityId,
    owner_role: Role,
    direction: Facing,
    damage: u32,
    steps: u32,
}

impl Ammo {
    /// Creates ammo fired by `owner`, whose role is captured now.
    #[must_use]
    pub fn new(
        mut object: GameObject,
        owner: EntityId,
        owner_role: Role,
        direction: Facing,
        damage: u32,
        steps: u32,
    ) -> Self {
        object.set_facing(direction);
        Self {
            object,
            owner,
            owner_role,
            direction,
            damage,
            steps,
        }
    }

    /// Underlying game object.
    #[must_use]
    pub const fn object(&self) -> &GameObject {
        &self.object
    }

    /// Actor that fired the ammo.
    #[must_use]
    pub const fn owner(&self) -> EntityId {
        self.owner
    }

    /// Role the owner held when firing.
    #[must_use]
    pub const fn owner_role(&self) -> Role {
        self.owner_role
    }

    /// Direction of travel.
    #[must_use]
    pub const fn direction(&self) -> Facing {
        self.direction
    }

    /// Damage applied on hit.
    #[must_use]
    pub const fn damage(&self) -> u32 {
        self.damage
    }

    /// Travel steps left.
    #[must_use]
    pub const fn steps(&self) -> u32 {
        self.steps
    }

    /// Reports whether this ammo damages `target`.
    #[must_use]
    pub const fn hits(&self, target: &Actor) -> bool {
        self.owner_role.is_hostile_to(target.role)
    }

    pub(crate) fn object_mut(&mut self) -> &mut GameObject {
        &mut self.object
    }

    pub(crate) fn spend_step(&mut self) {
        self.steps = self.steps.saturating_sub(1);
    }
}

/// Variant data of a registered entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntityKind {
    /// Living entity.
    Actor(Actor),
    /// Projectile.
    Ammo(Ammo),
}

impl EntityKind {
    /// Shared game object of the entity.
    #[must_use]
    pub const fn object(&self) -> &GameObject {
        match self {
            Self::Actor(actor) => actor.object(),
            Self::Ammo(ammo) => ammo.object(),
        }
    }

    /// Actor data when the entity is an actor.
    #[must_use]
    pub const fn as_actor(&self) -> Option<&Actor> {
        match self {
            Self::Actor(actor) => Some(actor),
            Self::Ammo(_) => None,
        }
    }

    /// Ammo data when the entity is ammo.
    #[must_use]
    pub const fn as_ammo(&self) -> Option<&Ammo> {
        match self {
            Self::Ammo(ammo) => Some(ammo),
            Self::Actor(_) => None,
        }
    }

    pub(crate) fn object_mut(&mut self) -> &mut GameObject {
        match self {
            Self::Actor(actor) => actor.object_mut(),
            Self::Ammo(ammo) => ammo.object_mut(),
        }
    }

    pub(crate) fn as_actor_mut(&mut self) -> Option<&mut Actor> {
        match self {
            Self::Actor(actor) => Some(actor),
            Self::Ammo(_) => None,
        }
    }

    pub(crate) fn as_ammo_mut(&mut self) -> Option<&mut Ammo> {
        match self {
            Self::Ammo(ammo) => Some(ammo),
            Self::Actor(_) => None,
        }
    }
}

/// Registered entity: an identifier plus its variant data.
#[derive(Clone, Debug)]
pub(crate) struct Entity {
    pub(crate) id: EntityId,
    pub(crate) kind: EntityKind,
}
