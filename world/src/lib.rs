#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game session state for Rol.
//!
//! The [`World`] owns the occupancy grid, every registered entity, the
//! rosters derived from them, held keys and the action registries. Actions
//! observe the world immutably and answer with [`Command`] values that
//! [`apply`] executes; [`update`] advances the turn-phase machine by one
//! step.

mod actions;
mod combat;
mod config;
mod engine;
mod entity;
mod errors;
mod grid;
mod spawn;

use std::collections::BTreeSet;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rol_core::{
    Canvas, CellCoord, CellTarget, Command, EntityId, Event, Facing, Key, KeyCode, Role, Sprite,
    TurnPhase, WELCOME_BANNER,
};

pub use actions::Action;
pub use config::{AmmoConfig, ConfigError, EnemyConfig, GameConfig, PlayerConfig, ScreenConfig};
pub use engine::update;
pub use entity::{Actor, Ammo, EntityKind, GameObject};
pub use errors::{MoveError, RegistrationError, SpawnError};
pub use grid::Grid;

use actions::ActionRegistry;
use entity::Entity;

/// Represents the authoritative Rol game session.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: GameConfig,
    grid: Grid,
    entities: Vec<Entity>,
    player: Option<EntityId>,
    player_defeated: bool,
    enemies: Vec<EntityId>,
    ammo: Vec<EntityId>,
    keys_down: BTreeSet<KeyCode>,
    key_actions: ActionRegistry<Key>,
    phase_actions: ActionRegistry<TurnPhase>,
    turn_phase: TurnPhase,
    next_entity_id: u32,
    rng: ChaCha8Rng,
    enemy_sprite: Option<Sprite>,
    ammo_sprite: Option<Sprite>,
}

impl World {
    /// Creates an empty session using the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::from_valid_config(GameConfig::default())
    }

    /// Creates an empty session after validating the configuration.
    pub fn with_config(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: GameConfig) -> Self {
        let grid = Grid::new(config.screen.columns, config.screen.rows);
        let rng = ChaCha8Rng::seed_from_u64(config.rng_seed);
        Self {
            banner: WELCOME_BANNER,
            config,
            grid,
            entities: Vec::new(),
            player: None,
            player_defeated: false,
            enemies: Vec::new(),
            ammo: Vec::new(),
            keys_down: BTreeSet::new(),
            key_actions: ActionRegistry::new(),
            phase_actions: ActionRegistry::new(),
            turn_phase: TurnPhase::None,
            next_entity_id: 0,
            rng,
            enemy_sprite: None,
            ammo_sprite: None,
        }
    }

    /// Places an actor on the grid and enrols it in the matching rosters.
    ///
    /// A player actor replaces the current player slot; an enemy joins the
    /// enemy roster. Actors whose cell is outside the grid or already held
    /// are refused and nothing changes.
    pub fn register_actor(
        &mut self,
        actor: Actor,
        out_events: &mut Vec<Event>,
    ) -> Result<EntityId, RegistrationError> {
        self.register(EntityKind::Actor(actor), out_events)
    }

    /// Removes an entity from the grid and every roster.
    ///
    /// Returns `false` when the identifier is unknown.
    pub fn unregister(&mut self, entity: EntityId, out_events: &mut Vec<Event>) -> bool {
        let Some(index) = self.entity_index(entity) else {
            return false;
        };
        let removed = self.entities.remove(index);
        let cell = removed.kind.object().cell();
        if self.grid.occupant(cell) == Some(entity) {
            self.grid.clear_occupant(cell);
        }
        self.enemies.retain(|id| *id != entity);
        self.ammo.retain(|id| *id != entity);
        if self.player == Some(entity) {
            self.player = None;
        }

        tracing::debug!("{} {} unregistered from {}", removed.kind.object().name(), entity, cell);
        out_events.push(Event::EntityUnregistered { entity, cell });
        true
    }

    /// Moves an entity, keeping either axis when the target leaves it unset.
    ///
    /// Moving onto the current cell is a no-op. Destinations outside the grid
    /// or held by another entity are refused so single occupancy always
    /// holds. Returns the cell the entity occupies afterwards.
    pub fn move_entity(
        &mut self,
        entity: EntityId,
        target: CellTarget,
        out_events: &mut Vec<Event>,
    ) -> Result<CellCoord, MoveError> {
        let index = self
            .entity_index(entity)
            .ok_or(MoveError::UnknownEntity { entity })?;
        let from = self.entities[index].kind.object().cell();
        let to = target.resolve(from);
        if to == from {
            return Ok(from);
        }
        if !self.grid.contains(to) {
            return Err(MoveError::OutOfBounds { cell: to });
        }
        if let Some(occupant) = self.grid.query_occupant(to, Some(entity)).occupant() {
            return Err(MoveError::Occupied { cell: to, occupant });
        }

        self.relocate(index, to);
        tracing::debug!("{} moved {} -> {}", entity, from, to);
        out_events.push(Event::EntityMoved { entity, from, to });
        Ok(to)
    }

    /// Marks a raw key code as held.
    pub fn key_down(&mut self, code: KeyCode) {
        let _ = self.keys_down.insert(code);
    }

    /// Releases a raw key code.
    pub fn key_up(&mut self, code: KeyCode) {
        let _ = self.keys_down.remove(&code);
    }

    /// Registers an action run when `key` is consumed during player input.
    pub fn register_key_action(&mut self, key: Key, action: impl Action + 'static) {
        self.key_actions.register(key, Box::new(action));
    }

    /// Registers an action run whenever the session steps through `phase`.
    pub fn register_phase_action(&mut self, phase: TurnPhase, action: impl Action + 'static) {
        self.phase_actions.register(phase, Box::new(action));
    }

    /// Sprite attached to every enemy spawned from now on.
    pub fn set_enemy_sprite(&mut self, sprite: Sprite) {
        self.enemy_sprite = Some(sprite);
    }

    /// Sprite attached to every ammo fired from now on.
    pub fn set_ammo_sprite(&mut self, sprite: Sprite) {
        self.ammo_sprite = Some(sprite);
    }

    /// Starts the turn cycle.
    pub fn start(&mut self, out_events: &mut Vec<Event>) {
        tracing::info!("{}", self.banner);
        self.set_phase(TurnPhase::Start, out_events);
    }

    /// Spawns an enemy on a random free cell.
    pub fn spawn_enemy(&mut self, out_events: &mut Vec<Event>) -> Result<EntityId, SpawnError> {
        let attempts = self.config.spawn_attempts;
        let Some(cell) = spawn::random_free_cell(&self.grid, &mut self.rng, attempts) else {
            tracing::warn!("No free cell for an enemy after {} attempts", attempts);
            out_events.push(Event::SpawnFailed { attempts });
            return Err(SpawnError::NoFreeCell { attempts });
        };

        let mut object = GameObject::new(self.config.enemy.name.clone(), cell);
        if let Some(sprite) = self.enemy_sprite.clone() {
            object = object.with_sprite(sprite);
        }
        let enemy = Actor::new(object, Role::Enemy, self.config.enemy.hit_points);
        match self.register(EntityKind::Actor(enemy), out_events) {
            Ok(id) => {
                tracing::info!("{} {} spawned at {}", self.config.enemy.name, id, cell);
                Ok(id)
            }
            Err(error) => {
                tracing::warn!("Spawned enemy could not be placed: {}", error);
                Err(SpawnError::NoFreeCell { attempts })
            }
        }
    }

    fn register(
        &mut self,
        kind: EntityKind,
        out_events: &mut Vec<Event>,
    ) -> Result<EntityId, RegistrationError> {
        let cell = kind.object().cell();
        if !self.grid.contains(cell) {
            return Err(RegistrationError::OutOfBounds { cell });
        }
        if let Some(occupant) = self.grid.occupant(cell) {
            return Err(RegistrationError::Occupied { cell, occupant });
        }

        let id = EntityId::new(self.next_entity_id);
        self.next_entity_id = self.next_entity_id.saturating_add(1);

        match &kind {
            EntityKind::Actor(actor) => match actor.role() {
                Role::Player => {
                    self.player = Some(id);
                    self.player_defeated = false;
                }
                Role::Enemy => self.enemies.push(id),
                _ => {}
            },
            EntityKind::Ammo(_) => self.ammo.push(id),
        }

        tracing::debug!("{} {} registered at {}", kind.object().name(), id, cell);
        self.grid.set_occupant(cell, id);
        self.entities.push(Entity { id, kind });
        out_events.push(Event::EntityRegistered { entity: id, cell });
        Ok(id)
    }

    fn entity_index(&self, entity: EntityId) -> Option<usize> {
        self.entities.iter().position(|slot| slot.id == entity)
    }

    fn entity(&self, entity: EntityId) -> Option<&EntityKind> {
        self.entities
            .iter()
            .find(|slot| slot.id == entity)
            .map(|slot| &slot.kind)
    }

    fn entity_mut(&mut self, entity: EntityId) -> Option<&mut EntityKind> {
        self.entities
            .iter_mut()
            .find(|slot| slot.id == entity)
            .map(|slot| &mut slot.kind)
    }

    pub(crate) fn actor(&self, entity: EntityId) -> Option<&Actor> {
        self.entity(entity).and_then(EntityKind::as_actor)
    }

    pub(crate) fn actor_mut(&mut self, entity: EntityId) -> Option<&mut Actor> {
        self.entity_mut(entity).and_then(EntityKind::as_actor_mut)
    }

    pub(crate) fn ammo_entity(&self, entity: EntityId) -> Option<&Ammo> {
        self.entity(entity).and_then(EntityKind::as_ammo)
    }

    /// Moves ammo one cell and returns its remaining steps.
    pub(crate) fn step_ammo(&mut self, entity: EntityId, to: CellCoord) -> u32 {
        let Some(index) = self.entity_index(entity) else {
            return 0;
        };
        self.relocate(index, to);
        self.entities[index]
            .kind
            .as_ammo_mut()
            .map_or(0, |ammo| {
                ammo.spend_step();
                ammo.steps()
            })
    }

    fn relocate(&mut self, index: usize, to: CellCoord) {
        let slot = &mut self.entities[index];
        let from = slot.kind.object().cell();
        self.grid.clear_occupant(from);
        self.grid.set_occupant(to, slot.id);
        slot.kind.object_mut().set_cell(to);
    }

    pub(crate) fn set_facing(&mut self, entity: EntityId, facing: Facing, out_events: &mut Vec<Event>) {
        let Some(kind) = self.entity_mut(entity) else {
            return;
        };
        if kind.object().facing() == facing {
            return;
        }
        kind.object_mut().set_facing(facing);
        out_events.push(Event::FacingChanged { entity, facing });
    }

    pub(crate) fn set_phase(&mut self, phase: TurnPhase, out_events: &mut Vec<Event>) {
        if self.turn_phase == phase {
            return;
        }
        let from = self.turn_phase;
        self.turn_phase = phase;
        tracing::debug!("Turn phase {:?} -> {:?}", from, phase);
        out_events.push(Event::TurnPhaseChanged { from, to: phase });
    }

    pub(crate) fn run_phase_actions(&mut self, phase: TurnPhase, out_events: &mut Vec<Event>) {
        let mut actions = self.phase_actions.take(phase);
        self.run_actions(&mut actions, out_events);
        self.phase_actions.restore(phase, actions);
    }

    pub(crate) fn run_key_actions(&mut self, key: Key, out_events: &mut Vec<Event>) {
        let mut actions = self.key_actions.take(key);
        self.run_actions(&mut actions, out_events);
        self.key_actions.restore(key, actions);
    }

    /// Runs actions in registration order; each action's commands are
    /// applied before the next action observes the world.
    fn run_actions(&mut self, actions: &mut [Box<dyn Action>], out_events: &mut Vec<Event>) {
        let mut commands = Vec::new();
        for action in actions.iter_mut() {
            action.run(self, &mut commands);
            for command in commands.drain(..) {
                apply(self, command, out_events);
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SetTurnPhase { phase } => world.set_phase(phase, out_events),
        Command::StepEntity { entity, target } => engine::step(world, entity, target, out_events),
        Command::Fire { owner, facing } => combat::fire(world, owner, facing, out_events),
        Command::AdvanceAmmo => combat::advance_ammo(world, out_events),
    }
}

/// Draws the session: clears the canvas, draws every visible entity in
/// registration order, then overlays the grid.
pub fn draw(world: &World, canvas: &mut dyn Canvas) {
    canvas.clear();
    for slot in &world.entities {
        slot.kind.object().draw(canvas);
    }
    let (columns, rows) = world.grid.dimensions();
    canvas.draw_grid(columns, rows);
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Actor, Ammo, Entity, EntityKind, GameConfig, GameObject, Grid, World};
    use rol_core::{
        ActorSnapshot, ActorView, AmmoSnapshot, AmmoView, CellCoord, CellQuery, EntityId, KeyCode,
        TurnPhase,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Phase the session is currently in.
    #[must_use]
    pub fn turn_phase(world: &World) -> TurnPhase {
        world.turn_phase
    }

    /// Configuration the session was created with.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }

    /// Provides read-only access to the occupancy grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Classifies a cell relative to the asking entity.
    #[must_use]
    pub fn cell_query(world: &World, cell: CellCoord, asking: Option<EntityId>) -> CellQuery {
        world.grid.query_occupant(cell, asking)
    }

    /// Snapshot of the player, if one is registered.
    #[must_use]
    pub fn player(world: &World) -> Option<ActorSnapshot> {
        let id = world.player?;
        world.actor(id).map(|actor| actor_snapshot(id, actor))
    }

    /// Reports whether the registered player was killed.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.player_defeated
    }

    /// Captures the enemy roster in registration order.
    #[must_use]
    pub fn enemy_view(world: &World) -> ActorView {
        let snapshots = world
            .enemies
            .iter()
            .filter_map(|id| world.actor(*id).map(|actor| actor_snapshot(*id, actor)))
            .collect();
        ActorView::from_snapshots(snapshots)
    }

    /// Captures every registered actor in registration order.
    #[must_use]
    pub fn actor_view(world: &World) -> ActorView {
        let snapshots = world
            .entities
            .iter()
            .filter_map(|slot| slot.kind.as_actor().map(|actor| actor_snapshot(slot.id, actor)))
            .collect();
        ActorView::from_snapshots(snapshots)
    }

    /// Captures all live ammo in firing order.
    #[must_use]
    pub fn ammo_view(world: &World) -> AmmoView {
        let snapshots = world
            .ammo
            .iter()
            .filter_map(|id| world.ammo_entity(*id).map(|ammo| ammo_snapshot(*id, ammo)))
            .collect();
        AmmoView::from_snapshots(snapshots)
    }

    /// Identifiers of every registered entity in registration order.
    #[must_use]
    pub fn entity_ids(world: &World) -> Vec<EntityId> {
        world.entities.iter().map(|slot: &Entity| slot.id).collect()
    }

    /// Game object of a registered entity.
    #[must_use]
    pub fn game_object(world: &World, entity: EntityId) -> Option<&GameObject> {
        world.entity(entity).map(EntityKind::object)
    }

    /// Actor data of a registered actor.
    #[must_use]
    pub fn actor(world: &World, entity: EntityId) -> Option<&Actor> {
        world.actor(entity)
    }

    /// Ammo data of live ammo.
    #[must_use]
    pub fn ammo(world: &World, entity: EntityId) -> Option<&Ammo> {
        world.ammo_entity(entity)
    }

    /// Reports whether a raw key code is currently held.
    #[must_use]
    pub fn is_key_down(world: &World, code: KeyCode) -> bool {
        world.keys_down.contains(&code)
    }

    fn actor_snapshot(id: EntityId, actor: &Actor) -> ActorSnapshot {
        ActorSnapshot {
            id,
            role: actor.role(),
            cell: actor.object().cell(),
            facing: actor.object().facing(),
            live: actor.live(),
            live_now: actor.live_now(),
        }
    }

    fn ammo_snapshot(id: EntityId, ammo: &Ammo) -> AmmoSnapshot {
        AmmoSnapshot {
            id,
            owner: ammo.owner(),
            owner_role: ammo.owner_role(),
            cell: ammo.object().cell(),
            direction: ammo.direction(),
            damage: ammo.damage(),
            steps: ammo.steps(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rol_core::CellStatus;

    fn actor(name: &str, cell: CellCoord, role: Role, live: u32) -> Actor {
        Actor::new(GameObject::new(name, cell), role, live)
    }

    #[test]
    fn world_greets_on_creation() {
        let world = World::new();
        assert_eq!(query::welcome_banner(&world), WELCOME_BANNER);
        assert_eq!(query::turn_phase(&world), TurnPhase::None);
        assert_eq!(query::grid(&world).dimensions(), (20, 20));
    }

    #[test]
    fn registration_rejects_occupied_and_out_of_bounds_cells() {
        let mut world = World::new();
        let mut events = Vec::new();
        let cell = CellCoord::new(4, 4);
        let first = world
            .register_actor(actor("Hero", cell, Role::Player, 3), &mut events)
            .expect("free cell");

        assert_eq!(
            world.register_actor(actor("Goblin", cell, Role::Enemy, 1), &mut events),
            Err(RegistrationError::Occupied {
                cell,
                occupant: first
            })
        );
        assert_eq!(
            world.register_actor(
                actor("Goblin", CellCoord::new(20, 0), Role::Enemy, 1),
                &mut events
            ),
            Err(RegistrationError::OutOfBounds {
                cell: CellCoord::new(20, 0)
            })
        );
        assert!(query::enemy_view(&world).is_empty());
        assert_eq!(query::entity_ids(&world), vec![first]);
        assert_eq!(
            events,
            vec![Event::EntityRegistered {
                entity: first,
                cell
            }]
        );
    }

    #[test]
    fn unregister_clears_every_roster() {
        let mut world = World::new();
        let mut events = Vec::new();
        let hero = world
            .register_actor(actor("Hero", CellCoord::new(0, 0), Role::Player, 3), &mut events)
            .expect("hero");
        let goblin = world
            .register_actor(actor("Goblin", CellCoord::new(3, 0), Role::Enemy, 1), &mut events)
            .expect("goblin");

        assert!(world.unregister(goblin, &mut events));
        assert!(world.unregister(hero, &mut events));
        assert!(!world.unregister(hero, &mut events));

        assert!(query::player(&world).is_none());
        assert!(query::enemy_view(&world).is_empty());
        assert!(query::entity_ids(&world).is_empty());
        assert_eq!(query::grid(&world).occupied().count(), 0);
    }

    #[test]
    fn move_entity_keeps_unset_axes() {
        let mut world = World::new();
        let mut events = Vec::new();
        let hero = world
            .register_actor(actor("Hero", CellCoord::new(2, 2), Role::Player, 3), &mut events)
            .expect("hero");

        let moved = world
            .move_entity(
                hero,
                CellTarget {
                    x: Some(5),
                    y: None,
                },
                &mut events,
            )
            .expect("free destination");
        assert_eq!(moved, CellCoord::new(5, 2));
        assert_eq!(query::grid(&world).occupant(CellCoord::new(5, 2)), Some(hero));
        assert_eq!(query::grid(&world).occupant(CellCoord::new(2, 2)), None);

        events.clear();
        let unchanged = world
            .move_entity(hero, CellTarget::unchanged(), &mut events)
            .expect("no-op");
        assert_eq!(unchanged, CellCoord::new(5, 2));
        assert!(events.is_empty());
    }

    #[test]
    fn move_entity_refuses_to_break_single_occupancy() {
        let mut world = World::new();
        let mut events = Vec::new();
        let hero = world
            .register_actor(actor("Hero", CellCoord::new(0, 0), Role::Player, 3), &mut events)
            .expect("hero");
        let pillar = world
            .register_actor(
                actor("Pillar", CellCoord::new(1, 0), Role::StaticObject, 1),
                &mut events,
            )
            .expect("pillar");

        assert_eq!(
            world.move_entity(hero, CellTarget::to(CellCoord::new(1, 0)), &mut events),
            Err(MoveError::Occupied {
                cell: CellCoord::new(1, 0),
                occupant: pillar
            })
        );
        assert_eq!(
            world.move_entity(hero, CellTarget::to(CellCoord::new(-1, 0)), &mut events),
            Err(MoveError::OutOfBounds {
                cell: CellCoord::new(-1, 0)
            })
        );
        assert_eq!(
            world.move_entity(EntityId::new(99), CellTarget::unchanged(), &mut events),
            Err(MoveError::UnknownEntity {
                entity: EntityId::new(99)
            })
        );
        assert_eq!(query::grid(&world).occupant(CellCoord::new(0, 0)), Some(hero));
    }

    #[test]
    fn step_command_reports_rejections() {
        let mut world = World::new();
        let mut events = Vec::new();
        let hero = world
            .register_actor(actor("Hero", CellCoord::new(0, 0), Role::Player, 3), &mut events)
            .expect("hero");
        events.clear();

        apply(
            &mut world,
            Command::StepEntity {
                entity: hero,
                target: CellCoord::new(0, -1),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::MoveRejected {
                entity: hero,
                target: CellCoord::new(0, -1),
                status: CellStatus::OutOfBounds,
            }]
        );
    }

    #[test]
    fn keys_are_tracked_until_released() {
        let mut world = World::new();
        world.key_down(Key::Up.code());
        assert!(query::is_key_down(&world, Key::Up.code()));
        world.key_up(Key::Up.code());
        assert!(!query::is_key_down(&world, Key::Up.code()));
    }

    #[test]
    fn invalid_configuration_is_refused() {
        let mut config = GameConfig::default();
        config.screen.columns = 0;
        assert!(matches!(
            World::with_config(config),
            Err(ConfigError::InvalidDimensions { .. })
        ));
    }
}
