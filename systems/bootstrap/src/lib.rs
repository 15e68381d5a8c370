#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session bootstrap that assembles a playable Rol world.

use rol_core::{Color, Command, Event, Figure, Key, Role, Sprite, TurnPhase};
use rol_system_combat::{AmmoFlight, Firing};
use rol_system_enemy_ai::EnemyAi;
use rol_world::{query, Actor, ConfigError, GameConfig, GameObject, RegistrationError, World};
use thiserror::Error;

const BLACK: Color = Color::from_rgb(0, 0, 0);
const GREEN: Color = Color::from_rgb(0, 0x80, 0);
const BLUE: Color = Color::from_rgb(0, 0, 0xff);
const RED: Color = Color::from_rgb(0xff, 0, 0);

const HERO_SPRITE: Sprite = Sprite::new(Figure::Pacman, GREEN, BLUE);
const ENEMY_SPRITE: Sprite = Sprite::new(Figure::Rectangle, BLACK, RED);
const PILLAR_SPRITE: Sprite = Sprite::new(Figure::Rectangle, BLACK, BLUE);
const AMMO_SPRITE: Sprite = Sprite::new(Figure::Circle, BLACK, RED);

/// Failures raised while assembling a session.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A configured actor could not be placed.
    #[error("failed to place {name}")]
    Placement {
        /// Name of the actor.
        name: String,
        /// Underlying registration failure.
        #[source]
        source: RegistrationError,
    },
}

/// Prepares sessions from a configuration.
#[derive(Debug, Default)]
pub struct Bootstrap {
    config: GameConfig,
}

impl Bootstrap {
    /// Creates a bootstrap for the provided configuration.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }

    /// Configuration sessions are built from.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Derives the banner that should be shown when the session starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Builds a started session: the hero and pillars are placed, sprites
    /// are assigned and every key and phase action is wired.
    pub fn build(&self, out_events: &mut Vec<Event>) -> Result<World, BootstrapError> {
        let mut world = World::with_config(self.config.clone())?;
        world.set_enemy_sprite(ENEMY_SPRITE);
        world.set_ammo_sprite(AMMO_SPRITE);

        let player = &self.config.player;
        let hero = Actor::new(
            GameObject::new(player.name.clone(), player.start_cell()).with_sprite(HERO_SPRITE),
            Role::Player,
            player.hit_points,
        );
        place(&mut world, hero, out_events)?;

        for cell in self.config.pillar_cells() {
            let pillar = Actor::new(
                GameObject::new("Pillar", cell).with_sprite(PILLAR_SPRITE),
                Role::StaticObject,
                1,
            );
            place(&mut world, pillar, out_events)?;
        }

        wire_actions(&mut world, self.config.enemy.engage_range);
        tracing::info!(
            "Session ready: {}x{} cells, {} pillars",
            self.config.screen.columns,
            self.config.screen.rows,
            self.config.pillars.len()
        );
        world.start(out_events);
        Ok(world)
    }
}

fn place(world: &mut World, actor: Actor, out_events: &mut Vec<Event>) -> Result<(), BootstrapError> {
    let name = actor.object().name().to_owned();
    let _ = world
        .register_actor(actor, out_events)
        .map_err(|source| BootstrapError::Placement { name, source })?;
    Ok(())
}

fn wire_actions(world: &mut World, engage_range: u32) {
    world.register_key_action(Key::Fire, |_: &World, out: &mut Vec<Command>| {
        out.push(Command::SetTurnPhase {
            phase: TurnPhase::PlayerAct,
        });
    });

    let firing = Firing::new();
    world.register_phase_action(TurnPhase::PlayerAct, move |world: &World, out: &mut Vec<Command>| {
        firing.handle(query::player(world).as_ref(), out);
    });

    for phase in [TurnPhase::PlayerWaitEnd, TurnPhase::EnemyWaitEnd] {
        let flight = AmmoFlight::new();
        world.register_phase_action(phase, move |world: &World, out: &mut Vec<Command>| {
            flight.handle(&query::ammo_view(world), out);
        });
    }

    let enemy_ai = EnemyAi::new(engage_range);
    world.register_phase_action(TurnPhase::EnemyAct, move |world: &World, out: &mut Vec<Command>| {
        enemy_ai.handle(query::player(world).as_ref(), &query::enemy_view(world), out);
    });
}
