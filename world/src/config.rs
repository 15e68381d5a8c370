//! Session configuration loaded from TOML.

use std::time::Duration;

use rol_core::CellCoord;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_CELL_SIZE: u32 = 20;
const DEFAULT_COLUMNS: u32 = 20;
const DEFAULT_ROWS: u32 = 20;
const DEFAULT_LOOP_TIMEOUT_MS: u64 = 30;
const DEFAULT_SPAWN_ATTEMPTS: u32 = 1024;
const DEFAULT_RNG_SEED: u64 = 0x726f_6c5f_7365_6564;

/// Errors raised while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid TOML or does not match the schema.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// The grid would contain no cells.
    #[error("grid must span at least one cell, got {columns}x{rows}")]
    InvalidDimensions {
        /// Configured column count.
        columns: u32,
        /// Configured row count.
        rows: u32,
    },
    /// Cells would have no pixel extent.
    #[error("cell size must be positive")]
    InvalidCellSize,
}

/// Complete configuration of a game session.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Grid geometry.
    pub screen: ScreenConfig,
    /// Delay between ticks an external driver should honour, in milliseconds.
    pub loop_timeout_ms: u64,
    /// Hero settings.
    pub player: PlayerConfig,
    /// Settings applied to every spawned enemy.
    pub enemy: EnemyConfig,
    /// Settings applied to every fired ammo.
    pub ammo: AmmoConfig,
    /// Upper bound on random cells sampled when spawning.
    pub spawn_attempts: u32,
    /// Seed of the spawn placement generator.
    pub rng_seed: u64,
    /// Cells holding static pillars registered at session setup.
    pub pillars: Vec<[i32; 2]>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen: ScreenConfig::default(),
            loop_timeout_ms: DEFAULT_LOOP_TIMEOUT_MS,
            player: PlayerConfig::default(),
            enemy: EnemyConfig::default(),
            ammo: AmmoConfig::default(),
            spawn_attempts: DEFAULT_SPAWN_ATTEMPTS,
            rng_seed: DEFAULT_RNG_SEED,
            pillars: vec![[10, 10]],
        }
    }
}

impl GameConfig {
    /// Parses and validates a TOML document; missing keys take defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration describes a usable grid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ScreenConfig {
            cell_size,
            columns,
            rows,
        } = self.screen;
        if columns == 0 || rows == 0 {
            return Err(ConfigError::InvalidDimensions { columns, rows });
        }
        if cell_size == 0 {
            return Err(ConfigError::InvalidCellSize);
        }
        Ok(())
    }

    /// Tick delay as a duration.
    #[must_use]
    pub fn loop_timeout(&self) -> Duration {
        Duration::from_millis(self.loop_timeout_ms)
    }

    /// Cells holding pillars.
    pub fn pillar_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.pillars.iter().map(|&[x, y]| CellCoord::new(x, y))
    }
}

/// Grid geometry in cells and pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Side length of a cell in pixels.
    pub cell_size: u32,
    /// Number of columns.
    pub columns: u32,
    /// Number of rows.
    pub rows: u32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
        }
    }
}

impl ScreenConfig {
    /// Screen width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.cell_size.saturating_mul(self.columns)
    }

    /// Screen height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.cell_size.saturating_mul(self.rows)
    }
}

/// Hero settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Display name.
    pub name: String,
    /// Maximum hit points.
    pub hit_points: u32,
    /// Starting cell as `[x, y]`.
    pub start: [i32; 2],
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            name: String::from("Hero"),
            hit_points: 3,
            start: [0, 0],
        }
    }
}

impl PlayerConfig {
    /// Starting cell.
    #[must_use]
    pub const fn start_cell(&self) -> CellCoord {
        CellCoord::new(self.start[0], self.start[1])
    }
}

/// Enemy settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Display name.
    pub name: String,
    /// Maximum hit points.
    pub hit_points: u32,
    /// Largest distance along the open axis at which an aligned enemy fires.
    pub engage_range: u32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            name: String::from("Goblin"),
            hit_points: 1,
            engage_range: 1,
        }
    }
}

/// Ammo settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AmmoConfig {
    /// Display name.
    pub name: String,
    /// Damage applied on hit.
    pub damage: u32,
    /// Number of cells the ammo may travel.
    pub range: u32,
}

impl Default for AmmoConfig {
    fn default() -> Self {
        Self {
            name: String::from("bullet"),
            damage: 1,
            range: u32::MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = GameConfig::from_toml_str("").expect("defaults parse");
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.screen.width(), 400);
        assert_eq!(config.screen.height(), 400);
        assert_eq!(config.loop_timeout(), Duration::from_millis(30));
        assert_eq!(
            config.pillar_cells().collect::<Vec<_>>(),
            vec![CellCoord::new(10, 10)]
        );
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let config = GameConfig::from_toml_str(
            r#"
            rng_seed = 7
            pillars = []

            [screen]
            columns = 8

            [enemy]
            engage_range = 3
            "#,
        )
        .expect("config parses");

        assert_eq!(config.screen.columns, 8);
        assert_eq!(config.screen.rows, 20);
        assert_eq!(config.enemy.engage_range, 3);
        assert_eq!(config.enemy.name, "Goblin");
        assert_eq!(config.rng_seed, 7);
        assert!(config.pillars.is_empty());
        assert_eq!(config.player.start_cell(), CellCoord::new(0, 0));
    }

    #[test]
    fn zero_sized_grid_is_rejected() {
        let error = GameConfig::from_toml_str("[screen]\nrows = 0\n").unwrap_err();
        assert!(matches!(
            error,
            ConfigError::InvalidDimensions {
                columns: 20,
                rows: 0
            }
        ));
    }

    #[test]
    fn zero_cell_size_is_rejected() {
        let error = GameConfig::from_toml_str("[screen]\ncell_size = 0\n").unwrap_err();
        assert!(matches!(error, ConfigError::InvalidCellSize));
    }

    #[test]
    fn malformed_documents_report_parse_errors() {
        let error = GameConfig::from_toml_str("screen = 3").unwrap_err();
        assert!(matches!(error, ConfigError::Parse(_)));
    }
}
