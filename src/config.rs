//! Simulation parameters.
//!
//! Every section has defaults taken from the game's tuning, and every field
//! is optional in a TOML file, so a config only names what it changes:
//!
//! ```toml
//! [world]
//! width = 640
//!
//! [colony]
//! max_agents = 20
//! ant_cost = { minerals = 4, plants = 10 }
//!
//! [snake]
//! speed = 45.0
//! ```
//!
//! Speeds are world units per second, regeneration is content per second and
//! every timer is in milliseconds.

use crate::error::{Result, SimError};
use crate::stock::Stock;
use crate::world::NodeKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// World bounds and placement margins
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f64,
    pub height: f64,
    /// Distance from an edge at which moving entities turn back inward
    pub edge_buffer: f64,
    /// Resources are never placed closer than this to an edge
    pub spawn_margin: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 480.0,
            height: 800.0,
            edge_buffer: 20.0,
            spawn_margin: 20.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AntConfig {
    pub size: f64,
    pub speed: f64,
    pub perception_radius: f64,
    /// Total cargo across all resource kinds
    pub carry_capacity: f64,
    /// Spawned ants appear up to this far from their colony on each axis
    pub spawn_jitter: f64,
}

impl Default for AntConfig {
    fn default() -> Self {
        Self {
            size: 3.0,
            speed: 48.0,
            perception_radius: 40.0,
            carry_capacity: 10.0,
            spawn_jitter: 10.0,
        }
    }
}

/// Per-kind resource node tuning
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct NodeConfig {
    pub capacity: f64,
    /// Contact radius; an ant touches the node within `ant.size + size`
    pub size: f64,
    pub regen_per_sec: f64,
    /// Nodes placed when the world is populated
    pub initial: usize,
    /// The spawner stops adding nodes of this kind at this count
    pub max: usize,
    /// Nodes the spawner may add in one round
    pub batch: usize,
    /// Spawn chance per slot while the population fraction is below `low_fraction`
    pub chance_when_low: f64,
    pub chance_otherwise: f64,
    pub low_fraction: f64,
}

impl NodeConfig {
    fn rock() -> Self {
        Self {
            capacity: 50.0,
            size: 20.0,
            regen_per_sec: 0.0,
            initial: 10,
            max: 25,
            batch: 2,
            chance_when_low: 0.8,
            chance_otherwise: 0.4,
            low_fraction: 0.3,
        }
    }

    fn plant() -> Self {
        Self {
            capacity: 30.0,
            size: 10.0,
            regen_per_sec: 0.5,
            initial: 10,
            max: 25,
            batch: 3,
            chance_when_low: 0.9,
            chance_otherwise: 0.5,
            low_fraction: 0.4,
        }
    }

    fn bush() -> Self {
        Self {
            capacity: 10.0,
            size: 15.0,
            regen_per_sec: 0.25,
            initial: 20,
            max: 45,
            batch: 2,
            chance_when_low: 0.7,
            chance_otherwise: 0.3,
            low_fraction: 0.3,
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self::plant()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ResourcesConfig {
    pub rock: NodeConfig,
    pub plant: NodeConfig,
    pub bush: NodeConfig,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            rock: NodeConfig::rock(),
            plant: NodeConfig::plant(),
            bush: NodeConfig::bush(),
        }
    }
}

impl ResourcesConfig {
    pub fn node(&self, kind: NodeKind) -> &NodeConfig {
        match kind {
            NodeKind::Rock => &self.rock,
            NodeKind::Plant => &self.plant,
            NodeKind::Bush => &self.bush,
        }
    }

    /// Upper bound on live nodes across all kinds
    pub fn max_nodes(&self) -> usize {
        NodeKind::ALL.iter().map(|&k| self.node(k).max).sum()
    }
}

/// Periodic resource respawn
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SpawnerConfig {
    pub interval_ms: f64,
    /// Preferred minimum distance between a new node and existing ones
    pub min_spacing: f64,
    pub placement_attempts: usize,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            interval_ms: 4000.0,
            min_spacing: 30.0,
            placement_attempts: 10,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ColonyConfig {
    /// Contact radius for deposits and the snake's no-hunt radius
    pub size: f64,
    /// Outer footprint; the spider reacts to colonies within twice this
    pub outer_size: f64,
    pub max_agents: u32,
    pub spawn_interval_ms: f64,
    /// Stock of the primary colony when placed
    pub initial_stock: Stock,
    pub ant_cost: Stock,
    pub founding_cost: Stock,
    /// Ants hatched free of cost with the primary colony
    pub initial_ants: u32,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            size: 10.0,
            outer_size: 25.0,
            max_agents: 12,
            spawn_interval_ms: 8000.0,
            initial_stock: Stock::new(200.0, 100.0),
            ant_cost: Stock::new(8.0, 15.0),
            founding_cost: Stock::new(200.0, 400.0),
            initial_ants: 2,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SnakeConfig {
    pub speed: f64,
    pub perception_radius: f64,
    pub capture_distance: f64,
    pub initial_length: usize,
    /// Per-tick chance of a new heading when nothing is in reach
    pub wander_chance: f64,
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            speed: 30.0,
            perception_radius: 10.0,
            capture_distance: 4.0,
            initial_length: 15,
            wander_chance: 0.02,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SpiderConfig {
    pub enabled: bool,
    /// Per-tick chance of a spider appearing during the night
    pub spawn_chance: f64,
    pub speed: f64,
    pub wander_chance: f64,
    /// Ants within this distance of the spider count towards a challenge
    pub alert_radius: f64,
    pub ants_to_challenge: usize,
    /// Chance to flee rather than die when challenged
    pub flee_chance: f64,
    pub flee_ms: f64,
    pub dying_ms: f64,
    /// Time a spider caught without shelter at dawn takes to die
    pub daylight_dying_ms: f64,
    pub web_chance: f64,
    pub fleeing_web_chance: f64,
    pub web_cooldown_ms: f64,
    pub web_radius: f64,
    /// Entangled ants move at this fraction of their speed
    pub web_slow_factor: f64,
    pub web_slow_ms: f64,
    /// A web breaks after holding an ant this long
    pub web_hold_ms: f64,
}

impl Default for SpiderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            spawn_chance: 0.1,
            speed: 38.0,
            wander_chance: 0.02,
            alert_radius: 50.0,
            ants_to_challenge: 3,
            flee_chance: 0.7,
            flee_ms: 3000.0,
            dying_ms: 1500.0,
            daylight_dying_ms: 3500.0,
            web_chance: 0.005,
            fleeing_web_chance: 0.05,
            web_cooldown_ms: 2000.0,
            web_radius: 8.0,
            web_slow_factor: 0.5,
            web_slow_ms: 5000.0,
            web_hold_ms: 5000.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DayNightConfig {
    /// Full day plus night; the second half is night
    pub cycle_ms: f64,
    pub ant_night_speed_multiplier: f64,
    pub ant_night_perception_multiplier: f64,
    /// Webs are swept away during this window after a quarter cycle
    pub midday_window_ms: f64,
}

impl Default for DayNightConfig {
    fn default() -> Self {
        Self {
            cycle_ms: 180_000.0,
            ant_night_speed_multiplier: 0.75,
            ant_night_perception_multiplier: 0.625,
            midday_window_ms: 1000.0,
        }
    }
}

/// Complete simulation configuration
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub world: WorldConfig,
    pub ant: AntConfig,
    pub resources: ResourcesConfig,
    pub spawner: SpawnerConfig,
    pub colony: ColonyConfig,
    pub snake: SnakeConfig,
    pub spider: SpiderConfig,
    pub day_night: DayNightConfig,
}

impl SimulationConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(src: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let src = std::fs::read_to_string(path)?;
        Self::from_toml_str(&src)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        fn positive(name: &str, v: f64) -> Result<()> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(SimError::InvalidConfig(format!("{name} must be positive, got {v}")))
            }
        }
        fn non_negative(name: &str, v: f64) -> Result<()> {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(SimError::InvalidConfig(format!("{name} must not be negative, got {v}")))
            }
        }
        fn probability(name: &str, v: f64) -> Result<()> {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(SimError::InvalidConfig(format!("{name} must be within [0, 1], got {v}")))
            }
        }

        positive("world.width", self.world.width)?;
        positive("world.height", self.world.height)?;
        non_negative("world.edge_buffer", self.world.edge_buffer)?;
        non_negative("world.spawn_margin", self.world.spawn_margin)?;
        if 2.0 * self.world.spawn_margin >= self.world.width.min(self.world.height) {
            return Err(SimError::InvalidConfig(
                "world.spawn_margin leaves no room to place resources".to_string(),
            ));
        }

        positive("ant.size", self.ant.size)?;
        positive("ant.speed", self.ant.speed)?;
        positive("ant.perception_radius", self.ant.perception_radius)?;
        positive("ant.carry_capacity", self.ant.carry_capacity)?;
        non_negative("ant.spawn_jitter", self.ant.spawn_jitter)?;

        for kind in NodeKind::ALL {
            let node = self.resources.node(kind);
            let name = kind.as_str();
            positive(&format!("resources.{name}.capacity"), node.capacity)?;
            positive(&format!("resources.{name}.size"), node.size)?;
            non_negative(&format!("resources.{name}.regen_per_sec"), node.regen_per_sec)?;
            probability(&format!("resources.{name}.chance_when_low"), node.chance_when_low)?;
            probability(&format!("resources.{name}.chance_otherwise"), node.chance_otherwise)?;
            probability(&format!("resources.{name}.low_fraction"), node.low_fraction)?;
        }

        positive("spawner.interval_ms", self.spawner.interval_ms)?;
        non_negative("spawner.min_spacing", self.spawner.min_spacing)?;

        positive("colony.size", self.colony.size)?;
        positive("colony.outer_size", self.colony.outer_size)?;
        positive("colony.spawn_interval_ms", self.colony.spawn_interval_ms)?;
        if self.colony.max_agents == 0 {
            return Err(SimError::InvalidConfig(
                "colony.max_agents must be at least 1".to_string(),
            ));
        }
        for (name, stock) in [
            ("colony.initial_stock", &self.colony.initial_stock),
            ("colony.ant_cost", &self.colony.ant_cost),
            ("colony.founding_cost", &self.colony.founding_cost),
        ] {
            non_negative(&format!("{name}.minerals"), stock.minerals)?;
            non_negative(&format!("{name}.plants"), stock.plants)?;
        }

        positive("snake.speed", self.snake.speed)?;
        positive("snake.perception_radius", self.snake.perception_radius)?;
        positive("snake.capture_distance", self.snake.capture_distance)?;
        probability("snake.wander_chance", self.snake.wander_chance)?;
        if self.snake.initial_length == 0 {
            return Err(SimError::InvalidConfig(
                "snake.initial_length must be at least 1".to_string(),
            ));
        }

        probability("spider.spawn_chance", self.spider.spawn_chance)?;
        positive("spider.speed", self.spider.speed)?;
        probability("spider.wander_chance", self.spider.wander_chance)?;
        probability("spider.flee_chance", self.spider.flee_chance)?;
        probability("spider.web_chance", self.spider.web_chance)?;
        probability("spider.fleeing_web_chance", self.spider.fleeing_web_chance)?;
        probability("spider.web_slow_factor", self.spider.web_slow_factor)?;
        positive("spider.web_radius", self.spider.web_radius)?;

        positive("day_night.cycle_ms", self.day_night.cycle_ms)?;
        positive(
            "day_night.ant_night_speed_multiplier",
            self.day_night.ant_night_speed_multiplier,
        )?;
        positive(
            "day_night.ant_night_perception_multiplier",
            self.day_night.ant_night_perception_multiplier,
        )?;
        non_negative("day_night.midday_window_ms", self.day_night.midday_window_ms)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.world.width, 480.0);
        assert_eq!(config.world.height, 800.0);
        assert_eq!(config.colony.ant_cost, Stock::new(8.0, 15.0));
        assert_eq!(config.resources.max_nodes(), 95);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let src = r#"
            [colony]
            max_agents = 20
            ant_cost = { plants = 10 }

            [resources.rock]
            capacity = 75.0
        "#;
        let config = SimulationConfig::from_toml_str(src).unwrap();
        assert_eq!(config.colony.max_agents, 20);
        assert_eq!(config.colony.ant_cost, Stock::new(0.0, 10.0));
        assert_eq!(config.resources.rock.capacity, 75.0);
        // Untouched sections keep their defaults
        assert_eq!(config.resources.rock.size, 20.0);
        assert_eq!(config.snake, SnakeConfig::default());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = SimulationConfig::from_toml_str("").unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = SimulationConfig::from_toml_str("[world]\nwidth = -1.0\n").unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(_)));

        let err = SimulationConfig::from_toml_str("[snake]\nwander_chance = 1.5\n").unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(_)));

        let err = SimulationConfig::from_toml_str("[colony]\nmax_agents = 0\n").unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(_)));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let err = SimulationConfig::from_toml_str("[world\nwidth = 1").unwrap_err();
        assert!(matches!(err, SimError::Toml(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = SimulationConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, SimError::Io(_)));
    }
}
