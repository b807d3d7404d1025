//! # Ant Colony Sim
//!
//! A tick-driven simulation of ant colonies foraging for minerals and plants
//! while a snake hunts them and, at night, a spider spins webs.
//!
//! This library provides the simulation core: the spatial world and its
//! resource nodes, the ant state machine, colony economics, the predators and
//! the scheduler that advances them all in a fixed order. Rendering and input
//! are left to the caller, which reads snapshots and issues commands.

pub mod ant;
pub mod cli;
pub mod colony;
pub mod config;
pub mod direction;
pub mod error;
pub mod ids;
pub mod predator;
pub mod simulation;
pub mod stock;
pub mod world;

pub use ant::{Ant, AntState};
pub use cli::Args;
pub use colony::Colony;
pub use config::SimulationConfig;
pub use direction::{Direction, Vec2};
pub use error::{Result, SimError};
pub use ids::{AgentId, ColonyId, ResourceId};
pub use predator::{Predator, Snake, Spider};
pub use simulation::{Command, Phase, Simulation, TickEvents};
pub use stock::{ResourceKind, Stock};
pub use world::{NodeKind, ResourceNode, World};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        AgentId, Ant, AntState, Args, ColonyId, Command, Direction, NodeKind, Phase, Result, SimError,
        Simulation, SimulationConfig, Stock, TickEvents, Vec2,
    };
}
