use crate::direction::Vec2;
use crate::error::Result;
use crate::ids::{AgentId, ColonyId, ResourceId};
use crate::simulation::clock::Phase;
use crate::stock::ResourceKind;
use std::fmt;

/// User input that can be queued for the start of the next tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Arm placement of a new colony
    BeginPlacement,
    /// Place the first colony, or found one while placement is armed
    Place(Vec2),
    /// Hatch an ant at a colony
    Spawn(ColonyId),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::BeginPlacement => write!(f, "begin placement"),
            Command::Place(p) => write!(f, "place colony at {p}"),
            Command::Spawn(c) => write!(f, "spawn at {c}"),
        }
    }
}

/// Successful result of a command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    PlacementArmed,
    Placed(ColonyId),
    Spawned(AgentId),
}

/// Comings and goings of the spider
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpiderEvent {
    Appeared(Vec2),
    Left,
}

/// Everything observable that happened during one tick
#[derive(Debug, Default)]
pub struct TickEvents {
    /// Ants removed by the snake, in capture order
    pub captures: Vec<AgentId>,
    /// Ants hatched by colonies or by queued spawn commands
    pub spawns: Vec<AgentId>,
    pub deposits: Vec<(ColonyId, ResourceKind, f64)>,
    pub phase_change: Option<Phase>,
    /// Colonies placed by queued commands
    pub founded: Vec<ColonyId>,
    pub resources_spawned: Vec<ResourceId>,
    pub resources_pruned: Vec<ResourceId>,
    pub spider: Option<SpiderEvent>,
    pub webs_spun: usize,
    /// Queued commands applied at the start of this tick, with their results
    pub commands: Vec<(Command, Result<CommandOutcome>)>,
}

impl TickEvents {
    /// Total deposited this tick for `kind`
    pub fn deposited(&self, kind: ResourceKind) -> f64 {
        self.deposits
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .map(|(_, _, amount)| amount)
            .sum()
    }

    /// Nothing a reader of the event log would care about
    pub fn is_quiet(&self) -> bool {
        self.captures.is_empty()
            && self.spawns.is_empty()
            && self.phase_change.is_none()
            && self.founded.is_empty()
            && self.spider.is_none()
            && self.commands.is_empty()
    }
}
