pub mod snake;
pub mod spider;

pub use snake::Snake;
pub use spider::{Spider, SpiderState, Web};

use crate::direction::Vec2;
use crate::simulation::clock::Phase;
use crate::world::World;

/// Capabilities shared by everything that hunts or frightens ants
pub trait Predator {
    /// Head position; the point ants flee from
    fn position(&self) -> Vec2;

    /// Whether ants currently treat this predator as a threat
    fn is_threatening(&self) -> bool;

    /// React once to a day/night transition
    fn on_phase_change(&mut self, phase: Phase, world: &World, rng: &mut fastrand::Rng);
}

/// Threat points of every threatening predator, in the order given
pub fn threat_points<'a, I>(predators: I) -> Vec<Vec2>
where
    I: IntoIterator<Item = &'a dyn Predator>,
{
    predators
        .into_iter()
        .filter(|p| p.is_threatening())
        .map(|p| p.position())
        .collect()
}
