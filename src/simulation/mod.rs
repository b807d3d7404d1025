pub mod clock;
pub mod engine;
pub mod events;
pub mod report;
pub mod stats;

pub use clock::{Phase, SimulationClock};
pub use engine::{Simulation, SimulationBuilder};
pub use events::{Command, CommandOutcome, SpiderEvent, TickEvents};
pub use stats::{Ledger, Summary};
