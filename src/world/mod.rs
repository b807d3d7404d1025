pub mod bounds;
pub mod resource;
pub mod spawner;
pub mod world;

pub use bounds::Bounds;
pub use resource::{NodeKind, ResourceNode};
pub use spawner::ResourceSpawner;
pub use world::World;
