use crate::config::SimulationConfig;
use crate::ids::ResourceId;
use crate::world::resource::NodeKind;
use crate::world::World;
use tracing::debug;

/// Initial world population and periodic respawn of resource nodes
#[derive(Clone, Debug, Default)]
pub struct ResourceSpawner {
    elapsed_ms: f64,
}

impl ResourceSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place the configured initial nodes of every kind
    pub fn populate(world: &mut World, config: &SimulationConfig, rng: &mut fastrand::Rng) -> Vec<ResourceId> {
        let mut placed = Vec::new();
        for kind in NodeKind::ALL {
            for _ in 0..config.resources.node(kind).initial {
                let p = world.bounds().random_point(config.world.spawn_margin, rng);
                placed.push(world.add_resource(kind, p, &config.resources));
            }
        }
        debug!(count = placed.len(), "world populated");
        placed
    }

    /// Advance the respawn timer; on each interval, top up every kind that is
    /// below its maximum. Scarcer kinds roll a higher spawn chance.
    pub fn tick(
        &mut self,
        dt_ms: f64,
        world: &mut World,
        config: &SimulationConfig,
        rng: &mut fastrand::Rng,
    ) -> Vec<ResourceId> {
        self.elapsed_ms += dt_ms;
        if self.elapsed_ms < config.spawner.interval_ms {
            return Vec::new();
        }
        self.elapsed_ms -= config.spawner.interval_ms;

        let mut placed = Vec::new();
        for kind in NodeKind::ALL {
            let node_cfg = config.resources.node(kind);
            if node_cfg.max == 0 {
                continue;
            }
            let present = world.count(kind);
            let needed = node_cfg.max.saturating_sub(present);
            let fraction = present as f64 / node_cfg.max as f64;
            let chance = if fraction < node_cfg.low_fraction {
                node_cfg.chance_when_low
            } else {
                node_cfg.chance_otherwise
            };

            for _ in 0..needed.min(node_cfg.batch) {
                if rng.f64() < chance {
                    let p = world.open_position(
                        config.world.spawn_margin,
                        config.spawner.min_spacing,
                        config.spawner.placement_attempts,
                        rng,
                    );
                    let id = world.add_resource(kind, p, &config.resources);
                    debug!(%id, kind = kind.as_str(), "resource spawned");
                    placed.push(id);
                }
            }
        }
        placed
    }
}
