use crate::ant::Ant;
use crate::config::{AntConfig, ColonyConfig};
use crate::direction::{Direction, Vec2};
use crate::error::{Result, SimError};
use crate::ids::{AgentId, ColonyId};
use crate::stock::Stock;
use crate::world::Bounds;
use tracing::debug;

/// Resource stockpile and spawning authority for ants.
///
/// `live_agents <= max_agents` always holds. Only the primary colony may pay
/// to found further colonies.
#[derive(Clone, Debug)]
pub struct Colony {
    pub id: ColonyId,
    pub position: Vec2,
    stock: Stock,
    live_agents: u32,
    max_agents: u32,
    is_primary: bool,
    spawn_timer_ms: f64,
}

impl Colony {
    /// The first colony: starts with the configured initial stock
    pub fn new_primary(id: ColonyId, position: Vec2, config: &ColonyConfig) -> Self {
        Self {
            id,
            position,
            stock: config.initial_stock,
            live_agents: 0,
            max_agents: config.max_agents,
            is_primary: true,
            spawn_timer_ms: 0.0,
        }
    }

    /// A founded colony: empty stock, cannot found others
    pub fn new_outpost(id: ColonyId, position: Vec2, config: &ColonyConfig) -> Self {
        Self {
            stock: Stock::EMPTY,
            is_primary: false,
            ..Self::new_primary(id, position, config)
        }
    }

    pub fn with_stock(mut self, stock: Stock) -> Self {
        self.stock = stock;
        self
    }

    pub fn with_max_agents(mut self, max_agents: u32) -> Self {
        self.max_agents = max_agents;
        self
    }

    #[inline]
    pub fn stock(&self) -> &Stock {
        &self.stock
    }

    #[inline]
    pub fn live_agents(&self) -> u32 {
        self.live_agents
    }

    #[inline]
    pub fn max_agents(&self) -> u32 {
        self.max_agents
    }

    #[inline]
    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    /// Add an ant's cargo to the stock
    pub fn deposit(&mut self, cargo: &Stock) {
        self.stock.absorb(cargo);
    }

    /// Why a spawn would fail, if it would
    pub fn check_spawn(&self, cost: &Stock) -> Result<()> {
        if self.live_agents >= self.max_agents {
            return Err(SimError::PopulationCap {
                colony: self.id,
                max: self.max_agents,
            });
        }
        if !self.stock.covers(cost) {
            return Err(self.shortfall(cost));
        }
        Ok(())
    }

    fn shortfall(&self, cost: &Stock) -> SimError {
        SimError::InsufficientStock {
            colony: self.id,
            needed: *cost,
            available: self.stock,
        }
    }

    /// Debit `cost` from the stock, all or nothing
    fn pay(&mut self, cost: &Stock) -> Result<()> {
        if self.stock.try_debit(cost) {
            Ok(())
        } else {
            Err(self.shortfall(cost))
        }
    }

    pub fn can_spawn_agent(&self, cost: &Stock) -> bool {
        self.check_spawn(cost).is_ok()
    }

    /// Pay `cost` and hatch an ant near the colony
    pub fn spawn_agent(
        &mut self,
        id: AgentId,
        cost: &Stock,
        ant_config: &AntConfig,
        bounds: &Bounds,
        rng: &mut fastrand::Rng,
    ) -> Result<Ant> {
        self.check_spawn(cost)?;
        self.pay(cost)?;
        Ok(self.admit(id, ant_config, bounds, rng))
    }

    /// Hatch an ant without paying for it, as the primary colony does when
    /// it is placed
    pub(crate) fn hatch_free(
        &mut self,
        id: AgentId,
        ant_config: &AntConfig,
        bounds: &Bounds,
        rng: &mut fastrand::Rng,
    ) -> Result<Ant> {
        self.check_spawn(&Stock::EMPTY)?;
        Ok(self.admit(id, ant_config, bounds, rng))
    }

    /// Hatch a free ant at an exact position, for scripted setups
    pub(crate) fn hatch_at(&mut self, id: AgentId, position: Vec2, ant_config: &AntConfig) -> Result<Ant> {
        self.check_spawn(&Stock::EMPTY)?;
        self.live_agents += 1;
        Ok(Ant::new(id, position, Direction::EAST, ant_config).with_home(self.id))
    }

    fn admit(&mut self, id: AgentId, ant_config: &AntConfig, bounds: &Bounds, rng: &mut fastrand::Rng) -> Ant {
        let j = ant_config.spawn_jitter;
        let jitter = Vec2::new((rng.f64() * 2.0 - 1.0) * j, (rng.f64() * 2.0 - 1.0) * j);
        let position = bounds.clamp(self.position + jitter);
        let heading = Direction::random_diagonal(rng);
        self.live_agents += 1;
        debug!(colony = %self.id, ant = %id, live = self.live_agents, max = self.max_agents, "ant hatched");
        Ant::new(id, position, heading, ant_config).with_home(self.id)
    }

    /// One of this colony's ants was lost
    pub fn agent_lost(&mut self) {
        self.live_agents = self.live_agents.saturating_sub(1);
    }

    /// Advance the spawn timer. On each interval, if a spawn is affordable,
    /// roll for one with probability `(max - live) / max`, so an emptier
    /// colony refills faster. Returns whether to spawn now.
    pub fn tick(&mut self, dt_ms: f64, spawn_interval_ms: f64, cost: &Stock, rng: &mut fastrand::Rng) -> bool {
        self.spawn_timer_ms += dt_ms;
        if self.spawn_timer_ms < spawn_interval_ms {
            return false;
        }
        self.spawn_timer_ms %= spawn_interval_ms;

        if !self.can_spawn_agent(cost) {
            return false;
        }
        let free = f64::from(self.max_agents - self.live_agents);
        rng.f64() < free / f64::from(self.max_agents)
    }

    /// Why founding would fail, if it would
    pub fn check_founding(&self, cost: &Stock) -> Result<()> {
        if !self.is_primary {
            return Err(SimError::NotPrimary(self.id));
        }
        if !self.stock.covers(cost) {
            return Err(self.shortfall(cost));
        }
        Ok(())
    }

    pub fn can_found_colony(&self, cost: &Stock) -> bool {
        self.check_founding(cost).is_ok()
    }

    /// Pay the founding cost and return a new, empty, non-primary colony
    pub fn found_colony(&mut self, id: ColonyId, position: Vec2, config: &ColonyConfig) -> Result<Colony> {
        self.check_founding(&config.founding_cost)?;
        self.pay(&config.founding_cost)?;
        Ok(Colony::new_outpost(id, position, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Bounds {
        Bounds::new(480.0, 800.0)
    }

    fn cost() -> Stock {
        Stock::new(8.0, 15.0)
    }

    #[test]
    fn test_primary_and_outpost() {
        let cfg = ColonyConfig::default();
        let primary = Colony::new_primary(ColonyId(0), Vec2::new(240.0, 400.0), &cfg);
        assert!(primary.is_primary());
        assert_eq!(*primary.stock(), Stock::new(200.0, 100.0));
        assert_eq!(primary.live_agents(), 0);
        assert_eq!(primary.max_agents(), 12);

        let outpost = Colony::new_outpost(ColonyId(1), Vec2::new(40.0, 40.0), &cfg);
        assert!(!outpost.is_primary());
        assert!(outpost.stock().is_empty());
    }

    #[test]
    fn test_spawn_until_cap() {
        // Stock for exactly one ant and room for exactly one
        let cfg = ColonyConfig::default();
        let mut colony = Colony::new_primary(ColonyId(0), Vec2::new(240.0, 400.0), &cfg)
            .with_stock(Stock::new(8.0, 15.0))
            .with_max_agents(1);
        let mut rng = fastrand::Rng::with_seed(1);
        let ant_cfg = AntConfig::default();

        assert!(colony.can_spawn_agent(&cost()));
        let ant = colony
            .spawn_agent(AgentId(0), &cost(), &ant_cfg, &bounds(), &mut rng)
            .unwrap();
        assert_eq!(ant.home(), Some(ColonyId(0)));
        assert_eq!(*colony.stock(), Stock::new(0.0, 0.0));
        assert_eq!(colony.live_agents(), 1);

        let err = colony
            .spawn_agent(AgentId(1), &cost(), &ant_cfg, &bounds(), &mut rng)
            .unwrap_err();
        assert!(matches!(err, SimError::PopulationCap { max: 1, .. }));
        assert_eq!(colony.live_agents(), 1);
        assert_eq!(*colony.stock(), Stock::new(0.0, 0.0));
    }

    #[test]
    fn test_spawn_without_stock_fails_cleanly() {
        let cfg = ColonyConfig::default();
        let mut colony =
            Colony::new_primary(ColonyId(0), Vec2::new(240.0, 400.0), &cfg).with_stock(Stock::new(100.0, 14.0));
        let mut rng = fastrand::Rng::with_seed(1);

        let err = colony
            .spawn_agent(AgentId(0), &cost(), &AntConfig::default(), &bounds(), &mut rng)
            .unwrap_err();
        assert!(matches!(err, SimError::InsufficientStock { .. }));
        assert_eq!(*colony.stock(), Stock::new(100.0, 14.0));
        assert_eq!(colony.live_agents(), 0);
    }

    #[test]
    fn test_spawn_position_jitter() {
        let cfg = ColonyConfig::default();
        let mut colony = Colony::new_primary(ColonyId(0), Vec2::new(240.0, 400.0), &cfg)
            .with_stock(Stock::new(1000.0, 1000.0));
        let mut rng = fastrand::Rng::with_seed(2);
        let ant_cfg = AntConfig::default();
        for i in 0..10 {
            let ant = colony
                .spawn_agent(AgentId(i), &cost(), &ant_cfg, &bounds(), &mut rng)
                .unwrap();
            assert!((ant.position.x - 240.0).abs() <= 10.0);
            assert!((ant.position.y - 400.0).abs() <= 10.0);
        }
    }

    #[test]
    fn test_spawn_near_corner_is_clamped() {
        let cfg = ColonyConfig::default();
        let mut colony = Colony::new_primary(ColonyId(0), Vec2::new(0.0, 0.0), &cfg);
        let mut rng = fastrand::Rng::with_seed(3);
        for i in 0..5 {
            let ant = colony
                .spawn_agent(AgentId(i), &cost(), &AntConfig::default(), &bounds(), &mut rng)
                .unwrap();
            assert!(bounds().contains(ant.position));
        }
    }

    #[test]
    fn test_agent_lost_never_underflows() {
        let cfg = ColonyConfig::default();
        let mut colony = Colony::new_primary(ColonyId(0), Vec2::new(240.0, 400.0), &cfg);
        colony.agent_lost();
        assert_eq!(colony.live_agents(), 0);
    }

    #[test]
    fn test_tick_waits_for_interval() {
        let cfg = ColonyConfig::default();
        let mut colony = Colony::new_primary(ColonyId(0), Vec2::new(240.0, 400.0), &cfg);
        let mut rng = fastrand::Rng::with_seed(4);
        // Empty colony: spawn priority is 1.0, so the roll always succeeds
        assert!(!colony.tick(7999.0, 8000.0, &cost(), &mut rng));
        assert!(colony.tick(1.0, 8000.0, &cost(), &mut rng));
        assert!(!colony.tick(16.0, 8000.0, &cost(), &mut rng));
    }

    #[test]
    fn test_tick_never_spawns_at_cap_or_broke() {
        let cfg = ColonyConfig::default();
        let mut rng = fastrand::Rng::with_seed(5);

        let mut full = Colony::new_primary(ColonyId(0), Vec2::new(240.0, 400.0), &cfg).with_max_agents(1);
        full.hatch_free(AgentId(0), &AntConfig::default(), &bounds(), &mut rng)
            .unwrap();
        let mut broke = Colony::new_outpost(ColonyId(1), Vec2::new(100.0, 100.0), &cfg);
        for _ in 0..100 {
            assert!(!full.tick(8000.0, 8000.0, &cost(), &mut rng));
            assert!(!broke.tick(8000.0, 8000.0, &cost(), &mut rng));
        }
    }

    #[test]
    fn test_found_colony() {
        let cfg = ColonyConfig::default();
        let mut primary = Colony::new_primary(ColonyId(0), Vec2::new(240.0, 400.0), &cfg);
        // Initial stock (200, 100) does not cover founding (200, 400)
        assert!(!primary.can_found_colony(&cfg.founding_cost));
        let err = primary
            .found_colony(ColonyId(1), Vec2::new(50.0, 50.0), &cfg)
            .unwrap_err();
        assert!(matches!(err, SimError::InsufficientStock { .. }));

        primary.deposit(&Stock::new(0.0, 300.0));
        assert!(primary.can_found_colony(&cfg.founding_cost));
        let outpost = primary
            .found_colony(ColonyId(1), Vec2::new(50.0, 50.0), &cfg)
            .unwrap();
        assert_eq!(*primary.stock(), Stock::new(0.0, 0.0));
        assert_eq!(outpost.id, ColonyId(1));
        assert!(!outpost.is_primary());
        assert!(outpost.stock().is_empty());
    }

    #[test]
    fn test_outpost_cannot_found() {
        let cfg = ColonyConfig::default();
        let mut outpost =
            Colony::new_outpost(ColonyId(1), Vec2::new(50.0, 50.0), &cfg).with_stock(Stock::new(1000.0, 1000.0));
        let err = outpost
            .found_colony(ColonyId(2), Vec2::new(60.0, 60.0), &cfg)
            .unwrap_err();
        assert!(matches!(err, SimError::NotPrimary(ColonyId(1))));
        assert_eq!(*outpost.stock(), Stock::new(1000.0, 1000.0));
    }

    #[test]
    fn test_pay_is_all_or_nothing() {
        let cfg = ColonyConfig::default();
        let mut colony = Colony::new_primary(ColonyId(0), Vec2::new(240.0, 400.0), &cfg)
            .with_stock(Stock::new(100.0, 10.0));

        let err = colony.pay(&cost()).unwrap_err();
        match err {
            SimError::InsufficientStock { needed, available, .. } => {
                assert_eq!(needed, cost());
                assert_eq!(available, Stock::new(100.0, 10.0));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(*colony.stock(), Stock::new(100.0, 10.0));

        colony.deposit(&Stock::new(0.0, 5.0));
        colony.pay(&cost()).unwrap();
        assert_eq!(*colony.stock(), Stock::new(92.0, 0.0));
    }
}
