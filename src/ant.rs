use crate::colony::Colony;
use crate::config::{AntConfig, DayNightConfig};
use crate::direction::{Direction, Vec2};
use crate::ids::{AgentId, ColonyId, ResourceId};
use crate::simulation::clock::Phase;
use crate::stock::{ResourceKind, Stock};
use crate::world::{Bounds, World};
use tracing::debug;

/// Behavior state of an ant
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AntState {
    Exploring,
    Collecting,
    Returning,
}

impl AntState {
    pub const fn as_str(self) -> &'static str {
        match self {
            AntState::Exploring => "exploring",
            AntState::Collecting => "collecting",
            AntState::Returning => "returning",
        }
    }
}

/// Everything an ant reads from the world besides resources and colonies
#[derive(Clone, Copy, Debug)]
pub struct AntContext<'a> {
    pub dt_ms: f64,
    pub bounds: &'a Bounds,
    pub edge_buffer: f64,
    /// Predator heads and scare points, as seen at the start of the ant phase
    pub threats: &'a [Vec2],
    /// Deposit contact radius of a colony, added to the ant's own size
    pub colony_size: f64,
}

/// What one ant did in one tick
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AntStep {
    /// A threat overrode the state machine this tick
    pub fled: bool,
    pub extracted: Option<(ResourceId, ResourceKind, f64)>,
    pub deposited: Option<(ColonyId, Stock)>,
    pub bounced: bool,
}

/// Autonomous gatherer
#[derive(Clone, Debug)]
pub struct Ant {
    pub id: AgentId,
    pub position: Vec2,
    direction: Direction,
    size: f64,
    base_speed: f64,
    base_perception: f64,
    speed: f64,
    perception_radius: f64,
    carry_capacity: f64,
    carried: Stock,
    state: AntState,
    target: Option<ResourceId>,
    home: Option<ColonyId>,
    web_slow_ms: f64,
    web_slow_factor: f64,
}

impl Ant {
    /// Create an exploring ant with day-time speed and perception
    pub fn new(id: AgentId, position: Vec2, direction: Direction, config: &AntConfig) -> Self {
        Self {
            id,
            position,
            direction,
            size: config.size,
            base_speed: config.speed,
            base_perception: config.perception_radius,
            speed: config.speed,
            perception_radius: config.perception_radius,
            carry_capacity: config.carry_capacity,
            carried: Stock::EMPTY,
            state: AntState::Exploring,
            target: None,
            home: None,
            web_slow_ms: 0.0,
            web_slow_factor: 1.0,
        }
    }

    pub fn with_home(mut self, colony: ColonyId) -> Self {
        self.home = Some(colony);
        self
    }

    #[inline]
    pub fn state(&self) -> AntState {
        self.state
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn target(&self) -> Option<ResourceId> {
        self.target
    }

    #[inline]
    pub fn home(&self) -> Option<ColonyId> {
        self.home
    }

    #[inline]
    pub fn carried(&self) -> &Stock {
        &self.carried
    }

    #[inline]
    pub fn carry_capacity(&self) -> f64 {
        self.carry_capacity
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    #[inline]
    pub fn perception_radius(&self) -> f64 {
        self.perception_radius
    }

    /// Room left for cargo
    #[inline]
    pub fn carry_room(&self) -> f64 {
        (self.carry_capacity - self.carried.total()).max(0.0)
    }

    #[inline]
    pub fn is_entangled(&self) -> bool {
        self.web_slow_ms > 0.0
    }

    /// Speed this tick, after web slowdown
    pub fn effective_speed(&self) -> f64 {
        if self.is_entangled() {
            self.speed * self.web_slow_factor
        } else {
            self.speed
        }
    }

    /// Switch speed and perception to the values of `phase`
    pub fn set_phase(&mut self, phase: Phase, config: &DayNightConfig) {
        match phase {
            Phase::Day => {
                self.speed = self.base_speed;
                self.perception_radius = self.base_perception;
            }
            Phase::Night => {
                self.speed = self.base_speed * config.ant_night_speed_multiplier;
                self.perception_radius = self.base_perception * config.ant_night_perception_multiplier;
            }
        }
    }

    /// Caught in a web: slowed by `factor` for `slow_ms`
    pub fn entangle(&mut self, slow_ms: f64, factor: f64) {
        if !self.is_entangled() {
            debug!(ant = %self.id, "ant caught in web");
        }
        self.web_slow_ms = slow_ms;
        self.web_slow_factor = factor;
    }

    pub fn release(&mut self) {
        self.web_slow_ms = 0.0;
    }

    /// Hand over all cargo, e.g. when the ant is eaten
    pub(crate) fn drop_cargo(&mut self) -> Stock {
        self.carried.take()
    }

    /// Nearest threat inside the perception radius; ties go to the earlier one
    pub fn nearest_threat(&self, threats: &[Vec2]) -> Option<Vec2> {
        let mut best: Option<(Vec2, f64)> = None;
        for &t in threats {
            let d = self.position.distance(t);
            if d < self.perception_radius && best.map_or(true, |(_, bd)| d < bd) {
                best = Some((t, d));
            }
        }
        best.map(|(t, _)| t)
    }

    /// One tick: threat override or state step, then move and clamp
    pub fn update(
        &mut self,
        ctx: &AntContext<'_>,
        world: &mut World,
        colonies: &mut [Colony],
        rng: &mut fastrand::Rng,
    ) -> AntStep {
        let mut step = AntStep::default();

        if let Some(threat) = self.nearest_threat(ctx.threats) {
            self.direction = Direction::escape(self.position, threat, rng);
            step.fled = true;
        } else {
            match self.state {
                AntState::Exploring => self.explore(world),
                AntState::Collecting => self.collect(world, &mut step),
                AntState::Returning => self.return_home(ctx, colonies, &mut step),
            }
        }

        step.bounced = self.advance(ctx);
        self.web_slow_ms = (self.web_slow_ms - ctx.dt_ms).max(0.0);
        step
    }

    fn explore(&mut self, world: &World) {
        if self.carried.total() >= self.carry_capacity {
            self.state = AntState::Returning;
            return;
        }
        if let Some(id) = world.first_collectible_within(self.position, self.perception_radius) {
            if let Some(node) = world.resource(id) {
                self.direction = self.direction.towards(self.position, node.position);
            }
            self.target = Some(id);
            self.state = AntState::Collecting;
        }
    }

    fn collect(&mut self, world: &mut World, step: &mut AntStep) {
        let node = match self.target.and_then(|id| world.resource_mut(id)) {
            Some(node) if !node.is_depleted() => node,
            // Gone or drained by an ant processed earlier
            _ => {
                self.target = None;
                self.state = AntState::Exploring;
                return;
            }
        };

        if self.position.distance(node.position) < self.size + node.size() {
            let kind = node.yields();
            let taken = node.extract(self.carry_room().min(node.content()));
            self.carried.add(kind, taken);
            if taken > 0.0 {
                debug!(ant = %self.id, node = %node.id, amount = taken, kind = kind.as_str(), "collected");
                step.extracted = Some((node.id, kind, taken));
            }
            self.target = None;
            self.state = if self.carried.is_empty() {
                AntState::Exploring
            } else {
                AntState::Returning
            };
        } else {
            self.direction = self.direction.towards(self.position, node.position);
        }
    }

    fn return_home(&mut self, ctx: &AntContext<'_>, colonies: &mut [Colony], step: &mut AntStep) {
        let mut nearest: Option<(usize, f64)> = None;
        for (i, colony) in colonies.iter().enumerate() {
            let d = self.position.distance(colony.position);
            if nearest.map_or(true, |(_, bd)| d < bd) {
                nearest = Some((i, d));
            }
        }
        let Some((idx, distance)) = nearest else {
            return;
        };

        let colony = &mut colonies[idx];
        if distance <= self.size + ctx.colony_size {
            let cargo = self.carried.take();
            colony.deposit(&cargo);
            debug!(ant = %self.id, colony = %colony.id, %cargo, "deposited");
            if !cargo.is_empty() {
                step.deposited = Some((colony.id, cargo));
            }
            self.state = AntState::Exploring;
        } else {
            self.direction = self.direction.towards(self.position, colony.position);
        }
    }

    /// Edge bounce, move, clamp. Returns whether an edge was hit.
    fn advance(&mut self, ctx: &AntContext<'_>) -> bool {
        let (heading, hit) = ctx
            .bounds
            .steer_off_edges(self.position, self.direction, ctx.edge_buffer);
        self.direction = heading;
        let step = self.effective_speed() * ctx.dt_ms / 1000.0;
        self.position = ctx.bounds.clamp(self.position.offset(self.direction, step));
        hit
    }
}
