use crate::ant::{Ant, AntContext};
use crate::cli::Args;
use crate::colony::Colony;
use crate::config::SimulationConfig;
use crate::direction::Vec2;
use crate::error::{Result, SimError};
use crate::ids::{AgentId, ColonyId, IdSequence, ResourceId};
use crate::predator::spider::SpiderContext;
use crate::predator::{threat_points, Predator, Snake, Spider, Web};
use crate::simulation::clock::SimulationClock;
use crate::simulation::events::{Command, CommandOutcome, SpiderEvent, TickEvents};
use crate::simulation::report;
use crate::simulation::stats::{danger_level, Ledger, Summary};
use crate::stock::Stock;
use crate::world::{Bounds, NodeKind, ResourceNode, ResourceSpawner, World};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// The whole simulation: world, colonies, ants and predators, advanced one
/// tick at a time by [`Simulation::tick`].
///
/// Every random decision draws from the one generator seeded at
/// construction, and every collection is iterated in creation order, so a
/// seed plus a command sequence fully determines a run.
pub struct Simulation {
    config: SimulationConfig,
    rng: fastrand::Rng,
    clock: SimulationClock,
    world: World,
    spawner: ResourceSpawner,
    ants: Vec<Ant>,
    colonies: Vec<Colony>,
    snake: Snake,
    spider: Option<Spider>,
    webs: Vec<Web>,
    ant_ids: IdSequence,
    colony_ids: IdSequence,
    placing: bool,
    pending: VecDeque<Command>,
    scare_point: Option<Vec2>,
    ticks: u64,
    captures: u64,
    ledger: Ledger,
}

impl Simulation {
    /// Validate `config`, populate the world and release the snake
    pub fn new(config: SimulationConfig, seed: u64) -> Result<Self> {
        SimulationBuilder::new(config).seed(seed).build()
    }

    pub fn builder(config: SimulationConfig) -> SimulationBuilder {
        SimulationBuilder::new(config)
    }

    // Read-only views for rendering and tests

    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[inline]
    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn resources(&self) -> &[ResourceNode] {
        self.world.resources()
    }

    /// Live ants in creation order
    #[inline]
    pub fn ants(&self) -> &[Ant] {
        &self.ants
    }

    pub fn ant(&self, id: AgentId) -> Option<&Ant> {
        self.ants
            .binary_search_by_key(&id, |a| a.id)
            .ok()
            .map(|i| &self.ants[i])
    }

    #[inline]
    pub fn colonies(&self) -> &[Colony] {
        &self.colonies
    }

    pub fn colony(&self, id: ColonyId) -> Option<&Colony> {
        self.colony_index(id).map(|i| &self.colonies[i])
    }

    pub fn primary_colony(&self) -> Option<&Colony> {
        self.colonies.iter().find(|c| c.is_primary())
    }

    #[inline]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[inline]
    pub fn spider(&self) -> Option<&Spider> {
        self.spider.as_ref()
    }

    #[inline]
    pub fn webs(&self) -> &[Web] {
        &self.webs
    }

    #[inline]
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    #[inline]
    pub fn captures(&self) -> u64 {
        self.captures
    }

    #[inline]
    pub fn is_placing(&self) -> bool {
        self.placing
    }

    #[inline]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Cargo carried by live ants
    pub fn in_transit(&self) -> Stock {
        let mut total = Stock::EMPTY;
        for ant in &self.ants {
            total.absorb(ant.carried());
        }
        total
    }

    /// Predators currently in the world, snake first
    pub fn predators(&self) -> impl Iterator<Item = &dyn Predator> {
        std::iter::once(&self.snake as &dyn Predator).chain(self.spider.iter().map(|s| s as &dyn Predator))
    }

    pub fn summary(&self) -> Summary {
        let mut stock = Stock::EMPTY;
        for colony in &self.colonies {
            stock.absorb(colony.stock());
        }
        let nearest_colony = self
            .colonies
            .iter()
            .map(|c| c.position.distance(self.snake.position()))
            .min_by(f64::total_cmp);
        let max_nodes = self.config.resources.max_nodes();
        let abundance = if max_nodes == 0 {
            0.0
        } else {
            (self.world.resources().len() as f64 / max_nodes as f64).min(1.0)
        };

        Summary {
            ticks: self.ticks,
            elapsed_ms: self.clock.elapsed_ms(),
            phase: self.clock.phase(),
            ants: self.ants.len(),
            colonies: self.colonies.len(),
            rocks: self.world.count(NodeKind::Rock),
            plants: self.world.count(NodeKind::Plant),
            bushes: self.world.count(NodeKind::Bush),
            captures: self.captures,
            snake_length: self.snake.length(),
            stock,
            abundance,
            danger: danger_level(nearest_colony),
        }
    }

    // Player input

    /// Point the ants flee from, such as the pointer; `None` clears it
    pub fn set_scare_point(&mut self, point: Option<Vec2>) {
        self.scare_point = point.map(|p| self.world.bounds().clamp(p));
    }

    /// Queue a command for the start of the next tick
    pub fn queue(&mut self, command: Command) {
        self.pending.push_back(command);
    }

    /// Arm colony placement. Only allowed while the primary colony can pay
    /// the founding cost.
    pub fn begin_placement(&mut self) -> Result<()> {
        let primary = self.primary_colony().ok_or(SimError::NoPrimaryColony)?;
        primary.check_founding(&self.config.colony.founding_cost)?;
        self.placing = true;
        Ok(())
    }

    /// Place the first colony for free, or found a new one paid by the
    /// primary colony while placement is armed. `position` is clamped into
    /// the world, clear of the edge buffer so ants can reach the colony.
    pub fn issue_placement(&mut self, position: Vec2) -> Result<ColonyId> {
        let position = self.colony_site(position);

        if self.colonies.is_empty() {
            let id = ColonyId(self.colony_ids.next());
            self.colonies
                .push(Colony::new_primary(id, position, &self.config.colony));
            let initial = self.config.colony.initial_ants.min(self.config.colony.max_agents);
            for _ in 0..initial {
                self.hatch_free(0)?;
            }
            info!(colony = %id, %position, ants = initial, "primary colony placed");
            return Ok(id);
        }

        if !self.placing {
            return Err(SimError::NotPlacing);
        }
        let idx = self
            .colonies
            .iter()
            .position(|c| c.is_primary())
            .ok_or(SimError::NoPrimaryColony)?;
        self.colonies[idx].check_founding(&self.config.colony.founding_cost)?;

        let id = ColonyId(self.colony_ids.next());
        let colony = self.colonies[idx].found_colony(id, position, &self.config.colony)?;
        self.colonies.push(colony);
        self.placing = false;
        info!(colony = %id, %position, "colony founded");
        Ok(id)
    }

    /// Pay for an ant at `colony`
    pub fn request_spawn(&mut self, colony: ColonyId) -> Result<AgentId> {
        let idx = self.colony_index(colony).ok_or(SimError::UnknownColony(colony))?;
        self.spawn_at(idx)
    }

    /// Found a colony at a random open spot whenever the primary colony can
    /// afford it
    pub fn try_expand(&mut self) -> Option<ColonyId> {
        self.begin_placement().ok()?;
        let p = self.world.open_position(
            self.config.world.spawn_margin,
            self.config.spawner.min_spacing,
            self.config.spawner.placement_attempts,
            &mut self.rng,
        );
        self.issue_placement(p).ok()
    }

    fn apply(&mut self, command: Command) -> Result<CommandOutcome> {
        match command {
            Command::BeginPlacement => self.begin_placement().map(|_| CommandOutcome::PlacementArmed),
            Command::Place(p) => self.issue_placement(p).map(CommandOutcome::Placed),
            Command::Spawn(c) => self.request_spawn(c).map(CommandOutcome::Spawned),
        }
    }

    fn colony_site(&self, position: Vec2) -> Vec2 {
        self.world
            .bounds()
            .clamp_inset(position, self.config.world.edge_buffer)
    }

    fn colony_index(&self, id: ColonyId) -> Option<usize> {
        self.colonies.binary_search_by_key(&id, |c| c.id).ok()
    }

    fn spawn_at(&mut self, idx: usize) -> Result<AgentId> {
        let cost = self.config.colony.ant_cost;
        self.colonies[idx].check_spawn(&cost)?;
        let id = AgentId(self.ant_ids.next());
        let bounds = *self.world.bounds();
        let mut ant = self.colonies[idx].spawn_agent(id, &cost, &self.config.ant, &bounds, &mut self.rng)?;
        ant.set_phase(self.clock.phase(), &self.config.day_night);
        self.ants.push(ant);
        Ok(id)
    }

    fn hatch_free(&mut self, idx: usize) -> Result<AgentId> {
        self.colonies[idx].check_spawn(&Stock::EMPTY)?;
        let id = AgentId(self.ant_ids.next());
        let bounds = *self.world.bounds();
        let mut ant = self.colonies[idx].hatch_free(id, &self.config.ant, &bounds, &mut self.rng)?;
        ant.set_phase(self.clock.phase(), &self.config.day_night);
        self.ants.push(ant);
        Ok(id)
    }

    // Scheduler

    /// Advance the simulation by `dt_ms`.
    ///
    /// Order: queued commands, clock, predators, ants, webs, resources,
    /// colonies, pruning.
    pub fn tick(&mut self, dt_ms: f64) -> TickEvents {
        let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
        let mut events = TickEvents::default();
        self.ticks += 1;

        while let Some(command) = self.pending.pop_front() {
            let result = self.apply(command);
            match &result {
                Ok(CommandOutcome::Placed(id)) => events.founded.push(*id),
                Ok(CommandOutcome::Spawned(id)) => events.spawns.push(*id),
                _ => {}
            }
            events.commands.push((command, result));
        }

        self.advance_clock(dt_ms, &mut events);
        self.update_predators(dt_ms, &mut events);
        self.update_ants(dt_ms, &mut events);

        for web in &mut self.webs {
            web.snare(&mut self.ants, dt_ms);
        }
        self.webs.retain(|w| !w.is_broken());

        self.world.tick_resources(dt_ms);
        events.resources_spawned = self
            .spawner
            .tick(dt_ms, &mut self.world, &self.config, &mut self.rng);

        self.update_colonies(dt_ms, &mut events);

        let targeted: Vec<ResourceId> = self.ants.iter().filter_map(|a| a.target()).collect();
        events.resources_pruned = self.world.prune_depleted(&targeted);
        events
    }

    fn advance_clock(&mut self, dt_ms: f64, events: &mut TickEvents) {
        if let Some(phase) = self.clock.advance(dt_ms) {
            info!(%phase, elapsed_ms = self.clock.elapsed_ms(), "phase change");
            events.phase_change = Some(phase);

            self.snake.on_phase_change(phase, &self.world, &mut self.rng);
            if let Some(spider) = self.spider.as_mut() {
                spider.on_phase_change(phase, &self.world, &mut self.rng);
            }
            for ant in &mut self.ants {
                ant.set_phase(phase, &self.config.day_night);
            }
        }

        if !self.webs.is_empty() && self.clock.is_midday(self.config.day_night.midday_window_ms) {
            debug!(count = self.webs.len(), "webs swept away at midday");
            for web in &self.webs {
                for ant in self.ants.iter_mut().filter(|a| web.holds(a.id)) {
                    ant.release();
                }
            }
            self.webs.clear();
        }
    }

    fn update_predators(&mut self, dt_ms: f64, events: &mut TickEvents) {
        let bounds = *self.world.bounds();
        let caught = self.snake.update(
            dt_ms,
            &bounds,
            &self.ants,
            &self.colonies,
            self.config.colony.size,
            &mut self.rng,
        );
        if let Some(id) = caught {
            if self.remove_captured(id) {
                events.captures.push(id);
            }
        }

        if let Some(p) = self.maybe_spawn_spider() {
            events.spider = Some(SpiderEvent::Appeared(p));
        }
        if let Some(spider) = self.spider.as_mut() {
            let ctx = SpiderContext {
                dt_ms,
                bounds: &bounds,
                edge_buffer: self.config.world.edge_buffer,
                colony_reach: 2.0 * self.config.colony.outer_size,
            };
            if let Some(web) = spider.update(&ctx, &self.ants, &self.colonies, &mut self.rng) {
                self.webs.push(web);
                events.webs_spun += 1;
            }
        }
        if self.spider.as_ref().map_or(false, Spider::is_gone) {
            self.spider = None;
            events.spider = Some(SpiderEvent::Left);
        }
    }

    /// Remove a caught ant: its home colony loses a member and its cargo is
    /// lost with it
    fn remove_captured(&mut self, id: AgentId) -> bool {
        let Ok(idx) = self.ants.binary_search_by_key(&id, |a| a.id) else {
            return false;
        };
        let mut ant = self.ants.remove(idx);
        self.ledger.consumed.absorb(&ant.drop_cargo());
        if let Some(home) = ant.home().and_then(|h| self.colony_index(h)) {
            self.colonies[home].agent_lost();
        }
        self.captures += 1;
        info!(ant = %id, snake_length = self.snake.length(), "ant captured");
        true
    }

    fn maybe_spawn_spider(&mut self) -> Option<Vec2> {
        let cfg = &self.config.spider;
        if !cfg.enabled || self.spider.is_some() || !self.clock.is_night() || !self.snake.is_sleeping() {
            return None;
        }
        let shelters: Vec<Vec2> = self
            .world
            .resources()
            .iter()
            .filter(|n| n.kind.is_shelter())
            .map(|n| n.position)
            .collect();
        if shelters.is_empty() || self.rng.f64() >= cfg.spawn_chance {
            return None;
        }
        let p = shelters[self.rng.usize(..shelters.len())];
        self.spider = Some(Spider::new(p, cfg, &mut self.rng));
        info!(position = %p, "spider appeared");
        Some(p)
    }

    fn update_ants(&mut self, dt_ms: f64, events: &mut TickEvents) {
        let mut threats = threat_points(self.predators());
        threats.extend(self.scare_point);

        let bounds = *self.world.bounds();
        let ctx = AntContext {
            dt_ms,
            bounds: &bounds,
            edge_buffer: self.config.world.edge_buffer,
            threats: &threats,
            colony_size: self.config.colony.size,
        };

        for ant in &mut self.ants {
            let step = ant.update(&ctx, &mut self.world, &mut self.colonies, &mut self.rng);
            if let Some((_, kind, amount)) = step.extracted {
                self.ledger.extracted.add(kind, amount);
            }
            if let Some((colony, cargo)) = step.deposited {
                self.ledger.deposited.absorb(&cargo);
                events
                    .deposits
                    .extend(cargo.entries().map(|(kind, amount)| (colony, kind, amount)));
            }
        }
    }

    fn update_colonies(&mut self, dt_ms: f64, events: &mut TickEvents) {
        let interval = self.config.colony.spawn_interval_ms;
        let cost = self.config.colony.ant_cost;
        for idx in 0..self.colonies.len() {
            if self.colonies[idx].tick(dt_ms, interval, &cost, &mut self.rng) {
                // tick only says yes when the spawn is affordable
                if let Ok(id) = self.spawn_at(idx) {
                    debug!(colony = %self.colonies[idx].id, ant = %id, "colony spawned ant");
                    events.spawns.push(id);
                }
            }
        }
    }

    /// Run the whole session described by `args`: expand if asked, tick,
    /// and log events. Returns the wall-clock time spent ticking.
    pub fn run(&mut self, args: &Args) -> Duration {
        let start = Instant::now();
        for _ in 0..args.ticks {
            if args.expand {
                if let Some(id) = self.try_expand() {
                    report::log_founding(args, self, id);
                }
            }
            let events = self.tick(args.dt_ms);
            report::log_events(args, self, &events);
        }
        start.elapsed()
    }
}

/// Scripted construction of a [`Simulation`], mostly for tests and demos
pub struct SimulationBuilder {
    config: SimulationConfig,
    seed: u64,
    populate: bool,
    snake_at: Option<Vec2>,
    resources: Vec<(NodeKind, Vec2, Option<f64>)>,
    colonies: Vec<Vec2>,
    ants: Vec<Vec2>,
}

impl SimulationBuilder {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            seed: 0,
            populate: true,
            snake_at: None,
            resources: Vec::new(),
            colonies: Vec::new(),
            ants: Vec::new(),
        }
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Whether to place the configured initial resources (default: yes)
    pub fn populate(mut self, populate: bool) -> Self {
        self.populate = populate;
        self
    }

    pub fn snake_at(mut self, position: Vec2) -> Self {
        self.snake_at = Some(position);
        self
    }

    /// Add a full node of `kind`
    pub fn resource(mut self, kind: NodeKind, position: Vec2) -> Self {
        self.resources.push((kind, position, None));
        self
    }

    /// Add a node of `kind` holding `content`
    pub fn resource_with(mut self, kind: NodeKind, position: Vec2, content: f64) -> Self {
        self.resources.push((kind, position, Some(content)));
        self
    }

    /// The first colony added is primary and hatches the initial ants;
    /// later ones are outposts placed free of charge
    pub fn colony(mut self, position: Vec2) -> Self {
        self.colonies.push(position);
        self
    }

    /// Hatch a free ant of the primary colony at exactly `position`
    pub fn ant(mut self, position: Vec2) -> Self {
        self.ants.push(position);
        self
    }

    pub fn build(self) -> Result<Simulation> {
        self.config.validate()?;
        let mut rng = fastrand::Rng::with_seed(self.seed);
        let bounds = Bounds::new(self.config.world.width, self.config.world.height);
        let mut world = World::new(bounds);

        if self.populate {
            ResourceSpawner::populate(&mut world, &self.config, &mut rng);
        }
        for (kind, position, content) in self.resources {
            let node = ResourceNode::new(ResourceId(0), kind, position, self.config.resources.node(kind));
            let node = match content {
                Some(c) => node.with_content(c),
                None => node,
            };
            world.insert_resource(node);
        }

        let snake_position = match self.snake_at {
            Some(p) => bounds.clamp(p),
            None => bounds.random_point(self.config.world.spawn_margin, &mut rng),
        };
        let snake = Snake::new(snake_position, &self.config.snake, &mut rng);

        let mut sim = Simulation {
            clock: SimulationClock::new(self.config.day_night.cycle_ms),
            config: self.config,
            rng,
            world,
            spawner: ResourceSpawner::new(),
            ants: Vec::new(),
            colonies: Vec::new(),
            snake,
            spider: None,
            webs: Vec::new(),
            ant_ids: IdSequence::default(),
            colony_ids: IdSequence::default(),
            placing: false,
            pending: VecDeque::new(),
            scare_point: None,
            ticks: 0,
            captures: 0,
            ledger: Ledger::default(),
        };

        let mut positions = self.colonies.into_iter();
        if let Some(first) = positions.next() {
            sim.issue_placement(first)?;
        }
        for p in positions {
            let id = ColonyId(sim.colony_ids.next());
            let p = sim.colony_site(p);
            sim.colonies
                .push(Colony::new_outpost(id, p, &sim.config.colony));
        }

        for p in self.ants {
            let idx = sim
                .colonies
                .iter()
                .position(|c| c.is_primary())
                .ok_or(SimError::NoPrimaryColony)?;
            let id = AgentId(sim.ant_ids.next());
            let p = sim.world.bounds().clamp(p);
            let ant = sim.colonies[idx].hatch_at(id, p, &sim.config.ant)?;
            sim.ants.push(ant);
        }

        Ok(sim)
    }
}
