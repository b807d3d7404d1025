use crate::ant::Ant;
use crate::colony::Colony;
use crate::config::SpiderConfig;
use crate::direction::{Direction, Vec2};
use crate::ids::AgentId;
use crate::predator::Predator;
use crate::simulation::clock::Phase;
use crate::world::{Bounds, World};
use tracing::debug;

/// What the spider is doing
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpiderState {
    Wandering,
    Fleeing { remaining_ms: f64 },
    Dying { remaining_ms: f64 },
}

impl SpiderState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SpiderState::Wandering => "wandering",
            SpiderState::Fleeing { .. } => "fleeing",
            SpiderState::Dying { .. } => "dying",
        }
    }
}

/// World inputs for one spider step
#[derive(Clone, Copy, Debug)]
pub struct SpiderContext<'a> {
    pub dt_ms: f64,
    pub bounds: &'a Bounds,
    pub edge_buffer: f64,
    /// A colony closer than this can rally its ants against the spider
    pub colony_reach: f64,
}

/// A web left behind by the spider. It slows ants that walk into it and
/// breaks once it has held one of them long enough.
#[derive(Clone, Debug)]
pub struct Web {
    pub position: Vec2,
    radius: f64,
    slow_ms: f64,
    slow_factor: f64,
    hold_ms: f64,
    held: Vec<(AgentId, f64)>,
    broken: bool,
}

impl Web {
    pub fn new(position: Vec2, config: &SpiderConfig) -> Self {
        Self {
            position,
            radius: config.web_radius,
            slow_ms: config.web_slow_ms,
            slow_factor: config.web_slow_factor,
            hold_ms: config.web_hold_ms,
            held: Vec::new(),
            broken: false,
        }
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    pub fn holds(&self, ant: AgentId) -> bool {
        self.held.iter().any(|&(id, _)| id == ant)
    }

    /// Catch ants inside the web and age the hold on ants already caught
    pub fn snare(&mut self, ants: &mut [Ant], dt_ms: f64) {
        if self.broken {
            return;
        }
        // Ants eaten since the last tick
        self.held
            .retain(|&(id, _)| ants.binary_search_by_key(&id, |a| a.id).is_ok());

        let mut expired = None;
        for ant in ants.iter_mut() {
            if let Some(entry) = self.held.iter_mut().find(|(id, _)| *id == ant.id) {
                entry.1 += dt_ms;
                if entry.1 >= self.hold_ms {
                    expired = Some(ant.id);
                    break;
                }
            } else if ant.position.distance(self.position) < self.radius {
                ant.entangle(self.slow_ms, self.slow_factor);
                self.held.push((ant.id, 0.0));
            }
        }

        // A broken web lets go of everything it held
        if let Some(id) = expired {
            debug!(ant = %id, held = self.held.len(), "web broke");
            for ant in ants.iter_mut().filter(|a| self.holds(a.id)) {
                ant.release();
            }
            self.held.clear();
            self.broken = true;
        }
    }
}

/// Nocturnal hunter. It never captures ants; it scares them and leaves
/// webs, and retreats into a plant or bush at daybreak.
#[derive(Clone, Debug)]
pub struct Spider {
    position: Vec2,
    direction: Direction,
    state: SpiderState,
    /// Speed multiplier for the current state
    pace: f64,
    web_cooldown_ms: f64,
    gone: bool,
    tuning: SpiderConfig,
}

impl Spider {
    pub fn new(position: Vec2, config: &SpiderConfig, rng: &mut fastrand::Rng) -> Self {
        Self {
            position,
            direction: Direction::random(rng),
            state: SpiderState::Wandering,
            pace: 1.0,
            web_cooldown_ms: config.web_cooldown_ms,
            gone: false,
            tuning: config.clone(),
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn state(&self) -> SpiderState {
        self.state
    }

    /// Sheltered or dead; the owner drops it
    #[inline]
    pub fn is_gone(&self) -> bool {
        self.gone
    }

    fn set_state(&mut self, state: SpiderState) {
        if std::mem::discriminant(&state) != std::mem::discriminant(&self.state) {
            debug!(from = self.state.as_str(), to = state.as_str(), "spider state");
        }
        self.state = state;
    }

    /// One tick. Returns a freshly spun web, if any.
    pub fn update(
        &mut self,
        ctx: &SpiderContext<'_>,
        ants: &[Ant],
        colonies: &[Colony],
        rng: &mut fastrand::Rng,
    ) -> Option<Web> {
        if self.gone {
            return None;
        }

        let mut web = None;
        match self.state {
            SpiderState::Dying { remaining_ms } => {
                let remaining_ms = remaining_ms - ctx.dt_ms;
                if remaining_ms <= 0.0 {
                    self.gone = true;
                    debug!("spider died");
                    return None;
                }
                self.state = SpiderState::Dying { remaining_ms };
            }
            SpiderState::Fleeing { remaining_ms } => {
                let remaining_ms = remaining_ms - ctx.dt_ms;
                if remaining_ms <= 0.0 {
                    self.set_state(SpiderState::Wandering);
                } else {
                    self.state = SpiderState::Fleeing { remaining_ms };
                    web = self.spin(ctx.dt_ms, self.tuning.fleeing_web_chance, rng);
                }
            }
            SpiderState::Wandering => {
                web = self.spin(ctx.dt_ms, self.tuning.web_chance, rng);
                self.face_colonies(ctx, ants, colonies, rng);
                if self.state == SpiderState::Wandering && rng.f64() < self.tuning.wander_chance {
                    self.direction = Direction::random(rng);
                }
            }
        }

        self.advance(ctx);
        web
    }

    /// Near a colony with enough ants around: flee from it or die
    fn face_colonies(
        &mut self,
        ctx: &SpiderContext<'_>,
        ants: &[Ant],
        colonies: &[Colony],
        rng: &mut fastrand::Rng,
    ) {
        let Some(colony) = colonies
            .iter()
            .find(|c| self.position.distance(c.position) < ctx.colony_reach)
        else {
            return;
        };
        let defenders = ants
            .iter()
            .filter(|a| a.position.distance(self.position) < self.tuning.alert_radius)
            .count();
        if defenders < self.tuning.ants_to_challenge {
            return;
        }

        if rng.f64() < self.tuning.flee_chance {
            self.direction = self.direction.towards(colony.position, self.position);
            self.set_state(SpiderState::Fleeing {
                remaining_ms: self.tuning.flee_ms,
            });
        } else {
            self.pace = 0.0;
            self.set_state(SpiderState::Dying {
                remaining_ms: self.tuning.dying_ms,
            });
        }
    }

    fn spin(&mut self, dt_ms: f64, chance: f64, rng: &mut fastrand::Rng) -> Option<Web> {
        if self.web_cooldown_ms > 0.0 {
            self.web_cooldown_ms -= dt_ms;
            return None;
        }
        if rng.f64() >= chance {
            return None;
        }
        self.web_cooldown_ms = self.tuning.web_cooldown_ms;
        debug!(x = self.position.x, y = self.position.y, "web spun");
        Some(Web::new(self.position, &self.tuning))
    }

    fn advance(&mut self, ctx: &SpiderContext<'_>) {
        let (heading, _) = ctx
            .bounds
            .steer_off_edges(self.position, self.direction, ctx.edge_buffer);
        self.direction = heading;
        let step = self.tuning.speed * self.pace * ctx.dt_ms / 1000.0;
        self.position = ctx.bounds.clamp(self.position.offset(self.direction, step));
    }
}

impl Predator for Spider {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn is_threatening(&self) -> bool {
        !self.gone && !matches!(self.state, SpiderState::Dying { .. })
    }

    fn on_phase_change(&mut self, phase: Phase, world: &World, rng: &mut fastrand::Rng) {
        if phase != Phase::Day || self.gone || matches!(self.state, SpiderState::Dying { .. }) {
            return;
        }
        match world.nearest_where(self.position, |n| n.kind.is_shelter()) {
            Some(shelter) => {
                self.position = shelter.position;
                self.gone = true;
                debug!(node = %shelter.id, "spider sheltered");
            }
            None => {
                self.direction = Direction::random(rng);
                self.pace = 2.0;
                self.set_state(SpiderState::Dying {
                    remaining_ms: self.tuning.daylight_dying_ms,
                });
            }
        }
    }
}
