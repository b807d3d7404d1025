use crate::ant::Ant;
use crate::colony::Colony;
use crate::config::SnakeConfig;
use crate::direction::{Direction, Vec2};
use crate::ids::AgentId;
use crate::predator::Predator;
use crate::simulation::clock::Phase;
use crate::world::{Bounds, World};
use std::collections::VecDeque;
use tracing::debug;

/// The world's single long-lived hunter.
///
/// The body is a trail of past head positions, newest first, never longer
/// than `length`. `length` only grows, by one per capture.
#[derive(Clone, Debug)]
pub struct Snake {
    position: Vec2,
    body: VecDeque<Vec2>,
    direction: Direction,
    speed: f64,
    perception_radius: f64,
    capture_distance: f64,
    length: usize,
    wander_chance: f64,
    sleeping: bool,
}

impl Snake {
    pub fn new(position: Vec2, config: &SnakeConfig, rng: &mut fastrand::Rng) -> Self {
        let mut body = VecDeque::with_capacity(config.initial_length + 16);
        body.push_back(position);
        Self {
            position,
            body,
            direction: Direction::random_diagonal(rng),
            speed: config.speed,
            perception_radius: config.perception_radius,
            capture_distance: config.capture_distance,
            length: config.initial_length,
            wander_chance: config.wander_chance,
            sleeping: false,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Trail of past head positions, head first
    #[inline]
    pub fn body(&self) -> &VecDeque<Vec2> {
        &self.body
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    pub fn start_sleeping(&mut self) {
        self.sleeping = true;
    }

    /// Wake up coiled: the whole body sits on the head
    pub fn wake_up(&mut self) {
        self.sleeping = false;
        self.body.clear();
        self.body.extend(std::iter::repeat(self.position).take(self.length));
    }

    /// Nearest ant in reach that is not sheltering at a colony
    fn prey<'a>(&self, ants: &'a [Ant], colonies: &[Colony], safe_radius: f64) -> Option<&'a Ant> {
        let mut best: Option<(&Ant, f64)> = None;
        for ant in ants {
            let d = self.position.distance(ant.position);
            if d >= self.perception_radius || best.map_or(false, |(_, bd)| d >= bd) {
                continue;
            }
            let sheltered = colonies
                .iter()
                .any(|c| ant.position.distance(c.position) < safe_radius);
            if !sheltered {
                best = Some((ant, d));
            }
        }
        best.map(|(a, _)| a)
    }

    /// One tick of pursuit. Returns the ant caught this tick, if any; the
    /// caller removes it from the live set.
    pub fn update(
        &mut self,
        dt_ms: f64,
        bounds: &Bounds,
        ants: &[Ant],
        colonies: &[Colony],
        safe_radius: f64,
        rng: &mut fastrand::Rng,
    ) -> Option<AgentId> {
        if self.sleeping {
            return None;
        }

        let target = self.prey(ants, colonies, safe_radius);
        match target {
            Some(ant) => self.direction = self.direction.towards(self.position, ant.position),
            None => {
                if rng.f64() < self.wander_chance {
                    self.direction = Direction::random_diagonal(rng);
                }
            }
        }

        let step = self.speed * dt_ms / 1000.0;
        self.position = bounds.clamp(self.position.offset(self.direction, step));
        self.body.push_front(self.position);
        self.body.truncate(self.length);

        let ant = target?;
        if self.position.distance(ant.position) < self.capture_distance {
            self.length += 1;
            debug!(ant = %ant.id, length = self.length, "snake caught ant");
            Some(ant.id)
        } else {
            None
        }
    }
}

impl Predator for Snake {
    fn position(&self) -> Vec2 {
        self.position
    }

    // Ants keep clear of a sleeping snake too
    fn is_threatening(&self) -> bool {
        true
    }

    fn on_phase_change(&mut self, phase: Phase, _world: &World, _rng: &mut fastrand::Rng) {
        match phase {
            Phase::Night => self.start_sleeping(),
            Phase::Day => self.wake_up(),
        }
    }
}
