use crate::error::SimError;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, TAU};
use std::fmt;
use std::ops::{Add, Mul, Sub};
use std::str::FromStr;

/// World coordinate in logical units
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`
    #[inline]
    pub fn distance(self, other: Vec2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Point reached by walking `step` units along `direction`
    #[inline]
    pub fn offset(self, direction: Direction, step: f64) -> Vec2 {
        Vec2::new(self.x + direction.dx() * step, self.y + direction.dy() * step)
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Parses `x,y`, the format the CLI accepts for placements
impl FromStr for Vec2 {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| SimError::InvalidPosition(s.to_string()))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| SimError::InvalidPosition(s.to_string()))
        };
        Ok(Vec2::new(parse(x)?, parse(y)?))
    }
}

/// Unit-length heading. Every constructor either normalizes or refuses a
/// degenerate vector, so `dx² + dy² == 1` always holds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Direction {
    dx: f64,
    dy: f64,
}

impl Default for Direction {
    fn default() -> Self {
        Direction::EAST
    }
}

impl Direction {
    pub const EAST: Direction = Direction { dx: 1.0, dy: 0.0 };
    pub const WEST: Direction = Direction { dx: -1.0, dy: 0.0 };
    pub const NORTH: Direction = Direction { dx: 0.0, dy: -1.0 };
    pub const SOUTH: Direction = Direction { dx: 0.0, dy: 1.0 };

    /// Normalize `(dx, dy)`; `None` for zero-length or non-finite input
    pub fn try_new(dx: f64, dy: f64) -> Option<Direction> {
        let len = dx.hypot(dy);
        if len.is_finite() && len > f64::EPSILON {
            Some(Direction {
                dx: dx / len,
                dy: dy / len,
            })
        } else {
            None
        }
    }

    pub fn from_angle(radians: f64) -> Direction {
        Direction {
            dx: radians.cos(),
            dy: radians.sin(),
        }
    }

    /// Uniformly random heading
    pub fn random(rng: &mut fastrand::Rng) -> Direction {
        Direction::from_angle(rng.f64() * TAU)
    }

    /// One of the four diagonals, picked at random
    pub fn random_diagonal(rng: &mut fastrand::Rng) -> Direction {
        let sx = if rng.bool() { 1.0 } else { -1.0 };
        let sy = if rng.bool() { 1.0 } else { -1.0 };
        Direction {
            dx: sx * FRAC_1_SQRT_2,
            dy: sy * FRAC_1_SQRT_2,
        }
    }

    /// Heading from `from` to `to`, or `self` unchanged if the points coincide
    pub fn towards(self, from: Vec2, to: Vec2) -> Direction {
        Direction::try_new(to.x - from.x, to.y - from.y).unwrap_or(self)
    }

    /// Escape heading: the bearing away from `threat`, rotated by a random
    /// angle within a quarter turn either side. A threat sitting exactly on
    /// `from` yields a fully random heading.
    pub fn escape(from: Vec2, threat: Vec2, rng: &mut fastrand::Rng) -> Direction {
        match Direction::try_new(from.x - threat.x, from.y - threat.y) {
            Some(away) => {
                let jitter = (rng.f64() * 2.0 - 1.0) * FRAC_PI_2;
                Direction::from_angle(away.angle() + jitter)
            }
            None => Direction::random(rng),
        }
    }

    #[inline]
    pub fn dx(self) -> f64 {
        self.dx
    }

    #[inline]
    pub fn dy(self) -> f64 {
        self.dy
    }

    #[inline]
    pub fn angle(self) -> f64 {
        self.dy.atan2(self.dx)
    }

    pub fn reversed(self) -> Direction {
        Direction {
            dx: -self.dx,
            dy: -self.dy,
        }
    }

    /// Force the horizontal component to point right (`true`) or left
    pub(crate) fn with_dx_sign(self, positive: bool) -> Direction {
        let dx = self.dx.abs();
        Direction {
            dx: if positive { dx } else { -dx },
            dy: self.dy,
        }
    }

    /// Force the vertical component to point down (`true`) or up
    pub(crate) fn with_dy_sign(self, positive: bool) -> Direction {
        let dy = self.dy.abs();
        Direction {
            dx: self.dx,
            dy: if positive { dy } else { -dy },
        }
    }

    /// Dot product with another heading
    pub fn dot(self, other: Direction) -> f64 {
        self.dx * other.dx + self.dy * other.dy
    }
}
