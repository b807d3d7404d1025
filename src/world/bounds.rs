use crate::direction::{Direction, Vec2};

/// Axis-aligned world rectangle `[0, width] x [0, height]`. No wraparound.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        (0.0..=self.width).contains(&p.x) && (0.0..=self.height).contains(&p.y)
    }

    /// Nearest point inside the bounds
    #[inline]
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x.clamp(0.0, self.width), p.y.clamp(0.0, self.height))
    }

    /// Nearest point at least `inset` away from every edge. The inset
    /// shrinks to the half extent on a world too small for it.
    pub fn clamp_inset(&self, p: Vec2, inset: f64) -> Vec2 {
        let ix = inset.clamp(0.0, self.width / 2.0);
        let iy = inset.clamp(0.0, self.height / 2.0);
        Vec2::new(p.x.clamp(ix, self.width - ix), p.y.clamp(iy, self.height - iy))
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Uniform point at least `margin` away from every edge
    pub fn random_point(&self, margin: f64, rng: &mut fastrand::Rng) -> Vec2 {
        let x = margin + rng.f64() * (self.width - 2.0 * margin).max(0.0);
        let y = margin + rng.f64() * (self.height - 2.0 * margin).max(0.0);
        Vec2::new(x, y)
    }

    /// Within `buffer` of an edge, point the outward velocity component back
    /// inward. Returns the new heading and whether any edge was hit.
    pub fn steer_off_edges(&self, p: Vec2, heading: Direction, buffer: f64) -> (Direction, bool) {
        let mut heading = heading;
        let mut hit = false;

        if p.x <= buffer {
            heading = heading.with_dx_sign(true);
            hit = true;
        } else if p.x >= self.width - buffer {
            heading = heading.with_dx_sign(false);
            hit = true;
        }

        if p.y <= buffer {
            heading = heading.with_dy_sign(true);
            hit = true;
        } else if p.y >= self.height - buffer {
            heading = heading.with_dy_sign(false);
            hit = true;
        }

        (heading, hit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        let b = Bounds::new(480.0, 800.0);
        assert_eq!(b.clamp(Vec2::new(-5.0, 900.0)), Vec2::new(0.0, 800.0));
        assert_eq!(b.clamp(Vec2::new(10.0, 10.0)), Vec2::new(10.0, 10.0));
        assert!(b.contains(b.clamp(Vec2::new(1e9, -1e9))));
    }

    #[test]
    fn test_clamp_inset() {
        let b = Bounds::new(480.0, 800.0);
        assert_eq!(b.clamp_inset(Vec2::new(-50.0, 400.0), 20.0), Vec2::new(20.0, 400.0));
        assert_eq!(b.clamp_inset(Vec2::new(479.0, 900.0), 20.0), Vec2::new(460.0, 780.0));
        assert_eq!(b.clamp_inset(Vec2::new(100.0, 100.0), 20.0), Vec2::new(100.0, 100.0));
        // Inset wider than the world collapses to the centre line
        let tiny = Bounds::new(10.0, 30.0);
        assert_eq!(tiny.clamp_inset(Vec2::new(0.0, 0.0), 20.0), Vec2::new(5.0, 15.0));
    }

    #[test]
    fn test_steer_off_left_and_top() {
        let b = Bounds::new(480.0, 800.0);
        let heading = Direction::try_new(-1.0, -1.0).unwrap();
        let (d, hit) = b.steer_off_edges(Vec2::new(5.0, 5.0), heading, 20.0);
        assert!(hit);
        assert!(d.dx() > 0.0);
        assert!(d.dy() > 0.0);
    }

    #[test]
    fn test_steer_off_right_keeps_inward_heading() {
        let b = Bounds::new(480.0, 800.0);
        let (d, hit) = b.steer_off_edges(Vec2::new(470.0, 400.0), Direction::WEST, 20.0);
        assert!(hit);
        assert_eq!(d, Direction::WEST);
    }

    #[test]
    fn test_no_steer_in_interior() {
        let b = Bounds::new(480.0, 800.0);
        let (d, hit) = b.steer_off_edges(Vec2::new(240.0, 400.0), Direction::NORTH, 20.0);
        assert!(!hit);
        assert_eq!(d, Direction::NORTH);
    }

    #[test]
    fn test_random_point_respects_margin() {
        let b = Bounds::new(480.0, 800.0);
        let mut rng = fastrand::Rng::with_seed(5);
        for _ in 0..200 {
            let p = b.random_point(20.0, &mut rng);
            assert!(p.x >= 20.0 && p.x <= 460.0);
            assert!(p.y >= 20.0 && p.y <= 780.0);
        }
    }
}
