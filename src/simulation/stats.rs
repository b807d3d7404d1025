use crate::simulation::clock::Phase;
use crate::stock::Stock;

/// Running totals of every resource movement.
///
/// Resources only enter the economy by extraction, so at any time
/// `extracted == deposited + in transit + consumed`, where in transit is the
/// cargo of live ants and consumed is the cargo of ants the snake ate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Ledger {
    pub extracted: Stock,
    pub deposited: Stock,
    pub consumed: Stock,
}

impl Ledger {
    /// Whether the books balance against `in_transit`, up to `tolerance`
    /// per kind
    pub fn balances(&self, in_transit: &Stock, tolerance: f64) -> bool {
        let mut accounted = self.deposited;
        accounted.absorb(in_transit);
        accounted.absorb(&self.consumed);
        (self.extracted.minerals - accounted.minerals).abs() <= tolerance
            && (self.extracted.plants - accounted.plants).abs() <= tolerance
    }
}

/// Point-in-time overview of a running simulation
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub ticks: u64,
    pub elapsed_ms: f64,
    pub phase: Phase,
    pub ants: usize,
    pub colonies: usize,
    pub rocks: usize,
    pub plants: usize,
    pub bushes: usize,
    pub captures: u64,
    pub snake_length: usize,
    /// Stock of all colonies together
    pub stock: Stock,
    /// Live nodes over the most the spawner will keep, in `[0, 1]`
    pub abundance: f64,
    /// How close the snake is to the nearest colony, in `[0, 1]`
    pub danger: f64,
}

/// Distance at which the snake stops registering as danger
pub const DANGER_RANGE: f64 = 300.0;

/// Danger level for a snake `distance` away from the nearest colony
pub fn danger_level(distance: Option<f64>) -> f64 {
    distance.map_or(0.0, |d| (1.0 - d / DANGER_RANGE).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_balance() {
        let ledger = Ledger {
            extracted: Stock::new(30.0, 12.0),
            deposited: Stock::new(20.0, 2.0),
            consumed: Stock::new(0.0, 5.0),
        };
        assert!(ledger.balances(&Stock::new(10.0, 5.0), 1e-9));
        assert!(!ledger.balances(&Stock::new(10.0, 4.0), 1e-9));
    }

    #[test]
    fn test_danger_level() {
        assert_eq!(danger_level(None), 0.0);
        assert_eq!(danger_level(Some(0.0)), 1.0);
        assert_eq!(danger_level(Some(150.0)), 0.5);
        assert_eq!(danger_level(Some(1000.0)), 0.0);
    }
}
