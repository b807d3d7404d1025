use serde::{Deserialize, Serialize};
use std::fmt;

/// What ants carry and colonies store
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ResourceKind {
    Minerals = 0,
    Plants = 1,
}

impl ResourceKind {
    /// All resource kinds
    pub const ALL: [ResourceKind; 2] = [ResourceKind::Minerals, ResourceKind::Plants];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Minerals => "minerals",
            ResourceKind::Plants => "plants",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Amount per resource kind. Used for ant cargo, colony stock and costs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stock {
    pub minerals: f64,
    pub plants: f64,
}

impl Stock {
    pub const EMPTY: Stock = Stock {
        minerals: 0.0,
        plants: 0.0,
    };

    pub const fn new(minerals: f64, plants: f64) -> Self {
        Self { minerals, plants }
    }

    #[inline]
    pub fn get(&self, kind: ResourceKind) -> f64 {
        match kind {
            ResourceKind::Minerals => self.minerals,
            ResourceKind::Plants => self.plants,
        }
    }

    #[inline]
    fn slot(&mut self, kind: ResourceKind) -> &mut f64 {
        match kind {
            ResourceKind::Minerals => &mut self.minerals,
            ResourceKind::Plants => &mut self.plants,
        }
    }

    pub fn add(&mut self, kind: ResourceKind, amount: f64) {
        *self.slot(kind) += amount;
    }

    /// Add every kind of `other`
    pub fn absorb(&mut self, other: &Stock) {
        for kind in ResourceKind::ALL {
            self.add(kind, other.get(kind));
        }
    }

    /// Sum across kinds
    #[inline]
    pub fn total(&self) -> f64 {
        self.minerals + self.plants
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total() <= 0.0
    }

    /// True when every kind holds at least as much as `cost`
    pub fn covers(&self, cost: &Stock) -> bool {
        ResourceKind::ALL
            .iter()
            .all(|&kind| self.get(kind) >= cost.get(kind))
    }

    /// Subtract `cost` if covered; leaves `self` untouched otherwise
    pub fn try_debit(&mut self, cost: &Stock) -> bool {
        if !self.covers(cost) {
            return false;
        }
        for kind in ResourceKind::ALL {
            *self.slot(kind) -= cost.get(kind);
        }
        true
    }

    /// Move everything out, leaving `self` empty
    pub fn take(&mut self) -> Stock {
        std::mem::take(self)
    }

    /// Non-zero entries, in `ResourceKind::ALL` order
    pub fn entries(&self) -> impl Iterator<Item = (ResourceKind, f64)> + '_ {
        ResourceKind::ALL
            .into_iter()
            .map(|kind| (kind, self.get(kind)))
            .filter(|&(_, amount)| amount > 0.0)
    }
}

impl fmt::Display for Stock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{minerals: {:.1}, plants: {:.1}}}",
            self.minerals, self.plants
        )
    }
}
