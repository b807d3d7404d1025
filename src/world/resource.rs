use crate::config::NodeConfig;
use crate::direction::Vec2;
use crate::ids::ResourceId;
use crate::stock::ResourceKind;

/// Kind of resource node found in the world
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NodeKind {
    Rock = 0,
    Plant = 1,
    Bush = 2,
}

impl NodeKind {
    /// All node kinds
    pub const ALL: [NodeKind; 3] = [NodeKind::Rock, NodeKind::Plant, NodeKind::Bush];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Resource an ant gets from this kind of node
    pub const fn yields(self) -> ResourceKind {
        match self {
            NodeKind::Rock => ResourceKind::Minerals,
            NodeKind::Plant | NodeKind::Bush => ResourceKind::Plants,
        }
    }

    /// Plants and bushes can hide a spider
    pub const fn is_shelter(self) -> bool {
        matches!(self, NodeKind::Plant | NodeKind::Bush)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            NodeKind::Rock => "rock",
            NodeKind::Plant => "plant",
            NodeKind::Bush => "bush",
        }
    }
}

/// Depletable, regenerating resource. `0 <= content <= capacity` always holds.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceNode {
    pub id: ResourceId,
    pub kind: NodeKind,
    pub position: Vec2,
    content: f64,
    capacity: f64,
    regen_per_sec: f64,
    size: f64,
}

impl ResourceNode {
    /// Create a full node
    pub fn new(id: ResourceId, kind: NodeKind, position: Vec2, config: &NodeConfig) -> Self {
        Self {
            id,
            kind,
            position,
            content: config.capacity,
            capacity: config.capacity,
            regen_per_sec: config.regen_per_sec,
            size: config.size,
        }
    }

    /// Override the starting content, clamped into `[0, capacity]`
    pub fn with_content(mut self, content: f64) -> Self {
        self.content = content.clamp(0.0, self.capacity);
        self
    }

    #[inline]
    pub fn content(&self) -> f64 {
        self.content
    }

    #[inline]
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    #[inline]
    pub fn size(&self) -> f64 {
        self.size
    }

    #[inline]
    pub fn yields(&self) -> ResourceKind {
        self.kind.yields()
    }

    #[inline]
    pub fn is_depleted(&self) -> bool {
        self.content <= 0.0
    }

    /// Regrow toward capacity. A depleted node stays depleted until pruned.
    pub fn tick(&mut self, dt_ms: f64) {
        if self.is_depleted() {
            return;
        }
        let grown = self.content + self.regen_per_sec * dt_ms / 1000.0;
        self.content = grown.min(self.capacity);
    }

    /// Take up to `amount`; returns what was actually taken
    pub fn extract(&mut self, amount: f64) -> f64 {
        let taken = amount.max(0.0).min(self.content);
        self.content -= taken;
        if self.content < 0.0 {
            self.content = 0.0;
        }
        taken
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(capacity: f64, regen: f64) -> ResourceNode {
        let config = NodeConfig {
            capacity,
            regen_per_sec: regen,
            ..NodeConfig::default()
        };
        ResourceNode::new(ResourceId(0), NodeKind::Plant, Vec2::new(0.0, 0.0), &config)
    }

    #[test]
    fn test_extract_clamps_to_content() {
        let mut n = node(50.0, 0.0);
        assert_eq!(n.extract(10.0), 10.0);
        assert_eq!(n.content(), 40.0);
        assert_eq!(n.extract(100.0), 40.0);
        assert_eq!(n.content(), 0.0);
        assert!(n.is_depleted());
        assert_eq!(n.extract(5.0), 0.0);
    }

    #[test]
    fn test_extract_never_negative() {
        let mut n = node(50.0, 0.0);
        assert_eq!(n.extract(-3.0), 0.0);
        assert_eq!(n.content(), 50.0);
    }

    #[test]
    fn test_tick_regrows_to_capacity() {
        let mut n = node(30.0, 0.5).with_content(29.0);
        n.tick(1000.0);
        assert!((n.content() - 29.5).abs() < 1e-9);
        n.tick(10_000.0);
        assert_eq!(n.content(), 30.0);
    }

    #[test]
    fn test_depleted_does_not_regrow() {
        let mut n = node(30.0, 0.5).with_content(0.0);
        n.tick(1000.0);
        assert_eq!(n.content(), 0.0);
    }

    #[test]
    fn test_node_kinds() {
        assert_eq!(NodeKind::Rock.yields(), ResourceKind::Minerals);
        assert_eq!(NodeKind::Bush.yields(), ResourceKind::Plants);
        assert!(!NodeKind::Rock.is_shelter());
        assert!(NodeKind::Plant.is_shelter());
    }
}
