use crate::config::ResourcesConfig;
use crate::direction::Vec2;
use crate::ids::{IdSequence, ResourceId};
use crate::world::bounds::Bounds;
use crate::world::resource::{NodeKind, ResourceNode};

/// Shared spatial world: bounds plus the active resource nodes.
///
/// Nodes are kept in creation order. Ids grow monotonically and pruning keeps
/// the relative order, so the list stays sorted by id and lookups are a
/// binary search.
#[derive(Clone, Debug)]
pub struct World {
    bounds: Bounds,
    resources: Vec<ResourceNode>,
    ids: IdSequence,
}

impl World {
    /// Create an empty world
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            resources: Vec::with_capacity(128),
            ids: IdSequence::default(),
        }
    }

    #[inline]
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Active nodes in creation order
    #[inline]
    pub fn resources(&self) -> &[ResourceNode] {
        &self.resources
    }

    #[inline]
    fn index_of(&self, id: ResourceId) -> Option<usize> {
        self.resources.binary_search_by_key(&id, |n| n.id).ok()
    }

    /// Get a node by id
    #[inline]
    pub fn resource(&self, id: ResourceId) -> Option<&ResourceNode> {
        self.index_of(id).map(|i| &self.resources[i])
    }

    /// Get a mutable node by id
    #[inline]
    pub fn resource_mut(&mut self, id: ResourceId) -> Option<&mut ResourceNode> {
        self.index_of(id).map(move |i| &mut self.resources[i])
    }

    /// Place a full node of `kind`; the position is clamped into bounds
    pub fn add_resource(&mut self, kind: NodeKind, position: Vec2, config: &ResourcesConfig) -> ResourceId {
        let id = ResourceId(self.ids.next());
        let position = self.bounds.clamp(position);
        self.resources
            .push(ResourceNode::new(id, kind, position, config.node(kind)));
        id
    }

    /// Insert a prepared node under a fresh id, for scripted setups
    pub fn insert_resource(&mut self, mut node: ResourceNode) -> ResourceId {
        let id = ResourceId(self.ids.next());
        node.id = id;
        node.position = self.bounds.clamp(node.position);
        self.resources.push(node);
        id
    }

    /// First node in list order within `radius` of `p` that still has content
    pub fn first_collectible_within(&self, p: Vec2, radius: f64) -> Option<ResourceId> {
        self.resources
            .iter()
            .find(|n| !n.is_depleted() && p.distance(n.position) < radius)
            .map(|n| n.id)
    }

    /// Nearest node satisfying `filter`; ties go to the earlier node
    pub fn nearest_where<F>(&self, p: Vec2, filter: F) -> Option<&ResourceNode>
    where
        F: Fn(&ResourceNode) -> bool,
    {
        let mut best: Option<(&ResourceNode, f64)> = None;
        for node in self.resources.iter().filter(|n| filter(n)) {
            let d = p.distance(node.position);
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((node, d));
            }
        }
        best.map(|(n, _)| n)
    }

    /// Number of active nodes of `kind`
    pub fn count(&self, kind: NodeKind) -> usize {
        self.resources.iter().filter(|n| n.kind == kind).count()
    }

    /// Regrow every node
    pub fn tick_resources(&mut self, dt_ms: f64) {
        for node in &mut self.resources {
            node.tick(dt_ms);
        }
    }

    /// Remove depleted nodes that no ant is still heading for.
    /// Returns the ids removed.
    pub fn prune_depleted(&mut self, targeted: &[ResourceId]) -> Vec<ResourceId> {
        let mut removed = Vec::new();
        self.resources.retain(|n| {
            let keep = !n.is_depleted() || targeted.contains(&n.id);
            if !keep {
                removed.push(n.id);
            }
            keep
        });
        removed
    }

    /// Random position inside the spawn margin that keeps `min_spacing` from
    /// every node, or any random position once `attempts` are used up
    pub fn open_position(
        &self,
        margin: f64,
        min_spacing: f64,
        attempts: usize,
        rng: &mut fastrand::Rng,
    ) -> Vec2 {
        for _ in 0..attempts {
            let p = self.bounds.random_point(margin, rng);
            let crowded = self
                .resources
                .iter()
                .any(|n| p.distance(n.position) < min_spacing);
            if !crowded {
                return p;
            }
        }
        self.bounds.random_point(margin, rng)
    }
}
