use cogkit_ids::NodeID;

use crate::nodes::Node;

/// Generational slot storage for every node a game owns.
pub struct NodeArena {
    nodes: Vec<Option<Node>>,
    generations: Vec<u32>,
    free_indices: Vec<usize>,
}

impl NodeArena {
    pub fn new() -> Self {
        // Index 0 is the nil sentinel, so the first real node gets index 1.
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.saturating_add(1));
        let mut generations = Vec::with_capacity(capacity.saturating_add(1));
        nodes.push(None);
        generations.push(0);
        Self {
            nodes,
            generations,
            free_indices: Vec::new(),
        }
    }

    /// Inserts the node built by `build`, which receives the id the node will live at.
    pub fn insert_with(&mut self, build: impl FnOnce(NodeID) -> Node) -> NodeID {
        if let Some(index) = self.free_indices.pop() {
            let id = NodeID::from_parts(index as u32, self.generations[index]);
            self.nodes[index] = Some(build(id));
            return id;
        }

        let index = self.nodes.len();
        let id = NodeID::from_parts(index as u32, 0);
        self.nodes.push(Some(build(id)));
        self.generations.push(0);
        id
    }

    #[inline]
    fn slot(&self, id: NodeID) -> Option<usize> {
        let index = id.index() as usize;
        if id.is_nil() || index == 0 || index >= self.nodes.len() {
            return None;
        }
        (self.generations[index] == id.generation()).then_some(index)
    }

    /// Returns None for nil, stale or never-issued ids.
    pub fn get(&self, id: NodeID) -> Option<&Node> {
        self.slot(id).and_then(|index| self.nodes[index].as_ref())
    }

    pub fn get_mut(&mut self, id: NodeID) -> Option<&mut Node> {
        self.slot(id).and_then(|index| self.nodes[index].as_mut())
    }

    /// Removes a node and bumps the slot generation so `id` stops resolving.
    pub fn remove(&mut self, id: NodeID) -> Option<Node> {
        let index = self.slot(id)?;
        self.generations[index] = self.generations[index].wrapping_add(1);
        let removed = self.nodes[index].take();
        if removed.is_some() {
            self.free_indices.push(index);
        }
        removed
    }

    pub fn contains(&self, id: NodeID) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeID, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .skip(1)
            .filter_map(|(index, node)| {
                node.as_ref()
                    .map(|n| (NodeID::from_parts(index as u32, self.generations[index]), n))
            })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (NodeID, &mut Node)> {
        self.nodes
            .iter_mut()
            .zip(self.generations.iter())
            .enumerate()
            .skip(1)
            .filter_map(|(index, (node, &generation))| {
                node.as_mut()
                    .map(|n| (NodeID::from_parts(index as u32, generation), n))
            })
    }

    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.iter().all(|n| n.is_none())
    }
}

impl Default for NodeArena {
    fn default() -> Self {
        Self::new()
    }
}
