use cogkit_ids::NodeID;

use super::Game;
use crate::error::{Error, Result};
use crate::nodes::{Composite, CompositeSlot, NodeData, NodeOptions};

impl Game {
    /// Creates a detached node holding `composite`. Its sub-tree is built on
    /// the first update after it joins a scene.
    pub fn create_composite(
        &mut self,
        options: NodeOptions,
        composite: impl Composite,
    ) -> Result<NodeID> {
        self.create_node(options, CompositeSlot::new(composite))
    }

    /// Borrows the composite stored on `id` as a `T`.
    pub fn composite<T: Composite>(&self, id: NodeID) -> Result<&T> {
        let node = self.node(id)?;
        let NodeData::Composite(slot) = &node.data else {
            return Err(wrong_type::<T>(id));
        };
        slot.get()
            .and_then(|c| c.as_any().downcast_ref::<T>())
            .ok_or_else(|| wrong_type::<T>(id))
    }

    /// Checks the composite on `id` out as a `T` and hands it to `f` together
    /// with the game, so composite methods can edit their own sub-tree.
    /// The composite is put back even when `f` fails.
    pub fn with_composite_mut<T: Composite, R>(
        &mut self,
        id: NodeID,
        f: impl FnOnce(&mut T, &mut Game) -> Result<R>,
    ) -> Result<R> {
        let slot = match &mut self.node_mut(id)?.data {
            NodeData::Composite(slot) => slot,
            _ => return Err(wrong_type::<T>(id)),
        };
        let Some(mut boxed) = slot.take() else {
            // checked out further up the stack, e.g. from its own initialize
            return Err(wrong_type::<T>(id));
        };

        let result = match boxed.as_any_mut().downcast_mut::<T>() {
            Some(composite) => f(composite, self),
            None => Err(wrong_type::<T>(id)),
        };

        if let Some(NodeData::Composite(slot)) = self.nodes.get_mut(id).map(|n| &mut n.data) {
            slot.restore(boxed);
        }
        result
    }
}

fn wrong_type<T>(node: NodeID) -> Error {
    let name = std::any::type_name::<T>();
    Error::WrongNodeType {
        node,
        expected: name.rsplit("::").next().unwrap_or(name),
    }
}
