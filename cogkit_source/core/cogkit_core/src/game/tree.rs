use cogkit_ids::NodeID;

use super::Game;
use crate::error::{Error, Result};
use crate::layout::Layout;
use crate::nodes::{Node, NodeData, NodeOptions, Scene, Transform};
use crate::structs::{Color, Point, Rect};

impl Game {
    /// Creates a detached node. Scenes go through [`Game::create_scene`].
    pub fn create_node(&mut self, options: NodeOptions, data: impl Into<NodeData>) -> Result<NodeID> {
        let data = data.into();
        if let NodeData::Shape(shape) = &data {
            shape.validate()?;
        }
        Ok(self.nodes.insert_with(|id| Node::new(id, options, data)))
    }

    pub fn create_scene(&mut self, name: &str, background_color: Color) -> NodeID {
        let size = self.canvas_size();
        let options = NodeOptions::named(name).size(size.width, size.height);
        self.nodes
            .insert_with(|id| Node::new(id, options, Scene::new(background_color).into()))
    }

    pub fn add_child(&mut self, parent: NodeID, child: NodeID) -> Result<()> {
        if parent == child {
            return Err(Error::SelfParenting(child));
        }
        let child_node = self.node(child)?;
        if child_node.is_scene() {
            return Err(Error::SceneAsChild(child));
        }
        if child_node.has_parent() {
            return Err(Error::AlreadyParented {
                child,
                existing: child_node.parent,
            });
        }
        let name = child_node.name.clone();

        let parent_node = self.node(parent)?;
        if let Some(name) = name {
            let taken = parent_node
                .children
                .iter()
                .any(|c| self.nodes.get(*c).and_then(Node::name) == Some(name.as_str()));
            if taken {
                return Err(Error::DuplicateName { parent, name });
            }
        }
        // a root child may still be an ancestor of the parent
        if self.ancestors(parent).contains(&child) {
            return Err(Error::SelfParenting(child));
        }

        self.node_mut(parent)?.children.push(child);
        let child_node = self.node_mut(child)?;
        child_node.parent = parent;
        child_node.layout_warned = [false; 2];
        Ok(())
    }

    pub fn remove_child(&mut self, parent: NodeID, child: NodeID) -> Result<()> {
        self.remove_children(parent, &[child])
    }

    /// Detaches every listed child. Nothing is detached if any of them is not
    /// a direct child of `parent`.
    pub fn remove_children(&mut self, parent: NodeID, children: &[NodeID]) -> Result<()> {
        let parent_node = self.node(parent)?;
        if let Some(stray) = children.iter().find(|c| !parent_node.children.contains(c)) {
            return Err(Error::NotAChild {
                parent,
                child: *stray,
            });
        }
        self.node_mut(parent)?
            .children
            .retain(|c| !children.contains(c));
        for child in children {
            self.detach(*child);
        }
        Ok(())
    }

    pub fn remove_all_children(&mut self, parent: NodeID) -> Result<()> {
        let children = std::mem::take(&mut self.node_mut(parent)?.children);
        for child in children {
            self.detach(child);
        }
        Ok(())
    }

    fn detach(&mut self, child: NodeID) {
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = NodeID::nil();
            node.clear_pointer_state();
        }
    }

    /// Detaches `id` and frees it together with its whole sub-tree.
    pub fn destroy_node(&mut self, id: NodeID) -> Result<()> {
        let parent = self.node(id)?.parent;
        if !parent.is_nil() {
            self.remove_child(parent, id)?;
        }
        self.scenes.retain(|s| *s != id);
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(next) {
                stack.extend(node.children);
            }
        }
        Ok(())
    }

    /// First node named `name` below `root`, depth-first pre-order.
    pub fn descendant(&self, root: NodeID, name: &str) -> Result<NodeID> {
        self.descendants(root)?
            .into_iter()
            .find(|id| self.nodes.get(*id).and_then(Node::name) == Some(name))
            .ok_or_else(|| Error::DescendantNotFound(name.to_string()))
    }

    /// Every node below `root` (excluding it), depth-first pre-order.
    pub fn descendants(&self, root: NodeID) -> Result<Vec<NodeID>> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeID> = self.node(root)?.children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            out.push(id);
            stack.extend(node.children.iter().rev());
        }
        Ok(out)
    }

    /// Parent, grandparent, ... up to the root.
    pub fn ancestors(&self, id: NodeID) -> Vec<NodeID> {
        let mut out = Vec::new();
        let mut current = self.nodes.get(id).map_or(NodeID::nil(), |n| n.parent);
        while let Some(node) = self.nodes.get(current) {
            out.push(current);
            current = node.parent;
        }
        out
    }

    /// Root of the tree containing `id`; `id` itself when it has no parent.
    pub fn root_of(&self, id: NodeID) -> NodeID {
        self.ancestors(id).last().copied().unwrap_or(id)
    }

    /// Scene containing `id`, if its root is a scene.
    pub fn scene_of(&self, id: NodeID) -> Option<NodeID> {
        let root = self.root_of(id);
        self.nodes.get(root).filter(|n| n.is_scene()).map(|_| root)
    }

    /// Payload access for mutation. Marks the node for re-initialization so
    /// derived size and composite sub-trees are rebuilt on the next update.
    pub fn data_mut(&mut self, id: NodeID) -> Result<&mut NodeData> {
        let node = self.node_mut(id)?;
        node.needs_initialization = true;
        Ok(&mut node.data)
    }

    pub fn mark_needs_initialization(&mut self, id: NodeID) -> Result<()> {
        self.node_mut(id)?.needs_initialization = true;
        Ok(())
    }

    pub fn transform_mut(&mut self, id: NodeID) -> Result<&mut Transform> {
        Ok(&mut self.node_mut(id)?.transform)
    }

    pub fn set_position(&mut self, id: NodeID, position: Point) -> Result<()> {
        self.node_mut(id)?.transform.position = position;
        Ok(())
    }

    pub fn set_hidden(&mut self, id: NodeID, hidden: bool) -> Result<()> {
        self.node_mut(id)?.hidden = hidden;
        Ok(())
    }

    pub fn set_layout(&mut self, id: NodeID, layout: Layout) -> Result<()> {
        let node = self.node_mut(id)?;
        node.layout = layout;
        node.layout_warned = [false; 2];
        Ok(())
    }

    /// Absolute axis-aligned bounds, including rotation, as of the last update.
    pub fn bounding_box(&self, id: NodeID) -> Result<Rect> {
        let node = self.node(id)?;
        let center = node.absolute_center();
        let size = node.scaled_size();
        let (hw, hh) = (size.width / 2.0, size.height / 2.0);
        let corners = [
            Point::new(center.x - hw, center.y - hh),
            Point::new(center.x + hw, center.y - hh),
            Point::new(center.x + hw, center.y + hh),
            Point::new(center.x - hw, center.y + hh),
        ]
        .map(|p| p.rotated_about(center, node.absolute_z_rotation));
        Ok(Rect::bounding(&corners))
    }
}
