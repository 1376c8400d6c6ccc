use std::collections::VecDeque;

use cogkit_ids::NodeID;
use indexmap::IndexMap;
use smallvec::SmallVec;

use super::Game;
use crate::error::{Error, Result};
use crate::layout::{self, Axis, ConstraintTarget, TargetGeometry};
use crate::nodes::{NodeData, NodeKind};

impl Game {
    /// Runs the update pass for the current scene and, mid-transition, the
    /// outgoing one.
    pub fn update(&mut self, now_ms: f64) -> Result<()> {
        self.context.advance(now_ms);
        for scene in [self.current_scene, self.outgoing_scene] {
            if self.nodes.contains(scene) {
                self.update_node(scene)?;
            }
        }
        Ok(())
    }

    /// Updates `id` and then its children, parents strictly before children.
    ///
    /// Custom actions may destroy nodes mid-pass; a destroyed node is skipped
    /// along with its subtree.
    pub(crate) fn update_node(&mut self, id: NodeID) -> Result<()> {
        self.initialize_if_needed(id)?;
        self.update_alpha(id)?;
        self.update_position(id)?;
        self.evaluate_actions(id)?;
        if !self.nodes.contains(id) {
            return Ok(());
        }
        for child in self.child_update_order(id)? {
            if self.nodes.contains(child) {
                self.update_node(child)?;
            }
        }
        Ok(())
    }

    fn initialize_if_needed(&mut self, id: NodeID) -> Result<()> {
        let node = self.nodes.get_mut(id).ok_or(Error::MissingNode(id))?;
        if !node.needs_initialization {
            return Ok(());
        }
        node.needs_initialization = false;
        if let Some(size) = node.data.intrinsic_size() {
            node.size = size;
        }

        let slot = match &mut node.data {
            NodeData::Sprite(sprite) => {
                if sprite.size.is_none() {
                    if let Some(size) = self.assets.image_size(&sprite.image_name) {
                        node.size = size;
                    }
                }
                return Ok(());
            }
            NodeData::Composite(slot) => slot,
            _ => return Ok(()),
        };
        let Some(mut composite) = slot.take() else {
            return Ok(());
        };
        log::debug!("initializing {} {}", composite.composite_type(), id);
        let result = composite.initialize(self, id);
        if let Some(NodeData::Composite(slot)) = self.nodes.get_mut(id).map(|n| &mut n.data) {
            slot.restore(composite);
        }
        result
    }

    /// Own alpha times every ancestor's alpha, read fresh from the chain.
    fn update_alpha(&mut self, id: NodeID) -> Result<()> {
        let inherited: f32 = self
            .ancestors(id)
            .iter()
            .filter_map(|a| self.nodes.get(*a))
            .map(|a| a.transform.alpha)
            .product();
        let node = self.node_mut(id)?;
        let alpha = node.transform.alpha * inherited;
        node.absolute_alpha_change = alpha - node.absolute_alpha;
        node.absolute_alpha = alpha;
        Ok(())
    }

    fn update_position(&mut self, id: NodeID) -> Result<()> {
        let node = self.node(id)?;
        let parent = node.parent;
        let Some(parent_node) = self.nodes.get(parent) else {
            let node = self.node_mut(id)?;
            node.absolute_position = node.transform.position * node.transform.scale;
            node.absolute_scale = node.transform.scale;
            node.absolute_z_rotation = node.transform.z_rotation;
            return Ok(());
        };
        let (parent_position, parent_scale, parent_rotation) = (
            parent_node.absolute_position,
            parent_node.absolute_scale,
            parent_node.absolute_z_rotation,
        );

        if !node.layout.has_constraints() {
            let node = self.node_mut(id)?;
            node.absolute_position = parent_position + node.transform.position * parent_scale;
            node.absolute_scale = parent_scale * node.transform.scale;
            node.absolute_z_rotation = parent_rotation + node.transform.z_rotation;
            return Ok(());
        }

        let node = self.node_mut(id)?;
        node.absolute_scale = parent_scale * node.transform.scale;
        node.absolute_z_rotation = parent_rotation + node.transform.z_rotation;
        let y = self.solve_axis(id, Axis::Vertical)?;
        let x = self.solve_axis(id, Axis::Horizontal)?;
        let node = self.node_mut(id)?;
        if let Some(y) = y {
            node.absolute_position.y = y;
        }
        if let Some(x) = x {
            node.absolute_position.x = x;
        }
        Ok(())
    }

    /// Resolved coordinate on one axis, or None (after a one-time warning)
    /// when the axis does not carry exactly one or two constraints.
    fn solve_axis(&mut self, id: NodeID, axis: Axis) -> Result<Option<f32>> {
        let node = self.node(id)?;
        let Some(constraints) = node.layout.constraints.as_ref() else {
            return Ok(None);
        };
        let own_size = node.scaled_size();
        let own_extent = match axis {
            Axis::Vertical => own_size.height,
            Axis::Horizontal => own_size.width,
        };

        let mut candidates = SmallVec::<[f32; 2]>::new();
        for (ty, target) in constraints.entries.iter().filter(|(ty, _)| ty.axis() == axis) {
            let target_id = self.resolve_constraint_target(id, target)?;
            let geometry = self.target_geometry(target_id, axis)?;
            candidates.push(layout::candidate(
                *ty,
                geometry,
                own_extent,
                node.layout.margin_for(*ty),
            ));
        }

        let resolved = layout::resolve_axis(&candidates, constraints.bias(axis));
        if resolved.is_none() {
            let slot = match axis {
                Axis::Vertical => 0,
                Axis::Horizontal => 1,
            };
            let node = self.node_mut(id)?;
            if !node.layout_warned[slot] {
                node.layout_warned[slot] = true;
                log::warn!(
                    "node {} has {} {:?} constraint(s); exactly one or two are needed, keeping its previous position",
                    node.name().unwrap_or("<unnamed>"),
                    candidates.len(),
                    axis
                );
            }
        }
        Ok(resolved)
    }

    /// Node ids resolve directly; names are searched among the scene's descendants.
    pub(crate) fn resolve_constraint_target(
        &self,
        id: NodeID,
        target: &ConstraintTarget,
    ) -> Result<NodeID> {
        match target {
            ConstraintTarget::Node(target) if self.nodes.contains(*target) => Ok(*target),
            ConstraintTarget::Node(target) => Err(Error::ConstraintTargetNotFound {
                node: id,
                target: target.to_string(),
            }),
            ConstraintTarget::Name(name) => {
                let root = self.root_of(id);
                self.descendant(root, name)
                    .map_err(|_| Error::ConstraintTargetNotFound {
                        node: id,
                        target: name.clone(),
                    })
            }
        }
    }

    fn target_geometry(&self, target: NodeID, axis: Axis) -> Result<TargetGeometry> {
        let node = self.node(target)?;
        let size = node.scaled_size();
        let (position, extent) = match axis {
            Axis::Vertical => (node.absolute_position.y, size.height),
            Axis::Horizontal => (node.absolute_position.x, size.width),
        };
        Ok(TargetGeometry {
            position,
            extent,
            is_scene: node.is_scene(),
        })
    }

    /// Children ordered so that constraint targets update before the siblings
    /// that depend on them.
    ///
    /// Edges run from a child to each sibling its constraints reference
    /// (references to the parent are ignored, it is already resolved). Kahn's
    /// algorithm seeded in insertion order yields dependents first, so the
    /// result is the reverse of that order.
    fn child_update_order(&self, id: NodeID) -> Result<Vec<NodeID>> {
        let children = &self.node(id)?.children;
        let mut dependencies: IndexMap<NodeID, SmallVec<[NodeID; 2]>> =
            children.iter().map(|c| (*c, SmallVec::new())).collect();
        let mut edge_count = 0usize;

        for child in children {
            let Some(constraints) = self.nodes.get(*child).and_then(|n| n.layout.constraints.as_ref())
            else {
                continue;
            };
            for target in constraints.entries.values() {
                let target = self.resolve_constraint_target(*child, target)?;
                if target != id && dependencies.contains_key(&target) {
                    if let Some(deps) = dependencies.get_mut(child) {
                        deps.push(target);
                        edge_count += 1;
                    }
                }
            }
        }
        if edge_count == 0 {
            return Ok(children.clone());
        }

        let mut in_degree: IndexMap<NodeID, usize> = children.iter().map(|c| (*c, 0)).collect();
        for deps in dependencies.values() {
            for dep in deps {
                if let Some(d) = in_degree.get_mut(dep) {
                    *d += 1;
                }
            }
        }

        let mut queue: VecDeque<NodeID> = in_degree
            .iter()
            .filter(|(_, d)| **d == 0)
            .map(|(c, _)| *c)
            .collect();
        let mut order = Vec::with_capacity(children.len());
        while let Some(next) = queue.pop_front() {
            order.push(next);
            for dep in &dependencies[&next] {
                if let Some(d) = in_degree.get_mut(dep) {
                    *d -= 1;
                    if *d == 0 {
                        queue.push_back(*dep);
                    }
                }
            }
        }

        if order.len() < children.len() {
            return Err(Error::ConstraintCycle { parent: id });
        }
        order.reverse();
        Ok(order)
    }
}
