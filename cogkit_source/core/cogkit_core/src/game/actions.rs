use cogkit_ids::NodeID;
use smallvec::SmallVec;

use super::Game;
use crate::actions::{Action, ActionCallback, RunningAction};
use crate::error::{Error, Result};
use crate::nodes::{Node, OriginalAction};

impl Game {
    /// Attaches `action` to `id`. Sequences and groups are flattened into
    /// leaves; non-transition actions are also kept as declared so the scene
    /// can replay them when presented again.
    ///
    /// The declared list is refreshed on every run: it keeps the runs that are
    /// still playing, and a run with the same key takes the place of the older one.
    pub fn run_action(&mut self, id: NodeID, action: Action, key: Option<&str>) -> Result<()> {
        action.validate()?;
        let node = self.node_mut(id)?;
        let leaves = RunningAction::flatten(&action, key);
        let run = leaves.first().map(|l| l.run);
        node.actions.extend(leaves);

        let Node {
            actions,
            original_actions,
            ..
        } = node;
        original_actions.retain(|o| {
            actions.iter().any(|a| a.run == o.run)
                && (key.is_none() || o.key.as_deref() != key)
        });
        if let Some(run) = run.filter(|_| !action.run_during_transition) {
            original_actions.push(OriginalAction {
                run,
                action,
                key: key.map(str::to_string),
            });
        }
        Ok(())
    }

    /// Drops every running action tagged with `key`.
    pub fn remove_action(&mut self, id: NodeID, key: &str) -> Result<()> {
        let node = self.node_mut(id)?;
        node.actions.retain(|a| a.key.as_deref() != Some(key));
        node.original_actions.retain(|o| o.key.as_deref() != Some(key));
        Ok(())
    }

    pub fn remove_all_actions(&mut self, id: NodeID) -> Result<()> {
        let node = self.node_mut(id)?;
        node.actions.clear();
        node.original_actions.clear();
        Ok(())
    }

    pub fn has_action(&self, id: NodeID, key: &str) -> bool {
        self.nodes
            .get(id)
            .is_some_and(|n| n.actions.iter().any(|a| a.key.as_deref() == Some(key)))
    }

    /// Advances the node's actions for this frame. Transition actions always
    /// advance; regular ones pause while the node's scene is transitioning.
    /// Custom callbacks run after the node's own actions have advanced.
    pub(crate) fn evaluate_actions(&mut self, id: NodeID) -> Result<()> {
        let transitioning = self.is_transitioning(id);
        let now = self.context.now_ms;

        let mut callbacks = SmallVec::<[ActionCallback; 2]>::new();
        let node = self.node_mut(id)?;
        if node.actions.is_empty() {
            return Ok(());
        }
        let Node {
            actions, transform, ..
        } = node;
        for action in actions
            .iter_mut()
            .filter(|a| a.run_during_transition || !transitioning)
        {
            if let Some(callback) = action.advance(now, transform) {
                callbacks.push(callback);
            }
        }
        actions.retain(|a| !a.is_completed());

        for callback in callbacks {
            callback(self)?;
        }
        Ok(())
    }

    /// Replaces the running actions of every node under `scene` (and the
    /// scene itself) with fresh runs of their declared actions.
    pub(crate) fn restore_original_actions(&mut self, scene: NodeID) -> Result<()> {
        let mut ids = self.descendants(scene)?;
        ids.push(scene);
        for id in ids {
            let node = self.nodes.get_mut(id).ok_or(Error::MissingNode(id))?;
            // transition actions still in flight are not part of the snapshot
            node.actions.retain(|a| a.run_during_transition);
            for original in node.original_actions.iter_mut() {
                let leaves = RunningAction::flatten(&original.action, original.key.as_deref());
                if let Some(first) = leaves.first() {
                    original.run = first.run;
                }
                node.actions.extend(leaves);
            }
        }
        Ok(())
    }

    fn is_transitioning(&self, id: NodeID) -> bool {
        self.scene_of(id)
            .and_then(|scene| self.nodes.get(scene))
            .and_then(|n| n.data.as_scene())
            .is_some_and(|s| s.transitioning)
    }
}
