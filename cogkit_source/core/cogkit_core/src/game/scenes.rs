use cogkit_ids::NodeID;

use super::Game;
use crate::actions::Action;
use crate::error::{Error, Result};
use crate::events::{EventType, NodeEvent};
use crate::nodes::Node;
use crate::structs::Point;
use crate::transition::{SceneState, Transition};

/// Action key of the slide moves, so they can be cleared when a slide ends early.
const TRANSITION_KEY: &str = "__transition";

impl Game {
    /// Registers a scene with this game. Adding a scene twice is a no-op.
    pub fn add_scene(&mut self, scene: NodeID) -> Result<()> {
        if !self.node(scene)?.is_scene() {
            return Err(Error::NotAScene(scene));
        }
        if !self.scenes.contains(&scene) {
            self.scenes.push(scene);
        }
        Ok(())
    }

    pub fn scenes(&self) -> &[NodeID] {
        &self.scenes
    }

    pub fn scene_by_name(&self, name: &str) -> Result<NodeID> {
        self.scenes
            .iter()
            .copied()
            .find(|s| self.nodes.get(*s).and_then(Node::name) == Some(name))
            .ok_or_else(|| Error::SceneNotFound(name.to_string()))
    }

    pub fn current_scene(&self) -> Option<NodeID> {
        self.nodes.contains(self.current_scene).then_some(self.current_scene)
    }

    pub fn scene_state(&self, scene: NodeID) -> SceneState {
        if scene == self.outgoing_scene {
            SceneState::TransitioningOut
        } else if scene != self.current_scene || !self.nodes.contains(scene) {
            SceneState::Unpresented
        } else if self.outgoing_scene.is_nil() {
            SceneState::Active
        } else {
            SceneState::Presenting
        }
    }

    /// Makes `scene` the current scene.
    ///
    /// A scene presented before gets fresh runs of its nodes' declared
    /// actions. `SceneSetup` fires immediately; `SceneDisappear` and
    /// `SceneAppear` fire once the transition has finished.
    pub fn present_scene(&mut self, scene: NodeID, transition: Transition) -> Result<()> {
        if !self.scenes.contains(&scene) {
            let name = self.node(scene)?.name().unwrap_or_default().to_string();
            return Err(Error::SceneNotFound(name));
        }
        if !self.outgoing_scene.is_nil() {
            // a slide is still running; settle it before starting another
            self.finish_transition(self.current_scene, self.outgoing_scene)?;
        }

        let data = self
            .node_mut(scene)?
            .data
            .as_scene_mut()
            .ok_or(Error::NotAScene(scene))?;
        let represented = data.presentations > 0;
        data.presentations += 1;
        if represented {
            self.restore_original_actions(scene)?;
        }
        log::debug!(
            "presenting scene {} ({}) with {:?}",
            self.node(scene)?.name().unwrap_or("<unnamed>"),
            scene,
            transition
        );
        self.dispatch_event(&mut NodeEvent::new(EventType::SceneSetup, scene))?;

        let outgoing = if self.current_scene != scene && self.nodes.contains(self.current_scene) {
            self.current_scene
        } else {
            NodeID::nil()
        };
        self.current_scene = scene;

        match transition {
            Transition::None => {
                self.node_mut(scene)?.transform.position = Point::ZERO;
                self.finish_transition(scene, outgoing)
            }
            Transition::Slide {
                direction,
                duration_ms,
                easing,
            } => {
                let offset = direction.offscreen_offset(self.canvas_size());
                self.outgoing_scene = outgoing;
                self.set_transitioning(scene, true)?;
                self.node_mut(scene)?.transform.position = offset;

                let slide_in = Action::sequence(vec![
                    Action::move_to(Point::ZERO, duration_ms).with_easing(easing),
                    Action::custom(move |game| game.finish_transition(scene, outgoing)),
                ])
                .during_transition();
                self.run_action(scene, slide_in, Some(TRANSITION_KEY))?;

                if self.nodes.contains(outgoing) {
                    self.set_transitioning(outgoing, true)?;
                    let slide_out = Action::move_to(-offset, duration_ms)
                        .with_easing(easing)
                        .during_transition();
                    self.run_action(outgoing, slide_out, Some(TRANSITION_KEY))?;
                }
                Ok(())
            }
        }
    }

    fn finish_transition(&mut self, incoming: NodeID, outgoing: NodeID) -> Result<()> {
        if self.nodes.contains(incoming) {
            self.set_transitioning(incoming, false)?;
            self.remove_action(incoming, TRANSITION_KEY)?;
            self.node_mut(incoming)?.transform.position = Point::ZERO;
        }
        if self.outgoing_scene == outgoing {
            self.outgoing_scene = NodeID::nil();
        }
        if self.nodes.contains(outgoing) {
            self.set_transitioning(outgoing, false)?;
            self.remove_action(outgoing, TRANSITION_KEY)?;
            self.node_mut(outgoing)?.transform.position = Point::ZERO;
            self.dispatch_event(&mut NodeEvent::new(EventType::SceneDisappear, outgoing))?;
        }
        self.dispatch_event(&mut NodeEvent::new(EventType::SceneAppear, incoming))
    }

    fn set_transitioning(&mut self, scene: NodeID, transitioning: bool) -> Result<()> {
        self.node_mut(scene)?
            .data
            .as_scene_mut()
            .ok_or(Error::NotAScene(scene))?
            .transitioning = transitioning;
        Ok(())
    }
}
