use cogkit_ids::NodeID;

use super::Game;
use crate::error::Result;
use crate::events::{EventType, NodeEvent};
use crate::input::{PointerInput, PointerKind};
use crate::structs::Point;

impl Game {
    /// Applies one pointer input to the current scene right away.
    ///
    /// Nodes are visited top-most first. Once a listener marks its event
    /// handled, no further node receives events for this input; press, hover
    /// and drag bookkeeping still resets on every node.
    pub fn handle_pointer(&mut self, input: PointerInput) -> Result<()> {
        let scene = self.current_scene;
        let Some(scene_node) = self.nodes.get(scene) else {
            return Ok(());
        };
        if scene_node.data.as_scene().is_some_and(|s| s.transitioning) {
            return Ok(());
        }

        let targets: Vec<NodeID> = self
            .draw_order(scene)
            .into_iter()
            .rev()
            .filter(|id| {
                self.nodes
                    .get(*id)
                    .is_some_and(|n| n.is_user_interaction_enabled)
            })
            .collect();

        let p = input.position;
        let mut handled = false;
        for id in targets {
            match input.kind {
                PointerKind::Down => {
                    self.pointer_down(id, p, &mut handled)?;
                    if handled {
                        break;
                    }
                }
                PointerKind::Move => self.pointer_move(id, p, &mut handled)?,
                PointerKind::Up => self.pointer_up(id, p, &mut handled)?,
                PointerKind::Leave => self.pointer_leave(id, p, &mut handled)?,
            }
        }
        Ok(())
    }

    fn pointer_down(&mut self, id: NodeID, p: Point, handled: &mut bool) -> Result<()> {
        let Some(node) = self.nodes.get_mut(id) else {
            return Ok(());
        };
        if !node.contains_point(p) {
            return Ok(());
        }
        node.pressed = true;
        node.within_hit_area = true;
        node.pressed_and_within_hit_area = true;
        if node.draggable {
            node.press_offset = node.absolute_position - p;
        }
        self.send(id, EventType::TapDown, p, handled)?;
        self.send(id, EventType::PointerDown, p, handled)
    }

    fn pointer_move(&mut self, id: NodeID, p: Point, handled: &mut bool) -> Result<()> {
        let Some(node) = self.nodes.get(id) else {
            return Ok(());
        };
        if node.pressed && node.draggable {
            if !node.dragging {
                self.node_mut(id)?.dragging = true;
                self.send(id, EventType::DragStart, p, handled)?;
            }
            self.drag_to(id, p)?;
            self.send(id, EventType::Drag, p, handled)?;
        }

        let Some(node) = self.nodes.get_mut(id) else {
            return Ok(());
        };
        let inside = node.contains_point(p);
        let was_within = node.within_hit_area;
        node.within_hit_area = inside;
        let tap_left = node.pressed && !inside && node.pressed_and_within_hit_area;
        if tap_left {
            node.pressed_and_within_hit_area = false;
        }

        if inside {
            self.send(id, EventType::PointerMove, p, handled)?;
        } else if was_within {
            self.send(id, EventType::PointerLeave, p, handled)?;
        }
        if tap_left {
            self.send(id, EventType::TapLeave, p, handled)?;
        }
        Ok(())
    }

    fn pointer_up(&mut self, id: NodeID, p: Point, handled: &mut bool) -> Result<()> {
        let Some(node) = self.nodes.get_mut(id) else {
            return Ok(());
        };
        let inside = node.contains_point(p);
        let (pressed, dragging) = (node.pressed, node.dragging);
        node.clear_pointer_state();

        if dragging {
            self.send(id, EventType::DragEnd, p, handled)?;
        } else if pressed {
            if inside {
                self.send(id, EventType::TapUp, p, handled)?;
            }
            self.send(id, EventType::TapUpAny, p, handled)?;
        }
        if inside {
            self.send(id, EventType::PointerUp, p, handled)?;
        }
        Ok(())
    }

    fn pointer_leave(&mut self, id: NodeID, p: Point, handled: &mut bool) -> Result<()> {
        let Some(node) = self.nodes.get_mut(id) else {
            return Ok(());
        };
        let tap_left = node.pressed_and_within_hit_area;
        let (dragging, within) = (node.dragging, node.within_hit_area);
        node.clear_pointer_state();

        if tap_left {
            self.send(id, EventType::TapLeave, p, handled)?;
        }
        if dragging {
            self.send(id, EventType::DragEnd, p, handled)?;
        }
        if within {
            self.send(id, EventType::PointerLeave, p, handled)?;
        }
        Ok(())
    }

    /// Moves a dragged node so it keeps its press offset from the pointer.
    fn drag_to(&mut self, id: NodeID, p: Point) -> Result<()> {
        let node = self.node(id)?;
        let target = p + node.press_offset;
        let moved = target - node.absolute_position;
        let position = match self.nodes.get(node.parent) {
            Some(parent) if parent.absolute_scale != 0.0 => {
                (target - parent.absolute_position) / parent.absolute_scale
            }
            Some(_) => node.transform.position,
            None if node.transform.scale != 0.0 => target / node.transform.scale,
            None => node.transform.position,
        };
        let node = self.node_mut(id)?;
        node.transform.position = position;
        // keep hit tests for the rest of this input consistent
        node.absolute_position = target;
        node.last_drag_offset = moved;
        Ok(())
    }

    fn send(&mut self, id: NodeID, kind: EventType, p: Point, handled: &mut bool) -> Result<()> {
        if *handled {
            return Ok(());
        }
        let Some(node) = self.nodes.get(id) else {
            return Ok(());
        };
        let mut event = NodeEvent::new(kind, id).at(node.to_local(p));
        self.dispatch_event(&mut event)?;
        *handled |= event.handled;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::nodes::NodeOptions;
    use crate::transition::{SlideDirection, Transition};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<(NodeID, EventType, Point)>>>;

    const ALL: [EventType; 11] = [
        EventType::TapDown,
        EventType::TapUp,
        EventType::TapUpAny,
        EventType::TapLeave,
        EventType::PointerDown,
        EventType::PointerUp,
        EventType::PointerMove,
        EventType::PointerLeave,
        EventType::DragStart,
        EventType::Drag,
        EventType::DragEnd,
    ];

    fn record(game: &mut Game, id: NodeID, log: &Log) {
        for kind in ALL {
            let log = log.clone();
            game.on(id, kind, move |_, event| {
                log.borrow_mut()
                    .push((event.target, event.kind.clone(), event.point));
                Ok(())
            })
            .unwrap();
        }
    }

    fn kinds(log: &Log) -> Vec<EventType> {
        log.borrow_mut().drain(..).map(|(_, k, _)| k).collect()
    }

    /// 100x100 interactive box centered at (200, 200).
    fn box_node(game: &mut Game, scene: NodeID, options: NodeOptions) -> NodeID {
        let id = rect(game, options.at(200.0, 200.0).interactive(), 100.0, 100.0);
        game.add_child(scene, id).unwrap();
        id
    }

    #[test]
    fn tap_inside_fires_down_and_up_with_local_points() {
        let (mut game, scene) = game_with_scene();
        let node = box_node(&mut game, scene, NodeOptions::named("box"));
        let log = Log::default();
        record(&mut game, node, &log);
        game.tick(0.0).unwrap();

        game.handle_pointer(PointerInput::down(160.0, 170.0)).unwrap();
        assert_eq!(log.borrow()[0].2, Point::new(10.0, 20.0));
        assert!(game.node(node).unwrap().pressed);
        game.handle_pointer(PointerInput::up(160.0, 170.0)).unwrap();
        assert_eq!(
            kinds(&log),
            vec![
                EventType::TapDown,
                EventType::PointerDown,
                EventType::TapUp,
                EventType::TapUpAny,
                EventType::PointerUp,
            ]
        );
        assert!(!game.node(node).unwrap().pressed);
    }

    #[test]
    fn leaving_while_pressed_fires_tap_leave_once() {
        let (mut game, scene) = game_with_scene();
        let node = box_node(&mut game, scene, NodeOptions::named("box"));
        let log = Log::default();
        record(&mut game, node, &log);
        game.tick(0.0).unwrap();

        game.handle_pointer(PointerInput::down(200.0, 200.0)).unwrap();
        game.handle_pointer(PointerInput::moved(210.0, 200.0)).unwrap();
        game.handle_pointer(PointerInput::moved(300.0, 200.0)).unwrap();
        game.handle_pointer(PointerInput::moved(320.0, 200.0)).unwrap();
        game.handle_pointer(PointerInput::up(320.0, 200.0)).unwrap();
        assert_eq!(
            kinds(&log),
            vec![
                EventType::TapDown,
                EventType::PointerDown,
                EventType::PointerMove,
                EventType::PointerLeave,
                EventType::TapLeave,
                EventType::TapUpAny,
            ]
        );
    }

    #[test]
    fn dragging_moves_the_node_and_suppresses_taps() {
        let (mut game, scene) = game_with_scene();
        let node = box_node(&mut game, scene, NodeOptions::named("box").draggable());
        let log = Log::default();
        record(&mut game, node, &log);
        game.tick(0.0).unwrap();

        game.handle_pointer(PointerInput::down(190.0, 190.0)).unwrap();
        game.handle_pointer(PointerInput::moved(240.0, 260.0)).unwrap();
        game.handle_pointer(PointerInput::moved(250.0, 270.0)).unwrap();
        let n = game.node(node).unwrap();
        assert!(n.dragging);
        assert_eq!(n.transform.position, Point::new(260.0, 280.0));
        assert_eq!(n.last_drag_offset, Point::new(10.0, 10.0));
        game.handle_pointer(PointerInput::up(250.0, 270.0)).unwrap();
        assert_eq!(
            kinds(&log),
            vec![
                EventType::TapDown,
                EventType::PointerDown,
                EventType::DragStart,
                EventType::Drag,
                EventType::PointerMove,
                EventType::Drag,
                EventType::PointerMove,
                EventType::DragEnd,
                EventType::PointerUp,
            ]
        );
    }

    #[test]
    fn handled_events_stop_at_the_top_node() {
        let (mut game, scene) = game_with_scene();
        let below = box_node(&mut game, scene, NodeOptions::named("below"));
        let above = box_node(&mut game, scene, NodeOptions::named("above").z_position(1.0));
        let log = Log::default();
        record(&mut game, below, &log);
        game.on(above, EventType::TapDown, |_, event| {
            event.handled = true;
            Ok(())
        })
        .unwrap();
        game.tick(0.0).unwrap();

        game.handle_pointer(PointerInput::down(200.0, 200.0)).unwrap();
        assert!(log.borrow().is_empty());
        assert!(game.node(above).unwrap().pressed);
        assert!(!game.node(below).unwrap().pressed);
    }

    #[test]
    fn unhandled_events_reach_every_hit_node_top_first() {
        let (mut game, scene) = game_with_scene();
        let below = box_node(&mut game, scene, NodeOptions::named("below"));
        let above = box_node(&mut game, scene, NodeOptions::named("above").z_position(1.0));
        let log = Log::default();
        record(&mut game, below, &log);
        record(&mut game, above, &log);
        game.tick(0.0).unwrap();

        game.handle_pointer(PointerInput::down(200.0, 200.0)).unwrap();
        let targets: Vec<NodeID> = log.borrow().iter().map(|e| e.0).collect();
        assert_eq!(targets, vec![above, above, below, below]);
    }

    #[test]
    fn hidden_and_non_interactive_nodes_are_skipped() {
        let (mut game, scene) = game_with_scene();
        let hidden = box_node(&mut game, scene, NodeOptions::named("hidden").hidden());
        let inert = rect(&mut game, NodeOptions::named("inert").at(200.0, 200.0), 100.0, 100.0);
        game.add_child(scene, inert).unwrap();
        let log = Log::default();
        record(&mut game, hidden, &log);
        record(&mut game, inert, &log);
        game.tick(0.0).unwrap();

        game.handle_pointer(PointerInput::down(200.0, 200.0)).unwrap();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn pointer_leaving_the_canvas_resets_presses() {
        let (mut game, scene) = game_with_scene();
        let node = box_node(&mut game, scene, NodeOptions::named("box").draggable());
        let log = Log::default();
        record(&mut game, node, &log);
        game.tick(0.0).unwrap();

        game.handle_pointer(PointerInput::down(200.0, 200.0)).unwrap();
        game.handle_pointer(PointerInput::moved(205.0, 200.0)).unwrap();
        log.borrow_mut().clear();
        game.handle_pointer(PointerInput::leave(205.0, 200.0)).unwrap();
        assert_eq!(
            kinds(&log),
            vec![EventType::TapLeave, EventType::DragEnd, EventType::PointerLeave]
        );
        let n = game.node(node).unwrap();
        assert!(!n.pressed && !n.dragging && !n.within_hit_area);
    }

    #[test]
    fn queued_input_is_applied_on_the_next_tick() {
        let (mut game, scene) = game_with_scene();
        let node = box_node(&mut game, scene, NodeOptions::named("box"));
        game.tick(0.0).unwrap();
        game.queue_pointer(PointerInput::down(200.0, 200.0));
        assert!(!game.node(node).unwrap().pressed);
        game.tick(16.0).unwrap();
        assert!(game.node(node).unwrap().pressed);
    }

    #[test]
    fn no_interaction_during_a_transition() {
        let (mut game, first) = game_with_scene();
        let node = box_node(&mut game, first, NodeOptions::named("box"));
        game.tick(0.0).unwrap();
        let second = game.create_scene("second", crate::structs::Color::BLACK);
        game.add_scene(second).unwrap();
        game.present_scene(second, Transition::slide(SlideDirection::Left, 500.0))
            .unwrap();
        let b = box_node(&mut game, second, NodeOptions::named("box"));
        let log = Log::default();
        record(&mut game, b, &log);
        game.tick(16.0).unwrap();
        game.handle_pointer(PointerInput::down(200.0, 200.0)).unwrap();
        assert!(log.borrow().is_empty());
        assert!(!game.node(node).unwrap().pressed);
    }
}
