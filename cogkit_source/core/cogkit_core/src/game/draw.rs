use cogkit_ids::NodeID;

use super::Game;
use crate::nodes::{Node, NodeData, ShapeKind};
use crate::render::{DrawCommand, Renderer, Stroke};
use crate::structs::Size;

impl Game {
    /// Extracts this frame's commands and hands them to `renderer`.
    pub fn draw(&mut self, renderer: &mut dyn Renderer) {
        let mut commands = std::mem::take(&mut self.draw_commands);
        commands.clear();
        // the outgoing scene is painted first so the incoming one slides over it
        for scene in [self.outgoing_scene, self.current_scene] {
            if self.nodes.contains(scene) {
                for id in self.draw_order(scene) {
                    if let Some(node) = self.nodes.get(id) {
                        extract_node(node, &mut commands);
                    }
                }
            }
        }
        renderer.render(self.canvas_size(), &commands);
        self.draw_commands = commands;
    }

    /// Visible nodes under `root` (root first) in paint order: parents before
    /// children, siblings by ascending `z_position`, ties in insertion order.
    /// Hidden nodes take their sub-tree with them.
    pub(crate) fn draw_order(&self, root: NodeID) -> Vec<NodeID> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if node.hidden {
                continue;
            }
            out.push(id);
            let mut children: Vec<(NodeID, f32)> = node
                .children
                .iter()
                .filter_map(|c| self.nodes.get(*c).map(|n| (*c, n.z_position)))
                .collect();
            // sort_by is stable, so equal z keeps insertion order
            children.sort_by(|a, b| a.1.total_cmp(&b.1));
            stack.extend(children.into_iter().rev().map(|(c, _)| c));
        }
        out
    }
}

fn extract_node(node: &Node, out: &mut Vec<DrawCommand>) {
    let alpha = node.absolute_alpha;
    let center = node.absolute_center();
    let scale = node.absolute_scale;
    let rotation = node.absolute_z_rotation;

    match &node.data {
        NodeData::Scene(scene) => out.push(DrawCommand::Rect {
            node: node.id,
            center,
            size: node.scaled_size(),
            corner_radius: 0.0,
            rotation: 0.0,
            fill: Some(scene.background_color.with_alpha_multiplier(alpha)),
            stroke: None,
        }),
        NodeData::Shape(shape) => {
            let fill = shape.fill_color.map(|c| c.with_alpha_multiplier(alpha));
            let stroke = shape
                .stroke_color
                .filter(|_| shape.line_width > 0.0)
                .map(|c| Stroke {
                    color: c.with_alpha_multiplier(alpha),
                    width: shape.line_width * scale,
                });
            match &shape.kind {
                ShapeKind::Rectangle { size, corner_radius } => out.push(DrawCommand::Rect {
                    node: node.id,
                    center,
                    size: size.scaled(scale),
                    corner_radius: corner_radius * scale,
                    rotation,
                    fill,
                    stroke,
                }),
                ShapeKind::Circle { radius } => out.push(DrawCommand::Circle {
                    node: node.id,
                    center,
                    radius: radius * scale,
                    fill,
                    stroke,
                }),
                ShapeKind::Path { subpaths, .. } => {
                    let Some(stroke) = stroke else {
                        return;
                    };
                    let origin = node.absolute_origin();
                    let subpaths = subpaths
                        .iter()
                        .filter(|s| !s.is_empty())
                        .map(|s| s.iter().map(|p| origin + *p * scale).collect())
                        .collect();
                    out.push(DrawCommand::Path {
                        node: node.id,
                        subpaths,
                        stroke,
                    });
                }
            }
        }
        NodeData::Label(label) => {
            if label.text.is_empty() {
                return;
            }
            out.push(DrawCommand::Text {
                node: node.id,
                center,
                lines: label.lines(),
                font_size: label.font_size * scale,
                font_name: label.font_name.clone(),
                color: label.font_color.with_alpha_multiplier(alpha),
                rotation,
            });
        }
        NodeData::TextLine(line) => out.push(DrawCommand::Text {
            node: node.id,
            center,
            lines: vec![line.text.clone()],
            font_size: line.font_size * scale,
            font_name: line.font_name.clone(),
            color: line.font_color.with_alpha_multiplier(alpha),
            rotation,
        }),
        NodeData::Sprite(sprite) => {
            if node.size == Size::ZERO {
                log::warn!("sprite {} has no size; is {} loaded?", node.id, sprite.image_name);
                return;
            }
            out.push(DrawCommand::Image {
                node: node.id,
                center,
                size: node.scaled_size(),
                image_name: sprite.image_name.clone(),
                rotation,
                alpha,
            });
        }
        NodeData::Group(_) | NodeData::Composite(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::nodes::{Label, NodeOptions, Shape};
    use crate::render::CommandRecorder;
    use crate::structs::{Color, Point};

    #[test]
    fn scene_background_comes_first_then_children_by_z() {
        let (mut game, scene) = game_with_scene();
        let back = rect(&mut game, NodeOptions::named("back").at(50.0, 50.0).z_position(1.0), 10.0, 10.0);
        let front = rect(&mut game, NodeOptions::named("front").at(50.0, 50.0).z_position(5.0), 10.0, 10.0);
        let mid = rect(&mut game, NodeOptions::named("mid").at(50.0, 50.0).z_position(1.0), 10.0, 10.0);
        for n in [front, back, mid] {
            game.add_child(scene, n).unwrap();
        }
        game.tick(0.0).unwrap();

        let mut recorder = CommandRecorder::new();
        game.draw(&mut recorder);
        let order: Vec<NodeID> = recorder.commands().iter().map(DrawCommand::node).collect();
        assert_eq!(order, vec![scene, back, mid, front]);
        assert!(matches!(
            recorder.commands()[0],
            DrawCommand::Rect { center, fill: Some(Color::WHITE), .. } if center == Point::new(200.0, 400.0)
        ));
    }

    #[test]
    fn hidden_nodes_hide_their_subtree() {
        let (mut game, scene) = game_with_scene();
        let parent = rect(&mut game, NodeOptions::named("p").hidden(), 10.0, 10.0);
        let child = rect(&mut game, NodeOptions::named("c"), 10.0, 10.0);
        game.add_child(scene, parent).unwrap();
        game.add_child(parent, child).unwrap();
        game.tick(0.0).unwrap();
        assert_eq!(game.draw_order(scene), vec![scene]);
    }

    #[test]
    fn commands_carry_absolute_transforms_and_alpha() {
        let (mut game, scene) = game_with_scene();
        let group = rect(&mut game, NodeOptions::named("g").at(100.0, 100.0).scale(2.0).alpha(0.5), 10.0, 10.0);
        let dot = game
            .create_node(
                NodeOptions::named("dot").at(10.0, 0.0),
                Shape::circle(5.0).fill(Color::BLUE),
            )
            .unwrap();
        game.add_child(scene, group).unwrap();
        game.add_child(group, dot).unwrap();
        game.tick(0.0).unwrap();

        let mut recorder = CommandRecorder::new();
        game.draw(&mut recorder);
        let circle = recorder
            .commands()
            .iter()
            .find(|c| c.node() == dot)
            .unwrap();
        assert_eq!(
            *circle,
            DrawCommand::Circle {
                node: dot,
                center: Point::new(120.0, 100.0),
                radius: 10.0,
                fill: Some(Color::BLUE.with_alpha_multiplier(0.5)),
                stroke: None,
            }
        );
    }

    #[test]
    fn paths_are_mapped_from_the_top_left_corner() {
        let (mut game, scene) = game_with_scene();
        let mut shape = Shape::path(Size::new(100.0, 100.0));
        if let Some(subpaths) = shape.subpaths_mut() {
            subpaths.push(vec![Point::new(0.0, 0.0), Point::new(100.0, 50.0)]);
            subpaths.push(Vec::new());
        }
        let path = game
            .create_node(NodeOptions::named("path").at(200.0, 200.0), shape)
            .unwrap();
        game.add_child(scene, path).unwrap();
        game.tick(0.0).unwrap();

        let mut recorder = CommandRecorder::new();
        game.draw(&mut recorder);
        let DrawCommand::Path { subpaths, stroke, .. } = &recorder.commands()[1] else {
            panic!("expected a path command");
        };
        assert_eq!(
            *subpaths,
            vec![vec![Point::new(150.0, 150.0), Point::new(250.0, 200.0)]]
        );
        assert_eq!(stroke.color, Color::BLACK);
    }

    #[test]
    fn empty_labels_draw_nothing() {
        let (mut game, scene) = game_with_scene();
        let label = game
            .create_node(NodeOptions::named("l"), Label::new(""))
            .unwrap();
        game.add_child(scene, label).unwrap();
        game.tick(0.0).unwrap();
        let mut recorder = CommandRecorder::new();
        game.draw(&mut recorder);
        assert_eq!(recorder.commands().len(), 1);
        assert_eq!(recorder.frames_rendered, 1);
    }
}
