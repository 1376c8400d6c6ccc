use cogkit_core::{
    Color, Composite, Error, EventType, Game, ListenerOptions, NodeID, NodeOptions, Point, Result,
    Shape, Size,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const DRAW_PAD_STROKE_START: &str = "DrawPadStrokeStart";
pub const DRAW_PAD_STROKE_MOVE: &str = "DrawPadStrokeMove";
pub const DRAW_PAD_STROKE_END: &str = "DrawPadStrokeEnd";

const LISTENER_KEY: &str = "__drawPad";

/// Free-hand drawing surface.
///
/// Stroke events carry `{ position: {x, y}, interpolated }` in pad space
/// (origin top-left). When the pointer leaves the pad mid-stroke the stroke
/// ends on the crossed border and the point is marked interpolated.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct DrawPad {
    pub size: Size,
    pub line_color: Color,
    pub line_width: f32,
    pub background_color: Color,
    pub border_color: Color,
    pub border_width: f32,
    #[serde(skip)]
    strokes: Vec<Vec<Point>>,
    #[serde(skip)]
    drawing: bool,
    #[serde(skip)]
    path: NodeID,
    #[serde(skip)]
    internal: Vec<NodeID>,
}

impl Default for DrawPad {
    fn default() -> Self {
        Self {
            size: Size::new(300.0, 300.0),
            line_color: Color::RED,
            line_width: 1.0,
            background_color: Color::TRANSPARENT,
            border_color: Color::BLACK,
            border_width: 1.0,
            strokes: Vec::new(),
            drawing: false,
            path: NodeID::nil(),
            internal: Vec::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct StrokeEvent {
    name: &'static str,
    position: Point,
    interpolated: bool,
}

impl DrawPad {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Completed and in-progress strokes, in pad space.
    pub fn strokes(&self) -> &[Vec<Point>] {
        &self.strokes
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Erases every stroke on the pad `id`.
    pub fn clear(game: &mut Game, id: NodeID) -> Result<()> {
        game.with_composite_mut::<Self, _>(id, |pad, game| {
            pad.strokes.clear();
            pad.drawing = false;
            pad.path_points(game, id)?.clear();
            Ok(())
        })
    }

    fn contains(&self, p: Point) -> bool {
        (0.0..=self.size.width).contains(&p.x) && (0.0..=self.size.height).contains(&p.y)
    }

    fn path_points<'a>(&self, game: &'a mut Game, id: NodeID) -> Result<&'a mut Vec<Vec<Point>>> {
        game.nodes
            .get_mut(self.path)
            .and_then(|n| n.data.as_shape_mut())
            .and_then(Shape::subpaths_mut)
            .ok_or(Error::MissingDrawPath(id))
    }

    fn handle(game: &mut Game, id: NodeID, kind: EventType, p: Point) -> Result<()> {
        let emitted = game.with_composite_mut::<Self, _>(id, |pad, game| pad.on_pointer(game, id, kind, p))?;
        for e in emitted {
            game.emit_composite_event(
                id,
                e.name,
                json!({ "position": e.position, "interpolated": e.interpolated }),
            )?;
        }
        Ok(())
    }

    fn on_pointer(
        &mut self,
        game: &mut Game,
        id: NodeID,
        kind: EventType,
        p: Point,
    ) -> Result<Vec<StrokeEvent>> {
        let event = |name, position, interpolated| StrokeEvent {
            name,
            position,
            interpolated,
        };
        match kind {
            EventType::TapDown if self.contains(p) => {
                self.drawing = true;
                self.strokes.push(vec![p]);
                self.path_points(game, id)?.push(vec![p]);
                Ok(vec![event(DRAW_PAD_STROKE_START, p, false)])
            }
            EventType::PointerMove if self.drawing && self.contains(p) => {
                self.push_point(game, id, p)?;
                Ok(vec![event(DRAW_PAD_STROKE_MOVE, p, false)])
            }
            EventType::TapLeave if self.drawing => {
                self.drawing = false;
                let last = self.strokes.last().and_then(|s| s.last()).copied();
                let (end, interpolated) = match last {
                    Some(last) if !self.contains(p) => (border_crossing(last, p, self.size), true),
                    _ => (p, false),
                };
                self.push_point(game, id, end)?;
                Ok(vec![
                    event(DRAW_PAD_STROKE_MOVE, end, interpolated),
                    event(DRAW_PAD_STROKE_END, end, interpolated),
                ])
            }
            EventType::TapUpAny if self.drawing => {
                self.drawing = false;
                Ok(vec![event(DRAW_PAD_STROKE_END, p, false)])
            }
            _ => Ok(Vec::new()),
        }
    }

    fn push_point(&mut self, game: &mut Game, id: NodeID, p: Point) -> Result<()> {
        if let Some(stroke) = self.strokes.last_mut() {
            stroke.push(p);
        }
        if let Some(subpath) = self.path_points(game, id)?.last_mut() {
            subpath.push(p);
        }
        Ok(())
    }
}

/// Where the segment from `inside` to `outside` leaves the `size` rectangle
/// (origin top-left). Vertical segments are solved first, then the left and
/// right edges, then top and bottom.
pub fn border_crossing(inside: Point, outside: Point, size: Size) -> Point {
    let (w, h) = (size.width, size.height);
    if outside.x == inside.x {
        return Point::new(inside.x, outside.y.clamp(0.0, h));
    }
    let slope = (outside.y - inside.y) / (outside.x - inside.x);
    let y_at = |x: f32| inside.y + slope * (x - inside.x);

    for x in [0.0, w] {
        let crosses = if x == 0.0 { outside.x < 0.0 } else { outside.x > w };
        let y = y_at(x);
        if crosses && (0.0..=h).contains(&y) {
            return Point::new(x, y);
        }
    }
    for y in [0.0, h] {
        let crosses = if y == 0.0 { outside.y < 0.0 } else { outside.y > h };
        if crosses && slope != 0.0 {
            let x = inside.x + (y - inside.y) / slope;
            if (0.0..=w).contains(&x) {
                return Point::new(x, y);
            }
        }
    }
    Point::new(outside.x.clamp(0.0, w), outside.y.clamp(0.0, h))
}

impl Composite for DrawPad {
    fn composite_type(&self) -> &'static str {
        "DrawPad"
    }

    fn size(&self) -> Size {
        self.size
    }

    fn initialize(&mut self, game: &mut Game, id: NodeID) -> Result<()> {
        crate::destroy_internal(game, &mut self.internal)?;
        game.node_mut(id)?.is_user_interaction_enabled = true;

        crate::add_internal(
            game,
            id,
            &mut self.internal,
            NodeOptions::named("__drawPadBackground"),
            Shape::rectangle(self.size)
                .fill(self.background_color)
                .stroke(self.border_color, self.border_width),
        )?;
        let mut path = Shape::path(self.size).stroke(self.line_color, self.line_width);
        if let Some(subpaths) = path.subpaths_mut() {
            subpaths.clone_from(&self.strokes);
        }
        self.path = crate::add_internal(
            game,
            id,
            &mut self.internal,
            NodeOptions::named("__drawPadPath").z_position(1.0),
            path,
        )?;

        game.remove_event_listeners_by_key(id, LISTENER_KEY)?;
        for kind in [
            EventType::TapDown,
            EventType::PointerMove,
            EventType::TapLeave,
            EventType::TapUpAny,
        ] {
            game.add_event_listener(
                id,
                kind,
                |game, event| Self::handle(game, event.target, event.kind.clone(), event.point),
                ListenerOptions::keyed(LISTENER_KEY),
            )?;
        }
        Ok(())
    }

    impl_composite_any!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::*;
    use cogkit_core::PointerInput;

    /// 200x200 pad centered at (200, 300), so its top-left is (100, 200).
    fn pad(game: &mut Game, scene: NodeID) -> NodeID {
        let id = game
            .create_composite(
                NodeOptions::named("pad").at(200.0, 300.0),
                DrawPad::new(Size::new(200.0, 200.0)),
            )
            .unwrap();
        game.add_child(scene, id).unwrap();
        game.tick(0.0).unwrap();
        id
    }

    fn position(v: &serde_json::Value) -> (f64, f64, bool) {
        (
            v["position"]["x"].as_f64().unwrap(),
            v["position"]["y"].as_f64().unwrap(),
            v["interpolated"].as_bool().unwrap(),
        )
    }

    #[test]
    fn leaving_the_pad_ends_the_stroke_on_the_crossed_border() {
        let (mut game, scene) = game_with_scene();
        let id = pad(&mut game, scene);
        let starts = record(&mut game, id, DRAW_PAD_STROKE_START);
        let moves = record(&mut game, id, DRAW_PAD_STROKE_MOVE);
        let ends = record(&mut game, id, DRAW_PAD_STROKE_END);

        game.handle_pointer(PointerInput::down(250.0, 300.0)).unwrap();
        game.handle_pointer(PointerInput::moved(350.0, 350.0)).unwrap();

        assert_eq!(position(&starts.borrow()[0]), (150.0, 100.0, false));
        assert_eq!(position(&moves.borrow()[0]), (200.0, 125.0, true));
        assert_eq!(position(&ends.borrow()[0]), (200.0, 125.0, true));

        let pad = game.composite::<DrawPad>(id).unwrap();
        assert!(!pad.is_drawing());
        assert_eq!(
            pad.strokes(),
            &[vec![Point::new(150.0, 100.0), Point::new(200.0, 125.0)]]
        );
    }

    #[test]
    fn strokes_inside_the_pad_end_on_release() {
        let (mut game, scene) = game_with_scene();
        let id = pad(&mut game, scene);
        let moves = record(&mut game, id, DRAW_PAD_STROKE_MOVE);
        let ends = record(&mut game, id, DRAW_PAD_STROKE_END);

        game.handle_pointer(PointerInput::down(110.0, 210.0)).unwrap();
        game.handle_pointer(PointerInput::moved(120.0, 220.0)).unwrap();
        game.handle_pointer(PointerInput::moved(130.0, 240.0)).unwrap();
        game.handle_pointer(PointerInput::up(130.0, 240.0)).unwrap();

        assert_eq!(moves.borrow().len(), 2);
        assert_eq!(position(&ends.borrow()[0]), (30.0, 40.0, false));
        let path = game.descendant(id, "__drawPadPath").unwrap();
        let subpaths = match &game.node(path).unwrap().data {
            cogkit_core::NodeData::Shape(shape) => shape.subpaths().cloned().unwrap(),
            _ => panic!("path node is not a shape"),
        };
        assert_eq!(subpaths[0].len(), 3);
    }

    #[test]
    fn presses_outside_the_pad_draw_nothing() {
        let (mut game, scene) = game_with_scene();
        let id = pad(&mut game, scene);
        let starts = record(&mut game, id, DRAW_PAD_STROKE_START);
        game.handle_pointer(PointerInput::down(20.0, 20.0)).unwrap();
        game.handle_pointer(PointerInput::moved(150.0, 250.0)).unwrap();
        assert!(starts.borrow().is_empty());
        assert!(game.composite::<DrawPad>(id).unwrap().strokes().is_empty());
    }

    #[test]
    fn clear_erases_strokes() {
        let (mut game, scene) = game_with_scene();
        let id = pad(&mut game, scene);
        game.handle_pointer(PointerInput::down(150.0, 250.0)).unwrap();
        game.handle_pointer(PointerInput::up(150.0, 250.0)).unwrap();
        DrawPad::clear(&mut game, id).unwrap();
        assert!(game.composite::<DrawPad>(id).unwrap().strokes().is_empty());
    }

    #[test]
    fn clearing_before_initialization_reports_the_missing_path() {
        let (mut game, _scene) = game_with_scene();
        let id = game
            .create_composite(NodeOptions::named("pad"), DrawPad::default())
            .unwrap();
        assert_eq!(DrawPad::clear(&mut game, id), Err(Error::MissingDrawPath(id)));
    }

    #[test]
    fn border_crossing_precedence() {
        let size = Size::new(100.0, 100.0);
        // straight down
        assert_eq!(
            border_crossing(Point::new(40.0, 50.0), Point::new(40.0, 130.0), size),
            Point::new(40.0, 100.0)
        );
        // out through the left edge
        assert_eq!(
            border_crossing(Point::new(20.0, 50.0), Point::new(-20.0, 70.0), size),
            Point::new(0.0, 60.0)
        );
        // through the top, since the left-edge hit would be off the pad
        assert_eq!(
            border_crossing(Point::new(10.0, 10.0), Point::new(-10.0, -50.0), size),
            Point::new(10.0 - 10.0 / 3.0, 0.0)
        );
    }
}
