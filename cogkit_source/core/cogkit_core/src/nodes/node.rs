use cogkit_ids::{NodeID, RunID};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::NodeData;
use crate::actions::{Action, RunningAction};
use crate::events::ListenerRecord;
use crate::layout::Layout;
use crate::structs::{Point, Size};

/// A regular action as it was declared, plus the run currently playing it.
#[derive(Clone, Debug)]
pub struct OriginalAction {
    pub run: RunID,
    pub action: Action,
    pub key: Option<String>,
}

/// The part of a node that actions animate.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Point,
    pub scale: f32,
    pub alpha: f32,
    /// Radians, counter-clockwise.
    pub z_rotation: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            scale: 1.0,
            alpha: 1.0,
            z_rotation: 0.0,
        }
    }
}

/// Construction options shared by every node type.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeOptions {
    pub name: Option<String>,
    pub position: Point,
    pub scale: f32,
    pub alpha: f32,
    pub z_rotation: f32,
    pub z_position: f32,
    /// Explicit size; nodes whose payload implies a size ignore this.
    pub size: Option<Size>,
    pub is_user_interaction_enabled: bool,
    pub draggable: bool,
    pub hidden: bool,
    pub layout: Layout,
}

impl Default for NodeOptions {
    fn default() -> Self {
        Self {
            name: None,
            position: Point::ZERO,
            scale: 1.0,
            alpha: 1.0,
            z_rotation: 0.0,
            z_position: 0.0,
            size: None,
            is_user_interaction_enabled: false,
            draggable: false,
            hidden: false,
            layout: Layout::default(),
        }
    }
}

impl NodeOptions {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.position = Point::new(x, y);
        self
    }

    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn z_rotation(mut self, radians: f32) -> Self {
        self.z_rotation = radians;
        self
    }

    pub fn z_position(mut self, z: f32) -> Self {
        self.z_position = z;
        self
    }

    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.size = Some(Size::new(width, height));
        self
    }

    pub fn interactive(mut self) -> Self {
        self.is_user_interaction_enabled = true;
        self
    }

    pub fn draggable(mut self) -> Self {
        self.is_user_interaction_enabled = true;
        self.draggable = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }
}

#[derive(Debug)]
pub struct Node {
    pub id: NodeID,
    pub uuid: Uuid,
    pub name: Option<String>,

    pub transform: Transform,
    pub z_position: f32,
    pub size: Size,

    pub absolute_position: Point,
    pub absolute_scale: f32,
    pub absolute_alpha: f32,
    /// Change in absolute alpha since the previous update.
    pub absolute_alpha_change: f32,
    /// Own rotation plus every ancestor's.
    pub absolute_z_rotation: f32,

    /// Nil for roots.
    pub parent: NodeID,
    pub children: Vec<NodeID>,

    pub is_user_interaction_enabled: bool,
    pub draggable: bool,
    pub hidden: bool,
    pub pressed: bool,
    pub within_hit_area: bool,
    pub pressed_and_within_hit_area: bool,
    pub dragging: bool,
    /// Absolute position minus pointer position at press time.
    pub press_offset: Point,
    pub last_drag_offset: Point,

    pub layout: Layout,
    /// Per axis (vertical, horizontal): an unresolvable constraint count was already reported.
    pub(crate) layout_warned: [bool; 2],

    pub actions: Vec<RunningAction>,
    /// Live non-transition runs as declared, replayed when the scene is presented again.
    pub original_actions: Vec<OriginalAction>,
    pub listeners: Vec<ListenerRecord>,

    pub needs_initialization: bool,
    pub data: NodeData,
}

impl Node {
    pub fn new(id: NodeID, options: NodeOptions, data: NodeData) -> Self {
        Self {
            id,
            uuid: cogkit_ids::new_uuid(),
            name: options.name,
            transform: Transform {
                position: options.position,
                scale: options.scale,
                alpha: options.alpha,
                z_rotation: options.z_rotation,
            },
            z_position: options.z_position,
            size: options.size.unwrap_or_default(),
            absolute_position: Point::ZERO,
            absolute_scale: 1.0,
            absolute_alpha: options.alpha,
            absolute_alpha_change: 0.0,
            absolute_z_rotation: 0.0,
            parent: NodeID::nil(),
            children: Vec::new(),
            is_user_interaction_enabled: options.is_user_interaction_enabled,
            draggable: options.draggable,
            hidden: options.hidden,
            pressed: false,
            within_hit_area: false,
            pressed_and_within_hit_area: false,
            dragging: false,
            press_offset: Point::ZERO,
            last_drag_offset: Point::ZERO,
            layout: options.layout,
            layout_warned: [false; 2],
            actions: Vec::new(),
            original_actions: Vec::new(),
            listeners: Vec::new(),
            needs_initialization: true,
            data,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[inline]
    pub fn is_scene(&self) -> bool {
        matches!(self.data, NodeData::Scene(_))
    }

    #[inline]
    pub fn has_parent(&self) -> bool {
        !self.parent.is_nil()
    }

    /// Size on screen after scaling.
    pub fn scaled_size(&self) -> Size {
        self.size.scaled(self.absolute_scale)
    }

    /// Absolute top-left corner. Scenes are anchored at their corner, every
    /// other node at its center.
    pub fn absolute_origin(&self) -> Point {
        if self.is_scene() {
            return self.absolute_position;
        }
        let size = self.scaled_size();
        self.absolute_position - Point::new(size.width / 2.0, size.height / 2.0)
    }

    pub fn absolute_center(&self) -> Point {
        if !self.is_scene() {
            return self.absolute_position;
        }
        let size = self.scaled_size();
        self.absolute_position + Point::new(size.width / 2.0, size.height / 2.0)
    }

    /// Pointer hit test in scene coordinates, honoring cumulative rotation.
    pub fn contains_point(&self, point: Point) -> bool {
        let center = self.absolute_center();
        let local = point.rotated_about(center, -self.absolute_z_rotation);
        let size = self.scaled_size();
        (local.x - center.x).abs() <= size.width / 2.0
            && (local.y - center.y).abs() <= size.height / 2.0
    }

    /// Converts a scene point into this node's local space: origin at the
    /// top-left corner, unscaled units.
    pub fn to_local(&self, point: Point) -> Point {
        let unrotated = point.rotated_about(self.absolute_center(), -self.absolute_z_rotation);
        let origin = self.absolute_origin();
        let scale = if self.absolute_scale == 0.0 {
            1.0
        } else {
            self.absolute_scale
        };
        (unrotated - origin) / scale
    }

    /// Resets pointer bookkeeping, e.g. after the pointer leaves the canvas.
    pub fn clear_pointer_state(&mut self) {
        self.pressed = false;
        self.within_hit_area = false;
        self.pressed_and_within_hit_area = false;
        self.dragging = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::Group;

    fn node_at(x: f32, y: f32, w: f32, h: f32) -> Node {
        let mut node = Node::new(
            NodeID::from_parts(1, 0),
            NodeOptions::default().size(w, h),
            Group.into(),
        );
        node.absolute_position = Point::new(x, y);
        node
    }

    #[test]
    fn defaults_match_construction_options() {
        let options = NodeOptions::default();
        assert_eq!(options.position, Point::ZERO);
        assert_eq!(options.scale, 1.0);
        assert_eq!(options.alpha, 1.0);
        assert_eq!(options.z_rotation, 0.0);
        assert!(!options.is_user_interaction_enabled);
        assert!(!options.draggable);
        assert!(!options.hidden);
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: NodeOptions =
            serde_json::from_str(r#"{"name":"dot","isUserInteractionEnabled":true}"#).unwrap();
        assert_eq!(options.name.as_deref(), Some("dot"));
        assert!(options.is_user_interaction_enabled);
        assert_eq!(options.scale, 1.0);
    }

    #[test]
    fn hit_test_is_centered_on_absolute_position() {
        let node = node_at(100.0, 100.0, 40.0, 20.0);
        assert!(node.contains_point(Point::new(119.0, 109.0)));
        assert!(!node.contains_point(Point::new(121.0, 100.0)));
        assert!(!node.contains_point(Point::new(100.0, 111.0)));
    }

    #[test]
    fn hit_test_follows_rotation() {
        let mut node = node_at(0.0, 0.0, 40.0, 10.0);
        node.absolute_z_rotation = std::f32::consts::FRAC_PI_2;
        assert!(node.contains_point(Point::new(0.0, 18.0)));
        assert!(!node.contains_point(Point::new(18.0, 0.0)));
    }

    #[test]
    fn local_points_start_at_top_left_and_are_unscaled() {
        let mut node = node_at(100.0, 100.0, 50.0, 50.0);
        node.absolute_scale = 2.0;
        assert_eq!(node.to_local(Point::new(50.0, 50.0)), Point::ZERO);
        assert_eq!(node.to_local(Point::new(100.0, 100.0)), Point::new(25.0, 25.0));
    }
}
