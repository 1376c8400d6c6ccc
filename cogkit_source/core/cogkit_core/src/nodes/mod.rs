pub mod composite;
pub mod label;
pub mod node;
pub mod scene;
pub mod shape;
pub mod sprite;

use enum_dispatch::enum_dispatch;

pub use composite::{Composite, CompositeSlot};
pub use label::{HorizontalAlignment, Label, TextLine};
pub use node::{Node, NodeOptions, OriginalAction, Transform};
pub use scene::{Group, Scene};
pub use shape::{Shape, ShapeKind};
pub use sprite::Sprite;

use crate::structs::Size;

/// Behavior that differs per node payload.
#[enum_dispatch]
pub trait NodeKind {
    fn type_name(&self) -> &'static str;

    /// Size implied by the payload. `None` keeps the size given at construction.
    fn intrinsic_size(&self) -> Option<Size> {
        None
    }
}

/// Tagged node payload.
/// enum_dispatch generates `impl NodeKind for NodeData` and a `From` impl per variant.
#[enum_dispatch(NodeKind)]
#[derive(Debug)]
pub enum NodeData {
    Group(Group),
    Scene(Scene),
    Shape(Shape),
    Label(Label),
    TextLine(TextLine),
    Sprite(Sprite),
    Composite(CompositeSlot),
}

impl NodeData {
    pub fn as_scene(&self) -> Option<&Scene> {
        match self {
            Self::Scene(scene) => Some(scene),
            _ => None,
        }
    }

    pub fn as_scene_mut(&mut self) -> Option<&mut Scene> {
        match self {
            Self::Scene(scene) => Some(scene),
            _ => None,
        }
    }

    pub fn as_shape_mut(&mut self) -> Option<&mut Shape> {
        match self {
            Self::Shape(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn as_label_mut(&mut self) -> Option<&mut Label> {
        match self {
            Self::Label(label) => Some(label),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::Color;

    #[test]
    fn payloads_convert_into_node_data() {
        let data: NodeData = Shape::circle(5.0).into();
        assert_eq!(data.type_name(), "Shape");
        assert_eq!(data.intrinsic_size(), Some(Size::square(10.0)));

        let data: NodeData = Scene::new(Color::BLACK).into();
        assert!(data.as_scene().is_some());
        assert_eq!(data.intrinsic_size(), None);
    }
}
