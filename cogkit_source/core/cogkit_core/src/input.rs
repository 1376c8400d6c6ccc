use serde::{Deserialize, Serialize};

use crate::structs::Point;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
    /// The pointer left the canvas.
    Leave,
}

/// Raw pointer input in scene coordinates.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct PointerInput {
    pub kind: PointerKind,
    pub position: Point,
}

impl PointerInput {
    pub fn down(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Down, x, y)
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Move, x, y)
    }

    pub fn up(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Up, x, y)
    }

    pub fn leave(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Leave, x, y)
    }

    fn new(kind: PointerKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            position: Point::new(x, y),
        }
    }
}
