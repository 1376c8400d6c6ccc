use serde::{Deserialize, Serialize};

use crate::actions::Easing;
use crate::structs::{Point, Size};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SlideDirection {
    Left,
    Right,
    Up,
    Down,
}

impl SlideDirection {
    /// Where the incoming scene starts and the outgoing scene ends up.
    pub fn offscreen_offset(self, canvas: Size) -> Point {
        match self {
            // content moves left, so the new scene enters from the right
            Self::Left => Point::new(canvas.width, 0.0),
            Self::Right => Point::new(-canvas.width, 0.0),
            Self::Up => Point::new(0.0, canvas.height),
            Self::Down => Point::new(0.0, -canvas.height),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Transition {
    #[default]
    None,
    Slide {
        direction: SlideDirection,
        duration_ms: f64,
        #[serde(default)]
        easing: Easing,
    },
}

impl Transition {
    pub fn slide(direction: SlideDirection, duration_ms: f64) -> Self {
        Self::Slide {
            direction,
            duration_ms,
            easing: Easing::Linear,
        }
    }
}

/// Where a scene is in its presentation lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneState {
    Unpresented,
    /// Sliding in.
    Presenting,
    Active,
    /// Sliding out behind the incoming scene.
    TransitioningOut,
}
