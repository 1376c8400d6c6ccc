use serde::{Deserialize, Serialize};

use super::NodeKind;
use crate::structs::Color;

/// Root of one screen of an activity.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub background_color: Color,
    #[serde(skip)]
    pub transitioning: bool,
    /// Number of times the scene has been presented.
    #[serde(skip)]
    pub presentations: u32,
}

impl Scene {
    pub fn new(background_color: Color) -> Self {
        Self {
            background_color,
            transitioning: false,
            presentations: 0,
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Color::WHITE)
    }
}

impl NodeKind for Scene {
    fn type_name(&self) -> &'static str {
        "Scene"
    }
}

/// Invisible container node.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Group;

impl NodeKind for Group {
    fn type_name(&self) -> &'static str {
        "Group"
    }
}
