use serde::{Deserialize, Serialize};

use super::NodeKind;
use crate::structs::Size;

/// Image drawn from a loaded asset.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Sprite {
    pub image_name: String,
    /// Falls back to the image's own dimensions once assets are loaded.
    pub size: Option<Size>,
}

impl Sprite {
    pub fn new(image_name: impl Into<String>) -> Self {
        Self {
            image_name: image_name.into(),
            size: None,
        }
    }
}

impl NodeKind for Sprite {
    fn type_name(&self) -> &'static str {
        "Sprite"
    }

    fn intrinsic_size(&self) -> Option<Size> {
        self.size
    }
}
