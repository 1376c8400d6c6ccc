use serde::{Deserialize, Serialize};

use super::NodeKind;
use crate::error::{Error, Result};
use crate::structs::{Color, Point, Size};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ShapeKind {
    Rectangle {
        size: Size,
        #[serde(default)]
        corner_radius: f32,
    },
    Circle {
        radius: f32,
    },
    /// Polylines in the node's local space (origin top-left).
    Path {
        size: Size,
        #[serde(default)]
        subpaths: Vec<Vec<Point>>,
    },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub fill_color: Option<Color>,
    pub stroke_color: Option<Color>,
    pub line_width: f32,
}

impl Shape {
    pub fn rectangle(size: Size) -> Self {
        Self::with_kind(ShapeKind::Rectangle {
            size,
            corner_radius: 0.0,
        })
    }

    pub fn rounded_rectangle(size: Size, corner_radius: f32) -> Self {
        Self::with_kind(ShapeKind::Rectangle {
            size,
            corner_radius,
        })
    }

    pub fn circle(radius: f32) -> Self {
        Self::with_kind(ShapeKind::Circle { radius })
    }

    /// Empty path of the given drawing area, stroked in black.
    pub fn path(size: Size) -> Self {
        Self {
            kind: ShapeKind::Path {
                size,
                subpaths: Vec::new(),
            },
            fill_color: None,
            stroke_color: Some(Color::BLACK),
            line_width: 1.0,
        }
    }

    fn with_kind(kind: ShapeKind) -> Self {
        Self {
            kind,
            fill_color: Some(Color::RED),
            stroke_color: None,
            line_width: 0.0,
        }
    }

    pub fn fill(mut self, color: Color) -> Self {
        self.fill_color = Some(color);
        self
    }

    pub fn no_fill(mut self) -> Self {
        self.fill_color = None;
        self
    }

    pub fn stroke(mut self, color: Color, line_width: f32) -> Self {
        self.stroke_color = Some(color);
        self.line_width = line_width;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let bad = |what: &str, value: f32| {
            Err(Error::InvalidShape(format!("{what} must be non-negative, got {value}")))
        };
        match &self.kind {
            ShapeKind::Circle { radius } if !(*radius >= 0.0) => bad("radius", *radius),
            ShapeKind::Rectangle { size, .. } | ShapeKind::Path { size, .. }
                if !(size.width >= 0.0 && size.height >= 0.0) =>
            {
                bad("size", size.width.min(size.height))
            }
            ShapeKind::Rectangle { corner_radius, .. } if !(*corner_radius >= 0.0) => {
                bad("corner radius", *corner_radius)
            }
            _ if !(self.line_width >= 0.0) => bad("line width", self.line_width),
            _ => Ok(()),
        }
    }

    pub fn subpaths(&self) -> Option<&Vec<Vec<Point>>> {
        match &self.kind {
            ShapeKind::Path { subpaths, .. } => Some(subpaths),
            _ => None,
        }
    }

    pub fn subpaths_mut(&mut self) -> Option<&mut Vec<Vec<Point>>> {
        match &mut self.kind {
            ShapeKind::Path { subpaths, .. } => Some(subpaths),
            _ => None,
        }
    }
}

impl NodeKind for Shape {
    fn type_name(&self) -> &'static str {
        "Shape"
    }

    fn intrinsic_size(&self) -> Option<Size> {
        Some(match &self.kind {
            ShapeKind::Rectangle { size, .. } | ShapeKind::Path { size, .. } => *size,
            ShapeKind::Circle { radius } => Size::square(radius * 2.0),
        })
    }
}
