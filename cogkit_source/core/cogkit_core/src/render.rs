//! Backend-neutral draw commands extracted from the scene graph each frame.

use cogkit_ids::NodeID;

use crate::structs::{Color, Point, Size};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

/// One primitive in absolute canvas coordinates. Colors already carry the
/// node's absolute alpha.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Rect {
        node: NodeID,
        center: Point,
        size: Size,
        corner_radius: f32,
        rotation: f32,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    Circle {
        node: NodeID,
        center: Point,
        radius: f32,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    Path {
        node: NodeID,
        subpaths: Vec<Vec<Point>>,
        stroke: Stroke,
    },
    Text {
        node: NodeID,
        center: Point,
        lines: Vec<String>,
        font_size: f32,
        font_name: Option<String>,
        color: Color,
        rotation: f32,
    },
    Image {
        node: NodeID,
        center: Point,
        size: Size,
        image_name: String,
        rotation: f32,
        alpha: f32,
    },
}

impl DrawCommand {
    pub fn node(&self) -> NodeID {
        match self {
            Self::Rect { node, .. }
            | Self::Circle { node, .. }
            | Self::Path { node, .. }
            | Self::Text { node, .. }
            | Self::Image { node, .. } => *node,
        }
    }
}

/// Drawing surface. Receives one frame's commands in paint order.
pub trait Renderer {
    fn render(&mut self, canvas: Size, commands: &[DrawCommand]);
}

/// Headless renderer that keeps the last frame.
#[derive(Debug, Default)]
pub struct CommandRecorder {
    pub frames_rendered: usize,
    commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn drain(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Renderer for CommandRecorder {
    fn render(&mut self, _canvas: Size, commands: &[DrawCommand]) {
        self.frames_rendered += 1;
        self.commands.clear();
        self.commands.extend_from_slice(commands);
    }
}
