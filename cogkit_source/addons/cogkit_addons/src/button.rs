use cogkit_core::{Color, Composite, Game, Label, NodeID, NodeOptions, Result, Shape, Size};
use serde::{Deserialize, Serialize};

/// Rounded rectangle with a centered label. The button node is interactive;
/// listen for `TapDown`/`TapUp` on it directly.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Button {
    pub text: String,
    pub size: Size,
    pub corner_radius: f32,
    pub background_color: Color,
    pub font_size: f32,
    pub font_color: Color,
    pub font_name: Option<String>,
    #[serde(skip)]
    internal: Vec<NodeID>,
}

impl Default for Button {
    fn default() -> Self {
        Self {
            text: String::new(),
            size: Size::new(200.0, 50.0),
            corner_radius: 9.0,
            background_color: Color::BLACK,
            font_size: 20.0,
            font_color: Color::WHITE,
            font_name: None,
            internal: Vec::new(),
        }
    }
}

impl Button {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

impl Composite for Button {
    fn composite_type(&self) -> &'static str {
        "Button"
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
            NodeOptions::named("__buttonBackground"),
            Shape::rounded_rectangle(self.size, self.corner_radius).fill(self.background_color),
        )?;
        let mut label = Label::new(self.text.clone())
            .font_size(self.font_size)
            .font_color(self.font_color);
        label.font_name = self.font_name.clone();
        crate::add_internal(
            game,
            id,
            &mut self.internal,
            NodeOptions::named("__buttonLabel").z_position(1.0),
            label,
        )?;
        Ok(())
    }

    impl_composite_any!();
}
