use cogkit_core::{
    Color, Composite, EventType, Game, Label, NodeID, NodeOptions, Result, Shape, Size,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const LOCALE_PICKER_RESULT: &str = "LocalePickerResult";

/// Vertical list of locales. Tapping one raises `LocalePickerResult` with
/// `{ locale }` on the picker and hides it until [`LocalePicker::show`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LocalePicker {
    pub locales: Vec<String>,
    pub item_size: Size,
    pub item_spacing: f32,
    pub corner_radius: f32,
    pub background_color: Color,
    pub font_size: f32,
    pub font_color: Color,
    #[serde(skip)]
    internal: Vec<NodeID>,
}

impl Default for LocalePicker {
    fn default() -> Self {
        Self {
            locales: Vec::new(),
            item_size: Size::new(200.0, 50.0),
            item_spacing: 10.0,
            corner_radius: 9.0,
            background_color: Color::LIGHT_GRAY,
            font_size: 20.0,
            font_color: Color::BLACK,
            internal: Vec::new(),
        }
    }
}

impl LocalePicker {
    pub fn new<S: Into<String>>(locales: impl IntoIterator<Item = S>) -> Self {
        Self {
            locales: locales.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    fn total_height(&self) -> f32 {
        let n = self.locales.len() as f32;
        (n * self.item_size.height + (n - 1.0) * self.item_spacing).max(0.0)
    }

    fn item_y(&self, index: usize) -> f32 {
        -self.total_height() / 2.0
            + index as f32 * (self.item_size.height + self.item_spacing)
            + self.item_size.height / 2.0
    }

    pub fn show(game: &mut Game, id: NodeID) -> Result<()> {
        game.set_hidden(id, false)
    }
}

impl Composite for LocalePicker {
    fn composite_type(&self) -> &'static str {
        "LocalePicker"
    }

    fn size(&self) -> Size {
        Size::new(self.item_size.width, self.total_height())
    }

    fn initialize(&mut self, game: &mut Game, id: NodeID) -> Result<()> {
        crate::destroy_internal(game, &mut self.internal)?;
        if self.locales.is_empty() {
            log::warn!("LocalePicker {id:?} has no locales to show");
        }

        for (i, locale) in self.locales.iter().enumerate() {
            let item_y = self.item_y(i);
            let item = crate::add_internal(
                game,
                id,
                &mut self.internal,
                NodeOptions::named(format!("__localePickerItem{i}"))
                    .at(0.0, item_y)
                    .interactive(),
                Shape::rounded_rectangle(self.item_size, self.corner_radius)
                    .fill(self.background_color),
            )?;
            let label = game.create_node(
                NodeOptions::named(format!("__localePickerLabel{i}")).z_position(1.0),
                Label::new(locale.clone())
                    .font_size(self.font_size)
                    .font_color(self.font_color),
            )?;
            game.add_child(item, label)?;

            let locale = locale.clone();
            game.on(item, EventType::TapUp, move |game, _| {
                game.emit_composite_event(id, LOCALE_PICKER_RESULT, json!({ "locale": locale }))?;
                game.set_hidden(id, true)
            })?;
        }
        Ok(())
    }

    impl_composite_any!();
}
