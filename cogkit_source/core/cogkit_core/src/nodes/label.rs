use serde::{Deserialize, Serialize};

use super::NodeKind;
use crate::structs::{Color, Size};

/// Average glyph advance as a fraction of the font size. Text is measured
/// without a font backend, so label sizes are estimates.
const GLYPH_WIDTH_EM: f32 = 0.6;
const LINE_HEIGHT_EM: f32 = 1.2;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum HorizontalAlignment {
    #[default]
    Center,
    Left,
    Right,
}

/// Multi-line text wrapped to `preferred_max_layout_width` when set.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Label {
    pub text: String,
    pub font_size: f32,
    pub font_color: Color,
    pub font_name: Option<String>,
    pub horizontal_alignment: HorizontalAlignment,
    pub preferred_max_layout_width: Option<f32>,
}

impl Default for Label {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: 16.0,
            font_color: Color::BLACK,
            font_name: None,
            horizontal_alignment: HorizontalAlignment::Center,
            preferred_max_layout_width: None,
        }
    }
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn font_color(mut self, color: Color) -> Self {
        self.font_color = color;
        self
    }

    /// Lines after greedy word wrapping.
    pub fn lines(&self) -> Vec<String> {
        let Some(max_width) = self.preferred_max_layout_width else {
            return self.text.lines().map(str::to_string).collect();
        };
        let glyph = self.font_size * GLYPH_WIDTH_EM;
        let max_chars = ((max_width / glyph).floor() as usize).max(1);
        let mut lines = Vec::new();
        for paragraph in self.text.lines() {
            let mut line = String::new();
            for word in paragraph.split_whitespace() {
                let needed = if line.is_empty() {
                    word.chars().count()
                } else {
                    line.chars().count() + 1 + word.chars().count()
                };
                if needed > max_chars && !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                if !line.is_empty() {
                    line.push(' ');
                }
                line.push_str(word);
            }
            lines.push(line);
        }
        lines
    }
}

impl NodeKind for Label {
    fn type_name(&self) -> &'static str {
        "Label"
    }

    fn intrinsic_size(&self) -> Option<Size> {
        let lines = self.lines();
        let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as f32;
        let width = match self.preferred_max_layout_width {
            Some(max) => max,
            None => widest * self.font_size * GLYPH_WIDTH_EM,
        };
        Some(Size::new(
            width,
            lines.len().max(1) as f32 * self.font_size * LINE_HEIGHT_EM,
        ))
    }
}

/// Single line of text with a fixed width.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TextLine {
    pub text: String,
    pub font_size: f32,
    pub font_color: Color,
    pub font_name: Option<String>,
    pub width: f32,
}

impl Default for TextLine {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: 16.0,
            font_color: Color::BLACK,
            font_name: None,
            width: 0.0,
        }
    }
}

impl NodeKind for TextLine {
    fn type_name(&self) -> &'static str {
        "TextLine"
    }

    fn intrinsic_size(&self) -> Option<Size> {
        Some(Size::new(self.width, self.font_size * LINE_HEIGHT_EM))
    }
}
