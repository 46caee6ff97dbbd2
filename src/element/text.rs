use super::fields::{Field, FieldValue};

/// Text formatting shared by text, table cell and watermark text elements
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub horizontal_alignment: String,
    pub vertical_alignment: String,
    pub font_size: String,
    pub text_color: String,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            bold: false,
            italic: false,
            underline: false,
            horizontal_alignment: "left".to_string(),
            vertical_alignment: "top".to_string(),
            font_size: "12".to_string(),
            text_color: "#000000".to_string(),
        }
    }
}

impl TextStyle {
    pub const FIELDS: [Field; 7] = [
        Field::Bold,
        Field::Italic,
        Field::Underline,
        Field::HorizontalAlignment,
        Field::VerticalAlignment,
        Field::FontSize,
        Field::TextColor,
    ];

    pub fn get(&self, field: Field) -> Option<FieldValue> {
        Some(match field {
            Field::Bold => FieldValue::Bool(self.bold),
            Field::Italic => FieldValue::Bool(self.italic),
            Field::Underline => FieldValue::Bool(self.underline),
            Field::HorizontalAlignment => FieldValue::text(&self.horizontal_alignment),
            Field::VerticalAlignment => FieldValue::text(&self.vertical_alignment),
            Field::FontSize => FieldValue::text(&self.font_size),
            Field::TextColor => FieldValue::text(&self.text_color),
            _ => return None,
        })
    }

    /// Returns false when `field` is not a text style field
    pub fn set(&mut self, field: Field, value: &FieldValue) -> bool {
        match (field, value) {
            (Field::Bold, FieldValue::Bool(b)) => self.bold = *b,
            (Field::Italic, FieldValue::Bool(b)) => self.italic = *b,
            (Field::Underline, FieldValue::Bool(b)) => self.underline = *b,
            (Field::HorizontalAlignment, FieldValue::Text(s)) => self.horizontal_alignment = s.clone(),
            (Field::VerticalAlignment, FieldValue::Text(s)) => self.vertical_alignment = s.clone(),
            (Field::FontSize, FieldValue::Text(s)) => self.font_size = s.clone(),
            (Field::TextColor, FieldValue::Text(s)) => self.text_color = s.clone(),
            _ => return false,
        }
        true
    }
}

/// Text content plus formatting
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyledText {
    pub content: String,
    pub rich_text_content: String,
    pub eval: bool,
    pub style: TextStyle,
}

impl StyledText {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn get(&self, field: Field) -> Option<FieldValue> {
        match field {
            Field::Content => Some(FieldValue::text(&self.content)),
            Field::RichTextContent => Some(FieldValue::text(&self.rich_text_content)),
            Field::Eval => Some(FieldValue::Bool(self.eval)),
            _ => self.style.get(field),
        }
    }

    pub fn set(&mut self, field: Field, value: &FieldValue) -> bool {
        match (field, value) {
            (Field::Content, FieldValue::Text(s)) => self.content = s.clone(),
            (Field::RichTextContent, FieldValue::Text(s)) => self.rich_text_content = s.clone(),
            (Field::Eval, FieldValue::Bool(b)) => self.eval = *b,
            _ => return self.style.set(field, value),
        }
        true
    }
}
