use std::fmt;

use egui::Rect;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::registry::ObjectId;

/// Every editable field of a data object. Each element type declares the
/// subset it owns (see [`crate::element::ElementType::fields`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    X,
    Y,
    Width,
    Height,
    ContainerId,
    StyleId,
    PrintIf,
    RemoveEmptyElement,
    Content,
    RichTextContent,
    Eval,
    Bold,
    Italic,
    Underline,
    HorizontalAlignment,
    VerticalAlignment,
    FontSize,
    TextColor,
    Source,
    ImageFilename,
    Color,
    Format,
    DisplayValue,
    DataSource,
    Header,
    Footer,
    Label,
    Border,
    BorderWidth,
    RotateDeg,
    Transparency,
    Name,
    ParameterType,
    Expression,
}

impl Field {
    pub const ALL: [Field; 34] = [
        Field::X,
        Field::Y,
        Field::Width,
        Field::Height,
        Field::ContainerId,
        Field::StyleId,
        Field::PrintIf,
        Field::RemoveEmptyElement,
        Field::Content,
        Field::RichTextContent,
        Field::Eval,
        Field::Bold,
        Field::Italic,
        Field::Underline,
        Field::HorizontalAlignment,
        Field::VerticalAlignment,
        Field::FontSize,
        Field::TextColor,
        Field::Source,
        Field::ImageFilename,
        Field::Color,
        Field::Format,
        Field::DisplayValue,
        Field::DataSource,
        Field::Header,
        Field::Footer,
        Field::Label,
        Field::Border,
        Field::BorderWidth,
        Field::RotateDeg,
        Field::Transparency,
        Field::Name,
        Field::ParameterType,
        Field::Expression,
    ];

    /// Key used in the serialized definition
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::X => "x",
            Field::Y => "y",
            Field::Width => "width",
            Field::Height => "height",
            Field::ContainerId => "containerId",
            Field::StyleId => "styleId",
            Field::PrintIf => "printIf",
            Field::RemoveEmptyElement => "removeEmptyElement",
            Field::Content => "content",
            Field::RichTextContent => "richTextContent",
            Field::Eval => "eval",
            Field::Bold => "bold",
            Field::Italic => "italic",
            Field::Underline => "underline",
            Field::HorizontalAlignment => "horizontalAlignment",
            Field::VerticalAlignment => "verticalAlignment",
            Field::FontSize => "fontSize",
            Field::TextColor => "textColor",
            Field::Source => "source",
            Field::ImageFilename => "imageFilename",
            Field::Color => "color",
            Field::Format => "format",
            Field::DisplayValue => "displayValue",
            Field::DataSource => "dataSource",
            Field::Header => "header",
            Field::Footer => "footer",
            Field::Label => "label",
            Field::Border => "border",
            Field::BorderWidth => "borderWidth",
            Field::RotateDeg => "rotateDeg",
            Field::Transparency => "transparency",
            Field::Name => "name",
            Field::ParameterType => "parameterType",
            Field::Expression => "expression",
        }
    }

    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.iter().copied().find(|f| f.as_str() == key)
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Field::ContainerId | Field::StyleId => FieldKind::Id,
            Field::RemoveEmptyElement
            | Field::Eval
            | Field::Bold
            | Field::Italic
            | Field::Underline
            | Field::DisplayValue
            | Field::Header
            | Field::Footer
            | Field::Border => FieldKind::Bool,
            _ => FieldKind::Text,
        }
    }

    pub fn is_geometry(&self) -> bool {
        matches!(self, Field::X | Field::Y | Field::Width | Field::Height)
    }

    /// Value of a geometry field in `rect`
    pub fn rect_value(&self, rect: Rect) -> Option<f32> {
        match self {
            Field::X => Some(rect.min.x),
            Field::Y => Some(rect.min.y),
            Field::Width => Some(rect.width()),
            Field::Height => Some(rect.height()),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage kind of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Bool,
    Id,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Text => f.write_str("text"),
            FieldKind::Bool => f.write_str("boolean"),
            FieldKind::Id => f.write_str("object id"),
        }
    }
}

/// How a value was edited. Used to coalesce consecutive edits and as a
/// refresh hint for property panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueKind {
    Text,
    Checkbox,
    Select,
    Internal,
    RichText,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
    Id(Option<ObjectId>),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Bool(_) => FieldKind::Bool,
            FieldValue::Id(_) => FieldKind::Id,
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_id(&self) -> Option<Option<ObjectId>> {
        match self {
            FieldValue::Id(id) => Some(*id),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Id(Some(id)) => Value::from(*id),
            FieldValue::Id(None) => Value::Null,
        }
    }

    /// Lenient conversion used when loading definitions: numbers are accepted
    /// for text fields and numeric strings for id fields.
    pub fn from_json(value: &Value, kind: FieldKind) -> Option<FieldValue> {
        match (kind, value) {
            (FieldKind::Text, Value::String(s)) => Some(FieldValue::Text(s.clone())),
            (FieldKind::Text, Value::Number(n)) => Some(FieldValue::Text(n.to_string())),
            (FieldKind::Text, Value::Null) => Some(FieldValue::Text(String::new())),
            (FieldKind::Bool, Value::Bool(b)) => Some(FieldValue::Bool(*b)),
            (FieldKind::Id, Value::Null) => Some(FieldValue::Id(None)),
            (FieldKind::Id, Value::Number(n)) => n.as_u64().map(|id| FieldValue::Id(Some(id as ObjectId))),
            (FieldKind::Id, Value::String(s)) if s.is_empty() => Some(FieldValue::Id(None)),
            (FieldKind::Id, Value::String(s)) => s.parse().ok().map(|id| FieldValue::Id(Some(id))),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<Option<ObjectId>> for FieldValue {
    fn from(value: Option<ObjectId>) -> Self {
        FieldValue::Id(value)
    }
}

/// Field-level validation message attached to an object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Parse the numeric shadow of a textual geometry value. Anything
/// unparsable counts as zero.
pub fn parse_number(text: &str) -> f32 {
    text.trim().parse::<f32>().ok().filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Format a numeric value the way it is shown in the property panel.
///
/// At most two decimals are kept, so a committed drag without grid snapping
/// lands on the nearest hundredth of a unit.
pub fn format_number(value: f32) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        let text = format!("{:.2}", value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_keys_roundtrip() {
        for field in Field::ALL {
            assert_eq!(Field::from_key(field.as_str()), Some(field));
        }
        assert_eq!(Field::from_key("unknownKey"), None);
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_number(400.0), "400");
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(parse_number(" 42 "), 42.0);
        assert_eq!(parse_number("abc"), 0.0);
    }

    #[test]
    fn lenient_json_conversion() {
        let v = FieldValue::from_json(&serde_json::json!(10), FieldKind::Text);
        assert_eq!(v, Some(FieldValue::text("10")));
        let v = FieldValue::from_json(&serde_json::json!("7"), FieldKind::Id);
        assert_eq!(v, Some(FieldValue::Id(Some(7))));
        assert_eq!(FieldValue::from_json(&serde_json::json!("x"), FieldKind::Bool), None);
    }
}
