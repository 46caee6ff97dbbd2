use serde::{Deserialize, Serialize};

use crate::element::{Field, FieldError, FieldValue, TextStyle};
use crate::error::{DesignerError, DesignerResult};
use crate::registry::ObjectId;

/// Named text style elements can refer to by `styleId`
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub id: ObjectId,
    pub name: String,
    pub text: TextStyle,
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleData {
    pub id: ObjectId,
    pub name: String,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub horizontal_alignment: Option<String>,
    #[serde(default)]
    pub vertical_alignment: Option<String>,
    #[serde(default)]
    pub font_size: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
}

impl Style {
    pub fn new(id: ObjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            text: TextStyle::default(),
            errors: Vec::new(),
        }
    }

    pub fn get_value(&self, field: Field) -> DesignerResult<FieldValue> {
        match field {
            Field::Name => Ok(FieldValue::text(&self.name)),
            _ => self.text.get(field).ok_or(DesignerError::FieldTypeMismatch {
                field,
                expected: field.kind(),
            }),
        }
    }

    pub fn set_value(&mut self, field: Field, value: &FieldValue) -> DesignerResult<bool> {
        if matches!(self.get_value(field), Ok(ref current) if current == value) {
            return Ok(false);
        }
        let applied = match (field, value) {
            (Field::Name, FieldValue::Text(name)) => {
                self.name = name.clone();
                true
            }
            _ => self.text.set(field, value),
        };
        if applied {
            Ok(true)
        } else {
            Err(DesignerError::FieldTypeMismatch {
                field,
                expected: field.kind(),
            })
        }
    }

    pub fn to_data(&self) -> StyleData {
        StyleData {
            id: self.id,
            name: self.name.clone(),
            bold: self.text.bold,
            italic: self.text.italic,
            underline: self.text.underline,
            horizontal_alignment: Some(self.text.horizontal_alignment.clone()),
            vertical_alignment: Some(self.text.vertical_alignment.clone()),
            font_size: Some(self.text.font_size.clone()),
            text_color: Some(self.text.text_color.clone()),
        }
    }

    pub fn from_data(data: &StyleData) -> Self {
        let mut style = Style::new(data.id, data.name.clone());
        let defaults = TextStyle::default();
        style.text = TextStyle {
            bold: data.bold,
            italic: data.italic,
            underline: data.underline,
            horizontal_alignment: data
                .horizontal_alignment
                .clone()
                .unwrap_or(defaults.horizontal_alignment),
            vertical_alignment: data
                .vertical_alignment
                .clone()
                .unwrap_or(defaults.vertical_alignment),
            font_size: data.font_size.clone().unwrap_or(defaults.font_size),
            text_color: data.text_color.clone().unwrap_or(defaults.text_color),
        };
        style
    }
}

/// Report parameter referenced from expressions (`printIf`, text content)
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub id: ObjectId,
    pub name: String,
    pub parameter_type: String,
    pub expression: String,
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterData {
    pub id: ObjectId,
    pub name: String,
    #[serde(default = "default_parameter_type")]
    pub parameter_type: String,
    #[serde(default)]
    pub expression: String,
}

fn default_parameter_type() -> String {
    "string".to_string()
}

impl Parameter {
    pub fn new(id: ObjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            parameter_type: default_parameter_type(),
            expression: String::new(),
            errors: Vec::new(),
        }
    }

    pub fn get_value(&self, field: Field) -> DesignerResult<FieldValue> {
        match field {
            Field::Name => Ok(FieldValue::text(&self.name)),
            Field::ParameterType => Ok(FieldValue::text(&self.parameter_type)),
            Field::Expression => Ok(FieldValue::text(&self.expression)),
            _ => Err(DesignerError::FieldTypeMismatch {
                field,
                expected: field.kind(),
            }),
        }
    }

    pub fn set_value(&mut self, field: Field, value: &FieldValue) -> DesignerResult<bool> {
        let target = match field {
            Field::Name => &mut self.name,
            Field::ParameterType => &mut self.parameter_type,
            Field::Expression => &mut self.expression,
            _ => {
                return Err(DesignerError::FieldTypeMismatch {
                    field,
                    expected: field.kind(),
                });
            }
        };
        let FieldValue::Text(text) = value else {
            return Err(DesignerError::FieldTypeMismatch {
                field,
                expected: field.kind(),
            });
        };
        if target == text {
            return Ok(false);
        }
        *target = text.clone();
        Ok(true)
    }

    pub fn to_data(&self) -> ParameterData {
        ParameterData {
            id: self.id,
            name: self.name.clone(),
            parameter_type: self.parameter_type.clone(),
            expression: self.expression.clone(),
        }
    }

    pub fn from_data(data: &ParameterData) -> Self {
        Self {
            id: data.id,
            name: data.name.clone(),
            parameter_type: data.parameter_type.clone(),
            expression: data.expression.clone(),
            errors: Vec::new(),
        }
    }
}
