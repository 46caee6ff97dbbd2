use std::fmt;

use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

mod common;
mod data;
pub mod factory;
mod fields;
mod text;

pub use common::{DEFAULT_MIN_HEIGHT, DEFAULT_MIN_WIDTH, HANDLE_SIZE};
pub(crate) use common::PAGE_BREAK_HEIGHT;
pub use data::{ElementData, ElementSnapshot};
pub use fields::{Field, FieldError, FieldKind, FieldValue, ValueKind, format_number, parse_number};
pub use text::{StyledText, TextStyle};

use crate::error::{DesignerError, DesignerResult};
use crate::geometry::DragKind;
use crate::registry::ObjectId;

/// Closed set of element types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementType {
    Text,
    Image,
    Line,
    BarCode,
    Table,
    Frame,
    Section,
    PageBreak,
    TableText,
    WatermarkText,
    WatermarkImage,
    SectionBand,
    TableBand,
}

const TEXT_FIELDS: &[Field] = &[
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
];
const IMAGE_FIELDS: &[Field] = &[
    Field::X,
    Field::Y,
    Field::Width,
    Field::Height,
    Field::ContainerId,
    Field::StyleId,
    Field::PrintIf,
    Field::RemoveEmptyElement,
    Field::Source,
    Field::ImageFilename,
];
const LINE_FIELDS: &[Field] = &[
    Field::X,
    Field::Y,
    Field::Width,
    Field::Height,
    Field::ContainerId,
    Field::PrintIf,
    Field::Color,
];
const BAR_CODE_FIELDS: &[Field] = &[
    Field::X,
    Field::Y,
    Field::Width,
    Field::Height,
    Field::ContainerId,
    Field::StyleId,
    Field::PrintIf,
    Field::RemoveEmptyElement,
    Field::Content,
    Field::Format,
    Field::DisplayValue,
];
const TABLE_FIELDS: &[Field] = &[
    Field::X,
    Field::Y,
    Field::Width,
    Field::ContainerId,
    Field::PrintIf,
    Field::RemoveEmptyElement,
    Field::DataSource,
    Field::Header,
    Field::Footer,
];
const FRAME_FIELDS: &[Field] = &[
    Field::X,
    Field::Y,
    Field::Width,
    Field::Height,
    Field::ContainerId,
    Field::PrintIf,
    Field::RemoveEmptyElement,
    Field::Label,
    Field::Border,
    Field::BorderWidth,
];
const SECTION_FIELDS: &[Field] = &[
    Field::X,
    Field::Y,
    Field::Width,
    Field::ContainerId,
    Field::PrintIf,
    Field::DataSource,
    Field::Header,
    Field::Footer,
];
const PAGE_BREAK_FIELDS: &[Field] = &[Field::Y, Field::ContainerId];
const TABLE_TEXT_FIELDS: &[Field] = &[
    Field::Width,
    Field::StyleId,
    Field::PrintIf,
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
];
const WATERMARK_TEXT_FIELDS: &[Field] = &[
    Field::X,
    Field::Y,
    Field::Width,
    Field::Height,
    Field::ContainerId,
    Field::Content,
    Field::RotateDeg,
    Field::Transparency,
    Field::Bold,
    Field::Italic,
    Field::Underline,
    Field::HorizontalAlignment,
    Field::VerticalAlignment,
    Field::FontSize,
    Field::TextColor,
];
const WATERMARK_IMAGE_FIELDS: &[Field] = &[
    Field::X,
    Field::Y,
    Field::Width,
    Field::Height,
    Field::ContainerId,
    Field::Source,
    Field::ImageFilename,
    Field::RotateDeg,
    Field::Transparency,
];
const BAND_FIELDS: &[Field] = &[Field::Height];

impl ElementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Text => "text",
            ElementType::Image => "image",
            ElementType::Line => "line",
            ElementType::BarCode => "barCode",
            ElementType::Table => "table",
            ElementType::Frame => "frame",
            ElementType::Section => "section",
            ElementType::PageBreak => "pageBreak",
            ElementType::TableText => "tableText",
            ElementType::WatermarkText => "watermarkText",
            ElementType::WatermarkImage => "watermarkImage",
            ElementType::SectionBand => "sectionBand",
            ElementType::TableBand => "tableBand",
        }
    }

    /// Field schema of this type
    pub fn fields(&self) -> &'static [Field] {
        match self {
            ElementType::Text => TEXT_FIELDS,
            ElementType::Image => IMAGE_FIELDS,
            ElementType::Line => LINE_FIELDS,
            ElementType::BarCode => BAR_CODE_FIELDS,
            ElementType::Table => TABLE_FIELDS,
            ElementType::Frame => FRAME_FIELDS,
            ElementType::Section => SECTION_FIELDS,
            ElementType::PageBreak => PAGE_BREAK_FIELDS,
            ElementType::TableText => TABLE_TEXT_FIELDS,
            ElementType::WatermarkText => WATERMARK_TEXT_FIELDS,
            ElementType::WatermarkImage => WATERMARK_IMAGE_FIELDS,
            ElementType::SectionBand | ElementType::TableBand => BAND_FIELDS,
        }
    }

    pub fn has_field(&self, field: Field) -> bool {
        self.fields().contains(&field)
    }

    pub fn is_watermark(&self) -> bool {
        matches!(self, ElementType::WatermarkText | ElementType::WatermarkImage)
    }

    pub fn is_band(&self) -> bool {
        matches!(self, ElementType::SectionBand | ElementType::TableBand)
    }

    /// Elements that must stay inside their container's content rectangle
    pub fn has_bounded_geometry(&self) -> bool {
        !(self.is_watermark() || self.is_band() || *self == ElementType::TableText)
    }

    /// Bands and table cells are positioned by their host and never dragged
    pub fn is_draggable(&self) -> bool {
        !(self.is_band() || *self == ElementType::TableText)
    }

    pub fn is_area_selectable(&self) -> bool {
        self.is_draggable()
    }

    pub fn drag_kinds(&self) -> &'static [DragKind] {
        const MOVE_ONLY: &[DragKind] = &[DragKind::Move];
        const HORIZONTAL: &[DragKind] = &[DragKind::Move, DragKind::E, DragKind::W];
        const NONE: &[DragKind] = &[];
        match self {
            ElementType::Section | ElementType::PageBreak => MOVE_ONLY,
            // Height follows the bands
            ElementType::Table => HORIZONTAL,
            t if t.is_draggable() => DragKind::ALL,
            _ => NONE,
        }
    }

    pub fn has_bands(&self) -> bool {
        matches!(self, ElementType::Table | ElementType::Section)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of a band inside its host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BandRole {
    Header,
    Content,
    Footer,
}

/// Header/content/footer bands of a table or section
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BandHost {
    pub data_source: String,
    pub header: bool,
    pub footer: bool,
    pub header_band: Option<ObjectId>,
    pub content_band: Option<ObjectId>,
    pub footer_band: Option<ObjectId>,
}

impl BandHost {
    pub fn band(&self, role: BandRole) -> Option<ObjectId> {
        match role {
            BandRole::Header => self.header_band,
            BandRole::Content => self.content_band,
            BandRole::Footer => self.footer_band,
        }
    }

    pub fn set_band(&mut self, role: BandRole, id: ObjectId) {
        match role {
            BandRole::Header => self.header_band = Some(id),
            BandRole::Content => self.content_band = Some(id),
            BandRole::Footer => self.footer_band = Some(id),
        }
    }

    pub fn is_enabled(&self, role: BandRole) -> bool {
        match role {
            BandRole::Header => self.header,
            BandRole::Content => true,
            BandRole::Footer => self.footer,
        }
    }

    /// All band ids in header, content, footer order
    pub fn bands(&self) -> Vec<ObjectId> {
        [self.header_band, self.content_band, self.footer_band]
            .into_iter()
            .flatten()
            .collect()
    }

    fn get(&self, field: Field) -> Option<FieldValue> {
        match field {
            Field::DataSource => Some(FieldValue::text(&self.data_source)),
            Field::Header => Some(FieldValue::Bool(self.header)),
            Field::Footer => Some(FieldValue::Bool(self.footer)),
            _ => None,
        }
    }

    fn set(&mut self, field: Field, value: &FieldValue) -> bool {
        match (field, value) {
            (Field::DataSource, FieldValue::Text(s)) => self.data_source = s.clone(),
            (Field::Header, FieldValue::Bool(b)) => self.header = *b,
            (Field::Footer, FieldValue::Bool(b)) => self.footer = *b,
            _ => return false,
        }
        true
    }
}

/// Band of a table or section; owns a linked container
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub host_id: ObjectId,
    pub role: BandRole,
}

/// Type specific payload of an element
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Text(StyledText),
    Image {
        source: String,
        image_filename: String,
    },
    Line {
        color: String,
    },
    BarCode {
        content: String,
        format: String,
        display_value: bool,
    },
    Table(BandHost),
    Frame {
        label: String,
        border: bool,
        border_width: String,
    },
    Section(BandHost),
    PageBreak,
    TableText(StyledText),
    WatermarkText {
        text: StyledText,
        rotate_deg: String,
        transparency: String,
    },
    WatermarkImage {
        source: String,
        image_filename: String,
        rotate_deg: String,
        transparency: String,
    },
    SectionBand(Band),
    TableBand(Band),
}

impl ElementKind {
    /// Default payload. Band payloads start without a host and are wired up
    /// by the document when the band is attached.
    pub fn default_for(element_type: ElementType) -> Self {
        match element_type {
            ElementType::Text => ElementKind::Text(StyledText::default()),
            ElementType::Image => ElementKind::Image {
                source: String::new(),
                image_filename: String::new(),
            },
            ElementType::Line => ElementKind::Line {
                color: "#000000".to_string(),
            },
            ElementType::BarCode => ElementKind::BarCode {
                content: String::new(),
                format: "CODE128".to_string(),
                display_value: true,
            },
            ElementType::Table => ElementKind::Table(BandHost {
                header: true,
                ..Default::default()
            }),
            ElementType::Frame => ElementKind::Frame {
                label: String::new(),
                border: false,
                border_width: "1".to_string(),
            },
            ElementType::Section => ElementKind::Section(BandHost::default()),
            ElementType::PageBreak => ElementKind::PageBreak,
            ElementType::TableText => ElementKind::TableText(StyledText::default()),
            ElementType::WatermarkText => ElementKind::WatermarkText {
                text: StyledText::default(),
                rotate_deg: "0".to_string(),
                transparency: "50".to_string(),
            },
            ElementType::WatermarkImage => ElementKind::WatermarkImage {
                source: String::new(),
                image_filename: String::new(),
                rotate_deg: "0".to_string(),
                transparency: "50".to_string(),
            },
            ElementType::SectionBand => ElementKind::SectionBand(Band {
                host_id: 0,
                role: BandRole::Content,
            }),
            ElementType::TableBand => ElementKind::TableBand(Band {
                host_id: 0,
                role: BandRole::Content,
            }),
        }
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            ElementKind::Text(_) => ElementType::Text,
            ElementKind::Image { .. } => ElementType::Image,
            ElementKind::Line { .. } => ElementType::Line,
            ElementKind::BarCode { .. } => ElementType::BarCode,
            ElementKind::Table(_) => ElementType::Table,
            ElementKind::Frame { .. } => ElementType::Frame,
            ElementKind::Section(_) => ElementType::Section,
            ElementKind::PageBreak => ElementType::PageBreak,
            ElementKind::TableText(_) => ElementType::TableText,
            ElementKind::WatermarkText { .. } => ElementType::WatermarkText,
            ElementKind::WatermarkImage { .. } => ElementType::WatermarkImage,
            ElementKind::SectionBand(_) => ElementType::SectionBand,
            ElementKind::TableBand(_) => ElementType::TableBand,
        }
    }

    pub fn band_host(&self) -> Option<&BandHost> {
        match self {
            ElementKind::Table(host) | ElementKind::Section(host) => Some(host),
            _ => None,
        }
    }

    pub fn band_host_mut(&mut self) -> Option<&mut BandHost> {
        match self {
            ElementKind::Table(host) | ElementKind::Section(host) => Some(host),
            _ => None,
        }
    }

    pub fn band(&self) -> Option<&Band> {
        match self {
            ElementKind::SectionBand(band) | ElementKind::TableBand(band) => Some(band),
            _ => None,
        }
    }

    pub fn band_mut(&mut self) -> Option<&mut Band> {
        match self {
            ElementKind::SectionBand(band) | ElementKind::TableBand(band) => Some(band),
            _ => None,
        }
    }

    fn get(&self, field: Field) -> Option<FieldValue> {
        match self {
            ElementKind::Text(text) | ElementKind::TableText(text) => text.get(field),
            ElementKind::Image {
                source,
                image_filename,
            } => match field {
                Field::Source => Some(FieldValue::text(source)),
                Field::ImageFilename => Some(FieldValue::text(image_filename)),
                _ => None,
            },
            ElementKind::Line { color } => match field {
                Field::Color => Some(FieldValue::text(color)),
                _ => None,
            },
            ElementKind::BarCode {
                content,
                format,
                display_value,
            } => match field {
                Field::Content => Some(FieldValue::text(content)),
                Field::Format => Some(FieldValue::text(format)),
                Field::DisplayValue => Some(FieldValue::Bool(*display_value)),
                _ => None,
            },
            ElementKind::Table(host) | ElementKind::Section(host) => host.get(field),
            ElementKind::Frame {
                label,
                border,
                border_width,
            } => match field {
                Field::Label => Some(FieldValue::text(label)),
                Field::Border => Some(FieldValue::Bool(*border)),
                Field::BorderWidth => Some(FieldValue::text(border_width)),
                _ => None,
            },
            ElementKind::WatermarkText {
                text,
                rotate_deg,
                transparency,
            } => match field {
                Field::RotateDeg => Some(FieldValue::text(rotate_deg)),
                Field::Transparency => Some(FieldValue::text(transparency)),
                _ => text.get(field),
            },
            ElementKind::WatermarkImage {
                source,
                image_filename,
                rotate_deg,
                transparency,
            } => match field {
                Field::Source => Some(FieldValue::text(source)),
                Field::ImageFilename => Some(FieldValue::text(image_filename)),
                Field::RotateDeg => Some(FieldValue::text(rotate_deg)),
                Field::Transparency => Some(FieldValue::text(transparency)),
                _ => None,
            },
            ElementKind::PageBreak | ElementKind::SectionBand(_) | ElementKind::TableBand(_) => None,
        }
    }

    fn set(&mut self, field: Field, value: &FieldValue) -> bool {
        fn text(target: &mut String, value: &FieldValue) -> bool {
            match value {
                FieldValue::Text(s) => {
                    *target = s.clone();
                    true
                }
                _ => false,
            }
        }

        match self {
            ElementKind::Text(styled) | ElementKind::TableText(styled) => styled.set(field, value),
            ElementKind::Image {
                source,
                image_filename,
            } => match field {
                Field::Source => text(source, value),
                Field::ImageFilename => text(image_filename, value),
                _ => false,
            },
            ElementKind::Line { color } => field == Field::Color && text(color, value),
            ElementKind::BarCode {
                content,
                format,
                display_value,
            } => match (field, value) {
                (Field::Content, _) => text(content, value),
                (Field::Format, _) => text(format, value),
                (Field::DisplayValue, FieldValue::Bool(b)) => {
                    *display_value = *b;
                    true
                }
                _ => false,
            },
            ElementKind::Table(host) | ElementKind::Section(host) => host.set(field, value),
            ElementKind::Frame {
                label,
                border,
                border_width,
            } => match (field, value) {
                (Field::Label, _) => text(label, value),
                (Field::Border, FieldValue::Bool(b)) => {
                    *border = *b;
                    true
                }
                (Field::BorderWidth, _) => text(border_width, value),
                _ => false,
            },
            ElementKind::WatermarkText {
                text: styled,
                rotate_deg,
                transparency,
            } => match field {
                Field::RotateDeg => text(rotate_deg, value),
                Field::Transparency => text(transparency, value),
                _ => styled.set(field, value),
            },
            ElementKind::WatermarkImage {
                source,
                image_filename,
                rotate_deg,
                transparency,
            } => match field {
                Field::Source => text(source, value),
                Field::ImageFilename => text(image_filename, value),
                Field::RotateDeg => text(rotate_deg, value),
                Field::Transparency => text(transparency, value),
                _ => false,
            },
            ElementKind::PageBreak | ElementKind::SectionBand(_) | ElementKind::TableBand(_) => false,
        }
    }
}

/// Editable textual geometry together with its resolved numeric shadow
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Geometry {
    pub x: String,
    pub y: String,
    pub width: String,
    pub height: String,
    pub x_val: f32,
    pub y_val: f32,
    pub width_val: f32,
    pub height_val: f32,
}

impl Geometry {
    pub fn from_rect(rect: Rect) -> Self {
        let mut geometry = Self::default();
        geometry.set(Field::X, rect.min.x);
        geometry.set(Field::Y, rect.min.y);
        geometry.set(Field::Width, rect.width());
        geometry.set(Field::Height, rect.height());
        geometry
    }

    pub fn rect(&self) -> Rect {
        Rect::from_min_size(
            Pos2::new(self.x_val, self.y_val),
            Vec2::new(self.width_val, self.height_val),
        )
    }

    fn text_mut(&mut self, field: Field) -> Option<(&mut String, &mut f32)> {
        match field {
            Field::X => Some((&mut self.x, &mut self.x_val)),
            Field::Y => Some((&mut self.y, &mut self.y_val)),
            Field::Width => Some((&mut self.width, &mut self.width_val)),
            Field::Height => Some((&mut self.height, &mut self.height_val)),
            _ => None,
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::X => Some(&self.x),
            Field::Y => Some(&self.y),
            Field::Width => Some(&self.width),
            Field::Height => Some(&self.height),
            _ => None,
        }
    }

    pub fn set_text(&mut self, field: Field, text: &str) -> bool {
        match self.text_mut(field) {
            Some((target, shadow)) => {
                *target = text.to_string();
                *shadow = parse_number(text);
                true
            }
            None => false,
        }
    }

    pub fn set(&mut self, field: Field, value: f32) -> bool {
        self.set_text(field, &format_number(value))
    }
}

/// A placed, typed node of the report
#[derive(Debug, Clone)]
pub struct DocElement {
    pub id: ObjectId,
    pub kind: ElementKind,
    geometry: Geometry,
    /// Container this element sits inside
    pub container_id: Option<ObjectId>,
    /// Container hosted by this element (frame interior, band interior)
    pub linked_container_id: Option<ObjectId>,
    pub style_id: Option<ObjectId>,
    pub print_if: String,
    pub remove_empty_element: bool,
    errors: Vec<FieldError>,
    selected: bool,
}

impl DocElement {
    pub fn new(id: ObjectId, element_type: ElementType) -> Self {
        Self {
            id,
            kind: ElementKind::default_for(element_type),
            geometry: Geometry::default(),
            container_id: None,
            linked_container_id: None,
            style_id: None,
            print_if: String::new(),
            remove_empty_element: false,
            errors: Vec::new(),
            selected: false,
        }
    }

    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Rectangle relative to the element's container
    pub fn rect(&self) -> Rect {
        self.geometry.rect()
    }

    pub fn x(&self) -> f32 {
        self.geometry.x_val
    }

    pub fn y(&self) -> f32 {
        self.geometry.y_val
    }

    pub fn width(&self) -> f32 {
        self.geometry.width_val
    }

    pub fn height(&self) -> f32 {
        self.geometry.height_val
    }

    /// Set a numeric geometry value directly, bypassing the schema. Used for
    /// layout of bands, cells and fixed page break geometry.
    pub(crate) fn set_geometry(&mut self, field: Field, value: f32) -> bool {
        if self.geometry.get(field).map(parse_number) == Some(value) {
            return false;
        }
        self.geometry.set(field, value)
    }

    pub(crate) fn set_rect(&mut self, rect: Rect) {
        self.set_geometry(Field::X, rect.min.x);
        self.set_geometry(Field::Y, rect.min.y);
        self.set_geometry(Field::Width, rect.width());
        self.set_geometry(Field::Height, rect.height());
    }

    pub fn get_value(&self, field: Field) -> DesignerResult<FieldValue> {
        let element_type = self.element_type();
        if !element_type.has_field(field) {
            return Err(DesignerError::UnknownField { field, element_type });
        }
        if let Some(text) = self.geometry.get(field) {
            return Ok(FieldValue::text(text));
        }
        let value = match field {
            Field::ContainerId => Some(FieldValue::Id(self.container_id)),
            Field::StyleId => Some(FieldValue::Id(self.style_id)),
            Field::PrintIf => Some(FieldValue::text(&self.print_if)),
            Field::RemoveEmptyElement => Some(FieldValue::Bool(self.remove_empty_element)),
            _ => self.kind.get(field),
        };
        value.ok_or(DesignerError::UnknownField { field, element_type })
    }

    /// Assign a field. Geometry text updates its numeric shadow. Returns
    /// whether the stored value changed.
    ///
    /// `containerId` only updates the reference here; re-attaching to the
    /// new container's child list is done by the document.
    pub fn set_value(&mut self, field: Field, value: &FieldValue) -> DesignerResult<bool> {
        let element_type = self.element_type();
        if !element_type.has_field(field) {
            return Err(DesignerError::UnknownField { field, element_type });
        }
        if value.kind() != field.kind() {
            return Err(DesignerError::FieldTypeMismatch {
                field,
                expected: field.kind(),
            });
        }
        if matches!(self.get_value(field), Ok(ref current) if current == value) {
            return Ok(false);
        }

        let applied = match (field, value) {
            (f, FieldValue::Text(text)) if f.is_geometry() => self.geometry.set_text(f, text),
            (Field::ContainerId, FieldValue::Id(id)) => {
                self.container_id = *id;
                true
            }
            (Field::StyleId, FieldValue::Id(id)) => {
                self.style_id = *id;
                true
            }
            (Field::PrintIf, FieldValue::Text(text)) => {
                self.print_if = text.clone();
                true
            }
            (Field::RemoveEmptyElement, FieldValue::Bool(b)) => {
                self.remove_empty_element = *b;
                true
            }
            _ => self.kind.set(field, value),
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

    /// Bulk-assign fields from a plain map. Unknown keys and values of the
    /// wrong shape are skipped.
    pub fn set_initial_data(&mut self, fields: &Map<String, Value>) {
        for (key, raw) in fields {
            let Some(field) = Field::from_key(key) else {
                log::debug!("Ignoring unknown key '{}' for element {}", key, self.id);
                continue;
            };
            let element_type = self.element_type();
            if !element_type.has_field(field) {
                continue;
            }
            match FieldValue::from_json(raw, field.kind()) {
                Some(value) => {
                    if let Err(err) = self.set_value(field, &value) {
                        log::warn!("Skipping field '{}' of element {}: {}", key, self.id, err);
                    }
                }
                None => log::warn!("Invalid value for '{}' of element {}: {}", key, self.id, raw),
            }
        }
    }

    /// All schema fields as a plain map
    pub fn field_data(&self) -> Map<String, Value> {
        let mut map = Map::new();
        for field in self.element_type().fields() {
            if let Ok(value) = self.get_value(*field) {
                map.insert(field.as_str().to_string(), value.to_json());
            }
        }
        map
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn set_errors(&mut self, errors: Vec<FieldError>) {
        self.errors = errors;
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn select(&mut self) {
        self.selected = true;
    }

    pub(crate) fn deselect(&mut self) {
        self.selected = false;
    }
}
