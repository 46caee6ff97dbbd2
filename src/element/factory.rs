//! Builders for the serialized form of new elements.
//!
//! Every builder allocates the element id first and then the ids of the
//! objects it owns (linked container, bands, cells), so the element id is
//! always the lowest id of its subtree.

use egui::Rect;
use serde_json::Value;

use super::common::DEFAULT_BAND_HEIGHT;
use super::{BandRole, ElementData, ElementType, format_number};
use crate::registry::{IdGenerator, ObjectId};

fn with_rect(mut data: ElementData, rect: Rect) -> ElementData {
    let fields = &mut data.fields;
    fields.insert("x".into(), Value::from(format_number(rect.min.x)));
    fields.insert("y".into(), Value::from(format_number(rect.min.y)));
    fields.insert("width".into(), Value::from(format_number(rect.width())));
    fields.insert("height".into(), Value::from(format_number(rect.height())));
    data
}

/// Plain element without owned objects
pub fn create_element(
    ids: &mut IdGenerator,
    element_type: ElementType,
    container_id: ObjectId,
    rect: Rect,
) -> ElementData {
    let mut data = with_rect(ElementData::new(ids.new_id(), element_type), rect);
    data.set_container_id(container_id);
    data
}

pub fn create_text(ids: &mut IdGenerator, container_id: ObjectId, rect: Rect, content: &str) -> ElementData {
    create_element(ids, ElementType::Text, container_id, rect).with_field("content", content)
}

pub fn create_image(ids: &mut IdGenerator, container_id: ObjectId, rect: Rect, source: &str) -> ElementData {
    create_element(ids, ElementType::Image, container_id, rect).with_field("source", source)
}

pub fn create_line(ids: &mut IdGenerator, container_id: ObjectId, rect: Rect) -> ElementData {
    create_element(ids, ElementType::Line, container_id, rect)
}

pub fn create_bar_code(ids: &mut IdGenerator, container_id: ObjectId, rect: Rect, content: &str) -> ElementData {
    create_element(ids, ElementType::BarCode, container_id, rect).with_field("content", content)
}

pub fn create_page_break(ids: &mut IdGenerator, container_id: ObjectId, y: f32) -> ElementData {
    let mut data = ElementData::new(ids.new_id(), ElementType::PageBreak)
        .with_field("y", format_number(y));
    data.set_container_id(container_id);
    data
}

pub fn create_watermark_text(ids: &mut IdGenerator, page_container_id: ObjectId, rect: Rect, content: &str) -> ElementData {
    create_element(ids, ElementType::WatermarkText, page_container_id, rect).with_field("content", content)
}

pub fn create_watermark_image(ids: &mut IdGenerator, page_container_id: ObjectId, rect: Rect, source: &str) -> ElementData {
    create_element(ids, ElementType::WatermarkImage, page_container_id, rect).with_field("source", source)
}

/// Frame with its own (empty) interior container
pub fn create_frame(ids: &mut IdGenerator, container_id: ObjectId, rect: Rect) -> ElementData {
    let mut data = create_element(ids, ElementType::Frame, container_id, rect);
    data.linked_container_id = Some(ids.new_id());
    data
}

fn create_band(ids: &mut IdGenerator, band_type: ElementType, role: BandRole, height: f32) -> ElementData {
    let mut band = ElementData::new(ids.new_id(), band_type).with_field("height", format_number(height));
    band.band_role = Some(role);
    band.linked_container_id = Some(ids.new_id());
    band
}

/// Section with header, content and footer bands. Only the content band is
/// enabled initially and takes the requested height.
pub fn create_section(ids: &mut IdGenerator, container_id: ObjectId, rect: Rect) -> ElementData {
    let mut data = create_element(ids, ElementType::Section, container_id, rect)
        .with_field("header", false)
        .with_field("footer", false);
    for role in [BandRole::Header, BandRole::Content, BandRole::Footer] {
        let height = if role == BandRole::Content {
            rect.height().max(DEFAULT_BAND_HEIGHT)
        } else {
            DEFAULT_BAND_HEIGHT
        };
        data.bands.push(create_band(ids, ElementType::SectionBand, role, height));
    }
    data
}

/// Table with a header and a content row of `columns` equally wide cells;
/// the footer row exists but is disabled.
pub fn create_table(ids: &mut IdGenerator, container_id: ObjectId, rect: Rect, columns: usize) -> ElementData {
    let columns = columns.max(1);
    let mut data = create_element(ids, ElementType::Table, container_id, rect)
        .with_field("header", true)
        .with_field("footer", false);
    let column_width = (rect.width() / columns as f32).floor();
    for role in [BandRole::Header, BandRole::Content, BandRole::Footer] {
        let mut band = create_band(ids, ElementType::TableBand, role, DEFAULT_BAND_HEIGHT);
        for _ in 0..columns {
            band.cells.push(
                ElementData::new(ids.new_id(), ElementType::TableText)
                    .with_field("width", format_number(column_width)),
            );
        }
        data.bands.push(band);
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    #[test]
    fn owned_ids_follow_the_element_id() {
        let mut ids = IdGenerator::new();
        ids.reseed(10);
        let table = create_table(&mut ids, 1, Rect::from_min_size(pos2(0.0, 0.0), vec2(300.0, 60.0)), 3);
        assert_eq!(table.id, 11);
        assert_eq!(table.bands.len(), 3);
        assert!(table.bands.iter().all(|b| b.id > table.id));
        assert_eq!(table.max_id(), ids.peek() - 1);
    }
}
