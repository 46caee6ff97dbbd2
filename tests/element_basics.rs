use egui::{Rect, pos2, vec2};
use report_designer::command::CommandGroup;
use report_designer::container::ContainerKind;
use report_designer::document::{Document, DocumentProperties};
use report_designer::element::{ElementData, ElementSnapshot, ElementType, Field, FieldValue, ValueKind, factory};
use report_designer::error::DesignerError;
use report_designer::registry::{IdGenerator, ObjectId};
use report_designer::state::{EditorContext, EditorSettings};

fn test_properties() -> DocumentProperties {
    DocumentProperties {
        page_width: 440.0,
        page_height: 640.0,
        margin_left: 20.0,
        margin_top: 20.0,
        margin_right: 20.0,
        margin_bottom: 20.0,
        header: true,
        header_size: 50.0,
        footer: true,
        footer_size: 50.0,
    }
}

fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
    Rect::from_min_size(pos2(x, y), vec2(w, h))
}

fn create_test_context() -> EditorContext {
    EditorContext::new(test_properties(), EditorSettings::default())
}

fn add(context: &mut EditorContext, data: ElementData) -> ObjectId {
    let id = data.id;
    assert!(context.add_element(data).unwrap());
    id
}

fn add_new(context: &mut EditorContext, build: impl FnOnce(&mut IdGenerator) -> ElementData) -> ObjectId {
    let data = build(context.ids_mut());
    add(context, data)
}

#[test]
fn test_page_band_geometry() {
    let document = Document::new(test_properties());
    let page = document.page_containers();
    assert_eq!(document.container_rect(page.header).unwrap(), rect(20.0, 20.0, 400.0, 50.0));
    assert_eq!(document.container_rect(page.content).unwrap(), rect(20.0, 70.0, 400.0, 500.0));
    assert_eq!(document.container_rect(page.footer).unwrap(), rect(20.0, 570.0, 400.0, 50.0));
    assert_eq!(document.container_rect(page.page).unwrap(), rect(0.0, 0.0, 440.0, 640.0));
    assert!(document.is_inside(page.content, pos2(30.0, 100.0)).unwrap());
    assert!(!document.is_inside(page.content, pos2(30.0, 60.0)).unwrap());
}

#[test]
fn test_allow_lists() {
    assert!(ContainerKind::PageContent.is_element_allowed(ElementType::PageBreak));
    assert!(!ContainerKind::PageHeader.is_element_allowed(ElementType::Table));
    assert!(!ContainerKind::PageFooter.is_element_allowed(ElementType::PageBreak));
    assert!(!ContainerKind::Frame.is_element_allowed(ElementType::Section));
    assert!(ContainerKind::Frame.is_element_allowed(ElementType::Table));
    assert!(!ContainerKind::TableBand.is_element_allowed(ElementType::Text));
    assert!(ContainerKind::Page.is_element_allowed(ElementType::WatermarkText));
    assert!(!ContainerKind::PageContent.is_element_allowed(ElementType::WatermarkImage));
}

#[test]
fn test_disallowed_drop_is_noop() {
    let mut context = create_test_context();
    let header = context.document().page_containers().header;
    let table = factory::create_table(context.ids_mut(), header, rect(0.0, 0.0, 200.0, 40.0), 2);
    assert!(!context.add_element(table).unwrap());
    assert!(context.history().is_empty());
    assert!(context.document().container(header).unwrap().children().is_empty());
}

#[test]
fn test_setup_clamps_new_elements() {
    let mut context = create_test_context();
    let content = context.document().page_containers().content;
    let id = add_new(&mut context, |ids| factory::create_image(ids, content, rect(350.0, 490.0, 100.0, 40.0), "logo.png"));
    assert_eq!(context.document().element(id).unwrap().rect(), rect(300.0, 460.0, 100.0, 40.0));

    // larger than the container: position first, then size
    let id = add_new(&mut context, |ids| factory::create_line(ids, content, rect(50.0, 0.0, 600.0, 1.0)));
    assert_eq!(context.document().element(id).unwrap().rect(), rect(0.0, 0.0, 400.0, 1.0));
}

#[test]
fn test_watermarks_are_not_clamped() {
    let mut context = create_test_context();
    let page = context.document().page_containers().page;
    let id = add_new(&mut context, |ids| factory::create_watermark_text(ids, page, rect(400.0, 600.0, 200.0, 80.0), "DRAFT"));
    assert_eq!(context.document().element(id).unwrap().rect(), rect(400.0, 600.0, 200.0, 80.0));
}

#[test]
fn test_page_break_spans_container_width() {
    let mut context = create_test_context();
    let content = context.document().page_containers().content;
    let id = add_new(&mut context, |ids| factory::create_page_break(ids, content, 120.0));
    let element = context.document().element(id).unwrap();
    assert_eq!(element.rect(), rect(0.0, 120.0, 400.0, 1.0));
    assert!(element.get_value(Field::X).is_err());
}

#[test]
fn test_table_bands_and_cells_layout() {
    let mut context = create_test_context();
    let content = context.document().page_containers().content;
    let table = factory::create_table(context.ids_mut(), content, rect(10.0, 10.0, 301.0, 0.0), 3);
    let header_band = table.bands[0].id;
    let content_band = table.bands[1].id;
    let cells: Vec<ObjectId> = table.bands[1].cells.iter().map(|c| c.id).collect();
    let id = add(&mut context, table);
    let document = context.document();

    // header and content enabled, footer hidden
    assert_eq!(document.element(id).unwrap().height(), 40.0);
    assert_eq!(document.element(header_band).unwrap().rect(), rect(0.0, 0.0, 301.0, 20.0));
    assert_eq!(document.element(content_band).unwrap().rect(), rect(0.0, 20.0, 301.0, 20.0));

    let widths: Vec<f32> = cells.iter().map(|c| document.element(*c).unwrap().width()).collect();
    assert_eq!(widths, vec![100.0, 100.0, 101.0]);
    assert_eq!(document.element(cells[2]).unwrap().x(), 200.0);
    assert_eq!(document.absolute_rect(cells[1]).unwrap(), rect(130.0, 100.0, 100.0, 20.0));
}

#[test]
fn test_table_resize_relayouts_cells() {
    let mut context = create_test_context();
    let content = context.document().page_containers().content;
    let table = factory::create_table(context.ids_mut(), content, rect(0.0, 0.0, 200.0, 0.0), 2);
    let last_cell = table.bands[1].cells[1].id;
    let id = add(&mut context, table);

    context.set_value(id, Field::Width, "300", ValueKind::Text).unwrap();
    assert_eq!(context.document().element(last_cell).unwrap().width(), 200.0);
    context.undo().unwrap();
    assert_eq!(context.document().element(last_cell).unwrap().width(), 100.0);
}

#[test]
fn test_section_footer_toggle() {
    let mut context = create_test_context();
    let content = context.document().page_containers().content;
    let section = factory::create_section(context.ids_mut(), content, rect(0.0, 0.0, 400.0, 60.0));
    let footer_container = section.bands[2].linked_container_id.unwrap();
    let id = add(&mut context, section);

    assert_eq!(context.document().element(id).unwrap().height(), 60.0);
    assert!(!context.document().is_container_visible(footer_container));

    context.set_value(id, Field::Footer, true, ValueKind::Checkbox).unwrap();
    assert_eq!(context.document().element(id).unwrap().height(), 80.0);
    assert!(context.document().is_container_visible(footer_container));
    assert_eq!(context.document().container_offset(footer_container).unwrap(), pos2(20.0, 130.0));
}

#[test]
fn test_nesting_levels() {
    let mut context = create_test_context();
    let content = context.document().page_containers().content;
    let section = factory::create_section(context.ids_mut(), content, rect(0.0, 0.0, 400.0, 200.0));
    let band_container = section.bands[1].linked_container_id.unwrap();
    add(&mut context, section);
    let frame = factory::create_frame(context.ids_mut(), band_container, rect(0.0, 0.0, 200.0, 100.0));
    let interior = frame.linked_container_id.unwrap();
    add(&mut context, frame);

    let document = context.document();
    assert_eq!(document.container(content).unwrap().level, 1);
    assert_eq!(document.container(band_container).unwrap().level, 2);
    assert_eq!(document.container(interior).unwrap().level, 3);
}

#[test]
fn test_frame_border_reduces_content_size() {
    let mut context = create_test_context();
    let content = context.document().page_containers().content;
    let frame = factory::create_frame(context.ids_mut(), content, rect(0.0, 0.0, 200.0, 100.0))
        .with_field("border", true)
        .with_field("borderWidth", "2");
    let interior = frame.linked_container_id.unwrap();
    add(&mut context, frame);
    assert_eq!(context.document().container_content_size(interior).unwrap(), vec2(196.0, 96.0));
}

#[test]
fn test_update_position_and_size_rechecks_hosted_elements() {
    let mut context = create_test_context();
    let content = context.document().page_containers().content;
    let frame = factory::create_frame(context.ids_mut(), content, rect(0.0, 0.0, 200.0, 100.0));
    let (frame_id, interior) = (frame.id, frame.linked_container_id.unwrap());
    add(&mut context, frame);
    let text = factory::create_text(context.ids_mut(), interior, rect(120.0, 10.0, 60.0, 20.0), "x");
    let text_id = add(&mut context, text);

    let document = context.document();
    let mut group = CommandGroup::new("shrink");
    document
        .update_position_and_size(frame_id, rect(0.0, 0.0, 150.0, 100.0), vec2(400.0, 500.0), &mut group)
        .unwrap();
    // frame width plus the text's x
    assert_eq!(group.len(), 2);

    context.execute(group.into()).unwrap();
    assert_eq!(context.document().element(text_id).unwrap().rect(), rect(90.0, 10.0, 60.0, 20.0));
}

#[test]
fn test_unknown_field_is_rejected() {
    let mut context = create_test_context();
    let content = context.document().page_containers().content;
    let id = add_new(&mut context, |ids| factory::create_line(ids, content, rect(0.0, 0.0, 100.0, 1.0)));
    let err = context
        .set_value(id, Field::Content, FieldValue::text("x"), ValueKind::Text)
        .unwrap_err();
    assert!(matches!(
        err,
        report_designer::command::CommandError::Designer(DesignerError::UnknownField { .. })
    ));
    assert_eq!(context.history().len(), 1);
}

#[test]
fn test_snapshot_contains_hosted_elements() {
    let mut context = create_test_context();
    let content = context.document().page_containers().content;
    let frame = factory::create_frame(context.ids_mut(), content, rect(0.0, 0.0, 200.0, 100.0));
    let (frame_id, interior) = (frame.id, frame.linked_container_id.unwrap());
    add(&mut context, frame);
    let text_id = add_new(&mut context, |ids| factory::create_text(ids, interior, rect(0.0, 0.0, 50.0, 20.0), "x"));

    let snapshot: ElementSnapshot = context.document().snapshot(frame_id).unwrap();
    assert_eq!(snapshot.id(), frame_id);
    assert_eq!(snapshot.descendants.len(), 1);
    assert_eq!(snapshot.descendants[0].id, text_id);
}
