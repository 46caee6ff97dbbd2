use egui::{Rect, pos2, vec2};
use report_designer::command::{AddDeleteElement, Command, CommandError, CommandGroup, SetValue};
use report_designer::document::DocumentProperties;
use report_designer::element::{ElementSnapshot, Field, FieldValue, ValueKind, factory};
use report_designer::error::DesignerError;
use report_designer::event::{EditorEvent, EventLog};
use report_designer::registry::ObjectId;
use report_designer::state::{EditorContext, EditorSettings};

fn test_properties() -> DocumentProperties {
    DocumentProperties {
        page_width: 400.0,
        page_height: 600.0,
        margin_left: 0.0,
        margin_top: 0.0,
        margin_right: 0.0,
        margin_bottom: 0.0,
        header: false,
        header_size: 50.0,
        footer: false,
        footer_size: 50.0,
    }
}

// Helper to create a test context with an empty 400x600 content band
fn create_test_context() -> EditorContext {
    EditorContext::new(test_properties(), EditorSettings::default())
}

fn add_text(context: &mut EditorContext, x: f32, y: f32) -> ObjectId {
    let content = context.document().page_containers().content;
    let rect = Rect::from_min_size(pos2(x, y), vec2(100.0, 20.0));
    let text = factory::create_text(context.ids_mut(), content, rect, "text");
    let id = text.id;
    assert!(context.add_element(text).unwrap());
    id
}

fn width_of(context: &EditorContext, id: ObjectId) -> f32 {
    context.document().element(id).unwrap().width()
}

#[test]
fn test_set_value_undo_redo() {
    let mut context = create_test_context();
    let id = add_text(&mut context, 10.0, 10.0);

    context.set_value(id, Field::Width, "150", ValueKind::Text).unwrap();
    assert_eq!(width_of(&context, id), 150.0);

    assert!(context.undo().unwrap());
    assert_eq!(width_of(&context, id), 100.0);

    assert!(context.redo().unwrap());
    assert_eq!(width_of(&context, id), 150.0);
    assert!(!context.redo().unwrap());
}

#[test]
fn test_undo_at_start_of_history_is_noop() {
    let mut context = create_test_context();
    assert!(!context.can_undo());
    assert!(!context.undo().unwrap());
}

#[test]
fn test_consecutive_edits_coalesce() {
    let mut context = create_test_context();
    let id = add_text(&mut context, 10.0, 10.0);
    let before = context.history().len();

    context.set_value(id, Field::Width, "110", ValueKind::Text).unwrap();
    context.set_value(id, Field::Width, "120", ValueKind::Text).unwrap();
    context.set_value(id, Field::Width, "130", ValueKind::Text).unwrap();

    assert_eq!(context.history().len(), before + 1);
    match context.history().commands().last() {
        Some(Command::SetValue(cmd)) => {
            assert_eq!(cmd.old_value, FieldValue::text("100"));
            assert_eq!(cmd.new_value, FieldValue::text("130"));
        }
        other => panic!("unexpected history entry {:?}", other),
    }

    // one undo step for the whole edit
    context.undo().unwrap();
    assert_eq!(width_of(&context, id), 100.0);
}

#[test]
fn test_selection_change_separates_edits() {
    let mut context = create_test_context();
    let id = add_text(&mut context, 10.0, 10.0);
    let before = context.history().len();

    context.set_value(id, Field::Width, "110", ValueKind::Text).unwrap();
    context.select(id, false).unwrap();
    context.set_value(id, Field::Width, "120", ValueKind::Text).unwrap();

    assert_eq!(context.history().len(), before + 2);
}

#[test]
fn test_different_value_kind_separates_edits() {
    let mut context = create_test_context();
    let id = add_text(&mut context, 10.0, 10.0);
    let before = context.history().len();

    context.set_value(id, Field::Width, "110", ValueKind::Text).unwrap();
    context.set_value(id, Field::Width, "120", ValueKind::Internal).unwrap();
    context.set_value(id, Field::Height, "30", ValueKind::Internal).unwrap();

    assert_eq!(context.history().len(), before + 3);
}

#[test]
fn test_edit_after_undo_does_not_merge() {
    let mut context = create_test_context();
    let id = add_text(&mut context, 10.0, 10.0);

    context.set_value(id, Field::Width, "110", ValueKind::Text).unwrap();
    context.set_value(id, Field::Height, "40", ValueKind::Text).unwrap();
    context.undo().unwrap();
    context.set_value(id, Field::Width, "120", ValueKind::Text).unwrap();

    // the height edit was discarded, the width edits stay separate
    let commands = context.history().commands();
    assert_eq!(commands.len(), 3);
    assert!(!context.can_redo());
    context.undo().unwrap();
    assert_eq!(width_of(&context, id), 110.0);
}

#[test]
fn test_panel_geometry_edits_stay_inside_container() {
    let mut context = create_test_context();
    let id = add_text(&mut context, 10.0, 10.0);

    context.set_value(id, Field::Width, "5000", ValueKind::Text).unwrap();
    assert_eq!(width_of(&context, id), 390.0);
    context.set_value(id, Field::X, "-50", ValueKind::Text).unwrap();
    assert_eq!(context.document().element(id).unwrap().x(), 0.0);
    assert_eq!(context.document().get_value(id, Field::X).unwrap(), FieldValue::text("0"));
}

#[test]
fn test_limited_edits_still_coalesce() {
    let mut context = create_test_context();
    let id = add_text(&mut context, 10.0, 10.0);
    let before = context.history().len();

    context.set_value(id, Field::Width, "200", ValueKind::Text).unwrap();
    context.set_value(id, Field::Width, "5000", ValueKind::Text).unwrap();

    assert_eq!(context.history().len(), before + 1);
    match context.history().commands().last() {
        Some(Command::SetValue(cmd)) => {
            assert_eq!(cmd.old_value, FieldValue::text("100"));
            assert_eq!(cmd.new_value, FieldValue::text("390"));
        }
        other => panic!("expected a SetValue, got {:?}", other),
    }
}

#[test]
fn test_shrinking_frame_refits_hosted_elements() {
    let mut context = create_test_context();
    let content = context.document().page_containers().content;
    let frame = factory::create_frame(
        context.ids_mut(),
        content,
        Rect::from_min_size(pos2(0.0, 0.0), vec2(200.0, 100.0)),
    );
    let (frame_id, interior) = (frame.id, frame.linked_container_id.unwrap());
    context.add_element(frame).unwrap();
    let text = factory::create_text(
        context.ids_mut(),
        interior,
        Rect::from_min_size(pos2(120.0, 10.0), vec2(50.0, 20.0)),
        "inside",
    );
    let text_id = text.id;
    context.add_element(text).unwrap();
    let before = context.history().len();

    context.set_value(frame_id, Field::Width, "100", ValueKind::Text).unwrap();
    assert_eq!(width_of(&context, frame_id), 100.0);
    assert_eq!(context.document().element(text_id).unwrap().x(), 50.0);
    assert_eq!(context.history().len(), before + 1);
    assert!(matches!(context.history().commands().last(), Some(Command::Group(_))));

    context.undo().unwrap();
    assert_eq!(width_of(&context, frame_id), 200.0);
    assert_eq!(context.document().element(text_id).unwrap().x(), 120.0);
}

#[test]
fn test_new_command_discards_redo_tail() {
    let mut context = create_test_context();
    let id = add_text(&mut context, 10.0, 10.0);

    context.set_value(id, Field::Width, "150", ValueKind::Text).unwrap();
    context.undo().unwrap();
    assert!(context.can_redo());

    context.set_value(id, Field::Content, "other", ValueKind::RichText).unwrap();
    assert!(!context.can_redo());
    assert_eq!(context.history().len(), 2);
}

#[test]
fn test_empty_group_is_not_recorded() {
    let mut context = create_test_context();
    context.execute(Command::Group(CommandGroup::new("nothing"))).unwrap();
    assert!(context.history().is_empty());
    assert!(!context.is_modified());
}

#[test]
fn test_failed_group_rolls_back() {
    let mut context = create_test_context();
    let id = add_text(&mut context, 10.0, 10.0);
    let before = context.history().len();

    let mut group = CommandGroup::new("broken");
    group.add(Command::SetValue(SetValue::new(
        id,
        Field::Width,
        FieldValue::text("100"),
        FieldValue::text("150"),
        ValueKind::Internal,
    )));
    group.add(Command::SetValue(SetValue::new(
        999,
        Field::Width,
        FieldValue::text("1"),
        FieldValue::text("2"),
        ValueKind::Internal,
    )));

    let err = context.execute(Command::Group(group)).unwrap_err();
    assert_eq!(err, CommandError::Designer(DesignerError::UnknownObject(999)));
    assert_eq!(width_of(&context, id), 100.0);
    assert_eq!(context.history().len(), before);
}

#[test]
fn test_delete_and_undo_restores_child_order() {
    let mut context = create_test_context();
    let content = context.document().page_containers().content;
    let a = add_text(&mut context, 0.0, 0.0);
    let b = add_text(&mut context, 0.0, 30.0);
    let c = add_text(&mut context, 0.0, 60.0);

    context.delete_element(b).unwrap();
    assert_eq!(context.document().container(content).unwrap().children(), &[a, c]);

    context.undo().unwrap();
    assert_eq!(context.document().container(content).unwrap().children(), &[a, b, c]);

    context.redo().unwrap();
    assert!(context.document().element(b).is_err());
}

#[test]
fn test_deleting_frame_removes_hosted_elements() {
    let mut context = create_test_context();
    let content = context.document().page_containers().content;
    let frame = factory::create_frame(
        context.ids_mut(),
        content,
        Rect::from_min_size(pos2(0.0, 0.0), vec2(200.0, 100.0)),
    );
    let (frame_id, interior) = (frame.id, frame.linked_container_id.unwrap());
    context.add_element(frame).unwrap();
    let text = factory::create_text(
        context.ids_mut(),
        interior,
        Rect::from_min_size(pos2(10.0, 10.0), vec2(50.0, 20.0)),
        "inside",
    );
    let text_id = text.id;
    context.add_element(text).unwrap();

    context.select(text_id, false).unwrap();
    context.delete_element(frame_id).unwrap();
    assert!(context.document().element(text_id).is_err());
    // removed objects leave the selection first
    assert!(context.selected_ids().is_empty());

    context.undo().unwrap();
    assert_eq!(context.document().element(text_id).unwrap().container_id, Some(interior));
    assert_eq!(context.document().container(interior).unwrap().children(), &[text_id]);
}

#[test]
fn test_add_delete_command_replays() {
    let mut context = create_test_context();
    let content = context.document().page_containers().content;
    let text = factory::create_text(
        context.ids_mut(),
        content,
        Rect::from_min_size(pos2(0.0, 0.0), vec2(50.0, 20.0)),
        "x",
    );
    let id = text.id;
    let command = AddDeleteElement::add(ElementSnapshot::new(text), None);
    context.execute(Command::AddDeleteElement(command)).unwrap();

    for _ in 0..3 {
        context.undo().unwrap();
        assert!(context.document().element(id).is_err());
        context.redo().unwrap();
        assert!(context.document().element(id).is_ok());
    }
}

#[test]
fn test_modified_flag_follows_history() {
    let mut context = create_test_context();
    assert!(!context.is_modified());
    let id = add_text(&mut context, 0.0, 0.0);
    assert!(context.is_modified());

    context.mark_saved();
    assert!(!context.is_modified());
    context.set_value(id, Field::Content, "changed", ValueKind::Text).unwrap();
    assert!(context.is_modified());
}

#[test]
fn test_field_change_events() {
    let mut context = create_test_context();
    let id = add_text(&mut context, 0.0, 0.0);
    let log = EventLog::new();
    context.subscribe(Box::new(log.clone()));

    context.set_value(id, Field::Width, "120", ValueKind::Text).unwrap();
    let events = log.take();
    assert!(events.contains(&EditorEvent::FieldChanged {
        id,
        field: Field::Width,
        kind: ValueKind::Text,
    }));
    assert!(events.contains(&EditorEvent::DisplayUpdated {
        id,
        rect: Rect::from_min_size(pos2(0.0, 0.0), vec2(120.0, 20.0)),
    }));
}

#[test]
fn test_values_of_styles_and_parameters() {
    let mut context = create_test_context();
    let style_id = context.ids_mut().new_id();
    let mut document = context.document().clone();
    document
        .add_style(report_designer::style::Style::new(style_id, "Heading"))
        .unwrap();
    let mut context = EditorContext::with_document(document, EditorSettings::default());

    context.set_value(style_id, Field::Bold, true, ValueKind::Checkbox).unwrap();
    assert!(context.document().style(style_id).unwrap().text.bold);
    context.undo().unwrap();
    assert!(!context.document().style(style_id).unwrap().text.bold);
}
