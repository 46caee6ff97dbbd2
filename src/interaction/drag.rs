use egui::{Pos2, Rect, Vec2};

use crate::command::{Command, CommandGroup, CommandResult, MoveItem, SetValue};
use crate::element::{ElementType, Field, FieldValue, ValueKind};
use crate::error::DesignerResult;
use crate::event::EditorEvent;
use crate::geometry::{DragKind, DragLimits, apply_drag_diff, constrain_drag_diff, drag_diff};
use crate::registry::ObjectId;
use crate::state::{EditorContext, EditorState};

/// One pointer drag of the selection, from pointer down to pointer up
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub kind: DragKind,
    /// Element under the pointer when the drag started
    pub element_id: ObjectId,
    /// Container of that element
    pub container_id: ObjectId,
    /// Interior of the element itself (frames). Hovering it is hovering the
    /// element's own body, not a container change.
    pub linked_container_id: Option<ObjectId>,
    pub start: Pos2,
    pub current: Pos2,
    /// Snap to the grid; off while the command modifier is held
    pub snap: bool,
    /// Container currently highlighted as drop target
    pub hover_container_id: Option<ObjectId>,
}

impl DragSession {
    pub fn delta(&self) -> Vec2 {
        self.current - self.start
    }
}

impl EditorContext {
    /// Start moving or resizing from `pos`. The element is selected first
    /// if needed; kinds the element does not support are ignored.
    pub fn begin_drag(
        &mut self,
        element_id: ObjectId,
        kind: DragKind,
        pos: Pos2,
        modifiers: egui::Modifiers,
    ) -> DesignerResult<()> {
        let element = self.document.element(element_id)?;
        if !element.element_type().drag_kinds().contains(&kind) {
            log::debug!("{} does not support {} drags", element.element_type(), kind.as_str());
            return Ok(());
        }
        let Some(container_id) = element.container_id else {
            return Ok(());
        };
        let linked_container_id = element.linked_container_id;
        if !self.selection.contains(element_id) {
            self.select(element_id, modifiers.shift)?;
        }
        log::debug!("Begin {} drag of {} at {:?}", kind.as_str(), element_id, pos);
        self.transition_to(EditorState::Dragging(DragSession {
            kind,
            element_id,
            container_id,
            linked_container_id,
            start: pos,
            current: pos,
            snap: !modifiers.command,
            hover_container_id: None,
        }))
    }

    /// Elements a drag of `kind` applies to: the selected elements that
    /// support it, minus those riding along inside another selected element
    pub fn dragged_elements(&self, kind: DragKind) -> Vec<ObjectId> {
        self.top_level_selection()
            .into_iter()
            .filter(|id| {
                self.document
                    .element(*id)
                    .is_ok_and(|element| element.element_type().drag_kinds().contains(&kind))
            })
            .collect()
    }

    fn drag_limits(&self, id: ObjectId, snap: bool) -> DesignerResult<DragLimits> {
        let element = self.document.element(id)?;
        let bounds = match element.container_id {
            Some(container_id) if element.element_type().has_bounded_geometry() => {
                Some(self.document.container_content_size(container_id)?)
            }
            _ => None,
        };
        Ok(DragLimits::new(bounds, self.settings.min_size()).with_grid(self.settings.snap_grid(snap)))
    }

    /// Geometry every dragged element would get if the drag ended now, in
    /// the coordinates of its current container
    pub fn preview_rects(&self, session: &DragSession) -> DesignerResult<Vec<(ObjectId, Rect)>> {
        let lead = self.document.element(session.element_id)?;
        let lead_limits = self.drag_limits(session.element_id, session.snap)?;
        let lead_diff = drag_diff(lead.rect(), session.delta(), session.kind, &lead_limits);

        let mut rects = Vec::new();
        for id in self.dragged_elements(session.kind) {
            let element = self.document.element(id)?;
            let rect = element.rect();
            let mut diff = if id == session.element_id {
                lead_diff
            } else {
                constrain_drag_diff(rect, lead_diff, session.kind, &self.drag_limits(id, session.snap)?)
            };
            if element.element_type() == ElementType::PageBreak {
                diff.x = 0.0;
            }
            rects.push((id, apply_drag_diff(rect, diff, session.kind)));
        }
        Ok(rects)
    }

    pub(crate) fn update_drag(&mut self, pos: Pos2, modifiers: egui::Modifiers) -> DesignerResult<()> {
        let EditorState::Dragging(session) = &mut self.state else {
            return Ok(());
        };
        session.current = pos;
        session.snap = !modifiers.command;
        let mut session = session.clone();

        if session.kind == DragKind::Move {
            let hover = self.hovered_container(&session)?;
            if hover != session.hover_container_id {
                if let Some(container_id) = session.hover_container_id {
                    self.event_bus.emit(EditorEvent::ContainerHover {
                        container_id,
                        hovered: false,
                    });
                }
                if let Some(container_id) = hover {
                    self.event_bus.emit(EditorEvent::ContainerHover {
                        container_id,
                        hovered: true,
                    });
                }
                session.hover_container_id = hover;
                self.state = EditorState::Dragging(session.clone());
            }
        }

        for (id, rect) in self.preview_rects(&session)? {
            self.event_bus.emit(EditorEvent::DisplayUpdated { id, rect });
        }
        Ok(())
    }

    /// Drop target under the pointer for the lead element. The element's own
    /// interior resolves to its current container.
    fn hovered_container(&self, session: &DragSession) -> DesignerResult<Option<ObjectId>> {
        let element_type = self.document.element(session.element_id)?.element_type();
        let excluded = self.dragged_elements(session.kind);
        let hover = self.document.container_at(session.current, element_type, &excluded);
        Ok(match hover {
            Some(id) if Some(id) == session.linked_container_id => Some(session.container_id),
            other => other,
        })
    }

    /// Container every dragged element moves to when a move ends over
    /// `hover_container_id`. Elements only change container together: all of
    /// them must come from the same container and be accepted by the target,
    /// otherwise each one stays where it is.
    fn reparent_target(&self, session: &DragSession, previews: &[(ObjectId, Rect)]) -> DesignerResult<Option<ObjectId>> {
        let Some(target) = session.hover_container_id else {
            return Ok(None);
        };
        if session.kind != DragKind::Move {
            return Ok(None);
        }
        let target_container = self.document.container(target)?;
        let mut source = None;
        for (id, _) in previews {
            let element = self.document.element(*id)?;
            if element.container_id.is_none() || (source.is_some() && source != element.container_id) {
                log::debug!("Dragged elements come from different containers, keeping them in place");
                return Ok(None);
            }
            if !target_container.is_element_allowed(element.element_type()) {
                log::debug!("Container {} does not accept {}", target, element.element_type());
                return Ok(None);
            }
            source = element.container_id;
        }
        Ok(source.filter(|source| *source != target).map(|_| target))
    }

    /// Turn the finished drag into one command group. When the elements
    /// change container each gets a `containerId` change plus a `MoveItem`
    /// to the end of the target, keeping their relative order.
    pub fn build_drag_group(&self, session: &DragSession) -> DesignerResult<CommandGroup> {
        let name = if session.kind == DragKind::Move { "move" } else { "resize" };
        let mut group = CommandGroup::new(name);
        let mut previews = self.preview_rects(session)?;

        let Some(target) = self.reparent_target(session, &previews)? else {
            for (id, rect) in previews {
                let Some(container_id) = self.document.element(id)?.container_id else {
                    continue;
                };
                let size = self.document.container_content_size(container_id)?;
                self.document.update_position_and_size(id, rect, size, &mut group)?;
            }
            return Ok(group);
        };

        let Some(source) = previews
            .first()
            .and_then(|(id, _)| self.document.element(*id).ok())
            .and_then(|element| element.container_id)
        else {
            return Ok(group);
        };
        let source_container = self.document.container(source)?;
        // Undo puts the elements back in reverse, so lower positions must be
        // restored first.
        previews.sort_by_key(|(id, _)| std::cmp::Reverse(source_container.child_index(*id)));
        let offset = self.document.offset_to(source, target)?;
        let size = self.document.container_content_size(target)?;
        let end = self.document.container(target)?.children().len();
        for (id, rect) in previews {
            self.document
                .update_position_and_size(id, rect.translate(offset), size, &mut group)?;
            group.add(Command::SetValue(SetValue::new(
                id,
                Field::ContainerId,
                FieldValue::Id(Some(source)),
                FieldValue::Id(Some(target)),
                ValueKind::Internal,
            )));
            group.add(Command::MoveItem(MoveItem {
                item_id: id,
                old_container_id: source,
                old_position: source_container.child_index(id).unwrap_or(0),
                new_container_id: target,
                new_position: end,
            }));
        }
        Ok(group)
    }

    pub(crate) fn finish_drag(&mut self) -> CommandResult {
        let Some(session) = self.state.drag_session().cloned() else {
            return Ok(());
        };
        self.end_drag(&session)?;
        if session.delta() == Vec2::ZERO {
            return Ok(());
        }
        if session.kind == DragKind::Move && session.hover_container_id.is_none() {
            log::debug!("Drop of {} outside any accepting container", session.element_id);
            self.revert_display(&session);
            return Ok(());
        }
        let group = self.build_drag_group(&session)?;
        if group.is_empty() {
            log::debug!("Drag of {} changed nothing", session.element_id);
            self.revert_display(&session);
            return Ok(());
        }
        log::info!("Committing {} of {} element(s)", group.name, self.dragged_elements(session.kind).len());
        if let Err(err) = self.execute(Command::Group(group)) {
            self.revert_display(&session);
            return Err(err);
        }
        Ok(())
    }

    pub(crate) fn cancel_drag(&mut self) -> DesignerResult<()> {
        let Some(session) = self.state.drag_session().cloned() else {
            return Ok(());
        };
        self.end_drag(&session)?;
        self.revert_display(&session);
        Ok(())
    }

    fn end_drag(&mut self, session: &DragSession) -> DesignerResult<()> {
        if let Some(container_id) = session.hover_container_id {
            self.event_bus.emit(EditorEvent::ContainerHover {
                container_id,
                hovered: false,
            });
        }
        self.transition_to(EditorState::Idle)
    }

    /// Put the previewed elements back at their committed geometry
    fn revert_display(&self, session: &DragSession) {
        for id in self.dragged_elements(session.kind) {
            if let Ok(element) = self.document.element(id) {
                self.event_bus.emit(EditorEvent::DisplayUpdated { id, rect: element.rect() });
            }
        }
    }
}
