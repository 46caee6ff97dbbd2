//! The editing session of one report.
//!
//! `EditorContext` owns everything a report editor mutates: the document, the
//! selection, the undo history and the pointer state machine. Several
//! contexts can live side by side; nothing in the crate is global.
//!
//! # State Management
//!
//! All document changes go through [`EditorContext::execute`] (or the
//! helpers built on it) so they end up in the history. The pointer gestures
//! in [`crate::interaction`] move the context between the states of
//! [`EditorState`]; invalid transitions are rejected.
//!
//! # Example
//!
//! ```rust,no_run
//! use egui::{Rect, pos2, vec2};
//! use report_designer::element::{ValueKind, Field, factory};
//! use report_designer::state::{EditorContext, EditorSettings};
//! use report_designer::document::DocumentProperties;
//!
//! let mut context = EditorContext::new(DocumentProperties::default(), EditorSettings::default());
//! let content = context.document().page_containers().content;
//! let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(100.0, 20.0));
//! let text = factory::create_text(context.ids_mut(), content, rect, "Title");
//! let id = text.id;
//! context.add_element(text).unwrap();
//! context.set_value(id, Field::Width, "150", ValueKind::Text).unwrap();
//! context.undo().unwrap();
//! ```
use crate::command::{AddDeleteElement, Command, CommandContext, CommandError, CommandGroup, CommandHistory, CommandResult, SetValue};
use crate::document::{Document, DocumentProperties};
use crate::element::{ElementData, ElementSnapshot, Field, FieldValue, ValueKind, format_number, parse_number};
use crate::error::{DesignerError, DesignerResult};
use crate::event::{DocumentEvent, EditorEvent, EventBus, EventHandler, SelectionEvent};
use crate::registry::{IdGenerator, ObjectId};
use crate::selection::SelectionSet;
use super::{EditorSettings, EditorState, PersistenceResult, ReportDefinition};

/// The editing session of one report.
#[derive(Debug)]
pub struct EditorContext {
    /// The current pointer state
    pub(crate) state: EditorState,
    /// The report being edited
    pub(crate) document: Document,
    pub(crate) selection: SelectionSet,
    history: CommandHistory,
    /// The event bus for broadcasting editor events
    pub(crate) event_bus: EventBus,
    pub(crate) settings: EditorSettings,
    modified: bool,
}

impl EditorContext {
    /// Creates a context with an empty document.
    ///
    /// The context starts in the `Idle` state with an empty history.
    pub fn new(properties: DocumentProperties, settings: EditorSettings) -> Self {
        Self::with_document(Document::new(properties), settings)
    }

    pub fn with_document(document: Document, settings: EditorSettings) -> Self {
        Self {
            state: EditorState::Idle,
            document,
            selection: SelectionSet::new(),
            history: CommandHistory::new(),
            event_bus: EventBus::new(),
            settings,
            modified: false,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Id source for building new elements with [`crate::element::factory`]
    pub fn ids_mut(&mut self) -> &mut IdGenerator {
        self.document.ids_mut()
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut EditorSettings {
        &mut self.settings
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Register a renderer, property panel or any other observer
    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.event_bus.subscribe(handler);
    }

    /// Gets a reference to the current state.
    pub fn current_state(&self) -> &EditorState {
        &self.state
    }

    /// Attempts to transition to a new state, validating the transition and
    /// emitting `StateChanged` when successful.
    ///
    /// # Errors
    ///
    /// Returns `DesignerError::InvalidTransition` if the requested transition
    /// is not allowed from the current state.
    pub fn transition_to(&mut self, new_state: EditorState) -> DesignerResult<()> {
        if !self.state.can_transition_to(&new_state) {
            return Err(DesignerError::InvalidTransition {
                from: self.state.name(),
                to: new_state.name(),
            });
        }
        let old = self.state.name();
        self.state = new_state;
        if old != self.state.name() {
            log::debug!("Editor state {} -> {}", old, self.state.name());
            self.event_bus.emit(EditorEvent::StateChanged {
                old,
                new: self.state.name(),
            });
        }
        Ok(())
    }

    // ---- commands ----------------------------------------------------------

    fn command_context(&mut self) -> CommandContext<'_> {
        CommandContext::new(&mut self.document, &mut self.selection, &self.event_bus)
    }

    fn mark_modified(&mut self) {
        self.modified = true;
        self.event_bus.emit(EditorEvent::DocumentChanged(DocumentEvent::Modified));
    }

    /// Execute a command and record it in the history. Empty groups are
    /// dropped without touching the history.
    pub fn execute(&mut self, command: Command) -> CommandResult {
        if command.is_empty() {
            log::debug!("Nothing to do for '{}'", command.name());
            return Ok(());
        }
        let mut ctx = CommandContext::new(&mut self.document, &mut self.selection, &self.event_bus);
        self.history.execute(command, &mut ctx)?;
        self.mark_modified();
        Ok(())
    }

    /// Returns false when there is nothing to undo
    pub fn undo(&mut self) -> Result<bool, CommandError> {
        if !self.state.is_idle() {
            return Err(CommandError::InvalidState(format!("cannot undo while {}", self.state.name())));
        }
        let mut ctx = CommandContext::new(&mut self.document, &mut self.selection, &self.event_bus);
        let undone = self.history.undo(&mut ctx)?;
        if undone {
            self.mark_modified();
        }
        Ok(undone)
    }

    /// Returns false when there is nothing to redo
    pub fn redo(&mut self) -> Result<bool, CommandError> {
        if !self.state.is_idle() {
            return Err(CommandError::InvalidState(format!("cannot redo while {}", self.state.name())));
        }
        let mut ctx = CommandContext::new(&mut self.document, &mut self.selection, &self.event_bus);
        let redone = self.history.redo(&mut ctx)?;
        if redone {
            self.mark_modified();
        }
        Ok(redone)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Change one field the way a property panel does. Geometry of bounded
    /// elements is limited to the container, and elements hosted by the
    /// edited one are re-fitted in the same undo step.
    pub fn set_value(
        &mut self,
        object_id: ObjectId,
        field: Field,
        value: impl Into<FieldValue>,
        kind: ValueKind,
    ) -> CommandResult {
        let mut value = value.into();
        let edited = self.document.geometry_edit(object_id, field, &value)?;
        if let Some(limited) = edited.and_then(|rect| field.rect_value(rect)) {
            if value.as_text().map(parse_number) != Some(limited) {
                log::debug!("Limiting {} of {} to {}", field, object_id, limited);
                value = FieldValue::text(format_number(limited));
            }
        }

        let command = SetValue::capture(&self.document, object_id, field, value, kind)?;
        let mut group = CommandGroup::new("set value");
        if command.old_value != command.new_value {
            group.add(Command::SetValue(command));
        }
        if let Some(rect) = edited {
            self.document.fit_hosted_elements(object_id, rect, &mut group)?;
        }
        match group.into_command() {
            Some(command) => self.execute(command),
            None => Ok(()),
        }
    }

    /// Place a new element (with its bands and cells) in the container named
    /// by its `containerId`. A container that does not accept the type ends
    /// the drop as a no-op and returns false.
    pub fn add_element(&mut self, data: ElementData) -> Result<bool, CommandError> {
        let Some(container_id) = data.container_id() else {
            return Err(CommandError::InvalidState(format!("element {} has no container", data.id)));
        };
        if !self.document.container(container_id)?.is_element_allowed(data.element_type) {
            log::warn!("Dropping {} into container {} is not allowed", data.element_type, container_id);
            return Ok(false);
        }
        let id = data.id;
        self.execute(Command::AddDeleteElement(AddDeleteElement::add(ElementSnapshot::new(data), None)))?;
        log::info!("Added element {}", id);
        Ok(true)
    }

    pub fn delete_element(&mut self, id: ObjectId) -> CommandResult {
        let command = AddDeleteElement::delete(&self.document, id)?;
        self.execute(Command::AddDeleteElement(command))
    }

    /// Delete every selected element as one undo step. Elements hosted by
    /// another selected element go with their host.
    pub fn delete_selection(&mut self) -> Result<bool, CommandError> {
        let mut group = CommandGroup::new("delete selection");
        for id in self.top_level_selection() {
            group.add(Command::AddDeleteElement(AddDeleteElement::delete(&self.document, id)?));
        }
        if group.is_empty() {
            return Ok(false);
        }
        self.execute(Command::Group(group))?;
        Ok(true)
    }

    /// Selected elements that are not hosted (directly or transitively) by
    /// another selected element, in selection order
    pub fn top_level_selection(&self) -> Vec<ObjectId> {
        self.selection
            .ids()
            .iter()
            .copied()
            .filter(|id| self.document.element(*id).is_ok())
            .filter(|id| {
                !self
                    .document
                    .ancestor_elements(*id)
                    .iter()
                    .any(|ancestor| self.selection.contains(*ancestor))
            })
            .collect()
    }

    // ---- selection ---------------------------------------------------------

    pub fn selected_ids(&self) -> &[ObjectId] {
        self.selection.ids()
    }

    pub fn is_selected(&self, id: ObjectId) -> bool {
        self.selection.contains(id)
    }

    /// Select an element. Without `additive` everything else is deselected.
    pub fn select(&mut self, id: ObjectId, additive: bool) -> DesignerResult<()> {
        self.document.element(id)?;
        if !additive {
            let others: Vec<ObjectId> = self.selection.ids().iter().copied().filter(|s| *s != id).collect();
            for other in others {
                self.deselect(other);
            }
        }
        if self.selection.insert(id) {
            self.document.element_mut(id)?.select();
            self.event_bus
                .emit(EditorEvent::SelectionChanged(SelectionEvent::Selected(id)));
        }
        Ok(())
    }

    pub fn deselect(&mut self, id: ObjectId) {
        self.command_context().deselect(id);
    }

    pub fn clear_selection(&mut self) {
        for id in self.selection.ids().to_vec() {
            self.deselect(id);
        }
    }

    // ---- persistence -------------------------------------------------------

    /// Replace the document with a persisted one. History and selection
    /// start over.
    pub fn load(&mut self, definition: &ReportDefinition) -> PersistenceResult<()> {
        let document = definition.build_document()?;
        self.document = document;
        self.selection = SelectionSet::new();
        self.history.clear();
        self.state = EditorState::Idle;
        self.modified = false;
        log::info!("Loaded report definition version {}", definition.version);
        self.event_bus.emit(EditorEvent::DocumentChanged(DocumentEvent::Loaded));
        Ok(())
    }

    pub fn load_json(&mut self, json: &str) -> PersistenceResult<()> {
        let definition = ReportDefinition::from_json(json)?;
        self.load(&definition)
    }

    pub fn to_definition(&self) -> PersistenceResult<ReportDefinition> {
        ReportDefinition::from_document(&self.document)
    }

    pub fn to_json(&self) -> PersistenceResult<String> {
        self.to_definition()?.to_json()
    }

    /// True once anything was executed, undone or redone since the last
    /// load or save
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn mark_saved(&mut self) {
        self.modified = false;
        self.event_bus.emit(EditorEvent::DocumentChanged(DocumentEvent::Saved));
    }
}

impl Default for EditorContext {
    fn default() -> Self {
        Self::new(DocumentProperties::default(), EditorSettings::default())
    }
}
