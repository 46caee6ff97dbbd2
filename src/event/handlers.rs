use std::cell::RefCell;
use std::rc::Rc;

use crate::event::{EditorEvent, EventHandler};

/// Records every event it receives. Clones share the same log, so one clone
/// can be subscribed while another is inspected.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<EditorEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<EditorEvent> {
        self.events.borrow().clone()
    }

    /// Return and forget everything recorded so far
    pub fn take(&self) -> Vec<EditorEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl EventHandler for EventLog {
    fn handle_event(&mut self, event: &EditorEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
