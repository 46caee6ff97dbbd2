use std::cell::RefCell;

use crate::event::{EditorEvent, EventHandler};

/// Broadcasts editor events to the renderer, property panels and any other
/// subscribed observer, in subscription order
pub struct EventBus {
    handlers: RefCell<Vec<Box<dyn EventHandler>>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handlers = self.handlers.try_borrow().map(|h| h.len()).unwrap_or(0);
        f.debug_struct("EventBus")
            .field("handlers", &format!("<{} handlers>", handlers))
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
        }
    }

    /// Subscribe a handler. Subscribing from inside a handler is ignored.
    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        match self.handlers.try_borrow_mut() {
            Ok(mut handlers) => handlers.push(handler),
            Err(_) => log::warn!("Ignoring subscription made while an event is being delivered"),
        }
    }

    /// Deliver an event to every handler. An event raised by a handler while
    /// another event is being delivered is dropped.
    pub fn emit(&self, event: EditorEvent) {
        let Ok(mut handlers) = self.handlers.try_borrow_mut() else {
            log::warn!("Dropping {:?} raised while another event is being delivered", event);
            return;
        };
        for handler in handlers.iter_mut() {
            handler.handle_event(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventLog;
    use std::rc::{Rc, Weak};

    struct Echo {
        bus: Weak<EventBus>,
    }

    impl EventHandler for Echo {
        fn handle_event(&mut self, event: &EditorEvent) {
            if let Some(bus) = self.bus.upgrade() {
                bus.emit(event.clone());
                bus.subscribe(Box::new(EventLog::new()));
            }
        }
    }

    #[test]
    fn events_raised_during_delivery_are_dropped() {
        let bus = Rc::new(EventBus::new());
        let log = EventLog::new();
        bus.subscribe(Box::new(Echo { bus: Rc::downgrade(&bus) }));
        bus.subscribe(Box::new(log.clone()));

        bus.emit(EditorEvent::ElementAdded { id: 7 });
        assert_eq!(log.take(), vec![EditorEvent::ElementAdded { id: 7 }]);
        assert_eq!(bus.handlers.borrow().len(), 2);
    }
}
