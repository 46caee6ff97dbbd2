mod bus;
mod events;
mod handlers;

pub use bus::EventBus;
pub use events::{DocumentEvent, EditorEvent, SelectionEvent};
pub use handlers::EventLog;

pub trait EventHandler {
    fn handle_event(&mut self, event: &EditorEvent);
}
