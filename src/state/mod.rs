pub mod context;
mod editor_state;
mod persistence;
mod settings;

pub use context::EditorContext;
pub use editor_state::EditorState;
pub use persistence::{PersistenceError, PersistenceResult, ReportDefinition};
pub use settings::EditorSettings;
