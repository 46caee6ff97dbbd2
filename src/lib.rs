#![warn(clippy::all, rust_2018_idioms)]

pub mod command;
pub mod container;
pub mod document;
pub mod element;
pub mod error;
pub mod event;
pub mod geometry;
pub mod interaction;
pub mod registry;
pub mod selection;
pub mod state;
pub mod style;
pub mod validation;

pub use command::{Command, CommandError, CommandGroup, CommandHistory, CommandResult};
pub use container::{Container, ContainerKind};
pub use document::{Document, DocumentProperties, PageContainers, PointerTarget};
pub use element::{DocElement, ElementData, ElementType, Field, FieldValue, ValueKind};
pub use error::{DesignerError, DesignerResult};
pub use event::{EditorEvent, EventBus, EventHandler};
pub use geometry::DragKind;
pub use interaction::{DragSession, SelectionArea};
pub use registry::{IdGenerator, ObjectId, ObjectRegistry};
pub use selection::SelectionSet;
pub use state::{EditorContext, EditorSettings, EditorState, ReportDefinition};
pub use validation::ValidationError;
