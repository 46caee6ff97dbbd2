use thiserror::Error;

use crate::element::{ElementType, Field, FieldKind};
use crate::registry::ObjectId;

/// Errors raised by the document model when an id, field or transition is invalid
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DesignerError {
    #[error("No object registered with id {0}")]
    UnknownObject(ObjectId),

    #[error("Object {0} is not a document element")]
    NotAnElement(ObjectId),

    #[error("Object {0} is not a container")]
    NotAContainer(ObjectId),

    #[error("Id {0} is already in use")]
    DuplicateObject(ObjectId),

    #[error("A {element_type} cannot be placed in container {container_id}")]
    ElementNotAllowed {
        element_type: ElementType,
        container_id: ObjectId,
    },

    #[error("Field '{field}' is not defined for {element_type}")]
    UnknownField {
        field: Field,
        element_type: ElementType,
    },

    #[error("Field '{field}' expects a {expected} value")]
    FieldTypeMismatch { field: Field, expected: FieldKind },

    #[error("Cannot transition from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
}

pub type DesignerResult<T> = Result<T, DesignerError>;
