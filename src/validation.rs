//! Field-level messages from an external validator.
//!
//! A validation pass replaces every message in the document: all lists are
//! cleared first, then the new messages are attached by object id. Messages
//! never block editing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::element::FieldError;
use crate::event::EditorEvent;
use crate::registry::ObjectId;
use crate::state::EditorContext;

/// One message as returned by the validator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    #[serde(alias = "object_id")]
    pub object_id: ObjectId,
    pub field: String,
    #[serde(alias = "msg")]
    pub message: String,
}

impl ValidationError {
    pub fn new(object_id: ObjectId, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            object_id,
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Parse a validator response (a JSON array of messages)
pub fn parse_validation_errors(json: &str) -> Result<Vec<ValidationError>, serde_json::Error> {
    serde_json::from_str(json)
}

impl EditorContext {
    /// Replace all validation messages with `errors`. Messages for unknown
    /// ids are skipped. Returns the number of attached messages.
    pub fn apply_validation_errors(&mut self, errors: &[ValidationError]) -> usize {
        let mut changed = self.document.clear_errors();

        let mut by_object: BTreeMap<ObjectId, Vec<FieldError>> = BTreeMap::new();
        for error in errors {
            by_object.entry(error.object_id).or_default().push(FieldError {
                field: error.field.clone(),
                message: error.message.clone(),
            });
        }

        let mut attached = 0;
        for (id, messages) in by_object {
            let count = messages.len();
            match self.document.set_errors(id, messages) {
                Ok(()) => {
                    attached += count;
                    if !changed.contains(&id) {
                        changed.push(id);
                    }
                }
                Err(err) => log::warn!("Skipping validation messages for {}: {}", id, err),
            }
        }

        changed.sort_unstable();
        for id in changed {
            self.event_bus.emit(EditorEvent::ErrorsChanged { id });
        }
        log::debug!("Attached {} validation message(s)", attached);
        attached
    }

    /// Validation messages of any data object
    pub fn errors_of(&self, id: ObjectId) -> &[FieldError] {
        self.document
            .registry()
            .resolve(id)
            .map(|object| object.errors())
            .unwrap_or(&[])
    }
}
