use std::collections::BTreeMap;

use crate::container::Container;
use crate::element::{DocElement, FieldError};
use crate::error::{DesignerError, DesignerResult};
use crate::style::{Parameter, Style};

/// Process-unique id shared by every data object of a document
pub type ObjectId = usize;

/// Strictly increasing id source. Ids are never reused within a session.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    next: ObjectId,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Hand out the next id. The counter stops at `ObjectId::MAX`; inserting
    /// a second object with that id fails as a duplicate.
    pub fn new_id(&mut self) -> ObjectId {
        let id = self.next;
        self.next = self.next.saturating_add(1);
        id
    }

    /// Continue after `max_id`. Never moves the counter backwards.
    pub fn reseed(&mut self, max_id: ObjectId) {
        self.next = self.next.max(max_id.saturating_add(1));
    }

    /// Forget everything handed out so far and continue after `max_id`
    pub fn reset_to(&mut self, max_id: ObjectId) {
        self.next = max_id.saturating_add(1);
    }

    pub fn peek(&self) -> ObjectId {
        self.next
    }
}

/// Anything that can be resolved by id
#[derive(Debug, Clone)]
pub enum DataObject {
    Element(DocElement),
    Container(Container),
    Style(Style),
    Parameter(Parameter),
}

impl DataObject {
    pub fn id(&self) -> ObjectId {
        match self {
            DataObject::Element(e) => e.id,
            DataObject::Container(c) => c.id,
            DataObject::Style(s) => s.id,
            DataObject::Parameter(p) => p.id,
        }
    }

    /// Validation messages attached to the object; containers carry none
    pub fn errors(&self) -> &[FieldError] {
        match self {
            DataObject::Element(e) => e.errors(),
            DataObject::Style(s) => &s.errors,
            DataObject::Parameter(p) => &p.errors,
            DataObject::Container(_) => &[],
        }
    }

    /// Returns false for containers, which cannot hold messages
    pub fn set_errors(&mut self, errors: Vec<FieldError>) -> bool {
        match self {
            DataObject::Element(e) => e.set_errors(errors),
            DataObject::Style(s) => s.errors = errors,
            DataObject::Parameter(p) => p.errors = errors,
            DataObject::Container(_) => return false,
        }
        true
    }
}

/// Flat id -> object mapping. Cross references between objects are ids
/// resolved through here, never direct references.
#[derive(Debug, Clone, Default)]
pub struct ObjectRegistry {
    objects: BTreeMap<ObjectId, DataObject>,
    ids: IdGenerator,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_id(&mut self) -> ObjectId {
        self.ids.new_id()
    }

    pub fn ids_mut(&mut self) -> &mut IdGenerator {
        &mut self.ids
    }

    pub fn next_id(&self) -> ObjectId {
        self.ids.peek()
    }

    pub fn register(&mut self, object: DataObject) {
        let id = object.id();
        // Keep generated ids ahead of anything registered with an explicit id.
        self.ids.reseed(id);
        self.objects.insert(id, object);
    }

    /// Removes the object. Missing ids are a no-op.
    pub fn unregister(&mut self, id: ObjectId) -> Option<DataObject> {
        self.objects.remove(&id)
    }

    pub fn resolve(&self, id: ObjectId) -> Option<&DataObject> {
        self.objects.get(&id)
    }

    pub fn resolve_mut(&mut self, id: ObjectId) -> Option<&mut DataObject> {
        self.objects.get_mut(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn max_id(&self) -> ObjectId {
        self.objects.keys().next_back().copied().unwrap_or(0)
    }

    pub fn element(&self, id: ObjectId) -> DesignerResult<&DocElement> {
        match self.objects.get(&id) {
            Some(DataObject::Element(e)) => Ok(e),
            Some(_) => Err(DesignerError::NotAnElement(id)),
            None => Err(DesignerError::UnknownObject(id)),
        }
    }

    pub fn element_mut(&mut self, id: ObjectId) -> DesignerResult<&mut DocElement> {
        match self.objects.get_mut(&id) {
            Some(DataObject::Element(e)) => Ok(e),
            Some(_) => Err(DesignerError::NotAnElement(id)),
            None => Err(DesignerError::UnknownObject(id)),
        }
    }

    pub fn container(&self, id: ObjectId) -> DesignerResult<&Container> {
        match self.objects.get(&id) {
            Some(DataObject::Container(c)) => Ok(c),
            Some(_) => Err(DesignerError::NotAContainer(id)),
            None => Err(DesignerError::UnknownObject(id)),
        }
    }

    pub fn container_mut(&mut self, id: ObjectId) -> DesignerResult<&mut Container> {
        match self.objects.get_mut(&id) {
            Some(DataObject::Container(c)) => Ok(c),
            Some(_) => Err(DesignerError::NotAContainer(id)),
            None => Err(DesignerError::UnknownObject(id)),
        }
    }

    pub fn ids(&self) -> Vec<ObjectId> {
        self.objects.keys().copied().collect()
    }

    pub fn elements(&self) -> impl Iterator<Item = &DocElement> {
        self.objects.values().filter_map(|o| match o {
            DataObject::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn containers(&self) -> impl Iterator<Item = &Container> {
        self.objects.values().filter_map(|o| match o {
            DataObject::Container(c) => Some(c),
            _ => None,
        })
    }

    pub fn container_ids(&self) -> Vec<ObjectId> {
        self.containers().map(|c| c.id).collect()
    }

    pub fn styles(&self) -> impl Iterator<Item = &Style> {
        self.objects.values().filter_map(|o| match o {
            DataObject::Style(s) => Some(s),
            _ => None,
        })
    }

    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.objects.values().filter_map(|o| match o {
            DataObject::Parameter(p) => Some(p),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_strictly_increasing() {
        let mut ids = IdGenerator::new();
        let a = ids.new_id();
        let b = ids.new_id();
        assert!(b > a);
    }

    #[test]
    fn reseed_never_moves_backwards() {
        let mut ids = IdGenerator::new();
        ids.reseed(41);
        assert_eq!(ids.new_id(), 42);
        ids.reseed(3);
        assert_eq!(ids.new_id(), 43);
    }

    #[test]
    fn reseed_at_the_largest_id_does_not_wrap() {
        let mut ids = IdGenerator::new();
        ids.reseed(ObjectId::MAX);
        assert_eq!(ids.peek(), ObjectId::MAX);
        ids.reset_to(ObjectId::MAX);
        assert_eq!(ids.new_id(), ObjectId::MAX);
        assert_eq!(ids.peek(), ObjectId::MAX);
    }

    #[test]
    fn unregister_missing_id_is_noop() {
        let mut registry = ObjectRegistry::new();
        assert!(registry.unregister(99).is_none());
    }
}
