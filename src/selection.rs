use crate::registry::ObjectId;

/// Ordered set of selected object ids. Every change bumps the revision,
/// which the command history uses to tell edits apart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionSet {
    ids: Vec<ObjectId>,
    revision: u64,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if `id` was already selected
    pub fn insert(&mut self, id: ObjectId) -> bool {
        if self.ids.contains(&id) {
            return false;
        }
        self.ids.push(id);
        self.revision += 1;
        true
    }

    /// Returns false if `id` was not selected
    pub fn remove(&mut self, id: ObjectId) -> bool {
        let Some(index) = self.ids.iter().position(|s| *s == id) else {
            return false;
        };
        self.ids.remove(index);
        self.revision += 1;
        true
    }

    /// Deselect everything, returning the previous selection
    pub fn clear(&mut self) -> Vec<ObjectId> {
        if self.ids.is_empty() {
            return Vec::new();
        }
        self.revision += 1;
        std::mem::take(&mut self.ids)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> &[ObjectId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revision_changes_only_on_change() {
        let mut selection = SelectionSet::new();
        assert!(selection.insert(3));
        let revision = selection.revision();
        assert!(!selection.insert(3));
        assert_eq!(selection.revision(), revision);
        assert!(selection.remove(3));
        assert!(selection.revision() > revision);
        assert!(selection.clear().is_empty());
    }
}
