use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{BandRole, ElementType};
use crate::registry::ObjectId;

/// Serialized form of an element. Bands of tables/sections and the cells of
/// table bands are nested; elements placed inside frames or section bands
/// are separate records referring to their container by `containerId`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementData {
    pub id: ObjectId,
    pub element_type: ElementType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_container_id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub band_role: Option<BandRole>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bands: Vec<ElementData>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cells: Vec<ElementData>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ElementData {
    pub fn new(id: ObjectId, element_type: ElementType) -> Self {
        Self {
            id,
            element_type,
            linked_container_id: None,
            band_role: None,
            bands: Vec::new(),
            cells: Vec::new(),
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn container_id(&self) -> Option<ObjectId> {
        self.fields
            .get("containerId")
            .and_then(Value::as_u64)
            .map(|id| id as ObjectId)
    }

    pub fn set_container_id(&mut self, container_id: ObjectId) {
        self.fields.insert("containerId".to_string(), Value::from(container_id));
    }

    /// Highest id owned by this record, including linked container, bands
    /// and cells (which are allocated after the owning element)
    pub fn max_id(&self) -> ObjectId {
        let own = self.id.max(self.linked_container_id.unwrap_or(0));
        self.bands
            .iter()
            .chain(self.cells.iter())
            .map(ElementData::max_id)
            .fold(own, ObjectId::max)
    }

    /// Every id this record occupies once placed: the element, its linked
    /// container, bands with their containers and cells
    pub fn owned_ids(&self) -> Vec<ObjectId> {
        let mut ids = vec![self.id];
        ids.extend(self.linked_container_id);
        for nested in self.bands.iter().chain(self.cells.iter()) {
            ids.extend(nested.owned_ids());
        }
        ids
    }
}

/// Full subtree of an element: the element itself plus every element hosted
/// (directly or transitively) inside its linked containers, parents first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementSnapshot {
    pub element: ElementData,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub descendants: Vec<ElementData>,
}

impl ElementSnapshot {
    pub fn new(element: ElementData) -> Self {
        Self {
            element,
            descendants: Vec::new(),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.element.id
    }

    pub fn max_id(&self) -> ObjectId {
        self.descendants
            .iter()
            .map(ElementData::max_id)
            .fold(self.element.max_id(), ObjectId::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_id_includes_nested_cells() {
        let mut table = ElementData::new(5, ElementType::Table);
        let mut band = ElementData::new(6, ElementType::TableBand);
        band.linked_container_id = Some(7);
        band.cells.push(ElementData::new(12, ElementType::TableText));
        table.bands.push(band);
        assert_eq!(table.max_id(), 12);
        assert_eq!(table.owned_ids(), vec![5, 6, 7, 12]);
    }

    #[test]
    fn flattened_fields_roundtrip() {
        let data = ElementData::new(3, ElementType::Text)
            .with_field("x", "10")
            .with_field("containerId", 2);
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["elementType"], "text");
        assert_eq!(json["x"], "10");
        let back: ElementData = serde_json::from_value(json).unwrap();
        assert_eq!(back, data);
        assert_eq!(back.container_id(), Some(2));
    }
}
