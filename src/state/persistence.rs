use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::{Document, DocumentProperties, PageContainers};
use crate::element::{ElementData, ElementType};
use crate::error::DesignerError;
use crate::registry::{ObjectId, ObjectRegistry};
use crate::style::{Parameter, ParameterData, Style, StyleData};

/// Errors that can occur while saving or loading a report definition
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to serialize definition: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid report definition: {0}")]
    InvalidDefinition(String),

    #[error(transparent)]
    Document(#[from] DesignerError),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Persisted form of a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDefinition {
    /// Version of the editor that wrote the definition
    pub version: String,
    #[serde(default)]
    pub document_properties: DocumentProperties,
    pub page_containers: PageContainers,
    #[serde(default)]
    pub styles: Vec<StyleData>,
    #[serde(default)]
    pub parameters: Vec<ParameterData>,
    /// Every placed element, containers before their contents
    #[serde(default)]
    pub doc_elements: Vec<ElementData>,
}

impl ReportDefinition {
    pub fn from_document(document: &Document) -> PersistenceResult<Self> {
        let mut doc_elements = Vec::new();
        for id in document.elements_in_order() {
            let element_type = document.element(id)?.element_type();
            // cells are nested in their band
            if element_type == ElementType::TableText {
                continue;
            }
            doc_elements.push(document.element_data(id)?);
        }
        Ok(Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            document_properties: document.properties().clone(),
            page_containers: document.page_containers(),
            styles: document.registry().styles().map(Style::to_data).collect(),
            parameters: document.registry().parameters().map(Parameter::to_data).collect(),
            doc_elements,
        })
    }

    pub fn to_json(&self) -> PersistenceResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> PersistenceResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Highest id anywhere in the definition, including ids of nested bands,
    /// cells and linked containers
    pub fn max_id(&self) -> ObjectId {
        let styles = self.styles.iter().map(|s| s.id);
        let parameters = self.parameters.iter().map(|p| p.id);
        let elements = self.doc_elements.iter().map(ElementData::max_id);
        styles
            .chain(parameters)
            .chain(elements)
            .fold(self.page_containers.max_id(), ObjectId::max)
    }

    /// Rebuild a document. Records that cannot be placed (unknown container,
    /// duplicate id, type not allowed in the container) are skipped with a
    /// warning. The id generator continues after the highest id found.
    pub fn build_document(&self) -> PersistenceResult<Document> {
        if self.version != env!("CARGO_PKG_VERSION") {
            log::warn!(
                "Definition version {} differs from current version {}",
                self.version,
                env!("CARGO_PKG_VERSION")
            );
        }
        let max_id = self.max_id();
        if max_id.checked_add(1).is_none() {
            return Err(PersistenceError::InvalidDefinition(format!(
                "id {} leaves no room for new ids",
                max_id
            )));
        }
        let page = self.page_containers;
        let mut page_ids = vec![page.page, page.header, page.content, page.footer];
        page_ids.sort_unstable();
        page_ids.dedup();
        if page_ids.len() != 4 {
            return Err(PersistenceError::InvalidDefinition(
                "page containers must have distinct ids".to_string(),
            ));
        }

        let mut document = Document::with_page_containers(self.document_properties.clone(), page, ObjectRegistry::new());
        for style in &self.styles {
            if let Err(err) = document.add_style(Style::from_data(style)) {
                log::warn!("Skipping style {}: {}", style.id, err);
            }
        }
        for parameter in &self.parameters {
            if let Err(err) = document.add_parameter(Parameter::from_data(parameter)) {
                log::warn!("Skipping parameter {}: {}", parameter.id, err);
            }
        }

        // Records may refer to containers created by later records, so keep
        // placing whatever has its container until nothing changes.
        let mut created = Vec::new();
        let mut pending: Vec<&ElementData> = self.doc_elements.iter().collect();
        loop {
            let before = pending.len();
            pending.retain(|data| {
                let Some(container_id) = data.container_id() else {
                    log::warn!("Skipping element {} without container", data.id);
                    return false;
                };
                if document.container(container_id).is_err() {
                    return true;
                }
                if let Err(err) = document.add_element_data(data, None, &mut created) {
                    log::warn!("Skipping element {}: {}", data.id, err);
                }
                false
            });
            if pending.is_empty() || pending.len() == before {
                break;
            }
        }
        for data in pending {
            log::warn!(
                "Skipping element {}: container {:?} does not exist",
                data.id,
                data.container_id()
            );
        }

        document.finish_insert(&created)?;
        let doc_max_id = document.max_id();
        document.ids_mut().reset_to(max_id.max(doc_max_id));
        log::info!("Loaded report with {} elements", created.len());
        Ok(document)
    }
}
