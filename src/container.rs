use crate::element::ElementType;
use crate::registry::ObjectId;

/// Role of a container in the page structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// Whole page; holds only watermarks
    Page,
    PageHeader,
    PageContent,
    PageFooter,
    /// Interior of a frame element
    Frame,
    /// Interior of a section header/content/footer band
    SectionBand,
    /// Row of a table; holds the table's cells
    TableBand,
}

impl ContainerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerKind::Page => "page",
            ContainerKind::PageHeader => "header",
            ContainerKind::PageContent => "content",
            ContainerKind::PageFooter => "footer",
            ContainerKind::Frame => "frame",
            ContainerKind::SectionBand => "section band",
            ContainerKind::TableBand => "table band",
        }
    }

    pub fn is_page_band(&self) -> bool {
        matches!(
            self,
            ContainerKind::PageHeader | ContainerKind::PageContent | ContainerKind::PageFooter
        )
    }

    /// Whether an element of `element_type` may be dropped into a container of this kind
    pub fn is_element_allowed(&self, element_type: ElementType) -> bool {
        use ElementType as T;

        if element_type.is_band() || element_type == T::TableText {
            return false;
        }
        match self {
            ContainerKind::Page => element_type.is_watermark(),
            _ if element_type.is_watermark() => false,
            ContainerKind::PageContent => true,
            ContainerKind::PageHeader | ContainerKind::PageFooter => {
                !matches!(element_type, T::PageBreak | T::Table)
            }
            ContainerKind::Frame => !matches!(element_type, T::PageBreak | T::Frame | T::Section),
            ContainerKind::SectionBand => element_type != T::PageBreak,
            ContainerKind::TableBand => false,
        }
    }
}

/// A region that holds an ordered list of child elements
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub id: ObjectId,
    pub kind: ContainerKind,
    /// Element hosting this container (frame or band). Page containers have none.
    pub owner_id: Option<ObjectId>,
    pub parent_id: Option<ObjectId>,
    /// Number of ancestor containers
    pub level: usize,
    children: Vec<ObjectId>,
}

impl Container {
    pub fn new(id: ObjectId, kind: ContainerKind, owner_id: Option<ObjectId>, parent_id: Option<ObjectId>) -> Self {
        Self {
            id,
            kind,
            owner_id,
            parent_id,
            level: 0,
            children: Vec::new(),
        }
    }

    pub fn is_element_allowed(&self, element_type: ElementType) -> bool {
        self.kind.is_element_allowed(element_type)
    }

    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }

    pub fn child_index(&self, id: ObjectId) -> Option<usize> {
        self.children.iter().position(|c| *c == id)
    }

    /// Insert `id` at `position` (clamped to the end). Children already
    /// present are left where they are.
    pub fn insert_child(&mut self, position: Option<usize>, id: ObjectId) {
        if self.children.contains(&id) {
            return;
        }
        let index = position.unwrap_or(self.children.len()).min(self.children.len());
        self.children.insert(index, id);
    }

    pub fn remove_child(&mut self, id: ObjectId) -> Option<usize> {
        let index = self.child_index(id)?;
        self.children.remove(index);
        Some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_accepts_only_watermarks() {
        assert!(ContainerKind::Page.is_element_allowed(ElementType::WatermarkText));
        assert!(!ContainerKind::Page.is_element_allowed(ElementType::Text));
        assert!(!ContainerKind::PageContent.is_element_allowed(ElementType::WatermarkImage));
    }

    #[test]
    fn band_allow_lists() {
        assert!(!ContainerKind::PageHeader.is_element_allowed(ElementType::Table));
        assert!(!ContainerKind::PageFooter.is_element_allowed(ElementType::PageBreak));
        assert!(ContainerKind::PageHeader.is_element_allowed(ElementType::Frame));
        assert!(!ContainerKind::Frame.is_element_allowed(ElementType::Frame));
        assert!(ContainerKind::Frame.is_element_allowed(ElementType::Text));
        assert!(ContainerKind::SectionBand.is_element_allowed(ElementType::Table));
        assert!(!ContainerKind::TableBand.is_element_allowed(ElementType::Text));
    }

    #[test]
    fn children_are_unique() {
        let mut container = Container::new(1, ContainerKind::PageContent, None, None);
        container.insert_child(None, 5);
        container.insert_child(Some(0), 6);
        container.insert_child(None, 5);
        assert_eq!(container.children(), &[6, 5]);
        assert_eq!(container.remove_child(6), Some(0));
        assert_eq!(container.remove_child(6), None);
    }
}
