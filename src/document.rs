use std::collections::BTreeSet;

use egui::{Pos2, Rect, Vec2, pos2, vec2};
use serde::{Deserialize, Serialize};

use crate::command::{Command, CommandGroup, SetValue};
use crate::container::{Container, ContainerKind};
use crate::element::{
    BandRole, DocElement, ElementData, ElementKind, ElementSnapshot, ElementType, Field, FieldError, FieldValue,
    PAGE_BREAK_HEIGHT, ValueKind, format_number, parse_number,
};
use crate::error::{DesignerError, DesignerResult};
use crate::geometry::{DragKind, clamp_rect, hit_testing};
use crate::registry::{DataObject, IdGenerator, ObjectId, ObjectRegistry};
use crate::style::{Parameter, Style};

/// Page setup. All values are in points; the canvas origin is the top left
/// corner of the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentProperties {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_left: f32,
    pub margin_top: f32,
    pub margin_right: f32,
    pub margin_bottom: f32,
    pub header: bool,
    pub header_size: f32,
    pub footer: bool,
    pub footer_size: f32,
}

impl Default for DocumentProperties {
    fn default() -> Self {
        // A4 portrait
        Self {
            page_width: 595.0,
            page_height: 842.0,
            margin_left: 20.0,
            margin_top: 20.0,
            margin_right: 20.0,
            margin_bottom: 10.0,
            header: true,
            header_size: 60.0,
            footer: true,
            footer_size: 60.0,
        }
    }
}

impl DocumentProperties {
    pub fn content_width(&self) -> f32 {
        (self.page_width - self.margin_left - self.margin_right).max(0.0)
    }

    pub fn header_height(&self) -> f32 {
        if self.header { self.header_size } else { 0.0 }
    }

    pub fn footer_height(&self) -> f32 {
        if self.footer { self.footer_size } else { 0.0 }
    }

    pub fn content_height(&self) -> f32 {
        (self.page_height - self.margin_top - self.margin_bottom - self.header_height() - self.footer_height())
            .max(0.0)
    }
}

/// Ids of the fixed containers every document has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContainers {
    pub page: ObjectId,
    pub header: ObjectId,
    pub content: ObjectId,
    pub footer: ObjectId,
}

impl PageContainers {
    pub fn max_id(&self) -> ObjectId {
        self.page.max(self.header).max(self.content).max(self.footer)
    }
}

/// What is under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// Resize handle of a selected element
    Handle { element_id: ObjectId, kind: DragKind },
    Element(ObjectId),
    Canvas,
}

/// The report being edited: an arena of elements, containers, styles and
/// parameters plus the page setup
#[derive(Debug, Clone)]
pub struct Document {
    registry: ObjectRegistry,
    properties: DocumentProperties,
    page: PageContainers,
}

impl Document {
    pub fn new(properties: DocumentProperties) -> Self {
        let mut registry = ObjectRegistry::new();
        let page = PageContainers {
            page: registry.new_id(),
            header: registry.new_id(),
            content: registry.new_id(),
            footer: registry.new_id(),
        };
        Self::with_page_containers(properties, page, registry)
    }

    pub(crate) fn with_page_containers(
        properties: DocumentProperties,
        page: PageContainers,
        mut registry: ObjectRegistry,
    ) -> Self {
        registry.register(DataObject::Container(Container::new(page.page, ContainerKind::Page, None, None)));
        for (id, kind) in [
            (page.header, ContainerKind::PageHeader),
            (page.content, ContainerKind::PageContent),
            (page.footer, ContainerKind::PageFooter),
        ] {
            registry.register(DataObject::Container(Container::new(id, kind, None, Some(page.page))));
        }
        let mut document = Self {
            registry,
            properties,
            page,
        };
        document.update_levels();
        document
    }

    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    pub fn ids_mut(&mut self) -> &mut IdGenerator {
        self.registry.ids_mut()
    }

    pub fn new_id(&mut self) -> ObjectId {
        self.registry.new_id()
    }

    pub fn max_id(&self) -> ObjectId {
        self.registry.max_id()
    }

    pub fn properties(&self) -> &DocumentProperties {
        &self.properties
    }

    pub fn page_containers(&self) -> PageContainers {
        self.page
    }

    pub fn element(&self, id: ObjectId) -> DesignerResult<&DocElement> {
        self.registry.element(id)
    }

    pub(crate) fn element_mut(&mut self, id: ObjectId) -> DesignerResult<&mut DocElement> {
        self.registry.element_mut(id)
    }

    pub fn container(&self, id: ObjectId) -> DesignerResult<&Container> {
        self.registry.container(id)
    }

    pub fn style(&self, id: ObjectId) -> Option<&Style> {
        match self.registry.resolve(id) {
            Some(DataObject::Style(style)) => Some(style),
            _ => None,
        }
    }

    pub fn parameter(&self, id: ObjectId) -> Option<&Parameter> {
        match self.registry.resolve(id) {
            Some(DataObject::Parameter(parameter)) => Some(parameter),
            _ => None,
        }
    }

    pub fn add_style(&mut self, style: Style) -> DesignerResult<()> {
        self.ensure_free(style.id)?;
        self.registry.register(DataObject::Style(style));
        Ok(())
    }

    pub fn add_parameter(&mut self, parameter: Parameter) -> DesignerResult<()> {
        self.ensure_free(parameter.id)?;
        self.registry.register(DataObject::Parameter(parameter));
        Ok(())
    }

    fn ensure_free(&self, id: ObjectId) -> DesignerResult<()> {
        if self.registry.contains(id) {
            return Err(DesignerError::DuplicateObject(id));
        }
        Ok(())
    }

    /// Fail before anything is registered when the records would reuse an
    /// id, either one already in the document or one shared between records
    fn ensure_records_free<'a>(&self, records: impl IntoIterator<Item = &'a ElementData>) -> DesignerResult<()> {
        let mut seen = BTreeSet::new();
        for id in records.into_iter().flat_map(ElementData::owned_ids) {
            if !seen.insert(id) {
                return Err(DesignerError::DuplicateObject(id));
            }
            self.ensure_free(id)?;
        }
        Ok(())
    }

    /// Replace the validation messages of an element, style or parameter
    pub(crate) fn set_errors(&mut self, id: ObjectId, errors: Vec<FieldError>) -> DesignerResult<()> {
        let object = self.registry.resolve_mut(id).ok_or(DesignerError::UnknownObject(id))?;
        if !object.set_errors(errors) {
            return Err(DesignerError::NotAnElement(id));
        }
        Ok(())
    }

    /// Drop every validation message. Returns the ids that had any.
    pub(crate) fn clear_errors(&mut self) -> Vec<ObjectId> {
        let mut cleared = Vec::new();
        for id in self.registry.ids() {
            if let Some(object) = self.registry.resolve_mut(id) {
                if !object.errors().is_empty() {
                    object.set_errors(Vec::new());
                    cleared.push(id);
                }
            }
        }
        cleared
    }

    // ---- geometry ----------------------------------------------------------

    fn page_band_origin(&self, kind: ContainerKind) -> Pos2 {
        let p = &self.properties;
        match kind {
            ContainerKind::PageHeader => pos2(p.margin_left, p.margin_top),
            ContainerKind::PageContent => pos2(p.margin_left, p.margin_top + p.header_height()),
            ContainerKind::PageFooter => pos2(p.margin_left, p.page_height - p.margin_bottom - p.footer_height()),
            _ => Pos2::ZERO,
        }
    }

    /// Position of the owning element inside the owner's parent container
    fn owner_origin(&self, owner_id: ObjectId) -> DesignerResult<Pos2> {
        let owner = self.element(owner_id)?;
        match owner.kind.band() {
            Some(band) => {
                let host = self.element(band.host_id)?;
                Ok(host.rect().min + owner.rect().min.to_vec2())
            }
            None => Ok(owner.rect().min),
        }
    }

    /// Absolute origin of a container
    pub fn container_offset(&self, id: ObjectId) -> DesignerResult<Pos2> {
        let container = self.container(id)?;
        let parent = match container.parent_id {
            Some(parent_id) => self.container_offset(parent_id)?,
            None => Pos2::ZERO,
        };
        let local = match container.owner_id {
            Some(owner_id) if container.kind == ContainerKind::Frame => {
                self.owner_origin(owner_id)? + Vec2::splat(frame_inset(self.element(owner_id)?))
            }
            Some(owner_id) => self.owner_origin(owner_id)?,
            None => self.page_band_origin(container.kind),
        };
        Ok(parent + local.to_vec2())
    }

    pub fn container_size(&self, id: ObjectId) -> DesignerResult<Vec2> {
        let container = self.container(id)?;
        let p = &self.properties;
        let size = match container.kind {
            ContainerKind::Page => vec2(p.page_width, p.page_height),
            ContainerKind::PageHeader => vec2(p.content_width(), p.header_height()),
            ContainerKind::PageContent => vec2(p.content_width(), p.content_height()),
            ContainerKind::PageFooter => vec2(p.content_width(), p.footer_height()),
            ContainerKind::Frame | ContainerKind::SectionBand | ContainerKind::TableBand => {
                let owner_id = container.owner_id.ok_or(DesignerError::UnknownObject(id))?;
                self.element(owner_id)?.rect().size()
            }
        };
        Ok(size)
    }

    /// Size available to children: the container size minus border insets
    pub fn container_content_size(&self, id: ObjectId) -> DesignerResult<Vec2> {
        let size = self.container_size(id)?;
        let container = self.container(id)?;
        let inset = match (container.kind, container.owner_id) {
            (ContainerKind::Frame, Some(owner_id)) => frame_inset(self.element(owner_id)?),
            _ => 0.0,
        };
        Ok((size - Vec2::splat(2.0 * inset)).max(Vec2::ZERO))
    }

    /// Area children are placed in, in canvas coordinates
    pub fn container_rect(&self, id: ObjectId) -> DesignerResult<Rect> {
        Ok(Rect::from_min_size(self.container_offset(id)?, self.container_content_size(id)?))
    }

    pub fn is_inside(&self, id: ObjectId, pos: Pos2) -> DesignerResult<bool> {
        Ok(self.container_rect(id)?.contains(pos))
    }

    /// Translation that maps coordinates local to `from` into coordinates
    /// local to `to`
    pub fn offset_to(&self, from: ObjectId, to: ObjectId) -> DesignerResult<Vec2> {
        Ok(self.container_offset(from)? - self.container_offset(to)?)
    }

    /// Hidden band containers (disabled table/section header or footer)
    pub fn is_container_visible(&self, id: ObjectId) -> bool {
        let Ok(container) = self.container(id) else {
            return false;
        };
        let Some(owner_id) = container.owner_id else {
            return true;
        };
        let Some(band) = self.element(owner_id).ok().and_then(|e| e.kind.band().copied()) else {
            return true;
        };
        self.element(band.host_id)
            .ok()
            .and_then(|host| host.kind.band_host())
            .map(|host| host.is_enabled(band.role))
            .unwrap_or(false)
    }

    /// Element rectangle in canvas coordinates
    pub fn absolute_rect(&self, id: ObjectId) -> DesignerResult<Rect> {
        let element = self.element(id)?;
        let origin = match (element.kind.band(), element.container_id) {
            (Some(band), _) => {
                let host = self.element(band.host_id)?;
                let host_origin = match host.container_id {
                    Some(container_id) => self.container_offset(container_id)?,
                    None => Pos2::ZERO,
                };
                host_origin + host.rect().min.to_vec2()
            }
            (None, Some(container_id)) => self.container_offset(container_id)?,
            (None, None) => Pos2::ZERO,
        };
        Ok(element.rect().translate(origin.to_vec2()))
    }

    // ---- hierarchy ---------------------------------------------------------

    /// Containers hosted by an element: a frame's interior or the interiors
    /// of a table's/section's bands (header, content, footer)
    pub fn linked_containers(&self, element_id: ObjectId) -> Vec<ObjectId> {
        let Ok(element) = self.element(element_id) else {
            return Vec::new();
        };
        match element.kind.band_host() {
            Some(host) => host
                .bands()
                .into_iter()
                .filter_map(|band_id| self.element(band_id).ok().and_then(|b| b.linked_container_id))
                .collect(),
            None if element.element_type() == ElementType::Frame => {
                element.linked_container_id.into_iter().collect()
            }
            None => Vec::new(),
        }
    }

    /// Element a container belongs to. Band containers resolve to the band's host.
    pub fn owner_element(&self, container_id: ObjectId) -> Option<ObjectId> {
        let owner_id = self.container(container_id).ok()?.owner_id?;
        let owner = self.element(owner_id).ok()?;
        Some(owner.kind.band().map(|band| band.host_id).unwrap_or(owner_id))
    }

    /// Elements hosting `element_id`, innermost first
    pub fn ancestor_elements(&self, element_id: ObjectId) -> Vec<ObjectId> {
        let mut ancestors = Vec::new();
        let mut current = self.element(element_id).ok().and_then(|e| e.container_id);
        while let Some(container_id) = current {
            let Some(owner) = self.owner_element(container_id) else {
                break;
            };
            if ancestors.contains(&owner) {
                break;
            }
            ancestors.push(owner);
            current = self.element(owner).ok().and_then(|e| e.container_id);
        }
        ancestors
    }

    /// The element, its bands and cells and everything hosted inside it
    pub fn subtree_ids(&self, element_id: ObjectId) -> DesignerResult<Vec<ObjectId>> {
        let mut ids = Vec::new();
        self.collect_subtree(element_id, &mut ids)?;
        Ok(ids)
    }

    fn collect_subtree(&self, element_id: ObjectId, ids: &mut Vec<ObjectId>) -> DesignerResult<()> {
        let element = self.element(element_id)?;
        ids.push(element_id);
        if let Some(host) = element.kind.band_host() {
            ids.extend(host.bands());
        }
        for container_id in self.linked_containers(element_id) {
            for child in self.container(container_id)?.children() {
                self.collect_subtree(*child, ids)?;
            }
        }
        Ok(())
    }

    /// Every element placed in a container, parents before the elements
    /// they host, in child order. Bands are not included; table cells are.
    pub fn elements_in_order(&self) -> Vec<ObjectId> {
        let mut ids = Vec::new();
        for container_id in [self.page.page, self.page.header, self.page.content, self.page.footer] {
            self.collect_ordered(container_id, &mut ids);
        }
        ids
    }

    fn collect_ordered(&self, container_id: ObjectId, ids: &mut Vec<ObjectId>) {
        let Ok(container) = self.container(container_id) else {
            return;
        };
        for child in container.children() {
            ids.push(*child);
            for linked in self.linked_containers(*child) {
                self.collect_ordered(linked, ids);
            }
        }
    }

    fn update_levels(&mut self) {
        for id in self.registry.container_ids() {
            let mut level = 0;
            let mut current = self.container(id).ok().and_then(|c| c.parent_id);
            while let Some(parent_id) = current {
                level += 1;
                current = self.container(parent_id).ok().and_then(|c| c.parent_id);
            }
            if let Ok(container) = self.registry.container_mut(id) {
                container.level = level;
            }
        }
    }

    fn set_linked_parents(&mut self, element_id: ObjectId, parent_id: Option<ObjectId>) -> DesignerResult<()> {
        for container_id in self.linked_containers(element_id) {
            self.registry.container_mut(container_id)?.parent_id = parent_id;
        }
        Ok(())
    }

    // ---- field access ------------------------------------------------------

    pub fn get_value(&self, id: ObjectId, field: Field) -> DesignerResult<FieldValue> {
        match self.registry.resolve(id) {
            Some(DataObject::Element(element)) => element.get_value(field),
            Some(DataObject::Style(style)) => style.get_value(field),
            Some(DataObject::Parameter(parameter)) => parameter.get_value(field),
            Some(DataObject::Container(_)) => Err(DesignerError::NotAnElement(id)),
            None => Err(DesignerError::UnknownObject(id)),
        }
    }

    /// Assign a field of any data object. Changing `containerId` moves the
    /// element to the end of the new container and reparents everything it
    /// hosts. Returns whether anything changed.
    pub fn set_value(&mut self, id: ObjectId, field: Field, value: &FieldValue) -> DesignerResult<bool> {
        match self.registry.resolve_mut(id) {
            Some(DataObject::Element(_)) => {}
            Some(DataObject::Style(style)) => return style.set_value(field, value),
            Some(DataObject::Parameter(parameter)) => return parameter.set_value(field, value),
            Some(DataObject::Container(_)) => return Err(DesignerError::NotAnElement(id)),
            None => return Err(DesignerError::UnknownObject(id)),
        }

        if field == Field::ContainerId {
            return self.set_container(id, value);
        }

        let changed = self.element_mut(id)?.set_value(field, value)?;
        if changed {
            self.relayout_after(id, field)?;
        }
        Ok(changed)
    }

    fn set_container(&mut self, id: ObjectId, value: &FieldValue) -> DesignerResult<bool> {
        if let FieldValue::Id(Some(new_container)) = value {
            let container = self.container(*new_container)?;
            let element_type = self.element(id)?.element_type();
            if !container.is_element_allowed(element_type) {
                return Err(DesignerError::ElementNotAllowed {
                    element_type,
                    container_id: *new_container,
                });
            }
        }
        let old = self.element(id)?.container_id;
        if !self.element_mut(id)?.set_value(Field::ContainerId, value)? {
            return Ok(false);
        }
        let new = self.element(id)?.container_id;
        if let Some(old) = old {
            self.registry.container_mut(old)?.remove_child(id);
        }
        if let Some(new) = new {
            self.registry.container_mut(new)?.insert_child(None, id);
        }
        self.set_linked_parents(id, new)?;
        self.update_levels();
        Ok(true)
    }

    /// Move an element to `position` within `container_id`, which may be
    /// its current container
    pub fn move_item(&mut self, id: ObjectId, container_id: ObjectId, position: usize) -> DesignerResult<()> {
        self.container(container_id)?;
        let current = self.element(id)?.container_id;
        if let Some(current) = current {
            self.registry.container_mut(current)?.remove_child(id);
        }
        self.registry
            .container_mut(container_id)?
            .insert_child(Some(position), id);
        self.element_mut(id)?.container_id = Some(container_id);
        self.set_linked_parents(id, Some(container_id))?;
        self.update_levels();
        Ok(())
    }

    fn relayout_after(&mut self, id: ObjectId, field: Field) -> DesignerResult<()> {
        let element = self.element(id)?;
        let element_type = element.element_type();
        let host = if element_type.has_bands() && matches!(field, Field::Width | Field::Header | Field::Footer) {
            Some(id)
        } else if element_type.is_band() && field == Field::Height {
            element.kind.band().map(|band| band.host_id)
        } else if element_type == ElementType::TableText && field == Field::Width {
            element.container_id.and_then(|c| self.owner_element(c))
        } else {
            None
        };
        match host {
            Some(host_id) => self.layout_bands(host_id),
            None => Ok(()),
        }
    }

    /// Elements whose geometry a change to `id` may have moved: a host
    /// together with its bands and cells, or just the element
    pub fn display_group(&self, id: ObjectId) -> Vec<ObjectId> {
        let Ok(element) = self.element(id) else {
            return Vec::new();
        };
        let host = if element.element_type().has_bands() {
            Some(id)
        } else if let Some(band) = element.kind.band() {
            Some(band.host_id)
        } else if element.element_type() == ElementType::TableText {
            element.container_id.and_then(|c| self.owner_element(c))
        } else {
            None
        };
        let Some(host_id) = host else {
            return vec![id];
        };
        let mut ids = vec![host_id];
        if let Some(bands) = self.element(host_id).ok().and_then(|h| h.kind.band_host()) {
            for band_id in bands.bands() {
                ids.push(band_id);
                let cells = self
                    .element(band_id)
                    .ok()
                    .filter(|b| b.element_type() == ElementType::TableBand)
                    .and_then(|b| b.linked_container_id)
                    .and_then(|c| self.container(c).ok());
                if let Some(cells) = cells {
                    ids.extend_from_slice(cells.children());
                }
            }
        }
        ids
    }

    // ---- layout ------------------------------------------------------------

    /// Stack the enabled bands of a table or section vertically and size the
    /// host to fit them
    pub(crate) fn layout_bands(&mut self, host_id: ObjectId) -> DesignerResult<()> {
        let host = self.element(host_id)?;
        let Some(bands) = host.kind.band_host().cloned() else {
            return Ok(());
        };
        let width = host.width();
        let mut y = 0.0;
        for role in [BandRole::Header, BandRole::Content, BandRole::Footer] {
            let Some(band_id) = bands.band(role) else {
                continue;
            };
            let band = self.element_mut(band_id)?;
            band.set_geometry(Field::X, 0.0);
            band.set_geometry(Field::Y, y);
            band.set_geometry(Field::Width, width);
            if bands.is_enabled(role) {
                y += band.height();
            }
            if band.element_type() == ElementType::TableBand {
                self.layout_cells(band_id)?;
            }
        }
        self.element_mut(host_id)?.set_geometry(Field::Height, y);
        Ok(())
    }

    /// Place cells left to right; the last cell takes up the remaining width
    fn layout_cells(&mut self, band_id: ObjectId) -> DesignerResult<()> {
        let band = self.element(band_id)?;
        let (band_width, band_height) = (band.width(), band.height());
        let Some(container_id) = band.linked_container_id else {
            return Ok(());
        };
        let cells = self.container(container_id)?.children().to_vec();
        let mut x = 0.0;
        for (index, cell_id) in cells.iter().enumerate() {
            let cell = self.element_mut(*cell_id)?;
            if index + 1 == cells.len() {
                cell.set_geometry(Field::Width, (band_width - x).max(0.0));
            }
            cell.set_geometry(Field::X, x);
            cell.set_geometry(Field::Y, 0.0);
            cell.set_geometry(Field::Height, band_height);
            x += cell.width();
        }
        Ok(())
    }

    /// Fit a freshly attached element into its container's content area.
    /// Page breaks span the full container width.
    pub(crate) fn setup(&mut self, id: ObjectId) -> DesignerResult<bool> {
        let element = self.element(id)?;
        let element_type = element.element_type();
        let Some(container_id) = element.container_id else {
            return Ok(false);
        };
        let current = element.rect();
        let bounds = self.container_content_size(container_id)?;
        let rect = if element_type == ElementType::PageBreak {
            let y = current.min.y.min(bounds.y - PAGE_BREAK_HEIGHT).max(0.0);
            Rect::from_min_size(pos2(0.0, y), vec2(bounds.x, PAGE_BREAK_HEIGHT))
        } else if element_type.has_bounded_geometry() {
            clamp_rect(current, bounds)
        } else {
            return Ok(false);
        };
        if rect == current {
            return Ok(false);
        }
        let element = self.element_mut(id)?;
        element.set_rect(rect);
        if element_type.has_bands() {
            self.layout_bands(id)?;
        }
        Ok(true)
    }

    // ---- subtrees ----------------------------------------------------------

    /// Serialized form of one element including its bands and cells
    pub fn element_data(&self, id: ObjectId) -> DesignerResult<ElementData> {
        let element = self.element(id)?;
        let element_type = element.element_type();
        let mut data = ElementData::new(id, element_type);
        data.fields = element.field_data();
        if element_type == ElementType::Frame || element_type.is_band() {
            data.linked_container_id = element.linked_container_id;
        }
        if let Some(band) = element.kind.band() {
            data.band_role = Some(band.role);
        }
        if let Some(host) = element.kind.band_host() {
            for band_id in host.bands() {
                data.bands.push(self.element_data(band_id)?);
            }
        }
        if element_type == ElementType::TableBand {
            if let Some(container_id) = element.linked_container_id {
                for cell_id in self.container(container_id)?.children() {
                    data.cells.push(self.element_data(*cell_id)?);
                }
            }
        }
        Ok(data)
    }

    /// Everything needed to recreate the element and its contents
    pub fn snapshot(&self, id: ObjectId) -> DesignerResult<ElementSnapshot> {
        let mut snapshot = ElementSnapshot::new(self.element_data(id)?);
        self.collect_descendant_data(id, &mut snapshot.descendants)?;
        Ok(snapshot)
    }

    fn collect_descendant_data(&self, id: ObjectId, out: &mut Vec<ElementData>) -> DesignerResult<()> {
        for container_id in self.linked_containers(id) {
            let container = self.container(container_id)?;
            // cells travel nested inside their band
            if container.kind == ContainerKind::TableBand {
                continue;
            }
            for child in container.children() {
                out.push(self.element_data(*child)?);
                self.collect_descendant_data(*child, out)?;
            }
        }
        Ok(())
    }

    /// Recreate a snapshot. The element goes to `position` in its container
    /// (end if `None`); hosted elements are appended in snapshot order.
    /// Returns the ids of every created element.
    pub fn add_snapshot(&mut self, snapshot: &ElementSnapshot, position: Option<usize>) -> DesignerResult<Vec<ObjectId>> {
        self.ensure_records_free(std::iter::once(&snapshot.element).chain(&snapshot.descendants))?;
        let mut created = Vec::new();
        self.add_element_data(&snapshot.element, position, &mut created)?;
        for data in &snapshot.descendants {
            self.add_element_data(data, None, &mut created)?;
        }
        self.finish_insert(&created)?;
        Ok(created)
    }

    /// Bring freshly created elements into a consistent state: nesting
    /// levels, band layout, then clamping into their containers
    pub(crate) fn finish_insert(&mut self, created: &[ObjectId]) -> DesignerResult<()> {
        self.update_levels();
        for id in created {
            if self.element(*id)?.element_type().has_bands() {
                self.layout_bands(*id)?;
            }
        }
        for id in created {
            self.setup(*id)?;
        }
        Ok(())
    }

    pub(crate) fn add_element_data(
        &mut self,
        data: &ElementData,
        position: Option<usize>,
        created: &mut Vec<ObjectId>,
    ) -> DesignerResult<()> {
        self.ensure_records_free([data])?;
        let mut element = DocElement::new(data.id, data.element_type);
        element.set_initial_data(&data.fields);
        let container_id = element.container_id;
        if let Some(container_id) = container_id {
            let container = self.container(container_id)?;
            if !container.is_element_allowed(data.element_type) {
                return Err(DesignerError::ElementNotAllowed {
                    element_type: data.element_type,
                    container_id,
                });
            }
        }
        if data.element_type == ElementType::Frame {
            let linked = match data.linked_container_id {
                Some(linked) => linked,
                None => self.registry.new_id(),
            };
            self.ensure_free(linked)?;
            element.linked_container_id = Some(linked);
        }

        let id = data.id;
        let linked = element.linked_container_id;
        self.registry.register(DataObject::Element(element));
        if let Some(container_id) = container_id {
            self.registry.container_mut(container_id)?.insert_child(position, id);
        }
        if let Some(linked) = linked {
            self.registry.register(DataObject::Container(Container::new(
                linked,
                ContainerKind::Frame,
                Some(id),
                container_id,
            )));
        }
        created.push(id);

        for band in &data.bands {
            self.add_band(id, container_id, band, created)?;
        }
        Ok(())
    }

    fn add_band(
        &mut self,
        host_id: ObjectId,
        host_container: Option<ObjectId>,
        data: &ElementData,
        created: &mut Vec<ObjectId>,
    ) -> DesignerResult<()> {
        if !data.element_type.is_band() {
            log::warn!("Ignoring {} record {} among the bands of {}", data.element_type, data.id, host_id);
            return Ok(());
        }
        self.ensure_free(data.id)?;
        let role = data.band_role.unwrap_or(BandRole::Content);
        let linked = match data.linked_container_id {
            Some(linked) => linked,
            None => self.registry.new_id(),
        };
        self.ensure_free(linked)?;

        let mut band = DocElement::new(data.id, data.element_type);
        band.set_initial_data(&data.fields);
        band.linked_container_id = Some(linked);
        if let Some(b) = band.kind.band_mut() {
            b.host_id = host_id;
            b.role = role;
        }
        let container_kind = match data.element_type {
            ElementType::TableBand => ContainerKind::TableBand,
            _ => ContainerKind::SectionBand,
        };
        self.registry.register(DataObject::Element(band));
        self.registry.register(DataObject::Container(Container::new(
            linked,
            container_kind,
            Some(data.id),
            host_container,
        )));
        if let Some(host) = self.element_mut(host_id)?.kind.band_host_mut() {
            host.set_band(role, data.id);
        }

        for cell in &data.cells {
            self.ensure_free(cell.id)?;
            let mut element = DocElement::new(cell.id, ElementType::TableText);
            element.set_initial_data(&cell.fields);
            element.container_id = Some(linked);
            self.registry.register(DataObject::Element(element));
            self.registry.container_mut(linked)?.insert_child(None, cell.id);
            created.push(cell.id);
        }
        Ok(())
    }

    /// Remove an element with everything it owns and hosts. Returns the
    /// removed element ids.
    pub fn remove_element(&mut self, id: ObjectId) -> DesignerResult<Vec<ObjectId>> {
        let ids = self.subtree_ids(id)?;
        let container_id = self.element(id)?.container_id;
        if let Some(container_id) = container_id {
            if let Ok(container) = self.registry.container_mut(container_id) {
                container.remove_child(id);
            }
        }
        for removed in &ids {
            let linked = self.element(*removed).ok().and_then(|e| e.linked_container_id);
            if let Some(linked) = linked {
                self.registry.unregister(linked);
            }
        }
        for removed in &ids {
            self.registry.unregister(*removed);
        }
        Ok(ids)
    }

    /// Propose a new rectangle for an element. The rectangle is clamped into
    /// `container_size` and a `SetValue` is added to `group` for every
    /// geometry field that differs. Elements hosted by the element are
    /// re-checked against its new size.
    pub fn update_position_and_size(
        &self,
        id: ObjectId,
        rect: Rect,
        container_size: Vec2,
        group: &mut CommandGroup,
    ) -> DesignerResult<()> {
        let element = self.element(id)?;
        let element_type = element.element_type();
        let rect = if element_type.has_bounded_geometry() {
            clamp_rect(rect, container_size)
        } else {
            rect
        };

        for (field, value) in [
            (Field::X, rect.min.x),
            (Field::Y, rect.min.y),
            (Field::Width, rect.width()),
            (Field::Height, rect.height()),
        ] {
            if !element_type.has_field(field) {
                continue;
            }
            let old = element.get_value(field)?;
            let new = FieldValue::text(format_number(value));
            if old.as_text().map(parse_number) == new.as_text().map(parse_number) {
                continue;
            }
            group.add(Command::SetValue(SetValue::new(id, field, old, new, ValueKind::Internal)));
        }

        self.fit_hosted_elements(id, rect, group)
    }

    /// Re-check everything hosted by `id` against the interior it gets when
    /// the element takes the geometry `rect`
    pub(crate) fn fit_hosted_elements(&self, id: ObjectId, rect: Rect, group: &mut CommandGroup) -> DesignerResult<()> {
        let inset = frame_inset(self.element(id)?);
        for container_id in self.linked_containers(id) {
            let container = self.container(container_id)?;
            let size = match container.kind {
                ContainerKind::Frame => (rect.size() - Vec2::splat(2.0 * inset)).max(Vec2::ZERO),
                ContainerKind::SectionBand => {
                    let band_height = container
                        .owner_id
                        .and_then(|owner| self.element(owner).ok())
                        .map(|band| band.height())
                        .unwrap_or(0.0);
                    vec2(rect.width(), band_height)
                }
                // cells follow the band layout
                _ => continue,
            };
            for child in container.children() {
                let child_rect = self.element(*child)?.rect();
                self.update_position_and_size(*child, child_rect, size, group)?;
            }
        }
        Ok(())
    }

    /// Geometry an element gets from a property panel edit of one geometry
    /// field. The edited field is limited so the element stays inside its
    /// container; the other fields keep their values. `None` when `field` is
    /// not geometry or the element is not bounded by its container.
    pub fn geometry_edit(&self, id: ObjectId, field: Field, value: &FieldValue) -> DesignerResult<Option<Rect>> {
        let element = self.element(id)?;
        let element_type = element.element_type();
        let Some(container_id) = element.container_id else {
            return Ok(None);
        };
        if !field.is_geometry() || !element_type.has_bounded_geometry() || !element_type.has_field(field) {
            return Ok(None);
        }
        let Some(text) = value.as_text() else {
            return Ok(None);
        };
        let wanted = parse_number(text);
        let bounds = self.container_content_size(container_id)?;
        let rect = element.rect();
        let (min, size) = (rect.min, rect.size());
        let edited = match field {
            Field::X => Rect::from_min_size(pos2(wanted.clamp(0.0, (bounds.x - size.x).max(0.0)), min.y), size),
            Field::Y => Rect::from_min_size(pos2(min.x, wanted.clamp(0.0, (bounds.y - size.y).max(0.0))), size),
            Field::Width => Rect::from_min_size(min, vec2(wanted.clamp(0.0, (bounds.x - min.x).max(0.0)), size.y)),
            Field::Height => Rect::from_min_size(min, vec2(size.x, wanted.clamp(0.0, (bounds.y - min.y).max(0.0)))),
            _ => return Ok(None),
        };
        Ok(Some(edited))
    }

    // ---- hit testing -------------------------------------------------------

    /// Resolve a pointer position: a resize handle of one of `selected`,
    /// else the topmost element, else the empty canvas
    pub fn hit_test(&self, pos: Pos2, selected: &[ObjectId]) -> PointerTarget {
        for id in selected.iter().rev() {
            let Ok(element) = self.element(*id) else {
                continue;
            };
            let Ok(rect) = self.absolute_rect(*id) else {
                continue;
            };
            if let Some(kind) = hit_testing::handle_at(pos, rect, element.element_type().drag_kinds()) {
                return PointerTarget::Handle { element_id: *id, kind };
            }
        }
        match self.element_at(pos) {
            Some(id) => PointerTarget::Element(id),
            None => PointerTarget::Canvas,
        }
    }

    /// Topmost draggable element under `pos`. Watermarks are only hit where
    /// no other element is.
    pub fn element_at(&self, pos: Pos2) -> Option<ObjectId> {
        [self.page.content, self.page.header, self.page.footer, self.page.page]
            .into_iter()
            .find_map(|container_id| self.element_at_in(container_id, pos))
    }

    fn element_at_in(&self, container_id: ObjectId, pos: Pos2) -> Option<ObjectId> {
        if !self.is_container_visible(container_id) {
            return None;
        }
        let container = self.container(container_id).ok()?;
        for child in container.children().iter().rev() {
            let Ok(element) = self.element(*child) else {
                continue;
            };
            if !element.element_type().is_draggable() {
                continue;
            }
            if !self.absolute_rect(*child).is_ok_and(|rect| rect.contains(pos)) {
                continue;
            }
            let inner = self
                .linked_containers(*child)
                .into_iter()
                .rev()
                .find_map(|linked| self.element_at_in(linked, pos));
            return Some(inner.unwrap_or(*child));
        }
        None
    }

    /// Innermost container under `pos` that accepts `element_type`. Page
    /// bands are tried content first. Containers hosted by `excluded`
    /// elements (the ones being dragged) are never entered.
    pub fn container_at(&self, pos: Pos2, element_type: ElementType, excluded: &[ObjectId]) -> Option<ObjectId> {
        if element_type.is_watermark() {
            return Some(self.page.page);
        }
        for band in [self.page.content, self.page.footer, self.page.header] {
            if !self.is_inside(band, pos).unwrap_or(false) {
                continue;
            }
            if let Some(inner) = self.container_at_in(band, pos, element_type, excluded) {
                return Some(inner);
            }
            let allowed = self.container(band).is_ok_and(|c| c.is_element_allowed(element_type));
            return allowed.then_some(band);
        }
        None
    }

    fn container_at_in(
        &self,
        container_id: ObjectId,
        pos: Pos2,
        element_type: ElementType,
        excluded: &[ObjectId],
    ) -> Option<ObjectId> {
        let container = self.container(container_id).ok()?;
        for child in container.children().iter().rev() {
            if excluded.contains(child) {
                continue;
            }
            for linked in self.linked_containers(*child).into_iter().rev() {
                if !self.is_container_visible(linked) || !self.is_inside(linked, pos).unwrap_or(false) {
                    continue;
                }
                if let Some(inner) = self.container_at_in(linked, pos, element_type, excluded) {
                    return Some(inner);
                }
                if self.container(linked).is_ok_and(|c| c.is_element_allowed(element_type)) {
                    return Some(linked);
                }
            }
        }
        None
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(DocumentProperties::default())
    }
}

/// Border inset of a frame's interior; zero for everything else
fn frame_inset(element: &DocElement) -> f32 {
    match &element.kind {
        ElementKind::Frame {
            border: true,
            border_width,
            ..
        } => parse_number(border_width).max(0.0),
        _ => 0.0,
    }
}
