//! Designer controller: the edited document, its history and the selection.

use crate::binding::{DocumentBindings, ResolvedElement};
use crate::document::{Configuration, Document, DocumentError, ElementSnapshot, starter_elements};
use crate::elements::{Element, ElementId, ElementKind, ElementPatch};
use crate::gesture::{Gesture, GestureKind};
use crate::history::History;
use crate::settings::{DesignerSettings, SettingsError};
use crate::storage::Template;
use crate::transform::{
    HorizontalAlignment, ResizeHandle, RotationDirection, TransformResult, Viewport, align_position, rotate_step,
};
use kurbo::Point;
use serde_json::Value;

/// One editing session over a label document.
///
/// Every structural or geometric change ends with a history commit. Commits
/// are suppressed until [`Designer::initialize`] has run.
#[derive(Debug, Clone)]
pub struct Designer {
    document: Document,
    history: History<ElementSnapshot>,
    selection: Option<ElementId>,
    gesture: Option<Gesture>,
    settings: DesignerSettings,
    initialized: bool,
}

impl Default for Designer {
    fn default() -> Self {
        Self::new()
    }
}

impl Designer {
    /// Create an uninitialized designer over an empty document.
    pub fn new() -> Self {
        Self::from_valid_settings(DesignerSettings::default())
    }

    /// Create an uninitialized designer with custom settings.
    pub fn with_settings(settings: DesignerSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self::from_valid_settings(settings))
    }

    fn from_valid_settings(settings: DesignerSettings) -> Self {
        let document = Document::default();
        Self {
            history: History::with_capacity(document.snapshot(), settings.history_capacity),
            document,
            selection: None,
            gesture: None,
            settings,
            initialized: false,
        }
    }

    /// Create a ready designer over an existing document, without seeding.
    pub fn with_document(document: Document) -> Result<Self, DocumentError> {
        document.validate()?;
        let mut designer = Self::new();
        designer.replace_document(document);
        Ok(designer)
    }

    /// Seed the starter layout if the document is empty and start recording
    /// history. Runs once; later calls do nothing.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        if self.document.is_empty() {
            for element in starter_elements() {
                self.document.push(element);
            }
            log::debug!("Seeded starter layout with {} elements", self.document.len());
        }
        self.history.reset(self.document.snapshot());
        self.initialized = true;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn settings(&self) -> &DesignerSettings {
        &self.settings
    }

    /// Get an element by ID.
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.document.get(id)
    }

    /// Elements back to front.
    pub fn paint_order(&self) -> Vec<&Element> {
        self.document.paint_order()
    }

    pub fn configuration(&self) -> &Configuration {
        &self.document.config
    }

    /// Replace the page configuration. History covers elements only, so
    /// this does not commit.
    pub fn set_configuration(&mut self, config: Configuration) {
        self.document.config = config;
    }

    fn commit(&mut self) {
        if !self.initialized {
            log::debug!("Commit suppressed before initialization");
            return;
        }
        self.history.commit(self.document.snapshot());
    }

    // --- Selection ---

    /// The selected element ID.
    pub fn selection(&self) -> Option<&ElementId> {
        self.selection.as_ref()
    }

    /// The selected element, read fresh from the document.
    pub fn selected_element(&self) -> Option<&Element> {
        self.selection.as_ref().and_then(|id| self.document.get(id))
    }

    /// Select an element, or clear the selection with `None`.
    /// Unknown IDs leave the selection unchanged.
    pub fn set_selection(&mut self, id: Option<ElementId>) {
        match id {
            Some(id) if self.document.contains(&id) => self.selection = Some(id),
            Some(id) => log::debug!("Ignoring selection of unknown element {id}"),
            None => self.selection = None,
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn is_selected(&self, id: &ElementId) -> bool {
        self.selection.as_ref() == Some(id)
    }

    // --- Element operations ---

    /// Add an element of `kind` at `position`, select it and commit.
    pub fn add(&mut self, kind: ElementKind, position: Point) -> ElementId {
        let z_index = self.document.len() as u32 + 1;
        let element = Element::new(kind, position).with_z_index(z_index);
        let id = element.id.clone();
        self.document.push(element);
        self.selection = Some(id.clone());
        self.commit();
        id
    }

    /// Merge `patch` into an element and commit.
    /// Returns false if the element does not exist.
    pub fn update(&mut self, id: &ElementId, patch: &ElementPatch) -> bool {
        let Some(element) = self.document.get_mut(id) else {
            return false;
        };
        element.apply_patch(patch);
        self.commit();
        true
    }

    /// Remove an element and commit.
    pub fn remove(&mut self, id: &ElementId) -> bool {
        if self.document.remove(id).is_none() {
            return false;
        }
        if self.is_selected(id) {
            self.selection = None;
        }
        if self.gesture.as_ref().is_some_and(|g| &g.element_id == id) {
            self.gesture = None;
        }
        self.commit();
        true
    }

    /// Copy an element under a new ID, offset and on top; selects the copy.
    pub fn duplicate(&mut self, id: &ElementId) -> Option<ElementId> {
        let mut copy = self.document.get(id)?.clone();
        let offset = self.settings.duplicate_offset;
        copy.id = ElementId::new();
        copy.position = Point::new(
            (copy.position.x + offset).clamp(0.0, 100.0),
            (copy.position.y + offset).clamp(0.0, 100.0),
        );
        copy.z_index = self.next_top_z_index();
        let copy_id = copy.id.clone();
        self.document.push(copy);
        self.selection = Some(copy_id.clone());
        self.commit();
        Some(copy_id)
    }

    /// Show or hide an element.
    pub fn toggle_visibility(&mut self, id: &ElementId, visible: bool) -> bool {
        self.update(id, &ElementPatch::new().visible(visible))
    }

    /// Move `active` to the list position of `over`.
    pub fn reorder(&mut self, active: &ElementId, over: &ElementId) -> bool {
        if !self.document.reorder(active, over) {
            return false;
        }
        self.commit();
        true
    }

    /// Rotate an element a quarter turn.
    pub fn rotate(&mut self, id: &ElementId, direction: RotationDirection) -> bool {
        let Some(element) = self.document.get_mut(id) else {
            return false;
        };
        element.rotation = rotate_step(element.rotation, direction);
        self.commit();
        true
    }

    /// Align an element horizontally on the page.
    pub fn align(&mut self, id: &ElementId, alignment: HorizontalAlignment) -> bool {
        let Some(element) = self.document.get_mut(id) else {
            return false;
        };
        element.position.x = align_position(alignment, element.size.width);
        self.commit();
        true
    }

    /// The z-index just above the current top, compacting the stack when
    /// the top is already at `u32::MAX`.
    fn next_top_z_index(&mut self) -> u32 {
        if self.document.max_z_index() == u32::MAX {
            log::debug!("z-index range exhausted; compacting the stack");
            self.document.compact_z_indices();
        }
        self.document.max_z_index().saturating_add(1)
    }

    /// Put an element above every other element.
    pub fn bring_to_front(&mut self, id: &ElementId) -> bool {
        if !self.document.contains(id) {
            return false;
        }
        let top = self.next_top_z_index();
        let Some(element) = self.document.get_mut(id) else {
            return false;
        };
        element.z_index = top;
        self.commit();
        true
    }

    /// Put an element below every other element.
    pub fn send_to_back(&mut self, id: &ElementId) -> bool {
        if !self.document.contains(id) {
            return false;
        }
        if self.document.max_z_index() == u32::MAX {
            self.document.compact_z_indices();
        }
        // z-index 1 is the floor, so lift everything else one step
        let others: Vec<ElementId> = self
            .document
            .elements()
            .filter(|element| &element.id != id)
            .map(|element| element.id.clone())
            .collect();
        for other in &others {
            if let Some(element) = self.document.get_mut(other) {
                element.z_index = element.z_index.saturating_add(1);
            }
        }
        if let Some(element) = self.document.get_mut(id) {
            element.z_index = 1;
        }
        self.commit();
        true
    }

    // --- History ---

    /// Step back one commit. Clears the selection and drops any gesture.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.document.restore(snapshot);
        self.selection = None;
        self.gesture = None;
        true
    }

    /// Step forward one commit. Clears the selection and drops any gesture.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.document.restore(snapshot);
        self.selection = None;
        self.gesture = None;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Number of retained history entries.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    // --- Gestures ---

    /// Start dragging an element. Locked or missing elements refuse.
    pub fn begin_drag(&mut self, id: &ElementId, pointer: Point) -> bool {
        self.begin_gesture(id, GestureKind::Drag, pointer)
    }

    /// Start resizing an element from `handle`. Locked or missing elements refuse.
    pub fn begin_resize(&mut self, id: &ElementId, handle: ResizeHandle, pointer: Point) -> bool {
        self.begin_gesture(id, GestureKind::Resize(handle), pointer)
    }

    fn begin_gesture(&mut self, id: &ElementId, kind: GestureKind, pointer: Point) -> bool {
        match self.document.get(id) {
            None => return false,
            Some(element) if element.locked => {
                log::debug!("Element {id} is locked");
                return false;
            }
            Some(_) => {}
        }
        if self.gesture.is_some() {
            log::debug!("Starting a gesture while another is active; cancelling the old one");
            self.cancel_gesture();
        }
        let Some(element) = self.document.get(id) else {
            return false;
        };
        self.gesture = Some(Gesture::new(element, kind, pointer));
        self.selection = Some(id.clone());
        true
    }

    /// The active gesture, if any.
    pub fn gesture(&self) -> Option<&Gesture> {
        self.gesture.as_ref()
    }

    pub fn is_gesture_active(&self) -> bool {
        self.gesture.is_some()
    }

    /// Apply a pointer move to the live document without committing.
    ///
    /// Returns `Ok(false)` when no gesture is active.
    pub fn update_gesture(&mut self, pointer: Point, viewport: &Viewport) -> TransformResult<bool> {
        let Some(gesture) = self.gesture.as_mut() else {
            return Ok(false);
        };
        let frame = gesture.frame_at(pointer, viewport, &self.settings)?;
        gesture.current_pointer = pointer;
        let id = gesture.element_id.clone();
        match self.document.get_mut(&id) {
            Some(element) => {
                element.position = frame.position;
                element.size = frame.size;
                Ok(true)
            }
            None => {
                self.gesture = None;
                Ok(false)
            }
        }
    }

    /// Finish the gesture with one history commit.
    pub fn end_gesture(&mut self) -> bool {
        if self.gesture.take().is_none() {
            return false;
        }
        self.commit();
        true
    }

    /// Abort the gesture, restoring the element as it was at pointer-down.
    pub fn cancel_gesture(&mut self) -> bool {
        let Some(gesture) = self.gesture.take() else {
            return false;
        };
        if let Some(element) = self.document.get_mut(&gesture.element_id) {
            *element = gesture.original;
        }
        true
    }

    // --- Templates & preview ---

    /// Capture the document as a template (without id or timestamps).
    pub fn to_template(&self, name: impl Into<String>) -> Template {
        Template::from_document(name, &self.document)
    }

    /// Replace the document with a template's contents and reset history.
    ///
    /// A template with duplicate element ids is refused and the current
    /// document is kept.
    pub fn load_template(&mut self, template: &Template) -> Result<(), DocumentError> {
        let document = template.to_document();
        document.validate()?;
        self.replace_document(document);
        Ok(())
    }

    fn replace_document(&mut self, document: Document) {
        self.document = document;
        self.selection = None;
        self.gesture = None;
        self.history.reset(self.document.snapshot());
        self.initialized = true;
    }

    /// Resolve every element against an order record, back to front.
    pub fn resolve_preview(&self, record: &Value) -> Vec<ResolvedElement<'_>> {
        DocumentBindings::compile(&self.document).resolve(record)
    }
}
