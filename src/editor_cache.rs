//! Per-element sub-editor cache, keyed by object identity. Exclusively
//! owned by one mediator or drawer; entries must be released through the
//! host before the elements they target go away.

use indexmap::IndexMap;
use magpie_platform::{EditorFactory, EditorId, ObjectHandle};
use tracing::{debug, warn};

#[derive(Default)]
pub struct NestedEditorCache {
    entries: IndexMap<ObjectHandle, EditorId>,
}

impl NestedEditorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, element: ObjectHandle) -> Option<EditorId> {
        self.entries.get(&element).copied()
    }

    /// The cached editor for `element`, creating it on first request.
    pub fn get_or_create(
        &mut self,
        host: &mut dyn EditorFactory,
        element: ObjectHandle,
    ) -> EditorId {
        if let Some(editor) = self.entries.get(&element) {
            return *editor;
        }
        let editor = host.create_editor(element);
        debug!("created {editor} for element {element}");
        self.entries.insert(element, editor);
        editor
    }

    /// Dispose and forget the editor for `element`, if one was ever created.
    /// Must run before the element itself is destroyed.
    pub fn release(&mut self, host: &mut dyn EditorFactory, element: ObjectHandle) -> bool {
        match self.entries.shift_remove(&element) {
            Some(editor) => {
                host.dispose_editor(editor);
                true
            }
            None => false,
        }
    }

    pub fn release_all(&mut self, host: &mut dyn EditorFactory) {
        for (_, editor) in self.entries.drain(..) {
            host.dispose_editor(editor);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Drop for NestedEditorCache {
    fn drop(&mut self) {
        if !self.entries.is_empty() {
            warn!(
                "editor cache dropped with {} live editor(s); dispose was skipped",
                self.entries.len()
            );
        }
    }
}
