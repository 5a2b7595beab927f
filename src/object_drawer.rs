//! Inline foldout drawer for a field holding one asset reference: foldout,
//! read-only reference, and a lazily cached nested editor for the target.

use magpie_platform::tokens;
use magpie_platform::{Canvas, EditorId, FieldKey, Host, ObjectHandle, Rect};
use tracing::debug;

use crate::editor_cache::NestedEditorCache;

pub struct ObjectDrawer {
    field: FieldKey,
    label: String,
    expanded: bool,
    /// Pass snapshot: the referenced object and, when expanded, its editor
    /// body. Height and paint both read these.
    target: Option<ObjectHandle>,
    block: Option<(EditorId, f32)>,
    editors: NestedEditorCache,
}

impl ObjectDrawer {
    pub fn new(field: FieldKey, label: impl Into<String>) -> Self {
        Self {
            field,
            label: label.into(),
            expanded: false,
            target: None,
            block: None,
            editors: NestedEditorCache::new(),
        }
    }

    pub fn field(&self) -> &FieldKey {
        &self.field
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
    }

    /// Refresh the target reference and editor block for the coming pass.
    /// A retargeted field releases the old target's editor.
    pub fn begin_pass<H: Host>(&mut self, host: &mut H, owner: ObjectHandle) {
        let target = host.elements(owner, &self.field).first().copied();
        if self.target != target
            && let Some(old) = self.target
        {
            debug!("field {} retargeted, releasing old editor", self.field);
            self.editors.release(host, old);
        }
        self.target = target;

        self.block = match (self.expanded, target) {
            (true, Some(target)) => {
                let editor = self.editors.get_or_create(host, target);
                let (has_content, height) = host.editor_block(editor);
                has_content.then_some((editor, height))
            }
            _ => None,
        };
    }

    /// Foldout row plus, when an editor body is present, its height and one
    /// row of padding.
    pub fn height(&self) -> f32 {
        match self.block {
            Some((_, body)) => tokens::ROW_HEIGHT + body + tokens::ROW_HEIGHT,
            None => tokens::ROW_HEIGHT,
        }
    }

    /// Draw one pass. Returns the consumed height, equal to [`height`] for
    /// the same pass; a foldout toggle takes effect next pass.
    ///
    /// [`height`]: ObjectDrawer::height
    pub fn draw<H: Host>(&mut self, canvas: &mut dyn Canvas, host: &mut H, rect: Rect) -> f32 {
        let line = rect.with_height(tokens::LINE_HEIGHT);
        let (fold_rect, object_rect) = line.split_left(tokens::LABEL_WIDTH, tokens::COLUMN_SPACE);

        self.expanded = canvas.foldout(fold_rect, &self.label, self.expanded);
        let display = match self.target {
            Some(target) => format!("{} ({target})", host.object_name(target)),
            None => "None".to_string(),
        };
        canvas.object_field(object_rect, self.target, &display);

        if let Some((editor, body)) = self.block {
            let body_rect = rect.offset_y(tokens::ROW_HEIGHT).with_height(body);
            host.render_editor(editor, canvas, body_rect);
        }
        self.height()
    }

    pub fn dispose<H: Host>(&mut self, host: &mut H) {
        self.editors.release_all(host);
        self.target = None;
        self.block = None;
    }
}
