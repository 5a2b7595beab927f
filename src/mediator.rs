//! The live binding between one polymorphic-collection field and its
//! editing surface. Structural edits requested mid-pass are queued and
//! applied at the top of the next pass, so one pass always lays out and
//! paints against a single row snapshot.

use std::sync::Arc;

use indexmap::IndexSet;
use magpie_platform::tokens;
use magpie_platform::{Canvas, FieldKey, Host, ObjectHandle, Rect, Shape, TypeKey};
use magpie_registry::TypeRegistry;
use tracing::debug;

use crate::editor_cache::NestedEditorCache;
use crate::factory::ElementFactory;
use crate::list_view::{ListDelegate, ListFeatures};
use crate::rows::{PassSnapshot, RowSnapshot};
use crate::store::{ElementSeq, bind_seq};

// ---------------------------------------------------------------------------
// Binding
// ---------------------------------------------------------------------------

/// The field a mediator edits. Fixed at construction.
#[derive(Clone, Debug)]
pub struct CollectionBinding {
    pub owner: ObjectHandle,
    pub field: FieldKey,
    pub shape: Shape,
    /// Common ancestor every element must derive from.
    pub base: TypeKey,
    pub label: String,
}

// ---------------------------------------------------------------------------
// Expansion ledger
// ---------------------------------------------------------------------------

/// Expanded/collapsed flags keyed by element identity, so removal and
/// reorder never shift another element's state.
#[derive(Debug, Default)]
pub struct ExpansionLedger {
    expanded: IndexSet<ObjectHandle>,
}

impl ExpansionLedger {
    pub fn is_expanded(&self, element: ObjectHandle) -> bool {
        self.expanded.contains(&element)
    }

    pub fn set(&mut self, element: ObjectHandle, expanded: bool) {
        if expanded {
            self.expanded.insert(element);
        } else {
            self.expanded.shift_remove(&element);
        }
    }

    pub fn prune(&mut self, element: ObjectHandle) {
        self.expanded.shift_remove(&element);
    }

    pub fn clear(&mut self) {
        self.expanded.clear();
    }
}

// ---------------------------------------------------------------------------
// Deferred edits
// ---------------------------------------------------------------------------

/// Structural edit queued by a widget trigger, applied between passes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditOp {
    Append { type_name: String },
    Remove { index: usize },
    Move { from: usize, to: usize },
}

// ---------------------------------------------------------------------------
// CollectionMediator
// ---------------------------------------------------------------------------

pub struct CollectionMediator {
    binding: CollectionBinding,
    registry: Arc<TypeRegistry>,
    seq: Box<dyn ElementSeq>,
    factory: ElementFactory,
    editors: NestedEditorCache,
    expansion: ExpansionLedger,
    queued: Vec<EditOp>,
    snapshot: PassSnapshot,
    /// Footer popup pick. Survives across frames; reset when out of range.
    picked: usize,
    /// Row reported by the widget's change callback. Diagnostics only;
    /// removal keys strictly on the index handed to `remove_at`.
    last_changed: Option<usize>,
}

impl CollectionMediator {
    pub fn new(binding: CollectionBinding, registry: Arc<TypeRegistry>) -> Self {
        let seq = bind_seq(binding.owner, binding.field.clone(), binding.shape);
        let factory = ElementFactory::new(binding.base.clone(), binding.owner);
        Self {
            binding,
            registry,
            seq,
            factory,
            editors: NestedEditorCache::new(),
            expansion: ExpansionLedger::default(),
            queued: Vec::new(),
            snapshot: PassSnapshot::default(),
            picked: 0,
            last_changed: None,
        }
    }

    pub fn binding(&self) -> &CollectionBinding {
        &self.binding
    }

    pub fn snapshot(&self) -> &PassSnapshot {
        &self.snapshot
    }

    pub fn is_expanded(&self, element: ObjectHandle) -> bool {
        self.expansion.is_expanded(element)
    }

    pub fn set_expanded(&mut self, element: ObjectHandle, expanded: bool) {
        self.expansion.set(element, expanded);
    }

    pub fn queued_edits(&self) -> usize {
        self.queued.len()
    }

    pub fn last_changed(&self) -> Option<usize> {
        self.last_changed
    }

    // -- pass protocol ------------------------------------------------------

    /// Apply every queued structural edit, then snapshot the rows the
    /// upcoming layout and paint will both read. Sub-editors are fetched
    /// lazily, only for expanded rows.
    pub fn begin_pass<H: Host>(&mut self, host: &mut H) {
        for op in std::mem::take(&mut self.queued) {
            match op {
                EditOp::Append { type_name } => {
                    self.append(host, &type_name);
                }
                EditOp::Remove { index } => {
                    self.remove_at(host, index);
                }
                EditOp::Move { from, to } => {
                    self.move_element(host, from, to);
                }
            }
        }

        let mut rows = Vec::new();
        for handle in self.seq.snapshot(host) {
            let expanded = self.expansion.is_expanded(handle);
            let block = if expanded {
                let editor = self.editors.get_or_create(host, handle);
                let (has_content, height) = host.editor_block(editor);
                has_content.then_some((editor, height))
            } else {
                None
            };
            rows.push(RowSnapshot {
                handle,
                expanded,
                block,
            });
        }
        self.snapshot = PassSnapshot { rows };
    }

    /// Height of the current pass's rows. Chrome (header, footer) belongs to
    /// the hosting widget.
    pub fn total_height(&self) -> f32 {
        self.snapshot.total_height()
    }

    // -- structural operations ---------------------------------------------

    /// Build an element of the concrete type named `type_name` and place it
    /// last. Unknown names change nothing.
    pub fn append<H: Host>(&mut self, host: &mut H, type_name: &str) -> bool {
        let element = match self.factory.create(host, &self.registry, type_name) {
            Ok(element) => element,
            Err(err) => {
                debug!("append ignored: {err}");
                return false;
            }
        };
        self.seq.push(host, element);
        host.save();
        true
    }

    /// Remove the element at exactly `index`: release its sub-editor, shrink
    /// the collection, drop its expansion entry, destroy its storage.
    /// Out-of-range indices change nothing.
    pub fn remove_at<H: Host>(&mut self, host: &mut H, index: usize) -> bool {
        let Some(element) = self.seq.get(host, index) else {
            debug!("remove_at ignored, index {index} is stale");
            return false;
        };
        self.editors.release(host, element);
        self.seq.remove_at(host, index);
        self.expansion.prune(element);
        host.destroy(element);
        host.save();
        true
    }

    /// Set the element's display name. Saves and pings only on an actual
    /// change.
    pub fn rename<H: Host>(&mut self, host: &mut H, element: ObjectHandle, new_name: &str) {
        if host.object_name(element) == new_name {
            return;
        }
        host.set_object_name(element, new_name);
        host.save();
        host.ping(element);
    }

    /// Reorder by index. Identity-keyed expansion state and cached editors
    /// are untouched and stay valid.
    pub fn move_element<H: Host>(&mut self, host: &mut H, from: usize, to: usize) -> bool {
        if !self.seq.move_to(host, from, to) {
            debug!("move ignored ({from} -> {to})");
            return false;
        }
        host.save();
        true
    }

    /// Release every cached sub-editor and forget all expansion state.
    pub fn dispose<H: Host>(&mut self, host: &mut H) {
        self.editors.release_all(host);
        self.expansion.clear();
        self.queued.clear();
        self.snapshot = PassSnapshot::default();
    }
}

// ---------------------------------------------------------------------------
// ListDelegate impl: the widget-facing surface
// ---------------------------------------------------------------------------

impl<H: Host> ListDelegate<H> for CollectionMediator {
    fn row_count(&self) -> usize {
        self.snapshot.len()
    }

    fn element_height(&self, index: usize) -> f32 {
        match self.snapshot.row(index) {
            Some(row) => row.height(),
            None => tokens::ROW_HEIGHT,
        }
    }

    fn draw_header(&mut self, canvas: &mut dyn Canvas, rect: Rect) {
        canvas.label(rect.with_height(tokens::LINE_HEIGHT), &self.binding.label);
    }

    fn draw_element(&mut self, canvas: &mut dyn Canvas, host: &mut H, index: usize, rect: Rect) {
        let Some(row) = self.snapshot.row(index) else {
            debug!("draw_element for stale index {index}");
            return;
        };

        let line = rect.with_height(tokens::LINE_HEIGHT);
        let (fold_rect, columns) = line.split_left(tokens::LABEL_WIDTH, tokens::COLUMN_SPACE);
        let weight_sum = tokens::OBJECT_WEIGHT + tokens::NAME_WEIGHT;
        let object_width =
            (columns.width - tokens::COLUMN_SPACE) * tokens::OBJECT_WEIGHT / weight_sum;
        let (object_rect, name_rect) = columns.split_left(object_width, tokens::COLUMN_SPACE);

        let expanded = canvas.foldout(fold_rect, &format!("Element {index}"), row.expanded);
        if expanded != row.expanded {
            self.expansion.set(row.handle, expanded);
        }

        let name = host.object_name(row.handle);
        canvas.object_field(object_rect, Some(row.handle), &format!("{name} ({})", row.handle));
        if let Some(new_name) = canvas.text_field(name_rect, &name) {
            self.rename(host, row.handle, &new_name);
        }

        // Body follows the snapshot, not this frame's toggle.
        if let Some((editor, height)) = row.block {
            let body = rect.offset_y(tokens::ROW_HEIGHT).with_height(height);
            host.render_editor(editor, canvas, body);
        }
    }

    fn draw_footer(
        &mut self,
        canvas: &mut dyn Canvas,
        rect: Rect,
        selected: Option<usize>,
        features: ListFeatures,
    ) {
        let names = self.registry.concrete_types(&self.binding.base).names.clone();
        if self.picked >= names.len() {
            self.picked = 0;
        }

        let line = rect.with_height(tokens::LINE_HEIGHT);
        let button_width =
            ((rect.width - tokens::FOOTER_MARGIN) / 2.0).min(tokens::FOOTER_BUTTON_MAX);
        let popup_width = (line.width - 2.0 * (button_width + tokens::COLUMN_SPACE)).max(0.0);
        let (popup_rect, buttons) = line.split_left(popup_width, tokens::COLUMN_SPACE);
        let (add_rect, remove_rect) = buttons.split_left(button_width, tokens::COLUMN_SPACE);

        if let Some(pick) = canvas.popup(popup_rect, self.picked, &names) {
            // Host popups can report indices past the option list.
            self.picked = if pick < names.len() { pick } else { 0 };
        }

        if features.contains(ListFeatures::ADD_BUTTON)
            && canvas.button(add_rect, "+")
            && let Some(name) = names.get(self.picked).cloned()
        {
            ListDelegate::<H>::add_requested(self, &name);
        }

        if features.contains(ListFeatures::REMOVE_BUTTON) && canvas.button(remove_rect, "-") {
            match selected {
                Some(index) => ListDelegate::<H>::remove_requested(self, index),
                None => debug!("remove ignored, no row selected"),
            }
        }
    }

    fn on_changed(&mut self, index: usize) {
        self.last_changed = Some(index);
    }

    fn add_requested(&mut self, type_name: &str) {
        debug!("queued append of `{type_name}`");
        self.queued.push(EditOp::Append {
            type_name: type_name.to_string(),
        });
    }

    fn remove_requested(&mut self, index: usize) {
        debug!("queued removal of row {index}");
        self.queued.push(EditOp::Remove { index });
    }

    fn reorder_requested(&mut self, from: usize, to: usize) {
        debug!("queued move {from} -> {to}");
        self.queued.push(EditOp::Move { from, to });
    }
}
