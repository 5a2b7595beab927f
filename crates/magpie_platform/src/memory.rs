//! In-memory host used by the test suites and the demo. Implements all
//! three host contracts and keeps enough logs for assertions.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::canvas::{Canvas, Rect};
use crate::id::{EditorId, FieldKey, ObjectHandle, TypeKey};
use crate::platform::{AssetPlatform, EditorFactory, FieldDecl, FieldReflect};

/// Body block reported for editors with no configured height.
const DEFAULT_BLOCK: (bool, f32) = (true, 40.0);

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Contents of one field slot.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// Ordered object references.
    Elements(Vec<ObjectHandle>),
    /// Plain display text.
    Text(String),
}

#[derive(Clone, Debug)]
struct FieldSlot {
    label: String,
    nested: bool,
    declared: TypeKey,
    value: FieldValue,
}

#[derive(Clone, Debug)]
struct Record {
    name: String,
    ty: TypeKey,
    parent: Option<ObjectHandle>,
    children: Vec<ObjectHandle>,
    fields: IndexMap<FieldKey, FieldSlot>,
}

/// Field mutation as observed by the host, for call-pattern assertions.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldOp {
    Replace {
        owner: ObjectHandle,
        field: FieldKey,
        len: usize,
    },
    Insert {
        owner: ObjectHandle,
        field: FieldKey,
        index: usize,
    },
    Remove {
        owner: ObjectHandle,
        field: FieldKey,
        index: usize,
    },
}

// ---------------------------------------------------------------------------
// Persistence snapshot
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ObjectSnapshot {
    id: u64,
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    fields: IndexMap<String, FieldSnapshot>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<ObjectSnapshot>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum FieldSnapshot {
    Text(String),
    Elements(Vec<u64>),
}

// ---------------------------------------------------------------------------
// MemoryHost
// ---------------------------------------------------------------------------

/// Reference implementation of the host platform. Object handles and editor
/// ids are issued monotonically and never reused.
pub struct MemoryHost {
    records: IndexMap<ObjectHandle, Record>,
    editors: IndexMap<EditorId, ObjectHandle>,
    blocks: IndexMap<ObjectHandle, (bool, f32)>,
    next_object: u64,
    next_editor: u64,
    asset_root: TypeKey,
    pub save_count: usize,
    pub saved_json: Option<String>,
    pub pinged: Vec<ObjectHandle>,
    pub field_log: Vec<FieldOp>,
    pub disposed_editors: Vec<EditorId>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::with_asset_root(TypeKey::from_static("Asset"))
    }

    pub fn with_asset_root(asset_root: TypeKey) -> Self {
        Self {
            records: IndexMap::new(),
            editors: IndexMap::new(),
            blocks: IndexMap::new(),
            next_object: 1,
            next_editor: 1,
            asset_root,
            save_count: 0,
            saved_json: None,
            pinged: Vec::new(),
            field_log: Vec::new(),
            disposed_editors: Vec::new(),
        }
    }

    /// Create a named object directly. Test fixture setup.
    pub fn spawn(&mut self, ty: &TypeKey, name: &str) -> ObjectHandle {
        let handle = self.create(ty);
        self.set_object_name(handle, name);
        handle
    }

    /// Declare a field slot on an existing object.
    pub fn add_field(
        &mut self,
        owner: ObjectHandle,
        field: FieldKey,
        label: &str,
        declared: TypeKey,
        nested: bool,
        value: FieldValue,
    ) {
        let Some(record) = self.records.get_mut(&owner) else {
            debug!("add_field on unknown object {owner}");
            return;
        };
        record.fields.insert(
            field,
            FieldSlot {
                label: label.to_string(),
                nested,
                declared,
                value,
            },
        );
    }

    /// Configure the body block reported by editors of `element`.
    pub fn set_block(&mut self, element: ObjectHandle, has_content: bool, height: f32) {
        self.blocks.insert(element, (has_content, height));
    }

    pub fn exists(&self, object: ObjectHandle) -> bool {
        self.records.contains_key(&object)
    }

    pub fn object_count(&self) -> usize {
        self.records.len()
    }

    pub fn object_type(&self, object: ObjectHandle) -> Option<TypeKey> {
        self.records.get(&object).map(|r| r.ty.clone())
    }

    pub fn children(&self, object: ObjectHandle) -> Vec<ObjectHandle> {
        self.records
            .get(&object)
            .map(|r| r.children.clone())
            .unwrap_or_default()
    }

    pub fn live_editors(&self) -> usize {
        self.editors.len()
    }

    fn snapshot_object(&self, object: ObjectHandle) -> Option<ObjectSnapshot> {
        let record = self.records.get(&object)?;
        let fields = record
            .fields
            .iter()
            .map(|(key, slot)| {
                let value = match &slot.value {
                    FieldValue::Text(text) => FieldSnapshot::Text(text.clone()),
                    FieldValue::Elements(elements) => {
                        FieldSnapshot::Elements(elements.iter().map(|e| e.raw()).collect())
                    }
                };
                (key.to_string(), value)
            })
            .collect();
        Some(ObjectSnapshot {
            id: object.raw(),
            name: record.name.clone(),
            type_name: record.ty.to_string(),
            fields,
            children: record
                .children
                .iter()
                .filter_map(|child| self.snapshot_object(*child))
                .collect(),
        })
    }
}

// ---------------------------------------------------------------------------
// AssetPlatform impl
// ---------------------------------------------------------------------------

impl AssetPlatform for MemoryHost {
    fn asset_root(&self) -> TypeKey {
        self.asset_root.clone()
    }

    fn create(&mut self, ty: &TypeKey) -> ObjectHandle {
        let handle = ObjectHandle::from_raw(self.next_object);
        self.next_object += 1;
        self.records.insert(
            handle,
            Record {
                name: String::new(),
                ty: ty.clone(),
                parent: None,
                children: Vec::new(),
                fields: IndexMap::new(),
            },
        );
        handle
    }

    fn destroy(&mut self, object: ObjectHandle) {
        let Some(record) = self.records.shift_remove(&object) else {
            debug!("destroy of unknown object {object}");
            return;
        };
        if let Some(parent) = record.parent {
            if let Some(parent_record) = self.records.get_mut(&parent) {
                parent_record.children.retain(|c| *c != object);
            }
        }
        for child in record.children {
            self.destroy(child);
        }
        for (editor, element) in &self.editors {
            if *element == object {
                warn!("object {object} destroyed while {editor} still targets it");
            }
        }
        self.blocks.shift_remove(&object);
    }

    fn attach_child(&mut self, child: ObjectHandle, owner: ObjectHandle) {
        if !self.records.contains_key(&child) || !self.records.contains_key(&owner) {
            debug!("attach_child with unknown object ({child} under {owner})");
            return;
        }
        if let Some(record) = self.records.get_mut(&child) {
            record.parent = Some(owner);
        }
        if let Some(record) = self.records.get_mut(&owner) {
            record.children.push(child);
        }
    }

    fn save(&mut self) {
        self.save_count += 1;
        let roots: Vec<ObjectSnapshot> = self
            .records
            .keys()
            .copied()
            .collect::<Vec<_>>()
            .into_iter()
            .filter(|h| self.records[h].parent.is_none())
            .filter_map(|h| self.snapshot_object(h))
            .collect();
        match serde_json::to_string_pretty(&roots) {
            Ok(json) => {
                info!("saved {} root object(s), save #{}", roots.len(), self.save_count);
                self.saved_json = Some(json);
            }
            Err(err) => warn!("failed to serialize asset tree: {err}"),
        }
    }

    fn ping(&mut self, object: ObjectHandle) {
        self.pinged.push(object);
    }

    fn object_name(&self, object: ObjectHandle) -> String {
        match self.records.get(&object) {
            Some(record) => record.name.clone(),
            None => {
                debug!("object_name of unknown object {object}");
                String::new()
            }
        }
    }

    fn set_object_name(&mut self, object: ObjectHandle, name: &str) {
        let Some(record) = self.records.get_mut(&object) else {
            debug!("set_object_name of unknown object {object}");
            return;
        };
        record.name = name.to_string();
    }
}

// ---------------------------------------------------------------------------
// FieldReflect impl
// ---------------------------------------------------------------------------

impl MemoryHost {
    fn slot(&self, owner: ObjectHandle, field: &FieldKey) -> Option<&FieldSlot> {
        self.records.get(&owner)?.fields.get(field)
    }

    fn slot_mut(&mut self, owner: ObjectHandle, field: &FieldKey) -> Option<&mut FieldSlot> {
        self.records.get_mut(&owner)?.fields.get_mut(field)
    }
}

impl FieldReflect for MemoryHost {
    fn fields(&self, owner: ObjectHandle) -> Vec<FieldDecl> {
        let Some(record) = self.records.get(&owner) else {
            return Vec::new();
        };
        record
            .fields
            .iter()
            .map(|(key, slot)| FieldDecl {
                field: key.clone(),
                label: slot.label.clone(),
                nested: slot.nested,
            })
            .collect()
    }

    fn declared_type(&self, owner: ObjectHandle, field: &FieldKey) -> TypeKey {
        match self.slot(owner, field) {
            Some(slot) => slot.declared.clone(),
            None => {
                debug!("declared_type of unknown field {owner}.{field}");
                self.asset_root.clone()
            }
        }
    }

    fn elements(&self, owner: ObjectHandle, field: &FieldKey) -> Vec<ObjectHandle> {
        match self.slot(owner, field).map(|slot| &slot.value) {
            Some(FieldValue::Elements(elements)) => elements.clone(),
            _ => Vec::new(),
        }
    }

    fn replace_elements(&mut self, owner: ObjectHandle, field: &FieldKey, elements: &[ObjectHandle]) {
        let Some(slot) = self.slot_mut(owner, field) else {
            debug!("replace_elements on unknown field {owner}.{field}");
            return;
        };
        slot.value = FieldValue::Elements(elements.to_vec());
        self.field_log.push(FieldOp::Replace {
            owner,
            field: field.clone(),
            len: elements.len(),
        });
    }

    fn list_insert(
        &mut self,
        owner: ObjectHandle,
        field: &FieldKey,
        index: usize,
        element: ObjectHandle,
    ) {
        let Some(slot) = self.slot_mut(owner, field) else {
            debug!("list_insert on unknown field {owner}.{field}");
            return;
        };
        let FieldValue::Elements(elements) = &mut slot.value else {
            debug!("list_insert on non-collection field {owner}.{field}");
            return;
        };
        let index = index.min(elements.len());
        elements.insert(index, element);
        self.field_log.push(FieldOp::Insert {
            owner,
            field: field.clone(),
            index,
        });
    }

    fn list_remove(
        &mut self,
        owner: ObjectHandle,
        field: &FieldKey,
        index: usize,
    ) -> Option<ObjectHandle> {
        let Some(slot) = self.slot_mut(owner, field) else {
            debug!("list_remove on unknown field {owner}.{field}");
            return None;
        };
        let FieldValue::Elements(elements) = &mut slot.value else {
            debug!("list_remove on non-collection field {owner}.{field}");
            return None;
        };
        if index >= elements.len() {
            debug!("list_remove index {index} out of range for {owner}.{field}");
            return None;
        }
        let removed = elements.remove(index);
        self.field_log.push(FieldOp::Remove {
            owner,
            field: field.clone(),
            index,
        });
        Some(removed)
    }

    fn value_text(&self, owner: ObjectHandle, field: &FieldKey) -> String {
        match self.slot(owner, field).map(|slot| &slot.value) {
            Some(FieldValue::Text(text)) => text.clone(),
            Some(FieldValue::Elements(elements)) => format!("{} element(s)", elements.len()),
            None => String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// EditorFactory impl
// ---------------------------------------------------------------------------

impl EditorFactory for MemoryHost {
    fn create_editor(&mut self, element: ObjectHandle) -> EditorId {
        let id = EditorId::from_raw(self.next_editor);
        self.next_editor += 1;
        self.editors.insert(id, element);
        id
    }

    fn editor_block(&self, editor: EditorId) -> (bool, f32) {
        let Some(element) = self.editors.get(&editor) else {
            return (false, 0.0);
        };
        self.blocks.get(element).copied().unwrap_or(DEFAULT_BLOCK)
    }

    fn render_editor(&mut self, editor: EditorId, canvas: &mut dyn Canvas, rect: Rect) {
        let Some(element) = self.editors.get(&editor).copied() else {
            debug!("render of unknown {editor}");
            return;
        };
        let name = self.object_name(element);
        canvas.label(rect, &format!("{editor}: {name}"));
    }

    fn dispose_editor(&mut self, editor: EditorId) {
        if self.editors.shift_remove(&editor).is_none() {
            debug!("dispose of unknown {editor}");
            return;
        }
        self.disposed_editors.push(editor);
    }
}

// ---------------------------------------------------------------------------
// RecordingCanvas
// ---------------------------------------------------------------------------

/// Primitive call recorded by [`RecordingCanvas`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Label {
        rect: Rect,
        text: String,
    },
    Foldout {
        rect: Rect,
        label: String,
        expanded: bool,
    },
    ObjectField {
        rect: Rect,
        object: Option<ObjectHandle>,
        display: String,
    },
    TextField {
        rect: Rect,
        text: String,
    },
    Popup {
        rect: Rect,
        selected: usize,
        options: Vec<String>,
    },
    Button {
        rect: Rect,
        label: String,
    },
    HelpBox {
        rect: Rect,
        message: String,
    },
}

/// Scripted user input, consumed by the first matching primitive.
#[derive(Clone, Debug)]
pub enum Interaction {
    /// Click the button with this label.
    Click(String),
    /// Pick this index in the next popup.
    Pick(usize),
    /// Toggle the foldout with this label.
    Toggle(String),
    /// Commit new text in the field currently showing `old`.
    Edit { old: String, new: String },
}

/// Canvas that records every draw call and replays scripted interactions.
#[derive(Default)]
pub struct RecordingCanvas {
    pub ops: Vec<DrawOp>,
    pending: Vec<Interaction>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue input for the next pass.
    pub fn interact(&mut self, interaction: Interaction) {
        self.pending.push(interaction);
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// Interactions that no primitive consumed.
    pub fn unconsumed(&self) -> usize {
        self.pending.len()
    }

    fn take_where<F: Fn(&Interaction) -> bool>(&mut self, pred: F) -> Option<Interaction> {
        let pos = self.pending.iter().position(pred)?;
        Some(self.pending.remove(pos))
    }
}

impl Canvas for RecordingCanvas {
    fn label(&mut self, rect: Rect, text: &str) {
        self.ops.push(DrawOp::Label {
            rect,
            text: text.to_string(),
        });
    }

    fn foldout(&mut self, rect: Rect, label: &str, expanded: bool) -> bool {
        self.ops.push(DrawOp::Foldout {
            rect,
            label: label.to_string(),
            expanded,
        });
        let toggled = self
            .take_where(|i| matches!(i, Interaction::Toggle(l) if l == label))
            .is_some();
        if toggled { !expanded } else { expanded }
    }

    fn object_field(&mut self, rect: Rect, object: Option<ObjectHandle>, display: &str) {
        self.ops.push(DrawOp::ObjectField {
            rect,
            object,
            display: display.to_string(),
        });
    }

    fn text_field(&mut self, rect: Rect, text: &str) -> Option<String> {
        self.ops.push(DrawOp::TextField {
            rect,
            text: text.to_string(),
        });
        match self.take_where(|i| matches!(i, Interaction::Edit { old, .. } if old == text)) {
            Some(Interaction::Edit { new, .. }) => Some(new),
            _ => None,
        }
    }

    fn popup(&mut self, rect: Rect, selected: usize, options: &[String]) -> Option<usize> {
        self.ops.push(DrawOp::Popup {
            rect,
            selected,
            options: options.to_vec(),
        });
        match self.take_where(|i| matches!(i, Interaction::Pick(_))) {
            Some(Interaction::Pick(index)) => Some(index),
            _ => None,
        }
    }

    fn button(&mut self, rect: Rect, label: &str) -> bool {
        self.ops.push(DrawOp::Button {
            rect,
            label: label.to_string(),
        });
        self.take_where(|i| matches!(i, Interaction::Click(l) if l == label))
            .is_some()
    }

    fn help_box(&mut self, rect: Rect, message: &str) {
        self.ops.push(DrawOp::HelpBox {
            rect,
            message: message.to_string(),
        });
    }
}
