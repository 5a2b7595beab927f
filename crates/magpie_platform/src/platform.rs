use crate::canvas::{Canvas, Rect};
use crate::id::{EditorId, FieldKey, ObjectHandle, TypeKey};

/// One inspectable field on an object, as reported by the reflection provider.
#[derive(Clone, Debug)]
pub struct FieldDecl {
    pub field: FieldKey,
    /// Human-facing label shown next to the field.
    pub label: String,
    /// Field opted in to nested-object editing.
    pub nested: bool,
}

// ---------------------------------------------------------------------------
// AssetPlatform
// ---------------------------------------------------------------------------

/// Object and persistence services of the host platform.
///
/// `save` and `ping` are fire-and-forget; persistence failures stay on the
/// host side and never propagate into the edit path.
pub trait AssetPlatform {
    /// The universal base type of persisted objects.
    fn asset_root(&self) -> TypeKey;

    /// Create a blank persisted object of `ty` with an empty name.
    fn create(&mut self, ty: &TypeKey) -> ObjectHandle;

    /// Destroy `object` and everything persisted under it.
    fn destroy(&mut self, object: ObjectHandle);

    /// Persist `child` inside `owner`'s storage.
    fn attach_child(&mut self, child: ObjectHandle, owner: ObjectHandle);

    fn save(&mut self);

    /// Highlight `object` in the host UI.
    fn ping(&mut self, object: ObjectHandle);

    fn object_name(&self, object: ObjectHandle) -> String;

    fn set_object_name(&mut self, object: ObjectHandle, name: &str);
}

// ---------------------------------------------------------------------------
// FieldReflect
// ---------------------------------------------------------------------------

/// Field reflection over inspected objects.
pub trait FieldReflect {
    /// All inspectable fields of `owner`, in declaration order.
    fn fields(&self, owner: ObjectHandle) -> Vec<FieldDecl>;

    fn declared_type(&self, owner: ObjectHandle, field: &FieldKey) -> TypeKey;

    /// Snapshot of the element references stored in a collection field.
    fn elements(&self, owner: ObjectHandle, field: &FieldKey) -> Vec<ObjectHandle>;

    /// Overwrite the whole collection value. Fixed-array mutation path.
    fn replace_elements(&mut self, owner: ObjectHandle, field: &FieldKey, elements: &[ObjectHandle]);

    /// Insert into a growable list in place.
    fn list_insert(
        &mut self,
        owner: ObjectHandle,
        field: &FieldKey,
        index: usize,
        element: ObjectHandle,
    );

    /// Remove from a growable list in place. Returns the removed reference.
    fn list_remove(
        &mut self,
        owner: ObjectHandle,
        field: &FieldKey,
        index: usize,
    ) -> Option<ObjectHandle>;

    /// Display text for a field that is not edited as a collection.
    fn value_text(&self, owner: ObjectHandle, field: &FieldKey) -> String;
}

// ---------------------------------------------------------------------------
// EditorFactory
// ---------------------------------------------------------------------------

/// Host-side nested editors for single persisted objects.
pub trait EditorFactory {
    fn create_editor(&mut self, element: ObjectHandle) -> EditorId;

    /// `(has_content, height)` of the editor's body block. Editors without
    /// content report `(false, 0.0)` and are skipped by callers.
    fn editor_block(&self, editor: EditorId) -> (bool, f32);

    fn render_editor(&mut self, editor: EditorId, canvas: &mut dyn Canvas, rect: Rect);

    fn dispose_editor(&mut self, editor: EditorId);
}

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

/// Everything the inspector layer needs from one host platform.
pub trait Host: AssetPlatform + FieldReflect + EditorFactory {}

impl<T: AssetPlatform + FieldReflect + EditorFactory> Host for T {}
