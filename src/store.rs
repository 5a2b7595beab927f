//! Ordered-container capability over a backing collection field. The
//! mediator always programs against [`ElementSeq`]; the two backends hide
//! whether a structural edit rewrites the whole value or mutates in place.

use magpie_platform::{FieldKey, FieldReflect, ObjectHandle, Shape};
use tracing::debug;

/// Length, positional access, and structural edits of one collection field.
pub trait ElementSeq {
    fn shape(&self) -> Shape;

    fn len(&self, host: &dyn FieldReflect) -> usize;

    /// Current element references, in order.
    fn snapshot(&self, host: &dyn FieldReflect) -> Vec<ObjectHandle>;

    fn get(&self, host: &dyn FieldReflect, index: usize) -> Option<ObjectHandle>;

    /// Grow by one, placing `element` last.
    fn push(&self, host: &mut dyn FieldReflect, element: ObjectHandle);

    /// Shrink by one at `index`, order-preserving for the rest. Out-of-range
    /// returns `None` and leaves the field untouched.
    fn remove_at(&self, host: &mut dyn FieldReflect, index: usize) -> Option<ObjectHandle>;

    /// Move the element at `from` to position `to`. Returns false when the
    /// indices are out of range or equal.
    fn move_to(&self, host: &mut dyn FieldReflect, from: usize, to: usize) -> bool;
}

/// Bind the backend matching `shape` to one field.
pub fn bind_seq(owner: ObjectHandle, field: FieldKey, shape: Shape) -> Box<dyn ElementSeq> {
    match shape {
        Shape::FixedArray => Box::new(ArraySeq { owner, field }),
        Shape::GrowableList => Box::new(ListSeq { owner, field }),
    }
}

// ---------------------------------------------------------------------------
// ArraySeq: whole-value replacement
// ---------------------------------------------------------------------------

/// Fixed-array backend. Every structural edit reads the current value,
/// builds the resized array, and writes it back whole.
pub struct ArraySeq {
    owner: ObjectHandle,
    field: FieldKey,
}

impl ElementSeq for ArraySeq {
    fn shape(&self) -> Shape {
        Shape::FixedArray
    }

    fn len(&self, host: &dyn FieldReflect) -> usize {
        host.elements(self.owner, &self.field).len()
    }

    fn snapshot(&self, host: &dyn FieldReflect) -> Vec<ObjectHandle> {
        host.elements(self.owner, &self.field)
    }

    fn get(&self, host: &dyn FieldReflect, index: usize) -> Option<ObjectHandle> {
        host.elements(self.owner, &self.field).get(index).copied()
    }

    fn push(&self, host: &mut dyn FieldReflect, element: ObjectHandle) {
        let mut elements = host.elements(self.owner, &self.field);
        elements.push(element);
        host.replace_elements(self.owner, &self.field, &elements);
    }

    fn remove_at(&self, host: &mut dyn FieldReflect, index: usize) -> Option<ObjectHandle> {
        let mut elements = host.elements(self.owner, &self.field);
        if index >= elements.len() {
            return None;
        }
        let removed = elements.remove(index);
        host.replace_elements(self.owner, &self.field, &elements);
        Some(removed)
    }

    fn move_to(&self, host: &mut dyn FieldReflect, from: usize, to: usize) -> bool {
        let mut elements = host.elements(self.owner, &self.field);
        if from == to || from >= elements.len() || to >= elements.len() {
            return false;
        }
        let moved = elements.remove(from);
        elements.insert(to, moved);
        host.replace_elements(self.owner, &self.field, &elements);
        true
    }
}

// ---------------------------------------------------------------------------
// ListSeq: in-place mutation
// ---------------------------------------------------------------------------

/// Growable-list backend. Structural edits go through the host's in-place
/// list operations.
pub struct ListSeq {
    owner: ObjectHandle,
    field: FieldKey,
}

impl ElementSeq for ListSeq {
    fn shape(&self) -> Shape {
        Shape::GrowableList
    }

    fn len(&self, host: &dyn FieldReflect) -> usize {
        host.elements(self.owner, &self.field).len()
    }

    fn snapshot(&self, host: &dyn FieldReflect) -> Vec<ObjectHandle> {
        host.elements(self.owner, &self.field)
    }

    fn get(&self, host: &dyn FieldReflect, index: usize) -> Option<ObjectHandle> {
        host.elements(self.owner, &self.field).get(index).copied()
    }

    fn push(&self, host: &mut dyn FieldReflect, element: ObjectHandle) {
        let end = self.len(host);
        host.list_insert(self.owner, &self.field, end, element);
    }

    fn remove_at(&self, host: &mut dyn FieldReflect, index: usize) -> Option<ObjectHandle> {
        host.list_remove(self.owner, &self.field, index)
    }

    fn move_to(&self, host: &mut dyn FieldReflect, from: usize, to: usize) -> bool {
        if from == to || to >= self.len(host) {
            return false;
        }
        let Some(moved) = host.list_remove(self.owner, &self.field, from) else {
            debug!("move_to from out-of-range index {from}");
            return false;
        };
        host.list_insert(self.owner, &self.field, to, moved);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use magpie_platform::memory::{FieldOp, FieldValue, MemoryHost};
    use magpie_platform::{AssetPlatform, TypeKey};

    fn host_with_field(shape: Shape) -> (MemoryHost, ObjectHandle, Box<dyn ElementSeq>) {
        let mut host = MemoryHost::new();
        let owner = host.spawn(&TypeKey::from_static("Rack"), "rack");
        let field = FieldKey::from_static("effects");
        host.add_field(
            owner,
            field.clone(),
            "Effects",
            TypeKey::from_static("EffectChain"),
            true,
            FieldValue::Elements(Vec::new()),
        );
        let seq = bind_seq(owner, field, shape);
        (host, owner, seq)
    }

    fn spawn3(host: &mut MemoryHost) -> [ObjectHandle; 3] {
        let ty = TypeKey::from_static("Reverb");
        [host.create(&ty), host.create(&ty), host.create(&ty)]
    }

    #[test]
    fn array_edits_rewrite_the_whole_value() {
        let (mut host, _, seq) = host_with_field(Shape::FixedArray);
        let [a, b, c] = spawn3(&mut host);

        seq.push(&mut host, a);
        seq.push(&mut host, b);
        seq.push(&mut host, c);
        assert_eq!(seq.remove_at(&mut host, 1), Some(b));
        assert_eq!(seq.snapshot(&host), vec![a, c]);

        assert!(
            host.field_log
                .iter()
                .all(|op| matches!(op, FieldOp::Replace { .. })),
            "array backend must never use in-place list ops: {:?}",
            host.field_log
        );
    }

    #[test]
    fn list_edits_stay_in_place() {
        let (mut host, _, seq) = host_with_field(Shape::GrowableList);
        let [a, b, c] = spawn3(&mut host);

        seq.push(&mut host, a);
        seq.push(&mut host, b);
        seq.push(&mut host, c);
        assert_eq!(seq.remove_at(&mut host, 0), Some(a));
        assert_eq!(seq.snapshot(&host), vec![b, c]);

        assert!(
            host.field_log
                .iter()
                .all(|op| matches!(op, FieldOp::Insert { .. } | FieldOp::Remove { .. })),
            "list backend must never rewrite the whole value: {:?}",
            host.field_log
        );
    }

    #[test]
    fn remove_preserves_the_order_of_the_rest() {
        for shape in [Shape::FixedArray, Shape::GrowableList] {
            let (mut host, _, seq) = host_with_field(shape);
            let [a, b, c] = spawn3(&mut host);
            for e in [a, b, c] {
                seq.push(&mut host, e);
            }
            seq.remove_at(&mut host, 1);
            assert_eq!(seq.snapshot(&host), vec![a, c]);
        }
    }

    #[test]
    fn out_of_range_remove_is_a_no_op() {
        for shape in [Shape::FixedArray, Shape::GrowableList] {
            let (mut host, _, seq) = host_with_field(shape);
            let [a, _, _] = spawn3(&mut host);
            seq.push(&mut host, a);

            assert_eq!(seq.remove_at(&mut host, 1), None);
            assert_eq!(seq.snapshot(&host), vec![a]);
        }
    }

    #[test]
    fn move_to_reorders_both_shapes_the_same_way() {
        for shape in [Shape::FixedArray, Shape::GrowableList] {
            let (mut host, _, seq) = host_with_field(shape);
            let [a, b, c] = spawn3(&mut host);
            for e in [a, b, c] {
                seq.push(&mut host, e);
            }

            assert!(seq.move_to(&mut host, 2, 0));
            assert_eq!(seq.snapshot(&host), vec![c, a, b]);
            assert!(!seq.move_to(&mut host, 1, 1));
            assert!(!seq.move_to(&mut host, 0, 3));
        }
    }
}
