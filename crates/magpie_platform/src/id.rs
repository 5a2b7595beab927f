use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// TypeKey
// ---------------------------------------------------------------------------

/// Identifier of a registered type. Cheap to clone; link-time registrations
/// borrow a `'static` string and allocate nothing.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeKey(Cow<'static, str>);

impl TypeKey {
    pub const fn from_static(key: &'static str) -> Self {
        Self(Cow::Borrowed(key))
    }

    pub fn new(key: impl Into<String>) -> Self {
        Self(Cow::Owned(key.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeKey {
    fn from(key: &str) -> Self {
        Self(Cow::Owned(key.to_string()))
    }
}

impl From<String> for TypeKey {
    fn from(key: String) -> Self {
        Self(Cow::Owned(key))
    }
}

// ---------------------------------------------------------------------------
// FieldKey
// ---------------------------------------------------------------------------

/// Identifier of a field on an inspected object.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct FieldKey(Cow<'static, str>);

impl FieldKey {
    pub const fn from_static(key: &'static str) -> Self {
        Self(Cow::Borrowed(key))
    }

    pub fn new(key: impl Into<String>) -> Self {
        Self(Cow::Owned(key.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldKey {
    fn from(key: &str) -> Self {
        Self(Cow::Owned(key.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

/// Opaque handle to a persisted object, issued by the asset platform.
/// Handles are never reused within one platform instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(transparent)]
pub struct ObjectHandle(u64);

impl ObjectHandle {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque handle to a host-side nested editor. Never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(transparent)]
pub struct EditorId(u64);

impl EditorId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EditorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "editor#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Shape
// ---------------------------------------------------------------------------

/// Mutation strategy of an ordered element container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Fixed-size storage. Structural edits rewrite the whole value.
    FixedArray,
    /// Growable storage with in-place insert and remove.
    GrowableList,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_key_equality_across_constructors() {
        const STATIC: TypeKey = TypeKey::from_static("Reverb");
        assert_eq!(STATIC, TypeKey::new("Reverb"));
        assert_eq!(STATIC, TypeKey::from("Reverb"));
        assert_eq!(STATIC.as_str(), "Reverb");
    }

    #[test]
    fn handles_display_their_raw_value() {
        assert_eq!(ObjectHandle::from_raw(7).to_string(), "#7");
        assert_eq!(EditorId::from_raw(3).to_string(), "editor#3");
        assert_eq!(ObjectHandle::from_raw(7).raw(), 7);
    }
}
