//! Host-platform vocabulary for the inspector layer: identifier types, the
//! three host contracts, immediate-mode canvas primitives, layout tokens,
//! and an in-memory reference host.

pub mod canvas;
pub mod id;
pub mod memory;
pub mod platform;
pub mod tokens;

// Re-export the vocabulary types for consumer convenience
pub use canvas::{Canvas, Rect};
pub use id::{EditorId, FieldKey, ObjectHandle, Shape, TypeKey};
pub use platform::{AssetPlatform, EditorFactory, FieldDecl, FieldReflect, Host};
