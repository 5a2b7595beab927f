//! The type universe behind the inspector: an explicit manifest of type
//! definitions (populated at link time via `inventory` or at runtime),
//! cached concrete-subtype discovery, instance construction through a
//! closed constructor table, and container-shape resolution.

pub mod error;
pub mod manifest;
pub mod registry;
pub mod resolve;

// Re-exported for `register_type!` expansion
pub use inventory;

pub use error::{RegistryError, ResolveError};
pub use manifest::{Construct, Manifest, TypeDef, TypeDefStatic, TypeKind, TypeReg};
pub use registry::{ConcreteTypeEntry, TypeRegistry, TypeSet};
pub use resolve::ContainerInfo;
