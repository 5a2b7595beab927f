use magpie_platform::TypeKey;
use thiserror::Error;

/// Failures raised by the type registry.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No concrete subtype of `base` carries this display name. Callers on
    /// the user-input path treat this as a no-op, not a fault.
    #[error("no concrete subtype of `{base}` is named `{name}`")]
    UnknownTypeName { base: TypeKey, name: String },

    /// The key is not present in the manifest.
    #[error("type `{key}` is not registered")]
    UnknownType { key: TypeKey },
}

/// Failures from container-shape resolution.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The declared type is not an ordered container of assets anywhere in
    /// its supertype chain.
    #[error("`{declared}` is not an ordered container of assets")]
    NotAContainer { declared: TypeKey },

    /// The declared type itself is unknown to the manifest.
    #[error("type `{key}` is not registered")]
    UnknownType { key: TypeKey },
}
