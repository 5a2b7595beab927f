//! The type universe: definitions, link-time registration via `inventory`,
//! and the assignability walk used by discovery and resolution.

use indexmap::IndexMap;
use magpie_platform::{AssetPlatform, ObjectHandle, TypeKey};
use tracing::{debug, warn};

/// Guard against malformed manifests with cyclic supertype links.
pub(crate) const MAX_SUPERTYPE_DEPTH: usize = 64;

/// Construction hook for a registered type. `None` in a [`TypeDef`] means
/// plain construction through [`AssetPlatform::create`].
pub type Construct = fn(&mut dyn AssetPlatform) -> ObjectHandle;

// ---------------------------------------------------------------------------
// Type definitions
// ---------------------------------------------------------------------------

/// Structural kind of a registered type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeKind {
    /// Plain object type.
    Object,
    /// Fixed-size array of `elem` values.
    Array { elem: TypeKey },
    /// Growable ordered list of `elem` values.
    ListOf { elem: TypeKey },
}

/// One entry in the type universe.
#[derive(Clone, Debug)]
pub struct TypeDef {
    pub key: TypeKey,
    /// Human-facing name shown in pickers.
    pub name: String,
    pub supertype: Option<TypeKey>,
    pub kind: TypeKind,
    pub is_abstract: bool,
    pub construct: Option<Construct>,
}

/// Link-time registration entry collected via `inventory`.
pub struct TypeDefStatic {
    pub key: TypeKey,
    pub name: &'static str,
    pub supertype: Option<TypeKey>,
    pub kind: TypeKind,
    pub is_abstract: bool,
    pub construct: Option<Construct>,
}

/// Wrapper for `inventory::collect!`.
pub struct TypeReg(pub &'static TypeDefStatic);

inventory::collect!(TypeReg);

impl From<&TypeDefStatic> for TypeDef {
    fn from(def: &TypeDefStatic) -> Self {
        Self {
            key: def.key.clone(),
            name: def.name.to_string(),
            supertype: def.supertype.clone(),
            kind: def.kind.clone(),
            is_abstract: def.is_abstract,
            construct: def.construct,
        }
    }
}

/// Declare a static type definition and submit it for link-time collection.
#[macro_export]
macro_rules! register_type {
    ($ident:ident: $def:expr) => {
        static $ident: $crate::manifest::TypeDefStatic = $def;
        $crate::inventory::submit! { $crate::manifest::TypeReg(&$ident) }
    };
}

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

/// The registered type universe, in registration order.
#[derive(Clone, Debug, Default)]
pub struct Manifest {
    defs: IndexMap<TypeKey, TypeDef>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every link-time submission into a manifest.
    pub fn from_inventory() -> Self {
        let mut manifest = Self::new();
        for reg in inventory::iter::<TypeReg> {
            manifest.insert(TypeDef::from(reg.0));
        }
        manifest
    }

    /// Insert a definition. A duplicate key replaces the old entry.
    pub fn insert(&mut self, def: TypeDef) {
        if self.defs.contains_key(&def.key) {
            warn!("type `{}` registered twice, replacing", def.key);
        }
        debug!("registered type `{}`", def.key);
        self.defs.insert(def.key.clone(), def);
    }

    pub fn get(&self, key: &TypeKey) -> Option<&TypeDef> {
        self.defs.get(key)
    }

    pub fn contains(&self, key: &TypeKey) -> bool {
        self.defs.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDef> {
        self.defs.values()
    }

    /// Whether `ty` is `base` or derives from it, directly or transitively.
    /// The walk is depth-limited so a malformed cyclic manifest cannot hang
    /// the caller.
    pub fn is_assignable(&self, ty: &TypeKey, base: &TypeKey) -> bool {
        let mut current = ty.clone();
        for _ in 0..MAX_SUPERTYPE_DEPTH {
            if current == *base {
                return true;
            }
            match self.get(&current).and_then(|def| def.supertype.clone()) {
                Some(supertype) => current = supertype,
                None => return false,
            }
        }
        warn!("supertype chain of `{ty}` exceeds {MAX_SUPERTYPE_DEPTH} levels, assuming cycle");
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(key: &'static str, supertype: Option<&'static str>) -> TypeDef {
        TypeDef {
            key: TypeKey::from_static(key),
            name: key.to_string(),
            supertype: supertype.map(TypeKey::from_static),
            kind: TypeKind::Object,
            is_abstract: false,
            construct: None,
        }
    }

    #[test]
    fn assignability_walks_the_supertype_chain() {
        let mut manifest = Manifest::new();
        manifest.insert(def("Asset", None));
        manifest.insert(def("AudioEffect", Some("Asset")));
        manifest.insert(def("Reverb", Some("AudioEffect")));

        let reverb = TypeKey::from_static("Reverb");
        assert!(manifest.is_assignable(&reverb, &TypeKey::from_static("Reverb")));
        assert!(manifest.is_assignable(&reverb, &TypeKey::from_static("AudioEffect")));
        assert!(manifest.is_assignable(&reverb, &TypeKey::from_static("Asset")));
        assert!(!manifest.is_assignable(&TypeKey::from_static("Asset"), &reverb));
    }

    #[test]
    fn assignability_survives_a_cyclic_manifest() {
        let mut manifest = Manifest::new();
        manifest.insert(def("A", Some("B")));
        manifest.insert(def("B", Some("A")));
        assert!(!manifest.is_assignable(&TypeKey::from_static("A"), &TypeKey::from_static("C")));
    }

    #[test]
    fn duplicate_keys_replace_the_earlier_definition() {
        let mut manifest = Manifest::new();
        manifest.insert(def("Reverb", None));
        manifest.insert(def("Reverb", Some("Asset")));
        assert_eq!(manifest.len(), 1);
        let stored = manifest.get(&TypeKey::from_static("Reverb")).unwrap();
        assert_eq!(stored.supertype, Some(TypeKey::from_static("Asset")));
    }

    #[test]
    fn iteration_preserves_registration_order() {
        let mut manifest = Manifest::new();
        manifest.insert(def("Zeta", None));
        manifest.insert(def("Alpha", None));
        let keys: Vec<&str> = manifest.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, vec!["Zeta", "Alpha"]);
    }
}
