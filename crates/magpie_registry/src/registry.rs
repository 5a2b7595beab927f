//! Cached discovery of concrete subtypes and instance construction.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock};

use magpie_platform::{AssetPlatform, ObjectHandle, TypeKey};
use parking_lot::RwLock;
use tracing::debug;

use crate::error::{RegistryError, ResolveError};
use crate::manifest::{Manifest, TypeDef};
use crate::resolve::{self, ContainerInfo};

// ---------------------------------------------------------------------------
// Discovery results
// ---------------------------------------------------------------------------

/// One concrete type offered for a base type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConcreteTypeEntry {
    pub key: TypeKey,
    pub display_name: String,
}

/// Cached discovery result for one base type. `names` mirrors `entries`
/// index for index, ready for a picker popup.
#[derive(Clone, Debug, Default)]
pub struct TypeSet {
    pub entries: Vec<ConcreteTypeEntry>,
    pub names: Vec<String>,
}

// ---------------------------------------------------------------------------
// TypeRegistry
// ---------------------------------------------------------------------------

/// Registry over a [`Manifest`], with per-base discovery caches.
///
/// Caches are filled on first query and kept until [`invalidate`] is called;
/// runtime registrations stay invisible until then. The locks exist because
/// the global instance is shared, not because the edit path is concurrent.
///
/// [`invalidate`]: TypeRegistry::invalidate
pub struct TypeRegistry {
    manifest: RwLock<Manifest>,
    cache: RwLock<HashMap<TypeKey, Arc<TypeSet>>>,
}

static GLOBAL: OnceLock<Arc<TypeRegistry>> = OnceLock::new();

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::with_manifest(Manifest::new())
    }

    pub fn with_manifest(manifest: Manifest) -> Self {
        Self {
            manifest: RwLock::new(manifest),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The process-wide registry, built from link-time submissions on first
    /// access.
    pub fn global() -> Arc<TypeRegistry> {
        GLOBAL
            .get_or_init(|| Arc::new(Self::with_manifest(Manifest::from_inventory())))
            .clone()
    }

    /// Add a definition at runtime. Not visible to discovery until
    /// [`TypeRegistry::invalidate`] runs.
    pub fn register(&self, def: TypeDef) {
        self.manifest.write().insert(def);
    }

    /// Drop every cached discovery result.
    pub fn invalidate(&self) {
        self.cache.write().clear();
        debug!("type registry caches invalidated");
    }

    /// All non-abstract types assignable to `base`, in registration order.
    /// An unknown or childless base yields an empty set, which is cached
    /// like any other result.
    pub fn concrete_types(&self, base: &TypeKey) -> Arc<TypeSet> {
        if let Some(set) = self.cache.read().get(base) {
            return set.clone();
        }

        let manifest = self.manifest.read();
        let entries: Vec<ConcreteTypeEntry> = manifest
            .iter()
            .filter(|def| !def.is_abstract && manifest.is_assignable(&def.key, base))
            .map(|def| ConcreteTypeEntry {
                key: def.key.clone(),
                display_name: def.name.clone(),
            })
            .collect();
        drop(manifest);

        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.display_name.as_str()) {
                debug!(
                    "base `{base}` offers duplicate display name `{}`, first registered wins",
                    entry.display_name
                );
            }
        }

        let names = entries.iter().map(|e| e.display_name.clone()).collect();
        let set = Arc::new(TypeSet { entries, names });
        self.cache.write().insert(base.clone(), set.clone());
        set
    }

    /// Construct an instance of the concrete subtype of `base` whose display
    /// name is `display_name`. The caller owns naming and attachment of the
    /// returned object.
    pub fn create_instance(
        &self,
        base: &TypeKey,
        display_name: &str,
        platform: &mut dyn AssetPlatform,
    ) -> Result<ObjectHandle, RegistryError> {
        let set = self.concrete_types(base);
        let Some(entry) = set
            .entries
            .iter()
            .find(|e| e.display_name == display_name)
        else {
            return Err(RegistryError::UnknownTypeName {
                base: base.clone(),
                name: display_name.to_string(),
            });
        };

        let (key, construct) = {
            let manifest = self.manifest.read();
            let def = manifest
                .get(&entry.key)
                .ok_or_else(|| RegistryError::UnknownType {
                    key: entry.key.clone(),
                })?;
            (def.key.clone(), def.construct)
        };

        let handle = match construct {
            Some(construct) => construct(platform),
            None => platform.create(&key),
        };
        debug!("created `{key}` instance {handle}");
        Ok(handle)
    }

    pub fn is_assignable(&self, ty: &TypeKey, base: &TypeKey) -> bool {
        self.manifest.read().is_assignable(ty, base)
    }

    /// Resolve the container shape of a declared field type. See
    /// [`resolve::resolve_container`].
    pub fn resolve_container(
        &self,
        declared: &TypeKey,
        asset_root: &TypeKey,
    ) -> Result<ContainerInfo, ResolveError> {
        resolve::resolve_container(&self.manifest.read(), declared, asset_root)
    }
}
