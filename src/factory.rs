//! Element construction for one collection binding: resolve the picked
//! concrete type, build the instance, name it, and attach it to the owner
//! for persistence.

use magpie_platform::{Host, ObjectHandle, TypeKey};
use magpie_registry::{RegistryError, TypeRegistry};
use tracing::debug;

pub struct ElementFactory {
    base: TypeKey,
    owner: ObjectHandle,
}

impl ElementFactory {
    pub fn new(base: TypeKey, owner: ObjectHandle) -> Self {
        Self { base, owner }
    }

    pub fn base(&self) -> &TypeKey {
        &self.base
    }

    /// Construct a new element of the concrete subtype named `type_name`.
    /// The caller still has to place it in the backing collection and save.
    pub fn create<H: Host>(
        &self,
        host: &mut H,
        registry: &TypeRegistry,
        type_name: &str,
    ) -> Result<ObjectHandle, RegistryError> {
        let element = registry.create_instance(&self.base, type_name, host)?;
        host.set_object_name(element, type_name);
        host.attach_child(element, self.owner);
        debug!("built `{type_name}` element {element} under {}", self.owner);
        Ok(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use magpie_platform::AssetPlatform;
    use magpie_platform::memory::MemoryHost;
    use magpie_registry::{Manifest, TypeDef, TypeKind};

    fn registry() -> TypeRegistry {
        let mut manifest = Manifest::new();
        for (key, supertype, is_abstract) in [
            ("Asset", None, true),
            ("AudioEffect", Some("Asset"), true),
            ("Reverb", Some("AudioEffect"), false),
        ] {
            manifest.insert(TypeDef {
                key: TypeKey::from_static(key),
                name: key.to_string(),
                supertype: supertype.map(TypeKey::from_static),
                kind: TypeKind::Object,
                is_abstract,
                construct: None,
            });
        }
        TypeRegistry::with_manifest(manifest)
    }

    #[test]
    fn created_elements_are_named_and_attached() {
        let registry = registry();
        let mut host = MemoryHost::new();
        let rack = host.spawn(&TypeKey::from_static("Rack"), "rack");
        let factory = ElementFactory::new(TypeKey::from_static("AudioEffect"), rack);

        let element = factory.create(&mut host, &registry, "Reverb").unwrap();
        assert_eq!(host.object_name(element), "Reverb");
        assert_eq!(host.children(rack), vec![element]);
        assert_eq!(host.object_type(element), Some(TypeKey::from_static("Reverb")));
    }

    #[test]
    fn unknown_names_build_nothing() {
        let registry = registry();
        let mut host = MemoryHost::new();
        let rack = host.spawn(&TypeKey::from_static("Rack"), "rack");
        let factory = ElementFactory::new(TypeKey::from_static("AudioEffect"), rack);
        let before = host.object_count();

        let err = factory.create(&mut host, &registry, "Gate").unwrap_err();
        assert!(matches!(err, RegistryError::UnknownTypeName { .. }));
        assert_eq!(host.object_count(), before);
    }

    #[test]
    fn abstract_names_are_not_constructible() {
        let registry = registry();
        let mut host = MemoryHost::new();
        let rack = host.spawn(&TypeKey::from_static("Rack"), "rack");
        let factory = ElementFactory::new(TypeKey::from_static("AudioEffect"), rack);

        assert!(factory.create(&mut host, &registry, "AudioEffect").is_err());
    }
}
