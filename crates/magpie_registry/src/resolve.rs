//! Container-shape resolution: decide whether a declared field type is an
//! ordered container of assets, and which mutation strategy it needs.

use magpie_platform::{Shape, TypeKey};
use tracing::{debug, warn};

use crate::error::ResolveError;
use crate::manifest::{Manifest, TypeKind, MAX_SUPERTYPE_DEPTH};

/// Element type and mutation strategy of a resolved container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerInfo {
    pub element: TypeKey,
    pub shape: Shape,
}

/// Walk `declared` and its supertype chain looking for an ordered-container
/// kind whose element type is assignable to `asset_root`.
///
/// A container of non-assets does not qualify; the walk continues past it,
/// which is what lets custom subclasses of a growable list resolve.
pub fn resolve_container(
    manifest: &Manifest,
    declared: &TypeKey,
    asset_root: &TypeKey,
) -> Result<ContainerInfo, ResolveError> {
    if !manifest.contains(declared) {
        return Err(ResolveError::UnknownType {
            key: declared.clone(),
        });
    }

    let mut current = declared.clone();
    let mut depth = 0;
    loop {
        if depth >= MAX_SUPERTYPE_DEPTH {
            warn!("supertype chain of `{declared}` exceeds {MAX_SUPERTYPE_DEPTH} levels, assuming cycle");
            break;
        }
        depth += 1;

        let Some(def) = manifest.get(&current) else {
            debug!("supertype `{current}` of `{declared}` is not registered");
            break;
        };

        match &def.kind {
            TypeKind::Array { elem } if manifest.is_assignable(elem, asset_root) => {
                return Ok(ContainerInfo {
                    element: elem.clone(),
                    shape: Shape::FixedArray,
                });
            }
            TypeKind::ListOf { elem } if manifest.is_assignable(elem, asset_root) => {
                return Ok(ContainerInfo {
                    element: elem.clone(),
                    shape: Shape::GrowableList,
                });
            }
            _ => {}
        }

        match &def.supertype {
            Some(supertype) => current = supertype.clone(),
            None => break,
        }
    }

    Err(ResolveError::NotAContainer {
        declared: declared.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::TypeDef;

    fn def(key: &'static str, supertype: Option<&'static str>, kind: TypeKind) -> TypeDef {
        TypeDef {
            key: TypeKey::from_static(key),
            name: key.to_string(),
            supertype: supertype.map(TypeKey::from_static),
            kind,
            is_abstract: false,
            construct: None,
        }
    }

    fn audio_manifest() -> Manifest {
        let mut manifest = Manifest::new();
        manifest.insert(def("Asset", None, TypeKind::Object));
        manifest.insert(def("AudioEffect", Some("Asset"), TypeKind::Object));
        manifest.insert(def("Reverb", Some("AudioEffect"), TypeKind::Object));
        manifest.insert(def(
            "AudioEffect[]",
            None,
            TypeKind::Array {
                elem: TypeKey::from_static("AudioEffect"),
            },
        ));
        manifest.insert(def(
            "EffectChain",
            None,
            TypeKind::ListOf {
                elem: TypeKey::from_static("AudioEffect"),
            },
        ));
        manifest.insert(def("EffectRack", Some("EffectChain"), TypeKind::Object));
        manifest
    }

    fn root() -> TypeKey {
        TypeKey::from_static("Asset")
    }

    #[test]
    fn array_of_assets_resolves_as_fixed_array() {
        let info =
            resolve_container(&audio_manifest(), &TypeKey::from_static("AudioEffect[]"), &root())
                .unwrap();
        assert_eq!(info.element, TypeKey::from_static("AudioEffect"));
        assert_eq!(info.shape, Shape::FixedArray);
    }

    #[test]
    fn list_subtype_resolves_as_growable_list() {
        let info =
            resolve_container(&audio_manifest(), &TypeKey::from_static("EffectRack"), &root())
                .unwrap();
        assert_eq!(info.element, TypeKey::from_static("AudioEffect"));
        assert_eq!(info.shape, Shape::GrowableList);
    }

    #[test]
    fn scalar_type_is_not_a_container() {
        let err = resolve_container(&audio_manifest(), &TypeKey::from_static("Reverb"), &root())
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::NotAContainer {
                declared: TypeKey::from_static("Reverb")
            }
        );
    }

    #[test]
    fn unknown_declared_type_is_reported_as_such() {
        let err = resolve_container(&audio_manifest(), &TypeKey::from_static("Nope"), &root())
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::UnknownType {
                key: TypeKey::from_static("Nope")
            }
        );
    }

    #[test]
    fn container_of_non_assets_is_skipped_but_the_chain_continues() {
        let mut manifest = audio_manifest();
        manifest.insert(def("Texture", None, TypeKind::Object));
        manifest.insert(def(
            "WeirdHolder",
            Some("EffectChain"),
            TypeKind::Array {
                elem: TypeKey::from_static("Texture"),
            },
        ));

        let info =
            resolve_container(&manifest, &TypeKey::from_static("WeirdHolder"), &root()).unwrap();
        assert_eq!(info.shape, Shape::GrowableList);
        assert_eq!(info.element, TypeKey::from_static("AudioEffect"));
    }

    #[test]
    fn cyclic_supertype_chain_terminates_with_not_a_container() {
        let mut manifest = Manifest::new();
        manifest.insert(def("A", Some("B"), TypeKind::Object));
        manifest.insert(def("B", Some("A"), TypeKind::Object));
        let err =
            resolve_container(&manifest, &TypeKey::from_static("A"), &root()).unwrap_err();
        assert_eq!(
            err,
            ResolveError::NotAContainer {
                declared: TypeKey::from_static("A")
            }
        );
    }
}
