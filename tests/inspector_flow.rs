//! End-to-end flows over the in-memory host: widget-driven appends,
//! removals, expansion, renames, and persistence, pass by pass.

use std::sync::Arc;

use anyhow::Result;
use magpie::platform::memory::{DrawOp, FieldOp, FieldValue, Interaction, MemoryHost, RecordingCanvas};
use magpie::platform::{AssetPlatform, FieldKey, FieldReflect, ObjectHandle, Rect, TypeKey, tokens};
use magpie::registry::{Manifest, TypeDef, TypeKind, TypeRegistry};
use magpie::{FieldRow, InspectorConfig, InspectorSession};

fn audio_registry() -> Arc<TypeRegistry> {
    let mut manifest = Manifest::new();
    for (key, supertype, is_abstract, kind) in [
        ("Asset", None, true, TypeKind::Object),
        ("AudioEffect", Some("Asset"), true, TypeKind::Object),
        ("Reverb", Some("AudioEffect"), false, TypeKind::Object),
        ("Distortion", Some("AudioEffect"), false, TypeKind::Object),
        ("Chorus", Some("AudioEffect"), false, TypeKind::Object),
        (
            "EffectChain",
            None,
            false,
            TypeKind::ListOf {
                elem: TypeKey::from_static("AudioEffect"),
            },
        ),
        (
            "AudioEffect[]",
            None,
            false,
            TypeKind::Array {
                elem: TypeKey::from_static("AudioEffect"),
            },
        ),
    ] {
        manifest.insert(TypeDef {
            key: TypeKey::from_static(key),
            name: key.to_string(),
            supertype: supertype.map(TypeKey::from_static),
            kind,
            is_abstract,
            construct: None,
        });
    }
    Arc::new(TypeRegistry::with_manifest(manifest))
}

fn effects_field() -> FieldKey {
    FieldKey::from_static("effects")
}

fn rack_host(declared: &'static str) -> (MemoryHost, ObjectHandle) {
    let mut host = MemoryHost::new();
    let rack = host.spawn(&TypeKey::from_static("Rack"), "Main Rack");
    host.add_field(
        rack,
        effects_field(),
        "Effects",
        TypeKey::from_static(declared),
        true,
        FieldValue::Elements(Vec::new()),
    );
    (host, rack)
}

fn session_for(host: &MemoryHost, rack: ObjectHandle) -> InspectorSession {
    InspectorSession::new(host, audio_registry(), rack, InspectorConfig::default())
}

fn panel() -> Rect {
    Rect::new(0.0, 0.0, 400.0, 2000.0)
}

/// Run one full pass: apply queued edits, then draw, asserting that the
/// consumed height matches the height computed for the same pass.
fn pass(
    session: &mut InspectorSession,
    host: &mut MemoryHost,
    canvas: &mut RecordingCanvas,
) -> f32 {
    session.begin_pass(host);
    let expected = session.total_height::<MemoryHost>();
    canvas.clear_ops();
    let consumed = session.draw(canvas, host, panel());
    assert_eq!(consumed, expected, "layout and paint disagree on height");
    consumed
}

#[test]
fn footer_append_lands_on_the_next_pass() {
    let (mut host, rack) = rack_host("EffectChain");
    let mut session = session_for(&host, rack);
    let mut canvas = RecordingCanvas::new();
    pass(&mut session, &mut host, &mut canvas);

    // Pick "Distortion" in the create popup, then click add. The trigger
    // only enqueues; this pass must not observe the mutation.
    canvas.interact(Interaction::Pick(1));
    pass(&mut session, &mut host, &mut canvas);
    canvas.interact(Interaction::Click("+".to_string()));
    pass(&mut session, &mut host, &mut canvas);
    assert!(host.elements(rack, &effects_field()).is_empty());

    pass(&mut session, &mut host, &mut canvas);
    let elements = host.elements(rack, &effects_field());
    assert_eq!(elements.len(), 1);
    assert_eq!(host.object_name(elements[0]), "Distortion");
    assert_eq!(host.children(rack), elements);
    assert_eq!(host.save_count, 1);
}

#[test]
fn footer_remove_targets_the_selected_row() {
    let (mut host, rack) = rack_host("EffectChain");
    let mut session = session_for(&host, rack);
    if let FieldRow::Collection { mediator, .. } = &mut session.rows_mut()[0] {
        for name in ["Reverb", "Distortion", "Chorus"] {
            mediator.append(&mut host, name);
        }
    }
    let before = host.elements(rack, &effects_field());

    let mut canvas = RecordingCanvas::new();
    pass(&mut session, &mut host, &mut canvas);
    if let FieldRow::Collection { view, .. } = &mut session.rows_mut()[0] {
        view.select(Some(1));
    }
    canvas.interact(Interaction::Click("-".to_string()));
    pass(&mut session, &mut host, &mut canvas);
    assert_eq!(host.elements(rack, &effects_field()).len(), 3);

    pass(&mut session, &mut host, &mut canvas);
    assert_eq!(
        host.elements(rack, &effects_field()),
        vec![before[0], before[2]]
    );
    assert!(!host.exists(before[1]));
    assert_eq!(host.live_editors(), 0);
}

#[test]
fn expanding_a_row_grows_the_panel_by_its_editor_block() {
    let (mut host, rack) = rack_host("EffectChain");
    let mut session = session_for(&host, rack);
    if let FieldRow::Collection { mediator, .. } = &mut session.rows_mut()[0] {
        mediator.append(&mut host, "Reverb");
    }
    let element = host.elements(rack, &effects_field())[0];
    host.set_block(element, true, 72.0);

    let mut canvas = RecordingCanvas::new();
    let collapsed = pass(&mut session, &mut host, &mut canvas);
    assert_eq!(host.live_editors(), 0, "collapsed rows must not fetch editors");

    canvas.interact(Interaction::Toggle("Element 0".to_string()));
    let toggling = pass(&mut session, &mut host, &mut canvas);
    assert_eq!(toggling, collapsed, "toggle pass still draws its own snapshot");

    let expanded = pass(&mut session, &mut host, &mut canvas);
    assert_eq!(expanded, collapsed + 72.0 + tokens::ROW_HEIGHT);
    assert_eq!(host.live_editors(), 1);
}

#[test]
fn editing_the_name_field_renames_saves_and_pings() {
    let (mut host, rack) = rack_host("EffectChain");
    let mut session = session_for(&host, rack);
    if let FieldRow::Collection { mediator, .. } = &mut session.rows_mut()[0] {
        mediator.append(&mut host, "Reverb");
    }
    let element = host.elements(rack, &effects_field())[0];
    let saves = host.save_count;

    let mut canvas = RecordingCanvas::new();
    canvas.interact(Interaction::Edit {
        old: "Reverb".to_string(),
        new: "Cathedral".to_string(),
    });
    pass(&mut session, &mut host, &mut canvas);

    assert_eq!(host.object_name(element), "Cathedral");
    assert_eq!(host.save_count, saves + 1);
    assert_eq!(host.pinged, vec![element]);

    // Committing the unchanged name is a no-op.
    canvas.interact(Interaction::Edit {
        old: "Cathedral".to_string(),
        new: "Cathedral".to_string(),
    });
    pass(&mut session, &mut host, &mut canvas);
    assert_eq!(host.save_count, saves + 1);
    assert_eq!(host.pinged.len(), 1);
}

#[test]
fn array_and_list_shapes_hit_their_own_host_paths() {
    for (declared, is_array) in [("AudioEffect[]", true), ("EffectChain", false)] {
        let (mut host, rack) = rack_host(declared);
        let mut session = session_for(&host, rack);
        if let FieldRow::Collection { mediator, .. } = &mut session.rows_mut()[0] {
            mediator.append(&mut host, "Reverb");
            mediator.append(&mut host, "Chorus");
            mediator.remove_at(&mut host, 0);
        }

        let only_replaces = host
            .field_log
            .iter()
            .all(|op| matches!(op, FieldOp::Replace { .. }));
        let only_in_place = host
            .field_log
            .iter()
            .all(|op| matches!(op, FieldOp::Insert { .. } | FieldOp::Remove { .. }));
        assert_eq!(only_replaces, is_array, "{declared}: {:?}", host.field_log);
        assert_eq!(only_in_place, !is_array, "{declared}: {:?}", host.field_log);
        assert_eq!(host.elements(rack, &effects_field()).len(), 1);
    }
}

#[test]
fn drag_reorder_keeps_expansion_on_the_moved_element() {
    let (mut host, rack) = rack_host("EffectChain");
    let mut session = session_for(&host, rack);
    if let FieldRow::Collection { mediator, .. } = &mut session.rows_mut()[0] {
        for name in ["Reverb", "Distortion", "Chorus"] {
            mediator.append(&mut host, name);
        }
    }
    let first = host.elements(rack, &effects_field())[0];
    host.set_block(first, true, 30.0);
    if let FieldRow::Collection { mediator, .. } = &mut session.rows_mut()[0] {
        mediator.set_expanded(first, true);
    }

    let mut canvas = RecordingCanvas::new();
    pass(&mut session, &mut host, &mut canvas);
    if let FieldRow::Collection { view, mediator } = &mut session.rows_mut()[0] {
        view.drag::<MemoryHost, _>(mediator, 0, 2);
    }
    pass(&mut session, &mut host, &mut canvas);

    assert_eq!(host.elements(rack, &effects_field())[2], first);
    if let FieldRow::Collection { mediator, .. } = &session.rows()[0] {
        assert!(mediator.is_expanded(first));
        let row = mediator.snapshot().row(2).unwrap();
        assert!(row.expanded);
        assert!(row.block.is_some());
    }
}

#[test]
fn saved_snapshot_nests_elements_under_their_rack() -> Result<()> {
    let (mut host, rack) = rack_host("EffectChain");
    let mut session = session_for(&host, rack);
    if let FieldRow::Collection { mediator, .. } = &mut session.rows_mut()[0] {
        mediator.append(&mut host, "Reverb");
        let element = host.elements(rack, &effects_field())[0];
        mediator.rename(&mut host, element, "Hall");
    }

    let json: serde_json::Value =
        serde_json::from_str(host.saved_json.as_deref().expect("save ran"))?;
    let roots = json.as_array().expect("roots array");
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0]["name"], "Main Rack");
    assert_eq!(roots[0]["children"][0]["name"], "Hall");
    assert_eq!(roots[0]["children"][0]["type"], "Reverb");
    Ok(())
}

#[test]
fn empty_collections_offer_create_but_draw_a_placeholder() {
    let (mut host, rack) = rack_host("EffectChain");
    let mut session = session_for(&host, rack);
    let mut canvas = RecordingCanvas::new();
    pass(&mut session, &mut host, &mut canvas);

    assert!(canvas.ops.iter().any(
        |op| matches!(op, DrawOp::Label { text, .. } if text == "List is Empty")
    ));
    let popup_options: Vec<String> = canvas
        .ops
        .iter()
        .find_map(|op| match op {
            DrawOp::Popup { options, .. } => Some(options.clone()),
            _ => None,
        })
        .expect("footer popup drawn");
    assert_eq!(popup_options, vec!["Reverb", "Distortion", "Chorus"]);
}

#[test]
fn out_of_range_popup_pick_resets_to_the_first_entry() {
    let (mut host, rack) = rack_host("EffectChain");
    let mut session = session_for(&host, rack);
    let mut canvas = RecordingCanvas::new();

    canvas.interact(Interaction::Pick(99));
    pass(&mut session, &mut host, &mut canvas);
    canvas.interact(Interaction::Click("+".to_string()));
    pass(&mut session, &mut host, &mut canvas);
    pass(&mut session, &mut host, &mut canvas);

    let elements = host.elements(rack, &effects_field());
    assert_eq!(elements.len(), 1);
    assert_eq!(host.object_name(elements[0]), "Reverb");
}

#[test]
fn disposing_the_session_releases_every_editor() {
    let (mut host, rack) = rack_host("EffectChain");
    let mut session = session_for(&host, rack);
    if let FieldRow::Collection { mediator, .. } = &mut session.rows_mut()[0] {
        for name in ["Reverb", "Distortion"] {
            mediator.append(&mut host, name);
        }
    }
    for element in host.elements(rack, &effects_field()) {
        if let FieldRow::Collection { mediator, .. } = &mut session.rows_mut()[0] {
            mediator.set_expanded(element, true);
        }
    }
    let mut canvas = RecordingCanvas::new();
    pass(&mut session, &mut host, &mut canvas);
    assert_eq!(host.live_editors(), 2);

    session.dispose(&mut host);
    assert_eq!(host.live_editors(), 0);
    assert_eq!(host.disposed_editors.len(), 2);
}
