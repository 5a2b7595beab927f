//! Scripted walkthrough of the inspector layer against the in-memory host:
//! registers an audio-effect type universe at link time, opens a session on
//! a rack, and drives appends, expansion, and a rename through the widget
//! surface, printing the panel state after each pass.

use anyhow::Context;
use magpie::platform::memory::{FieldValue, Interaction, MemoryHost, RecordingCanvas};
use magpie::platform::{AssetPlatform, FieldKey, FieldReflect, Rect, TypeKey};
use magpie::registry::{TypeDefStatic, TypeKind, TypeRegistry, register_type};
use magpie::{InspectorConfig, InspectorSession};

register_type!(ASSET: TypeDefStatic {
    key: TypeKey::from_static("Asset"),
    name: "Asset",
    supertype: None,
    kind: TypeKind::Object,
    is_abstract: true,
    construct: None,
});

register_type!(AUDIO_EFFECT: TypeDefStatic {
    key: TypeKey::from_static("AudioEffect"),
    name: "Audio Effect",
    supertype: Some(TypeKey::from_static("Asset")),
    kind: TypeKind::Object,
    is_abstract: true,
    construct: None,
});

register_type!(REVERB: TypeDefStatic {
    key: TypeKey::from_static("Reverb"),
    name: "Reverb",
    supertype: Some(TypeKey::from_static("AudioEffect")),
    kind: TypeKind::Object,
    is_abstract: false,
    construct: None,
});

register_type!(DISTORTION: TypeDefStatic {
    key: TypeKey::from_static("Distortion"),
    name: "Distortion",
    supertype: Some(TypeKey::from_static("AudioEffect")),
    kind: TypeKind::Object,
    is_abstract: false,
    construct: None,
});

register_type!(EFFECT_CHAIN: TypeDefStatic {
    key: TypeKey::from_static("EffectChain"),
    name: "Effect Chain",
    supertype: None,
    kind: TypeKind::ListOf {
        elem: TypeKey::from_static("AudioEffect"),
    },
    is_abstract: false,
    construct: None,
});

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let registry = TypeRegistry::global();
    let effect = TypeKey::from_static("AudioEffect");
    let names = registry.concrete_types(&effect).names.clone();
    println!("concrete effects: {names:?}");
    // Link-time collection order is link-dependent, so look the picks up.
    let reverb = names
        .iter()
        .position(|n| n == "Reverb")
        .context("Reverb not registered")?;
    let distortion = names
        .iter()
        .position(|n| n == "Distortion")
        .context("Distortion not registered")?;

    let mut host = MemoryHost::new();
    let rack = host.spawn(&TypeKey::from_static("Rack"), "Main Rack");
    let effects = FieldKey::from_static("effects");
    host.add_field(
        rack,
        effects.clone(),
        "Effects",
        TypeKey::from_static("EffectChain"),
        true,
        FieldValue::Elements(Vec::new()),
    );
    host.add_field(
        rack,
        FieldKey::from_static("gain"),
        "Gain",
        TypeKey::from_static("Reverb"),
        false,
        FieldValue::Text("0.8".to_string()),
    );

    let mut session = InspectorSession::new(&host, registry, rack, InspectorConfig::default());
    let mut canvas = RecordingCanvas::new();
    let panel = Rect::new(0.0, 0.0, 400.0, 2000.0);

    let script: Vec<(&str, Vec<Interaction>)> = vec![
        ("initial", vec![]),
        ("pick Reverb and add", vec![
            Interaction::Pick(reverb),
            Interaction::Click("+".to_string()),
        ]),
        ("pick Distortion and add", vec![
            Interaction::Pick(distortion),
            Interaction::Click("+".to_string()),
        ]),
        ("expand the first element", vec![
            Interaction::Toggle("Element 0".to_string()),
        ]),
        ("rename it", vec![Interaction::Edit {
            old: "Reverb".to_string(),
            new: "Cathedral".to_string(),
        }]),
        ("settle", vec![]),
    ];

    for (step, interactions) in script {
        for interaction in interactions {
            canvas.interact(interaction);
        }
        session.begin_pass(&mut host);
        let height = session.total_height::<MemoryHost>();
        canvas.clear_ops();
        let consumed = session.draw(&mut canvas, &mut host, panel);
        let names: Vec<String> = host
            .elements(rack, &effects)
            .into_iter()
            .map(|e| host.object_name(e))
            .collect();
        println!("{step}: height {height} (consumed {consumed}), elements {names:?}");
    }

    session.dispose(&mut host);
    host.save();
    let json = host.saved_json.as_deref().context("no snapshot written")?;
    println!("--- persisted tree ---\n{json}");
    Ok(())
}
