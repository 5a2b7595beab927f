//! Inspector root for one edited object: discovers its fields, classifies
//! each into an editing surface, and stacks them into one panel.

use std::sync::Arc;

use magpie_platform::tokens;
use magpie_platform::{Canvas, FieldKey, Host, ObjectHandle, Rect};
use magpie_registry::TypeRegistry;
use tracing::debug;

use crate::list_view::{ListFeatures, ListView};
use crate::mediator::{CollectionBinding, CollectionMediator};
use crate::object_drawer::ObjectDrawer;

/// Session-wide knobs. Widget features apply to every collection field.
#[derive(Clone, Copy, Debug, Default)]
pub struct InspectorConfig {
    pub features: ListFeatures,
}

/// One field's editing surface.
pub enum FieldRow {
    /// Nested field whose declared type resolved as an ordered container of
    /// assets.
    Collection {
        view: ListView,
        mediator: CollectionMediator,
    },
    /// Nested field holding a single asset reference.
    Inline { drawer: ObjectDrawer },
    /// Nested field that resolved as neither. Inert help box.
    Degraded { field: FieldKey, message: String },
    /// Unmarked field, shown read-only.
    Plain { field: FieldKey, label: String },
}

pub struct InspectorSession {
    target: ObjectHandle,
    rows: Vec<FieldRow>,
}

impl InspectorSession {
    /// Build a session for `target`, classifying every field it declares.
    pub fn new<H: Host>(
        host: &H,
        registry: Arc<TypeRegistry>,
        target: ObjectHandle,
        config: InspectorConfig,
    ) -> Self {
        let root = host.asset_root();
        let mut rows = Vec::new();
        for decl in host.fields(target) {
            if !decl.nested {
                rows.push(FieldRow::Plain {
                    field: decl.field,
                    label: decl.label,
                });
                continue;
            }

            let declared = host.declared_type(target, &decl.field);
            match registry.resolve_container(&declared, &root) {
                Ok(info) => {
                    let binding = CollectionBinding {
                        owner: target,
                        field: decl.field,
                        shape: info.shape,
                        base: info.element,
                        label: decl.label,
                    };
                    rows.push(FieldRow::Collection {
                        view: ListView::new(config.features),
                        mediator: CollectionMediator::new(binding, registry.clone()),
                    });
                }
                Err(err) if registry.is_assignable(&declared, &root) => {
                    debug!("field {} edits a single reference ({err})", decl.field);
                    rows.push(FieldRow::Inline {
                        drawer: ObjectDrawer::new(decl.field, decl.label),
                    });
                }
                Err(err) => {
                    rows.push(FieldRow::Degraded {
                        field: decl.field,
                        message: format!("{}: {err}", decl.label),
                    });
                }
            }
        }
        Self { target, rows }
    }

    pub fn target(&self) -> ObjectHandle {
        self.target
    }

    pub fn rows(&self) -> &[FieldRow] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [FieldRow] {
        &mut self.rows
    }

    /// Apply queued edits and snapshot every surface for the coming pass.
    pub fn begin_pass<H: Host>(&mut self, host: &mut H) {
        for row in &mut self.rows {
            match row {
                FieldRow::Collection { mediator, .. } => mediator.begin_pass(host),
                FieldRow::Inline { drawer } => drawer.begin_pass(host, self.target),
                FieldRow::Degraded { .. } | FieldRow::Plain { .. } => {}
            }
        }
    }

    /// Panel height for the current pass. Equals what [`draw`] consumes.
    ///
    /// [`draw`]: InspectorSession::draw
    pub fn total_height<H: Host>(&self) -> f32 {
        self.rows
            .iter()
            .map(|row| match row {
                FieldRow::Collection { view, mediator } => view.height::<H, _>(mediator),
                FieldRow::Inline { drawer } => drawer.height(),
                FieldRow::Degraded { .. } => tokens::ERROR_BOX_HEIGHT + tokens::VERTICAL_SPACING,
                FieldRow::Plain { .. } => tokens::ROW_HEIGHT,
            })
            .sum()
    }

    /// Draw the panel and return the consumed height.
    pub fn draw<H: Host>(&mut self, canvas: &mut dyn Canvas, host: &mut H, origin: Rect) -> f32 {
        let mut y = origin.y;
        for row in &mut self.rows {
            match row {
                FieldRow::Collection { view, mediator } => {
                    let rect = Rect::new(origin.x, y, origin.width, view.height::<H, _>(mediator));
                    y += view.draw(canvas, host, mediator, rect);
                }
                FieldRow::Inline { drawer } => {
                    let rect = Rect::new(origin.x, y, origin.width, drawer.height());
                    y += drawer.draw(canvas, host, rect);
                }
                FieldRow::Degraded { message, .. } => {
                    let rect = Rect::new(origin.x, y, origin.width, tokens::ERROR_BOX_HEIGHT);
                    canvas.help_box(rect, message);
                    y += tokens::ERROR_BOX_HEIGHT + tokens::VERTICAL_SPACING;
                }
                FieldRow::Plain { field, label } => {
                    let line = Rect::new(origin.x, y, origin.width, tokens::LINE_HEIGHT);
                    let (label_rect, value_rect) =
                        line.split_left(tokens::LABEL_WIDTH, tokens::COLUMN_SPACE);
                    canvas.label(label_rect, label);
                    canvas.label(value_rect, &host.value_text(self.target, field));
                    y += tokens::ROW_HEIGHT;
                }
            }
        }
        y - origin.y
    }

    /// Release every cached sub-editor and all expansion state.
    pub fn dispose<H: Host>(&mut self, host: &mut H) {
        for row in &mut self.rows {
            match row {
                FieldRow::Collection { mediator, .. } => mediator.dispose(host),
                FieldRow::Inline { drawer } => drawer.dispose(host),
                FieldRow::Degraded { .. } | FieldRow::Plain { .. } => {}
            }
        }
    }
}
