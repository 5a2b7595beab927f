//! Polymorphic-collection editing for inspector panels.
//!
//! A collection field whose elements all derive from one base type gets an
//! interactive list surface: each element independently creatable (from the
//! set of registered concrete subtypes), renamable, removable, and
//! expandable into its own nested editor. The host platform (assets,
//! reflection, widgets, persistence) stays behind the contracts in
//! [`magpie_platform`]; the type universe lives in [`magpie_registry`].
//!
//! Structural edits requested during a redraw are queued and applied at the
//! top of the next pass, so layout and paint of any one pass always read the
//! same snapshot.

pub mod editor_cache;
pub mod factory;
pub mod list_view;
pub mod mediator;
pub mod object_drawer;
pub mod rows;
pub mod session;
pub mod store;

pub use editor_cache::NestedEditorCache;
pub use factory::ElementFactory;
pub use list_view::{ListDelegate, ListFeatures, ListView};
pub use mediator::{CollectionBinding, CollectionMediator, EditOp, ExpansionLedger};
pub use object_drawer::ObjectDrawer;
pub use rows::{PassSnapshot, RowSnapshot};
pub use session::{FieldRow, InspectorConfig, InspectorSession};
pub use store::{ElementSeq, bind_seq};

pub use magpie_platform as platform;
pub use magpie_registry as registry;
