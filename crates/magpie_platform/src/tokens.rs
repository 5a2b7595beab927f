// Layout metrics shared by every inspector row. All coordinates are
// y-down screen space; heights include no margins unless noted.

// ---------------------------------------------------------------------------
// Line & row metrics
// ---------------------------------------------------------------------------

/// Height of a single widget line.
pub const LINE_HEIGHT: f32 = 18.0;
/// Vertical gap between stacked lines.
pub const VERTICAL_SPACING: f32 = 2.0;
/// Height of one collection row (one line plus its gap).
pub const ROW_HEIGHT: f32 = LINE_HEIGHT + VERTICAL_SPACING;

// ---------------------------------------------------------------------------
// List chrome
// ---------------------------------------------------------------------------

/// List header strip.
pub const HEADER_HEIGHT: f32 = ROW_HEIGHT;
/// List footer strip holding the create controls.
pub const FOOTER_HEIGHT: f32 = ROW_HEIGHT;
/// Footer add/remove buttons never grow past this width.
pub const FOOTER_BUTTON_MAX: f32 = 50.0;
/// Horizontal slack reserved around the footer controls.
pub const FOOTER_MARGIN: f32 = 30.0;

// ---------------------------------------------------------------------------
// Element row columns
// ---------------------------------------------------------------------------

/// Width reserved for field labels and element foldouts.
pub const LABEL_WIDTH: f32 = 150.0;
/// Horizontal gap between columns in an element row.
pub const COLUMN_SPACE: f32 = 6.0;
/// Relative width of the object-reference column.
pub const OBJECT_WEIGHT: f32 = 1.0;
/// Relative width of the editable-name column.
pub const NAME_WEIGHT: f32 = 1.0;

// ---------------------------------------------------------------------------
// Degraded rows
// ---------------------------------------------------------------------------

/// Fixed height of the inert help box shown for uneditable fields.
pub const ERROR_BOX_HEIGHT: f32 = 25.0;
