//! Per-pass row snapshots. Layout and paint both read one [`PassSnapshot`],
//! so the height the widget reserves always matches what gets drawn.

use magpie_platform::tokens;
use magpie_platform::{EditorId, ObjectHandle};

/// One collection row as captured at the top of a pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RowSnapshot {
    pub handle: ObjectHandle,
    pub expanded: bool,
    /// Sub-editor body to draw under the row line. `None` when collapsed or
    /// when the editor reports no content.
    pub block: Option<(EditorId, f32)>,
}

impl RowSnapshot {
    /// Row line plus, when a body is present, its height and one row of
    /// padding.
    pub fn height(&self) -> f32 {
        match self.block {
            Some((_, body)) => tokens::ROW_HEIGHT + body + tokens::ROW_HEIGHT,
            None => tokens::ROW_HEIGHT,
        }
    }
}

/// All rows of one mediator pass.
#[derive(Clone, Debug, Default)]
pub struct PassSnapshot {
    pub rows: Vec<RowSnapshot>,
}

impl PassSnapshot {
    pub fn row(&self, index: usize) -> Option<RowSnapshot> {
        self.rows.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of all row heights. An empty collection still shows one
    /// placeholder row.
    pub fn total_height(&self) -> f32 {
        if self.rows.is_empty() {
            return tokens::ROW_HEIGHT;
        }
        self.rows.iter().map(RowSnapshot::height).sum()
    }
}
