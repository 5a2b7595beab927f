use crate::id::ObjectHandle;

// ---------------------------------------------------------------------------
// Rect
// ---------------------------------------------------------------------------

/// Screen-space rectangle, origin at the top left, y growing downward.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Same origin and width, new height.
    pub fn with_height(self, height: f32) -> Self {
        Self { height, ..self }
    }

    /// Shift down by `dy`.
    pub fn offset_y(self, dy: f32) -> Self {
        Self {
            y: self.y + dy,
            ..self
        }
    }

    /// Split off a left column of `width`, leaving `gap` before the remainder.
    pub fn split_left(self, width: f32, gap: f32) -> (Rect, Rect) {
        let left = Self { width, ..self };
        let right = Self {
            x: self.x + width + gap,
            width: (self.width - width - gap).max(0.0),
            ..self
        };
        (left, right)
    }
}

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

/// Immediate-mode drawing primitives supplied by the host GUI toolkit.
///
/// Interactive primitives report this frame's user input through their
/// return value; `None` or `false` means the control was only painted.
pub trait Canvas {
    fn label(&mut self, rect: Rect, text: &str);

    /// Draw a fold triangle plus label. Returns the expansion flag after
    /// this frame's input.
    fn foldout(&mut self, rect: Rect, label: &str, expanded: bool) -> bool;

    /// Read-only reference to a persisted object.
    fn object_field(&mut self, rect: Rect, object: Option<ObjectHandle>, display: &str);

    /// Editable text. Returns the new content when the user committed an edit.
    fn text_field(&mut self, rect: Rect, text: &str) -> Option<String>;

    /// Dropdown over `options`. Returns the newly picked index, which is not
    /// guaranteed to be in range for `options`.
    fn popup(&mut self, rect: Rect, selected: usize, options: &[String]) -> Option<usize>;

    /// Returns true when clicked this frame.
    fn button(&mut self, rect: Rect, label: &str) -> bool;

    /// Inert error/info box.
    fn help_box(&mut self, rect: Rect, message: &str);
}
