//! Headless list/foldout widget: allocates header, row, and footer rects,
//! drives a [`ListDelegate`], and tracks the selected row. Stands in for the
//! host GUI toolkit's list widget so the delegate contract is exercisable.

use bitflags::bitflags;
use magpie_platform::tokens;
use magpie_platform::{Canvas, Host, Rect};
use tracing::debug;

bitflags! {
    /// Widget capabilities, mirroring the host list's constructor flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ListFeatures: u8 {
        const HEADER        = 1 << 0;
        const ADD_BUTTON    = 1 << 1;
        const REMOVE_BUTTON = 1 << 2;
        const DRAGGABLE     = 1 << 3;
    }
}

impl Default for ListFeatures {
    fn default() -> Self {
        Self::all()
    }
}

// ---------------------------------------------------------------------------
// ListDelegate
// ---------------------------------------------------------------------------

/// What the widget asks of its content. Draw callbacks paint against the
/// delegate's current pass; the `*_requested` triggers only enqueue; the
/// delegate applies them at the top of its next pass.
pub trait ListDelegate<H: Host> {
    fn row_count(&self) -> usize;

    fn element_height(&self, index: usize) -> f32;

    fn draw_header(&mut self, canvas: &mut dyn Canvas, rect: Rect);

    fn draw_element(&mut self, canvas: &mut dyn Canvas, host: &mut H, index: usize, rect: Rect);

    fn draw_footer(
        &mut self,
        canvas: &mut dyn Canvas,
        rect: Rect,
        selected: Option<usize>,
        features: ListFeatures,
    );

    /// The widget reports the row a user interaction touched. Informational;
    /// structural edits never key off it.
    fn on_changed(&mut self, index: usize);

    fn add_requested(&mut self, type_name: &str);

    fn remove_requested(&mut self, index: usize);

    fn reorder_requested(&mut self, from: usize, to: usize);
}

// ---------------------------------------------------------------------------
// ListView
// ---------------------------------------------------------------------------

pub struct ListView {
    features: ListFeatures,
    selected: Option<usize>,
}

impl Default for ListView {
    fn default() -> Self {
        Self::new(ListFeatures::default())
    }
}

impl ListView {
    pub fn new(features: ListFeatures) -> Self {
        Self {
            features,
            selected: None,
        }
    }

    pub fn features(&self) -> ListFeatures {
        self.features
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index;
    }

    fn has_footer(&self) -> bool {
        self.features
            .intersects(ListFeatures::ADD_BUTTON | ListFeatures::REMOVE_BUTTON)
    }

    /// Total height the widget will consume for the delegate's current pass.
    pub fn height<H: Host, D: ListDelegate<H>>(&self, delegate: &D) -> f32 {
        let mut total = 0.0;
        if self.features.contains(ListFeatures::HEADER) {
            total += tokens::HEADER_HEIGHT;
        }
        let rows = delegate.row_count();
        if rows == 0 {
            total += tokens::ROW_HEIGHT;
        } else {
            for index in 0..rows {
                total += delegate.element_height(index);
            }
        }
        if self.has_footer() {
            total += tokens::FOOTER_HEIGHT;
        }
        total
    }

    /// Draw one pass and return the height consumed, which equals
    /// [`ListView::height`] for the same pass.
    pub fn draw<H: Host, D: ListDelegate<H>>(
        &mut self,
        canvas: &mut dyn Canvas,
        host: &mut H,
        delegate: &mut D,
        origin: Rect,
    ) -> f32 {
        let mut y = origin.y;
        if self.features.contains(ListFeatures::HEADER) {
            let rect = Rect::new(origin.x, y, origin.width, tokens::HEADER_HEIGHT);
            delegate.draw_header(canvas, rect);
            y += tokens::HEADER_HEIGHT;
        }

        let rows = delegate.row_count();
        if let Some(selected) = self.selected
            && selected >= rows
        {
            self.selected = None;
        }
        if rows == 0 {
            let rect = Rect::new(origin.x, y, origin.width, tokens::LINE_HEIGHT);
            canvas.label(rect, "List is Empty");
            y += tokens::ROW_HEIGHT;
        } else {
            for index in 0..rows {
                let height = delegate.element_height(index);
                let rect = Rect::new(origin.x, y, origin.width, height);
                delegate.draw_element(canvas, host, index, rect);
                y += height;
            }
        }

        if self.has_footer() {
            let rect = Rect::new(origin.x, y, origin.width, tokens::FOOTER_HEIGHT);
            delegate.draw_footer(canvas, rect, self.selected, self.features);
            y += tokens::FOOTER_HEIGHT;
        }
        y - origin.y
    }

    /// Drag a row to a new position. Ignored unless the widget is draggable.
    pub fn drag<H: Host, D: ListDelegate<H>>(
        &mut self,
        delegate: &mut D,
        from: usize,
        to: usize,
    ) -> bool {
        if !self.features.contains(ListFeatures::DRAGGABLE) {
            debug!("drag ignored, widget is not draggable");
            return false;
        }
        delegate.reorder_requested(from, to);
        delegate.on_changed(to);
        self.selected = Some(to);
        true
    }
}
