//! Suggestion popup geometry and display state.

/// Rendered position of the caret glyph, in host screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaretCoords {
    pub bottom: f64,
    pub left: f64,
}

/// Bounding box of the editor container, in host screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

/// Where the popup is drawn, relative to the editor container.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PopupCoords {
    pub top: f64,
    pub left: f64,
}

/// Fixed padding placing the popup below and to the right of the caret.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PopupOffset {
    pub x: f64,
    pub y: f64,
}

impl Default for PopupOffset {
    fn default() -> Self {
        Self { x: 30.0, y: 80.0 }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PopupPositioner {
    offset: PopupOffset,
}

impl PopupPositioner {
    pub fn new(offset: PopupOffset) -> Self {
        Self { offset }
    }

    /// Map the caret's screen position into container-relative popup coordinates.
    ///
    /// Returns `None` when either the caret or the container geometry is unavailable.
    pub fn position(
        &self,
        caret: Option<CaretCoords>,
        container: Option<Rect>,
    ) -> Option<PopupCoords> {
        let caret = caret?;
        let container = container?;
        Some(PopupCoords {
            top: caret.bottom - container.top + self.offset.y,
            left: caret.left - container.left + self.offset.x,
        })
    }
}

/// Visibility, placement and highlight of the suggestion popup.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PopupState {
    visible: bool,
    coords: PopupCoords,
    selected_index: usize,
}

impl PopupState {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn coords(&self) -> PopupCoords {
        self.coords
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub(crate) fn set_coords(&mut self, coords: PopupCoords) {
        self.coords = coords;
    }

    pub(crate) fn show(&mut self) {
        self.visible = true;
    }

    pub(crate) fn hide(&mut self) {
        self.visible = false;
    }

    pub(crate) fn reset_selection(&mut self) {
        self.selected_index = 0;
    }

    /// Highlight entry `index` of a list holding `len` suggestions.
    /// Ignored while hidden or when `index` is out of range, so an empty
    /// visible list keeps index 0 without anything to point at.
    pub(crate) fn hover(&mut self, index: usize, len: usize) -> bool {
        if !self.visible || index >= len {
            return false;
        }
        self.selected_index = index;
        true
    }
}
