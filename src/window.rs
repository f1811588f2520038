use crate::{Rect, WindowId};

/// The host's handle on whatever window currently has focus. It is handed
/// to each dispatch and never retained.
pub trait FocusedWindow {
    fn frame(&self) -> Rect;
    fn set_frame(&mut self, frame: Rect);
}

/// A plain in-memory window, used by the CLI and by hosts that track
/// geometry themselves.
#[derive(Debug, Clone)]
pub struct Window {
    pub id: WindowId,
    pub title: String,
    pub rect: Rect,
}

impl Window {
    pub fn new(id: WindowId, title: impl Into<String>, rect: Rect) -> Self {
        Self {
            id,
            title: title.into(),
            rect,
        }
    }
}

impl FocusedWindow for Window {
    fn frame(&self) -> Rect {
        self.rect
    }

    fn set_frame(&mut self, frame: Rect) {
        self.rect = frame;
    }
}
