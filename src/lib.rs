pub mod config;
pub mod error;
pub mod expr;
pub mod hotkeys;
pub mod operation;
pub mod presets;
pub mod window;

pub use config::{build, Config, Tables};
pub use error::{ConfigError, EvalError};
pub use hotkeys::{BindingTable, Dispatch, Key, Keychord, ModifierKey};
pub use operation::{Direction, Operation, OperationTable, PushStyle};
pub use presets::Profile;
pub use window::{FocusedWindow, Window};

pub type Result<T> = anyhow::Result<T>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// The usable area of the display a window lives on, as reported by the
/// host at the moment an operation is invoked.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ScreenMetrics {
    pub origin_x: f64,
    pub origin_y: f64,
    pub size_x: f64,
    pub size_y: f64,
}

impl ScreenMetrics {
    pub fn new(origin_x: f64, origin_y: f64, size_x: f64, size_y: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            size_x,
            size_y,
        }
    }

    pub fn as_rect(&self) -> Rect {
        Rect::new(self.origin_x, self.origin_y, self.size_x, self.size_y)
    }
}

impl From<Rect> for ScreenMetrics {
    fn from(rect: Rect) -> Self {
        Self::new(rect.x, rect.y, rect.width, rect.height)
    }
}
