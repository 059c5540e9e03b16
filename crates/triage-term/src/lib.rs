//! triage-term: Character-terminal rendering for triage
//!
//! A [`Screen`] owns the terminal for one display session and repaints a
//! header, an ordered body of [`Line`]s and a footer as one frame.

pub mod error;
pub mod line;
pub mod screen;
pub mod surface;
pub mod text;

pub use error::RenderError;
pub use line::Line;
pub use screen::{Canvas, Screen, ScreenState};
pub use surface::Surface;
pub use text::{ELLIPSIS, fit, truncate};

/// Result type for rendering operations
pub type Result<T> = std::result::Result<T, RenderError>;
