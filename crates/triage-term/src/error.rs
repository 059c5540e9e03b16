//! Error types for rendering

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Screen not initialized")]
    NotInitialized,

    #[error("Screen already initialized")]
    AlreadyInitialized,

    #[error("Screen is closed")]
    Closed,

    #[error("Row {row} is outside a {height}-row screen")]
    RowOutOfBounds { row: u16, height: u16 },

    #[error("Terminal error: {0}")]
    Io(#[from] std::io::Error),
}
