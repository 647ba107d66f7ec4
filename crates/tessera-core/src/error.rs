use std::path::PathBuf;

use crate::component::SubComponentId;
use crate::geometry::Rect;

#[derive(Debug, thiserror::Error)]
pub enum GuiError {
    /// A zero-width or zero-height rectangle was used to remap coordinates.
    #[error(
        "degenerate bounds ({}, {})-({}, {}) cannot be used for coordinate remapping",
        .0.min_x, .0.min_y, .0.max_x, .0.max_y
    )]
    DegenerateBounds(Rect),

    #[error(
        "invalid bounds ({}, {})-({}, {}): min must not exceed max and all values must be finite",
        .0.min_x, .0.min_y, .0.max_x, .0.max_y
    )]
    InvalidBounds(Rect),

    #[error("component {0:?} is not part of this menu")]
    ComponentNotFound(SubComponentId),

    #[error("failed to load texture from {path:?}")]
    TextureLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("font error: {0}")]
    Font(String),

    #[error("window is not open")]
    NotOpen,

    /// A shared component was dispatched to while an outer dispatch still
    /// borrows it.
    #[error("reentrant dispatch into {0}")]
    Reentrant(String),
}

pub type GuiResult<T> = Result<T, GuiError>;
