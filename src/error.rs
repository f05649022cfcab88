//! Error types for world construction, entity edits and volume computation.

use thiserror::Error;

use crate::entity::{AnchorId, DelimiterId};

/// Errors reported by [`World`](crate::World) and [`WorldRegistry`](crate::WorldRegistry).
///
/// Every error is returned before any state is touched, so a failed call leaves the world as it was.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    /// The world handle is null, destroyed or from an older generation.
    #[error("invalid world handle")]
    InvalidWorldHandle,

    /// The anchor id does not belong to this world.
    #[error("anchor not found: {0:?}")]
    UnknownAnchor(AnchorId),

    /// The delimiter id does not belong to this world.
    #[error("delimiter not found: {0:?}")]
    UnknownDelimiter(DelimiterId),

    /// Half-extents must be finite; world half-extents must also be strictly positive.
    #[error("invalid half extents: {0:?}")]
    InvalidHalfExtents([f64; 3]),

    /// The orientation quaternion is zero or not finite.
    #[error("invalid orientation quaternion: {0:?}")]
    InvalidOrientation([f64; 4]),

    /// Cell size must be finite and strictly positive.
    #[error("invalid cell size: {0}")]
    InvalidCellSize(f64),

    /// Face indices run from 0 (+X) to 5 (-Z).
    #[error("invalid face index: {0}, expected 0..=5")]
    InvalidFaceIndex(u8),

    /// Extension flags contain bits outside of the four U/V directions.
    #[error("invalid virtual extension bits: {0:#x}")]
    InvalidExtension(u8),

    /// The delimiter already has a plane on this face and replacement is disabled.
    #[error("delimiter {delimiter:?} already has a plane on face {face}")]
    DuplicatePlane { delimiter: DelimiterId, face: u8 },

    /// The voxel grid for the requested cell size would exceed the configured cell budget.
    #[error("grid of {requested} cells exceeds the limit of {limit} cells")]
    CellLimitExceeded { requested: u128, limit: usize },
}

/// Result type for world operations.
pub type Result<T> = std::result::Result<T, WorldError>;
