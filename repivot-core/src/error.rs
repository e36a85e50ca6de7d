/// Error types for pivot estimation, rebasing and STL I/O
use thiserror::Error;

/// Result type alias for pivot operations.
pub type PivotResult<T> = Result<T, PivotError>;

/// Errors raised by the estimator, the rebaser and the pivot session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PivotError {
    /// The mesh has no vertices, so no pivot can be derived from it.
    #[error("mesh has no vertices")]
    EmptyMesh,

    /// The local-to-world transform cannot be inverted.
    #[error("transform is not invertible: {0}")]
    DegenerateTransform(String),

    /// A pivot operation was requested while no edit was in progress.
    #[error("no pivot edit in progress")]
    NotEditing,

    /// An edit was started without a selected mesh.
    #[error("no mesh selected")]
    NoSelection,
}

impl PivotError {
    /// Create a degenerate transform error.
    #[must_use]
    pub fn degenerate_transform(details: impl Into<String>) -> Self {
        Self::DegenerateTransform(details.into())
    }
}

/// Errors raised while reading or writing STL data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StlError {
    #[error("file too small to be a valid STL ({0} bytes)")]
    TooSmall(usize),

    #[error("unexpected end of file after {read} of {expected} facets")]
    Truncated { read: usize, expected: usize },

    #[error("failed to parse ASCII STL: {0}")]
    Ascii(String),

    #[error("face {face} references vertex {index}, mesh has {count}")]
    BadIndex { face: usize, index: u32, count: usize },

    #[error("failed to format ASCII STL")]
    Format(#[from] std::fmt::Error),
}
