//! Error types for the camera engine and object loading.

/// A geometric configuration the engine cannot work with.
///
/// Every variant is recoverable: callers skip the gesture step or the frame
/// that produced it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    /// A vector that must be normalized has (near) zero length.
    #[error("cannot normalize zero-length {0}")]
    ZeroLength(&'static str),
    /// A matrix that must be inverted is singular.
    #[error("{0} is singular")]
    Singular(&'static str),
    /// A value fed into the geometry is NaN or infinite.
    #[error("{0} is not finite")]
    NonFinite(&'static str),
    /// A polygon was built from fewer than three vertices.
    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
}

impl GeometryError {
    /// Whether this error comes from degenerate camera or rotation geometry
    /// (as opposed to malformed input data).
    pub fn is_degenerate(&self) -> bool {
        matches!(self, Self::ZeroLength(_) | Self::Singular(_) | Self::NonFinite(_))
    }
}

/// A [`ViewSettings`](crate::ViewSettings) value the viewer cannot run with.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("{field} must be a positive finite number, got {value}")]
    NotPositive { field: &'static str, value: f64 },
}

/// Failure to parse an STL file into an [`Object`](crate::Object).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StlError {
    #[error("file too small to be a valid STL ({0} bytes)")]
    TooSmall(usize),
    #[error("binary STL declares {facets} facets but only {available} bytes follow the header")]
    Truncated { facets: usize, available: usize },
    #[error("failed to parse ASCII STL: {0}")]
    Ascii(String),
}
