/// Coarse classification of [`Error`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A caller passed a value outside of an operation's contract
    InvalidArgument,
    /// The four corners do not span a quadrilateral
    DegenerateQuadrilateral,
    /// A grid lookup addressed a cell outside the configured dimensions
    OutOfRange,
}

/// Errors raised by quantization, extraction and grid projection
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Palette size was below two colors
    #[error("color count must be at least 2, got {0}")]
    ColorCountOutOfBounds(usize),
    /// Quantization was given no samples
    #[error("cannot quantize an empty set of samples")]
    NoSamples,
    /// The image has no pixels
    #[error("image dimensions cannot be zero ({width}x{height})")]
    EmptyImage {
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },
    /// Grid dimensions must be at least 1x1
    #[error("grid dimensions must be at least 1x1, got {columns}x{rows}")]
    InvalidDimensions {
        /// Requested column count
        columns: u32,
        /// Requested row count
        rows: u32,
    },
    /// Corner indices run from 0 (top-left) to 3 (bottom-left)
    #[error("corner index must be in 0..4, got {0}")]
    InvalidCornerIndex(usize),
    /// The corner determinant vanished
    #[error("corners are collinear or coincident")]
    DegenerateQuadrilateral,
    /// Lookup outside `[0, columns) x [0, rows)`
    #[error("cell ({column}, {row}) is outside the {columns}x{rows} grid")]
    CellOutOfRange {
        /// Requested column
        column: u32,
        /// Requested row
        row: u32,
        /// Grid columns
        columns: u32,
        /// Grid rows
        rows: u32,
    },
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ColorCountOutOfBounds(_)
            | Error::NoSamples
            | Error::EmptyImage { .. }
            | Error::InvalidDimensions { .. }
            | Error::InvalidCornerIndex(_) => ErrorKind::InvalidArgument,
            Error::DegenerateQuadrilateral => ErrorKind::DegenerateQuadrilateral,
            Error::CellOutOfRange { .. } => ErrorKind::OutOfRange,
        }
    }
}
