pub type XrdResult<T> = Result<T, XrdError>;

/// Coarse classification of [`XrdError`] variants, mirroring how callers are
/// expected to react: argument and peak-function errors are caller bugs and
/// fail fast, a missing symmetry entry allows degraded forward progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XrdErrorKind {
    InvalidArgument,
    InvalidPeakFunction,
    SymmetryNotFound,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum XrdError {
    #[error("exactly one of latt_abc and structure must be supplied")]
    AmbiguousLatticeSource,
    #[error("malformed lattice: {reason}")]
    MalformedLattice { reason: String },
    #[error("invalid theta2 axis: {reason}")]
    InvalidAxis { reason: String },
    #[error("wavelength must be a positive number, got {value}")]
    InvalidWavelength { value: f64 },
    #[error("dataset shape mismatch: axis has {axis_len} points, intensity has {intensity_len}")]
    DatasetShapeMismatch {
        axis_len: usize,
        intensity_len: usize,
    },
    #[error("experimental dataset is empty")]
    EmptyDataset,
    #[error("peak function must declare at least 2 positional parameters, got {declared}")]
    PeakFunctionArity { declared: usize },
    #[error("peak function requires {required} extra arguments, {supplied} supplied")]
    PeakFunctionArgs { required: usize, supplied: usize },
    #[error("no selection rule for space group {number} setting {setting}")]
    SelectionRuleNotFound { number: u16, setting: u16 },
    #[error("no selection rule for hall number {hall}")]
    HallNotFound { hall: u16 },
}

impl XrdError {
    pub const fn kind(&self) -> XrdErrorKind {
        match self {
            Self::AmbiguousLatticeSource
            | Self::MalformedLattice { .. }
            | Self::InvalidAxis { .. }
            | Self::InvalidWavelength { .. }
            | Self::DatasetShapeMismatch { .. }
            | Self::EmptyDataset => XrdErrorKind::InvalidArgument,
            Self::PeakFunctionArity { .. } | Self::PeakFunctionArgs { .. } => {
                XrdErrorKind::InvalidPeakFunction
            }
            Self::SelectionRuleNotFound { .. } | Self::HallNotFound { .. } => {
                XrdErrorKind::SymmetryNotFound
            }
        }
    }

    /// Whether the enumerator may continue with the accept-all selection rule.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self.kind(), XrdErrorKind::SymmetryNotFound)
    }
}
