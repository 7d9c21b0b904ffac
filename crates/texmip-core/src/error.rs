use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    SizeMismatch {
        expected: usize,
        actual: usize,
    },
    OutOfBounds,
    InvalidStride,
    InvalidArgument {
        reason: &'static str,
    },
    /// The source of `level` is smaller than 2x2 and cannot be halved.
    InvalidDimension {
        level: usize,
        width: usize,
        height: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch { expected, actual } => {
                write!(f, "size mismatch: expected {expected}, got {actual}")
            }
            Self::OutOfBounds => write!(f, "out of bounds"),
            Self::InvalidStride => write!(f, "invalid stride"),
            Self::InvalidArgument { reason } => write!(f, "invalid argument: {reason}"),
            Self::InvalidDimension {
                level,
                width,
                height,
            } => write!(
                f,
                "invalid dimension: cannot derive mip level {level} from a {width}x{height} source"
            ),
        }
    }
}

impl std::error::Error for Error {}

/// Converts a signed mip level index into a `usize` level.
///
/// Negative indices are rejected with [`Error::InvalidArgument`].
pub fn mip_level_index(level: i64) -> Result<usize, Error> {
    if level < 0 {
        return Err(Error::InvalidArgument {
            reason: "mip level must be non-negative",
        });
    }
    usize::try_from(level).map_err(|_| Error::InvalidArgument {
        reason: "mip level does not fit in usize",
    })
}
