//! Error types for seqstore

use std::fmt;
use std::io;

/// Result type alias for seqstore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for sequence and workload operations
#[derive(Debug)]
pub enum Error {
    /// Position outside the sequence
    IndexOutOfBounds {
        /// Requested position
        index: usize,
        /// Sequence length at the time of the call
        len: usize,
    },

    /// Interval with `l > r`
    InvalidRange {
        /// Left bound
        l: usize,
        /// Right bound
        r: usize,
    },

    /// Interval sum does not fit in an `i64`
    SumOverflow {
        /// Left bound
        l: usize,
        /// Right bound
        r: usize,
    },

    /// Memoized value does not fit the value type for input n
    Overflow(u64),

    /// Workload script parse error
    Parse(String),

    /// I/O error
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IndexOutOfBounds { index, len } => {
                write!(f, "Index out of bounds: {} (len {})", index, len)
            }
            Error::InvalidRange { l, r } => write!(f, "Invalid range: [{}, {}]", l, r),
            Error::SumOverflow { l, r } => write!(f, "Sum overflow over [{}, {}]", l, r),
            Error::Overflow(n) => write!(f, "Value overflow at n = {}", n),
            Error::Parse(msg) => write!(f, "Parse error: {}", msg),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<nom::Err<nom::error::Error<&str>>> for Error {
    fn from(err: nom::Err<nom::error::Error<&str>>) -> Self {
        Error::Parse(format!("{:?}", err))
    }
}
