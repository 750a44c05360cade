//! Error types for the point cloud kernels
//!
//! ## Table of Contents
//! 1. KernelError - Main error enum
//! 2. Outcome dispatch - maps an error to the stdout/exit-code behavior in §7

use thiserror::Error;

/// Errors that can occur while framing, validating, or running a kernel.
#[derive(Error, Debug)]
pub enum KernelError {
    /// Stdin was closed before the declared header or payload was fully read.
    #[error("truncated input: {0}")]
    Truncated(String),

    /// The header declared more data than the validation ceiling allows.
    #[error("oversized input: {0}")]
    Oversized(String),

    /// A scalar parameter (voxel size, radius, iteration count) failed validation.
    /// This is a *soft* rejection: callers still get an empty, well-formed result.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The caller-supplied bounds were non-finite or inverted on an axis.
    #[error("invalid bounds: {0}")]
    InvalidBounds(String),

    /// Any other unexpected failure (allocation, internal invariant).
    #[error("internal failure: {0}")]
    Internal(String),

    /// Propagated I/O error from stdin/stdout.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, KernelError>;

/// What a binary should do with a `KernelError` on the way out, per §7's taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// Whether to write the empty `u32 0` marker to stdout before exiting.
    pub write_empty_result: bool,
    /// Process exit code.
    pub exit_code: i32,
}

impl KernelError {
    /// Classify this error into the write/exit behavior the binary should perform.
    pub fn outcome(&self) -> Outcome {
        match self {
            KernelError::Truncated(_) => Outcome {
                write_empty_result: false,
                exit_code: 1,
            },
            KernelError::InvalidParameter(_) => Outcome {
                write_empty_result: true,
                exit_code: 0,
            },
            KernelError::Oversized(_) => Outcome {
                write_empty_result: false,
                exit_code: 1,
            },
            KernelError::InvalidBounds(_) | KernelError::Internal(_) | KernelError::Io(_) => Outcome {
                write_empty_result: true,
                exit_code: 1,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_writes_nothing_and_fails() {
        let o = KernelError::Truncated("short read".into()).outcome();
        assert!(!o.write_empty_result);
        assert_eq!(o.exit_code, 1);
    }

    #[test]
    fn invalid_parameter_is_a_soft_rejection() {
        let o = KernelError::InvalidParameter("voxel_size <= 0".into()).outcome();
        assert!(o.write_empty_result);
        assert_eq!(o.exit_code, 0);
    }

    #[test]
    fn oversized_writes_nothing_and_fails() {
        let o = KernelError::Oversized("point_count too large".into()).outcome();
        assert!(!o.write_empty_result);
        assert_eq!(o.exit_code, 1);
    }

    #[test]
    fn invalid_bounds_is_fatal() {
        let o = KernelError::InvalidBounds("min_x is NaN".into()).outcome();
        assert!(o.write_empty_result);
        assert_eq!(o.exit_code, 1);
    }
}
