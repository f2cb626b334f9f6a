//! Error types and the fatal error channel.
//!
//! Two classes of failure exist:
//! - *Recoverable* caller mistakes (bad table shapes, empty or out-of-range
//!   observation sequences) surface as [`ModelError`] and [`DecodeError`].
//! - *Fatal* allocation failure inside the scratch storage goes through
//!   [`fatal`], which reports on stderr and terminates the process.

use thiserror::Error;

/// Exit status used by [`fatal`].
pub const FATAL_EXIT_CODE: i32 = -1;

/// Errors raised while assembling an [`Hmm`](crate::hmm::Hmm).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("model must have at least one hidden state")]
    NoStates,

    #[error("model must have at least one observable symbol")]
    NoObservables,

    #[error("{table} table has {actual} entries, expected {expected}")]
    ShapeMismatch {
        table: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{table} row {row} has {actual} entries, expected {expected}")]
    RaggedRow {
        table: &'static str,
        row: usize,
        expected: usize,
        actual: usize,
    },
}

/// Errors raised by the checked decode entry points.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("observation sequence is empty")]
    EmptySequence,

    #[error("observation {value} at position {index} is outside the alphabet of {n_obs} symbols")]
    ObservationOutOfRange {
        index: usize,
        value: usize,
        n_obs: usize,
    },
}

pub type ModelResult<T> = Result<T, ModelError>;
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Report an unrecoverable failure and terminate the process.
///
/// Used only for allocation failure in [`crate::storage`]. Never returns.
#[cold]
pub fn fatal(label: &str, detail: &dyn std::fmt::Display) -> ! {
    #[cfg(feature = "tracing")]
    tracing::error!(label, %detail, "fatal error, terminating");
    eprintln!("*** ERROR: {label}: {detail}");
    std::process::exit(FATAL_EXIT_CODE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_messages_name_the_offender() {
        let err = DecodeError::ObservationOutOfRange {
            index: 3,
            value: 7,
            n_obs: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains("position 3"));
        assert!(msg.contains('7'));
        assert!(msg.contains("4 symbols"));
    }

    #[test]
    fn shape_mismatch_message() {
        let err = ModelError::ShapeMismatch {
            table: "transition",
            expected: 9,
            actual: 6,
        };
        assert_eq!(err.to_string(), "transition table has 6 entries, expected 9");
    }
}
