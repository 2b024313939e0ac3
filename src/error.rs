//! Error types for the driver protocol.

use std::fmt;

/// Fatal failure while consuming or answering the driver protocol.
///
/// The protocol offers no recovery affordance: every variant aborts the
/// session with a diagnostic naming the offending token or state.
#[derive(Debug)]
pub enum ProtocolError {
    /// Underlying I/O failure on stdin or stdout.
    Io(std::io::Error),
    /// The stream ended inside a tick frame.
    UnexpectedEof,
    /// A token that should have been an integer.
    BadToken(String),
    /// A negative integer where only ids or the `-1` sentinel are valid.
    BadSentinel(i64),
    /// A non-positive value in the startup frame.
    BadStartup {
        /// Which startup field was malformed.
        field: &'static str,
        /// The value as read.
        value: i64,
    },
    /// A submission referenced a problem id that was never declared.
    UnknownProblem {
        /// The id as read.
        problem: usize,
        /// How many problems are registered.
        count: usize,
    },
    /// A verdict referenced a solution id that was never created.
    UnknownSolution {
        /// The id as read.
        solution: usize,
        /// How many solutions exist.
        count: usize,
    },
    /// A verdict for a test with no outstanding invocation.
    ///
    /// Covers verdicts for never-dispatched tests, duplicate verdicts, and
    /// any other free-invoker release the scheduler did not request.
    UnexpectedVerdict {
        /// Solution id of the offending verdict.
        solution: usize,
        /// Test index of the offending verdict.
        test: usize,
    },
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::UnexpectedEof => write!(f, "unexpected end of input inside a tick"),
            Self::BadToken(word) => write!(f, "expected an integer, got {word:?}"),
            Self::BadSentinel(value) => {
                write!(f, "negative value {value} is not an id or sentinel")
            }
            Self::BadStartup { field, value } => {
                write!(f, "startup field {field} has invalid value {value}")
            }
            Self::UnknownProblem { problem, count } => {
                write!(f, "submission for unknown problem {problem} ({count} declared)")
            }
            Self::UnknownSolution { solution, count } => {
                write!(f, "verdict for unknown solution {solution} ({count} known)")
            }
            Self::UnexpectedVerdict { solution, test } => {
                write!(
                    f,
                    "verdict for solution {solution} test {test} with no outstanding invocation"
                )
            }
        }
    }
}

impl std::error::Error for ProtocolError {}

impl From<std::io::Error> for ProtocolError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_offender() {
        let e = ProtocolError::BadToken("abc".into());
        assert!(e.to_string().contains("abc"));

        let e = ProtocolError::UnexpectedVerdict { solution: 3, test: 7 };
        let text = e.to_string();
        assert!(text.contains('3') && text.contains('7'));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        let e = ProtocolError::from(io);
        assert!(matches!(e, ProtocolError::Io(_)));
    }
}
