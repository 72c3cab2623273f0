// src/error.rs
//
// Typed errors for frame encoding and serial transport.
//
// Every variant carries enough context (stage, expected vs actual sizes, port
// name) for a caller to render a diagnostic. Callers that only want a message
// can use `.map_err(String::from)`.

use std::fmt;

/// Errors produced by the frame encoder, the serial link and the settings layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum P10Error {
    /// Input grid is not exactly 16 rows by 32 columns
    ShapeMismatch {
        stage: &'static str,
        expected_rows: usize,
        expected_cols: usize,
        actual_rows: usize,
        actual_cols: usize,
    },
    /// Intermediate byte matrix is not exactly 16 rows by 4 blocks
    MalformedIntermediate {
        expected_rows: usize,
        expected_cols: usize,
        actual_rows: usize,
        actual_cols: usize,
    },
    /// Hex frame text is the wrong length or contains non-hex characters
    InvalidFrame { reason: String },
    /// Text pattern could not be parsed into a grid
    Pattern { line: usize, reason: String },
    /// Port could not be opened (in use, removed, permission denied)
    PortUnavailable { port: String, reason: String },
    /// Send attempted on a handle that is not open
    NotOpen { port: Option<String> },
    /// Fewer bytes reached the driver than were requested
    ShortWrite {
        port: String,
        expected: usize,
        written: usize,
        reason: Option<String>,
    },
    /// Every byte reached the driver but flushing the port failed
    FlushFailed {
        port: String,
        written: usize,
        reason: String,
    },
    /// OS port enumeration failed
    Enumeration { reason: String },
    /// Settings file could not be read, parsed or written
    Settings { reason: String },
}

impl P10Error {
    pub fn shape(
        stage: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    ) -> Self {
        P10Error::ShapeMismatch {
            stage,
            expected_rows: expected.0,
            expected_cols: expected.1,
            actual_rows: actual.0,
            actual_cols: actual.1,
        }
    }

    pub fn malformed_intermediate(expected: (usize, usize), actual: (usize, usize)) -> Self {
        P10Error::MalformedIntermediate {
            expected_rows: expected.0,
            expected_cols: expected.1,
            actual_rows: actual.0,
            actual_cols: actual.1,
        }
    }

    pub fn invalid_frame(reason: impl Into<String>) -> Self {
        P10Error::InvalidFrame {
            reason: reason.into(),
        }
    }

    pub fn pattern(line: usize, reason: impl Into<String>) -> Self {
        P10Error::Pattern {
            line,
            reason: reason.into(),
        }
    }

    pub fn port_unavailable(port: impl Into<String>, reason: impl Into<String>) -> Self {
        P10Error::PortUnavailable {
            port: port.into(),
            reason: reason.into(),
        }
    }

    pub fn settings(reason: impl Into<String>) -> Self {
        P10Error::Settings {
            reason: reason.into(),
        }
    }

    /// True for transport failures the caller may retry by hand.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            P10Error::PortUnavailable { .. }
                | P10Error::ShortWrite { .. }
                | P10Error::FlushFailed { .. }
        )
    }
}

impl fmt::Display for P10Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            P10Error::ShapeMismatch {
                stage,
                expected_rows,
                expected_cols,
                actual_rows,
                actual_cols,
            } => write!(
                f,
                "{}: grid shape mismatch, expected {}x{}, got {}x{}",
                stage, expected_rows, expected_cols, actual_rows, actual_cols
            ),
            P10Error::MalformedIntermediate {
                expected_rows,
                expected_cols,
                actual_rows,
                actual_cols,
            } => write!(
                f,
                "frame assembly: intermediate matrix must be {}x{}, got {}x{}",
                expected_rows, expected_cols, actual_rows, actual_cols
            ),
            P10Error::InvalidFrame { reason } => write!(f, "invalid frame: {}", reason),
            P10Error::Pattern { line, reason } => {
                write!(f, "pattern line {}: {}", line, reason)
            }
            P10Error::PortUnavailable { port, reason } => {
                write!(f, "Failed to open {}: {}", port, reason)
            }
            P10Error::NotOpen { port: Some(port) } => write!(f, "Port {} is not open", port),
            P10Error::NotOpen { port: None } => write!(f, "No port is open"),
            P10Error::ShortWrite {
                port,
                expected,
                written,
                reason,
            } => {
                write!(
                    f,
                    "Short write on {}: {} of {} bytes written",
                    port, written, expected
                )?;
                if let Some(reason) = reason {
                    write!(f, " ({})", reason)?;
                }
                Ok(())
            }
            P10Error::FlushFailed {
                port,
                written,
                reason,
            } => write!(
                f,
                "Flush failed on {} after {} bytes written: {}",
                port, written, reason
            ),
            P10Error::Enumeration { reason } => {
                write!(f, "Failed to enumerate ports: {}", reason)
            }
            P10Error::Settings { reason } => write!(f, "settings: {}", reason),
        }
    }
}

impl std::error::Error for P10Error {}

impl From<P10Error> for String {
    fn from(e: P10Error) -> Self {
        e.to_string()
    }
}
