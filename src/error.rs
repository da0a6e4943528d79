use thiserror::Error;

// ---------------------------------------------------------------------------
// ParseError – everything that can go wrong while reading an export
// ---------------------------------------------------------------------------

/// Failure while turning raw export text into a dataset.
///
/// A parse either yields a complete dataset or one of these errors; there is
/// no partially-populated result.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Structural or numeric problem in the file. `line` is 1-based and
    /// refers to the offending line of the input text.
    #[error("malformed file at line {line}: {message}")]
    MalformedFile { line: u64, message: String },

    /// The acquisition-mode selector is not one of the recognized modes.
    #[error("unsupported acquisition mode: {0:?}")]
    UnsupportedMode(String),
}

impl ParseError {
    /// Shorthand used throughout the parser.
    pub(crate) fn malformed(line: u64, message: impl Into<String>) -> Self {
        ParseError::MalformedFile {
            line,
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// AnalysisError – post-parse transformations
// ---------------------------------------------------------------------------

/// Failure in a dataset transformation (baseline subtraction, integration,
/// concentration calculation). Parsing itself never produces these.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The two spectra do not share a wavelength axis.
    #[error("wavelength axes do not match: {0}")]
    AxisMismatch(String),

    /// A requested wavelength is not on the recorded axis.
    #[error("wavelength {0} nm not found on the recorded axis")]
    WavelengthNotFound(f64),

    /// The integration window selects no data points.
    #[error("integration window [{0}, {1}] contains no data points")]
    EmptyWindow(f64, f64),
}
