use std::fmt;

/// Custom error type for C/C++test report extraction and invocation
#[derive(Debug)]
pub enum CpptestError {
    /// The report has no `runs`, or `runs` is empty
    MissingRuns,

    /// A run was produced by a tool other than the expected one
    UnrecognizedTool {
        run: usize,
        expected: String,
        found: Option<String>,
    },

    /// A run's `semanticVersion` is missing or not valid semver syntax
    UnparseableToolVersion { run: usize, version: Option<String> },

    /// A run has no `results` sequence
    MissingResults { run: usize },

    /// A finding has no locations, or its primary location has no URI
    UnlocatableFinding {
        run: usize,
        result: usize,
        cause: String,
    },

    /// A finding's location has no region, or the region has no start line
    IncompleteRegion {
        run: usize,
        result: usize,
        cause: String,
    },

    /// The analyzer binary could not be started
    ProcessLaunch(String),

    /// The analyzer exited with a non-zero status
    AnalyzerFailed { code: i32, output: String },

    /// The analyzer did not finish within the configured timeout
    AnalyzerTimeout(u64),

    /// Configuration error
    ConfigError(String),

    /// File read error
    FileReadError(String),

    /// File write error
    FileWriteError(String),

    /// JSON parsing error
    JsonParseError(String),
}

impl CpptestError {
    /// Whether the error reports a malformed or incompatible report document.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            CpptestError::MissingRuns
                | CpptestError::UnrecognizedTool { .. }
                | CpptestError::UnparseableToolVersion { .. }
                | CpptestError::MissingResults { .. }
                | CpptestError::UnlocatableFinding { .. }
                | CpptestError::IncompleteRegion { .. }
        )
    }
}

impl fmt::Display for CpptestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CpptestError::MissingRuns => write!(f, "Malformed report: no runs in SARIF report"),
            CpptestError::UnrecognizedTool {
                run,
                expected,
                found,
            } => match found {
                Some(name) => write!(
                    f,
                    "Malformed report: run {} produced by unexpected tool '{}' (expected '{}')",
                    run, name, expected
                ),
                None => write!(
                    f,
                    "Malformed report: run {} has no tool name (expected '{}')",
                    run, expected
                ),
            },
            CpptestError::UnparseableToolVersion { run, version } => match version {
                Some(version) => write!(
                    f,
                    "Malformed report: run {} has invalid tool version '{}'",
                    run, version
                ),
                None => write!(f, "Malformed report: run {} has no tool version", run),
            },
            CpptestError::MissingResults { run } => {
                write!(f, "Malformed report: run {} has no results", run)
            }
            CpptestError::UnlocatableFinding { run, result, cause } => write!(
                f,
                "Malformed report: result {} of run {} cannot be located: {}",
                result, run, cause
            ),
            CpptestError::IncompleteRegion { run, result, cause } => write!(
                f,
                "Malformed report: result {} of run {} has an incomplete region: {}",
                result, run, cause
            ),
            CpptestError::ProcessLaunch(msg) => write!(f, "Failed to launch analyzer: {}", msg),
            CpptestError::AnalyzerFailed { code, output } => {
                write!(f, "Analyzer exited with status {}:\n{}", code, output)
            }
            CpptestError::AnalyzerTimeout(secs) => {
                write!(f, "Analyzer did not finish within {} seconds", secs)
            }
            CpptestError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            CpptestError::FileReadError(msg) => write!(f, "File read error: {}", msg),
            CpptestError::FileWriteError(msg) => write!(f, "File write error: {}", msg),
            CpptestError::JsonParseError(msg) => write!(f, "JSON parsing error: {}", msg),
        }
    }
}

impl std::error::Error for CpptestError {}

/// Result type for C/C++test operations
pub type Result<T> = std::result::Result<T, CpptestError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_missing_runs() {
        let error = CpptestError::MissingRuns;
        assert_eq!(
            error.to_string(),
            "Malformed report: no runs in SARIF report"
        );
        assert!(error.is_structural());
    }

    #[test]
    fn test_unrecognized_tool() {
        let error = CpptestError::UnrecognizedTool {
            run: 0,
            expected: "C/C++test".to_string(),
            found: Some("bad tool name".to_string()),
        };
        assert_eq!(
            error.to_string(),
            "Malformed report: run 0 produced by unexpected tool 'bad tool name' (expected 'C/C++test')"
        );
    }

    #[test]
    fn test_unparseable_version_without_value() {
        let error = CpptestError::UnparseableToolVersion {
            run: 2,
            version: None,
        };
        assert_eq!(
            error.to_string(),
            "Malformed report: run 2 has no tool version"
        );
    }

    #[test]
    fn test_incomplete_region() {
        let error = CpptestError::IncompleteRegion {
            run: 0,
            result: 1,
            cause: "missing region".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Malformed report: result 1 of run 0 has an incomplete region: missing region"
        );
    }

    #[test]
    fn test_process_errors_are_not_structural() {
        assert!(!CpptestError::ProcessLaunch("not found".to_string()).is_structural());
        assert!(!CpptestError::AnalyzerTimeout(10).is_structural());
        assert!(!CpptestError::AnalyzerFailed {
            code: 1,
            output: String::new()
        }
        .is_structural());
    }

    #[test]
    fn test_config_error() {
        let error = CpptestError::ConfigError("Test error".to_string());
        assert_eq!(error.to_string(), "Configuration error: Test error");
    }

    #[test]
    fn test_error_source() {
        let error = CpptestError::FileReadError("Test error".to_string());
        assert!(error.source().is_none());
    }
}
