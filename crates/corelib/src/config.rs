use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::defaults;

/// Configuration for running C/C++test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Analyzer executable, looked up in `PATH` when not absolute
    pub cpptestcli_bin: String,

    /// Test configuration passed to `-config`
    pub test_config: String,

    /// Module root passed to `-module`
    pub module: String,

    /// Report location, relative to `project_root`
    pub report_path: PathBuf,

    /// Working directory of the analyzer process
    pub project_root: PathBuf,

    /// Timeout in seconds for a single analyzer run
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cpptestcli_bin: defaults::CPPTESTCLI_BIN.to_string(),
            test_config: defaults::TEST_CONFIG.to_string(),
            module: defaults::MODULE.to_string(),
            report_path: PathBuf::from(defaults::REPORT_PATH),
            project_root: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            timeout_seconds: defaults::TIMEOUT_SECONDS,
        }
    }
}

impl Config {
    /// Creates a new configuration from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let cpptestcli_bin = std::env::var("CPPTESTCLI_BIN")
            .unwrap_or_else(|_| defaults::CPPTESTCLI_BIN.to_string());

        let test_config =
            std::env::var("CPPTEST_CONFIG").unwrap_or_else(|_| defaults::TEST_CONFIG.to_string());

        let module = std::env::var("CPPTEST_MODULE").unwrap_or_else(|_| defaults::MODULE.to_string());

        let report_path = PathBuf::from(
            std::env::var("CPPTEST_REPORT_PATH")
                .unwrap_or_else(|_| defaults::REPORT_PATH.to_string()),
        );

        let project_root = std::env::current_dir().map_err(|e| {
            crate::error::CpptestError::ConfigError(format!(
                "Failed to get current directory: {}",
                e
            ))
        })?;

        let timeout_seconds = std::env::var("CPPTEST_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults::TIMEOUT_SECONDS);

        Ok(Config {
            cpptestcli_bin,
            test_config,
            module,
            report_path,
            project_root,
            timeout_seconds,
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.cpptestcli_bin.is_empty() {
            return Err(crate::error::CpptestError::ConfigError(
                "Analyzer binary is required".to_string(),
            ));
        }

        if self.test_config.is_empty() {
            return Err(crate::error::CpptestError::ConfigError(
                "Test configuration is required".to_string(),
            ));
        }

        if self.module.is_empty() {
            return Err(crate::error::CpptestError::ConfigError(
                "Module root is required".to_string(),
            ));
        }

        if self.report_path.as_os_str().is_empty() {
            return Err(crate::error::CpptestError::ConfigError(
                "Report path is required".to_string(),
            ));
        }

        if self.timeout_seconds == 0 {
            return Err(crate::error::CpptestError::ConfigError(
                "Timeout seconds must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
