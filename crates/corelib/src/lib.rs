//! C/C++test report extraction
//!
//! This library runs Parasoft C/C++test over a compilation unit and turns the
//! SARIF report it writes into a validated sequence of [`Diagnostic`] values
//! that a CI job can report or gate on.
//!
//! ## Features
//!
//! - **Lazy extraction**: diagnostics are validated and produced one at a time
//! - **Fail-fast validation**: the first malformed run or finding ends the
//!   sequence with a structural [`CpptestError`]
//! - **Analyzer invocation**: builds the `cpptestcli` command line for a target
//!   and loads the report it writes
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cpptest_corelib::SarifReport;
//!
//! fn main() -> cpptest_corelib::Result<()> {
//!     let report = SarifReport::from_file("reports/report.sarif")?;
//!
//!     for diagnostic in report.diagnostics() {
//!         println!("{}", diagnostic?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Running the analyzer
//!
//! ```rust,no_run
//! use cpptest_corelib::{Config, CpptestAnalyzer, Target};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> cpptest_corelib::Result<()> {
//!     let analyzer = CpptestAnalyzer::new(Config::from_env()?)?;
//!     let target: Target = "ia32-generic-qemu".parse()?;
//!
//!     let report = analyzer
//!         .run_process(&target, Path::new("compile_commands.json"), &["main.c"])
//!         .await?;
//!     let diagnostics = report
//!         .diagnostics()
//!         .collect::<cpptest_corelib::Result<Vec<_>>>()?;
//!     println!("{} finding(s)", diagnostics.len());
//!     Ok(())
//! }
//! ```

pub mod analyzer;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod markdown;
pub mod sarif;
pub mod types;
pub mod utils;
pub mod version;

pub use analyzer::CpptestAnalyzer;
pub use config::Config;
pub use diagnostics::{extract_diagnostics, Diagnostics};
pub use error::{CpptestError, Result};
pub use sarif::SarifReport;
pub use types::*;
pub use version::SemanticVersion;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration values
pub mod defaults {
    /// Tool name every run of a report must carry
    pub const EXPECTED_TOOL_NAME: &str = "C/C++test";

    /// Analyzer executable
    pub const CPPTESTCLI_BIN: &str = "cpptestcli";

    /// Test configuration
    pub const TEST_CONFIG: &str = "user://MISRA C 2012";

    /// Module root
    pub const MODULE: &str = ".";

    /// Where the analyzer writes its SARIF report, relative to the project root
    pub const REPORT_PATH: &str = "reports/report.sarif";

    /// Default timeout in seconds
    pub const TIMEOUT_SECONDS: u64 = 3600;
}
