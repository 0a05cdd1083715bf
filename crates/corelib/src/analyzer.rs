use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::error::{CpptestError, Result};
use crate::sarif::SarifReport;
use crate::types::Target;

/// Runs C/C++test for a compilation unit and loads the report it writes
pub struct CpptestAnalyzer {
    config: crate::config::Config,
}

impl CpptestAnalyzer {
    /// Creates a new analyzer
    pub fn new(config: crate::config::Config) -> Result<Self> {
        debug!("Initializing C/C++test analyzer with configuration: {:?}", config);
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &crate::config::Config {
        &self.config
    }

    /// Builds the argument list passed to the analyzer binary
    pub fn command_args<P: AsRef<Path>>(
        &self,
        target: &Target,
        input: &Path,
        sources: &[P],
    ) -> Vec<String> {
        let mut args = vec![
            "-config".to_string(),
            self.config.test_config.clone(),
            "-input".to_string(),
            input.to_string_lossy().into_owned(),
            "-module".to_string(),
            self.config.module.clone(),
            "-compiler".to_string(),
            target.compiler().as_str().to_string(),
        ];

        for source in sources {
            args.push("-resource".to_string());
            args.push(source.as_ref().to_string_lossy().into_owned());
        }

        args
    }

    /// Runs the analyzer and returns its exit status with the captured output.
    ///
    /// A non-zero status is returned as-is; only a failure to start the
    /// process or a timeout is an error.
    ///
    /// The output is stdout followed by stderr. Each stream keeps its own
    /// order, but lines are not interleaved across the two streams.
    pub async fn run<P: AsRef<Path>>(
        &self,
        target: &Target,
        input: &Path,
        sources: &[P],
    ) -> Result<(i32, String)> {
        let args = self.command_args(target, input, sources);
        info!(
            "Running {} for {} on {} source(s)",
            self.config.cpptestcli_bin,
            target,
            sources.len()
        );
        debug!("Analyzer arguments: {:?}", args);

        let mut command = Command::new(&self.config.cpptestcli_bin);
        command
            .args(&args)
            .current_dir(&self.config.project_root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let timeout = Duration::from_secs(self.config.timeout_seconds);
        let output = match tokio::time::timeout(timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(CpptestError::ProcessLaunch(format!(
                    "{}: {}",
                    self.config.cpptestcli_bin, e
                )))
            }
            Err(_) => return Err(CpptestError::AnalyzerTimeout(self.config.timeout_seconds)),
        };

        // stdout then stderr; relative order across the streams is lost
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        // Killed by a signal: no exit code to report.
        let code = output.status.code().unwrap_or(-1);
        debug!("Analyzer exited with status {}", code);
        Ok((code, text))
    }

    /// Runs the analyzer and, on success, parses the SARIF report it produced
    pub async fn run_process<P: AsRef<Path>>(
        &self,
        target: &Target,
        input: &Path,
        sources: &[P],
    ) -> Result<SarifReport> {
        let (code, output) = self.run(target, input, sources).await?;
        if code != 0 {
            warn!("Analyzer failed with status {}", code);
            return Err(CpptestError::AnalyzerFailed { code, output });
        }

        self.load_report().await
    }

    /// Location of the report written by the analyzer
    pub fn report_path(&self) -> PathBuf {
        self.config.project_root.join(&self.config.report_path)
    }

    /// Reads and parses the report left by the last run
    pub async fn load_report(&self) -> Result<SarifReport> {
        let path = self.report_path();
        info!("Loading SARIF report from: {}", path.display());

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| CpptestError::FileReadError(format!("{}: {}", path.display(), e)))?;

        SarifReport::from_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn analyzer(bin: &str, root: &Path) -> CpptestAnalyzer {
        let config = Config {
            cpptestcli_bin: bin.to_string(),
            project_root: root.to_path_buf(),
            ..Config::default()
        };
        CpptestAnalyzer::new(config).unwrap()
    }

    fn target(name: &str) -> Target {
        name.parse().unwrap()
    }

    #[test]
    fn test_command_args_ia32() {
        let analyzer = analyzer("cpptestcli", Path::new("."));
        let args = analyzer.command_args(
            &target("ia32-generic-qemu"),
            Path::new("compile_commands_abc.json"),
            &["def.c"],
        );

        assert_eq!(
            args,
            vec![
                "-config",
                "user://MISRA C 2012",
                "-input",
                "compile_commands_abc.json",
                "-module",
                ".",
                "-compiler",
                "gcc_9",
                "-resource",
                "def.c",
            ]
        );
    }

    #[test]
    fn test_command_args_multi_file_arm() {
        let analyzer = analyzer("cpptestcli", Path::new("."));
        let args = analyzer.command_args(
            &target("armv7a7-imx6ull-evk"),
            Path::new("compile_commands.json"),
            &["1.c", "2.c", "3.c"],
        );

        assert_eq!(&args[6..8], ["-compiler", "gcc_9_ARM"]);
        assert_eq!(
            &args[8..],
            ["-resource", "1.c", "-resource", "2.c", "-resource", "3.c"]
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = Config {
            cpptestcli_bin: String::new(),
            ..Config::default()
        };
        assert!(CpptestAnalyzer::new(config).is_err());
    }

    #[tokio::test]
    async fn test_run_binary_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = analyzer("cpptestcli-does-not-exist", dir.path());

        let err = analyzer
            .run(&target("ia32-generic-qemu"), Path::new("cc.json"), &["a.c"])
            .await
            .unwrap_err();
        assert!(matches!(err, CpptestError::ProcessLaunch(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_non_zero_status_is_returned() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = analyzer("false", dir.path());

        let (code, _) = analyzer
            .run(&target("ia32-generic-qemu"), Path::new("cc.json"), &["a.c"])
            .await
            .unwrap();
        assert_eq!(code, 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_captures_stdout_then_stderr() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-cpptestcli");
        std::fs::write(
            &script,
            "#!/bin/sh\necho 'checking sources' >&2\necho 'analysis done'\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        let analyzer = analyzer(&script.to_string_lossy(), dir.path());

        let (code, output) = analyzer
            .run(&target("ia32-generic-qemu"), Path::new("cc.json"), &["a.c"])
            .await
            .unwrap();
        assert_eq!(code, 0);
        assert_eq!(output, "analysis done\nchecking sources\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_process_non_zero_status_fails() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = analyzer("false", dir.path());

        let err = analyzer
            .run_process(&target("ia32-generic-qemu"), Path::new("cc.json"), &["a.c"])
            .await
            .unwrap_err();
        assert!(matches!(err, CpptestError::AnalyzerFailed { code: 1, .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_process_loads_report() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("reports")).unwrap();
        std::fs::write(
            dir.path().join("reports/report.sarif"),
            r#"{"version": "2.1.0", "runs": []}"#,
        )
        .unwrap();
        let analyzer = analyzer("true", dir.path());

        let report = analyzer
            .run_process(&target("ia32-generic-qemu"), Path::new("cc.json"), &["a.c"])
            .await
            .unwrap();
        assert_eq!(report.version.as_deref(), Some("2.1.0"));
        assert_eq!(report.runs, Some(vec![]));
    }

    #[tokio::test]
    async fn test_load_report_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = analyzer("cpptestcli", dir.path());

        let err = analyzer.load_report().await.unwrap_err();
        assert!(matches!(err, CpptestError::FileReadError(_)));
    }
}
