//! Lazy extraction of validated diagnostics from a SARIF report.
//!
//! Validation happens as items are pulled: the document is checked on the
//! first pull, each run when it is entered, and each finding when it is
//! reached. The first violation is yielded as an `Err` and ends the sequence;
//! diagnostics yielded before it stay valid.

use std::iter::FusedIterator;

use tracing::{debug, trace, warn};

use crate::defaults::EXPECTED_TOOL_NAME;
use crate::error::{CpptestError, Result};
use crate::sarif::{Run, SarifReport, SarifResult};
use crate::types::{Diagnostic, EndPosition, Position};
use crate::utils::uri_to_path;
use crate::version::SemanticVersion;

/// Extracts diagnostics produced by C/C++test from `report`
pub fn extract_diagnostics(report: &SarifReport) -> Diagnostics<'_> {
    Diagnostics::new(report)
}

/// Single-pass cursor over the runs and results of a report
#[derive(Debug, Clone)]
pub struct Diagnostics<'a> {
    report: &'a SarifReport,
    expected_tool: &'a str,
    runs: Option<&'a [Run]>,
    results: Option<&'a [SarifResult]>,
    run_index: usize,
    result_index: usize,
    finished: bool,
}

impl<'a> Diagnostics<'a> {
    pub fn new(report: &'a SarifReport) -> Self {
        Self::with_expected_tool(report, EXPECTED_TOOL_NAME)
    }

    /// Accepts runs produced by `expected_tool` instead of C/C++test
    pub fn with_expected_tool(report: &'a SarifReport, expected_tool: &'a str) -> Self {
        Self {
            report,
            expected_tool,
            runs: None,
            results: None,
            run_index: 0,
            result_index: 0,
            finished: false,
        }
    }

    fn advance(&mut self) -> Result<Option<Diagnostic>> {
        let runs = match self.runs {
            Some(runs) => runs,
            None => {
                let runs = document_runs(self.report)?;
                debug!("SARIF report contains {} run(s)", runs.len());
                self.runs = Some(runs);
                runs
            }
        };

        loop {
            if let Some(results) = self.results {
                if let Some(result) = results.get(self.result_index) {
                    let index = self.result_index;
                    self.result_index += 1;
                    return extract_one(result, self.run_index, index).map(Some);
                }

                self.results = None;
                self.run_index += 1;
                self.result_index = 0;
            }

            let Some(run) = runs.get(self.run_index) else {
                return Ok(None);
            };
            self.results = Some(validate_run(run, self.run_index, self.expected_tool)?);
        }
    }
}

impl<'a> Iterator for Diagnostics<'a> {
    type Item = Result<Diagnostic>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.advance() {
            Ok(Some(diagnostic)) => Some(Ok(diagnostic)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

impl FusedIterator for Diagnostics<'_> {}

fn document_runs(report: &SarifReport) -> Result<&[Run]> {
    match report.runs.as_deref() {
        Some(runs) if !runs.is_empty() => Ok(runs),
        _ => Err(CpptestError::MissingRuns),
    }
}

/// Checks tool identity and version, then hands out the run's results
fn validate_run<'a>(run: &'a Run, index: usize, expected_tool: &str) -> Result<&'a [SarifResult]> {
    let driver = run.tool.as_ref().and_then(|tool| tool.driver.as_ref());

    let name = driver.and_then(|d| d.name.as_deref());
    if name != Some(expected_tool) {
        return Err(CpptestError::UnrecognizedTool {
            run: index,
            expected: expected_tool.to_string(),
            found: name.map(str::to_string),
        });
    }

    let version = driver.and_then(|d| d.semantic_version.as_deref());
    let parsed = version.and_then(|v| v.parse::<SemanticVersion>().ok());
    let Some(parsed) = parsed else {
        return Err(CpptestError::UnparseableToolVersion {
            run: index,
            version: version.map(str::to_string),
        });
    };

    let results = run
        .results
        .as_deref()
        .ok_or(CpptestError::MissingResults { run: index })?;

    debug!(
        "Run {}: {} {} with {} result(s)",
        index,
        expected_tool,
        parsed,
        results.len()
    );
    Ok(results)
}

fn extract_one(result: &SarifResult, run: usize, index: usize) -> Result<Diagnostic> {
    let unlocatable = |cause: &str| CpptestError::UnlocatableFinding {
        run,
        result: index,
        cause: cause.to_string(),
    };
    let incomplete = |cause: &str| CpptestError::IncompleteRegion {
        run,
        result: index,
        cause: cause.to_string(),
    };

    let location = result
        .locations
        .as_deref()
        .and_then(<[_]>::first)
        .ok_or_else(|| unlocatable("no locations"))?;

    let uri = location
        .uri()
        .ok_or_else(|| unlocatable("missing physicalLocation.artifactLocation.uri"))?;
    let path = uri_to_path(uri).ok_or_else(|| unlocatable("URI has no path"))?;

    let region = location
        .region()
        .ok_or_else(|| incomplete("missing region"))?;
    let start_line = region
        .start_line
        .ok_or_else(|| incomplete("missing startLine"))?;

    let rule = result.rule_id.clone().unwrap_or_else(|| {
        warn!("Result {} of run {} has no ruleId", index, run);
        String::new()
    });
    let message = result
        .message
        .as_ref()
        .and_then(|m| m.text.clone())
        .unwrap_or_else(|| {
            warn!("Result {} of run {} has no message text", index, run);
            String::new()
        });

    trace!("Result {} of run {}: {} at {}:{}", index, run, rule, path, start_line);

    Ok(Diagnostic {
        path: path.to_string(),
        rule,
        message,
        level: result.level.clone(),
        start: Position::new(start_line, region.start_column),
        end: EndPosition::from_parts(region.end_line, region.end_column),
    })
}
