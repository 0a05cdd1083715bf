use clap::Parser;
use colored::*;
use cpptest_corelib::{
    logging, markdown, utils, Config, CpptestAnalyzer, CpptestError, Diagnostic, DiagnosticPart,
    Result, SarifReport, Target,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, Level};

#[derive(Debug, Parser)]
#[command(
    name = "cpptest-ci",
    about = "Run Parasoft C/C++test and report its diagnostics",
    version,
    long_about = "Runs C/C++test over a compilation unit, validates the SARIF report it writes and prints one line per diagnostic. Exits with 1 when findings exist and 2 on errors.",
    after_help = "Examples:\n  cpptest-ci -t ia32-generic-qemu -i compile_commands.json main.c util.c\n  cpptest-ci -t armv7a7-imx6ull-evk -i compile_commands.json -s src\n  cpptest-ci --report reports/report.sarif -m summary.md"
)]
struct Cli {
    /// Build target, e.g. ia32-generic-qemu
    #[arg(
        short,
        long,
        value_name = "TARGET",
        required_unless_present = "report",
        help_heading = "ANALYZER"
    )]
    target: Option<String>,

    /// Compilation database passed to -input
    #[arg(
        short,
        long,
        value_name = "FILE",
        required_unless_present = "report",
        help_heading = "ANALYZER"
    )]
    input: Option<PathBuf>,

    /// Directory searched for C/C++ sources when none are listed
    #[arg(short, long, value_name = "DIR", help_heading = "ANALYZER")]
    source_dir: Option<PathBuf>,

    /// Project root the analyzer runs in
    #[arg(short, long, value_name = "PATH", help_heading = "ANALYZER")]
    project_root: Option<PathBuf>,

    /// Extract an existing SARIF report instead of running the analyzer
    #[arg(
        long,
        value_name = "FILE",
        conflicts_with_all = ["input", "source_dir", "sources"],
        help_heading = "INPUT"
    )]
    report: Option<PathBuf>,

    /// Write a Markdown summary of the findings
    #[arg(short, long, value_name = "FILE", help_heading = "OUTPUT")]
    markdown: Option<PathBuf>,

    /// Log level
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        default_value = "warn",
        help_heading = "LOGGING"
    )]
    verbosity: Level,

    /// Source files passed to -resource
    #[arg(value_name = "SOURCES")]
    sources: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::setup_logging(cli.verbosity) {
        eprintln!("{} {}", "warning:".yellow().bold(), e);
    }

    match run(cli).await {
        Ok(0) => {
            println!("{}", "No findings.".green());
            ExitCode::SUCCESS
        }
        Ok(count) => {
            println!("{}", format!("{} finding(s).", count).red().bold());
            ExitCode::from(1)
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> Result<usize> {
    let (report, target) = match &cli.report {
        Some(path) => (SarifReport::from_file(path)?, cli.target.clone()),
        None => {
            let mut config = Config::from_env()?;
            if let Some(root) = &cli.project_root {
                config.project_root = root.clone();
            }
            let analyzer = CpptestAnalyzer::new(config)?;

            // clap enforces both when --report is absent
            let (Some(target_name), Some(input)) = (&cli.target, &cli.input) else {
                return Err(CpptestError::ConfigError(
                    "--target and --input are required".to_string(),
                ));
            };
            let target: Target = target_name.parse()?;
            let sources = collect_sources(&cli)?;
            info!("Analyzing {} source(s) for {}", sources.len(), target);

            let report = analyzer.run_process(&target, input, &sources).await?;
            (report, Some(target.to_string()))
        }
    };

    // Print as diagnostics arrive; a malformed finding stops the listing.
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    for diagnostic in report.diagnostics() {
        let diagnostic = diagnostic?;
        print_diagnostic(&diagnostic);
        diagnostics.push(diagnostic);
    }

    if let Some(path) = &cli.markdown {
        let summary = markdown::generate_report(&diagnostics, target.as_deref());
        tokio::fs::write(path, summary).await.map_err(|e| {
            CpptestError::FileWriteError(format!("{}: {}", path.display(), e))
        })?;
        info!("Markdown summary written to {}", path.display());
    }

    Ok(diagnostics.len())
}

fn collect_sources(cli: &Cli) -> Result<Vec<PathBuf>> {
    if !cli.sources.is_empty() {
        return Ok(cli.sources.clone());
    }

    let Some(dir) = &cli.source_dir else {
        return Err(CpptestError::ConfigError(
            "No sources given: list files or use --source-dir".to_string(),
        ));
    };

    let sources = utils::find_sources(dir)?;
    if sources.is_empty() {
        return Err(CpptestError::ConfigError(format!(
            "No C/C++ sources found in {}",
            dir.display()
        )));
    }
    Ok(sources)
}

fn print_diagnostic(diagnostic: &Diagnostic) {
    let line = diagnostic.render_with(|part, text| match part {
        DiagnosticPart::Location => text.bold().to_string(),
        DiagnosticPart::Level => match text {
            "error" => text.red().bold().to_string(),
            "note" | "none" => text.cyan().bold().to_string(),
            _ => text.yellow().bold().to_string(),
        },
        DiagnosticPart::Message => text.to_string(),
        DiagnosticPart::Rule => text.dimmed().to_string(),
    });
    println!("{}", line);
}
