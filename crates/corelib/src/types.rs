//! Output records and target identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Start of a diagnostic: the line is always known
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: Option<u32>,
}

impl Position {
    pub fn new(line: u32, column: Option<u32>) -> Self {
        Self { line, column }
    }
}

/// End of a diagnostic, where either coordinate may be unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EndPosition {
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl EndPosition {
    /// Returns `None` when neither coordinate is present
    pub fn from_parts(line: Option<u32>, column: Option<u32>) -> Option<Self> {
        if line.is_none() && column.is_none() {
            None
        } else {
            Some(Self { line, column })
        }
    }
}

/// A validated, normalized finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Filesystem path of the offending file, without URI scheme or host
    pub path: String,
    pub rule: String,
    pub message: String,
    /// SARIF `level`, carried through unchanged
    pub level: Option<String>,
    pub start: Position,
    pub end: Option<EndPosition>,
}

/// Pieces of the one-line rendering of a [`Diagnostic`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticPart {
    Location,
    Level,
    Message,
    Rule,
}

impl Diagnostic {
    /// `path:line` or `path:line:column`
    pub fn location(&self) -> String {
        match self.start.column {
            Some(column) => format!("{}:{}:{}", self.path, self.start.line, column),
            None => format!("{}:{}", self.path, self.start.line),
        }
    }

    /// Level as shown to users; `warning` when the report gives none
    pub fn display_level(&self) -> &str {
        self.level.as_deref().unwrap_or("warning")
    }

    /// Renders `location: level: message [rule]`, passing each piece through
    /// `style` so callers can decorate it without changing the layout.
    pub fn render_with<F>(&self, mut style: F) -> String
    where
        F: FnMut(DiagnosticPart, &str) -> String,
    {
        let location = style(DiagnosticPart::Location, &self.location());
        let level = style(DiagnosticPart::Level, self.display_level());
        let message = style(DiagnosticPart::Message, &self.message);
        let rule = style(DiagnosticPart::Rule, &format!("[{}]", self.rule));
        format!("{}: {}: {} {}", location, level, message, rule)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with(|_, text| text.to_string()))
    }
}

/// Compiler configurations known to the analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compiler {
    Gcc9,
    Gcc9Arm,
}

impl Compiler {
    /// Name passed to `-compiler`
    pub fn as_str(&self) -> &'static str {
        match self {
            Compiler::Gcc9 => "gcc_9",
            Compiler::Gcc9Arm => "gcc_9_ARM",
        }
    }
}

/// Build target identifier such as `ia32-generic-qemu` or `armv7a7-imx6ull-evk`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    name: String,
    compiler: Compiler,
}

impl Target {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn compiler(&self) -> Compiler {
        self.compiler
    }
}

impl FromStr for Target {
    type Err = crate::CpptestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let arch = s.split('-').next().unwrap_or_default();
        let compiler = if arch == "ia32" {
            Compiler::Gcc9
        } else if arch.starts_with("armv7") {
            Compiler::Gcc9Arm
        } else {
            return Err(crate::CpptestError::ConfigError(format!(
                "Unsupported target: {}",
                s
            )));
        };

        Ok(Target {
            name: s.to_string(),
            compiler,
        })
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_position_absent_only_without_both() {
        assert_eq!(EndPosition::from_parts(None, None), None);
        assert_eq!(
            EndPosition::from_parts(Some(31), None),
            Some(EndPosition {
                line: Some(31),
                column: None
            })
        );
        assert_eq!(
            EndPosition::from_parts(None, Some(3)),
            Some(EndPosition {
                line: None,
                column: Some(3)
            })
        );
    }

    #[test]
    fn test_target_compilers() {
        let target: Target = "ia32-generic-qemu".parse().unwrap();
        assert_eq!(target.compiler().as_str(), "gcc_9");

        let target: Target = "armv7a7-imx6ull-evk".parse().unwrap();
        assert_eq!(target.compiler().as_str(), "gcc_9_ARM");

        let target: Target = "armv7m4-stm32l4x6-nucleo".parse().unwrap();
        assert_eq!(target.compiler(), Compiler::Gcc9Arm);
        assert_eq!(target.to_string(), "armv7m4-stm32l4x6-nucleo");
    }

    #[test]
    fn test_unsupported_target() {
        assert!("riscv64-generic-qemu".parse::<Target>().is_err());
        assert!("".parse::<Target>().is_err());
    }

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic {
            path: "/test/path/bad.c".to_string(),
            rule: "rule1".to_string(),
            message: "violation of the rule rule1".to_string(),
            level: Some("error".to_string()),
            start: Position::new(30, Some(29)),
            end: None,
        };
        assert_eq!(
            diagnostic.to_string(),
            "/test/path/bad.c:30:29: error: violation of the rule rule1 [rule1]"
        );
    }

    #[test]
    fn test_diagnostic_pieces() {
        let mut diagnostic = Diagnostic {
            path: "/test/path/r2.c".to_string(),
            rule: "r2".to_string(),
            message: "text2".to_string(),
            level: None,
            start: Position::new(1, None),
            end: None,
        };
        assert_eq!(diagnostic.location(), "/test/path/r2.c:1");
        assert_eq!(diagnostic.display_level(), "warning");
        assert_eq!(diagnostic.to_string(), "/test/path/r2.c:1: warning: text2 [r2]");

        diagnostic.start.column = Some(4);
        assert_eq!(diagnostic.location(), "/test/path/r2.c:1:4");
    }

    #[test]
    fn test_render_with_styles_each_piece_in_place() {
        let diagnostic = Diagnostic {
            path: "/a.c".to_string(),
            rule: "r1".to_string(),
            message: "msg".to_string(),
            level: Some("error".to_string()),
            start: Position::new(3, Some(2)),
            end: None,
        };

        let mut seen = Vec::new();
        let line = diagnostic.render_with(|part, text| {
            seen.push(part);
            format!("<{}>", text)
        });
        assert_eq!(line, "</a.c:3:2>: <error>: <msg> <[r1]>");
        assert_eq!(
            seen,
            vec![
                DiagnosticPart::Location,
                DiagnosticPart::Level,
                DiagnosticPart::Message,
                DiagnosticPart::Rule,
            ]
        );

        let plain = diagnostic.render_with(|_, text| text.to_string());
        assert_eq!(plain, diagnostic.to_string());
    }
}
