//! Typed view of the SARIF subset emitted by C/C++test.
//!
//! Every field is optional: presence of mandatory data is checked by the
//! extractor in [`crate::diagnostics`], so that a malformed report surfaces as a
//! precise structural error at the finding where it occurs instead of failing
//! the whole parse.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::Path;

/// Top-level SARIF document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SarifReport {
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runs: Option<Vec<Run>>,
}

/// One analyzer execution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Run {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<SarifResult>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<Driver>,
}

/// Identity of the tool that produced a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(rename = "semanticVersion", skip_serializing_if = "Option::is_none")]
    pub semantic_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// A single reported issue, before validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SarifResult {
    #[serde(
        rename = "ruleId",
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub rule_id: Option<String>,
    /// Kept verbatim; a non-string value is carried as its JSON text
    #[serde(
        default,
        deserialize_with = "string_or_raw",
        skip_serializing_if = "Option::is_none"
    )]
    pub level: Option<String>,
    #[serde(
        default,
        deserialize_with = "shape_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub message: Option<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<Location>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub text: Option<String>,
}

// Carried-through fields of a result must not fail the whole document when
// one finding has an unexpected shape; the extractor degrades them instead.

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn string_or_raw<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => Some(other.to_string()),
    })
}

fn shape_or_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// C/C++test places `region` next to `physicalLocation`; standard SARIF nests
/// it inside. Both are accepted, the former taking precedence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(rename = "physicalLocation", skip_serializing_if = "Option::is_none")]
    pub physical_location: Option<PhysicalLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
}

impl Location {
    /// URI of the artifact, if every enclosing object is present
    pub fn uri(&self) -> Option<&str> {
        self.physical_location
            .as_ref()?
            .artifact_location
            .as_ref()?
            .uri
            .as_deref()
    }

    /// Region of the location, falling back to `physicalLocation.region`
    pub fn region(&self) -> Option<&Region> {
        self.region.as_ref().or_else(|| {
            self.physical_location
                .as_ref()
                .and_then(|physical| physical.region.as_ref())
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhysicalLocation {
    #[serde(rename = "artifactLocation", skip_serializing_if = "Option::is_none")]
    pub artifact_location: Option<ArtifactLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtifactLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

/// Line/column span of a finding
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    #[serde(rename = "startLine", skip_serializing_if = "Option::is_none")]
    pub start_line: Option<u32>,
    #[serde(rename = "startColumn", skip_serializing_if = "Option::is_none")]
    pub start_column: Option<u32>,
    #[serde(rename = "endLine", skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u32>,
    #[serde(rename = "endColumn", skip_serializing_if = "Option::is_none")]
    pub end_column: Option<u32>,
}

impl SarifReport {
    /// Parses a report from JSON text
    pub fn from_json(json_content: &str) -> crate::Result<Self> {
        serde_json::from_str(json_content)
            .map_err(|e| crate::CpptestError::JsonParseError(e.to_string()))
    }

    /// Reads and parses a report file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::CpptestError::FileReadError(format!("{}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Lazily extracts validated diagnostics from this report
    pub fn diagnostics(&self) -> crate::diagnostics::Diagnostics<'_> {
        crate::diagnostics::extract_diagnostics(self)
    }
}
