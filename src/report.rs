//! Build result classification and report formatting.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Final verdict of one pipeline invocation, as reported by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum BuildClassification {
    Succeeded,
    Failed,
    Cancelled,
    Unknown,
}

impl BuildClassification {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

impl fmt::Display for BuildClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
            Self::Cancelled => "Cancelled",
            Self::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// Diagnostics of a finished build transaction, handed back to the caller
/// whatever the classification was.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub classification: BuildClassification,
    pub duration: Duration,
    pub total_size: u64,
    pub output_path: String,
    pub warnings: u32,
    pub errors: u32,
}

/// Unit used when rendering byte counts in build logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnit {
    Byte,
    Kb,
    Mb,
    Gb,
    Tb,
}

impl SizeUnit {
    fn exponent(&self) -> u32 {
        match self {
            Self::Byte => 0,
            Self::Kb => 1,
            Self::Mb => 2,
            Self::Gb => 3,
            Self::Tb => 4,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Byte => "B",
            Self::Kb => "KB",
            Self::Mb => "MB",
            Self::Gb => "GB",
            Self::Tb => "TB",
        }
    }
}

/// Renders a byte count in the requested unit with two decimals.
pub fn format_size(bytes: u64, unit: SizeUnit) -> String {
    let divisor = 1024u64.pow(unit.exponent()) as f64;
    format!("{:.2}{}", bytes as f64 / divisor, unit.label())
}
