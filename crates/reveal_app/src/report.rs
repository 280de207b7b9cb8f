//! JSON summary of one scenario run.
//!
//! A passed report carries only totals; a failed one also names the step
//! that stopped the run and the assertion's failure code.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Component, Path};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Passed,
    Failed,
}

/// Frames, logical time and boundary crossings accumulated by a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTotals {
    pub elapsed_frames: u64,
    pub elapsed_ms: u64,
    /// Enter and leave events reported by the engine
    pub crossings: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlessReport {
    pub status: ReportStatus,
    pub failed_step_index: Option<usize>,
    /// Step name, e.g. `assert_counter`
    pub assertion: Option<String>,
    /// Stable code such as `text_mismatch`
    pub code: Option<String>,
    pub message: Option<String>,
    #[serde(flatten)]
    pub totals: RunTotals,
}

impl HeadlessReport {
    pub fn passed(totals: RunTotals) -> Self {
        Self {
            status: ReportStatus::Passed,
            failed_step_index: None,
            assertion: None,
            code: None,
            message: None,
            totals,
        }
    }

    pub fn failed(
        totals: RunTotals,
        step_index: usize,
        step: &str,
        code: String,
        message: String,
    ) -> Self {
        Self {
            status: ReportStatus::Failed,
            failed_step_index: Some(step_index),
            assertion: Some(step.to_string()),
            code: Some(code),
            message: Some(message),
            totals,
        }
    }

    pub fn is_passed(&self) -> bool {
        self.status == ReportStatus::Passed
    }

    /// Write pretty JSON under the working directory, creating parents
    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        ensure_inside_workdir(path)?;
        if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report {}", path.display()))
    }

    /// Write pretty JSON followed by a newline
    pub fn write_to_writer<W: Write>(&self, writer: &mut W) -> Result<()> {
        serde_json::to_writer_pretty(&mut *writer, self)?;
        writeln!(writer)?;
        Ok(())
    }
}

fn ensure_inside_workdir(path: &Path) -> Result<()> {
    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => bail!("report path {} leaves the working directory", path.display()),
            Component::RootDir | Component::Prefix(_) => {
                bail!("report path {} must be relative", path.display())
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals() -> RunTotals {
        RunTotals {
            elapsed_frames: 10,
            elapsed_ms: 160,
            crossings: 2,
        }
    }

    #[test]
    fn test_rejects_paths_outside_workdir() {
        let report = HeadlessReport::passed(totals());
        assert!(report.write_to_path(Path::new("/tmp/report.json")).is_err());
        assert!(report.write_to_path(Path::new("out/../../report.json")).is_err());
        assert!(ensure_inside_workdir(Path::new("./out/report.json")).is_ok());
    }

    #[test]
    fn test_failed_report_json() {
        let report = HeadlessReport::failed(
            totals(),
            3,
            "assert_counter",
            "text_mismatch".to_string(),
            "#9: expected '1.3B', got '0.0B'".to_string(),
        );
        assert!(!report.is_passed());

        let mut out = Vec::new();
        report.write_to_writer(&mut out).unwrap();
        assert_eq!(out.last(), Some(&b'\n'));
        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed["status"], "failed");
        assert_eq!(parsed["failed_step_index"], 3);
        assert_eq!(parsed["code"], "text_mismatch");
        // Totals sit at the top level next to the status
        assert_eq!(parsed["crossings"], 2);
        assert_eq!(parsed["elapsed_ms"], 160);
    }
}
