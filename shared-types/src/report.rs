use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ProfileRecord;

/// Outcome of auditing an assembled record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ValidationReport {
    pub ok: bool,
    pub record: ProfileRecord, // Best-effort record, returned regardless of `ok`
    pub issues: Vec<String>,
    pub repaired: bool,
}

/// Stages a single pipeline run passes through, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineStage {
    Raw,
    Located,
    DurationParsed,
    AggregateFiltered,
    Totaled,
    Sanitized,
    Assembled,
    Validated,
    Repaired,
    Final,
}

/// Which discovery strategy produced an email candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
pub enum EmailStrategy {
    MailtoLink,
    TextScan,
    ContactSection,
    DataAttribute,
}

/// Non-fatal signals collected while building a record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PipelineDiagnostics {
    pub aggregates_removed: usize,
    pub over_filtered: bool, // More than half of the experience list looked like roll-ups
    pub unparsed_durations: usize,
    pub overrides_applied: usize,
    pub email_candidates: usize,
    pub email_strategy: Option<EmailStrategy>,
    pub stages: Vec<PipelineStage>,
}

/// Everything a pipeline run hands back to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PipelineOutput {
    pub report: ValidationReport,
    pub diagnostics: PipelineDiagnostics,
}

impl PipelineOutput {
    pub fn record(&self) -> &ProfileRecord {
        &self.report.record
    }
}
