//! Output formatter trait

use council_application::CouncilReport;

/// Trait for formatting council reports
pub trait OutputFormatter {
    /// Format the complete report: answers, rankings and verdict
    fn format(&self, report: &CouncilReport) -> String;

    /// Format as JSON
    fn format_json(&self, report: &CouncilReport) -> String;

    /// Format the verdict only (concise output)
    fn format_verdict_only(&self, report: &CouncilReport) -> String;
}
