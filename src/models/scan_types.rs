use crate::models::report_types::ReportView;
use serde::Serialize;

/// Snapshot of the upload state for the form: whether a scan is running,
/// the last inline error message, and the last completed report.
#[derive(Debug, Serialize, Clone)]
pub struct ScanStatus {
    pub loading: bool,
    pub error: Option<String>,
    pub report: Option<ReportView>,
}
