use crate::error::AppError;
use crate::models::report_types::ReportView;
use crate::models::scan_types::ScanStatus;
use crate::services::analyzer::Analyzer;
use std::path::Path;
use tauri::State;

/// Submits the selected APK for analysis and returns the rendered report
/// view. The app metadata fields belong to the form and are not transmitted.
#[tauri::command]
pub async fn analyze_apk(
    analyzer: State<'_, Analyzer>,
    file_path: String,
    app_name: Option<String>,
    package_name: Option<String>,
) -> Result<ReportView, AppError> {
    if let Some(name) = app_name.as_deref().filter(|n| !n.is_empty()) {
        log::debug!("scan requested for app \"{name}\"");
    }
    if let Some(pkg) = package_name.as_deref().filter(|p| !p.is_empty()) {
        log::debug!("scan requested for package \"{pkg}\"");
    }
    analyzer.analyze(Path::new(&file_path)).await
}

#[tauri::command]
pub async fn get_scan_status(analyzer: State<'_, Analyzer>) -> Result<ScanStatus, AppError> {
    Ok(analyzer.status().await)
}

#[tauri::command]
pub async fn cancel_scan(analyzer: State<'_, Analyzer>) -> Result<(), AppError> {
    analyzer.cancel().await;
    Ok(())
}

#[tauri::command]
pub async fn check_service_health(analyzer: State<'_, Analyzer>) -> Result<bool, AppError> {
    analyzer.health().await
}
