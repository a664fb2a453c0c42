mod commands;
mod error;
mod models;
mod services;

use services::analyzer::{Analyzer, AnalyzerConfig};

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let _ = env_logger::try_init();

    let analyzer =
        Analyzer::new(AnalyzerConfig::default()).expect("Failed to build analysis client");

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .manage(analyzer)
        .invoke_handler(tauri::generate_handler![
            commands::scan::analyze_apk,
            commands::scan::get_scan_status,
            commands::scan::cancel_scan,
            commands::scan::check_service_health,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
