use crate::error::AppError;
use crate::models::report_types::{AnalyzeResponse, AnalysisReport, ReportView};
use crate::models::scan_types::ScanStatus;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

const ANALYZE_PATH: &str = "/api/analyze";
const HEALTH_PATH: &str = "/health";

/// Settings for one form instance. The styling variants of the form all
/// share this flow and differ only through this config.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AnalyzerConfig {
    /// Base URL of the analysis service.
    pub base_url: String,
    /// Optional per-request timeout. `None` leaves requests unbounded.
    pub request_timeout_secs: Option<u64>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            base_url: "http://127.0.0.1:8000".to_string(),
            request_timeout_secs: None,
        }
    }
}

/// Owns the upload state and talks to the analysis service. Cheap to clone;
/// all state is shared.
#[derive(Clone)]
pub struct Analyzer {
    config: AnalyzerConfig,
    client: reqwest::Client,
    /// Bumped on every submission and on cancel. A scan whose generation is
    /// no longer current must not touch the stored state.
    generation: Arc<AtomicU64>,
    loading: Arc<Mutex<bool>>,
    error: Arc<Mutex<Option<String>>>,
    report: Arc<Mutex<Option<ReportView>>>,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self, AppError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| AppError::request(format!("failed to build HTTP client: {e}")))?;

        Ok(Analyzer {
            config,
            client,
            generation: Arc::new(AtomicU64::new(0)),
            loading: Arc::new(Mutex::new(false)),
            error: Arc::new(Mutex::new(None)),
            report: Arc::new(Mutex::new(None)),
        })
    }

    pub async fn status(&self) -> ScanStatus {
        ScanStatus {
            loading: *self.loading.lock().await,
            error: self.error.lock().await.clone(),
            report: self.report.lock().await.clone(),
        }
    }

    /// Abandons any in-flight scan. The abandoned scan resolves as
    /// `Cancelled` and leaves the stored report and error untouched.
    pub async fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.loading.lock().await = false;
    }

    /// Uploads the selected file and stores the resulting report.
    ///
    /// Validation failures are reported inline without issuing a request.
    /// A failed request keeps the previously displayed report. Submitting
    /// again while a scan is in flight supersedes it, so the stored report
    /// always corresponds to the latest submission.
    pub async fn analyze(&self, file_path: &Path) -> Result<ReportView, AppError> {
        if let Err(e) = validate_selection(file_path) {
            *self.error.lock().await = Some(e.message.clone());
            return Err(e);
        }

        let my_generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.loading.lock().await = true;

        let result = self.do_analyze(file_path).await;

        // Staleness is re-checked while holding the state locks, so a newer
        // submission that already completed cannot be overwritten by this
        // result. Lock order matches status(): loading, error, report.
        let mut loading = self.loading.lock().await;
        let mut error = self.error.lock().await;
        let mut report = self.report.lock().await;

        if self.generation.load(Ordering::SeqCst) != my_generation {
            log::info!("scan superseded, discarding result for {}", file_path.display());
            return Err(AppError::cancelled("scan superseded by a newer submission"));
        }

        *loading = false;
        match result {
            Ok(view) => {
                *error = None;
                *report = Some(view.clone());
                Ok(view)
            }
            Err(e) => {
                log::warn!("scan failed for {}: {}", file_path.display(), e);
                *error = Some(e.message.clone());
                Err(e)
            }
        }
    }

    async fn do_analyze(&self, file_path: &Path) -> Result<ReportView, AppError> {
        let bytes = tokio::fs::read(file_path).await.map_err(|e| {
            AppError::validation(format!("cannot read selected file {}: {e}", file_path.display()))
        })?;
        if bytes.is_empty() {
            return Err(AppError::validation("selected file is empty"));
        }

        let file_name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("app.apk")
            .to_string();

        log::info!("uploading {} ({} bytes) for analysis", file_name, bytes.len());

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/vnd.android.package-archive")?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), ANALYZE_PATH);
        let response = self.client.post(&url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::request(format!(
                "analysis service returned HTTP {status}"
            )));
        }

        let body = response.text().await?;
        log::trace!("analysis response body: {body}");

        let report = parse_report(&body)?;
        Ok(ReportView::from_report(report))
    }

    /// Consumes the service's `GET /health` endpoint.
    pub async fn health(&self) -> Result<bool, AppError> {
        #[derive(serde::Deserialize)]
        struct Health {
            ok: bool,
        }

        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), HEALTH_PATH);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::request(format!(
                "health check returned HTTP {}",
                response.status()
            )));
        }
        let health: Health = serde_json::from_str(&response.text().await?)?;
        Ok(health.ok)
    }
}

/// Precondition check for a submission. Runs before any state change, so a
/// rejected selection never toggles the loading flag or issues a request.
pub fn validate_selection(file_path: &Path) -> Result<(), AppError> {
    if file_path.as_os_str().is_empty() {
        return Err(AppError::validation("no file selected"));
    }
    let meta = std::fs::metadata(file_path).map_err(|e| {
        AppError::validation(format!("cannot read selected file {}: {e}", file_path.display()))
    })?;
    if !meta.is_file() {
        return Err(AppError::validation(format!(
            "{} is not a file",
            file_path.display()
        )));
    }
    if meta.len() == 0 {
        return Err(AppError::validation("selected file is empty"));
    }
    Ok(())
}

/// Parses and shape-checks an analysis response body.
pub fn parse_report(body: &str) -> Result<AnalysisReport, AppError> {
    let envelope: AnalyzeResponse =
        serde_json::from_str(body).map_err(|e| AppError::parse(format!("malformed analysis response: {e}")))?;
    if envelope.status != "success" {
        log::debug!("analysis response status field: {}", envelope.status);
    }
    envelope.data.validate()?;
    Ok(envelope.data)
}
