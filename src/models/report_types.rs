use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// Envelope returned by `POST /api/analyze`:
/// `{ "status": "success", "data": { ... } }`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeResponse {
    pub status: String,
    pub data: AnalysisReport,
}

/// Raw report produced by the analysis service. Every field is required;
/// a missing or mistyped field fails deserialization before any mapping.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisReport {
    pub apk_name: String,
    pub sha256: String,
    pub risk_score: u32,
    pub ml_prediction: String,
    pub certificate_issuer: String,
    pub suspicious_permissions: Vec<String>,
    pub network_calls: Vec<String>,
}

impl AnalysisReport {
    /// Checks the constraints serde cannot express: risk score range and
    /// digest format. The service clamps the score itself, but a report
    /// outside the contract must not reach the view mapping.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.risk_score > 100 {
            return Err(AppError::parse(format!(
                "risk_score out of range: {} (expected 0-100)",
                self.risk_score
            )));
        }
        if self.sha256.len() != 64 || !self.sha256.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AppError::parse(format!(
                "sha256 is not a 64-char hex digest: {:?}",
                self.sha256
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Legitimate,
    Unverified,
    Fraudulent,
}

impl Verdict {
    pub fn from_risk_score(risk_score: u32) -> Self {
        if risk_score >= 80 {
            Verdict::Fraudulent
        } else if risk_score >= 40 {
            Verdict::Unverified
        } else {
            Verdict::Legitimate
        }
    }

    /// Fixed advisory text shown in the verdict banner.
    pub fn advisory(self) -> &'static str {
        match self {
            Verdict::Fraudulent => {
                "This app has been identified as a fake banking application. Do not install or provide any personal information. Report it immediately."
            }
            Verdict::Unverified => {
                "This app appears suspicious. Exercise caution and verify authenticity before installation."
            }
            Verdict::Legitimate => {
                "This app appears to be legitimate. However, always verify with official sources before installation."
            }
        }
    }
}

/// One entry of the network-call list; `flagged` drives the red highlight
/// for calls that mention a known-malicious host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkCall {
    pub url: String,
    pub flagged: bool,
}

/// View model derived from an [`AnalysisReport`]. Replaced wholesale on each
/// submission; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ReportView {
    pub apk_name: String,
    pub sha256: String,
    pub ml_prediction: String,
    pub certificate_issuer: String,
    pub risk_score: u32,
    /// Complement of the risk score; also the trust bar width in percent.
    pub trust_score: u32,
    pub trust_color: &'static str,
    pub verdict: Verdict,
    pub advisory: &'static str,
    pub is_fake: bool,
    pub unverified: bool,
    pub permissions_flagged: bool,
    pub malicious_network: bool,
    pub store_authentic: bool,
    pub suspicious_permissions: Vec<String>,
    pub network_calls: Vec<NetworkCall>,
}

fn trust_color(trust_score: u32) -> &'static str {
    if trust_score >= 80 {
        "green"
    } else if trust_score >= 40 {
        "yellow"
    } else {
        "red"
    }
}

fn is_flagged_call(url: &str) -> bool {
    url.contains("malicious")
}

impl ReportView {
    pub fn from_report(report: AnalysisReport) -> Self {
        let risk_score = report.risk_score;
        // The service contract bounds the score to 0-100 and parse_report
        // enforces it, but this mapping is public; never underflow here.
        let trust_score = 100u32.saturating_sub(risk_score);
        let verdict = Verdict::from_risk_score(risk_score);

        let network_calls: Vec<NetworkCall> = report
            .network_calls
            .into_iter()
            .map(|url| {
                let flagged = is_flagged_call(&url);
                NetworkCall { url, flagged }
            })
            .collect();

        ReportView {
            apk_name: report.apk_name,
            sha256: report.sha256,
            ml_prediction: report.ml_prediction,
            certificate_issuer: report.certificate_issuer,
            risk_score,
            trust_score,
            trust_color: trust_color(trust_score),
            verdict,
            advisory: verdict.advisory(),
            is_fake: verdict == Verdict::Fraudulent,
            unverified: verdict == Verdict::Unverified,
            permissions_flagged: !report.suspicious_permissions.is_empty(),
            malicious_network: network_calls.iter().any(|c| c.flagged),
            store_authentic: risk_score < 40,
            suspicious_permissions: report.suspicious_permissions,
            network_calls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn report_with_score(risk_score: u32) -> AnalysisReport {
        AnalysisReport {
            apk_name: "app.apk".to_string(),
            sha256: "a".repeat(64),
            risk_score,
            ml_prediction: "Benign APK".to_string(),
            certificate_issuer: "CN=Trusted Bank Ltd, O=Trusted Bank".to_string(),
            suspicious_permissions: vec![],
            network_calls: vec![],
        }
    }

    #[test]
    fn trust_score_is_complement_of_risk() {
        for risk in 0..=100 {
            let view = ReportView::from_report(report_with_score(risk));
            assert_eq!(view.trust_score + view.risk_score, 100);
            assert_eq!(view.is_fake, risk >= 80);
            assert_eq!(view.unverified, (40..80).contains(&risk));
            assert_eq!(view.store_authentic, risk < 40);
        }
    }

    #[test]
    fn verdict_thresholds() {
        assert_eq!(Verdict::from_risk_score(0), Verdict::Legitimate);
        assert_eq!(Verdict::from_risk_score(39), Verdict::Legitimate);
        assert_eq!(Verdict::from_risk_score(40), Verdict::Unverified);
        assert_eq!(Verdict::from_risk_score(79), Verdict::Unverified);
        assert_eq!(Verdict::from_risk_score(80), Verdict::Fraudulent);
        assert_eq!(Verdict::from_risk_score(100), Verdict::Fraudulent);
    }

    #[test]
    fn trust_bar_color_thresholds() {
        assert_eq!(trust_color(100), "green");
        assert_eq!(trust_color(80), "green");
        assert_eq!(trust_color(79), "yellow");
        assert_eq!(trust_color(40), "yellow");
        assert_eq!(trust_color(39), "red");
        assert_eq!(trust_color(0), "red");
    }

    #[test]
    fn high_risk_report_maps_to_fraudulent_view() {
        let mut report = report_with_score(85);
        report.suspicious_permissions = vec!["READ_SMS".to_string()];
        report.network_calls = vec!["contacts-malicious-server.com".to_string()];

        let view = ReportView::from_report(report);
        assert_eq!(view.verdict, Verdict::Fraudulent);
        assert!(view.is_fake);
        assert_eq!(view.trust_score, 15);
        assert_eq!(view.trust_color, "red");
        assert_eq!(view.suspicious_permissions, vec!["READ_SMS"]);
        assert_eq!(view.network_calls.len(), 1);
        assert!(view.network_calls[0].flagged);
        assert!(view.malicious_network);
        assert!(view.permissions_flagged);
        assert!(view.advisory.contains("fake banking application"));
    }

    #[test]
    fn low_risk_report_maps_to_legitimate_view() {
        let view = ReportView::from_report(report_with_score(10));
        assert_eq!(view.verdict, Verdict::Legitimate);
        assert!(!view.is_fake);
        assert!(!view.unverified);
        assert_eq!(view.trust_score, 90);
        assert_eq!(view.trust_color, "green");
        assert!(view.suspicious_permissions.is_empty());
        assert!(view.network_calls.is_empty());
        assert!(!view.malicious_network);
        assert!(!view.permissions_flagged);
        assert!(view.store_authentic);
    }

    #[test]
    fn over_range_score_saturates_trust_to_zero() {
        let view = ReportView::from_report(report_with_score(250));
        assert_eq!(view.trust_score, 0);
        assert_eq!(view.trust_color, "red");
        assert!(view.is_fake);
    }

    #[test]
    fn benign_network_calls_are_not_flagged() {
        let mut report = report_with_score(10);
        report.network_calls = vec![
            "https://secure.bank.com".to_string(),
            "http://malicious.server.com".to_string(),
        ];
        let view = ReportView::from_report(report);
        assert!(!view.network_calls[0].flagged);
        assert!(view.network_calls[1].flagged);
    }

    #[test]
    fn validate_rejects_out_of_range_score() {
        let report = report_with_score(101);
        let err = report.validate().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Parse);
    }

    #[test]
    fn validate_rejects_bad_digest() {
        let mut report = report_with_score(10);
        report.sha256 = "not-a-digest".to_string();
        let err = report.validate().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Parse);

        report.sha256 = "z".repeat(64);
        assert!(report.validate().is_err());
    }
}
