use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::DiagnosticsConfig;

/// One captured failure, ready to be shown or sent on.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticReport {
    pub message: String,
    /// Underlying errors, outermost first.
    pub causes: Vec<String>,
    pub activity_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Collects errors raised while a session runs.
#[derive(Debug, Default)]
pub struct DiagnosticsReporter {
    config: DiagnosticsConfig,
    reports: Vec<DiagnosticReport>,
    dropped: usize,
}

impl DiagnosticsReporter {
    pub fn new(config: DiagnosticsConfig) -> Self {
        Self {
            config,
            reports: Vec::new(),
            dropped: 0,
        }
    }

    /// Logs `err` and queues a report unless `max_reports` is reached.
    /// Returns whether the session should end.
    pub fn report(&mut self, err: &anyhow::Error, activity_id: Option<&str>) -> bool {
        log::error!(
            "activity {}: {err:#}",
            activity_id.unwrap_or("<none>")
        );
        if self.reports.len() >= self.config.max_reports {
            self.dropped += 1;
            return self.config.end_session_on_error;
        }
        self.reports.push(DiagnosticReport {
            message: err.to_string(),
            causes: err.chain().skip(1).map(|c| c.to_string()).collect(),
            activity_id: activity_id.map(str::to_string),
            timestamp: Utc::now(),
        });
        self.config.end_session_on_error
    }

    pub fn reports(&self) -> &[DiagnosticReport] {
        &self.reports
    }

    /// Takes the queued reports.
    pub fn drain(&mut self) -> Vec<DiagnosticReport> {
        std::mem::take(&mut self.reports)
    }

    /// Errors logged but not queued because the cap was reached.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn reports_keep_the_cause_chain() {
        let mut reporter = DiagnosticsReporter::new(DiagnosticsConfig::default());
        let err = Err::<(), _>(anyhow::anyhow!("constraint target missing"))
            .context("update failed")
            .unwrap_err();
        assert!(reporter.report(&err, Some("dot-memory")));

        let report = &reporter.reports()[0];
        assert_eq!(report.message, "update failed");
        assert_eq!(report.causes, vec!["constraint target missing".to_string()]);
        assert_eq!(report.activity_id.as_deref(), Some("dot-memory"));
    }

    #[test]
    fn reports_are_capped() {
        let mut reporter = DiagnosticsReporter::new(DiagnosticsConfig {
            max_reports: 2,
            end_session_on_error: false,
        });
        for i in 0..5 {
            assert!(!reporter.report(&anyhow::anyhow!("failure {i}"), None));
        }
        assert_eq!(reporter.reports().len(), 2);
        assert_eq!(reporter.dropped(), 3);
        assert_eq!(reporter.drain().len(), 2);
        assert!(reporter.reports().is_empty());
    }
}
