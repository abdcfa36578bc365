use std::sync::Arc;

use crate::config::ReportConfig;
use crate::report::ReportService;

#[derive(Clone)]
pub struct AppState {
    pub reports: Arc<ReportService>,
    pub report_config: Arc<ReportConfig>,
    pub cors_origin: String,
}

impl AppState {
    pub fn new(reports: ReportService, report_config: ReportConfig) -> Self {
        Self {
            reports: Arc::new(reports),
            report_config: Arc::new(report_config),
            cors_origin: "*".to_string(),
        }
    }

    pub fn with_cors_origin(mut self, origin: impl Into<String>) -> Self {
        self.cors_origin = origin.into();
        self
    }
}
