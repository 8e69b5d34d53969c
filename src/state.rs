use std::sync::Arc;

use axum::extract::FromRef;

use crate::{audit::AuditLog, config::Config, mail::Mailer, report::ReportRenderer};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub mailer: Arc<dyn Mailer>,
    pub audit_log: Arc<dyn AuditLog>,
    pub renderer: Arc<ReportRenderer>,
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<dyn Mailer> {
    fn from_ref(state: &AppState) -> Self {
        state.mailer.clone()
    }
}

impl FromRef<AppState> for Arc<dyn AuditLog> {
    fn from_ref(state: &AppState) -> Self {
        state.audit_log.clone()
    }
}

impl FromRef<AppState> for Arc<ReportRenderer> {
    fn from_ref(state: &AppState) -> Self {
        state.renderer.clone()
    }
}
