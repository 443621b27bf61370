use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::Config;
use crate::errors::AppError;
use crate::explanation::parser::SectionParser;
use crate::match_client::OpportunityMatcher;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable matcher. Default: HttpMatcher against MATCH_API_BASE_URL.
    pub matcher: Arc<dyn OpportunityMatcher>,
    /// Explanation parser backend, chosen via EXPLANATION_PARSER.
    pub parser: Arc<dyn SectionParser>,
    pub submissions: SubmissionGate,
    pub config: Config,
}

/// Allows one match submission in flight per client. A client's further
/// submissions are refused, not queued, until its pending one finishes.
/// Other clients are unaffected.
#[derive(Clone, Default)]
pub struct SubmissionGate(Arc<Mutex<HashSet<String>>>);

/// Holds a client's slot in the gate; released on drop.
pub struct SubmissionPermit {
    gate: SubmissionGate,
    client: String,
}

impl SubmissionGate {
    pub fn new() -> Self {
        Self::default()
    }

    fn pending(&self) -> MutexGuard<'_, HashSet<String>> {
        // The set stays consistent even if a holder panicked mid-insert.
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn try_enter(&self, client: &str) -> Result<SubmissionPermit, AppError> {
        if !self.pending().insert(client.to_string()) {
            return Err(AppError::SubmissionInProgress);
        }
        Ok(SubmissionPermit {
            gate: self.clone(),
            client: client.to_string(),
        })
    }
}

impl Drop for SubmissionPermit {
    fn drop(&mut self) {
        self.gate.pending().remove(&self.client);
    }
}
