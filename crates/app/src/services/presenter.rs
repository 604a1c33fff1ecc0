//! Response presenter — folds dispatch outcomes into the UI result.

use arthur_domain::dispatch::DispatchOutcome;
use arthur_domain::interpretation::InterpretationResult;
use arthur_domain::result::{Failure, PipelineResult};

/// Summary shown when the language model could not be reached.
pub const APOLOGY: &str = "Sorry, I'm having trouble understanding that.";

#[derive(Debug, Clone, Copy, Default)]
pub struct ResponsePresenter;

impl ResponsePresenter {
    /// Build the result for one interpretation and its outcomes.
    ///
    /// The summary is passed through untouched, even when some commands
    /// failed.
    #[must_use]
    pub fn present(
        &self,
        interpretation: &InterpretationResult,
        outcomes: &[DispatchOutcome],
    ) -> PipelineResult {
        let devices_controlled = outcomes
            .iter()
            .filter(|outcome| outcome.succeeded)
            .filter_map(DispatchOutcome::device)
            .collect();
        let failures = outcomes
            .iter()
            .filter(|outcome| !outcome.succeeded)
            .map(|outcome| Failure {
                device: outcome.command.device.clone(),
                reason: outcome
                    .error_detail
                    .clone()
                    .unwrap_or_else(|| "unknown error".to_string()),
            })
            .collect();
        PipelineResult {
            summary: interpretation.summary.clone(),
            devices_controlled,
            failures,
        }
    }

    /// Result used when interpretation itself failed.
    #[must_use]
    pub fn apologize(&self) -> PipelineResult {
        PipelineResult {
            summary: APOLOGY.to_string(),
            devices_controlled: Vec::new(),
            failures: Vec::new(),
        }
    }
}
