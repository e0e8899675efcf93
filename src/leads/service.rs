use super::domain::{LeadReceipt, LeadSubmission};
use super::sink::{LeadSink, SinkError};
use super::validate::{validate_submission, FieldViolation};
use std::sync::Arc;
use tracing::{info, warn};

/// Validates a submission and forwards it to the sink. Invalid input never
/// reaches the sink.
pub struct LeadIntakeService<S> {
    sink: Arc<S>,
}

impl<S> LeadIntakeService<S>
where
    S: LeadSink,
{
    pub fn new(sink: Arc<S>) -> Self {
        Self { sink }
    }

    pub fn submit(&self, submission: &LeadSubmission) -> Result<LeadReceipt, SubmissionError> {
        validate_submission(submission).map_err(SubmissionError::Invalid)?;

        match self.sink.deliver(submission) {
            Ok(receipt) => {
                info!(lead_id = %receipt.lead_id, source = %submission.source, "lead accepted");
                Ok(receipt)
            }
            Err(error) => {
                warn!(%error, "lead delivery failed");
                Err(SubmissionError::Sink(error))
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("submission failed validation")]
    Invalid(Vec<FieldViolation>),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// What the last settled attempt produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Accepted(LeadReceipt),
    Invalid(Vec<FieldViolation>),
    Failed(String),
}

/// Transient phase of the form. `Submitting` only exists while an attempt is
/// in flight; both settlements return to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Submitting,
}

/// The contact form as a state machine: field values plus the submission
/// phase. A successful delivery resets the fields to defaults; a failed one
/// preserves them so the visitor can resubmit manually.
pub struct LeadFormSession<S> {
    service: LeadIntakeService<S>,
    fields: LeadSubmission,
    phase: SubmissionPhase,
    last_outcome: Option<SubmissionOutcome>,
}

impl<S> LeadFormSession<S>
where
    S: LeadSink,
{
    pub fn new(sink: Arc<S>) -> Self {
        Self {
            service: LeadIntakeService::new(sink),
            fields: LeadSubmission::default(),
            phase: SubmissionPhase::Idle,
            last_outcome: None,
        }
    }

    pub fn fields(&self) -> &LeadSubmission {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut LeadSubmission {
        &mut self.fields
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    pub fn last_outcome(&self) -> Option<&SubmissionOutcome> {
        self.last_outcome.as_ref()
    }

    /// Drive one submit attempt through the machine. A previous error does
    /// not block the next attempt; the machine is already back at idle.
    pub fn submit(&mut self) -> SubmissionOutcome {
        self.phase = SubmissionPhase::Submitting;

        let outcome = match self.service.submit(&self.fields) {
            Ok(receipt) => {
                self.fields = LeadSubmission::default();
                SubmissionOutcome::Accepted(receipt)
            }
            Err(SubmissionError::Invalid(violations)) => SubmissionOutcome::Invalid(violations),
            Err(SubmissionError::Sink(error)) => SubmissionOutcome::Failed(error.to_string()),
        };

        self.phase = SubmissionPhase::Idle;
        self.last_outcome = Some(outcome.clone());
        outcome
    }
}
