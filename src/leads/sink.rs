use super::domain::{LeadReceipt, LeadSubmission};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

/// Outbound seam to whatever receives leads (CRM webhook, mailbox, queue).
/// Exactly one delivery attempt per submission; retries are a user action.
pub trait LeadSink: Send + Sync {
    fn deliver(&self, submission: &LeadSubmission) -> Result<LeadReceipt, SinkError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("lead sink unavailable: {0}")]
    Unavailable(String),
    #[error("lead sink rejected the submission: {0}")]
    Rejected(String),
}

static LEAD_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_lead_id() -> String {
    let id = LEAD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("lead-{id:06}")
}

/// In-process sink that records deliveries; doubles as the demo sink and the
/// test double. `fail_next` simulates one transport outage.
#[derive(Debug, Default)]
pub struct RecordingSink {
    delivered: Mutex<Vec<LeadSubmission>>,
    fail_next: AtomicBool,
}

impl RecordingSink {
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::Relaxed);
    }

    pub fn delivered(&self) -> Vec<LeadSubmission> {
        self.delivered
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .clone()
    }
}

impl LeadSink for RecordingSink {
    fn deliver(&self, submission: &LeadSubmission) -> Result<LeadReceipt, SinkError> {
        if self.fail_next.swap(false, Ordering::Relaxed) {
            return Err(SinkError::Unavailable("simulated outage".to_string()));
        }

        self.delivered
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .push(submission.clone());

        Ok(LeadReceipt {
            lead_id: next_lead_id(),
            accepted_at: Utc::now(),
        })
    }
}
