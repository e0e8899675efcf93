pub mod domain;
pub mod router;
pub mod service;
pub mod sink;
pub mod validate;

pub use domain::{LeadReceipt, LeadSubmission};
pub use service::{
    LeadFormSession, LeadIntakeService, SubmissionError, SubmissionOutcome, SubmissionPhase,
};
pub use sink::{LeadSink, RecordingSink, SinkError};
pub use validate::{validate_submission, FieldViolation, LeadField};
