use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One contact-form submission. Created on submit, delivered once, then
/// discarded; the form resets after a successful delivery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadSubmission {
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub service: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_id: Option<u64>,
}

fn default_source() -> String {
    "website".to_string()
}

/// Acknowledgement returned by the lead sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadReceipt {
    pub lead_id: String,
    pub accepted_at: DateTime<Utc>,
}
