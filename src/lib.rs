pub mod config;
pub mod content;
pub mod error;
pub mod leads;
pub mod listings;
pub mod mortgage;
pub mod telemetry;
