//! Core traits for the concierge
//!
//! ```text
//! Lead hand-off:
//!   - LeadSink: receives each completed lead exactly once
//! ```

mod sink;

pub use sink::{LeadSink, NoopLeadSink, SinkError};
